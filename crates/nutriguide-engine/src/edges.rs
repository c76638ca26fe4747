//! Edge reads with the primary citation attached

use nutriguide_domain::traits::{InteractionStore, SourceLedger};
use nutriguide_domain::{Edge, EntityRef, Source};

/// An edge together with its primary source, if any
#[derive(Debug, Clone, PartialEq)]
pub struct CitedEdge {
    /// The edge as seen from the queried entity
    pub edge: Edge,
    /// Best-ranked linked source
    pub primary: Option<Source>,
}

/// Read every edge of `entity` and pick each one's primary source
///
/// Runs on a blocking thread; store errors are flattened to text because
/// the two traits carry distinct error types.
pub fn load_cited_edges<S>(store: &S, entity: EntityRef) -> Result<Vec<CitedEdge>, String>
where
    S: InteractionStore + SourceLedger,
{
    let edges = store
        .edges_for(entity)
        .map_err(|e| format!("edges for {}: {}", entity, e))?;

    edges
        .into_iter()
        .map(|edge| {
            let primary = store
                .primary_source_for(edge.interaction.id)
                .map_err(|e| format!("sources for interaction {}: {}", edge.interaction.id, e))?;
            Ok(CitedEdge { edge, primary })
        })
        .collect()
}
