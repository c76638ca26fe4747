//! Trait definitions for storage interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! The SQLite implementation lives in `nutriguide-store`; the engine only
//! ever sees these seams.

use crate::source::{select_primary, sort_by_rank};
use crate::{Condition, Edge, EntityKind, EntityRef, Ingredient, Interaction, Source};
use std::fmt;

/// Canonical-name and alias lookups for ingredients and conditions
///
/// Keys passed in are already normalized with [`crate::normalize_key`].
pub trait EntityCatalog {
    /// Error type for catalog operations
    type Error: fmt::Display;

    /// Exact match on the canonical name (or slug) of an entity of `kind`
    fn find_by_name(&self, kind: EntityKind, key: &str) -> Result<Option<EntityRef>, Self::Error>;

    /// Exact match on any alias registered for an entity of `kind`
    fn find_by_alias(&self, kind: EntityKind, key: &str)
        -> Result<Option<EntityRef>, Self::Error>;

    /// Get an ingredient by id
    fn ingredient(&self, id: i64) -> Result<Option<Ingredient>, Self::Error>;

    /// Get a condition by id
    fn condition(&self, id: i64) -> Result<Option<Condition>, Self::Error>;

    /// Row counts, used for health reporting
    fn stats(&self) -> Result<CatalogStats, Self::Error>;
}

/// Read access to interaction edges
pub trait InteractionStore {
    /// Error type for store operations
    type Error: fmt::Display;

    /// Every interaction where `entity` is side a or side b
    ///
    /// Direction is ignored; each edge carries the other side's display name.
    fn edges_for(&self, entity: EntityRef) -> Result<Vec<Edge>, Self::Error>;

    /// Get an interaction by id
    fn interaction(&self, id: i64) -> Result<Option<Interaction>, Self::Error>;
}

/// Read access to citations linked to interactions
pub trait SourceLedger {
    /// Error type for ledger operations
    type Error: fmt::Display;

    /// Every source linked to an interaction, in no particular order
    fn sources_for(&self, interaction_id: i64) -> Result<Vec<Source>, Self::Error>;

    /// Every linked source, best citation first
    fn ranked_sources_for(&self, interaction_id: i64) -> Result<Vec<Source>, Self::Error> {
        let mut sources = self.sources_for(interaction_id)?;
        sort_by_rank(&mut sources);
        Ok(sources)
    }

    /// The single citation that represents an interaction, if any is linked
    fn primary_source_for(&self, interaction_id: i64) -> Result<Option<Source>, Self::Error> {
        let sources = self.sources_for(interaction_id)?;
        Ok(select_primary(&sources).cloned())
    }
}

/// Row counts across the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Number of ingredients
    pub ingredients: u64,

    /// Number of conditions
    pub conditions: u64,

    /// Number of interactions
    pub interactions: u64,

    /// Number of sources
    pub sources: u64,
}
