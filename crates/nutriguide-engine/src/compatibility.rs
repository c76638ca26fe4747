//! Compatibility resolution for a single ingredient

use crate::catalog::ResolvedEntity;
use crate::edges::CitedEdge;
use crate::report::{sort_items, CitationView, CompatibilityReport, Item};
use nutriguide_domain::InteractionType;

/// Partition an ingredient's edges into sorted avoid/beneficial buckets
///
/// Every edge with a known label becomes exactly one row. Edges carrying a
/// label outside avoid/benefit are dropped with a warning.
pub fn build_report(ingredient: &ResolvedEntity, edges: Vec<CitedEdge>) -> CompatibilityReport {
    let mut avoid = Vec::new();
    let mut beneficial = Vec::new();

    for CitedEdge { edge, primary } in edges {
        let interaction = edge.interaction;
        let bucket = match &interaction.itype {
            InteractionType::Avoid => &mut avoid,
            InteractionType::Benefit => &mut beneficial,
            InteractionType::Other(label) => {
                tracing::warn!(
                    "Discarding interaction {} with unknown type '{}'",
                    interaction.id,
                    label
                );
                continue;
            }
        };

        bucket.push(Item::new(
            interaction.id,
            edge.other_name,
            interaction.rationale,
            interaction.evidence,
            CitationView::primary(primary.as_ref()),
        ));
    }

    sort_items(&mut avoid);
    sort_items(&mut beneficial);

    CompatibilityReport {
        ingredient: ingredient.name.clone(),
        category: ingredient.category.clone(),
        beneficial,
        avoid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriguide_domain::{Edge, EntityRef, EvidenceScore, Interaction, Source};

    fn garlic() -> ResolvedEntity {
        ResolvedEntity {
            entity: EntityRef::Ingredient(1),
            slug: "garlic".to_string(),
            name: "Garlic".to_string(),
            category: Some("allium".to_string()),
            condition_kind: None,
        }
    }

    fn edge(id: i64, other: &str, itype: InteractionType, score: u8) -> CitedEdge {
        CitedEdge {
            edge: Edge {
                interaction: Interaction {
                    id,
                    a: EntityRef::Ingredient(1),
                    b: EntityRef::Ingredient(100 + id),
                    itype,
                    rationale: format!("reason {}", id),
                    evidence: EvidenceScore::new(score).unwrap(),
                },
                other: EntityRef::Ingredient(100 + id),
                other_name: other.to_string(),
            },
            primary: None,
        }
    }

    #[test]
    fn test_partition_and_sort() {
        let edges = vec![
            edge(1, "warfarin", InteractionType::Avoid, 4),
            edge(2, "lemon", InteractionType::Benefit, 2),
            edge(3, "Honey", InteractionType::Benefit, 2),
            edge(4, "ginger", InteractionType::Benefit, 3),
        ];
        let report = build_report(&garlic(), edges);

        assert_eq!(report.ingredient, "Garlic");
        assert_eq!(report.category.as_deref(), Some("allium"));
        let beneficial: Vec<&str> = report.beneficial.iter().map(|i| i.food.as_str()).collect();
        assert_eq!(beneficial, vec!["ginger", "Honey", "lemon"]);
        assert_eq!(report.avoid.len(), 1);
        assert_eq!(report.avoid[0].reason, "reason 1");
    }

    #[test]
    fn test_unknown_label_discarded() {
        let edges = vec![
            edge(1, "salt", InteractionType::Other("caution".to_string()), 5),
            edge(2, "lemon", InteractionType::Benefit, 1),
        ];
        let report = build_report(&garlic(), edges);
        assert!(report.avoid.is_empty());
        assert_eq!(report.beneficial.len(), 1);
    }

    #[test]
    fn test_primary_source_attached() {
        let mut cited = edge(1, "lemon", InteractionType::Benefit, 3);
        cited.primary = Some(Source {
            id: 9,
            label: "Review".to_string(),
            url: Some("https://example.org/review".to_string()),
            publisher: None,
            year: Some(2020),
        });
        let report = build_report(&garlic(), vec![cited]);

        let sources = &report.beneficial[0].sources;
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].label, "Review");
        assert_eq!(sources[0].url.as_deref(), Some("https://example.org/review"));
    }
}
