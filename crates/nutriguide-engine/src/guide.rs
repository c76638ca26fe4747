//! Multi-condition guide aggregation
//!
//! Per-condition edge lists are reduced into one favor/avoid answer. The
//! reduction is pure and runs only after every condition's edges are in.
//!
//! Reconciliation rule: an ingredient flagged `avoid` by any condition is
//! listed only under avoid, whatever other conditions say about it. Its
//! `affectedDiseases` names the conditions that flagged it.

use crate::catalog::ResolvedEntity;
use crate::edges::CitedEdge;
use crate::report::{CitationView, GuideItem, GuideReport, Item};
use nutriguide_domain::{EntityKind, EntityRef, EvidenceScore, InteractionType};
use std::collections::HashMap;

/// One condition's claim about one ingredient
#[derive(Debug, Clone)]
struct Contribution {
    condition: String,
    interaction_id: i64,
    reason: String,
    evidence: EvidenceScore,
    citation: CitationView,
}

/// Everything the condition set says about one ingredient
#[derive(Debug, Default)]
struct Aggregate {
    name: String,
    avoid: Vec<Contribution>,
    benefit: Vec<Contribution>,
}

/// Reduce per-condition edges into the guide buckets
///
/// `per_condition` must be in the order the conditions were resolved; that
/// order decides `affectedDiseases` order and breaks evidence ties.
pub fn aggregate(
    per_condition: Vec<(ResolvedEntity, Vec<CitedEdge>)>,
    unresolved: Vec<String>,
) -> GuideReport {
    let diseases: Vec<String> = per_condition.iter().map(|(c, _)| c.name.clone()).collect();

    let mut order: Vec<EntityRef> = Vec::new();
    let mut by_ingredient: HashMap<EntityRef, Aggregate> = HashMap::new();

    for (condition, edges) in per_condition {
        for CitedEdge { edge, primary } in edges {
            if edge.other.kind() != EntityKind::Ingredient {
                continue;
            }

            let interaction = edge.interaction;
            let contribution = Contribution {
                condition: condition.name.clone(),
                interaction_id: interaction.id,
                reason: interaction.rationale,
                evidence: interaction.evidence,
                citation: CitationView::primary(primary.as_ref()),
            };

            let entry = by_ingredient.entry(edge.other).or_insert_with(|| {
                order.push(edge.other);
                Aggregate {
                    name: edge.other_name.clone(),
                    ..Default::default()
                }
            });

            match interaction.itype {
                InteractionType::Avoid => entry.avoid.push(contribution),
                InteractionType::Benefit => entry.benefit.push(contribution),
                InteractionType::Other(label) => {
                    tracing::warn!(
                        "Discarding interaction {} with unknown type '{}'",
                        contribution.interaction_id,
                        label
                    );
                }
            }
        }
    }

    let mut avoid = Vec::new();
    let mut beneficial = Vec::new();

    for ingredient in order {
        let Some(agg) = by_ingredient.remove(&ingredient) else {
            continue;
        };

        if !agg.avoid.is_empty() {
            if !agg.benefit.is_empty() {
                tracing::debug!(
                    "'{}' is favored by {} condition claim(s) but avoided by {}; keeping avoid",
                    agg.name,
                    agg.benefit.len(),
                    agg.avoid.len()
                );
            }
            avoid.extend(merge(&agg.name, agg.avoid));
        } else {
            beneficial.extend(merge(&agg.name, agg.benefit));
        }
    }

    sort_guide_items(&mut avoid);
    sort_guide_items(&mut beneficial);

    GuideReport {
        diseases,
        unresolved,
        beneficial,
        avoid,
    }
}

/// Collapse all contributions to one bucket into a single row
///
/// The strongest claim supplies reason, severity and citation; the earliest
/// contribution wins a tie.
fn merge(name: &str, contributions: Vec<Contribution>) -> Option<GuideItem> {
    let mut affected: Vec<String> = Vec::new();
    for c in &contributions {
        if !affected.contains(&c.condition) {
            affected.push(c.condition.clone());
        }
    }

    let best = contributions
        .into_iter()
        .reduce(|best, c| if c.evidence > best.evidence { c } else { best })?;

    Some(GuideItem {
        item: Item::new(
            best.interaction_id,
            name,
            best.reason,
            best.evidence,
            best.citation,
        ),
        affected_diseases: affected,
    })
}

fn sort_guide_items(items: &mut [GuideItem]) {
    items.sort_by(|a, b| a.item.order(&b.item));
}
