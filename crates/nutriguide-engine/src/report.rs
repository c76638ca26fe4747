//! Response envelopes returned by the engine
//!
//! Field names follow the client's vocabulary: the evidence score travels as
//! `severity`, the other entity's name as `food`.

use crate::catalog::ResolvedEntity;
use nutriguide_domain::{normalize_key, Citation, EvidenceScore, Filter, Source};
use serde::Serialize;
use std::cmp::Ordering;

/// `{label, url}` citation on a result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationView {
    /// Citation text
    pub label: String,
    /// Link, `null` for label-only citations
    pub url: Option<String>,
}

impl From<Citation> for CitationView {
    fn from(c: Citation) -> Self {
        Self {
            label: c.label,
            url: c.url,
        }
    }
}

impl CitationView {
    /// Citation for a claim's primary source, falling back to "Unverified"
    pub fn primary(source: Option<&Source>) -> Self {
        source
            .map(Source::citation)
            .unwrap_or_else(Citation::unverified)
            .into()
    }
}

/// One row in an avoid or beneficial bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Interaction backing this row
    pub interaction_id: i64,
    /// Display name of the other entity
    pub food: String,
    /// Rationale of the claim
    pub reason: String,
    /// Evidence score, 0-5
    pub severity: u8,
    /// Fixed label for the evidence score
    pub evidence_label: String,
    /// Exactly one citation
    pub sources: Vec<CitationView>,
}

impl Item {
    /// Build a row from its parts
    pub fn new(
        interaction_id: i64,
        food: impl Into<String>,
        reason: impl Into<String>,
        evidence: EvidenceScore,
        citation: CitationView,
    ) -> Self {
        Self {
            interaction_id,
            food: food.into(),
            reason: reason.into(),
            severity: evidence.value(),
            evidence_label: evidence.level().label().to_string(),
            sources: vec![citation],
        }
    }

    /// Bucket ordering: severity descending, then name ascending ignoring
    /// case, then interaction id
    pub fn order(&self, other: &Item) -> Ordering {
        other
            .severity
            .cmp(&self.severity)
            .then_with(|| normalize_key(&self.food).cmp(&normalize_key(&other.food)))
            .then_with(|| self.interaction_id.cmp(&other.interaction_id))
    }
}

/// Sort a bucket into its stable presentation order
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(Item::order);
}

/// Compatibility answer for one ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityReport {
    /// Resolved ingredient display name
    pub ingredient: String,
    /// Ingredient category
    pub category: Option<String>,
    /// Favorable pairings
    pub beneficial: Vec<Item>,
    /// Pairings to avoid
    pub avoid: Vec<Item>,
}

impl CompatibilityReport {
    /// Empty the bucket(s) the filter excludes
    pub fn apply_filter(mut self, filter: Filter) -> Self {
        if !filter.includes_avoid() {
            self.avoid.clear();
        }
        if !filter.includes_beneficial() {
            self.beneficial.clear();
        }
        self
    }
}

/// Row of a guide bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideItem {
    /// Row fields shared with compatibility
    #[serde(flatten)]
    pub item: Item,
    /// Every resolved condition that put the ingredient in this bucket
    pub affected_diseases: Vec<String>,
}

/// Aggregated favor/avoid answer for a set of conditions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideReport {
    /// Resolved condition names in input order
    pub diseases: Vec<String>,
    /// Input terms that matched no condition
    pub unresolved: Vec<String>,
    /// Ingredients favored by at least one condition and avoided by none
    pub beneficial: Vec<GuideItem>,
    /// Ingredients avoided by at least one condition
    pub avoid: Vec<GuideItem>,
}

impl GuideReport {
    /// Empty the bucket(s) the filter excludes
    pub fn apply_filter(mut self, filter: Filter) -> Self {
        if !filter.includes_avoid() {
            self.avoid.clear();
        }
        if !filter.includes_beneficial() {
            self.beneficial.clear();
        }
        self
    }
}

/// A resolved entity as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityView {
    /// `ingredient` or `condition`
    pub kind: &'static str,
    /// Row id
    pub id: i64,
    /// Stable key
    pub slug: String,
    /// Display name
    pub name: String,
    /// Grouping
    pub category: Option<String>,
}

impl From<ResolvedEntity> for EntityView {
    fn from(r: ResolvedEntity) -> Self {
        Self {
            kind: r.entity.kind().as_str(),
            id: r.entity.id(),
            slug: r.slug,
            name: r.name,
            category: r.category,
        }
    }
}

/// A source in the auditing view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceView {
    /// Row id
    pub id: i64,
    /// Citation text
    pub label: String,
    /// Link
    pub url: Option<String>,
    /// Publishing body
    pub publisher: Option<String>,
    /// Publication year
    pub year: Option<u16>,
}

impl From<Source> for SourceView {
    fn from(s: Source) -> Self {
        Self {
            id: s.id,
            label: s.label,
            url: s.url,
            publisher: s.publisher,
            year: s.year,
        }
    }
}

/// Every source linked to one interaction, best citation first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAudit {
    /// Interaction id
    pub interaction_id: i64,
    /// Ranked sources
    pub sources: Vec<SourceView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, food: &str, score: u8) -> Item {
        Item::new(
            id,
            food,
            "reason",
            EvidenceScore::new(score).unwrap(),
            CitationView::primary(None),
        )
    }

    #[test]
    fn test_sort_order() {
        let mut items = vec![
            item(1, "banana", 2),
            item(2, "Apple", 2),
            item(3, "cherry", 5),
            item(4, "apple", 2),
        ];
        sort_items(&mut items);
        let ids: Vec<i64> = items.iter().map(|i| i.interaction_id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_unverified_fallback() {
        let row = item(1, "salt", 0);
        assert_eq!(row.sources.len(), 1);
        assert_eq!(row.sources[0].label, "Unverified");
        assert_eq!(row.sources[0].url, None);
        assert_eq!(row.evidence_label, "No source");
    }

    #[test]
    fn test_item_json_shape() {
        let json = serde_json::to_value(item(7, "salt", 4)).unwrap();
        assert_eq!(json["food"], "salt");
        assert_eq!(json["severity"], 4);
        assert_eq!(json["interactionId"], 7);
        assert_eq!(json["evidenceLabel"], "Clinical trial");
        assert!(json["sources"][0]["url"].is_null());
    }

    #[test]
    fn test_guide_item_flattens() {
        let row = GuideItem {
            item: item(1, "salt", 5),
            affected_diseases: vec!["Hypertension".to_string()],
        };
        let json = serde_json::to_value(row).unwrap();
        assert_eq!(json["food"], "salt");
        assert_eq!(json["affectedDiseases"][0], "Hypertension");
    }

    #[test]
    fn test_filter_clears_other_bucket() {
        let report = CompatibilityReport {
            ingredient: "Salt".to_string(),
            category: None,
            beneficial: vec![item(1, "lemon", 1)],
            avoid: vec![item(2, "gout", 3)],
        };

        let avoid_only = report.clone().apply_filter(Filter::Avoid);
        assert!(avoid_only.beneficial.is_empty());
        assert_eq!(avoid_only.avoid.len(), 1);

        let beneficial_only = report.clone().apply_filter(Filter::Beneficial);
        assert!(beneficial_only.avoid.is_empty());
        assert_eq!(beneficial_only.beneficial.len(), 1);

        assert_eq!(report.clone().apply_filter(Filter::All), report);
    }
}
