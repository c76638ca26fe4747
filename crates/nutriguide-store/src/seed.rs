//! Seed import for curated fixture data
//!
//! A seed document lists ingredients, conditions, sources and interactions in
//! one JSON file. Interactions name their sides as `ingredient:<slug>` or
//! `condition:<slug>` and their sources by the document-local `key`.
//!
//! ```json
//! {
//!   "ingredients": [{ "slug": "salt", "name": "Salt", "aliases": ["sodium"] }],
//!   "conditions": [{ "slug": "hypertension", "name": "Hypertension",
//!                    "category": "cardiovascular", "kind": "chronic" }],
//!   "sources": [{ "key": "aha", "label": "AHA sodium guidance",
//!                 "url": "https://example.org/aha", "year": 2021 }],
//!   "interactions": [{ "a": "ingredient:salt", "b": "condition:hypertension",
//!                      "type": "avoid", "rationale": "Raises blood pressure",
//!                      "evidence": 5, "sources": ["aha"] }]
//! }
//! ```
//!
//! The whole document is applied in one transaction: any duplicate or
//! dangling reference rolls everything back.

use crate::writes::{self, NewCondition, NewIngredient, NewInteraction, NewSource};
use crate::{SqliteStore, StoreError};
use nutriguide_domain::{ConditionKind, EntityKind, EntityRef, EvidenceScore, InteractionType};
use rusqlite::Connection;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A complete seed document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedDocument {
    /// Ingredients with their aliases
    #[serde(default)]
    pub ingredients: Vec<SeedIngredient>,

    /// Conditions with their aliases
    #[serde(default)]
    pub conditions: Vec<SeedCondition>,

    /// Citation records
    #[serde(default)]
    pub sources: Vec<SeedSource>,

    /// Claims linking entities
    #[serde(default)]
    pub interactions: Vec<SeedInteraction>,
}

/// Ingredient entry
#[derive(Debug, Clone, Deserialize)]
pub struct SeedIngredient {
    /// Unique slug
    pub slug: String,
    /// Display name
    pub name: String,
    /// Optional grouping
    #[serde(default)]
    pub category: Option<String>,
    /// Alternative names
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Condition entry
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCondition {
    /// Unique slug
    pub slug: String,
    /// Display name
    pub name: String,
    /// Grouping
    pub category: String,
    /// `chronic` or `temporary`
    pub kind: String,
    /// Typical duration
    #[serde(default)]
    pub duration: Option<String>,
    /// Alternative names
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Source entry
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSource {
    /// Document-local key referenced by interactions
    pub key: String,
    /// Citation text
    pub label: String,
    /// Deep link
    #[serde(default)]
    pub url: Option<String>,
    /// Publishing body
    #[serde(default)]
    pub publisher: Option<String>,
    /// Publication year
    #[serde(default)]
    pub year: Option<u16>,
}

/// Interaction entry
#[derive(Debug, Clone, Deserialize)]
pub struct SeedInteraction {
    /// First side, `ingredient:<slug>` or `condition:<slug>`
    pub a: String,
    /// Second side
    pub b: String,
    /// `avoid` or `benefit`
    #[serde(rename = "type")]
    pub itype: String,
    /// Free-text explanation
    #[serde(default)]
    pub rationale: String,
    /// Evidence score 0-5
    #[serde(default)]
    pub evidence: u8,
    /// Keys of linked sources
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Counts of rows written by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Ingredients inserted
    pub ingredients: usize,
    /// Conditions inserted
    pub conditions: usize,
    /// Aliases inserted across both kinds
    pub aliases: usize,
    /// Sources inserted
    pub sources: usize,
    /// Interactions inserted
    pub interactions: usize,
    /// Interaction/source links inserted
    pub links: usize,
}

impl SeedDocument {
    /// Parse a seed document from JSON text
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a seed file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl SqliteStore {
    /// Apply a seed document in a single transaction
    pub fn import_seed(&self, doc: &SeedDocument) -> Result<SeedReport, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let report = apply(&tx, doc)?;
        tx.commit()?;

        tracing::info!(
            "Seed imported: {} ingredients, {} conditions, {} sources, {} interactions",
            report.ingredients,
            report.conditions,
            report.sources,
            report.interactions
        );
        Ok(report)
    }
}

fn apply(conn: &Connection, doc: &SeedDocument) -> Result<SeedReport, StoreError> {
    let mut report = SeedReport::default();

    for entry in &doc.ingredients {
        let id = writes::insert_ingredient(
            conn,
            &NewIngredient {
                slug: entry.slug.clone(),
                name: entry.name.clone(),
                category: entry.category.clone(),
            },
        )?;
        report.ingredients += 1;
        for alias in &entry.aliases {
            writes::add_alias(conn, EntityRef::Ingredient(id), alias)?;
            report.aliases += 1;
        }
    }

    for entry in &doc.conditions {
        let kind = ConditionKind::parse(&entry.kind).ok_or_else(|| {
            StoreError::InvalidData(format!(
                "Condition '{}' has unknown kind '{}'",
                entry.slug, entry.kind
            ))
        })?;
        let id = writes::insert_condition(
            conn,
            &NewCondition {
                slug: entry.slug.clone(),
                name: entry.name.clone(),
                category: entry.category.clone(),
                kind,
                duration: entry.duration.clone(),
            },
        )?;
        report.conditions += 1;
        for alias in &entry.aliases {
            writes::add_alias(conn, EntityRef::Condition(id), alias)?;
            report.aliases += 1;
        }
    }

    let mut source_ids = HashMap::new();
    for entry in &doc.sources {
        if source_ids.contains_key(entry.key.as_str()) {
            return Err(StoreError::Duplicate(format!("seed source key '{}'", entry.key)));
        }
        let id = writes::insert_source(
            conn,
            &NewSource {
                label: entry.label.clone(),
                url: entry.url.clone(),
                publisher: entry.publisher.clone(),
                year: entry.year,
            },
        )?;
        source_ids.insert(entry.key.as_str(), id);
        report.sources += 1;
    }

    for entry in &doc.interactions {
        let itype = InteractionType::from_label(&entry.itype);
        let evidence = EvidenceScore::new(entry.evidence).map_err(StoreError::InvalidData)?;
        let id = writes::insert_interaction(
            conn,
            &NewInteraction {
                a: resolve_side(conn, &entry.a)?,
                b: resolve_side(conn, &entry.b)?,
                itype,
                rationale: entry.rationale.clone(),
                evidence,
            },
        )?;
        report.interactions += 1;

        for key in &entry.sources {
            let source_id = source_ids
                .get(key.as_str())
                .copied()
                .ok_or_else(|| StoreError::NotFound(format!("seed source key '{}'", key)))?;
            writes::link_source(conn, id, source_id)?;
            report.links += 1;
        }
    }

    Ok(report)
}

/// Resolve `ingredient:<slug>` / `condition:<slug>` against rows already written
fn resolve_side(conn: &Connection, side: &str) -> Result<EntityRef, StoreError> {
    let (tag, slug) = side.split_once(':').ok_or_else(|| {
        StoreError::InvalidData(format!(
            "Interaction side '{}' must look like ingredient:<slug> or condition:<slug>",
            side
        ))
    })?;
    let kind = EntityKind::parse(tag.trim())
        .ok_or_else(|| StoreError::InvalidData(format!("Unknown entity type: {}", tag)))?;

    writes::id_for_slug(conn, kind, slug.trim())?
        .ok_or_else(|| StoreError::NotFound(format!("{}:{}", kind, slug.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriguide_domain::traits::EntityCatalog;

    const SEED: &str = r#"{
        "ingredients": [
            { "slug": "salt", "name": "Salt", "category": "seasoning", "aliases": ["sodium chloride"] },
            { "slug": "spinach", "name": "Spinach" }
        ],
        "conditions": [
            { "slug": "hypertension", "name": "Hypertension", "category": "cardiovascular",
              "kind": "chronic", "aliases": ["high blood pressure"] }
        ],
        "sources": [
            { "key": "aha", "label": "AHA guidance", "url": "https://example.org/aha", "year": 2021 }
        ],
        "interactions": [
            { "a": "ingredient:salt", "b": "condition:hypertension", "type": "avoid",
              "rationale": "Raises blood pressure", "evidence": 5, "sources": ["aha"] },
            { "a": "ingredient:spinach", "b": "condition:hypertension", "type": "benefit",
              "rationale": "Potassium rich", "evidence": 3 }
        ]
    }"#;

    #[test]
    fn test_import_counts() {
        let store = SqliteStore::new(":memory:").unwrap();
        let doc = SeedDocument::from_json(SEED).unwrap();
        let report = store.import_seed(&doc).unwrap();

        assert_eq!(report.ingredients, 2);
        assert_eq!(report.conditions, 1);
        assert_eq!(report.aliases, 2);
        assert_eq!(report.sources, 1);
        assert_eq!(report.interactions, 2);
        assert_eq!(report.links, 1);

        let stats = store.stats().unwrap();
        assert_eq!(stats.interactions, 2);
    }

    #[test]
    fn test_reimport_rolls_back() {
        let store = SqliteStore::new(":memory:").unwrap();
        let doc = SeedDocument::from_json(SEED).unwrap();
        store.import_seed(&doc).unwrap();

        let result = store.import_seed(&doc);
        assert!(matches!(result, Err(StoreError::Duplicate(_))));
        assert_eq!(store.stats().unwrap().ingredients, 2);
    }

    #[test]
    fn test_unknown_side_rolls_back_everything() {
        let store = SqliteStore::new(":memory:").unwrap();
        let doc = SeedDocument::from_json(
            r#"{
                "ingredients": [{ "slug": "salt", "name": "Salt" }],
                "interactions": [{ "a": "ingredient:salt", "b": "condition:gout", "type": "avoid" }]
            }"#,
        )
        .unwrap();

        assert!(matches!(store.import_seed(&doc), Err(StoreError::NotFound(_))));
        assert_eq!(store.stats().unwrap().ingredients, 0);
    }

    #[test]
    fn test_bad_side_format() {
        let store = SqliteStore::new(":memory:").unwrap();
        let doc = SeedDocument::from_json(
            r#"{
                "ingredients": [{ "slug": "salt", "name": "Salt" }],
                "interactions": [{ "a": "salt", "b": "ingredient:salt", "type": "avoid" }]
            }"#,
        )
        .unwrap();

        assert!(matches!(store.import_seed(&doc), Err(StoreError::InvalidData(_))));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SeedDocument::from_json("{ not json"),
            Err(StoreError::SeedParse(_))
        ));
    }
}
