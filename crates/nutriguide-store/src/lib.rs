//! NutriGuide Storage Layer
//!
//! Implements the catalog, interaction and source-ledger traits on SQLite.
//!
//! # Architecture
//!
//! - One SQLite database holding ingredients, conditions, their aliases,
//!   interactions, sources and the interaction/source join table
//! - Case-insensitive matching through stored normalized key columns
//! - A narrow write path (used by fixtures and seed import) that enforces
//!   every uniqueness rule before inserting
//!
//! # Examples
//!
//! ```no_run
//! use nutriguide_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for lookups
//! ```

#![warn(missing_docs)]

pub mod seed;
mod writes;

use nutriguide_domain::traits::{CatalogStats, EntityCatalog, InteractionStore, SourceLedger};
use nutriguide_domain::{
    Condition, ConditionKind, Edge, EntityKind, EntityRef, EvidenceScore, Ingredient, Interaction,
    InteractionType, Source,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

pub use seed::{SeedDocument, SeedReport};
pub use writes::{NewCondition, NewIngredient, NewInteraction, NewSource};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Referenced row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Row would violate a uniqueness rule
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Connection mutex poisoned by a panicking holder
    #[error("Store connection poisoned")]
    Poisoned,

    /// Seed file could not be read
    #[error("Seed I/O error: {0}")]
    SeedIo(#[from] std::io::Error),

    /// Seed file is not valid JSON
    #[error("Seed parse error: {0}")]
    SeedParse(#[from] serde_json::Error),
}

/// SQLite-based implementation of the storage traits
///
/// The connection sits behind a mutex so one store can be shared through an
/// `Arc` by blocking tasks; SQLite itself serializes the calls.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use nutriguide_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("nutriguide.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn()?.execute_batch(schema)?;
        Ok(())
    }

    /// Lock the connection
    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Build an EntityRef from a storage tag and id
    pub(crate) fn entity_ref(tag: &str, id: i64) -> Result<EntityRef, StoreError> {
        EntityKind::parse(tag)
            .map(|kind| EntityRef::new(kind, id))
            .ok_or_else(|| StoreError::InvalidData(format!("Unknown entity type: {}", tag)))
    }

    /// Wrap a StoreError for use inside a row-mapping closure
    fn conversion_error(column: usize, ty: Type, err: StoreError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, ty, Box::new(err))
    }

    /// Map the first eight columns of an interactions row
    fn row_to_interaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Interaction> {
        let a_type: String = row.get(1)?;
        let a = Self::entity_ref(&a_type, row.get(2)?)
            .map_err(|e| Self::conversion_error(1, Type::Text, e))?;

        let b_type: String = row.get(3)?;
        let b = Self::entity_ref(&b_type, row.get(4)?)
            .map_err(|e| Self::conversion_error(3, Type::Text, e))?;

        let itype: String = row.get(5)?;
        let score: i64 = row.get(7)?;
        let evidence = EvidenceScore::from_i64(score).map_err(|e| {
            Self::conversion_error(7, Type::Integer, StoreError::InvalidData(e))
        })?;

        Ok(Interaction {
            id: row.get(0)?,
            a,
            b,
            itype: InteractionType::from_label(&itype),
            rationale: row.get(6)?,
            evidence,
        })
    }

    fn row_to_source(row: &rusqlite::Row<'_>) -> rusqlite::Result<Source> {
        let year: Option<i64> = row.get(4)?;
        let year = year
            .map(|y| {
                u16::try_from(y).map_err(|_| {
                    Self::conversion_error(
                        4,
                        Type::Integer,
                        StoreError::InvalidData(format!("Year out of range: {}", y)),
                    )
                })
            })
            .transpose()?;

        Ok(Source {
            id: row.get(0)?,
            label: row.get(1)?,
            url: row.get(2)?,
            publisher: row.get(3)?,
            year,
        })
    }

    fn count(conn: &Connection, table: &str) -> Result<u64, StoreError> {
        let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(n as u64)
    }

    /// Name of the table holding entities of `kind` and its alias table
    fn tables(kind: EntityKind) -> (&'static str, &'static str, &'static str) {
        match kind {
            EntityKind::Ingredient => ("ingredients", "ingredient_aliases", "ingredient_id"),
            EntityKind::Condition => ("conditions", "condition_aliases", "condition_id"),
        }
    }
}

impl EntityCatalog for SqliteStore {
    type Error = StoreError;

    fn find_by_name(&self, kind: EntityKind, key: &str) -> Result<Option<EntityRef>, Self::Error> {
        let (table, _, _) = Self::tables(kind);
        let conn = self.conn()?;

        let id: Option<i64> = conn
            .query_row(
                &format!(
                    "SELECT id FROM {} WHERE name_key = ?1 OR slug = ?1 ORDER BY id LIMIT 1",
                    table
                ),
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(id.map(|id| EntityRef::new(kind, id)))
    }

    fn find_by_alias(
        &self,
        kind: EntityKind,
        key: &str,
    ) -> Result<Option<EntityRef>, Self::Error> {
        let (_, alias_table, owner) = Self::tables(kind);
        let conn = self.conn()?;

        // An alias key may be shared by several entities; the oldest wins.
        let id: Option<i64> = conn
            .query_row(
                &format!(
                    "SELECT {owner} FROM {alias_table} WHERE alias_key = ?1 ORDER BY {owner} LIMIT 1"
                ),
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(id.map(|id| EntityRef::new(kind, id)))
    }

    fn ingredient(&self, id: i64) -> Result<Option<Ingredient>, Self::Error> {
        let conn = self.conn()?;
        let ingredient = conn
            .query_row(
                "SELECT id, slug, name, category FROM ingredients WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Ingredient {
                        id: row.get(0)?,
                        slug: row.get(1)?,
                        name: row.get(2)?,
                        category: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(ingredient)
    }

    fn condition(&self, id: i64) -> Result<Option<Condition>, Self::Error> {
        let conn = self.conn()?;
        let condition = conn
            .query_row(
                "SELECT id, slug, name, category, kind, duration FROM conditions WHERE id = ?1",
                params![id],
                |row| {
                    let kind: String = row.get(4)?;
                    let kind = ConditionKind::parse(&kind).ok_or_else(|| {
                        Self::conversion_error(
                            4,
                            Type::Text,
                            StoreError::InvalidData(format!("Unknown condition kind: {}", kind)),
                        )
                    })?;

                    Ok(Condition {
                        id: row.get(0)?,
                        slug: row.get(1)?,
                        name: row.get(2)?,
                        category: row.get(3)?,
                        kind,
                        duration: row.get(5)?,
                    })
                },
            )
            .optional()?;

        Ok(condition)
    }

    fn stats(&self) -> Result<CatalogStats, Self::Error> {
        let conn = self.conn()?;
        Ok(CatalogStats {
            ingredients: Self::count(&conn, "ingredients")?,
            conditions: Self::count(&conn, "conditions")?,
            interactions: Self::count(&conn, "interactions")?,
            sources: Self::count(&conn, "sources")?,
        })
    }
}

impl InteractionStore for SqliteStore {
    type Error = StoreError;

    fn edges_for(&self, entity: EntityRef) -> Result<Vec<Edge>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT e.id, e.a_type, e.a_id, e.b_type, e.b_id, e.itype, e.rationale, e.evidence_score,
                    e.other_type, e.other_id, COALESCE(ing.name, cond.name)
             FROM (
                SELECT i.*,
                    CASE WHEN i.a_type = ?1 AND i.a_id = ?2 THEN i.b_type ELSE i.a_type END AS other_type,
                    CASE WHEN i.a_type = ?1 AND i.a_id = ?2 THEN i.b_id ELSE i.a_id END AS other_id
                FROM interactions i
                WHERE (i.a_type = ?1 AND i.a_id = ?2) OR (i.b_type = ?1 AND i.b_id = ?2)
             ) e
             LEFT JOIN ingredients ing ON e.other_type = 'ingredient' AND ing.id = e.other_id
             LEFT JOIN conditions cond ON e.other_type = 'condition' AND cond.id = e.other_id
             ORDER BY e.id",
        )?;

        let rows = stmt
            .query_map(params![entity.kind().as_str(), entity.id()], |row| {
                let interaction = Self::row_to_interaction(row)?;
                let other = interaction.other_side(entity).ok_or_else(|| {
                    Self::conversion_error(
                        0,
                        Type::Integer,
                        StoreError::InvalidData(format!(
                            "Interaction {} does not touch {}",
                            interaction.id, entity
                        )),
                    )
                })?;
                let other_name: Option<String> = row.get(10)?;

                Ok(other_name.map(|other_name| Edge {
                    interaction,
                    other,
                    other_name,
                }))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let total = rows.len();
        let edges: Vec<Edge> = rows.into_iter().flatten().collect();
        if edges.len() < total {
            tracing::warn!(
                "Skipped {} interaction(s) of {} pointing at missing entities",
                total - edges.len(),
                entity
            );
        }

        Ok(edges)
    }

    fn interaction(&self, id: i64) -> Result<Option<Interaction>, Self::Error> {
        let conn = self.conn()?;
        let interaction = conn
            .query_row(
                "SELECT id, a_type, a_id, b_type, b_id, itype, rationale, evidence_score
                 FROM interactions WHERE id = ?1",
                params![id],
                Self::row_to_interaction,
            )
            .optional()?;

        Ok(interaction)
    }
}

impl SourceLedger for SqliteStore {
    type Error = StoreError;

    fn sources_for(&self, interaction_id: i64) -> Result<Vec<Source>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT s.id, s.label, s.url, s.publisher, s.year
             FROM sources s
             JOIN interaction_sources link ON link.source_id = s.id
             WHERE link.interaction_id = ?1
             ORDER BY s.id",
        )?;

        let sources = stmt
            .query_map(params![interaction_id], Self::row_to_source)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sources)
    }
}
