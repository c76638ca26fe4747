//! Write path for curated rows
//!
//! Every insert checks the relevant uniqueness rule inside the caller's
//! transaction and reports a violation as [`StoreError::Duplicate`] rather
//! than surfacing a raw constraint error.

use crate::{SqliteStore, StoreError};
use nutriguide_domain::{
    normalize_key, ConditionKind, EntityKind, EntityRef, EvidenceScore, InteractionType,
};
use rusqlite::{params, Connection, OptionalExtension};

/// Ingredient to insert
#[derive(Debug, Clone)]
pub struct NewIngredient {
    /// Unique, stable key
    pub slug: String,
    /// Display name
    pub name: String,
    /// Optional grouping
    pub category: Option<String>,
}

/// Condition to insert
#[derive(Debug, Clone)]
pub struct NewCondition {
    /// Unique, stable key
    pub slug: String,
    /// Display name
    pub name: String,
    /// Grouping
    pub category: String,
    /// Chronic or temporary
    pub kind: ConditionKind,
    /// Typical duration
    pub duration: Option<String>,
}

/// Source to insert
#[derive(Debug, Clone)]
pub struct NewSource {
    /// Citation text
    pub label: String,
    /// Deep link, must be globally unique
    pub url: Option<String>,
    /// Publishing body
    pub publisher: Option<String>,
    /// Publication year (1000-9999)
    pub year: Option<u16>,
}

/// Interaction to insert
#[derive(Debug, Clone)]
pub struct NewInteraction {
    /// First side
    pub a: EntityRef,
    /// Second side
    pub b: EntityRef,
    /// Avoid or benefit
    pub itype: InteractionType,
    /// Free-text explanation
    pub rationale: String,
    /// Evidence strength
    pub evidence: EvidenceScore,
}

pub(crate) fn insert_ingredient(conn: &Connection, new: &NewIngredient) -> Result<i64, StoreError> {
    ensure_slug_free(conn, "ingredients", &new.slug)?;
    conn.execute(
        "INSERT INTO ingredients (slug, name, name_key, category) VALUES (?1, ?2, ?3, ?4)",
        params![&new.slug, &new.name, normalize_key(&new.name), &new.category],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_condition(conn: &Connection, new: &NewCondition) -> Result<i64, StoreError> {
    ensure_slug_free(conn, "conditions", &new.slug)?;
    conn.execute(
        "INSERT INTO conditions (slug, name, name_key, category, kind, duration)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &new.slug,
            &new.name,
            normalize_key(&new.name),
            &new.category,
            new.kind.as_str(),
            &new.duration,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn add_alias(conn: &Connection, entity: EntityRef, alias: &str) -> Result<(), StoreError> {
    let key = normalize_key(alias);
    if key.is_empty() {
        return Err(StoreError::InvalidData("Alias cannot be empty".to_string()));
    }
    ensure_entity_exists(conn, entity)?;

    let (table, owner) = match entity.kind() {
        EntityKind::Ingredient => ("ingredient_aliases", "ingredient_id"),
        EntityKind::Condition => ("condition_aliases", "condition_id"),
    };

    let exists = conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE {owner} = ?1 AND alias_key = ?2"),
            params![entity.id(), &key],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if exists {
        return Err(StoreError::Duplicate(format!(
            "alias '{}' already registered for {}",
            alias, entity
        )));
    }

    conn.execute(
        &format!("INSERT INTO {table} ({owner}, alias, alias_key) VALUES (?1, ?2, ?3)"),
        params![entity.id(), alias, &key],
    )?;
    Ok(())
}

pub(crate) fn insert_source(conn: &Connection, new: &NewSource) -> Result<i64, StoreError> {
    if let Some(year) = new.year {
        if !(1000..=9999).contains(&year) {
            return Err(StoreError::InvalidData(format!(
                "Source year must be in [1000, 9999], got {}",
                year
            )));
        }
    }

    if let Some(url) = &new.url {
        let exists = conn
            .query_row("SELECT 1 FROM sources WHERE url = ?1", params![url], |_| Ok(true))
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Duplicate(format!("source url {}", url)));
        }
    }

    conn.execute(
        "INSERT INTO sources (label, url, publisher, year) VALUES (?1, ?2, ?3, ?4)",
        params![&new.label, &new.url, &new.publisher, new.year],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn insert_interaction(conn: &Connection, new: &NewInteraction) -> Result<i64, StoreError> {
    if !new.itype.is_known() {
        return Err(StoreError::InvalidData(format!(
            "Unknown interaction type: {}",
            new.itype.as_str()
        )));
    }
    ensure_entity_exists(conn, new.a)?;
    ensure_entity_exists(conn, new.b)?;

    let exists = conn
        .query_row(
            "SELECT 1 FROM interactions
             WHERE a_type = ?1 AND a_id = ?2 AND b_type = ?3 AND b_id = ?4 AND itype = ?5",
            params![
                new.a.kind().as_str(),
                new.a.id(),
                new.b.kind().as_str(),
                new.b.id(),
                new.itype.as_str(),
            ],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if exists {
        return Err(StoreError::Duplicate(format!(
            "{} interaction {} -> {}",
            new.itype.as_str(),
            new.a,
            new.b
        )));
    }

    conn.execute(
        "INSERT INTO interactions (a_type, a_id, b_type, b_id, itype, rationale, evidence_score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            new.a.kind().as_str(),
            new.a.id(),
            new.b.kind().as_str(),
            new.b.id(),
            new.itype.as_str(),
            &new.rationale,
            new.evidence.value(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn link_source(conn: &Connection, interaction_id: i64, source_id: i64) -> Result<(), StoreError> {
    let interaction_exists = conn
        .query_row(
            "SELECT 1 FROM interactions WHERE id = ?1",
            params![interaction_id],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if !interaction_exists {
        return Err(StoreError::NotFound(format!("interaction {}", interaction_id)));
    }

    let source_exists = conn
        .query_row("SELECT 1 FROM sources WHERE id = ?1", params![source_id], |_| Ok(true))
        .optional()?
        .unwrap_or(false);
    if !source_exists {
        return Err(StoreError::NotFound(format!("source {}", source_id)));
    }

    let linked = conn
        .query_row(
            "SELECT 1 FROM interaction_sources WHERE interaction_id = ?1 AND source_id = ?2",
            params![interaction_id, source_id],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if linked {
        return Err(StoreError::Duplicate(format!(
            "source {} already linked to interaction {}",
            source_id, interaction_id
        )));
    }

    conn.execute(
        "INSERT INTO interaction_sources (interaction_id, source_id) VALUES (?1, ?2)",
        params![interaction_id, source_id],
    )?;
    Ok(())
}

pub(crate) fn id_for_slug(conn: &Connection, kind: EntityKind, slug: &str) -> Result<Option<EntityRef>, StoreError> {
    let table = match kind {
        EntityKind::Ingredient => "ingredients",
        EntityKind::Condition => "conditions",
    };
    let id: Option<i64> = conn
        .query_row(
            &format!("SELECT id FROM {table} WHERE slug = ?1"),
            params![slug],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id.map(|id| EntityRef::new(kind, id)))
}

fn ensure_slug_free(conn: &Connection, table: &str, slug: &str) -> Result<(), StoreError> {
    if slug.trim().is_empty() {
        return Err(StoreError::InvalidData("Slug cannot be empty".to_string()));
    }
    let taken = conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE slug = ?1"),
            params![slug],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if taken {
        return Err(StoreError::Duplicate(format!("slug '{}' in {}", slug, table)));
    }
    Ok(())
}

fn ensure_entity_exists(conn: &Connection, entity: EntityRef) -> Result<(), StoreError> {
    let table = match entity.kind() {
        EntityKind::Ingredient => "ingredients",
        EntityKind::Condition => "conditions",
    };
    let exists = conn
        .query_row(
            &format!("SELECT 1 FROM {table} WHERE id = ?1"),
            params![entity.id()],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    if !exists {
        return Err(StoreError::NotFound(entity.to_string()));
    }
    Ok(())
}

impl SqliteStore {
    /// Insert an ingredient, returning its id
    pub fn insert_ingredient(&self, new: &NewIngredient) -> Result<i64, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let id = insert_ingredient(&tx, new)?;
        tx.commit()?;
        Ok(id)
    }

    /// Register an alias for an ingredient
    pub fn add_ingredient_alias(&self, ingredient_id: i64, alias: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        add_alias(&tx, EntityRef::Ingredient(ingredient_id), alias)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert a condition, returning its id
    pub fn insert_condition(&self, new: &NewCondition) -> Result<i64, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let id = insert_condition(&tx, new)?;
        tx.commit()?;
        Ok(id)
    }

    /// Register an alias for a condition
    pub fn add_condition_alias(&self, condition_id: i64, alias: &str) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        add_alias(&tx, EntityRef::Condition(condition_id), alias)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert a source, returning its id
    pub fn insert_source(&self, new: &NewSource) -> Result<i64, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let id = insert_source(&tx, new)?;
        tx.commit()?;
        Ok(id)
    }

    /// Insert an interaction, returning its id
    ///
    /// Fails with [`StoreError::Duplicate`] when the same ordered pair already
    /// carries the same label.
    pub fn insert_interaction(&self, new: &NewInteraction) -> Result<i64, StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let id = insert_interaction(&tx, new)?;
        tx.commit()?;
        Ok(id)
    }

    /// Attach a source to an interaction
    pub fn link_source(&self, interaction_id: i64, source_id: i64) -> Result<(), StoreError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        link_source(&tx, interaction_id, source_id)?;
        tx.commit()?;
        Ok(())
    }
}
