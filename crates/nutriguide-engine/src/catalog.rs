//! Entity catalog resolution
//!
//! Turns free text into canonical entities. Matching order is fixed:
//! canonical name (or slug) first, then aliases. There is no fuzzy matching;
//! anything else is reported as unresolved.

use nutriguide_domain::traits::EntityCatalog;
use nutriguide_domain::{normalize_key, ConditionKind, EntityKind, EntityRef};
use std::collections::HashSet;

/// An entity found by the catalog, with its display fields loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    /// Typed reference
    pub entity: EntityRef,
    /// Stable key
    pub slug: String,
    /// Display name
    pub name: String,
    /// Grouping, if any
    pub category: Option<String>,
    /// Chronic/temporary, conditions only
    pub condition_kind: Option<ConditionKind>,
}

/// Outcome of resolving a list of search terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermResolution {
    /// Distinct entities in first-seen order
    pub resolved: Vec<ResolvedEntity>,
    /// Terms that matched nothing, as typed
    pub unresolved: Vec<String>,
}

/// Split raw inputs into distinct search terms
///
/// Every input is split on commas, trimmed, and de-duplicated by its
/// normalized key. First-seen order and spelling are kept.
///
/// # Examples
///
/// ```
/// use nutriguide_engine::catalog::split_terms;
///
/// let terms = split_terms(&["Gout, diabetes".to_string(), "GOUT".to_string()]);
/// assert_eq!(terms, vec!["Gout", "diabetes"]);
/// ```
pub fn split_terms<S: AsRef<str>>(inputs: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    for input in inputs {
        for piece in input.as_ref().split(',') {
            let term = piece.trim();
            if term.is_empty() {
                continue;
            }
            if seen.insert(normalize_key(term)) {
                terms.push(term.to_string());
            }
        }
    }

    terms
}

/// Resolve text to one entity of the given kinds
///
/// All kinds are tried by canonical name before any alias is considered, so
/// a canonical name always wins over an alias of another entity.
pub fn resolve_entity<S: EntityCatalog>(
    store: &S,
    kinds: &[EntityKind],
    text: &str,
) -> Result<Option<ResolvedEntity>, S::Error> {
    let key = normalize_key(text);
    if key.is_empty() {
        return Ok(None);
    }

    let mut found = None;
    for kind in kinds {
        found = store.find_by_name(*kind, &key)?;
        if found.is_some() {
            break;
        }
    }
    if found.is_none() {
        for kind in kinds {
            found = store.find_by_alias(*kind, &key)?;
            if found.is_some() {
                break;
            }
        }
    }

    match found {
        Some(entity) => load(store, entity),
        None => Ok(None),
    }
}

/// Load display fields for an entity reference
pub fn load<S: EntityCatalog>(
    store: &S,
    entity: EntityRef,
) -> Result<Option<ResolvedEntity>, S::Error> {
    let resolved = match entity {
        EntityRef::Ingredient(id) => store.ingredient(id)?.map(|row| ResolvedEntity {
            entity,
            slug: row.slug,
            name: row.name,
            category: row.category,
            condition_kind: None,
        }),
        EntityRef::Condition(id) => store.condition(id)?.map(|row| ResolvedEntity {
            entity,
            slug: row.slug,
            name: row.name,
            category: Some(row.category),
            condition_kind: Some(row.kind),
        }),
    };
    Ok(resolved)
}

/// Resolve every term independently to an entity of `kind`
///
/// A multi-word term that does not resolve as a phrase is retried word by
/// word; if none of its words resolve either, the phrase itself is reported.
/// Entities reached through several terms appear once, as do repeated
/// unresolved words.
pub fn resolve_terms<S: EntityCatalog>(
    store: &S,
    kind: EntityKind,
    terms: &[String],
) -> Result<TermResolution, S::Error> {
    let mut out = TermResolution::default();
    let mut seen_entities = HashSet::new();
    let mut seen_unresolved = HashSet::new();

    for term in terms {
        if let Some(found) = resolve_entity(store, &[kind], term)? {
            if seen_entities.insert(found.entity) {
                out.resolved.push(found);
            }
            continue;
        }

        let words: Vec<&str> = term.split_whitespace().collect();
        if words.len() < 2 {
            if seen_unresolved.insert(normalize_key(term)) {
                out.unresolved.push(term.clone());
            }
            continue;
        }

        let mut hits = Vec::new();
        let mut misses = Vec::new();
        for word in words {
            match resolve_entity(store, &[kind], word)? {
                Some(found) => hits.push(found),
                None => misses.push(word),
            }
        }

        if hits.is_empty() {
            if seen_unresolved.insert(normalize_key(term)) {
                out.unresolved.push(term.clone());
            }
            continue;
        }
        for found in hits {
            if seen_entities.insert(found.entity) {
                out.resolved.push(found);
            }
        }
        for word in misses {
            if seen_unresolved.insert(normalize_key(word)) {
                out.unresolved.push(word.to_string());
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutriguide_store::{NewCondition, NewIngredient, SqliteStore};

    fn store() -> SqliteStore {
        let store = SqliteStore::new(":memory:").unwrap();
        let garlic = store
            .insert_ingredient(&NewIngredient {
                slug: "garlic".to_string(),
                name: "Garlic".to_string(),
                category: Some("allium".to_string()),
            })
            .unwrap();
        store.add_ingredient_alias(garlic, "Ajo").unwrap();

        let gout = store
            .insert_condition(&NewCondition {
                slug: "gout".to_string(),
                name: "Gout".to_string(),
                category: "metabolic".to_string(),
                kind: ConditionKind::Chronic,
                duration: None,
            })
            .unwrap();
        store.add_condition_alias(gout, "Podagra").unwrap();

        store
            .insert_condition(&NewCondition {
                slug: "kidney-stones".to_string(),
                name: "Kidney Stones".to_string(),
                category: "renal".to_string(),
                kind: ConditionKind::Chronic,
                duration: None,
            })
            .unwrap();
        store
    }

    #[test]
    fn test_split_terms() {
        let terms = split_terms(&[" gout ,, Kidney Stones", "gout", ""]);
        assert_eq!(terms, vec!["gout", "Kidney Stones"]);
        assert!(split_terms::<&str>(&[]).is_empty());
    }

    #[test]
    fn test_name_then_alias() {
        let store = store();
        let by_name = resolve_entity(&store, &[EntityKind::Ingredient], "GARLIC")
            .unwrap()
            .unwrap();
        let by_alias = resolve_entity(&store, &[EntityKind::Ingredient], " ajo ")
            .unwrap()
            .unwrap();
        assert_eq!(by_name, by_alias);
        assert_eq!(by_name.name, "Garlic");
        assert_eq!(by_name.category.as_deref(), Some("allium"));
    }

    #[test]
    fn test_kind_restricts_lookup() {
        let store = store();
        assert!(resolve_entity(&store, &[EntityKind::Ingredient], "gout")
            .unwrap()
            .is_none());
        let any = resolve_entity(&store, &[EntityKind::Ingredient, EntityKind::Condition], "gout")
            .unwrap()
            .unwrap();
        assert_eq!(any.entity.kind(), EntityKind::Condition);
        assert_eq!(any.condition_kind, Some(ConditionKind::Chronic));
    }

    #[test]
    fn test_blank_text_never_resolves() {
        let store = store();
        assert!(resolve_entity(&store, &[EntityKind::Ingredient], "   ")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_resolve_terms_dedups_entities() {
        let store = store();
        let terms = split_terms(&["gout, podagra, kidney stones, scurvy"]);
        let result = resolve_terms(&store, EntityKind::Condition, &terms).unwrap();

        let names: Vec<&str> = result.resolved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Gout", "Kidney Stones"]);
        assert_eq!(result.unresolved, vec!["scurvy"]);
    }

    #[test]
    fn test_phrase_falls_back_to_words() {
        let store = store();
        let terms = split_terms(&["gout flare"]);
        let result = resolve_terms(&store, EntityKind::Condition, &terms).unwrap();

        assert_eq!(result.resolved.len(), 1);
        assert_eq!(result.resolved[0].name, "Gout");
        assert_eq!(result.unresolved, vec!["flare"]);
    }

    #[test]
    fn test_unmatched_phrase_reported_whole() {
        let store = store();
        let terms = split_terms(&["broken leg"]);
        let result = resolve_terms(&store, EntityKind::Condition, &terms).unwrap();

        assert!(result.resolved.is_empty());
        assert_eq!(result.unresolved, vec!["broken leg"]);
    }

    #[test]
    fn test_word_repeated_as_own_term_still_counts() {
        let store = store();
        let terms = split_terms(&["gout flare, gout"]);
        let result = resolve_terms(&store, EntityKind::Condition, &terms).unwrap();

        let names: Vec<&str> = result.resolved.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Gout"]);
        assert_eq!(result.unresolved, vec!["flare"]);

        let terms = split_terms(&["gout, gout flare, flare"]);
        let result = resolve_terms(&store, EntityKind::Condition, &terms).unwrap();
        assert_eq!(result.resolved.len(), 1);
        assert_eq!(result.unresolved, vec!["flare"]);
    }
}
