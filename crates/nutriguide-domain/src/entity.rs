//! Entity module - the two node types of the interaction graph

use std::fmt;

/// Which table an entity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// A food or ingredient
    Ingredient,

    /// A disease or health condition
    Condition,
}

impl EntityKind {
    /// Storage tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Ingredient => "ingredient",
            EntityKind::Condition => "condition",
        }
    }

    /// Parse a storage tag
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ingredient" => Some(EntityKind::Ingredient),
            "condition" => Some(EntityKind::Condition),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to one side of an interaction
///
/// Replaces the (type, id) column pair of the storage layer so a condition id
/// can never be confused with an ingredient id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityRef {
    /// Reference to an ingredient row
    Ingredient(i64),

    /// Reference to a condition row
    Condition(i64),
}

impl EntityRef {
    /// Build a reference from a kind and a row id
    pub fn new(kind: EntityKind, id: i64) -> Self {
        match kind {
            EntityKind::Ingredient => EntityRef::Ingredient(id),
            EntityKind::Condition => EntityRef::Condition(id),
        }
    }

    /// Kind of the referenced entity
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Ingredient(_) => EntityKind::Ingredient,
            EntityRef::Condition(_) => EntityKind::Condition,
        }
    }

    /// Row id of the referenced entity
    pub fn id(&self) -> i64 {
        match self {
            EntityRef::Ingredient(id) | EntityRef::Condition(id) => *id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// An ingredient row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    /// Row id
    pub id: i64,

    /// Unique, stable key (e.g. `green-tea`)
    pub slug: String,

    /// Display name
    pub name: String,

    /// Optional grouping such as "vegetable" or "spice"
    pub category: Option<String>,
}

/// Whether a condition is long-lived or passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    /// Long-term condition (e.g. diabetes)
    Chronic,

    /// Short-term condition (e.g. a cold)
    Temporary,
}

impl ConditionKind {
    /// Storage tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Chronic => "chronic",
            ConditionKind::Temporary => "temporary",
        }
    }

    /// Parse a storage tag (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "chronic" => Some(ConditionKind::Chronic),
            "temporary" => Some(ConditionKind::Temporary),
            _ => None,
        }
    }
}

/// A condition row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Row id
    pub id: i64,

    /// Unique, stable key (e.g. `type-2-diabetes`)
    pub slug: String,

    /// Display name
    pub name: String,

    /// Grouping such as "metabolic" or "digestive"
    pub category: String,

    /// Chronic or temporary
    pub kind: ConditionKind,

    /// Free-text typical duration for temporary conditions
    pub duration: Option<String>,
}

/// Normalize free text into a lookup key
///
/// Trims, collapses runs of whitespace into one space and lowercases using
/// Unicode rules. Names and aliases are stored and matched by this key.
///
/// # Examples
///
/// ```
/// use nutriguide_domain::normalize_key;
///
/// assert_eq!(normalize_key("  Green   Tea "), "green tea");
/// ```
pub fn normalize_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ref_kind_and_id() {
        let r = EntityRef::new(EntityKind::Condition, 7);
        assert_eq!(r, EntityRef::Condition(7));
        assert_eq!(r.kind(), EntityKind::Condition);
        assert_eq!(r.id(), 7);
        assert_eq!(r.to_string(), "condition:7");
    }

    #[test]
    fn test_entity_kind_tags() {
        assert_eq!(EntityKind::parse("ingredient"), Some(EntityKind::Ingredient));
        assert_eq!(EntityKind::parse("condition"), Some(EntityKind::Condition));
        assert_eq!(EntityKind::parse("Ingredient"), None);
    }

    #[test]
    fn test_condition_kind_parse() {
        assert_eq!(ConditionKind::parse(" Chronic "), Some(ConditionKind::Chronic));
        assert_eq!(ConditionKind::parse("temporary"), Some(ConditionKind::Temporary));
        assert_eq!(ConditionKind::parse("acute"), None);
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Garlic"), "garlic");
        assert_eq!(normalize_key("\tHigh  Blood\nPressure "), "high blood pressure");
        assert_eq!(normalize_key("   "), "");
        assert_eq!(normalize_key("ÄPFEL"), "äpfel");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: normalizing twice is the same as normalizing once
        #[test]
        fn test_normalize_idempotent(s in "[a-zA-Z0-9 \t\n]{0,40}") {
            let once = normalize_key(&s);
            prop_assert_eq!(normalize_key(&once), once);
        }

        /// Property: case and padding never change the key
        #[test]
        fn test_normalize_case_insensitive(s in "[a-zA-Z ]{0,30}") {
            let padded = format!("  {}  ", s.to_uppercase());
            prop_assert_eq!(normalize_key(&padded), normalize_key(&s));
        }
    }
}
