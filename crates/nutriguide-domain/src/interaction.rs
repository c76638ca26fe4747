//! Interaction module - directed avoid/benefit claims between entities

use crate::{EntityRef, EvidenceScore};

/// Label carried by an interaction
///
/// Storage constrains the label to `avoid` or `benefit`; anything else read
/// back is kept as [`InteractionType::Other`] so resolvers can drop it
/// instead of failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InteractionType {
    /// The pair should not be combined
    Avoid,

    /// The pair is favorable
    Benefit,

    /// Unrecognized stored label
    Other(String),
}

impl InteractionType {
    /// Storage label
    pub fn as_str(&self) -> &str {
        match self {
            InteractionType::Avoid => "avoid",
            InteractionType::Benefit => "benefit",
            InteractionType::Other(label) => label,
        }
    }

    /// Map a stored label; never fails
    pub fn from_label(label: &str) -> Self {
        match label {
            "avoid" => InteractionType::Avoid,
            "benefit" => InteractionType::Benefit,
            other => InteractionType::Other(other.to_string()),
        }
    }

    /// Whether this label is part of the closed enumeration
    pub fn is_known(&self) -> bool {
        !matches!(self, InteractionType::Other(_))
    }
}

/// A stored interaction row
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Row id
    pub id: i64,

    /// First side of the directed pair
    pub a: EntityRef,

    /// Second side of the directed pair
    pub b: EntityRef,

    /// Avoid or benefit
    pub itype: InteractionType,

    /// Free-text explanation of the claim
    pub rationale: String,

    /// Strength of the cited evidence
    pub evidence: EvidenceScore,
}

impl Interaction {
    /// The side opposite to `entity`, if `entity` takes part in this edge
    ///
    /// For a self-referencing edge the entity itself is returned.
    pub fn other_side(&self, entity: EntityRef) -> Option<EntityRef> {
        if self.a == entity {
            Some(self.b)
        } else if self.b == entity {
            Some(self.a)
        } else {
            None
        }
    }
}

/// An interaction seen from one of its entities
///
/// Produced by [`crate::traits::InteractionStore::edges_for`] with the other
/// side's display name already joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// The underlying row
    pub interaction: Interaction,

    /// The side that is not the queried entity
    pub other: EntityRef,

    /// Display name of `other`
    pub other_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interaction(a: EntityRef, b: EntityRef) -> Interaction {
        Interaction {
            id: 1,
            a,
            b,
            itype: InteractionType::Avoid,
            rationale: "raises blood pressure".to_string(),
            evidence: EvidenceScore::new(3).unwrap(),
        }
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(InteractionType::from_label("avoid"), InteractionType::Avoid);
        assert_eq!(InteractionType::from_label("benefit"), InteractionType::Benefit);
        let other = InteractionType::from_label("caution");
        assert_eq!(other, InteractionType::Other("caution".to_string()));
        assert!(!other.is_known());
        assert_eq!(other.as_str(), "caution");
    }

    #[test]
    fn test_other_side_is_symmetric() {
        let salt = EntityRef::Ingredient(1);
        let hypertension = EntityRef::Condition(2);
        let edge = interaction(salt, hypertension);

        assert_eq!(edge.other_side(salt), Some(hypertension));
        assert_eq!(edge.other_side(hypertension), Some(salt));
        assert_eq!(edge.other_side(EntityRef::Ingredient(9)), None);
        assert!(edge.is_ingredient_condition());
    }

    #[test]
    fn test_ingredient_pair_is_not_condition_edge() {
        let edge = interaction(EntityRef::Ingredient(1), EntityRef::Ingredient(2));
        assert!(!edge.is_ingredient_condition());
    }
}
