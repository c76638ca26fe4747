//! NutriGuide Domain Layer
//!
//! Core types and trait seams for the interaction resolution engine.
//! Like every other layer boundary in this workspace, the domain crate has
//! zero third-party dependencies; storage, async execution and transport
//! live in the crates that depend on it.
//!
//! ## Key Concepts
//!
//! - **Entity**: an [`Ingredient`] or a [`Condition`], addressed by [`EntityRef`]
//! - **Interaction**: a stored, directed avoid/benefit claim between two entities
//! - **Evidence score**: 0-5 strength of the cited claim ([`EvidenceScore`])
//! - **Source**: a citation shared by any number of interactions
//! - **Primary source**: the single citation chosen to represent a claim
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure business logic only (ranking, parsing, key normalization)
//! - Trait definitions for every storage interaction

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod entity;
pub mod evidence;
pub mod filter;
pub mod interaction;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use entity::{normalize_key, Condition, ConditionKind, EntityKind, EntityRef, Ingredient};
pub use evidence::{EvidenceLevel, EvidenceScore};
pub use filter::Filter;
pub use interaction::{Edge, Interaction, InteractionType};
pub use source::{select_primary, Citation, Source};
