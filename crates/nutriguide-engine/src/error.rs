//! Error types for resolution requests

use thiserror::Error;

/// Errors that terminate a resolution request
///
/// The engine never retries; every variant is final for the request and the
/// caller decides whether to re-issue it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Input text does not resolve to any known entity
    #[error("No {kind} matches '{query}'")]
    EntityNotFound {
        /// What was looked up ("ingredient", "condition", "interaction", ...)
        kind: &'static str,
        /// The text or id that failed to resolve
        query: String,
    },

    /// Filter value outside all/avoid/beneficial
    #[error("{0}")]
    InvalidFilter(String),

    /// Request shape rejected before touching the store
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Underlying storage failed
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A store call exceeded its deadline
    #[error("Store call '{operation}' timed out after {timeout_ms} ms")]
    StoreTimeout {
        /// Name of the store operation
        operation: &'static str,
        /// Deadline that elapsed
        timeout_ms: u64,
    },
}

impl EngineError {
    /// Shorthand for [`EngineError::EntityNotFound`]
    pub fn not_found(kind: &'static str, query: impl Into<String>) -> Self {
        EngineError::EntityNotFound {
            kind,
            query: query.into(),
        }
    }

    /// Whether the failure is on the infrastructure side
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            EngineError::StoreUnavailable(_) | EngineError::StoreTimeout { .. }
        )
    }
}
