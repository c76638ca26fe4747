//! NutriGuide Resolution Engine
//!
//! Answers the two read queries of the system:
//!
//! - **compatibility**: one ingredient → every interaction touching it, split
//!   into avoid/beneficial buckets
//! - **guide**: a list of conditions → one reconciled favor/avoid ingredient
//!   list across all of them
//!
//! # Architecture
//!
//! The engine is generic over the storage traits from `nutriguide-domain`.
//! Store calls are synchronous, so each runs on `spawn_blocking`. A guide
//! request issues one call per condition and joins them before aggregating,
//! but calls only run `store_concurrency` at a time (one by default, since
//! the SQLite store serializes on a single connection). A call's deadline
//! starts once it holds a slot, so queueing behind sibling calls never counts
//! against it. No state is kept between requests.
//!
//! # Examples
//!
//! ```no_run
//! use nutriguide_domain::Filter;
//! use nutriguide_engine::{Engine, EngineConfig};
//! use nutriguide_store::SqliteStore;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("nutriguide.db")?;
//! let engine = Engine::new(store, EngineConfig::default());
//!
//! let report = engine.compatibility("garlic", Filter::All).await?;
//! println!("{} avoid, {} beneficial", report.avoid.len(), report.beneficial.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod catalog;
pub mod compatibility;
pub mod config;
pub mod edges;
pub mod error;
pub mod guide;
pub mod report;

pub use catalog::ResolvedEntity;
pub use config::EngineConfig;
pub use error::EngineError;
pub use report::{
    CitationView, CompatibilityReport, EntityView, GuideItem, GuideReport, Item, SourceAudit,
    SourceView,
};

use futures::future::try_join_all;
use nutriguide_domain::traits::{CatalogStats, EntityCatalog, InteractionStore, SourceLedger};
use nutriguide_domain::{EntityKind, Filter};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Parse a wire filter value
pub fn parse_filter(value: &str) -> Result<Filter, EngineError> {
    value.parse().map_err(EngineError::InvalidFilter)
}

/// Parse an optional wire filter value, defaulting to `all`
pub fn parse_optional_filter(value: Option<&str>) -> Result<Filter, EngineError> {
    value.map_or(Ok(Filter::All), parse_filter)
}

/// The resolution engine
///
/// Cheap to share: clone the `Arc` around it or wrap it in one.
pub struct Engine<S> {
    store: Arc<S>,
    slots: Arc<Semaphore>,
    config: EngineConfig,
}

impl<S> Engine<S>
where
    S: EntityCatalog + InteractionStore + SourceLedger + Send + Sync + 'static,
{
    /// Create an engine over a store
    pub fn new(store: S, config: EngineConfig) -> Self {
        Self::from_shared(Arc::new(store), config)
    }

    /// Create an engine over a store that is shared elsewhere
    pub fn from_shared(store: Arc<S>, config: EngineConfig) -> Self {
        let slots = Arc::new(Semaphore::new(config.store_concurrency.max(1)));
        Self {
            store,
            slots,
            config,
        }
    }

    /// Engine limits
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Run one synchronous store call on a blocking thread under the deadline
    ///
    /// The slot is held until the blocking work returns, even past a timeout.
    async fn call<T, F>(&self, operation: &'static str, f: F) -> Result<T, EngineError>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T, String> + Send + 'static,
    {
        let slot = Arc::clone(&self.slots)
            .acquire_owned()
            .await
            .map_err(|e| EngineError::StoreUnavailable(format!("{}: {}", operation, e)))?;

        let store = Arc::clone(&self.store);
        let limit = self.config.store_timeout();
        let task = tokio::task::spawn_blocking(move || {
            let _slot = slot;
            f(&*store)
        });

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(message))) => {
                tracing::error!("Store call '{}' failed: {}", operation, message);
                Err(EngineError::StoreUnavailable(format!("{}: {}", operation, message)))
            }
            Ok(Err(join_error)) => {
                tracing::error!("Store call '{}' aborted: {}", operation, join_error);
                Err(EngineError::StoreUnavailable(format!(
                    "{}: task failed: {}",
                    operation, join_error
                )))
            }
            Err(_) => {
                tracing::warn!("Store call '{}' timed out after {:?}", operation, limit);
                Err(EngineError::StoreTimeout {
                    operation,
                    timeout_ms: self.config.store_timeout_ms,
                })
            }
        }
    }

    /// Resolve free text to an ingredient or condition
    ///
    /// Ingredients are tried before conditions at each matching stage.
    pub async fn resolve(&self, text: &str) -> Result<ResolvedEntity, EngineError> {
        let query = text.to_string();
        let found = self
            .call("resolve", move |store| {
                catalog::resolve_entity(
                    store,
                    &[EntityKind::Ingredient, EntityKind::Condition],
                    &query,
                )
                .map_err(|e| e.to_string())
            })
            .await?;

        found.ok_or_else(|| EngineError::not_found("ingredient or condition", text.trim()))
    }

    /// Everything known to pair well or badly with one ingredient
    pub async fn compatibility(
        &self,
        ingredient_text: &str,
        filter: Filter,
    ) -> Result<CompatibilityReport, EngineError> {
        let query = ingredient_text.to_string();
        let ingredient = self
            .call("resolve_ingredient", move |store| {
                catalog::resolve_entity(store, &[EntityKind::Ingredient], &query)
                    .map_err(|e| e.to_string())
            })
            .await?
            .ok_or_else(|| EngineError::not_found("ingredient", ingredient_text.trim()))?;

        tracing::debug!("Resolved '{}' to {}", ingredient_text, ingredient.entity);

        let entity = ingredient.entity;
        let edges = self
            .call("edges_for", move |store| edges::load_cited_edges(store, entity))
            .await?;

        let report = compatibility::build_report(&ingredient, edges);
        tracing::debug!(
            "Compatibility for {}: {} avoid, {} beneficial",
            ingredient.name,
            report.avoid.len(),
            report.beneficial.len()
        );

        Ok(report.apply_filter(filter))
    }

    /// Reconciled favor/avoid guide for a set of conditions
    ///
    /// Each input may hold several comma-separated terms. Terms that match no
    /// condition are listed in `unresolved`. Any failing per-condition read
    /// fails the whole request.
    pub async fn guide<T: AsRef<str>>(
        &self,
        condition_texts: &[T],
        filter: Filter,
    ) -> Result<GuideReport, EngineError> {
        let terms = catalog::split_terms(condition_texts);
        if terms.is_empty() {
            return Err(EngineError::InvalidRequest(
                "at least one condition is required".to_string(),
            ));
        }
        if terms.len() > self.config.max_terms {
            return Err(EngineError::InvalidRequest(format!(
                "too many search terms ({} > {})",
                terms.len(),
                self.config.max_terms
            )));
        }

        let lookup = terms.clone();
        let resolution = self
            .call("resolve_conditions", move |store| {
                catalog::resolve_terms(store, EntityKind::Condition, &lookup)
                    .map_err(|e| e.to_string())
            })
            .await?;

        if !resolution.unresolved.is_empty() {
            tracing::warn!("Unresolved condition terms: {:?}", resolution.unresolved);
        }
        if resolution.resolved.is_empty() {
            return Err(EngineError::not_found("condition", terms.join(", ")));
        }
        if resolution.resolved.len() > self.config.max_conditions {
            return Err(EngineError::InvalidRequest(format!(
                "too many conditions ({} > {})",
                resolution.resolved.len(),
                self.config.max_conditions
            )));
        }

        let fetches = resolution.resolved.iter().map(|condition| {
            let entity = condition.entity;
            self.call("edges_for", move |store| edges::load_cited_edges(store, entity))
        });
        let per_condition_edges = try_join_all(fetches).await?;

        let per_condition = resolution
            .resolved
            .into_iter()
            .zip(per_condition_edges)
            .collect();
        let report = guide::aggregate(per_condition, resolution.unresolved);

        tracing::debug!(
            "Guide for {:?}: {} avoid, {} beneficial",
            report.diseases,
            report.avoid.len(),
            report.beneficial.len()
        );

        Ok(report.apply_filter(filter))
    }

    /// Every source linked to an interaction, best citation first
    pub async fn sources(&self, interaction_id: i64) -> Result<SourceAudit, EngineError> {
        let sources = self
            .call("sources_for", move |store| {
                let exists = store
                    .interaction(interaction_id)
                    .map_err(|e| e.to_string())?
                    .is_some();
                if !exists {
                    return Ok(None);
                }
                store
                    .ranked_sources_for(interaction_id)
                    .map(Some)
                    .map_err(|e| e.to_string())
            })
            .await?
            .ok_or_else(|| EngineError::not_found("interaction", interaction_id.to_string()))?;

        Ok(SourceAudit {
            interaction_id,
            sources: sources.into_iter().map(SourceView::from).collect(),
        })
    }

    /// Row counts for health reporting
    pub async fn stats(&self) -> Result<CatalogStats, EngineError> {
        self.call("stats", |store| store.stats().map_err(|e| e.to_string()))
            .await
    }
}
