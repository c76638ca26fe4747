//! HTTP request handlers for the NutriGuide service.
//!
//! Implements the compatibility, guide, source audit, resolve and health
//! endpoints using axum.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use nutriguide_engine::{
    parse_optional_filter, CompatibilityReport, Engine, EngineError, EntityView, GuideReport,
    SourceAudit,
};
use nutriguide_store::SqliteStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Resolution engine over the SQLite store
    pub engine: Arc<Engine<SqliteStore>>,
}

/// Query string of the compatibility endpoint
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    /// `all`, `avoid` or `beneficial`; defaults to `all`
    pub filter: Option<String>,
}

/// Guide request body
#[derive(Debug, Deserialize)]
pub struct GuideRequest {
    /// Condition names, each possibly holding comma-separated terms
    pub diseases: Vec<String>,
    /// `all`, `avoid` or `beneficial`; defaults to `all`
    #[serde(default)]
    pub filter: Option<String>,
}

/// Query string of the resolve endpoint
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Free text to resolve
    pub q: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of ingredients in the catalog
    pub ingredients: u64,
    /// Number of conditions in the catalog
    pub conditions: u64,
    /// Number of stored interactions
    pub interactions: u64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Failure reported by the engine
    Engine(EngineError),
    /// Request could not be decoded
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Engine(EngineError::EntityNotFound { .. }) => StatusCode::NOT_FOUND,
            AppError::Engine(EngineError::InvalidFilter(_))
            | AppError::Engine(EngineError::InvalidRequest(_))
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Engine(EngineError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Engine(EngineError::StoreTimeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Engine(e) => e.to_string(),
            AppError::BadRequest(msg) => msg,
        };

        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, message);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, message);
        }

        let body = Json(ErrorResponse { message });
        (status, body).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Engine(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(e: PathRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::BadRequest(e.body_text())
    }
}

/// GET /api/ingredients/:text/compatibility - Pairings for one ingredient
async fn compatibility(
    State(state): State<AppState>,
    text: Result<Path<String>, PathRejection>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Json<CompatibilityReport>, AppError> {
    let Path(text) = text?;
    let Query(query) = query?;
    let filter = parse_optional_filter(query.filter.as_deref())?;
    let report = state.engine.compatibility(&text, filter).await?;
    Ok(Json(report))
}

/// POST /api/diseases/guide - Reconciled guide for several conditions
async fn guide(
    State(state): State<AppState>,
    body: Result<Json<GuideRequest>, JsonRejection>,
) -> Result<Json<GuideReport>, AppError> {
    let Json(request) = body?;
    let filter = parse_optional_filter(request.filter.as_deref())?;
    let report = state.engine.guide(&request.diseases, filter).await?;
    Ok(Json(report))
}

/// GET /api/interactions/:id/sources - Every citation behind one claim
async fn sources(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SourceAudit>, AppError> {
    let Path(id) = id?;
    let audit = state.engine.sources(id).await?;
    Ok(Json(audit))
}

/// GET /api/resolve?q= - Resolve free text to an entity
async fn resolve(
    State(state): State<AppState>,
    query: Result<Query<ResolveQuery>, QueryRejection>,
) -> Result<Json<EntityView>, AppError> {
    let Query(query) = query?;
    let text = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter 'q' is required".to_string()))?;
    let entity = state.engine.resolve(&text).await?;
    Ok(Json(EntityView::from(entity)))
}

/// GET /health - Catalog reachability and size
async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthCheckResponse>, AppError> {
    let stats = state.engine.stats().await?;

    let status = if stats.interactions == 0 {
        "empty"
    } else {
        "healthy"
    };

    Ok(Json(HealthCheckResponse {
        status: status.to_string(),
        ingredients: stats.ingredients,
        conditions: stats.conditions,
        interactions: stats.interactions,
    }))
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/ingredients/:text/compatibility", get(compatibility))
        .route("/api/diseases/guide", post(guide))
        .route("/api/interactions/:id/sources", get(sources))
        .route("/api/resolve", get(resolve))
        .route("/health", get(health_check))
        .with_state(state)
}
