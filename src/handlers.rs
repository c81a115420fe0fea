use crate::config::Config;
use crate::discovery::{discover_leads, DiscoveryOutcome};
use crate::enrichment::run_enrichment;
use crate::errors::{AppError, ResultExt};
use crate::export::{content_disposition, export_filename, render_csv};
use crate::models::{EnrichResponse, SearchParams, SearchResponse, SessionSnapshot};
use crate::provider::GroundedSearchProvider;
use crate::store::LeadStore;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Backend used for discovery and enrichment.
    pub provider: Arc<dyn GroundedSearchProvider>,
    /// The current search session.
    pub store: Arc<LeadStore>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn GroundedSearchProvider>) -> Self {
        Self {
            config,
            provider,
            store: Arc::new(LeadStore::new()),
        }
    }
}

/// Routes of the prospecting API, without the rate limiter (applied in `main`).
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/search", post(search_leads))
        .route("/api/v1/enrich", post(enrich_leads))
        .route("/api/v1/leads", get(get_leads))
        .route("/api/v1/export", get(export_csv))
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-prospect-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/search
///
/// Starts a new session and runs discovery. An empty result is a 200 with a
/// message; a provider failure is a 502 and leaves the session empty. A search
/// overtaken by a newer one is a 409 and its leads are not stored.
pub async fn search_leads(
    State(state): State<Arc<AppState>>,
    Json(params): Json<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let params = params.normalized()?;
    tracing::info!(
        "POST /search - activity: {}, city: {}",
        params.activity,
        params.city
    );

    let generation = state.store.begin_search(params.clone()).await;

    match discover_leads(state.provider.as_ref(), &params.activity, &params.city).await? {
        DiscoveryOutcome::Found(leads) => {
            if !state.store.replace_all(generation, leads.clone()).await {
                tracing::warn!(
                    "⚠ Search for '{}' in '{}' was superseded by a newer search",
                    params.activity,
                    params.city
                );
                return Err(AppError::Conflict(
                    "A newer search replaced this one before it finished".to_string(),
                ));
            }
            Ok(Json(SearchResponse {
                status: "found".to_string(),
                count: leads.len(),
                leads,
                message: None,
            }))
        }
        DiscoveryOutcome::Empty => Ok(Json(SearchResponse {
            status: "empty".to_string(),
            count: 0,
            leads: Vec::new(),
            message: Some(state.config.locale.no_leads_message().to_string()),
        })),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EnrichQuery {
    #[serde(default)]
    pub wait: bool,
}

/// POST /api/v1/enrich
///
/// Enriches the `discovered` leads of the current session. The run always
/// executes on its own task, so it finishes and releases the session even if
/// the client disconnects. Returns 202 unless `?wait=true` is given.
pub async fn enrich_leads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EnrichQuery>,
) -> Result<Response, AppError> {
    let job = state.store.begin_enrichment().await?;
    let queued = job.leads.len();
    let batch_size = state.config.enrich_batch_size;
    let locale = state.config.locale;

    tracing::info!("POST /enrich - {} lead(s) queued (wait: {})", queued, query.wait);

    let task_state = state.clone();
    let run = tokio::spawn(async move {
        run_enrichment(
            &task_state.store,
            task_state.provider.as_ref(),
            job,
            batch_size,
            locale,
        )
        .await
    });

    if query.wait {
        let summary = run
            .await
            .map_err(|e| AppError::InternalError(format!("Enrichment task failed: {}", e)))?;
        return Ok(Json(EnrichResponse {
            status: "completed".to_string(),
            queued,
            summary: Some(summary),
            leads: Some(state.store.leads().await),
        })
        .into_response());
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(EnrichResponse {
            status: "started".to_string(),
            queued,
            summary: None,
            leads: None,
        }),
    )
        .into_response())
}

/// GET /api/v1/leads
pub async fn get_leads(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.store.snapshot().await)
}

/// GET /api/v1/export
///
/// Downloads the validated session as a spreadsheet-ready CSV.
pub async fn export_csv(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let leads = state.store.leads().await;
    if leads.is_empty() {
        return Err(AppError::NotFound("No leads to export".to_string()));
    }

    let city = state.store.params().await.map(|p| p.city);
    let filename = export_filename(city.as_deref());
    let csv = render_csv(&leads, state.config.locale);

    let disposition = HeaderValue::from_str(&content_disposition(&filename))
        .map_err(|e| AppError::ExportError(format!("Invalid export filename: {}", e)))
        .context(state.config.locale.export_failed_message())?;

    tracing::info!("GET /export - {} lead(s) as {}", leads.len(), filename);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
