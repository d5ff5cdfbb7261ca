//! HTTP request handlers

use super::state::AppState;
use crate::error::{SearchError, Warning};
use crate::query::{self, QueryParams};
use crate::search::{ActionType, SavedSearchRecord, SearchEnvelope, SearchQueryState};
use axum::{
    body::Body,
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, warn};

/// Query keys carrying client diffing metadata
const ACTION_TYPE_KEY: &str = "actionType";
const FIELD_CHANGED_KEY: &str = "fieldChanged";

/// Search results response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub envelope: SearchEnvelope,
    /// Canonical query string of the search that ran
    pub canonical: String,
    pub warnings: Vec<Warning>,
}

/// Canonical form of a query
#[derive(Debug, Serialize)]
pub struct CanonicalResponse {
    pub canonical: String,
    pub warnings: Vec<Warning>,
}

/// Normalized saved search
#[derive(Debug, Serialize)]
pub struct SavedSearchResponse {
    #[serde(flatten)]
    pub record: SavedSearchRecord,
    pub fingerprint: String,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = match &self {
            SearchError::NoData | SearchError::InvalidResponse { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            SearchError::Network { .. } if self.is_aborted() => StatusCode::SERVICE_UNAVAILABLE,
            SearchError::Network { .. } | SearchError::ExportStream { .. } => {
                StatusCode::BAD_GATEWAY
            }
            SearchError::InvalidSavedSearch { .. } => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            error!("Search failed: {}", self);
        }
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn params_from(raw: Option<String>) -> QueryParams {
    QueryParams::from_query_string(raw.as_deref().unwrap_or_default())
}

/// Resolve a state, picking up client diffing metadata if sent
fn resolve(state: &AppState, params: &QueryParams) -> (SearchQueryState, Vec<Warning>) {
    let (search_state, issues) = state.search.resolve(params);

    let action_type = match params.get(ACTION_TYPE_KEY).and_then(|v| v.first()) {
        Some("update") => ActionType::Update,
        _ => ActionType::InitialLoad,
    };
    let field_changed = params
        .get(FIELD_CHANGED_KEY)
        .and_then(|v| v.first())
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let warnings = issues.iter().map(|issue| issue.to_warning()).collect();
    (search_state.with_action(action_type, field_changed), warnings)
}

/// Search handler
pub async fn search(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let params = params_from(raw);
    let (search_state, warnings) = resolve(&state, &params);

    match state.search.execute(&search_state, None).await {
        Ok(envelope) => Json(SearchResponse {
            envelope,
            canonical: query::serialize(&search_state),
            warnings,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// CSV export handler, streams the backend body straight through
pub async fn export(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let params = params_from(raw);
    let (search_state, _) = resolve(&state, &params);

    match state.search.export(&search_state, None).await {
        Ok(stream) => {
            let stamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"grants-search-{}.csv\"", stamp),
                    ),
                ],
                Body::from_stream(stream),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Canonical query string handler, used for share links and reset
pub async fn canonical(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let params = params_from(raw);
    let (search_state, warnings) = resolve(&state, &params);
    Json(CanonicalResponse {
        canonical: query::serialize(&search_state),
        warnings,
    })
    .into_response()
}

/// Normalize a saved search before it is stored
///
/// Accepts `{name, query_parameters}` or `{name, ...flat params}`.
pub async fn normalize_saved_search(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let name = payload
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let params = match payload.get("query_parameters").and_then(|v| v.as_str()) {
        Some(raw) => QueryParams::from_query_string(raw),
        None => QueryParams::from_json(&payload),
    };
    let (search_state, issues) = state.search.resolve(&params);

    match SavedSearchRecord::new(name, &search_state) {
        Ok(record) => Json(SavedSearchResponse {
            fingerprint: record.fingerprint(),
            record,
            warnings: issues.iter().map(|i| i.to_warning()).collect(),
        })
        .into_response(),
        Err(e) => {
            warn!("Rejected saved search: {}", e);
            e.into_response()
        }
    }
}

/// Load a saved search and run it
pub async fn saved_search(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state
        .search
        .execute_saved(state.saved_searches.as_ref(), &id, None)
        .await
    {
        Ok(outcome) => Json(SearchResponse {
            canonical: outcome.canonical(),
            warnings: outcome.warnings.iter().map(|w| w.to_warning()).collect(),
            envelope: outcome.envelope,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}
