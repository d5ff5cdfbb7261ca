//! Backend response normalization

use super::models::{ActionType, SearchQueryState};
use crate::error::{Result, SearchError};
use crate::query::vocabulary::SortDirection;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Pagination block of a backend search response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationInfo {
    /// Echoed for display; the backend may order by fields the UI never requests
    pub order_by: Option<String>,
    pub page_offset: u32,
    pub page_size: u32,
    pub sort_direction: Option<SortDirection>,
    pub total_pages: u32,
    pub total_records: u64,
}

/// Search results in the shape the UI and exporters consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelope {
    pub data: Vec<serde_json::Value>,
    #[serde(rename = "pagination_info")]
    pub pagination_info: PaginationInfo,
    #[serde(rename = "facet_counts", skip_serializing_if = "Option::is_none", default)]
    pub facet_counts: Option<serde_json::Value>,
    pub action_type: ActionType,
    pub field_changed: Option<String>,
}

impl SearchEnvelope {
    pub fn total_records(&self) -> u64 {
        self.pagination_info.total_records
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Map a raw backend JSON body into a [`SearchEnvelope`]
///
/// A body without `data` (or with `data: null`) is a backend contract
/// violation and yields [`SearchError::NoData`].
pub fn normalize(raw: serde_json::Value, state: &SearchQueryState) -> Result<SearchEnvelope> {
    let serde_json::Value::Object(mut body) = raw else {
        return Err(SearchError::InvalidResponse {
            message: "response body is not a JSON object".to_string(),
        });
    };

    let data = match body.remove("data") {
        None | Some(serde_json::Value::Null) => {
            error!("Search backend responded without data");
            return Err(SearchError::NoData);
        }
        Some(data) => serde_json::from_value::<Vec<serde_json::Value>>(data).map_err(|e| {
            SearchError::InvalidResponse {
                message: format!("data: {}", e),
            }
        })?,
    };

    let pagination_info = match body.remove("pagination_info") {
        None | Some(serde_json::Value::Null) => PaginationInfo::default(),
        Some(info) => serde_json::from_value(info).map_err(|e| SearchError::InvalidResponse {
            message: format!("pagination_info: {}", e),
        })?,
    };

    let facet_counts = body.remove("facet_counts").filter(|v| !v.is_null());

    Ok(SearchEnvelope {
        data,
        pagination_info,
        facet_counts,
        action_type: state.action_type,
        field_changed: state.field_changed.clone(),
    })
}
