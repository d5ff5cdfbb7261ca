//! Backend request body construction
//!
//! [`RequestBuilder`] is the only place a [`RequestBody`] is assembled. The
//! same builder serves interactive search and CSV export so both send the
//! same logical query.

use super::models::SearchQueryState;
use crate::query::params::QueryParams;
use crate::query::vocabulary::{
    BackendFilterName, FilterName, OrderBy, SortDirection, SortOption, FILTER_DELIMITER,
    QUERY_KEY, SORT_KEY,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Page size for interactive search
pub const DEFAULT_PAGE_SIZE: u32 = 25;
/// Page size for CSV export
pub const EXPORT_PAGE_SIZE: u32 = 5000;

/// Response format requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

/// Pagination and sort block of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_offset: u32,
    pub page_size: u32,
    pub order_by: OrderBy,
    pub sort_direction: SortDirection,
}

/// `one_of` filter; an empty list is still sent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneOfFilter {
    #[serde(default)]
    pub one_of: Vec<String>,
}

/// Body POSTed to the search backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    pub pagination: Pagination,
    #[serde(default)]
    pub filters: BTreeMap<BackendFilterName, OneOfFilter>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,
}

impl RequestBody {
    pub fn is_export(&self) -> bool {
        self.format == Some(ExportFormat::Csv)
    }

    /// Translate a backend-shaped query back into query parameters
    ///
    /// Used for saved searches stored in request-body form. Relevancy is the
    /// default sort and is left out.
    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();

        if !self.query.is_empty() {
            params.insert(QUERY_KEY, self.query.as_str());
        }

        for (backend, filter) in &self.filters {
            let name = backend.frontend();
            let tokens: Vec<&str> = filter
                .one_of
                .iter()
                .map(|t| t.as_str())
                .filter(|t| !t.contains(FILTER_DELIMITER))
                .collect();
            if tokens.len() != filter.one_of.len() {
                warn!("Dropping {} values containing a delimiter", name);
            }
            params.insert(name.as_str(), tokens.join(&FILTER_DELIMITER.to_string()));
        }

        let sort = SortOption::from_backend(self.pagination.order_by, self.pagination.sort_direction);
        if sort != SortOption::default() {
            params.insert(SORT_KEY, sort.as_str());
        }

        params
    }
}

/// Options for a single build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Build the bulk CSV export variant
    pub csv: bool,
}

impl BuildOptions {
    pub fn csv() -> Self {
        Self { csv: true }
    }
}

/// Builds [`RequestBody`] values from search state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBuilder {
    page_size: u32,
    export_page_size: u32,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, EXPORT_PAGE_SIZE)
    }
}

impl RequestBuilder {
    pub fn new(page_size: u32, export_page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            export_page_size: export_page_size.max(1),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Build the request for a state
    ///
    /// Export always starts at the first page with the export page size,
    /// whatever page the state is on.
    pub fn build(&self, state: &SearchQueryState, opts: BuildOptions) -> RequestBody {
        let (page_offset, page_size, format) = if opts.csv {
            (1, self.export_page_size, Some(ExportFormat::Csv))
        } else {
            (state.effective_page(), self.page_size, None)
        };

        let filters = FilterName::ALL
            .into_iter()
            .map(|name| {
                (
                    name.backend(),
                    OneOfFilter {
                        one_of: state.filter(name).to_vec(),
                    },
                )
            })
            .collect();

        RequestBody {
            pagination: Pagination {
                page_offset,
                page_size,
                order_by: state.sort_by.order_by(),
                sort_direction: state.sort_by.direction(),
            },
            filters,
            query: state.query.clone(),
            format,
        }
    }
}

/// Build with the default page sizes
pub fn build_request_body(state: &SearchQueryState, opts: BuildOptions) -> RequestBody {
    RequestBuilder::default().build(state, opts)
}
