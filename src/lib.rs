//! Grantsearch-RS: search query translation for a grant-search portal
//!
//! Turns URL query parameters into a validated search state, builds the
//! backend request body from it, and normalizes what comes back. The same
//! canonical query string is used for share links and saved searches.

pub mod config;
pub mod error;
pub mod network;
pub mod query;
pub mod search;
pub mod web;

pub use config::Settings;
pub use error::{Result, SearchError, ValidationError};
pub use query::{DefaultFilters, QueryParams};
pub use search::{Search, SearchEnvelope, SearchQueryState};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
