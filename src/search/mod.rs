//! Search orchestration module
//!
//! Holds the normalized search state, builds backend requests from it,
//! normalizes backend responses, and runs searches and exports.

mod backend;
mod executor;
mod models;
pub mod request;
pub mod response;
pub mod saved;

pub use backend::{CsvStream, SavedSearchSource, SearchBackend};
pub use executor::{Search, SearchOutcome};
pub use models::*;
pub use request::{build_request_body, BuildOptions, RequestBody, RequestBuilder};
pub use response::{normalize, PaginationInfo, SearchEnvelope};
pub use saved::SavedSearchRecord;
