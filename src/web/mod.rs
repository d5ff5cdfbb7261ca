//! Web server module
//!
//! Exposes the query engine over HTTP: search, CSV export, canonical
//! query strings and saved searches.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
