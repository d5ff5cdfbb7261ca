//! Application state shared across handlers

use crate::config::Settings;
use crate::network::HttpClient;
use crate::search::{SavedSearchSource, Search, SearchBackend};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search executor
    pub search: Arc<Search>,
    /// Where saved searches are loaded from
    pub saved_searches: Arc<dyn SavedSearchSource>,
}

impl AppState {
    /// Create application state backed by the HTTP client
    pub fn new(settings: Settings, client: HttpClient) -> Self {
        let client = Arc::new(client);
        Self::with_backends(settings, client.clone(), client)
    }

    /// Create application state with explicit collaborators
    pub fn with_backends(
        settings: Settings,
        backend: Arc<dyn SearchBackend>,
        saved_searches: Arc<dyn SavedSearchSource>,
    ) -> Self {
        let search = Search::new(backend)
            .with_builder(settings.search.request_builder())
            .with_defaults(settings.search.default_filters.clone());

        Self {
            settings: Arc::new(settings),
            search: Arc::new(search),
            saved_searches,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
