//! Settings structures for Grantsearch-RS configuration

use crate::query::DefaultFilters;
use crate::search::request::{DEFAULT_PAGE_SIZE, EXPORT_PAGE_SIZE};
use crate::search::RequestBuilder;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure, read from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub search: SearchSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (GRANTSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("GRANTSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("GRANTSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("GRANTSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("GRANTSEARCH_BACKEND_URL") {
            let base = val.trim_end_matches('/');
            self.backend.search_url = format!("{}/v1/opportunities/search", base);
            self.backend.saved_searches_url = format!("{}/v1/saved-searches", base);
        }
        if let Ok(val) = std::env::var("GRANTSEARCH_API_KEY") {
            self.backend.api_key = Some(val);
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Instance name reported by the health endpoint
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "grantsearch".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8888,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Search backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Endpoint that accepts search request bodies
    pub search_url: String,
    /// Base URL saved search records are fetched from (`{url}/{id}`)
    pub saved_searches_url: String,
    /// API key attached to every backend request
    pub api_key: Option<String>,
    /// Header the API key is sent in
    pub api_key_header: String,
    /// Request timeout in seconds
    pub request_timeout: f64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            search_url: "http://localhost:8080/v1/opportunities/search".to_string(),
            saved_searches_url: "http://localhost:8080/v1/saved-searches".to_string(),
            api_key: None,
            api_key_header: "X-Auth".to_string(),
            request_timeout: 30.0,
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results per page for interactive search
    pub page_size: u32,
    /// Results requested for a CSV export
    pub export_page_size: u32,
    /// Filter values applied when a filter is absent from the query
    pub default_filters: DefaultFilters,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            export_page_size: EXPORT_PAGE_SIZE,
            default_filters: DefaultFilters::default(),
        }
    }
}

impl SearchSettings {
    pub fn request_builder(&self) -> RequestBuilder {
        RequestBuilder::new(self.page_size, self.export_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::vocabulary::FilterName;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8888);
        assert!(!settings.general.debug);
        assert_eq!(settings.search.page_size, 25);
        assert_eq!(settings.search.export_page_size, 5000);
        assert_eq!(settings.backend.api_key_header, "X-Auth");
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
server:
  port: 9000
backend:
  search_url: "https://api.example.gov/v1/opportunities/search"
  api_key: "secret"
search:
  page_size: 10
  default_filters:
    status: [posted]
    fundingInstrument: [grant]
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
        assert_eq!(settings.backend.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.search.page_size, 10);
        assert_eq!(settings.search.export_page_size, 5000);

        let defaults = &settings.search.default_filters;
        assert_eq!(
            defaults.get(FilterName::Status).map(|v| v.to_vec()),
            Some(vec!["posted".to_string()])
        );
        assert!(defaults.get(FilterName::FundingInstrument).is_some());
        assert_eq!(settings.search.request_builder().page_size(), 10);
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.search.default_filters, DefaultFilters::default());
    }
}
