//! HTTP client for the search backend

use crate::config::BackendSettings;
use crate::error::{NetworkFailure, Result, SearchError};
use crate::search::{CsvStream, RequestBody, SavedSearchRecord, SavedSearchSource, SearchBackend};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client wrapper configured for the search backend
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    search_url: String,
    saved_searches_url: String,
    api_key: Option<(String, String)>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> anyhow::Result<Self> {
        Self::with_settings(&BackendSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &BackendSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            search_url: settings.search_url.clone(),
            saved_searches_url: settings.saved_searches_url.trim_end_matches('/').to_string(),
            api_key: settings
                .api_key
                .clone()
                .map(|key| (settings.api_key_header.clone(), key)),
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some((header, key)) => builder.header(header.as_str(), key.as_str()),
            None => builder,
        }
    }

    async fn post_body(&self, body: &RequestBody, accept: &str) -> Result<Response> {
        let request = self
            .authorized(self.client.post(&self.search_url))
            .header("Accept", accept)
            .json(body);
        let response = request.send().await?;
        Self::check_status(response).await
    }

    /// Turn a non-2xx response into a network error
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        warn!("Search backend responded {}: {}", status, text);
        Err(SearchError::network(
            NetworkFailure::Status(status.as_u16()),
            if text.is_empty() {
                status.to_string()
            } else {
                text
            },
        ))
    }
}

#[async_trait]
impl SearchBackend for HttpClient {
    async fn search(&self, body: &RequestBody) -> Result<serde_json::Value> {
        let response = self.post_body(body, "application/json").await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| SearchError::InvalidResponse {
            message: e.to_string(),
        })
    }

    async fn export(&self, body: &RequestBody) -> Result<CsvStream> {
        let response = self.post_body(body, "text/csv").await?;
        if response.content_length() == Some(0) {
            return Err(SearchError::ExportStream {
                message: "export response has no body".to_string(),
            });
        }

        let mut stream = response.bytes_stream().map(|chunk| chunk.map_err(SearchError::from));

        // Look at the first chunk so an empty body fails before the download starts
        let first = match stream.next().await {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => return Err(e),
            None => {
                return Err(SearchError::ExportStream {
                    message: "export response has no body".to_string(),
                })
            }
        };
        debug!("Export stream opened, first chunk {} bytes", first.len());

        Ok(futures::stream::once(async move { Ok(first) })
            .chain(stream)
            .boxed())
    }
}

#[async_trait]
impl SavedSearchSource for HttpClient {
    async fn fetch_saved_search(&self, id: &str) -> Result<SavedSearchRecord> {
        let url = format!("{}/{}", self.saved_searches_url, urlencoding::encode(id));
        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| SearchError::InvalidSavedSearch {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{build_request_body, BuildOptions, SearchQueryState};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, api_key: Option<&str>) -> HttpClient {
        HttpClient::with_settings(&BackendSettings {
            search_url: format!("{}/v1/opportunities/search", server.uri()),
            saved_searches_url: format!("{}/v1/saved-searches/", server.uri()),
            api_key: api_key.map(str::to_string),
            request_timeout: 2.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_search_posts_body_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/opportunities/search"))
            .and(header("X-Auth", "key-123"))
            .and(body_partial_json(json!({ "pagination": { "page_size": 25 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("key-123"));
        let body = build_request_body(&SearchQueryState::default(), BuildOptions::default());
        let raw = client.search(&body).await.unwrap();
        assert_eq!(raw, json!({ "data": [] }));
    }

    #[tokio::test]
    async fn test_non_success_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let body = build_request_body(&SearchQueryState::default(), BuildOptions::default());
        let err = client.search(&body).await.unwrap_err();
        match err {
            SearchError::Network { reason, message } => {
                assert_eq!(reason, NetworkFailure::Status(503));
                assert_eq!(message, "down");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [] }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let body = build_request_body(&SearchQueryState::default(), BuildOptions::default());
        let err = client.search(&body).await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::Network {
                reason: NetworkFailure::Timeout,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_export_streams_csv() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "format": "csv",
                "pagination": { "page_offset": 1, "page_size": 5000 }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Type", "text/csv")
                    .set_body_string("opportunity_id,title\n1,Arts\n"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let state = SearchQueryState::default().with_page(4);
        let body = build_request_body(&state, BuildOptions::csv());
        let stream = client.export(&body).await.unwrap();
        let chunks: Vec<_> = stream.map(|c| c.unwrap()).collect().await;
        assert_eq!(chunks.concat(), b"opportunity_id,title\n1,Arts\n".to_vec());
    }

    #[tokio::test]
    async fn test_empty_export_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let body = build_request_body(&SearchQueryState::default(), BuildOptions::csv());
        let err = client.export(&body).await.err().unwrap();
        assert_eq!(err.code(), "export_stream");
    }

    #[tokio::test]
    async fn test_fetch_saved_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/saved-searches/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "health grants",
                "query_parameters": "query=health&status=posted"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let record = client.fetch_saved_search("42").await.unwrap();
        assert_eq!(record.name, "health grants");
        assert_eq!(record.query_parameters, "query=health&status=posted");
    }
}
