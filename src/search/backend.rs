//! Collaborator traits at the network boundary

use super::request::RequestBody;
use super::saved::SavedSearchRecord;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

/// CSV bytes streamed straight from the backend
pub type CsvStream = BoxStream<'static, Result<Bytes>>;

/// The search backend, with whatever auth the caller attaches
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// POST a search and return the raw JSON body of a 2xx response
    async fn search(&self, body: &RequestBody) -> Result<serde_json::Value>;

    /// POST an export request (`format=csv`) and stream the body back
    async fn export(&self, body: &RequestBody) -> Result<CsvStream>;
}

/// Where saved search records are read from
#[async_trait]
pub trait SavedSearchSource: Send + Sync {
    async fn fetch_saved_search(&self, id: &str) -> Result<SavedSearchRecord>;
}
