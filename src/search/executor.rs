//! Search execution against the backend
//!
//! The only async part of the engine. Every call takes an optional
//! cancellation token; once it fires, nothing past that point is evaluated
//! and the call resolves to an aborted network error.

use super::backend::{CsvStream, SavedSearchSource, SearchBackend};
use super::models::SearchQueryState;
use super::request::{BuildOptions, RequestBuilder};
use super::response::{normalize, SearchEnvelope};
use crate::error::{Result, SearchError, ValidationError};
use crate::query::{self, DefaultFilters, QueryParams};
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A resolved search together with its results
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub state: SearchQueryState,
    pub warnings: Vec<ValidationError>,
    pub envelope: SearchEnvelope,
}

impl SearchOutcome {
    /// Canonical query string for the search that produced these results
    pub fn canonical(&self) -> String {
        query::serialize(&self.state)
    }
}

/// Search executor that turns query state into backend calls
#[derive(Clone)]
pub struct Search {
    /// Backend that answers searches and exports
    backend: Arc<dyn SearchBackend>,
    builder: RequestBuilder,
    defaults: DefaultFilters,
}

impl Search {
    /// Create a new search executor with default page sizes and filters
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            builder: RequestBuilder::default(),
            defaults: DefaultFilters::default(),
        }
    }

    pub fn with_builder(mut self, builder: RequestBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_defaults(mut self, defaults: DefaultFilters) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &DefaultFilters {
        &self.defaults
    }

    /// Parse and resolve parameters with this executor's defaults
    pub fn resolve(&self, params: &QueryParams) -> (SearchQueryState, Vec<ValidationError>) {
        let (state, warnings) = query::resolve_params(params, &self.defaults);
        for warning in &warnings {
            warn!("Query parameter replaced by default: {}", warning);
        }
        (state, warnings)
    }

    /// Run a search for a resolved state
    pub async fn execute(
        &self,
        state: &SearchQueryState,
        cancel: Option<&CancellationToken>,
    ) -> Result<SearchEnvelope> {
        let body = self.builder.build(state, BuildOptions::default());
        debug!("Search request body: {:?}", body);

        let raw = cancellable(cancel, self.backend.search(&body)).await?;
        ensure_live(cancel)?;

        let envelope = normalize(raw, state)?;
        info!(
            "Search '{}' page {} returned {} of {} records",
            state.query,
            body.pagination.page_offset,
            envelope.data.len(),
            envelope.total_records()
        );
        Ok(envelope)
    }

    /// Parse parameters and run the search they describe
    pub async fn execute_params(
        &self,
        params: &QueryParams,
        cancel: Option<&CancellationToken>,
    ) -> Result<SearchOutcome> {
        let (state, warnings) = self.resolve(params);
        let envelope = self.execute(&state, cancel).await?;
        Ok(SearchOutcome {
            state,
            warnings,
            envelope,
        })
    }

    /// Stream the CSV export of a search
    ///
    /// The export ignores the state's page and always requests everything
    /// from the first page on.
    pub async fn export(
        &self,
        state: &SearchQueryState,
        cancel: Option<&CancellationToken>,
    ) -> Result<CsvStream> {
        let body = self.builder.build(state, BuildOptions::csv());
        info!("Exporting search '{}' as CSV", state.query);

        let stream = cancellable(cancel, self.backend.export(&body)).await?;
        ensure_live(cancel)?;

        Ok(match cancel {
            Some(token) => abort_on_cancel(stream, token.clone()),
            None => stream,
        })
    }

    /// Fetch a saved search and parse it exactly like a live URL
    pub async fn load_saved(
        &self,
        source: &dyn SavedSearchSource,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<(SearchQueryState, Vec<ValidationError>)> {
        let record = cancellable(cancel, source.fetch_saved_search(id)).await?;
        ensure_live(cancel)?;
        debug!("Loaded saved search '{}': {}", record.name, record.query_parameters);
        Ok(self.resolve(&record.to_query_params()))
    }

    /// Fetch a saved search and run it
    pub async fn execute_saved(
        &self,
        source: &dyn SavedSearchSource,
        id: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<SearchOutcome> {
        let (state, warnings) = self.load_saved(source, id, cancel).await?;
        let envelope = self.execute(&state, cancel).await?;
        Ok(SearchOutcome {
            state,
            warnings,
            envelope,
        })
    }
}

/// Race a backend call against the cancellation token
async fn cancellable<T>(
    cancel: Option<&CancellationToken>,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    let Some(token) = cancel else {
        return call.await;
    };
    ensure_live(Some(token))?;
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Backend call cancelled");
            Err(SearchError::aborted())
        }
        result = call => result,
    }
}

fn ensure_live(cancel: Option<&CancellationToken>) -> Result<()> {
    match cancel {
        Some(token) if token.is_cancelled() => Err(SearchError::aborted()),
        _ => Ok(()),
    }
}

/// End a CSV stream with an aborted error once the token fires
fn abort_on_cancel(stream: CsvStream, token: CancellationToken) -> CsvStream {
    futures::stream::unfold(Some((stream, token)), |state| async move {
        let (mut stream, token) = state?;
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            item = stream.next() => Some(item),
        };
        match next {
            None => Some((Err(SearchError::aborted()), None)),
            Some(item) => item.map(|item| (item, Some((stream, token)))),
        }
    })
    .boxed()
}
