//! Backend capability traits.
//!
//! The mediation layer talks to backend clients through two narrow
//! capabilities:
//!
//! - [`DocumentWriter`] - an indexer accepting document writes and deletes
//! - [`Searcher`] - the read backend answering searches
//!
//! Both are object safe and shared as `Arc<dyn ...>` so one client can
//! serve many indexes. Transport, authentication and retries belong to the
//! client implementation.
//!
//! # Example
//!
//! ```ignore
//! use searchbridge::backend::{DocumentWriter, Searcher};
//!
//! let facade = IndexFacade::builder("articles")
//!     .writer(indexer_a)
//!     .writer(indexer_b)
//!     .searcher(searcher)
//!     .build()?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BackendResult;
use crate::types::{BackendDocument, DeleteSelector, SearchRequest, SearchResponse};

/// A write backend.
#[async_trait]
pub trait DocumentWriter: Send + Sync {
    /// Identifies the backend in events and logs.
    fn backend_id(&self) -> &str;

    /// Writes documents to `index`.
    async fn create_documents(
        &self,
        index: &str,
        documents: &[BackendDocument],
    ) -> BackendResult<()>;

    /// Deletes every document of `index` matched by `selector`.
    async fn destroy_documents(&self, index: &str, selector: &DeleteSelector) -> BackendResult<()>;
}

/// The read backend.
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Identifies the backend in logs.
    fn backend_id(&self) -> &str;

    /// Runs a search; `Ok(None)` means the backend returned nothing.
    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> BackendResult<Option<SearchResponse>>;

    /// Runs a more-like-this search.
    async fn more_like_this(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> BackendResult<Option<SearchResponse>>;
}

/// A shared write backend.
pub type DynWriter = Arc<dyn DocumentWriter>;

/// A shared read backend.
pub type DynSearcher = Arc<dyn Searcher>;
