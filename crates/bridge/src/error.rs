//! Error types for the mediation layer.
//!
//! Errors are split by concern and aggregated by [`BridgeError`]:
//!
//! - [`BackendError`] - a backend call failed (surfaced per call for reads,
//!   per backend through events for writes)
//! - [`JoinError`] - a join referenced a filter its target index lacks
//! - [`ConfigError`] - a facade or catalog is misconfigured
//! - [`DispatchError`] - a write fan-out task could not be joined
//! - [`SchemaError`] - schema synchronization or replication failed
//!
//! Configuration misses inside a request (unknown filter key, unknown join,
//! unknown join template) are not errors at all: the affected item is
//! omitted from the compiled request.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type returned by facade operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Backend call errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Join compilation errors
    #[error(transparent)]
    Join(#[from] JoinError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fan-out orchestration errors
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Schema synchronization errors
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors reported by a backend client.
///
/// Cloneable so that write failures can travel inside broadcast events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// The request reached the backend but failed.
    #[error("backend request failed: {backend_name}: {message}")]
    Request {
        backend_name: String,
        message: String,
    },

    /// The backend refused the payload.
    #[error("backend rejected request: {backend_name}: {message}")]
    Rejected {
        backend_name: String,
        message: String,
    },
}

impl BackendError {
    /// Returns the id of the backend that produced the error.
    pub fn backend_name(&self) -> &str {
        match self {
            BackendError::Unavailable { backend_name, .. }
            | BackendError::Request { backend_name, .. }
            | BackendError::Rejected { backend_name, .. } => backend_name,
        }
    }
}

/// Errors raised while compiling joins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    /// A join request named a filter the target index does not register.
    #[error("join on index '{index}' references unknown filter '{filter}'")]
    UnknownFilter { index: String, filter: String },
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An index was configured without a name.
    #[error("index name cannot be empty")]
    EmptyIndexName,

    /// A write was requested on an index without write backends.
    #[error("index '{0}' has no write backend configured")]
    NoWriters(String),

    /// A read was requested on an index without a read backend.
    #[error("index '{0}' has no read backend configured")]
    NoSearcher(String),

    /// Two definitions in a catalog share a name.
    #[error("duplicate index definition: {0}")]
    DuplicateIndex(String),

    /// A join definition targets an index missing from the catalog.
    #[error("join '{join}' on index '{index}' targets unknown index '{target}'")]
    UnknownJoinTarget {
        index: String,
        join: String,
        target: String,
    },

    /// A catalog lookup named an index that is not defined.
    #[error("unknown index: {0}")]
    UnknownIndex(String),

    /// A definition document could not be parsed.
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),
}

/// A fan-out task ended without reporting a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("dispatch to {failed} backend(s) of index '{index}' did not complete: {message}")]
pub struct DispatchError {
    pub index: String,
    pub failed: usize,
    pub message: String,
}

/// Errors raised by schema synchronization and replication.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A schema administration call failed.
    #[error("schema operation '{operation}' failed on index '{index}': {source}")]
    Backend {
        operation: &'static str,
        index: String,
        #[source]
        source: BackendError,
    },

    /// Replication needs at least one indexer.
    #[error("replication requires at least one indexer")]
    NoIndexer,

    /// A per-client sync task ended without reporting a result.
    #[error("schema sync task did not complete: {0}")]
    Task(String),
}

/// Result type for facade operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Result type for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;
