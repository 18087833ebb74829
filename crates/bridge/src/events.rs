//! Per-backend write outcome events.
//!
//! Every write fan-out reports one event per backend: [`IndexEvent::Created`]
//! or [`IndexEvent::Destroyed`] on success, [`IndexEvent::Failed`] on
//! failure. Events are broadcast; obtain a receiver with
//! `IndexFacade::subscribe` before issuing writes. A write whose receivers
//! are gone or lagging still completes.

use std::sync::Arc;

use crate::error::BackendError;
use crate::types::{BackendDocument, DeleteSelector};

/// Minimum capacity of an index's event channel; facades with more
/// writers get one slot per writer.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// The payload a write sent to a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum WritePayload {
    /// Encoded documents of a create.
    Documents(Arc<Vec<BackendDocument>>),
    /// Selector of a destroy.
    Selector(Arc<DeleteSelector>),
}

/// Outcome of a write on one backend.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEvent {
    /// Documents were written.
    Created {
        backend: String,
        index: String,
        documents: Arc<Vec<BackendDocument>>,
    },
    /// Documents were deleted.
    Destroyed {
        backend: String,
        index: String,
        selector: Arc<DeleteSelector>,
    },
    /// The backend failed the write.
    Failed {
        error: BackendError,
        backend: String,
        index: String,
        payload: WritePayload,
    },
}

impl IndexEvent {
    /// Returns the id of the backend the event concerns.
    pub fn backend(&self) -> &str {
        match self {
            IndexEvent::Created { backend, .. }
            | IndexEvent::Destroyed { backend, .. }
            | IndexEvent::Failed { backend, .. } => backend,
        }
    }

    /// Returns the index name.
    pub fn index(&self) -> &str {
        match self {
            IndexEvent::Created { index, .. }
            | IndexEvent::Destroyed { index, .. }
            | IndexEvent::Failed { index, .. } => index,
        }
    }

    /// Whether the event reports a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, IndexEvent::Failed { .. })
    }
}
