//! Test infrastructure for the mediation layer.
//!
//! Recording mock backends: every call is captured so tests can assert on
//! exactly what reached the backend.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use searchbridge::schema::{
    FieldSchema, FieldsDescription, ReplicaTarget, ReplicationAdmin, SchemaAdmin,
};
use searchbridge::{
    BackendDocument, BackendError, BackendResult, DeleteSelector, Document, DocumentWriter,
    SearchRequest, SearchResponse, Searcher, Template,
};

/// Builds a document from a JSON object literal.
pub fn doc(value: Value) -> Document {
    searchbridge::codec::document_from_value(value)
}

/// Builds a request-level error of `backend`.
pub fn request_error(backend: &str, message: &str) -> BackendError {
    BackendError::Request {
        backend_name: backend.to_string(),
        message: message.to_string(),
    }
}

// ============================================================================
// Writers
// ============================================================================

/// A writer recording every call; fails every call when `failure` is set.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    id: String,
    failure: Option<String>,
    pub creates: Mutex<Vec<(String, Vec<BackendDocument>)>>,
    pub destroys: Mutex<Vec<(String, DeleteSelector)>>,
}

impl RecordingWriter {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            ..Self::default()
        })
    }

    pub fn failing(id: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            failure: Some(message.to_string()),
            ..Self::default()
        })
    }

    pub fn created(&self) -> Vec<(String, Vec<BackendDocument>)> {
        self.creates.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<(String, DeleteSelector)> {
        self.destroys.lock().unwrap().clone()
    }

    fn outcome(&self) -> BackendResult<()> {
        match &self.failure {
            Some(message) => Err(request_error(&self.id, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentWriter for RecordingWriter {
    fn backend_id(&self) -> &str {
        &self.id
    }

    async fn create_documents(
        &self,
        index: &str,
        documents: &[BackendDocument],
    ) -> BackendResult<()> {
        self.creates
            .lock()
            .unwrap()
            .push((index.to_string(), documents.to_vec()));
        self.outcome()
    }

    async fn destroy_documents(&self, index: &str, selector: &DeleteSelector) -> BackendResult<()> {
        self.destroys
            .lock()
            .unwrap()
            .push((index.to_string(), selector.clone()));
        self.outcome()
    }
}

// ============================================================================
// Searcher
// ============================================================================

/// Which searcher operation was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchCall {
    Search,
    MoreLikeThis,
}

/// A searcher answering every call with a fixed outcome.
#[derive(Debug)]
pub struct RecordingSearcher {
    outcome: BackendResult<Option<SearchResponse>>,
    pub requests: Mutex<Vec<(SearchCall, String, Value)>>,
}

impl RecordingSearcher {
    pub fn returning(response: Option<SearchResponse>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(response),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Answers with the response parsed from `value`.
    pub fn returning_json(value: Value) -> Arc<Self> {
        Self::returning(Some(serde_json::from_value(value).unwrap()))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(request_error("searcher", message)),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// The single request received so far, as sent on the wire.
    pub fn last_request(&self) -> Value {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|(_, _, request)| request.clone())
            .unwrap_or(Value::Null)
    }

    pub fn calls(&self) -> Vec<(SearchCall, String)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(call, index, _)| (*call, index.clone()))
            .collect()
    }

    fn record(
        &self,
        call: SearchCall,
        index: &str,
        request: &SearchRequest,
    ) -> BackendResult<Option<SearchResponse>> {
        self.requests
            .lock()
            .unwrap()
            .push((call, index.to_string(), request.to_value()));
        self.outcome.clone()
    }
}

#[async_trait]
impl Searcher for RecordingSearcher {
    fn backend_id(&self) -> &str {
        "searcher"
    }

    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> BackendResult<Option<SearchResponse>> {
        self.record(SearchCall::Search, index, request)
    }

    async fn more_like_this(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> BackendResult<Option<SearchResponse>> {
        self.record(SearchCall::MoreLikeThis, index, request)
    }
}

/// The result body used by most search tests.
pub fn sample_response() -> Value {
    json!({
        "numFound": 2,
        "documents": [
            {
                "pos": 0,
                "score": 0.2,
                "collapseCount": 0,
                "fields": [
                    { "fieldName": "foo", "values": ["bar"] },
                    { "fieldName": "tags", "values": ["a", "b"] }
                ]
            },
            {
                "pos": 1,
                "score": 0.1,
                "collapseCount": 0,
                "fields": [
                    { "fieldName": "foo", "values": [] }
                ]
            }
        ]
    })
}

// ============================================================================
// Schema administration
// ============================================================================

/// An in-memory schema administration client.
#[derive(Debug)]
pub struct MockSchemaAdmin {
    id: String,
    indexes: Mutex<HashSet<String>>,
    description: Mutex<FieldsDescription>,
    templates: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl MockSchemaAdmin {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            indexes: Mutex::new(HashSet::new()),
            description: Mutex::new(FieldsDescription::default()),
            templates: Mutex::new(Vec::new()),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_index(self, name: &str) -> Self {
        self.indexes.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn with_description(self, description: FieldsDescription) -> Self {
        *self.description.lock().unwrap() = description;
        self
    }

    pub fn with_templates(self, names: &[&str]) -> Self {
        *self.templates.lock().unwrap() = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn call(&self, operation: &'static str, detail: String) -> BackendResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation} {detail}"));
        if self.fail_on == Some(operation) {
            return Err(request_error(&self.id, operation));
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaAdmin for MockSchemaAdmin {
    fn backend_id(&self) -> &str {
        &self.id
    }

    async fn index_exists(&self, index: &str) -> BackendResult<bool> {
        self.call("index_exists", index.to_string())?;
        Ok(self.indexes.lock().unwrap().contains(index))
    }

    async fn create_index(&self, index: &str) -> BackendResult<()> {
        self.call("create_index", index.to_string())?;
        self.indexes.lock().unwrap().insert(index.to_string());
        Ok(())
    }

    async fn destroy_index(&self, index: &str) -> BackendResult<()> {
        self.call("destroy_index", index.to_string())?;
        self.indexes.lock().unwrap().remove(index);
        Ok(())
    }

    async fn describe_fields(&self, index: &str) -> BackendResult<FieldsDescription> {
        self.call("describe_fields", index.to_string())?;
        Ok(self.description.lock().unwrap().clone())
    }

    async fn create_or_update_field(&self, index: &str, field: &FieldSchema) -> BackendResult<()> {
        self.call("create_or_update_field", format!("{index} {}", field.name))
    }

    async fn set_unique_default(
        &self,
        index: &str,
        unique: &str,
        default: &str,
    ) -> BackendResult<()> {
        self.call("set_unique_default", format!("{index} {unique} {default}"))
    }

    async fn destroy_field(&self, index: &str, field: &str) -> BackendResult<()> {
        self.call("destroy_field", format!("{index} {field}"))
    }

    async fn list_templates(&self, index: &str) -> BackendResult<Vec<String>> {
        self.call("list_templates", index.to_string())?;
        Ok(self.templates.lock().unwrap().clone())
    }

    async fn create_or_update_template(
        &self,
        index: &str,
        name: &str,
        _body: &Template,
    ) -> BackendResult<()> {
        self.call("create_or_update_template", format!("{index} {name}"))
    }

    async fn destroy_template(&self, index: &str, name: &str) -> BackendResult<()> {
        self.call("destroy_template", format!("{index} {name}"))
    }
}

/// An indexer recording replication calls.
#[derive(Debug)]
pub struct MockReplicationAdmin {
    id: String,
    fail_on: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
}

impl MockReplicationAdmin {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn call(&self, operation: &'static str, index: &str, target: &ReplicaTarget) -> BackendResult<()> {
        let host = target
            .options()
            .get("host")
            .and_then(Value::as_str)
            .unwrap_or("?");
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation} {index} {host}"));
        if self.fail_on == Some(operation) {
            return Err(request_error(&self.id, operation));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplicationAdmin for MockReplicationAdmin {
    fn backend_id(&self) -> &str {
        &self.id
    }

    async fn create_replication_index(
        &self,
        index: &str,
        target: &ReplicaTarget,
    ) -> BackendResult<()> {
        self.call("create_replication_index", index, target)
    }

    async fn replicate(&self, index: &str, target: &ReplicaTarget) -> BackendResult<()> {
        self.call("replicate", index, target)
    }
}
