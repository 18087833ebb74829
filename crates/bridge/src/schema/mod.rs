//! Index schema management.
//!
//! Declared schemas are pushed to backend clients through the
//! [`SchemaAdmin`] capability; replication between indexers and the
//! searcher goes through [`ReplicationAdmin`].
//!
//! # Operations
//!
//! | Function | Effect |
//! |----------|--------|
//! | [`drop_indexes`] | destroys indexes on every client, one call at a time |
//! | [`sync_schemas`] | creates missing indexes, reconciles templates and fields |
//! | [`replicate_all_indexes`] | mirrors every schema index from the indexers to the searcher |
//!
//! All three stop at the first failing backend call.

mod replication;
mod sync;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BackendResult;
use crate::template::Template;

pub use replication::replicate_all_indexes;
pub use sync::{drop_indexes, expected_fields, schema_differs, sync_schemas};

/// Declared schema of one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSchema {
    /// Index name.
    pub name: String,
    /// Unique key field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_field: Option<String>,
    /// Default search field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_field: Option<String>,
    /// Fields, in backend order.
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
    /// Templates stored on the backend.
    #[serde(default)]
    pub templates: Vec<TemplateSchema>,
}

impl IndexSchema {
    /// Creates an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the unique and default fields.
    pub fn unique_default(mut self, unique: impl Into<String>, default: impl Into<String>) -> Self {
        self.unique_field = Some(unique.into());
        self.default_field = Some(default.into());
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a template.
    pub fn template(mut self, name: impl Into<String>, body: Template) -> Self {
        self.templates.push(TemplateSchema {
            name: name.into(),
            body,
        });
        self
    }
}

/// Declared field of an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    /// Field name.
    pub name: String,
    /// Whether the field is indexed.
    #[serde(default)]
    pub indexed: bool,
    /// Whether the field is stored.
    #[serde(default)]
    pub stored: bool,
    /// Whether term vectors are kept.
    #[serde(default)]
    pub term_vector: bool,
    /// Fields copied into this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_of: Option<Vec<String>>,
    /// Analyzer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

impl FieldSchema {
    /// Creates a field with every flag off.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks the field indexed.
    pub fn indexed(mut self) -> Self {
        self.indexed = true;
        self
    }

    /// Marks the field stored.
    pub fn stored(mut self) -> Self {
        self.stored = true;
        self
    }

    /// Keeps term vectors.
    pub fn term_vector(mut self) -> Self {
        self.term_vector = true;
        self
    }

    /// Sets the analyzer.
    pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Sets the source fields.
    pub fn copy_of(mut self, fields: Vec<String>) -> Self {
        self.copy_of = Some(fields);
        self
    }
}

/// Declared template of an index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateSchema {
    /// Template name.
    pub name: String,
    /// Template body.
    #[serde(flatten)]
    pub body: Template,
}

/// Field layout of an index as the backend reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldsDescription {
    /// Unique key field.
    #[serde(default)]
    pub unique: Option<String>,
    /// Default search field.
    #[serde(default)]
    pub default: Option<String>,
    /// Fields, in backend order.
    #[serde(default)]
    pub fields: Vec<RemoteField>,
}

/// A field as the backend reports it; flags are `YES` or `NO`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteField {
    /// Field name.
    pub name: String,
    /// `YES` when indexed.
    pub indexed: String,
    /// `YES` when stored.
    pub stored: String,
    /// `YES` when term vectors are kept.
    pub term_vector: String,
    /// Fields copied into this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_of: Option<Vec<String>>,
    /// Analyzer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
}

/// Connection options of the replication target, forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplicaTarget(Map<String, Value>);

impl ReplicaTarget {
    /// Creates an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Returns every option.
    pub fn options(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Index, field and template administration of one backend.
#[async_trait]
pub trait SchemaAdmin: Send + Sync {
    /// Identifies the backend in logs.
    fn backend_id(&self) -> &str;

    /// Whether `index` exists.
    async fn index_exists(&self, index: &str) -> BackendResult<bool>;

    /// Creates `index`.
    async fn create_index(&self, index: &str) -> BackendResult<()>;

    /// Destroys `index`.
    async fn destroy_index(&self, index: &str) -> BackendResult<()>;

    /// Describes the fields of `index`.
    async fn describe_fields(&self, index: &str) -> BackendResult<FieldsDescription>;

    /// Creates or updates a field.
    async fn create_or_update_field(&self, index: &str, field: &FieldSchema) -> BackendResult<()>;

    /// Sets the unique and default fields.
    async fn set_unique_default(&self, index: &str, unique: &str, default: &str)
    -> BackendResult<()>;

    /// Destroys a field.
    async fn destroy_field(&self, index: &str, field: &str) -> BackendResult<()>;

    /// Lists template names.
    async fn list_templates(&self, index: &str) -> BackendResult<Vec<String>>;

    /// Creates or updates a template.
    async fn create_or_update_template(
        &self,
        index: &str,
        name: &str,
        body: &Template,
    ) -> BackendResult<()>;

    /// Destroys a template.
    async fn destroy_template(&self, index: &str, name: &str) -> BackendResult<()>;
}

/// Replication administration of one indexer.
#[async_trait]
pub trait ReplicationAdmin: Send + Sync {
    /// Identifies the backend in logs.
    fn backend_id(&self) -> &str;

    /// Declares a replication of `index` towards `target`.
    async fn create_replication_index(&self, index: &str, target: &ReplicaTarget)
    -> BackendResult<()>;

    /// Runs the replication of `index` towards `target`.
    async fn replicate(&self, index: &str, target: &ReplicaTarget) -> BackendResult<()>;
}

/// A shared schema administration client.
pub type DynSchemaAdmin = Arc<dyn SchemaAdmin>;

/// A shared replication administration client.
pub type DynReplicationAdmin = Arc<dyn ReplicationAdmin>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_from_json() {
        let schema: IndexSchema = serde_json::from_value(json!({
            "name": "articles",
            "uniqueField": "id",
            "defaultField": "title",
            "fields": [
                { "name": "id", "indexed": true, "stored": true },
                { "name": "title", "indexed": true, "analyzer": "TextAnalyzer" }
            ],
            "templates": [
                { "name": "default", "returnedFields": ["id"], "rows": 10 }
            ]
        }))
        .unwrap();

        assert_eq!(schema.unique_field.as_deref(), Some("id"));
        assert_eq!(schema.fields[1].analyzer.as_deref(), Some("TextAnalyzer"));
        assert!(!schema.fields[1].stored);
        assert_eq!(schema.templates[0].name, "default");
        assert_eq!(schema.templates[0].body.params().get("rows"), Some(&json!(10)));
        assert!(!schema.templates[0].body.params().contains_key("name"));
    }

    #[test]
    fn test_remote_field_wire_shape() {
        let field: RemoteField = serde_json::from_value(json!({
            "name": "id",
            "indexed": "YES",
            "stored": "NO",
            "termVector": "NO"
        }))
        .unwrap();
        assert_eq!(field.indexed, "YES");
        assert!(field.copy_of.is_none());
    }
}
