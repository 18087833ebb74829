//! Wire and application types shared by the codec, the facade and the
//! backend capability traits.
//!
//! Application documents are plain JSON objects. Backend documents are
//! field lists: one [`FieldEntry`] per value, tagged with a language.
//! Search results come back field oriented as [`ResultDocument`]s.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filters::Filter;
use crate::joins::JoinDescriptor;

/// An application-level document: field name to scalar or array value.
///
/// Key order is insertion order.
pub type Document = Map<String, Value>;

/// The default language tag applied to documents and requests.
pub const DEFAULT_LANG: &str = "ENGLISH";

/// The field used to select documents for deletion when none is given.
pub const DEFAULT_DELETE_FIELD: &str = "id";

/// A single (field name, scalar value) pair of a backend document.
///
/// Several entries of one document may share a name (multi-valued field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Field name.
    pub name: String,
    /// Field value.
    pub value: Value,
}

impl FieldEntry {
    /// Creates a new field entry.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A document in the backend's write format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDocument {
    /// Language tag.
    pub lang: String,
    /// Ordered field entries.
    pub fields: Vec<FieldEntry>,
}

/// One field of a search result document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultField {
    /// Field name.
    pub field_name: String,
    /// All values stored for the field.
    #[serde(default)]
    pub values: Vec<Value>,
}

/// A document as returned by the searcher.
///
/// Everything outside the field list (rank position, score, collapse
/// count, ...) is kept in `metadata`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    /// Field list.
    #[serde(default)]
    pub fields: Vec<ResultField>,
    /// Document-level data outside the field list.
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// The raw response of a search or more-like-this call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matching documents, absent when the backend returned none.
    #[serde(default)]
    pub documents: Option<Vec<ResultDocument>>,
    /// Any other top-level data (counts, facets, timings).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decoded search results handed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Decoded and formatted documents.
    pub documents: Vec<Document>,
    /// Backend-supplied top-level fields, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResults {
    /// Returns an empty result set.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Selects documents to delete: every document whose `field` holds one of
/// `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSelector {
    /// Key field.
    pub field: String,
    /// Key values.
    pub values: Vec<Value>,
}

/// A request ready to be sent to the searcher.
///
/// `params` holds the merged caller, template and default parameters
/// (`query` or `likeText`, `lang`, template options). The compiled filter
/// and join lists are kept typed and serialized beside them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    /// Merged request parameters.
    #[serde(flatten)]
    pub params: Map<String, Value>,
    /// Compiled filters, in caller order.
    pub filters: Vec<Filter>,
    /// Compiled joins; absent for more-like-this requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joins: Option<Vec<JoinDescriptor>>,
}

impl SearchRequest {
    /// Returns the free-text query, if any.
    pub fn query(&self) -> Option<&str> {
        self.params.get("query").and_then(Value::as_str)
    }

    /// Returns the language tag, if any.
    pub fn lang(&self) -> Option<&str> {
        self.params.get("lang").and_then(Value::as_str)
    }

    /// Returns a request parameter.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Serializes the request to the JSON object sent to the backend.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Either a single item or a list of items.
///
/// Facade operations accept both shapes and normalize them to a list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A list of items.
    Many(Vec<T>),
    /// A single item.
    One(T),
}

impl<T> OneOrMany<T> {
    /// Normalizes to a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl From<Document> for OneOrMany<Document> {
    fn from(document: Document) -> Self {
        OneOrMany::One(document)
    }
}

impl From<Vec<Document>> for OneOrMany<Document> {
    fn from(documents: Vec<Document>) -> Self {
        OneOrMany::Many(documents)
    }
}

impl From<Value> for OneOrMany<Value> {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(values) => OneOrMany::Many(values),
            other => OneOrMany::One(other),
        }
    }
}

impl From<Vec<Value>> for OneOrMany<Value> {
    fn from(values: Vec<Value>) -> Self {
        OneOrMany::Many(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_document_keeps_metadata() {
        let doc: ResultDocument = serde_json::from_value(json!({
            "pos": 0,
            "score": 0.2,
            "collapseCount": 0,
            "fields": [{ "fieldName": "foo", "values": ["bar"] }]
        }))
        .unwrap();

        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.fields[0].field_name, "foo");
        assert_eq!(doc.metadata.get("score"), Some(&json!(0.2)));
        assert!(!doc.metadata.contains_key("fields"));
    }

    #[test]
    fn test_result_field_without_values() {
        let field: ResultField = serde_json::from_value(json!({ "fieldName": "foo" })).unwrap();
        assert!(field.values.is_empty());
    }

    #[test]
    fn test_search_response_without_documents() {
        let response: SearchResponse = serde_json::from_value(json!({ "numFound": 0 })).unwrap();
        assert!(response.documents.is_none());
        assert_eq!(response.extra.get("numFound"), Some(&json!(0)));
    }

    #[test]
    fn test_one_or_many_from_value() {
        assert_eq!(
            OneOrMany::from(json!([34928, 81238])).into_vec(),
            vec![json!(34928), json!(81238)]
        );
        assert_eq!(OneOrMany::from(json!(7)).into_vec(), vec![json!(7)]);
    }

    #[test]
    fn test_one_or_many_deserialize() {
        let one: OneOrMany<Document> = serde_json::from_value(json!({ "foo": "bar" })).unwrap();
        assert_eq!(one.into_vec().len(), 1);

        let many: OneOrMany<Document> =
            serde_json::from_value(json!([{ "foo": "bar" }, { "bar": "baz" }])).unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }
}
