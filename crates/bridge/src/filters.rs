//! Filter mapping.
//!
//! A filter builder turns a caller-supplied value into zero, one or many
//! backend filters. [`map_filters`] runs a caller's filter map through an
//! index's registry:
//!
//! - entries are visited in insertion order, which becomes output order
//! - keys without a registered builder are skipped
//! - a builder returning [`FilterOutput::Skip`] contributes nothing
//! - a builder returning several filters contributes a contiguous run
//!
//! Only [`Filter::Query`] filters take part in join composition; anything
//! else is passed to the backend untouched as [`Filter::Opaque`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

/// Type tag of filters that contribute a text query.
pub const QUERY_FILTER_TYPE: &str = "QueryFilter";

/// A text-query filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    /// Whether matching documents are excluded instead of kept.
    pub negative: bool,
    /// The backend query expression.
    pub query: String,
}

impl QueryFilter {
    /// Creates a positive filter.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            negative: false,
            query: query.into(),
        }
    }

    /// Creates a negative filter.
    pub fn negated(query: impl Into<String>) -> Self {
        Self {
            negative: true,
            query: query.into(),
        }
    }

    /// Renders the filter as a query-string clause: `(q)` or `-(q)`.
    pub fn to_clause(&self) -> String {
        if self.negative {
            format!("-({})", self.query)
        } else {
            format!("({})", self.query)
        }
    }
}

/// A backend filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// A text-query filter.
    Query(QueryFilter),
    /// Any other filter, passed through as-is.
    Opaque(Value),
}

impl Filter {
    /// Returns the query filter, if this is one.
    pub fn as_query(&self) -> Option<&QueryFilter> {
        match self {
            Filter::Query(filter) => Some(filter),
            Filter::Opaque(_) => None,
        }
    }

    /// Interprets a JSON object as a filter.
    ///
    /// Objects tagged `QueryFilter` with a string `query` become
    /// [`Filter::Query`]; everything else is opaque.
    pub fn from_value(value: Value) -> Self {
        let parsed = match &value {
            Value::Object(map)
                if map.get("type").and_then(Value::as_str) == Some(QUERY_FILTER_TYPE) =>
            {
                map.get("query").and_then(Value::as_str).map(|query| QueryFilter {
                    negative: map.get("negative").and_then(Value::as_bool).unwrap_or(false),
                    query: query.to_string(),
                })
            }
            _ => None,
        };
        match parsed {
            Some(filter) => Filter::Query(filter),
            None => Filter::Opaque(value),
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Filter::Query(filter) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", QUERY_FILTER_TYPE)?;
                map.serialize_entry("negative", &filter.negative)?;
                map.serialize_entry("query", &filter.query)?;
                map.end()
            }
            Filter::Opaque(value) => value.serialize(serializer),
        }
    }
}

impl From<QueryFilter> for Filter {
    fn from(filter: QueryFilter) -> Self {
        Filter::Query(filter)
    }
}

/// What a filter builder produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutput {
    /// No filter for this value.
    Skip,
    /// A single filter.
    One(Filter),
    /// Several filters, kept in order.
    Many(Vec<Filter>),
}

impl FilterOutput {
    /// Normalizes to a list of filters.
    pub fn into_filters(self) -> Vec<Filter> {
        match self {
            FilterOutput::Skip => Vec::new(),
            FilterOutput::One(filter) => vec![filter],
            FilterOutput::Many(filters) => filters,
        }
    }
}

impl From<Filter> for FilterOutput {
    fn from(filter: Filter) -> Self {
        FilterOutput::One(filter)
    }
}

impl From<QueryFilter> for FilterOutput {
    fn from(filter: QueryFilter) -> Self {
        FilterOutput::One(Filter::Query(filter))
    }
}

impl From<Vec<Filter>> for FilterOutput {
    fn from(filters: Vec<Filter>) -> Self {
        FilterOutput::Many(filters)
    }
}

impl From<Vec<QueryFilter>> for FilterOutput {
    fn from(filters: Vec<QueryFilter>) -> Self {
        FilterOutput::Many(filters.into_iter().map(Filter::Query).collect())
    }
}

impl<T: Into<FilterOutput>> From<Option<T>> for FilterOutput {
    fn from(output: Option<T>) -> Self {
        output.map_or(FilterOutput::Skip, Into::into)
    }
}

impl From<Value> for FilterOutput {
    /// `null`, `false`, `0` and `""` skip; arrays become a run of filters;
    /// anything else a single filter.
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => FilterOutput::Many(
                items
                    .into_iter()
                    .filter(|item| !is_falsy(item))
                    .map(Filter::from_value)
                    .collect(),
            ),
            value if is_falsy(&value) => FilterOutput::Skip,
            value => FilterOutput::One(Filter::from_value(value)),
        }
    }
}

/// Builds filters from a caller-supplied value.
///
/// `context` is the caller's filter options, shared by every builder of one
/// request.
pub trait FilterBuilder: Send + Sync {
    /// Builds the filters for `value`.
    fn build(&self, value: &Value, context: &Value) -> FilterOutput;
}

impl<F> FilterBuilder for F
where
    F: Fn(&Value, &Value) -> FilterOutput + Send + Sync,
{
    fn build(&self, value: &Value, context: &Value) -> FilterOutput {
        self(value, context)
    }
}

/// Filter builders of one index, by name.
pub type FilterRegistry = HashMap<String, Arc<dyn FilterBuilder>>;

/// Wraps a closure as a shareable filter builder.
pub fn filter_fn<F>(f: F) -> Arc<dyn FilterBuilder>
where
    F: Fn(&Value, &Value) -> FilterOutput + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A declarative query filter: `{value}` in `query` is replaced by the
/// caller's value.
///
/// `null`, `false` and `""` suppress the filter. An array value produces
/// one filter per element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilterTemplate {
    /// Query pattern containing a `{value}` placeholder.
    pub query: String,
    /// Whether the produced filters are negative.
    #[serde(default)]
    pub negative: bool,
}

impl QueryFilterTemplate {
    /// Creates a positive template.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            negative: false,
        }
    }

    /// Makes the template produce negative filters.
    pub fn negative(mut self) -> Self {
        self.negative = true;
        self
    }

    fn render(&self, value: &Value) -> Filter {
        Filter::Query(QueryFilter {
            negative: self.negative,
            query: self.query.replace("{value}", &render_value(value)),
        })
    }
}

impl FilterBuilder for QueryFilterTemplate {
    fn build(&self, value: &Value, _context: &Value) -> FilterOutput {
        match value {
            Value::Array(items) => FilterOutput::Many(
                items
                    .iter()
                    .filter(|item| !is_suppressed(item))
                    .map(|item| self.render(item))
                    .collect(),
            ),
            value if is_suppressed(value) => FilterOutput::Skip,
            value => FilterOutput::One(self.render(value)),
        }
    }
}

/// Renders a JSON scalar for use inside a query string.
///
/// Strings are used without quotes; everything else uses its JSON form.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_suppressed(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(0.0),
        other => is_suppressed(other),
    }
}

/// Deserializes a filter spec; `null` is an empty spec.
pub fn deserialize_filter_spec<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Maps a caller's filter spec to backend filters.
///
/// Unknown keys and suppressed values are dropped without error.
pub fn map_filters(
    registry: &FilterRegistry,
    spec: &Map<String, Value>,
    context: &Value,
) -> Vec<Filter> {
    let mut filters = Vec::new();
    for (key, value) in spec {
        let Some(builder) = registry.get(key) else {
            debug!(filter = %key, "Ignoring unknown filter");
            continue;
        };
        filters.extend(builder.build(value, context).into_filters());
    }
    filters
}
