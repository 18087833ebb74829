//! Cross-index join compilation.
//!
//! A join registration binds a local join name to a target index and the
//! static options of the join (fields, join type, what to return). A join
//! request names a registered join and supplies the free text, the target
//! template and the target filters for one search.
//!
//! Compiling a request produces a [`JoinDescriptor`] whose `queryString`
//! reads:
//!
//! ```text
//! (filter 1) AND -(negative filter 2) AND (title:(text)^2 OR body:(text)^1)
//! ```
//!
//! Filters come first in declaration order and the boosted search-field
//! expression always comes last. Unknown joins and unknown templates drop
//! the join; a filter missing from the target index fails the request.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::JoinError;
use crate::filters::{Filter, deserialize_filter_spec};
use crate::profile::JoinTarget;
use crate::template::{DEFAULT_TEMPLATE, SearchField};

/// Query used when a join request carries no free text.
pub const MATCH_ALL: &str = "*:*";

/// Wire keys owned by [`JoinDescriptor`]; extra options never override them.
pub const DESCRIPTOR_KEYS: [&str; 9] = [
    "queryString",
    "indexName",
    "queryTemplate",
    "localField",
    "foreignField",
    "type",
    "returnFields",
    "returnScores",
    "returnFacets",
];

/// Static configuration of a join, keyed by local join name.
#[derive(Clone)]
pub struct JoinRegistration {
    target: Arc<dyn JoinTarget>,
    /// Backend-side template applied to the join query.
    pub query_template: Option<String>,
    /// Field of the local index matched against `foreign_field`.
    pub local_field: Option<String>,
    /// Field of the target index.
    pub foreign_field: Option<String>,
    /// Join type, e.g. `INNER` or `OUTER`.
    pub join_type: Option<String>,
    /// Whether target fields are returned.
    pub return_fields: Option<bool>,
    /// Whether target scores are returned.
    pub return_scores: Option<bool>,
    /// Whether target facets are returned.
    pub return_facets: Option<bool>,
    /// Any other backend join option.
    pub extra: Map<String, Value>,
}

impl JoinRegistration {
    /// Creates a registration targeting `target`.
    pub fn new(target: Arc<dyn JoinTarget>) -> Self {
        Self {
            target,
            query_template: None,
            local_field: None,
            foreign_field: None,
            join_type: None,
            return_fields: None,
            return_scores: None,
            return_facets: None,
            extra: Map::new(),
        }
    }

    /// Returns the target index.
    pub fn target(&self) -> &Arc<dyn JoinTarget> {
        &self.target
    }

    /// Sets the backend query template.
    pub fn query_template(mut self, name: impl Into<String>) -> Self {
        self.query_template = Some(name.into());
        self
    }

    /// Sets the local and foreign key fields.
    pub fn on(mut self, local_field: impl Into<String>, foreign_field: impl Into<String>) -> Self {
        self.local_field = Some(local_field.into());
        self.foreign_field = Some(foreign_field.into());
        self
    }

    /// Sets the join type.
    pub fn join_type(mut self, join_type: impl Into<String>) -> Self {
        self.join_type = Some(join_type.into());
        self
    }

    /// Sets what the join returns from the target index.
    pub fn returning(mut self, fields: bool, scores: bool, facets: bool) -> Self {
        self.return_fields = Some(fields);
        self.return_scores = Some(scores);
        self.return_facets = Some(facets);
        self
    }

    /// Sets any other join option.
    ///
    /// Keys of the compiled descriptor (see [`DESCRIPTOR_KEYS`]) are
    /// ignored.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if DESCRIPTOR_KEYS.contains(&key.as_str()) {
            debug!(option = %key, "Ignoring join option shadowing a descriptor key");
        } else {
            self.extra.insert(key, value);
        }
        self
    }
}

impl std::fmt::Debug for JoinRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinRegistration")
            .field("target", &self.target.name())
            .field("query_template", &self.query_template)
            .field("local_field", &self.local_field)
            .field("foreign_field", &self.foreign_field)
            .field("join_type", &self.join_type)
            .finish_non_exhaustive()
    }
}

/// Join registrations of one index, by local join name.
pub type JoinRegistry = HashMap<String, JoinRegistration>;

/// Per-search parameters of one join.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Free text matched against the target's search fields.
    #[serde(default)]
    pub query: Option<String>,
    /// Template of the target index; defaults to `default`.
    #[serde(default)]
    pub template: Option<String>,
    /// Target filters, in application order.
    #[serde(default, deserialize_with = "deserialize_filter_spec")]
    pub filters: Map<String, Value>,
    /// Context handed to the target's filter builders.
    #[serde(default)]
    pub filter_options: Value,
}

impl JoinRequest {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free text.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the target template.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Adds a target filter.
    pub fn filter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.filters.insert(name.into(), value);
        self
    }

    /// Sets the filter context.
    pub fn filter_options(mut self, options: Value) -> Self {
        self.filter_options = options;
        self
    }
}

/// A compiled join, as sent to the searcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDescriptor {
    /// Composite query evaluated on the target index.
    pub query_string: String,
    /// Target index name.
    pub index_name: String,
    /// Backend-side template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_template: Option<String>,
    /// Local key field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_field: Option<String>,
    /// Foreign key field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreign_field: Option<String>,
    /// Join type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub join_type: Option<String>,
    /// Whether target fields are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_fields: Option<bool>,
    /// Whether target scores are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_scores: Option<bool>,
    /// Whether target facets are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_facets: Option<bool>,
    /// Other registered options.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Compiles every join of `spec`, in order.
///
/// Entries naming an unregistered join or a template the target lacks are
/// dropped.
pub fn map_joins(
    registry: &JoinRegistry,
    spec: &[(String, JoinRequest)],
) -> Result<Vec<JoinDescriptor>, JoinError> {
    let mut joins = Vec::with_capacity(spec.len());
    for (name, request) in spec {
        let Some(registration) = registry.get(name) else {
            debug!(join = %name, "Ignoring unknown join");
            continue;
        };
        if let Some(descriptor) = compile_join(registration, request)? {
            joins.push(descriptor);
        }
    }
    Ok(joins)
}

/// Compiles one join request against its registration.
///
/// Returns `Ok(None)` when the requested template does not exist on the
/// target index.
pub fn compile_join(
    registration: &JoinRegistration,
    request: &JoinRequest,
) -> Result<Option<JoinDescriptor>, JoinError> {
    let target = registration.target();
    let template_name = request.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
    let Some(template) = target.template(template_name) else {
        debug!(
            index = %target.name(),
            template = %template_name,
            "Ignoring join with unknown template"
        );
        return Ok(None);
    };

    let text = match request.query.as_deref() {
        Some(query) if !query.is_empty() => query,
        _ => MATCH_ALL,
    };

    let mut clauses = Vec::new();
    for (name, value) in &request.filters {
        let builder = target.filter(name).ok_or_else(|| JoinError::UnknownFilter {
            index: target.name().to_string(),
            filter: name.clone(),
        })?;
        let output = builder.build(value, &request.filter_options).into_filters();
        clauses.extend(
            output
                .iter()
                .filter_map(Filter::as_query)
                .map(|filter| filter.to_clause()),
        );
    }

    let fields = template.search_fields();
    if !fields.is_empty() {
        clauses.push(format!("({})", search_field_expression(&fields, text)));
    }

    let query_string = if clauses.is_empty() {
        MATCH_ALL.to_string()
    } else {
        clauses.join(" AND ")
    };

    Ok(Some(JoinDescriptor {
        query_string,
        index_name: target.name().to_string(),
        query_template: registration.query_template.clone(),
        local_field: registration.local_field.clone(),
        foreign_field: registration.foreign_field.clone(),
        join_type: registration.join_type.clone(),
        return_fields: registration.return_fields,
        return_scores: registration.return_scores,
        return_facets: registration.return_facets,
        extra: registration
            .extra
            .iter()
            .filter(|(key, _)| !DESCRIPTOR_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    }))
}

/// Matches `text` against every field, weighted by boost:
/// `title:(text)^2 OR body:(text)^1`.
pub fn search_field_expression(fields: &[SearchField], text: &str) -> String {
    fields
        .iter()
        .map(|field| format!("{}:({})^{}", field.field, text, field.boost_label()))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Deserializes a JSON object of join requests, keeping key order.
pub fn deserialize_join_spec<'de, D>(deserializer: D) -> Result<Vec<(String, JoinRequest)>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|(name, value)| {
            serde_json::from_value(value)
                .map(|request| (name, request))
                .map_err(D::Error::custom)
        })
        .collect()
}
