//! Declarative index catalogs.
//!
//! A catalog builds a set of facades from JSON definitions and wires their
//! joins by index name:
//!
//! ```json
//! [
//!   {
//!     "name": "articles",
//!     "templates": { "searchText": { "searchFields": [{ "field": "title", "boost": 2 }] } },
//!     "filters": { "sectionId": { "query": "section_id:{value}" } }
//!   },
//!   {
//!     "name": "comments",
//!     "lang": "FRENCH",
//!     "joins": { "articles": { "index": "articles", "localField": "article_id", "foreignField": "id" } }
//!   }
//! ]
//! ```
//!
//! Definitions carry no backend; attach clients with [`Catalog::attach`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::codec::DecodeMode;
use crate::error::ConfigError;
use crate::facade::{IndexFacade, IndexFacadeBuilder};
use crate::filters::{FilterRegistry, QueryFilterTemplate};
use crate::joins::JoinRegistration;
use crate::profile::{IndexProfile, JoinTarget};
use crate::template::Template;

/// Static definition of one index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDefinition {
    /// Index name.
    pub name: String,
    /// Default language tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Decode mode of search results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_mode: Option<DecodeMode>,
    /// Templates by name.
    #[serde(default)]
    pub templates: HashMap<String, Template>,
    /// Declarative query filters by name.
    #[serde(default)]
    pub filters: HashMap<String, QueryFilterTemplate>,
    /// Joins by local join name.
    #[serde(default)]
    pub joins: HashMap<String, JoinDefinition>,
}

/// Static definition of one join.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinDefinition {
    /// Target index name.
    pub index: String,
    /// Backend-side template of the join query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_template: Option<String>,
    /// Local key field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_field: Option<String>,
    /// Target key field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_field: Option<String>,
    /// Join type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub join_type: Option<String>,
    /// Whether target fields are returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_fields: Option<bool>,
    /// Whether target scores are returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_scores: Option<bool>,
    /// Whether target facets are returned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_facets: Option<bool>,
    /// Other backend join options.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JoinDefinition {
    fn to_registration(&self, target: Arc<dyn JoinTarget>) -> JoinRegistration {
        let mut registration = JoinRegistration::new(target);
        registration.query_template = self.query_template.clone();
        registration.local_field = self.local_field.clone();
        registration.foreign_field = self.foreign_field.clone();
        registration.join_type = self.join_type.clone();
        registration.return_fields = self.return_fields;
        registration.return_scores = self.return_scores;
        registration.return_facets = self.return_facets;
        self.extra
            .iter()
            .fold(registration, |registration, (key, value)| {
                registration.with(key.clone(), value.clone())
            })
    }
}

impl IndexDefinition {
    fn filter_registry(&self) -> FilterRegistry {
        self.filters
            .iter()
            .map(|(name, template)| {
                let builder: Arc<dyn crate::filters::FilterBuilder> = Arc::new(template.clone());
                (name.clone(), builder)
            })
            .collect()
    }

    fn profile(&self) -> IndexProfile {
        IndexProfile::new(self.name.clone(), self.templates.clone(), self.filter_registry())
    }
}

/// A named set of facades.
#[derive(Debug, Default)]
pub struct Catalog {
    names: Vec<String>,
    indexes: HashMap<String, IndexFacade>,
}

impl Catalog {
    /// Builds facades from definitions.
    ///
    /// Fails on an empty or duplicate name and on a join whose target is
    /// not defined.
    pub fn from_definitions(definitions: Vec<IndexDefinition>) -> Result<Self, ConfigError> {
        let mut profiles: HashMap<String, Arc<dyn JoinTarget>> = HashMap::new();
        for definition in &definitions {
            if definition.name.trim().is_empty() {
                return Err(ConfigError::EmptyIndexName);
            }
            if profiles.contains_key(&definition.name) {
                return Err(ConfigError::DuplicateIndex(definition.name.clone()));
            }
            profiles.insert(definition.name.clone(), Arc::new(definition.profile()));
        }

        let mut catalog = Catalog::default();
        for definition in definitions {
            let mut builder = IndexFacade::builder(definition.name.clone());
            for (name, template) in &definition.templates {
                builder = builder.template(name.clone(), template.clone());
            }
            for (name, filter) in definition.filter_registry() {
                builder = builder.filter_builder(name, filter);
            }
            for (join, join_definition) in &definition.joins {
                let target = profiles.get(&join_definition.index).ok_or_else(|| {
                    ConfigError::UnknownJoinTarget {
                        index: definition.name.clone(),
                        join: join.clone(),
                        target: join_definition.index.clone(),
                    }
                })?;
                builder = builder.join(join.clone(), join_definition.to_registration(Arc::clone(target)));
            }
            if let Some(lang) = &definition.lang {
                builder = builder.lang(lang.clone());
            }
            if let Some(mode) = definition.decode_mode {
                builder = builder.decode_mode(mode);
            }

            let facade = builder.build()?;
            debug!(index = %facade.name(), joins = definition.joins.len(), "Defined index");
            catalog.names.push(definition.name.clone());
            catalog.indexes.insert(definition.name, facade);
        }
        Ok(catalog)
    }

    /// Parses a JSON array of definitions and builds the catalog.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let definitions: Vec<IndexDefinition> = serde_json::from_str(json)
            .map_err(|e| ConfigError::InvalidDefinition(e.to_string()))?;
        Self::from_definitions(definitions)
    }

    /// Looks up a facade.
    pub fn get(&self, name: &str) -> Option<&IndexFacade> {
        self.indexes.get(name)
    }

    /// Looks up a facade, failing when it is not defined.
    pub fn index(&self, name: &str) -> Result<&IndexFacade, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownIndex(name.to_string()))
    }

    /// Index names in definition order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of indexes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reconfigures a facade, typically to attach backends.
    ///
    /// ```ignore
    /// catalog.attach("articles", |b| b.writer(indexer.clone()).searcher(searcher.clone()))?;
    /// ```
    pub fn attach<F>(&mut self, name: &str, configure: F) -> Result<&IndexFacade, ConfigError>
    where
        F: FnOnce(IndexFacadeBuilder) -> IndexFacadeBuilder,
    {
        let current = self
            .indexes
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownIndex(name.to_string()))?;
        *current = configure(current.to_builder()).build()?;
        Ok(current)
    }
}
