//! Read-only index profiles.
//!
//! A join needs three things from its target index: the name, the
//! templates and the filter builders. [`JoinTarget`] exposes exactly that,
//! so a join never holds a full facade of another index.

use std::collections::HashMap;
use std::sync::Arc;

use crate::filters::{FilterBuilder, FilterRegistry};
use crate::template::Template;

/// The capability a join needs from its target index.
pub trait JoinTarget: Send + Sync {
    /// Index name.
    fn name(&self) -> &str;

    /// Looks up a template by name.
    fn template(&self, name: &str) -> Option<&Template>;

    /// Looks up a filter builder by name.
    fn filter(&self, name: &str) -> Option<&Arc<dyn FilterBuilder>>;
}

/// Name, templates and filters of one index.
#[derive(Clone)]
pub struct IndexProfile {
    name: String,
    templates: HashMap<String, Template>,
    filters: FilterRegistry,
}

impl IndexProfile {
    /// Creates a profile.
    pub fn new(
        name: impl Into<String>,
        templates: HashMap<String, Template>,
        filters: FilterRegistry,
    ) -> Self {
        Self {
            name: name.into(),
            templates,
            filters,
        }
    }

    /// Returns all templates.
    pub fn templates(&self) -> &HashMap<String, Template> {
        &self.templates
    }

    /// Returns all filter builders.
    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }
}

impl JoinTarget for IndexProfile {
    fn name(&self) -> &str {
        &self.name
    }

    fn template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    fn filter(&self, name: &str) -> Option<&Arc<dyn FilterBuilder>> {
        self.filters.get(name)
    }
}

impl std::fmt::Debug for IndexProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut filters: Vec<&String> = self.filters.keys().collect();
        filters.sort();
        f.debug_struct("IndexProfile")
            .field("name", &self.name)
            .field("templates", &self.templates)
            .field("filters", &filters)
            .finish()
    }
}
