//! Search templates.
//!
//! A template is a named bundle of static request options merged into
//! search requests as defaults. Its `searchFields` entry declares the
//! fields free text is matched against and their boost weights; joins use
//! it to build the target side of a composite query.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Name of the template used when a request names none.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Key of the search field list inside a template.
pub const SEARCH_FIELDS_KEY: &str = "searchFields";

/// A named, static bundle of request options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(Map<String, Value>);

/// A searchable field and its boost weight.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchField {
    /// Field name.
    pub field: String,
    /// Boost weight, rendered verbatim in query strings.
    pub boost: Number,
}

impl SearchField {
    /// Renders the boost for a query string.
    ///
    /// Integral values print without a fractional part, so `2` and `2.0`
    /// both render as `2`.
    pub fn boost_label(&self) -> String {
        self.boost
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| (f as i64).to_string())
            .unwrap_or_else(|| self.boost.to_string())
    }
}

impl Template {
    /// Creates an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a template from a JSON object; other values yield an empty
    /// template.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Sets an option.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Appends a search field with the given boost.
    pub fn with_search_field(mut self, field: impl Into<String>, boost: impl Into<Number>) -> Self {
        let field: String = field.into();
        let boost: Number = boost.into();
        let entry = serde_json::json!({ "field": field, "boost": boost });
        match self.0.get_mut(SEARCH_FIELDS_KEY) {
            Some(Value::Array(fields)) => fields.push(entry),
            _ => {
                self.0
                    .insert(SEARCH_FIELDS_KEY.to_string(), Value::Array(vec![entry]));
            }
        }
        self
    }

    /// Returns every option of the template.
    pub fn params(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the declared search fields.
    ///
    /// Entries without a string `field` are ignored; a missing or
    /// non-numeric `boost` counts as 1.
    pub fn search_fields(&self) -> Vec<SearchField> {
        let Some(Value::Array(entries)) = self.0.get(SEARCH_FIELDS_KEY) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| {
                let field = entry.get("field")?.as_str()?.to_string();
                let boost = match entry.get("boost") {
                    Some(Value::Number(n)) => n.clone(),
                    _ => Number::from(1),
                };
                Some(SearchField { field, boost })
            })
            .collect()
    }
}

impl From<Map<String, Value>> for Template {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_fields() {
        let template = Template::from_value(json!({
            "returnedFields": ["id"],
            "searchFields": [
                { "field": "title", "mode": "TERM_AND_PHRASE", "boost": 2 },
                { "field": "text", "mode": "TERM_AND_PHRASE", "boost": 1 },
                { "mode": "PHRASE" },
                { "field": "summary" }
            ]
        }));

        let fields = template.search_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].field, "title");
        assert_eq!(fields[0].boost.to_string(), "2");
        assert_eq!(fields[2].field, "summary");
        assert_eq!(fields[2].boost.to_string(), "1");
    }

    #[test]
    fn test_boost_label() {
        let template = Template::from_value(json!({
            "searchFields": [
                { "field": "title", "boost": 2.0 },
                { "field": "text", "boost": 1 },
                { "field": "summary", "boost": 0.5 },
                { "field": "tags", "boost": -3.0 }
            ]
        }));

        let labels: Vec<String> = template.search_fields().iter().map(SearchField::boost_label).collect();
        assert_eq!(labels, vec!["2", "1", "0.5", "-3"]);
    }

    #[test]
    fn test_search_fields_absent() {
        assert!(Template::new().with("x", json!("y")).search_fields().is_empty());
        assert!(Template::from_value(json!({ "searchFields": "title" })).search_fields().is_empty());
    }

    #[test]
    fn test_with_search_field() {
        let template = Template::new()
            .with_search_field("title", 2)
            .with_search_field("text", 1);
        assert_eq!(
            template.params().get(SEARCH_FIELDS_KEY),
            Some(&json!([
                { "field": "title", "boost": 2 },
                { "field": "text", "boost": 1 }
            ]))
        );
    }

    #[test]
    fn test_template_roundtrips_as_plain_object() {
        let value = json!({ "z": "x", "rows": 10 });
        let template: Template = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&template).unwrap(), value);
    }
}
