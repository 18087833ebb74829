//! The index facade.
//!
//! An [`IndexFacade`] owns the static configuration of one logical index
//! and runs its four operations:
//!
//! | Operation | Pipeline | Backends |
//! |-----------|----------|----------|
//! | [`create`](IndexFacade::create) | input formatter, encode | every writer, concurrently |
//! | [`destroy`](IndexFacade::destroy) | build selector | every writer, concurrently |
//! | [`search`](IndexFacade::search) | merge, map filters, compile joins, decode, output formatter | the searcher |
//! | [`more_like_this`](IndexFacade::more_like_this) | merge, map filters, decode, output formatter | the searcher |
//!
//! # Writes
//!
//! A write is dispatched to every writer independently. Each writer's
//! outcome is reported as an [`IndexEvent`]; a writer failure never aborts
//! the other writers and never fails the call. The call itself fails only
//! when a dispatch task cannot be joined.
//!
//! # Request assembly
//!
//! Search parameters are merged with the following precedence, highest
//! first:
//!
//! 1. caller options
//! 2. the named template (`default` when none is named)
//! 3. `{ query, lang }` from the call and the facade
//!
//! `template`, `filters`, `filterOptions` and `joins` are directives, not
//! backend parameters, and never reach the backend as-is.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};

use crate::backend::{DocumentWriter, DynSearcher, DynWriter, Searcher};
use crate::codec::{DecodeMode, decode, encode};
use crate::error::{BackendResult, BridgeResult, ConfigError, DispatchError, JoinError};
use crate::events::{EVENT_CHANNEL_CAPACITY, IndexEvent, WritePayload};
use crate::filters::{
    FilterBuilder, FilterOutput, FilterRegistry, deserialize_filter_spec, map_filters,
};
use crate::joins::{JoinRegistration, JoinRegistry, JoinRequest, deserialize_join_spec, map_joins};
use crate::profile::{IndexProfile, JoinTarget};
use crate::template::{DEFAULT_TEMPLATE, Template};
use crate::types::{
    BackendDocument, DEFAULT_DELETE_FIELD, DEFAULT_LANG, DeleteSelector, Document, OneOrMany,
    SearchRequest, SearchResponse, SearchResults,
};

/// Request key of the free-text query.
pub const QUERY_KEY: &str = "query";

/// Request key of the more-like-this reference text.
pub const LIKE_TEXT_KEY: &str = "likeText";

/// Request key of the language tag.
pub const LANG_KEY: &str = "lang";

/// Option keys that shape the request and are never forwarded verbatim.
const DIRECTIVE_KEYS: [&str; 4] = ["template", "filters", "filterOptions", "joins"];

/// A per-document transformation applied before encoding or after
/// decoding.
pub type DocumentFormatter = Arc<dyn Fn(Document) -> Document + Send + Sync>;

/// Optional input and output formatters.
#[derive(Clone, Default)]
pub struct Formatters {
    /// Applied to every document before encoding.
    pub input: Option<DocumentFormatter>,
    /// Applied to every decoded result document.
    pub output: Option<DocumentFormatter>,
}

impl std::fmt::Debug for Formatters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatters")
            .field("input", &self.input.is_some())
            .field("output", &self.output.is_some())
            .finish()
    }
}

/// Options of [`IndexFacade::create`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateOptions {
    /// Language tag overriding the facade default.
    #[serde(default)]
    pub lang: Option<String>,
}

impl CreateOptions {
    /// Sets the language tag.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

/// Options of [`IndexFacade::destroy`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DestroyOptions {
    /// Key field; `id` when absent.
    #[serde(default)]
    pub field: Option<String>,
}

impl DestroyOptions {
    /// Sets the key field.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Options of [`IndexFacade::search`] and [`IndexFacade::more_like_this`].
///
/// Deserializes from the caller's JSON options object: the directive keys
/// fill the typed fields, every other key lands in `params`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Template name; `default` when absent.
    #[serde(default)]
    pub template: Option<String>,
    /// Filter spec, in application order.
    #[serde(default, deserialize_with = "deserialize_filter_spec")]
    pub filters: Map<String, Value>,
    /// Context handed to every filter builder.
    #[serde(default)]
    pub filter_options: Value,
    /// Join spec, in application order.
    #[serde(default, deserialize_with = "deserialize_join_spec")]
    pub joins: Vec<(String, JoinRequest)>,
    /// Backend parameters; override template and defaults.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl SearchOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from a JSON value; `null` yields empty options.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Null => Ok(Self::default()),
            value => serde_json::from_value(value),
        }
    }

    /// Names the template.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Adds a filter.
    pub fn filter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.filters.insert(name.into(), value);
        self
    }

    /// Sets the filter context.
    pub fn filter_options(mut self, options: Value) -> Self {
        self.filter_options = options;
        self
    }

    /// Adds a join.
    pub fn join(mut self, name: impl Into<String>, request: JoinRequest) -> Self {
        self.joins.push((name.into(), request));
        self
    }

    /// Sets a backend parameter.
    pub fn param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// One logical index: its backends, templates, filters, joins and
/// formatters.
///
/// Cloning is cheap and clones share the event channel.
#[derive(Clone)]
pub struct IndexFacade {
    profile: Arc<IndexProfile>,
    writers: Vec<DynWriter>,
    searcher: Option<DynSearcher>,
    joins: Arc<JoinRegistry>,
    formatters: Formatters,
    lang: String,
    decode_mode: DecodeMode,
    events: broadcast::Sender<IndexEvent>,
    event_capacity: usize,
}

impl IndexFacade {
    /// Starts building a facade for index `name`.
    pub fn builder(name: impl Into<String>) -> IndexFacadeBuilder {
        IndexFacadeBuilder::new(name)
    }

    /// Returns a builder preloaded with this facade's configuration.
    ///
    /// The built facade shares this facade's event channel unless it has
    /// more writers than the channel can buffer events for.
    pub fn to_builder(&self) -> IndexFacadeBuilder {
        IndexFacadeBuilder {
            name: self.profile.name().to_string(),
            templates: self.profile.templates().clone(),
            filters: self.profile.filters().clone(),
            joins: (*self.joins).clone(),
            writers: self.writers.clone(),
            searcher: self.searcher.clone(),
            formatters: self.formatters.clone(),
            lang: self.lang.clone(),
            decode_mode: self.decode_mode,
            events: Some((self.events.clone(), self.event_capacity)),
        }
    }

    /// Index name.
    pub fn name(&self) -> &str {
        self.profile.name()
    }

    /// Default language tag.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Decode mode of search results.
    pub fn decode_mode(&self) -> DecodeMode {
        self.decode_mode
    }

    /// Number of write backends.
    pub fn writer_count(&self) -> usize {
        self.writers.len()
    }

    /// Looks up a template.
    pub fn template(&self, name: &str) -> Option<&Template> {
        self.profile.template(name)
    }

    /// Returns the read-only view joins of other indexes target.
    pub fn join_target(&self) -> Arc<dyn JoinTarget> {
        self.profile.clone()
    }

    /// Replaces the input formatter.
    pub fn set_input_formatter(&mut self, formatter: Option<DocumentFormatter>) {
        self.formatters.input = formatter;
    }

    /// Replaces the output formatter.
    pub fn set_output_formatter(&mut self, formatter: Option<DocumentFormatter>) {
        self.formatters.output = formatter;
    }

    /// Subscribes to write outcome events.
    pub fn subscribe(&self) -> broadcast::Receiver<IndexEvent> {
        self.events.subscribe()
    }

    /// Encodes documents as they would be written.
    pub fn encode_documents(
        &self,
        documents: impl Into<OneOrMany<Document>>,
        options: &CreateOptions,
    ) -> Vec<BackendDocument> {
        let lang = options.lang.as_deref().unwrap_or(&self.lang);
        documents
            .into()
            .into_vec()
            .into_iter()
            .map(|document| match &self.formatters.input {
                Some(format) => format(document),
                None => document,
            })
            .map(|document| encode(&document, lang))
            .collect()
    }

    /// Writes documents to every write backend.
    ///
    /// Per-backend outcomes are reported as events only.
    #[instrument(skip_all, fields(index = %self.name()))]
    pub async fn create(
        &self,
        documents: impl Into<OneOrMany<Document>>,
        options: CreateOptions,
    ) -> BridgeResult<()> {
        self.require_writers()?;
        let encoded = self.encode_documents(documents, &options);
        debug!(documents = encoded.len(), "Dispatching create");
        self.dispatch(WritePayload::Documents(Arc::new(encoded)))
            .await
    }

    /// Deletes documents whose key field holds one of `values` from every
    /// write backend.
    #[instrument(skip_all, fields(index = %self.name()))]
    pub async fn destroy(
        &self,
        values: impl Into<OneOrMany<Value>>,
        options: DestroyOptions,
    ) -> BridgeResult<()> {
        self.require_writers()?;
        let selector = DeleteSelector {
            field: options
                .field
                .unwrap_or_else(|| DEFAULT_DELETE_FIELD.to_string()),
            values: values.into().into_vec(),
        };
        debug!(field = %selector.field, values = selector.values.len(), "Dispatching destroy");
        self.dispatch(WritePayload::Selector(Arc::new(selector)))
            .await
    }

    /// Assembles the request [`search`](Self::search) sends.
    pub fn search_request(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchRequest, JoinError> {
        let params = self.merge_params(QUERY_KEY, query, options);
        let filters = map_filters(self.profile.filters(), &options.filters, &options.filter_options);
        let joins = map_joins(&self.joins, &options.joins)?;
        Ok(SearchRequest {
            params,
            filters,
            joins: Some(joins),
        })
    }

    /// Assembles the request [`more_like_this`](Self::more_like_this)
    /// sends. Joins are not compiled.
    pub fn more_like_this_request(&self, text: &str, options: &SearchOptions) -> SearchRequest {
        if !options.joins.is_empty() {
            debug!(index = %self.name(), "Ignoring joins of a more-like-this request");
        }
        SearchRequest {
            params: self.merge_params(LIKE_TEXT_KEY, text, options),
            filters: map_filters(self.profile.filters(), &options.filters, &options.filter_options),
            joins: None,
        }
    }

    /// Searches the index.
    ///
    /// A backend error is returned as is; a missing result is an empty
    /// document list.
    #[instrument(skip_all, fields(index = %self.name()))]
    pub async fn search(&self, query: &str, options: SearchOptions) -> BridgeResult<SearchResults> {
        let searcher = self.require_searcher()?;
        let request = self.search_request(query, &options)?;
        let response = searcher.search(self.name(), &request).await?;
        Ok(self.decode_response(response))
    }

    /// Finds documents similar to `text`.
    #[instrument(skip_all, fields(index = %self.name()))]
    pub async fn more_like_this(
        &self,
        text: &str,
        options: SearchOptions,
    ) -> BridgeResult<SearchResults> {
        let searcher = self.require_searcher()?;
        let request = self.more_like_this_request(text, &options);
        let response = searcher.more_like_this(self.name(), &request).await?;
        Ok(self.decode_response(response))
    }

    fn merge_params(&self, key: &str, text: &str, options: &SearchOptions) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert(key.to_string(), Value::String(text.to_string()));
        params.insert(LANG_KEY.to_string(), Value::String(self.lang.clone()));

        let template_name = options.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        match self.profile.template(template_name) {
            Some(template) => {
                for (name, value) in template.params() {
                    params.insert(name.clone(), value.clone());
                }
            }
            None => debug!(template = %template_name, "No template applied"),
        }

        for (name, value) in &options.params {
            params.insert(name.clone(), value.clone());
        }
        for directive in DIRECTIVE_KEYS {
            params.remove(directive);
        }
        params
    }

    fn decode_response(&self, response: Option<SearchResponse>) -> SearchResults {
        let Some(SearchResponse {
            documents: Some(documents),
            extra,
        }) = response
        else {
            return SearchResults::empty();
        };

        let documents = documents
            .iter()
            .map(|document| decode(document, self.decode_mode))
            .map(|document| match &self.formatters.output {
                Some(format) => format(document),
                None => document,
            })
            .collect();
        SearchResults { documents, extra }
    }

    fn require_writers(&self) -> Result<(), ConfigError> {
        if self.writers.is_empty() {
            return Err(ConfigError::NoWriters(self.name().to_string()));
        }
        Ok(())
    }

    fn require_searcher(&self) -> Result<&DynSearcher, ConfigError> {
        self.searcher
            .as_ref()
            .ok_or_else(|| ConfigError::NoSearcher(self.name().to_string()))
    }

    /// Sends `payload` to every writer concurrently and reports each
    /// outcome. Returns once every writer has finished.
    async fn dispatch(&self, payload: WritePayload) -> BridgeResult<()> {
        let mut tasks: JoinSet<(String, BackendResult<()>)> = JoinSet::new();

        for writer in &self.writers {
            let writer = Arc::clone(writer);
            let index = self.name().to_string();
            let payload = payload.clone();

            tasks.spawn(async move {
                let result = write_to(writer.as_ref(), &index, &payload).await;
                (writer.backend_id().to_string(), result)
            });
        }

        let mut failed = 0;
        let mut last_error = String::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((backend, Ok(()))) => {
                    debug!(backend = %backend, "Write succeeded");
                    self.emit(self.success_event(backend, &payload));
                }
                Ok((backend, Err(error))) => {
                    warn!(backend = %backend, error = %error, "Write failed");
                    self.emit(IndexEvent::Failed {
                        error,
                        backend,
                        index: self.name().to_string(),
                        payload: payload.clone(),
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Write task did not complete");
                    failed += 1;
                    last_error = e.to_string();
                }
            }
        }

        if failed > 0 {
            return Err(DispatchError {
                index: self.name().to_string(),
                failed,
                message: last_error,
            }
            .into());
        }
        Ok(())
    }

    fn success_event(&self, backend: String, payload: &WritePayload) -> IndexEvent {
        let index = self.name().to_string();
        match payload {
            WritePayload::Documents(documents) => IndexEvent::Created {
                backend,
                index,
                documents: Arc::clone(documents),
            },
            WritePayload::Selector(selector) => IndexEvent::Destroyed {
                backend,
                index,
                selector: Arc::clone(selector),
            },
        }
    }

    fn emit(&self, event: IndexEvent) {
        // No receiver is not an error.
        let _ = self.events.send(event);
    }
}

async fn write_to(
    writer: &dyn DocumentWriter,
    index: &str,
    payload: &WritePayload,
) -> BackendResult<()> {
    match payload {
        WritePayload::Documents(documents) => writer.create_documents(index, documents.as_slice()).await,
        WritePayload::Selector(selector) => writer.destroy_documents(index, selector).await,
    }
}

impl std::fmt::Debug for IndexFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let writers: Vec<&str> = self.writers.iter().map(|w| w.backend_id()).collect();
        f.debug_struct("IndexFacade")
            .field("name", &self.name())
            .field("writers", &writers)
            .field("searcher", &self.searcher.as_ref().map(|s| s.backend_id()))
            .field("lang", &self.lang)
            .field("decode_mode", &self.decode_mode)
            .field("formatters", &self.formatters)
            .finish_non_exhaustive()
    }
}

/// Builder for [`IndexFacade`].
pub struct IndexFacadeBuilder {
    name: String,
    templates: HashMap<String, Template>,
    filters: FilterRegistry,
    joins: JoinRegistry,
    writers: Vec<DynWriter>,
    searcher: Option<DynSearcher>,
    formatters: Formatters,
    lang: String,
    decode_mode: DecodeMode,
    events: Option<(broadcast::Sender<IndexEvent>, usize)>,
}

impl IndexFacadeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            templates: HashMap::new(),
            filters: FilterRegistry::new(),
            joins: JoinRegistry::new(),
            writers: Vec::new(),
            searcher: None,
            formatters: Formatters::default(),
            lang: DEFAULT_LANG.to_string(),
            decode_mode: DecodeMode::default(),
            events: None,
        }
    }

    /// Adds a write backend.
    pub fn writer(mut self, writer: Arc<dyn DocumentWriter>) -> Self {
        self.writers.push(writer);
        self
    }

    /// Replaces the write backends.
    pub fn writers(mut self, writers: Vec<DynWriter>) -> Self {
        self.writers = writers;
        self
    }

    /// Sets the read backend.
    pub fn searcher(mut self, searcher: Arc<dyn Searcher>) -> Self {
        self.searcher = Some(searcher);
        self
    }

    /// Registers a template.
    pub fn template(mut self, name: impl Into<String>, template: Template) -> Self {
        self.templates.insert(name.into(), template);
        self
    }

    /// Registers a filter closure.
    pub fn filter<F>(self, name: impl Into<String>, builder: F) -> Self
    where
        F: Fn(&Value, &Value) -> FilterOutput + Send + Sync + 'static,
    {
        self.filter_builder(name, Arc::new(builder))
    }

    /// Registers a filter builder.
    pub fn filter_builder(mut self, name: impl Into<String>, builder: Arc<dyn FilterBuilder>) -> Self {
        self.filters.insert(name.into(), builder);
        self
    }

    /// Registers a join.
    pub fn join(mut self, name: impl Into<String>, registration: JoinRegistration) -> Self {
        self.joins.insert(name.into(), registration);
        self
    }

    /// Sets the input formatter.
    pub fn input_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        self.formatters.input = Some(Arc::new(formatter));
        self
    }

    /// Sets the output formatter.
    pub fn output_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(Document) -> Document + Send + Sync + 'static,
    {
        self.formatters.output = Some(Arc::new(formatter));
        self
    }

    /// Sets the default language tag.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Sets the decode mode.
    pub fn decode_mode(mut self, mode: DecodeMode) -> Self {
        self.decode_mode = mode;
        self
    }

    /// Builds the facade.
    pub fn build(self) -> Result<IndexFacade, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyIndexName);
        }
        // One write emits one event per writer; all of them must fit.
        let required = EVENT_CHANNEL_CAPACITY.max(self.writers.len());
        let (events, event_capacity) = match self.events {
            Some((sender, capacity)) if capacity >= required => (sender, capacity),
            _ => (broadcast::channel(required).0, required),
        };

        Ok(IndexFacade {
            profile: Arc::new(IndexProfile::new(self.name, self.templates, self.filters)),
            writers: self.writers,
            searcher: self.searcher,
            joins: Arc::new(self.joins),
            formatters: self.formatters,
            lang: self.lang,
            decode_mode: self.decode_mode,
            events,
            event_capacity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{QueryFilter, QueryFilterTemplate};
    use serde_json::json;

    fn facade() -> IndexFacade {
        IndexFacade::builder("articles")
            .template(
                "default",
                Template::new().with("foo", json!("baz")).with("extra", json!(1)),
            )
            .template("short", Template::new().with("rows", json!(5)))
            .filter_builder("sectionId", Arc::new(QueryFilterTemplate::new("section_id:{value}")))
            .filter("roleId", |value, _| {
                QueryFilter::negated(format!("role_id:{value}")).into()
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_rejects_empty_name() {
        assert_eq!(
            IndexFacade::builder(" ").build().unwrap_err(),
            ConfigError::EmptyIndexName
        );
    }

    #[test]
    fn test_search_request_defaults() {
        let request = IndexFacade::builder("articles")
            .build()
            .unwrap()
            .search_request("my query", &SearchOptions::new())
            .unwrap();
        assert_eq!(
            request.to_value(),
            json!({ "query": "my query", "lang": "ENGLISH", "filters": [], "joins": [] })
        );
    }

    #[test]
    fn test_caller_wins_over_template() {
        let request = facade()
            .search_request("q", &SearchOptions::new().param("foo", json!("bar")))
            .unwrap();
        assert_eq!(request.param("foo"), Some(&json!("bar")));
        assert_eq!(request.param("extra"), Some(&json!(1)));
        assert_eq!(request.query(), Some("q"));
    }

    #[test]
    fn test_named_template_replaces_default() {
        let request = facade()
            .search_request("q", &SearchOptions::new().template("short"))
            .unwrap();
        assert_eq!(request.param("rows"), Some(&json!(5)));
        assert!(request.param("foo").is_none());
        assert!(request.param("template").is_none());
    }

    #[test]
    fn test_directives_are_stripped() {
        let options = SearchOptions::from_value(json!({
            "template": "short",
            "filterOptions": { "x": 1 },
            "filters": { "sectionId": 3 },
            "lang": "FRENCH"
        }))
        .unwrap();
        let request = facade().search_request("q", &options).unwrap();
        assert_eq!(
            request.to_value(),
            json!({
                "query": "q",
                "lang": "FRENCH",
                "rows": 5,
                "filters": [{ "type": "QueryFilter", "negative": false, "query": "section_id:3" }],
                "joins": []
            })
        );
    }

    #[test]
    fn test_null_filters_are_empty() {
        let options = SearchOptions::from_value(json!({
            "filters": null,
            "joins": { "articles": { "filters": null } }
        }))
        .unwrap();
        assert!(options.filters.is_empty());
        assert!(options.joins[0].1.filters.is_empty());

        let request = facade().search_request("q", &options).unwrap();
        assert!(request.filters.is_empty());
    }

    #[test]
    fn test_more_like_this_request() {
        let request = facade().more_like_this_request(
            "reference text",
            &SearchOptions::new().filter("roleId", json!(230)),
        );
        assert_eq!(request.param(LIKE_TEXT_KEY), Some(&json!("reference text")));
        assert!(request.query().is_none());
        assert!(request.joins.is_none());
        assert_eq!(
            request.filters,
            vec![crate::filters::Filter::Query(QueryFilter::negated("role_id:230"))]
        );
    }

    #[test]
    fn test_encode_documents_uses_lang_option() {
        let documents = facade().encode_documents(
            crate::codec::document_from_value(json!({ "foo": "bar" })),
            &CreateOptions::default().lang("FRENCH"),
        );
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].lang, "FRENCH");
    }

    #[test]
    fn test_to_builder_keeps_configuration_and_channel() {
        let original = facade();
        let mut receiver = original.subscribe();
        let rebuilt = original.to_builder().lang("GERMAN").build().unwrap();
        assert_eq!(rebuilt.name(), "articles");
        assert_eq!(rebuilt.lang(), "GERMAN");
        assert!(rebuilt.template("short").is_some());

        rebuilt.emit(IndexEvent::Destroyed {
            backend: "a".to_string(),
            index: "articles".to_string(),
            selector: Arc::new(DeleteSelector {
                field: "id".to_string(),
                values: vec![],
            }),
        });
        assert!(receiver.try_recv().is_ok());
    }
}
