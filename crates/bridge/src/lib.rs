//! Searchbridge
//!
//! This crate is a query and document mediation layer in front of
//! replicated search-engine backends: several indexers take writes, one
//! searcher answers reads. It translates plain JSON documents and
//! structured search requests into the backend's wire schema, fans writes
//! out to every indexer, and rebuilds plain documents from field-oriented
//! results.
//!
//! # Features
//!
//! - **Document codec**: plain objects to field lists and back, with
//!   multi-valued field flattening and two decode modes
//! - **Filters**: named, parametrized predicate builders with array
//!   expansion and falsy suppression
//! - **Joins**: cross-index join compilation against the target index's own
//!   templates and filters
//! - **Fan-out writes**: concurrent dispatch to every indexer with
//!   per-backend outcome events
//! - **Schema management**: index, field and template synchronization and
//!   indexer to searcher replication
//!
//! # Architecture
//!
//! - [`types`] - documents, wire types and requests
//! - [`codec`] - document encoding and decoding
//! - [`filters`] - filter builders and the filter mapper
//! - [`template`] - search templates and search fields
//! - [`joins`] - join registrations and the join compiler
//! - [`backend`] - writer and searcher capability traits
//! - [`events`] - write outcome events
//! - [`facade`] - the index facade
//! - [`catalog`] - declarative index definitions
//! - [`schema`] - schema synchronization and replication
//! - [`error`] - error types
//!
//! # Quick Start
//!
//! ```
//! use searchbridge::{IndexFacade, JoinRegistration, JoinRequest, SearchOptions, Template};
//! use searchbridge::filters::QueryFilter;
//! use serde_json::json;
//!
//! let articles = IndexFacade::builder("articles")
//!     .template(
//!         "searchText",
//!         Template::new().with_search_field("title", 2).with_search_field("text", 1),
//!     )
//!     .filter("sectionId", |value, _| QueryFilter::new(format!("section_id:{value}")).into())
//!     .build()
//!     .unwrap();
//!
//! let comments = IndexFacade::builder("comments")
//!     .join("articles", JoinRegistration::new(articles.join_target()).on("article_id", "id"))
//!     .build()
//!     .unwrap();
//!
//! let request = comments
//!     .search_request(
//!         "great",
//!         &SearchOptions::new().join(
//!             "articles",
//!             JoinRequest::new()
//!                 .query("rust")
//!                 .template("searchText")
//!                 .filter("sectionId", json!(213)),
//!         ),
//!     )
//!     .unwrap();
//!
//! assert_eq!(
//!     request.joins.unwrap()[0].query_string,
//!     "(section_id:213) AND (title:(rust)^2 OR text:(rust)^1)"
//! );
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backend;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod events;
pub mod facade;
pub mod filters;
pub mod joins;
pub mod profile;
pub mod schema;
pub mod template;
pub mod types;

// Re-export commonly used types at crate root
pub use backend::{DocumentWriter, DynSearcher, DynWriter, Searcher};
pub use catalog::{Catalog, IndexDefinition, JoinDefinition};
pub use codec::DecodeMode;
pub use error::{
    BackendError, BackendResult, BridgeError, BridgeResult, ConfigError, DispatchError, JoinError,
    SchemaError,
};
pub use events::{IndexEvent, WritePayload};
pub use facade::{
    CreateOptions, DestroyOptions, DocumentFormatter, IndexFacade, IndexFacadeBuilder,
    SearchOptions,
};
pub use filters::{Filter, FilterBuilder, FilterOutput, QueryFilter, QueryFilterTemplate};
pub use joins::{JoinDescriptor, JoinRegistration, JoinRequest};
pub use profile::{IndexProfile, JoinTarget};
pub use template::Template;
pub use types::{
    BackendDocument, DeleteSelector, Document, FieldEntry, ResultDocument, ResultField,
    SearchRequest, SearchResponse, SearchResults,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
