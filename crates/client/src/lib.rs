//! Client side plumbing for Drupal JSON:API
//!
//! - [`ClientConfig`]: static configuration, optionally read from the environment
//! - [`QueryBuilder`]: filters, fieldsets, includes, sort and pagination
//! - [`ScopeSet`]: named query modifiers applied at build time
//! - [`Transport`]: the async seam the request goes through
//! - [`Document`]: read-only view of the response

mod config;
mod document;
mod error;
pub mod http;
pub mod query;
pub mod scope;

pub use config::{ClientConfig, Credentials};
pub use document::{
    Document, Linkage, PrimaryData, RawDocument, Relationship, RelationshipObject, Resource,
    ResourceLinkage, ResourceObject,
};
pub use error::{ClientError, ClientResult};
pub use http::{HttpTransport, JsonApiRequest, JsonApiResponse, Method, Transport, UrlBuilder};
pub use query::{Condition, Conjunction, FilterEntry, Operator, Page, QueryBuilder, Sort, SortDirection, SortField};
pub use scope::{ConsumerScope, LanguageScope, NodeLangcodeScope, Scope, ScopeSet};

pub mod env {
    //! Environment variable names read by [`crate::ClientConfig::from_env`].
    pub use crate::config::{
        ENV_BASE_URL, ENV_CACHE, ENV_CACHE_TTL, ENV_CONSUMER_ID, ENV_LOCALE, ENV_PASSWORD,
        ENV_TIMEZONE, ENV_USER,
    };
}
