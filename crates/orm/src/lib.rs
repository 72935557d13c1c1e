//! Drupal JSON:API ORM Layer
//!
//! Repositories that read model classes from a Drupal JSON:API backend, map
//! the documents onto [`Entity`] values and optionally cache the results.
//!
//! # Example
//! ```ignore
//! use drupal_jsonapi_orm::prelude::*;
//!
//! let factory = RepositoryFactory::from_config(ClientConfig::from_env()?)?;
//! let articles = factory.for_model::<Article>()?;
//!
//! let article = articles.find("9f1c").await?;
//! let latest = articles
//!     .get_by_attributes(&Attributes::new().with("status", 1), Some(&Sort::parse("-created")), None)
//!     .await?;
//! ```

mod boot;
pub mod cache;
mod client;
mod factory;
mod loader;
mod mapper;
mod registry;
mod repository;
mod resolver;

pub mod prelude;

/// Test helpers for integration tests.
///
/// Enable with `#[cfg(test)]` or when the `testing` feature is enabled.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use boot::{boot_if_not_booted, is_booted, register_boot_hook, BootHook};
pub use cache::{CacheDecorator, CacheRepository, CacheStore, CachedValue, MemoryCacheStore, TaggedCache};
pub use client::{ClientAlreadyInitializedError, OrmClient};
pub use factory::RepositoryFactory;
pub use loader::RelationLoader;
pub use mapper::{MapTarget, ResponseMapper};
pub use registry::ModelRegistry;
pub use repository::{AttributeFilter, Attributes, BaseRepository, JsonApiRepository, RepositoryOptions};
pub use resolver::{FieldResolver, ResourceFields};

// Re-export commonly used types from the sibling crates
pub use drupal_jsonapi_client::{
    ClientConfig, ClientError, Operator, Page, QueryBuilder, Scope, ScopeSet, Sort, Transport,
};
pub use drupal_jsonapi_relation::{Relation, RelationAccessor, RelationOwner};
pub use drupal_jsonapi_schema::{
    Collection, Entity, HasAttributes, HasMeta, HasRelations, Meta, Model, ModelClass, RelationDef,
    RelationValue, ResourceIdentifier, ResourceIdentifierCollection, SchemaError,
};
