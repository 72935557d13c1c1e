//! Prelude for convenient ORM imports.
//!
//! # Example
//! ```ignore
//! use drupal_jsonapi_orm::prelude::*;
//!
//! OrmClient::init(RepositoryFactory::from_config(ClientConfig::from_env()?)?)?;
//! let tags = article.require_relation("tags")?.load_many(OrmClient::get().unwrap()).await?;
//! ```

// ORM types
pub use crate::{
    AttributeFilter, Attributes, BaseRepository, JsonApiRepository, ModelRegistry, OrmClient,
    RelationLoader, RepositoryFactory, RepositoryOptions,
    // Cache types
    CacheDecorator, CacheRepository, CacheStore, MemoryCacheStore,
};

// Client types
pub use crate::{ClientConfig, Operator, Page, QueryBuilder, Scope, ScopeSet, Sort};

// Relation types
pub use crate::{Relation, RelationAccessor};

// Schema types
pub use crate::{
    Collection, Entity, HasAttributes, HasMeta, HasRelations, Meta, Model, ModelClass, RelationDef,
    RelationValue, ResourceIdentifier,
};
