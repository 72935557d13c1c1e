//! Entity model for Drupal JSON:API resources.
//!
//! A [`Model`] declares a resource type together with its fields, includes
//! and relationship table. [`Entity`] is the runtime value a response is
//! mapped into.

mod collection;
mod entity;
mod error;
mod identifier;
mod meta;
mod model;
mod relation;
mod traits;

pub use collection::Collection;
pub use entity::{Entity, RelationValue, CREATED_AT, UPDATED_AT};
pub use error::{SchemaError, SchemaResult};
pub use identifier::{ResourceIdentifier, ResourceIdentifierCollection};
pub use meta::Meta;
pub use model::{Model, ModelClass};
pub use relation::{Cardinality, RelationDef, RelationTarget};
pub use traits::{HasAttributes, HasMeta, HasRelations};
