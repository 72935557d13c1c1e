//! Relation descriptors for Drupal JSON:API entities

mod descriptor;
mod traits;

pub use descriptor::{Relation, RelationOwner};
pub use traits::RelationAccessor;

// Re-export for convenience
pub use drupal_jsonapi_schema::{Cardinality, RelationDef, RelationTarget};
