use drupal_jsonapi_schema::{Entity, SchemaError, SchemaResult};

use crate::{Relation, RelationOwner};

/// Relationship accessors for entities, driven by the model's declared
/// relation table.
pub trait RelationAccessor {
    /// Descriptor for the named relation, or `None` when it is not declared.
    fn relation(&self, name: &str) -> Option<Relation>;

    /// Like [`RelationAccessor::relation`], failing for undeclared names.
    fn require_relation(&self, name: &str) -> SchemaResult<Relation>;
}

impl RelationAccessor for Entity {
    fn relation(&self, name: &str) -> Option<Relation> {
        self.class()
            .relation(name)
            .map(|def| Relation::new(def, RelationOwner::of(self)))
    }

    fn require_relation(&self, name: &str) -> SchemaResult<Relation> {
        self.relation(name)
            .ok_or_else(|| SchemaError::UnknownRelation {
                resource_type: self.resource_type().to_string(),
                relation: name.to_string(),
            })
    }
}
