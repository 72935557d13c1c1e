//! Capability traits shared by entities and identifiers.

use serde_json::{Map, Value};

use crate::{Entity, Meta, RelationValue, ResourceIdentifierCollection, SchemaResult};

pub trait HasAttributes {
    fn attribute(&self, key: &str) -> Option<&Value>;
    fn attribute_map(&self) -> &Map<String, Value>;
}

pub trait HasMeta {
    fn meta(&self) -> SchemaResult<&Meta>;
    fn has_meta(&self) -> bool;
}

pub trait HasRelations {
    fn loaded_relation(&self, name: &str) -> Option<&RelationValue>;
    fn identifiers(&self, name: &str) -> Option<&ResourceIdentifierCollection>;
}

impl HasAttributes for Entity {
    fn attribute(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }

    fn attribute_map(&self) -> &Map<String, Value> {
        self.attributes()
    }
}

impl HasMeta for Entity {
    fn meta(&self) -> SchemaResult<&Meta> {
        Entity::meta(self)
    }

    fn has_meta(&self) -> bool {
        Entity::has_meta(self)
    }
}

impl HasRelations for Entity {
    fn loaded_relation(&self, name: &str) -> Option<&RelationValue> {
        self.relation_value(name)
    }

    fn identifiers(&self, name: &str) -> Option<&ResourceIdentifierCollection> {
        self.relation_identifiers(name)
    }
}
