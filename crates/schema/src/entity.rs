use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    Cardinality, Collection, Meta, ModelClass, ResourceIdentifier, ResourceIdentifierCollection,
    SchemaError, SchemaResult,
};

/// Attribute holding the creation timestamp of a Drupal entity.
pub const CREATED_AT: &str = "created";

/// Attribute holding the last-changed timestamp of a Drupal entity.
pub const UPDATED_AT: &str = "changed";

/// A loaded relationship: one related entity or a collection of them.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationValue {
    One(Box<Entity>),
    Many(Collection),
}

impl RelationValue {
    pub fn cardinality(&self) -> Cardinality {
        match self {
            RelationValue::One(_) => Cardinality::ToOne,
            RelationValue::Many(_) => Cardinality::ToMany,
        }
    }

    pub fn as_one(&self) -> Option<&Entity> {
        match self {
            RelationValue::One(entity) => Some(entity),
            RelationValue::Many(_) => None,
        }
    }

    pub fn as_many(&self) -> Option<&Collection> {
        match self {
            RelationValue::Many(collection) => Some(collection),
            RelationValue::One(_) => None,
        }
    }
}

impl From<Entity> for RelationValue {
    fn from(entity: Entity) -> Self {
        RelationValue::One(Box::new(entity))
    }
}

impl From<Collection> for RelationValue {
    fn from(collection: Collection) -> Self {
        RelationValue::Many(collection)
    }
}

/// In-memory representation of one remote resource.
///
/// Attributes live in an ordered map; the declared fields and includes come
/// from the entity's [`ModelClass`] and are fixed once the entity exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    class: ModelClass,
    id: Option<String>,
    attributes: Map<String, Value>,
    fields: Vec<&'static str>,
    relations: BTreeMap<String, RelationValue>,
    relation_identifiers: BTreeMap<String, ResourceIdentifierCollection>,
    meta: Option<Meta>,
}

impl Entity {
    pub fn new(class: ModelClass) -> Self {
        Self {
            class,
            id: None,
            attributes: Map::new(),
            fields: class.fields(),
            relations: BTreeMap::new(),
            relation_identifiers: BTreeMap::new(),
            meta: None,
        }
    }

    pub fn from_attributes(class: ModelClass, attributes: Map<String, Value>) -> Self {
        let mut entity = Self::new(class);
        entity.populate(attributes);
        entity
    }

    pub fn class(&self) -> ModelClass {
        self.class
    }

    pub fn resource_type(&self) -> &'static str {
        self.class.resource_type()
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn includes(&self) -> &'static [&'static str] {
        self.class.includes()
    }

    pub fn id(&self) -> SchemaResult<&str> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| SchemaError::IdNotLoaded(self.resource_type().to_string()))
    }

    pub fn has_id(&self) -> bool {
        self.id().is_ok()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Bulk-assign attributes, overwriting keys that already exist.
    pub fn populate(&mut self, attributes: Map<String, Value>) {
        for (key, value) in attributes {
            self.attributes.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// Whether the attribute is present with a non-null value.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_null())
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Convert the attribute map into a typed struct. The entity id is added
    /// under `id` unless an attribute of that name already exists.
    pub fn deserialize<T: DeserializeOwned>(&self) -> SchemaResult<T> {
        let mut object = self.attributes.clone();
        if let Some(id) = &self.id {
            object
                .entry("id")
                .or_insert_with(|| Value::String(id.clone()));
        }

        serde_json::from_value(Value::Object(object)).map_err(|err| SchemaError::Attributes {
            resource_type: self.resource_type().to_string(),
            message: err.to_string(),
        })
    }

    pub fn created(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp(CREATED_AT)
    }

    pub fn changed(&self) -> Option<DateTime<FixedOffset>> {
        self.timestamp(UPDATED_AT)
    }

    /// Parse an RFC 3339 timestamp attribute.
    pub fn timestamp(&self, key: &str) -> Option<DateTime<FixedOffset>> {
        self.get_str(key)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
    }

    pub fn meta(&self) -> SchemaResult<&Meta> {
        self.meta
            .as_ref()
            .ok_or_else(|| SchemaError::MissingMeta(self.resource_type().to_string()))
    }

    pub fn has_meta(&self) -> bool {
        self.meta.is_some()
    }

    pub fn set_meta(&mut self, meta: Meta) -> &mut Self {
        self.meta = Some(meta);
        self
    }

    pub fn relation_loaded(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn relation_value(&self, name: &str) -> Option<&RelationValue> {
        self.relations.get(name)
    }

    /// The related entity of a loaded to-one relation.
    pub fn related(&self, name: &str) -> Option<&Entity> {
        self.relation_value(name).and_then(RelationValue::as_one)
    }

    /// The related collection of a loaded to-many relation.
    pub fn related_many(&self, name: &str) -> Option<&Collection> {
        self.relation_value(name).and_then(RelationValue::as_many)
    }

    pub fn relations(&self) -> &BTreeMap<String, RelationValue> {
        &self.relations
    }

    /// Store a loaded relation. The value's shape must match the declared
    /// cardinality of the relation.
    pub fn set_relation(
        &mut self,
        name: &str,
        value: impl Into<RelationValue>,
    ) -> SchemaResult<&mut Self> {
        let value = value.into();
        self.declared_relation(name)?.expect(value.cardinality())?;
        self.relations.insert(name.to_string(), value);
        Ok(self)
    }

    pub fn set_relations(&mut self, relations: BTreeMap<String, RelationValue>) -> &mut Self {
        self.relations = relations;
        self
    }

    /// Record the identifiers (and their link meta) a response carried for a
    /// relationship, independent of whether the related resources were loaded.
    pub fn set_relation_identifiers(
        &mut self,
        name: &str,
        identifiers: ResourceIdentifierCollection,
    ) -> SchemaResult<()> {
        let relation = self.declared_relation(name)?;
        if identifiers.len() > 1 {
            relation.expect(Cardinality::ToMany)?;
        }
        self.relation_identifiers
            .insert(name.to_string(), identifiers);
        Ok(())
    }

    pub fn relation_identifiers(&self, name: &str) -> Option<&ResourceIdentifierCollection> {
        self.relation_identifiers.get(name)
    }

    pub fn relation_identifier(&self, name: &str) -> Option<&ResourceIdentifier> {
        self.relation_identifiers(name)
            .and_then(ResourceIdentifierCollection::first)
    }

    /// Meta of the link from this entity to `(resource_type, id)` through the
    /// named relation. Kept apart from the related entity's own meta.
    pub fn relation_meta(&self, name: &str, resource_type: &str, id: &str) -> Option<&Meta> {
        self.relation_identifiers(name)
            .and_then(|idents| idents.find(resource_type, id))
            .and_then(|ident| crate::HasMeta::meta(ident).ok())
    }

    fn declared_relation(&self, name: &str) -> SchemaResult<crate::RelationDef> {
        self.class
            .relation(name)
            .ok_or_else(|| SchemaError::UnknownRelation {
                resource_type: self.resource_type().to_string(),
                relation: name.to_string(),
            })
    }
}
