//! Read-only view over a JSON:API response document
//!
//! The top level is deserialized with serde. [`Resource`] and
//! [`Relationship`] are borrowed views that resolve relationship links
//! against the document's `included` resources.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ClientResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<ResourceObject>),
    One(Box<ResourceObject>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: BTreeMap<String, RelationshipObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    Many(Vec<ResourceLinkage>),
    One(ResourceLinkage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLinkage {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipObject {
    #[serde(default)]
    pub data: Option<Linkage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub data: Option<PrimaryData>,
    #[serde(default)]
    pub included: Vec<ResourceObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<Value>,
}

/// A parsed JSON:API document with an index over its primary and included
/// resources.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    raw: RawDocument,
    primary_index: HashMap<(String, String), usize>,
    included_index: HashMap<(String, String), usize>,
}

fn index_of(objects: &[ResourceObject]) -> HashMap<(String, String), usize> {
    objects
        .iter()
        .enumerate()
        .map(|(pos, res)| ((res.resource_type.clone(), res.id.clone()), pos))
        .collect()
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let primary_index = match &raw.data {
            Some(PrimaryData::One(object)) => {
                HashMap::from([((object.resource_type.clone(), object.id.clone()), 0)])
            }
            Some(PrimaryData::Many(items)) => index_of(items),
            None => HashMap::new(),
        };
        let included_index = index_of(&raw.included);
        Self {
            raw,
            primary_index,
            included_index,
        }
    }
}

impl Document {
    pub fn from_slice(bytes: &[u8]) -> ClientResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(value: Value) -> ClientResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn raw(&self) -> &RawDocument {
        &self.raw
    }

    pub fn has_errors(&self) -> bool {
        !self.raw.errors.is_empty()
    }

    pub fn errors(&self) -> &[Value] {
        &self.raw.errors
    }

    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.raw.meta.as_ref()
    }

    /// Whether the primary data is a collection, even an empty one.
    pub fn is_collection(&self) -> bool {
        matches!(self.raw.data, Some(PrimaryData::Many(_)))
    }

    pub fn has_primary_resources(&self) -> bool {
        match &self.raw.data {
            Some(PrimaryData::One(_)) => true,
            Some(PrimaryData::Many(items)) => !items.is_empty(),
            None => false,
        }
    }

    /// The single primary resource, or the first one of a collection.
    pub fn primary_resource(&self) -> Option<Resource<'_>> {
        match &self.raw.data {
            Some(PrimaryData::One(object)) => Some(self.view(object)),
            Some(PrimaryData::Many(items)) => items.first().map(|object| self.view(object)),
            None => None,
        }
    }

    pub fn primary_resources(&self) -> Vec<Resource<'_>> {
        match &self.raw.data {
            Some(PrimaryData::One(object)) => vec![self.view(object)],
            Some(PrimaryData::Many(items)) => items.iter().map(|object| self.view(object)).collect(),
            None => Vec::new(),
        }
    }

    pub fn included_resources(&self) -> Vec<Resource<'_>> {
        self.raw
            .included
            .iter()
            .map(|object| self.view(object))
            .collect()
    }

    pub fn included_resource(&self, resource_type: &str, id: &str) -> Option<Resource<'_>> {
        self.included_index
            .get(&(resource_type.to_string(), id.to_string()))
            .and_then(|pos| self.raw.included.get(*pos))
            .map(|object| self.view(object))
    }

    /// A primary resource with this type and id.
    pub fn primary_resource_by_id(&self, resource_type: &str, id: &str) -> Option<Resource<'_>> {
        let pos = *self
            .primary_index
            .get(&(resource_type.to_string(), id.to_string()))?;
        let object = match &self.raw.data {
            Some(PrimaryData::One(object)) => Some(object.as_ref()),
            Some(PrimaryData::Many(items)) => items.get(pos),
            None => None,
        }?;
        Some(self.view(object))
    }

    /// Any resource of the document, primary or included, with this type and
    /// id. Included resources never repeat primary data, so links between
    /// them need both.
    pub fn find_resource(&self, resource_type: &str, id: &str) -> Option<Resource<'_>> {
        self.included_resource(resource_type, id)
            .or_else(|| self.primary_resource_by_id(resource_type, id))
    }

    fn view<'a>(&'a self, object: &'a ResourceObject) -> Resource<'a> {
        Resource {
            object,
            document: self,
        }
    }
}

/// A resource object inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Resource<'a> {
    object: &'a ResourceObject,
    document: &'a Document,
}

impl<'a> Resource<'a> {
    pub fn resource_type(&self) -> &'a str {
        &self.object.resource_type
    }

    pub fn id(&self) -> &'a str {
        &self.object.id
    }

    pub fn attributes(&self) -> &'a Map<String, Value> {
        &self.object.attributes
    }

    pub fn has_meta(&self) -> bool {
        self.object.meta.is_some()
    }

    pub fn meta(&self) -> Option<&'a Map<String, Value>> {
        self.object.meta.as_ref()
    }

    pub fn relationship(&self, name: &str) -> Option<Relationship<'a>> {
        let document = self.document;
        self.object
            .relationships
            .get_key_value(name)
            .map(|(name, object)| Relationship {
                name,
                object,
                document,
            })
    }

    pub fn relationships(&self) -> impl Iterator<Item = Relationship<'a>> + 'a {
        let document = self.document;
        self.object
            .relationships
            .iter()
            .map(move |(name, object)| Relationship {
                name,
                object,
                document,
            })
    }

    pub fn object(&self) -> &'a ResourceObject {
        self.object
    }
}

/// A named relationship of a [`Resource`].
#[derive(Debug, Clone, Copy)]
pub struct Relationship<'a> {
    name: &'a str,
    object: &'a RelationshipObject,
    document: &'a Document,
}

impl<'a> Relationship<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn is_to_many(&self) -> bool {
        matches!(self.object.data, Some(Linkage::Many(_)))
    }

    /// The `(type, id)` links carried by the relationship.
    pub fn resource_links(&self) -> Vec<&'a ResourceLinkage> {
        match &self.object.data {
            Some(Linkage::One(link)) => vec![link],
            Some(Linkage::Many(links)) => links.iter().collect(),
            None => Vec::new(),
        }
    }

    /// Meta attached to the link pointing at `(resource_type, id)`.
    pub fn resource_link_meta(&self, resource_type: &str, id: &str) -> Option<&'a Map<String, Value>> {
        self.resource_links()
            .into_iter()
            .find(|link| link.resource_type == resource_type && link.id == id)
            .and_then(|link| link.meta.as_ref())
    }

    /// Linked resources that are present in the document, in link order.
    pub fn resource_map(&self) -> Vec<Resource<'a>> {
        let document = self.document;
        self.resource_links()
            .into_iter()
            .filter_map(|link| document.find_resource(&link.resource_type, &link.id))
            .collect()
    }

    pub fn resource(&self) -> Option<Resource<'a>> {
        self.resource_map().into_iter().next()
    }

    pub fn resources(&self) -> Vec<Resource<'a>> {
        self.resource_map()
    }

    pub fn meta(&self) -> Option<&'a Map<String, Value>> {
        self.object.meta.as_ref()
    }
}
