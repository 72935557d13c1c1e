use std::fmt;

use crate::{HasMeta, Meta, SchemaError, SchemaResult};

/// A `(type, id)` reference to a resource as found in a relationship link,
/// optionally carrying the link's own meta.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceIdentifier {
    resource_type: String,
    id: String,
    meta: Option<Meta>,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> SchemaResult<Self> {
        let resource_type = resource_type.into();
        let id = id.into();

        if resource_type.is_empty() {
            return Err(SchemaError::EmptyIdentifierType);
        }
        if id.is_empty() {
            return Err(SchemaError::EmptyIdentifierId);
        }

        Ok(Self {
            resource_type,
            id,
            meta: None,
        })
    }

    /// Attach the link meta. Consumes the identifier so it stays immutable
    /// once handed out.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn matches(&self, resource_type: &str, id: &str) -> bool {
        self.resource_type == resource_type && self.id == id
    }
}

impl HasMeta for ResourceIdentifier {
    fn meta(&self) -> SchemaResult<&Meta> {
        self.meta
            .as_ref()
            .ok_or_else(|| SchemaError::MissingMeta(self.to_string()))
    }

    fn has_meta(&self) -> bool {
        self.meta.is_some()
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id)
    }
}

/// The identifiers captured for one relationship, in link order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceIdentifierCollection(Vec<ResourceIdentifier>);

impl ResourceIdentifierCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, identifier: ResourceIdentifier) {
        self.0.push(identifier);
    }

    pub fn find(&self, resource_type: &str, id: &str) -> Option<&ResourceIdentifier> {
        self.0.iter().find(|ident| ident.matches(resource_type, id))
    }

    pub fn first(&self) -> Option<&ResourceIdentifier> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceIdentifier> {
        self.0.iter()
    }
}

impl FromIterator<ResourceIdentifier> for ResourceIdentifierCollection {
    fn from_iter<I: IntoIterator<Item = ResourceIdentifier>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResourceIdentifierCollection {
    type Item = &'a ResourceIdentifier;
    type IntoIter = std::slice::Iter<'a, ResourceIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejects_empty_parts() {
        assert_eq!(
            ResourceIdentifier::new("", "1").unwrap_err(),
            SchemaError::EmptyIdentifierType
        );
        assert_eq!(
            ResourceIdentifier::new("node--article", "").unwrap_err(),
            SchemaError::EmptyIdentifierId
        );
    }

    #[test]
    fn test_meta_round_trips_through_identifier() {
        let meta = Meta::new(json!({"role": "lead"}).as_object().cloned().unwrap());
        let ident = ResourceIdentifier::new("user--user", "9")
            .unwrap()
            .with_meta(meta.clone());

        assert!(ident.has_meta());
        assert_eq!(ident.meta().unwrap(), &meta);
    }

    #[test]
    fn test_missing_meta_is_an_error() {
        let ident = ResourceIdentifier::new("user--user", "9").unwrap();
        assert!(!ident.has_meta());
        assert_eq!(
            ident.meta().unwrap_err(),
            SchemaError::MissingMeta("user--user:9".to_string())
        );
    }

    #[test]
    fn test_collection_find() {
        let idents: ResourceIdentifierCollection = ["1", "2"]
            .into_iter()
            .map(|id| ResourceIdentifier::new("taxonomy_term--tags", id).unwrap())
            .collect();

        assert_eq!(idents.len(), 2);
        assert_eq!(
            idents.find("taxonomy_term--tags", "2").map(|i| i.id()),
            Some("2")
        );
        assert!(idents.find("taxonomy_term--tags", "3").is_none());
        assert_eq!(idents.first().map(|i| i.id()), Some("1"));
    }
}
