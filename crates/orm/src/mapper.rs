//! Response mapping.
//!
//! Turns resources of a JSON:API document into [`Entity`] values: attributes,
//! id and meta first, then the identifiers of every declared relationship the
//! resource carries, then the included relations the model asks for.

use drupal_jsonapi_client::{JsonApiResponse, Resource};
use drupal_jsonapi_schema::{
    Collection, Entity, Meta, ModelClass, RelationDef, RelationValue, ResourceIdentifier,
    ResourceIdentifierCollection, SchemaResult,
};
use tracing::trace;

/// What a resource should be mapped onto.
#[derive(Debug, Clone, Copy)]
pub enum MapTarget<'a> {
    /// Always this class.
    Class(ModelClass),
    /// The class the relation resolves for the resource's type.
    Relation(&'a RelationDef),
}

impl MapTarget<'_> {
    fn resolve(&self, resource_type: &str) -> Option<ModelClass> {
        match self {
            MapTarget::Class(class) => Some(*class),
            MapTarget::Relation(def) => def.target().resolve(resource_type),
        }
    }
}

impl From<ModelClass> for MapTarget<'_> {
    fn from(class: ModelClass) -> Self {
        MapTarget::Class(class)
    }
}

impl<'a> From<&'a RelationDef> for MapTarget<'a> {
    fn from(def: &'a RelationDef) -> Self {
        MapTarget::Relation(def)
    }
}

#[derive(Debug, Default)]
pub struct ResponseMapper {
    /// Resources currently being mapped, outermost first.
    ancestors: Vec<(String, String)>,
}

impl ResponseMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the primary resource of a successful response. Unsuccessful
    /// responses and responses without primary data map to `None`.
    pub fn entity_from_response(
        response: &JsonApiResponse,
        target: MapTarget<'_>,
    ) -> SchemaResult<Option<Entity>> {
        let Some(document) = response.successful_document() else {
            return Ok(None);
        };
        match document.primary_resource() {
            Some(resource) => Self::new().to_entity(resource, target),
            None => Ok(None),
        }
    }

    /// Map all primary resources of a successful response. Anything else maps
    /// to an empty collection.
    pub fn collection_from_response(
        response: &JsonApiResponse,
        target: MapTarget<'_>,
    ) -> SchemaResult<Collection> {
        let Some(document) = response.successful_document() else {
            return Ok(Collection::new());
        };
        Self::new().to_collection(document.primary_resources(), target)
    }

    /// Map one resource. `None` when the target cannot resolve a class for
    /// the resource's type.
    pub fn to_entity(
        &mut self,
        resource: Resource<'_>,
        target: MapTarget<'_>,
    ) -> SchemaResult<Option<Entity>> {
        match target.resolve(resource.resource_type()) {
            Some(class) => self.map_resource(resource, class).map(Some),
            None => {
                trace!(
                    resource_type = resource.resource_type(),
                    id = resource.id(),
                    "no model class for related resource, skipping"
                );
                Ok(None)
            }
        }
    }

    /// Map resources in order, skipping the ones without a matching class.
    pub fn to_collection<'d, I>(&mut self, resources: I, target: MapTarget<'_>) -> SchemaResult<Collection>
    where
        I: IntoIterator<Item = Resource<'d>>,
    {
        let mut collection = Collection::new();
        for resource in resources {
            if let Some(entity) = self.to_entity(resource, target)? {
                collection.push(entity);
            }
        }
        Ok(collection)
    }

    fn map_resource(&mut self, resource: Resource<'_>, class: ModelClass) -> SchemaResult<Entity> {
        let mut entity = class.new_entity();
        if let Some(meta) = resource.meta() {
            entity.set_meta(Meta::new(meta.clone()));
        }
        entity.populate(resource.attributes().clone());
        entity.set_id(resource.id());

        for relationship in resource.relationships() {
            if class.relation(relationship.name()).is_none() {
                continue;
            }

            let mut identifiers = ResourceIdentifierCollection::new();
            for link in relationship.resource_links() {
                let mut identifier = ResourceIdentifier::new(&link.resource_type, &link.id)?;
                if let Some(meta) = relationship.resource_link_meta(&link.resource_type, &link.id) {
                    identifier = identifier.with_meta(Meta::new(meta.clone()));
                }
                identifiers.push(identifier);
            }
            if !identifiers.is_empty() {
                entity.set_relation_identifiers(relationship.name(), identifiers)?;
            }
        }

        let key = (resource.resource_type().to_string(), resource.id().to_string());
        if self.ancestors.contains(&key) {
            // already being mapped further up; stop before following its relations again
            Self::empty_to_many(&mut entity, class)?;
            return Ok(entity);
        }
        self.ancestors.push(key);
        let populated = self.populate_relations(&mut entity, resource, class);
        self.ancestors.pop();
        populated?;

        Ok(entity)
    }

    /// Give every included to-many relation an empty collection.
    fn empty_to_many(entity: &mut Entity, class: ModelClass) -> SchemaResult<()> {
        for name in class.includes() {
            if class.relation(name).is_some_and(|def| def.is_to_many()) {
                entity.set_relation(name, RelationValue::Many(Collection::new()))?;
            }
        }
        Ok(())
    }

    fn populate_relations(
        &mut self,
        entity: &mut Entity,
        resource: Resource<'_>,
        class: ModelClass,
    ) -> SchemaResult<()> {
        for name in class.includes() {
            let Some(def) = class.relation(name) else {
                continue;
            };

            let related = resource
                .relationship(name)
                .map(|relationship| relationship.resource_map())
                .unwrap_or_default();

            let value = if def.is_to_many() {
                Some(RelationValue::Many(
                    self.to_collection(related, MapTarget::Relation(&def))?,
                ))
            } else {
                match related.into_iter().next() {
                    Some(first) => self
                        .to_entity(first, MapTarget::Relation(&def))?
                        .map(RelationValue::from),
                    None => None,
                }
            };

            if let Some(value) = value {
                entity.set_relation(name, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Article, Author, Book, Page};
    use drupal_jsonapi_client::Document;
    use drupal_jsonapi_relation::RelationAccessor;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn response(body: serde_json::Value) -> JsonApiResponse {
        JsonApiResponse::new(200, Some(Document::from_value(body).unwrap()))
    }

    #[test]
    fn test_article_with_included_author() {
        let response = response(json!({
            "data": {
                "type": "node--article", "id": "1",
                "attributes": {"title": "T", "body": "B"},
                "relationships": {"author": {"data": {"type": "user--user", "id": "9"}}}
            },
            "included": [{"type": "user--user", "id": "9", "attributes": {"name": "N"}}]
        }));

        let article = ResponseMapper::entity_from_response(
            &response,
            MapTarget::Class(ModelClass::of::<Article>()),
        )
        .unwrap()
        .unwrap();

        assert_eq!(article.id().unwrap(), "1");
        assert_eq!(article.get_str("title"), Some("T"));
        let author = article.related("author").unwrap();
        assert_eq!(author.resource_type(), "user--user");
        assert_eq!(author.id().unwrap(), "9");
        assert_eq!(author.get_str("name"), Some("N"));
        assert_eq!(article.relation_identifier("author").unwrap().id(), "9");
    }

    #[test]
    fn test_to_many_without_data_is_empty_collection() {
        let response = response(json!({
            "data": {"type": "node--page", "id": "p1", "attributes": {"title": "Home"}}
        }));

        let page = ResponseMapper::entity_from_response(&response, ModelClass::of::<Page>().into())
            .unwrap()
            .unwrap();

        assert!(page.related_many("tags").unwrap().is_empty());
        assert!(page.related_many("media").unwrap().is_empty());
        // to-one without data stays unset
        assert!(!page.relation_loaded("hero"));
    }

    #[test]
    fn test_mixed_relation_skips_unknown_types() {
        let response = response(json!({
            "data": {
                "type": "node--page", "id": "p1",
                "attributes": {"title": "Home"},
                "relationships": {
                    "media": {"data": [
                        {"type": "media--image", "id": "i1"},
                        {"type": "media--audio", "id": "a1"},
                        {"type": "media--video", "id": "v1"}
                    ]},
                    "hero": {"data": {"type": "media--audio", "id": "a1"}}
                }
            },
            "included": [
                {"type": "media--image", "id": "i1", "attributes": {"name": "img"}},
                {"type": "media--audio", "id": "a1", "attributes": {"name": "snd"}},
                {"type": "media--video", "id": "v1", "attributes": {"name": "vid"}}
            ]
        }));

        let page = ResponseMapper::entity_from_response(&response, ModelClass::of::<Page>().into())
            .unwrap()
            .unwrap();

        let media = page.related_many("media").unwrap();
        let types: Vec<&str> = media.iter().map(|m| m.resource_type()).collect();
        assert_eq!(types, vec!["media--image", "media--video"]);
        assert!(!page.relation_loaded("hero"));
        // identifiers are still captured for the skipped link
        assert_eq!(page.relation_identifiers("media").unwrap().len(), 3);
    }

    #[test]
    fn test_link_meta_captured_for_non_included_relation() {
        let response = response(json!({
            "data": {
                "type": "node--page", "id": "p1",
                "attributes": {"title": "Home"},
                "relationships": {
                    "uid": {"data": {"type": "user--user", "id": "9", "meta": {"role": "owner"}}},
                    "unknown": {"data": {"type": "user--user", "id": "10"}}
                }
            }
        }));

        let page = ResponseMapper::entity_from_response(&response, ModelClass::of::<Page>().into())
            .unwrap()
            .unwrap();

        let meta = page.relation_meta("uid", "user--user", "9").unwrap();
        assert_eq!(meta.get("role"), Some(&json!("owner")));
        assert!(!page.relation_loaded("uid"));
        assert!(page.relation_identifiers("unknown").is_none());
        assert!(page.relation("uid").is_some());
    }

    #[test]
    fn test_resource_meta_is_attached() {
        let response = response(json!({
            "data": [
                {"type": "node--article", "id": "1", "attributes": {"title": "A"}, "meta": {"score": 3}},
                {"type": "node--article", "id": "2", "attributes": {"title": "B"}}
            ]
        }));

        let collection =
            ResponseMapper::collection_from_response(&response, ModelClass::of::<Article>().into())
                .unwrap();

        assert_eq!(collection.len(), 2);
        let first = collection.find("node--article", "1").unwrap();
        assert_eq!(first.meta().unwrap().get("score"), Some(&json!(3)));
        assert!(collection.find("node--article", "2").unwrap().meta().is_err());
    }

    #[test]
    fn test_unsuccessful_response_maps_to_nothing() {
        let failed = JsonApiResponse::new(
            404,
            Some(Document::from_value(json!({"errors": [{"status": "404"}]})).unwrap()),
        );
        let class = ModelClass::of::<Article>();

        assert!(ResponseMapper::entity_from_response(&failed, class.into())
            .unwrap()
            .is_none());
        assert!(ResponseMapper::collection_from_response(&failed, class.into())
            .unwrap()
            .is_empty());

        let no_body = JsonApiResponse::new(500, None);
        assert!(ResponseMapper::collection_from_response(&no_body, class.into())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_cyclic_included_resources_terminate() {
        let response = response(json!({
            "data": {
                "type": "node--book", "id": "b1",
                "attributes": {"title": "One"},
                "relationships": {"author": {"data": {"type": "node--author", "id": "a1"}}}
            },
            "included": [
                {
                    "type": "node--author", "id": "a1",
                    "attributes": {"name": "Ann"},
                    "relationships": {"books": {"data": [{"type": "node--book", "id": "b2"}]}}
                },
                {
                    "type": "node--book", "id": "b2",
                    "attributes": {"title": "Two"},
                    "relationships": {"author": {"data": {"type": "node--author", "id": "a1"}}}
                }
            ]
        }));

        let book = ResponseMapper::entity_from_response(&response, ModelClass::of::<Book>().into())
            .unwrap()
            .unwrap();

        let author = book.related("author").unwrap();
        assert_eq!(author.class(), ModelClass::of::<Author>());
        let second = author.related_many("books").unwrap().first().unwrap();
        assert_eq!(second.get_str("title"), Some("Two"));

        let again = second.related("author").unwrap();
        assert_eq!(again.id().unwrap(), "a1");
        // the cycle is cut: the repeated author keeps its identifiers and an
        // empty books collection
        assert!(again.related_many("books").unwrap().is_empty());
        assert_eq!(again.relation_identifier("books").unwrap().id(), "b2");
    }

    #[test]
    fn test_included_resource_links_back_to_primary() {
        let response = response(json!({
            "data": {
                "type": "node--book", "id": "b1",
                "attributes": {"title": "One"},
                "relationships": {"author": {"data": {"type": "node--author", "id": "a1"}}}
            },
            "included": [
                {
                    "type": "node--author", "id": "a1",
                    "attributes": {"name": "Ann"},
                    "relationships": {"books": {"data": [
                        {"type": "node--book", "id": "b1"},
                        {"type": "node--book", "id": "b2"}
                    ]}}
                },
                {"type": "node--book", "id": "b2", "attributes": {"title": "Two"}}
            ]
        }));

        let book = ResponseMapper::entity_from_response(&response, ModelClass::of::<Book>().into())
            .unwrap()
            .unwrap();

        let books = book.related("author").unwrap().related_many("books").unwrap();
        assert_eq!(books.ids(), vec!["b1", "b2"]);
        let first = books.first().unwrap();
        assert_eq!(first.get_str("title"), Some("One"));
        assert!(!first.relation_loaded("author"));
    }
}
