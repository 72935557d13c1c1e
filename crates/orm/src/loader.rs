use async_trait::async_trait;
use drupal_jsonapi_relation::Relation;
use drupal_jsonapi_schema::{Collection, Entity};

use crate::factory::RepositoryFactory;

/// Fetches a relation that was not part of the original response.
///
/// ```ignore
/// let tags = article.require_relation("tags")?.load_many(&factory).await?;
/// ```
#[async_trait]
pub trait RelationLoader {
    /// Load a to-one relation. Fails for relations declared to-many.
    async fn load_one(&self, factory: &RepositoryFactory) -> anyhow::Result<Option<Entity>>;

    /// Load a to-many relation. Fails for relations declared to-one.
    async fn load_many(&self, factory: &RepositoryFactory) -> anyhow::Result<Collection>;
}

#[async_trait]
impl RelationLoader for Relation {
    async fn load_one(&self, factory: &RepositoryFactory) -> anyhow::Result<Option<Entity>> {
        self.expect_to_one()?;
        factory.for_relation(self)?.find_for_relation(self).await
    }

    async fn load_many(&self, factory: &RepositoryFactory) -> anyhow::Result<Collection> {
        self.expect_to_many()?;
        factory.for_relation(self)?.get_for_relation(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config, MockTransport, Page};
    use drupal_jsonapi_relation::RelationAccessor;
    use drupal_jsonapi_schema::{ModelClass, SchemaError};
    use serde_json::json;
    use std::sync::Arc;

    fn page() -> Entity {
        let mut page = ModelClass::of::<Page>().new_entity();
        page.set_id("p1");
        page
    }

    #[tokio::test]
    async fn test_load_many_reads_related_endpoint() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(
            200,
            json!({"data": [
                {"type": "taxonomy_term--tags", "id": "t1", "attributes": {"name": "rust"}},
                {"type": "taxonomy_term--tags", "id": "t2", "attributes": {"name": "drupal"}}
            ]}),
        );
        let factory = RepositoryFactory::new(config(), transport.clone());

        let tags = page()
            .require_relation("tags")
            .unwrap()
            .load_many(&factory)
            .await
            .unwrap();

        assert_eq!(tags.ids(), vec!["t1", "t2"]);
        assert_eq!(
            transport.last_request().unwrap().base_url().path(),
            "/jsonapi/node/page/p1/tags"
        );
    }

    #[tokio::test]
    async fn test_cardinality_is_checked_before_request() {
        let transport = Arc::new(MockTransport::new());
        let factory = RepositoryFactory::new(config(), transport.clone());

        let err = page()
            .require_relation("tags")
            .unwrap()
            .load_one(&factory)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::CardinalityMismatch { .. })
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_load_one_mixed_relation() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(
            200,
            json!({"data": {"type": "media--video", "id": "v1", "attributes": {"name": "clip"}}}),
        );
        let factory = RepositoryFactory::new(config(), transport.clone());

        let hero = page()
            .require_relation("hero")
            .unwrap()
            .load_one(&factory)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hero.resource_type(), "media--video");
        assert_eq!(hero.get_str("name"), Some("clip"));
    }
}
