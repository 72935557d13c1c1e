//! Repository construction.
//!
//! The factory owns the shared pieces (configuration, transport, cache) and
//! hands out repositories for model classes, wrapped in a [`CacheDecorator`]
//! when caching is enabled.

use std::sync::Arc;

use anyhow::anyhow;
use drupal_jsonapi_client::{ClientConfig, HttpTransport, Transport};
use drupal_jsonapi_relation::Relation;
use drupal_jsonapi_schema::{Model, ModelClass};
use tracing::debug;

use crate::cache::{CacheDecorator, CacheRepository, CacheStore, MemoryCacheStore};
use crate::registry::ModelRegistry;
use crate::repository::{BaseRepository, JsonApiRepository, RepositoryOptions};

#[derive(Clone)]
pub struct RepositoryFactory {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    cache: CacheRepository,
    models: ModelRegistry,
}

impl RepositoryFactory {
    /// Factory with an in-memory cache store.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            cache: CacheRepository::new(Arc::new(MemoryCacheStore::new())),
            models: ModelRegistry::new(),
        }
    }

    /// Factory sending requests over HTTP.
    pub fn from_config(config: ClientConfig) -> anyhow::Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache = CacheRepository::new(store);
        self
    }

    pub fn with_models(mut self, models: ModelRegistry) -> Self {
        self.models = models;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    pub fn cache(&self) -> &CacheRepository {
        &self.cache
    }

    pub fn create(&self, class: ModelClass) -> anyhow::Result<Arc<dyn BaseRepository>> {
        self.create_with(class, RepositoryOptions::default())
    }

    pub fn create_with(
        &self,
        class: ModelClass,
        options: RepositoryOptions,
    ) -> anyhow::Result<Arc<dyn BaseRepository>> {
        let cached = self.config.cache_enabled && options.caching != Some(false);
        let repository = JsonApiRepository::with_options(
            class,
            Arc::clone(&self.config),
            Arc::clone(&self.transport),
            options,
        )?;

        debug!(resource = class.resource_type(), cached, "created repository");
        if cached {
            Ok(Arc::new(CacheDecorator::new(
                repository,
                self.cache.clone(),
                self.config.cache_ttl,
            )))
        } else {
            Ok(Arc::new(repository))
        }
    }

    pub fn for_model<M: Model>(&self) -> anyhow::Result<Arc<dyn BaseRepository>> {
        self.create(ModelClass::of::<M>())
    }

    /// Repository for reading `relation`, typed by its first target class.
    pub fn for_relation(&self, relation: &Relation) -> anyhow::Result<Arc<dyn BaseRepository>> {
        relation.def().validate()?;
        let class = relation
            .classes()
            .first()
            .copied()
            .ok_or_else(|| anyhow!("relation `{}` has no target class", relation.name()))?;
        self.create(class)
    }

    /// Repository for a registered model class, `None` when no model is
    /// registered for `resource_type`.
    pub fn for_resource_type(&self, resource_type: &str) -> anyhow::Result<Option<Arc<dyn BaseRepository>>> {
        self.models
            .find_by_resource_type(resource_type)
            .map(|class| self.create(class))
            .transpose()
    }
}

impl std::fmt::Debug for RepositoryFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryFactory")
            .field("base_url", &self.config.base_url.as_str())
            .field("cache_enabled", &self.config.cache_enabled)
            .field("models", &self.models)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config, Article, MockTransport, Person};
    use drupal_jsonapi_relation::RelationAccessor;
    use serde_json::json;

    fn factory(cache: bool, transport: &Arc<MockTransport>) -> RepositoryFactory {
        RepositoryFactory::new(config().with_cache(cache), transport.clone())
    }

    #[tokio::test]
    async fn test_cached_factory_wraps_repositories() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"data": {"type": "node--article", "id": "1"}}));

        let repository = factory(true, &transport).for_model::<Article>().unwrap();
        repository.find("1").await.unwrap();
        repository.find("1").await.unwrap();
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_caching_opt_out() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"data": {"type": "node--article", "id": "1"}}));
        transport.push_json(200, json!({"data": {"type": "node--article", "id": "1"}}));

        let repository = factory(true, &transport)
            .create_with(ModelClass::of::<Article>(), RepositoryOptions::new().with_caching(false))
            .unwrap();
        repository.find("1").await.unwrap();
        repository.find("1").await.unwrap();
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn test_for_resource_type_uses_registry() {
        let transport = Arc::new(MockTransport::new());
        let mut models = ModelRegistry::new();
        models.register_model::<Person>();
        let factory = factory(false, &transport).with_models(models);

        let repository = factory.for_resource_type("user--user").unwrap().unwrap();
        assert_eq!(repository.model_class(), ModelClass::of::<Person>());
        assert!(factory.for_resource_type("node--page").unwrap().is_none());
    }

    #[test]
    fn test_for_relation_uses_target_class() {
        let transport = Arc::new(MockTransport::new());
        let article = ModelClass::of::<Article>().new_entity();
        let author = article.relation("author").unwrap();

        let repository = factory(false, &transport).for_relation(&author).unwrap();
        assert_eq!(repository.model_class(), ModelClass::of::<Person>());
    }
}
