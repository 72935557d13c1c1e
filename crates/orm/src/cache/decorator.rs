use std::time::Duration;

use async_trait::async_trait;
use drupal_jsonapi_client::{Page, ScopeSet, Sort};
use drupal_jsonapi_relation::Relation;
use drupal_jsonapi_schema::{Collection, Entity, ModelClass};
use serde_json::{json, Value};
use tracing::instrument;

use super::{cache_key, CacheRepository, CachedValue, TaggedCache};
use crate::repository::{Attributes, BaseRepository};

const SHARED_TAG: &str = "jsonapi";

/// Caches the reads of a wrapped repository.
///
/// Entries are tagged with the model's resource type and `jsonapi`;
/// [`BaseRepository::clear_cache`] drops the resource type's entries. Errors
/// of the wrapped repository pass through and are never cached.
pub struct CacheDecorator<R> {
    repository: R,
    cache: CacheRepository,
    ttl: Duration,
}

impl<R: BaseRepository> CacheDecorator<R> {
    pub fn new(repository: R, cache: CacheRepository, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
        }
    }

    pub fn inner(&self) -> &R {
        &self.repository
    }

    fn resource_type(&self) -> &'static str {
        self.repository.model_class().resource_type()
    }

    fn store(&self) -> TaggedCache {
        self.cache.tags([self.resource_type(), SHARED_TAG])
    }

    /// Relation reads may hold any of the relation's classes, so clearing
    /// one of them drops the entry as well.
    fn relation_store(&self, relation: &Relation) -> TaggedCache {
        let mut tags = vec![self.resource_type()];
        for class in relation.classes() {
            if !tags.contains(&class.resource_type()) {
                tags.push(class.resource_type());
            }
        }
        tags.push(SHARED_TAG);
        self.cache.tags(tags)
    }

    fn key(&self, method: &str, arguments: Value) -> String {
        cache_key(
            self.resource_type(),
            method,
            &arguments,
            &self.repository.cache_namespace(),
            self.repository.is_auth_enabled(),
            self.repository.is_without_includes(),
        )
    }
}

fn relation_repr(relation: &Relation) -> Value {
    json!({
        "owner": relation.owner().resource_type(),
        "owner_id": relation.owner_id().ok(),
        "name": relation.name(),
    })
}

impl<R> std::fmt::Debug for CacheDecorator<R>
where
    R: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheDecorator")
            .field("repository", &self.repository)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[async_trait]
impl<R: BaseRepository> BaseRepository for CacheDecorator<R> {
    fn model_class(&self) -> ModelClass {
        self.repository.model_class()
    }

    fn global_scopes(&self) -> ScopeSet {
        self.repository.global_scopes()
    }

    fn is_auth_enabled(&self) -> bool {
        self.repository.is_auth_enabled()
    }

    fn is_without_includes(&self) -> bool {
        self.repository.is_without_includes()
    }

    fn cache_namespace(&self) -> String {
        self.repository.cache_namespace()
    }

    #[instrument(name = "jsonapi.cache.find", skip(self), fields(resource = %self.resource_type()), err)]
    async fn find(&self, id: &str) -> anyhow::Result<Option<Entity>> {
        let key = self.key("find", json!([id]));
        self.store()
            .remember(&key, self.ttl, || async {
                Ok::<_, anyhow::Error>(CachedValue::Entity(self.repository.find(id).await?))
            })
            .await?
            .into_entity()
    }

    #[instrument(
        name = "jsonapi.cache.find_by_attributes",
        skip(self),
        fields(resource = %self.resource_type()),
        err
    )]
    async fn find_by_attributes(&self, attributes: &Attributes) -> anyhow::Result<Option<Entity>> {
        let attributes = attributes.sorted();
        let key = self.key("find_by_attributes", json!([attributes.cache_repr()]));
        self.store()
            .remember(&key, self.ttl, || async {
                Ok::<_, anyhow::Error>(CachedValue::Entity(
                    self.repository.find_by_attributes(&attributes).await?,
                ))
            })
            .await?
            .into_entity()
    }

    #[instrument(
        name = "jsonapi.cache.find_for_relation",
        skip(self, relation),
        fields(resource = %self.resource_type(), relation = %relation.name()),
        err
    )]
    async fn find_for_relation(&self, relation: &Relation) -> anyhow::Result<Option<Entity>> {
        let key = self.key("find_for_relation", json!([relation_repr(relation)]));
        self.relation_store(relation)
            .remember(&key, self.ttl, || async {
                Ok::<_, anyhow::Error>(CachedValue::Entity(
                    self.repository.find_for_relation(relation).await?,
                ))
            })
            .await?
            .into_entity()
    }

    #[instrument(
        name = "jsonapi.cache.get_by_attributes",
        skip(self),
        fields(resource = %self.resource_type()),
        err
    )]
    async fn get_by_attributes(
        &self,
        attributes: &Attributes,
        order_by: Option<&Sort>,
        page: Option<Page>,
    ) -> anyhow::Result<Collection> {
        let attributes = attributes.sorted();
        let key = self.key(
            "get_by_attributes",
            json!([
                attributes.cache_repr(),
                order_by.map(Sort::to_query_value),
                page.map(|page| [page.offset, page.limit]),
            ]),
        );
        self.store()
            .remember(&key, self.ttl, || async {
                Ok::<_, anyhow::Error>(CachedValue::Collection(
                    self.repository
                        .get_by_attributes(&attributes, order_by, page)
                        .await?,
                ))
            })
            .await?
            .into_collection()
    }

    #[instrument(
        name = "jsonapi.cache.get_by_ids",
        skip(self),
        fields(resource = %self.resource_type(), count = ids.len()),
        err
    )]
    async fn get_by_ids(&self, ids: &[String]) -> anyhow::Result<Collection> {
        let mut sorted = ids.to_vec();
        sorted.sort();
        let key = self.key("get_by_ids", json!([sorted]));
        self.store()
            .remember(&key, self.ttl, || async {
                Ok::<_, anyhow::Error>(CachedValue::Collection(
                    self.repository.get_by_ids(&sorted).await?,
                ))
            })
            .await?
            .into_collection()
    }

    #[instrument(
        name = "jsonapi.cache.get_for_relation",
        skip(self, relation),
        fields(resource = %self.resource_type(), relation = %relation.name()),
        err
    )]
    async fn get_for_relation(&self, relation: &Relation) -> anyhow::Result<Collection> {
        let key = self.key("get_for_relation", json!([relation_repr(relation)]));
        self.relation_store(relation)
            .remember(&key, self.ttl, || async {
                Ok::<_, anyhow::Error>(CachedValue::Collection(
                    self.repository.get_for_relation(relation).await?,
                ))
            })
            .await?
            .into_collection()
    }

    async fn clear_cache(&self) -> anyhow::Result<bool> {
        self.cache.tags([self.resource_type()]).flush().await
    }
}
