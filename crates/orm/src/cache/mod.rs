//! Response caching for repositories.
//!
//! [`CacheStore`] is the storage seam, [`CacheRepository`] and [`TaggedCache`]
//! implement remember-style reads on top of it and [`CacheDecorator`] wraps a
//! repository with them.

mod decorator;
mod key;
mod memory;

pub use decorator::CacheDecorator;
pub use key::cache_key;
pub use memory::MemoryCacheStore;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use drupal_jsonapi_schema::{Collection, Entity};
use tracing::{debug, trace, warn};

/// A cached repository result.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Entity(Option<Entity>),
    Collection(Collection),
}

impl CachedValue {
    pub fn into_entity(self) -> anyhow::Result<Option<Entity>> {
        match self {
            CachedValue::Entity(entity) => Ok(entity),
            CachedValue::Collection(_) => bail!("cached value is a collection, expected an entity"),
        }
    }

    pub fn into_collection(self) -> anyhow::Result<Collection> {
        match self {
            CachedValue::Collection(collection) => Ok(collection),
            CachedValue::Entity(_) => bail!("cached value is an entity, expected a collection"),
        }
    }
}

/// Key-value storage with expiry and, optionally, tags.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// The value under `key`, `None` when missing or expired.
    async fn get(&self, key: &str) -> anyhow::Result<Option<CachedValue>>;

    async fn put(&self, key: &str, value: CachedValue, ttl: Duration, tags: &[String]) -> anyhow::Result<()>;

    fn supports_tags(&self) -> bool;

    /// Drop every entry carrying one of `tags`.
    async fn flush_tags(&self, tags: &[String]) -> anyhow::Result<bool>;

    async fn flush(&self) -> anyhow::Result<bool>;
}

async fn remember_in<F, Fut>(
    store: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    tags: &[String],
    producer: F,
) -> anyhow::Result<CachedValue>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = anyhow::Result<CachedValue>> + Send,
{
    if let Some(hit) = store.get(key).await? {
        trace!(key, "cache hit");
        return Ok(hit);
    }

    debug!(key, "cache miss");
    let value = producer().await?;
    store.put(key, value.clone(), ttl, tags).await?;
    Ok(value)
}

/// Remember-style access to a [`CacheStore`].
#[derive(Clone)]
pub struct CacheRepository {
    store: Arc<dyn CacheStore>,
}

impl CacheRepository {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn supports_tags(&self) -> bool {
        self.store.supports_tags()
    }

    pub fn tags<I, S>(&self, tags: I) -> TaggedCache
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TaggedCache {
            store: Arc::clone(&self.store),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Return the cached value for `key`, or produce and store it. A failing
    /// producer stores nothing.
    pub async fn remember<F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> anyhow::Result<CachedValue>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<CachedValue>> + Send,
    {
        remember_in(self.store.as_ref(), key, ttl, &[], producer).await
    }

    pub async fn flush(&self) -> anyhow::Result<bool> {
        self.store.flush().await
    }
}

impl std::fmt::Debug for CacheRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRepository")
            .field("supports_tags", &self.supports_tags())
            .finish()
    }
}

/// A [`CacheRepository`] view whose entries carry a tag list.
///
/// On stores without tag support the tags are dropped: reads share one
/// namespace and [`TaggedCache::flush`] flushes the whole store.
#[derive(Clone)]
pub struct TaggedCache {
    store: Arc<dyn CacheStore>,
    tags: Vec<String>,
}

impl TaggedCache {
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub async fn remember<F, Fut>(&self, key: &str, ttl: Duration, producer: F) -> anyhow::Result<CachedValue>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = anyhow::Result<CachedValue>> + Send,
    {
        let tags: &[String] = if self.store.supports_tags() {
            &self.tags
        } else {
            &[]
        };
        remember_in(self.store.as_ref(), key, ttl, tags, producer).await
    }

    pub async fn flush(&self) -> anyhow::Result<bool> {
        if self.store.supports_tags() {
            self.store.flush_tags(&self.tags).await
        } else {
            warn!(tags = ?self.tags, "cache store has no tag support, flushing everything");
            self.store.flush().await
        }
    }
}
