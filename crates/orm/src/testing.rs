//! Test helpers for repository tests.
//!
//! Fixture models, a queue-backed [`MockTransport`] and a
//! [`CountingRepository`] that records how often each read ran.
//!
//! # Example
//! ```ignore
//! use drupal_jsonapi_orm::testing::{config, Article, MockTransport};
//!
//! #[tokio::test]
//! async fn my_test() -> anyhow::Result<()> {
//!     let transport = Arc::new(MockTransport::new());
//!     transport.push_json(200, json!({"data": []}));
//!     let repository = JsonApiRepository::new(ModelClass::of::<Article>(), Arc::new(config()), transport.clone())?;
//!     assert!(repository.get_by_ids(&["1".into()]).await?.is_empty());
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use drupal_jsonapi_client::{
    ClientConfig, ClientError, ClientResult, Document, JsonApiRequest, JsonApiResponse, Page as PageSpec,
    ScopeSet, Sort, Transport,
};
use drupal_jsonapi_relation::Relation;
use drupal_jsonapi_schema::{Collection, Entity, Model, ModelClass, RelationDef};
use serde_json::Value;
use url::Url;

use crate::repository::{Attributes, BaseRepository};

pub const TEST_BASE_URL: &str = "https://cms.test/jsonapi";

/// Configuration pointing at [`TEST_BASE_URL`] with caching disabled.
pub fn config() -> ClientConfig {
    ClientConfig::new(Url::parse(TEST_BASE_URL).expect("test base URL is valid"))
}

/// Install a fmt subscriber writing to the test output. `RUST_LOG` controls
/// the filter. Safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Fixture models
// ============================================================================

pub struct Person;

impl Model for Person {
    const RESOURCE_TYPE: &'static str = "user--user";

    fn fields() -> &'static [&'static str] {
        &["name"]
    }
}

pub struct Tag;

impl Model for Tag {
    const RESOURCE_TYPE: &'static str = "taxonomy_term--tags";

    fn fields() -> &'static [&'static str] {
        &["name"]
    }
}

pub struct Image;

impl Model for Image {
    const RESOURCE_TYPE: &'static str = "media--image";

    fn fields() -> &'static [&'static str] {
        &["name"]
    }
}

pub struct Video;

impl Model for Video {
    const RESOURCE_TYPE: &'static str = "media--video";

    fn fields() -> &'static [&'static str] {
        &["name", "field_media_oembed_video"]
    }
}

pub struct Article;

impl Model for Article {
    const RESOURCE_TYPE: &'static str = "node--article";

    fn fields() -> &'static [&'static str] {
        &["title", "body"]
    }

    fn includes() -> &'static [&'static str] {
        &["author"]
    }

    fn relations() -> Vec<RelationDef> {
        vec![RelationDef::has_one::<Person>("author")]
    }
}

/// Every relation shape. `uid` is declared but not included and
/// `field_missing` is included without a declaration.
pub struct Page;

impl Model for Page {
    const RESOURCE_TYPE: &'static str = "node--page";

    fn fields() -> &'static [&'static str] {
        &["title", "created", "changed"]
    }

    fn includes() -> &'static [&'static str] {
        &["tags", "media", "hero", "field_missing"]
    }

    fn relations() -> Vec<RelationDef> {
        let media = vec![ModelClass::of::<Image>(), ModelClass::of::<Video>()];
        vec![
            RelationDef::has_many::<Tag>("tags"),
            RelationDef::has_many_mixed("media", media.clone()),
            RelationDef::has_one_mixed("hero", media),
            RelationDef::has_one::<Person>("uid"),
        ]
    }
}

/// Includes [`Author`], which includes `Book` again.
pub struct Book;

impl Model for Book {
    const RESOURCE_TYPE: &'static str = "node--book";

    fn fields() -> &'static [&'static str] {
        &["title"]
    }

    fn includes() -> &'static [&'static str] {
        &["author"]
    }

    fn relations() -> Vec<RelationDef> {
        vec![RelationDef::has_one::<Author>("author")]
    }
}

pub struct Author;

impl Model for Author {
    const RESOURCE_TYPE: &'static str = "node--author";

    fn fields() -> &'static [&'static str] {
        &["name"]
    }

    fn includes() -> &'static [&'static str] {
        &["books"]
    }

    fn relations() -> Vec<RelationDef> {
        vec![RelationDef::has_many::<Book>("books")]
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// MockTransport
// ============================================================================

/// [`Transport`] answering from a queue and recording every request.
/// Sending with an empty queue fails like an unreachable server.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<ClientResult<JsonApiResponse>>>,
    requests: Mutex<Vec<JsonApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: JsonApiResponse) {
        lock(&self.responses).push_back(Ok(response));
    }

    /// Queue a JSON body. Bodies that are not JSON:API documents leave the
    /// response without a document.
    pub fn push_json(&self, status: u16, body: Value) {
        let document = Document::from_value(body).ok();
        self.push_response(JsonApiResponse::new(status, document));
    }

    /// Queue a transport failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        lock(&self.responses).push_back(Err(ClientError::Unavailable(message.into())));
    }

    pub fn requests(&self) -> Vec<JsonApiRequest> {
        lock(&self.requests).clone()
    }

    pub fn last_request(&self) -> Option<JsonApiRequest> {
        lock(&self.requests).last().cloned()
    }

    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: JsonApiRequest) -> ClientResult<JsonApiResponse> {
        lock(&self.requests).push(request);
        let next = lock(&self.responses).pop_front();
        next.unwrap_or_else(|| Err(ClientError::Unavailable("no response queued".to_string())))
    }
}

// ============================================================================
// CountingRepository
// ============================================================================

/// [`BaseRepository`] that answers every read with placeholder entities and
/// counts the calls per method.
#[derive(Debug)]
pub struct CountingRepository {
    class: ModelClass,
    calls: Mutex<HashMap<&'static str, usize>>,
    last_ids: Mutex<Option<Vec<String>>>,
    fail_next: Mutex<Option<String>>,
}

impl CountingRepository {
    pub fn new(class: ModelClass) -> Self {
        Self {
            class,
            calls: Mutex::new(HashMap::new()),
            last_ids: Mutex::new(None),
            fail_next: Mutex::new(None),
        }
    }

    pub fn calls(&self, method: &str) -> usize {
        lock(&self.calls).get(method).copied().unwrap_or(0)
    }

    /// Ids passed to the last `get_by_ids` call.
    pub fn last_ids(&self) -> Option<Vec<String>> {
        lock(&self.last_ids).clone()
    }

    /// Make the next read fail with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *lock(&self.fail_next) = Some(message.into());
    }

    fn record(&self, method: &'static str) -> anyhow::Result<()> {
        *lock(&self.calls).entry(method).or_insert(0) += 1;
        match lock(&self.fail_next).take() {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        }
    }

    fn entity(&self, id: &str) -> Entity {
        let mut entity = self.class.new_entity();
        entity.set_id(id);
        entity
    }
}

#[async_trait]
impl BaseRepository for CountingRepository {
    fn model_class(&self) -> ModelClass {
        self.class
    }

    fn global_scopes(&self) -> ScopeSet {
        ScopeSet::new()
    }

    fn is_auth_enabled(&self) -> bool {
        false
    }

    fn is_without_includes(&self) -> bool {
        false
    }

    async fn find(&self, id: &str) -> anyhow::Result<Option<Entity>> {
        self.record("find")?;
        Ok(Some(self.entity(id)))
    }

    async fn find_by_attributes(&self, _attributes: &Attributes) -> anyhow::Result<Option<Entity>> {
        self.record("find_by_attributes")?;
        Ok(None)
    }

    async fn find_for_relation(&self, _relation: &Relation) -> anyhow::Result<Option<Entity>> {
        self.record("find_for_relation")?;
        Ok(None)
    }

    async fn get_by_attributes(
        &self,
        _attributes: &Attributes,
        _order_by: Option<&Sort>,
        _page: Option<PageSpec>,
    ) -> anyhow::Result<Collection> {
        self.record("get_by_attributes")?;
        Ok(Collection::new())
    }

    async fn get_by_ids(&self, ids: &[String]) -> anyhow::Result<Collection> {
        self.record("get_by_ids")?;
        *lock(&self.last_ids) = Some(ids.to_vec());
        Ok(ids.iter().map(|id| self.entity(id)).collect())
    }

    async fn get_for_relation(&self, _relation: &Relation) -> anyhow::Result<Collection> {
        self.record("get_for_relation")?;
        Ok(Collection::new())
    }

    async fn clear_cache(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}
