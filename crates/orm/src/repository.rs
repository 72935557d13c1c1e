//! Repositories reading one model class from a Drupal JSON:API backend.

use std::sync::Arc;

use async_trait::async_trait;
use drupal_jsonapi_client::{
    ClientConfig, Operator, Page, QueryBuilder, Scope, ScopeSet, Sort, Transport, UrlBuilder,
};
use drupal_jsonapi_relation::Relation;
use drupal_jsonapi_schema::{Collection, Entity, ModelClass};
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

use crate::boot::boot_if_not_booted;
use crate::mapper::{MapTarget, ResponseMapper};
use crate::resolver::{FieldResolver, ResourceFields};

/// Filter for one attribute path in [`Attributes`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeFilter {
    /// Shorthand `filter[path][value]` filter.
    Value(Value),
    /// A full condition, optionally placed in a group and with its own id.
    Condition {
        operator: Operator,
        value: Option<Value>,
        group: Option<String>,
        id: Option<String>,
    },
}

impl AttributeFilter {
    pub fn condition(operator: Operator, value: impl Into<Value>) -> Self {
        AttributeFilter::Condition {
            operator,
            value: Some(value.into()),
            group: None,
            id: None,
        }
    }

    /// `IS NULL` / `IS NOT NULL` style condition without a value.
    pub fn null_check(operator: Operator) -> Self {
        AttributeFilter::Condition {
            operator,
            value: None,
            group: None,
            id: None,
        }
    }

    fn cache_repr(&self) -> Value {
        match self {
            AttributeFilter::Value(value) => value.clone(),
            AttributeFilter::Condition {
                operator,
                value,
                group,
                id,
            } => json!([operator.as_str(), value, group, id]),
        }
    }
}

impl From<Value> for AttributeFilter {
    fn from(value: Value) -> Self {
        AttributeFilter::Value(value)
    }
}

/// Attribute filters for `find_by_attributes` / `get_by_attributes`.
///
/// ```
/// use drupal_jsonapi_client::Operator;
/// use drupal_jsonapi_orm::{AttributeFilter, Attributes};
///
/// let attributes = Attributes::new()
///     .with("status", 1)
///     .with_filter("title", AttributeFilter::condition(Operator::Contains, "rust"));
/// assert_eq!(attributes.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, AttributeFilter)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_filter(path, AttributeFilter::Value(value.into()))
    }

    /// Add a filter. A path given twice keeps the last filter.
    pub fn with_filter(mut self, path: impl Into<String>, filter: AttributeFilter) -> Self {
        self.insert(path, filter);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, filter: AttributeFilter) {
        let path = path.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == path) {
            Some(slot) => slot.1 = filter,
            None => self.0.push((path, filter)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeFilter)> {
        self.0.iter().map(|(path, filter)| (path.as_str(), filter))
    }

    /// Copy ordered by path.
    pub fn sorted(&self) -> Self {
        let mut entries = self.0.clone();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self(entries)
    }

    /// Add every filter to the builder, in this collection's order.
    pub fn apply_to(&self, builder: &mut QueryBuilder) {
        for (path, filter) in &self.0 {
            match filter {
                AttributeFilter::Value(value) => {
                    builder.add_simple_filter(path.as_str(), value.clone());
                }
                AttributeFilter::Condition {
                    operator,
                    value,
                    group,
                    id,
                } => {
                    builder.add_filter(
                        path.as_str(),
                        *operator,
                        value.clone(),
                        group.as_deref(),
                        id.as_deref(),
                    );
                }
            }
        }
    }

    /// Key-sorted JSON form used in cache keys.
    pub(crate) fn cache_repr(&self) -> Value {
        Value::Array(
            self.sorted()
                .0
                .iter()
                .map(|(path, filter)| json!([path, filter.cache_repr()]))
                .collect(),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |attributes, (path, value)| attributes.with(path, value))
    }
}

/// Read access to one model class.
///
/// Empty results and unsuccessful responses come back as `None` or an empty
/// [`Collection`]. Errors are reserved for transport failures and
/// misconfigured models or relations.
#[async_trait]
pub trait BaseRepository: Send + Sync {
    fn model_class(&self) -> ModelClass;

    fn new_entity(&self) -> Entity {
        self.model_class().new_entity()
    }

    /// Scopes applied to every request of this repository.
    fn global_scopes(&self) -> ScopeSet;

    fn is_auth_enabled(&self) -> bool;

    fn is_without_includes(&self) -> bool;

    /// Everything besides the read arguments that decides what the backend
    /// answers. Cached reads only share an entry within one namespace.
    fn cache_namespace(&self) -> String {
        self.global_scopes().cache_key()
    }

    async fn find(&self, id: &str) -> anyhow::Result<Option<Entity>>;

    async fn find_by_attributes(&self, attributes: &Attributes) -> anyhow::Result<Option<Entity>>;

    async fn find_for_relation(&self, relation: &Relation) -> anyhow::Result<Option<Entity>>;

    /// `order_by` takes the JSON:API sort syntax, `-field` sorts descending.
    async fn get_by_attributes(
        &self,
        attributes: &Attributes,
        order_by: Option<&Sort>,
        page: Option<Page>,
    ) -> anyhow::Result<Collection>;

    async fn get_by_ids(&self, ids: &[String]) -> anyhow::Result<Collection>;

    async fn get_for_relation(&self, relation: &Relation) -> anyhow::Result<Collection>;

    async fn clear_cache(&self) -> anyhow::Result<bool>;
}

/// Per-repository settings that differ from the client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// Overrides the configured API root.
    pub base_url: Option<Url>,
    pub auth_enabled: bool,
    pub without_includes: bool,
    /// Key of the boot registry entry, the resource type when unset.
    pub boot_key: Option<String>,
    /// `Some(false)` opts out of the cache decorator.
    pub caching: Option<bool>,
}

impl RepositoryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_auth_enabled(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }

    pub fn with_without_includes(mut self, without_includes: bool) -> Self {
        self.without_includes = without_includes;
        self
    }

    pub fn with_boot_key(mut self, key: impl Into<String>) -> Self {
        self.boot_key = Some(key.into());
        self
    }

    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = Some(caching);
        self
    }
}

/// Repository that talks to the backend through a [`Transport`].
#[derive(Clone)]
pub struct JsonApiRepository {
    class: ModelClass,
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    base_url: Url,
    auth_enabled: bool,
    without_includes: bool,
    boot_key: String,
    booted_scopes: Arc<ScopeSet>,
    scopes: ScopeSet,
}

impl std::fmt::Debug for JsonApiRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonApiRepository")
            .field("class", &self.class)
            .field("base_url", &self.base_url.as_str())
            .field("auth_enabled", &self.auth_enabled)
            .field("without_includes", &self.without_includes)
            .field("boot_key", &self.boot_key)
            .field("scopes", &self.global_scopes())
            .finish()
    }
}

impl JsonApiRepository {
    pub fn new(
        class: ModelClass,
        config: Arc<ClientConfig>,
        transport: Arc<dyn Transport>,
    ) -> anyhow::Result<Self> {
        Self::with_options(class, config, transport, RepositoryOptions::default())
    }

    /// Validates the model declaration and boots the repository type before
    /// returning, so a broken model fails here and not on the first request.
    pub fn with_options(
        class: ModelClass,
        config: Arc<ClientConfig>,
        transport: Arc<dyn Transport>,
        options: RepositoryOptions,
    ) -> anyhow::Result<Self> {
        class.validate()?;

        let boot_key = options
            .boot_key
            .unwrap_or_else(|| class.resource_type().to_string());
        let booted_scopes = boot_if_not_booted(&boot_key, &config);
        let base_url = options.base_url.unwrap_or_else(|| config.base_url.clone());

        Ok(Self {
            class,
            config,
            transport,
            base_url,
            auth_enabled: options.auth_enabled,
            without_includes: options.without_includes,
            boot_key,
            booted_scopes,
            scopes: ScopeSet::new(),
        })
    }

    /// Add a scope for this repository instance only.
    pub fn with_global_scope(mut self, id: impl Into<String>, scope: impl Scope + 'static) -> Self {
        self.scopes.with_scope(id, scope);
        self
    }

    /// Disable a scope, including one installed at boot.
    pub fn without_global_scope(mut self, id: &str) -> Self {
        self.scopes.without_scope(id);
        self
    }

    pub fn with_auth_enabled(mut self, enabled: bool) -> Self {
        self.auth_enabled = enabled;
        self
    }

    pub fn with_without_includes(mut self, without_includes: bool) -> Self {
        self.without_includes = without_includes;
        self
    }

    /// Share boot state under another key, booting it if needed.
    pub fn with_boot_key(mut self, key: impl Into<String>) -> Self {
        self.boot_key = key.into();
        self.booted_scopes = boot_if_not_booted(&self.boot_key, &self.config);
        self
    }

    pub fn boot_key(&self) -> &str {
        &self.boot_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn resolver(&self) -> FieldResolver {
        if self.without_includes {
            FieldResolver::without_includes()
        } else {
            FieldResolver::new()
        }
    }

    /// Builder for `{base}/{resource path}[/{id}]` with scopes, fieldsets,
    /// includes and auth applied.
    pub fn new_request_builder(&self, id: Option<&str>) -> anyhow::Result<QueryBuilder> {
        let mut url = UrlBuilder::new(&self.base_url).resource_path(&self.class.resource_path());
        if let Some(id) = id {
            url = url.segment(id);
        }

        let mut builder = self.prepare(url.build()?);
        self.apply_resource_fields(&mut builder, self.resolver().resolve(self.class));
        Ok(builder)
    }

    /// Builder for the related-resource endpoint of `relation`, with
    /// fieldsets computed across every class the relation may hold.
    pub fn new_relation_request_builder(&self, relation: &Relation) -> anyhow::Result<QueryBuilder> {
        relation.def().validate()?;
        let url = UrlBuilder::new(&self.base_url)
            .resource_path(&relation.owner().class().resource_path())
            .segment(relation.owner_id()?)
            .segment(relation.name())
            .build()?;

        let mut builder = self.prepare(url);
        self.apply_resource_fields(&mut builder, self.resolver().resolve_all(relation.classes()));
        Ok(builder)
    }

    fn prepare(&self, url: Url) -> QueryBuilder {
        let mut builder = QueryBuilder::new(url);
        builder.set_scopes(self.global_scopes());
        if self.auth_enabled {
            if let Some(credentials) = &self.config.auth {
                builder.set_basic_auth(credentials.clone());
            }
        }
        builder
    }

    fn apply_resource_fields(&self, builder: &mut QueryBuilder, resolved: ResourceFields) {
        builder.set_fields(resolved.fields);
        if !resolved.includes.is_empty() {
            builder.set_includes(resolved.includes);
        }
    }

    async fn execute(&self, builder: &QueryBuilder) -> anyhow::Result<drupal_jsonapi_client::JsonApiResponse> {
        let request = builder.build();
        let response = self.transport.send(request).await?;
        debug!(status = response.status(), "JSON:API response received");
        Ok(response)
    }
}

#[async_trait]
impl BaseRepository for JsonApiRepository {
    fn model_class(&self) -> ModelClass {
        self.class
    }

    /// Scopes installed at boot, minus the ones this instance removed, plus
    /// the ones it added.
    fn global_scopes(&self) -> ScopeSet {
        let mut merged = (*self.booted_scopes).clone();
        for id in self.scopes.removed_scope_ids() {
            if !self.scopes.contains(id) {
                merged.without_scope(id);
            }
        }
        merged.extend_from(&self.scopes);
        merged
    }

    fn is_auth_enabled(&self) -> bool {
        self.auth_enabled
    }

    fn is_without_includes(&self) -> bool {
        self.without_includes
    }

    /// The API root plus what the active scopes do to a request against it.
    fn cache_namespace(&self) -> String {
        let probe = QueryBuilder::new(self.base_url.clone());
        format!("{} {}", self.base_url, self.global_scopes().fingerprint(&probe))
    }

    #[instrument(
        name = "jsonapi.repository.find",
        skip(self),
        fields(resource = %self.class.resource_type()),
        err
    )]
    async fn find(&self, id: &str) -> anyhow::Result<Option<Entity>> {
        if id.is_empty() {
            return Ok(None);
        }
        let response = self.execute(&self.new_request_builder(Some(id))?).await?;
        Ok(ResponseMapper::entity_from_response(
            &response,
            MapTarget::Class(self.class),
        )?)
    }

    #[instrument(
        name = "jsonapi.repository.find_by_attributes",
        skip(self),
        fields(resource = %self.class.resource_type()),
        err
    )]
    async fn find_by_attributes(&self, attributes: &Attributes) -> anyhow::Result<Option<Entity>> {
        let mut builder = self.new_request_builder(None)?;
        attributes.sorted().apply_to(&mut builder);

        let response = self.execute(&builder).await?;
        Ok(ResponseMapper::entity_from_response(
            &response,
            MapTarget::Class(self.class),
        )?)
    }

    #[instrument(
        name = "jsonapi.repository.find_for_relation",
        skip(self, relation),
        fields(resource = %self.class.resource_type(), relation = %relation.name()),
        err
    )]
    async fn find_for_relation(&self, relation: &Relation) -> anyhow::Result<Option<Entity>> {
        let response = self
            .execute(&self.new_relation_request_builder(relation)?)
            .await?;
        Ok(ResponseMapper::entity_from_response(
            &response,
            MapTarget::Relation(relation.def()),
        )?)
    }

    #[instrument(
        name = "jsonapi.repository.get_by_attributes",
        skip(self),
        fields(resource = %self.class.resource_type()),
        err
    )]
    async fn get_by_attributes(
        &self,
        attributes: &Attributes,
        order_by: Option<&Sort>,
        page: Option<Page>,
    ) -> anyhow::Result<Collection> {
        let mut builder = self.new_request_builder(None)?;
        attributes.sorted().apply_to(&mut builder);
        if let Some(sort) = order_by {
            builder.set_sort(sort.clone());
        }
        if let Some(page) = page {
            builder.set_page(page);
        }

        let response = self.execute(&builder).await?;
        Ok(ResponseMapper::collection_from_response(
            &response,
            MapTarget::Class(self.class),
        )?)
    }

    #[instrument(
        name = "jsonapi.repository.get_by_ids",
        skip(self),
        fields(resource = %self.class.resource_type(), count = ids.len()),
        err
    )]
    async fn get_by_ids(&self, ids: &[String]) -> anyhow::Result<Collection> {
        if ids.is_empty() {
            return Ok(Collection::new());
        }
        let mut sorted = ids.to_vec();
        sorted.sort();

        let mut builder = self.new_request_builder(None)?;
        builder.filter_in("id", sorted);

        let response = self.execute(&builder).await?;
        Ok(ResponseMapper::collection_from_response(
            &response,
            MapTarget::Class(self.class),
        )?)
    }

    #[instrument(
        name = "jsonapi.repository.get_for_relation",
        skip(self, relation),
        fields(resource = %self.class.resource_type(), relation = %relation.name()),
        err
    )]
    async fn get_for_relation(&self, relation: &Relation) -> anyhow::Result<Collection> {
        let response = self
            .execute(&self.new_relation_request_builder(relation)?)
            .await?;
        Ok(ResponseMapper::collection_from_response(
            &response,
            MapTarget::Relation(relation.def()),
        )?)
    }

    async fn clear_cache(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{config, Article, MockTransport, Page as PageModel};
    use drupal_jsonapi_client::ClientError;
    use drupal_jsonapi_relation::{RelationAccessor, RelationOwner};
    use drupal_jsonapi_schema::SchemaError;
    use pretty_assertions::assert_eq;

    fn repository(transport: &Arc<MockTransport>) -> JsonApiRepository {
        JsonApiRepository::with_options(
            ModelClass::of::<Article>(),
            Arc::new(config()),
            transport.clone(),
            RepositoryOptions::new().with_boot_key("repository-unit"),
        )
        .unwrap()
    }

    #[test]
    fn test_attributes_sorted_by_path() {
        let attributes = Attributes::new().with("b", 2).with("a", 1).with("b", 3);
        let sorted = attributes.sorted();
        let paths: Vec<&str> = sorted.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["a", "b"]);
        assert_eq!(attributes.len(), 2);
    }

    #[test]
    fn test_attributes_apply_simple_and_condition_filters() {
        let mut builder =
            QueryBuilder::new(Url::parse("https://cms.test/jsonapi/node/article").unwrap());
        Attributes::new()
            .with("status", 1)
            .with_filter(
                "title",
                AttributeFilter::Condition {
                    operator: Operator::Contains,
                    value: Some(json!("rust")),
                    group: Some("or-group".to_string()),
                    id: Some("t".to_string()),
                },
            )
            .apply_to(&mut builder);

        let request = builder.build();
        assert_eq!(request.query_param("filter[status][value]"), Some("1"));
        assert_eq!(request.query_param("filter[t][condition][path]"), Some("title"));
        assert_eq!(
            request.query_param("filter[t][condition][memberOf]"),
            Some("or-group")
        );
    }

    #[tokio::test]
    async fn test_find_requests_resource_with_fields_and_includes() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"data": {"type": "node--article", "id": "1", "attributes": {"title": "T"}}}));

        let article = repository(&transport).find("1").await.unwrap().unwrap();
        assert_eq!(article.get_str("title"), Some("T"));

        let request = transport.last_request().unwrap();
        assert_eq!(request.base_url().as_str(), "https://cms.test/jsonapi/node/article/1");
        assert_eq!(request.query_param("fields[node--article]"), Some("title,body,author"));
        assert_eq!(request.query_param("fields[user--user]"), Some("name"));
        assert_eq!(request.query_param("include"), Some("author"));
        assert_eq!(request.query_param("_format"), Some("api_json"));
    }

    #[tokio::test]
    async fn test_find_with_empty_id_skips_request() {
        let transport = Arc::new(MockTransport::new());
        assert!(repository(&transport).find("").await.unwrap().is_none());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_ids_sorts_and_filters() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"data": []}));

        let ids = vec!["b".to_string(), "a".to_string()];
        let collection = repository(&transport).get_by_ids(&ids).await.unwrap();
        assert!(collection.is_empty());

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_param("filter[id][condition][operator]"), Some("IN"));
        assert_eq!(request.query_param("filter[id][condition][value][0]"), Some("a"));
        assert_eq!(request.query_param("filter[id][condition][value][1]"), Some("b"));

        assert!(repository(&transport).get_by_ids(&[]).await.unwrap().is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_sort_and_page_are_sent() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"data": []}));

        repository(&transport)
            .get_by_attributes(&Attributes::new(), Some(&Sort::parse("-created")), Some(Page::first(10)))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.query_param("sort"), Some("-created"));
        assert_eq!(request.query_param("page[limit]"), Some("10"));
        assert_eq!(request.query_param("page[offset]"), Some("0"));
    }

    #[tokio::test]
    async fn test_relation_request_targets_related_endpoint() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"data": []}));

        let mut page = ModelClass::of::<PageModel>().new_entity();
        page.set_id("p1");
        let media = page.relation("media").unwrap();

        let repo = repository(&transport);
        let collection = repo.get_for_relation(&media).await.unwrap();
        assert!(collection.is_empty());

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.base_url().as_str(),
            "https://cms.test/jsonapi/node/page/p1/media"
        );
        assert_eq!(request.query_param("fields[media--image]"), Some("name"));
        assert_eq!(
            request.query_param("fields[media--video]"),
            Some("name,field_media_oembed_video")
        );
        assert_eq!(request.query_param("include"), None);
    }

    #[tokio::test]
    async fn test_relation_without_owner_id_is_an_error() {
        let transport = Arc::new(MockTransport::new());
        let relation = Relation::new(
            ModelClass::of::<PageModel>().relation("tags").unwrap(),
            RelationOwner::new(ModelClass::of::<PageModel>(), None),
        );

        let err = repository(&transport)
            .get_for_relation(&relation)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::IdNotLoaded(_))
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = Arc::new(MockTransport::new());
        transport.push_failure("connection refused");

        let err = repository(&transport).find("1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_auth_is_only_sent_when_enabled() {
        let transport = Arc::new(MockTransport::new());
        transport.push_json(200, json!({"data": []}));
        transport.push_json(200, json!({"data": []}));

        let config = Arc::new(config().with_auth("api", "secret"));
        let plain = JsonApiRepository::new(ModelClass::of::<Article>(), config.clone(), transport.clone())
            .unwrap();
        plain.get_by_attributes(&Attributes::new(), None, None).await.unwrap();
        assert!(transport.last_request().unwrap().basic_auth().is_none());

        let authed = plain.with_auth_enabled(true);
        authed.get_by_attributes(&Attributes::new(), None, None).await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().basic_auth().map(|c| c.user.as_str()),
            Some("api")
        );
    }

    #[test]
    fn test_local_scopes_extend_and_remove_booted_ones() {
        crate::boot::register_boot_hook("repository-scopes", |scopes: &mut ScopeSet, _: &ClientConfig| {
            scopes.with_scope("published", |b: &mut QueryBuilder| {
                b.add_simple_filter("status", 1);
            });
        });
        let transport = Arc::new(MockTransport::new());
        let repo = JsonApiRepository::with_options(
            ModelClass::of::<Article>(),
            Arc::new(config()),
            transport,
            RepositoryOptions::new().with_boot_key("repository-scopes"),
        )
        .unwrap();

        assert!(repo.global_scopes().contains("published"));

        let repo = repo
            .with_global_scope("promoted", |b: &mut QueryBuilder| {
                b.add_simple_filter("promote", 1);
            })
            .without_global_scope("published");
        let scopes = repo.global_scopes();
        assert_eq!(scopes.ids().collect::<Vec<_>>(), vec!["promoted"]);

        let request = repo.new_request_builder(None).unwrap().build();
        assert_eq!(request.query_param("filter[promote][value]"), Some("1"));
        assert_eq!(request.query_param("filter[status][value]"), None);
    }
}
