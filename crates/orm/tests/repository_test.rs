//! End-to-end repository behaviour against a mocked transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use drupal_jsonapi_orm::prelude::*;
use drupal_jsonapi_orm::testing::{config, init_tracing, Article, Book, MockTransport, Page as PageModel, Person};
use drupal_jsonapi_client::JsonApiResponse;
use drupal_jsonapi_orm::{register_boot_hook, ClientError, FieldResolver};
use pretty_assertions::assert_eq;
use serde_json::json;

fn article_repository(transport: &Arc<MockTransport>) -> JsonApiRepository {
    JsonApiRepository::with_options(
        ModelClass::of::<Article>(),
        Arc::new(config()),
        transport.clone(),
        RepositoryOptions::new().with_boot_key("repository-test.article"),
    )
    .unwrap()
}

// ============================================================================
// Field and include resolution
// ============================================================================

#[test]
fn test_cyclic_include_graph_has_one_fieldset_per_type() {
    let resolved = FieldResolver::new().resolve(ModelClass::of::<Book>());

    let types: Vec<&str> = resolved.fields.iter().map(|(ty, _)| ty.as_str()).collect();
    assert_eq!(types, vec!["node--book", "node--author"]);
    assert_eq!(resolved.includes, vec!["author.books".to_string()]);
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_article_with_author_scenario() {
    init_tracing();
    let transport = Arc::new(MockTransport::new());
    transport.push_json(
        200,
        json!({
            "data": {
                "type": "node--article", "id": "1",
                "attributes": {"title": "T", "body": "B"},
                "relationships": {"author": {"data": {"type": "user--user", "id": "9"}}}
            },
            "included": [{"type": "user--user", "id": "9", "attributes": {"name": "N"}}]
        }),
    );

    let article = article_repository(&transport).find("1").await.unwrap().unwrap();

    assert_eq!(article.class(), ModelClass::of::<Article>());
    assert_eq!(article.id().unwrap(), "1");
    assert_eq!(article.get_str("title"), Some("T"));
    assert_eq!(article.get_str("body"), Some("B"));

    let author = article.related("author").unwrap();
    assert_eq!(author.class(), ModelClass::of::<Person>());
    assert_eq!(author.id().unwrap(), "9");
    assert_eq!(author.get_str("name"), Some("N"));
}

#[tokio::test]
async fn test_round_trip_keeps_only_requested_fields() {
    let transport = Arc::new(MockTransport::new());
    let repository = article_repository(&transport);

    // answer with exactly what the request asked for
    let request = repository.new_request_builder(Some("1")).unwrap().build();
    assert_eq!(request.query_param("fields[node--article]"), Some("title,body,author"));
    assert_eq!(request.query_param("fields[user--user]"), Some("name"));
    assert_eq!(request.query_param("include"), Some("author"));

    transport.push_json(
        200,
        json!({
            "data": {
                "type": "node--article", "id": "1",
                "attributes": {"title": "T", "body": "B"},
                "relationships": {"author": {"data": {"type": "user--user", "id": "9"}}}
            },
            "included": [{"type": "user--user", "id": "9", "attributes": {"name": "N"}}]
        }),
    );
    let article = repository.find("1").await.unwrap().unwrap();

    for field in ModelClass::of::<Article>().fields() {
        assert!(article.has(field), "missing {}", field);
    }
    assert!(article.relation_loaded("author"));
    assert!(!article.has("created"));
    assert!(article.related("author").unwrap().get("mail").is_none());
}

#[tokio::test]
async fn test_unsuccessful_document_degrades_to_none() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(404, json!({"errors": [{"status": "404", "title": "Not Found"}]}));
    transport.push_json(200, json!({"errors": [{"status": "500"}]}));
    transport.push_json(200, json!({"data": []}));

    let repository = article_repository(&transport);
    assert!(repository.find("missing").await.unwrap().is_none());
    assert!(repository.find("broken").await.unwrap().is_none());
    assert!(repository
        .find_by_attributes(&Attributes::new().with("title", "nothing"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_non_json_error_page_degrades_to_empty() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(JsonApiResponse::from_body(502, b"<html>Bad gateway</html>"));

    let collection = article_repository(&transport)
        .get_by_attributes(&Attributes::new(), None, None)
        .await
        .unwrap();
    assert!(collection.is_empty());
}

#[tokio::test]
async fn test_to_many_relation_without_resources_is_empty_collection() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(200, json!({"data": []}));

    let mut page = ModelClass::of::<PageModel>().new_entity();
    page.set_id("p1");
    let tags = page.require_relation("tags").unwrap();

    let collection = RepositoryFactory::new(config(), transport.clone())
        .for_relation(&tags)
        .unwrap()
        .get_for_relation(&tags)
        .await
        .unwrap();
    assert!(collection.is_empty());
}

#[tokio::test]
async fn test_transport_error_is_not_swallowed() {
    let transport = Arc::new(MockTransport::new());
    transport.push_failure("connection reset");

    let err = article_repository(&transport)
        .get_by_ids(&["1".to_string()])
        .await
        .unwrap_err();
    assert!(err.downcast_ref::<ClientError>().is_some());
}

// ============================================================================
// Filters
// ============================================================================

#[tokio::test]
async fn test_attribute_order_does_not_change_filters() {
    let transport = Arc::new(MockTransport::new());
    transport.push_json(200, json!({"data": []}));
    transport.push_json(200, json!({"data": []}));
    transport.push_json(200, json!({"data": []}));
    transport.push_json(200, json!({"data": []}));

    let repository = article_repository(&transport);
    repository
        .get_by_attributes(&Attributes::new().with("b", 2).with("a", 1), None, None)
        .await
        .unwrap();
    repository
        .get_by_attributes(&Attributes::new().with("a", 1).with("b", 2), None, None)
        .await
        .unwrap();
    repository
        .get_by_ids(&["2".to_string(), "1".to_string()])
        .await
        .unwrap();
    repository
        .get_by_ids(&["1".to_string(), "2".to_string()])
        .await
        .unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].query(), requests[1].query());
    assert_eq!(requests[2].query(), requests[3].query());
}

// ============================================================================
// Boot
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_use_boots_once() {
    static BOOTS: AtomicUsize = AtomicUsize::new(0);
    register_boot_hook("repository-test.concurrent", |scopes: &mut ScopeSet, _: &ClientConfig| {
        BOOTS.fetch_add(1, Ordering::SeqCst);
        scopes.with_scope("published", |builder: &mut QueryBuilder| {
            builder.add_simple_filter("status", 1);
        });
    });

    let config = Arc::new(config());
    let transport: Arc<dyn drupal_jsonapi_orm::Transport> = Arc::new(MockTransport::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let config = config.clone();
            let transport = transport.clone();
            tokio::spawn(async move {
                JsonApiRepository::with_options(
                    ModelClass::of::<Article>(),
                    config,
                    transport,
                    RepositoryOptions::new().with_boot_key("repository-test.concurrent"),
                )
                .map(|repository| repository.global_scopes().contains("published"))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }
    assert_eq!(BOOTS.load(Ordering::SeqCst), 1);
}
