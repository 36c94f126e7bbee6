//! End-to-end tests of the workspace over the HTTP backend, with the admin
//! API mocked by wiremock.

use serde_json::json;
use shelfctl::api::HttpCategoryApi;
use shelfctl::category::{CategoryDraft, CategoryError, CategoryGateway, CategoryId, CategoryWorkspace};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> CategoryGateway<HttpCategoryApi> {
    let api = HttpCategoryApi::new(
        reqwest::Client::new(),
        &format!("{}/api/admin", server.uri()),
        None,
        Duration::from_secs(5),
    )
    .unwrap();
    CategoryGateway::new(api)
}

fn tree() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Fiction", "level": 1, "children": [
            {"id": 11, "name": "Fantasy", "level": 2, "children": []}
        ]},
        {"id": 2, "name": "Poetry", "level": 1, "isPinned": true, "children": []}
    ])
}

#[tokio::test]
async fn test_load_and_create_child() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/categories"))
        .and(body_json(json!({"name": "Horror", "parentId": "1"})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"data": {"id": 12, "name": "Horror"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let mut workspace = CategoryWorkspace::new();
    workspace.refresh(&gateway).await.unwrap();
    assert_eq!(workspace.store().len(), 3);

    let node = workspace
        .create(&gateway, Some(&CategoryId::new("1")), CategoryDraft::named("  Horror "))
        .await
        .unwrap();
    assert_eq!(node.id, CategoryId::new("12"));
    assert_eq!(node.level, 2);
}

#[tokio::test]
async fn test_delete_conflict_maps_to_in_use() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/categories/1"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let mut workspace = CategoryWorkspace::new();
    workspace.refresh(&gateway).await.unwrap();
    workspace.select(Some(CategoryId::new("1")));

    let pending = workspace.request_delete().unwrap();
    let err = workspace.delete(&gateway, pending.confirm()).await.unwrap_err();
    assert!(matches!(err, CategoryError::InUse { ref name } if name == "Fiction"));
    assert!(workspace.store().contains(&CategoryId::new("11")));
}

#[tokio::test]
async fn test_pin_on_child_never_hits_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let mut workspace = CategoryWorkspace::new();
    workspace.refresh(&gateway).await.unwrap();

    let result = workspace.toggle_pin(&gateway, &CategoryId::new("11")).await;
    assert!(matches!(result, Err(CategoryError::Validation(_))));
}

#[tokio::test]
async fn test_pin_applied_when_refetch_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tree()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/categories"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/categories/1"))
        .and(body_json(json!({"isPinned": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let mut workspace = CategoryWorkspace::new();
    workspace.refresh(&gateway).await.unwrap();

    let result = workspace.toggle_pin(&gateway, &CategoryId::new("1")).await;
    assert!(result.is_ok(), "pin reported as failed: {:?}", result);
    assert!(!workspace.is_loading());
    assert_eq!(workspace.store().len(), 3);
}
