use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use tower::ServiceExt;

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = app(Arc::new(AppState::new(Catalog::builtin())));
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = get_json("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_catalog_lists_products_and_boxes() {
    let (status, body) = get_json("/api/catalog").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"].as_array().unwrap().len(), 13);
    assert_eq!(body["boxes"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_product_boxes() {
    let (status, body) = get_json("/api/products/10/boxes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["product"]["name"], "Tumbler");
    let boxes = body["boxes"].as_array().unwrap();
    assert_eq!(boxes.len(), 9);
    assert_eq!(boxes[0]["id"], "VASO");
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let (status, body) = get_json("/api/products/99/boxes").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn test_box_groups_default_max_items() {
    let (status, body) = get_json("/api/boxes/SOBRES/groups").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["box_id"], "SOBRES");
    assert_eq!(body["groups"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_box_groups_with_max_items() {
    let (status, body) = get_json("/api/boxes/SOBRES/groups?max_items=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn test_box_groups_rejects_bad_max_items() {
    let (status, _) = get_json("/api/boxes/SOBRES/groups?max_items=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json("/api/groups?max_items=50").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unparsable_query_returns_json_error() {
    let (status, body) = get_json("/api/boxes/SOBRES/groups?max_items=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));

    let (status, body) = get_json("/api/groups?max_items=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unparsable_product_id_returns_json_error() {
    let (status, body) = get_json("/api/products/abc/boxes").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
}

#[tokio::test]
async fn test_unknown_box_is_not_found() {
    let (status, _) = get_json("/api/boxes/NOPE/groups").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_all_groups() {
    let (status, body) = get_json("/api/groups?max_items=2").await;

    assert_eq!(status, StatusCode::OK);
    let reports = body.as_array().unwrap();
    assert_eq!(reports.len(), 10);
    assert_eq!(reports[0]["groups"].as_array().unwrap().len(), 7);
}

#[test]
fn test_cache_is_reused_across_requests() {
    let state = AppState::new(Catalog::builtin());
    let vaso = state.catalog.shipping_box("VASO").unwrap().clone();

    let first = state.report(&vaso, 3).ok().unwrap();
    let second = state.report(&vaso, 3).ok().unwrap();

    assert_eq!(first.groups, second.groups);
    assert_eq!(state.cache.lock().unwrap().len(), 1);
}
