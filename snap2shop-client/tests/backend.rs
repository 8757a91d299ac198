use std::time::Duration;

use serde_json::json;
use snap2shop_client::{BackendClient, ClientError, ImageUpload, VisualSearch};
use snap2shop_core::domain::index::Status;
use wiremock::matchers::{body_json, body_string, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHOP: &str = "test-shop.myshopify.com";

#[tokio::test]
async fn get_index_status_decodes_running_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/admin/index/status/{}", SHOP)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": 3,
            "status": "running",
            "total": 50,
            "processed": 15,
            "product_count": 25,
            "started_at": "2025-01-01T10:00:00",
            "finished_at": null,
            "error": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let status = client.get_index_status(SHOP).await.expect("status ok");

    assert_eq!(status.status, Status::Running);
    assert_eq!(status.progress_percent(), 30);
    assert_eq!(status.product_count, 25);
    assert!(status.started_at.is_some());
}

#[tokio::test]
async fn get_index_status_maps_non_success_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/admin/index/status/{}", SHOP)))
        .respond_with(ResponseTemplate::new(404).set_body_string("Shop not found"))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let err = client.get_index_status(SHOP).await.unwrap_err();

    assert!(err.is_not_found());
    match err {
        ClientError::ApiError { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Shop not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn get_index_status_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/admin/index/status/{}", SHOP)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let err = client.get_index_status(SHOP).await.unwrap_err();
    assert!(matches!(err, ClientError::ParseError(_)));
}

#[tokio::test]
async fn trigger_indexing_posts_form_encoded_shop() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/index"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("shop_domain=test-shop.myshopify.com"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"job_id": "mock-job-123", "status": "queued"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(format!("{}/", server.uri()));
    let triggered = client.trigger_indexing(SHOP).await.expect("trigger ok");

    assert_eq!(triggered.job_id.as_str(), "mock-job-123");
    assert_eq!(triggered.status, Status::Queued);
}

#[tokio::test]
async fn trigger_indexing_surfaces_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/index"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Failed to start indexing"))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let err = client.trigger_indexing(SHOP).await.unwrap_err();
    assert!(err.is_server_error());
}

#[tokio::test]
async fn register_shop_posts_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/shopify/install"))
        .and(body_json(json!({"shop": SHOP, "access_token": "shpat_123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    client
        .register_shop(SHOP, "shpat_123")
        .await
        .expect("register ok");
}

#[tokio::test]
async fn notify_install_swallows_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/shopify/install"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let handle = client.notify_install(SHOP, "shpat_123");

    // The detached task completes normally even though the backend refused.
    handle.await.expect("install task does not panic");
}

#[tokio::test]
async fn health_reports_pipeline_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "ml_pipeline": true,
            "database": "connected",
            "version": "0.1.0"
        })))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let health = client.health().await.expect("health ok");

    assert!(health.is_healthy());
    assert_eq!(health.version.as_deref(), Some("0.1.0"));
}

#[tokio::test]
async fn search_uploads_multipart_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains("name=\"shop_domain\""))
        .and(body_string_contains(SHOP))
        .and(body_string_contains("name=\"limit\""))
        .and(body_string_contains("fake-image-bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "product_id": "101",
                "title": "Blue Mug",
                "handle": "blue-mug",
                "image": "https://cdn.example.com/blue-mug.png",
                "url": "https://test-shop.myshopify.com/products/blue-mug",
                "score": 0.91
            }],
            "latency_ms": 12,
            "total_results": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri());
    let upload = ImageUpload::new("mug.png", "image/png", b"fake-image-bytes".to_vec());
    let response = client.search(SHOP, &upload, 5).await.expect("search ok");

    assert_eq!(response.total_results, 1);
    assert_eq!(response.results[0].title, "Blue Mug");
    assert_eq!(response.results[0].match_percent(), 91);
}

#[tokio::test]
async fn search_session_is_single_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [], "latency_ms": 1, "total_results": 0}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = VisualSearch::new(BackendClient::new(server.uri()), SHOP);
    let upload = ImageUpload::new("mug.png", "image/png", b"fake-image-bytes".to_vec());

    let (first, second) = tokio::join!(session.search(&upload), session.search(&upload));

    assert!(first.is_ok());
    assert!(matches!(second, Err(ClientError::SearchInProgress)));
    assert!(!session.is_searching());

    // The flag is released once the first search completes.
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [], "latency_ms": 1, "total_results": 0})),
        )
        .mount(&server)
        .await;
    assert!(session.search(&upload).await.is_ok());
}

#[tokio::test]
async fn unreachable_backend_is_request_failure() {
    // Nothing listens on the discard port.
    let client = BackendClient::new("http://127.0.0.1:9");
    let err = client.get_index_status(SHOP).await.unwrap_err();
    assert!(matches!(err, ClientError::RequestFailed(_)));
}
