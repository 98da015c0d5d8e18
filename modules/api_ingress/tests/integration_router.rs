//! Integration tests for the API Ingress router: built-in endpoints and shared layers.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Router,
};
use tower::util::ServiceExt;
use utoipa::OpenApi;

use api_ingress::{ApiIngress, ApiIngressConfig};

#[utoipa::path(post, path = "/echo", responses((status = 200, description = "Echoed body")))]
async fn echo(body: String) -> String {
    body
}

#[derive(OpenApi)]
#[openapi(paths(echo))]
struct EchoDoc;

fn build(config: ApiIngressConfig) -> Router {
    let api = Router::new().route("/echo", post(echo));
    ApiIngress::new(config)
        .build_router(api, Some(EchoDoc::openapi()))
        .expect("router")
}

async fn get(router: Router, uri: &str) -> axum::response::Response {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_healthy() {
    let response = get(build(ApiIngressConfig::default()), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn openapi_is_hidden_unless_docs_enabled() {
    let response = get(build(ApiIngressConfig::default()), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_is_served_when_docs_enabled() {
    let router = build(ApiIngressConfig {
        enable_docs: true,
        ..ApiIngressConfig::default()
    });

    let response = get(router.clone(), "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["paths"]["/echo"]["post"].is_object());

    let response = get(router, "/docs").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let router = build(ApiIngressConfig {
        body_limit_bytes: 8,
        ..ApiIngressConfig::default()
    });

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/echo")
                .body(Body::from("this body is longer than eight bytes"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_headers_only_when_enabled() {
    let preflight = || {
        Request::builder()
            .method("OPTIONS")
            .uri("/echo")
            .header("origin", "https://example.com")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap()
    };

    let enabled = build(ApiIngressConfig {
        cors_enabled: true,
        ..ApiIngressConfig::default()
    });
    let response = enabled.oneshot(preflight()).await.unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));

    let disabled = build(ApiIngressConfig::default());
    let response = disabled.oneshot(preflight()).await.unwrap();
    assert!(!response
        .headers()
        .contains_key("access-control-allow-origin"));
}
