//! HTTP host: wraps module routers with the shared middleware stack and serves them.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{middleware::from_fn, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

/// API Ingress: owns the HTTP server and the middleware shared by every module router.
pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    /// Create a new ApiIngress instance with the given configuration
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    /// Build the HTTP router around `api`, adding `/health` and, when docs
    /// are enabled, `/openapi.json` and `/docs`.
    pub fn build_router(
        &self,
        api: Router,
        openapi: Option<utoipa::openapi::OpenApi>,
    ) -> Result<Router> {
        tracing::debug!("Building router");
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(api);

        if self.config.enable_docs {
            match openapi {
                Some(doc) => {
                    // Render once, serve as static JSON
                    let doc = Arc::new(serde_json::to_value(doc)?);
                    let paths = doc["paths"].as_object().map_or(0, |p| p.len());
                    tracing::info!("Serving OpenAPI document with {} paths", paths);
                    router = router
                        .route(
                            "/openapi.json",
                            get(move || web::serve_openapi(doc.clone())),
                        )
                        .route("/docs", get(web::serve_docs));
                }
                None => tracing::warn!("Docs enabled but no OpenAPI document was supplied"),
            }
        }

        // Each layer wraps everything added before it, so the innermost goes first.
        // Effective order (outermost to innermost):
        // SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions -> Timeout -> CORS -> BodyLimit

        // 7. Body limit
        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        // 6. CORS (if enabled)
        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        // 5. Handler timeout
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            self.config.timeout_sec,
        )));

        // 4. Put request_id into extensions and the http_request span
        router = router.layer(from_fn(request_id::push_req_id_to_extensions));

        // 3. Trace with request_id/status/latency
        router = router.layer(request_id::create_trace_layer());

        let x_request_id = request_id::header();

        // 2. Echo x-request-id back on the response
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));

        // 1. Generate x-request-id when the client did not send one
        router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }

    /// Bind and serve until `shutdown` resolves.
    pub async fn serve<F>(&self, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self.config.bind_addr.parse().map_err(|e| {
            anyhow::anyhow!("Invalid bind address '{}': {}", self.config.bind_addr, e)
        })?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("HTTP server shutting down gracefully");
            })
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
