//! HTTP API for recipes and the ingredients they own.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod schema;
pub mod serializer;
pub mod store;
pub mod telemetry;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use store::RecipeStore;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across all handlers
pub type AppState = Arc<dyn RecipeStore>;

/// One span per request, named after the route template so that
/// `/recipes/{id}/` groups every recipe id together.
fn request_span(request: &Request<Body>) -> Span {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or(request.uri().path());

    tracing::info_span!("http_request", method = %request.method(), path = %path)
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status();
    let latency_ms = latency.as_millis();

    if status.is_server_error() {
        tracing::error!(status = status.as_u16(), latency_ms, "request failed with server error");
    } else {
        tracing::info!(status = status.as_u16(), latency_ms, "request completed");
    }
}

/// Builds the full application: API routes, Swagger UI and request tracing.
pub fn app(store: AppState) -> Router {
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::router())
        .merge(swagger_ui)
        .with_state(store)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(request_span)
                .on_response(log_response)
                // 5xx responses are already logged by log_response
                .on_failure(()),
        )
}
