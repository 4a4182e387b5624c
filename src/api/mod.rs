//! HTTP front-end: one route per CRM command, plus health and docs.

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::handlers::{self, AppState};

/// Serves the OpenAPI specification YAML file.
///
/// Reads `openapi.yml` from the working directory; 404 when it is missing.
async fn serve_openapi_spec() -> impl IntoResponse {
    match tokio::fs::read_to_string("openapi.yml").await {
        Ok(content) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/yaml")],
            content,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "OpenAPI spec not found").into_response(),
    }
}

/// Serves a Swagger UI page pointed at [`serve_openapi_spec`].
async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Rust CRM - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.yml",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}

/// Command routes, without any middleware.
fn command_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.yml", get(serve_openapi_spec))
        .route(
            "/api/v1/customers",
            post(handlers::add_customer).get(handlers::list_customers),
        )
        .route("/api/v1/customers/search", get(handlers::search_customers))
        .route("/api/v1/customers/:id", get(handlers::get_customer))
        .route(
            "/api/v1/customers/:id/details",
            get(handlers::get_customer_details_text),
        )
        .route(
            "/api/v1/customers/:id/interactions",
            post(handlers::log_interaction),
        )
        .route(
            "/api/v1/customers/:id/purchases",
            post(handlers::log_purchase),
        )
        .route("/api/v1/segments", get(handlers::segment_customers))
        .route("/api/v1/follow-ups", get(handlers::follow_up_reminders))
        .route("/api/v1/top", get(handlers::top_customers))
}

/// Builds the full application.
///
/// Body size limits always apply to the command routes. Per-IP rate limiting
/// is added when `rate_limit_per_second` is non-zero; it needs the peer
/// address, so the server must be started with connect info. `/health`
/// bypasses both.
pub fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let config = &state.config;
    let mut protected_routes = command_routes().layer(
        ServiceBuilder::new().layer(RequestBodyLimitLayer::new(config.max_body_bytes)),
    );

    if config.rate_limit_per_second > 0 {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(config.rate_limit_per_second)
                .burst_size(config.rate_limit_burst)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
        );
        protected_routes = protected_routes.layer(GovernorLayer {
            config: governor_conf,
        });
    }

    Ok(Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()))
}
