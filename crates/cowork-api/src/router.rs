use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "content-type, x-api-key";

/// Create the API router with all routes.
///
/// With a base path every route is served below it, e.g. `/prod/spaces`.
pub fn create_router(state: Arc<AppState>, base_path: Option<&str>) -> Router {
    let routes = Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Spaces
        .route("/spaces", get(handlers::list_spaces))
        .route("/spaces/{id}", get(handlers::get_space))
        .route("/spaces/{id}/services", get(handlers::services_for_space))
        .route("/spaces/{id}/pricing", get(handlers::pricing_for_space))

        // Catalog
        .route("/services", get(handlers::list_services))

        // Reports
        .route("/reports", post(handlers::create_report))

        // Blog
        .route("/posts", get(handlers::list_posts))
        .route("/posts/{slug}", get(handlers::get_post))

        .with_state(state);

    let app = match base_path {
        Some(base) => Router::new().nest(base, routes),
        None => routes,
    };

    app.layer(middleware::from_fn(answer_preflight))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-api-key")])
}

/// Answer every OPTIONS request with 200, whatever the path.
///
/// Browsers' preflights are handled by the CORS layer before reaching this;
/// bare OPTIONS requests land here.
async fn answer_preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            (header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS)),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS)),
        ],
    )
        .into_response()
}
