use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
};

use crate::{middleware::auth::TOKEN_HEADER, response::MessageResponse, state::AppState};

pub mod cart;
pub mod doc;
pub mod foods;
pub mod health;
pub mod orders;
pub mod user;

/// Largest accepted request body, sized for food image uploads.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/food", foods::router())
        .nest("/user", user::router())
        .nest("/cart", cart::router())
        .nest("/order", orders::route())
}

/// Every route plus CORS and static image serving. Tracing and request ids are added by the binary.
pub fn create_app(state: AppState, allowed_origins: &[String]) -> Router {
    let images = ServeDir::new(&state.upload_dir);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .nest_service("/images", images)
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(TOKEN_HEADER),
        ])
}

async fn root() -> &'static str {
    "API WORKING"
}

async fn not_found(uri: Uri) -> (StatusCode, Json<MessageResponse>) {
    tracing::debug!(path = %uri.path(), "no route");
    (StatusCode::NOT_FOUND, Json(MessageResponse::failure("Not Found")))
}
