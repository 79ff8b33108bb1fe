pub mod error;
pub mod messages;
pub mod state;
pub mod users;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// Full HTTP surface of the marketplace.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(users::login))
        .route("/api/users", get(users::list_users))
        .route("/api/users/{name}", get(users::get_user))
        .route(
            "/api/messages",
            get(messages::get_history).post(messages::send_message),
        )
        .route("/health", get(health))
        // Browser client is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
