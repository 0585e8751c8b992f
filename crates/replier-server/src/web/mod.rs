// crates/replier-server/src/web/mod.rs
// Web server layer for Replier

pub mod api;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::state::AppState;

/// Create the web server router
pub fn create_router(state: AppState) -> Router {
    // The extension calls from arbitrary page origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health))
        .route("/generate-reply", post(api::generate_reply))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
