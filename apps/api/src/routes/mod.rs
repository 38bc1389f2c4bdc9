pub mod health;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::recommendation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/get-build-recommendation",
            post(handlers::handle_build_recommendation),
        )
        .with_state(state);

    // Front-end pages; unknown paths fall back to the form page.
    match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    }
}
