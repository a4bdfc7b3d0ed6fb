pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::documents::{handlers, uploads};
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let uploads_dir = ServeDir::new(&state.config.upload_dir);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Generation
        .route("/api/generate", post(generation::handle_generate))
        .route("/api/edit-page", post(generation::handle_edit_page))
        // Documents
        .route("/api/document/:doc_id", get(handlers::handle_get_document))
        .route(
            "/api/document/:doc_id/page-map",
            get(handlers::handle_page_map),
        )
        .route("/api/estimate", post(handlers::handle_estimate))
        .route("/api/update-page", post(handlers::handle_update_page))
        .route("/api/preview/:doc_id", get(handlers::handle_preview))
        .route("/api/download/:doc_id", get(handlers::handle_download))
        // Images
        .route("/api/upload-image", post(uploads::handle_upload_image))
        .route("/api/remove-image", post(uploads::handle_remove_image))
        .nest_service(uploads::UPLOADS_URL_PREFIX, uploads_dir)
        .layer(body_limit)
        .with_state(state)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
