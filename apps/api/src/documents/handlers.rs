//! Axum route handlers for reading and editing stored documents.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::generation::handlers::PageContentResponse;
use crate::layout::{content_start_page, PageEstimator, PageMapEntry};
use crate::models::document::{Document, TOC_SECTION};
use crate::render::build_document_html;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PageMapResponse {
    pub content_start_page: u32,
    pub entries: Vec<PageMapEntry>,
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub pages: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    pub doc_id: String,
    #[serde(default)]
    pub page_index: usize,
    #[serde(default)]
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/document/:doc_id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<Document>, AppError> {
    Ok(Json(load_document(&state, &doc_id).await?))
}

/// GET /api/document/:doc_id/page-map
pub async fn handle_page_map(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<PageMapResponse>, AppError> {
    let doc = load_document(&state, &doc_id).await?;
    let content_start_page = content_start_page(doc.sections.as_slice());
    let (_, entries) = compute_page_map(state.estimator, doc).await?;

    Ok(Json(PageMapResponse {
        content_start_page,
        entries,
    }))
}

/// POST /api/estimate
///
/// Estimates the printed length of one HTML fragment.
pub async fn handle_estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, AppError> {
    let estimator = state.estimator;
    let pages = tokio::task::spawn_blocking(move || estimator.estimate(&request.content))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in estimate: {e}")))?;

    Ok(Json(EstimateResponse { pages }))
}

/// POST /api/update-page
///
/// Replaces a page's HTML with content typed in the editor.
pub async fn handle_update_page(
    State(state): State<AppState>,
    Json(request): Json<UpdatePageRequest>,
) -> Result<Json<PageContentResponse>, AppError> {
    let page = state
        .store
        .update_page(
            &request.doc_id,
            request.page_index,
            Some(request.content),
            None,
        )
        .await
        .ok_or_else(|| AppError::NotFound("Page not found".to_string()))?;

    Ok(Json(PageContentResponse {
        page_index: request.page_index,
        content: page.content,
    }))
}

/// GET /api/preview/:doc_id
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let doc = load_document(&state, &doc_id).await?;

    let (doc, page_map) = if doc.has_section(TOC_SECTION) {
        compute_page_map(state.estimator, doc).await?
    } else {
        (doc, Vec::new())
    };

    Ok(Html(build_document_html(&doc, &page_map)))
}

/// GET /api/download/:doc_id
///
/// PDF rasterization is not provided by this service.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
) -> Result<Json<()>, AppError> {
    load_document(&state, &doc_id).await?;
    Err(AppError::NotImplemented)
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_document(state: &AppState, doc_id: &str) -> Result<Document, AppError> {
    state
        .store
        .get(doc_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Document {doc_id} not found")))
}

/// Builds the page map off the async executor. Hands the document back so callers can keep using it.
async fn compute_page_map(
    estimator: PageEstimator,
    doc: Document,
) -> Result<(Document, Vec<PageMapEntry>), AppError> {
    tokio::task::spawn_blocking(move || {
        let entries = estimator.build_page_map(&doc);
        debug!(doc_id = %doc.id, entries = entries.len(), "Page map computed");
        (doc, entries)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in page map: {e}")))
}
