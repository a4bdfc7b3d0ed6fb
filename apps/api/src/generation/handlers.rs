//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{
    edit_or_error_paragraph, generate_or_error_page, GenerationBrief, SectionRequest,
};
use crate::models::document::{CoverDetails, Page, COVER_SECTION, TOC_SECTION};
use crate::state::AppState;
use crate::store::new_document;

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_AUTHOR: &str = "Student";
const DEFAULT_LANGUAGE: &str = "Spanish";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub carnet: String,
    pub include_cover: Option<bool>,
    pub include_toc: Option<bool>,
    /// Language the content is written in. Defaults to Spanish.
    pub language: Option<String>,
    #[serde(flatten)]
    pub cover: CoverDetails,
    #[serde(default)]
    pub sections: Vec<SectionRequest>,
}

#[derive(Debug, Serialize)]
pub struct GenerateDocumentResponse {
    pub doc_id: String,
    pub title: String,
    pub pages: Vec<Page>,
    pub total_pages: usize,
}

#[derive(Debug, Deserialize)]
pub struct EditPageRequest {
    pub doc_id: String,
    #[serde(default)]
    pub page_index: usize,
    #[serde(default)]
    pub instructions: String,
}

/// Shared by edit-page and update-page.
#[derive(Debug, Serialize)]
pub struct PageContentResponse {
    pub page_index: usize,
    pub content: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate
///
/// Creates a document from the outline, asks the generator for its pages and stores it.
/// A generator failure still yields a stored document holding a single error page.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateDocumentRequest>,
) -> Result<Json<GenerateDocumentResponse>, AppError> {
    let title = request.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let author = request.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

    let mut sections = Vec::new();
    if request.include_cover.unwrap_or(true) {
        sections.push(COVER_SECTION.to_string());
    }
    if request.include_toc.unwrap_or(true) {
        sections.push(TOC_SECTION.to_string());
    }

    let mut doc = new_document(&title, &author, &request.carnet, sections);
    doc.cover = request.cover;

    let brief = GenerationBrief {
        title: title.clone(),
        author,
        carnet: request.carnet,
        language: request
            .language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        sections: request.sections,
    };
    doc.pages = generate_or_error_page(state.generator.as_ref(), &brief).await;

    info!(doc_id = %doc.id, pages = doc.pages.len(), "Document created");

    let response = GenerateDocumentResponse {
        doc_id: doc.id.clone(),
        title,
        pages: doc.pages.clone(),
        total_pages: doc.pages.len(),
    };
    state.store.insert(doc).await;

    Ok(Json(response))
}

/// POST /api/edit-page
///
/// Rewrites one page's HTML following the student's instructions and stores the result.
pub async fn handle_edit_page(
    State(state): State<AppState>,
    Json(request): Json<EditPageRequest>,
) -> Result<Json<PageContentResponse>, AppError> {
    let doc = state
        .store
        .get(&request.doc_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", request.doc_id)))?;
    let page = doc
        .pages
        .get(request.page_index)
        .ok_or_else(|| AppError::NotFound(format!("Page {} not found", request.page_index)))?;

    if request.instructions.trim().is_empty() {
        return Err(AppError::Validation(
            "instructions cannot be empty".to_string(),
        ));
    }

    let content =
        edit_or_error_paragraph(state.generator.as_ref(), &page.content, &request.instructions)
            .await;

    state
        .store
        .update_page(&request.doc_id, request.page_index, Some(content.clone()), None)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Page {} not found", request.page_index)))?;

    info!(doc_id = %request.doc_id, page_index = request.page_index, "Page edited");

    Ok(Json(PageContentResponse {
        page_index: request.page_index,
        content,
    }))
}
