//! Page image upload and removal. Files land in the upload directory and are served
//! back under `/uploads/`.

use std::path::Path;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::PageImage;
use crate::state::AppState;

/// URL prefix the router serves the upload directory under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub image_url: String,
    pub caption: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveImageRequest {
    pub doc_id: String,
    #[serde(default)]
    pub page_index: usize,
    #[serde(default)]
    pub image_index: usize,
}

/// Multipart form fields accepted by the upload route.
#[derive(Debug, Default)]
struct UploadForm {
    doc_id: String,
    page_index: usize,
    caption: String,
    /// (client file name, bytes)
    image: Option<(String, Bytes)>,
}

/// POST /api/upload-image
///
/// Multipart fields: `doc_id`, `page_index`, `caption`, `image`.
pub async fn handle_upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadImageResponse>, AppError> {
    let form = read_upload_form(multipart).await?;

    let (file_name, data) = form
        .image
        .ok_or_else(|| AppError::Validation("No image was sent".to_string()))?;
    if file_name.is_empty() {
        return Err(AppError::Validation("Empty file name".to_string()));
    }

    let doc = state
        .store
        .get(&form.doc_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", form.doc_id)))?;
    if form.page_index >= doc.pages.len() {
        return Err(AppError::NotFound("Page not found".to_string()));
    }

    let stored_name = stored_file_name(&file_name);
    tokio::fs::write(state.config.upload_dir.join(&stored_name), &data).await?;

    let image = PageImage {
        url: format!("{UPLOADS_URL_PREFIX}/{stored_name}"),
        caption: form.caption,
    };
    state
        .store
        .add_image(&form.doc_id, form.page_index, image.clone())
        .await
        .ok_or_else(|| AppError::NotFound("Page not found".to_string()))?;

    info!(
        doc_id = %form.doc_id,
        page_index = form.page_index,
        bytes = data.len(),
        "Image stored as {stored_name}"
    );

    Ok(Json(UploadImageResponse {
        image_url: image.url,
        caption: image.caption,
    }))
}

/// POST /api/remove-image
///
/// An out-of-range `image_index` leaves the page untouched and still succeeds.
pub async fn handle_remove_image(
    State(state): State<AppState>,
    Json(request): Json<RemoveImageRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .remove_image(&request.doc_id, request.page_index, request.image_index)
        .await
        .ok_or_else(|| AppError::NotFound("Page not found".to_string()))?;

    Ok(Json(json!({ "success": true })))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "doc_id" => form.doc_id = field.text().await.map_err(multipart_error)?,
            "page_index" => {
                let raw = field.text().await.map_err(multipart_error)?;
                form.page_index = raw.trim().parse().map_err(|_| {
                    AppError::Validation(format!("page_index must be a non-negative integer, got '{raw}'"))
                })?;
            }
            "caption" => form.caption = field.text().await.map_err(multipart_error)?,
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                form.image = Some((file_name, data));
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {e}"))
}

/// Random 12-hex-character name that keeps the client's extension when it is plain ASCII.
pub(crate) fn stored_file_name(client_name: &str) -> String {
    let stem = &Uuid::new_v4().simple().to_string()[..12];
    let extension = Path::new(client_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!("{stem}{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name_keeps_extension() {
        let name = stored_file_name("grafica final.PNG");
        assert_eq!(name.len(), 16);
        assert!(name.ends_with(".png"));
        assert!(name[..12].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_stored_file_name_without_extension() {
        assert_eq!(stored_file_name("scan").len(), 12);
        assert_eq!(stored_file_name(".hidden").len(), 12);
    }

    #[test]
    fn test_stored_file_name_drops_odd_extensions() {
        assert_eq!(stored_file_name("evil.p/ng").len(), 12);
        assert_eq!(stored_file_name("x.ph p").len(), 12);
    }

    #[test]
    fn test_stored_file_names_are_unique() {
        assert_ne!(stored_file_name("a.jpg"), stored_file_name("a.jpg"));
    }
}
