//! HTTP handlers for the pagedeck server

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::models::SessionMeta;
use crate::state::AppState;
use crate::views::{self, PageRow};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pagedeck-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET / — upload form
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(views::render_index(state.max_upload_mb))
}

/// Handler: POST /upload
///
/// Accepts multipart/form-data with a `pdf` field, stores the document
/// under a fresh session id, and redirects to the edit screen.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&state, e))?
    {
        if field.name() == Some("pdf") {
            let filename = field.file_name().unwrap_or("document.pdf").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| multipart_error(&state, e))?;
            file = Some((filename, data.to_vec()));
        }
    }

    let (filename, data) =
        file.ok_or_else(|| ApiError::InvalidRequest("Select a PDF file to upload".to_string()))?;

    if !filename.to_lowercase().ends_with(".pdf") || !data.starts_with(b"%PDF-") {
        return Err(ApiError::InvalidRequest(
            "Only PDF files are accepted".to_string(),
        ));
    }

    // Also rejects encrypted and unparseable documents
    let page_count = pagedeck_core::page_count(&data)?;

    let id = AppState::new_session_id();
    tokio::fs::write(state.pdf_path(&id), &data).await?;

    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename.as_str());
    state
        .save_meta(&id, &SessionMeta::new(stem, page_count))
        .await?;

    tracing::info!(
        "Uploaded {} ({} pages, {} bytes) as session {}",
        filename,
        page_count,
        data.len(),
        id
    );

    Ok(Redirect::to(&format!("/edit/{}", id)))
}

/// Handler: GET /edit/:id — page table with per-page actions
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let (bytes, meta) = open_session(&state, &id).await?;
    let info = pagedeck_core::inspect(&bytes)?;

    let rows: Vec<PageRow> = info
        .iter()
        .zip(&meta.pages)
        .map(|(page, label)| PageRow {
            position: page.page,
            label: *label,
            rotation: page.rotation,
        })
        .collect();

    let filename = format!("{}.pdf", meta.filename);
    Ok(Html(views::render_edit(&id, &filename, &rows)))
}

/// Handler: POST /edit/:id/rotate/:page — rotate clockwise by 90 degrees
pub async fn rotate(
    State(state): State<AppState>,
    Path((id, page)): Path<(String, u32)>,
) -> Result<Redirect, ApiError> {
    let (bytes, _) = open_session(&state, &id).await?;

    let updated = pagedeck_core::rotate_page(&bytes, page)?;
    write_document(&state, &id, &updated).await?;

    tracing::info!("Session {}: rotated page {}", id, page);
    Ok(redirect_to_edit(&id))
}

/// Handler: POST /edit/:id/delete/:page
pub async fn delete(
    State(state): State<AppState>,
    Path((id, page)): Path<(String, u32)>,
) -> Result<Redirect, ApiError> {
    let (bytes, mut meta) = open_session(&state, &id).await?;

    let updated = pagedeck_core::delete_page(&bytes, page)?;
    write_document(&state, &id, &updated).await?;

    meta.delete_page(page);
    state.save_meta(&id, &meta).await?;

    tracing::info!("Session {}: deleted page {}", id, page);
    Ok(redirect_to_edit(&id))
}

/// Form body for a move action.
#[derive(Deserialize)]
pub struct MoveForm {
    /// Target 1-based position
    pub to: u32,
}

/// Handler: POST /edit/:id/move/:page
pub async fn move_page(
    State(state): State<AppState>,
    Path((id, page)): Path<(String, u32)>,
    Form(form): Form<MoveForm>,
) -> Result<Redirect, ApiError> {
    let (bytes, mut meta) = open_session(&state, &id).await?;

    let updated = pagedeck_core::move_page(&bytes, page, form.to)?;
    write_document(&state, &id, &updated).await?;

    meta.move_page(page, form.to);
    state.save_meta(&id, &meta).await?;

    tracing::info!("Session {}: moved page {} to {}", id, page, form.to);
    Ok(redirect_to_edit(&id))
}

/// Handler: GET /download/:id
///
/// Serves the edited document as an attachment and removes the session:
/// downloads are one-shot, nothing lingers on the server afterwards.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, [(String, String); 2], Vec<u8>), ApiError> {
    let (bytes, meta) = open_session(&state, &id).await?;
    let download_name = meta.download_name();

    state.remove_session(&id).await;
    tracing::info!("Session {}: downloaded and removed", id);

    Ok((
        StatusCode::OK,
        [
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                format!("attachment; filename=\"{}\"", download_name),
            ),
        ],
        bytes,
    ))
}

fn redirect_to_edit(id: &str) -> Redirect {
    Redirect::to(&format!("/edit/{}", id))
}

/// Validate the session id, read the document and its sidecar, and enforce
/// the session TTL. Every session route goes through here, so an expired
/// session answers 410 (and is removed) no matter which action hits it.
async fn open_session(state: &AppState, id: &str) -> Result<(Vec<u8>, SessionMeta), ApiError> {
    AppState::check_session_id(id)?;
    let bytes = read_session_pdf(state, id).await?;

    let page_count = pagedeck_core::page_count(&bytes)?;
    let meta = state.load_meta(id, page_count).await;

    if state.is_expired(&meta) {
        state.remove_session(id).await;
        return Err(ApiError::SessionExpired);
    }

    Ok((bytes, meta))
}

async fn read_session_pdf(state: &AppState, id: &str) -> Result<Vec<u8>, ApiError> {
    match tokio::fs::read(state.pdf_path(id)).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::SessionNotFound(id.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Replace the session document through a tmp-file rename, so a failed
/// save never leaves a half-written PDF behind.
async fn write_document(state: &AppState, id: &str, bytes: &[u8]) -> Result<(), ApiError> {
    let path = state.pdf_path(id);
    let tmp = state.upload_dir.join(format!("{}.pdf.tmp", id));
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, &path).await?;
    Ok(())
}

fn multipart_error(state: &AppState, err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::UploadTooLarge(state.max_upload_mb)
    } else {
        ApiError::InvalidRequest(format!("Failed to read upload: {}", err))
    }
}
