//! Axum route handlers for documents and their fields.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::ExportOptions;
use crate::form::apply_change;
use crate::layout::{build_preview, FontFamily, PreviewDocument};
use crate::models::{CvDocument, FieldId};
use crate::render::html::{render_editor_page, render_preview};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateDocumentRequest {
    #[serde(default)]
    pub theme: FontFamily,
    /// Initial values; each goes through the same change path as an edit.
    #[serde(default)]
    pub fields: Vec<FieldChange>,
}

#[derive(Debug, Deserialize)]
pub struct FieldChange {
    pub field: FieldId,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceRequest {
    pub find: String,
    pub replacement: String,
}

#[derive(Debug, Serialize)]
pub struct FieldResponse {
    pub field: FieldId,
    pub value: String,
    /// Text of the updated preview, one block per line.
    pub preview_text: String,
}

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub field: FieldId,
    pub value: String,
    pub replacements: usize,
    pub preview_text: String,
}

/// Parses the `:field` path segment.
pub fn parse_field(raw: &str) -> Result<FieldId, AppError> {
    raw.parse::<FieldId>().map_err(AppError::Validation)
}

/// The on-screen preview uses the same content width as the default export,
/// so the two wrap identically.
pub fn screen_preview(doc: &CvDocument) -> PreviewDocument {
    build_preview(doc, ExportOptions::default().content_box_pt().0)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/documents
pub async fn handle_create_document(
    State(state): State<AppState>,
    Json(req): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<CvDocument>), AppError> {
    let mut doc = CvDocument::new(req.theme);
    for change in req.fields {
        apply_change(&mut doc, change.field, change.value);
    }
    info!("Created document {}", doc.id);
    state.documents.insert(doc.clone()).await;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /api/v1/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CvDocument>, AppError> {
    Ok(Json(state.documents.get(id).await?))
}

/// POST /api/v1/documents/:id/fields
///
/// One change event from a field control. The value is stored as given.
pub async fn handle_change_field(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(change): Json<FieldChange>,
) -> Result<Json<FieldResponse>, AppError> {
    let field = change.field;
    let doc = state
        .documents
        .update(id, |doc| {
            apply_change(doc, field, change.value);
            doc.clone()
        })
        .await?;
    debug!("Document {id}: {field} changed ({} chars)", doc.field(field).len());

    Ok(Json(FieldResponse {
        field,
        value: doc.field(field).to_string(),
        preview_text: screen_preview(&doc).plain_text(),
    }))
}

/// POST /api/v1/documents/:id/fields/:field/replace
pub async fn handle_replace_in_field(
    State(state): State<AppState>,
    Path((id, field)): Path<(Uuid, String)>,
    Json(req): Json<ReplaceRequest>,
) -> Result<Json<ReplaceResponse>, AppError> {
    let field = parse_field(&field)?;
    let (replacements, doc) = state
        .documents
        .update(id, |doc| {
            let n = doc.replace_in_field(field, &req.find, &req.replacement);
            (n, doc.clone())
        })
        .await?;
    debug!("Document {id}: replaced {replacements} occurrence(s) in {field}");

    Ok(Json(ReplaceResponse {
        field,
        value: doc.field(field).to_string(),
        replacements,
        preview_text: screen_preview(&doc).plain_text(),
    }))
}

/// GET /api/v1/documents/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let doc = state.documents.get(id).await?;
    Ok(Html(render_preview(&screen_preview(&doc))))
}

/// GET /api/v1/documents/:id/editor
pub async fn handle_editor_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let doc = state.documents.get(id).await?;
    let preview = screen_preview(&doc);
    Ok(Html(render_editor_page(&doc, &preview)))
}
