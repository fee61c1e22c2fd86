//! Axum route handler for PDF export.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::options::{ExportOptions, QualityTier};
use crate::export::output::{deliver, safe_filename, ExportArtifact};
use crate::layout::build_preview;
use crate::state::AppState;
use crate::storage::export_key;

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    /// Overrides only the image fields of `options` (or of the default options).
    pub tier: Option<QualityTier>,
    pub options: Option<ExportOptions>,
    /// Also store the PDF in cloud storage.
    #[serde(default)]
    pub upload: bool,
}

#[derive(Debug, Serialize)]
pub struct StoredExport {
    pub key: String,
}

/// Resolves the options for one request: explicit options, then the tier's
/// image settings on top, falling back to the configured default tier.
pub fn resolve_options(req: &ExportRequest, default_tier: QualityTier) -> ExportOptions {
    match (&req.options, req.tier) {
        (Some(options), Some(tier)) => options.clone().with_tier(tier),
        (Some(options), None) => options.clone(),
        (None, tier) => ExportOptions::for_tier(tier.unwrap_or(default_tier)),
    }
}

/// POST /api/v1/documents/:id/export
///
/// Runs the export pipeline for the document's current content. Only one
/// export per document may be in flight; a concurrent request gets 409.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let doc = state.documents.get(id).await?;
    let options = resolve_options(&req, state.config.export_quality);

    let storage = if req.upload {
        Some(state.storage.clone().ok_or(AppError::StorageUnavailable)?)
    } else {
        None
    };

    let _permit = state
        .export_guard
        .try_acquire(id)
        .ok_or(AppError::ExportInProgress(id))?;

    info!(
        "Exporting document {id} as '{}' ({:?}, quality {}, scale {})",
        options.filename, options.image.format, options.image.quality, options.canvas.scale
    );

    let preview = build_preview(&doc, options.content_box_pt().0);
    let bytes = state.exporter.export(preview, options.clone()).await?;

    // Upload only once the requested output exists, so a failed save leaves no object behind.
    let upload = storage.map(|storage| (storage, bytes.clone()));
    let artifact = deliver(bytes, &options.filename, options.output, &state.config.export_dir).await?;

    let stored = match upload {
        Some((storage, bytes)) => {
            let key = export_key(id, &safe_filename(&options.filename));
            storage.put_object(&key, bytes, "application/pdf").await?;
            Some(StoredExport { key })
        }
        None => None,
    };

    Ok(match artifact {
        ExportArtifact::Bytes { filename, bytes } => {
            let mut response = (
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                Bytes::from(bytes),
            )
                .into_response();
            if let Some(stored) = stored {
                if let Ok(value) = stored.key.parse() {
                    response.headers_mut().insert("x-storage-key", value);
                }
            }
            response
        }
        ExportArtifact::DataUri { filename, data_uri } => Json(json!({
            "filename": filename,
            "data_uri": data_uri,
            "stored": stored,
        }))
        .into_response(),
        ExportArtifact::Saved { filename, path } => Json(json!({
            "filename": filename,
            "path": path.display().to_string(),
            "stored": stored,
        }))
        .into_response(),
    })
}
