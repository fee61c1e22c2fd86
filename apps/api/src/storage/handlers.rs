use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::CvDocument;
use crate::state::AppState;
use crate::storage::{load_snapshot, save_snapshot};

#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    pub key: String,
}

/// POST /api/v1/documents/:id/snapshot
pub async fn handle_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SnapshotResponse>, AppError> {
    let storage = state.storage.as_ref().ok_or(AppError::StorageUnavailable)?;
    let doc = state.documents.get(id).await?;
    let key = save_snapshot(storage.as_ref(), &doc).await?;
    Ok(Json(SnapshotResponse { key }))
}

/// POST /api/v1/documents/:id/restore
///
/// Loads the stored snapshot into memory, replacing any in-memory copy.
pub async fn handle_restore(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CvDocument>, AppError> {
    let storage = state.storage.as_ref().ok_or(AppError::StorageUnavailable)?;
    let doc = load_snapshot(storage.as_ref(), id).await?;
    if doc.id != id {
        return Err(AppError::Validation(format!(
            "snapshot for {id} contains document {}",
            doc.id
        )));
    }
    state.documents.insert(doc.clone()).await;
    Ok(Json(doc))
}
