use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::assist::{suggest_rewrite, Suggestion};
use crate::errors::AppError;
use crate::form::handlers::parse_field;
use crate::state::AppState;

/// POST /api/v1/documents/:id/fields/:field/suggest
///
/// Returns a suggested rewrite of the field. The document is not modified.
pub async fn handle_suggest(
    State(state): State<AppState>,
    Path((id, field)): Path<(Uuid, String)>,
) -> Result<Json<Suggestion>, AppError> {
    let field = parse_field(&field)?;
    let llm = state.llm.as_ref().ok_or(AppError::AssistantUnavailable)?;
    let doc = state.documents.get(id).await?;
    Ok(Json(suggest_rewrite(llm, field, doc.field(field)).await?))
}
