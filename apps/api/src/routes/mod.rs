pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assist::handlers as assist;
use crate::export::handlers as export;
use crate::form::handlers as documents;
use crate::state::AppState;
use crate::storage::handlers as storage;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Documents and field edits
        .route("/api/v1/documents", post(documents::handle_create_document))
        .route("/api/v1/documents/:id", get(documents::handle_get_document))
        .route(
            "/api/v1/documents/:id/fields",
            post(documents::handle_change_field),
        )
        .route(
            "/api/v1/documents/:id/fields/:field/replace",
            post(documents::handle_replace_in_field),
        )
        .route(
            "/api/v1/documents/:id/fields/:field/suggest",
            post(assist::handle_suggest),
        )
        .route("/api/v1/documents/:id/preview", get(documents::handle_preview))
        .route("/api/v1/documents/:id/editor", get(documents::handle_editor_page))
        // Export
        .route("/api/v1/documents/:id/export", post(export::handle_export))
        // Cloud storage
        .route("/api/v1/documents/:id/snapshot", post(storage::handle_snapshot))
        .route("/api/v1/documents/:id/restore", post(storage::handle_restore))
        .with_state(state)
}

#[cfg(test)]
mod tests;
