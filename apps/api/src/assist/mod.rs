//! Writing assistant: suggests a polished rewrite of one field.
//!
//! Suggestions are returned to the caller and never applied automatically.

pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::FieldId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub field: FieldId,
    pub original: String,
    pub suggestion: String,
}

#[derive(Deserialize)]
struct SuggestionReply {
    suggestion: String,
}

pub async fn suggest_rewrite(
    llm: &LlmClient,
    field: FieldId,
    text: &str,
) -> Result<Suggestion, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is empty")));
    }

    let prompt = prompts::build_rewrite_prompt(field, text);
    let reply: SuggestionReply = llm
        .complete_json(&prompt, prompts::REWRITE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Failed to rewrite {field}: {e}")))?;

    Ok(Suggestion {
        field,
        original: text.to_string(),
        suggestion: reply.suggestion.trim().to_string(),
    })
}
