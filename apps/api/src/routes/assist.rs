use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::profile::Language;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssistRequest {
    pub query: String,
    /// Language code, case-insensitive; `en` when omitted.
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssistResponse {
    pub reply: String,
}

/// POST /api/v1/assist
///
/// Forwards the visitor's question to the assistance gateway. Failures of the
/// generation service come back as a localized reply, never as an HTTP error.
pub async fn handle_assist(
    State(state): State<AppState>,
    Json(request): Json<AssistRequest>,
) -> Result<Json<AssistResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let language = match request.language.as_deref() {
        Some(code) => code.parse::<Language>()?,
        None => Language::default(),
    };

    let reply = state
        .assistant
        .get_assistance(&request.query, language)
        .await;

    Ok(Json(AssistResponse { reply }))
}
