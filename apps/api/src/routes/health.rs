use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Reports service version, where the profile snapshot came from, and whether
/// the assistant currently has a credential.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "portfolio-api",
        "profile_origin": state.profile_origin,
        "assistant_online": state.assistant.is_online(),
    }))
}
