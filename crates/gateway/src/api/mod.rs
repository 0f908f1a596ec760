pub mod chat;
pub mod sessions;

use axum::extract::State;
use axum::response::{IntoResponse, Json};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::state::AppState;

/// Build the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Chat (core runtime)
        .route("/v1/chat", post(chat::chat))
        // Session state (for the UI collaborator)
        .route("/v1/sessions/:id/transcript", get(sessions::get_transcript))
        .route("/v1/sessions/:id", delete(sessions::end_session))
}

/// Liveness probe: the pipeline is up iff the knowledge index loaded.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "passages": state.retriever.passage_count(),
        "provider": state.llm.provider_id(),
        "sessions": state.memory.session_count(),
        "escalation_enabled": state.escalation.is_some(),
    }))
}
