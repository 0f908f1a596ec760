//! Chat API — the primary interface for submitting turns.
//!
//! `POST /v1/chat` — run one turn, return the reply and the escalation
//! flag.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use crate::runtime::{submit_turn, TurnError, TurnInput};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shape
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Stable session identity, supplied by the session gate upstream.
    pub session_id: String,
    /// User message text.
    pub message: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /v1/chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Response {
    let input = TurnInput {
        session_id: body.session_id.clone(),
        message: body.message,
    };

    match submit_turn(&state, input).await {
        Ok(reply) => Json(serde_json::json!({
            "session_id": body.session_id,
            "text": reply.text,
            "escalated": reply.escalated,
        }))
        .into_response(),
        Err(e) => {
            let status = match e {
                TurnError::EmptyInput => StatusCode::BAD_REQUEST,
                TurnError::SessionBusy => StatusCode::TOO_MANY_REQUESTS,
                TurnError::Retrieval(_)
                | TurnError::Provider(_)
                | TurnError::MalformedOutput(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
    }
}
