//! Session endpoints for the UI collaborator.
//!
//! - `GET    /v1/sessions/:id/transcript` — the session's turns in order
//! - `DELETE /v1/sessions/:id`            — explicit teardown ("clear chat")

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

use crate::state::AppState;

pub async fn get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let turns = state.memory.history(&session_id);
    Json(serde_json::json!({
        "session_id": session_id,
        "turns": turns,
    }))
    .into_response()
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    // Teardown takes the generation lock: a session cannot be removed
    // out from under an in-flight turn.
    let Ok(_permit) = state.session_locks.acquire(&session_id) else {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({
                "error": "session is busy — a turn is already in progress"
            })),
        )
            .into_response();
    };

    let removed = state.memory.end(&session_id);
    state.session_locks.remove(&session_id);

    if removed {
        Json(serde_json::json!({ "ended": session_id })).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "unknown session" })),
        )
            .into_response()
    }
}
