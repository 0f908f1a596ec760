//! Turn execution — the orchestrator that serializes one session's turns
//! through retrieval, generation, the safety branch, and memory commit.
//!
//! Entry point: [`submit_turn`]. One invocation is one pass through the
//! session's `Idle -> Generating -> Idle` state machine; the generation
//! lock permit is the `Generating` state and auto-releases on drop.

use tracing::Instrument;

use mw_domain::chat::{AssistantReply, Message, ModelOutput, Turn};
use mw_providers::ChatRequest;
use mw_telephony::CallOutcome;

use crate::state::AppState;

use super::prompt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Turn input & errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Input to a single turn.
pub struct TurnInput {
    pub session_id: String,
    pub message: String,
}

/// Failure of one submitted turn. Every variant returns the session to
/// `Idle` with its memory untouched.
#[derive(thiserror::Error, Debug)]
pub enum TurnError {
    #[error("message is empty — nothing to submit")]
    EmptyInput,

    #[error("session is busy — a turn is already in progress")]
    SessionBusy,

    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("model call failed: {0}")]
    Provider(String),

    #[error("model output violates the structured contract: {0}")]
    MalformedOutput(String),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// submit_turn — the core orchestrator
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run one turn to completion or failure.
///
/// The pipeline, in order: validate input, acquire the generation lock,
/// retrieve passages for the message, call the model with the full
/// transcript, parse the structured verdict, dispatch escalation on a
/// harmful verdict, commit the user and assistant turns, release the
/// lock (on drop). No cancellation and no retries — each turn attempts
/// each external call exactly once.
pub async fn submit_turn(
    state: &AppState,
    input: TurnInput,
) -> Result<AssistantReply, TurnError> {
    let message = input.message.trim();
    if message.is_empty() {
        // Rejected before any state change.
        return Err(TurnError::EmptyInput);
    }

    // Idle -> Generating. A second submission for this session is
    // rejected, never run concurrently. The permit is held across the
    // whole pipeline and releases on drop, including early returns.
    let _permit = state
        .session_locks
        .acquire(&input.session_id)
        .map_err(|_| TurnError::SessionBusy)?;

    let turn_id = uuid::Uuid::new_v4();
    let turn_span = tracing::info_span!(
        "turn",
        %turn_id,
        session_id = %input.session_id,
    );

    async {
        state.memory.touch(&input.session_id);

        // Snapshot the transcript before this turn. The user turn is
        // staged, not appended: a failed turn must leave memory
        // untouched.
        let history = state.memory.history(&input.session_id);

        // ── Retrieval ────────────────────────────────────────────────
        let passages = state
            .retriever
            .retrieve(message)
            .await
            .map_err(|e| TurnError::Retrieval(e.to_string()))?;
        tracing::debug!(passages = passages.len(), "retrieval complete");

        // ── Model call ───────────────────────────────────────────────
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(prompt::build_system_prompt(&passages)));
        messages.extend(history.iter().map(Message::from));
        messages.push(Message::user(message));

        let response = state
            .llm
            .chat(ChatRequest {
                messages,
                temperature: Some(state.config.llm.temperature),
                max_tokens: None,
                json_mode: true,
                model: None,
            })
            .await
            .map_err(|e| TurnError::Provider(e.to_string()))?;

        let output = ModelOutput::parse(&response.content)
            .map_err(|e| TurnError::MalformedOutput(e.to_string()))?;

        // ── Safety branch ────────────────────────────────────────────
        let escalated = output.is_harmful;
        if output.is_harmful {
            tracing::warn!("harmful verdict — dispatching escalation");
            dispatch_escalation(state);
        }

        // ── Commit ───────────────────────────────────────────────────
        // User turn strictly before the assistant turn, both before the
        // lock releases.
        state.memory.append(
            &input.session_id,
            [Turn::user(message), Turn::assistant(output.message.clone())],
        );

        tracing::info!(escalated, "turn complete");
        Ok(AssistantReply {
            text: output.message,
            escalated,
        })
    }
    .instrument(turn_span)
    .await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Escalation dispatch
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Fire the emergency call as a detached task.
///
/// The reply path never awaits this: a telephony outage degrades the
/// escalation channel, not chat availability. The outcome lands in the
/// log either way — a silent failure here would be a correctness gap.
fn dispatch_escalation(state: &AppState) {
    let Some(trigger) = state.escalation.clone() else {
        tracing::warn!("harmful verdict with escalation disabled — no call placed");
        return;
    };

    tokio::spawn(
        async move {
            let event = trigger.trigger().await;
            if event.outcome == CallOutcome::Failed {
                tracing::error!(
                    target_contact = %event.target_contact,
                    triggered_at = %event.triggered_at,
                    "escalation degraded: emergency call did not go through"
                );
            }
        }
        .instrument(tracing::info_span!("escalation")),
    );
}
