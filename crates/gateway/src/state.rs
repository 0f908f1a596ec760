use std::sync::Arc;

use mw_domain::config::Config;
use mw_knowledge::Retriever;
use mw_providers::LlmProvider;
use mw_sessions::{MemoryStore, SessionLockMap};
use mw_telephony::EscalationTrigger;

/// Shared application state passed to all API handlers.
///
/// Fields are grouped by concern:
/// - **Core services** — config, LLM provider, retriever
/// - **Escalation** — the emergency-call trigger (`None` when disabled)
/// - **Session state** — conversation memory, generation locks
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub llm: Arc<dyn LlmProvider>,
    pub retriever: Retriever,

    // ── Escalation ────────────────────────────────────────────────────
    /// `None` when `[escalation] enabled = false`: harmful verdicts are
    /// logged but no call is placed.
    pub escalation: Option<Arc<EscalationTrigger>>,

    // ── Session state ─────────────────────────────────────────────────
    pub memory: Arc<MemoryStore>,
    pub session_locks: Arc<SessionLockMap>,
}
