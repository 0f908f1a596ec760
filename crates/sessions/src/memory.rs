//! Session-keyed conversation memory.
//!
//! Memory is mutated only by the owning session's turn orchestrator:
//! appends are monotonic, never reordered or deleted. Strict user/assistant
//! alternation is NOT enforced — only ordering is.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use mw_domain::chat::Turn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Per-session memory
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug)]
struct SessionMemory {
    turns: Vec<Turn>,
    last_activity: DateTime<Utc>,
}

impl SessionMemory {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            turns: Vec::new(),
            last_activity: now,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Session-keyed store of conversation memories.
///
/// Sessions are created on first use and removed on explicit end or by
/// the idle-expiry sweep.
#[derive(Default)]
pub struct MemoryStore {
    sessions: RwLock<HashMap<String, SessionMemory>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a session's transcript, oldest first. An unknown
    /// session reads as empty — it is created on the first append.
    pub fn history(&self, session_id: &str) -> Vec<Turn> {
        self.sessions
            .read()
            .get(session_id)
            .map(|m| m.turns.clone())
            .unwrap_or_default()
    }

    /// Append turns in order, creating the session on first use.
    ///
    /// The caller passes the user turn and the assistant turn of one
    /// completed exchange together so they commit as an ordered unit.
    pub fn append(&self, session_id: &str, turns: impl IntoIterator<Item = Turn>) {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let memory = sessions
            .entry(session_id.to_owned())
            .or_insert_with(|| SessionMemory::new(now));
        memory.turns.extend(turns);
        memory.last_activity = now;
    }

    /// Mark activity without mutating the transcript (e.g. a submitted
    /// turn that is still generating).
    pub fn touch(&self, session_id: &str) {
        let mut sessions = self.sessions.write();
        if let Some(memory) = sessions.get_mut(session_id) {
            memory.last_activity = Utc::now();
        }
    }

    /// Tear down one session. Returns `false` if it did not exist.
    pub fn end(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().remove(session_id).is_some();
        if removed {
            tracing::info!(session_id, "session memory torn down");
        }
        removed
    }

    /// Remove sessions idle for longer than `max_idle`. Returns the
    /// removed session ids so the caller can drop their locks too.
    pub fn expire_idle(&self, max_idle: Duration, now: DateTime<Utc>) -> Vec<String> {
        let mut sessions = self.sessions.write();
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, m)| now - m.last_activity > max_idle)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        if !expired.is_empty() {
            tracing::info!(expired = expired.len(), "idle sessions expired");
        }
        expired
    }

    /// Number of live sessions (for monitoring).
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }
}
