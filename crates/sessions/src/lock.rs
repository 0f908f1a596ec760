//! Per-session generation locks.
//!
//! Ensures at most one turn is in flight per session. A second message
//! arriving while a turn is generating is rejected with a "busy" error —
//! the UI collaborator suppresses input while a turn runs, so a rejection
//! only ever hits clients that bypassed it.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Manages per-session generation locks.
///
/// Each session id maps to a `Semaphore(1)`. Holding the permit is the
/// `Generating` state; dropping it returns the session to `Idle`.
pub struct SessionLockMap {
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Default for SessionLockMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLockMap {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the generation lock for a session.
    ///
    /// Returns `Ok(permit)` when the session was idle (hold it for the
    /// duration of the turn — it auto-releases on drop).
    ///
    /// Returns `Err(SessionBusy)` when a turn is already generating for
    /// this session.
    pub fn acquire(&self, session_id: &str) -> Result<OwnedSemaphorePermit, SessionBusy> {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(session_id.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        match sem.try_acquire_owned() {
            Ok(permit) => Ok(permit),
            Err(TryAcquireError::NoPermits) | Err(TryAcquireError::Closed) => Err(SessionBusy),
        }
    }

    /// Number of tracked sessions (for monitoring).
    pub fn session_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Drop the lock entry for a session that no longer exists.
    pub fn remove(&self, session_id: &str) {
        self.locks.lock().remove(session_id);
    }

    /// Remove lock entries for sessions that aren't actively held (cleanup).
    pub fn prune_idle(&self) {
        let mut locks = self.locks.lock();
        locks.retain(|_, sem| sem.available_permits() == 0);
    }
}

/// Error returned when a turn is already in progress for the session.
#[derive(Debug)]
pub struct SessionBusy;

impl std::fmt::Display for SessionBusy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session is busy — a turn is already in progress")
    }
}

impl std::error::Error for SessionBusy {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_access() {
        let map = SessionLockMap::new();

        let permit1 = map.acquire("s1").unwrap();
        drop(permit1);

        let permit2 = map.acquire("s1").unwrap();
        drop(permit2);
    }

    #[test]
    fn different_sessions_concurrent() {
        let map = SessionLockMap::new();

        let p1 = map.acquire("s1").unwrap();
        let p2 = map.acquire("s2").unwrap();

        // Both acquired simultaneously.
        assert_eq!(map.session_count(), 2);

        drop(p1);
        drop(p2);
    }

    #[test]
    fn same_session_rejected_while_held() {
        let map = SessionLockMap::new();

        let p1 = map.acquire("s1").unwrap();
        assert!(map.acquire("s1").is_err());

        // Releasing the first permit makes the session submittable again.
        drop(p1);
        assert!(map.acquire("s1").is_ok());
    }

    #[test]
    fn prune_keeps_held_locks() {
        let map = SessionLockMap::new();

        let p1 = map.acquire("busy").unwrap();
        let p2 = map.acquire("idle").unwrap();
        drop(p2);

        map.prune_idle();
        assert_eq!(map.session_count(), 1);

        // The held session is still locked after pruning.
        assert!(map.acquire("busy").is_err());
        drop(p1);
    }

    #[test]
    fn remove_drops_the_entry() {
        let map = SessionLockMap::new();
        let permit = map.acquire("s1").unwrap();
        drop(permit);

        map.remove("s1");
        assert_eq!(map.session_count(), 0);
    }
}
