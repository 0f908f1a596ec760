//! Session state for Mindwell.
//!
//! Each session owns an append-only conversation memory and a generation
//! lock. Both live in explicit session-keyed maps: created on first use,
//! torn down on explicit end or idle expiry — state is bounded by session
//! lifetime, nothing is persisted.

pub mod lock;
pub mod memory;

pub use lock::{SessionBusy, SessionLockMap};
pub use memory::MemoryStore;
