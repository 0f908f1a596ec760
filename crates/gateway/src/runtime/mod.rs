//! Core runtime — prompt assembly and the per-session turn orchestrator.

pub mod prompt;
pub mod turn;

pub use turn::{submit_turn, TurnError, TurnInput};
