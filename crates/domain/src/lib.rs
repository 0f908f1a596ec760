//! Shared domain types for Mindwell.
//!
//! Everything the other crates agree on lives here: the chat data model
//! (turns, provider messages, the structured model-output contract), the
//! configuration tree, and the shared error type.

pub mod chat;
pub mod config;
pub mod error;
