//! `mindwell run` — one-shot execution command.
//!
//! Sends a single message through the full pipeline, prints the reply,
//! and exits. Useful for scripting and smoke checks.

use std::sync::Arc;

use mw_domain::config::Config;

use crate::bootstrap;
use crate::runtime::{submit_turn, TurnInput};

/// Execute a single turn and print the reply.
///
/// This is the entry point for `mindwell run "message"`.
pub async fn run(
    config: Arc<Config>,
    message: String,
    session_id: String,
    json_output: bool,
) -> anyhow::Result<()> {
    // Boot the full pipeline (without background tasks).
    let state = bootstrap::build_app_state(config).await?;

    let input = TurnInput {
        session_id,
        message,
    };

    match submit_turn(&state, input).await {
        Ok(reply) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", reply.text);
                if reply.escalated {
                    eprintln!("[escalation dispatched]");
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
