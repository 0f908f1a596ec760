//! AppState construction and background-task spawning.
//!
//! Shared by `serve` and the one-shot `run` command so both boot the full
//! pipeline the same way.

use std::sync::Arc;

use anyhow::Context;

use mw_domain::config::{Config, ConfigSeverity};
use mw_knowledge::{KnowledgeIndex, Retriever};
use mw_providers::{LlmProvider, OpenAiCompatProvider};
use mw_sessions::{MemoryStore, SessionLockMap};
use mw_telephony::{EscalationTrigger, TwilioClient};

use crate::state::AppState;

/// Validate config, initialize every subsystem and return a fully-wired
/// [`AppState`].
///
/// A knowledge-index failure is fatal here: without the store the
/// responder cannot ground anything, so the whole pipeline stays down.
pub async fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    if issues.iter().any(|i| i.severity == ConfigSeverity::Error) {
        anyhow::bail!(
            "config validation failed with {} error(s)",
            issues
                .iter()
                .filter(|i| i.severity == ConfigSeverity::Error)
                .count()
        );
    }

    // ── LLM provider ─────────────────────────────────────────────────
    let llm: Arc<dyn LlmProvider> = Arc::new(
        OpenAiCompatProvider::from_config(&config.llm)
            .context("initializing LLM provider")?,
    );
    tracing::info!(
        base_url = %config.llm.base_url,
        model = %config.llm.model,
        "LLM provider ready"
    );

    // ── Knowledge index (fatal on failure) ───────────────────────────
    let index = Arc::new(
        KnowledgeIndex::load(&config.knowledge.index_path)
            .context("loading knowledge index")?,
    );
    let retriever = Retriever::new(index, llm.clone(), config.knowledge.top_k);
    tracing::info!(top_k = config.knowledge.top_k, "retriever ready");

    // ── Escalation trigger ───────────────────────────────────────────
    let escalation = if config.escalation.enabled {
        let client = Arc::new(
            TwilioClient::from_config(&config.escalation)
                .context("initializing telephony client")?,
        );
        tracing::info!(
            contact = %config.escalation.emergency_contact,
            "escalation trigger ready"
        );
        Some(Arc::new(EscalationTrigger::new(client, &config.escalation)))
    } else {
        tracing::warn!("escalation disabled — harmful verdicts will only be logged");
        None
    };

    // ── Session state ────────────────────────────────────────────────
    let memory = Arc::new(MemoryStore::new());
    let session_locks = Arc::new(SessionLockMap::new());
    tracing::info!("session memory + lock map ready");

    Ok(AppState {
        config,
        llm,
        retriever,
        escalation,
        memory,
        session_locks,
    })
}

/// Spawn the idle-expiry sweep. Sessions idle past the configured
/// timeout lose their memory and lock entries.
pub fn spawn_background_tasks(state: &AppState) {
    let idle_minutes = state.config.sessions.idle_timeout_minutes;
    if idle_minutes == 0 {
        tracing::info!("idle expiry disabled (sessions.idle_timeout_minutes = 0)");
        return;
    }

    let sweep_interval =
        std::time::Duration::from_secs(state.config.sessions.sweep_interval_secs.max(1));
    let memory = state.memory.clone();
    let locks = state.session_locks.clone();

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            memory.expire_idle(
                chrono::Duration::minutes(i64::from(idle_minutes)),
                chrono::Utc::now(),
            );
            // Drops lock entries that aren't currently held; a
            // generating session is never idle (touched at turn start).
            locks.prune_idle();
        }
    });
    tracing::info!(
        idle_minutes,
        sweep_secs = sweep_interval.as_secs(),
        "idle expiry sweep running"
    );
}
