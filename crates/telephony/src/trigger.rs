//! The escalation trigger — one call attempt per harmful verdict.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use mw_domain::config::EscalationConfig;

use crate::client::VoiceCallProvider;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Event
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallOutcome {
    Ok,
    Failed,
}

/// Record of one call attempt. Not persisted beyond the attempt — the
/// log line is the durable trace.
#[derive(Debug, Clone, Serialize)]
pub struct EscalationEvent {
    pub triggered_at: DateTime<Utc>,
    pub target_contact: String,
    pub outcome: CallOutcome,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trigger
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Holds the fixed contact and payload; each [`trigger`](Self::trigger)
/// places exactly one call. The orchestrator dispatches this from a
/// detached task so a telephony outage can never delay a reply.
pub struct EscalationTrigger {
    provider: Arc<dyn VoiceCallProvider>,
    target_contact: String,
    from_number: String,
    voice_url: String,
}

impl EscalationTrigger {
    pub fn new(provider: Arc<dyn VoiceCallProvider>, cfg: &EscalationConfig) -> Self {
        Self {
            provider,
            target_contact: cfg.emergency_contact.clone(),
            from_number: cfg.from_number.clone(),
            voice_url: cfg.voice_url.clone(),
        }
    }

    /// Place the emergency call. Never retries; the outcome is carried on
    /// the returned event and logged — a failure here is degraded, not
    /// fatal, and must stay observable.
    pub async fn trigger(&self) -> EscalationEvent {
        let triggered_at = Utc::now();

        let outcome = match self
            .provider
            .place_call(&self.target_contact, &self.from_number, &self.voice_url)
            .await
        {
            Ok(()) => {
                tracing::info!(
                    provider = self.provider.provider_id(),
                    target = %self.target_contact,
                    "emergency call placed"
                );
                CallOutcome::Ok
            }
            Err(e) => {
                tracing::error!(
                    provider = self.provider.provider_id(),
                    target = %self.target_contact,
                    error = %e,
                    "emergency call failed"
                );
                CallOutcome::Failed
            }
        };

        EscalationEvent {
            triggered_at,
            target_contact: self.target_contact.clone(),
            outcome,
        }
    }
}
