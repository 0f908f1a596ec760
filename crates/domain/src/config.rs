mod escalation;
mod knowledge;
mod llm;
mod server;
mod sessions;

pub use escalation::*;
pub use knowledge::*;
pub use llm::*;
pub use server::*;
pub use sessions::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good. Bootstrap aborts
    /// when any issue carries `ConfigSeverity::Error`.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut issues = Vec::new();

        let error = |field: &str, message: String| ConfigError {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message,
        };
        let warning = |field: &str, message: String| ConfigError {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message,
        };

        if self.llm.base_url.trim().is_empty() {
            issues.push(error("llm.base_url", "must not be empty".into()));
        }
        if self.llm.model.trim().is_empty() {
            issues.push(error("llm.model", "must not be empty".into()));
        }
        if self.llm.embedding_model.trim().is_empty() {
            issues.push(error("llm.embedding_model", "must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            issues.push(error(
                "llm.temperature",
                format!("{} is outside the valid range 0.0–2.0", self.llm.temperature),
            ));
        }

        if self.knowledge.top_k == 0 {
            issues.push(error(
                "knowledge.top_k",
                "must be at least 1 — the responder is retrieval-grounded".into(),
            ));
        }

        if self.escalation.enabled {
            if self.escalation.emergency_contact.trim().is_empty() {
                issues.push(error(
                    "escalation.emergency_contact",
                    "escalation is enabled but no emergency contact is set".into(),
                ));
            }
            if self.escalation.from_number.trim().is_empty() {
                issues.push(error(
                    "escalation.from_number",
                    "escalation is enabled but no caller number is set".into(),
                ));
            }
        } else {
            issues.push(warning(
                "escalation.enabled",
                "escalation is disabled — harmful verdicts will only be logged".into(),
            ));
        }

        if self.sessions.idle_timeout_minutes == 0 {
            issues.push(warning(
                "sessions.idle_timeout_minutes",
                "0 disables idle expiry — session memory grows for the process lifetime".into(),
            ));
        }

        issues
    }
}
