//! Chat data model — conversation turns, provider messages, and the
//! structured model-output contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Roles & turns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One entry in a session's conversation memory. Immutable once created;
/// memory only ever holds `User` and `Assistant` turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A message in a provider request (provider-agnostic).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self { role: Role::System, content: text.into() }
    }
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, content: text.into() }
    }
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: text.into() }
    }
}

impl From<&Turn> for Message {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.text.clone(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Structured model output
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The single structured result of one responder invocation.
///
/// The model is contracted to emit exactly this two-field JSON object and
/// nothing else. The completion is untrusted input: `parse` rejects
/// missing fields, extra fields, wrong types, and any surrounding prose
/// or markdown. A rejection is fatal for the turn — the orchestrator
/// never surfaces a partial reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelOutput {
    pub message: String,
    pub is_harmful: bool,
}

/// The raw completion did not match the two-field contract.
#[derive(thiserror::Error, Debug)]
#[error("model output violates the two-field contract: {0}")]
pub struct OutputParseError(#[from] serde_json::Error);

impl ModelOutput {
    /// Parse a raw completion into the two-field contract.
    pub fn parse(raw: &str) -> Result<Self, OutputParseError> {
        Ok(serde_json::from_str(raw.trim())?)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Reply surfaced to the caller
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The success value of one submitted turn. `escalated` reports that the
/// emergency call was dispatched, not that it connected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub text: String,
    pub escalated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_output() {
        let out = ModelOutput::parse(r#"{"message": "hi there", "is_harmful": false}"#).unwrap();
        assert_eq!(out.message, "hi there");
        assert!(!out.is_harmful);
    }

    #[test]
    fn parses_with_surrounding_whitespace() {
        let out =
            ModelOutput::parse("\n  {\"message\": \"ok\", \"is_harmful\": true}\n  ").unwrap();
        assert!(out.is_harmful);
    }

    #[test]
    fn rejects_missing_field() {
        assert!(ModelOutput::parse(r#"{"message": "no verdict"}"#).is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        let raw = r#"{"message": "m", "is_harmful": false, "confidence": 0.9}"#;
        assert!(ModelOutput::parse(raw).is_err());
    }

    #[test]
    fn rejects_wrong_verdict_type() {
        assert!(ModelOutput::parse(r#"{"message": "m", "is_harmful": "true"}"#).is_err());
    }

    #[test]
    fn rejects_markdown_fenced_output() {
        let raw = "```json\n{\"message\": \"m\", \"is_harmful\": false}\n```";
        assert!(ModelOutput::parse(raw).is_err());
    }

    #[test]
    fn rejects_trailing_prose() {
        let raw = r#"{"message": "m", "is_harmful": false} Hope that helps!"#;
        assert!(ModelOutput::parse(raw).is_err());
    }

    #[test]
    fn turn_constructors_set_roles() {
        assert_eq!(Turn::user("a").role, Role::User);
        assert_eq!(Turn::assistant("b").role, Role::Assistant);
    }

    #[test]
    fn message_from_turn_keeps_role_and_text() {
        let turn = Turn::assistant("take care");
        let msg = Message::from(&turn);
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "take care");
    }
}
