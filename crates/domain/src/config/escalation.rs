use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Emergency escalation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outbound emergency-call settings (Twilio-compatible wire format).
///
/// Credentials are read from the named environment variables at bootstrap,
/// never stored in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    #[serde(default = "d_true")]
    pub enabled: bool,
    #[serde(default = "d_provider_url")]
    pub base_url: String,
    #[serde(default = "d_sid_env")]
    pub account_sid_env: String,
    #[serde(default = "d_token_env")]
    pub auth_token_env: String,
    /// Caller number the provider places the call from.
    #[serde(default)]
    pub from_number: String,
    /// The fixed emergency contact that gets called on a harmful verdict.
    #[serde(default)]
    pub emergency_contact: String,
    /// TwiML document the provider plays when the call connects.
    #[serde(default = "d_voice_url")]
    pub voice_url: String,
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: d_provider_url(),
            account_sid_env: d_sid_env(),
            auth_token_env: d_token_env(),
            from_number: String::new(),
            emergency_contact: String::new(),
            voice_url: d_voice_url(),
            timeout_ms: d_timeout_ms(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_true() -> bool {
    true
}
fn d_provider_url() -> String {
    "https://api.twilio.com".into()
}
fn d_sid_env() -> String {
    "MINDWELL_TWILIO_SID".into()
}
fn d_token_env() -> String {
    "MINDWELL_TWILIO_TOKEN".into()
}
fn d_voice_url() -> String {
    "http://demo.twilio.com/docs/voice.xml".into()
}
fn d_timeout_ms() -> u64 {
    15_000
}
