use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM provider
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One OpenAI-compatible endpoint backs both the responder and the
/// embedder. The contract holds regardless of which model sits behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the chat-completions endpoint
    /// (e.g. `https://api.groq.com/openai/v1`).
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    /// Chat model used by the responder.
    #[serde(default = "d_model")]
    pub model: String,
    /// Model used to embed retrieval queries.
    #[serde(default = "d_embedding_model")]
    pub embedding_model: String,
    /// Sampling temperature for the responder call.
    #[serde(default = "d_temperature")]
    pub temperature: f32,
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
            model: d_model(),
            embedding_model: d_embedding_model(),
            temperature: d_temperature(),
            timeout_ms: d_timeout_ms(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn d_api_key_env() -> String {
    "MINDWELL_API_KEY".into()
}
fn d_model() -> String {
    "openai/gpt-oss-120b".into()
}
fn d_embedding_model() -> String {
    "nomic-embed-text".into()
}
fn d_temperature() -> f32 {
    0.5
}
fn d_timeout_ms() -> u64 {
    60_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_config_empty_toml_uses_defaults() {
        let cfg: LlmConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.api_key_env, "MINDWELL_API_KEY");
        assert_eq!(cfg.temperature, 0.5);
        assert_eq!(cfg.timeout_ms, 60_000);
    }

    #[test]
    fn llm_config_parses_overrides() {
        let toml_str = r#"
            base_url = "http://localhost:11434/v1"
            model = "llama3"
            temperature = 0.2
        "#;
        let cfg: LlmConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.base_url, "http://localhost:11434/v1");
        assert_eq!(cfg.model, "llama3");
        assert_eq!(cfg.temperature, 0.2);
    }
}
