//! OpenAI-compatible adapter.
//!
//! Works with OpenAI, Groq, Together, Ollama, vLLM, LM Studio, and any
//! other endpoint that follows the OpenAI chat completions contract.
//! One instance serves both the responder (chat completions) and the
//! embedder (embeddings endpoint).

use std::sync::Arc;

use serde_json::Value;

use mw_domain::chat::{Message, Role};
use mw_domain::config::LlmConfig;
use mw_domain::error::{Error, Result};

use crate::traits::{
    ChatRequest, ChatResponse, EmbeddingsRequest, EmbeddingsResponse, LlmProvider,
};
use crate::util::from_reqwest;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Adapter struct
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// An LLM provider adapter for any OpenAI-compatible API endpoint.
pub struct OpenAiCompatProvider {
    id: String,
    base_url: String,
    api_key: Arc<str>,
    default_model: String,
    default_embedding_model: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new provider from the LLM config.
    ///
    /// The API key is read once from the configured environment variable;
    /// a missing key fails construction rather than the first request.
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env).map_err(|_| {
            Error::Config(format!(
                "environment variable '{}' not set or not valid UTF-8",
                cfg.api_key_env
            ))
        })?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self {
            id: "openai_compat".into(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            default_model: cfg.model.clone(),
            default_embedding_model: cfg.embedding_model.clone(),
            client,
        })
    }

    // ── Internal: build authenticated request builder ──────────────

    fn authed_post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
    }

    // ── Internal: build the JSON body ─────────────────────────────

    fn build_chat_body(&self, req: &ChatRequest) -> Value {
        let messages: Vec<Value> = req.messages.iter().map(msg_to_openai).collect();
        let model = req
            .model
            .clone()
            .unwrap_or_else(|| self.default_model.clone());

        let mut body = serde_json::json!({
            "model": model,
            "messages": messages,
        });

        if let Some(temp) = req.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = req.max_tokens {
            body["max_tokens"] = serde_json::json!(max);
        }
        if req.json_mode {
            body["response_format"] = serde_json::json!({"type": "json_object"});
        }
        body
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Message serialization helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn role_to_str(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn msg_to_openai(msg: &Message) -> Value {
    serde_json::json!({
        "role": role_to_str(msg.role),
        "content": msg.content,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response deserialization helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn parse_chat_response(body: &Value) -> Result<ChatResponse> {
    let choice = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: "openai_compat".into(),
            message: "no choices in response".into(),
        })?;

    let message = choice.get("message").ok_or_else(|| Error::Provider {
        provider: "openai_compat".into(),
        message: "no message in choice".into(),
    })?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();

    let finish_reason = choice
        .get("finish_reason")
        .and_then(|v| v.as_str())
        .map(String::from);

    let model = body
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    Ok(ChatResponse {
        content,
        model,
        finish_reason,
    })
}

fn parse_embeddings_response(body: &Value) -> Result<EmbeddingsResponse> {
    let data = body
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| Error::Provider {
            provider: "openai_compat".into(),
            message: "no data in embeddings response".into(),
        })?;

    let mut embeddings = Vec::with_capacity(data.len());
    for item in data {
        let vector = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| Error::Provider {
                provider: "openai_compat".into(),
                message: "embedding item missing vector".into(),
            })?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        embeddings.push(vector);
    }

    Ok(EmbeddingsResponse { embeddings })
}

/// Read an error body into a provider error, keeping the status code.
async fn error_from_response(resp: reqwest::Response) -> Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Error::Provider {
        provider: "openai_compat".into(),
        message: format!("HTTP {status}: {body}"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl LlmProvider for OpenAiCompatProvider {
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.build_chat_body(&req);

        let resp = self
            .authed_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let json: Value = resp.json().await.map_err(from_reqwest)?;
        parse_chat_response(&json)
    }

    async fn embeddings(&self, req: EmbeddingsRequest) -> Result<EmbeddingsResponse> {
        let url = format!("{}/embeddings", self.base_url);
        let model = req
            .model
            .clone()
            .unwrap_or_else(|| self.default_embedding_model.clone());
        let body = serde_json::json!({
            "model": model,
            "input": req.input,
        });

        let resp = self
            .authed_post(&url)
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let json: Value = resp.json().await.map_err(from_reqwest)?;
        parse_embeddings_response(&json)
    }

    fn provider_id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> OpenAiCompatProvider {
        OpenAiCompatProvider {
            id: "openai_compat".into(),
            base_url: "https://api.example.test/v1".into(),
            api_key: "sk-test".into(),
            default_model: "test-model".into(),
            default_embedding_model: "test-embed".into(),
            client: reqwest::Client::new(),
        }
    }

    #[test]
    fn chat_body_includes_json_mode() {
        let provider = test_provider();
        let req = ChatRequest {
            messages: vec![Message::user("hello")],
            json_mode: true,
            temperature: Some(0.5),
            ..Default::default()
        };
        let body = provider.build_chat_body(&req);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["temperature"], 0.5);
    }

    #[test]
    fn chat_body_omits_optionals_when_unset() {
        let provider = test_provider();
        let req = ChatRequest {
            messages: vec![Message::system("sys")],
            ..Default::default()
        };
        let body = provider.build_chat_body(&req);
        assert!(body.get("response_format").is_none());
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn chat_body_model_override_wins() {
        let provider = test_provider();
        let req = ChatRequest {
            messages: vec![Message::user("hi")],
            model: Some("other-model".into()),
            ..Default::default()
        };
        let body = provider.build_chat_body(&req);
        assert_eq!(body["model"], "other-model");
    }

    #[test]
    fn parses_chat_response_content() {
        let body = serde_json::json!({
            "model": "test-model",
            "choices": [{
                "message": {"role": "assistant", "content": "{\"a\":1}"},
                "finish_reason": "stop"
            }]
        });
        let resp = parse_chat_response(&body).unwrap();
        assert_eq!(resp.content, "{\"a\":1}");
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn chat_response_without_choices_is_provider_error() {
        let body = serde_json::json!({"model": "m"});
        assert!(parse_chat_response(&body).is_err());
    }

    #[test]
    fn parses_embeddings_response_vectors() {
        let body = serde_json::json!({
            "data": [
                {"embedding": [0.1, 0.2]},
                {"embedding": [0.3, 0.4]},
            ]
        });
        let resp = parse_embeddings_response(&body).unwrap();
        assert_eq!(resp.embeddings.len(), 2);
        assert_eq!(resp.embeddings[0].len(), 2);
    }

    #[test]
    fn embeddings_response_without_data_is_provider_error() {
        let body = serde_json::json!({"object": "list"});
        assert!(parse_embeddings_response(&body).is_err());
    }
}
