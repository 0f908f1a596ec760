//! Twilio-wire-compatible REST client.

use std::time::Duration;

use reqwest::Client;

use mw_domain::config::EscalationConfig;
use mw_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provider trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Places one outbound voice call. The production implementation talks to
/// a Twilio-compatible endpoint; tests substitute a recording stub.
#[async_trait::async_trait]
pub trait VoiceCallProvider: Send + Sync {
    /// Place a single call from `from` to `to`, playing the voice
    /// document at `voice_url` when it connects. One attempt, no retry.
    async fn place_call(&self, to: &str, from: &str, voice_url: &str) -> Result<()>;

    fn provider_id(&self) -> &str;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the Twilio calls API.
///
/// Created once at bootstrap and reused; the underlying `reqwest::Client`
/// maintains a connection pool. Credentials come from the environment
/// variables named in the config.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    http: Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioClient {
    /// Build a new client from the escalation config.
    ///
    /// Fails fast when the credential env vars are unset — a missing
    /// credential must surface at bootstrap, not on the first crisis.
    pub fn from_config(cfg: &EscalationConfig) -> Result<Self> {
        let account_sid = std::env::var(&cfg.account_sid_env).map_err(|_| {
            Error::Config(format!(
                "environment variable '{}' not set or not valid UTF-8",
                cfg.account_sid_env
            ))
        })?;
        let auth_token = std::env::var(&cfg.auth_token_env).map_err(|_| {
            Error::Config(format!(
                "environment variable '{}' not set or not valid UTF-8",
                cfg.auth_token_env
            ))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            account_sid,
            auth_token,
        })
    }

    /// The calls endpoint for this account.
    fn calls_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Calls.json",
            self.base_url, self.account_sid
        )
    }
}

#[async_trait::async_trait]
impl VoiceCallProvider for TwilioClient {
    async fn place_call(&self, to: &str, from: &str, voice_url: &str) -> Result<()> {
        let params = [("To", to), ("From", from), ("Url", voice_url)];

        let resp = self
            .http
            .post(self.calls_url())
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(e.to_string())
                } else {
                    Error::Http(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Telephony(format!("HTTP {status}: {body}")));
        }

        Ok(())
    }

    fn provider_id(&self) -> &str {
        "twilio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> TwilioClient {
        TwilioClient {
            http: Client::new(),
            base_url: "https://api.twilio.example".into(),
            account_sid: "AC123".into(),
            auth_token: "secret".into(),
        }
    }

    #[test]
    fn calls_url_embeds_account_sid() {
        let client = test_client();
        assert_eq!(
            client.calls_url(),
            "https://api.twilio.example/2010-04-01/Accounts/AC123/Calls.json"
        );
    }

    #[test]
    fn from_config_fails_without_credentials() {
        let cfg = EscalationConfig {
            account_sid_env: "MW_TEST_MISSING_SID_VAR".into(),
            auth_token_env: "MW_TEST_MISSING_TOKEN_VAR".into(),
            ..Default::default()
        };
        assert!(TwilioClient::from_config(&cfg).is_err());
    }
}
