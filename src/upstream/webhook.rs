//! Client for the external chat webhook.
//!
//! Contract: `POST {action: "sendMessage", sessionId, chatInput}` answered by
//! `{response, sessionId}` on success or `{error}` on failure.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::WebhookConfig;
use crate::observability::metrics;

/// Why a webhook call failed. Never shown to the client verbatim.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook URL is not configured")]
    NotConfigured,

    #[error("webhook did not answer within {0:?}")]
    Timeout(Duration),

    #[error("webhook returned status {0}")]
    Status(u16),

    #[error("webhook request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("webhook response was not understood: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("webhook reported an error: {0}")]
    Upstream(String),
}

impl WebhookError {
    fn outcome(&self) -> &'static str {
        match self {
            WebhookError::NotConfigured => "not_configured",
            WebhookError::Timeout(_) => "timeout",
            WebhookError::Status(_) => "bad_status",
            WebhookError::Transport(_) => "transport",
            WebhookError::Malformed(_) => "malformed",
            WebhookError::Upstream(_) => "upstream_error",
        }
    }
}

#[derive(Debug, Serialize)]
struct WebhookRequest<'a> {
    action: &'static str,
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    #[serde(rename = "chatInput")]
    chat_input: &'a str,
}

/// A successful webhook answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WebhookReply {
    pub response: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WebhookResponse {
    Failure { error: String },
    Reply(WebhookReply),
}

/// Forwards chat messages to the configured webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    url: Option<Url>,
    timeout: Duration,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Self {
        let url = config.url.as_deref().and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!(error = %e, "Webhook URL could not be parsed; chat is disabled");
                None
            }
        });

        Self {
            client: reqwest::Client::new(),
            url,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Send one message and wait for the webhook's reply.
    pub async fn send_message(
        &self,
        message: &str,
        session_id: &str,
    ) -> Result<WebhookReply, WebhookError> {
        let start = Instant::now();
        let result = self.exchange(message, session_id).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };
        metrics::record_upstream(outcome, start);

        result
    }

    async fn exchange(&self, message: &str, session_id: &str) -> Result<WebhookReply, WebhookError> {
        let url = self.url.as_ref().ok_or(WebhookError::NotConfigured)?;

        let body = WebhookRequest {
            action: "sendMessage",
            session_id,
            chat_input: message,
        };

        let response = self
            .client
            .post(url.clone())
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        match serde_json::from_slice::<WebhookResponse>(&bytes)? {
            WebhookResponse::Reply(reply) => Ok(reply),
            WebhookResponse::Failure { error } => Err(WebhookError::Upstream(error)),
        }
    }

    fn classify(&self, error: reqwest::Error) -> WebhookError {
        if error.is_timeout() {
            WebhookError::Timeout(self.timeout)
        } else {
            WebhookError::Transport(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = WebhookRequest {
            action: "sendMessage",
            session_id: "3f2b8c1e-9d4a-4e7b-8a61-0c5d2e9f7a13",
            chat_input: "Hello",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "action": "sendMessage",
                "sessionId": "3f2b8c1e-9d4a-4e7b-8a61-0c5d2e9f7a13",
                "chatInput": "Hello",
            })
        );
    }

    #[test]
    fn test_response_shapes() {
        let reply: WebhookResponse =
            serde_json::from_str(r#"{"response":"Hi","sessionId":"abc"}"#).unwrap();
        assert!(matches!(reply, WebhookResponse::Reply(r) if r.response == "Hi"));

        let failure: WebhookResponse =
            serde_json::from_str(r#"{"error":"workflow failed","response":"ignored"}"#).unwrap();
        assert!(matches!(failure, WebhookResponse::Failure { error } if error == "workflow failed"));

        assert!(serde_json::from_str::<WebhookResponse>(r#"{"unexpected":true}"#).is_err());
    }

    #[tokio::test]
    async fn test_unconfigured_fails_closed() {
        let client = WebhookClient::new(&WebhookConfig::default());
        assert!(!client.is_configured());
        let err = client.send_message("hi", "id").await.unwrap_err();
        assert!(matches!(err, WebhookError::NotConfigured));
    }
}
