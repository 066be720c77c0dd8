//! Client for the remote demo API.
//!
//! The one place outbound HTTP happens. The remote contract is owned by the
//! external service and consumed as opaque JSON; non-2xx bodies are only
//! inspected far enough to surface their message verbatim.

use serde_json::Value;

use crate::keys::{ApiKeyRequest, IssuedKey};
use crate::playground::WebsiteConfig;

/// Demo endpoint the site is wired to out of the box.
pub const DEFAULT_ENDPOINT: &str = "https://api.atrium.dev/v1";

/// Shared, rate-limited bearer token for illustrative playground calls.
pub const DEFAULT_DEMO_TOKEN: &str = "atr_demo_2c9d41e8";

/// Errors from talking to the demo endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("Demo endpoint unreachable: {0}")]
    Transport(String),

    /// Non-2xx response; `message` comes from the body when present.
    #[error("Demo endpoint returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// HTTP client for the two demo-API operations.
#[derive(Debug, Clone)]
pub struct DemoApiClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl DemoApiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: DEFAULT_DEMO_TOKEN.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/generate/website", self.endpoint.trim_end_matches('/'))
    }

    fn keys_url(&self) -> String {
        format!("{}/keys/generate", self.endpoint.trim_end_matches('/'))
    }

    /// Submit one illustrative generation request.
    pub async fn generate_website(&self, config: &WebsiteConfig) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(self.generate_url())
            .bearer_auth(&self.token)
            .json(config)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        read_json(response).await
    }

    /// Request a demo API key. Unauthenticated by contract.
    pub async fn request_key(&self, request: &ApiKeyRequest) -> Result<IssuedKey, ApiError> {
        let response = self
            .client
            .post(self.keys_url())
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let body = read_json(response).await?;
        IssuedKey::from_response(&body).ok_or_else(|| ApiError::Transport(
            "Key response did not contain an api_key".to_string(),
        ))
    }
}

impl Default for DemoApiClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| extract_message(&body))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))
}

/// Pull a human-readable message out of an error body.
///
/// Accepts the shapes the demo service emits: a top-level `message`, a
/// string `detail`, or a `detail` object wrapping a `message`.
fn extract_message(body: &Value) -> Option<String> {
    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    match body.get("detail") {
        Some(Value::String(detail)) => Some(detail.clone()),
        Some(Value::Object(detail)) => detail
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_top_level_message() {
        let body = json!({"message": "Rate limit exceeded"});
        assert_eq!(extract_message(&body), Some("Rate limit exceeded".into()));
    }

    #[test]
    fn extracts_string_detail() {
        let body = json!({"detail": "Invalid API key"});
        assert_eq!(extract_message(&body), Some("Invalid API key".into()));
    }

    #[test]
    fn extracts_nested_detail_message() {
        let body = json!({"detail": {"message": "Generation failed", "error": "boom"}});
        assert_eq!(extract_message(&body), Some("Generation failed".into()));
    }

    #[test]
    fn missing_message_yields_none() {
        assert_eq!(extract_message(&json!({"status": 500})), None);
    }

    #[test]
    fn urls_tolerate_trailing_slash() {
        let client = DemoApiClient::new().with_endpoint("http://localhost:9/v1/");
        assert_eq!(client.generate_url(), "http://localhost:9/v1/generate/website");
        assert_eq!(client.keys_url(), "http://localhost:9/v1/keys/generate");
    }
}
