//! Key-request controller: local validation, one proxy call, one reveal.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{ApiError, DemoApiClient};
use crate::busy::BusyGuard;

/// Minimum accepted company-name length, matching the issuing service.
pub const MIN_COMPANY_LEN: usize = 3;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email pattern")
    })
}

/// The email/company pair posted by the modal form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeyRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company_name: String,
}

impl ApiKeyRequest {
    /// Trim both fields; the wire request carries the normalized values.
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            company_name: self.company_name.trim().to_string(),
        }
    }

    /// Local validation. An empty result means the request may go out.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if !email_pattern().is_match(&self.email) {
            errors.push(FieldError {
                field: "email",
                message: "Enter a valid email address.".to_string(),
            });
        }

        if self.company_name.chars().count() < MIN_COMPANY_LEN {
            errors.push(FieldError {
                field: "company_name",
                message: format!(
                    "Company name must be at least {} characters.",
                    MIN_COMPANY_LEN
                ),
            });
        }

        errors
    }
}

/// A validation annotation for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// A freshly issued key plus the advisory metadata the service returns.
///
/// The key itself is revealed exactly once, by consuming the value; it is
/// never retained or logged.
pub struct IssuedKey {
    key: String,
    pub expires_in: Option<String>,
    pub rate_limit: Option<String>,
}

impl IssuedKey {
    /// Build from the key-issuance response body.
    pub fn from_response(body: &Value) -> Option<Self> {
        let key = body.get("api_key").and_then(Value::as_str)?;
        Some(Self {
            key: key.to_string(),
            expires_in: body
                .get("expires_in")
                .and_then(Value::as_str)
                .map(str::to_string),
            rate_limit: body
                .get("rate_limit")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Hand out the key, consuming it.
    pub fn reveal(self) -> String {
        self.key
    }
}

impl fmt::Debug for IssuedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedKey")
            .field("key", &"[redacted]")
            .field("expires_in", &self.expires_in)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

/// Outcome of one key-request attempt.
#[derive(Debug)]
pub enum KeyOutcome {
    /// A request is already in flight; nothing was sent.
    Busy,
    /// Local validation failed; nothing was sent.
    Invalid(Vec<FieldError>),
    /// The service issued a key.
    Issued(IssuedKey),
    /// The service refused; message surfaces inline in the form.
    Rejected { message: String },
}

/// Validates and forwards key requests, one at a time.
pub struct KeyRequestController {
    api: DemoApiClient,
    busy: AtomicBool,
}

impl KeyRequestController {
    pub fn new(api: DemoApiClient) -> Self {
        Self {
            api,
            busy: AtomicBool::new(false),
        }
    }

    /// Submit the form. Validation runs before the busy check; neither path
    /// touches the network.
    pub async fn submit(&self, request: ApiKeyRequest) -> KeyOutcome {
        let request = request.normalized();

        let errors = request.validate();
        if !errors.is_empty() {
            return KeyOutcome::Invalid(errors);
        }

        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("Key request dropped: request in flight");
            return KeyOutcome::Busy;
        };

        match self.api.request_key(&request).await {
            Ok(key) => KeyOutcome::Issued(key),
            Err(ApiError::Status { message, status }) => {
                tracing::warn!(status, "Key issuance refused");
                KeyOutcome::Rejected { message }
            }
            Err(ApiError::Transport(reason)) => {
                tracing::warn!(%reason, "Key issuance unreachable");
                KeyOutcome::Rejected {
                    message: "The key service could not be reached. Please retry.".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    async fn spawn_stub(status: axum::http::StatusCode, body: Value) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = (hits.clone(), status, body);

        let app = Router::new()
            .route(
                "/keys/generate",
                post(
                    |State((hits, status, body)): State<(
                        Arc<AtomicUsize>,
                        axum::http::StatusCode,
                        Value,
                    )>,
                     Json(_req): Json<Value>| async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        (status, Json(body))
                    },
                ),
            )
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), hits)
    }

    fn request(email: &str, company: &str) -> ApiKeyRequest {
        ApiKeyRequest {
            email: email.to_string(),
            company_name: company.to_string(),
        }
    }

    #[test]
    fn validates_email_shape() {
        assert!(request("dev@example.com", "Example Inc").validate().is_empty());

        let errors = request("not-an-email", "Example Inc").validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn validates_company_length() {
        let errors = request("dev@example.com", "ab").validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "company_name");

        // Both fields can fail at once.
        let errors = request("nope", "x").validate();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn debug_redacts_the_key() {
        let key = IssuedKey::from_response(&json!({
            "api_key": "ATR-KEY-deadbeef",
            "expires_in": "30 days",
        }))
        .unwrap();

        let debug = format!("{:?}", key);
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn reveal_consumes_the_key() {
        let key = IssuedKey::from_response(&json!({"api_key": "ATR-KEY-1"})).unwrap();
        assert_eq!(key.reveal(), "ATR-KEY-1");
        // `key` is moved; a second reveal does not compile.
    }

    #[tokio::test]
    async fn invalid_email_never_reaches_the_network() {
        let (endpoint, hits) = spawn_stub(
            axum::http::StatusCode::OK,
            json!({"api_key": "ATR-KEY-1"}),
        )
        .await;

        let controller = KeyRequestController::new(DemoApiClient::new().with_endpoint(endpoint));
        let outcome = controller.submit(request("invalid", "Example Inc")).await;

        assert!(matches!(outcome, KeyOutcome::Invalid(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn issues_key_once_on_success() {
        let (endpoint, hits) = spawn_stub(
            axum::http::StatusCode::OK,
            json!({
                "api_key": "ATR-KEY-42",
                "expires_in": "30 days",
                "rate_limit": "100 requests/hour",
            }),
        )
        .await;

        let controller = KeyRequestController::new(DemoApiClient::new().with_endpoint(endpoint));
        let outcome = controller
            .submit(request("  dev@example.com  ", "Example Inc"))
            .await;

        match outcome {
            KeyOutcome::Issued(key) => {
                assert_eq!(key.expires_in.as_deref(), Some("30 days"));
                assert_eq!(key.reveal(), "ATR-KEY-42");
            }
            other => panic!("expected issued key, got {:?}", other),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn service_refusal_surfaces_message_inline() {
        let (endpoint, _) = spawn_stub(
            axum::http::StatusCode::BAD_REQUEST,
            json!({"detail": "Email already registered"}),
        )
        .await;

        let controller = KeyRequestController::new(DemoApiClient::new().with_endpoint(endpoint));

        match controller.submit(request("dev@example.com", "Example Inc")).await {
            KeyOutcome::Rejected { message } => {
                assert_eq!(message, "Email already registered");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
