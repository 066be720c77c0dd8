//! Playground controller: one illustrative generation request at a time.

use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{ApiError, DemoApiClient};
use crate::busy::BusyGuard;

/// Website style accepted by the demo endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStyle {
    #[default]
    Modern,
    Minimal,
    Classic,
    Bold,
}

impl SiteStyle {
    /// Parse a form value. Unknown styles fall back to the default rather
    /// than failing the submission.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "classic" => Self::Classic,
            "bold" => Self::Bold,
            _ => Self::Modern,
        }
    }
}

/// Raw form state as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaygroundForm {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub pages: Vec<String>,
}

/// The generation request sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebsiteConfig {
    pub description: String,
    pub style: SiteStyle,
    pub pages: Vec<String>,
}

impl WebsiteConfig {
    /// Build the wire request from form state.
    ///
    /// `home` is always the first page, whatever the checkboxes said;
    /// duplicates and empty entries are dropped.
    pub fn from_form(form: PlaygroundForm) -> Self {
        let mut pages = vec!["home".to_string()];
        for page in form.pages {
            let page = page.trim().to_lowercase();
            if !page.is_empty() && !pages.contains(&page) {
                pages.push(page);
            }
        }

        Self {
            description: form.description.trim().to_string(),
            style: SiteStyle::parse(&form.style),
            pages,
        }
    }
}

/// What the preview pane renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewState {
    /// The response carried a `previewUrl`; load it in the embedded frame.
    Frame { preview_url: String, body: Value },
    /// Raw JSON render.
    Json(Value),
    /// Structured error render. Never a fault: this is preview content.
    Error { message: String },
}

impl PreviewState {
    /// Classify a successful demo-endpoint response.
    pub fn from_response(body: Value) -> Self {
        let preview_url = body
            .get("previewUrl")
            .and_then(Value::as_str)
            .map(str::to_string);

        match preview_url {
            Some(preview_url) => Self::Frame { preview_url, body },
            None => Self::Json(body),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The JSON body handed to the preview pane.
    pub fn into_body(self) -> Value {
        match self {
            Self::Frame { body, .. } => body,
            Self::Json(body) => body,
            Self::Error { message } => json!({ "error": true, "message": message }),
        }
    }
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A request is already in flight; nothing was sent.
    Busy,
    /// Terminal render for the preview pane.
    Rendered(PreviewState),
}

/// Submits generation requests, one at a time.
pub struct PlaygroundController {
    api: DemoApiClient,
    busy: AtomicBool,
}

impl PlaygroundController {
    pub fn new(api: DemoApiClient) -> Self {
        Self {
            api,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(std::sync::atomic::Ordering::Acquire)
    }

    /// Submit the form. Exactly two terminal outcomes (success render,
    /// error render); a third, `Busy`, when dropped without any network
    /// traffic.
    pub async fn submit(&self, form: PlaygroundForm) -> SubmitOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("Playground submission dropped: request in flight");
            return SubmitOutcome::Busy;
        };

        let config = WebsiteConfig::from_form(form);
        tracing::info!(pages = config.pages.len(), "Forwarding generation request");

        let state = match self.api.generate_website(&config).await {
            Ok(body) => PreviewState::from_response(body),
            Err(ApiError::Status { message, status }) => {
                tracing::warn!(status, "Demo endpoint rejected generation");
                PreviewState::error(message)
            }
            Err(ApiError::Transport(reason)) => {
                tracing::warn!(%reason, "Demo endpoint unreachable");
                PreviewState::error("The demo endpoint could not be reached. Please retry.")
            }
        };

        SubmitOutcome::Rendered(state)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::extract::State;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    use super::*;

    /// Spawn a stub demo endpoint on an ephemeral port, counting hits.
    async fn spawn_stub(
        response: axum::http::StatusCode,
        body: Value,
        delay: Duration,
    ) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let state = (hits.clone(), response, body, delay);

        let app = Router::new()
            .route(
                "/generate/website",
                post(
                    |State((hits, status, body, delay)): State<(
                        Arc<AtomicUsize>,
                        axum::http::StatusCode,
                        Value,
                        Duration,
                    )>,
                     Json(_req): Json<Value>| async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(delay).await;
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

    fn form(pages: &[&str]) -> PlaygroundForm {
        PlaygroundForm {
            description: "Bakery site".to_string(),
            style: "modern".to_string(),
            pages: pages.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn config_always_includes_home_first() {
        let config = WebsiteConfig::from_form(form(&["about", "contact"]));
        assert_eq!(config.pages, vec!["home", "about", "contact"]);

        // Even when the form tries to send home itself, or nothing at all.
        let config = WebsiteConfig::from_form(form(&["home", "About", "about", ""]));
        assert_eq!(config.pages, vec!["home", "about"]);

        let config = WebsiteConfig::from_form(form(&[]));
        assert_eq!(config.pages, vec!["home"]);
    }

    #[test]
    fn unknown_style_falls_back_to_modern() {
        assert_eq!(SiteStyle::parse("brutalist"), SiteStyle::Modern);
        assert_eq!(SiteStyle::parse("BOLD"), SiteStyle::Bold);
    }

    #[test]
    fn error_state_serializes_with_error_flag() {
        let body = PreviewState::error("boom").into_body();
        assert_eq!(body["error"], json!(true));
        assert_eq!(body["message"], json!("boom"));
    }

    #[tokio::test]
    async fn renders_remote_json() {
        let (endpoint, hits) = spawn_stub(
            axum::http::StatusCode::OK,
            json!({"success": true, "content": "<html></html>"}),
            Duration::ZERO,
        )
        .await;

        let controller = PlaygroundController::new(DemoApiClient::new().with_endpoint(endpoint));
        let outcome = controller.submit(form(&["about"])).await;

        match outcome {
            SubmitOutcome::Rendered(PreviewState::Json(body)) => {
                assert_eq!(body["success"], json!(true));
            }
            other => panic!("expected JSON render, got {:?}", other),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn preview_url_selects_frame_render() {
        let (endpoint, _) = spawn_stub(
            axum::http::StatusCode::OK,
            json!({"previewUrl": "https://preview.atrium.dev/p/123"}),
            Duration::ZERO,
        )
        .await;

        let controller = PlaygroundController::new(DemoApiClient::new().with_endpoint(endpoint));

        match controller.submit(form(&[])).await {
            SubmitOutcome::Rendered(PreviewState::Frame { preview_url, .. }) => {
                assert_eq!(preview_url, "https://preview.atrium.dev/p/123");
            }
            other => panic!("expected frame render, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_2xx_renders_error_object_with_body_message() {
        let (endpoint, _) = spawn_stub(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            json!({"message": "generation failed"}),
            Duration::ZERO,
        )
        .await;

        let controller = PlaygroundController::new(DemoApiClient::new().with_endpoint(endpoint));

        match controller.submit(form(&[])).await {
            SubmitOutcome::Rendered(PreviewState::Error { message }) => {
                assert_eq!(message, "generation failed");
            }
            other => panic!("expected error render, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn network_failure_renders_generic_error() {
        // Nothing listens here.
        let controller =
            PlaygroundController::new(DemoApiClient::new().with_endpoint("http://127.0.0.1:1"));

        match controller.submit(form(&[])).await {
            SubmitOutcome::Rendered(PreviewState::Error { message }) => {
                assert!(message.contains("could not be reached"));
            }
            other => panic!("expected error render, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn resubmit_while_pending_is_a_no_op() {
        let (endpoint, hits) = spawn_stub(
            axum::http::StatusCode::OK,
            json!({"success": true}),
            Duration::from_millis(300),
        )
        .await;

        let controller =
            Arc::new(PlaygroundController::new(DemoApiClient::new().with_endpoint(endpoint)));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit(form(&[])).await })
        };

        // Let the first submission reach the stub and park in its delay.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(controller.is_busy());

        let second = controller.submit(form(&[])).await;
        assert_eq!(second, SubmitOutcome::Busy);

        let first = first.await.unwrap();
        assert!(matches!(
            first,
            SubmitOutcome::Rendered(PreviewState::Json(_))
        ));

        // The dropped submission never reached the network.
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        // And the controller accepts submissions again afterwards.
        assert!(!controller.is_busy());
    }
}
