//! Site server: the built site plus the `/api` proxy routes.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::api::DemoApiClient;
use crate::keys::{ApiKeyRequest, KeyOutcome, KeyRequestController};
use crate::playground::{PlaygroundController, PlaygroundForm, SubmitOutcome};
use crate::reload::{reload_client_script, ReloadHub, ReloadMessage};

/// Configuration for the site server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory containing the built site.
    pub site_dir: PathBuf,

    /// Port to listen on.
    pub port: u16,

    /// Host to bind to.
    pub host: String,

    /// Open browser on start.
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            site_dir: PathBuf::from("dist"),
            port: 4000,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),
}

/// Shared handler state.
pub struct AppState {
    playground: PlaygroundController,
    keys: KeyRequestController,
    reload: Option<ReloadHub>,
    reload_ws_url: String,
}

/// Serves the site and proxies the interactive flows.
pub struct SiteServer {
    config: ServerConfig,
    api: DemoApiClient,
    reload: Option<ReloadHub>,
}

impl SiteServer {
    pub fn new(config: ServerConfig, api: DemoApiClient) -> Self {
        Self {
            config,
            api,
            reload: None,
        }
    }

    /// Enable dev-mode live reload, pushing messages from `hub`.
    pub fn with_reload(mut self, hub: ReloadHub) -> Self {
        self.reload = Some(hub);
        self
    }

    /// Start serving. Runs until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::Address(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let ws_url = format!("ws://{}/__reload", addr);
        let state = app_state(self.api, self.reload, &ws_url);
        let app = app_router(state, &self.config.site_dir);

        tracing::info!("Serving site at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))
    }
}

/// Build the full router: `/api` routes, dev reload endpoints when enabled,
/// and the static site as the fallback.
pub fn app_router(state: Arc<AppState>, site_dir: &Path) -> Router {
    let dev = state.reload.is_some();

    let mut router = Router::new()
        .route("/api/playground", post(playground_handler))
        .route("/api/keys", post(keys_handler))
        .route("/api/health", get(health_handler));

    if dev {
        router = router
            .route("/__reload", get(ws_handler))
            .route("/__reload.js", get(reload_script_handler));
    }

    router
        .layer(CorsLayer::permissive())
        .with_state(state)
        .fallback_service(ServeDir::new(site_dir))
}

/// Build handler state directly; used by [`SiteServer::start`] and by tests.
pub fn app_state(api: DemoApiClient, reload: Option<ReloadHub>, ws_url: &str) -> Arc<AppState> {
    Arc::new(AppState {
        playground: PlaygroundController::new(api.clone()),
        keys: KeyRequestController::new(api),
        reload,
        reload_ws_url: ws_url.to_string(),
    })
}

async fn playground_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PlaygroundForm>,
) -> impl IntoResponse {
    match state.playground.submit(form).await {
        SubmitOutcome::Busy => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": true,
                "message": "A generation request is already in flight.",
            })),
        ),
        SubmitOutcome::Rendered(preview) => (StatusCode::OK, Json(preview.into_body())),
    }
}

async fn keys_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ApiKeyRequest>,
) -> impl IntoResponse {
    match state.keys.submit(request).await {
        KeyOutcome::Busy => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": true,
                "message": "A key request is already in flight.",
            })),
        ),
        KeyOutcome::Invalid(fields) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "fields": fields })),
        ),
        KeyOutcome::Rejected { message } => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": true, "message": message })),
        ),
        KeyOutcome::Issued(key) => {
            let expires_in = key.expires_in.clone();
            let rate_limit = key.rate_limit.clone();
            (
                StatusCode::OK,
                Json(json!({
                    "api_key": key.reveal(),
                    "expires_in": expires_in,
                    "rate_limit": rate_limit,
                })),
            )
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let Some(hub) = state.reload.as_ref() else {
        return;
    };
    let mut rx = hub.subscribe();

    let Ok(msg) = serde_json::to_string(&ReloadMessage::Connected) else {
        return;
    };
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    while let Ok(reload_msg) = rx.recv().await {
        let Ok(json) = serde_json::to_string(&reload_msg) else {
            continue;
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

async fn reload_script_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let script = reload_client_script(&state.reload_ws_url);
    ([("content-type", "application/javascript")], script)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    async fn spawn_app(site_dir: &Path) -> String {
        let state = app_state(
            // Unroutable: these tests never need the remote to answer.
            DemoApiClient::new().with_endpoint("http://127.0.0.1:1"),
            None,
            "ws://127.0.0.1:0/__reload",
        );
        let app = app_router(state, site_dir);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn serves_static_site_and_health() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.html"), "<h1>Atrium</h1>").unwrap();

        let base = spawn_app(temp.path()).await;
        let client = reqwest::Client::new();

        let page = client.get(&base).send().await.unwrap();
        assert!(page.status().is_success());
        assert!(page.text().await.unwrap().contains("Atrium"));

        let health = client
            .get(format!("{}/api/health", base))
            .send()
            .await
            .unwrap();
        assert!(health.status().is_success());
        let body: serde_json::Value = health.json().await.unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn invalid_key_request_gets_field_annotations() {
        let temp = tempdir().unwrap();
        let base = spawn_app(temp.path()).await;

        let resp = reqwest::Client::new()
            .post(format!("{}/api/keys", base))
            .json(&json!({"email": "nope", "company_name": "x"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 422);
        let body: serde_json::Value = resp.json().await.unwrap();
        let fields = body["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
    }

    #[tokio::test]
    async fn unreachable_demo_endpoint_still_renders_for_playground() {
        let temp = tempdir().unwrap();
        let base = spawn_app(temp.path()).await;

        let resp = reqwest::Client::new()
            .post(format!("{}/api/playground", base))
            .json(&json!({"description": "x", "style": "modern", "pages": []}))
            .send()
            .await
            .unwrap();

        // The error is preview content, not a fault.
        assert!(resp.status().is_success());
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], json!(true));
        assert!(body["message"].as_str().unwrap().contains("could not be reached"));
    }

    #[tokio::test]
    async fn reload_endpoints_absent_outside_dev_mode() {
        let temp = tempdir().unwrap();
        let base = spawn_app(temp.path()).await;

        let resp = reqwest::Client::new()
            .get(format!("{}/__reload.js", base))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 404);
    }
}
