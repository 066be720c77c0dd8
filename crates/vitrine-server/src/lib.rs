//! Site server for the Atrium marketing and docs site.
//!
//! Serves the built site, proxies the two interactive flows (playground
//! generation, key requests) to the remote demo API, and pushes live-reload
//! messages to browsers in dev mode.

pub mod api;
pub mod busy;
pub mod keys;
pub mod playground;
pub mod reload;
pub mod server;
pub mod watcher;

pub use api::{ApiError, DemoApiClient, DEFAULT_DEMO_TOKEN, DEFAULT_ENDPOINT};
pub use keys::{ApiKeyRequest, FieldError, IssuedKey, KeyOutcome, KeyRequestController};
pub use playground::{
    PlaygroundController, PlaygroundForm, PreviewState, SiteStyle, SubmitOutcome, WebsiteConfig,
};
pub use reload::{reload_client_script, ReloadHub, ReloadMessage};
pub use server::{ServerConfig, ServerError, SiteServer};
pub use watcher::{SourceEvent, SourceWatcher};
