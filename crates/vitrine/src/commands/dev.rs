//! Development server command: build, watch, rebuild, reload.

use std::path::{Path, PathBuf};

use anyhow::Result;
use vitrine_server::{
    DemoApiClient, ReloadHub, ReloadMessage, ServerConfig, SiteServer, SourceEvent, SourceWatcher,
};
use vitrine_site::{BuildConfig, SiteBuilder};

use crate::config;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let file = config::load(config_path)?;

    let build_config = BuildConfig {
        docs_dir: PathBuf::from(&file.site.docs),
        output_dir: PathBuf::from(&file.site.output),
        // Dev builds skip minification and carry the reload script.
        minify: false,
        base_url: file.site.base_url.clone(),
        title: file.site.title.clone(),
        reload: true,
    };

    let initial = {
        let cfg = build_config.clone();
        tokio::task::spawn_blocking(move || SiteBuilder::new(cfg).build()).await??
    };
    tracing::info!("Built {} pages in {}ms", initial.pages, initial.duration_ms);

    let hub = ReloadHub::new();

    let watch_paths = vec![build_config.docs_dir.clone(), config_path.to_path_buf()];
    let (watcher, mut rx) = SourceWatcher::new(&watch_paths)?;

    // Rebuild on every source change, then tell connected browsers.
    let rebuild_hub = hub.clone();
    let rebuild_config = build_config.clone();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match &event {
                SourceEvent::PageChanged(path) => {
                    tracing::info!("Page changed: {}", path.display());
                }
                SourceEvent::ConfigChanged(path) => {
                    tracing::info!("Config changed: {} (restart to apply)", path.display());
                }
                SourceEvent::Changed(path) => {
                    tracing::debug!("Changed: {}", path.display());
                }
            }

            let cfg = rebuild_config.clone();
            match tokio::task::spawn_blocking(move || SiteBuilder::new(cfg).build()).await {
                Ok(Ok(result)) => {
                    tracing::info!("Rebuilt {} pages in {}ms", result.pages, result.duration_ms);
                    rebuild_hub.send(ReloadMessage::Reload);
                }
                Ok(Err(e)) => tracing::warn!("Rebuild failed: {}", e),
                Err(e) => tracing::warn!("Rebuild task panicked: {}", e),
            }
        }
        // Keep watcher alive for the lifetime of the task.
        drop(watcher);
    });

    let api = DemoApiClient::new()
        .with_endpoint(file.api.endpoint)
        .with_token(file.api.demo_token);

    let server_config = ServerConfig {
        site_dir: build_config.output_dir.clone(),
        port,
        open,
        ..Default::default()
    };

    SiteServer::new(server_config, api)
        .with_reload(hub)
        .start()
        .await?;

    Ok(())
}
