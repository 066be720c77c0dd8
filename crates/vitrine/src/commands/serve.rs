//! Preview server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use vitrine_server::{DemoApiClient, ServerConfig, SiteServer};

use crate::config;

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: PathBuf) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'vitrine build' first.",
            dir.display()
        );
    }

    let file = config::load(config_path)?;

    let api = DemoApiClient::new()
        .with_endpoint(file.api.endpoint)
        .with_token(file.api.demo_token);

    let server_config = ServerConfig {
        site_dir: dir,
        port,
        ..Default::default()
    };

    SiteServer::new(server_config, api).start().await?;

    Ok(())
}
