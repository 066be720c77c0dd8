//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use vitrine_site::{BuildConfig, SiteBuilder};

use crate::config;

/// Run the build command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building site...");

    let file = config::load(config_path)?;

    let build_config = BuildConfig {
        docs_dir: PathBuf::from(&file.site.docs),
        output_dir: output.unwrap_or_else(|| PathBuf::from(&file.site.output)),
        minify: minify.unwrap_or(file.build.minify),
        base_url: file.site.base_url,
        title: file.site.title,
        reload: false,
    };

    let result = SiteBuilder::new(build_config).build()?;

    tracing::info!("Built {} pages in {}ms", result.pages, result.duration_ms);
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
