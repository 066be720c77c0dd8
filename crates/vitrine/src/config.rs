//! `site.toml` configuration.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

/// Configuration file structure (site.toml).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_docs_dir")]
    pub docs: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiSection {
    /// Remote demo endpoint the playground and key flows call.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Shared, rate-limited bearer token for illustrative calls.
    #[serde(default = "default_demo_token")]
    pub demo_token: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            docs: default_docs_dir(),
            output: default_output(),
            base_url: default_base_url(),
        }
    }
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            demo_token: default_demo_token(),
        }
    }
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

fn default_title() -> String {
    "Atrium".to_string()
}
fn default_docs_dir() -> String {
    "docs".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_endpoint() -> String {
    vitrine_server::DEFAULT_ENDPOINT.to_string()
}
fn default_demo_token() -> String {
    vitrine_server::DEFAULT_DEMO_TOKEN.to_string()
}
fn default_minify() -> bool {
    true
}

/// Load configuration, falling back to defaults when the file is absent.
/// A present but malformed file is an error.
pub fn load(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let config: ConfigFile = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let config = load(Path::new("/nonexistent/site.toml")).unwrap();

        assert_eq!(config.site.title, "Atrium");
        assert_eq!(config.site.output, "dist");
        assert!(config.api.endpoint.starts_with("https://"));
        assert!(config.build.minify);
    }

    #[test]
    fn parses_partial_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("site.toml");
        std::fs::write(&path, "[site]\ntitle = \"My API\"\n").unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.site.title, "My API");
        // Everything else falls back to defaults.
        assert_eq!(config.site.docs, "docs");
        assert_eq!(config.api.endpoint, vitrine_server::DEFAULT_ENDPOINT);
    }

    #[test]
    fn rejects_malformed_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("site.toml");
        std::fs::write(&path, "[site\ntitle = ").unwrap();

        assert!(load(&path).is_err());
    }
}
