//! Scaffold the site in the current directory.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing vitrine...");

    let docs_dir = Path::new("docs");

    if docs_dir.exists() {
        if !yes {
            tracing::warn!("docs/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(docs_dir).context("Failed to create docs directory")?;
    }

    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG).context("Failed to write site.toml")?;
        tracing::info!("Created {}", config_path.display());
    }

    let index_path = docs_dir.join("index.md");
    if !index_path.exists() || yes {
        fs::write(&index_path, DEFAULT_INDEX).context("Failed to write index.md")?;
        tracing::info!("Created docs/index.md");
    }

    let quickstart_path = docs_dir.join("quickstart.md");
    if !quickstart_path.exists() || yes {
        fs::write(&quickstart_path, DEFAULT_QUICKSTART)
            .context("Failed to write quickstart.md")?;
        tracing::info!("Created docs/quickstart.md");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'vitrine dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Vitrine configuration

[site]
# Site title shown in page headers
title = "Atrium"

# Source directory for documentation pages
docs = "docs"

# Output directory for the built site
output = "dist"

# Base URL (for deployment)
base_url = "/"

[api]
# Remote demo endpoint the playground and key-request flows call
endpoint = "https://api.atrium.dev/v1"

# Shared, rate-limited token for illustrative playground calls
demo_token = "atr_demo_2c9d41e8"

[build]
# Minify CSS output
minify = true
"#;

const DEFAULT_INDEX: &str = r#"---
title: Overview
description: What the Atrium API does and how the pieces fit
order: 1
---

# Overview

Atrium turns a plain-language brief into a deployed website. You describe
the site, pick a style, list the pages you want, and the API returns a
preview URL when generation finishes.

Three calls cover the whole flow:

1. Request an API key.
2. Submit a generation request.
3. Poll the project status until it completes.

The landing page's playground runs the same generation call against a
shared, rate-limited demo endpoint.
"#;

const DEFAULT_QUICKSTART: &str = r#"---
title: Quickstart
description: First generated site in five minutes
order: 2
---

# Quickstart

Request a key, then generate:

```bash
curl -X POST https://api.atrium.dev/v1/keys/generate \
  -H "Content-Type: application/json" \
  -d '{"email": "dev@example.com", "company_name": "Example Inc"}'
```

Keep the returned key somewhere safe; it is shown once.

```bash
curl -X POST https://api.atrium.dev/v1/generate/website \
  -H "Authorization: Bearer $ATRIUM_API_KEY" \
  -H "Content-Type: application/json" \
  -d '{"description": "Portfolio site", "style": "modern", "pages": ["home"]}'
```

## Checking progress

Generation is asynchronous. Poll the status endpoint until it reports
`complete`:

```json
{"project_id": "proj_8f2kc1d9", "status": "complete"}
```
"#;
