//! Scaffold a portfolio in a project.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    let created = scaffold(Path::new("."), config_path, yes)?;
    if created.is_empty() {
        return Ok(());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio dev' to start the development server.");

    Ok(())
}

/// Write the starter files under `root`. Existing files are kept unless `yes`.
///
/// Returns the files written.
fn scaffold(root: &Path, config_path: &Path, yes: bool) -> Result<Vec<PathBuf>> {
    let content_dir = root.join("content");

    if content_dir.exists() && !yes {
        tracing::warn!("content/ directory already exists. Use --yes to overwrite.");
        return Ok(vec![]);
    }

    let work_dir = content_dir.join("work");
    fs::create_dir_all(&work_dir).context("Failed to create content/work directory")?;
    fs::create_dir_all(content_dir.join("static"))
        .context("Failed to create content/static directory")?;

    let files = [
        (root.join(config_path), DEFAULT_CONFIG),
        (work_dir.join("example-project.md"), DEFAULT_WORK),
        (content_dir.join("about.md"), DEFAULT_ABOUT),
    ];

    let mut created = Vec::new();
    for (path, contents) in files {
        if path.exists() && !yes {
            tracing::debug!("Keeping existing {}", path.display());
            continue;
        }
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
        created.push(path);
    }

    Ok(created)
}

const DEFAULT_CONFIG: &str = r#"# Folio Configuration

[site]
# Site title
title = "My Portfolio"

# Short description for the list page
description = "Things I have made"

# Absolute origin, used for social sharing metadata
url = "http://localhost:7777"

# Base URL (for deployment)
base_url = "/"

[content]
# Directory holding work/ and standalone pages
dir = "content"

[build]
# Output directory for built site
output = "dist"

# Enable minification
minify = true

[server]
host = "127.0.0.1"
port = 7777
"#;

const DEFAULT_WORK: &str = r#"---
title: Example Project
date: January 2023 - Present
description: A starting point for your first work entry.
---

Describe the project here. The first paragraph becomes the preview text on
the list page and the description when the page is shared.

- Add a bullet list to show highlights instead
- Or an image with `![Cover](/static/cover.png)` to use as the thumbnail
"#;

const DEFAULT_ABOUT: &str = r#"---
title: About
---

# About

A few words about yourself. This page is served at `/work/about`.
"#;
