//! Development server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use folio_server::{PortfolioServer, ServerConfig};

use crate::config::load_config;

/// Run the dev server.
pub async fn run(config_path: &Path, port: Option<u16>, open: bool) -> Result<()> {
    let file_config = load_config(config_path)?;
    let port = port.unwrap_or(file_config.server.port);

    tracing::info!("Starting development server on port {}", port);

    let config = ServerConfig {
        content_dir: PathBuf::from(&file_config.content.dir),
        host: file_config.server.host.clone(),
        port,
        open,
        live_reload: true,
        minify: false,
        site: file_config.site_context(),
    };

    PortfolioServer::new(config).start().await?;

    Ok(())
}
