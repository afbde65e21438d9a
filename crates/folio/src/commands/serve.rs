//! Preview server for a built site.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Run the serve command.
pub async fn run(port: u16, dir: PathBuf) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'folio build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let url = format!("http://{}", addr);
    let _ = open::that(&url);

    axum::serve(listener, site_router(&dir)).await?;

    Ok(())
}

/// Serve files from `dir`, answering unknown paths with the built 404 page.
fn site_router(dir: &Path) -> Router {
    let not_found = ServeFile::new(dir.join("404.html"));

    Router::new().fallback_service(ServeDir::new(dir).not_found_service(not_found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::fs;
    use tempfile::tempdir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn serves_pages_and_404() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("work/lamp")).unwrap();
        fs::write(temp.path().join("work/lamp/index.html"), "lamp page").unwrap();
        fs::write(temp.path().join("404.html"), "missing").unwrap();

        let app = site_router(temp.path());

        let response = app
            .clone()
            .oneshot(Request::get("/work/lamp/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/work/nope/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"missing");
    }
}
