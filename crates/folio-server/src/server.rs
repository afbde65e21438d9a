//! Portfolio server implementation.

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tower_http::services::ServeDir;

use folio_content::{load_work_list, load_work_page, DirSource};
use folio_static::{AssetPipeline, SiteContext, TemplateEngine};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

/// Path of the live reload socket.
const RELOAD_PATH: &str = "/__reload";

/// Configuration for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Content root with `work/` and standalone pages
    pub content_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Watch content and reload connected pages on change
    pub live_reload: bool,

    /// Minify the served stylesheet
    pub minify: bool,

    /// Site-wide template values
    pub site: SiteContext,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            live_reload: true,
            minify: false,
            site: SiteContext::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),
}

/// Shared server state.
pub struct AppState {
    source: DirSource,
    templates: TemplateEngine,
    site: SiteContext,
    css: String,
    reload: ReloadHub,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let mut site = config.site.clone();
        site.live_reload = config.live_reload;

        Self {
            source: DirSource::new(&config.content_dir),
            templates: TemplateEngine::new(),
            site,
            css: AssetPipeline::main_css(config.minify),
            reload: ReloadHub::new(),
        }
    }
}

/// Build the router for the given configuration.
pub fn router(config: &ServerConfig, state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(list_handler))
        .route("/work/{slug}", get(work_handler))
        .route("/work/{slug}/", get(work_handler))
        .route("/api/work", get(api_list_handler))
        .route("/api/work/{slug}", get(api_work_handler))
        .route("/assets/main.css", get(css_handler));

    if config.live_reload {
        app = app
            .route(RELOAD_PATH, get(ws_handler))
            .route("/__reload.js", get(reload_script_handler));
    }

    app.nest_service(
        "/static",
        ServeDir::new(config.content_dir.join("static")),
    )
    .with_state(state)
}

/// Portfolio server.
pub struct PortfolioServer {
    config: ServerConfig,
}

impl PortfolioServer {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Start serving until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let state = Arc::new(AppState::new(&self.config));

        if self.config.live_reload {
            let (watcher, mut rx) = FileWatcher::new(&[self.config.content_dir.clone()])
                .map_err(|e| ServerError::WatchError(e.to_string()))?;

            let state_clone = Arc::clone(&state);
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    handle_watch_event(&state_clone, event);
                }
                // Keep watcher alive
                drop(watcher);
            });
        }

        let app = router(&self.config, state);

        tracing::info!("Serving portfolio at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Handle file watch events.
fn handle_watch_event(state: &AppState, event: WatchEvent) {
    match &event {
        WatchEvent::ContentModified(path) => {
            tracing::info!("Content modified: {}", path.display());
        }
        _ => {
            tracing::debug!("Content changed: {}", event.path().display());
        }
    }

    // Pages are rebuilt per request, so a reload is enough
    state.reload.send(ReloadMessage::Reload);
}

fn internal_error(e: impl Display) -> Response {
    tracing::error!("Request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
}

/// Handler for the work list page.
async fn list_handler(State(state): State<Arc<AppState>>) -> Response {
    let works = match load_work_list(&state.source) {
        Ok(works) => works,
        Err(e) => return internal_error(e),
    };

    match state.templates.render_list(&state.site, &works) {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Handler for a work detail page.
async fn work_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match load_work_page(&state.source, &slug, &state.site.site_url) {
        Ok(Some(page)) => match state.templates.render_work(&state.site, &page) {
            Ok(html) => Html(html).into_response(),
            Err(e) => internal_error(e),
        },
        Ok(None) => match state.templates.render_not_found(&state.site, &slug) {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => internal_error(e),
        },
        Err(e) => internal_error(e),
    }
}

/// Handler for the work list as JSON.
async fn api_list_handler(State(state): State<Arc<AppState>>) -> Response {
    match load_work_list(&state.source) {
        Ok(works) => Json(works).into_response(),
        Err(e) => internal_error(e),
    }
}

/// Handler for a detail page as JSON.
async fn api_work_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    match load_work_page(&state.source, &slug, &state.site.site_url) {
        Ok(Some(page)) => Json(page).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not found" })),
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}

/// Handler for the stylesheet.
async fn css_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], state.css.clone())
}

/// Handler for the live reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.reload.subscribe();

    if send_message(&mut socket, &ReloadMessage::Connected)
        .await
        .is_err()
    {
        return;
    }

    while let Some(msg) = next_reload(&mut rx).await {
        if send_message(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

/// Next message for a page. A lagging receiver skips to a reload, since a
/// reload covers any missed ones.
async fn next_reload(rx: &mut broadcast::Receiver<ReloadMessage>) -> Option<ReloadMessage> {
    match rx.recv().await {
        Ok(msg) => Some(msg),
        Err(RecvError::Lagged(skipped)) => {
            tracing::debug!("Reload client lagged by {} messages", skipped);
            Some(ReloadMessage::Reload)
        }
        Err(RecvError::Closed) => None,
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Handler for the live reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        reload_client_script(RELOAD_PATH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn fixture() -> (TempDir, ServerConfig) {
        let temp = tempdir().unwrap();
        let content = temp.path().join("content");
        fs::create_dir_all(content.join("work")).unwrap();
        fs::write(
            content.join("work").join("synth.md"),
            "---\ntitle: Suitcase Synth\ndate: 2019 - 2021\n---\nA modular synth in a suitcase.",
        )
        .unwrap();
        fs::write(
            content.join("work").join("lamp.md"),
            "---\ndate: Jan 2022 - Present\n---\n- Laser cut\n- Warm white",
        )
        .unwrap();

        let config = ServerConfig {
            content_dir: content,
            open: false,
            site: SiteContext {
                title: "Jane Doe".to_string(),
                site_url: "https://jane.example".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        (temp, config)
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = PortfolioServer::new(ServerConfig::default());
        assert_eq!(server.config.port, 7777);
        assert!(server.config.live_reload);
    }

    #[tokio::test]
    async fn lists_work_newest_first() {
        let (_temp, config) = fixture();
        let state = Arc::new(AppState::new(&config));

        let response = api_list_handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json[0]["slug"], "lamp");
        assert_eq!(json[0]["title"], "Lamp");
        assert_eq!(json[0]["body"]["items"][1], "Warm white");
        assert_eq!(json[1]["slug"], "synth");
    }

    #[tokio::test]
    async fn renders_list_page_with_reload_script() {
        let (_temp, config) = fixture();
        let state = Arc::new(AppState::new(&config));

        let html = body_string(list_handler(State(state)).await).await;

        assert!(html.contains("Suitcase Synth"));
        assert!(html.contains("/__reload.js"));
    }

    #[tokio::test]
    async fn renders_detail_page() {
        let (_temp, config) = fixture();
        let state = Arc::new(AppState::new(&config));

        let response = work_handler(State(state), Path("synth".to_string())).await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("og:title"));
        assert!(html.contains("<p>A modular synth in a suitcase.</p>"));
    }

    #[tokio::test]
    async fn missing_detail_page_is_404() {
        let (_temp, config) = fixture();
        let state = Arc::new(AppState::new(&config));

        let response = work_handler(State(Arc::clone(&state)), Path("nope".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = api_work_handler(State(state), Path("nope".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("not found"));
    }

    #[tokio::test]
    async fn api_detail_includes_social_meta() {
        let (_temp, config) = fixture();
        let state = Arc::new(AppState::new(&config));

        let response = api_work_handler(State(state), Path("synth".to_string())).await;
        let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();

        assert_eq!(json["meta"]["title"], "Suitcase Synth");
        assert_eq!(json["social"]["type"], "article");
        assert_eq!(json["social"]["url"], "https://jane.example/work/synth");
        assert_eq!(json["social"]["description"], "A modular synth in a suitcase.");
    }

    #[tokio::test]
    async fn watch_events_trigger_reload() {
        let (_temp, config) = fixture();
        let state = AppState::new(&config);
        let mut rx = state.reload.subscribe();

        handle_watch_event(
            &state,
            WatchEvent::ContentModified(config.content_dir.join("work/lamp.md")),
        );

        assert_eq!(rx.try_recv().unwrap(), ReloadMessage::Reload);
    }

    #[tokio::test]
    async fn lagging_client_still_reloads() {
        let hub = ReloadHub::new();
        let mut rx = hub.subscribe();

        for _ in 0..150 {
            hub.send(ReloadMessage::Connected);
        }

        assert_eq!(next_reload(&mut rx).await, Some(ReloadMessage::Reload));
        assert_eq!(next_reload(&mut rx).await, Some(ReloadMessage::Connected));

        drop(hub);
        while rx.try_recv().is_ok() {}
        assert_eq!(next_reload(&mut rx).await, None);
    }

    #[test]
    fn builds_router_without_live_reload() {
        let (_temp, mut config) = fixture();
        config.live_reload = false;

        let _app = router(&config, Arc::new(AppState::new(&config)));
    }
}
