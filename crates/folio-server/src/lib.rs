//! HTTP server for folio portfolios.
//!
//! Serves the work list and detail pages as HTML and JSON, rebuilding them
//! from the markdown sources on every request. In development it watches the
//! content directory and reloads connected pages over a WebSocket.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{router, AppState, PortfolioServer, ServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{ReloadHub, ReloadMessage};
