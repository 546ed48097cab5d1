//! Live preview server implementation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast::error::RecvError, RwLock};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use livepane_adapters::{classify, AdapterRegistry, FrameworkKind, FrameworkVerdict, Preview};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{hmr_client_script, HmrHub, HmrMessage};

/// Extra capabilities granted to the preview iframe.
///
/// Scripts and same-origin access are always allowed; previews cannot run
/// without them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SandboxPolicy {
    pub allow_forms: bool,
    pub allow_popups: bool,
}

impl SandboxPolicy {
    /// Value for the iframe's `sandbox` attribute.
    pub fn attribute(&self) -> String {
        let mut tokens = vec!["allow-scripts", "allow-same-origin"];
        if self.allow_forms {
            tokens.push("allow-forms");
        }
        if self.allow_popups {
            tokens.push("allow-popups");
        }
        tokens.join(" ")
    }
}

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Snippet file to preview
    pub entry: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Quiet period after the last edit before re-rendering
    pub debounce: Duration,

    /// Preview iframe sandbox
    pub sandbox: SandboxPolicy,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("snippets/index.html"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            debounce: Duration::from_millis(300),
            sandbox: SandboxPolicy::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Failed to read {0}: {1}")]
    ReadError(PathBuf, String),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    hmr: HmrHub,
    registry: AdapterRegistry,
    current: Preview,
}

type SharedState = Arc<RwLock<ServerState>>;

/// Live preview server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new preview server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the server. Runs until the listener fails.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let registry = AdapterRegistry::with_defaults();
        let current = load_preview(&self.config.entry, &registry)?;
        tracing::info!(
            "Rendered {} as {}",
            self.config.entry.display(),
            current.verdict.kind
        );

        let state = Arc::new(RwLock::new(ServerState {
            config: self.config.clone(),
            hmr: HmrHub::new(),
            registry,
            current,
        }));

        let (watcher, mut rx) = FileWatcher::new(&[self.config.entry.clone()], self.config.debounce)
            .map_err(|e| ServerError::WatchError(e.to_string()))?;

        let state_clone = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state_clone, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        // Relative asset URLs in a srcdoc document resolve against the host page
        let asset_dir = match self.config.entry.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let app = router(state).fallback_service(ServeDir::new(asset_dir));

        tracing::info!("Starting preview server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
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

fn router(state: SharedState) -> Router {
    let api = Router::new()
        .route("/api/classify", post(classify_handler))
        .route("/api/render", post(render_handler))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(index_handler))
        .route("/__preview", get(preview_handler))
        .route("/__hmr", get(ws_handler))
        .route("/__hmr.js", get(hmr_script_handler))
        .merge(api)
        .with_state(state)
}

/// Read and render a snippet file.
fn load_preview(path: &Path, registry: &AdapterRegistry) -> Result<Preview, ServerError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| ServerError::ReadError(path.to_path_buf(), e.to_string()))?;

    let verdict = classify(&source);
    let document = registry.render(&source, &verdict);
    Ok(Preview { verdict, document })
}

/// Re-render on change and push the result to every open page.
async fn handle_watch_event(state: &SharedState, event: WatchEvent) {
    match event {
        WatchEvent::Changed(path) => {
            let mut state = state.write().await;

            let preview = match load_preview(&path, &state.registry) {
                Ok(preview) => preview,
                Err(e) => {
                    tracing::warn!("{}", e);
                    return;
                }
            };

            if preview == state.current {
                tracing::debug!("{} unchanged after render", path.display());
                return;
            }

            tracing::info!("{} changed, rendered as {}", path.display(), preview.verdict.kind);
            state.hmr.send(HmrMessage::UpdatePreview {
                kind: preview.verdict.kind,
                html: preview.document.clone(),
            });
            state.current = preview;
        }

        WatchEvent::Removed(path) => {
            tracing::warn!("{} was removed, keeping last preview", path.display());
        }
    }
}

/// Handler for the host page.
async fn index_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    Html(host_page(
        &state.config.entry,
        state.current.verdict.kind,
        &state.config.sandbox,
    ))
}

fn host_page(entry: &Path, kind: FrameworkKind, sandbox: &SandboxPolicy) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>livepane: {entry}</title>
  <style>
    html, body {{ height: 100%; margin: 0; }}
    body {{ display: flex; flex-direction: column; font-family: system-ui, sans-serif; }}
    header {{ display: flex; gap: 1rem; align-items: center; padding: 0.5rem 1rem; border-bottom: 1px solid #e5e7eb; font-size: 0.875rem; }}
    #kind {{ padding: 0.125rem 0.5rem; border-radius: 999px; background: #eef2ff; color: #3730a3; }}
    iframe {{ flex: 1; width: 100%; border: 0; }}
  </style>
</head>
<body>
  <header>
    <strong>{entry}</strong>
    <span id="kind">{kind}</span>
  </header>
  <iframe id="preview" title="Preview" sandbox="{sandbox}" src="/__preview"></iframe>
  <script src="/__hmr.js"></script>
</body>
</html>"#,
        entry = html_escape(&entry.display().to_string()),
        kind = kind,
        sandbox = sandbox.attribute(),
    )
}

/// Escape text for HTML content and attribute values.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Handler for the current rendered document.
async fn preview_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    Html(state.current.document.clone())
}

/// Request body for the classify and render endpoints.
#[derive(Debug, Deserialize)]
struct SnippetRequest {
    code: String,

    /// Skip classification and render as this kind
    #[serde(default)]
    kind: Option<FrameworkKind>,
}

#[derive(Debug, Serialize)]
struct RenderResponse {
    verdict: FrameworkVerdict,
    html: String,
}

async fn classify_handler(Json(req): Json<SnippetRequest>) -> Json<FrameworkVerdict> {
    Json(classify(&req.code))
}

async fn render_handler(
    State(state): State<SharedState>,
    Json(req): Json<SnippetRequest>,
) -> Json<RenderResponse> {
    let verdict = match req.kind {
        Some(kind) => FrameworkVerdict::for_kind(kind),
        None => classify(&req.code),
    };

    let state = state.read().await;
    let html = state.registry.render(&req.code, &verdict);
    Json(RenderResponse { verdict, html })
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: SharedState) {
    let mut rx = {
        let state = state.read().await;
        state.hmr.subscribe()
    };

    if send_message(&mut socket, &HmrMessage::Connected).await.is_err() {
        return;
    }

    loop {
        match rx.recv().await {
            Ok(msg) => {
                if send_message(&mut socket, &msg).await.is_err() {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!("HMR client lagged by {} messages", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &HmrMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Handler for the HMR client script.
async fn hmr_script_handler() -> impl IntoResponse {
    let script = hmr_client_script("/__hmr");
    ([("content-type", "application/javascript")], script)
}
