//! Serve published previews.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::ConfigFile;

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => PathBuf::from(ConfigFile::load(config_path)?.publish.output),
    };

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'livepane publish' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    if open {
        let url = format!("http://{}", addr);
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}
