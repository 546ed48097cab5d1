//! Publish command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use livepane_publish::Publisher;

use crate::config::ConfigFile;

/// Run the publish command.
pub async fn run(
    config_path: &Path,
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    tracing::info!("Publishing previews...");

    let file_config = ConfigFile::load(config_path)?;

    let mut config = file_config.publish.to_publish_config();
    if let Some(source) = source {
        config.source_dir = source;
    }
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = tokio::task::spawn_blocking(move || Publisher::new(config).publish())
        .await
        .context("Publish task failed")??;

    for preview in &result.previews {
        tracing::info!("{} ({}) -> {}", preview.source, preview.kind, preview.url);
    }
    tracing::info!(
        "Published {} previews in {}ms",
        result.previews.len(),
        result.duration_ms
    );
    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
