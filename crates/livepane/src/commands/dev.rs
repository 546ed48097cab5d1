//! Live preview server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use livepane_server::DevServer;

use crate::config::ConfigFile;

/// Run the preview server. Flags override the config file.
pub async fn run(
    config_path: &Path,
    entry: Option<PathBuf>,
    port: Option<u16>,
    open: Option<bool>,
) -> Result<()> {
    let file_config = ConfigFile::load(config_path)?;

    let mut config = file_config.preview.to_server_config();
    if let Some(entry) = entry {
        config.entry = entry;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(open) = open {
        config.open = open;
    }

    if !config.entry.is_file() {
        anyhow::bail!(
            "Snippet not found: {}. Run 'livepane init' or pass a file.",
            config.entry.display()
        );
    }

    tracing::info!("Previewing {} on port {}", config.entry.display(), config.port);

    DevServer::new(config).start().await?;

    Ok(())
}
