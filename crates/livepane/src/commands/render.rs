//! One-shot render command.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use livepane_adapters::{classify, render, FrameworkKind, FrameworkVerdict};

use super::read_source;

/// Run the render command.
pub fn run(file: Option<PathBuf>, output: Option<PathBuf>, kind: Option<FrameworkKind>) -> Result<()> {
    let source = read_source(file.as_deref())?;

    let verdict = match kind {
        Some(kind) => FrameworkVerdict::for_kind(kind),
        None => classify(&source),
    };
    tracing::info!("Rendering as {}", verdict.kind);

    let document = render(&source, &verdict);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{document}"),
    }

    Ok(())
}
