//! CLI subcommands.

pub mod detect;
pub mod dev;
pub mod init;
pub mod publish;
pub mod render;
pub mod serve;

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a snippet from `file`, or from stdin when it is absent or `-`.
pub fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            Ok(source)
        }
    }
}
