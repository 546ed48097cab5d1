//! Configuration file (livepane.toml).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use livepane_publish::PublishConfig;
use livepane_server::{DevServerConfig, SandboxPolicy};
use serde::Deserialize;

/// Configuration file structure. Every field has a default.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub preview: PreviewSettings,
    #[serde(default)]
    pub publish: PublishSettings,
}

/// `[preview]`: the live preview server.
#[derive(Debug, Deserialize)]
pub struct PreviewSettings {
    #[serde(default = "default_entry")]
    pub entry: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_true")]
    pub open: bool,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub allow_forms: bool,
    #[serde(default)]
    pub allow_popups: bool,
}

/// `[publish]`: the publish pipeline.
#[derive(Debug, Deserialize)]
pub struct PublishSettings {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_true")]
    pub minify: bool,
}

fn default_entry() -> String {
    "snippets/index.html".to_string()
}
fn default_port() -> u16 {
    7777
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_debounce_ms() -> u64 {
    300
}
fn default_source() -> String {
    "snippets".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_title() -> String {
    "Previews".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            port: default_port(),
            host: default_host(),
            open: true,
            debounce_ms: default_debounce_ms(),
            allow_forms: false,
            allow_popups: false,
        }
    }
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            source: default_source(),
            output: default_output(),
            base_url: default_base_url(),
            title: default_title(),
            minify: true,
        }
    }
}

impl ConfigFile {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the config file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

impl PreviewSettings {
    /// Server configuration, before command-line overrides.
    pub fn to_server_config(&self) -> DevServerConfig {
        DevServerConfig {
            entry: PathBuf::from(&self.entry),
            port: self.port,
            host: self.host.clone(),
            open: self.open,
            debounce: Duration::from_millis(self.debounce_ms),
            sandbox: SandboxPolicy {
                allow_forms: self.allow_forms,
                allow_popups: self.allow_popups,
            },
        }
    }
}

impl PublishSettings {
    /// Publish configuration, before command-line overrides.
    pub fn to_publish_config(&self) -> PublishConfig {
        PublishConfig {
            source_dir: PathBuf::from(&self.source),
            output_dir: PathBuf::from(&self.output),
            base_url: self.base_url.clone(),
            title: self.title.clone(),
            minify: self.minify,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let config = ConfigFile::load(&temp.path().join("livepane.toml")).unwrap();

        let server = config.preview.to_server_config();
        assert_eq!(server.port, 7777);
        assert_eq!(server.debounce, Duration::from_millis(300));
        assert_eq!(server.entry, PathBuf::from("snippets/index.html"));
        assert_eq!(config.publish.to_publish_config().output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("livepane.toml");
        fs::write(
            &path,
            "[preview]\nentry = \"app.jsx\"\nallow_forms = true\n\n[publish]\ntitle = \"Demos\"\n",
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();

        let server = config.preview.to_server_config();
        assert_eq!(server.entry, PathBuf::from("app.jsx"));
        assert_eq!(server.host, "127.0.0.1");
        assert!(server.sandbox.allow_forms);
        assert!(!server.sandbox.allow_popups);

        let publish = config.publish.to_publish_config();
        assert_eq!(publish.title, "Demos");
        assert_eq!(publish.base_url, "/");
        assert!(publish.minify);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("livepane.toml");
        fs::write(&path, "[preview]\nport = \"not a number\"\n").unwrap();

        let err = ConfigFile::load(&path).unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
    }
}
