//! Object storage for published documents.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Errors that can occur while storing objects.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Where published documents are persisted.
///
/// Paths are `/`-separated and relative to the store root, e.g.
/// `previews/button/index.html`.
pub trait ObjectStorage: Send + Sync {
    /// Store `body` under `path`, replacing any previous object.
    fn put_object(&self, path: &str, body: &[u8]) -> Result<(), StorageError>;

    /// Public URL an object at `path` will be served from.
    fn public_url(&self, path: &str) -> String;
}

/// Object storage backed by a local directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
    base_url: String,
}

impl FsStorage {
    /// Store objects under `root`, served from `base_url`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    /// Directory objects are written under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStorage for FsStorage {
    fn put_object(&self, path: &str, body: &[u8]) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        let write_error = |e: std::io::Error| StorageError::WriteError {
            path: target.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(&target, body).map_err(write_error)?;

        tracing::debug!("Stored {} ({} bytes)", target.display(), body.len());
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn writes_nested_objects() {
        let temp = tempdir().unwrap();
        let storage = FsStorage::new(temp.path(), "/");

        storage
            .put_object("previews/button/index.html", b"<!DOCTYPE html>")
            .unwrap();

        let written = fs::read_to_string(temp.path().join("previews/button/index.html")).unwrap();
        assert_eq!(written, "<!DOCTYPE html>");
    }

    #[test]
    fn rejects_paths_outside_root() {
        let temp = tempdir().unwrap();
        let storage = FsStorage::new(temp.path(), "/");

        for path in ["", "../escape.html", "/etc/passwd", "a/../../b"] {
            assert!(
                matches!(storage.put_object(path, b"x"), Err(StorageError::InvalidPath(_))),
                "{path}"
            );
        }
    }

    #[test]
    fn builds_public_urls() {
        assert_eq!(
            FsStorage::new("dist", "/").public_url("previews/a/index.html"),
            "/previews/a/index.html"
        );
        assert_eq!(
            FsStorage::new("dist", "https://demo.example.com/p/").public_url("manifest.json"),
            "https://demo.example.com/p/manifest.json"
        );
    }
}
