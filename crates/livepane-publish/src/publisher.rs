//! Snippet directory publisher.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use livepane_adapters::{classify, AdapterRegistry, FrameworkKind};

use crate::assets::AssetPipeline;
use crate::storage::{FsStorage, ObjectStorage, StorageError};
use crate::templates::{IndexContext, TemplateEngine};

/// File extensions treated as snippets.
pub const SNIPPET_EXTENSIONS: &[&str] = &["html", "htm", "js", "jsx", "ts", "tsx", "vue", "svelte"];

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

/// Configuration for a publish run.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Directory scanned for snippets
    pub source_dir: PathBuf,

    /// Output directory for the default filesystem storage
    pub output_dir: PathBuf,

    /// Base URL previews are served from
    pub base_url: String,

    /// Title of the index page
    pub title: String,

    /// Minify the index stylesheet
    pub minify: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("snippets"),
            output_dir: PathBuf::from("dist"),
            base_url: "/".to_string(),
            title: "Previews".to_string(),
            minify: true,
        }
    }
}

/// One stored preview, as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedPreview {
    /// URL-safe name derived from the source path
    pub slug: String,

    /// Source path relative to the source directory, `/`-separated
    pub source: String,

    /// Detected framework
    pub kind: FrameworkKind,

    /// Whether the preview compiles code in the browser
    pub needs_browser_compilation: bool,

    /// Object path within storage
    pub path: String,

    /// Public URL of the preview
    pub url: String,
}

/// Result of a publish operation.
#[derive(Debug)]
pub struct PublishResult {
    /// Published previews, ordered by source path
    pub previews: Vec<PublishedPreview>,

    /// Total publish time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during publish.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Failed to read snippets: {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to serialize manifest: {0}")]
    SerializeError(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A snippet found on disk.
#[derive(Debug)]
struct Snippet {
    relative: String,
    slug: String,
    source: String,
}

#[derive(Serialize)]
struct Manifest<'a> {
    title: &'a str,
    base_url: &'a str,
    previews: &'a [PublishedPreview],
}

/// Renders a directory of snippets and stores the results.
pub struct Publisher {
    config: PublishConfig,
    storage: Box<dyn ObjectStorage>,
    registry: AdapterRegistry,
    templates: TemplateEngine,
}

impl Publisher {
    /// Create a publisher writing to `config.output_dir`.
    pub fn new(config: PublishConfig) -> Self {
        let storage = FsStorage::new(&config.output_dir, config.base_url.clone());
        Self::with_storage(config, storage)
    }

    /// Create a publisher writing to the given storage backend.
    pub fn with_storage(config: PublishConfig, storage: impl ObjectStorage + 'static) -> Self {
        Self {
            config,
            storage: Box::new(storage),
            registry: AdapterRegistry::with_defaults(),
            templates: TemplateEngine::new(),
        }
    }

    /// Publish every snippet, then the manifest, index page and stylesheet.
    ///
    /// Blocks on filesystem and rayon work; async callers should run it on
    /// a blocking thread.
    pub fn publish(&self) -> Result<PublishResult, PublishError> {
        let start = Instant::now();

        let snippets = self.discover_snippets()?;
        tracing::info!(
            "Found {} snippets in {}",
            snippets.len(),
            self.config.source_dir.display()
        );

        let previews: Vec<PublishedPreview> = snippets
            .par_iter()
            .map(|snippet| self.publish_snippet(snippet))
            .collect::<Result<_, _>>()?;

        self.write_manifest(&previews)?;
        self.write_index(&previews)?;
        self.write_assets()?;

        let duration = start.elapsed();

        Ok(PublishResult {
            previews,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Find snippet files, in path order, with unique slugs.
    fn discover_snippets(&self) -> Result<Vec<Snippet>, PublishError> {
        if !self.config.source_dir.is_dir() {
            return Err(PublishError::ReadError(format!(
                "Source directory not found: {}",
                self.config.source_dir.display()
            )));
        }

        let mut snippets = Vec::new();
        let mut slugs = HashSet::new();

        // Absent until the first publish; nothing to skip then
        let output_dir = fs::canonicalize(&self.config.output_dir).ok();

        for entry in WalkDir::new(&self.config.source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped(e, output_dir.as_deref()))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() || !is_snippet(path) {
                continue;
            }

            let source = fs::read_to_string(path)
                .map_err(|e| PublishError::ReadError(format!("{}: {}", path.display(), e)))?;

            let relative = path.strip_prefix(&self.config.source_dir).unwrap_or(path);
            let slug = unique_slug(slugify(&relative.with_extension("")), &mut slugs);

            snippets.push(Snippet {
                relative: to_slash_path(relative),
                slug,
                source,
            });
        }

        Ok(snippets)
    }

    fn publish_snippet(&self, snippet: &Snippet) -> Result<PublishedPreview, PublishError> {
        let verdict = classify(&snippet.source);
        let document = self.registry.render(&snippet.source, &verdict);

        let path = format!("previews/{}/index.html", snippet.slug);
        self.storage.put_object(&path, document.as_bytes())?;

        tracing::debug!("Published {} as {} ({})", snippet.relative, path, verdict.kind);

        Ok(PublishedPreview {
            slug: snippet.slug.clone(),
            source: snippet.relative.clone(),
            kind: verdict.kind,
            needs_browser_compilation: verdict.needs_browser_compilation,
            url: self.storage.public_url(&path),
            path,
        })
    }

    fn write_manifest(&self, previews: &[PublishedPreview]) -> Result<(), PublishError> {
        let manifest = Manifest {
            title: &self.config.title,
            base_url: &self.config.base_url,
            previews,
        };

        let json = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| PublishError::SerializeError(e.to_string()))?;

        self.storage.put_object("manifest.json", &json)?;
        Ok(())
    }

    fn write_index(&self, previews: &[PublishedPreview]) -> Result<(), PublishError> {
        let html = self
            .templates
            .render_index(&IndexContext {
                title: self.config.title.clone(),
                base_url: self.config.base_url.clone(),
                previews: previews.to_vec(),
            })
            .map_err(|e| PublishError::TemplateError(e.to_string()))?;

        self.storage.put_object("index.html", html.as_bytes())?;
        Ok(())
    }

    fn write_assets(&self) -> Result<(), PublishError> {
        let css = AssetPipeline::index_css(self.config.minify);
        self.storage.put_object("assets/index.css", css.as_bytes())?;
        Ok(())
    }
}

/// Hidden entries, dependency folders and the output directory itself.
///
/// `output_dir` is canonical; directories are canonicalized before comparing
/// so `./dist` and `dist` match.
fn is_skipped(entry: &DirEntry, output_dir: Option<&Path>) -> bool {
    if entry.depth() == 0 {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    if !entry.file_type().is_dir() {
        return false;
    }

    SKIPPED_DIRS.contains(&&*name)
        || output_dir.is_some_and(|out| {
            fs::canonicalize(entry.path()).is_ok_and(|path| path == out)
        })
}

fn is_snippet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SNIPPET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercase ASCII alphanumerics, with every other run collapsed to `-`.
fn slugify(path: &Path) -> String {
    let mut slug = String::new();

    for c in path.to_string_lossy().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "snippet".to_string()
    } else {
        slug.to_string()
    }
}

/// `slug`, or `slug-2`, `slug-3`... when already taken.
fn unique_slug(slug: String, taken: &mut HashSet<String>) -> String {
    let mut candidate = slug.clone();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{slug}-{n}");
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}
