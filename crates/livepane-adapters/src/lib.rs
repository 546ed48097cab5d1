//! Framework detection and standalone HTML rewriting for live code previews.
//!
//! This crate provides the core of livepane: a heuristic classifier that names
//! the UI framework a pasted snippet was written in, and per-framework
//! adapters that rewrite the snippet into one self-contained HTML document
//! loading its runtime from a CDN.
//!
//! Both steps are pure and total: any UTF-8 input yields a verdict and a
//! document, and missing fragments are replaced by defaults.

pub mod alpine;
pub mod angular;
pub mod classify;
pub mod extract;
pub mod html;
pub mod imports;
pub mod react;
pub mod registry;
pub mod shell;
pub mod traits;
pub mod vanilla;
pub mod verdict;
pub mod vue;

use std::sync::LazyLock;

use serde::Serialize;

pub use alpine::AlpineAdapter;
pub use angular::AngularAdapter;
pub use classify::{classify, classify_kind, matching_kinds};
pub use html::HtmlAdapter;
pub use react::ReactAdapter;
pub use registry::AdapterRegistry;
pub use shell::DocumentShell;
pub use traits::FrameworkAdapter;
pub use vanilla::VanillaAdapter;
pub use verdict::{FrameworkKind, FrameworkVerdict, ParseKindError};
pub use vue::VueAdapter;

static DEFAULT_REGISTRY: LazyLock<AdapterRegistry> = LazyLock::new(AdapterRegistry::with_defaults);

/// Render `source` as a standalone document using the built-in adapters.
pub fn render(source: &str, verdict: &FrameworkVerdict) -> String {
    DEFAULT_REGISTRY.render(source, verdict)
}

/// A classified and rendered snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub verdict: FrameworkVerdict,

    /// Complete HTML document, ready for an iframe `srcdoc`
    pub document: String,
}

/// Classify `source` and render it in one step.
pub fn preview(source: &str) -> Preview {
    let verdict = classify(source);
    let document = render(source, &verdict);
    Preview { verdict, document }
}
