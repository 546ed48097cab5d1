//! Complete HTML documents are rendered as-is.

use crate::traits::FrameworkAdapter;
use crate::verdict::{FrameworkKind, FrameworkVerdict};

/// Pass-through adapter for the `html` verdict.
#[derive(Debug, Default)]
pub struct HtmlAdapter;

impl HtmlAdapter {
    /// Create a new pass-through adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkAdapter for HtmlAdapter {
    fn name(&self) -> &'static str {
        "html"
    }

    fn kinds(&self) -> &[FrameworkKind] {
        &[FrameworkKind::Html]
    }

    fn render(&self, source: &str, _verdict: &FrameworkVerdict) -> String {
        source.to_string()
    }
}
