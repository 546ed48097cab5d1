//! Trait definitions for framework adapters.

use crate::verdict::{FrameworkKind, FrameworkVerdict};

/// Rewrites a snippet of one framework idiom into a standalone HTML document.
///
/// Rendering is fail-soft: when a fragment cannot be extracted the adapter
/// substitutes a default, so there is no error path.
pub trait FrameworkAdapter: Send + Sync {
    /// Adapter identifier (e.g., "react", "vue")
    fn name(&self) -> &'static str;

    /// Verdict kinds this adapter renders
    fn kinds(&self) -> &[FrameworkKind];

    /// Produce a complete HTML document for `source`.
    ///
    /// # Arguments
    /// * `source` - The snippet as pasted by the user
    /// * `verdict` - The classifier's verdict for `source`
    fn render(&self, source: &str, verdict: &FrameworkVerdict) -> String;
}
