//! Alpine.js adapter.

use regex::Regex;
use std::sync::LazyLock;

use crate::shell::{has_doctype, DocumentShell, Script};
use crate::traits::FrameworkAdapter;
use crate::verdict::{FrameworkKind, FrameworkVerdict, ALPINE_CDN};

static ALPINE_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*\bsrc\s*=\s*["'][^"']*alpine[^"']*["'][^>]*>\s*</script>\s*"#)
        .expect("Invalid alpine script regex")
});

/// Alpine adapter.
#[derive(Debug, Default)]
pub struct AlpineAdapter;

impl AlpineAdapter {
    /// Create a new Alpine adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkAdapter for AlpineAdapter {
    fn name(&self) -> &'static str {
        "alpine"
    }

    fn kinds(&self) -> &[FrameworkKind] {
        &[FrameworkKind::Alpine]
    }

    fn render(&self, source: &str, verdict: &FrameworkVerdict) -> String {
        if has_doctype(source) {
            return source.to_string();
        }

        // The shell loads Alpine itself; a second copy would initialize twice.
        let markup = ALPINE_SCRIPT_RE.replace_all(source, "");

        let mut shell = DocumentShell::new("Alpine Preview");
        if verdict.cdn_script_urls.is_empty() {
            shell = shell.head_script(Script::DeferredSrc(ALPINE_CDN.to_string()));
        }
        for url in &verdict.cdn_script_urls {
            shell = shell.head_script(Script::DeferredSrc(url.clone()));
        }

        shell.body(markup.trim()).finish()
    }
}
