//! Plain HTML/JS adapter. Also renders Svelte, which has no runtime build to load.

use regex::Regex;
use std::sync::LazyLock;

use crate::shell::{DocumentShell, Script};
use crate::traits::FrameworkAdapter;
use crate::verdict::{FrameworkKind, FrameworkVerdict};

static DOCUMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<!doctype|<html[\s>]|<body[\s>]").expect("Invalid document regex")
});

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][\w-]*[\s/>]").expect("Invalid html tag regex"));

/// Whether the text contains at least one HTML tag.
pub fn contains_html_tag(source: &str) -> bool {
    HTML_TAG_RE.is_match(source)
}

/// Vanilla adapter.
#[derive(Debug, Default)]
pub struct VanillaAdapter;

impl VanillaAdapter {
    /// Create a new vanilla adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkAdapter for VanillaAdapter {
    fn name(&self) -> &'static str {
        "vanilla"
    }

    fn kinds(&self) -> &[FrameworkKind] {
        &[FrameworkKind::Vanilla, FrameworkKind::Svelte]
    }

    fn render(&self, source: &str, _verdict: &FrameworkVerdict) -> String {
        if DOCUMENT_RE.is_match(source) {
            return source.to_string();
        }

        let shell = DocumentShell::new("Preview");
        let code = source.trim();

        if code.is_empty() {
            shell.finish()
        } else if contains_html_tag(code) {
            shell.body(code).finish()
        } else {
            shell.body_script(Script::Inline(code.to_string())).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> String {
        VanillaAdapter::new().render(source, &FrameworkVerdict::for_kind(FrameworkKind::Vanilla))
    }

    #[test]
    fn documents_are_unchanged() {
        for doc in [
            "<!DOCTYPE html><p>x</p>",
            "<html><body>x</body></html>",
            "<body class=\"a\">x</body>",
        ] {
            assert_eq!(render(doc), doc);
        }
    }

    #[test]
    fn markup_goes_into_body() {
        let html = render("<p>Hello</p>\n<script>console.log(1)</script>");

        assert!(html.contains("<body>\n  <p>Hello</p>\n<script>console.log(1)</script>\n</body>"));
    }

    #[test]
    fn bare_code_is_wrapped_in_script() {
        let html = render("document.body.textContent = 'hi';");

        assert!(html.contains("<script>\ndocument.body.textContent = 'hi';\n</script>"));
    }

    #[test]
    fn comparisons_are_not_tags() {
        let html = render("if (a < b && c > d) { run(); }");

        assert!(html.contains("<script>\nif (a < b"));
    }

    #[test]
    fn empty_input_renders_empty_body() {
        let html = render("   ");

        assert!(html.contains("<body>\n</body>"));
        assert!(!html.contains("<script>"));
    }
}
