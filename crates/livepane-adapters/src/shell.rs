//! Standalone HTML document generator shared by every adapter.

use regex::Regex;
use std::sync::LazyLock;

/// Reset applied to every generated document.
pub const BASE_CSS: &str = r#"* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
  line-height: 1.5;
  color: #1f2937;
  background: #ffffff;
  padding: 1rem;
}

button {
  font: inherit;
  cursor: pointer;
  padding: 0.5rem 1rem;
  margin: 0.25rem;
  border: 1px solid #d1d5db;
  border-radius: 0.375rem;
  background: #f9fafb;
}

input, select, textarea {
  font: inherit;
  padding: 0.375rem 0.5rem;
  border: 1px solid #d1d5db;
  border-radius: 0.375rem;
}"#;

static DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype").expect("Invalid doctype regex"));

static HEAD_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("Invalid head close regex"));

static HEAD_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head(?:\s[^>]*)?>").expect("Invalid head open regex"));

static HTML_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html(?:\s[^>]*)?>").expect("Invalid html open regex"));

static SCRIPT_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</script").expect("Invalid script close regex"));

/// How a `<script>` element is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// `<script src="...">`
    Src(String),
    /// `<script defer src="...">`
    DeferredSrc(String),
    /// Inline classic script
    Inline(String),
    /// Inline script compiled in the browser by Babel
    Babel(String),
}

impl Script {
    fn to_html(&self) -> String {
        match self {
            Script::Src(url) => format!(r#"<script src="{url}"></script>"#),
            Script::DeferredSrc(url) => format!(r#"<script defer src="{url}"></script>"#),
            Script::Inline(code) => format!("<script>\n{}\n</script>", escape_script(code)),
            Script::Babel(code) => format!(
                "<script type=\"text/babel\" data-presets=\"env,react\">\n{}\n</script>",
                escape_script(code)
            ),
        }
    }
}

/// Builder for a complete standalone document.
///
/// Head scripts are emitted before the body so runtimes load before any
/// code that depends on them.
#[derive(Debug, Clone, Default)]
pub struct DocumentShell {
    title: String,
    head_scripts: Vec<Script>,
    styles: Vec<String>,
    body_attrs: String,
    body: String,
    body_scripts: Vec<Script>,
}

impl DocumentShell {
    /// Start a document with the given `<title>`.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Load a runtime from a URL in `<head>`.
    pub fn head_script(mut self, script: Script) -> Self {
        self.head_scripts.push(script);
        self
    }

    /// Load several runtimes in order.
    pub fn head_scripts<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.head_scripts
            .extend(urls.into_iter().map(|u| Script::Src(u.into())));
        self
    }

    /// Add CSS after the base reset. Blank CSS is ignored.
    pub fn style(mut self, css: &str) -> Self {
        if !css.trim().is_empty() {
            self.styles.push(css.trim().to_string());
        }
        self
    }

    /// Raw attribute text for the `<body>` tag, e.g. `ng-app="app"`.
    pub fn body_attrs(mut self, attrs: &str) -> Self {
        self.body_attrs = attrs.to_string();
        self
    }

    /// Body markup, emitted verbatim.
    pub fn body(mut self, html: &str) -> Self {
        self.body = html.to_string();
        self
    }

    /// Append a script after the body markup.
    pub fn body_script(mut self, script: Script) -> Self {
        self.body_scripts.push(script);
        self
    }

    /// Render the document.
    pub fn finish(self) -> String {
        let head_scripts: String = self
            .head_scripts
            .iter()
            .map(|s| format!("  {}\n", s.to_html()))
            .collect();

        let extra_styles: String = self
            .styles
            .iter()
            .map(|css| format!("  <style>\n{css}\n  </style>\n"))
            .collect();

        let body_attrs = if self.body_attrs.is_empty() {
            String::new()
        } else {
            format!(" {}", self.body_attrs)
        };

        let body = if self.body.is_empty() {
            String::new()
        } else {
            format!("  {}\n", self.body)
        };

        let body_scripts: String = self
            .body_scripts
            .iter()
            .map(|s| format!("  {}\n", s.to_html()))
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
{head_scripts}  <style>
{base_css}
  </style>
{extra_styles}</head>
<body{body_attrs}>
{body}{body_scripts}</body>
</html>
"#,
            title = self.title,
            head_scripts = head_scripts,
            base_css = BASE_CSS,
            extra_styles = extra_styles,
            body_attrs = body_attrs,
            body = body,
            body_scripts = body_scripts,
        )
    }
}

/// Whether the document already declares a doctype.
pub fn has_doctype(html: &str) -> bool {
    DOCTYPE_RE.is_match(html)
}

/// Prepend `<!DOCTYPE html>` when the document has none.
pub fn ensure_doctype(html: &str) -> String {
    if has_doctype(html) {
        html.to_string()
    } else {
        format!("<!DOCTYPE html>\n{html}")
    }
}

/// Insert a runtime `<script src>` into an existing document's `<head>`.
///
/// Goes before `</head>` when present, otherwise right after `<head>`, then
/// after `<html>`; a document with none of these gets the tag prepended.
pub fn inject_head_script(html: &str, url: &str) -> String {
    let tag = Script::Src(url.to_string()).to_html();

    if let Some(m) = HEAD_CLOSE_RE.find(html) {
        return format!("{}  {}\n{}", &html[..m.start()], tag, &html[m.start()..]);
    }
    if let Some(m) = HEAD_OPEN_RE.find(html) {
        return format!("{}\n  {}{}", &html[..m.end()], tag, &html[m.end()..]);
    }
    if let Some(m) = HTML_OPEN_RE.find(html) {
        return format!(
            "{}\n<head>\n  {}\n</head>{}",
            &html[..m.end()],
            tag,
            &html[m.end()..]
        );
    }
    format!("{tag}\n{html}")
}

/// Keep embedded code from closing its own `<script>` element early.
pub fn escape_script(code: &str) -> String {
    SCRIPT_CLOSE_RE.replace_all(code, "<\\/script").into_owned()
}
