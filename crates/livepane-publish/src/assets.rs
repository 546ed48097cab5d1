//! Stylesheet for the published index page.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Stylesheet for the index page, minified when asked.
    ///
    /// Falls back to the unminified source if minification fails.
    pub fn index_css(minify: bool) -> String {
        if !minify {
            return INDEX_CSS.to_string();
        }

        match Self::minify_css(INDEX_CSS) {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!("{}", e);
                INDEX_CSS.to_string()
            }
        }
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const INDEX_CSS: &str = r#":root {
  --background: #ffffff;
  --foreground: #111827;
  --muted: #6b7280;
  --border: #e5e7eb;
  --card: #f9fafb;
  --accent: #4f46e5;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

.page {
  max-width: 960px;
  margin: 0 auto;
  padding: 2rem 1.5rem;
}

.page-header {
  margin-bottom: 2rem;
}

.page-header h1 {
  font-size: 1.75rem;
}

.page-header p {
  color: var(--muted);
}

.preview-list {
  list-style: none;
  display: grid;
  grid-template-columns: repeat(auto-fill, minmax(260px, 1fr));
  gap: 1rem;
}

.preview-card {
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  background: var(--card);
  padding: 1rem;
}

.preview-card a {
  color: var(--foreground);
  font-weight: 600;
  text-decoration: none;
}

.preview-card a:hover {
  color: var(--accent);
}

.preview-source {
  display: block;
  margin-top: 0.25rem;
  font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
  font-size: 0.8125rem;
  color: var(--muted);
}

.kind {
  display: inline-block;
  margin-top: 0.5rem;
  padding: 0.125rem 0.5rem;
  border-radius: 999px;
  font-size: 0.75rem;
  background: #eef2ff;
  color: #3730a3;
}

.empty {
  color: var(--muted);
}
"#;
