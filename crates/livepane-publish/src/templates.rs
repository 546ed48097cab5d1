//! Template engine for the published index page.

use minijinja::{context, Environment};

use crate::publisher::PublishedPreview;

/// Context for rendering the index page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IndexContext {
    /// Site title
    pub title: String,
    /// Base URL
    pub base_url: String,
    /// Published previews, in listing order
    pub previews: Vec<PublishedPreview>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("index.html".to_string(), INDEX_TEMPLATE.to_string())
            .expect("Failed to add index template");

        Self { env }
    }

    /// Render the index page.
    pub fn render_index(&self, context: &IndexContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("index.html")?;

        tmpl.render(context! {
            title => &context.title,
            base_url => &context.base_url,
            previews => &context.previews,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <link rel="stylesheet" href="{{ base_url }}assets/index.css">
</head>
<body>
  <div class="page">
    {% block content %}{% endblock %}
  </div>
</body>
</html>"##;

const INDEX_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<header class="page-header">
  <h1>{{ title }}</h1>
  <p>{{ previews | length }} preview{% if previews | length != 1 %}s{% endif %}</p>
</header>

{% if previews %}
<ul class="preview-list">
{% for preview in previews %}
  <li class="preview-card">
    <a href="{{ preview.url }}">{{ preview.slug }}</a>
    <span class="preview-source">{{ preview.source }}</span>
    <span class="kind kind-{{ preview.kind }}">{{ preview.kind }}</span>
  </li>
{% endfor %}
</ul>
{% else %}
<p class="empty">No snippets found.</p>
{% endif %}
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;
    use livepane_adapters::FrameworkKind;

    fn preview(slug: &str, kind: FrameworkKind) -> PublishedPreview {
        PublishedPreview {
            slug: slug.to_string(),
            source: format!("{slug}.jsx"),
            kind,
            needs_browser_compilation: true,
            path: format!("previews/{slug}/index.html"),
            url: format!("/previews/{slug}/index.html"),
        }
    }

    #[test]
    fn renders_preview_cards() {
        let engine = TemplateEngine::new();
        let html = engine
            .render_index(&IndexContext {
                title: "Demos".to_string(),
                base_url: "/".to_string(),
                previews: vec![
                    preview("counter", FrameworkKind::React),
                    preview("todo", FrameworkKind::Vue),
                ],
            })
            .unwrap();

        assert!(html.contains("<title>Demos</title>"));
        assert!(html.contains(">counter</a>"));
        assert!(html.contains(r#"<span class="kind kind-vue">vue</span>"#));
        assert!(html.contains("2 previews"));
        assert!(html.contains(r#"assets/index.css""#));
    }

    #[test]
    fn renders_empty_listing() {
        let engine = TemplateEngine::new();
        let html = engine
            .render_index(&IndexContext {
                title: "Demos".to_string(),
                base_url: "/".to_string(),
                previews: vec![],
            })
            .unwrap();

        assert!(html.contains("No snippets found."));
        assert!(html.contains("0 previews"));
    }

    #[test]
    fn escapes_user_text() {
        let engine = TemplateEngine::new();
        let html = engine
            .render_index(&IndexContext {
                title: "<script>x</script>".to_string(),
                base_url: "/".to_string(),
                previews: vec![],
            })
            .unwrap();

        assert!(!html.contains("<script>x</script>"));
    }
}
