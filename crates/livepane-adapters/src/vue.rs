//! Vue 3 adapter: single-file components and loose Composition API code on
//! the global build.

use regex::Regex;
use std::sync::LazyLock;

use crate::classify::looks_like_html_document;
use crate::extract::{extract_script_body, extract_style_body, extract_template};
use crate::imports::globalize_imports;
use crate::shell::{inject_head_script, DocumentShell, Script};
use crate::traits::FrameworkAdapter;
use crate::verdict::{FrameworkKind, FrameworkVerdict, VUE_CDN};

/// Names destructured from the global `Vue` before user code runs.
pub const VUE_PRELUDE: &[&str] = &["createApp", "ref", "reactive", "computed", "watch", "onMounted"];

/// Template used when a single-file component has no `<template>`.
pub const DEFAULT_SFC_TEMPLATE: &str = "<div>\n  <h1>{{ message }}</h1>\n</div>";

/// Component used when a single-file component has no usable `<script>`.
pub const DEFAULT_SFC_COMPONENT: &str = r#"const AppComponent = {
  data() {
    return { message: "Hello Vue!" };
  }
};"#;

/// `#app` contents for loose code that brings no markup of its own.
pub const DEFAULT_APP_TEMPLATE: &str = "<h1>{{ title }}</h1>\n  <p>{{ message }}</p>";

/// Mount appended to loose code that never calls `createApp`.
const AUTO_MOUNT: &str = r#"createApp({
  setup() {
    const title = ref('Vue Preview');
    const message = ref('Hello Vue!');
    return { title, message };
  }
}).mount('#app');"#;

/// Runs Vue 2 `new Vue({ el, data })` on the Vue 3 global build.
const VUE2_SHIM: &str = r#"function VueCompat(options) {
  var data = options.data;
  var app = createApp(Object.assign({}, options, {
    data: typeof data === 'function' ? data : function () { return data || {}; }
  }));
  app.mount(options.el || '#app');
  return app;
}"#;

static EXPORT_DEFAULT_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bexport\s+default\s*\{").expect("Invalid export default object regex")
});

static EXPORT_DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexport\s+default\s+").expect("Invalid export default regex"));

static CREATE_APP_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bcreateApp\s*\(").expect("Invalid createApp regex"));

static NEW_VUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnew\s+Vue\s*\(").expect("Invalid new Vue regex"));

static VUE_SCRIPT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script[^>]*\bsrc\s*=\s*["'][^"']*vue[^"']*["']"#)
        .expect("Invalid vue script tag regex")
});

static SCRIPT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script(?:\s[^>]*)?>").expect("Invalid script tag regex")
});

static SCRIPT_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("Invalid script block regex")
});

static STYLE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("Invalid style block regex")
});

/// Vue adapter.
#[derive(Debug, Default)]
pub struct VueAdapter;

impl VueAdapter {
    /// Create a new Vue adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkAdapter for VueAdapter {
    fn name(&self) -> &'static str {
        "vue"
    }

    fn kinds(&self) -> &[FrameworkKind] {
        &[FrameworkKind::Vue]
    }

    fn render(&self, source: &str, _verdict: &FrameworkVerdict) -> String {
        if looks_like_html_document(source) {
            if VUE_SCRIPT_TAG_RE.is_match(source) {
                return source.to_string();
            }
            return inject_head_script(source, VUE_CDN);
        }

        if is_single_file_component(source) {
            render_sfc(source)
        } else {
            render_loose(source)
        }
    }
}

/// A `<template>` plus a `<script>` block.
pub fn is_single_file_component(source: &str) -> bool {
    source.contains("<template") && SCRIPT_TAG_RE.is_match(source)
}

fn render_sfc(source: &str) -> String {
    let template = extract_template(source).unwrap_or_else(|| {
        tracing::debug!("single-file component has no <template>, using default");
        DEFAULT_SFC_TEMPLATE
    });

    let component = match extract_script_body(source) {
        Some(body) => {
            let body = globalize_imports(body, &["vue"], "Vue", VUE_PRELUDE);
            if EXPORT_DEFAULT_OBJECT_RE.is_match(&body) {
                EXPORT_DEFAULT_OBJECT_RE
                    .replace(&body, "const AppComponent = {")
                    .into_owned()
            } else {
                tracing::debug!("component script has no `export default {{`, using default");
                format!("{}\n\n{}", body.trim(), DEFAULT_SFC_COMPONENT)
            }
        }
        None => DEFAULT_SFC_COMPONENT.to_string(),
    };

    let script = format!(
        "{}\n\n{}\n\ncreateApp(AppComponent).mount('#app');",
        prelude(),
        component.trim()
    );

    vue_shell()
        .style(extract_style_body(source).unwrap_or_default())
        .body(&format!("<div id=\"app\">{template}</div>"))
        .body_script(Script::Inline(script))
        .finish()
}

/// Loose Composition API code, possibly mixed with markup.
///
/// Markup outside `<script>` blocks becomes the `#app` template; script
/// bodies (or the whole source, when it is not markup) become the code.
fn render_loose(source: &str) -> String {
    let (markup, code) = split_markup_and_code(source);
    let code = globalize_imports(&code, &["vue"], "Vue", VUE_PRELUDE);

    let (code, mount) = if EXPORT_DEFAULT_OBJECT_RE.is_match(&code) {
        let code = EXPORT_DEFAULT_OBJECT_RE
            .replace(&code, "const AppComponent = {")
            .into_owned();
        (code, "createApp(AppComponent).mount('#app');")
    } else {
        (EXPORT_DEFAULT_RE.replace_all(&code, "").into_owned(), AUTO_MOUNT)
    };

    let mut script = prelude();
    if NEW_VUE_RE.is_match(&code) {
        script.push_str("\n\n");
        script.push_str(VUE2_SHIM);
    }
    let code = NEW_VUE_RE.replace_all(&code, "VueCompat(");
    if !code.trim().is_empty() {
        script.push_str("\n\n");
        script.push_str(code.trim());
    }
    if !CREATE_APP_CALL_RE.is_match(&code) && !code.contains("VueCompat(") {
        script.push_str("\n\n");
        script.push_str(mount);
    }

    let markup = markup.trim();
    let template = if markup.is_empty() {
        DEFAULT_APP_TEMPLATE
    } else if markup.starts_with("<template") && markup.ends_with("</template>") {
        // A bare outer <template> would mount as inert markup
        extract_template(markup).unwrap_or(markup)
    } else {
        markup
    };

    vue_shell()
        .style(extract_style_body(source).unwrap_or_default())
        .body(&format!("<div id=\"app\">\n  {template}\n</div>"))
        .body_script(Script::Inline(script))
        .finish()
}

/// Separate markup from code when the source starts with a tag.
fn split_markup_and_code(source: &str) -> (String, String) {
    if !source.trim_start().starts_with('<') {
        return (String::new(), source.to_string());
    }

    let code = SCRIPT_BLOCK_RE
        .captures_iter(source)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let markup = SCRIPT_BLOCK_RE.replace_all(source, "");
    let markup = STYLE_BLOCK_RE.replace_all(&markup, "").into_owned();

    (markup, code)
}

fn prelude() -> String {
    format!("const {{ {} }} = Vue;", VUE_PRELUDE.join(", "))
}

fn vue_shell() -> DocumentShell {
    DocumentShell::new("Vue Preview").head_scripts([VUE_CDN])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> String {
        VueAdapter::new().render(source, &FrameworkVerdict::for_kind(FrameworkKind::Vue))
    }

    #[test]
    fn mounts_single_file_component() {
        let html = render("<template><h1>{{x}}</h1></template><script>export default{data(){return{x:1}}}</script>");

        assert!(html.contains("createApp(AppComponent).mount('#app')"));
        assert!(html.contains(r#"<div id="app"><h1>{{x}}</h1></div>"#));
        assert!(html.contains(r#"<script src="https://unpkg.com/vue@3/dist/vue.global.js">"#));
        assert!(html.contains("const AppComponent = {data(){return{x:1}}}"));
    }

    #[test]
    fn sfc_style_lands_in_head() {
        let html = render(
            "<template><p>a</p></template>\n<script>export default {}</script>\n<style>p { color: red; }</style>",
        );

        let style = html.find("p { color: red; }").unwrap();
        assert!(style < html.find("</head>").unwrap());
    }

    #[test]
    fn sfc_without_export_gets_default_component() {
        let html = render("<template><p>{{ message }}</p></template><script>console.log(1);</script>");

        assert!(html.contains("console.log(1);"));
        assert!(html.contains(r#"return { message: "Hello Vue!" };"#));
        assert!(html.contains("createApp(AppComponent).mount('#app')"));
    }

    #[test]
    fn sfc_script_setup_imports_are_globalized() {
        let html = render(
            "<template><p>{{ n }}</p></template><script>import { ref, nextTick } from 'vue';\nexport default { setup() { return { n: ref(1) }; } }</script>",
        );

        assert!(!html.contains("from 'vue'"));
        assert!(html.contains("const { nextTick } = Vue;"));
    }

    #[test]
    fn loose_code_gets_auto_mount() {
        let html = render("import { ref } from 'vue';\nconst count = ref(0);\nwatch(count, () => {});");

        assert!(html.contains("const { createApp, ref, reactive, computed, watch, onMounted } = Vue;"));
        assert!(html.contains("const count = ref(0);"));
        assert!(html.contains("const title = ref('Vue Preview');"));
        assert!(html.contains("}).mount('#app');"));
        assert!(html.contains("{{ title }}"));
        assert!(html.contains("{{ message }}"));
    }

    #[test]
    fn loose_code_with_create_app_is_not_remounted() {
        let html = render("const app = createApp({ data() { return { a: 1 } } });\napp.mount('#app');");

        assert!(!html.contains("Vue Preview'"));
        assert_eq!(html.matches("createApp(").count(), 1);
    }

    #[test]
    fn loose_export_default_object_becomes_component() {
        let html = render("export default {\n  data() { return { message: 'hey' } }\n}");

        assert!(html.contains("const AppComponent = {"));
        assert!(html.contains("createApp(AppComponent).mount('#app');"));
        assert!(!html.contains("export default"));
    }

    #[test]
    fn markup_snippet_becomes_app_template() {
        let html = render(r#"<div x-data="{count:0}"><button @click="count++">Go</button></div>"#);

        assert!(html.contains(r#"<div id="app">
  <div x-data="{count:0}"><button @click="count++">Go</button></div>
</div>"#));
        assert!(html.contains("}).mount('#app');"));
    }

    #[test]
    fn bare_template_is_unwrapped_into_mount_point() {
        let html = render("<template>\n  <p v-if=\"ok\">{{ msg }}</p>\n</template>");

        assert!(html.contains("<div id=\"app\">\n  <p v-if=\"ok\">{{ msg }}</p>\n</div>"));
        assert!(!html.contains("<template>"));
    }

    #[test]
    fn vue2_constructor_runs_through_shim() {
        let html = render("new Vue({ el: '#app', data: { message: 'old' } });");

        assert!(html.contains("function VueCompat(options)"));
        assert!(html.contains("VueCompat({ el: '#app'"));
        assert!(!html.contains("Vue Preview'"));
    }

    #[test]
    fn injects_cdn_into_documents() {
        let doc = "<!DOCTYPE html><html><head></head><body><div id=\"app\" v-if=\"a\"></div></body></html>";
        let html = render(doc);

        assert!(html.contains(VUE_CDN));
        assert!(html.find(VUE_CDN).unwrap() < html.find("</head>").unwrap());
    }

    #[test]
    fn documents_with_vue_are_unchanged() {
        let doc = r#"<!DOCTYPE html><html><head><script src="https://unpkg.com/vue@3"></script></head><body v-if="x"></body></html>"#;

        assert_eq!(render(doc), doc);
    }
}
