//! React/JSX adapter: runs components on the UMD builds without a bundler.

use regex::Regex;
use std::sync::LazyLock;

use crate::classify::looks_like_html_document;
use crate::imports::globalize_imports;
use crate::shell::{DocumentShell, Script};
use crate::traits::FrameworkAdapter;
use crate::verdict::{FrameworkKind, FrameworkVerdict, BABEL_CDN, REACT_CDN, REACT_DOM_CDN};

/// Hooks destructured from the global `React` before user code runs.
pub const HOOK_PRELUDE: &[&str] = &["useState", "useEffect", "useRef", "useCallback", "useMemo"];

/// Picks the component to mount once user code has run.
///
/// Order: a binding named `App`, then the first capitalized function-valued
/// global other than `React`/`ReactDOM`, then a built-in counter.
const MOUNT_SCRIPT: &str = r#"(function () {
  function PreviewFallback() {
    var state = React.useState(0);
    return React.createElement(
      'div',
      { style: { textAlign: 'center', padding: '2rem' } },
      React.createElement('h1', null, 'React Preview'),
      React.createElement('p', null, 'Count: ' + state[0]),
      React.createElement('button', { onClick: function () { state[1](state[0] + 1); } }, 'Increment')
    );
  }

  var entry = null;
  if (typeof App !== 'undefined' && App) {
    entry = App;
  }
  if (!entry) {
    var names = Object.keys(window);
    for (var i = 0; i < names.length; i++) {
      var name = names[i];
      if (/^[A-Z]/.test(name) && name !== 'React' && name !== 'ReactDOM' && typeof window[name] === 'function') {
        entry = window[name];
        break;
      }
    }
  }
  if (!entry) {
    entry = PreviewFallback;
  }

  ReactDOM.createRoot(document.getElementById('root')).render(React.createElement(entry));
})();"#;

static EXPORT_DEFAULT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexport\s+default\s+").expect("Invalid export default regex"));

static EXPORT_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*)export\s+((?:async\s+)?function|const|let|var|class)\b")
        .expect("Invalid export declaration regex")
});

static JSX_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[A-Za-z][\w.-]*(?:\s[^<>]*?)?/?>|</[A-Za-z][\w.-]*\s*>|<>|</>")
        .expect("Invalid jsx tag regex")
});

static REACT_DESTRUCTURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const|let|var)\s*\{([^}]*)\}\s*=\s*React\b").expect("Invalid destructure regex")
});

static SELF_MOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ReactDOM\.render\s*\(|createRoot\s*\(").expect("Invalid self mount regex")
});

/// React adapter.
#[derive(Debug, Default)]
pub struct ReactAdapter;

impl ReactAdapter {
    /// Create a new React adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkAdapter for ReactAdapter {
    fn name(&self) -> &'static str {
        "react"
    }

    fn kinds(&self) -> &[FrameworkKind] {
        &[FrameworkKind::React]
    }

    fn render(&self, source: &str, _verdict: &FrameworkVerdict) -> String {
        if looks_like_html_document(source) {
            return source.to_string();
        }

        let code = rewrite_module_syntax(source);
        let has_jsx = contains_jsx(&code);

        let prelude = hook_prelude(&code);
        let mut script = String::new();
        if !prelude.is_empty() {
            script.push_str(&prelude);
            script.push_str("\n\n");
        }
        script.push_str(code.trim());
        if !mounts_itself(&code) {
            script.push_str("\n\n");
            script.push_str(MOUNT_SCRIPT);
        }

        let mut shell = DocumentShell::new("React Preview").head_scripts([REACT_CDN, REACT_DOM_CDN]);
        if has_jsx {
            shell = shell.head_scripts([BABEL_CDN]);
        }

        shell
            .body(r#"<div id="root"></div>"#)
            .body_script(if has_jsx {
                Script::Babel(script)
            } else {
                Script::Inline(script)
            })
            .finish()
    }
}

/// Turn ES-module React code into something a classic script can run.
///
/// Named imports become a destructuring of the matching UMD global (`React`
/// or `ReactDOM`). Other `react`/`react-dom` imports are removed and `export`
/// keywords are dropped.
pub fn rewrite_module_syntax(source: &str) -> String {
    let code = globalize_imports(source, &["react-dom"], "ReactDOM", &[]);
    let code = globalize_imports(&code, &["react"], "React", HOOK_PRELUDE);
    let code = EXPORT_DEFAULT_RE.replace_all(&code, "");
    EXPORT_DECL_RE.replace_all(&code, "$1$2").into_owned()
}

/// Hook destructuring for names the code does not already pull from `React`.
fn hook_prelude(code: &str) -> String {
    let declared: Vec<&str> = REACT_DESTRUCTURE_RE
        .captures_iter(code)
        .filter_map(|c| c.get(1))
        .flat_map(|m| m.as_str().split(','))
        .map(|spec| spec.split(':').next_back().unwrap_or(spec).trim())
        .collect();

    let hooks: Vec<&str> = HOOK_PRELUDE
        .iter()
        .copied()
        .filter(|hook| !declared.contains(hook))
        .collect();

    if hooks.is_empty() {
        String::new()
    } else {
        format!("const {{ {} }} = React;", hooks.join(", "))
    }
}

/// Whether the rewritten code contains JSX markup and so needs Babel.
pub fn contains_jsx(code: &str) -> bool {
    JSX_TAG_RE.is_match(code)
}

/// Whether the code creates its own root.
fn mounts_itself(code: &str) -> bool {
    SELF_MOUNT_RE.is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> String {
        ReactAdapter::new().render(source, &FrameworkVerdict::for_kind(FrameworkKind::React))
    }

    #[test]
    fn strips_react_imports() {
        let source = r#"import React from 'react';
import ReactDOM from "react-dom/client";
import * as R from 'react';
import './styles.css';
const x = 1;
"#;

        assert_eq!(
            rewrite_module_syntax(source),
            "import './styles.css';\nconst x = 1;\n"
        );
    }

    #[test]
    fn rewrites_named_imports_to_destructuring() {
        let source = "import React, { useState, memo, Fragment as F } from 'react';\nconst y = 2;";

        assert_eq!(
            rewrite_module_syntax(source),
            "const { memo, Fragment: F } = React;\nconst y = 2;"
        );
    }

    #[test]
    fn react_dom_imports_read_from_react_dom_global() {
        let source = "import { createRoot } from 'react-dom/client';\nimport { useState } from 'react';\n";

        assert_eq!(rewrite_module_syntax(source), "const { createRoot } = ReactDOM;\n");
    }

    #[test]
    fn client_entry_mounts_through_react_dom() {
        let html = render(
            "import { createRoot } from 'react-dom/client';\nconst App = () => <h1>x</h1>;\ncreateRoot(document.getElementById('root')).render(<App />);",
        );

        assert!(html.contains("const { createRoot } = ReactDOM;"));
        assert!(!html.contains("const { createRoot } = React;"));
        assert!(!html.contains("PreviewFallback"));
    }

    #[test]
    fn drops_imports_covered_by_prelude() {
        let source = "import { useState, useEffect } from 'react';\nfunction App() {}";

        assert_eq!(rewrite_module_syntax(source), "function App() {}");
    }

    #[test]
    fn strips_exports() {
        let source = "export default function App() {}\nexport const Card = () => null;";

        assert_eq!(
            rewrite_module_syntax(source),
            "function App() {}\nconst Card = () => null;"
        );
    }

    #[test]
    fn jsx_pulls_in_babel() {
        let html = render("function App() { return <h1>Hi</h1>; }");

        assert!(html.contains(BABEL_CDN));
        assert!(html.contains(r#"<script type="text/babel""#));
        assert!(html.contains(r#"<div id="root"></div>"#));
    }

    #[test]
    fn create_element_skips_babel() {
        let html = render("function App() { return React.createElement('h1', null, 'Hi'); }");

        assert!(!html.contains(BABEL_CDN));
        assert!(html.contains(REACT_CDN));
        assert!(html.contains(REACT_DOM_CDN));
        assert!(!html.contains("text/babel"));
    }

    #[test]
    fn runtimes_precede_user_code() {
        let html = render("const App = () => <p>x</p>;");

        let head_end = html.find("</head>").unwrap();
        assert!(html.find(REACT_CDN).unwrap() < head_end);
        assert!(html.find(BABEL_CDN).unwrap() < head_end);
        assert!(html.find("const App").unwrap() > head_end);
    }

    #[test]
    fn destructures_hooks_before_user_code() {
        let html = render("function App() { const [a] = useState(1); return <p>{a}</p>; }");

        let prelude = html
            .find("const { useState, useEffect, useRef, useCallback, useMemo } = React;")
            .unwrap();
        assert!(prelude < html.find("function App").unwrap());
    }

    #[test]
    fn prelude_skips_hooks_the_code_declares() {
        let html = render("const { useState } = React;\nfunction App() { return null; }");

        assert!(html.contains("const { useEffect, useRef, useCallback, useMemo } = React;"));
    }

    #[test]
    fn appends_mount_fallback_chain() {
        let html = render("const Widget = () => <p>w</p>;");

        let user = html.find("const Widget").unwrap();
        let mount = html.find("typeof App !== 'undefined'").unwrap();
        assert!(user < mount);
        assert!(html.contains("name !== 'React' && name !== 'ReactDOM'"));
        assert!(html.contains("PreviewFallback"));
    }

    #[test]
    fn self_mounting_code_is_not_mounted_twice() {
        let html = render(
            "const App = () => <p>x</p>;\nReactDOM.createRoot(document.getElementById('root')).render(<App />);",
        );

        assert!(!html.contains("PreviewFallback"));
    }

    #[test]
    fn complete_documents_pass_through() {
        let doc = "<!DOCTYPE html><html><body><div id=\"root\"></div></body></html>";

        assert_eq!(render(doc), doc);
    }

    #[test]
    fn escapes_closing_script_tags_in_code() {
        let html = render("const App = () => <p>{'</script>'}</p>;");

        assert!(html.contains(r"<\/script>"));
    }
}
