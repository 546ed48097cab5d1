//! Angular adapter.
//!
//! Modern decorator components cannot run without a compiler, so they are
//! synthesized into an AngularJS 1.x controller: class fields and zero-arg
//! methods become `$scope` assignments and the inline template is mounted
//! under `ng-controller`.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::classify::looks_like_html_document;
use crate::extract::{
    extract_class_body, extract_decorator_template, parse_property_assignments,
    parse_zero_arg_methods,
};
use crate::shell::{inject_head_script, DocumentShell, Script};
use crate::traits::FrameworkAdapter;
use crate::vanilla::contains_html_tag;
use crate::verdict::{FrameworkKind, FrameworkVerdict, ANGULARJS_CDN};

/// Template used when a decorator has no inline `template:`.
pub const DEFAULT_COMPONENT_TEMPLATE: &str = r#"<h1>{{ title }}</h1>
<p>Count: {{ count }}</p>
<button ng-click="decrement()">-</button>
<button ng-click="increment()">+</button>"#;

/// Body of the scaffold rendered when no Angular shape is recognized.
pub const DEFAULT_SCAFFOLD_TEMPLATE: &str = r#"<div class="container">
  <h1>{{ title }}</h1>
  <p>{{ message }}</p>
  <p>Count: {{ count }}</p>
  <button ng-click="decrement()">-</button>
  <button ng-click="increment()">+</button>
</div>"#;

/// Scope seeded before any generated assignment, so the component may override it.
const SCOPE_SEED: &[&str] = &[
    "$scope.title = 'Angular App';",
    "$scope.count = 0;",
    "$scope.increment = function () { $scope.count++; };",
    "$scope.decrement = function () { $scope.count--; };",
];

const APP_MODULE: &str = "previewApp";
const CONTROLLER: &str = "MainController";

static ANGULARJS_SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script[^>]*\bsrc\s*=\s*["'][^"']*angular[^"']*["']"#)
        .expect("Invalid angular script regex")
});

static DECORATOR_STYLES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\bstyles\s*:\s*\[\s*`([^`]*)`").expect("Invalid decorator styles regex")
});

static NG_MODEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\(ngModel\)\]\s*=").expect("Invalid ngModel regex"));

static NG_IF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*ngIf\s*=").expect("Invalid ngIf regex"));

static NG_FOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\*ngFor\s*=\s*"\s*let\s+([\w$]+)\s+of\s+([^";]+?)\s*(?:;[^"]*)?""#)
        .expect("Invalid ngFor regex")
});

static EVENT_BINDING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\w+)\)\s*=").expect("Invalid event binding regex"));

/// Angular adapter.
#[derive(Debug, Default)]
pub struct AngularAdapter;

impl AngularAdapter {
    /// Create a new Angular adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FrameworkAdapter for AngularAdapter {
    fn name(&self) -> &'static str {
        "angular"
    }

    fn kinds(&self) -> &[FrameworkKind] {
        &[FrameworkKind::Angular]
    }

    fn render(&self, source: &str, _verdict: &FrameworkVerdict) -> String {
        if looks_like_html_document(source) {
            if source.contains("@angular/") || ANGULARJS_SCRIPT_RE.is_match(source) {
                return source.to_string();
            }
            return inject_head_script(source, ANGULARJS_CDN);
        }

        if is_decorator_component(source) {
            render_decorator_component(source)
        } else if has_angularjs_markers(source) {
            render_angularjs(source)
        } else {
            tracing::debug!("no recognizable Angular shape, rendering default scaffold");
            render_scaffold()
        }
    }
}

fn is_decorator_component(source: &str) -> bool {
    source.contains("@Component") || source.contains("@NgModule")
}

fn has_angularjs_markers(source: &str) -> bool {
    ["ng-app", "ng-controller", "angular.module"]
        .iter()
        .any(|m| source.contains(m))
}

fn render_decorator_component(source: &str) -> String {
    let template = extract_decorator_template(source)
        .map(translate_template_bindings)
        .unwrap_or_else(|| DEFAULT_COMPONENT_TEMPLATE.to_string());

    let statements = match extract_class_body(source) {
        Some(body) => scope_statements(body),
        None => {
            tracing::debug!("decorator component has no parsable class body");
            Vec::new()
        }
    };

    let styles = DECORATOR_STYLES_RE
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_default();

    controller_shell(&template, &statements).style(styles).finish()
}

/// `$scope` assignments for a component class body.
///
/// Fields come first, then methods; `ngOnInit` is invoked when defined.
pub fn scope_statements(class_body: &str) -> Vec<String> {
    let mut statements: Vec<String> = parse_property_assignments(class_body)
        .into_iter()
        .map(|p| format!("$scope.{} = {};", p.name, p.value))
        .collect();

    let methods = parse_zero_arg_methods(class_body);
    let has_init = methods.iter().any(|m| m.name == "ngOnInit");

    statements.extend(methods.into_iter().map(|m| {
        format!(
            "$scope.{} = {}function () {{{}}};",
            m.name,
            if m.is_async { "async " } else { "" },
            m.body
        )
    }));

    if has_init {
        statements.push("$scope.ngOnInit();".to_string());
    }

    statements
}

/// Rewrite the common Angular template bindings into AngularJS directives.
pub fn translate_template_bindings(template: &str) -> String {
    let out = NG_MODEL_RE.replace_all(template, "ng-model=");
    let out = NG_IF_RE.replace_all(&out, "ng-if=");
    let out = NG_FOR_RE.replace_all(&out, r#"ng-repeat="$1 in $2""#);
    EVENT_BINDING_RE
        .replace_all(&out, |caps: &Captures| {
            let directive = match &caps[1] {
                "input" => "change",
                other => other,
            };
            format!("ng-{directive}=")
        })
        .into_owned()
}

fn render_angularjs(source: &str) -> String {
    let shell = DocumentShell::new("Angular Preview").head_scripts([ANGULARJS_CDN]);

    if contains_html_tag(source) {
        shell.body(source.trim()).finish()
    } else {
        shell.body_script(Script::Inline(source.trim().to_string())).finish()
    }
}

fn render_scaffold() -> String {
    let statements = vec!["$scope.message = 'Hello from AngularJS!';".to_string()];
    controller_shell(DEFAULT_SCAFFOLD_TEMPLATE, &statements).finish()
}

fn controller_shell(template: &str, statements: &[String]) -> DocumentShell {
    let body: String = SCOPE_SEED
        .iter()
        .map(|s| s.to_string())
        .chain(statements.iter().cloned())
        .map(|s| format!("  {s}\n"))
        .collect();

    let controller = format!(
        "angular.module('{APP_MODULE}', []).controller('{CONTROLLER}', ['$scope', function ($scope) {{\n{body}}}]);"
    );

    DocumentShell::new("Angular Preview")
        .head_scripts([ANGULARJS_CDN])
        .body_attrs(&format!(r#"ng-app="{APP_MODULE}""#))
        .body(&format!(
            "<div ng-controller=\"{CONTROLLER}\">\n{}\n</div>",
            template.trim()
        ))
        .body_script(Script::Inline(controller))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> String {
        AngularAdapter::new().render(source, &FrameworkVerdict::for_kind(FrameworkKind::Angular))
    }

    #[test]
    fn synthesizes_controller_from_decorator() {
        let source = r#"
import { Component } from '@angular/core';

@Component({
  selector: 'app-root',
  template: `<p>{{title}}</p>`
})
export class AppComponent {
  title = 'hi';
}
"#;

        let html = render(source);

        assert!(html.contains(r#"ng-controller="MainController""#));
        assert!(html.contains("$scope.title = 'hi';"));
        assert!(html.contains("<p>{{title}}</p>"));
        assert!(html.contains(ANGULARJS_CDN));
        assert!(html.contains(r#"<body ng-app="previewApp">"#));
    }

    #[test]
    fn generated_assignments_follow_seed() {
        let html = render("@Component({ template: `<p>{{title}}</p>` })\nexport class A { title = 'hi'; }");

        let seed = html.find("$scope.title = 'Angular App';").unwrap();
        let generated = html.find("$scope.title = 'hi';").unwrap();
        assert!(seed < generated);
        assert!(html.contains("$scope.increment = function () { $scope.count++; };"));
    }

    #[test]
    fn quoted_semicolons_survive_into_scope() {
        let html = render(
            "@Component({ template: `<p>{{message}}</p>` })\nexport class A {\n  message = 'Hello; world';\n}",
        );

        assert!(html.contains("$scope.message = 'Hello; world';"));
        assert!(!html.contains("$scope.message = 'Hello;\n"));
    }

    #[test]
    fn methods_become_scope_functions() {
        let body = r#"
  count = 0;
  reset() {
    this.count = 0;
  }
  ngOnInit() { this.count = 5; }
"#;

        assert_eq!(
            scope_statements(body),
            vec![
                "$scope.count = 0;".to_string(),
                "$scope.reset = function () {\n    this.count = 0;\n  };".to_string(),
                "$scope.ngOnInit = function () { this.count = 5; };".to_string(),
                "$scope.ngOnInit();".to_string(),
            ]
        );
    }

    #[test]
    fn missing_template_uses_default() {
        let html = render("@Component({ selector: 'x' })\nexport class X { count = 3; }");

        assert!(html.contains(r#"<button ng-click="increment()">+</button>"#));
        assert!(html.contains("$scope.count = 3;"));
    }

    #[test]
    fn translates_template_bindings() {
        let template = r#"<li *ngFor="let item of items; let i = index">{{item}}</li><p *ngIf="show">x</p><input [(ngModel)]="name"><button (click)="save()">s</button><input (input)="x()">"#;

        assert_eq!(
            translate_template_bindings(template),
            r#"<li ng-repeat="item in items">{{item}}</li><p ng-if="show">x</p><input ng-model="name"><button ng-click="save()">s</button><input ng-change="x()">"#
        );
    }

    #[test]
    fn decorator_styles_are_kept() {
        let html = render("@Component({ template: `<p>a</p>`, styles: [`p { color: blue; }`] })\nexport class A {}");

        assert!(html.contains("p { color: blue; }"));
    }

    #[test]
    fn wraps_angularjs_markup_unmodified() {
        let source = r#"<div ng-app=""><input ng-model="name"><p>{{name}}</p></div>"#;
        let html = render(source);

        assert!(html.contains(source));
        assert!(html.contains(ANGULARJS_CDN));
        assert!(!html.contains("MainController"));
    }

    #[test]
    fn unrecognized_input_gets_scaffold() {
        let html = render("<p *ngIf=\"x\">orphan</p>");

        assert!(html.contains("Hello from AngularJS!"));
        assert!(html.contains("ng-controller"));
        assert!(!html.contains("orphan"));
    }

    #[test]
    fn injects_angularjs_into_documents() {
        let doc = "<!DOCTYPE html><html><head></head><body ng-app><p>{{1+1}}</p></body></html>";
        let html = render(doc);

        assert!(html.find(ANGULARJS_CDN).unwrap() < html.find("</head>").unwrap());
    }

    #[test]
    fn leaves_modern_angular_documents_alone() {
        let doc = "<!DOCTYPE html><html><head><script type=\"module\">import '@angular/core';</script></head><body ng-app></body></html>";

        assert_eq!(render(doc), doc);
    }
}
