//! ES-module import rewriting for CDN globals.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static NAMED_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // import { a, b as c } from 'pkg'  /  import Default, { a } from 'pkg'
    Regex::new(
        r#"(?m)^[ \t]*import\s+(?:[\w$]+\s*,\s*)?\{([^}]*)\}\s*from\s*['"]([^'"]+)['"][ \t]*;?[ \t]*\r?\n?"#,
    )
    .expect("Invalid named import regex")
});

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(?:[^;\n'"]*?\s*from\s*)?['"]([^'"]+)['"][ \t]*;?[ \t]*\r?\n?"#)
        .expect("Invalid import regex")
});

/// Replace imports of `packages` with reads from a browser global.
///
/// Named imports become `const { a, b: c } = Global;`, skipping names in
/// `provided` (already destructured by the generated prelude). Default,
/// namespace, side-effect and type-only imports of the same packages are
/// removed. Imports of other modules are left alone.
pub fn globalize_imports(source: &str, packages: &[&str], global: &str, provided: &[&str]) -> String {
    let code = NAMED_IMPORT_RE.replace_all(source, |caps: &Captures| {
        if is_package(&caps[2], packages) {
            destructure(&caps[1], global, provided)
        } else {
            caps[0].to_string()
        }
    });

    IMPORT_RE
        .replace_all(&code, |caps: &Captures| {
            if is_package(&caps[1], packages) {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// `pkg` and its subpaths (`react-dom/client`).
fn is_package(module: &str, packages: &[&str]) -> bool {
    packages.iter().any(|p| {
        module == *p
            || module
                .strip_prefix(p)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

fn destructure(specifiers: &str, global: &str, provided: &[&str]) -> String {
    let bindings: Vec<String> = specifiers
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.starts_with("type "))
        .filter_map(|spec| match spec.split_once(" as ") {
            Some((imported, local)) => Some(format!("{}: {}", imported.trim(), local.trim())),
            None if provided.contains(&spec) => None,
            None => Some(spec.to_string()),
        })
        .collect();

    if bindings.is_empty() {
        String::new()
    } else {
        format!("const {{ {} }} = {};\n", bindings.join(", "), global)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leaves_other_modules_alone() {
        let source = "import { format } from 'date-fns';\nimport x from 'reactive-thing';\n";

        assert_eq!(globalize_imports(source, &["react"], "React", &[]), source);
    }

    #[test]
    fn handles_multiline_named_imports() {
        let source = "import {\n  ref,\n  defineComponent,\n} from 'vue';\nrun();";

        assert_eq!(
            globalize_imports(source, &["vue"], "Vue", &["ref"]),
            "const { defineComponent } = Vue;\nrun();"
        );
    }

    #[test]
    fn removes_type_only_imports() {
        let source = "import type { FC } from 'react';\nconst a = 1;";

        assert_eq!(globalize_imports(source, &["react"], "React", &[]), "const a = 1;");
    }

    #[test]
    fn matches_subpaths() {
        assert!(is_package("react-dom/client", &["react-dom"]));
        assert!(!is_package("react-dom-extra", &["react-dom"]));
    }
}
