//! Framework detection command.

use std::path::PathBuf;

use anyhow::Result;
use livepane_adapters::{classify, matching_kinds, FrameworkKind, FrameworkVerdict};

use super::read_source;

/// Run the detect command.
pub fn run(file: Option<PathBuf>, json: bool, all: bool) -> Result<()> {
    let source = read_source(file.as_deref())?;
    let verdict = classify(&source);

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        let also = if all {
            matching_kinds(&source)
        } else {
            Vec::new()
        };
        print!("{}", describe(&verdict, &also));
    }

    Ok(())
}

/// Human-readable verdict, one fact per line.
fn describe(verdict: &FrameworkVerdict, matched: &[FrameworkKind]) -> String {
    let mut out = format!("{}\n", verdict.kind);

    if verdict.needs_browser_compilation {
        out.push_str("  compiles in the browser\n");
    }
    for url in &verdict.cdn_script_urls {
        out.push_str(&format!("  loads {url}\n"));
    }

    let others: Vec<String> = matched
        .iter()
        .filter(|k| **k != verdict.kind)
        .map(|k| k.to_string())
        .collect();
    if !others.is_empty() {
        out.push_str(&format!("  also matched: {}\n", others.join(", ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn describes_plain_verdict() {
        let verdict = FrameworkVerdict::for_kind(FrameworkKind::Vanilla);

        assert_eq!(describe(&verdict, &[]), "vanilla\n");
    }

    #[test]
    fn lists_runtimes_and_losing_matches() {
        let source = r#"<div x-data="{ n: 0 }"><button @click="n++">+</button></div>"#;
        let verdict = classify(source);

        let text = describe(&verdict, &matching_kinds(source));

        assert!(text.starts_with("vue\n  compiles in the browser\n"));
        assert!(text.contains("  loads https://unpkg.com/vue@3/dist/vue.global.js\n"));
        assert!(text.ends_with("  also matched: alpine\n"));
    }
}
