//! Fragment extraction from loosely structured source.
//!
//! Every extractor is a pure function returning `None` when its fragment is
//! absent or unparsable. Callers substitute their own documented default.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Greedy: Vue templates nest <template> for slots and v-if groups
    Regex::new(r"(?is)<template(?:\s[^>]*)?>(.*)</template>").expect("Invalid template regex")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script([^>]*)>(.*?)</script>").expect("Invalid script regex")
});

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("Invalid style regex")
});

static DECORATOR_TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)\btemplate\s*:\s*(?:`([^`]*)`|'([^'\n]*)'|"([^"\n]*)")"#)
        .expect("Invalid decorator template regex")
});

static EXPORTED_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+(?:default\s+)?class\s+[A-Za-z_$][\w$]*[^{]*\{")
        .expect("Invalid exported class regex")
});

static ANY_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bclass\s+[A-Za-z_$][\w$]*[^{]*\{").expect("Invalid class regex")
});

static PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)(?:^|[;}])[ \t]*(?:@\w+\([^)]*\)\s*)*(?:(?:public|private|protected|readonly|static)\s+)*([A-Za-z_$][\w$]*)[?!]?\s*(?::[^=;\n]*)?=\s*([^;\n]*)",
    )
    .expect("Invalid property regex")
});

static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)(?:^|[;}])[ \t]*(?:(?:public|private|protected|static)\s+)*(async\s+)?([A-Za-z_$][\w$]*)\s*\(\s*\)\s*(?::\s*[^{;\n]+?)?\s*\{",
    )
    .expect("Invalid method regex")
});

/// A `name = value` class field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAssignment {
    pub name: String,
    pub value: String,
}

/// A method declared with an empty parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    pub name: String,

    /// Text between the method's braces
    pub body: String,

    pub is_async: bool,
}

/// Inner HTML of the outermost `<template>` element.
pub fn extract_template(source: &str) -> Option<&str> {
    TEMPLATE_RE
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Body of the first inline `<script>` block (blocks with `src=` are skipped).
pub fn extract_script_body(source: &str) -> Option<&str> {
    SCRIPT_RE
        .captures_iter(source)
        .find(|c| !c.get(1).is_some_and(|attrs| attrs.as_str().contains("src=")))
        .and_then(|c| c.get(2))
        .map(|m| m.as_str().trim())
}

/// Body of the first `<style>` block.
pub fn extract_style_body(source: &str) -> Option<&str> {
    STYLE_RE
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// Inline `template:` string of a component decorator.
pub fn extract_decorator_template(source: &str) -> Option<&str> {
    let caps = DECORATOR_TEMPLATE_RE.captures(source)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim())
}

/// Text between the braces of the exported class, or of the first class when
/// none is exported. `None` when the braces never balance.
pub fn extract_class_body(source: &str) -> Option<&str> {
    let head = EXPORTED_CLASS_RE
        .find(source)
        .or_else(|| ANY_CLASS_RE.find(source))?;
    let open = head.end() - 1;
    let close = matching_brace(source, open)?;
    Some(&source[open + 1..close])
}

/// Class fields with an initializer, in declaration order.
///
/// Only members at the top level of `class_body` are considered. Initializers
/// that span lines or hold arrow functions are skipped.
pub fn parse_property_assignments(class_body: &str) -> Vec<PropertyAssignment> {
    let masked = mask_nested(class_body);

    PROPERTY_RE
        .captures_iter(&masked)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            let value = caps.get(2)?;
            let value = class_body[value.start()..value.end()].trim();

            if value.is_empty()
                || value.contains("=>")
                || !quotes_closed(value)
                || !brackets_balanced(value)
            {
                return None;
            }

            Some(PropertyAssignment {
                name: name.as_str().to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

/// Zero-argument methods at the top level of `class_body`, constructors excluded.
pub fn parse_zero_arg_methods(class_body: &str) -> Vec<MethodDefinition> {
    let masked = mask_nested(class_body);

    METHOD_RE
        .captures_iter(&masked)
        .filter_map(|caps| {
            let name = caps.get(2)?.as_str();
            if matches!(name, "constructor" | "if" | "for" | "while" | "switch" | "catch") {
                return None;
            }

            let open = caps.get(0)?.end() - 1;
            let close = matching_brace(class_body, open)?;

            Some(MethodDefinition {
                name: name.to_string(),
                body: class_body[open + 1..close].to_string(),
                is_async: caps.get(1).is_some(),
            })
        })
        .collect()
}

/// Byte offset of the `}` closing the `{` at `open`.
///
/// Braces inside string literals and comments are ignored.
pub fn matching_brace(source: &str, open: usize) -> Option<usize> {
    if source.as_bytes().get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    for (pos, brace) in code_braces(source) {
        if pos < open {
            continue;
        }
        if brace == b'{' {
            depth += 1;
        } else {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(pos);
            }
        }
    }

    None
}

/// Blank out everything nested inside braces and inside string literals,
/// keeping byte offsets and newlines.
///
/// `a = 1; run() { x = 2; }` becomes `a = 1; run() {        }`, so member
/// regexes never see statements inside method bodies or `;` inside strings.
fn mask_nested(source: &str) -> String {
    let scan = scan(source);
    let mut ranges = scan.strings;
    let mut depth = 0usize;
    let mut start = 0;

    for (pos, brace) in scan.braces {
        if brace == b'{' {
            if depth == 0 {
                start = pos + 1;
            }
            depth += 1;
        } else if depth > 0 {
            depth -= 1;
            if depth == 0 {
                ranges.push(start..pos);
            }
        }
    }
    if depth > 0 {
        ranges.push(start..source.len());
    }

    let mut masked = String::with_capacity(source.len());
    for (pos, c) in source.char_indices() {
        if c != '\n' && ranges.iter().any(|r| r.contains(&pos)) {
            masked.extend(std::iter::repeat(' ').take(c.len_utf8()));
        } else {
            masked.push(c);
        }
    }
    masked
}

#[derive(Clone, Copy, PartialEq)]
enum Lex {
    Code,
    Quoted(u8),
    LineComment,
    BlockComment,
}

/// Result of a lexical pass over JavaScript-ish source.
struct Scan {
    /// Positions of `{` and `}` that sit in code
    braces: Vec<(usize, u8)>,

    /// Contents of string literals, quotes excluded
    strings: Vec<Range<usize>>,

    /// State at end of input
    end: Lex,
}

fn scan(source: &str) -> Scan {
    let bytes = source.as_bytes();
    let mut braces = Vec::new();
    let mut strings = Vec::new();
    let mut state = Lex::Code;
    let mut quote_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            Lex::Code => match b {
                b'\'' | b'"' | b'`' => {
                    state = Lex::Quoted(b);
                    quote_start = i + 1;
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => state = Lex::LineComment,
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    state = Lex::BlockComment;
                    i += 1;
                }
                b'{' | b'}' => braces.push((i, b)),
                _ => {}
            },
            Lex::Quoted(quote) => {
                if b == b'\\' {
                    i += 1;
                } else if b == quote || (b == b'\n' && quote != b'`') {
                    // '...' and "..." never span lines
                    strings.push(quote_start..i);
                    state = Lex::Code;
                }
            }
            Lex::LineComment => {
                if b == b'\n' {
                    state = Lex::Code;
                }
            }
            Lex::BlockComment => {
                if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    state = Lex::Code;
                    i += 1;
                }
            }
        }
        i += 1;
    }

    if let Lex::Quoted(_) = state {
        strings.push(quote_start..bytes.len());
    }

    Scan {
        braces,
        strings,
        end: state,
    }
}

/// Positions of `{` and `}` that sit in code rather than strings or comments.
fn code_braces(source: &str) -> Vec<(usize, u8)> {
    scan(source).braces
}

/// Whether every string literal in `value` is closed.
fn quotes_closed(value: &str) -> bool {
    !matches!(scan(value).end, Lex::Quoted(_))
}

fn brackets_balanced(value: &str) -> bool {
    let mut stack = Vec::new();
    for c in value.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}
