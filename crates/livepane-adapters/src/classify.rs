//! Heuristic framework detection.
//!
//! Detection is an ordered list of predicates evaluated first-match-wins. The
//! order encodes priority when signals overlap: JSX-looking syntax beats Vue
//! templates, and Vue's `@click` beats Alpine's.

use regex::Regex;
use std::sync::LazyLock;

use crate::verdict::{FrameworkKind, FrameworkVerdict};

type Predicate = fn(&str) -> bool;

/// Detection rules in priority order. `Vanilla` is the fallback and has no rule.
const RULES: &[(FrameworkKind, Predicate)] = &[
    (FrameworkKind::React, looks_like_react),
    (FrameworkKind::Vue, looks_like_vue),
    (FrameworkKind::Angular, looks_like_angular),
    (FrameworkKind::Svelte, looks_like_svelte),
    (FrameworkKind::Alpine, looks_like_alpine),
    (FrameworkKind::Html, looks_like_html_document),
];

static REACT_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+React\b|from\s*['"]react['"]"#).expect("Invalid react import regex")
});

static CAPITALIZED_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[A-Z][A-Za-z0-9_.]*[\s/>]").expect("Invalid capitalized tag regex")
});

static ARROW_JSX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"=>\s*\(?\s*<[A-Za-z]").expect("Invalid arrow jsx regex")
});

static FUNCTION_RETURN_JSX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+[A-Za-z_$][\w$]*\s*\([^)]*\)\s*\{[\s\S]*?\breturn\s*\(?\s*<[A-Za-z]")
        .expect("Invalid function jsx regex")
});

static NEW_VUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"new\s+Vue\b").expect("Invalid new Vue regex"));

static TEMPLATE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<template[\s>]").expect("Invalid template tag regex"));

static SFC_EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+default\s*\{[\s\S]*?\bdata\s*\(\s*\)").expect("Invalid sfc export regex")
});

static SCRIPT_THEN_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script>\s*<style").expect("Invalid script/style regex")
});

static HTML_DOCUMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype|<html").expect("Invalid html document regex"));

const REACT_CALLS: &[&str] = &["React.createElement", "ReactDOM.render", "ReactDOM.createRoot"];

const VUE_MARKERS: &[&str] = &["createApp", "v-model", "v-if", "v-for", "@click"];

const ANGULAR_MARKERS: &[&str] = &[
    "@Component",
    "@NgModule",
    "angular.module",
    "ng-app",
    "ng-controller",
    "*ngFor",
    "*ngIf",
    "[(ngModel)]",
];

const ALPINE_MARKERS: &[&str] = &["x-data", "x-show", "x-if", "@click", "Alpine."];

/// Classify a source string. Total: every input maps to exactly one verdict.
pub fn classify(source: &str) -> FrameworkVerdict {
    FrameworkVerdict::for_kind(classify_kind(source))
}

/// Classify a source string, returning only the kind.
pub fn classify_kind(source: &str) -> FrameworkKind {
    RULES
        .iter()
        .find(|(_, matches)| matches(source))
        .map(|(kind, _)| *kind)
        .unwrap_or(FrameworkKind::Vanilla)
}

/// Every kind whose signals appear in the source, in priority order.
///
/// The first entry (or `Vanilla` when empty) is what [`classify`] returns;
/// the rest show which overlapping signals lost.
pub fn matching_kinds(source: &str) -> Vec<FrameworkKind> {
    RULES
        .iter()
        .filter(|(_, matches)| matches(source))
        .map(|(kind, _)| *kind)
        .collect()
}

fn contains_any(source: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| source.contains(m))
}

/// Whether the source contains JSX-like syntax.
///
/// Covers capitalized component tags, arrow functions returning markup, and
/// named functions that return markup.
pub fn looks_like_jsx(source: &str) -> bool {
    CAPITALIZED_TAG_RE.is_match(source)
        || ARROW_JSX_RE.is_match(source)
        || FUNCTION_RETURN_JSX_RE.is_match(source)
}

fn looks_like_react(source: &str) -> bool {
    REACT_IMPORT_RE.is_match(source) || contains_any(source, REACT_CALLS) || looks_like_jsx(source)
}

fn looks_like_vue(source: &str) -> bool {
    NEW_VUE_RE.is_match(source)
        || contains_any(source, VUE_MARKERS)
        || TEMPLATE_TAG_RE.is_match(source)
        || SFC_EXPORT_RE.is_match(source)
}

fn looks_like_angular(source: &str) -> bool {
    contains_any(source, ANGULAR_MARKERS)
}

fn looks_like_svelte(source: &str) -> bool {
    source.contains("export let") || source.contains("$:") || SCRIPT_THEN_STYLE_RE.is_match(source)
}

fn looks_like_alpine(source: &str) -> bool {
    contains_any(source, ALPINE_MARKERS)
}

/// Whether the source declares a doctype or an `<html>` element.
pub fn looks_like_html_document(source: &str) -> bool {
    HTML_DOCUMENT_RE.is_match(source)
}
