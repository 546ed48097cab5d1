//! Classifier output types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// React 18 development UMD build.
pub const REACT_CDN: &str = "https://unpkg.com/react@18/umd/react.development.js";

/// ReactDOM 18 development UMD build.
pub const REACT_DOM_CDN: &str = "https://unpkg.com/react-dom@18/umd/react-dom.development.js";

/// In-browser JSX compiler.
pub const BABEL_CDN: &str = "https://unpkg.com/@babel/standalone/babel.min.js";

/// Vue 3 global build.
pub const VUE_CDN: &str = "https://unpkg.com/vue@3/dist/vue.global.js";

/// AngularJS 1.8.x global build.
pub const ANGULARJS_CDN: &str = "https://ajax.googleapis.com/ajax/libs/angularjs/1.8.2/angular.min.js";

/// Alpine.js 3 CDN build.
pub const ALPINE_CDN: &str = "https://cdn.jsdelivr.net/npm/alpinejs@3.x.x/dist/cdn.min.js";

/// UI framework idiom a snippet was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkKind {
    Html,
    React,
    Vue,
    Angular,
    Svelte,
    Alpine,
    Vanilla,
}

impl FrameworkKind {
    /// Every kind, in classification priority order.
    pub const ALL: [FrameworkKind; 7] = [
        Self::React,
        Self::Vue,
        Self::Angular,
        Self::Svelte,
        Self::Alpine,
        Self::Html,
        Self::Vanilla,
    ];

    /// Lowercase identifier used in config files, JSON and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::React => "react",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Svelte => "svelte",
            Self::Alpine => "alpine",
            Self::Vanilla => "vanilla",
        }
    }

    /// Whether the browser has to compile the snippet before it can run.
    pub fn needs_browser_compilation(&self) -> bool {
        matches!(self, Self::React | Self::Vue | Self::Angular | Self::Svelte)
    }

    /// Runtime scripts the rendered document loads, in load order.
    pub fn cdn_scripts(&self) -> &'static [&'static str] {
        match self {
            Self::React => &[REACT_CDN, REACT_DOM_CDN, BABEL_CDN],
            Self::Vue => &[VUE_CDN],
            Self::Angular => &[ANGULARJS_CDN],
            Self::Alpine => &[ALPINE_CDN],
            Self::Html | Self::Svelte | Self::Vanilla => &[],
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameworkKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "react" | "jsx" | "tsx" => Ok(Self::React),
            "vue" => Ok(Self::Vue),
            "angular" | "angularjs" => Ok(Self::Angular),
            "svelte" => Ok(Self::Svelte),
            "alpine" | "alpinejs" => Ok(Self::Alpine),
            "vanilla" | "js" | "javascript" => Ok(Self::Vanilla),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

/// Error returned when a framework name is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("Unknown framework: {0} (expected one of html, react, vue, angular, svelte, alpine, vanilla)")]
pub struct ParseKindError(pub String);

/// The classifier's answer for one source string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkVerdict {
    /// Detected framework
    pub kind: FrameworkKind,

    /// Whether in-browser compilation (JSX, templates) is required
    pub needs_browser_compilation: bool,

    /// CDN runtime scripts, in load order
    pub cdn_script_urls: Vec<String>,
}

impl FrameworkVerdict {
    /// Build the verdict for a known kind.
    pub fn for_kind(kind: FrameworkKind) -> Self {
        Self {
            kind,
            needs_browser_compilation: kind.needs_browser_compilation(),
            cdn_script_urls: kind.cdn_scripts().iter().map(|s| s.to_string()).collect(),
        }
    }
}
