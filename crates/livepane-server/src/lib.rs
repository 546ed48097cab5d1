//! Live preview server for livepane.
//!
//! Watches one snippet file, re-renders it after edits settle, and pushes the
//! new document over a WebSocket into a sandboxed iframe.

pub mod server;
pub mod watcher;
pub mod websocket;

pub use server::{DevServer, DevServerConfig, SandboxPolicy, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
pub use websocket::{HmrHub, HmrMessage};
