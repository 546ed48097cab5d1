//! File watching with trailing-edge debounce.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// File was created or its contents changed
    Changed(PathBuf),

    /// File was deleted
    Removed(PathBuf),
}

impl WatchEvent {
    /// Path the event refers to.
    pub fn path(&self) -> &Path {
        match self {
            WatchEvent::Changed(path) | WatchEvent::Removed(path) => path,
        }
    }
}

/// File watcher for detecting changes.
///
/// Raw notifications are collected until `debounce` passes without a new one,
/// then the last relevant event of the burst is emitted.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch the given files and directories.
    ///
    /// Directories are watched recursively. A file is watched through its
    /// parent directory, so editors that save by replacing the file are still
    /// seen; events for siblings are dropped.
    ///
    /// Returns the watcher and a channel to receive events.
    pub fn new(
        paths: &[PathBuf],
        debounce: Duration,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        let mut scope = WatchScope::default();
        for path in paths {
            if path.is_dir() {
                let dir = path.canonicalize()?;
                watcher
                    .watch(&dir, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
                scope.dirs.push(dir);
            } else {
                let (dir, file) = split_file(path)?;
                watcher
                    .watch(&dir, RecursiveMode::NonRecursive)
                    .map_err(std::io::Error::other)?;
                scope.files.push(file);
            }
        }

        std::thread::spawn(move || {
            while let Some(batch) = next_batch(&sync_rx, debounce) {
                let Some(event) = coalesce(&batch, &scope) else {
                    continue;
                };
                tracing::debug!("Debounced {} raw events into {:?}", batch.len(), event);
                if async_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// What a watcher reports on.
#[derive(Debug, Default)]
struct WatchScope {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

impl WatchScope {
    fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f == path) || self.dirs.iter().any(|d| path.starts_with(d))
    }
}

/// Canonical parent directory and the file path under it.
fn split_file(path: &Path) -> Result<(PathBuf, PathBuf), std::io::Error> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("not a file path: {}", path.display()),
        )
    })?;

    let dir = parent.canonicalize()?;
    let file = dir.join(name);
    Ok((dir, file))
}

/// Block for one event, then keep collecting until `window` passes in silence.
///
/// Returns `None` once the sending side is gone and nothing is pending.
fn next_batch<T>(rx: &mpsc::Receiver<T>, window: Duration) -> Option<Vec<T>> {
    let first = rx.recv().ok()?;
    let mut batch = vec![first];

    loop {
        match rx.recv_timeout(window) {
            Ok(event) => batch.push(event),
            Err(mpsc::RecvTimeoutError::Timeout) => return Some(batch),
            Err(mpsc::RecvTimeoutError::Disconnected) => return Some(batch),
        }
    }
}

/// The last in-scope event of a burst.
fn coalesce(batch: &[notify::Event], scope: &WatchScope) -> Option<WatchEvent> {
    batch
        .iter()
        .rev()
        .flat_map(|event| event.paths.iter().rev().map(move |path| (path, &event.kind)))
        .filter(|(path, _)| scope.contains(path))
        .find_map(|(path, kind)| classify_event(path, kind))
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &EventKind) -> Option<WatchEvent> {
    match kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(WatchEvent::Changed(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Removed(path.to_path_buf())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn event(kind: EventKind, path: &str) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from(path))
    }

    fn scope(files: &[&str]) -> WatchScope {
        WatchScope {
            dirs: Vec::new(),
            files: files.iter().map(PathBuf::from).collect(),
        }
    }

    #[test]
    fn burst_collapses_to_last_event() {
        let batch = vec![
            event(EventKind::Remove(RemoveKind::File), "/w/app.jsx"),
            event(EventKind::Create(CreateKind::File), "/w/app.jsx"),
            event(EventKind::Modify(ModifyKind::Any), "/w/app.jsx"),
        ];

        assert_eq!(
            coalesce(&batch, &scope(&["/w/app.jsx"])),
            Some(WatchEvent::Changed(PathBuf::from("/w/app.jsx")))
        );
    }

    #[test]
    fn ignores_siblings_and_access_events() {
        let batch = vec![
            event(EventKind::Modify(ModifyKind::Any), "/w/app.jsx"),
            event(EventKind::Modify(ModifyKind::Any), "/w/.app.jsx.swp"),
            event(EventKind::Access(AccessKind::Any), "/w/app.jsx"),
        ];

        assert_eq!(
            coalesce(&batch, &scope(&["/w/app.jsx"])),
            Some(WatchEvent::Changed(PathBuf::from("/w/app.jsx")))
        );
        assert_eq!(coalesce(&batch[1..], &scope(&["/w/app.jsx"])), None);
    }

    #[test]
    fn directories_match_nested_paths() {
        let scope = WatchScope {
            dirs: vec![PathBuf::from("/w")],
            files: Vec::new(),
        };
        let batch = vec![event(EventKind::Remove(RemoveKind::Any), "/w/a/b.vue")];

        assert_eq!(
            coalesce(&batch, &scope),
            Some(WatchEvent::Removed(PathBuf::from("/w/a/b.vue")))
        );
    }

    #[test]
    fn batches_queued_events_together() {
        let (tx, rx) = mpsc::channel();
        for n in 0..3 {
            tx.send(n).unwrap();
        }

        assert_eq!(next_batch(&rx, Duration::from_millis(20)), Some(vec![0, 1, 2]));

        drop(tx);
        assert_eq!(next_batch(&rx, Duration::from_millis(20)), None);
    }

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let entry = temp.path().join("snippet.html");
        fs::write(&entry, "<p>one</p>").unwrap();

        let (watcher, mut rx) = FileWatcher::new(&[entry.clone()], Duration::from_millis(50)).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&entry, "<p>two</p>").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        let event = event.expect("timeout waiting for file watch event");
        let event = event.expect("channel should not be closed");
        assert_eq!(event.path().file_name().unwrap(), "snippet.html");
    }
}
