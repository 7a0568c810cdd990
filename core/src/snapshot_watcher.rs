//! Snapshot file watching
//!
//! Watch mode re-runs the overlay pipeline whenever the feed snapshot file
//! is rewritten. The platform watcher (notify) runs on its own thread and
//! forwards relevant events over a channel; consumers await `next_event`.
//!
//! The parent directory is watched rather than the file itself because
//! editors and exporters typically replace files via rename, which drops a
//! same-file watch on some platforms.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

/// Filesystem occurrences relevant to the watched snapshot.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// The snapshot was created or rewritten
    Changed(PathBuf),
    /// The snapshot was removed
    Removed(PathBuf),
    /// The platform watcher reported an error
    Error(String),
}

/// Errors that can occur while setting up the watch.
#[derive(Debug, Error)]
pub enum SnapshotWatchError {
    #[error("cannot watch {path:?}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("{path:?} has no parent directory to watch")]
    NoParent { path: PathBuf },
}

/// Watches a single snapshot file for rewrites.
pub struct SnapshotWatcher {
    // Kept alive for the platform watch; events arrive via `rx`
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<SnapshotEvent>,
}

impl SnapshotWatcher {
    pub fn new(path: &Path) -> Result<Self, SnapshotWatchError> {
        let target = path.to_path_buf();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| SnapshotWatchError::NoParent {
                path: path.to_path_buf(),
            })?;

        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(
            move |result: Result<Event, notify::Error>| {
                let forwarded = match result {
                    Ok(event) => forward(&event, &target),
                    Err(e) => Some(SnapshotEvent::Error(e.to_string())),
                };
                if let Some(event) = forwarded {
                    // Receiver dropped means the consumer is gone; nothing to do
                    let _ = tx.send(event);
                }
            },
        )
        .map_err(|e| SnapshotWatchError::Watch {
            path: path.to_path_buf(),
            source: e,
        })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| SnapshotWatchError::Watch {
                path: dir.clone(),
                source: e,
            })?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Next relevant filesystem event; `None` if the watch thread is gone.
    pub async fn next_event(&mut self) -> Option<SnapshotEvent> {
        self.rx.recv().await
    }

    /// Discard queued events. Rewrites arrive as bursts (create + several
    /// modifies); after re-processing once, the rest of the burst is stale.
    pub fn drain_pending(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

/// Map a raw notify event onto a snapshot event, filtering out paths other
/// than the target. Comparison is by file name: rename-based writers emit
/// temp paths and absolute/relative forms that never compare equal whole.
fn forward(event: &Event, target: &Path) -> Option<SnapshotEvent> {
    let concerns_target = event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == target.file_name());
    if !concerns_target {
        return None;
    }

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => {
            Some(SnapshotEvent::Changed(target.to_path_buf()))
        }
        EventKind::Remove(_) => Some(SnapshotEvent::Removed(target.to_path_buf())),
        _ => None,
    }
}
