// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::ControllerEvent;
use crate::errors::Result;
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::SourcePatterns;

/// Options for the change watcher.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Log every forwarded change at debug. The controller already logs
    /// queued paths at info.
    pub verbose: bool,
}

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes `root` recursively and sends one
/// `ControllerEvent::PathChanged` per changed path matching any of the
/// source patterns.
///
/// File contents are never read; only paths are forwarded.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    patterns: SourcePatterns,
    options: WatchOptions,
    controller_tx: mpsc::Sender<ControllerEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("buildwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("buildwatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(root = ?root, sources = ?patterns, "file watcher started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }
            debug!(?event, "received notify event");

            for path in event.paths {
                let Some(rel) = changed_path(&root, &path, &patterns) else {
                    continue;
                };

                if options.verbose {
                    debug!(path = %rel, "watcher: change detected");
                }

                if let Err(err) = controller_tx.send(ControllerEvent::PathChanged(rel)).await {
                    warn!("failed to send ControllerEvent::PathChanged: {err}");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Normalize a raw event path against `root` and keep it only if it matches
/// one of the source patterns.
pub fn changed_path(root: &Path, path: &Path, patterns: &SourcePatterns) -> Option<String> {
    let rel = match relative_str(root, path) {
        Some(s) => s,
        None => {
            debug!(?path, ?root, "ignoring event path outside watch root");
            return None;
        }
    };

    if patterns.is_watched(&rel) { Some(rel) } else { None }
}
