// src/engine/mod.rs

//! Watch-mode controller.
//!
//! This module ties together:
//! - the pending change set and the build-in-progress flag
//! - the debounce timer that collapses bursts of changes into one refresh
//! - the event loop that reacts to:
//!   - file-watch changes
//!   - debounce expiry
//!   - rebuild completion
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

/// Result of a watch-triggered rebuild, reported back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
    Success,
    Failed(String),
}

/// Events flowing into the controller from the watcher, timers and rebuilds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// A watched file changed. The path is relative to the watch root.
    PathChanged(String),
    /// The debounce window elapsed without further changes.
    RefreshFired,
    /// A rebuild started by the controller finished.
    RebuildFinished { outcome: RebuildOutcome },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod debounce;
pub mod event_handlers;
pub mod runtime;

pub use core::{WatchController, WatchControllerState};
pub use debounce::Debouncer;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
