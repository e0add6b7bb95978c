// src/engine/core.rs

//! Pure core of the watch controller.
//!
//! [`WatchController::step`] consumes one [`ControllerEvent`] and returns the
//! commands the IO shell (`engine::runtime::Runtime`) should execute. The
//! core has no channels, no timers and performs no IO, so every transition
//! is unit-testable.
//!
//! States: `IDLE` (`building == false`) and `BUILDING` (`building == true`).

use crate::engine::event_handlers::{
    handle_path_changed, handle_rebuild_finished, handle_refresh, CoreStep,
};
use crate::engine::ControllerEvent;
use crate::watch::patterns::SourcePatterns;

/// State owned by the controller: the pending change set and the
/// build-in-progress flag.
#[derive(Debug, Default)]
pub struct WatchControllerState {
    /// Relative paths seen since the last refresh, in arrival order.
    pub(crate) pending: Vec<String>,
    /// True while a watch-triggered rebuild is running.
    pub(crate) building: bool,
}

impl WatchControllerState {
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn is_building(&self) -> bool {
        self.building
    }
}

#[derive(Debug)]
pub struct WatchController {
    state: WatchControllerState,
    patterns: SourcePatterns,
}

impl WatchController {
    /// New controller in `IDLE` with an empty pending set.
    pub fn new(patterns: SourcePatterns) -> Self {
        Self {
            state: WatchControllerState::default(),
            patterns,
        }
    }

    pub fn state(&self) -> &WatchControllerState {
        &self.state
    }

    pub fn is_building(&self) -> bool {
        self.state.building
    }

    /// Handle a single event, updating state and returning the resulting
    /// commands for the IO shell.
    pub fn step(&mut self, event: ControllerEvent) -> CoreStep {
        match event {
            ControllerEvent::PathChanged(path) => handle_path_changed(&mut self.state, path),
            ControllerEvent::RefreshFired => handle_refresh(&mut self.state, &self.patterns),
            ControllerEvent::RebuildFinished { outcome } => {
                handle_rebuild_finished(&mut self.state, &self.patterns, outcome)
            }
            ControllerEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}
