// src/engine/event_handlers.rs

//! Event handling logic for the controller core.

use tracing::{error, info};

use crate::engine::core::WatchControllerState;
use crate::engine::RebuildOutcome;
use crate::types::{BuildStep, TaskSet};
use crate::watch::patterns::{select_tasks, SourcePatterns};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// (Re)arm the debounce timer.
    ScheduleRefresh,
    /// Start a scoped rebuild of these steps. The shell must answer with
    /// exactly one `RebuildFinished`.
    StartRebuild(TaskSet),
}

/// Decision returned by the core after handling a single `ControllerEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Queue a changed path and ask for a (debounced) refresh.
///
/// Every notification is appended individually; debouncing only collapses
/// the refreshes, never the paths.
pub fn handle_path_changed(state: &mut WatchControllerState, path: String) -> CoreStep {
    info!("Watcher: adding path {path} to pending build changes");
    state.pending.push(path);
    CoreStep::running(vec![CoreCommand::ScheduleRefresh])
}

/// Debounce expired.
pub fn handle_refresh(state: &mut WatchControllerState, patterns: &SourcePatterns) -> CoreStep {
    CoreStep::running(refresh(state, patterns).into_iter().collect())
}

/// Completion callback of a rebuild.
///
/// Clears the in-progress flag regardless of outcome, then chains straight
/// into another refresh if changes arrived while the rebuild was running.
pub fn handle_rebuild_finished(
    state: &mut WatchControllerState,
    patterns: &SourcePatterns,
    outcome: RebuildOutcome,
) -> CoreStep {
    if let RebuildOutcome::Failed(reason) = &outcome {
        error!("Watcher: build failed: {reason}");
    }

    state.building = false;

    if state.pending.is_empty() {
        return CoreStep::running(Vec::new());
    }

    info!("Watcher: found more pending changes after finishing build, triggering next one");
    CoreStep::running(refresh(state, patterns).into_iter().collect())
}

/// Drain the pending set and decide whether to start a rebuild.
fn refresh(state: &mut WatchControllerState, patterns: &SourcePatterns) -> Option<CoreCommand> {
    if state.building {
        info!("Watcher: a build is already in progress, deferring change detection");
        return None;
    }

    let paths = std::mem::take(&mut state.pending);
    let tasks = select_tasks(patterns, paths.as_slice());

    for step in &tasks {
        match step {
            BuildStep::ProcessCss => info!("Watcher: adding CSS task to next build"),
            BuildStep::Transpile => info!("Watcher: adding transpile task to next build"),
            BuildStep::ProcessMarkup => info!("Watcher: adding markup task to next build"),
            BuildStep::CopyFiles => {}
        }
    }

    if tasks.is_empty() {
        info!(
            discarded = paths.len(),
            "Watcher: no relevant changes found, skipping next build"
        );
        return None;
    }

    state.building = true;
    Some(CoreCommand::StartRebuild(tasks))
}
