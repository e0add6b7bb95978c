// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::exec::SharedSteps;
use crate::pipeline::{run_plan, BuildPlan};
use crate::types::TaskSet;

use super::core::WatchController;
use super::debounce::Debouncer;
use super::{ControllerEvent, CoreCommand, RebuildOutcome};

/// Drives the [`WatchController`] in response to `ControllerEvent`s and
/// delegates rebuilds to the pipeline.
///
/// This is a pure IO shell: all decisions are made by the core. The shell
/// owns the debounce timer, reads events from the channel, and spawns
/// rebuilds whose completion is fed back through the same channel.
pub struct Runtime {
    controller: WatchController,
    event_rx: mpsc::Receiver<ControllerEvent>,
    event_tx: mpsc::Sender<ControllerEvent>,
    steps: SharedSteps,
    debouncer: Debouncer,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("controller", &self.controller)
            .field("debouncer", &self.debouncer)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// `event_tx` must feed `event_rx`; the runtime uses it to report rebuild
    /// completion to itself.
    pub fn new(
        controller: WatchController,
        event_rx: mpsc::Receiver<ControllerEvent>,
        event_tx: mpsc::Sender<ControllerEvent>,
        steps: SharedSteps,
        debounce: Duration,
    ) -> Self {
        Self {
            controller,
            event_rx,
            event_tx,
            steps,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Main event loop.
    ///
    /// - Waits for the next `ControllerEvent` or the debounce deadline.
    /// - Feeds it into the core.
    /// - Executes the commands returned by the core.
    pub async fn run(mut self) -> Result<()> {
        info!(debounce = ?self.debouncer.wait(), "watch controller started");

        loop {
            let event = tokio::select! {
                maybe = self.event_rx.recv() => match maybe {
                    Some(e) => e,
                    None => {
                        info!("controller event channel closed; exiting");
                        break;
                    }
                },
                _ = self.debouncer.expired(), if self.debouncer.is_armed() => {
                    self.debouncer.disarm();
                    ControllerEvent::RefreshFired
                }
            };

            debug!(?event, "controller received event");

            let step = self.controller.step(event);

            for command in step.commands {
                self.execute_command(command);
            }

            if !step.keep_running {
                info!("shutdown requested; stopping watch controller");
                break;
            }
        }

        info!("watch controller exiting");
        Ok(())
    }

    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::ScheduleRefresh => self.debouncer.poke(),
            CoreCommand::StartRebuild(tasks) => self.spawn_rebuild(tasks),
        }
    }

    /// Run a scoped rebuild in the background and always report back with
    /// `RebuildFinished`, even if the pipeline errors or panics.
    fn spawn_rebuild(&self, tasks: TaskSet) {
        let plan = BuildPlan::scoped(tasks);
        let steps = Arc::clone(&self.steps);
        let tx = self.event_tx.clone();

        info!(steps = %plan, "Watcher: starting rebuild");

        tokio::spawn(async move {
            let build = tokio::spawn(async move { run_plan(steps, &plan).await });

            let outcome = match build.await {
                Ok(Ok(())) => RebuildOutcome::Success,
                Ok(Err(err)) => RebuildOutcome::Failed(err.to_string()),
                Err(join_err) => RebuildOutcome::Failed(format!("rebuild task aborted: {join_err}")),
            };

            if let Err(err) = tx.send(ControllerEvent::RebuildFinished { outcome }).await {
                warn!("failed to report rebuild completion: {err}");
            }
        });
    }
}
