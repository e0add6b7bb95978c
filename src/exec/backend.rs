// src/exec/backend.rs

//! Pluggable build-step backend.
//!
//! The pipeline talks to a `BuildSteps` implementation instead of spawning
//! processes itself. This keeps the series/parallel composition testable
//! with a fake backend while the production backend lives here.
//!
//! - `CommandSteps` is the default implementation used by `buildwatch`.
//!   It re-reads the project file for every build and runs the configured
//!   shell command for each step.
//! - Tests provide their own `BuildSteps` that records calls and can fail
//!   or delay chosen steps.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{load_and_validate, ProjectConfig};
use crate::errors::{BuildwatchError, Result};
use crate::exec::command::run_shell_command;
use crate::types::BuildStep;

/// Boxed future returned by [`BuildSteps`] methods.
pub type StepFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Shared handle to a backend, cloned into every concurrently running step.
pub type SharedSteps = Arc<dyn BuildSteps>;

/// The external collaborators the pipeline composes.
pub trait BuildSteps: Send + Sync {
    /// Read (and validate) the project configuration for this build cycle.
    fn read_configuration(&self) -> StepFuture<'_, ProjectConfig>;

    /// Run a single build step using the configuration read for this cycle.
    fn run_step<'a>(&'a self, step: BuildStep, config: &'a ProjectConfig) -> StepFuture<'a, ()>;

    /// Write bundles once every step of the cycle succeeded.
    fn write_bundles<'a>(&'a self, config: &'a ProjectConfig) -> StepFuture<'a, ()>;
}

/// Production backend: each step is the shell command from the project file.
#[derive(Debug, Clone)]
pub struct CommandSteps {
    config_path: PathBuf,
    root: PathBuf,
}

impl CommandSteps {
    /// `config_path` is re-read on every cycle; commands run in `root`.
    pub fn new(config_path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            root: root.into(),
        }
    }
}

impl BuildSteps for CommandSteps {
    fn read_configuration(&self) -> StepFuture<'_, ProjectConfig> {
        Box::pin(async move {
            debug!(path = ?self.config_path, "reading project configuration");
            load_and_validate(&self.config_path)
        })
    }

    fn run_step<'a>(&'a self, step: BuildStep, config: &'a ProjectConfig) -> StepFuture<'a, ()> {
        Box::pin(async move {
            let Some(cmd) = config.command_for(step) else {
                debug!(step = %step, "no command configured; nothing to do");
                return Ok(());
            };

            let outcome = run_shell_command(step.as_str(), cmd, &self.root)
                .await
                .map_err(|err| BuildwatchError::StepFailed {
                    step,
                    reason: format!("{err:#}"),
                })?;

            if outcome.success {
                Ok(())
            } else {
                Err(BuildwatchError::StepFailed {
                    step,
                    reason: format!("command exited with code {}", outcome.code),
                })
            }
        })
    }

    fn write_bundles<'a>(&'a self, config: &'a ProjectConfig) -> StepFuture<'a, ()> {
        Box::pin(async move {
            let Some(cmd) = config.bundle().cmd.as_deref() else {
                debug!("no bundle command configured; nothing to write");
                return Ok(());
            };

            info!("writing bundles");
            let outcome = run_shell_command("bundle", cmd, &self.root)
                .await
                .map_err(|err| BuildwatchError::BundleFailed(format!("{err:#}")))?;

            if outcome.success {
                Ok(())
            } else {
                Err(BuildwatchError::BundleFailed(format!(
                    "command exited with code {}",
                    outcome.code
                )))
            }
        })
    }
}
