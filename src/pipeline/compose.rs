// src/pipeline/compose.rs

//! Series / parallel composition of build steps.
//!
//! A pipeline run is the series
//!
//! ```text
//! read_configuration -> parallel(plan steps) -> write_bundles
//! ```
//!
//! Series is plain `?` sequencing: a failing stage returns early, so later
//! stages never start. Parallel spawns every step onto a `JoinSet` and only
//! returns once all of them have finished.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::{self, JoinSet};
use tracing::{debug, error, info};

use crate::config::ProjectConfig;
use crate::errors::{BuildwatchError, Result};
use crate::exec::SharedSteps;
use crate::pipeline::plan::BuildPlan;
use crate::types::BuildStep;

/// Run the full one-shot build.
pub async fn run_build(steps: SharedSteps) -> Result<()> {
    run_plan(steps, &BuildPlan::full()).await
}

/// Run one pipeline cycle for `plan`.
///
/// Bundles are written only if the configuration was read and every step in
/// the plan succeeded; otherwise the first failure is returned.
pub async fn run_plan(steps: SharedSteps, plan: &BuildPlan) -> Result<()> {
    info!(steps = %plan, "starting build");

    let config = Arc::new(steps.read_configuration().await?);

    parallel(Arc::clone(&steps), Arc::clone(&config), plan).await?;

    steps.write_bundles(&config).await?;

    info!(steps = %plan, "build finished");
    Ok(())
}

/// Run all steps of `plan` concurrently and wait for every one of them.
///
/// Siblings of a failed step are not cancelled. The error returned is the
/// first failure in completion order; a panicking step counts as a failure
/// of that step.
pub async fn parallel(
    steps: SharedSteps,
    config: Arc<ProjectConfig>,
    plan: &BuildPlan,
) -> Result<()> {
    let mut set = JoinSet::new();
    let mut spawned: HashMap<task::Id, BuildStep> = HashMap::new();

    for step in plan.steps() {
        let steps = Arc::clone(&steps);
        let config = Arc::clone(&config);
        let handle = set.spawn(async move { steps.run_step(step, &config).await });
        spawned.insert(handle.id(), step);
    }

    let mut first_failure: Option<BuildwatchError> = None;
    let mut failed: Vec<BuildStep> = Vec::new();

    while let Some(joined) = set.join_next_with_id().await {
        let (id, result) = match joined {
            Ok((id, result)) => (id, Ok(result)),
            Err(join_err) => (join_err.id(), Err(join_err)),
        };
        let Some(step) = spawned.remove(&id) else {
            continue;
        };

        let result = result.map_err(|join_err| BuildwatchError::StepFailed {
            step,
            reason: format!("step task did not complete: {join_err}"),
        });

        match result {
            Ok(Ok(())) => debug!(step = %step, "step finished"),
            Ok(Err(err)) | Err(err) => {
                error!(step = %step, error = %err, "step failed");
                failed.push(step);
                first_failure.get_or_insert(err);
            }
        }
    }

    match first_failure {
        Some(err) => {
            debug!(?failed, "parallel group failed; skipping later stages");
            Err(err)
        }
        None => Ok(()),
    }
}
