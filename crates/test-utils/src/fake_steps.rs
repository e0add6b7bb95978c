use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use buildwatch::config::ProjectConfig;
use buildwatch::errors::BuildwatchError;
use buildwatch::exec::{BuildSteps, StepFuture};
use buildwatch::types::BuildStep;

/// One observable call made by the pipeline into [`FakeSteps`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepCall {
    ReadConfig,
    StepStarted(BuildStep),
    StepFinished(BuildStep),
    WriteBundles,
}

/// A fake build backend that:
/// - records every call in order
/// - optionally delays, fails or panics chosen steps
/// - never spawns real processes.
pub struct FakeSteps {
    config: ProjectConfig,
    calls: Arc<Mutex<Vec<StepCall>>>,
    delays: HashMap<BuildStep, Duration>,
    failing: Mutex<HashSet<BuildStep>>,
    panicking: HashSet<BuildStep>,
    fail_config: bool,
    fail_bundle: bool,
}

impl FakeSteps {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            calls: Arc::new(Mutex::new(Vec::new())),
            delays: HashMap::new(),
            failing: Mutex::new(HashSet::new()),
            panicking: HashSet::new(),
            fail_config: false,
            fail_bundle: false,
        }
    }

    pub fn with_delay(mut self, step: BuildStep, delay: Duration) -> Self {
        self.delays.insert(step, delay);
        self
    }

    pub fn with_failing(self, step: BuildStep) -> Self {
        self.set_failing(step, true);
        self
    }

    pub fn with_panicking(mut self, step: BuildStep) -> Self {
        self.panicking.insert(step);
        self
    }

    pub fn with_failing_config(mut self) -> Self {
        self.fail_config = true;
        self
    }

    pub fn with_failing_bundle(mut self) -> Self {
        self.fail_bundle = true;
        self
    }

    /// Toggle failure of `step` while the fake is shared with a running
    /// pipeline.
    pub fn set_failing(&self, step: BuildStep, failing: bool) {
        let mut guard = self.failing.lock().unwrap();
        if failing {
            guard.insert(step);
        } else {
            guard.remove(&step);
        }
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<StepCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Steps started so far, in start order.
    pub fn started_steps(&self) -> Vec<BuildStep> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StepCall::StepStarted(step) => Some(step),
                _ => None,
            })
            .collect()
    }

    pub fn bundle_writes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == StepCall::WriteBundles)
            .count()
    }

    fn record(&self, call: StepCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl BuildSteps for FakeSteps {
    fn read_configuration(&self) -> StepFuture<'_, ProjectConfig> {
        Box::pin(async move {
            self.record(StepCall::ReadConfig);
            if self.fail_config {
                return Err(BuildwatchError::ConfigError(
                    "fake configuration failure".to_string(),
                ));
            }
            Ok(self.config.clone())
        })
    }

    fn run_step<'a>(&'a self, step: BuildStep, _config: &'a ProjectConfig) -> StepFuture<'a, ()> {
        Box::pin(async move {
            self.record(StepCall::StepStarted(step));

            if let Some(delay) = self.delays.get(&step) {
                tokio::time::sleep(*delay).await;
            }

            if self.panicking.contains(&step) {
                panic!("fake step {step} panicked");
            }

            self.record(StepCall::StepFinished(step));

            if self.failing.lock().unwrap().contains(&step) {
                return Err(BuildwatchError::StepFailed {
                    step,
                    reason: "fake failure".to_string(),
                });
            }
            Ok(())
        })
    }

    fn write_bundles<'a>(&'a self, _config: &'a ProjectConfig) -> StepFuture<'a, ()> {
        Box::pin(async move {
            self.record(StepCall::WriteBundles);
            if self.fail_bundle {
                return Err(BuildwatchError::BundleFailed("fake bundle failure".to_string()));
            }
            Ok(())
        })
    }
}
