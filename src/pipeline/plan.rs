// src/pipeline/plan.rs

use std::fmt;

use crate::types::{BuildStep, TaskSet};

/// Steps one pipeline run executes between configuration read and bundle
/// write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    steps: TaskSet,
}

impl BuildPlan {
    /// The one-shot build: all four steps.
    pub fn full() -> Self {
        Self {
            steps: BuildStep::ALL.into_iter().collect(),
        }
    }

    /// A watch-triggered rebuild limited to `steps`.
    pub fn scoped(steps: TaskSet) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> impl Iterator<Item = BuildStep> + '_ {
        self.steps.iter().copied()
    }

    pub fn contains(&self, step: BuildStep) -> bool {
        self.steps.contains(&step)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl fmt::Display for BuildPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.steps().map(BuildStep::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
