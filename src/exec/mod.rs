// src/exec/mod.rs

//! Step execution layer.
//!
//! - [`command`] runs a single shell command and reports its exit status.
//! - [`backend`] provides the `BuildSteps` trait the pipeline composes and
//!   the `CommandSteps` implementation used in production, which tests
//!   replace with a fake.

pub mod backend;
pub mod command;

pub use backend::{BuildSteps, CommandSteps, SharedSteps, StepFuture};
pub use command::{run_shell_command, CommandOutcome};
