// src/pipeline/mod.rs

//! Build pipeline: configuration read, the build steps in parallel, then
//! bundle write.

pub mod compose;
pub mod plan;

pub use compose::{parallel, run_build, run_plan};
pub use plan::BuildPlan;
