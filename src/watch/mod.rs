// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling the transpiler / markup / css `source` globs.
//! - Selecting which steps a batch of changed paths affects.
//! - Wiring up a cross-platform filesystem watcher (`notify`) that forwards
//!   matching paths to the watch controller.
//!
//! It does **not** know about rebuild state; the controller in `engine`
//! decides when to rebuild.

pub mod path_utils;
pub mod patterns;
pub mod watcher;

pub use patterns::{compile_source_glob, select_tasks, SourcePatterns, PATTERN_STEPS};
pub use watcher::{changed_path, spawn_watcher, WatchOptions, WatcherHandle};
