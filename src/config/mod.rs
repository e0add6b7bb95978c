// src/config/mod.rs

//! Project configuration loading and validation.
//!
//! - `model.rs`: TOML-backed data model.
//! - `loader.rs`: reading a project file from disk.
//! - `validate.rs`: source globs, commands and `[config]` sanity.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    CommandStepConfig, ConfigSection, ProjectConfig, RawProjectConfig, SourceStepConfig,
};
