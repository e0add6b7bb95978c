// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::BuildStep;

#[derive(Error, Debug)]
pub enum BuildwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid glob pattern '{pattern}': {source}")]
    PatternError {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("File watch error: {0}")]
    WatchError(#[from] notify::Error),

    #[error("Build step '{step}' failed: {reason}")]
    StepFailed { step: BuildStep, reason: String },

    #[error("Writing bundles failed: {0}")]
    BundleFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuildwatchError>;
