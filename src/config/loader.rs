// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ProjectConfig, RawProjectConfig};
use crate::errors::Result;

/// Load a project file from a given path and return the raw `RawProjectConfig`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawProjectConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a project file from path and validate it.
///
/// This is the entry point used both at startup and by the
/// read-configuration stage of every build cycle.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let raw_config = load_from_path(&path)?;
    let config = ProjectConfig::try_from(raw_config)?;
    Ok(config)
}

/// Default project file: `Buildwatch.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Buildwatch.toml")
}
