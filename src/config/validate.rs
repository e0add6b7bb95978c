// src/config/validate.rs

use crate::config::model::{ProjectConfig, RawProjectConfig};
use crate::errors::{BuildwatchError, Result};
use crate::watch::patterns::compile_source_glob;

impl TryFrom<RawProjectConfig> for ProjectConfig {
    type Error = crate::errors::BuildwatchError;

    fn try_from(raw: RawProjectConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ProjectConfig::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawProjectConfig) -> Result<()> {
    validate_global_config(cfg)?;
    validate_sources(cfg)?;
    validate_commands(cfg)?;
    Ok(())
}

fn validate_global_config(cfg: &RawProjectConfig) -> Result<()> {
    if cfg.config.debounce_ms == 0 {
        return Err(BuildwatchError::ConfigError(
            "[config].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_sources(cfg: &RawProjectConfig) -> Result<()> {
    let sections = [
        ("transpiler", &cfg.transpiler.source),
        ("markup_processor", &cfg.markup_processor.source),
        ("css_processor", &cfg.css_processor.source),
    ];

    for (section, source) in sections {
        if source.trim().is_empty() {
            return Err(BuildwatchError::ConfigError(format!(
                "[{section}].source must not be empty"
            )));
        }
        compile_source_glob(source)?;
    }
    Ok(())
}

fn validate_commands(cfg: &RawProjectConfig) -> Result<()> {
    let sections = [
        ("transpiler", cfg.transpiler.cmd.as_deref()),
        ("markup_processor", cfg.markup_processor.cmd.as_deref()),
        ("css_processor", cfg.css_processor.cmd.as_deref()),
        ("copy_files", cfg.copy_files.cmd.as_deref()),
        ("bundle", cfg.bundle.cmd.as_deref()),
    ];

    for (section, cmd) in sections {
        if let Some(cmd) = cmd {
            if cmd.trim().is_empty() {
                return Err(BuildwatchError::ConfigError(format!(
                    "[{section}].cmd must not be blank (omit it to skip the step)"
                )));
            }
        }
    }
    Ok(())
}
