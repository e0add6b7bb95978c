// src/config/model.rs

use serde::Deserialize;

use crate::types::BuildStep;

/// Project file as deserialized from TOML, before validation.
///
/// ```toml
/// [config]
/// debounce_ms = 100
///
/// [transpiler]
/// source = "src/**/*.ts"
/// cmd = "npx tsc -p ."
///
/// [markup_processor]
/// source = "src/**/*.html"
///
/// [css_processor]
/// source = "src/**/*.css"
/// cmd = "npx postcss src -d dist"
///
/// [copy_files]
/// cmd = "cp -r assets dist/"
///
/// [bundle]
/// cmd = "node tools/bundle.js"
/// ```
///
/// The three processor sections are required because their `source` globs
/// drive watch-mode task selection. `copy_files` and `bundle` may be omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectConfig {
    /// Behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    pub transpiler: SourceStepConfig,

    pub markup_processor: SourceStepConfig,

    pub css_processor: SourceStepConfig,

    #[serde(default)]
    pub copy_files: CommandStepConfig,

    /// Command run by the bundle-write stage after all steps succeed.
    #[serde(default)]
    pub bundle: CommandStepConfig,
}

/// Validated project configuration.
///
/// Only obtainable via `TryFrom<RawProjectConfig>` (see `validate.rs`), so
/// holders can rely on non-empty, compilable sources and non-blank commands.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    config: ConfigSection,
    transpiler: SourceStepConfig,
    markup_processor: SourceStepConfig,
    css_processor: SourceStepConfig,
    copy_files: CommandStepConfig,
    bundle: CommandStepConfig,
}

impl ProjectConfig {
    pub(crate) fn new_unchecked(raw: RawProjectConfig) -> Self {
        Self {
            config: raw.config,
            transpiler: raw.transpiler,
            markup_processor: raw.markup_processor,
            css_processor: raw.css_processor,
            copy_files: raw.copy_files,
            bundle: raw.bundle,
        }
    }

    pub fn config(&self) -> &ConfigSection {
        &self.config
    }

    pub fn transpiler(&self) -> &SourceStepConfig {
        &self.transpiler
    }

    pub fn markup_processor(&self) -> &SourceStepConfig {
        &self.markup_processor
    }

    pub fn css_processor(&self) -> &SourceStepConfig {
        &self.css_processor
    }

    pub fn copy_files(&self) -> &CommandStepConfig {
        &self.copy_files
    }

    pub fn bundle(&self) -> &CommandStepConfig {
        &self.bundle
    }

    /// Source glob for a pattern-bearing step; `None` for copy-files.
    pub fn source_for(&self, step: BuildStep) -> Option<&str> {
        match step {
            BuildStep::Transpile => Some(&self.transpiler.source),
            BuildStep::ProcessMarkup => Some(&self.markup_processor.source),
            BuildStep::ProcessCss => Some(&self.css_processor.source),
            BuildStep::CopyFiles => None,
        }
    }

    /// Configured shell command for a step, if any.
    pub fn command_for(&self, step: BuildStep) -> Option<&str> {
        match step {
            BuildStep::Transpile => self.transpiler.cmd.as_deref(),
            BuildStep::ProcessMarkup => self.markup_processor.cmd.as_deref(),
            BuildStep::ProcessCss => self.css_processor.cmd.as_deref(),
            BuildStep::CopyFiles => self.copy_files.cmd.as_deref(),
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Debounce window for watch-mode refreshes, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Have the watcher log every forwarded change at debug level.
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_verbose() -> bool {
    true
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            verbose: default_verbose(),
        }
    }
}

/// A processor section with a watched `source` glob.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceStepConfig {
    /// Glob (relative to the project root) of the files this step consumes.
    pub source: String,

    /// Shell command that performs the step. A missing command makes the
    /// step a successful no-op.
    #[serde(default)]
    pub cmd: Option<String>,
}

/// A section that only carries a command.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CommandStepConfig {
    #[serde(default)]
    pub cmd: Option<String>,
}
