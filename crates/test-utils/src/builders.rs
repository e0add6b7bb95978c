use buildwatch::config::{
    CommandStepConfig, ConfigSection, ProjectConfig, RawProjectConfig, SourceStepConfig,
};
use buildwatch::types::BuildStep;
use buildwatch::watch::SourcePatterns;

pub const TRANSPILER_SOURCE: &str = "src/**/*.ts";
pub const MARKUP_SOURCE: &str = "src/**/*.html";
pub const CSS_SOURCE: &str = "styles/**/*.css";

/// Builder for `ProjectConfig` to simplify test setup.
///
/// Defaults to `src/**/*.ts`, `src/**/*.html` and `styles/**/*.css` with no
/// commands configured.
pub struct ProjectConfigBuilder {
    config: RawProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawProjectConfig {
                config: ConfigSection::default(),
                transpiler: source_step(TRANSPILER_SOURCE),
                markup_processor: source_step(MARKUP_SOURCE),
                css_processor: source_step(CSS_SOURCE),
                copy_files: CommandStepConfig::default(),
                bundle: CommandStepConfig::default(),
            },
        }
    }

    pub fn transpiler_source(mut self, pattern: &str) -> Self {
        self.config.transpiler.source = pattern.to_string();
        self
    }

    pub fn markup_source(mut self, pattern: &str) -> Self {
        self.config.markup_processor.source = pattern.to_string();
        self
    }

    pub fn css_source(mut self, pattern: &str) -> Self {
        self.config.css_processor.source = pattern.to_string();
        self
    }

    pub fn step_cmd(mut self, step: BuildStep, cmd: &str) -> Self {
        let slot = match step {
            BuildStep::Transpile => &mut self.config.transpiler.cmd,
            BuildStep::ProcessMarkup => &mut self.config.markup_processor.cmd,
            BuildStep::ProcessCss => &mut self.config.css_processor.cmd,
            BuildStep::CopyFiles => &mut self.config.copy_files.cmd,
        };
        *slot = Some(cmd.to_string());
        self
    }

    pub fn debounce_ms(mut self, ms: u64) -> Self {
        self.config.config.debounce_ms = ms;
        self
    }

    pub fn build_raw(self) -> RawProjectConfig {
        self.config
    }

    pub fn build(self) -> ProjectConfig {
        ProjectConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ProjectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn source_step(pattern: &str) -> SourceStepConfig {
    SourceStepConfig {
        source: pattern.to_string(),
        cmd: None,
    }
}

/// Patterns matching the builder defaults.
pub fn default_patterns() -> SourcePatterns {
    SourcePatterns::new(TRANSPILER_SOURCE, MARKUP_SOURCE, CSS_SOURCE)
        .expect("default test patterns must compile")
}
