// src/watch/patterns.rs

use std::fmt;

use globset::{GlobBuilder, GlobMatcher};

use crate::config::ProjectConfig;
use crate::errors::{BuildwatchError, Result};
use crate::types::{BuildStep, TaskSet};

/// Steps whose selection is driven by a `source` glob. Copy-files has no
/// pattern and is never selected by a watch refresh.
pub const PATTERN_STEPS: [BuildStep; 3] = [
    BuildStep::Transpile,
    BuildStep::ProcessMarkup,
    BuildStep::ProcessCss,
];

/// Compile a single `source` glob.
///
/// `*` and `?` never match `/`, so `src/*.ts` does not reach into
/// subdirectories while `src/**/*.ts` does.
pub fn compile_source_glob(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| BuildwatchError::PatternError {
            pattern: pattern.to_string(),
            source,
        })?;
    Ok(glob.compile_matcher())
}

/// Compiled `source` globs of the three processor sections.
///
/// Paths passed to [`SourcePatterns::matches`] and [`select_tasks`] are
/// relative to the project root with forward slashes, e.g. `"src/app.ts"`.
///
/// Wildcards skip dot-prefixed segments: `src/**/*.ts` does not match
/// `src/.cache/x.ts` or `src/.eslintrc.ts`. A glob that itself names a
/// dot-prefixed segment (`src/.well-known/*.html`) matches them.
#[derive(Clone)]
pub struct SourcePatterns {
    globs: Vec<SourceGlob>,
}

#[derive(Clone)]
struct SourceGlob {
    step: BuildStep,
    pattern: String,
    matcher: GlobMatcher,
    allows_dot: bool,
}

impl SourceGlob {
    fn is_match(&self, rel_path: &str) -> bool {
        (self.allows_dot || !has_dot_segment(rel_path)) && self.matcher.is_match(rel_path)
    }
}

fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment.starts_with('.'))
}

impl fmt::Debug for SourcePatterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_map();
        for glob in &self.globs {
            dbg.entry(&glob.step, &glob.pattern);
        }
        dbg.finish()
    }
}

impl SourcePatterns {
    pub fn new(transpiler: &str, markup: &str, css: &str) -> Result<Self> {
        let sources = [
            (BuildStep::Transpile, transpiler),
            (BuildStep::ProcessMarkup, markup),
            (BuildStep::ProcessCss, css),
        ];

        let globs = sources
            .into_iter()
            .map(|(step, pattern)| {
                Ok(SourceGlob {
                    step,
                    pattern: pattern.to_string(),
                    matcher: compile_source_glob(pattern)?,
                    allows_dot: has_dot_segment(pattern),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { globs })
    }

    pub fn from_config(cfg: &ProjectConfig) -> Result<Self> {
        Self::new(
            &cfg.transpiler().source,
            &cfg.markup_processor().source,
            &cfg.css_processor().source,
        )
    }

    /// Does `rel_path` match the source glob of `step`?
    ///
    /// Always false for copy-files.
    pub fn matches(&self, step: BuildStep, rel_path: &str) -> bool {
        self.globs
            .iter()
            .find(|g| g.step == step)
            .is_some_and(|g| g.is_match(rel_path))
    }

    /// Does `rel_path` match any of the three source globs?
    pub fn is_watched(&self, rel_path: &str) -> bool {
        self.globs.iter().any(|g| g.is_match(rel_path))
    }

    /// Raw glob strings, in step order.
    pub fn sources(&self) -> impl Iterator<Item = (BuildStep, &str)> {
        self.globs.iter().map(|g| (g.step, g.pattern.as_str()))
    }
}

/// Select the steps to rebuild for a batch of changed paths.
///
/// A step is selected iff at least one path matches its source glob.
pub fn select_tasks<S: AsRef<str>>(patterns: &SourcePatterns, paths: &[S]) -> TaskSet {
    PATTERN_STEPS
        .into_iter()
        .filter(|step| {
            paths
                .iter()
                .any(|p| patterns.matches(*step, p.as_ref()))
        })
        .collect()
}
