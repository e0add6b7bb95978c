// tests/selection_property.rs

use proptest::prelude::*;

use buildwatch::types::{BuildStep, TaskSet};
use buildwatch::watch::select_tasks;
use buildwatch_test_utils::builders::default_patterns;

/// A changed path from a small vocabulary: hits for every default pattern,
/// misses, and top-level files that `**` must not reach.
#[derive(Debug, Clone)]
struct ChangedPath {
    dir: &'static str,
    name: &'static str,
    ext: &'static str,
}

impl ChangedPath {
    fn path(&self) -> String {
        if self.dir.is_empty() {
            format!("{}.{}", self.name, self.ext)
        } else {
            format!("{}/{}.{}", self.dir, self.name, self.ext)
        }
    }

    /// The step this path feeds, worked out from the directory and the
    /// extension alone.
    fn expected_step(&self) -> Option<BuildStep> {
        let under = |root: &str| self.dir == root || self.dir.starts_with(&format!("{root}/"));
        match self.ext {
            "ts" if under("src") => Some(BuildStep::Transpile),
            "html" if under("src") => Some(BuildStep::ProcessMarkup),
            "css" if under("styles") => Some(BuildStep::ProcessCss),
            _ => None,
        }
    }
}

fn changed_path() -> impl Strategy<Value = ChangedPath> {
    let dirs = prop::sample::select(vec!["src", "src/app", "styles", "styles/vendor", "assets", ""]);
    let names = prop::sample::select(vec!["main", "index", "site"]);
    let exts = prop::sample::select(vec!["ts", "html", "css", "png", "json"]);

    (dirs, names, exts).prop_map(|(dir, name, ext)| ChangedPath { dir, name, ext })
}

proptest! {
    #[test]
    fn selected_steps_follow_directory_and_extension(
        changes in proptest::collection::vec(changed_path(), 0..12)
    ) {
        let paths: Vec<String> = changes.iter().map(ChangedPath::path).collect();
        let expected: TaskSet = changes.iter().filter_map(ChangedPath::expected_step).collect();

        prop_assert_eq!(select_tasks(&default_patterns(), paths.as_slice()), expected);
    }

    #[test]
    fn selection_ignores_order_and_duplicates(
        changes in proptest::collection::vec(changed_path(), 1..8)
    ) {
        let patterns = default_patterns();
        let paths: Vec<String> = changes.iter().map(ChangedPath::path).collect();

        let mut shuffled: Vec<String> = paths.iter().rev().cloned().collect();
        shuffled.extend(paths.iter().cloned());

        prop_assert_eq!(
            select_tasks(&patterns, paths.as_slice()),
            select_tasks(&patterns, shuffled.as_slice())
        );
    }
}
