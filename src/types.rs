use std::collections::BTreeSet;
use std::fmt;

/// One of the four build steps that run between configuration read and
/// bundle write.
///
/// Declaration order is the order steps are listed in logs and dry-run
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildStep {
    Transpile,
    ProcessMarkup,
    ProcessCss,
    CopyFiles,
}

impl BuildStep {
    /// All steps, in pipeline order.
    pub const ALL: [BuildStep; 4] = [
        BuildStep::Transpile,
        BuildStep::ProcessMarkup,
        BuildStep::ProcessCss,
        BuildStep::CopyFiles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildStep::Transpile => "transpile",
            BuildStep::ProcessMarkup => "process-markup",
            BuildStep::ProcessCss => "process-css",
            BuildStep::CopyFiles => "copy-files",
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of steps selected for one rebuild.
pub type TaskSet = BTreeSet<BuildStep>;
