use crate::upgrade::resolver::ResolvedPackage;
use semver::Version;

/// Result of one step that is allowed to fail without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed(String),
}

impl StepOutcome {
    pub fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => StepOutcome::Succeeded,
            Err(e) => StepOutcome::Failed(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodemodOutcome {
    pub id: String,
    pub outcome: StepOutcome,
}

/// A package whose declared version was rewritten in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedPackage {
    pub package: ResolvedPackage,
    pub previous: Option<String>,
}

/// Tracks everything a completed upgrade did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeReport {
    pub installed: Version,
    pub target: Version,
    pub pinned: Vec<PinnedPackage>,
    pub turbopack_enabled: bool,
    pub install: StepOutcome,
    pub codemods: Vec<CodemodOutcome>,
    pub recipes: Vec<CodemodOutcome>,
}

impl UpgradeReport {
    pub fn failed_codemods(&self) -> impl Iterator<Item = &CodemodOutcome> {
        self.codemods
            .iter()
            .chain(self.recipes.iter())
            .filter(|c| !c.outcome.is_success())
    }

    /// True when installation and every transform succeeded.
    pub fn is_clean(&self) -> bool {
        self.install.is_success() && self.failed_codemods().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    AlreadyCurrent { installed: Version, target: Version },
    Completed(UpgradeReport),
}
