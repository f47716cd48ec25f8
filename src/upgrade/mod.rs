pub mod executor;
pub mod planner;
pub mod report;
pub mod resolver;

#[cfg(test)]
pub mod testing;

pub use executor::{Collaborators, UpgradeExecutor, UpgradeOptions};
pub use report::{StepOutcome, UpgradeOutcome, UpgradeReport};
pub use resolver::VersionResolver;

/// Package whose installed version drives the upgrade.
pub const FRAMEWORK_PACKAGE: &str = "next";
