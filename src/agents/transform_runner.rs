use crate::agents::command_runner::run_command;
use crate::error::{Result, UpgradeError};
use crate::npm::PackageManager;
use std::fmt;
use std::path::Path;

const CODEMOD_PACKAGE: &str = "@next/codemod@latest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformOptions {
    pub force: bool,
    pub verbose: bool,
}

/// Migrations published outside the framework codemod package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpRecipe {
    React19Migration,
    React19Types,
}

impl FollowUpRecipe {
    fn command(self) -> &'static [&'static str] {
        match self {
            FollowUpRecipe::React19Migration => &[
                "codemod@latest",
                "react/19/migration-recipe",
                "--no-interactive",
            ],
            FollowUpRecipe::React19Types => &["types-react-codemod@latest", "--yes", "preset-19", "."],
        }
    }
}

impl fmt::Display for FollowUpRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FollowUpRecipe::React19Migration => "react-19-migration-recipe",
            FollowUpRecipe::React19Types => "react-19-types-preset",
        };
        f.write_str(label)
    }
}

/// Applies codemods to a directory. Each transform is expected to be idempotent.
pub trait TransformRunner {
    fn run_transform(&self, codemod_id: &str, target_dir: &Path, options: TransformOptions)
    -> Result<()>;

    fn run_recipe(&self, recipe: FollowUpRecipe, target_dir: &Path) -> Result<()>;
}

/// Runs transforms through the package manager's one-off executor (`npx`, `pnpm dlx`, ...).
pub struct ExecTransformRunner {
    package_manager: PackageManager,
    verbose: bool,
}

impl ExecTransformRunner {
    pub fn new(package_manager: PackageManager, verbose: bool) -> Self {
        Self {
            package_manager,
            verbose,
        }
    }

    fn exec_args(&self, tail: impl IntoIterator<Item = String>) -> (&'static str, Vec<String>) {
        let (program, prefix) = self.package_manager.exec_command();
        let args = prefix
            .iter()
            .map(|arg| (*arg).to_string())
            .chain(tail)
            .collect();
        (program, args)
    }

    fn transform_args(
        &self,
        codemod_id: &str,
        target_dir: &Path,
        options: TransformOptions,
    ) -> (&'static str, Vec<String>) {
        let mut tail = vec![
            CODEMOD_PACKAGE.to_string(),
            codemod_id.to_string(),
            target_dir.display().to_string(),
        ];
        if options.force {
            tail.push("--force".to_string());
        }
        if options.verbose {
            tail.push("--verbose".to_string());
        }
        self.exec_args(tail)
    }
}

impl TransformRunner for ExecTransformRunner {
    fn run_transform(
        &self,
        codemod_id: &str,
        target_dir: &Path,
        options: TransformOptions,
    ) -> Result<()> {
        let (program, args) = self.transform_args(codemod_id, target_dir, options);
        run_command(program, &args, target_dir, false).map_err(|reason| {
            UpgradeError::CodemodFailed {
                id: codemod_id.to_string(),
                reason,
            }
        })
    }

    fn run_recipe(&self, recipe: FollowUpRecipe, target_dir: &Path) -> Result<()> {
        let (program, args) = self.exec_args(recipe.command().iter().map(|s| (*s).to_string()));
        run_command(program, &args, target_dir, !self.verbose).map_err(|reason| {
            UpgradeError::CodemodFailed {
                id: recipe.to_string(),
                reason,
            }
        })
    }
}
