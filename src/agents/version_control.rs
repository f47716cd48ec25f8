use crate::error::{Result, UpgradeError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Read-only Git checks run before the upgrade touches any file.
pub struct VersionControlAgent {
    project_path: PathBuf,
}

impl VersionControlAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Result<Self> {
        let project_path = Self::validate_git_path(project_path.as_ref())?;
        Ok(Self { project_path })
    }

    /// Whether the project lives inside a Git work tree.
    pub fn is_repository(&self) -> bool {
        self.run_git(&["rev-parse", "--is-inside-work-tree"])
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Check if the working directory is clean
    pub fn is_working_directory_clean(&self) -> Result<bool> {
        let output = self.run_git(&["status", "--porcelain"])?;
        Self::ensure_success(&output, "git status")?;
        Ok(output.stdout.is_empty())
    }

    fn run_git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .current_dir(&self.project_path)
            .args(args)
            .output()
            .map_err(|e| {
                UpgradeError::ProjectValidation(format!(
                    "Failed to execute git command '{}': {e}",
                    args.join(" ")
                ))
            })
    }

    fn ensure_success(output: &Output, command: &str) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        Err(UpgradeError::ProjectValidation(format!(
            "{} failed: {}",
            command,
            String::from_utf8_lossy(&output.stderr)
        )))
    }

    fn validate_git_path(path: &Path) -> Result<PathBuf> {
        if !path.is_absolute() {
            return Err(UpgradeError::ProjectValidation(
                "Only absolute paths are allowed for Git operations".to_string(),
            ));
        }

        if !path.is_dir() {
            return Err(UpgradeError::ProjectValidation(format!(
                "'{}' is not a directory",
                path.display()
            )));
        }

        Ok(path.to_path_buf())
    }
}
