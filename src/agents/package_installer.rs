use crate::agents::command_runner::run_command;
use crate::error::{Result, UpgradeError};
use crate::npm::PackageManager;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstallOptions {
    pub dev: bool,
    pub silent: bool,
}

/// Installs `name@version` specs into the project.
pub trait PackageInstaller {
    fn install(&self, packages: &[String], options: InstallOptions) -> Result<()>;
}

/// Shells out to the project's package manager.
pub struct CommandInstaller {
    package_manager: PackageManager,
    project_path: PathBuf,
}

impl CommandInstaller {
    pub fn new<P: AsRef<Path>>(package_manager: PackageManager, project_path: P) -> Self {
        Self {
            package_manager,
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    fn command_args(&self, packages: &[String], options: InstallOptions) -> Vec<String> {
        self.package_manager
            .install_args(options.dev, options.silent)
            .into_iter()
            .map(str::to_string)
            .chain(packages.iter().cloned())
            .collect()
    }
}

impl PackageInstaller for CommandInstaller {
    fn install(&self, packages: &[String], options: InstallOptions) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }

        let args = self.command_args(packages, options);
        run_command(
            self.package_manager.program(),
            &args,
            &self.project_path,
            options.silent,
        )
        .map_err(UpgradeError::InstallFailed)
    }
}
