use crate::error::{Result, UpgradeError};
use semver::Version;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const FORBIDDEN: &[&str] = &["/etc", "/sys", "/proc", "/dev", "/boot"];

/// ProjectScannerAgent validates the project structure
pub struct ProjectScannerAgent {
    project_path: PathBuf,
}

impl ProjectScannerAgent {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    /// Validates the project structure
    pub fn validate(&self) -> Result<ProjectInfo> {
        let project_path = self.canonical_project_path()?;

        let manifest_path = project_path.join("package.json");
        if !manifest_path.is_file() {
            return Err(UpgradeError::ProjectValidation(format!(
                "package.json not found in '{}'",
                project_path.display()
            )));
        }

        Ok(ProjectInfo {
            manifest_path,
            project_path,
        })
    }

    fn canonical_project_path(&self) -> Result<PathBuf> {
        let canonical = self.project_path.canonicalize().map_err(|e| {
            UpgradeError::ProjectValidation(format!(
                "Invalid path '{}': {e}",
                self.project_path.display()
            ))
        })?;

        if !canonical.is_dir() {
            return Err(UpgradeError::ProjectValidation(format!(
                "Path '{}' is not a directory",
                canonical.display()
            )));
        }

        if let Some(forbidden) = FORBIDDEN.iter().find(|dir| canonical.starts_with(dir)) {
            return Err(UpgradeError::ProjectValidation(format!(
                "Access to system directory '{forbidden}' is not allowed"
            )));
        }

        Ok(canonical)
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInfo {
    pub project_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Reports which version of a package is installed in the project.
pub trait InstalledPackages {
    fn installed_version(&self, package: &str) -> Result<Version>;
}

/// Looks packages up the way Node resolves them: `node_modules` in the project
/// directory, then in each parent (hoisted monorepo installs).
pub struct NodeModulesInspector {
    project_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct InstalledPackageJson {
    version: Option<String>,
}

impl NodeModulesInspector {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    fn locate(&self, package: &str) -> Option<PathBuf> {
        self.project_path
            .ancestors()
            .map(|dir| dir.join("node_modules").join(package).join("package.json"))
            .find(|candidate| candidate.is_file())
    }
}

impl InstalledPackages for NodeModulesInspector {
    fn installed_version(&self, package: &str) -> Result<Version> {
        let cannot_detect = |reason: String| UpgradeError::CannotDetectInstalled {
            path: self.project_path.clone(),
            reason,
        };

        let manifest = self
            .locate(package)
            .ok_or_else(|| cannot_detect(format!("{package} is not installed")))?;
        log::debug!("Reading installed {package} from {}", manifest.display());

        let content = fs::read_to_string(&manifest)
            .map_err(|e| cannot_detect(format!("failed to read {}: {e}", manifest.display())))?;
        let parsed: InstalledPackageJson = serde_json::from_str(&content)
            .map_err(|e| cannot_detect(format!("failed to parse {}: {e}", manifest.display())))?;

        let raw = parsed
            .version
            .ok_or_else(|| cannot_detect(format!("{} has no version", manifest.display())))?;

        Version::parse(&raw)
            .map_err(|e| cannot_detect(format!("{package} has invalid version '{raw}': {e}")))
    }
}
