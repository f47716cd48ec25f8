//! In-memory collaborators for driving the upgrade pipeline in tests.

use crate::agents::{
    Choice, ConfirmationOracle, FollowUpRecipe, InstallOptions, InstalledPackages, ManifestStore,
    PackageInstaller, PackageManifest, TransformOptions, TransformRunner,
};
use crate::error::{Result, UpgradeError};
use crate::registry::{PackageVersions, RegistryClient, ReleaseMetadata};
use semver::Version;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct FakeRegistry {
    releases: HashMap<(String, String), ReleaseMetadata>,
    packages: HashMap<String, PackageVersions>,
    failing: HashSet<String>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release(self, package: &str, revision: &str, version: &str, react: &str) -> Self {
        let mut peers = BTreeMap::new();
        peers.insert("react".to_string(), react.to_string());
        peers.insert("react-dom".to_string(), react.to_string());

        let mut dev = BTreeMap::new();
        dev.insert("@types/react".to_string(), "^19.0.0".to_string());
        dev.insert("@types/react-dom".to_string(), "^19.0.0".to_string());

        self.with_raw_release(
            package,
            revision,
            ReleaseMetadata {
                version: Some(version.to_string()),
                peer_dependencies: Some(peers),
                dev_dependencies: dev,
            },
        )
    }

    pub fn with_raw_release(mut self, package: &str, revision: &str, release: ReleaseMetadata) -> Self {
        self.releases
            .insert((package.to_string(), revision.to_string()), release);
        self
    }

    pub fn with_versions(mut self, package: &str, versions: &[&str]) -> Self {
        let entry = self.packages.entry(package.to_string()).or_default();
        entry.versions = versions.iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn with_dist_tag(mut self, package: &str, tag: &str, version: &str) -> Self {
        self.packages
            .entry(package.to_string())
            .or_default()
            .dist_tags
            .insert(tag.to_string(), version.to_string());
        self
    }

    pub fn failing(mut self, package: &str) -> Self {
        self.failing.insert(package.to_string());
        self
    }

    fn check(&self, package: &str) -> Result<()> {
        if self.failing.contains(package) {
            return Err(UpgradeError::Registry(format!("HTTP 500: {package}")));
        }
        Ok(())
    }
}

impl RegistryClient for FakeRegistry {
    fn fetch_release(&self, package: &str, revision: &str) -> Result<Option<ReleaseMetadata>> {
        self.check(package)?;
        Ok(self
            .releases
            .get(&(package.to_string(), revision.to_string()))
            .cloned())
    }

    fn fetch_versions(&self, package: &str) -> Result<Option<PackageVersions>> {
        self.check(package)?;
        Ok(self.packages.get(package).cloned())
    }
}

#[derive(Default)]
pub struct FakeInstalled {
    versions: HashMap<String, Version>,
}

impl FakeInstalled {
    pub fn with(mut self, package: &str, version: &str) -> Self {
        self.versions
            .insert(package.to_string(), Version::parse(version).unwrap());
        self
    }
}

impl InstalledPackages for FakeInstalled {
    fn installed_version(&self, package: &str) -> Result<Version> {
        self.versions
            .get(package)
            .cloned()
            .ok_or_else(|| UpgradeError::CannotDetectInstalled {
                path: PathBuf::from("/app"),
                reason: format!("{package} is not installed"),
            })
    }
}

pub struct MemoryManifestStore {
    manifest: RefCell<PackageManifest>,
    pub writes: Cell<usize>,
}

impl MemoryManifestStore {
    pub fn new(json: &str) -> Self {
        Self {
            manifest: RefCell::new(PackageManifest::parse(json).unwrap()),
            writes: Cell::new(0),
        }
    }

    pub fn current(&self) -> PackageManifest {
        self.manifest.borrow().clone()
    }
}

impl ManifestStore for MemoryManifestStore {
    fn read(&self) -> Result<PackageManifest> {
        Ok(self.manifest.borrow().clone())
    }

    fn write(&self, manifest: &PackageManifest) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        *self.manifest.borrow_mut() = manifest.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingInstaller {
    pub calls: RefCell<Vec<(Vec<String>, InstallOptions)>>,
    pub fail: bool,
}

impl RecordingInstaller {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl PackageInstaller for RecordingInstaller {
    fn install(&self, packages: &[String], options: InstallOptions) -> Result<()> {
        self.calls.borrow_mut().push((packages.to_vec(), options));
        if self.fail {
            return Err(UpgradeError::InstallFailed("network unreachable".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTransforms {
    pub applied: RefCell<Vec<String>>,
    pub recipes: RefCell<Vec<FollowUpRecipe>>,
    pub failing: HashSet<String>,
    pub failing_recipes: Vec<FollowUpRecipe>,
}

impl RecordingTransforms {
    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_recipe(recipe: FollowUpRecipe) -> Self {
        Self {
            failing_recipes: vec![recipe],
            ..Self::default()
        }
    }

    pub fn applied(&self) -> Vec<String> {
        self.applied.borrow().clone()
    }
}

impl TransformRunner for RecordingTransforms {
    fn run_transform(
        &self,
        codemod_id: &str,
        _target_dir: &Path,
        _options: TransformOptions,
    ) -> Result<()> {
        self.applied.borrow_mut().push(codemod_id.to_string());
        if self.failing.contains(codemod_id) {
            return Err(UpgradeError::CodemodFailed {
                id: codemod_id.to_string(),
                reason: "transform crashed".to_string(),
            });
        }
        Ok(())
    }

    fn run_recipe(&self, recipe: FollowUpRecipe, _target_dir: &Path) -> Result<()> {
        self.recipes.borrow_mut().push(recipe);
        if self.failing_recipes.contains(&recipe) {
            return Err(UpgradeError::CodemodFailed {
                id: recipe.to_string(),
                reason: "recipe crashed".to_string(),
            });
        }
        Ok(())
    }
}

/// Answers prompts from a script. Unscripted confirms fall back to their default.
#[derive(Default)]
pub struct ScriptedOracle {
    pub selection: Option<Vec<usize>>,
    pub confirms: RefCell<Vec<bool>>,
    pub cancel: bool,
    pub cancel_confirms: bool,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedOracle {
    pub fn selecting(indices: &[usize]) -> Self {
        Self {
            selection: Some(indices.to_vec()),
            ..Self::default()
        }
    }

    pub fn cancelling() -> Self {
        Self {
            cancel: true,
            ..Self::default()
        }
    }

    /// Accepts the codemod selection, then cancels at the first yes/no question.
    pub fn cancelling_confirms() -> Self {
        Self {
            cancel_confirms: true,
            ..Self::default()
        }
    }

    pub fn answering(mut self, answers: &[bool]) -> Self {
        self.confirms = RefCell::new(answers.iter().rev().copied().collect());
        self
    }
}

impl ConfirmationOracle for ScriptedOracle {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(question.to_string());
        if self.cancel || self.cancel_confirms {
            return Err(UpgradeError::UserCancelled);
        }
        Ok(self.confirms.borrow_mut().pop().unwrap_or(default))
    }

    fn multi_select(&self, question: &str, choices: &[Choice]) -> Result<Vec<usize>> {
        self.asked.borrow_mut().push(question.to_string());
        if self.cancel {
            return Err(UpgradeError::UserCancelled);
        }
        Ok(self.selection.clone().unwrap_or_else(|| {
            choices
                .iter()
                .enumerate()
                .filter(|(_, c)| c.selected)
                .map(|(i, _)| i)
                .collect()
        }))
    }
}
