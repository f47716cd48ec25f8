use crate::error::{Result, UpgradeError};
use regex::Regex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const DEPENDENCY_SECTIONS: &[&str] = &["dependencies", "devDependencies"];

static NEXT_DEV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnext\s+dev\b").expect("valid `next dev` pattern"));

/// In-memory `package.json`. Key order is kept so a rewrite only touches the
/// fields that changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    root: Map<String, Value>,
}

impl PackageManifest {
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(UpgradeError::Manifest(
                "package.json must contain a JSON object".to_string(),
            )),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.root)?;
        text.push('\n');
        Ok(text)
    }

    /// Declared version query, checking `dependencies` before `devDependencies`.
    pub fn declared_version(&self, package: &str) -> Option<&str> {
        DEPENDENCY_SECTIONS
            .iter()
            .filter_map(|section| self.section(section))
            .find_map(|deps| deps.get(package))
            .and_then(Value::as_str)
    }

    pub fn declares(&self, package: &str) -> bool {
        self.declared_version(package).is_some()
    }

    /// True when the package is only declared under `devDependencies`.
    pub fn is_dev_only(&self, package: &str) -> bool {
        let in_section = |name: &str| {
            self.section(name)
                .is_some_and(|deps| deps.contains_key(package))
        };
        in_section("devDependencies") && !in_section("dependencies")
    }

    /// Pin `package` to `version` in every section that declares it; adds it to
    /// `dependencies` when no section does. Returns the previous declaration.
    pub fn set_dependency_version(&mut self, package: &str, version: &str) -> Option<String> {
        let previous = self.declared_version(package).map(str::to_string);
        let mut updated = false;

        for section in DEPENDENCY_SECTIONS {
            if let Some(deps) = self.section_mut(section) {
                if let Some(entry) = deps.get_mut(package) {
                    *entry = Value::from(version);
                    updated = true;
                }
            }
        }

        if !updated {
            let deps = self
                .root
                .entry("dependencies")
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(deps) = deps {
                deps.insert(package.to_string(), Value::from(version));
            }
        }

        previous
    }

    pub fn dev_script(&self) -> Option<&str> {
        self.root
            .get("scripts")
            .and_then(Value::as_object)
            .and_then(|scripts| scripts.get("dev"))
            .and_then(Value::as_str)
    }

    /// Whether the `dev` script runs `next dev` without Turbopack.
    pub fn dev_script_lacks_turbopack(&self) -> bool {
        self.dev_script()
            .is_some_and(|script| NEXT_DEV.is_match(script) && !script.contains("--turbo"))
    }

    /// Rewrites `next dev` to `next dev --turbopack`. Returns true if the script changed.
    pub fn enable_turbopack(&mut self) -> bool {
        if !self.dev_script_lacks_turbopack() {
            return false;
        }

        let Some(Value::Object(scripts)) = self.root.get_mut("scripts") else {
            return false;
        };

        match scripts.get_mut("dev") {
            Some(Value::String(script)) => {
                let rewritten = NEXT_DEV
                    .replace(script.as_str(), "next dev --turbopack")
                    .into_owned();
                *script = rewritten;
                true
            }
            _ => false,
        }
    }

    fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.root.get(name).and_then(Value::as_object)
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut Map<String, Value>> {
        self.root.get_mut(name).and_then(Value::as_object_mut)
    }
}

/// Storage for the project manifest.
pub trait ManifestStore {
    fn read(&self) -> Result<PackageManifest>;
    fn write(&self, manifest: &PackageManifest) -> Result<()>;
}

/// `package.json` on disk.
pub struct PackageJsonStore {
    path: PathBuf,
}

impl PackageJsonStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ManifestStore for PackageJsonStore {
    fn read(&self) -> Result<PackageManifest> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            UpgradeError::Manifest(format!("Failed to read {}: {e}", self.path.display()))
        })?;

        PackageManifest::parse(&content).map_err(|e| {
            UpgradeError::Manifest(format!("Failed to parse {}: {e}", self.path.display()))
        })
    }

    fn write(&self, manifest: &PackageManifest) -> Result<()> {
        fs::write(&self.path, manifest.to_json_string()?).map_err(|e| {
            UpgradeError::Manifest(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}
