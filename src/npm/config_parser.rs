use crate::environment::Environment;
use crate::error::{Result, UpgradeError};
use crate::npm::package_manager::PackageManager;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";

const REGISTRY_ENV_VARS: &[&str] = &["npm_config_registry", "NPM_CONFIG_REGISTRY"];
const USER_AGENT_ENV_VAR: &str = "npm_config_user_agent";

/// npm-side configuration the upgrade needs: where to query and what to install with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmConfig {
    pub registry: String,
    pub package_manager: PackageManager,
}

/// Reads npm configuration from the environment and the project's `.npmrc`.
pub struct NpmConfigParser {
    project_path: PathBuf,
}

impl NpmConfigParser {
    pub fn new<P: AsRef<Path>>(project_path: P) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(&self, env: &Environment) -> Result<NpmConfig> {
        let registry = match env.first_of(REGISTRY_ENV_VARS) {
            Some(registry) => registry.to_string(),
            None => self
                .registry_from_npmrc()?
                .unwrap_or_else(|| DEFAULT_REGISTRY.to_string()),
        };
        let registry = validate_registry_url(&registry)?;

        let package_manager = env
            .get(USER_AGENT_ENV_VAR)
            .and_then(PackageManager::from_user_agent)
            .or_else(|| PackageManager::from_lockfile(&self.project_path))
            .unwrap_or_default();

        log::debug!("Using registry {registry} with {package_manager}");

        Ok(NpmConfig {
            registry,
            package_manager,
        })
    }

    /// Parse the unscoped `registry=` entry of `.npmrc`
    fn registry_from_npmrc(&self) -> Result<Option<String>> {
        let path = self.project_path.join(".npmrc");
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        Ok(extract_registry(&content))
    }
}

fn extract_registry(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == "registry")
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn validate_registry_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|_| UpgradeError::ProjectValidation(format!("Invalid registry URL: {raw}")))?;

    match parsed.scheme() {
        "https" | "http" => {}
        scheme => {
            return Err(UpgradeError::ProjectValidation(format!(
                "Unsupported registry scheme: {scheme}"
            )));
        }
    }

    Ok(raw.trim_end_matches('/').to_string())
}
