use crate::error::{Result, UpgradeError};
use crate::npm::{VersionComparator, VersionQuery};
use crate::registry::RegistryClient;
use rayon::prelude::*;
use semver::Version;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Release the project is being upgraded to. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetManifest {
    pub version: Version,
    pub peer_dependencies: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
}

/// A package whose version has to be pinned from a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRequest {
    pub package: String,
    pub query: String,
}

impl PeerRequest {
    pub fn new(package: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: Version,
}

impl ResolvedPackage {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    /// `name@version`, as handed to the installer.
    pub fn specifier(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

impl fmt::Display for ResolvedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.specifier())
    }
}

pub struct VersionResolver {
    registry: Arc<dyn RegistryClient>,
    package: String,
}

impl VersionResolver {
    pub fn new(registry: Arc<dyn RegistryClient>, package: impl Into<String>) -> Self {
        Self {
            registry,
            package: package.into(),
        }
    }

    /// Resolve a dist-tag, exact version, or range to the release it names.
    ///
    /// Ranges are pinned to their highest published match first, since the
    /// registry only serves release documents for tags and exact versions.
    pub fn resolve_revision(&self, revision: &str) -> Result<TargetManifest> {
        let invalid = |reason: String| UpgradeError::InvalidRevision {
            revision: revision.to_string(),
            reason,
        };

        let query = VersionQuery::parse(revision)
            .ok_or_else(|| invalid("not a version, dist-tag or range".to_string()))?;

        let pinned = match &query {
            VersionQuery::Exact(version) => version.to_string(),
            VersionQuery::Tag(tag) => tag.clone(),
            VersionQuery::Range(_) => self
                .resolve_highest_matching(&self.package, revision)
                .map_err(|e| invalid(e.to_string()))?
                .to_string(),
        };

        let release = self
            .registry
            .fetch_release(&self.package, &pinned)
            .map_err(|e| invalid(e.to_string()))?
            .ok_or_else(|| invalid("no matching release on the registry".to_string()))?;

        let raw_version = release
            .version
            .ok_or_else(|| invalid("release metadata has no version".to_string()))?;
        let version = Version::parse(&raw_version)
            .map_err(|e| invalid(format!("registry returned invalid version '{raw_version}': {e}")))?;
        let peer_dependencies = release
            .peer_dependencies
            .ok_or_else(|| invalid("release metadata has no peerDependencies".to_string()))?;

        log::debug!("Resolved {} '{}' to {}", self.package, revision, version);

        Ok(TargetManifest {
            version,
            peer_dependencies,
            dev_dependencies: release.dev_dependencies,
        })
    }

    /// Highest published version of `package` satisfying `query`.
    pub fn resolve_highest_matching(&self, package: &str, query: &str) -> Result<Version> {
        let no_match = || UpgradeError::NoMatchingVersion {
            package: package.to_string(),
            query: query.to_string(),
        };

        let parsed = VersionQuery::parse(query).ok_or_else(no_match)?;
        let published = self.registry.fetch_versions(package)?.ok_or_else(no_match)?;

        let highest = match &parsed {
            VersionQuery::Tag(tag) => published
                .dist_tags
                .get(tag)
                .and_then(|version| Version::parse(version).ok()),
            _ => VersionComparator::highest_matching(&published.versions, &parsed),
        };

        highest.ok_or_else(no_match)
    }

    /// Resolve independent peer queries in parallel. Results keep request order;
    /// any failure fails the whole batch.
    pub fn resolve_peers(&self, requests: &[PeerRequest]) -> Result<Vec<ResolvedPackage>> {
        requests
            .par_iter()
            .map(|request| {
                self.resolve_highest_matching(&request.package, &request.query)
                    .map(|version| ResolvedPackage::new(&request.package, version))
                    .map_err(|source| UpgradeError::PeerResolutionFailed {
                        package: request.package.clone(),
                        source: Box::new(source),
                    })
            })
            .collect()
    }
}
