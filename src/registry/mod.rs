use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

pub mod factory;
pub use factory::RegistryFactory;

/// Release document for a single published version (`GET {registry}/{package}/{revision}`).
///
/// Every field is optional on the wire so that a document missing `version`
/// or `peerDependencies` can be reported as an invalid revision rather than a
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseMetadata {
    pub version: Option<String>,
    pub peer_dependencies: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

/// Published versions and dist-tags of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVersions {
    pub dist_tags: BTreeMap<String, String>,
    pub versions: Vec<String>,
}

pub trait RegistryClient: Send + Sync {
    /// Release metadata for a dist-tag or exact version; `None` when the registry has no such release.
    fn fetch_release(&self, package: &str, revision: &str) -> Result<Option<ReleaseMetadata>>;

    /// Every published version of `package`; `None` when the package does not exist.
    fn fetch_versions(&self, package: &str) -> Result<Option<PackageVersions>>;
}
