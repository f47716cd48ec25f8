use crate::error::{Result, UpgradeError};
use crate::registry::{PackageVersions, RegistryClient, ReleaseMetadata};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::collections::BTreeMap;
use std::io::Read;
use std::time::Duration;

const MAX_METADATA_BYTES: u64 = 64 * 1024 * 1024;
const ABBREVIATED_METADATA: &str =
    "application/vnd.npm.install-v1+json; q=1.0, application/json; q=0.8, */*";

/// npm registry client
pub struct NpmRegistry {
    client: Client,
    registry_url: String,
}

impl NpmRegistry {
    pub fn new(registry_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("next-upgrade/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpgradeError::Registry(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            registry_url: registry_url.trim_end_matches('/').to_string(),
        })
    }

    fn package_url(&self, package: &str) -> String {
        format!("{}/{}", self.registry_url, encode_package_name(package))
    }

    /// GET a JSON document; 404 maps to `None`, any other failure is an error.
    fn get_json<T: DeserializeOwned>(&self, url: &str, accept: Option<&str>) -> Result<Option<T>> {
        log::debug!("Fetching: {url}");

        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request
            .send()
            .map_err(|e| UpgradeError::Registry(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            log::debug!("HTTP {status}: {url}");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(UpgradeError::Registry(format!("HTTP {status}: {url}")));
        }

        let declared = response.content_length();
        let body = read_capped(response, declared, MAX_METADATA_BYTES, url)?;

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| UpgradeError::Registry(format!("Malformed registry response: {e}")))
    }
}

impl RegistryClient for NpmRegistry {
    fn fetch_release(&self, package: &str, revision: &str) -> Result<Option<ReleaseMetadata>> {
        let url = format!("{}/{}", self.package_url(package), revision);
        self.get_json(&url, None)
    }

    fn fetch_versions(&self, package: &str) -> Result<Option<PackageVersions>> {
        let url = self.package_url(package);
        let document: Option<Packument> = self.get_json(&url, Some(ABBREVIATED_METADATA))?;

        Ok(document.map(|doc| {
            log::debug!("Found {} versions for {}", doc.versions.len(), package);
            PackageVersions {
                dist_tags: doc.dist_tags,
                versions: doc.versions.into_keys().collect(),
            }
        }))
    }
}

#[derive(Debug, Deserialize)]
struct Packument {
    #[serde(rename = "dist-tags", default)]
    dist_tags: BTreeMap<String, String>,
    #[serde(default)]
    versions: BTreeMap<String, IgnoredAny>,
}

/// Read at most `limit` bytes of a response body. A declared length over the
/// limit is rejected before anything is read.
fn read_capped<R: Read>(reader: R, declared: Option<u64>, limit: u64, url: &str) -> Result<Vec<u8>> {
    let too_large = || {
        UpgradeError::Registry(format!("Registry response from {url} exceeded {limit} bytes"))
    };

    if declared.is_some_and(|len| len > limit) {
        return Err(too_large());
    }

    let mut body = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut body)
        .map_err(|e| UpgradeError::Registry(format!("Failed to read {url}: {e}")))?;

    if body.len() as u64 > limit {
        return Err(too_large());
    }
    Ok(body)
}

/// Scoped names keep their `@` but the separator must be escaped (`@types%2Freact`).
fn encode_package_name(package: &str) -> String {
    package.replace('/', "%2F")
}
