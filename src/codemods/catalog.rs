use crate::error::{Result, UpgradeError};
use semver::Version;
use std::collections::HashSet;

/// `(id, title, introduced in)` for every shipped codemod, oldest first.
const BUILTIN_CODEMODS: &[(&str, &str, &str)] = &[
    (
        "url-to-withrouter",
        "Transform the deprecated automatically injected url property on top level pages to using withRouter",
        "6.0.0",
    ),
    (
        "withamp-to-config",
        "Transforms the withAmp HOC into Next.js 9 page configuration",
        "8.0.0",
    ),
    (
        "name-default-component",
        "Transforms anonymous components into named components to make sure they work with Fast Refresh",
        "9.5.0",
    ),
    (
        "add-missing-react-import",
        "Transforms files that do not import `React` to include the import in order for the new React JSX transform",
        "10.0.0",
    ),
    (
        "cra-to-next",
        "Automatically migrates a Create React App project to Next.js (experimental)",
        "11.0.0",
    ),
    (
        "new-link",
        "Ensures your <Link> usage is backwards compatible",
        "13.0.0",
    ),
    (
        "next-image-to-legacy-image",
        "Safely migrate Next.js 10, 11, 12 applications importing `next/image` to the renamed `next/legacy/image` import in Next.js 13",
        "13.0.0",
    ),
    (
        "next-image-experimental",
        "Dangerously migrates from `next/legacy/image` to the new `next/image` by adding inline styles and removing unused props (experimental)",
        "13.0.0",
    ),
    (
        "built-in-next-font",
        "Uninstall `@next/font` and transform imports to `next/font`",
        "13.2.0",
    ),
    (
        "metadata-to-viewport-export",
        "Migrates certain viewport related metadata from the `metadata` export to a new `viewport` export",
        "14.0.0",
    ),
    (
        "next-og-import",
        "Transforms imports from `next/server` to `next/og` for usage of Dynamic OG Image Generation",
        "14.0.0",
    ),
    (
        "next-request-geo-ip",
        "Install `@vercel/functions` to replace `geo` and `ip` properties on `NextRequest`",
        "15.0.0-canary.153",
    ),
    (
        "next-async-request-api",
        "Transforms usage of Next.js async Request APIs",
        "15.0.0-canary.171",
    ),
    (
        "app-dir-runtime-config-experimental-edge",
        "Transform App Router Route Segment Config `runtime` value from `experimental-edge` to `edge`",
        "15.0.0-canary.179",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodemodDescriptor {
    pub id: String,
    pub title: String,
    pub introduced_in: Version,
}

/// Codemods ordered by the release that introduced them. Catalog order is also
/// application order.
#[derive(Debug, Clone)]
pub struct CodemodCatalog {
    codemods: Vec<CodemodDescriptor>,
}

impl CodemodCatalog {
    pub fn builtin() -> Result<Self> {
        Self::from_entries(BUILTIN_CODEMODS)
    }

    /// Build a catalog, rejecting duplicate ids, bad versions and out-of-order entries.
    pub fn from_entries(entries: &[(&str, &str, &str)]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut codemods: Vec<CodemodDescriptor> = Vec::with_capacity(entries.len());

        for (id, title, version) in entries {
            if !seen.insert(*id) {
                return Err(UpgradeError::Catalog(format!("duplicate codemod id '{id}'")));
            }

            let introduced_in = Version::parse(version).map_err(|e| {
                UpgradeError::Catalog(format!("codemod '{id}' has invalid version '{version}': {e}"))
            })?;

            if let Some(previous) = codemods.last() {
                if introduced_in < previous.introduced_in {
                    return Err(UpgradeError::Catalog(format!(
                        "codemod '{id}' ({introduced_in}) is listed after '{}' ({})",
                        previous.id, previous.introduced_in
                    )));
                }
            }

            codemods.push(CodemodDescriptor {
                id: (*id).to_string(),
                title: (*title).to_string(),
                introduced_in,
            });
        }

        Ok(Self { codemods })
    }

    pub fn all(&self) -> &[CodemodDescriptor] {
        &self.codemods
    }

    /// Codemods introduced in `(installed, target]`, in catalog order.
    pub fn applicable_between(&self, installed: &Version, target: &Version) -> &[CodemodDescriptor] {
        if installed >= target {
            return &[];
        }

        let start = self
            .codemods
            .partition_point(|c| c.introduced_in <= *installed);
        let end = self.codemods.partition_point(|c| c.introduced_in <= *target);
        &self.codemods[start..end]
    }
}
