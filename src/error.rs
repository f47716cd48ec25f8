use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpgradeError {
    #[error(
        "Invalid revision provided: \"{revision}\" ({reason}). Please provide a valid Next.js version or dist-tag (e.g. \"latest\", \"canary\", \"rc\", or \"15.0.0\")"
    )]
    InvalidRevision { revision: String, reason: String },

    #[error("No published version of {package} matches \"{query}\"")]
    NoMatchingVersion { package: String, query: String },

    #[error(
        "Failed to get the installed Next.js version at \"{}\": {reason}. If you're using a monorepo, run this command from the Next.js app directory",
        path.display()
    )]
    CannotDetectInstalled { path: PathBuf, reason: String },

    #[error("Failed to resolve a compatible version for {package}: {source}")]
    PeerResolutionFailed {
        package: String,
        #[source]
        source: Box<UpgradeError>,
    },

    #[error("Installing packages failed: {0}")]
    InstallFailed(String),

    #[error("Codemod {id} failed: {reason}")]
    CodemodFailed { id: String, reason: String },

    #[error("Project validation failed: {0}")]
    ProjectValidation(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Registry request failed: {0}")]
    Registry(String),

    #[error("Invalid codemod catalog: {0}")]
    Catalog(String),

    #[error("Upgrade cancelled by user")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UpgradeError>;
