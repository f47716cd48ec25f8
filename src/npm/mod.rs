pub mod config_parser;
pub mod package_manager;
pub mod registry;
pub mod version;

pub use config_parser::{NpmConfig, NpmConfigParser};
pub use package_manager::PackageManager;
pub use registry::NpmRegistry;
pub use version::{VersionComparator, VersionQuery};
