pub mod command_runner;
pub mod interaction;
pub mod manifest_editor;
pub mod package_installer;
pub mod project_scanner;
pub mod transform_runner;
pub mod version_control;

pub use interaction::{Choice, ConfirmationOracle, TerminalOracle};
pub use manifest_editor::{ManifestStore, PackageJsonStore, PackageManifest};
pub use package_installer::{CommandInstaller, InstallOptions, PackageInstaller};
pub use project_scanner::{InstalledPackages, NodeModulesInspector, ProjectScannerAgent};
pub use transform_runner::{ExecTransformRunner, FollowUpRecipe, TransformOptions, TransformRunner};
pub use version_control::VersionControlAgent;
