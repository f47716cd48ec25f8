use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// Detect from the `npm_config_user_agent` value set by the invoking package manager
    /// (e.g. `pnpm/9.1.0 npm/? node/v20.11.0 darwin arm64`).
    pub fn from_user_agent(user_agent: &str) -> Option<Self> {
        let name = user_agent.split('/').next()?.trim();
        match name {
            "npm" => Some(PackageManager::Npm),
            "yarn" => Some(PackageManager::Yarn),
            "pnpm" => Some(PackageManager::Pnpm),
            "bun" => Some(PackageManager::Bun),
            _ => None,
        }
    }

    /// Detect from the lockfile present in the project directory.
    pub fn from_lockfile(project_path: &Path) -> Option<Self> {
        const LOCKFILES: &[(&str, PackageManager)] = &[
            ("pnpm-lock.yaml", PackageManager::Pnpm),
            ("yarn.lock", PackageManager::Yarn),
            ("bun.lockb", PackageManager::Bun),
            ("bun.lock", PackageManager::Bun),
            ("package-lock.json", PackageManager::Npm),
        ];

        LOCKFILES
            .iter()
            .find(|(file, _)| project_path.join(file).exists())
            .map(|(_, manager)| *manager)
    }

    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    /// Arguments that add exact-pinned packages to the manifest.
    pub fn install_args(self, dev: bool, silent: bool) -> Vec<&'static str> {
        let mut args = match self {
            PackageManager::Npm => vec!["install", "--save-exact"],
            PackageManager::Yarn | PackageManager::Bun => vec!["add", "--exact"],
            PackageManager::Pnpm => vec!["add", "--save-exact"],
        };

        if dev {
            args.push(match self {
                PackageManager::Npm | PackageManager::Pnpm => "--save-dev",
                PackageManager::Yarn | PackageManager::Bun => "--dev",
            });
        }

        if silent && self != PackageManager::Bun {
            args.push("--silent");
        }

        args
    }

    /// Command used to run a package binary without installing it.
    pub fn exec_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            PackageManager::Npm => ("npx", &["--yes"]),
            PackageManager::Yarn => ("yarn", &["dlx"]),
            PackageManager::Pnpm => ("pnpm", &["dlx"]),
            PackageManager::Bun => ("bunx", &[]),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}
