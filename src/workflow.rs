use crate::agents::{
    CommandInstaller, ConfirmationOracle, ExecTransformRunner, NodeModulesInspector,
    PackageJsonStore, ProjectScannerAgent, TerminalOracle, VersionControlAgent,
};
use crate::codemods::{CodemodCatalog, CodemodDescriptor};
use crate::environment::{Environment, NonInteractiveReason};
use crate::error::{Result, UpgradeError};
use crate::npm::{NpmConfigParser, PackageManager};
use crate::registry::RegistryFactory;
use crate::upgrade::{
    Collaborators, FRAMEWORK_PACKAGE, StepOutcome, UpgradeExecutor, UpgradeOptions,
    UpgradeOutcome, UpgradeReport, VersionResolver,
};
use colored::Colorize;
use semver::Version;
use std::io::IsTerminal;
use std::path::Path;

/// Execute the upgrade workflow
pub fn execute_upgrade<P: AsRef<Path>>(
    project_path: P,
    revision: &str,
    verbose: bool,
    env: &Environment,
) -> Result<()> {
    println!(
        "{}",
        format!("Upgrading Next.js to '{revision}'...").cyan().bold()
    );

    println!("\n{}", "Checking project...".yellow());
    let scanner = ProjectScannerAgent::new(project_path);
    let project_info = scanner.validate()?;
    println!("{}", "✓ Found package.json".green());

    warn_on_uncommitted_changes(&project_info.project_path);

    let config = NpmConfigParser::new(&project_info.project_path).parse(env)?;
    println!("   Registry: {}", config.registry.bright_cyan());
    println!("   Package manager: {}", config.package_manager.to_string().bright_cyan());

    let registry = RegistryFactory::create_npm(&config)?;
    let resolver = VersionResolver::new(registry, FRAMEWORK_PACKAGE);
    let catalog = CodemodCatalog::builtin()?;

    let installed = NodeModulesInspector::new(&project_info.project_path);
    let manifest = PackageJsonStore::new(&project_info.manifest_path);
    let installer = CommandInstaller::new(config.package_manager, &project_info.project_path);
    let transforms = ExecTransformRunner::new(config.package_manager, verbose);

    let terminal = match env.non_interactive_reason(std::io::stdin().is_terminal()) {
        Some(reason) => {
            println!(
                "   {}",
                format!(
                    "Prompts disabled ({}); every recommended codemod will be applied",
                    describe_non_interactive(&reason)
                )
                .dimmed()
            );
            None
        }
        None => Some(TerminalOracle::new()),
    };

    let collaborators = Collaborators {
        installed: &installed,
        manifest: &manifest,
        installer: &installer,
        transforms: &transforms,
        oracle: terminal.as_ref().map(|t| t as &dyn ConfirmationOracle),
    };
    let executor = UpgradeExecutor::new(
        &resolver,
        &catalog,
        collaborators,
        &project_info.project_path,
        UpgradeOptions { verbose },
    );

    match executor.run(revision) {
        Ok(UpgradeOutcome::AlreadyCurrent { .. }) => Ok(()),
        Ok(UpgradeOutcome::Completed(report)) => {
            print_upgrade_report(&report, config.package_manager);
            Ok(())
        }
        Err(UpgradeError::UserCancelled) => {
            println!("\n{}", "Upgrade cancelled by user.".yellow());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Uncommitted work is only worth a warning; codemods rewrite source files in place.
fn warn_on_uncommitted_changes(project_path: &Path) {
    let Ok(git) = VersionControlAgent::new(project_path) else {
        return;
    };
    if !git.is_repository() {
        log::debug!("{} is not inside a Git repository", project_path.display());
        return;
    }

    match git.is_working_directory_clean() {
        Ok(true) => println!("{}", "✓ Working directory is clean".green()),
        Ok(false) => {
            println!(
                "{}",
                "⚠ Warning: Working directory has uncommitted changes".red()
            );
            println!("  Commit or stash them first so codemod edits are easy to review.");
        }
        Err(e) => log::warn!("Could not read Git status: {e}"),
    }
}

fn describe_non_interactive(reason: &NonInteractiveReason) -> String {
    match reason {
        NonInteractiveReason::ExplicitDisable => "NEXT_UPGRADE_NO_TTY is set".to_string(),
        NonInteractiveReason::CiDetected { env_var } => format!("CI detected via {env_var}"),
        NonInteractiveReason::NoTerminal => "stdin is not a terminal".to_string(),
    }
}

fn print_upgrade_report(report: &UpgradeReport, package_manager: PackageManager) {
    println!("\n{}", "Upgrade Summary:".cyan().bold());
    println!(
        "  {} {} → {}",
        FRAMEWORK_PACKAGE.white().bold(),
        report.installed.to_string().red(),
        report.target.to_string().green().bold()
    );

    if !report.pinned.is_empty() {
        println!("\n{}:", "Pinned versions".cyan());
        for pinned in &report.pinned {
            let previous = pinned.previous.as_deref().unwrap_or("(new)");
            println!(
                "  • {} {} → {}",
                pinned.package.name.white().bold(),
                previous.red(),
                pinned.package.version.to_string().green()
            );
        }
    }

    if report.turbopack_enabled {
        println!("\n{}", "✓ `next dev` now uses Turbopack".green());
    }

    if let StepOutcome::Failed(reason) = &report.install {
        println!("\n{}", format!("✗ Install failed: {reason}").red());
        println!("  Run `{package_manager} install` to finish installing the pinned versions.");
    }

    let transforms: Vec<_> = report.codemods.iter().chain(report.recipes.iter()).collect();
    if !transforms.is_empty() {
        println!("\n{}:", "Codemods".cyan());
        for codemod in transforms {
            match &codemod.outcome {
                StepOutcome::Succeeded => {
                    println!("  {} {}", "✓".green(), codemod.id);
                }
                StepOutcome::Failed(reason) => {
                    println!("  {} {} {}", "✗".red(), codemod.id, reason.dimmed());
                }
            }
        }
    }

    if report.is_clean() {
        println!("\n{}", "✨ Upgrade completed successfully!".green().bold());
    } else {
        println!(
            "\n{}",
            "Upgrade completed with errors. Review the steps above.".yellow().bold()
        );
    }
}

/// Execute the codemods workflow - list the catalog or one upgrade window
pub fn execute_codemods(from: Option<&str>, to: Option<&str>) -> Result<()> {
    let from = from.map(parse_version_arg).transpose()?;
    let to = to.map(parse_version_arg).transpose()?;

    let catalog = CodemodCatalog::builtin()?;
    let listed = select_window(&catalog, from.as_ref(), to.as_ref());

    match (&from, &to) {
        (None, None) => println!("{}", "Available codemods:".cyan().bold()),
        _ => println!(
            "{}",
            format!(
                "Codemods applicable from {} to {}:",
                from.as_ref().map_or("the beginning".to_string(), |v| format!("v{v}")),
                to.as_ref().map_or("the newest release".to_string(), |v| format!("v{v}")),
            )
            .cyan()
            .bold()
        ),
    }

    if listed.is_empty() {
        println!("  {}", "(none)".dimmed());
        return Ok(());
    }

    for codemod in &listed {
        println!(
            "  {} {} {}",
            format!("(v{})", codemod.introduced_in).yellow(),
            codemod.id.white().bold(),
            codemod.title.dimmed()
        );
    }

    println!("\n  {} codemod(s)", listed.len().to_string().yellow());
    Ok(())
}

fn parse_version_arg(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).map_err(|e| {
        UpgradeError::InvalidRevision {
            revision: raw.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Codemods introduced in `(from, to]`. A missing bound leaves that side open.
fn select_window<'a>(
    catalog: &'a CodemodCatalog,
    from: Option<&Version>,
    to: Option<&Version>,
) -> Vec<&'a CodemodDescriptor> {
    match (from, to) {
        (Some(from), Some(to)) => catalog.applicable_between(from, to).iter().collect(),
        _ => catalog
            .all()
            .iter()
            .filter(|c| from.is_none_or(|from| c.introduced_in > *from))
            .filter(|c| to.is_none_or(|to| c.introduced_in <= *to))
            .collect(),
    }
}
