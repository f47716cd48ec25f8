use crate::agents::{
    ConfirmationOracle, FollowUpRecipe, InstallOptions, InstalledPackages, ManifestStore,
    PackageInstaller, PackageManifest, TransformOptions, TransformRunner,
};
use crate::codemods::CodemodCatalog;
use crate::error::Result;
use crate::upgrade::FRAMEWORK_PACKAGE;
use crate::upgrade::planner::{SelectedCodemodSet, UpgradeDecision, UpgradePlanner};
use crate::upgrade::report::{
    CodemodOutcome, PinnedPackage, StepOutcome, UpgradeOutcome, UpgradeReport,
};
use crate::upgrade::resolver::{PeerRequest, ResolvedPackage, TargetManifest, VersionResolver};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use semver::Version;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

const REACT: &str = "react";
const REACT_DOM: &str = "react-dom";
const TYPES_REACT: &str = "@types/react";
const TYPES_REACT_DOM: &str = "@types/react-dom";

/// Oldest framework release whose `next dev` supports `--turbopack`.
static TURBOPACK_MIN: LazyLock<Version> =
    LazyLock::new(|| Version::parse("15.0.0-canary").expect("valid version literal"));
const REACT_19_MAJOR: u64 = 19;

/// External systems the pipeline talks to.
pub struct Collaborators<'a> {
    pub installed: &'a dyn InstalledPackages,
    pub manifest: &'a dyn ManifestStore,
    pub installer: &'a dyn PackageInstaller,
    pub transforms: &'a dyn TransformRunner,
    /// `None` when nobody can answer prompts.
    pub oracle: Option<&'a dyn ConfirmationOracle>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeOptions {
    pub verbose: bool,
}

/// Answers to the optional questions, collected before anything is written.
#[derive(Debug, Default)]
struct FollowUps {
    turbopack: bool,
    recipes: Vec<FollowUpRecipe>,
}

/// Drives one upgrade run:
/// resolve target → compare → resolve peers → plan → persist manifest → install → apply codemods.
///
/// Steps up to and including planning abort the run on error and leave the
/// project untouched. Once the manifest is written, install and codemod
/// failures are recorded in the report instead.
pub struct UpgradeExecutor<'a> {
    resolver: &'a VersionResolver,
    planner: UpgradePlanner<'a>,
    collaborators: Collaborators<'a>,
    project_path: &'a Path,
    options: UpgradeOptions,
}

impl<'a> UpgradeExecutor<'a> {
    pub fn new(
        resolver: &'a VersionResolver,
        catalog: &'a CodemodCatalog,
        collaborators: Collaborators<'a>,
        project_path: &'a Path,
        options: UpgradeOptions,
    ) -> Self {
        Self {
            resolver,
            planner: UpgradePlanner::new(catalog),
            collaborators,
            project_path,
            options,
        }
    }

    pub fn run(&self, revision: &str) -> Result<UpgradeOutcome> {
        // Step 1: Resolve the target release
        println!("\n{}", "1. Resolving target revision...".yellow());
        let target = with_spinner(format!("Fetching next@{revision}"), || {
            self.resolver.resolve_revision(revision)
        })?;
        println!(
            "{}",
            format!("✓ Target version: next@{}", target.version).green()
        );

        // Step 2: Compare with what is installed
        println!("\n{}", "2. Comparing with the installed version...".yellow());
        let installed = self
            .collaborators
            .installed
            .installed_version(FRAMEWORK_PACKAGE)?;

        let applicable = match self.planner.plan(&installed, &target.version) {
            UpgradeDecision::AlreadyCurrent => {
                println!(
                    "{}",
                    format!(
                        "✓ Current Next.js version v{installed} is already on or higher than the target version v{}",
                        target.version
                    )
                    .green()
                );
                return Ok(UpgradeOutcome::AlreadyCurrent {
                    installed,
                    target: target.version,
                });
            }
            UpgradeDecision::Applicable(codemods) => codemods,
        };
        println!(
            "   {} {} → {}",
            FRAMEWORK_PACKAGE.white().bold(),
            installed.to_string().red(),
            target.version.to_string().green().bold()
        );

        let mut manifest = self.collaborators.manifest.read()?;

        // Step 3: Pin peer dependencies
        println!(
            "\n{}",
            "3. Resolving compatible peer dependency versions...".yellow()
        );
        let requests = peer_requests(&target, &manifest);
        let resolved = with_spinner("Querying the registry".to_string(), || {
            self.resolver.resolve_peers(&requests)
        })?;
        let peers = with_react_dom(resolved);
        for peer in &peers {
            println!("   • {}", peer.specifier().bright_cyan());
        }

        // Step 4: Decide what to run
        println!("\n{}", "4. Selecting codemods...".yellow());
        let selected = self.planner.select(applicable, self.collaborators.oracle)?;
        let follow_ups = self.ask_follow_ups(&target, &peers, &manifest)?;
        log::debug!("Selected codemods: {:?}", selected.ids());
        if selected.is_empty() {
            println!("   {}", "No codemods to apply".dimmed());
        } else {
            println!("   {} codemod(s) selected", selected.len().to_string().yellow());
        }

        // Step 5: Persist the new declared versions
        println!("\n{}", "5. Updating package.json...".yellow());
        let packages: Vec<ResolvedPackage> =
            std::iter::once(ResolvedPackage::new(FRAMEWORK_PACKAGE, target.version.clone()))
                .chain(peers)
                .collect();
        let pinned = pin_versions(&mut manifest, &packages);
        let turbopack_enabled = follow_ups.turbopack && manifest.enable_turbopack();
        self.collaborators.manifest.write(&manifest)?;
        println!("{}", "✓ package.json updated".green());

        // Step 6: Install
        println!("\n{}", "6. Installing packages...".yellow());
        let install = self.install(&manifest, &packages);
        match &install {
            StepOutcome::Succeeded => println!("{}", "✓ Packages installed".green()),
            StepOutcome::Failed(reason) => {
                println!("{}", format!("✗ {reason}").red());
                println!(
                    "{}",
                    "  package.json already lists the new versions; re-run your package manager's install to finish."
                        .dimmed()
                );
            }
        }

        // Step 7: Apply codemods in catalog order
        println!("\n{}", "7. Applying codemods...".yellow());
        let codemods = self.apply_codemods(&selected);
        let recipes = self.apply_recipes(&follow_ups.recipes);

        Ok(UpgradeOutcome::Completed(UpgradeReport {
            installed,
            target: target.version,
            pinned,
            turbopack_enabled,
            install,
            codemods,
            recipes,
        }))
    }

    fn ask_follow_ups(
        &self,
        target: &TargetManifest,
        peers: &[ResolvedPackage],
        manifest: &PackageManifest,
    ) -> Result<FollowUps> {
        let Some(oracle) = self.collaborators.oracle else {
            return Ok(FollowUps::default());
        };

        let turbopack = target.version >= *TURBOPACK_MIN
            && manifest.dev_script_lacks_turbopack()
            && oracle.confirm("Enable Turbopack for `next dev`?", true)?;

        let mut recipes = Vec::new();
        let target_react = peers
            .iter()
            .find(|peer| peer.name == REACT)
            .map(|peer| peer.version.major);
        let installed_react = self
            .collaborators
            .installed
            .installed_version(REACT)
            .ok()
            .map(|version| version.major);

        if let (Some(installed), Some(target)) = (installed_react, target_react) {
            if installed < REACT_19_MAJOR && target >= REACT_19_MAJOR {
                if oracle.confirm("Would you like to run the React 19 upgrade codemod?", true)? {
                    recipes.push(FollowUpRecipe::React19Migration);
                }
                if manifest.declares(TYPES_REACT)
                    && oracle.confirm(
                        "Would you like to run the React 19 Types upgrade codemod?",
                        true,
                    )?
                {
                    recipes.push(FollowUpRecipe::React19Types);
                }
            }
        }

        Ok(FollowUps { turbopack, recipes })
    }

    fn install(&self, manifest: &PackageManifest, packages: &[ResolvedPackage]) -> StepOutcome {
        let (dev, runtime): (Vec<&ResolvedPackage>, Vec<&ResolvedPackage>) =
            packages.iter().partition(|p| manifest.is_dev_only(&p.name));

        let mut failures = Vec::new();
        for (group, is_dev) in [(runtime, false), (dev, true)] {
            if group.is_empty() {
                continue;
            }

            let specifiers: Vec<String> = group.iter().map(|p| p.specifier()).collect();
            let options = InstallOptions {
                dev: is_dev,
                silent: !self.options.verbose,
            };
            if let Err(e) = self.collaborators.installer.install(&specifiers, options) {
                failures.push(e.to_string());
            }
        }

        if failures.is_empty() {
            StepOutcome::Succeeded
        } else {
            StepOutcome::Failed(failures.join("; "))
        }
    }

    fn apply_codemods(&self, selected: &SelectedCodemodSet<'_>) -> Vec<CodemodOutcome> {
        let options = TransformOptions {
            force: true,
            verbose: self.options.verbose,
        };

        selected
            .iter()
            .map(|codemod| {
                println!("   → {}", codemod.id.bright_cyan());
                let result =
                    self.collaborators
                        .transforms
                        .run_transform(&codemod.id, self.project_path, options);
                report_transform(&codemod.id, result)
            })
            .collect()
    }

    fn apply_recipes(&self, recipes: &[FollowUpRecipe]) -> Vec<CodemodOutcome> {
        recipes
            .iter()
            .map(|recipe| {
                let id = recipe.to_string();
                println!("   → {}", id.bright_cyan());
                let result = self
                    .collaborators
                    .transforms
                    .run_recipe(*recipe, self.project_path);
                report_transform(&id, result)
            })
            .collect()
    }
}

fn report_transform(id: &str, result: Result<()>) -> CodemodOutcome {
    let outcome = StepOutcome::from_result(result);
    match &outcome {
        StepOutcome::Succeeded => println!("     {}", "✓ applied".green()),
        StepOutcome::Failed(reason) => println!("     {}", format!("✗ {reason}").red()),
    }

    CodemodOutcome {
        id: id.to_string(),
        outcome,
    }
}

/// React comes from the release's peer dependencies; type packages from its dev
/// dependencies, and only when the project already uses them.
fn peer_requests(target: &TargetManifest, manifest: &PackageManifest) -> Vec<PeerRequest> {
    let mut requests = Vec::new();

    if let Some(query) = target.peer_dependencies.get(REACT) {
        requests.push(PeerRequest::new(REACT, query));
    }

    for types in [TYPES_REACT, TYPES_REACT_DOM] {
        if !manifest.declares(types) {
            continue;
        }
        if let Some(query) = target.dev_dependencies.get(types) {
            requests.push(PeerRequest::new(types, query));
        }
    }

    requests
}

/// `react-dom` is always pinned to the same version as `react`.
fn with_react_dom(resolved: Vec<ResolvedPackage>) -> Vec<ResolvedPackage> {
    let mut peers = Vec::with_capacity(resolved.len() + 1);
    for package in resolved {
        let dom = (package.name == REACT)
            .then(|| ResolvedPackage::new(REACT_DOM, package.version.clone()));
        peers.push(package);
        peers.extend(dom);
    }
    peers
}

fn pin_versions(manifest: &mut PackageManifest, packages: &[ResolvedPackage]) -> Vec<PinnedPackage> {
    packages
        .iter()
        .map(|package| PinnedPackage {
            previous: manifest.set_dependency_version(&package.name, &package.version.to_string()),
            package: package.clone(),
        })
        .collect()
}

fn with_spinner<T>(message: String, work: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("   {spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = work();
    spinner.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpgradeError;
    use crate::upgrade::testing::{
        FakeInstalled, FakeRegistry, MemoryManifestStore, RecordingInstaller, RecordingTransforms,
        ScriptedOracle,
    };
    use semver::Version;
    use std::sync::Arc;

    const MANIFEST: &str = r#"{
  "name": "app",
  "scripts": { "dev": "next dev" },
  "dependencies": { "next": "13.0.0", "react": "^18", "react-dom": "^18" },
  "devDependencies": { "@types/react": "^18" }
}"#;

    const TURBOPACK_QUESTION: &str = "Enable Turbopack for `next dev`?";

    fn registry(next: &str, react_query: &str, react_versions: &[&str]) -> FakeRegistry {
        FakeRegistry::new()
            .with_release("next", "latest", next, react_query)
            .with_versions("react", react_versions)
            .with_versions("@types/react", &["18.3.12", "19.0.1"])
            .with_versions("@types/react-dom", &["19.0.2"])
    }

    struct Harness {
        resolver: VersionResolver,
        catalog: CodemodCatalog,
        installed: FakeInstalled,
        store: MemoryManifestStore,
        installer: RecordingInstaller,
        transforms: RecordingTransforms,
    }

    impl Harness {
        fn new(installed_next: &str) -> Self {
            let registry = registry("15.0.0", "^18.2.0 || ^19.0.0", &["18.3.1", "19.0.0"]);

            Self {
                resolver: VersionResolver::new(Arc::new(registry), "next"),
                catalog: CodemodCatalog::from_entries(&[
                    ("A", "first", "14.0.0"),
                    ("B", "second", "15.0.0"),
                    ("C", "third", "15.2.0"),
                ])
                .unwrap(),
                installed: FakeInstalled::default()
                    .with("next", installed_next)
                    .with("react", "18.3.1"),
                store: MemoryManifestStore::new(MANIFEST),
                installer: RecordingInstaller::default(),
                transforms: RecordingTransforms::default(),
            }
        }

        fn with_registry(mut self, registry: FakeRegistry) -> Self {
            self.resolver = VersionResolver::new(Arc::new(registry), "next");
            self
        }

        fn with_manifest(mut self, json: &str) -> Self {
            self.store = MemoryManifestStore::new(json);
            self
        }

        fn with_installed_react(mut self, version: &str) -> Self {
            self.installed = FakeInstalled::default()
                .with("next", "13.0.0")
                .with("react", version);
            self
        }

        fn run(&self, revision: &str, oracle: Option<&dyn ConfirmationOracle>) -> Result<UpgradeOutcome> {
            let collaborators = Collaborators {
                installed: &self.installed,
                manifest: &self.store,
                installer: &self.installer,
                transforms: &self.transforms,
                oracle,
            };
            UpgradeExecutor::new(
                &self.resolver,
                &self.catalog,
                collaborators,
                Path::new("/app"),
                UpgradeOptions::default(),
            )
            .run(revision)
        }

        fn assert_untouched(&self) {
            assert_eq!(self.store.writes.get(), 0);
            assert!(self.installer.calls.borrow().is_empty());
            assert!(self.transforms.applied().is_empty());
        }
    }

    fn completed(outcome: UpgradeOutcome) -> UpgradeReport {
        match outcome {
            UpgradeOutcome::Completed(report) => report,
            other => panic!("expected a completed upgrade, got {other:?}"),
        }
    }

    #[test]
    fn same_version_is_a_no_op() {
        let harness = Harness::new("15.0.0");
        let outcome = harness.run("latest", None).unwrap();
        assert_eq!(
            outcome,
            UpgradeOutcome::AlreadyCurrent {
                installed: Version::new(15, 0, 0),
                target: Version::new(15, 0, 0),
            }
        );
        harness.assert_untouched();
    }

    #[test]
    fn upgrades_and_applies_window_in_order() {
        let harness = Harness::new("13.0.0");
        let report = completed(harness.run("latest", None).unwrap());

        assert_eq!(harness.transforms.applied(), vec!["A", "B"]);
        assert!(report.is_clean());
        assert_eq!(harness.store.writes.get(), 1);

        let manifest = harness.store.current();
        assert_eq!(manifest.declared_version("next"), Some("15.0.0"));
        assert_eq!(manifest.declared_version("react"), Some("19.0.0"));
        assert_eq!(manifest.declared_version("react-dom"), Some("19.0.0"));
        assert_eq!(manifest.declared_version("@types/react"), Some("19.0.1"));
        assert!(!manifest.declares("@types/react-dom"));

        let calls = harness.installer.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0].0,
            vec!["next@15.0.0", "react@19.0.0", "react-dom@19.0.0"]
        );
        assert!(!calls[0].1.dev);
        assert_eq!(calls[1].0, vec!["@types/react@19.0.1"]);
        assert!(calls[1].1.dev);
    }

    #[test]
    fn install_failure_still_runs_codemods() {
        let mut harness = Harness::new("13.0.0");
        harness.installer = RecordingInstaller::failing();

        let report = completed(harness.run("latest", None).unwrap());
        assert!(matches!(report.install, StepOutcome::Failed(_)));
        assert_eq!(harness.transforms.applied(), vec!["A", "B"]);
        // The manifest stays at the new versions.
        assert_eq!(harness.store.current().declared_version("next"), Some("15.0.0"));
    }

    #[test]
    fn failing_codemod_does_not_stop_the_rest() {
        let mut harness = Harness::new("13.0.0");
        harness.transforms = RecordingTransforms::failing_on(&["A"]);

        let report = completed(harness.run("latest", None).unwrap());
        assert_eq!(harness.transforms.applied(), vec!["A", "B"]);
        assert!(!report.codemods[0].outcome.is_success());
        assert!(report.codemods[1].outcome.is_success());
        let failed: Vec<&str> = report.failed_codemods().map(|c| c.id.as_str()).collect();
        assert_eq!(failed, vec!["A"]);
    }

    #[test]
    fn invalid_revision_aborts_before_writing() {
        let harness = Harness::new("13.0.0");
        let err = harness.run("not-a-real-tag", None).unwrap_err();
        assert!(matches!(err, UpgradeError::InvalidRevision { .. }));
        harness.assert_untouched();
    }

    #[test]
    fn undetectable_installation_aborts() {
        let mut harness = Harness::new("13.0.0");
        harness.installed = FakeInstalled::default();
        let err = harness.run("latest", None).unwrap_err();
        assert!(matches!(err, UpgradeError::CannotDetectInstalled { .. }));
        harness.assert_untouched();
    }

    #[test]
    fn peer_failure_aborts_before_writing() {
        let registry = FakeRegistry::new()
            .with_release("next", "latest", "15.0.0", "^19.0.0")
            .with_versions("react", &["18.3.1"]);
        let harness = Harness::new("13.0.0").with_registry(registry);

        let err = harness.run("latest", None).unwrap_err();
        assert!(matches!(err, UpgradeError::PeerResolutionFailed { .. }));
        harness.assert_untouched();
    }

    #[test]
    fn cancelling_selection_aborts_cleanly() {
        let harness = Harness::new("13.0.0");
        let oracle = ScriptedOracle::cancelling();
        let err = harness.run("latest", Some(&oracle)).unwrap_err();
        assert!(matches!(err, UpgradeError::UserCancelled));
        harness.assert_untouched();
    }

    #[test]
    fn user_subset_runs_in_catalog_order() {
        let harness = Harness::new("13.0.0");
        let oracle = ScriptedOracle::selecting(&[1]).answering(&[false, false, false]);
        let report = completed(harness.run("latest", Some(&oracle)).unwrap());
        assert_eq!(harness.transforms.applied(), vec!["B"]);
        assert_eq!(report.codemods.len(), 1);
        assert!(!report.turbopack_enabled);
        assert!(harness.transforms.recipes.borrow().is_empty());
    }

    #[test]
    fn accepted_follow_ups_rewrite_dev_script_and_run_recipes() {
        let harness = Harness::new("13.0.0");
        let oracle = ScriptedOracle::default().answering(&[true, true, true]);
        let report = completed(harness.run("latest", Some(&oracle)).unwrap());

        assert!(report.turbopack_enabled);
        assert_eq!(
            harness.store.current().dev_script(),
            Some("next dev --turbopack")
        );
        assert_eq!(
            *harness.transforms.recipes.borrow(),
            vec![FollowUpRecipe::React19Migration, FollowUpRecipe::React19Types]
        );
        assert_eq!(report.recipes.len(), 2);
    }

    fn asked_turbopack(oracle: &ScriptedOracle) -> bool {
        oracle.asked.borrow().iter().any(|q| q == TURBOPACK_QUESTION)
    }

    #[test]
    fn failing_recipe_is_recorded_and_the_next_still_runs() {
        let mut harness = Harness::new("13.0.0");
        harness.transforms = RecordingTransforms::failing_recipe(FollowUpRecipe::React19Migration);
        let oracle = ScriptedOracle::default().answering(&[false, true, true]);

        let report = completed(harness.run("latest", Some(&oracle)).unwrap());
        assert_eq!(
            *harness.transforms.recipes.borrow(),
            vec![FollowUpRecipe::React19Migration, FollowUpRecipe::React19Types]
        );
        assert!(!report.recipes[0].outcome.is_success());
        assert!(report.recipes[1].outcome.is_success());
        let failed: Vec<&str> = report.failed_codemods().map(|c| c.id.as_str()).collect();
        assert_eq!(failed, vec!["react-19-migration-recipe"]);
        assert!(!report.is_clean());
        assert_eq!(harness.store.writes.get(), 1);
    }

    #[test]
    fn react_already_on_19_gets_no_recipe_questions() {
        let harness = Harness::new("13.0.0").with_installed_react("19.0.0");
        let oracle = ScriptedOracle::default();

        completed(harness.run("latest", Some(&oracle)).unwrap());
        assert_eq!(oracle.asked.borrow().len(), 2);
        assert!(asked_turbopack(&oracle));
        assert!(harness.transforms.recipes.borrow().is_empty());
        assert_eq!(harness.store.writes.get(), 1);
    }

    #[test]
    fn types_recipe_requires_declared_types() {
        let harness = Harness::new("13.0.0").with_manifest(
            r#"{ "scripts": { "dev": "next dev" }, "dependencies": { "next": "13.0.0", "react": "^18" } }"#,
        );
        let oracle = ScriptedOracle::default();

        completed(harness.run("latest", Some(&oracle)).unwrap());
        assert_eq!(oracle.asked.borrow().len(), 3);
        assert_eq!(
            *harness.transforms.recipes.borrow(),
            vec![FollowUpRecipe::React19Migration]
        );
        assert_eq!(harness.store.writes.get(), 1);
    }

    #[test]
    fn later_react_majors_still_offer_the_migration() {
        let registry = registry("16.0.0", "^19.0.0 || ^20.0.0", &["18.3.1", "19.0.0", "20.0.0"]);
        let harness = Harness::new("13.0.0").with_registry(registry);
        let oracle = ScriptedOracle::default().answering(&[false, true, false]);

        completed(harness.run("latest", Some(&oracle)).unwrap());
        assert_eq!(harness.store.current().declared_version("react"), Some("20.0.0"));
        assert_eq!(
            *harness.transforms.recipes.borrow(),
            vec![FollowUpRecipe::React19Migration]
        );
    }

    #[test]
    fn no_turbopack_question_below_15() {
        let registry = registry("14.2.0", "^18.2.0", &["18.3.1"]);
        let harness = Harness::new("13.0.0").with_registry(registry);
        let oracle = ScriptedOracle::default();

        let report = completed(harness.run("latest", Some(&oracle)).unwrap());
        assert!(!asked_turbopack(&oracle));
        assert!(!report.turbopack_enabled);
        assert_eq!(harness.store.current().dev_script(), Some("next dev"));
        assert!(harness.transforms.recipes.borrow().is_empty());
        assert_eq!(harness.store.writes.get(), 1);
    }

    #[test]
    fn turbopack_threshold_is_the_first_canary() {
        let canary = Harness::new("13.0.0")
            .with_registry(registry("15.0.0-canary.5", "^19.0.0", &["19.0.0"]));
        let oracle = ScriptedOracle::default();
        completed(canary.run("latest", Some(&oracle)).unwrap());
        assert!(asked_turbopack(&oracle));

        let alpha = Harness::new("13.0.0")
            .with_registry(registry("15.0.0-alpha.1", "^19.0.0", &["19.0.0"]));
        let oracle = ScriptedOracle::default();
        completed(alpha.run("latest", Some(&oracle)).unwrap());
        assert!(!asked_turbopack(&oracle));
    }

    #[test]
    fn no_turbopack_question_without_dev_script() {
        let harness = Harness::new("13.0.0")
            .with_installed_react("19.0.0")
            .with_manifest(r#"{ "dependencies": { "next": "13.0.0", "react": "^19" } }"#);
        let oracle = ScriptedOracle::default();

        let report = completed(harness.run("latest", Some(&oracle)).unwrap());
        assert_eq!(oracle.asked.borrow().len(), 1);
        assert!(!report.turbopack_enabled);
        assert!(harness.transforms.recipes.borrow().is_empty());
        assert_eq!(harness.store.writes.get(), 1);
    }

    #[test]
    fn cancelling_a_follow_up_question_aborts_before_writing() {
        let harness = Harness::new("13.0.0");
        let oracle = ScriptedOracle::cancelling_confirms();

        let err = harness.run("latest", Some(&oracle)).unwrap_err();
        assert!(matches!(err, UpgradeError::UserCancelled));
        assert_eq!(oracle.asked.borrow().len(), 2);
        assert!(asked_turbopack(&oracle));
        assert!(harness.transforms.recipes.borrow().is_empty());
        harness.assert_untouched();
    }

    #[test]
    fn react_dom_follows_react() {
        let peers = with_react_dom(vec![
            ResolvedPackage::new("react", Version::new(19, 0, 0)),
            ResolvedPackage::new("@types/react", Version::new(19, 0, 1)),
        ]);
        let specifiers: Vec<String> = peers.iter().map(ResolvedPackage::specifier).collect();
        assert_eq!(
            specifiers,
            vec!["react@19.0.0", "react-dom@19.0.0", "@types/react@19.0.1"]
        );
    }
}
