use crate::agents::{Choice, ConfirmationOracle};
use crate::codemods::{CodemodCatalog, CodemodDescriptor};
use crate::error::Result;
use crate::npm::VersionComparator;
use semver::Version;

const SELECT_PROMPT: &str =
    "The following codemods are recommended for your upgrade. Select the ones to apply.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeDecision<'a> {
    /// Installed version is at or above the target.
    AlreadyCurrent,
    Applicable(&'a [CodemodDescriptor]),
}

/// Codemods chosen for this run, always in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedCodemodSet<'a> {
    codemods: Vec<&'a CodemodDescriptor>,
}

impl<'a> SelectedCodemodSet<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a CodemodDescriptor> + '_ {
        self.codemods.iter().copied()
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.codemods.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.codemods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codemods.is_empty()
    }
}

pub struct UpgradePlanner<'a> {
    catalog: &'a CodemodCatalog,
}

impl<'a> UpgradePlanner<'a> {
    pub fn new(catalog: &'a CodemodCatalog) -> Self {
        Self { catalog }
    }

    pub fn plan(&self, installed: &Version, target: &Version) -> UpgradeDecision<'a> {
        if !VersionComparator::is_newer(target, installed) {
            return UpgradeDecision::AlreadyCurrent;
        }

        UpgradeDecision::Applicable(self.catalog.applicable_between(installed, target))
    }

    /// Let the user filter the applicable codemods. Without an oracle every
    /// applicable codemod is kept; with nothing applicable nobody is asked.
    pub fn select(
        &self,
        applicable: &'a [CodemodDescriptor],
        oracle: Option<&dyn ConfirmationOracle>,
    ) -> Result<SelectedCodemodSet<'a>> {
        let Some(oracle) = oracle.filter(|_| !applicable.is_empty()) else {
            return Ok(SelectedCodemodSet {
                codemods: applicable.iter().collect(),
            });
        };

        let choices: Vec<Choice> = applicable
            .iter()
            .map(|codemod| Choice {
                label: format!("(v{}) {}", codemod.introduced_in, codemod.id),
                description: codemod.title.clone(),
                selected: true,
            })
            .collect();

        let mut picked = oracle.multi_select(SELECT_PROMPT, &choices)?;
        picked.sort_unstable();
        picked.dedup();

        Ok(SelectedCodemodSet {
            codemods: picked
                .into_iter()
                .filter_map(|index| applicable.get(index))
                .collect(),
        })
    }
}
