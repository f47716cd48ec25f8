use crate::error::{Result, UpgradeError};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, MultiSelect};

/// One selectable entry of a multi-select question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub description: String,
    pub selected: bool,
}

/// The prompt layer. Answers are either a decision or `UserCancelled`.
pub trait ConfirmationOracle {
    fn confirm(&self, question: &str, default: bool) -> Result<bool>;

    /// Returns the indices of the chosen entries.
    fn multi_select(&self, question: &str, choices: &[Choice]) -> Result<Vec<usize>>;
}

/// Manages prompts on the terminal
///
/// Escape or `q` on any prompt cancels the whole upgrade.
pub struct TerminalOracle {
    theme: ColorfulTheme,
}

impl TerminalOracle {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationOracle for TerminalOracle {
    fn confirm(&self, question: &str, default: bool) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(default)
            .interact_opt()
            .map_err(prompt_error)?;

        answer.ok_or(UpgradeError::UserCancelled)
    }

    fn multi_select(&self, question: &str, choices: &[Choice]) -> Result<Vec<usize>> {
        for choice in choices {
            println!("  {} {}", choice.label.white().bold(), choice.description.dimmed());
        }

        let items: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        let defaults: Vec<bool> = choices.iter().map(|c| c.selected).collect();

        let selection = MultiSelect::with_theme(&self.theme)
            .with_prompt(question)
            .items(&items)
            .defaults(&defaults)
            .interact_opt()
            .map_err(prompt_error)?;

        selection.ok_or(UpgradeError::UserCancelled)
    }
}

fn prompt_error(err: dialoguer::Error) -> UpgradeError {
    match err {
        dialoguer::Error::IO(io_err) => UpgradeError::Io(io_err),
    }
}
