use std::collections::HashMap;

const NO_TTY_VAR: &str = "NEXT_UPGRADE_NO_TTY";
const FORCE_TTY_VAR: &str = "NEXT_UPGRADE_FORCE_TTY";

/// Snapshot of the process environment, taken once at startup and passed
/// explicitly to whatever needs it.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonInteractiveReason {
    ExplicitDisable,
    CiDetected { env_var: String },
    NoTerminal,
}

impl Environment {
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    #[cfg(test)]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// First non-empty value among `keys`.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    pub fn non_interactive_reason(&self, stdin_is_terminal: bool) -> Option<NonInteractiveReason> {
        if self.get(NO_TTY_VAR).is_some() {
            return Some(NonInteractiveReason::ExplicitDisable);
        }

        if self.get(FORCE_TTY_VAR).is_some() {
            return None;
        }

        if let Some(env_var) = self.detect_ci_env_var() {
            return Some(NonInteractiveReason::CiDetected { env_var });
        }

        if !stdin_is_terminal {
            return Some(NonInteractiveReason::NoTerminal);
        }

        None
    }

    fn detect_ci_env_var(&self) -> Option<String> {
        const CI_ENV_VARS: &[&str] = &[
            "CI",
            "GITHUB_ACTIONS",
            "GITLAB_CI",
            "CIRCLECI",
            "TRAVIS",
            "JENKINS_URL",
            "BUILDKITE",
            "VERCEL",
        ];

        CI_ENV_VARS
            .iter()
            .find(|var| self.get(var).is_some())
            .map(|var| (*var).to_string())
    }
}
