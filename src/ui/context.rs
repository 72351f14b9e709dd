//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// CI indicators checked in addition to `CI`
const CI_VARS: &[&str] = &[
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// UI context that determines output behavior
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        let tty = std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
        Self {
            interactive: tty && !Self::running_in_ci(),
        }
    }

    /// Create a non-interactive context (for testing or explicit CI mode)
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Check if we should use fancy output
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    /// Whether a CI runner environment is detected
    pub fn running_in_ci() -> bool {
        std::env::var_os("CI").is_some() || CI_VARS.iter().any(|v| std::env::var_os(v).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serial_test::serial;

    #[test]
    fn non_interactive_context() {
        let ctx = UiContext::non_interactive();
        assert!(!ctx.use_fancy_output());
    }

    #[test]
    #[serial]
    fn ci_env_disables_fancy_output() {
        let previous = std::env::var_os("CI");
        std::env::set_var("CI", "true");

        assert!(UiContext::running_in_ci());
        assert!(!UiContext::detect().use_fancy_output());

        match previous {
            Some(value) => std::env::set_var("CI", value),
            None => std::env::remove_var("CI"),
        }
    }
}
