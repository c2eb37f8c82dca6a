use indicatif::{ProgressBar, ProgressStyle};

/// Variables set by common CI providers
const CI_ENV_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

fn is_ci() -> bool {
    CI_ENV_VARS.iter().any(|var| std::env::var_os(var).is_some())
}

/// Create a spinner with a message
/// Returns a hidden spinner in CI environments
pub fn spinner(message: &str) -> ProgressBar {
    let pb = if is_ci() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };

    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Spinner only when progress output is wanted.
pub fn maybe_spinner(enabled: bool, message: &str) -> Option<ProgressBar> {
    enabled.then(|| spinner(message))
}
