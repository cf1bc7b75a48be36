//! Workflow commands understood by the CI runner (`::warning::`, `::error::`).
//!
//! Commands are only written when running inside GitHub Actions; elsewhere the tracing output
//! already carries the same information.

use std::env;

/// Kind of annotation shown in the workflow summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warning,
    Error,
}

impl Level {
    fn command(self) -> &'static str {
        match self {
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

/// `true` when the process runs as a GitHub Actions step.
pub fn is_ci_runner() -> bool {
    env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// Renders a workflow command line for `message`.
pub fn format_command(level: Level, message: &str) -> String {
    format!("::{}::{}", level.command(), escape_data(message))
}

pub fn warning(message: &str) {
    emit(Level::Warning, message);
}

pub fn error(message: &str) {
    emit(Level::Error, message);
}

fn emit(level: Level, message: &str) {
    if is_ci_runner() {
        println!("{}", format_command(level, message));
    }
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
