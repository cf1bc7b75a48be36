//! Delegation value types and the parser for the multi-line `files` input.
//!
//! Each non-blank line maps a local source pattern to an optional remote destination:
//!
//! ```text
//! target/app.jar -> releases/app-1.0.jar
//! dist/*.tar.gz  -> archives/
//! README.md
//! ```
//!
//! Lines starting with `#` are comments.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

use crate::error::DelegationError;

/// Token separating the source pattern from the destination on one line.
pub const SEPARATOR: &str = "->";

/// One line of user input, before glob expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawDelegation {
    /// Local path or glob pattern; never empty.
    pub src_pattern: String,
    /// Remote destination, `None` when the line omits it.
    pub dest: Option<String>,
}

/// A concrete upload instruction produced by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDelegation {
    /// Local file path, relative to the working directory unless the pattern was absolute.
    pub src: PathBuf,
    /// Remote path inside the repository; never empty.
    pub dest: String,
}

impl fmt::Display for ResolvedDelegation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src.display(), self.dest)
    }
}

/// Parses the raw `files` input into delegations, preserving line order.
pub fn parse_files_input(raw: &str) -> Result<Vec<RawDelegation>, DelegationError> {
    if raw.trim().is_empty() {
        return Err(DelegationError::invalid_line(0, raw, "input is empty"));
    }

    let mut delegations = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let delegation = parse_line(index + 1, line)?;
        debug!(line = index + 1, ?delegation, "Parsed delegation");
        delegations.push(delegation);
    }

    if delegations.is_empty() {
        return Err(DelegationError::invalid_line(0, raw, "input contains no delegations"));
    }
    Ok(delegations)
}

fn parse_line(number: usize, line: &str) -> Result<RawDelegation, DelegationError> {
    let mut parts = line.split(SEPARATOR);
    // `split` always yields at least one item.
    let src = parts.next().unwrap_or_default().trim();
    let dest = parts.next().map(str::trim);

    if parts.next().is_some() {
        return Err(DelegationError::invalid_line(
            number,
            line,
            format!("more than one '{SEPARATOR}' separator"),
        ));
    }
    if src.is_empty() {
        return Err(DelegationError::invalid_line(number, line, "source is empty"));
    }

    Ok(RawDelegation {
        src_pattern: src.to_string(),
        dest: dest.filter(|d| !d.is_empty()).map(str::to_string),
    })
}
