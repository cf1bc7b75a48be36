//! Startup errors: everything that can go wrong before the first upload starts.

use thiserror::Error;

/// Errors raised while parsing inputs and resolving delegations.
///
/// All variants are fatal and are surfaced before any upload begins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DelegationError {
    /// The `files` input, or one of its lines, cannot be parsed.
    #[error("Invalid files input at line {line}: {reason} (got {content:?})")]
    InvalidInputFormat {
        /// 1-based line number; 0 when the input as a whole is rejected.
        line: usize,
        /// The offending line, untrimmed.
        content: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A wildcard source pattern is not valid glob syntax.
    #[error("Invalid glob pattern {pattern:?}: {reason}")]
    InvalidGlobPattern {
        /// The pattern as written by the user.
        pattern: String,
        /// Parser message.
        reason: String,
    },

    /// A delegation omits its destination and no default destination is set.
    #[error("No destination for {pattern:?}: give one explicitly or set a default destination")]
    MissingDestination {
        /// The source pattern lacking a destination.
        pattern: String,
    },

    /// The reaction policy value is not one of the allowed values.
    #[error("Invalid value {value:?} for if-local-file-does-not-exist. Allowed values are: {}", .allowed.join(", "))]
    InvalidReactionValue {
        /// The rejected value.
        value: String,
        /// Every accepted value, in declaration order.
        allowed: Vec<&'static str>,
    },
}

impl DelegationError {
    pub(crate) fn invalid_line(line: usize, content: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInputFormat {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }
}
