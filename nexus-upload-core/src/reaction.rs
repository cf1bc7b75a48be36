//! Reaction to a resolved local file that does not exist at upload time.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::DelegationError;

/// Behaviour selected once per run through the `if-local-file-does-not-exist` input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocalFileDoesNotExistReaction {
    /// Abort the run, leaving remaining entries unattempted.
    #[default]
    Fail,
    /// Log a warning and continue with the next entry.
    WarnAndIgnore,
    /// Continue with the next entry; only a debug log is written.
    Ignore,
}

impl LocalFileDoesNotExistReaction {
    /// Every variant, in the order they are listed to users.
    pub const ALL: [Self; 3] = [Self::Fail, Self::WarnAndIgnore, Self::Ignore];

    /// The configuration value naming this reaction.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fail => "fail",
            Self::WarnAndIgnore => "warn-and-ignore",
            Self::Ignore => "ignore",
        }
    }

    /// All accepted configuration values.
    pub fn allowed_values() -> Vec<&'static str> {
        Self::ALL.iter().map(|r| r.as_str()).collect()
    }
}

impl fmt::Display for LocalFileDoesNotExistReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocalFileDoesNotExistReaction {
    type Err = DelegationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fail" => Ok(Self::Fail),
            "warn-and-ignore" => Ok(Self::WarnAndIgnore),
            "ignore" => Ok(Self::Ignore),
            other => Err(DelegationError::InvalidReactionValue {
                value: other.to_string(),
                allowed: Self::allowed_values(),
            }),
        }
    }
}
