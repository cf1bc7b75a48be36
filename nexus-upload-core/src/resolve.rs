//! Turns the raw `files` input into an ordered list of concrete upload instructions.

use std::path::Path;
use tracing::{debug, info};

use crate::delegation::{parse_files_input, RawDelegation, ResolvedDelegation};
use crate::error::DelegationError;
use crate::glob::resolve_pattern;

/// Resolves `raw_input` relative to the process working directory.
///
/// See [`resolve_delegations_in`].
pub fn resolve_delegations(
    raw_input: &str,
    default_destination: &str,
) -> Result<Vec<ResolvedDelegation>, DelegationError> {
    let cwd = std::env::current_dir().map_err(|e| DelegationError::InvalidInputFormat {
        line: 0,
        content: raw_input.to_string(),
        reason: format!("cannot determine working directory: {e}"),
    })?;
    resolve_delegations_in(raw_input, default_destination, &cwd)
}

/// Parses `raw_input`, expands every source pattern against `cwd` and computes destinations.
///
/// All entries expanded from one line precede those of the next line. A line without a
/// destination uploads to `default_destination/<basename>`; a destination ending in `/`
/// uploads to `<destination><basename>`.
///
/// Returned `src` paths keep the shape of their pattern: relative patterns give paths relative
/// to `cwd`, absolute patterns give absolute paths. A caller whose working directory is not
/// `cwd` must join relative sources onto `cwd` before opening them.
pub fn resolve_delegations_in(
    raw_input: &str,
    default_destination: &str,
    cwd: &Path,
) -> Result<Vec<ResolvedDelegation>, DelegationError> {
    let default_destination = default_destination.trim();
    let delegations = parse_files_input(raw_input)?;

    let mut resolved = Vec::new();
    for delegation in &delegations {
        if delegation.dest.is_none() && default_destination.is_empty() {
            return Err(DelegationError::MissingDestination {
                pattern: delegation.src_pattern.clone(),
            });
        }

        for src in resolve_pattern(&delegation.src_pattern, cwd)? {
            let dest = destination_for(delegation, default_destination, &src);
            debug!(src = %src.display(), dest = %dest, "Resolved delegation");
            resolved.push(ResolvedDelegation { src, dest });
        }
    }

    info!(
        delegations = delegations.len(),
        files = resolved.len(),
        "Resolved files input"
    );
    Ok(resolved)
}

fn destination_for(delegation: &RawDelegation, default_destination: &str, src: &Path) -> String {
    let basename = src
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    match delegation.dest.as_deref() {
        Some(dir) if dir.ends_with('/') => format!("{dir}{basename}"),
        Some(dest) => dest.to_string(),
        None => join_remote(default_destination, &basename),
    }
}

fn join_remote(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn raw(dest: Option<&str>) -> RawDelegation {
        RawDelegation {
            src_pattern: "ignored".to_string(),
            dest: dest.map(str::to_string),
        }
    }

    #[test]
    fn explicit_destination_wins() {
        let dest = destination_for(&raw(Some("a/b.bin")), "defaults", Path::new("x/y.bin"));
        assert_eq!(dest, "a/b.bin");
    }

    #[test]
    fn directory_destination_appends_basename() {
        let dest = destination_for(&raw(Some("releases/")), "defaults", Path::new("x/y.bin"));
        assert_eq!(dest, "releases/y.bin");
    }

    #[test]
    fn default_destination_joins_with_single_slash() {
        let src = PathBuf::from("target/app.jar");
        assert_eq!(destination_for(&raw(None), "libs/", &src), "libs/app.jar");
        assert_eq!(destination_for(&raw(None), "libs", &src), "libs/app.jar");
    }

    #[test]
    fn missing_destination_fails_before_expansion() {
        let err = resolve_delegations_in("with.txt -> dest\nno-dest/*.txt", "  ", Path::new("/nonexistent"))
            .unwrap_err();
        assert_eq!(
            err,
            DelegationError::MissingDestination {
                pattern: "no-dest/*.txt".to_string()
            }
        );
    }
}
