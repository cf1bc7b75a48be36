//! Expansion of source patterns into concrete local file paths.
//!
//! A pattern containing any of `*`, `?`, `[` or `{` is a wildcard pattern; anything else is a
//! literal path and is returned as-is, without checking that it exists. Existence is the
//! uploader's concern so that a missing file is handled by the reaction policy in one place.
//!
//! Wildcard syntax follows `globset` with `literal_separator` enabled: `*`, `?` and `[...]`
//! stay within one path segment, `**` crosses segments and `{a,b}` alternates.

use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::DelegationError;

const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

/// Returns `true` when `pattern` contains wildcard characters.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(&GLOB_META[..])
}

/// Resolves `pattern` against `cwd` into an ordered list of local paths.
///
/// Literal patterns yield exactly one path. Wildcard patterns yield every regular file that
/// matches, in lexical walk order; no match (or a missing base directory) yields an empty list.
pub fn resolve_pattern(pattern: &str, cwd: &Path) -> Result<Vec<PathBuf>, DelegationError> {
    if !is_glob_pattern(pattern) {
        return Ok(vec![PathBuf::from(pattern)]);
    }

    let (base, rest) = split_base(pattern);
    let matcher = compile(pattern, &rest)?;
    let root = cwd.join(&base);
    if !root.is_dir() {
        debug!(pattern, root = %root.display(), "Glob base directory does not exist");
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if !rest.contains("**") {
        walker = walker.max_depth(rest.split('/').count());
    }

    let mut matches = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(pattern, error = %e, "Skipping unreadable entry while expanding glob");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        if matcher.is_match(to_slash(relative)) {
            matches.push(base.join(relative));
        }
    }

    debug!(pattern, count = matches.len(), "Expanded glob pattern");
    Ok(matches)
}

/// Splits a pattern into its leading literal directory and the wildcard remainder.
fn split_base(pattern: &str) -> (PathBuf, String) {
    let segments: Vec<&str> = pattern.split('/').collect();
    let literal = segments
        .iter()
        .take_while(|segment| !is_glob_pattern(segment))
        .count();
    let base = segments[..literal].join("/");
    let rest = segments[literal..].join("/");
    (PathBuf::from(base), rest)
}

fn compile(pattern: &str, glob: &str) -> Result<GlobMatcher, DelegationError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| DelegationError::InvalidGlobPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_wildcards() {
        assert!(is_glob_pattern("dist/*.jar"));
        assert!(is_glob_pattern("file?.txt"));
        assert!(is_glob_pattern("out/[ab].bin"));
        assert!(is_glob_pattern("pkg.{zip,tar}"));
        assert!(!is_glob_pattern("target/release/app"));
    }

    #[test]
    fn splits_literal_prefix() {
        let (base, rest) = split_base("build/out/**/*.jar");
        assert_eq!(base, PathBuf::from("build/out"));
        assert_eq!(rest, "**/*.jar");

        let (base, rest) = split_base("*.txt");
        assert_eq!(base, PathBuf::from(""));
        assert_eq!(rest, "*.txt");
    }

    #[test]
    fn literal_path_is_returned_even_if_missing() {
        let cwd = Path::new("/definitely/not/here");
        let resolved = resolve_pattern("missing.txt", cwd).unwrap();
        assert_eq!(resolved, vec![PathBuf::from("missing.txt")]);
    }

    #[test]
    fn invalid_glob_is_reported() {
        let err = resolve_pattern("dist/[a.txt", Path::new(".")).unwrap_err();
        assert!(matches!(err, DelegationError::InvalidGlobPattern { .. }), "{err:?}");
    }
}
