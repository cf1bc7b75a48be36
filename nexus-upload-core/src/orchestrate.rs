//! Sequential upload of resolved delegations.
//!
//! Entries are processed strictly one at a time and in order; each upload settles before the
//! next begins. Per entry the state moves `Pending → uploading → Succeeded | SkippedWarned |
//! Skipped | AbortedFatal`, and the first `AbortedFatal` halts the run.
//!
//! # Error Handling
//! - A missing local file is handed to the [`LocalFileDoesNotExistReaction`].
//! - Every other upload failure aborts the run whatever the policy.
//!
//! # Navigation
//! - Main entrypoint: [`run_uploads`]
//! - Supporting types: [`UploadReport`], [`EntryOutcome`], [`UploadAborted`].

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::contract::{UploadError, Uploader};
use crate::delegation::ResolvedDelegation;
use crate::reaction::LocalFileDoesNotExistReaction;

/// What happened to one resolved delegation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOutcome {
    /// Not attempted because an earlier entry aborted the run.
    Pending,
    Succeeded,
    /// Local file missing, reported as a warning.
    SkippedWarned,
    /// Local file missing, skipped silently.
    Skipped,
    /// This entry stopped the run.
    AbortedFatal,
}

/// Outcome of every entry, in upload order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadReport {
    pub entries: Vec<EntryReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub delegation: ResolvedDelegation,
    pub outcome: EntryOutcome,
}

impl UploadReport {
    /// Number of entries with the given outcome.
    pub fn count(&self, outcome: EntryOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    pub fn outcomes(&self) -> Vec<EntryOutcome> {
        self.entries.iter().map(|e| e.outcome).collect()
    }
}

/// A fatal upload failure that halted the run.
#[derive(Debug, Error)]
#[error("Upload of {delegation} aborted the run: {source}")]
pub struct UploadAborted {
    /// Every entry, with the failing one `AbortedFatal` and the rest `Pending`.
    pub report: UploadReport,
    pub delegation: ResolvedDelegation,
    #[source]
    pub source: UploadError,
}

/// Uploads every entry of `resolved` in order through `uploader`.
///
/// Returns the report when all entries settled without a fatal error. Otherwise returns
/// [`UploadAborted`]; entries after the failing one are never attempted.
pub async fn run_uploads<U>(
    resolved: &[ResolvedDelegation],
    policy: LocalFileDoesNotExistReaction,
    uploader: &U,
) -> Result<UploadReport, UploadAborted>
where
    U: Uploader + ?Sized,
{
    info!(entries = resolved.len(), %policy, "Starting uploads");

    let mut report = UploadReport {
        entries: resolved
            .iter()
            .map(|delegation| EntryReport {
                delegation: delegation.clone(),
                outcome: EntryOutcome::Pending,
            })
            .collect(),
    };

    for (index, delegation) in resolved.iter().enumerate() {
        debug!(index, %delegation, "Processing delegation");

        let settled = match uploader.upload_file(&delegation.src, &delegation.dest).await {
            Ok(()) => {
                info!(src = %delegation.src.display(), dest = %delegation.dest, "Uploaded");
                Ok(EntryOutcome::Succeeded)
            }
            Err(e) if e.is_local_file_missing() => match policy {
                LocalFileDoesNotExistReaction::Fail => Err(e),
                LocalFileDoesNotExistReaction::WarnAndIgnore => {
                    warn!(error = %e, "Local file missing, skipping");
                    Ok(EntryOutcome::SkippedWarned)
                }
                LocalFileDoesNotExistReaction::Ignore => {
                    debug!(error = %e, "Local file missing, skipping silently");
                    Ok(EntryOutcome::Skipped)
                }
            },
            Err(e) => Err(e),
        };

        match settled {
            Ok(outcome) => report.entries[index].outcome = outcome,
            Err(e) => {
                error!(%delegation, error = %e, "Upload failed, aborting");
                report.entries[index].outcome = EntryOutcome::AbortedFatal;
                return Err(UploadAborted {
                    report,
                    delegation: delegation.clone(),
                    source: e,
                });
            }
        }
    }

    info!(
        succeeded = report.count(EntryOutcome::Succeeded),
        skipped = report.count(EntryOutcome::SkippedWarned) + report.count(EntryOutcome::Skipped),
        "All uploads settled"
    );
    Ok(report)
}
