//! # contract: the upload capability consumed by the orchestrator
//!
//! This module defines a single trait ([`Uploader`]) for sending one local file to one remote
//! path, and the [`UploadError`] taxonomy it reports. The orchestrator only needs to tell a
//! missing local file apart from every other failure; everything else about transport,
//! authentication and repository layout belongs to the implementor.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests can script per-file outcomes with
//!   `MockUploader` (enabled under `test` or the `test-export-mocks` feature).

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[allow(unused_imports)]
use mockall::automock;

/// Failure of a single upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The resolved local file does not exist. The only failure governed by the reaction policy.
    #[error("Local file does not exist: {}", .path.display())]
    LocalFileMissing {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The local file exists but could not be read.
    #[error("Cannot read local file {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination cannot be mapped to a path inside the repository.
    #[error("Invalid destination {dest:?}: {reason}")]
    InvalidDestination { dest: String, reason: String },

    /// The repository answered with a non-success status.
    #[error("Upload to {dest} rejected with HTTP {status}: {body}")]
    Rejected {
        dest: String,
        status: u16,
        body: String,
    },

    /// The request did not complete (connection, TLS, timeout, ...).
    #[error("Upload to {dest} failed: {message}")]
    Transport { dest: String, message: String },
}

impl UploadError {
    /// `true` when the reaction policy decides what happens next.
    pub fn is_local_file_missing(&self) -> bool {
        matches!(self, UploadError::LocalFileMissing { .. })
    }
}

/// Trait for uploading a single file into the target repository.
///
/// Implementors must check that `src` exists before sending anything and report
/// [`UploadError::LocalFileMissing`] when it does not.
///
/// The trait is `Send` + `Sync` and intended for async/await usage.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload the file at `src` to `dest`, a path relative to the repository root.
    async fn upload_file(&self, src: &std::path::Path, dest: &str) -> Result<(), UploadError>;
}
