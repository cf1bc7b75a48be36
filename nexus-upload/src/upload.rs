#![doc = "Uploader integration for CLI and core: implements the core `Uploader` trait against a Nexus repository over HTTP."]
//
//! # Uploader Integration (CLI <-> Core)
//!
//! This module wires the [`Uploader`] trait from [`nexus_upload_core::contract`] to a real
//! Nexus instance. Files are sent with `PUT {instance}/repository/{repository}/{dest}`, which
//! is how Nexus accepts uploads into raw hosted repositories.
//!
//! - The local file is opened before any request is made, so a missing file is reported as
//!   [`UploadError::LocalFileMissing`] without touching the network. The body is streamed
//!   from disk rather than buffered.
//! - Credentials are optional; when a username is configured every request carries HTTP basic
//!   auth.

use async_trait::async_trait;
use nexus_upload_core::contract::{UploadError, Uploader};
use reqwest::header::CONTENT_LENGTH;
use reqwest::Url;
use std::fmt;
use std::io::{self, ErrorKind};
use std::path::Path;

/// Username and password for HTTP basic auth.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct NexusClient {
    http: reqwest::Client,
    instance_url: Url,
    repository: String,
    credentials: Option<Credentials>,
}

impl NexusClient {
    pub fn new(
        instance_url: Url,
        repository: impl Into<String>,
        credentials: Option<Credentials>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("nexus-upload/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let repository = repository.into();
        tracing::info!(
            instance_url = %instance_url,
            repository = %repository,
            authenticated = credentials.is_some(),
            "Initialized NexusClient"
        );
        Ok(NexusClient {
            http,
            instance_url,
            repository,
            credentials,
        })
    }

    /// The URL a file uploaded to `dest` is stored at.
    ///
    /// `dest` is split on `/` and every segment is percent-encoded, so `#`, `?` and `%` in file
    /// names stay part of the path. `.` and `..` segments are rejected.
    pub fn upload_url(&self, dest: &str) -> Result<Url, UploadError> {
        let invalid = |reason: &str| UploadError::InvalidDestination {
            dest: dest.to_string(),
            reason: reason.to_string(),
        };

        let segments: Vec<&str> = dest.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(invalid("destination has no path segments"));
        }
        if segments.iter().any(|s| *s == "." || *s == "..") {
            return Err(invalid("'.' and '..' segments are not allowed"));
        }

        let mut url = self.instance_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| invalid("instance-url has no path to extend"))?
            .pop_if_empty()
            .push("repository")
            .push(&self.repository)
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl Uploader for NexusClient {
    async fn upload_file(&self, src: &Path, dest: &str) -> Result<(), UploadError> {
        let url = self.upload_url(dest)?;

        let file = match tokio::fs::File::open(src).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(UploadError::LocalFileMissing {
                    path: src.to_path_buf(),
                });
            }
            Err(e) => return Err(local_io(src, e)),
        };
        let metadata = file.metadata().await.map_err(|e| local_io(src, e))?;
        if !metadata.is_file() {
            return Err(local_io(
                src,
                io::Error::new(ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        tracing::info!(
            src = %src.display(),
            url = %url,
            bytes = metadata.len(),
            "Uploading file"
        );

        let mut request = self
            .http
            .put(url.clone())
            .header(CONTENT_LENGTH, metadata.len())
            .body(file);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Upload request failed");
            UploadError::Transport {
                dest: dest.to_string(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), url = %url, "Upload accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = status.as_u16(), url = %url, body = %body, "Upload rejected");
        Err(UploadError::Rejected {
            dest: dest.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

fn local_io(src: &Path, e: io::Error) -> UploadError {
    tracing::error!(error = ?e, src = %src.display(), "Failed to read local file");
    UploadError::LocalIo {
        path: src.to_path_buf(),
        source: e,
    }
}
