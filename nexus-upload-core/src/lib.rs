#![doc = "nexus-upload-core: core logic library for nexus-upload."]

//! This crate contains delegation parsing, glob resolution and the sequential upload
//! orchestrator. Transport to the remote repository is not included here; it is plugged in
//! through [`contract::Uploader`].
//!
//! # Usage
//! Resolve the `files` input with [`resolve::resolve_delegations`], then drive the uploads
//! with [`orchestrate::run_uploads`].

pub mod contract;
pub mod delegation;
pub mod error;
pub mod glob;
pub mod orchestrate;
pub mod reaction;
pub mod resolve;

pub use contract::{UploadError, Uploader};
pub use delegation::{RawDelegation, ResolvedDelegation};
pub use error::DelegationError;
pub use orchestrate::{run_uploads, EntryOutcome, UploadAborted, UploadReport};
pub use reaction::LocalFileDoesNotExistReaction;
pub use resolve::{resolve_delegations, resolve_delegations_in};
