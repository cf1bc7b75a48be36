///
/// This module implements the CLI interface for nexus-upload: command parsing, input
/// collection and the async entrypoint shared by `main()` and the integration tests.
///
/// All resolution and orchestration logic lives in the [`nexus-upload-core`] crate. This module
/// is strictly CLI glue.
///
/// ## Commands
/// - `upload`: resolve the `files` input and upload every file to the repository.
/// - `resolve`: resolve the `files` input and print the resulting pairs as JSON, uploading nothing.
///
/// Every input can also be supplied through the `INPUT_<NAME>` variables set by the CI runner.
///
/// [`nexus-upload-core`]: ../../nexus-upload-core/
use crate::annotations;
use crate::load_config::{load_config, ActionInputs};
use crate::upload::NexusClient;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nexus_upload_core::orchestrate::{run_uploads, EntryOutcome, UploadReport};
use nexus_upload_core::reaction::LocalFileDoesNotExistReaction;
use nexus_upload_core::resolve::resolve_delegations;
use std::path::PathBuf;

/// CLI for nexus-upload: upload local files to a Nexus repository.
#[derive(Parser)]
#[clap(
    name = "nexus-upload",
    version,
    about = "Upload local files, or globs of files, to a Nexus repository"
)]
pub struct Cli {
    /// Enable debug logging, including HTTP client traces
    #[clap(long, global = true, env = "RUNNER_DEBUG")]
    pub debug: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the files input and upload every file, one at a time
    Upload {
        #[clap(flatten)]
        inputs: InputArgs,
    },
    /// Resolve the files input and print the upload plan without uploading
    Resolve {
        #[clap(flatten)]
        inputs: InputArgs,
    },
}

/// Action inputs; flags take precedence over environment, which takes precedence over `--config`.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// YAML file with any of the inputs below, keyed by input name
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the Nexus instance
    #[clap(long, env = "INPUT_INSTANCE-URL")]
    pub instance_url: Option<String>,

    /// Target repository name
    #[clap(long, env = "INPUT_REPOSITORY")]
    pub repository: Option<String>,

    /// One delegation per line: `<local path or glob> [-> <remote path>]`
    #[clap(long, env = "INPUT_FILES", allow_hyphen_values = true)]
    pub files: Option<String>,

    /// Remote directory for lines without an explicit destination
    #[clap(long, env = "INPUT_DEFAULT-DESTINATION")]
    pub default_destination: Option<String>,

    #[clap(long, env = "INPUT_USERNAME")]
    pub username: Option<String>,

    #[clap(long, env = "INPUT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Reaction to a missing local file: fail, warn-and-ignore or ignore
    #[clap(long, env = "INPUT_IF-LOCAL-FILE-DOES-NOT-EXIST")]
    pub if_local_file_does_not_exist: Option<String>,
}

impl InputArgs {
    /// Merges flags/environment with the optional YAML file.
    pub fn into_inputs(self) -> Result<ActionInputs> {
        let from_args = ActionInputs {
            instance_url: self.instance_url,
            repository: self.repository,
            files: self.files,
            default_destination: self.default_destination,
            username: self.username,
            password: self.password,
            if_local_file_does_not_exist: self.if_local_file_does_not_exist,
        };
        match self.config {
            Some(path) => Ok(from_args.or(load_config(path)?)),
            None => Ok(from_args),
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Upload { inputs } => upload(inputs.into_inputs()?).await,
        Commands::Resolve { inputs } => resolve(inputs.into_inputs()?),
    }
}

async fn upload(inputs: ActionInputs) -> Result<()> {
    let settings = inputs.into_settings()?;
    let resolved = resolve_delegations(&settings.files, &settings.default_destination)?;
    tracing::info!(command = "upload", files = resolved.len(), "Starting upload");

    let client = NexusClient::new(
        settings.instance_url.clone(),
        settings.repository.clone(),
        settings.credentials.clone(),
    )
    .context("Failed to construct Nexus client")?;

    match run_uploads(&resolved, settings.reaction, &client).await {
        Ok(report) => {
            annotate_skipped(&report);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => tracing::debug!(json = %json, "Upload report"),
                Err(e) => tracing::error!(error = ?e, "Failed to serialize upload report"),
            }
            tracing::info!(
                command = "upload",
                succeeded = report.count(EntryOutcome::Succeeded),
                skipped = report.count(EntryOutcome::SkippedWarned)
                    + report.count(EntryOutcome::Skipped),
                "Upload complete"
            );
            Ok(())
        }
        Err(aborted) => {
            annotate_skipped(&aborted.report);
            annotations::error(&aborted.to_string());
            tracing::error!(
                command = "upload",
                not_attempted = aborted.report.count(EntryOutcome::Pending),
                "Upload aborted"
            );
            Err(aborted.into())
        }
    }
}

/// One warning per entry skipped under `warn-and-ignore`, including runs that aborted later.
fn annotate_skipped(report: &UploadReport) {
    for entry in &report.entries {
        if entry.outcome == EntryOutcome::SkippedWarned {
            annotations::warning(&format!(
                "Local file does not exist: {}",
                entry.delegation.src.display()
            ));
        }
    }
}

fn resolve(inputs: ActionInputs) -> Result<()> {
    if let Some(value) = inputs
        .if_local_file_does_not_exist
        .as_deref()
        .filter(|v| !v.trim().is_empty())
    {
        value.parse::<LocalFileDoesNotExistReaction>()?;
    }
    let files = inputs
        .files
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .context("Input required and not supplied: files")?;
    let default_destination = inputs.default_destination.as_deref().unwrap_or_default();
    let resolved = resolve_delegations(files, default_destination)?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
