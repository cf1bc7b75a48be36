/// `load_config` module: collects the action inputs and validates them into [`UploadSettings`].
///
/// Inputs come from three places, highest precedence first:
/// 1. command-line flags,
/// 2. `INPUT_<NAME>` environment variables set by the CI runner (clap reads these),
/// 3. an optional YAML file passed with `--config`, using the input names as keys.
///
/// Values are plain strings until [`ActionInputs::into_settings`] checks them. Validation runs
/// in a fixed order: the reaction policy first, then the instance URL and repository, so a bad
/// policy is reported before the `files` input is ever parsed.
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{anyhow, bail, Context, Result};
use nexus_upload_core::reaction::LocalFileDoesNotExistReaction;
use regex::Regex;
use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::upload::Credentials;

/// Allowed characters for a Nexus repository name.
pub const REPOSITORY_PATTERN: &str = r"^[a-z0-9~._+-]+$";

/// Raw, unvalidated action inputs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ActionInputs {
    pub instance_url: Option<String>,
    pub repository: Option<String>,
    pub files: Option<String>,
    pub default_destination: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub if_local_file_does_not_exist: Option<String>,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub instance_url: Url,
    pub repository: String,
    /// The raw `files` input; resolution happens after validation.
    pub files: String,
    pub default_destination: String,
    pub credentials: Option<Credentials>,
    pub reaction: LocalFileDoesNotExistReaction,
}

/// Loads a YAML file of action inputs.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ActionInputs> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading inputs from file");

    let content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow!("Failed to read config file {:?}: {}", path_ref, e));
        }
    };

    match serde_yaml::from_str::<Option<ActionInputs>>(&content) {
        Ok(inputs) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            Ok(inputs.unwrap_or_default())
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

impl ActionInputs {
    /// Fills every input missing (or blank) in `self` from `fallback`.
    pub fn or(self, fallback: ActionInputs) -> ActionInputs {
        fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
            primary.filter(|v| !v.trim().is_empty()).or(fallback)
        }
        ActionInputs {
            instance_url: pick(self.instance_url, fallback.instance_url),
            repository: pick(self.repository, fallback.repository),
            files: pick(self.files, fallback.files),
            default_destination: pick(self.default_destination, fallback.default_destination),
            username: pick(self.username, fallback.username),
            password: pick(self.password, fallback.password),
            if_local_file_does_not_exist: pick(
                self.if_local_file_does_not_exist,
                fallback.if_local_file_does_not_exist,
            ),
        }
    }

    /// Validates the inputs. The `files` input is only checked for presence here.
    pub fn into_settings(self) -> Result<UploadSettings> {
        let reaction = match non_empty(self.if_local_file_does_not_exist.as_deref()) {
            Some(value) => value.parse::<LocalFileDoesNotExistReaction>()?,
            None => LocalFileDoesNotExistReaction::default(),
        };

        let instance_url = required("instance-url", self.instance_url.as_deref())?;
        let instance_url = Url::parse(instance_url)
            .with_context(|| format!("Invalid instance-url: {instance_url}"))?;
        if !matches!(instance_url.scheme(), "http" | "https") {
            bail!("Invalid instance-url: {instance_url} (expected http or https)");
        }

        let repository = required("repository", self.repository.as_deref())?;
        if !Regex::new(REPOSITORY_PATTERN)?.is_match(repository) {
            bail!("Invalid repository name: {repository}");
        }
        let repository = repository.to_string();

        let files = required("files", self.files.as_deref())?.to_string();

        let default_destination = self
            .default_destination
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let credentials = non_empty(self.username.as_deref()).map(|username| Credentials {
            username: username.to_string(),
            password: self.password.clone().unwrap_or_default(),
        });

        info!(
            instance_url = %instance_url,
            repository = %repository,
            %reaction,
            default_destination = %default_destination,
            authenticated = credentials.is_some(),
            "Inputs validated"
        );

        Ok(UploadSettings {
            instance_url,
            repository,
            files,
            default_destination,
            credentials,
            reaction,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    non_empty(value).ok_or_else(|| anyhow!("Input required and not supplied: {name}"))
}
