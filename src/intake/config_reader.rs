use std::env;
use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::intake::{BIntakeResult, OpeningConfigSnafu, ParsingConfigSnafu};

/// Default directory for the per-respondent artifacts.
pub const DEFAULT_USER_FILES_DIR: &str = "skills_user";

/// Environment variable consulted for the upload endpoint when the
/// configuration file does not name one.
pub const UPLOAD_URL_ENV: &str = "GENERIC_SHAREPOINT_UPLOAD_API_URL";

/// Default environment variable holding the upload bearer token. The token
/// itself never appears in the configuration file.
pub const DEFAULT_API_KEY_ENV: &str = "GENERIC_SHAREPOINT_API_KEY";

const DEFAULT_FORWARDING_TIMEOUT_SECONDS: u64 = 30;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "userFilesDir")]
    pub user_files_dir: Option<String>,
    #[serde(rename = "artifactFormat")]
    pub artifact_format: Option<String>,
}

impl OutputSettings {
    pub fn dir(&self) -> &str {
        self.user_files_dir.as_deref().unwrap_or(DEFAULT_USER_FILES_DIR)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForwardingSettings {
    #[serde(rename = "uploadUrl")]
    pub upload_url: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: Option<String>,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: Option<u64>,
}

impl ForwardingSettings {
    /// The upload endpoint: the configuration file first, then the
    /// environment.
    pub fn url(&self) -> Option<String> {
        self.upload_url
            .clone()
            .or_else(|| env::var(UPLOAD_URL_ENV).ok())
    }

    /// The bearer token, read from the configured environment variable.
    /// Missing variables yield an empty token; the remote side rejects it.
    pub fn api_key(&self) -> String {
        let var = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
        env::var(var).unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_seconds
                .unwrap_or(DEFAULT_FORWARDING_TIMEOUT_SECONDS),
        )
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeConfig {
    #[serde(rename = "outputSettings", default)]
    pub output: OutputSettings,
    #[serde(rename = "forwarding", default)]
    pub forwarding: ForwardingSettings,
}

pub fn read_config(path: &str) -> BIntakeResult<IntakeConfig> {
    let contents = fs::read_to_string(path).context(OpeningConfigSnafu { path })?;
    let config: IntakeConfig =
        serde_json::from_str(&contents).context(ParsingConfigSnafu { path })?;
    Ok(config)
}
