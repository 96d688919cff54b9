//! Client configuration: a YAML file, then environment and flag overrides.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use patient_roster_core::DEFAULT_PER_PAGE;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding `api_base`.
pub const API_BASE_ENV: &str = "ROSTER_API_BASE";

/// Contents of `config.yml`. Every key is optional.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(alias = "api")]
    pub api_base: Option<String>,
    pub per_page: Option<u32>,
    #[serde(alias = "timeout")]
    pub timeout_secs: Option<u64>,
}

/// Resolved settings for talking to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub per_page: u32,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            per_page: DEFAULT_PER_PAGE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Fill anything the file leaves out with the defaults.
    pub fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        Self {
            api_base: file.api_base.unwrap_or(defaults.api_base),
            per_page: file.per_page.filter(|n| *n > 0).unwrap_or(defaults.per_page),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }

    /// Apply `ROSTER_API_BASE` and then an explicit flag, in that order.
    pub fn with_overrides(mut self, api_flag: Option<&str>) -> Self {
        if let Ok(from_env) = env::var(API_BASE_ENV) {
            if !from_env.trim().is_empty() {
                self.api_base = from_env;
            }
        }
        if let Some(api) = api_flag.filter(|a| !a.trim().is_empty()) {
            self.api_base = api.to_string();
        }
        self
    }

    /// Base URL, normalized to end in `/` so relative joins keep its path.
    pub fn api_url(&self) -> ClientResult<Url> {
        let mut base = self.api_base.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base).map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".patient-roster").join("config.yml"))
}

pub fn load_config(path: &Path, allow_missing: bool) -> ClientResult<ConfigFile> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents).map_err(|e| {
            ClientError::Config(format!("failed to parse config '{}': {e}", path.display()))
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ClientError::Config(format!(
            "config file not found '{}'",
            path.display()
        ))),
        Err(e) => Err(ClientError::Config(format!(
            "failed to read config '{}': {e}",
            path.display()
        ))),
    }
}
