use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use engine_logging::redact;
use ranker_core::is_valid_url;
use ranker_engine::RankingSettings;
use serde::Deserialize;

use super::logging::LogDestination;

const DEFAULT_CONFIG_FILE: &str = "ranker.ron";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Optional settings file. The API key is deliberately not accepted here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    endpoint: Option<String>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    log_to_terminal: Option<bool>,
}

/// Deployment configuration, resolved once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub log_to_terminal: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("log_to_terminal", &self.log_to_terminal)
            .finish()
    }
}

impl AppConfig {
    /// Reads `.env`, the optional RON file and the process environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let path = std::env::var("RANKER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let file = read_file_config(&path)?;
        resolve(file, |key| std::env::var(key).ok())
    }

    pub fn ranking_settings(&self) -> RankingSettings {
        let mut settings = RankingSettings::new(self.endpoint.clone(), self.api_key.clone());
        settings.connect_timeout = self.connect_timeout;
        settings.request_timeout = self.request_timeout;
        settings
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_to_terminal {
            LogDestination::Both
        } else {
            LogDestination::File
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read config file {path:?}"));
        }
    };
    ron::from_str(&text).with_context(|| format!("Failed to parse config file {path:?}"))
}

fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<AppConfig> {
    let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    let endpoint = lookup("RANKER_API_URL")
        .or(file.endpoint)
        .context("Required environment variable 'RANKER_API_URL' is not set")?;
    if !is_valid_url(&endpoint) {
        bail!("RANKER_API_URL must be an absolute URL, got {endpoint:?}");
    }
    let api_key = lookup("RANKER_API_KEY")
        .context("Required environment variable 'RANKER_API_KEY' is not set")?;
    let request_timeout_secs = match lookup("RANKER_TIMEOUT_SECS") {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .context("RANKER_TIMEOUT_SECS must be a whole number of seconds")?,
        None => file
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
    };

    Ok(AppConfig {
        endpoint: endpoint.trim().to_string(),
        api_key,
        connect_timeout: Duration::from_secs(
            file.connect_timeout_secs
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        ),
        request_timeout: Duration::from_secs(request_timeout_secs),
        log_to_terminal: file.log_to_terminal.unwrap_or(false),
    })
}
