//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend service base URLs
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub client: ClientConfig,

    /// Review list behavior
    #[serde(default)]
    pub reviews: ReviewConfig,

    /// Note download settings
    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("api.course_url", &self.api.course_url),
            ("api.notes_url", &self.api.notes_url),
            ("api.user_url", &self.api.user_url),
        ] {
            Url::parse(value)
                .map_err(|e| AppError::config(format!("{key} is not a valid URL: {e}")))?;
        }
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.client.max_concurrent == 0 {
            return Err(AppError::validation("client.max_concurrent must be > 0"));
        }
        if self.download.default_file_name.trim().is_empty() {
            return Err(AppError::validation("download.default_file_name is empty"));
        }
        Ok(())
    }
}

/// Base URLs of the three backend collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Course service (details, teacher, ratings, reviews)
    #[serde(default = "defaults::course_url")]
    pub course_url: String,

    /// Notes service (notes, note ratings, downloads, reports)
    #[serde(default = "defaults::notes_url")]
    pub notes_url: String,

    /// User service (`/users/me`)
    #[serde(default = "defaults::user_url")]
    pub user_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            course_url: defaults::course_url(),
            notes_url: defaults::notes_url(),
            user_url: defaults::user_url(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds; 0 leaves the client default (no timeout)
    #[serde(default)]
    pub timeout_secs: u64,

    /// Maximum concurrent per-note detail requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: 0,
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Review list settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Sort the currently displayed order instead of the fetch order,
    /// so consecutive sorts build on each other
    #[serde(default)]
    pub compound_sorts: bool,
}

/// Note download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Used when the response carries no usable filename
    #[serde(default = "defaults::default_file_name")]
    pub default_file_name: String,

    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            default_file_name: defaults::default_file_name(),
            output_dir: defaults::output_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // API defaults
    pub fn course_url() -> String {
        "http://localhost:8002".into()
    }
    pub fn notes_url() -> String {
        "http://localhost:8004".into()
    }
    pub fn user_url() -> String {
        "http://localhost:8001".into()
    }

    // Client defaults
    pub fn user_agent() -> String {
        "sapienza-advisor/0.1".into()
    }
    pub fn max_concurrent() -> usize {
        8
    }

    // Download defaults
    pub fn default_file_name() -> String {
        "downloaded_note".into()
    }
    pub fn output_dir() -> String {
        ".".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
