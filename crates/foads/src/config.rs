//! Layered client configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `$XDG_CONFIG_HOME/foads/config.toml`, or the file given explicitly
//! 3. `FOADS_*` environment variables, with `__` separating nested keys
//!    (`FOADS_POLL__MAX_ATTEMPTS=40`)
//!
//! ```toml
//! api_url = "https://abcd.ngrok-free.app"
//! username = "demo"
//! request_timeout_secs = 120
//!
//! [poll]
//! interval_secs = 5
//! max_attempts = 120
//! ```

use derive_getters::Getters;
use foads_error::ConfigError;
use foads_gateway::{DEFAULT_BASE_URL, GatewayConfig, GatewayConfigBuilder};
use foads_jobs::{PollConfig, PollConfigBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "FOADS";

/// File name of the local asset database.
pub const DATABASE_FILE: &str = "assets.db";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct FoadsConfig {
    /// Backend base URL
    api_url: String,
    /// Directory holding the asset database; platform data dir when unset
    data_dir: Option<PathBuf>,
    /// Username for anonymous login
    username: String,
    /// Previously issued token to start the session with
    token: Option<String>,
    /// Per-request timeout in seconds
    request_timeout_secs: u64,
    /// Follow video jobs over the push channel; poll when false
    use_push_channel: bool,
    /// Polling schedule
    poll: PollSettings,
    /// UI preference carried for front ends; the CLI ignores it
    sound_enabled: bool,
}

impl Default for FoadsConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            data_dir: None,
            username: "demo".to_string(),
            token: None,
            request_timeout_secs: 120,
            use_push_channel: true,
            poll: PollSettings::default(),
            sound_enabled: true,
        }
    }
}

/// `[poll]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct PollSettings {
    /// Seconds before the first re-check
    interval_secs: u64,
    /// Growth factor between checks
    multiplier: f64,
    /// Longest wait between checks, in seconds
    max_interval_secs: u64,
    /// Checks before giving up
    max_attempts: usize,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            multiplier: 1.5,
            max_interval_secs: 30,
            max_attempts: 120,
        }
    }
}

impl FoadsConfig {
    /// Default config file location, `$XDG_CONFIG_HOME/foads/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("foads").join("config.toml"))
    }

    /// Load from the default file (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path().as_deref(), None)
    }

    /// Load from `file` and either `env` or the process environment.
    ///
    /// A missing `file` is fine; a malformed one is an error.
    pub fn load_from(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            debug!(path = %path.display(), "Reading config file");
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let loaded: Self = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ConfigError::new(format!("Invalid configuration: {}", e)))?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::new(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.poll.max_attempts == 0 {
            return Err(ConfigError::new("poll.max_attempts must be at least 1"));
        }
        if !self.poll.multiplier.is_finite() || self.poll.multiplier <= 0.0 {
            return Err(ConfigError::new("poll.multiplier must be positive"));
        }
        Ok(())
    }

    /// Same config pointing at another backend.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Same config storing assets under `data_dir`.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    /// Path of the asset database.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        let dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|dir| dir.join("foads"))
                .ok_or_else(|| ConfigError::new("No data directory; set FOADS_DATA_DIR"))?,
        };
        Ok(dir.join(DATABASE_FILE))
    }

    /// Gateway settings derived from this config.
    pub fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        GatewayConfigBuilder::default()
            .base_url(self.api_url.clone())
            .login_username(self.username.clone())
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))
    }

    /// Polling schedule derived from this config.
    pub fn poll_config(&self) -> Result<PollConfig, ConfigError> {
        PollConfigBuilder::default()
            .initial_interval(Duration::from_secs(self.poll.interval_secs))
            .multiplier(self.poll.multiplier)
            .max_interval(Duration::from_secs(self.poll.max_interval_secs))
            .max_attempts(self.poll.max_attempts)
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))
    }
}
