//! Gateway configuration.

use derive_builder::Builder;
use derive_getters::Getters;
use std::time::Duration;

/// Backend used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Where the backend lives and how to talk to it.
///
/// # Example
/// ```
/// use foads_gateway::GatewayConfigBuilder;
///
/// let config = GatewayConfigBuilder::default()
///     .base_url("https://abcd.ngrok-free.app/")
///     .build()
///     .unwrap();
/// assert_eq!(config.resolve("/gpu-status"), "https://abcd.ngrok-free.app/gpu-status");
/// assert_eq!(config.resolve("http://elsewhere/x"), "http://elsewhere/x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(setter(into))]
pub struct GatewayConfig {
    /// Backend base URL
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Username sent to the anonymous login endpoint
    #[builder(default = "\"demo\".to_string()")]
    login_username: String,
    /// Per-request timeout
    #[builder(default = "Duration::from_secs(60)")]
    timeout: Duration,
}

impl GatewayConfig {
    /// Config pointing at `base_url` with default settings otherwise.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL for `endpoint`. Absolute URLs pass through untouched.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            return endpoint.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if endpoint.starts_with('/') {
            format!("{}{}", base, endpoint)
        } else {
            format!("{}/{}", base, endpoint)
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            login_username: "demo".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = GatewayConfigBuilder::default().build().unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.resolve("/"), "http://localhost:5000/");
    }

    #[test]
    fn test_resolve_without_leading_slash() {
        let config = GatewayConfig::new("http://gpu:5000");
        assert_eq!(config.resolve("avatars"), "http://gpu:5000/avatars");
    }
}
