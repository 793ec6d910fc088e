//! Control service client configuration.
//!
//! The base URL defaults to a locally running service. Override via
//! environment variables or explicit construction for staging/testing.

use url::Url;

/// Default base URL of the control service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to the control service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service. Paths such as `/controls` are joined onto it.
    pub base_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Build a configuration for an explicit base URL with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CFU_API_URL` (default: `http://localhost:3000`)
    /// - `CFU_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_url("CFU_API_URL", DEFAULT_BASE_URL)?,
            timeout_secs: std::env::var("CFU_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Replace the base URL, keeping the timeout.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_url("base_url", base_url)?;
        Ok(self)
    }

    /// A configuration pointing at a service on localhost (for testing).
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("localhost", &format!("http://127.0.0.1:{port}"))?,
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    parse_url(var, &raw)
}

fn parse_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            source.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_builds_valid_config() {
        let cfg = ClientConfig::local(9000).unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn default_base_url_is_localhost_3000() {
        let cfg = ClientConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(cfg.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("CFU_NONEXISTENT_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("CFU_TEST_BAD_URL", "not a url");
        let result = env_url("CFU_TEST_BAD_URL", "https://example.com");
        std::env::remove_var("CFU_TEST_BAD_URL");
        assert!(result.is_err());
    }

    #[test]
    fn with_base_url_keeps_timeout() {
        let cfg = ClientConfig::local(9000)
            .unwrap()
            .with_base_url("https://controls.example.com/api/")
            .unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.base_url.as_str(), "https://controls.example.com/api/");
    }

    #[test]
    fn new_rejects_non_base_urls() {
        assert!(ClientConfig::new("mailto:ops@example.com").is_err());
        assert!(ClientConfig::new("http://controls.internal:8080").is_ok());
    }
}
