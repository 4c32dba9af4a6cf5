//! Client configuration, resolved once by the front end at startup.

use crate::{ClientError, ClientResult};
use reqwest::Url;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// # Errors
    /// Returns `ClientError::Network` if `base_url` is not an absolute http(s) URL or the timeout
    /// is zero.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ClientError::Network(format!("invalid API URL '{base_url}': {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Network(format!(
                "API URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }
        if timeout.is_zero() {
            return Err(ClientError::Network("timeout must be positive".into()));
        }

        Ok(Self { base_url, timeout })
    }

    /// Build from optional environment values, falling back to the defaults.
    pub fn from_env_values(
        base_url: Option<String>,
        timeout_secs: Option<String>,
    ) -> ClientResult<Self> {
        let base_url = base_url
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let timeout_secs = match timeout_secs.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v.parse::<u64>().map_err(|e| {
                ClientError::Network(format!("invalid timeout '{v}': {e}"))
            })?,
            _ => DEFAULT_TIMEOUT_SECS,
        };
        Self::new(&base_url, Duration::from_secs(timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::from_env_values(None, None).unwrap();
        assert_eq!(cfg.base_url().as_str(), DEFAULT_API_URL);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_overrides() {
        let cfg = ClientConfig::from_env_values(
            Some("https://docs.example.com/api/".into()),
            Some(" 5 ".into()),
        )
        .unwrap();
        assert_eq!(cfg.base_url().host_str(), Some("docs.example.com"));
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ClientConfig::from_env_values(Some("not a url".into()), None).is_err());
        assert!(ClientConfig::from_env_values(Some("ftp://host/api".into()), None).is_err());
        assert!(ClientConfig::from_env_values(None, Some("soon".into())).is_err());
        assert!(ClientConfig::from_env_values(None, Some("0".into())).is_err());
    }
}
