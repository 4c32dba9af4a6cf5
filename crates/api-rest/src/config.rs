//! REST server configuration, resolved once at startup.

use axum::http::HeaderValue;
use std::path::{Path, PathBuf};

/// Default bind address of the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default directory holding the static entry page.
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Name of the page served for every path that is not an API route or an existing file.
pub const ENTRY_PAGE: &str = "index.html";

#[derive(Clone, Debug)]
pub struct RestConfig {
    addr: String,
    public_dir: PathBuf,
    cors_origin: Option<HeaderValue>,
}

impl RestConfig {
    /// Create a new `RestConfig`.
    ///
    /// `cors_origin` restricts cross-origin requests to one origin; `None` allows any origin.
    ///
    /// # Errors
    /// Returns an error if the address is empty or the origin is not a valid header value.
    pub fn new(
        addr: impl Into<String>,
        public_dir: PathBuf,
        cors_origin: Option<String>,
    ) -> anyhow::Result<Self> {
        let addr = addr.into();
        if addr.trim().is_empty() {
            anyhow::bail!("REST address cannot be empty");
        }

        let cors_origin = cors_origin
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .map(|o| HeaderValue::from_str(&o))
            .transpose()
            .map_err(|e| anyhow::anyhow!("invalid CORS origin: {e}"))?;

        Ok(Self {
            addr,
            public_dir,
            cors_origin,
        })
    }

    /// Build from optional environment values, falling back to the defaults.
    pub fn from_env_values(
        addr: Option<String>,
        public_dir: Option<String>,
        cors_origin: Option<String>,
    ) -> anyhow::Result<Self> {
        let addr = addr.unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        let public_dir = public_dir
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PUBLIC_DIR.into());
        Self::new(addr, PathBuf::from(public_dir), cors_origin)
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn cors_origin(&self) -> Option<&HeaderValue> {
        self.cors_origin.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_values_defaults() {
        let cfg = RestConfig::from_env_values(None, None, None).unwrap();
        assert_eq!(cfg.addr(), DEFAULT_REST_ADDR);
        assert_eq!(cfg.public_dir(), Path::new(DEFAULT_PUBLIC_DIR));
        assert!(cfg.cors_origin().is_none());
    }

    #[test]
    fn test_blank_cors_origin_means_permissive() {
        let cfg = RestConfig::from_env_values(None, None, Some("  ".into())).unwrap();
        assert!(cfg.cors_origin().is_none());
    }

    #[test]
    fn test_cors_origin_is_kept() {
        let cfg = RestConfig::from_env_values(
            Some("127.0.0.1:8080".into()),
            Some("static".into()),
            Some("https://docs.example.com".into()),
        )
        .unwrap();
        assert_eq!(cfg.addr(), "127.0.0.1:8080");
        assert_eq!(cfg.public_dir(), Path::new("static"));
        assert_eq!(
            cfg.cors_origin().unwrap(),
            &HeaderValue::from_static("https://docs.example.com")
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(RestConfig::new(" ", PathBuf::from("public"), None).is_err());
        assert!(RestConfig::new(
            "0.0.0.0:3000",
            PathBuf::from("public"),
            Some("bad\norigin".into())
        )
        .is_err());
    }
}
