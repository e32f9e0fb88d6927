//! Configuration types for registry client.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::RegistryError;

/// Registry used when no URL is configured.
pub const DEFAULT_REGISTRY_URL: &str = "http://127.0.0.1:5000";

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry base URL (e.g., "<http://127.0.0.1:5000>"), without trailing slash.
    pub url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// TLS configuration for private registries.
    pub tls: Option<TlsConfig>,

    /// User agent string.
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

impl RegistryConfig {
    /// Creates a new registry configuration with the given URL.
    ///
    /// Trailing slashes are removed so paths can be appended directly.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagsweep_registry::RegistryConfig;
    ///
    /// let config = RegistryConfig::new("https://registry.example.com/");
    /// assert_eq!(config.url, "https://registry.example.com");
    /// ```
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            tls: None,
            user_agent: format!("tagsweep/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the TLS configuration.
    #[must_use]
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks that the URL is an absolute `http`/`https` URL.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidUrl`] otherwise.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let parsed = url::Url::parse(&self.url).map_err(|_| RegistryError::InvalidUrl {
            url: self.url.clone(),
        })?;

        match parsed.scheme() {
            "http" | "https" if parsed.has_host() => Ok(()),
            _ => Err(RegistryError::InvalidUrl {
                url: self.url.clone(),
            }),
        }
    }
}

/// TLS configuration for registries with private certificates.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// Path to CA certificate file.
    pub ca_cert: Option<PathBuf>,

    /// Whether to skip certificate verification (NOT recommended for production).
    pub insecure_skip_verify: bool,
}

impl TlsConfig {
    /// Creates a new TLS configuration with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ca_cert: None,
            insecure_skip_verify: false,
        }
    }

    /// Sets the CA certificate path.
    #[must_use]
    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    /// Enables insecure mode (skips certificate verification).
    ///
    /// # Warning
    ///
    /// This should only be used for testing. Never use in production.
    #[must_use]
    pub const fn insecure(mut self) -> Self {
        self.insecure_skip_verify = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = RegistryConfig::new("https://example.com");
        assert_eq!(config.url, "https://example.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.tls.is_none());
        assert!(config.user_agent.starts_with("tagsweep/"));
    }

    #[test]
    fn test_config_default_is_loopback() {
        let config = RegistryConfig::default();
        assert_eq!(config.url, DEFAULT_REGISTRY_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_strips_trailing_slashes() {
        let config = RegistryConfig::new("http://localhost:5000//");
        assert_eq!(config.url, "http://localhost:5000");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(RegistryConfig::new("localhost:5000").validate().is_err());
        assert!(RegistryConfig::new("ftp://registry").validate().is_err());
        assert!(RegistryConfig::new("not a url").validate().is_err());
    }

    #[test]
    fn test_tls_config() {
        let tls = TlsConfig::new().with_ca_cert("/path/to/ca.crt");

        assert_eq!(tls.ca_cert, Some(PathBuf::from("/path/to/ca.crt")));
        assert!(!tls.insecure_skip_verify);
        assert!(tls.insecure().insecure_skip_verify);
    }
}
