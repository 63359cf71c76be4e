//! Skill configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MAGENTO_BASE_URL` - Commerce backend origin (e.g., `http://shop.example.com`)
//! - `MAGENTO_CUSTOMER_USERNAME` - Customer account used for cart operations
//! - `MAGENTO_CUSTOMER_PASSWORD` - Customer account password
//! - `MAGENTO_ADMIN_USERNAME` - Integration admin used for catalog search
//! - `MAGENTO_ADMIN_PASSWORD` - Integration admin password
//!
//! ## Optional
//! - `SKILL_HOST` - Bind address (default: 127.0.0.1)
//! - `SKILL_PORT` - Listen port (default: 3000)
//! - `SKILL_SESSION_IDLE_SECS` - Idle time before a shopper's credentials are dropped (default: 1800)
//! - `MAGENTO_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry performance sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Skill service configuration.
#[derive(Debug, Clone)]
pub struct SkillConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// How long an idle shopper session keeps its credentials
    pub session_idle: Duration,
    /// Commerce backend configuration
    pub magento: MagentoConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Username and password for one Magento account.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AccountCredentials {
    pub username: String,
    pub password: SecretString,
}

impl AccountCredentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

impl std::fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Magento REST API configuration.
#[derive(Debug, Clone)]
pub struct MagentoConfig {
    /// Backend origin without a trailing slash
    pub base_url: String,
    /// Customer account for cart operations
    pub customer: AccountCredentials,
    /// Admin account for catalog search
    pub admin: AccountCredentials,
    /// Per-request timeout
    pub timeout: Duration,
}

impl MagentoConfig {
    /// Build a configuration, validating and normalising the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(
        base_url: &str,
        customer: AccountCredentials,
        admin: AccountCredentials,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            customer,
            admin,
            timeout,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = get_env_or_default("MAGENTO_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MAGENTO_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Self::new(
            &get_required_env("MAGENTO_BASE_URL")?,
            AccountCredentials {
                username: get_required_env("MAGENTO_CUSTOMER_USERNAME")?,
                password: get_required_secret("MAGENTO_CUSTOMER_PASSWORD")?,
            },
            AccountCredentials {
                username: get_required_env("MAGENTO_ADMIN_USERNAME")?,
                password: get_required_secret("MAGENTO_ADMIN_PASSWORD")?,
            },
            Duration::from_secs(timeout_secs),
        )
    }
}

impl SkillConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SKILL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SKILL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SKILL_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SKILL_PORT".to_string(), e.to_string()))?;
        let session_idle_secs = get_env_or_default("SKILL_SESSION_IDLE_SECS", "1800")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SKILL_SESSION_IDLE_SECS".to_string(), e.to_string())
            })?;
        let sentry_traces_sample_rate = get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SENTRY_TRACES_SAMPLE_RATE".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            session_idle: Duration::from_secs(session_idle_secs),
            magento: MagentoConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Load only the backend section, for tools that do not serve HTTP.
///
/// # Errors
///
/// Returns `ConfigError` if required variables are missing or invalid.
pub fn magento_from_env() -> Result<MagentoConfig, ConfigError> {
    let _ = dotenvy::dotenv();
    MagentoConfig::from_env()
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate an http(s) origin and drop any trailing slash.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar("MAGENTO_BASE_URL".to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("must have a host".to_string()));
    }
    if url.query().is_some() {
        return Err(invalid("must not contain a query string".to_string()));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn credentials() -> (AccountCredentials, AccountCredentials) {
        (
            AccountCredentials::new("shopper@example.com", "customer-pass"),
            AccountCredentials::new("integration", "admin-pass"),
        )
    }

    #[test]
    fn test_normalize_base_url_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://shop.example.com/").unwrap(),
            "http://shop.example.com"
        );
        assert_eq!(
            normalize_base_url("https://shop.example.com/magento/").unwrap(),
            "https://shop.example.com/magento"
        );
        assert_eq!(
            normalize_base_url("http://127.0.0.1:8080").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn test_normalize_base_url_rejects_invalid() {
        assert!(normalize_base_url("shop.example.com").is_err());
        assert!(normalize_base_url("ftp://shop.example.com").is_err());
        assert!(normalize_base_url("http://shop.example.com/?a=1").is_err());
    }

    #[test]
    fn test_magento_config_new() {
        let (customer, admin) = credentials();
        let config = MagentoConfig::new(
            "http://shop.example.com/",
            customer,
            admin,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://shop.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_socket_addr() {
        let (customer, admin) = credentials();
        let config = SkillConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            session_idle: Duration::from_secs(1800),
            magento: MagentoConfig::new(
                "http://shop.example.com",
                customer,
                admin,
                Duration::from_secs(30),
            )
            .unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_account_credentials_debug_redacts_password() {
        let (customer, _) = credentials();
        let debug_output = format!("{customer:?}");

        assert!(debug_output.contains("shopper@example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("customer-pass"));
    }
}
