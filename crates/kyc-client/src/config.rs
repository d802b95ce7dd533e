//! Configuration management for the KYC client
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::session::AdminCredentials;
use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Production API root
pub const DEFAULT_API_URL: &str = "https://fluxx-response-be.onrender.com";

/// Largest accepted `KYC_MAX_FILE_SIZE_MB`, so the limit fits in bytes
const MAX_FILE_SIZE_MB_LIMIT: u64 = u64::MAX >> 20;

/// Client configuration
#[derive(Clone)]
pub struct Config {
    /// API root, without a trailing slash
    pub api_url: String,

    /// Prefix joined onto file paths returned by the listing endpoint
    pub file_base_url: String,

    /// Placeholder admin username
    pub admin_username: String,

    /// Placeholder admin password
    pub admin_password: String,

    /// File holding the persisted login flag
    pub session_file: PathBuf,

    /// Size limit for every uploaded file, in MB
    pub max_file_size_mb: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("KYC_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let file_base_url = lookup("KYC_FILE_BASE_URL").unwrap_or_else(|| format!("{}/", api_url));

        let config = Config {
            file_base_url,

            admin_username: lookup("KYC_ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),

            admin_password: lookup("KYC_ADMIN_PASSWORD")
                .unwrap_or_else(|| "password".to_string()),

            session_file: lookup("KYC_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(default_session_file),

            max_file_size_mb: lookup("KYC_MAX_FILE_SIZE_MB")
                .unwrap_or_else(|| "2".to_string())
                .parse()
                .context("Invalid KYC_MAX_FILE_SIZE_MB")?,

            api_url,
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if !is_http_url(&self.api_url) {
            anyhow::bail!("KYC_API_URL must be an http(s) URL, got '{}'", self.api_url);
        }

        if !is_http_url(&self.file_base_url) {
            anyhow::bail!(
                "KYC_FILE_BASE_URL must be an http(s) URL, got '{}'",
                self.file_base_url
            );
        }

        if self.max_file_size_mb == 0 {
            anyhow::bail!("KYC_MAX_FILE_SIZE_MB must be greater than 0");
        }

        if self.max_file_size_mb > MAX_FILE_SIZE_MB_LIMIT {
            anyhow::bail!(
                "KYC_MAX_FILE_SIZE_MB must be at most {}, got {}",
                MAX_FILE_SIZE_MB_LIMIT,
                self.max_file_size_mb
            );
        }

        Ok(())
    }

    /// Replace the API root, keeping an explicitly configured file base
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        let derived_base = format!("{}/", self.api_url);
        self.api_url = api_url.trim_end_matches('/').to_string();
        if self.file_base_url == derived_base {
            self.file_base_url = format!("{}/", self.api_url);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn register_url(&self) -> String {
        format!("{}/register", self.api_url)
    }

    pub fn drivers_url(&self) -> String {
        format!("{}/drivers", self.api_url)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn credentials(&self) -> AdminCredentials {
        AdminCredentials::new(&self.admin_username, &self.admin_password)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("file_base_url", &self.file_base_url)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"****")
            .field("session_file", &self.session_file)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .finish()
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_session_file() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rider-kyc")
        .join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = load(&[]).expect("Failed to load config");

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.file_base_url, format!("{}/", DEFAULT_API_URL));
        assert_eq!(config.admin_username, "admin");
        assert_eq!(config.admin_password, "password");
        assert_eq!(config.max_file_size_mb, 2);
        assert!(config.session_file.ends_with("rider-kyc/session.json"));
    }

    #[test]
    fn test_endpoint_urls() {
        let config = load(&[("KYC_API_URL", "http://localhost:8000/")]).unwrap();

        assert_eq!(config.register_url(), "http://localhost:8000/register");
        assert_eq!(config.drivers_url(), "http://localhost:8000/drivers");
        assert_eq!(config.file_base_url, "http://localhost:8000/");
    }

    #[test]
    fn test_explicit_file_base() {
        let config = load(&[("KYC_FILE_BASE_URL", "https://cdn.example.com/kyc/")]).unwrap();
        assert_eq!(config.file_base_url, "https://cdn.example.com/kyc/");

        let config = config.with_api_url("http://localhost:9000").unwrap();
        assert_eq!(config.file_base_url, "https://cdn.example.com/kyc/");
    }

    #[test]
    fn test_with_api_url_moves_derived_base() {
        let config = load(&[]).unwrap().with_api_url("http://127.0.0.1:9000/").unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:9000");
        assert_eq!(config.file_base_url, "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_validate_invalid_url() {
        let result = load(&[("KYC_API_URL", "ftp://example.com")]);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("KYC_API_URL must be an http(s) URL"));
    }

    #[test]
    fn test_validate_zero_size() {
        let result = load(&[("KYC_MAX_FILE_SIZE_MB", "0")]);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("KYC_MAX_FILE_SIZE_MB must be greater than 0"));

        assert!(load(&[("KYC_MAX_FILE_SIZE_MB", "two")]).is_err());
    }

    #[test]
    fn test_validate_oversized_limit() {
        let result = load(&[("KYC_MAX_FILE_SIZE_MB", "18446744073709551615")]);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("KYC_MAX_FILE_SIZE_MB must be at most"));

        let largest = (u64::MAX >> 20).to_string();
        let config = load(&[("KYC_MAX_FILE_SIZE_MB", largest.as_str())]).unwrap();
        assert_eq!(config.max_file_size_bytes(), (u64::MAX >> 20) << 20);
    }

    #[test]
    fn test_debug_hides_password() {
        let config = load(&[("KYC_ADMIN_PASSWORD", "s3cret")]).unwrap();
        let printed = format!("{:?}", config);
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("admin_username: \"admin\""));
    }

    #[test]
    fn test_max_file_size_bytes() {
        let config = load(&[("KYC_MAX_FILE_SIZE_MB", "5")]).unwrap();
        assert_eq!(config.max_file_size_bytes(), 5 * 1024 * 1024);
    }
}
