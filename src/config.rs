//! Client settings loaded from ~/.config/sheetfeed/config.toml.
//!
//! A missing or empty file means defaults. Unrecognised keys are accepted
//! and each one is reported with a `warn!` event. Credentials set in the
//! environment override the ones in the file.
use crate::feed::{Credentials, DEFAULT_FEED_ROOT};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Env var holding an OAuth2 access token. Takes precedence over the file.
pub const ACCESS_TOKEN_ENV: &str = "SHEETFEED_ACCESS_TOKEN";
/// Env var holding an API key. Takes precedence over the file.
pub const API_KEY_ENV: &str = "SHEETFEED_API_KEY";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Client configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// Missing keys fall back to `Default::default()`.
///
/// Custom Debug impl masks `access_token` and `api_key`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the feed service. Only changed to point at a test server.
    pub feed_root: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted response body size in bytes.
    pub max_response_bytes: usize,

    /// Maximum worksheet requests in flight at once. 0 = unbounded.
    pub max_concurrent_worksheets: usize,

    /// OAuth2 access token (alternative to SHEETFEED_ACCESS_TOKEN).
    pub access_token: Option<String>,

    /// API key (alternative to SHEETFEED_API_KEY).
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_root: DEFAULT_FEED_ROOT.to_string(),
            request_timeout_secs: 30,
            max_response_bytes: 10 * 1024 * 1024,
            max_concurrent_worksheets: 0,
            access_token: None,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("feed_root", &self.feed_root)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_response_bytes", &self.max_response_bytes)
            .field("max_concurrent_worksheets", &self.max_concurrent_worksheets)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → silently accepted (serde default behavior), logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "feed_root",
                "request_timeout_secs",
                "max_response_bytes",
                "max_concurrent_worksheets",
                "access_token",
                "api_key",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            feed_root = %config.feed_root,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolves credentials from the environment, then the file.
    ///
    /// An access token wins over an API key; with neither, requests are
    /// anonymous.
    pub fn credentials(&self) -> Credentials {
        self.credentials_from(
            std::env::var(ACCESS_TOKEN_ENV).ok(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }

    fn credentials_from(&self, env_token: Option<String>, env_key: Option<String>) -> Credentials {
        let token = env_token
            .filter(|t| !t.is_empty())
            .or_else(|| self.access_token.clone());
        if let Some(token) = token {
            return Credentials::bearer(token);
        }

        let key = env_key
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone());
        match key {
            Some(key) => Credentials::api_key(key),
            None => Credentials::Anonymous,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.feed_root, DEFAULT_FEED_ROOT);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_response_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_concurrent_worksheets, 0);
        assert!(config.access_token.is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/sheetfeed_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.feed_root, DEFAULT_FEED_ROOT);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("sheetfeed_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_timeout_secs, 30);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("sheetfeed_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "max_concurrent_worksheets = 4\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.max_concurrent_worksheets, 4);
        assert_eq!(config.feed_root, DEFAULT_FEED_ROOT); // default
        assert_eq!(config.request_timeout_secs, 30); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("sheetfeed_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
feed_root = "http://127.0.0.1:8080/feeds"
request_timeout_secs = 5
max_response_bytes = 2048
max_concurrent_worksheets = 8
access_token = "token-abc"
api_key = "key-xyz"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.feed_root, "http://127.0.0.1:8080/feeds");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_response_bytes, 2048);
        assert_eq!(config.max_concurrent_worksheets, 8);
        assert_eq!(config.access_token.as_deref(), Some("token-abc"));
        assert_eq!(config.api_key.as_deref(), Some("key-xyz"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("sheetfeed_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = Config::load(&path);
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = std::env::temp_dir().join("sheetfeed_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
request_timeout_secs = 10
totally_fake_key = "should not fail"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_timeout_secs, 10);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let dir = std::env::temp_dir().join("sheetfeed_config_test_wrongtype");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "request_timeout_secs = \"soon\"\n").unwrap();

        assert!(Config::load(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("sheetfeed_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = "a".repeat(1_048_577);
        std::fs::write(&path, content).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_debug_masks_secrets() {
        let config = Config {
            access_token: Some("super-secret-token".to_string()),
            api_key: Some("super-secret-key".to_string()),
            ..Config::default()
        };

        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret-token"));
        assert!(!debug_output.contains("super-secret-key"));
        assert!(debug_output.contains("[REDACTED]"));
    }

    #[test]
    fn test_credentials_env_token_wins() {
        let config = Config {
            access_token: Some("file-token".into()),
            api_key: Some("file-key".into()),
            ..Config::default()
        };
        match config.credentials_from(Some("env-token".into()), None) {
            Credentials::Bearer(token) => assert_eq!(token.expose_secret(), "env-token"),
            other => panic!("Expected bearer credentials, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_file_token_over_key() {
        let config = Config {
            access_token: Some("file-token".into()),
            api_key: Some("file-key".into()),
            ..Config::default()
        };
        match config.credentials_from(None, Some("env-key".into())) {
            Credentials::Bearer(token) => assert_eq!(token.expose_secret(), "file-token"),
            other => panic!("Expected bearer credentials, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_api_key_and_anonymous() {
        let config = Config::default();
        match config.credentials_from(None, Some("env-key".into())) {
            Credentials::ApiKey(key) => assert_eq!(key.expose_secret(), "env-key"),
            other => panic!("Expected API key credentials, got {:?}", other),
        }
        assert!(matches!(
            config.credentials_from(Some(String::new()), None),
            Credentials::Anonymous
        ));
    }
}
