//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PANTRY_DATA_DIR` - Directory for the collections (default: `.pantry`)
//! - `PANTRY_SECRETS_DIR` - Directory for the API key (default: `<data dir>/secure`)
//! - `OPENAI_BASE_URL` - Chat completion API base URL (default: `https://api.openai.com/v1`)
//! - `OPENAI_MODEL` - Model ID (default: `gpt-3.5-turbo`)
//! - `OPENAI_TIMEOUT_SECS` - Request timeout in seconds (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `PANTRY_LOG_JSON` - Emit JSON logs when set to `1` or `true`
//!
//! The API key itself is not configuration: it is entered by the user and
//! kept in the secret store.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_DATA_DIR: &str = ".pantry";
const SECRETS_SUBDIR: &str = "secure";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the collection files
    pub data_dir: PathBuf,
    /// Directory holding the API key (restricted permissions)
    pub secrets_dir: PathBuf,
    /// Chat completion API configuration
    pub openai: OpenAiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Emit JSON logs instead of text
    pub log_json: bool,
}

/// Chat completion API configuration.
///
/// Holds no credentials; the API key is supplied at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    /// API base URL, without the `/chat/completions` path
    pub base_url: Url,
    /// Model ID (e.g., gpt-3.5-turbo)
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_OPENAI_TIMEOUT_SECS),
        }
    }
}

impl OpenAiConfig {
    /// Configuration pointing at a different base URL, e.g. a local mock.
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Returns the chat completions endpoint URL.
    #[must_use]
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    fn from_vars(vars: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = get_var_or_default(vars, "OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL);
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("OPENAI_BASE_URL".to_string(), e.to_string()))?;
        let timeout_secs = get_var_or_default(
            vars,
            "OPENAI_TIMEOUT_SECS",
            &DEFAULT_OPENAI_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar("OPENAI_TIMEOUT_SECS".to_string(), e.to_string()))?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "OPENAI_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            model: get_var_or_default(vars, "OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = PathBuf::from(get_var_or_default(&vars, "PANTRY_DATA_DIR", DEFAULT_DATA_DIR));
        let secrets_dir = get_optional_var(&vars, "PANTRY_SECRETS_DIR")
            .map_or_else(|| data_dir.join(SECRETS_SUBDIR), PathBuf::from);
        let openai = OpenAiConfig::from_vars(&vars)?;

        let sentry_sample_rate = match get_optional_var(&vars, "SENTRY_SAMPLE_RATE") {
            Some(raw) => parse_sample_rate(&raw, "SENTRY_SAMPLE_RATE")?,
            None => 1.0,
        };
        let log_json = get_optional_var(&vars, "PANTRY_LOG_JSON")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Ok(Self {
            data_dir,
            secrets_dir,
            openai,
            sentry_dsn: get_optional_var(&vars, "SENTRY_DSN"),
            sentry_environment: get_optional_var(&vars, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            log_json,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_base_url() -> Url {
    Url::parse(DEFAULT_OPENAI_BASE_URL).expect("default base URL is valid")
}

/// Get an optional variable, treating empty values as unset.
fn get_optional_var(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    vars(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_var_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_var(vars, key).unwrap_or_else(|| default.to_string())
}

/// Parse a sample rate in `0.0..=1.0`.
fn parse_sample_rate(raw: &str, key: &str) -> Result<f32, ConfigError> {
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_vars(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(".pantry"));
        assert_eq!(config.secrets_dir, PathBuf::from(".pantry").join("secure"));
        assert_eq!(config.openai.model, "gpt-3.5-turbo");
        assert_eq!(config.openai.timeout, Duration::from_secs(60));
        assert_eq!(
            config.openai.chat_completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(!config.log_json);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("PANTRY_DATA_DIR", "/var/pantry"),
            ("PANTRY_SECRETS_DIR", "/var/pantry-secrets"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
            ("OPENAI_TIMEOUT_SECS", "5"),
            ("SENTRY_SAMPLE_RATE", "0.25"),
            ("PANTRY_LOG_JSON", "true"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/pantry"));
        assert_eq!(config.secrets_dir, PathBuf::from("/var/pantry-secrets"));
        assert_eq!(
            config.openai.chat_completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.timeout, Duration::from_secs(5));
        assert!((config.sentry_sample_rate - 0.25).abs() < f32::EPSILON);
        assert!(config.log_json);
    }

    #[test]
    fn test_secrets_dir_follows_data_dir() {
        let config = load(&[("PANTRY_DATA_DIR", "/data")]).unwrap();
        assert_eq!(config.secrets_dir, PathBuf::from("/data/secure"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("OPENAI_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "OPENAI_BASE_URL"));
    }

    #[test]
    fn test_invalid_timeout() {
        assert!(load(&[("OPENAI_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("OPENAI_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_invalid_sample_rate() {
        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        assert!(load(&[("SENTRY_SAMPLE_RATE", "half")]).is_err());
    }

    #[test]
    fn test_base_url_without_trailing_path() {
        let config = OpenAiConfig::with_base_url(Url::parse("http://127.0.0.1:4010").unwrap());
        assert_eq!(
            config.chat_completions_url(),
            "http://127.0.0.1:4010/chat/completions"
        );
    }
}
