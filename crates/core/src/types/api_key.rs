//! Chat completion API key.
//!
//! The key is the only secret the pantry stores. It is kept in a
//! [`SecretString`] so it never shows up in `Debug` output or logs.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Number of leading characters kept visible by [`ApiKey::masked`].
const MASK_PREFIX_CHARS: usize = 8;
/// Number of trailing characters kept visible by [`ApiKey::masked`].
const MASK_SUFFIX_CHARS: usize = 4;

/// Errors that can occur when parsing an [`ApiKey`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyError {
    /// The input is empty or only whitespace.
    #[error("API key cannot be empty")]
    Empty,
    /// The key does not start with the expected prefix.
    #[error("API keys should start with \"{expected}\"")]
    InvalidPrefix {
        /// The required prefix.
        expected: &'static str,
    },
}

/// An API key for the chat completion endpoint.
///
/// [`ApiKey::parse`] only checks the `sk-` prefix; it is a format check at the
/// input boundary, not a verification of the key.
///
/// ```
/// use pantry_core::ApiKey;
///
/// let key = ApiKey::parse(" sk-abcdefghijklmnop ").unwrap();
/// assert_eq!(key.expose_secret(), "sk-abcdefghijklmnop");
/// assert_eq!(key.masked(), "sk-abcde...mnop");
/// assert!(ApiKey::parse("pk-123").is_err());
/// ```
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Required key prefix.
    pub const PREFIX: &'static str = "sk-";

    /// Parse a user-supplied key, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ApiKeyError::Empty`] for blank input and
    /// [`ApiKeyError::InvalidPrefix`] if the key does not start with `sk-`.
    pub fn parse(s: &str) -> Result<Self, ApiKeyError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ApiKeyError::Empty);
        }
        if !trimmed.starts_with(Self::PREFIX) {
            return Err(ApiKeyError::InvalidPrefix {
                expected: Self::PREFIX,
            });
        }
        Ok(Self(SecretString::from(trimmed.to_owned())))
    }

    /// Wrap a key read back from secure storage.
    ///
    /// Stored keys were validated when they were saved, so no check is done.
    #[must_use]
    pub const fn from_secret(secret: SecretString) -> Self {
        Self(secret)
    }

    /// Returns the raw key.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Returns a display form showing only the start and end of the key.
    ///
    /// Keys of eight characters or fewer are returned unchanged.
    #[must_use]
    pub fn masked(&self) -> String {
        let key = self.expose_secret();
        let len = key.chars().count();
        if len <= MASK_PREFIX_CHARS {
            return key.to_owned();
        }

        let head: String = key.chars().take(MASK_PREFIX_CHARS).collect();
        let tail: String = key
            .chars()
            .skip(len.saturating_sub(MASK_SUFFIX_CHARS))
            .collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

impl PartialEq for ApiKey {
    fn eq(&self, other: &Self) -> bool {
        self.expose_secret() == other.expose_secret()
    }
}

impl Eq for ApiKey {}

impl std::str::FromStr for ApiKey {
    type Err = ApiKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let key = ApiKey::parse("sk-test-1234567890").unwrap();
        assert_eq!(key.expose_secret(), "sk-test-1234567890");
    }

    #[test]
    fn test_parse_trims() {
        let key = ApiKey::parse("  sk-test \n").unwrap();
        assert_eq!(key.expose_secret(), "sk-test");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ApiKey::parse("   ").unwrap_err(), ApiKeyError::Empty);
    }

    #[test]
    fn test_parse_wrong_prefix() {
        assert!(matches!(
            ApiKey::parse("pk-live-123"),
            Err(ApiKeyError::InvalidPrefix { expected: "sk-" })
        ));
        assert!(ApiKey::parse("SK-upper").is_err());
    }

    #[test]
    fn test_masked_long_key() {
        let key = ApiKey::parse("sk-proj-abcdefghijklmnopqrstuvwxyz").unwrap();
        assert_eq!(key.masked(), "sk-proj-...wxyz");
    }

    #[test]
    fn test_masked_short_key() {
        let key = ApiKey::parse("sk-12345").unwrap();
        assert_eq!(key.masked(), "sk-12345");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = ApiKey::parse("sk-super-secret-value").unwrap();
        let debug_output = format!("{key:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret"));
    }
}
