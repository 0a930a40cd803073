//! Unified error handling for the application layer.

use pantry_core::{ApiKeyError, NameError};
use thiserror::Error;
use tracing::{Level, debug, error};

use crate::config::ConfigError;
use crate::openai::GenerationError;
use crate::repository::RepositoryError;

const GENERATION_FAILED: &str = "Failed to generate recipe. Please check your API key and try again.";
const API_KEY_REQUIRED: &str = "Please set your OpenAI API key in Settings to generate recipes.";
const INGREDIENTS_REQUIRED: &str = "Please add some ingredients to your pantry first.";
const STORAGE_FAILED: &str = "Could not access saved data. Please try again.";

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage or collection data failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Recipe generation failed.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// An item name was rejected.
    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    /// An API key was rejected.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(#[from] ApiKeyError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generation was requested with no ingredients.
    #[error("No ingredients to generate a recipe from")]
    NoIngredients,

    /// A newer generation request or a cancel replaced this one.
    #[error("Recipe request was superseded")]
    Superseded,
}

impl AppError {
    /// Message suitable for showing to the user.
    ///
    /// Generation failures collapse into one generic message; `Display`
    /// keeps the detail for logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Generation(GenerationError::NotInitialized) => API_KEY_REQUIRED.to_string(),
            Self::Generation(_) => GENERATION_FAILED.to_string(),
            Self::NoIngredients => INGREDIENTS_REQUIRED.to_string(),
            Self::InvalidApiKey(ApiKeyError::InvalidPrefix { expected }) => format!(
                "OpenAI API keys should start with \"{expected}\". Please check your key and try again."
            ),
            Self::InvalidApiKey(ApiKeyError::Empty) => "Please enter an API key.".to_string(),
            Self::InvalidName(_) => "Please enter a name.".to_string(),
            Self::Repository(_) => STORAGE_FAILED.to_string(),
            Self::Config(_) | Self::Superseded => self.to_string(),
        }
    }

    /// Returns whether this error points at a fault rather than bad input,
    /// i.e. whether it is worth reporting.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Repository(_)
                | Self::Config(_)
                | Self::Generation(
                    GenerationError::Http(_)
                        | GenerationError::Api { .. }
                        | GenerationError::Client(_)
                        | GenerationError::EmptyResponse
                        | GenerationError::MalformedResponse(_)
                )
        )
    }

    /// Level this error is logged at. Only internal errors reach `ERROR`,
    /// which the binary forwards to Sentry as events.
    #[must_use]
    pub const fn log_level(&self) -> Level {
        if self.is_internal() {
            Level::ERROR
        } else {
            Level::DEBUG
        }
    }

    /// Log this error with `context` at [`log_level`](Self::log_level).
    pub fn log(&self, context: &str) {
        if self.log_level() == Level::ERROR {
            error!(error = %self, "{context}");
        } else {
            debug!(error = %self, "{context}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Generation(GenerationError::EmptyResponse);
        assert_eq!(err.to_string(), "Generation error: No response from OpenAI");
    }

    #[test]
    fn test_generation_failures_share_one_message() {
        let errors = [
            GenerationError::EmptyResponse,
            GenerationError::MalformedResponse("expected value".to_string()),
            GenerationError::Unauthorized("Incorrect API key".to_string()),
            GenerationError::RateLimited(30),
            GenerationError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(AppError::from(err).user_message(), GENERATION_FAILED);
        }
    }

    #[test]
    fn test_precondition_messages() {
        assert_eq!(
            AppError::Generation(GenerationError::NotInitialized).user_message(),
            API_KEY_REQUIRED
        );
        assert_eq!(AppError::NoIngredients.user_message(), INGREDIENTS_REQUIRED);
        assert_eq!(
            AppError::InvalidApiKey(ApiKeyError::InvalidPrefix { expected: "sk-" }).user_message(),
            "OpenAI API keys should start with \"sk-\". Please check your key and try again."
        );
    }

    #[test]
    fn test_is_internal() {
        let storage = AppError::Repository(RepositoryError::Storage(StorageError::Unavailable(
            "down".to_string(),
        )));
        assert!(storage.is_internal());
        assert_eq!(storage.user_message(), STORAGE_FAILED);

        assert!(AppError::Generation(GenerationError::EmptyResponse).is_internal());
        assert!(!AppError::Generation(GenerationError::NotInitialized).is_internal());
        assert!(!AppError::NoIngredients.is_internal());
        assert!(!AppError::InvalidName(NameError::Empty).is_internal());
        assert!(!AppError::Superseded.is_internal());
    }

    #[test]
    fn test_rejected_input_stays_below_warn() {
        let rejected = [
            AppError::Generation(GenerationError::NotInitialized),
            AppError::Generation(GenerationError::Unauthorized("bad key".to_string())),
            AppError::Generation(GenerationError::RateLimited(60)),
            AppError::NoIngredients,
            AppError::InvalidName(NameError::Empty),
            AppError::InvalidApiKey(ApiKeyError::Empty),
            AppError::Superseded,
        ];
        for err in rejected {
            assert_eq!(err.log_level(), Level::DEBUG, "{err}");
        }

        assert_eq!(
            AppError::Generation(GenerationError::EmptyResponse).log_level(),
            Level::ERROR
        );
    }
}
