//! Error types for recipe generation.

use thiserror::Error;

/// Errors that can occur while generating a recipe.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key has been supplied.
    #[error("OpenAI not initialized. Please set your API key in settings.")]
    NotInitialized,

    /// The API returned no message content.
    #[error("No response from OpenAI")]
    EmptyResponse,

    /// The message content is not a valid recipe.
    #[error("malformed recipe response: {0}")]
    MalformedResponse(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The API returned an error status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// The HTTP client could not be built (e.g. the key is not a valid header).
    #[error("client error: {0}")]
    Client(String),
}

/// Error body returned by `OpenAI`-compatible APIs.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_display() {
        assert_eq!(
            GenerationError::NotInitialized.to_string(),
            "OpenAI not initialized. Please set your API key in settings."
        );
        assert_eq!(
            GenerationError::RateLimited(20).to_string(),
            "rate limited, retry after 20 seconds"
        );

        let err = GenerationError::Api {
            status: 500,
            message: "The server had an error".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): The server had an error");
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{
            "error": {
                "message": "Incorrect API key provided: sk-abc.",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        }"#;

        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.message, "Incorrect API key provided: sk-abc.");
    }
}
