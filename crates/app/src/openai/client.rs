//! Chat completion API client.
//!
//! Non-streaming access to an `OpenAI`-compatible `/chat/completions`
//! endpoint.

use std::sync::Arc;

use pantry_core::ApiKey;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::instrument;

use crate::config::OpenAiConfig;

use super::error::{ApiErrorResponse, GenerationError};
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Seconds to wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Chat completion API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<ChatClientInner>,
}

struct ChatClientInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("endpoint", &self.inner.endpoint)
            .field("model", &self.inner.model)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    /// Create a client that authenticates with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Client` if the key is not a valid header
    /// value or the HTTP client cannot be built.
    pub fn new(config: &OpenAiConfig, api_key: &ApiKey) -> Result<Self, GenerationError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|_| GenerationError::Client("API key is not a valid header value".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Client(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(ChatClientInner {
                client,
                endpoint: config.chat_completions_url(),
                model: config.model.clone(),
            }),
        })
    }

    /// Returns the model ID sent with every request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a chat completion request and get the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a non-2xx
    /// status, or the body is not a chat completion.
    #[instrument(skip(self, messages), fields(model = %self.inner.model))]
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<ChatCompletionResponse, GenerationError> {
        let request = ChatCompletionRequest {
            model: self.inner.model.clone(),
            messages,
            temperature,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle a response of any status.
    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<ChatCompletionResponse, GenerationError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                GenerationError::MalformedResponse(format!("invalid completion body: {e}"))
            })
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GenerationError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return GenerationError::RateLimited(retry_after);
        }

        let message = match response.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or(body, |api_error| api_error.error.message),
            Err(e) => return GenerationError::Http(e),
        };

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return GenerationError::Unauthorized(message);
        }

        GenerationError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
