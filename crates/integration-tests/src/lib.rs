//! Integration tests for the pantry tracker.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pantry-integration-tests
//! ```
//!
//! No network access is needed: the chat completion API is served by a
//! local `wiremock` server.
//!
//! # Test Categories
//!
//! - `recipe_generation` - generation against a mocked API
//! - `file_storage` - persistence across restarts
//! - `concurrency` - read-modify-write races

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pantry_app::openai::RecipeGenerator;
use pantry_app::storage::{KeyValueStore, MemoryStore, SharedStore, StorageError};
use pantry_app::{AppState, OpenAiConfig};
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

/// A syntactically valid API key.
pub const TEST_API_KEY: &str = "sk-test-abcdefghijklmnop";

/// Path of the chat completions endpoint under the mock server.
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Application state over in-memory stores, talking to `server`.
pub struct TestContext {
    /// Collections.
    pub data: Arc<MemoryStore>,
    /// API key.
    pub secrets: Arc<MemoryStore>,
    /// The state under test.
    pub state: AppState,
}

impl TestContext {
    /// Build a context whose generator points at `server`.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL.
    #[must_use]
    pub fn new(server: &MockServer) -> Self {
        let data = Arc::new(MemoryStore::new());
        Self::over(server, data.clone(), data)
    }

    /// Like [`new`](Self::new), but every read of `key` from the collection
    /// store waits `delay` first.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL.
    #[must_use]
    pub fn with_delayed_reads(server: &MockServer, key: &'static str, delay: Duration) -> Self {
        let data = Arc::new(MemoryStore::new());
        let delayed = Arc::new(DelayedReads {
            inner: data.clone(),
            key,
            delay,
        });
        Self::over(server, data, delayed)
    }

    fn over(server: &MockServer, data: Arc<MemoryStore>, data_store: SharedStore) -> Self {
        let secrets = Arc::new(MemoryStore::new());
        let state = AppState::with_stores(
            data_store,
            secrets.clone(),
            RecipeGenerator::new(mock_config(server)),
        );
        Self {
            data,
            secrets,
            state,
        }
    }

    /// Like [`new`](Self::new), with [`TEST_API_KEY`] stored and pantry
    /// items named `ingredients`.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory stores fail.
    pub async fn with_pantry(server: &MockServer, ingredients: &[&str]) -> Self {
        Self::new(server).stocked(ingredients).await
    }

    /// Store [`TEST_API_KEY`] and add pantry items named `ingredients`.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory stores fail.
    pub async fn stocked(self, ingredients: &[&str]) -> Self {
        self.state
            .settings()
            .set_api_key(TEST_API_KEY)
            .await
            .expect("store API key");
        for name in ingredients {
            self.state
                .inventory()
                .add(name, None)
                .await
                .expect("add pantry item");
        }
        self
    }
}

/// Wraps a [`MemoryStore`] and stalls reads of one key.
struct DelayedReads {
    inner: Arc<MemoryStore>,
    key: &'static str,
    delay: Duration,
}

#[async_trait]
impl KeyValueStore for DelayedReads {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if key == self.key {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.inner.delete(key).await
    }
}

/// API configuration pointing at the mock server's `/v1`.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
#[must_use]
pub fn mock_config(server: &MockServer) -> OpenAiConfig {
    let base = Url::parse(&format!("{}/v1", server.uri())).expect("mock server URL");
    OpenAiConfig::with_base_url(base)
}

/// A recipe JSON document as the model would write it.
#[must_use]
pub fn recipe_json(title: &str) -> String {
    json!({
        "title": title,
        "ingredients": ["2 tomatoes", "1 bunch basil"],
        "steps": ["Slice the tomatoes", "Tear the basil", "Combine"],
        "prepTime": "10 minutes",
        "cookTime": "0 minutes",
        "servings": "2 servings"
    })
    .to_string()
}

/// A chat completion response body carrying `content`.
#[must_use]
pub fn completion_body(content: Option<&str>) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200}
    })
}
