//! Observable API key setting.
//!
//! Keeps the shared [`RecipeGenerator`] in step with the stored key: loading
//! or setting a key installs it, removing the key resets the generator.

use std::sync::Arc;

use pantry_core::ApiKey;
use tracing::{error, info, instrument};

use super::Observable;
use crate::error::AppError;
use crate::openai::RecipeGenerator;
use crate::repository::SettingsRepository;

/// Snapshot published by [`SettingsStore`].
#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    /// The stored API key, if any.
    pub api_key: Option<ApiKey>,
    /// A load is in progress.
    pub is_loading: bool,
    /// Message for the last failed operation.
    pub error: Option<String>,
}

impl SettingsState {
    /// Returns whether a key is stored.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The stored key in masked form, for display.
    #[must_use]
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_ref().map(ApiKey::masked)
    }
}

/// API key state backed by a [`SettingsRepository`].
#[derive(Clone)]
pub struct SettingsStore {
    repo: SettingsRepository,
    generator: Arc<RecipeGenerator>,
    state: Observable<SettingsState>,
}

impl SettingsStore {
    #[must_use]
    pub fn new(repo: SettingsRepository, generator: Arc<RecipeGenerator>) -> Self {
        Self {
            repo,
            generator,
            state: Observable::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &Observable<SettingsState> {
        &self.state
    }

    /// Returns whether a key is stored, according to the current snapshot.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.state.with(SettingsState::has_api_key)
    }

    /// Read the stored key and install it in the generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret store cannot be read or the generator
    /// rejects the key.
    pub async fn load(&self) -> Result<(), AppError> {
        self.state.update(|s| s.is_loading = true);
        let result = self.load_key().await;
        match result {
            Ok(api_key) => {
                self.state.update(|s| {
                    s.api_key = api_key;
                    s.is_loading = false;
                });
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error loading API key");
                Err(self.record_error(e))
            }
        }
    }

    /// Validate, store and install a new API key.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidApiKey` if the key is blank or lacks the
    /// `sk-` prefix (nothing is stored), or a storage error.
    #[instrument(skip(self, raw))]
    pub async fn set_api_key(&self, raw: &str) -> Result<(), AppError> {
        let key = match ApiKey::parse(raw) {
            Ok(key) => key,
            Err(e) => return Err(self.record_error(e.into())),
        };

        if let Err(e) = self.repo.set_api_key(&key).await {
            error!(error = %e, "Error saving API key");
            return Err(self.record_error(e.into()));
        }
        if let Err(e) = self.generator.initialize(&key).await {
            return Err(self.record_error(e.into()));
        }

        info!(key = %key.masked(), "API key saved");
        self.state.update(|s| {
            s.api_key = Some(key);
            s.error = None;
        });
        Ok(())
    }

    /// Delete the stored key and reset the generator.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret store cannot be written.
    #[instrument(skip(self))]
    pub async fn remove_api_key(&self) -> Result<(), AppError> {
        if let Err(e) = self.repo.remove_api_key().await {
            error!(error = %e, "Error removing API key");
            return Err(self.record_error(e.into()));
        }
        self.generator.reset().await;

        info!("API key removed");
        self.state.update(|s| {
            s.api_key = None;
            s.error = None;
        });
        Ok(())
    }

    /// Clear the recorded error message.
    pub fn clear_error(&self) {
        self.state.update(|s| s.error = None);
    }

    async fn load_key(&self) -> Result<Option<ApiKey>, AppError> {
        let api_key = self.repo.api_key().await?;
        match &api_key {
            Some(key) => self.generator.initialize(key).await?,
            None => self.generator.reset().await,
        }
        Ok(api_key)
    }

    fn record_error(&self, err: AppError) -> AppError {
        let message = err.user_message();
        self.state.update(|s| {
            s.error = Some(message);
            s.is_loading = false;
        });
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::OpenAiConfig;
    use crate::storage::{KeyValueStore, MemoryStore, keys};

    fn store() -> (Arc<MemoryStore>, Arc<RecipeGenerator>, SettingsStore) {
        let secrets = Arc::new(MemoryStore::new());
        let generator = Arc::new(RecipeGenerator::new(OpenAiConfig::default()));
        let store = SettingsStore::new(SettingsRepository::new(secrets.clone()), generator.clone());
        (secrets, generator, store)
    }

    #[tokio::test]
    async fn test_set_api_key_initializes_generator() {
        let (secrets, generator, store) = store();

        store.set_api_key("  sk-abcdefghijklmnop  ").await.unwrap();

        assert!(generator.is_initialized().await);
        assert!(store.has_api_key());
        assert_eq!(
            store.state().get().masked_api_key().as_deref(),
            Some("sk-abcde...mnop")
        );
        assert_eq!(
            secrets.get(keys::API_KEY).await.unwrap().as_deref(),
            Some("sk-abcdefghijklmnop")
        );
    }

    #[tokio::test]
    async fn test_set_api_key_rejects_bad_prefix() {
        let (secrets, generator, store) = store();

        let result = store.set_api_key("pk-live-123").await;

        assert!(matches!(result, Err(AppError::InvalidApiKey(_))));
        assert!(!generator.is_initialized().await);
        assert!(secrets.get(keys::API_KEY).await.unwrap().is_none());
        assert!(
            store
                .state()
                .get()
                .error
                .unwrap()
                .contains("should start with \"sk-\"")
        );
    }

    #[tokio::test]
    async fn test_remove_api_key_resets_generator() {
        let (secrets, generator, store) = store();
        store.set_api_key("sk-abcdefghijklmnop").await.unwrap();

        store.remove_api_key().await.unwrap();

        assert!(!generator.is_initialized().await);
        assert!(!store.has_api_key());
        assert!(secrets.get(keys::API_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_installs_stored_key() {
        let (secrets, generator, store) = store();
        secrets
            .set(keys::API_KEY, "sk-abcdefghijklmnop")
            .await
            .unwrap();

        store.load().await.unwrap();

        assert!(generator.is_initialized().await);
        assert!(store.has_api_key());
        assert!(!store.state().get().is_loading);
    }

    #[tokio::test]
    async fn test_load_failure_records_error() {
        let (secrets, _, store) = store();
        secrets.set_unavailable(true);

        assert!(store.load().await.is_err());
        let state = store.state().get();
        assert!(!state.is_loading);
        assert!(state.error.is_some());

        store.clear_error();
        assert!(store.state().get().error.is_none());
    }
}
