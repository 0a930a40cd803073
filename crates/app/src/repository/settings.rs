//! API key storage.
//!
//! The key is a plain string under [`keys::API_KEY`] in the secret store,
//! never in the general store that holds the collections.

use pantry_core::ApiKey;
use secrecy::SecretString;
use tracing::debug;

use super::RepositoryError;
use crate::storage::{SharedStore, keys};

/// Repository for the chat completion API key.
#[derive(Clone)]
pub struct SettingsRepository {
    secrets: SharedStore,
}

impl SettingsRepository {
    /// Create a settings repository over the secret store.
    #[must_use]
    pub fn new(secrets: SharedStore) -> Self {
        Self { secrets }
    }

    /// Read the stored API key, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret store cannot be read.
    pub async fn api_key(&self) -> Result<Option<ApiKey>, RepositoryError> {
        let value = self.secrets.get(keys::API_KEY).await?;
        Ok(value
            .filter(|v| !v.trim().is_empty())
            .map(|v| ApiKey::from_secret(SecretString::from(v))))
    }

    /// Store the API key, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret store cannot be written.
    pub async fn set_api_key(&self, key: &ApiKey) -> Result<(), RepositoryError> {
        self.secrets
            .set(keys::API_KEY, key.expose_secret())
            .await?;
        debug!("Stored API key");
        Ok(())
    }

    /// Delete the stored API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret store cannot be written.
    pub async fn remove_api_key(&self) -> Result<(), RepositoryError> {
        self.secrets.delete(keys::API_KEY).await?;
        debug!("Removed API key");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[tokio::test]
    async fn test_absent_by_default() {
        let repo = SettingsRepository::new(Arc::new(MemoryStore::new()));
        assert!(repo.api_key().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_and_remove() {
        let secrets = Arc::new(MemoryStore::new());
        let repo = SettingsRepository::new(secrets.clone());
        let key = ApiKey::parse("sk-test-abcdef").unwrap();

        repo.set_api_key(&key).await.unwrap();
        assert_eq!(repo.api_key().await.unwrap(), Some(key));
        assert_eq!(
            secrets.get(keys::API_KEY).await.unwrap().as_deref(),
            Some("sk-test-abcdef")
        );

        repo.remove_api_key().await.unwrap();
        assert!(repo.api_key().await.unwrap().is_none());
    }
}
