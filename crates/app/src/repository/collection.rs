//! Generic whole-collection repository.

use std::marker::PhantomData;
use std::sync::Arc;

use pantry_core::Entity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::RepositoryError;
use crate::storage::SharedStore;

/// Where [`CollectionRepository::add`] puts new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Add to the end (insertion order).
    Append,
    /// Add to the front (most recent first).
    Prepend,
}

/// A collection of entities stored as one JSON array under a fixed key.
pub struct CollectionRepository<T> {
    store: SharedStore,
    key: &'static str,
    placement: Placement,
    write_lock: Arc<Mutex<()>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for CollectionRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            placement: self.placement,
            write_lock: Arc::clone(&self.write_lock),
            _entity: PhantomData,
        }
    }
}

impl<T> CollectionRepository<T>
where
    T: Entity + Serialize + DeserializeOwned + Send + Sync,
{
    /// Create a repository for the collection stored under `key`.
    #[must_use]
    pub fn new(store: SharedStore, key: &'static str, placement: Placement) -> Self {
        Self {
            store,
            key,
            placement,
            write_lock: Arc::new(Mutex::new(())),
            _entity: PhantomData,
        }
    }

    /// Read the full collection. A missing key is an empty collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the store fails and
    /// `RepositoryError::Corrupt` if the stored value is not a valid array.
    pub async fn list(&self) -> Result<Vec<T>, RepositoryError> {
        match self.store.get(self.key).await? {
            None => Ok(Vec::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| RepositoryError::Corrupt {
                key: self.key,
                source,
            }),
        }
    }

    /// Overwrite the full collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub async fn save_all(&self, items: &[T]) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.write(items).await
    }

    /// Add an entry according to the repository's [`Placement`].
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the collection fails.
    pub async fn add(&self, item: T) -> Result<(), RepositoryError> {
        self.add_if(item, || true).await.map(|_| ())
    }

    /// Add an entry only if `keep` still holds once the collection has been
    /// read under the write lock. Returns `false` without writing otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the collection fails.
    #[instrument(skip(self, item, keep), fields(key = self.key, id = %item.id()))]
    pub async fn add_if<F>(&self, item: T, keep: F) -> Result<bool, RepositoryError>
    where
        F: FnOnce() -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list().await?;
        if !keep() {
            debug!("Entry dropped before write");
            return Ok(false);
        }
        match self.placement {
            Placement::Append => items.push(item),
            Placement::Prepend => items.insert(0, item),
        }
        self.write(&items).await?;
        debug!(len = items.len(), "Added entry");
        Ok(true)
    }

    /// Remove the entry with `id`.
    ///
    /// Returns `false` without writing anything if no entry matches.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the collection fails.
    #[instrument(skip(self), fields(key = self.key))]
    pub async fn remove(&self, id: &T::Id) -> Result<bool, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list().await?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() == before {
            debug!("No entry to remove");
            return Ok(false);
        }
        self.write(&items).await?;
        debug!(len = items.len(), "Removed entry");
        Ok(true)
    }

    /// Apply `f` to the entry with `id` and write the collection back.
    ///
    /// Returns `false` without writing anything if no entry matches.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing the collection fails.
    pub async fn update<F>(&self, id: &T::Id, f: F) -> Result<bool, RepositoryError>
    where
        F: FnOnce(&mut T) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut items = self.list().await?;
        let Some(item) = items.iter_mut().find(|item| item.id() == id) else {
            return Ok(false);
        };
        f(item);
        self.write(&items).await?;
        Ok(true)
    }

    async fn write(&self, items: &[T]) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(items).map_err(RepositoryError::Serialize)?;
        self.store.set(self.key, &raw).await?;
        Ok(())
    }
}
