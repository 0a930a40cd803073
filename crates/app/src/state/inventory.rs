//! Observable pantry inventory.

use pantry_core::{InventoryItem, InventoryItemId, ItemName};
use tracing::{error, instrument};

use super::Observable;
use crate::error::AppError;
use crate::repository::InventoryRepository;

/// Snapshot published by [`InventoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryState {
    /// Items in insertion order.
    pub items: Vec<InventoryItem>,
    /// A load is in progress.
    pub is_loading: bool,
}

/// Inventory state backed by an [`InventoryRepository`].
#[derive(Clone)]
pub struct InventoryStore {
    repo: InventoryRepository,
    state: Observable<InventoryState>,
}

impl InventoryStore {
    /// Create a store with an empty snapshot; call [`load`](Self::load) to fill it.
    #[must_use]
    pub fn new(repo: InventoryRepository) -> Self {
        Self {
            repo,
            state: Observable::default(),
        }
    }

    /// Returns the state container.
    #[must_use]
    pub const fn state(&self) -> &Observable<InventoryState> {
        &self.state
    }

    /// Returns a copy of the current items.
    #[must_use]
    pub fn items(&self) -> Vec<InventoryItem> {
        self.state.with(|s| s.items.clone())
    }

    /// Reload the items from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read; the previous items
    /// stay published.
    pub async fn load(&self) -> Result<(), AppError> {
        self.state.update(|s| s.is_loading = true);
        match self.repo.list().await {
            Ok(items) => {
                self.state.update(|s| {
                    s.items = items;
                    s.is_loading = false;
                });
                Ok(())
            }
            Err(e) => {
                self.state.update(|s| s.is_loading = false);
                error!(error = %e, "Error loading inventory");
                Err(e.into())
            }
        }
    }

    /// Add an item; the name and quantity are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidName` for a blank name, or a repository
    /// error if the write or reload fails.
    #[instrument(skip(self))]
    pub async fn add(&self, name: &str, quantity: Option<&str>) -> Result<InventoryItem, AppError> {
        let item = InventoryItem::new(ItemName::parse(name)?, quantity);
        self.repo.add(item.clone()).await.inspect_err(|e| {
            error!(error = %e, "Error adding inventory item");
        })?;
        self.load().await?;
        Ok(item)
    }

    /// Remove an item. Returns `false` if no item has `id`.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the write or reload fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove(&self, id: &InventoryItemId) -> Result<bool, AppError> {
        let removed = self.repo.remove(id).await.inspect_err(|e| {
            error!(error = %e, "Error removing inventory item");
        })?;
        self.load().await?;
        Ok(removed)
    }

    /// Names of every item, in order; the input to recipe generation.
    #[must_use]
    pub fn ingredient_names(&self) -> Vec<String> {
        self.state
            .with(|s| s.items.iter().map(|i| i.name.as_str().to_owned()).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> (Arc<MemoryStore>, InventoryStore) {
        let memory = Arc::new(MemoryStore::new());
        let store = InventoryStore::new(InventoryRepository::new(memory.clone()));
        (memory, store)
    }

    #[tokio::test]
    async fn test_add_publishes_trimmed_item() {
        let (_, store) = store();
        let mut rx = store.state().subscribe();

        let item = store.add("  Tomatoes ", Some(" 2 lbs ")).await.unwrap();

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.items, vec![item.clone()]);
        assert_eq!(item.name.as_str(), "Tomatoes");
        assert_eq!(item.quantity.as_deref(), Some("2 lbs"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_add_blank_name_is_rejected() {
        let (_, store) = store();
        let result = store.add("   ", None).await;
        assert!(matches!(result, Err(AppError::InvalidName(_))));
        assert!(store.items().is_empty());
    }

    #[tokio::test]
    async fn test_remove() {
        let (_, store) = store();
        let milk = store.add("Milk", None).await.unwrap();
        store.add("Eggs", Some("12")).await.unwrap();

        assert!(store.remove(&milk.id).await.unwrap());
        assert!(!store.remove(&milk.id).await.unwrap());
        assert_eq!(store.ingredient_names(), vec!["Eggs"]);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_items_and_clears_loading() {
        let (memory, store) = store();
        store.add("Rice", None).await.unwrap();

        memory.set_unavailable(true);
        assert!(matches!(store.load().await, Err(AppError::Repository(_))));

        let state = store.state().get();
        assert_eq!(state.items.len(), 1);
        assert!(!state.is_loading);
    }
}
