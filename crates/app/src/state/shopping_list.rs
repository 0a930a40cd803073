//! Observable shopping list.

use pantry_core::{ItemName, ShoppingListItem, ShoppingListItemId};
use tracing::{error, instrument};

use super::Observable;
use crate::error::AppError;
use crate::repository::ShoppingListRepository;

/// Snapshot published by [`ShoppingListStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingListState {
    /// Items in insertion order.
    pub items: Vec<ShoppingListItem>,
    /// A load is in progress.
    pub is_loading: bool,
}

impl ShoppingListState {
    /// Number of checked-off items.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|i| i.completed).count()
    }
}

/// Shopping list state backed by a [`ShoppingListRepository`].
#[derive(Clone)]
pub struct ShoppingListStore {
    repo: ShoppingListRepository,
    state: Observable<ShoppingListState>,
}

impl ShoppingListStore {
    #[must_use]
    pub fn new(repo: ShoppingListRepository) -> Self {
        Self {
            repo,
            state: Observable::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &Observable<ShoppingListState> {
        &self.state
    }

    /// Returns a copy of the current items.
    #[must_use]
    pub fn items(&self) -> Vec<ShoppingListItem> {
        self.state.with(|s| s.items.clone())
    }

    /// Number of checked-off items in the current snapshot.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.state.with(ShoppingListState::completed_count)
    }

    /// Reload the items from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
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
                error!(error = %e, "Error loading shopping list");
                Err(e.into())
            }
        }
    }

    /// Add an unchecked item.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidName` for a blank name, or a repository
    /// error if the write or reload fails.
    #[instrument(skip(self))]
    pub async fn add(&self, name: &str) -> Result<ShoppingListItem, AppError> {
        let item = ShoppingListItem::new(ItemName::parse(name)?);
        self.repo.add(item.clone()).await.inspect_err(|e| {
            error!(error = %e, "Error adding shopping list item");
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
    pub async fn remove(&self, id: &ShoppingListItemId) -> Result<bool, AppError> {
        let removed = self.repo.remove(id).await.inspect_err(|e| {
            error!(error = %e, "Error removing shopping list item");
        })?;
        self.load().await?;
        Ok(removed)
    }

    /// Flip an item's completed flag. Returns `false` if no item has `id`.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the write or reload fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn toggle(&self, id: &ShoppingListItemId) -> Result<bool, AppError> {
        let toggled = self.repo.toggle(id).await.inspect_err(|e| {
            error!(error = %e, "Error toggling shopping list item");
        })?;
        self.load().await?;
        Ok(toggled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> ShoppingListStore {
        ShoppingListStore::new(ShoppingListRepository::new(Arc::new(MemoryStore::new())))
    }

    #[tokio::test]
    async fn test_add_and_toggle() {
        let store = store();
        let bread = store.add("Bread").await.unwrap();
        store.add("Butter").await.unwrap();
        assert!(!bread.completed);
        assert_eq!(store.completed_count(), 0);

        assert!(store.toggle(&bread.id).await.unwrap());
        assert_eq!(store.completed_count(), 1);
        assert_eq!(store.state().get().items.len(), 2);

        assert!(store.toggle(&bread.id).await.unwrap());
        assert_eq!(store.completed_count(), 0);
    }

    #[tokio::test]
    async fn test_toggle_and_remove_unknown() {
        let store = store();
        store.add("Bread").await.unwrap();
        let missing = ShoppingListItemId::new("missing");

        assert!(!store.toggle(&missing).await.unwrap());
        assert!(!store.remove(&missing).await.unwrap());
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn test_subscriber_sees_toggle() {
        let store = store();
        let item = store.add("Apples").await.unwrap();
        let mut rx = store.state().subscribe();
        rx.borrow_and_update();

        store.toggle(&item.id).await.unwrap();

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().items[0].completed);
    }
}
