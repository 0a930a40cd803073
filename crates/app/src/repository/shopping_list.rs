//! Shopping list repository.

use pantry_core::{ShoppingListItem, ShoppingListItemId};

use super::{CollectionRepository, Placement, RepositoryError};
use crate::storage::{SharedStore, keys};

/// Repository for shopping list items.
#[derive(Clone)]
pub struct ShoppingListRepository {
    items: CollectionRepository<ShoppingListItem>,
}

impl ShoppingListRepository {
    /// Create a new shopping list repository.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            items: CollectionRepository::new(store, keys::SHOPPING_LIST, Placement::Append),
        }
    }

    /// List all items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub async fn list(&self) -> Result<Vec<ShoppingListItem>, RepositoryError> {
        self.items.list().await
    }

    /// Append an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn add(&self, item: ShoppingListItem) -> Result<(), RepositoryError> {
        self.items.add(item).await
    }

    /// Remove an item. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn remove(&self, id: &ShoppingListItemId) -> Result<bool, RepositoryError> {
        self.items.remove(id).await
    }

    /// Flip the completed flag of an item. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn toggle(&self, id: &ShoppingListItemId) -> Result<bool, RepositoryError> {
        self.items.update(id, ShoppingListItem::toggle).await
    }

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub async fn save_all(&self, items: &[ShoppingListItem]) -> Result<(), RepositoryError> {
        self.items.save_all(items).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use pantry_core::ItemName;

    use super::*;
    use crate::storage::MemoryStore;

    fn milk() -> ShoppingListItem {
        ShoppingListItem {
            id: ShoppingListItemId::new("1"),
            name: ItemName::parse("Milk").unwrap(),
            completed: false,
            added_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_remove_only_item_leaves_empty_list() {
        let repo = ShoppingListRepository::new(Arc::new(MemoryStore::new()));
        repo.save_all(&[milk()]).await.unwrap();

        assert!(repo.remove(&ShoppingListItemId::new("1")).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores() {
        let repo = ShoppingListRepository::new(Arc::new(MemoryStore::new()));
        repo.save_all(&[milk()]).await.unwrap();
        let id = ShoppingListItemId::new("1");

        repo.toggle(&id).await.unwrap();
        assert!(repo.list().await.unwrap()[0].completed);

        repo.toggle(&id).await.unwrap();
        assert!(!repo.list().await.unwrap()[0].completed);
    }

    #[tokio::test]
    async fn test_toggle_only_touches_matching_item() {
        let repo = ShoppingListRepository::new(Arc::new(MemoryStore::new()));
        let other = ShoppingListItem::new(ItemName::parse("Bread").unwrap());
        repo.save_all(&[milk(), other.clone()]).await.unwrap();

        repo.toggle(&other.id).await.unwrap();
        let items = repo.list().await.unwrap();
        assert!(!items[0].completed);
        assert!(items[1].completed);
    }

    #[tokio::test]
    async fn test_toggle_missing_is_noop() {
        let repo = ShoppingListRepository::new(Arc::new(MemoryStore::new()));
        let item = milk();
        repo.save_all(std::slice::from_ref(&item)).await.unwrap();

        assert!(!repo.toggle(&ShoppingListItemId::new("2")).await.unwrap());
        assert_eq!(repo.list().await.unwrap(), vec![item]);
    }
}
