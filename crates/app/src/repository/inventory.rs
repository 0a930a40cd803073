//! Inventory repository.

use pantry_core::{InventoryItem, InventoryItemId};

use super::{CollectionRepository, Placement, RepositoryError};
use crate::storage::{SharedStore, keys};

/// Repository for pantry inventory items.
#[derive(Clone)]
pub struct InventoryRepository {
    items: CollectionRepository<InventoryItem>,
}

impl InventoryRepository {
    /// Create a new inventory repository.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            items: CollectionRepository::new(store, keys::INVENTORY, Placement::Append),
        }
    }

    /// List all items in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub async fn list(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        self.items.list().await
    }

    /// Append an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn add(&self, item: InventoryItem) -> Result<(), RepositoryError> {
        self.items.add(item).await
    }

    /// Remove an item. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn remove(&self, id: &InventoryItemId) -> Result<bool, RepositoryError> {
        self.items.remove(id).await
    }

    /// Replace the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written.
    pub async fn save_all(&self, items: &[InventoryItem]) -> Result<(), RepositoryError> {
        self.items.save_all(items).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pantry_core::ItemName;

    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_add_tomatoes_to_empty_inventory() {
        let repo = InventoryRepository::new(Arc::new(MemoryStore::new()));
        let item = InventoryItem::new(ItemName::parse("Tomatoes").unwrap(), Some("2 lbs"));
        repo.add(item.clone()).await.unwrap();

        let items = repo.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, item.id);
        assert_eq!(items[0].name.as_str(), "Tomatoes");
        assert_eq!(items[0].quantity.as_deref(), Some("2 lbs"));
    }

    #[tokio::test]
    async fn test_remove_missing_leaves_collection() {
        let repo = InventoryRepository::new(Arc::new(MemoryStore::new()));
        let item = InventoryItem::new(ItemName::parse("Rice").unwrap(), None);
        repo.add(item).await.unwrap();
        let before = repo.list().await.unwrap();

        assert!(!repo.remove(&InventoryItemId::new("nope")).await.unwrap());
        assert_eq!(repo.list().await.unwrap(), before);
    }
}
