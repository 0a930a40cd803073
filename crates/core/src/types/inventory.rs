//! Pantry inventory items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{Entity, InventoryItemId};
use super::name::ItemName;

/// An item currently in the pantry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique ID within the inventory.
    pub id: InventoryItemId,
    /// Trimmed, non-empty item name.
    pub name: ItemName,
    /// Free-text quantity (e.g. "2 lbs").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    /// When the item was added.
    pub added_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Create a new inventory item with a fresh ID and the current time.
    ///
    /// The quantity is trimmed; a blank quantity is stored as `None`.
    #[must_use]
    pub fn new(name: ItemName, quantity: Option<&str>) -> Self {
        Self {
            id: InventoryItemId::generate(),
            name,
            quantity: quantity
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_owned),
            added_at: Utc::now(),
        }
    }
}

impl Entity for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
