//! Shopping list items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{Entity, ShoppingListItemId};
use super::name::ItemName;

/// An entry on the shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    /// Unique ID within the shopping list.
    pub id: ShoppingListItemId,
    /// Trimmed, non-empty item name.
    pub name: ItemName,
    /// Whether the item has been picked up.
    #[serde(default)]
    pub completed: bool,
    /// When the item was added.
    pub added_at: DateTime<Utc>,
}

impl ShoppingListItem {
    /// Create a new, not yet completed, shopping list item.
    #[must_use]
    pub fn new(name: ItemName) -> Self {
        Self {
            id: ShoppingListItemId::generate(),
            name,
            completed: false,
            added_at: Utc::now(),
        }
    }

    /// Flip the completed flag.
    pub const fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

impl Entity for ShoppingListItem {
    type Id = ShoppingListItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
