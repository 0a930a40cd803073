//! Collection repositories over the key-value store.
//!
//! # Collections
//!
//! - [`InventoryRepository`] - pantry items, appended in insertion order
//! - [`ShoppingListRepository`] - shopping list items, appended, toggleable
//! - [`RecipeRepository`] - generated recipes, most recent first
//! - [`SettingsRepository`] - the API key, in the secret store
//!
//! Every mutation reads the whole collection, changes it, and writes the
//! whole collection back. Mutations through one repository (and its clones)
//! are serialized by a single-writer lock so concurrent adds cannot overwrite
//! each other.

pub mod collection;
pub mod inventory;
pub mod recipes;
pub mod settings;
pub mod shopping_list;

use thiserror::Error;

use crate::storage::StorageError;

pub use collection::{CollectionRepository, Placement};
pub use inventory::InventoryRepository;
pub use recipes::RecipeRepository;
pub use settings::SettingsRepository;
pub use shopping_list::ShoppingListRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Data in the store is not a valid collection.
    #[error("data corruption under {key}: {source}")]
    Corrupt {
        /// Storage key holding the bad data.
        key: &'static str,
        /// JSON decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A collection could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}
