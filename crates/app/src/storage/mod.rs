//! Persistent key-value storage.
//!
//! # Layout
//!
//! - General store: one JSON array per collection under [`keys::INVENTORY`],
//!   [`keys::SHOPPING_LIST`] and [`keys::RECIPES`]
//! - Secret store: the API key under [`keys::API_KEY`], in a separate
//!   [`FileStore::secure`] directory
//!
//! A missing key means "no data". Store failures are returned as
//! [`StorageError`], never folded into an empty result.

pub mod file;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Fixed storage keys.
pub mod keys {
    /// Inventory items collection.
    pub const INVENTORY: &str = "inventory_items";
    /// Shopping list items collection.
    pub const SHOPPING_LIST: &str = "shopping_list_items";
    /// Generated recipes collection.
    pub const RECIPES: &str = "recipes";
    /// Chat completion API key (secret store only).
    pub const API_KEY: &str = "openai_api_key";
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading a value failed.
    #[error("failed to read {key}: {source}")]
    Read {
        /// Key being read.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing a value failed.
    #[error("failed to write {key}: {source}")]
    Write {
        /// Key being written.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Deleting a value failed.
    #[error("failed to delete {key}: {source}")]
    Delete {
        /// Key being deleted.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters that are not allowed.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The store cannot be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A durable string-to-string store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to a key-value store.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Check that a key is non-empty and only uses ASCII alphanumerics, `_` or `-`.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}
