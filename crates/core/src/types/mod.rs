//! Core types for the pantry tracker.
//!
//! This module provides type-safe wrappers for the persisted entities.

pub mod api_key;
pub mod id;
pub mod inventory;
pub mod name;
pub mod recipe;
pub mod shopping;

pub use api_key::{ApiKey, ApiKeyError};
pub use id::*;
pub use inventory::InventoryItem;
pub use name::{ItemName, NameError};
pub use recipe::{Recipe, RecipeDraft, RecipeDraftError};
pub use shopping::ShoppingListItem;
