//! Pantry inventory commands.
//!
//! # Usage
//!
//! ```bash
//! pantry inventory add Tomatoes --quantity "2 lbs"
//! pantry inventory list
//! pantry inventory remove <id>
//! ```

use std::io::Write;

use pantry_app::AppState;
use pantry_core::InventoryItemId;

use super::{CommandError, require};

/// List every pantry item.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn list(state: &AppState) -> Result<(), CommandError> {
    let items = state.inventory().items();
    let mut out = std::io::stdout().lock();
    if items.is_empty() {
        writeln!(out, "Your pantry is empty.")?;
        return Ok(());
    }
    for item in items {
        match &item.quantity {
            Some(quantity) => writeln!(out, "{}  {} ({quantity})", item.id, item.name)?,
            None => writeln!(out, "{}  {}", item.id, item.name)?,
        }
    }
    Ok(())
}

/// Add an item to the pantry.
///
/// # Errors
///
/// Returns an error if the name is blank or the item cannot be stored.
pub async fn add(state: &AppState, name: &str, quantity: Option<&str>) -> Result<(), CommandError> {
    let item = state.inventory().add(name, quantity).await?;
    tracing::info!(id = %item.id, "Pantry item added");
    writeln!(std::io::stdout(), "Added {} ({})", item.name, item.id)?;
    Ok(())
}

/// Remove an item from the pantry.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if no item has `id`.
pub async fn remove(state: &AppState, id: &str) -> Result<(), CommandError> {
    let removed = state.inventory().remove(&InventoryItemId::new(id)).await?;
    require(removed, "pantry item", id)?;
    writeln!(std::io::stdout(), "Removed {id}")?;
    Ok(())
}
