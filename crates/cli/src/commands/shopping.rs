//! Shopping list commands.

use std::io::Write;

use pantry_app::AppState;
use pantry_core::ShoppingListItemId;

use super::{CommandError, require};

/// Show the shopping list with completion marks.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn show(state: &AppState) -> Result<(), CommandError> {
    let store = state.shopping_list();
    let items = store.items();
    let mut out = std::io::stdout().lock();
    if items.is_empty() {
        writeln!(out, "Your shopping list is empty.")?;
        return Ok(());
    }
    for item in &items {
        let mark = if item.completed { "x" } else { " " };
        writeln!(out, "[{mark}] {}  {}", item.id, item.name)?;
    }
    writeln!(out, "{}/{} completed", store.completed_count(), items.len())?;
    Ok(())
}

/// Add an item to the shopping list.
///
/// # Errors
///
/// Returns an error if the name is blank or the item cannot be stored.
pub async fn add(state: &AppState, name: &str) -> Result<(), CommandError> {
    let item = state.shopping_list().add(name).await?;
    writeln!(std::io::stdout(), "Added {} ({})", item.name, item.id)?;
    Ok(())
}

/// Remove an item from the shopping list.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if no item has `id`.
pub async fn remove(state: &AppState, id: &str) -> Result<(), CommandError> {
    let removed = state
        .shopping_list()
        .remove(&ShoppingListItemId::new(id))
        .await?;
    require(removed, "shopping list item", id)?;
    writeln!(std::io::stdout(), "Removed {id}")?;
    Ok(())
}

/// Check off an item, or uncheck it if it is already checked.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if no item has `id`.
pub async fn toggle(state: &AppState, id: &str) -> Result<(), CommandError> {
    let id = ShoppingListItemId::new(id);
    let toggled = state.shopping_list().toggle(&id).await?;
    require(toggled, "shopping list item", id.as_str())?;

    let completed = state
        .shopping_list()
        .state()
        .with(|s| s.items.iter().any(|i| i.id == id && i.completed));
    let status = if completed { "completed" } else { "not completed" };
    writeln!(std::io::stdout(), "Marked {id} as {status}")?;
    Ok(())
}
