//! Recipe commands.
//!
//! `generate` sends the whole pantry inventory to the chat completion API.

use std::io::Write;

use pantry_app::AppState;
use pantry_core::{Recipe, RecipeId};

use super::{CommandError, require};

/// List stored recipes, most recent first.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn list(state: &AppState) -> Result<(), CommandError> {
    let recipes = state.recipes().recipes();
    let mut out = std::io::stdout().lock();
    if recipes.is_empty() {
        writeln!(out, "No recipes yet. Run `pantry recipes generate`.")?;
        return Ok(());
    }
    for recipe in recipes {
        writeln!(
            out,
            "{}  {}  ({})",
            recipe.id,
            recipe.title,
            recipe.generated_at.format("%Y-%m-%d %H:%M")
        )?;
    }
    Ok(())
}

/// Generate a recipe from the pantry and print it.
///
/// # Errors
///
/// Returns an error if the pantry is empty, no API key is stored, or
/// generation fails.
pub async fn generate(state: &AppState) -> Result<(), CommandError> {
    let recipe = state.generate_from_inventory().await?;
    tracing::info!(id = %recipe.id, "Recipe generated");
    print_recipe(&recipe)
}

/// Print one recipe in full.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if no recipe has `id`.
pub fn show(state: &AppState, id: &str) -> Result<(), CommandError> {
    let recipe = state
        .recipes()
        .find(&RecipeId::new(id))
        .ok_or_else(|| CommandError::NotFound {
            kind: "recipe",
            id: id.to_owned(),
        })?;
    print_recipe(&recipe)
}

/// Delete a recipe.
///
/// # Errors
///
/// Returns `CommandError::NotFound` if no recipe has `id`.
pub async fn remove(state: &AppState, id: &str) -> Result<(), CommandError> {
    let removed = state.recipes().remove(&RecipeId::new(id)).await?;
    require(removed, "recipe", id)?;
    writeln!(std::io::stdout(), "Deleted {id}")?;
    Ok(())
}

fn print_recipe(recipe: &Recipe) -> Result<(), CommandError> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", recipe.title)?;
    writeln!(out, "ID: {}", recipe.id)?;
    writeln!(
        out,
        "Prep: {}  Cook: {}  Serves: {}",
        recipe.prep_time, recipe.cook_time, recipe.servings
    )?;
    writeln!(out)?;
    writeln!(out, "Ingredients:")?;
    for ingredient in &recipe.ingredients {
        writeln!(out, "  - {ingredient}")?;
    }
    writeln!(out)?;
    writeln!(out, "Steps:")?;
    for (n, step) in recipe.steps.iter().enumerate() {
        writeln!(out, "  {}. {step}", n + 1)?;
    }
    Ok(())
}
