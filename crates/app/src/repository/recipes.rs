//! Recipe repository.

use pantry_core::{Recipe, RecipeId};

use super::{CollectionRepository, Placement, RepositoryError};
use crate::storage::{SharedStore, keys};

/// Repository for generated recipes, kept most recent first.
#[derive(Clone)]
pub struct RecipeRepository {
    recipes: CollectionRepository<Recipe>,
}

impl RecipeRepository {
    /// Create a new recipe repository.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self {
            recipes: CollectionRepository::new(store, keys::RECIPES, Placement::Prepend),
        }
    }

    /// List all recipes, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub async fn list(&self) -> Result<Vec<Recipe>, RepositoryError> {
        self.recipes.list().await
    }

    /// Find a recipe by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read.
    pub async fn get(&self, id: &RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        Ok(self
            .recipes
            .list()
            .await?
            .into_iter()
            .find(|recipe| &recipe.id == id))
    }

    /// Insert a recipe at the front of the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn add(&self, recipe: Recipe) -> Result<(), RepositoryError> {
        self.recipes.add(recipe).await
    }

    /// Insert a recipe at the front unless `keep` returns `false` once the
    /// collection is locked for writing. Returns whether it was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn add_if<F>(&self, recipe: Recipe, keep: F) -> Result<bool, RepositoryError>
    where
        F: FnOnce() -> bool + Send,
    {
        self.recipes.add_if(recipe, keep).await
    }

    /// Remove a recipe. Unknown IDs are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub async fn remove(&self, id: &RecipeId) -> Result<bool, RepositoryError> {
        self.recipes.remove(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use pantry_core::RecipeDraft;

    use super::*;
    use crate::storage::MemoryStore;

    fn recipe(title: &str) -> Recipe {
        Recipe::from_draft(RecipeDraft {
            title: title.to_string(),
            ingredients: vec!["eggs".to_string()],
            steps: vec!["cook".to_string()],
            prep_time: "5 minutes".to_string(),
            cook_time: "5 minutes".to_string(),
            servings: "1 serving".to_string(),
        })
    }

    #[tokio::test]
    async fn test_newest_first() {
        let repo = RecipeRepository::new(Arc::new(MemoryStore::new()));
        repo.add(recipe("A")).await.unwrap();
        repo.add(recipe("B")).await.unwrap();

        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_get_and_remove() {
        let repo = RecipeRepository::new(Arc::new(MemoryStore::new()));
        let omelette = recipe("Omelette");
        repo.add(omelette.clone()).await.unwrap();

        assert_eq!(repo.get(&omelette.id).await.unwrap(), Some(omelette.clone()));
        assert!(repo.remove(&omelette.id).await.unwrap());
        assert!(repo.get(&omelette.id).await.unwrap().is_none());
    }
}
