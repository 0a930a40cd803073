//! Observable recipe collection and generation.
//!
//! Each [`RecipeStore::generate`] call takes a request token from a
//! monotonic counter. A later `generate` or a [`RecipeStore::cancel`]
//! advances the counter; a response whose token is no longer current is
//! dropped without being stored or published.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pantry_core::{Recipe, RecipeId};
use tracing::{debug, error, instrument};

use super::Observable;
use crate::error::AppError;
use crate::openai::RecipeGenerator;
use crate::repository::{RecipeRepository, SettingsRepository};

/// Snapshot published by [`RecipeStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeState {
    /// Recipes, most recent first.
    pub recipes: Vec<Recipe>,
    /// A load or generation is in progress.
    pub is_loading: bool,
    /// Message for the last failed operation.
    pub error: Option<String>,
}

/// Recipe state backed by a [`RecipeRepository`] and a [`RecipeGenerator`].
#[derive(Clone)]
pub struct RecipeStore {
    inner: Arc<RecipeStoreInner>,
}

struct RecipeStoreInner {
    repo: RecipeRepository,
    settings: SettingsRepository,
    generator: Arc<RecipeGenerator>,
    state: Observable<RecipeState>,
    latest_request: AtomicU64,
}

impl RecipeStore {
    /// Create a store. The generator is shared with the settings store,
    /// which installs and removes the API key.
    #[must_use]
    pub fn new(
        repo: RecipeRepository,
        settings: SettingsRepository,
        generator: Arc<RecipeGenerator>,
    ) -> Self {
        Self {
            inner: Arc::new(RecipeStoreInner {
                repo,
                settings,
                generator,
                state: Observable::default(),
                latest_request: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the state container.
    #[must_use]
    pub fn state(&self) -> &Observable<RecipeState> {
        &self.inner.state
    }

    /// Returns a copy of the current recipes.
    #[must_use]
    pub fn recipes(&self) -> Vec<Recipe> {
        self.inner.state.with(|s| s.recipes.clone())
    }

    /// Find a recipe in the current snapshot.
    #[must_use]
    pub fn find(&self, id: &RecipeId) -> Option<Recipe> {
        self.inner
            .state
            .with(|s| s.recipes.iter().find(|r| &r.id == id).cloned())
    }

    /// Reload the recipes from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read; the message is
    /// also recorded in the state.
    pub async fn load(&self) -> Result<(), AppError> {
        self.inner.state.update(|s| s.is_loading = true);
        match self.inner.repo.list().await {
            Ok(recipes) => {
                self.inner.state.update(|s| {
                    s.recipes = recipes;
                    s.is_loading = false;
                });
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error loading recipes");
                Err(self.record_error(e.into()))
            }
        }
    }

    /// Generate a recipe from `ingredient_names`, store it at the front of
    /// the collection and publish the new list.
    ///
    /// # Errors
    ///
    /// - `AppError::NoIngredients` for an empty list (no request is made)
    /// - `AppError::Generation(NotInitialized)` when no API key is stored
    /// - `AppError::Superseded` if a later `generate` or `cancel` replaced
    ///   this request while it was in flight; nothing is stored or published
    /// - any generation or repository error
    #[instrument(skip(self, ingredient_names), fields(ingredients = ingredient_names.len()))]
    pub async fn generate<S>(&self, ingredient_names: &[S]) -> Result<Recipe, AppError>
    where
        S: AsRef<str> + Sync,
    {
        if ingredient_names.is_empty() {
            return Err(self.record_error(AppError::NoIngredients));
        }

        let token = self.inner.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.update(|s| {
            s.is_loading = true;
            s.error = None;
        });

        if let Err(e) = self.ensure_generator().await {
            return Err(self.fail(token, e, "Error loading API key"));
        }

        let result = self.inner.generator.generate_recipe(ingredient_names).await;

        if !self.is_current(token) {
            debug!(token, "Discarding superseded recipe result");
            return Err(AppError::Superseded);
        }

        match result {
            Ok(recipe) => self.commit(token, recipe).await,
            Err(e) => Err(self.fail(token, e.into(), "Error generating recipe")),
        }
    }

    /// Store and publish the result of request `token`.
    ///
    /// The token is checked again under the repository write lock, so a
    /// cancel that lands while the collection is being read stores nothing.
    async fn commit(&self, token: u64, recipe: Recipe) -> Result<Recipe, AppError> {
        let latest = &self.inner.latest_request;
        let stored = self
            .inner
            .repo
            .add_if(recipe.clone(), || latest.load(Ordering::SeqCst) == token)
            .await;
        match stored {
            Ok(true) => {}
            Ok(false) => {
                debug!(token, "Discarding superseded recipe before save");
                return Err(AppError::Superseded);
            }
            Err(e) => return Err(self.fail(token, e.into(), "Error saving recipe")),
        }

        // A newer request owns the loading flag now.
        if !self.is_current(token) {
            debug!(token, "Recipe saved after its request was superseded");
            return Ok(recipe);
        }
        self.load().await?;
        Ok(recipe)
    }

    /// Abandon any in-flight generation.
    pub fn cancel(&self) {
        self.inner.latest_request.fetch_add(1, Ordering::SeqCst);
        self.inner.state.update(|s| s.is_loading = false);
        debug!("Recipe generation cancelled");
    }

    /// Delete a recipe. Returns `false` if no recipe has `id`.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the write or reload fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove(&self, id: &RecipeId) -> Result<bool, AppError> {
        match self.inner.repo.remove(id).await {
            Ok(removed) => {
                self.load().await?;
                Ok(removed)
            }
            Err(e) => {
                error!(error = %e, "Error deleting recipe");
                Err(self.record_error(e.into()))
            }
        }
    }

    /// Clear the recorded error message.
    pub fn clear_error(&self) {
        self.inner.state.update(|s| s.error = None);
    }

    /// Install the stored API key if the generator has none yet.
    async fn ensure_generator(&self) -> Result<(), AppError> {
        if self.inner.generator.is_initialized().await {
            return Ok(());
        }
        if let Some(key) = self.inner.settings.api_key().await? {
            self.inner.generator.initialize(&key).await?;
        }
        Ok(())
    }

    fn is_current(&self, token: u64) -> bool {
        self.inner.latest_request.load(Ordering::SeqCst) == token
    }

    fn fail(&self, token: u64, err: AppError, context: &str) -> AppError {
        err.log(context);
        self.finish_with_error(token, err)
    }

    /// Record a failure of request `token`, unless it has been superseded.
    fn finish_with_error(&self, token: u64, err: AppError) -> AppError {
        if self.is_current(token) {
            self.record_error(err)
        } else {
            AppError::Superseded
        }
    }

    fn record_error(&self, err: AppError) -> AppError {
        let message = err.user_message();
        self.inner.state.update(|s| {
            s.error = Some(message);
            s.is_loading = false;
        });
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pantry_core::ApiKey;

    use super::*;
    use crate::config::OpenAiConfig;
    use crate::openai::GenerationError;
    use crate::storage::{KeyValueStore, MemoryStore, keys};

    fn store() -> (Arc<MemoryStore>, Arc<MemoryStore>, RecipeStore) {
        let data = Arc::new(MemoryStore::new());
        let secrets = Arc::new(MemoryStore::new());
        let store = RecipeStore::new(
            RecipeRepository::new(data.clone()),
            SettingsRepository::new(secrets.clone()),
            Arc::new(RecipeGenerator::new(OpenAiConfig::default())),
        );
        (data, secrets, store)
    }

    fn recipe(title: &str) -> Recipe {
        Recipe::from_draft(pantry_core::RecipeDraft {
            title: title.to_string(),
            ingredients: vec!["flour".to_string()],
            steps: vec!["mix".to_string()],
            prep_time: "5 minutes".to_string(),
            cook_time: "10 minutes".to_string(),
            servings: "2 servings".to_string(),
        })
    }

    #[tokio::test]
    async fn test_generate_without_ingredients() {
        let (data, _, store) = store();
        let result = store.generate::<&str>(&[]).await;

        assert!(matches!(result, Err(AppError::NoIngredients)));
        assert_eq!(
            store.state().get().error.as_deref(),
            Some("Please add some ingredients to your pantry first.")
        );
        assert!(data.get(keys::RECIPES).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generate_without_api_key() {
        let (data, _, store) = store();
        let result = store.generate(&["eggs"]).await;

        assert!(matches!(
            result,
            Err(AppError::Generation(GenerationError::NotInitialized))
        ));
        let state = store.state().get();
        assert!(!state.is_loading);
        assert_eq!(
            state.error.as_deref(),
            Some("Please set your OpenAI API key in Settings to generate recipes.")
        );
        assert!(data.get(keys::RECIPES).await.unwrap().is_none());

        store.clear_error();
        assert!(store.state().get().error.is_none());
    }

    #[tokio::test]
    async fn test_generate_picks_up_stored_key() {
        let (_, secrets, store) = store();
        let key = ApiKey::parse("sk-test-1234567890").unwrap();
        SettingsRepository::new(secrets.clone())
            .set_api_key(&key)
            .await
            .unwrap();

        store.ensure_generator().await.unwrap();
        assert!(store.inner.generator.is_initialized().await);
    }

    #[tokio::test]
    async fn test_cancel_supersedes_token() {
        let (_, _, store) = store();
        let token = store.inner.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        assert!(store.is_current(token));

        store.cancel();
        assert!(!store.is_current(token));
        assert!(matches!(
            store.finish_with_error(token, AppError::NoIngredients),
            AppError::Superseded
        ));
        assert!(store.state().get().error.is_none());
    }

    #[tokio::test]
    async fn test_commit_after_cancel_stores_nothing() {
        let (data, _, store) = store();
        let token = store.inner.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        store.cancel();

        let result = store.commit(token, recipe("Pancakes")).await;

        assert!(matches!(result, Err(AppError::Superseded)));
        assert!(data.get(keys::RECIPES).await.unwrap().is_none());
        assert!(store.recipes().is_empty());
    }

    #[tokio::test]
    async fn test_commit_current_publishes() {
        let (_, _, store) = store();
        let token = store.inner.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let pancakes = recipe("Pancakes");

        let saved = store.commit(token, pancakes.clone()).await.unwrap();

        assert_eq!(saved, pancakes);
        assert_eq!(store.recipes(), vec![pancakes]);
        assert!(!store.state().get().is_loading);
    }

    #[tokio::test]
    async fn test_remove_recipe() {
        let (data, _, store) = store();
        let repo = RecipeRepository::new(data.clone());
        let recipe = recipe("Pancakes");
        repo.add(recipe.clone()).await.unwrap();
        store.load().await.unwrap();
        assert_eq!(store.find(&recipe.id), Some(recipe.clone()));

        assert!(store.remove(&recipe.id).await.unwrap());
        assert!(store.recipes().is_empty());
        assert!(!store.remove(&recipe.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_load_failure_records_error() {
        let (data, _, store) = store();
        data.set_unavailable(true);

        assert!(store.load().await.is_err());
        let state = store.state().get();
        assert!(!state.is_loading);
        assert!(state.error.is_some());
    }
}
