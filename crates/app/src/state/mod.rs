//! Observable application state.
//!
//! One store per collection plus the API key setting. Each store caches its
//! collection in an [`Observable`] snapshot, delegates mutations to its
//! repository, then reloads the collection and publishes it.
//!
//! [`AppState`] is the composition root that wires stores, repositories and
//! the recipe generator together.

pub mod inventory;
pub mod observable;
pub mod recipes;
pub mod settings;
pub mod shopping_list;

use std::sync::Arc;

use pantry_core::Recipe;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::openai::RecipeGenerator;
use crate::repository::{
    InventoryRepository, RecipeRepository, SettingsRepository, ShoppingListRepository,
};
use crate::storage::{FileStore, SharedStore};

pub use inventory::{InventoryState, InventoryStore};
pub use observable::Observable;
pub use recipes::{RecipeState, RecipeStore};
pub use settings::{SettingsState, SettingsStore};
pub use shopping_list::{ShoppingListState, ShoppingListStore};

/// Counts shown on the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PantrySummary {
    /// Items in the pantry.
    pub inventory_count: usize,
    /// Items on the shopping list.
    pub shopping_total: usize,
    /// Checked-off shopping list items.
    pub shopping_completed: usize,
    /// Stored recipes.
    pub recipe_count: usize,
    /// Whether an API key is stored.
    pub has_api_key: bool,
}

/// Application state shared across the UI.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    inventory: InventoryStore,
    shopping_list: ShoppingListStore,
    recipes: RecipeStore,
    settings: SettingsStore,
}

impl AppState {
    /// Build the state over file stores in the configured directories.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let data: SharedStore = Arc::new(FileStore::new(&config.data_dir));
        let secrets: SharedStore = Arc::new(FileStore::secure(&config.secrets_dir));
        Self::with_stores(data, secrets, RecipeGenerator::new(config.openai.clone()))
    }

    /// Build the state over explicit stores.
    ///
    /// `data` holds the collections, `secrets` holds the API key.
    #[must_use]
    pub fn with_stores(data: SharedStore, secrets: SharedStore, generator: RecipeGenerator) -> Self {
        let generator = Arc::new(generator);
        let settings_repo = SettingsRepository::new(secrets);

        Self {
            inner: Arc::new(AppStateInner {
                inventory: InventoryStore::new(InventoryRepository::new(Arc::clone(&data))),
                shopping_list: ShoppingListStore::new(ShoppingListRepository::new(Arc::clone(
                    &data,
                ))),
                recipes: RecipeStore::new(
                    RecipeRepository::new(data),
                    settings_repo.clone(),
                    Arc::clone(&generator),
                ),
                settings: SettingsStore::new(settings_repo, generator),
            }),
        }
    }

    #[must_use]
    pub fn inventory(&self) -> &InventoryStore {
        &self.inner.inventory
    }

    #[must_use]
    pub fn shopping_list(&self) -> &ShoppingListStore {
        &self.inner.shopping_list
    }

    #[must_use]
    pub fn recipes(&self) -> &RecipeStore {
        &self.inner.recipes
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }

    /// Load every store.
    ///
    /// All stores are loaded even if one fails.
    ///
    /// # Errors
    ///
    /// Returns the first failure, in store order.
    pub async fn load_all(&self) -> Result<(), AppError> {
        let (inventory, shopping_list, recipes, settings) = tokio::join!(
            self.inner.inventory.load(),
            self.inner.shopping_list.load(),
            self.inner.recipes.load(),
            self.inner.settings.load(),
        );
        inventory?;
        shopping_list?;
        recipes?;
        settings
    }

    /// Generate a recipe from every inventory item name.
    ///
    /// # Errors
    ///
    /// See [`RecipeStore::generate`].
    pub async fn generate_from_inventory(&self) -> Result<Recipe, AppError> {
        let names = self.inner.inventory.ingredient_names();
        self.inner.recipes.generate(&names).await
    }

    /// Counts from the current snapshots.
    #[must_use]
    pub fn summary(&self) -> PantrySummary {
        let (shopping_total, shopping_completed) = self
            .inner
            .shopping_list
            .state()
            .with(|s| (s.items.len(), s.completed_count()));

        PantrySummary {
            inventory_count: self.inner.inventory.state().with(|s| s.items.len()),
            shopping_total,
            shopping_completed,
            recipe_count: self.inner.recipes.state().with(|s| s.recipes.len()),
            has_api_key: self.inner.settings.has_api_key(),
        }
    }
}
