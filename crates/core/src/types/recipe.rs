//! Generated recipes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{Entity, RecipeId};

/// Errors found when checking a [`RecipeDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecipeDraftError {
    /// The title is empty or only whitespace.
    #[error("recipe title is empty")]
    EmptyTitle,
}

/// A recipe as returned by the text generation API, before it is stored.
///
/// Every field is required and must have the right JSON type; serde rejects
/// the payload otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    /// Recipe name.
    pub title: String,
    /// Ingredient lines, in order.
    pub ingredients: Vec<String>,
    /// Preparation steps, in order.
    pub steps: Vec<String>,
    /// Free-text preparation time (e.g. "10 minutes").
    pub prep_time: String,
    /// Free-text cooking time.
    pub cook_time: String,
    /// Free-text serving count (e.g. "4 servings").
    pub servings: String,
}

impl RecipeDraft {
    /// Check the draft beyond what the JSON shape guarantees.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeDraftError::EmptyTitle`] if the title is blank.
    pub fn validate(&self) -> Result<(), RecipeDraftError> {
        if self.title.trim().is_empty() {
            return Err(RecipeDraftError::EmptyTitle);
        }
        Ok(())
    }
}

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique ID within the recipe collection.
    pub id: RecipeId,
    /// Recipe name.
    pub title: String,
    /// Ingredient lines, in order.
    pub ingredients: Vec<String>,
    /// Preparation steps, in order.
    pub steps: Vec<String>,
    /// Free-text preparation time.
    pub prep_time: String,
    /// Free-text cooking time.
    pub cook_time: String,
    /// Free-text serving count.
    pub servings: String,
    /// When the recipe was generated.
    pub generated_at: DateTime<Utc>,
}

impl Recipe {
    /// Build a recipe from a generated draft, assigning a new ID and
    /// stamping the generation time.
    #[must_use]
    pub fn from_draft(draft: RecipeDraft) -> Self {
        Self {
            id: RecipeId::generate(),
            title: draft.title,
            ingredients: draft.ingredients,
            steps: draft.steps,
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            servings: draft.servings,
            generated_at: Utc::now(),
        }
    }
}

impl Entity for Recipe {
    type Id = RecipeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
