//! Recipe generation on top of [`ChatClient`].

use pantry_core::{ApiKey, Recipe, RecipeDraft};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::OpenAiConfig;

use super::client::ChatClient;
use super::error::GenerationError;
use super::prompt::build_recipe_prompt;
use super::types::ChatMessage;

/// Sampling temperature for every recipe request.
pub const RECIPE_TEMPERATURE: f32 = 0.7;

const CODE_FENCE: &str = "```";

/// Generates recipes from ingredient names.
///
/// Starts without a credential; [`generate`](Self::generate) fails with
/// [`GenerationError::NotInitialized`] until [`initialize`](Self::initialize)
/// is called.
#[derive(Debug)]
pub struct RecipeGenerator {
    config: OpenAiConfig,
    client: RwLock<Option<ChatClient>>,
}

impl RecipeGenerator {
    /// Create an uninitialized generator.
    #[must_use]
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
        }
    }

    /// Install the API key, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Client` if no HTTP client can be built for
    /// the key.
    pub async fn initialize(&self, api_key: &ApiKey) -> Result<(), GenerationError> {
        let client = ChatClient::new(&self.config, api_key)?;
        *self.client.write().await = Some(client);
        debug!("Recipe generator initialized");
        Ok(())
    }

    /// Drop the API key.
    pub async fn reset(&self) {
        *self.client.write().await = None;
        debug!("Recipe generator reset");
    }

    /// Returns whether an API key is installed.
    pub async fn is_initialized(&self) -> bool {
        self.client.read().await.is_some()
    }

    /// Ask the API for a recipe using `ingredient_names`.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` if no API key is installed (no request is made)
    /// - `EmptyResponse` if the API returned no text
    /// - `MalformedResponse` if the text is not a valid recipe
    /// - transport and API status errors from [`ChatClient::complete`]
    #[instrument(skip(self, ingredient_names), fields(ingredients = ingredient_names.len()))]
    pub async fn generate<S>(&self, ingredient_names: &[S]) -> Result<RecipeDraft, GenerationError>
    where
        S: AsRef<str> + Sync,
    {
        let client = self
            .client
            .read()
            .await
            .clone()
            .ok_or(GenerationError::NotInitialized)?;

        let prompt = build_recipe_prompt(ingredient_names);
        let response = client
            .complete(vec![ChatMessage::user(prompt)], RECIPE_TEMPERATURE)
            .await?;

        if let Some(usage) = &response.usage {
            debug!(
                model = response.model.as_deref(),
                finish_reason = response.finish_reason(),
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion received"
            );
        }

        let content = response
            .first_content()
            .ok_or(GenerationError::EmptyResponse)?;

        let draft = parse_recipe_content(content).inspect_err(|e| {
            debug!(error = %e, "Recipe response could not be parsed");
        })?;
        debug!(title = %draft.title, "Generated recipe");
        Ok(draft)
    }

    /// Like [`generate`](Self::generate), but returns a [`Recipe`] with a new
    /// ID and generation time.
    ///
    /// # Errors
    ///
    /// Same as [`generate`](Self::generate).
    pub async fn generate_recipe<S>(&self, ingredient_names: &[S]) -> Result<Recipe, GenerationError>
    where
        S: AsRef<str> + Sync,
    {
        self.generate(ingredient_names).await.map(Recipe::from_draft)
    }
}

/// Parse the model's text as a recipe.
///
/// A single surrounding Markdown code fence (with or without a language tag)
/// is removed first.
///
/// # Errors
///
/// Returns `GenerationError::MalformedResponse` if the text is not a JSON
/// object with every recipe field of the right type, or if the title is blank.
pub fn parse_recipe_content(content: &str) -> Result<RecipeDraft, GenerationError> {
    let json = strip_code_fence(content);
    let draft: RecipeDraft = serde_json::from_str(json)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
    draft
        .validate()
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
    Ok(draft)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix(CODE_FENCE) else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix(CODE_FENCE) else {
        return trimmed;
    };
    let body = body.trim_start();
    if body.starts_with('{') {
        return body.trim_end();
    }
    // Skip the language tag line (e.g. "json")
    body.split_once('\n').map_or(body, |(_, inner)| inner).trim()
}
