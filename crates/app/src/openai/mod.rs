//! Recipe generation through an `OpenAI`-compatible chat completion API.
//!
//! # Flow
//!
//! 1. The API key is supplied with [`RecipeGenerator::initialize`]
//! 2. Ingredient names are joined into the fixed recipe prompt
//! 3. One single-turn request is sent at temperature 0.7
//! 4. The first choice's text is parsed as a [`RecipeDraft`](pantry_core::RecipeDraft)
//!
//! No retries, no streaming. The request is bounded by the configured
//! timeout.

pub mod client;
pub mod error;
pub mod generator;
pub mod prompt;
pub mod types;

pub use client::ChatClient;
pub use error::GenerationError;
pub use generator::{RecipeGenerator, parse_recipe_content};
pub use prompt::build_recipe_prompt;
