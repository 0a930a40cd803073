//! The fixed recipe generation prompt.

/// Prompt template; `{ingredients}` is replaced with the ingredient list.
pub const RECIPE_GENERATION_PROMPT: &str = r#"Generate a recipe using these ingredients: {ingredients}

Please provide a complete recipe in the following JSON format:
{
  "title": "Recipe Name",
  "ingredients": ["ingredient 1", "ingredient 2", ...],
  "steps": ["step 1", "step 2", ...],
  "prepTime": "X minutes",
  "cookTime": "X minutes",
  "servings": "X servings"
}

Make sure to:
- Use as many of the provided ingredients as possible
- Suggest common pantry staples for missing ingredients
- Provide clear, step-by-step instructions
- Include realistic cooking times
- Make the recipe practical and delicious"#;

const INGREDIENTS_PLACEHOLDER: &str = "{ingredients}";
const INGREDIENT_SEPARATOR: &str = ", ";

/// Fill the prompt template with a comma-separated ingredient list.
#[must_use]
pub fn build_recipe_prompt<S: AsRef<str>>(ingredient_names: &[S]) -> String {
    let ingredients = ingredient_names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(INGREDIENT_SEPARATOR);
    RECIPE_GENERATION_PROMPT.replace(INGREDIENTS_PLACEHOLDER, &ingredients)
}
