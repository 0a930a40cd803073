//! API key commands.

use std::io::Write;

use pantry_app::AppState;
use pantry_app::state::SettingsState;

use super::CommandError;

/// Show whether a key is stored, masked.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn show(state: &AppState) -> Result<(), CommandError> {
    let masked = state.settings().state().with(SettingsState::masked_api_key);
    let mut out = std::io::stdout().lock();
    match masked {
        Some(masked) => writeln!(out, "OpenAI API key: {masked}")?,
        None => writeln!(out, "OpenAI API key: not set")?,
    }
    Ok(())
}

/// Store a new key.
///
/// # Errors
///
/// Returns an error if the key does not start with `sk-` or cannot be stored.
pub async fn set_key(state: &AppState, key: &str) -> Result<(), CommandError> {
    state.settings().set_api_key(key).await?;
    writeln!(std::io::stdout(), "API key saved.")?;
    Ok(())
}

/// Delete the stored key.
///
/// # Errors
///
/// Returns an error if the key cannot be deleted.
pub async fn remove_key(state: &AppState) -> Result<(), CommandError> {
    state.settings().remove_api_key().await?;
    writeln!(std::io::stdout(), "API key removed.")?;
    Ok(())
}
