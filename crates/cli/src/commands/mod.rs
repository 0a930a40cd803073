//! Command implementations.
//!
//! Every command acts on one store and writes a plain-text report to
//! stdout. Only the stores a command reads are loaded beforehand.

pub mod inventory;
pub mod recipes;
pub mod settings;
pub mod shopping;

use std::io::Write;

use pantry_app::{AppError, AppState};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The application layer failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// No entry has the given ID.
    #[error("No {kind} with ID {id}")]
    NotFound {
        /// Kind of entry.
        kind: &'static str,
        /// ID that was looked up.
        id: String,
    },

    /// Writing the report failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

impl CommandError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::App(e) => e.user_message(),
            _ => self.to_string(),
        }
    }

    /// Returns whether this error should be reported to error tracking.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::App(e) => e.is_internal(),
            Self::NotFound { .. } => false,
            Self::Output(_) => true,
        }
    }
}

/// Returns `Ok` if `found`, otherwise a [`CommandError::NotFound`].
pub(crate) fn require(found: bool, kind: &'static str, id: &str) -> Result<(), CommandError> {
    if found {
        Ok(())
    } else {
        Err(CommandError::NotFound {
            kind,
            id: id.to_owned(),
        })
    }
}

/// Print the home screen counts.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn summary(state: &AppState) -> Result<(), CommandError> {
    let summary = state.summary();
    let mut out = std::io::stdout().lock();
    writeln!(out, "Pantry items:   {}", summary.inventory_count)?;
    writeln!(
        out,
        "Shopping list:  {}/{} completed",
        summary.shopping_completed, summary.shopping_total
    )?;
    writeln!(out, "Recipes:        {}", summary.recipe_count)?;
    writeln!(
        out,
        "API key:        {}",
        if summary.has_api_key { "set" } else { "not set" }
    )?;
    Ok(())
}
