//! Pantry CLI - track pantry items and a shopping list, generate recipes.
//!
//! # Usage
//!
//! ```bash
//! # Stock the pantry
//! pantry inventory add Tomatoes --quantity "2 lbs"
//! pantry inventory add Basil
//!
//! # Shopping list
//! pantry list add Bread
//! pantry list toggle <id>
//!
//! # Recipes (needs an OpenAI API key)
//! pantry settings set-key sk-...
//! pantry recipes generate
//! ```
//!
//! # Commands
//!
//! - `inventory` - Pantry items
//! - `list` - Shopping list
//! - `recipes` - Generated recipes
//! - `settings` - OpenAI API key
//! - `summary` - Counts at a glance

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pantry_app::{AppConfig, AppState};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(author, version, about = "Pantry tracker with AI recipe generation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage pantry items
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Manage the shopping list
    List {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Generate and browse recipes
    Recipes {
        #[command(subcommand)]
        action: RecipeAction,
    },
    /// Manage the OpenAI API key
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show counts for every collection
    Summary,
}

#[derive(Subcommand)]
enum InventoryAction {
    /// List pantry items
    List,
    /// Add a pantry item
    Add {
        /// Item name
        name: String,

        /// Free-text quantity (e.g. "2 lbs")
        #[arg(short, long)]
        quantity: Option<String>,
    },
    /// Remove a pantry item
    Remove {
        /// Item ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// Show the shopping list
    Show,
    /// Add a shopping list item
    Add {
        /// Item name
        name: String,
    },
    /// Remove a shopping list item
    Remove {
        /// Item ID
        id: String,
    },
    /// Check or uncheck a shopping list item
    Toggle {
        /// Item ID
        id: String,
    },
}

#[derive(Subcommand)]
enum RecipeAction {
    /// List recipes, most recent first
    List,
    /// Generate a recipe from the pantry
    Generate,
    /// Show a recipe
    Show {
        /// Recipe ID
        id: String,
    },
    /// Delete a recipe
    Remove {
        /// Recipe ID
        id: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show the stored key (masked)
    Show,
    /// Store an API key
    SetKey {
        /// Key starting with "sk-"
        key: String,
    },
    /// Delete the stored API key
    RemoveKey,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry: errors and warnings become events, the rest breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pantry_app=info,pantry_cli=info".into());

    // Logs go to stderr so command output stays clean
    let json_layer = config.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!config.log_json)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _sentry_guard = init_sentry(&config);
    init_tracing(&config);

    let state = AppState::from_config(&config);

    match run(cli, &state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_internal() {
                tracing::error!(error = %e, "Command failed");
            } else {
                tracing::debug!(error = %e, "Command rejected");
            }
            let _ = writeln!(std::io::stderr(), "{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

/// Load the stores `command` reads snapshots from. Mutations read their
/// collection through the repository, so a damaged file only blocks the
/// commands that touch it.
async fn load_stores(command: &Commands, state: &AppState) -> Result<(), CommandError> {
    match command {
        Commands::Inventory {
            action: InventoryAction::List,
        } => state.inventory().load().await?,
        Commands::List {
            action: ListAction::Show,
        } => state.shopping_list().load().await?,
        Commands::Recipes {
            action: RecipeAction::List | RecipeAction::Show { .. },
        } => state.recipes().load().await?,
        Commands::Recipes {
            action: RecipeAction::Generate,
        } => {
            state.inventory().load().await?;
            state.settings().load().await?;
        }
        Commands::Settings {
            action: SettingsAction::Show,
        } => state.settings().load().await?,
        Commands::Summary => {
            // Every store logs its own failure; show whatever loaded.
            if let Err(e) = state.load_all().await {
                tracing::debug!(error = %e, "Summary is missing a collection");
            }
        }
        _ => {}
    }
    Ok(())
}

async fn run(cli: Cli, state: &AppState) -> Result<(), CommandError> {
    load_stores(&cli.command, state).await?;

    match cli.command {
        Commands::Inventory { action } => match action {
            InventoryAction::List => commands::inventory::list(state)?,
            InventoryAction::Add { name, quantity } => {
                commands::inventory::add(state, &name, quantity.as_deref()).await?;
            }
            InventoryAction::Remove { id } => commands::inventory::remove(state, &id).await?,
        },
        Commands::List { action } => match action {
            ListAction::Show => commands::shopping::show(state)?,
            ListAction::Add { name } => commands::shopping::add(state, &name).await?,
            ListAction::Remove { id } => commands::shopping::remove(state, &id).await?,
            ListAction::Toggle { id } => commands::shopping::toggle(state, &id).await?,
        },
        Commands::Recipes { action } => match action {
            RecipeAction::List => commands::recipes::list(state)?,
            RecipeAction::Generate => commands::recipes::generate(state).await?,
            RecipeAction::Show { id } => commands::recipes::show(state, &id)?,
            RecipeAction::Remove { id } => commands::recipes::remove(state, &id).await?,
        },
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(state)?,
            SettingsAction::SetKey { key } => commands::settings::set_key(state, &key).await?,
            SettingsAction::RemoveKey => commands::settings::remove_key(state).await?,
        },
        Commands::Summary => commands::summary(state)?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    /// State over a temporary data directory whose recipe file is not JSON.
    fn state_with_corrupt_recipes(dir: &std::path::Path) -> AppState {
        std::fs::write(dir.join("recipes.json"), "{not json").unwrap();
        let data_dir = dir.to_string_lossy().into_owned();
        let config = AppConfig::from_vars(|key| match key {
            "PANTRY_DATA_DIR" => Some(data_dir.clone()),
            _ => None,
        })
        .unwrap();
        AppState::from_config(&config)
    }

    async fn run_args(state: &AppState, args: &[&str]) -> Result<(), CommandError> {
        let args = std::iter::once("pantry").chain(args.iter().copied());
        run(Cli::parse_from(args), state).await
    }

    #[tokio::test]
    async fn test_corrupt_recipes_leave_other_commands_working() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_corrupt_recipes(dir.path());

        run_args(&state, &["inventory", "add", "Eggs"]).await.unwrap();
        run_args(&state, &["inventory", "list"]).await.unwrap();
        run_args(&state, &["list", "show"]).await.unwrap();
        run_args(&state, &["settings", "remove-key"]).await.unwrap();
        run_args(&state, &["summary"]).await.unwrap();
        assert_eq!(state.inventory().items().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_recipes_fail_recipe_listing() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_corrupt_recipes(dir.path());

        let err = run_args(&state, &["recipes", "list"]).await.unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inventory_add() {
        let cli = Cli::parse_from(["pantry", "inventory", "add", "Tomatoes", "-q", "2 lbs"]);
        match cli.command {
            Commands::Inventory {
                action: InventoryAction::Add { name, quantity },
            } => {
                assert_eq!(name, "Tomatoes");
                assert_eq!(quantity.as_deref(), Some("2 lbs"));
            }
            _ => panic!("expected inventory add"),
        }
    }

    #[test]
    fn test_parse_settings_set_key() {
        let cli = Cli::parse_from(["pantry", "settings", "set-key", "sk-abc"]);
        assert!(matches!(
            cli.command,
            Commands::Settings {
                action: SettingsAction::SetKey { .. }
            }
        ));
    }
}
