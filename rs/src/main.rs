//! Mealwise command-line interface
//!
//! Imports catalog and profile data into a data directory, records what users
//! cook, and prints ranked recommendations as JSON on stdout.

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use mealwise::constants::DEFAULT_RECOMMENDATION_COUNT;
use mealwise::{
    Clock, FileStorage, FixedClock, MealwiseStorage, Recipe, RecommendationEngine, SystemClock,
    UserProfile,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mealwise")]
#[command(about = "Personalized recipe recommendations", version)]
struct Args {
    /// Data directory holding recipes/ and users/
    #[arg(long, default_value_os_t = default_data_dir())]
    data_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a JSON array of recipes into the catalog
    ImportCatalog {
        /// Path to the catalog JSON file
        file: PathBuf,
    },

    /// Import a user profile (history and preferences) from JSON
    ImportProfile {
        /// Path to the profile JSON file
        file: PathBuf,
    },

    /// Print ranked recommendations for a user
    Recommend {
        #[arg(long)]
        user: String,

        /// Maximum number of recommendations
        #[arg(long, default_value_t = DEFAULT_RECOMMENDATION_COUNT)]
        count: usize,

        /// Score as if it were this local time, e.g. 2025-06-01T12:00:00
        #[arg(long)]
        at: Option<NaiveDateTime>,

        /// Print the per-sub-scorer breakdown for each recommendation
        #[arg(long)]
        explain: bool,
    },

    /// Record that a user cooked a recipe
    Cook {
        #[arg(long)]
        user: String,

        #[arg(long)]
        recipe: String,

        /// Star rating from 1 to 5
        #[arg(long)]
        rating: Option<u8>,
    },
}

fn default_data_dir() -> PathBuf {
    home::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mealwise")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("mealwise={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Mealwise version: {}", mealwise::VERSION);
    tracing::debug!("Data directory: {}", args.data_dir.display());

    let mut storage = FileStorage::new(&args.data_dir)
        .await
        .with_context(|| format!("Failed to open data directory {}", args.data_dir.display()))?;

    match args.command {
        Command::ImportCatalog { file } => {
            let recipes: Vec<Recipe> = read_json_file(&file).await?;
            let count = storage.import_catalog(recipes).await?;
            tracing::info!("Imported {} recipes from {}", count, file.display());
        }
        Command::ImportProfile { file } => {
            let profile: UserProfile = read_json_file(&file).await?;
            tracing::info!("Imported profile for user {}", profile.user_id);
            storage.store_profile(profile).await?;
        }
        Command::Recommend {
            user,
            count,
            at,
            explain,
        } => {
            let Some(profile) = storage.get_profile(&user).await? else {
                bail!("No profile for user {user}");
            };
            let catalog = storage.get_catalog().await?;

            let engine = RecommendationEngine::new(catalog, profile.history, profile.preferences)
                .with_clock(FixedClock(at.unwrap_or_else(|| SystemClock.now())));

            let output = if explain {
                serde_json::to_string_pretty(&engine.explain_recommendations(count))?
            } else {
                serde_json::to_string_pretty(&engine.get_recommendations(count))?
            };
            println!("{output}");
        }
        Command::Cook {
            user,
            recipe,
            rating,
        } => {
            storage.record_cooked(&user, &recipe, rating).await?;
            tracing::info!("Recorded {} for user {}", recipe, user);
        }
    }

    Ok(())
}

async fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
