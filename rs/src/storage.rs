//! File-based storage implementation
//!
//! Keeps the recipe catalog and user profiles as pretty-printed JSON files:
//! `recipes/<id>.json` and `users/<user_id>.json` under one data directory.

use crate::models::{MealwiseStorage, Recipe, RecipeId, UserProfile};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::RwLock;

const RECIPES_DIR: &str = "recipes";
const USERS_DIR: &str = "users";

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Recipe not found: {id}")]
    RecipeNotFound { id: String },

    #[error("User profile not found: {user_id}")]
    ProfileNotFound { user_id: String },

    #[error("Invalid id {id:?}: use ASCII letters, digits, '-' or '_'")]
    InvalidId { id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage directory error: {message}")]
    Directory { message: String },
}

/// Ids double as file names, so keep them to a safe alphabet
fn validate_id(id: &str) -> Result<(), StorageError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidId { id: id.to_string() })
    }
}

/// File-based storage implementation
///
/// The catalog is read once and cached; profiles are read on demand since
/// each request only touches one user.
pub struct FileStorage {
    /// Base directory for storage
    data_dir: PathBuf,

    /// In-memory catalog, ordered by recipe id
    catalog: RwLock<BTreeMap<RecipeId, Recipe>>,

    /// Whether the catalog has been loaded
    catalog_loaded: RwLock<bool>,
}

impl FileStorage {
    /// Create a new file storage instance
    ///
    /// The data directory and its subdirectories will be created if they don't exist.
    pub async fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref().to_path_buf();

        // Create data directory if it doesn't exist
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).await?;
        }

        // Verify it's a directory
        let metadata = fs::metadata(&data_dir).await?;
        if !metadata.is_dir() {
            return Err(StorageError::Directory {
                message: format!("{} is not a directory", data_dir.display()),
            });
        }

        for dir in [data_dir.join(RECIPES_DIR), data_dir.join(USERS_DIR)] {
            if !dir.exists() {
                fs::create_dir(&dir).await?;
            }
        }

        Ok(Self {
            data_dir,
            catalog: RwLock::new(BTreeMap::new()),
            catalog_loaded: RwLock::new(false),
        })
    }

    fn recipe_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(RECIPES_DIR).join(format!("{id}.json"))
    }

    fn profile_path(&self, user_id: &str) -> PathBuf {
        self.data_dir.join(USERS_DIR).join(format!("{user_id}.json"))
    }

    /// Load all recipes into the cache if not already loaded
    async fn ensure_catalog_loaded(&self) -> Result<(), StorageError> {
        let catalog_loaded = *self.catalog_loaded.read().await;
        if catalog_loaded {
            return Ok(());
        }

        let mut catalog = self.catalog.write().await;
        let mut catalog_loaded_guard = self.catalog_loaded.write().await;

        // Double-check in case another task loaded while we were waiting
        if *catalog_loaded_guard {
            return Ok(());
        }

        let recipes_dir = self.data_dir.join(RECIPES_DIR);
        tracing::info!("Loading recipes from {}", recipes_dir.display());
        let start = std::time::Instant::now();

        let mut entries = fs::read_dir(&recipes_dir).await?;
        let mut loaded_count = 0;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match read_json::<Recipe>(&path).await {
                Ok(recipe) => {
                    catalog.insert(recipe.id.clone(), recipe);
                    loaded_count += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to load recipe from {}: {}", path.display(), e);
                }
            }
        }

        let duration = start.elapsed();
        tracing::info!("Loaded {} recipes in {:?}", loaded_count, duration);

        *catalog_loaded_guard = true;
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).await?;
    Ok(())
}

#[async_trait::async_trait]
impl MealwiseStorage for FileStorage {
    async fn store_recipe(&mut self, recipe: Recipe) -> crate::Result<()> {
        validate_id(&recipe.id)?;

        write_json(&self.recipe_path(&recipe.id), &recipe)
            .await
            .context("Failed to save recipe to file")?;

        // Update cache
        self.ensure_catalog_loaded().await?;
        let mut catalog = self.catalog.write().await;
        catalog.insert(recipe.id.clone(), recipe);

        Ok(())
    }

    async fn import_catalog(&mut self, recipes: Vec<Recipe>) -> crate::Result<usize> {
        // Validate up front so a bad entry can't leave a partial import behind
        for recipe in &recipes {
            validate_id(&recipe.id)?;
        }

        let count = recipes.len();
        for recipe in recipes {
            self.store_recipe(recipe).await?;
        }
        Ok(count)
    }

    async fn get_recipe(&self, id: &str) -> crate::Result<Option<Recipe>> {
        self.ensure_catalog_loaded().await?;
        let catalog = self.catalog.read().await;
        Ok(catalog.get(id).cloned())
    }

    async fn get_catalog(&self) -> crate::Result<Vec<Recipe>> {
        self.ensure_catalog_loaded().await?;
        let catalog = self.catalog.read().await;
        Ok(catalog.values().cloned().collect())
    }

    async fn store_profile(&mut self, profile: UserProfile) -> crate::Result<()> {
        validate_id(&profile.user_id)?;

        write_json(&self.profile_path(&profile.user_id), &profile)
            .await
            .context("Failed to save user profile to file")?;

        Ok(())
    }

    async fn get_profile(&self, user_id: &str) -> crate::Result<Option<UserProfile>> {
        validate_id(user_id)?;

        let path = self.profile_path(user_id);
        if !path.exists() {
            return Ok(None);
        }

        let profile = read_json(&path)
            .await
            .with_context(|| format!("Failed to read user profile {}", path.display()))?;
        Ok(Some(profile))
    }

    async fn record_cooked(
        &mut self,
        user_id: &str,
        recipe_id: &str,
        rating: Option<u8>,
    ) -> crate::Result<()> {
        let recipe = self
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| StorageError::RecipeNotFound {
                id: recipe_id.to_string(),
            })?;

        let mut profile = self
            .get_profile(user_id)
            .await?
            .ok_or_else(|| StorageError::ProfileNotFound {
                user_id: user_id.to_string(),
            })?;

        // Validate the rating before touching anything
        if let Some(stars) = rating {
            profile.history.rate(&recipe.id, stars)?;
        }
        profile.history.record_cooked(&recipe);

        tracing::debug!(
            "User {} cooked {} (rating {:?})",
            user_id,
            recipe.id,
            rating
        );
        self.store_profile(profile).await
    }
}
