//! Core data models for the Mealwise recommendation engine
//!
//! Field names serialize in camelCase so catalog and profile JSON produced by
//! the web front end can be loaded unchanged.

use crate::constants::MAX_RECENT_RECIPES;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Identifier for catalog recipes
pub type RecipeId = String;

/// How hard a recipe is to prepare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Role an ingredient plays in a dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IngredientRole {
    #[default]
    Main,
    Seasoning,
    Garnish,
}

/// Calendar season, used for seasonal recipe bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Map a calendar month (1-12) to its season.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Autumn,
            _ => Self::Winter,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        };
        f.write_str(name)
    }
}

/// Meal slot of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealTime {
    /// Map an hour of the day (0-23) to a meal slot.
    ///
    /// Hours outside the breakfast, lunch and dinner windows are snack time.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=9 => Self::Breakfast,
            11..=13 => Self::Lunch,
            17..=20 => Self::Dinner,
            _ => Self::Snack,
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        };
        f.write_str(name)
    }
}

/// Per-serving nutrition facts. Macros and fiber in grams, sodium in milligrams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub sodium: f64,
    pub fiber: f64,
}

/// One line of a recipe's ingredient list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    /// Free-text amount, e.g. "200g" or "2 tbsp"
    pub amount: String,

    #[serde(rename = "type", default)]
    pub role: IngredientRole,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>, role: IngredientRole) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            role,
        }
    }
}

/// A catalog recipe
///
/// Read-only once loaded; the engine only ever borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,

    /// Total cooking time in minutes
    pub cook_time: u32,

    /// Average user rating, 0-5
    pub rating: f64,

    pub nutrition: Nutrition,
    pub difficulty: Difficulty,

    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,

    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub original_price: f64,

    /// Category tags such as "low-fat" or "high-protein"
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub is_new: bool,

    /// Popularity in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<Vec<Season>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_time: Option<Vec<MealTime>>,
}

/// What the user is trying to achieve with their diet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthGoal {
    WeightLoss,
    MuscleGain,
    #[default]
    MaintainHealth,
    SpecialNutrition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Light,
    #[default]
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthProfile {
    pub health_goal: HealthGoal,
    pub activity_level: ActivityLevel,
}

/// Daily nutrition targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NutritionGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Errors raised when mutating a user's history
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HistoryError {
    #[error("Rating must be between 1 and 5, got {rating}")]
    InvalidRating { rating: u8 },
}

/// Derived per-user cooking history
///
/// Ordered maps keep iteration, and therefore floating-point accumulation,
/// deterministic across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserHistory {
    /// Recently cooked recipe ids, most recent first
    #[serde(default)]
    pub recent_recipes: Vec<RecipeId>,

    /// Star ratings (1-5) keyed by recipe id
    #[serde(default)]
    pub ratings: BTreeMap<RecipeId, u8>,

    /// How many times the user cooked something in each category
    #[serde(default)]
    pub category_frequency: BTreeMap<String, u32>,

    #[serde(default)]
    pub nutrition_goals: NutritionGoals,
    #[serde(default)]
    pub health_profile: HealthProfile,
}

impl UserHistory {
    pub fn has_recently_tried(&self, recipe_id: &str) -> bool {
        self.recent_recipes.iter().any(|id| id == recipe_id)
    }

    /// Record that the user cooked `recipe`
    ///
    /// Moves the recipe to the front of the recent list and bumps the
    /// frequency of each of its categories.
    pub fn record_cooked(&mut self, recipe: &Recipe) {
        self.recent_recipes.retain(|id| id != &recipe.id);
        self.recent_recipes.insert(0, recipe.id.clone());
        if self.recent_recipes.len() > MAX_RECENT_RECIPES {
            self.recent_recipes.truncate(MAX_RECENT_RECIPES);
            tracing::debug!("Trimmed recent recipes to {} entries", MAX_RECENT_RECIPES);
        }

        for category in &recipe.category {
            *self.category_frequency.entry(category.clone()).or_insert(0) += 1;
        }
    }

    /// Store a 1-5 star rating for a recipe, replacing any earlier rating
    pub fn rate(&mut self, recipe_id: &str, stars: u8) -> Result<(), HistoryError> {
        if !(1..=5).contains(&stars) {
            return Err(HistoryError::InvalidRating { rating: stars });
        }
        self.ratings.insert(recipe_id.to_string(), stars);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutritionFocus {
    HighProtein,
    LowFat,
    LowCarb,
    HighFiber,
}

/// Stated user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub cuisine_types: Vec<String>,

    /// Acceptable difficulty levels
    #[serde(default)]
    pub difficulty: Vec<Difficulty>,

    /// Longest acceptable cook time in minutes
    pub max_cook_time: u32,

    #[serde(default)]
    pub dietary_restrictions: Vec<String>,

    /// Ingredient name fragments the user likes
    #[serde(default)]
    pub favorite_ingredients: Vec<String>,

    /// Ingredient name fragments the user avoids
    #[serde(default)]
    pub disliked_ingredients: Vec<String>,

    #[serde(default)]
    pub favorite_categories: Vec<String>,
    #[serde(default)]
    pub nutrition_focus: Vec<NutritionFocus>,
}

/// A stored user: history and preferences together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub history: UserHistory,
    pub preferences: UserPreferences,
}

/// Display hint naming the signal that dominated a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    HistoryBased,
    NutritionOptimized,
    #[default]
    Discovery,
    Trending,
}

/// One ranked recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationScore {
    pub recipe_id: RecipeId,

    /// Composite score in (0.3, 1.0]
    pub score: f64,

    /// At most three human-readable justifications
    pub reasons: Vec<String>,

    pub category: RecommendationCategory,
}

/// Main storage interface trait
///
/// Abstracts over where the catalog and user profiles come from.
#[async_trait::async_trait]
pub trait MealwiseStorage: Send + Sync {
    /// Store or replace a catalog recipe
    async fn store_recipe(&mut self, recipe: Recipe) -> crate::Result<()>;

    /// Store a batch of recipes, rejecting the whole batch if any recipe is invalid
    ///
    /// Returns the number of recipes stored.
    async fn import_catalog(&mut self, recipes: Vec<Recipe>) -> crate::Result<usize>;

    /// Retrieve a recipe by id
    async fn get_recipe(&self, id: &str) -> crate::Result<Option<Recipe>>;

    /// Get the whole catalog, ordered by recipe id
    async fn get_catalog(&self) -> crate::Result<Vec<Recipe>>;

    /// Store or replace a user profile
    async fn store_profile(&mut self, profile: UserProfile) -> crate::Result<()>;

    /// Retrieve a user profile by id
    async fn get_profile(&self, user_id: &str) -> crate::Result<Option<UserProfile>>;

    /// Record that a user cooked a recipe, optionally with a 1-5 rating
    async fn record_cooked(
        &mut self,
        user_id: &str,
        recipe_id: &str,
        rating: Option<u8>,
    ) -> crate::Result<()>;
}
