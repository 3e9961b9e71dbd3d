//! Mealwise: personalized recipe recommendations
//!
//! Ranks a recipe catalog for one user from their cooking history, health
//! goal and stated preferences, with human-readable reasons for each pick.
//!
//! This library provides both a programmatic API for embedding into other applications
//! and a standalone CLI backed by a directory of JSON files.

pub mod clock;
pub mod constants;
pub mod models;
pub mod recommend;
pub mod scoring;
pub mod storage;

// Re-export main types for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use models::{
    Difficulty, HealthGoal, Ingredient, MealwiseStorage, Recipe, RecommendationCategory,
    RecommendationScore, UserHistory, UserPreferences, UserProfile,
};
pub use recommend::{recommend, RecommendationEngine, ScoreBreakdown};
pub use storage::{FileStorage, StorageError};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
