//! Constants for the Mealwise recommendation engine
//!
//! Weights, thresholds and per-signal bonuses used by the sub-scorers.

// Composite score weights

/// Weight for the history affinity sub-score.
pub const WEIGHT_HISTORY: f64 = 0.25;

/// Weight for the nutrition fit sub-score.
pub const WEIGHT_NUTRITION: f64 = 0.30;

/// Weight for the preference fit sub-score.
pub const WEIGHT_PREFERENCE: f64 = 0.20;

/// Weight for the discovery bonus sub-score.
pub const WEIGHT_DISCOVERY: f64 = 0.15;

/// Weight for the trending/seasonal sub-score.
pub const WEIGHT_TRENDING: f64 = 0.10;

// Result filtering

/// Recipes with a composite score at or below this value are discarded.
pub const MIN_RECOMMENDATION_SCORE: f64 = 0.3;

/// Maximum number of reason strings attached to one recommendation.
pub const MAX_REASONS: usize = 3;

/// Conventional number of recommendations to return.
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 10;

// Category "strong signal" thresholds (compared against clamped sub-scores)

pub const STRONG_HISTORY_THRESHOLD: f64 = 0.5;
pub const STRONG_NUTRITION_THRESHOLD: f64 = 0.6;
pub const STRONG_DISCOVERY_THRESHOLD: f64 = 0.5;
pub const STRONG_TRENDING_THRESHOLD: f64 = 0.5;

// History affinity

/// Share of the average similarity over all rated recipes.
pub const HISTORY_AVG_SIMILARITY_SHARE: f64 = 0.6;

/// Share of the rating-weighted similarity over highly rated recipes.
pub const HISTORY_HIGH_RATING_SHARE: f64 = 0.4;

/// Ratings at or above this count as "rated highly".
pub const HIGH_RATING_MIN: u8 = 4;

/// Category must have been cooked more than this many times to earn the bonus.
pub const FREQUENT_CATEGORY_MIN_COUNT: u32 = 3;

/// Bonus for sharing a frequently cooked category.
pub const FREQUENT_CATEGORY_BONUS: f64 = 0.3;

// Pairwise recipe similarity

pub const SIMILARITY_WEIGHT_CATEGORY: f64 = 0.4;
pub const SIMILARITY_WEIGHT_TAGS: f64 = 0.3;
pub const SIMILARITY_WEIGHT_NUTRITION: f64 = 0.3;

// Balanced macros: share of total macro grams, inclusive bounds

pub const BALANCED_PROTEIN_RATIO: (f64, f64) = (0.15, 0.35);
pub const BALANCED_CARBS_RATIO: (f64, f64) = (0.35, 0.65);
pub const BALANCED_FAT_RATIO: (f64, f64) = (0.15, 0.35);

// Preference fit

pub const PREFERENCE_DIFFICULTY_BONUS: f64 = 0.3;
pub const PREFERENCE_COOK_TIME_BONUS: f64 = 0.2;
pub const PREFERENCE_CUISINE_BONUS: f64 = 0.3;
pub const FAVORITE_INGREDIENT_BONUS: f64 = 0.1;
pub const FAVORITE_INGREDIENT_CAP: f64 = 0.2;

/// Multiplier applied to the preference score when a disliked ingredient is present.
pub const DISLIKED_INGREDIENT_PENALTY: f64 = 0.3;

// Discovery bonus

pub const DISCOVERY_NEW_RECIPE_BONUS: f64 = 0.5;
pub const DISCOVERY_NEW_CUISINE_BONUS: f64 = 0.4;
pub const DISCOVERY_NEW_INGREDIENT_BONUS: f64 = 0.1;
pub const DISCOVERY_NEW_INGREDIENT_CAP: f64 = 0.3;
pub const DISCOVERY_BALANCED_BONUS: f64 = 0.2;

/// Ingredients every user is assumed to have cooked with already.
pub const FAMILIAR_INGREDIENTS: &[&str] = &[
    "egg", "tomato", "rice", "chicken breast", "onion", "garlic", "potato", "carrot",
    "tofu", "broccoli", "salt", "soy sauce", "olive oil", "milk",
];

// Trending/seasonal

pub const POPULARITY_THRESHOLD: f64 = 0.8;
pub const TRENDING_POPULARITY_BONUS: f64 = 0.5;
pub const TRENDING_SEASON_BONUS: f64 = 0.3;
pub const TRENDING_MEAL_TIME_BONUS: f64 = 0.2;
pub const TRENDING_RATING_BONUS: f64 = 0.3;
pub const TOP_RATING_MIN: f64 = 4.5;

// History bookkeeping

/// Maximum number of entries kept in a user's recent recipe list.
pub const MAX_RECENT_RECIPES: usize = 10;
