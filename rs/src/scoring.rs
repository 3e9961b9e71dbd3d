//! Sub-scorers for recipe recommendations
//!
//! Each sub-scorer looks at one aspect of a recipe (history affinity,
//! nutrition fit, preference fit, discovery value, trending/seasonal appeal)
//! and returns a score clamped to `[0, 1]` plus the reasons it fired.
//! Weighting and ranking live in [`crate::recommend`].

use crate::constants::{
    BALANCED_CARBS_RATIO, BALANCED_FAT_RATIO, BALANCED_PROTEIN_RATIO, DISCOVERY_BALANCED_BONUS,
    DISCOVERY_NEW_CUISINE_BONUS, DISCOVERY_NEW_INGREDIENT_BONUS, DISCOVERY_NEW_INGREDIENT_CAP,
    DISCOVERY_NEW_RECIPE_BONUS, DISLIKED_INGREDIENT_PENALTY, FAMILIAR_INGREDIENTS,
    FAVORITE_INGREDIENT_BONUS, FAVORITE_INGREDIENT_CAP, FREQUENT_CATEGORY_BONUS,
    FREQUENT_CATEGORY_MIN_COUNT, HIGH_RATING_MIN, HISTORY_AVG_SIMILARITY_SHARE,
    HISTORY_HIGH_RATING_SHARE, POPULARITY_THRESHOLD, PREFERENCE_COOK_TIME_BONUS,
    PREFERENCE_CUISINE_BONUS, PREFERENCE_DIFFICULTY_BONUS, SIMILARITY_WEIGHT_CATEGORY,
    SIMILARITY_WEIGHT_NUTRITION, SIMILARITY_WEIGHT_TAGS, TOP_RATING_MIN,
    TRENDING_MEAL_TIME_BONUS, TRENDING_POPULARITY_BONUS, TRENDING_RATING_BONUS,
    TRENDING_SEASON_BONUS,
};
use crate::models::{HealthGoal, MealTime, Nutrition, Recipe, Season, UserHistory, UserPreferences};
use std::collections::{HashMap, HashSet};

/// Catalog lookup by recipe id
pub type CatalogIndex<'a> = HashMap<&'a str, &'a Recipe>;

/// Build a [`CatalogIndex`] over a catalog slice
pub fn index_catalog(catalog: &[Recipe]) -> CatalogIndex<'_> {
    catalog.iter().map(|recipe| (recipe.id.as_str(), recipe)).collect()
}

/// Result of one sub-scorer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubScore {
    /// Always finite and within `[0, 1]`
    pub score: f64,
    pub reasons: Vec<String>,
}

impl SubScore {
    fn new(raw: f64, reasons: Vec<String>) -> Self {
        Self {
            score: sanitise(raw),
            reasons,
        }
    }
}

/// Clamp a raw score to `[0, 1]`, mapping non-finite values to 0
pub fn sanitise(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 1.0)
}

/// `|a ∩ b| / max(|a|, |b|)` over the distinct elements of each list
pub fn overlap_ratio(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();

    let larger = set_a.len().max(set_b.len());
    if larger == 0 {
        return 0.0;
    }

    let shared = set_a.intersection(&set_b).count();
    shared as f64 / larger as f64
}

/// Average closeness of calories, protein, carbs and fat
///
/// Each field contributes `1 - |a - b| / max(a, b)`; a pair that is zero on
/// both sides contributes 0.
pub fn nutrition_similarity(a: &Nutrition, b: &Nutrition) -> f64 {
    let pairs = [
        (a.calories, b.calories),
        (a.protein, b.protein),
        (a.carbs, b.carbs),
        (a.fat, b.fat),
    ];

    let total: f64 = pairs
        .iter()
        .map(|&(x, y)| {
            let larger = x.max(y);
            if larger <= 0.0 {
                0.0
            } else {
                1.0 - (x - y).abs() / larger
            }
        })
        .sum();

    total / pairs.len() as f64
}

/// Similarity of two recipes: 40% categories, 30% tags, 30% nutrition
pub fn recipe_similarity(a: &Recipe, b: &Recipe) -> f64 {
    SIMILARITY_WEIGHT_CATEGORY * overlap_ratio(&a.category, &b.category)
        + SIMILARITY_WEIGHT_TAGS * overlap_ratio(&a.tags, &b.tags)
        + SIMILARITY_WEIGHT_NUTRITION * nutrition_similarity(&a.nutrition, &b.nutrition)
}

/// Whether protein, carbs and fat each fall inside their target share of total macro grams
pub fn is_balanced(nutrition: &Nutrition) -> bool {
    let total = nutrition.protein + nutrition.carbs + nutrition.fat;
    if total <= 0.0 {
        return false;
    }

    let within = |grams: f64, (low, high): (f64, f64)| {
        let ratio = grams / total;
        ratio >= low && ratio <= high
    };

    within(nutrition.protein, BALANCED_PROTEIN_RATIO)
        && within(nutrition.carbs, BALANCED_CARBS_RATIO)
        && within(nutrition.fat, BALANCED_FAT_RATIO)
}

/// Case-insensitive substring match in either direction; empty fragments never match
pub fn fragment_match(name: &str, fragment: &str) -> bool {
    let name = name.trim().to_lowercase();
    let fragment = fragment.trim().to_lowercase();
    if name.is_empty() || fragment.is_empty() {
        return false;
    }
    name.contains(&fragment) || fragment.contains(&name)
}

/// How closely the recipe resembles what the user already enjoyed
///
/// Recently tried recipes short-circuit to 0.
pub fn history_affinity(recipe: &Recipe, history: &UserHistory, index: &CatalogIndex<'_>) -> SubScore {
    if history.has_recently_tried(&recipe.id) {
        return SubScore::new(0.0, vec!["Already tried recently".to_string()]);
    }

    let mut reasons = Vec::new();
    let mut total_similarity = 0.0;
    let mut compared = 0usize;
    let mut high_rating_similarity = 0.0;

    for (rated_id, &rating) in &history.ratings {
        // Ratings for recipes no longer in the catalog carry no signal
        let Some(rated) = index.get(rated_id.as_str()) else {
            continue;
        };

        let similarity = recipe_similarity(recipe, rated);
        total_similarity += similarity;
        compared += 1;

        if rating >= HIGH_RATING_MIN {
            high_rating_similarity += similarity * f64::from(rating) / 5.0;
        }
    }

    let mut score = 0.0;
    if compared > 0 {
        let avg_similarity = total_similarity / compared as f64;
        score = avg_similarity * HISTORY_AVG_SIMILARITY_SHARE
            + high_rating_similarity * HISTORY_HIGH_RATING_SHARE;
        if high_rating_similarity > 0.0 && score > 0.3 {
            reasons.push("Similar to recipes you rated highly".to_string());
        }
    }

    for category in &recipe.category {
        let cooked = history.category_frequency.get(category).copied().unwrap_or(0);
        if cooked > FREQUENT_CATEGORY_MIN_COUNT {
            score += FREQUENT_CATEGORY_BONUS;
            reasons.push(format!("You often cook {category} dishes"));
            break;
        }
    }

    SubScore::new(score, reasons)
}

/// How well the recipe's nutrition serves the user's health goal
pub fn nutrition_fit(recipe: &Recipe, goal: HealthGoal) -> SubScore {
    let n = &recipe.nutrition;
    let mut score = 0.0;
    let mut reasons = Vec::new();

    match goal {
        HealthGoal::WeightLoss => {
            if n.calories < 400.0 {
                score += 0.4;
                reasons.push("Low calorie, good for weight loss".to_string());
            }
            if n.protein > 20.0 {
                score += 0.3;
                reasons.push("High protein keeps you full".to_string());
            }
            if n.fat < 15.0 {
                score += 0.3;
                reasons.push("Low in fat".to_string());
            }
        }
        HealthGoal::MuscleGain => {
            if n.protein > 25.0 {
                score += 0.5;
                reasons.push("High protein supports muscle gain".to_string());
            }
            if n.calories > 400.0 {
                score += 0.3;
                reasons.push("Enough energy for training".to_string());
            }
            if n.carbs > 30.0 {
                score += 0.2;
                reasons.push("Carbs to refuel after workouts".to_string());
            }
        }
        HealthGoal::MaintainHealth => {
            if is_balanced(n) {
                score += 0.6;
                reasons.push("Balanced macronutrients".to_string());
            }
            if n.fiber > 5.0 {
                score += 0.4;
                reasons.push("Rich in dietary fiber".to_string());
            }
        }
        HealthGoal::SpecialNutrition => {
            if n.sodium < 300.0 {
                score += 0.4;
                reasons.push("Low sodium".to_string());
            }
            if n.fiber > 6.0 {
                score += 0.6;
                reasons.push("High in fiber".to_string());
            }
        }
    }

    SubScore::new(score, reasons)
}

/// How well the recipe matches the user's stated preferences
///
/// A disliked ingredient scales the score down instead of zeroing it.
pub fn preference_fit(recipe: &Recipe, preferences: &UserPreferences) -> SubScore {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if preferences.difficulty.contains(&recipe.difficulty) {
        score += PREFERENCE_DIFFICULTY_BONUS;
        reasons.push("Matches your cooking skill".to_string());
    }

    if recipe.cook_time <= preferences.max_cook_time {
        score += PREFERENCE_COOK_TIME_BONUS;
        reasons.push(format!("Ready in {} minutes", recipe.cook_time));
    }

    if let Some(cuisine) = &recipe.cuisine_type {
        // Cuisine names are free text typed into catalog and profile data,
        // so "Sichuan" and "sichuan" count as the same cuisine
        if preferences
            .cuisine_types
            .iter()
            .any(|preferred| preferred.eq_ignore_ascii_case(cuisine))
        {
            score += PREFERENCE_CUISINE_BONUS;
            reasons.push(format!("{cuisine} cuisine you enjoy"));
        }
    }

    let mut has_disliked = false;
    let mut ingredient_bonus = 0.0;
    for ingredient in &recipe.ingredients {
        if preferences
            .disliked_ingredients
            .iter()
            .any(|disliked| fragment_match(&ingredient.name, disliked))
        {
            has_disliked = true;
            break;
        }

        let favorites = preferences
            .favorite_ingredients
            .iter()
            .filter(|favorite| fragment_match(&ingredient.name, favorite))
            .count();
        ingredient_bonus += favorites as f64 * FAVORITE_INGREDIENT_BONUS;
    }

    let ingredient_bonus = ingredient_bonus.min(FAVORITE_INGREDIENT_CAP);
    if ingredient_bonus > 0.0 {
        score += ingredient_bonus;
        reasons.push("Uses ingredients you love".to_string());
    }

    if has_disliked {
        tracing::debug!("Recipe {} contains a disliked ingredient", recipe.id);
        score *= DISLIKED_INGREDIENT_PENALTY;
    }

    SubScore::new(score, reasons)
}

/// Reward for novelty relative to what the user has been cooking
pub fn discovery_bonus(recipe: &Recipe, history: &UserHistory, index: &CatalogIndex<'_>) -> SubScore {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if recipe.is_new {
        score += DISCOVERY_NEW_RECIPE_BONUS;
        reasons.push("Newly added recipe".to_string());
    }

    if let Some(cuisine) = &recipe.cuisine_type {
        let tried_before = history
            .recent_recipes
            .iter()
            .filter_map(|id| index.get(id.as_str()))
            .filter_map(|tried| tried.cuisine_type.as_deref())
            .any(|tried| tried.eq_ignore_ascii_case(cuisine));

        if !tried_before {
            score += DISCOVERY_NEW_CUISINE_BONUS;
            reasons.push(format!("Try something new: {cuisine} cuisine"));
        }
    }

    let new_ingredients = recipe
        .ingredients
        .iter()
        .filter(|ingredient| {
            let name = ingredient.name.trim().to_lowercase();
            !FAMILIAR_INGREDIENTS.contains(&name.as_str())
        })
        .count();
    if new_ingredients > 0 {
        score += (new_ingredients as f64 * DISCOVERY_NEW_INGREDIENT_BONUS)
            .min(DISCOVERY_NEW_INGREDIENT_CAP);
        reasons.push("Introduces new ingredients".to_string());
    }

    if is_balanced(&recipe.nutrition) {
        score += DISCOVERY_BALANCED_BONUS;
        reasons.push("Well-rounded nutrition".to_string());
    }

    SubScore::new(score, reasons)
}

/// Popularity, seasonality, meal-time fit and rating
pub fn trending_bonus(recipe: &Recipe, season: Season, meal_time: MealTime) -> SubScore {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if recipe.popularity.is_some_and(|p| p > POPULARITY_THRESHOLD) {
        score += TRENDING_POPULARITY_BONUS;
        reasons.push("Popular right now".to_string());
    }

    if recipe
        .seasonality
        .as_ref()
        .is_some_and(|seasons| seasons.contains(&season))
    {
        score += TRENDING_SEASON_BONUS;
        reasons.push(format!("In season this {season}"));
    }

    if recipe
        .meal_time
        .as_ref()
        .is_some_and(|slots| slots.contains(&meal_time))
    {
        score += TRENDING_MEAL_TIME_BONUS;
        reasons.push(format!("Great for {meal_time}"));
    }

    if recipe.rating >= TOP_RATING_MIN {
        score += TRENDING_RATING_BONUS;
        reasons.push(format!("Highly rated ({:.1})", recipe.rating));
    }

    SubScore::new(score, reasons)
}
