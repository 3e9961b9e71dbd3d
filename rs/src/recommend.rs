//! Recommendation engine
//!
//! Combines the five sub-scorers into one composite score per recipe, drops
//! weak matches and returns the strongest ones with their reasons.

use crate::clock::{Clock, SystemClock};
use crate::constants::{
    MAX_REASONS, MIN_RECOMMENDATION_SCORE, STRONG_DISCOVERY_THRESHOLD, STRONG_HISTORY_THRESHOLD,
    STRONG_NUTRITION_THRESHOLD, STRONG_TRENDING_THRESHOLD, WEIGHT_DISCOVERY, WEIGHT_HISTORY,
    WEIGHT_NUTRITION, WEIGHT_PREFERENCE, WEIGHT_TRENDING,
};
use crate::models::{
    MealTime, Recipe, RecommendationCategory, RecommendationScore, RecipeId, Season, UserHistory,
    UserPreferences,
};
use crate::scoring::{
    discovery_bonus, history_affinity, index_catalog, nutrition_fit, preference_fit, sanitise,
    trending_bonus, CatalogIndex,
};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

/// Every sub-score for one recipe, plus the composite built from them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub recipe_id: RecipeId,
    pub history: f64,
    pub nutrition: f64,
    pub preference: f64,
    pub discovery: f64,
    pub trending: f64,

    /// Weighted sum of the sub-scores, clamped to `[0, 1]`
    pub total: f64,

    pub category: RecommendationCategory,
    pub reasons: Vec<String>,
}

impl ScoreBreakdown {
    fn into_recommendation(self) -> RecommendationScore {
        RecommendationScore {
            recipe_id: self.recipe_id,
            score: self.total,
            reasons: self.reasons,
            category: self.category,
        }
    }
}

/// Scores one user's view of the catalog
///
/// Holds read-only snapshots of its inputs, so a single engine can serve
/// concurrent callers.
pub struct RecommendationEngine {
    catalog: Vec<Recipe>,
    history: UserHistory,
    preferences: UserPreferences,
    clock: Box<dyn Clock>,
}

impl RecommendationEngine {
    /// Create an engine reading the host's local time
    pub fn new(catalog: Vec<Recipe>, history: UserHistory, preferences: UserPreferences) -> Self {
        Self {
            catalog,
            history,
            preferences,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the clock used for the seasonal and meal-time bonuses
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn catalog(&self) -> &[Recipe] {
        &self.catalog
    }

    /// Top `count` recipes scoring above the minimum, best first
    pub fn get_recommendations(&self, count: usize) -> Vec<RecommendationScore> {
        recommend(
            &self.catalog,
            &self.history,
            &self.preferences,
            count,
            self.clock.now(),
        )
    }

    /// Same ranking as [`Self::get_recommendations`], with every sub-score kept
    ///
    /// The clock is read once, so the breakdowns always agree with the ranking.
    pub fn explain_recommendations(&self, count: usize) -> Vec<ScoreBreakdown> {
        let scorer = Scorer::new(&self.catalog, &self.history, &self.preferences, self.clock.now());
        rank(&self.catalog, &self.history, &scorer, count)
    }

    /// Full score breakdown for one catalog recipe, `None` if the id is unknown
    ///
    /// Unlike [`Self::get_recommendations`] this also scores recently tried
    /// recipes and those below the minimum score.
    pub fn score_recipe(&self, recipe_id: &str) -> Option<ScoreBreakdown> {
        let recipe = self.catalog.iter().find(|recipe| recipe.id == recipe_id)?;
        let scorer = Scorer::new(&self.catalog, &self.history, &self.preferences, self.clock.now());
        Some(scorer.score(recipe))
    }
}

/// Rank `catalog` for one user at the instant `now`
///
/// Recently tried recipes are never returned. Recipes scoring at or below
/// [`MIN_RECOMMENDATION_SCORE`] are dropped; ties keep catalog order.
pub fn recommend(
    catalog: &[Recipe],
    history: &UserHistory,
    preferences: &UserPreferences,
    count: usize,
    now: NaiveDateTime,
) -> Vec<RecommendationScore> {
    let scorer = Scorer::new(catalog, history, preferences, now);
    rank(catalog, history, &scorer, count)
        .into_iter()
        .map(ScoreBreakdown::into_recommendation)
        .collect()
}

fn rank(
    catalog: &[Recipe],
    history: &UserHistory,
    scorer: &Scorer<'_>,
    count: usize,
) -> Vec<ScoreBreakdown> {
    let mut scored: Vec<ScoreBreakdown> = catalog
        .iter()
        .filter(|recipe| {
            let recent = history.has_recently_tried(&recipe.id);
            if recent {
                tracing::debug!("Skipping recently tried recipe {}", recipe.id);
            }
            !recent
        })
        .map(|recipe| scorer.score(recipe))
        .filter(|breakdown| {
            let keep = breakdown.total > MIN_RECOMMENDATION_SCORE;
            if !keep {
                tracing::debug!(
                    "Discarding recipe {} with score {:.3}",
                    breakdown.recipe_id,
                    breakdown.total
                );
            }
            keep
        })
        .collect();

    // Stable sort, so equal scores stay in catalog order
    scored.sort_by(|a, b| b.total.total_cmp(&a.total));
    let qualifying = scored.len();
    scored.truncate(count);

    tracing::info!(
        "Scored {} recipes, {} qualified, returning {}",
        catalog.len(),
        qualifying,
        scored.len()
    );

    scored
}

/// Per-call scoring state: catalog index and the calendar context
struct Scorer<'a> {
    index: CatalogIndex<'a>,
    history: &'a UserHistory,
    preferences: &'a UserPreferences,
    season: Season,
    meal_time: MealTime,
}

impl<'a> Scorer<'a> {
    fn new(
        catalog: &'a [Recipe],
        history: &'a UserHistory,
        preferences: &'a UserPreferences,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            index: index_catalog(catalog),
            history,
            preferences,
            season: Season::from_month(now.month()),
            meal_time: MealTime::from_hour(now.hour()),
        }
    }

    fn score(&self, recipe: &Recipe) -> ScoreBreakdown {
        let history = history_affinity(recipe, self.history, &self.index);
        let nutrition = nutrition_fit(recipe, self.history.health_profile.health_goal);
        let preference = preference_fit(recipe, self.preferences);
        let discovery = discovery_bonus(recipe, self.history, &self.index);
        let trending = trending_bonus(recipe, self.season, self.meal_time);

        let total = sanitise(
            WEIGHT_HISTORY * history.score
                + WEIGHT_NUTRITION * nutrition.score
                + WEIGHT_PREFERENCE * preference.score
                + WEIGHT_DISCOVERY * discovery.score
                + WEIGHT_TRENDING * trending.score,
        );

        // Later strong signals overwrite earlier ones
        let mut category = RecommendationCategory::Discovery;
        if history.score > STRONG_HISTORY_THRESHOLD {
            category = RecommendationCategory::HistoryBased;
        }
        if nutrition.score > STRONG_NUTRITION_THRESHOLD {
            category = RecommendationCategory::NutritionOptimized;
        }
        if discovery.score > STRONG_DISCOVERY_THRESHOLD {
            category = RecommendationCategory::Discovery;
        }
        if trending.score > STRONG_TRENDING_THRESHOLD {
            category = RecommendationCategory::Trending;
        }

        let breakdown = ScoreBreakdown {
            recipe_id: recipe.id.clone(),
            history: history.score,
            nutrition: nutrition.score,
            preference: preference.score,
            discovery: discovery.score,
            trending: trending.score,
            total,
            category,
            reasons: [
                history.reasons,
                nutrition.reasons,
                preference.reasons,
                discovery.reasons,
                trending.reasons,
            ]
            .into_iter()
            .flatten()
            .take(MAX_REASONS)
            .collect(),
        };

        tracing::debug!(
            "Recipe {} scored {:.3} ({:?})",
            breakdown.recipe_id,
            breakdown.total,
            breakdown.category
        );
        breakdown
    }
}
