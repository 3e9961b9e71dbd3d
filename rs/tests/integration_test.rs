//! Integration tests for Mealwise
//!
//! These exercise the public API end to end: JSON data in a file-backed
//! store, loaded into a recommendation engine with a pinned clock.

use chrono::NaiveDateTime;
use mealwise::models::{HealthProfile, IngredientRole, MealTime, Nutrition, Season};
use mealwise::{
    recommend, Difficulty, FileStorage, FixedClock, HealthGoal, Ingredient, MealwiseStorage,
    Recipe, RecommendationEngine, UserHistory, UserPreferences, UserProfile,
};
use std::collections::BTreeMap;
use tempfile::TempDir;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn nutrition(calories: f64, protein: f64, carbs: f64, fat: f64, sodium: f64, fiber: f64) -> Nutrition {
    Nutrition {
        calories,
        protein,
        carbs,
        fat,
        sodium,
        fiber,
    }
}

fn ingredients(names: &[&str]) -> Vec<Ingredient> {
    names
        .iter()
        .map(|name| Ingredient::new(*name, "1 portion", IngredientRole::Main))
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn demo_catalog() -> Vec<Recipe> {
    vec![
        Recipe {
            id: "steamed-fish".to_string(),
            name: "Steamed sea bass".to_string(),
            cook_time: 25,
            rating: 4.8,
            nutrition: nutrition(320.0, 32.0, 6.0, 9.0, 420.0, 1.0),
            difficulty: Difficulty::Easy,
            ingredients: ingredients(&["sea bass", "ginger", "scallion"]),
            category: strings(&["high-protein", "low-fat"]),
            tags: strings(&["steamed", "light"]),
            cuisine_type: Some("cantonese".to_string()),
            popularity: Some(0.9),
            seasonality: Some(vec![Season::Spring, Season::Summer]),
            meal_time: Some(vec![MealTime::Dinner]),
            ..Default::default()
        },
        Recipe {
            id: "chicken-salad".to_string(),
            name: "Grilled chicken salad".to_string(),
            cook_time: 15,
            rating: 4.5,
            nutrition: nutrition(380.0, 35.0, 18.0, 12.0, 350.0, 6.0),
            difficulty: Difficulty::Easy,
            ingredients: ingredients(&["chicken breast", "lettuce", "cherry tomato"]),
            category: strings(&["high-protein", "low-fat"]),
            tags: strings(&["grilled", "light"]),
            cuisine_type: Some("western".to_string()),
            popularity: Some(0.85),
            meal_time: Some(vec![MealTime::Lunch]),
            ..Default::default()
        },
        Recipe {
            id: "mapo-tofu".to_string(),
            name: "Mapo tofu".to_string(),
            cook_time: 30,
            rating: 4.6,
            nutrition: nutrition(420.0, 22.0, 15.0, 28.0, 980.0, 3.0),
            difficulty: Difficulty::Medium,
            ingredients: ingredients(&["tofu", "minced pork", "chili bean paste", "cilantro"]),
            category: strings(&["spicy"]),
            tags: strings(&["sichuan", "classic"]),
            cuisine_type: Some("sichuan".to_string()),
            popularity: Some(0.95),
            ..Default::default()
        },
        Recipe {
            id: "lentil-soup".to_string(),
            name: "Red lentil soup".to_string(),
            cook_time: 40,
            rating: 4.2,
            nutrition: nutrition(310.0, 18.0, 45.0, 7.0, 260.0, 11.0),
            difficulty: Difficulty::Easy,
            ingredients: ingredients(&["red lentils", "carrot", "onion", "cumin"]),
            category: strings(&["high-fiber", "vegetarian"]),
            tags: strings(&["soup", "warm"]),
            cuisine_type: Some("middle-eastern".to_string()),
            is_new: true,
            seasonality: Some(vec![Season::Autumn, Season::Winter]),
            ..Default::default()
        },
        Recipe {
            id: "cheesecake".to_string(),
            name: "Baked cheesecake".to_string(),
            cook_time: 90,
            rating: 3.9,
            nutrition: nutrition(650.0, 9.0, 48.0, 44.0, 380.0, 0.5),
            difficulty: Difficulty::Hard,
            ingredients: ingredients(&["cream cheese", "sugar", "butter"]),
            category: strings(&["dessert"]),
            tags: strings(&["baked"]),
            ..Default::default()
        },
    ]
}

fn demo_history(goal: HealthGoal) -> UserHistory {
    UserHistory {
        recent_recipes: strings(&["chicken-salad"]),
        ratings: BTreeMap::from([
            ("chicken-salad".to_string(), 5),
            ("cheesecake".to_string(), 2),
        ]),
        category_frequency: BTreeMap::from([
            ("high-protein".to_string(), 6),
            ("dessert".to_string(), 1),
        ]),
        health_profile: HealthProfile {
            health_goal: goal,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn demo_preferences() -> UserPreferences {
    UserPreferences {
        cuisine_types: strings(&["cantonese", "sichuan"]),
        difficulty: vec![Difficulty::Easy, Difficulty::Medium],
        max_cook_time: 30,
        favorite_ingredients: strings(&["fish", "tofu"]),
        disliked_ingredients: strings(&["cilantro"]),
        ..Default::default()
    }
}

fn demo_engine(goal: HealthGoal, now: &str) -> RecommendationEngine {
    RecommendationEngine::new(demo_catalog(), demo_history(goal), demo_preferences())
        .with_clock(FixedClock(at(now)))
}

/// Returned scores, lengths and reasons respect their bounds
#[test]
fn test_output_bounds() {
    for goal in [
        HealthGoal::WeightLoss,
        HealthGoal::MuscleGain,
        HealthGoal::MaintainHealth,
        HealthGoal::SpecialNutrition,
    ] {
        let engine = demo_engine(goal, "2025-06-20 18:30:00");

        let qualifying = engine
            .catalog()
            .iter()
            .filter(|r| !demo_history(goal).has_recently_tried(&r.id))
            .filter_map(|r| engine.score_recipe(&r.id))
            .filter(|b| b.total > 0.3)
            .count();

        for count in [1, 2, 3, 10] {
            let results = engine.get_recommendations(count);
            assert_eq!(results.len(), count.min(qualifying), "goal {goal:?}, count {count}");

            for result in &results {
                assert!(result.score > 0.3 && result.score <= 1.0);
                assert!(result.reasons.len() <= 3);
                assert_ne!(result.recipe_id, "chicken-salad");
            }

            for pair in results.windows(2) {
                assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}

#[test]
fn test_ranking_for_weight_loss_summer_dinner() {
    let engine = demo_engine(HealthGoal::WeightLoss, "2025-06-20 18:30:00");
    let results = engine.get_recommendations(10);

    // Fish is lean, popular, in season, a dinner dish and similar to the
    // chicken salad the user loved
    assert_eq!(results[0].recipe_id, "steamed-fish");
    assert!(results.iter().all(|r| r.recipe_id != "cheesecake"));
}

#[test]
fn test_deterministic_for_same_clock() {
    let first = demo_engine(HealthGoal::MaintainHealth, "2025-11-02 08:00:00").get_recommendations(10);
    let second = demo_engine(HealthGoal::MaintainHealth, "2025-11-02 08:00:00").get_recommendations(10);
    assert_eq!(first, second);
}

#[test]
fn test_weight_loss_nutrition_scenario() {
    let base = Recipe {
        id: "light".to_string(),
        name: "Light".to_string(),
        nutrition: Nutrition {
            calories: 350.0,
            protein: 25.0,
            fat: 10.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let heavy = Recipe {
        id: "heavy".to_string(),
        nutrition: Nutrition {
            calories: 600.0,
            protein: 10.0,
            fat: 30.0,
            ..Default::default()
        },
        ..base.clone()
    };

    let engine = RecommendationEngine::new(
        vec![base, heavy],
        demo_history(HealthGoal::WeightLoss),
        UserPreferences::default(),
    )
    .with_clock(FixedClock(at("2025-01-10 15:00:00")));

    let light = engine.score_recipe("light").unwrap();
    let heavy = engine.score_recipe("heavy").unwrap();
    assert!(light.nutrition > heavy.nutrition);
}

#[test]
fn test_disliked_ingredient_scenario() {
    let clean = Recipe {
        id: "clean".to_string(),
        name: "Clean".to_string(),
        cook_time: 20,
        difficulty: Difficulty::Easy,
        cuisine_type: Some("sichuan".to_string()),
        ..Default::default()
    };
    let with_disliked = Recipe {
        id: "with-disliked".to_string(),
        ingredients: ingredients(&["fresh cilantro"]),
        ..clean.clone()
    };

    let engine = RecommendationEngine::new(
        vec![clean, with_disliked],
        UserHistory::default(),
        demo_preferences(),
    )
    .with_clock(FixedClock(at("2025-01-10 15:00:00")));

    let clean = engine.score_recipe("clean").unwrap();
    let penalized = engine.score_recipe("with-disliked").unwrap();
    assert!(clean.preference > 0.0);
    assert!(penalized.preference <= clean.preference * 0.3 + 1e-10);
}

#[test]
fn test_empty_catalog() {
    let results = recommend(
        &[],
        &demo_history(HealthGoal::WeightLoss),
        &demo_preferences(),
        10,
        at("2025-06-20 18:30:00"),
    );
    assert!(results.is_empty());
}

#[test]
fn test_recent_recipe_excluded_when_otherwise_perfect() {
    let perfect = Recipe {
        id: "perfect".to_string(),
        name: "Perfect".to_string(),
        cook_time: 10,
        rating: 5.0,
        nutrition: nutrition(300.0, 30.0, 10.0, 5.0, 100.0, 8.0),
        difficulty: Difficulty::Easy,
        ingredients: ingredients(&["tofu", "saffron", "yuzu"]),
        cuisine_type: Some("sichuan".to_string()),
        is_new: true,
        popularity: Some(1.0),
        seasonality: Some(vec![Season::Summer]),
        meal_time: Some(vec![MealTime::Dinner]),
        ..Default::default()
    };

    let mut history = demo_history(HealthGoal::WeightLoss);
    let now = at("2025-06-20 18:30:00");

    let catalog = vec![perfect];
    assert_eq!(recommend(&catalog, &history, &demo_preferences(), 10, now).len(), 1);

    history.recent_recipes.push("perfect".to_string());
    assert!(recommend(&catalog, &history, &demo_preferences(), 10, now).is_empty());
}

#[test]
fn test_fewer_qualifying_than_requested() {
    let qualifying = Recipe {
        id: "qualifying".to_string(),
        name: "Qualifying".to_string(),
        cook_time: 20,
        difficulty: Difficulty::Easy,
        nutrition: nutrition(350.0, 25.0, 20.0, 10.0, 500.0, 1.0),
        ..Default::default()
    };
    let weak = Recipe {
        id: "weak".to_string(),
        name: "Weak".to_string(),
        cook_time: 120,
        difficulty: Difficulty::Hard,
        nutrition: nutrition(900.0, 5.0, 100.0, 50.0, 1500.0, 0.0),
        ..Default::default()
    };

    let catalog = vec![weak.clone(), qualifying, weak];
    let results = recommend(
        &catalog,
        &demo_history(HealthGoal::WeightLoss),
        &demo_preferences(),
        3,
        at("2025-01-10 15:00:00"),
    );

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].recipe_id, "qualifying");
}

/// Catalog and profile JSON in the web front end's shape load through storage
#[tokio::test]
async fn test_storage_to_engine() {
    let temp_dir = TempDir::new().unwrap();
    let mut storage = FileStorage::new(temp_dir.path()).await.unwrap();

    let catalog_json = serde_json::to_string(&demo_catalog()).unwrap();
    let recipes: Vec<Recipe> = serde_json::from_str(&catalog_json).unwrap();
    for recipe in recipes {
        storage.store_recipe(recipe).await.unwrap();
    }

    let profile_json = r#"{
        "userId": "demo_user",
        "history": {
            "recentRecipes": [],
            "ratings": {"chicken-salad": 5},
            "categoryFrequency": {"high-protein": 4},
            "nutritionGoals": {"calories": 1800, "protein": 90, "carbs": 200, "fat": 60},
            "healthProfile": {"healthGoal": "weight_loss", "activityLevel": "moderate"}
        },
        "preferences": {
            "cuisineTypes": ["cantonese"],
            "difficulty": ["easy"],
            "maxCookTime": 30,
            "dietaryRestrictions": [],
            "favoriteIngredients": ["fish"],
            "dislikedIngredients": ["cilantro"],
            "favoriteCategories": ["low-fat"],
            "nutritionFocus": ["high_protein"]
        }
    }"#;
    let profile: UserProfile = serde_json::from_str(profile_json).unwrap();
    storage.store_profile(profile).await.unwrap();

    // Cooking the salad moves it into the recent list
    storage
        .record_cooked("demo_user", "chicken-salad", Some(5))
        .await
        .unwrap();

    let profile = storage.get_profile("demo_user").await.unwrap().unwrap();
    assert_eq!(profile.history.category_frequency["high-protein"], 5);

    let engine = RecommendationEngine::new(
        storage.get_catalog().await.unwrap(),
        profile.history,
        profile.preferences,
    )
    .with_clock(FixedClock(at("2025-06-20 18:30:00")));

    let results = engine.get_recommendations(10);
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r.recipe_id != "chicken-salad"));
    assert_eq!(results[0].recipe_id, "steamed-fish");

    let json = serde_json::to_string(&results).unwrap();
    assert!(json.contains("\"recipeId\""));
}
