//! Bundled reference data: a starter food catalog and a handful of reference
//! recipes. Nutrition values are per 100 g (or 100 ml for liquids); weights
//! drive the portion/unit/cup conversions in `calc::convert_to_grams`.
//!
//! This is the offline seed; the remote food table extends it, never the
//! other way around.

use std::sync::LazyLock;

use crate::models::{FoodDefinition, FoodSource, Goal, Recipe, RecipeIngredient, Unit};

pub const MIN_SEARCH_CHARS: usize = 2;

pub const CATEGORIES: &[&str] = &[
    "fruits",
    "vegetables",
    "proteins",
    "dairy",
    "grains",
    "beverages",
    "snacks",
];

#[allow(clippy::too_many_arguments)]
fn food(
    id: &str,
    name: &str,
    category: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
    serving_size_g: f64,
    unit_weight_g: Option<f64>,
    cup_weight_g: Option<f64>,
) -> FoodDefinition {
    FoodDefinition {
        id: id.to_string(),
        name: name.to_string(),
        brand: None,
        category: Some(category.to_string()),
        calories,
        protein,
        carbs,
        fat,
        fiber: Some(fiber),
        serving_size_g: Some(serving_size_g),
        unit_weight_g,
        cup_weight_g,
        source: FoodSource::Catalog,
    }
}

static FOODS: LazyLock<Vec<FoodDefinition>> = LazyLock::new(|| {
    vec![
        // fruits
        food("banana", "Banana", "fruits", 89.0, 1.1, 22.8, 0.3, 2.6, 120.0, Some(120.0), None),
        food("apple", "Apple", "fruits", 52.0, 0.3, 13.8, 0.2, 2.4, 180.0, Some(180.0), None),
        food("orange", "Orange", "fruits", 47.0, 0.9, 11.8, 0.1, 2.4, 150.0, Some(150.0), None),
        food("strawberry", "Strawberry", "fruits", 32.0, 0.7, 7.7, 0.3, 2.0, 150.0, None, Some(150.0)),
        food("pear", "Pear", "fruits", 57.0, 0.4, 15.2, 0.1, 3.1, 180.0, Some(180.0), None),
        // vegetables
        food("tomato", "Tomato", "vegetables", 18.0, 0.9, 3.9, 0.2, 1.2, 150.0, Some(150.0), None),
        food("lettuce", "Lettuce", "vegetables", 15.0, 1.4, 2.9, 0.2, 1.3, 50.0, None, Some(50.0)),
        food("carrot", "Carrot", "vegetables", 41.0, 0.9, 9.6, 0.2, 2.8, 80.0, Some(80.0), None),
        food("potato", "Potato", "vegetables", 77.0, 2.0, 17.0, 0.1, 2.2, 150.0, Some(150.0), None),
        food("sweet_potato", "Sweet potato", "vegetables", 86.0, 1.6, 20.1, 0.1, 3.0, 150.0, Some(150.0), None),
        food("broccoli", "Broccoli", "vegetables", 34.0, 2.8, 6.6, 0.4, 2.6, 100.0, None, Some(90.0)),
        food("spinach", "Spinach", "vegetables", 23.0, 2.9, 3.6, 0.4, 2.2, 50.0, None, Some(30.0)),
        food("avocado", "Avocado", "vegetables", 160.0, 2.0, 8.5, 14.7, 6.7, 100.0, Some(150.0), None),
        // proteins
        food("chicken_breast", "Chicken breast", "proteins", 165.0, 31.0, 0.0, 3.6, 0.0, 150.0, None, None),
        food("beef_steak", "Beef steak", "proteins", 250.0, 26.0, 0.0, 15.0, 0.0, 200.0, None, None),
        food("ground_beef_lean", "Lean ground beef", "proteins", 170.0, 21.0, 0.0, 10.0, 0.0, 150.0, None, None),
        food("salmon", "Salmon", "proteins", 208.0, 20.0, 0.0, 13.0, 0.0, 150.0, None, None),
        food("tuna", "Canned tuna (in water)", "proteins", 116.0, 26.0, 0.0, 0.8, 0.0, 100.0, None, None),
        food("egg", "Egg", "proteins", 155.0, 13.0, 1.1, 11.0, 0.0, 50.0, Some(50.0), None),
        food("egg_white", "Egg white", "proteins", 52.0, 11.0, 0.7, 0.2, 0.0, 33.0, Some(33.0), None),
        // dairy
        food("milk_whole", "Whole milk", "dairy", 61.0, 3.2, 4.8, 3.3, 0.0, 200.0, None, Some(240.0)),
        food("milk_skim", "Skim milk", "dairy", 35.0, 3.4, 5.0, 0.1, 0.0, 200.0, None, Some(240.0)),
        food("yogurt_greek", "Greek yogurt", "dairy", 97.0, 9.0, 3.6, 5.0, 0.0, 150.0, Some(150.0), None),
        food("cheese_mozzarella", "Mozzarella cheese", "dairy", 280.0, 28.0, 2.2, 17.0, 0.0, 30.0, None, None),
        // grains
        food("rice_white", "White rice (cooked)", "grains", 130.0, 2.7, 28.0, 0.3, 0.4, 150.0, None, Some(185.0)),
        food("rice_brown", "Brown rice (cooked)", "grains", 111.0, 2.6, 23.0, 0.9, 1.8, 150.0, None, Some(195.0)),
        food("pasta_cooked", "Pasta (cooked)", "grains", 131.0, 5.0, 25.0, 1.1, 1.8, 200.0, None, Some(140.0)),
        food("bread_whole", "Whole-wheat bread", "grains", 247.0, 13.0, 41.0, 4.2, 7.0, 30.0, Some(30.0), None),
        food("oats", "Oats", "grains", 389.0, 16.9, 66.3, 6.9, 10.6, 40.0, None, Some(80.0)),
        food("quinoa", "Quinoa (cooked)", "grains", 120.0, 4.4, 21.3, 1.9, 2.8, 100.0, None, Some(185.0)),
        // beverages
        food("coffee_black", "Black coffee", "beverages", 2.0, 0.1, 0.0, 0.0, 0.0, 200.0, None, Some(240.0)),
        food("orange_juice", "Orange juice", "beverages", 45.0, 0.7, 10.4, 0.2, 0.2, 200.0, None, Some(240.0)),
        // snacks
        food("peanuts", "Peanuts", "snacks", 567.0, 25.8, 16.1, 49.2, 8.5, 30.0, None, None),
        food("almonds", "Almonds", "snacks", 579.0, 21.2, 21.6, 49.9, 12.5, 30.0, None, None),
        food("chocolate_dark", "Dark chocolate 70%", "snacks", 598.0, 7.8, 45.9, 42.6, 10.9, 30.0, None, None),
    ]
});

static RECIPES: LazyLock<Vec<Recipe>> = LazyLock::new(|| {
    fn ing(food_id: &str, quantity: f64, unit: Unit) -> RecipeIngredient {
        RecipeIngredient {
            food_id: food_id.to_string(),
            quantity,
            unit,
        }
    }
    vec![
        Recipe {
            id: "grilled-chicken-rice-bowl".to_string(),
            name: "Grilled chicken with brown rice and broccoli".to_string(),
            category: "high-protein".to_string(),
            goal: Goal::Surplus,
            calories_per_serving: 450.0,
            protein_per_serving: 42.0,
            carbs_per_serving: 45.0,
            fat_per_serving: 8.0,
            ingredients: vec![
                ing("chicken_breast", 200.0, Unit::Gram),
                ing("rice_brown", 150.0, Unit::Gram),
                ing("broccoli", 100.0, Unit::Gram),
            ],
            steps: vec![
                "Season the chicken with salt, pepper and garlic".to_string(),
                "Grill 6-7 minutes per side".to_string(),
                "Cook the brown rice".to_string(),
                "Sauté the broccoli in a little olive oil".to_string(),
            ],
        },
        Recipe {
            id: "egg-white-omelette".to_string(),
            name: "Egg-white omelette with spinach and cheese".to_string(),
            category: "high-protein".to_string(),
            goal: Goal::Deficit,
            calories_per_serving: 180.0,
            protein_per_serving: 28.0,
            carbs_per_serving: 4.0,
            fat_per_serving: 6.0,
            ingredients: vec![
                ing("egg_white", 6.0, Unit::Piece),
                ing("spinach", 50.0, Unit::Gram),
                ing("cheese_mozzarella", 30.0, Unit::Gram),
            ],
            steps: vec![
                "Whisk the egg whites with salt and pepper".to_string(),
                "Wilt the spinach in a pan".to_string(),
                "Pour in the whites and cook over medium heat".to_string(),
                "Add the cheese and fold".to_string(),
            ],
        },
        Recipe {
            id: "baked-salmon-quinoa".to_string(),
            name: "Baked salmon with quinoa".to_string(),
            category: "high-protein".to_string(),
            goal: Goal::Maintenance,
            calories_per_serving: 520.0,
            protein_per_serving: 38.0,
            carbs_per_serving: 35.0,
            fat_per_serving: 24.0,
            ingredients: vec![
                ing("salmon", 180.0, Unit::Gram),
                ing("quinoa", 150.0, Unit::Gram),
                ing("avocado", 50.0, Unit::Gram),
            ],
            steps: vec![
                "Preheat the oven to 200°C".to_string(),
                "Season the salmon with lemon and dill".to_string(),
                "Bake 15-18 minutes".to_string(),
                "Serve over cooked quinoa with sliced avocado".to_string(),
            ],
        },
        Recipe {
            id: "tuna-veggie-bowl".to_string(),
            name: "Tuna and vegetable bowl".to_string(),
            category: "low-calorie".to_string(),
            goal: Goal::Deficit,
            calories_per_serving: 280.0,
            protein_per_serving: 35.0,
            carbs_per_serving: 15.0,
            fat_per_serving: 8.0,
            ingredients: vec![
                ing("tuna", 150.0, Unit::Gram),
                ing("lettuce", 100.0, Unit::Gram),
                ing("tomato", 100.0, Unit::Gram),
                ing("carrot", 50.0, Unit::Gram),
            ],
            steps: vec![
                "Drain the tuna".to_string(),
                "Chop the vegetables".to_string(),
                "Toss everything in a bowl with lemon and olive oil".to_string(),
            ],
        },
        Recipe {
            id: "greek-yogurt-snack".to_string(),
            name: "Greek yogurt with almonds and banana".to_string(),
            category: "high-protein".to_string(),
            goal: Goal::Surplus,
            calories_per_serving: 350.0,
            protein_per_serving: 22.0,
            carbs_per_serving: 38.0,
            fat_per_serving: 14.0,
            ingredients: vec![
                ing("yogurt_greek", 200.0, Unit::Gram),
                ing("banana", 100.0, Unit::Gram),
                ing("almonds", 20.0, Unit::Gram),
            ],
            steps: vec![
                "Slice the banana".to_string(),
                "Spoon the yogurt into a bowl".to_string(),
                "Top with banana and chopped almonds".to_string(),
            ],
        },
        Recipe {
            id: "overnight-oats".to_string(),
            name: "Overnight oats with strawberries".to_string(),
            category: "balanced".to_string(),
            goal: Goal::Maintenance,
            calories_per_serving: 340.0,
            protein_per_serving: 14.0,
            carbs_per_serving: 52.0,
            fat_per_serving: 8.0,
            ingredients: vec![
                ing("oats", 50.0, Unit::Gram),
                ing("milk_skim", 200.0, Unit::Milliliter),
                ing("strawberry", 100.0, Unit::Gram),
            ],
            steps: vec![
                "Combine oats and milk in a jar".to_string(),
                "Refrigerate overnight".to_string(),
                "Top with sliced strawberries before eating".to_string(),
            ],
        },
    ]
});

#[must_use]
pub fn all() -> &'static [FoodDefinition] {
    &FOODS
}

#[must_use]
pub fn by_id(id: &str) -> Option<&'static FoodDefinition> {
    FOODS.iter().find(|f| f.id == id)
}

#[must_use]
pub fn by_category(category: &str) -> Vec<&'static FoodDefinition> {
    FOODS
        .iter()
        .filter(|f| f.category.as_deref() == Some(category))
        .collect()
}

/// Case-insensitive substring search over names. Queries shorter than
/// [`MIN_SEARCH_CHARS`] match nothing.
#[must_use]
pub fn search(query: &str) -> Vec<&'static FoodDefinition> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_SEARCH_CHARS {
        return Vec::new();
    }
    FOODS
        .iter()
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .collect()
}

#[must_use]
pub fn recipes() -> &'static [Recipe] {
    &RECIPES
}

#[must_use]
pub fn recipes_for_goal(goal: Goal) -> Vec<&'static Recipe> {
    RECIPES.iter().filter(|r| r.goal == goal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_food_ids_unique() {
        let mut seen = HashSet::new();
        for food in all() {
            assert!(seen.insert(&food.id), "duplicate food id {}", food.id);
        }
    }

    #[test]
    fn test_foods_have_sane_values() {
        for food in all() {
            assert!(food.calories >= 0.0, "{}", food.id);
            assert!(food.protein >= 0.0 && food.carbs >= 0.0 && food.fat >= 0.0);
            assert!(food.serving_size_g.is_some(), "{}", food.id);
            assert!(
                CATEGORIES.contains(&food.category.as_deref().unwrap()),
                "{} has unknown category",
                food.id
            );
        }
    }

    #[test]
    fn test_by_id() {
        let banana = by_id("banana").unwrap();
        assert!((banana.calories - 89.0).abs() < f64::EPSILON);
        assert_eq!(banana.unit_weight_g, Some(120.0));
        assert!(by_id("no-such-food").is_none());
    }

    #[test]
    fn test_search_minimum_length() {
        assert!(search("a").is_empty());
        assert!(search(" ").is_empty());
        assert!(!search("ba").is_empty());
    }

    #[test]
    fn test_search_case_insensitive_substring() {
        let hits = search("CHICKEN");
        assert!(hits.iter().any(|f| f.id == "chicken_breast"));
        let hits = search("rice");
        assert!(hits.len() >= 2);
    }

    #[test]
    fn test_by_category() {
        let proteins = by_category("proteins");
        assert!(proteins.iter().all(|f| f.category.as_deref() == Some("proteins")));
        assert!(proteins.iter().any(|f| f.id == "egg"));
    }

    #[test]
    fn test_recipe_ingredients_resolve() {
        for recipe in recipes() {
            assert!(!recipe.steps.is_empty(), "{}", recipe.id);
            for ing in &recipe.ingredients {
                assert!(
                    by_id(&ing.food_id).is_some(),
                    "{} references unknown food {}",
                    recipe.id,
                    ing.food_id
                );
            }
        }
    }

    #[test]
    fn test_recipes_for_goal() {
        for recipe in recipes_for_goal(Goal::Deficit) {
            assert_eq!(recipe.goal, Goal::Deficit);
        }
        assert!(!recipes_for_goal(Goal::Surplus).is_empty());
    }
}
