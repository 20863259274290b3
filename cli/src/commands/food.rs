use anyhow::{Result, bail};
use serde_json::json;

use tally_core::catalog;
use tally_core::models::{FoodDefinition, FoodSource, Goal};
use tally_core::store::DataStore;

use super::helpers::print_food_table;

#[allow(clippy::too_many_arguments)]
pub(crate) async fn cmd_food_add(
    store: &DataStore,
    name: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: Option<f64>,
    serving: Option<f64>,
    brand: Option<String>,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let food = store
        .add_custom_food(FoodDefinition {
            id: String::new(),
            name: name.to_string(),
            brand,
            category,
            calories,
            protein,
            carbs,
            fat,
            fiber,
            serving_size_g: serving,
            unit_weight_g: None,
            cup_weight_g: None,
            source: FoodSource::Custom,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&food)?);
    } else {
        println!(
            "Added '{}' ({:.0} kcal/100g) with id {}",
            food.name, food.calories, food.id
        );
    }
    Ok(())
}

pub(crate) async fn cmd_food_list(
    store: &DataStore,
    category: Option<String>,
    custom_only: bool,
    json: bool,
) -> Result<()> {
    let mut foods: Vec<FoodDefinition> = if custom_only {
        Vec::new()
    } else {
        match category.as_deref() {
            Some(cat) => {
                if !catalog::CATEGORIES.contains(&cat) {
                    bail!(
                        "Unknown category '{cat}'. One of: {}",
                        catalog::CATEGORIES.join(", ")
                    );
                }
                catalog::by_category(cat).into_iter().cloned().collect()
            }
            None => catalog::all().to_vec(),
        }
    };
    foods.extend(store.custom_foods().await?);

    if json {
        println!("{}", serde_json::to_string_pretty(&foods)?);
        return Ok(());
    }
    if foods.is_empty() {
        eprintln!("No foods found");
        std::process::exit(2);
    }
    print_food_table(&foods);
    Ok(())
}

pub(crate) async fn cmd_food_search(store: &DataStore, query: &str, json: bool) -> Result<()> {
    let foods = store.search_foods(query).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&foods)?);
        return Ok(());
    }
    if foods.is_empty() {
        eprintln!("No foods matching '{query}'");
        std::process::exit(2);
    }
    print_food_table(&foods);
    Ok(())
}

pub(crate) async fn cmd_food_favorite(store: &DataStore, food_id: &str, json: bool) -> Result<()> {
    let food = match catalog::by_id(food_id) {
        Some(food) => food.clone(),
        None => {
            let custom = store.custom_foods().await?;
            match custom.into_iter().find(|f| f.id == food_id) {
                Some(food) => food,
                None => bail!("No food with id '{food_id}'"),
            }
        }
    };

    let now_favorite = store.toggle_favorite(&food).await?;
    if json {
        println!(
            "{}",
            json!({ "food_id": food.id, "favorite": now_favorite })
        );
    } else if now_favorite {
        println!("Added '{}' to favorites", food.name);
    } else {
        println!("Removed '{}' from favorites", food.name);
    }
    Ok(())
}

pub(crate) async fn cmd_food_favorites(store: &DataStore, json: bool) -> Result<()> {
    let foods = store.favorites().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&foods)?);
        return Ok(());
    }
    if foods.is_empty() {
        eprintln!("No favorites yet. Mark one with `tally food favorite <id>`.");
        std::process::exit(2);
    }
    print_food_table(&foods);
    Ok(())
}

pub(crate) fn cmd_recipes(goal: Option<String>, json: bool) -> Result<()> {
    let recipes: Vec<&tally_core::models::Recipe> = match goal {
        Some(ref g) => catalog::recipes_for_goal(Goal::parse(g)?),
        None => catalog::recipes().iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }
    if recipes.is_empty() {
        eprintln!("No recipes for that goal");
        std::process::exit(2);
    }
    for recipe in recipes {
        println!(
            "{} [{}] — {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g per serving",
            recipe.name,
            recipe.goal,
            recipe.calories_per_serving,
            recipe.protein_per_serving,
            recipe.carbs_per_serving,
            recipe.fat_per_serving
        );
        for ing in &recipe.ingredients {
            let name = catalog::by_id(&ing.food_id).map_or(ing.food_id.as_str(), |f| f.name.as_str());
            println!("    {} {} {}", ing.quantity, ing.unit, name);
        }
        for (i, step) in recipe.steps.iter().enumerate() {
            println!("    {}. {step}", i + 1);
        }
        println!();
    }
    Ok(())
}
