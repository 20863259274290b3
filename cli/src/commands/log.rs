use anyhow::{Result, bail};
use serde_json::json;

use tally_core::calc;
use tally_core::models::{FoodDefinition, MealSlot, NewFoodEntry, Unit, validate_quantity};
use tally_core::catalog;
use tally_core::store::{DEFAULT_RECENT_LIMIT, DataStore};

use super::helpers::{parse_date, print_food_table, prompt_choice};

/// Resolve a food by explicit id, checking the bundled catalog first and the
/// user's custom foods second.
async fn food_by_id(store: &DataStore, id: &str) -> Result<FoodDefinition> {
    if let Some(food) = catalog::by_id(id) {
        return Ok(food.clone());
    }
    if let Some(food) = store.custom_foods().await?.into_iter().find(|f| f.id == id) {
        return Ok(food);
    }
    bail!("No food with id '{id}'")
}

async fn resolve_food(
    store: &DataStore,
    query: &str,
    food_id: Option<&str>,
) -> Result<FoodDefinition> {
    if let Some(id) = food_id {
        return food_by_id(store, id).await;
    }

    let mut found = store.search_foods(query).await?;
    match found.len() {
        0 => bail!("No foods matching '{query}'. Add one with `tally food add`"),
        1 => Ok(found.remove(0)),
        n => {
            print_food_table(&found);
            let idx = prompt_choice(n)?;
            Ok(found.swap_remove(idx))
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) async fn cmd_log(
    store: &DataStore,
    food_query: &str,
    quantity: f64,
    unit: &str,
    meal: &str,
    food_id: Option<String>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    validate_quantity(quantity)?;
    let unit = Unit::parse(unit)?;
    let meal = MealSlot::parse(meal)?;
    let date = parse_date(date)?;

    let food = resolve_food(store, food_query, food_id.as_deref()).await?;
    let grams = calc::convert_to_grams(quantity, unit, &food);
    let nutrition = calc::portion_nutrition(&food, grams);

    let entry = store
        .log_entry(
            date,
            NewFoodEntry {
                food_id: Some(food.id.clone()),
                food_name: food.name.clone(),
                meal,
                quantity,
                unit,
                calories: nutrition.calories,
                protein: nutrition.protein,
                carbs: nutrition.carbs,
                fat: nutrition.fat,
            },
        )
        .await?;
    store.touch_recent(&food)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        println!(
            "Logged {} {} of {} for {} on {} — {:.0} kcal | P:{:.1}g C:{:.1}g F:{:.1}g",
            quantity,
            unit,
            food.name,
            meal,
            date,
            entry.calories,
            entry.protein,
            entry.carbs,
            entry.fat
        );
    }
    Ok(())
}

pub(crate) async fn cmd_delete(
    store: &DataStore,
    entry_id: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let found = store.delete_entry(date, entry_id).await?;
    if !found {
        bail!("No entry '{entry_id}' on {date}");
    }
    if json {
        println!("{}", json!({ "deleted": entry_id }));
    } else {
        println!("Deleted entry {entry_id}");
    }
    Ok(())
}

pub(crate) fn cmd_recent(store: &DataStore, limit: Option<usize>, json: bool) -> Result<()> {
    let recent = store.recent_foods(limit.unwrap_or(DEFAULT_RECENT_LIMIT))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&recent)?);
        return Ok(());
    }
    if recent.is_empty() {
        eprintln!("No recently logged foods yet");
        std::process::exit(2);
    }
    print_food_table(&recent);
    Ok(())
}
