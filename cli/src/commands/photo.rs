use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use tally_core::calc;
use tally_core::models::{MealSlot, NewFoodEntry, Unit};
use tally_core::store::DataStore;

use super::helpers::parse_date;

pub(crate) async fn cmd_photo(
    store: &DataStore,
    path: &Path,
    meal: &str,
    date: Option<String>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let meal = MealSlot::parse(meal)?;
    let date = parse_date(date)?;

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let detected = store.analyze_photo(&BASE64.encode(&bytes)).await?;

    if detected.is_empty() {
        if json {
            println!("{}", json!({ "detected": [], "logged": [] }));
            return Ok(());
        }
        eprintln!("No foods detected in the photo");
        std::process::exit(2);
    }

    let matches = store.match_detected(&detected).await?;
    let mut logged = Vec::new();
    let mut unmatched = Vec::new();

    for (detection, food) in matches {
        match food {
            Some(food) if !dry_run => {
                let nutrition = calc::portion_nutrition(&food, detection.estimated_grams);
                let entry = store
                    .log_entry(
                        date,
                        NewFoodEntry {
                            food_id: Some(food.id.clone()),
                            food_name: food.name.clone(),
                            meal,
                            quantity: detection.estimated_grams,
                            unit: Unit::Gram,
                            calories: nutrition.calories,
                            protein: nutrition.protein,
                            carbs: nutrition.carbs,
                            fat: nutrition.fat,
                        },
                    )
                    .await?;
                store.touch_recent(&food)?;
                logged.push((detection, entry));
            }
            Some(food) => {
                let nutrition = calc::portion_nutrition(&food, detection.estimated_grams);
                logged.push((
                    detection.clone(),
                    tally_core::models::FoodEntry {
                        id: String::new(),
                        food_id: Some(food.id.clone()),
                        food_name: food.name.clone(),
                        meal,
                        quantity: detection.estimated_grams,
                        unit: Unit::Gram,
                        calories: nutrition.calories,
                        protein: nutrition.protein,
                        carbs: nutrition.carbs,
                        fat: nutrition.fat,
                        date,
                        created_at: String::new(),
                    },
                ));
            }
            None => unmatched.push(detection),
        }
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "detected": logged.iter().map(|(d, _)| d).chain(unmatched.iter()).collect::<Vec<_>>(),
                "logged": logged.iter().map(|(_, e)| e).collect::<Vec<_>>(),
                "unmatched": unmatched,
                "dry_run": dry_run,
            }))?
        );
        return Ok(());
    }

    for (detection, entry) in &logged {
        let verb = if dry_run { "Would log" } else { "Logged" };
        println!(
            "{verb} {} (~{:.0}g, {:.0}% confidence) — {:.0} kcal",
            entry.food_name, detection.estimated_grams, detection.confidence, entry.calories
        );
    }
    for detection in &unmatched {
        println!(
            "Detected '{}' ({:.0}% confidence) but no matching food. Create it with `tally food add \"{}\"`",
            detection.name, detection.confidence, detection.name
        );
    }
    Ok(())
}
