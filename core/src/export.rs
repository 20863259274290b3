//! CSV export of the food log.

use anyhow::Result;

use crate::models::FoodEntry;

/// Render entries as CSV, one row per entry, oldest day first. Rows within a
/// day keep insertion order.
pub fn entries_to_csv(entries: &[FoodEntry]) -> Result<String> {
    let mut sorted: Vec<&FoodEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at)));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Date", "Meal", "Food", "Quantity", "Unit", "Calories", "Protein", "Carbs", "Fat",
    ])?;
    for entry in sorted {
        writer.write_record([
            entry.date.to_string(),
            entry.meal.to_string(),
            entry.food_name.clone(),
            entry.quantity.to_string(),
            entry.unit.to_string(),
            entry.calories.to_string(),
            entry.protein.to_string(),
            entry.carbs.to_string(),
            entry.fat.to_string(),
        ])?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}
