use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Local;
use serde_json::json;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tally_core::calc;
use tally_core::models::{DailyTotals, MealSlot};
use tally_core::store::DataStore;

use super::helpers::parse_date;

pub(crate) async fn cmd_summary(
    store: &mut DataStore,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let entries = store.entries_for_date(date).await?;
    let totals = calc::daily_totals(&entries);
    let profile = store.profile().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "date": date,
                "entries": entries,
                "totals": totals,
                "calorie_target": profile.as_ref().map(|p| p.calorie_target),
            }))?
        );
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!("No entries for {date}");
        std::process::exit(2);
    }

    println!("=== {date} ===\n");
    for meal in MealSlot::ALL {
        let meal_entries: Vec<_> = entries.iter().filter(|e| e.meal == *meal).collect();
        if meal_entries.is_empty() {
            continue;
        }
        let sub_cal: f64 = meal_entries.iter().map(|e| e.calories).sum();
        println!("  {} ({sub_cal:.0} kcal)", meal.as_str().to_uppercase());
        for e in meal_entries {
            println!(
                "    [{}] {} — {} {} — {:.0} kcal | P:{:.1}g C:{:.1}g F:{:.1}g",
                e.id, e.food_name, e.quantity, e.unit, e.calories, e.protein, e.carbs, e.fat
            );
        }
        println!();
    }

    println!(
        "  TOTAL: {:.0} kcal | P:{:.1}g C:{:.1}g F:{:.1}g",
        totals.calories, totals.protein, totals.carbs, totals.fat
    );
    if let Some(profile) = profile {
        println!(
            "  TARGET: {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g",
            profile.calorie_target,
            profile.protein_target_g,
            profile.carbs_target_g,
            profile.fat_target_g
        );
        println!(
            "  REMAINING: {:.0} kcal",
            profile.calorie_target - totals.calories
        );
    }
    Ok(())
}

pub(crate) async fn cmd_week(store: &mut DataStore, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct DayRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Carbs")]
        carbs: String,
        #[tabled(rename = "Fat")]
        fat: String,
    }

    let today = Local::now().date_naive();
    let mut days: BTreeMap<chrono::NaiveDate, DailyTotals> = BTreeMap::new();
    for i in 0..7 {
        let date = today - chrono::Duration::days(i64::from(i));
        let entries = store.entries_for_date(date).await?;
        if !entries.is_empty() {
            days.insert(date, calc::daily_totals(&entries));
        }
    }

    let averages = calc::weekly_averages(&days);
    let profile = store.profile().await?;
    let adherence = profile
        .as_ref()
        .map(|p| calc::goal_adherence(&days, p.calorie_target, calc::DEFAULT_ADHERENCE_TOLERANCE));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "days": days,
                "averages": averages,
                "adherence_pct": adherence,
            }))?
        );
        return Ok(());
    }

    if days.is_empty() {
        eprintln!("No entries in the last 7 days");
        std::process::exit(2);
    }

    let rows: Vec<DayRow> = days
        .iter()
        .map(|(date, t)| DayRow {
            date: date.to_string(),
            calories: format!("{:.0}", t.calories),
            protein: format!("{:.1}", t.protein),
            carbs: format!("{:.1}", t.carbs),
            fat: format!("{:.1}", t.fat),
        })
        .collect();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..5)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    println!(
        "\n  Average: {:.0} kcal | P:{:.1}g C:{:.1}g F:{:.1}g ({} logged days)",
        averages.calories,
        averages.protein,
        averages.carbs,
        averages.fat,
        days.len()
    );
    if let (Some(profile), Some(adherence)) = (profile, adherence) {
        println!(
            "  On target ({:.0} kcal ±10%): {adherence}% of logged days",
            profile.calorie_target
        );
    }
    Ok(())
}
