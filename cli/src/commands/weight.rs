use anyhow::{Result, bail};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use tally_core::store::DataStore;

use super::helpers::parse_date;

const LBS_PER_KG: f64 = 2.20462;
const KG_PER_LB: f64 = 0.453_592;

pub(crate) async fn cmd_weight_log(
    store: &mut DataStore,
    value: f64,
    unit: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let weight_kg = match unit.to_lowercase().as_str() {
        "kg" => value,
        "lbs" | "lb" => {
            let kg = value * KG_PER_LB;
            eprintln!("Converting {value:.1} lbs → {kg:.2} kg");
            kg
        }
        _ => bail!("Invalid unit '{unit}'. Use 'kg' or 'lbs'"),
    };

    let date = parse_date(date)?;
    let entry = store.log_weight(date, weight_kg).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
    } else {
        let lbs = entry.weight_kg * LBS_PER_KG;
        println!(
            "Logged {:.1} kg ({lbs:.1} lbs) for {}",
            entry.weight_kg, entry.date
        );
        if let Some(profile) = store.cached_profile()? {
            println!(
                "Targets recomputed: {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g",
                profile.calorie_target,
                profile.protein_target_g,
                profile.carbs_target_g,
                profile.fat_target_g
            );
        }
    }
    Ok(())
}

pub(crate) async fn cmd_weight_history(
    store: &DataStore,
    days: Option<usize>,
    json: bool,
) -> Result<()> {
    #[derive(Tabled)]
    struct WeightRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "kg")]
        kg: String,
        #[tabled(rename = "lbs")]
        lbs: String,
        #[tabled(rename = "Change")]
        change: String,
    }

    let mut entries = store.weight_history().await?;
    if let Some(days) = days {
        let len = entries.len();
        entries = entries.split_off(len.saturating_sub(days));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!("No weight entries yet. Log one with `tally weight log`.");
        std::process::exit(2);
    }

    let mut prev: Option<f64> = None;
    let rows: Vec<WeightRow> = entries
        .iter()
        .map(|e| {
            let change = prev.map_or(String::from("-"), |p| {
                format!("{:+.1}", e.weight_kg - p)
            });
            prev = Some(e.weight_kg);
            WeightRow {
                date: e.date.to_string(),
                kg: format!("{:.1}", e.weight_kg),
                lbs: format!("{:.1}", e.weight_kg * LBS_PER_KG),
                change,
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    Ok(())
}
