use anyhow::{Result, bail};
use serde_json::json;

use tally_core::calc;
use tally_core::models::{ActivityLevel, Goal, ProfileInput, Sex};
use tally_core::store::DataStore;

#[allow(clippy::too_many_arguments)]
pub(crate) async fn cmd_profile_set(
    store: &mut DataStore,
    weight: Option<f64>,
    height: Option<f64>,
    age: Option<u32>,
    sex: Option<String>,
    activity: Option<String>,
    goal: Option<String>,
    name: Option<String>,
    json: bool,
) -> Result<()> {
    // Partial updates work once a profile exists; the first set needs all
    // five body metrics plus the goal.
    let existing = store.cached_profile()?.map(|p| p.input());
    let input = match existing {
        Some(mut input) => {
            if let Some(v) = weight {
                input.weight_kg = v;
            }
            if let Some(v) = height {
                input.height_cm = v;
            }
            if let Some(v) = age {
                input.age = v;
            }
            if let Some(ref v) = sex {
                input.sex = Sex::parse(v)?;
            }
            if let Some(ref v) = activity {
                input.activity_level = ActivityLevel::parse(v)?;
            }
            if let Some(ref v) = goal {
                input.goal = Goal::parse(v)?;
            }
            if name.is_some() {
                input.name = name;
            }
            input
        }
        None => {
            let (Some(weight), Some(height), Some(age), Some(sex), Some(activity), Some(goal)) =
                (weight, height, age, sex.as_ref(), activity.as_ref(), goal.as_ref())
            else {
                bail!(
                    "No profile yet. Provide all of --weight, --height, --age, --sex, --activity, --goal"
                );
            };
            ProfileInput {
                name,
                weight_kg: weight,
                height_cm: height,
                age,
                sex: Sex::parse(sex)?,
                activity_level: ActivityLevel::parse(activity)?,
                goal: Goal::parse(goal)?,
            }
        }
    };

    let profile = store.save_profile(input).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("Profile saved.");
        print_profile(&profile);
    }
    Ok(())
}

pub(crate) async fn cmd_profile_show(store: &mut DataStore, json: bool) -> Result<()> {
    let Some(profile) = store.profile().await? else {
        if json {
            println!("{}", json!({ "profile": null }));
            return Ok(());
        }
        eprintln!("No profile yet. Create one with `tally profile set`.");
        std::process::exit(2);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print_profile(&profile);
    }
    Ok(())
}

fn print_profile(profile: &tally_core::models::Profile) {
    if let Some(name) = &profile.name {
        println!("  {name}");
    }
    println!(
        "  {:.1} kg | {:.0} cm | {} y | {} | {} | {}",
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.sex,
        profile.activity_level,
        profile.goal
    );
    println!(
        "  BMR {:.0} kcal | TDEE {:.0} kcal",
        profile.bmr, profile.tdee
    );
    println!(
        "  Target: {:.0} kcal | P:{:.0}g C:{:.0}g F:{:.0}g",
        profile.calorie_target,
        profile.protein_target_g,
        profile.carbs_target_g,
        profile.fat_target_g
    );
}

pub(crate) async fn cmd_targets(store: &mut DataStore, intense: bool, json: bool) -> Result<()> {
    let Some(profile) = store.profile().await? else {
        bail!("No profile yet. Create one with `tally profile set`");
    };
    let (targets, micros) = calc::calculate_all_with_micros(&profile.input(), intense);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "bmr": targets.bmr,
                "tdee": targets.tdee,
                "calorie_target": targets.calorie_target,
                "protein_g": targets.protein_target_g,
                "carbs_g": targets.carbs_target_g,
                "fat_g": targets.fat_target_g,
                "micronutrients": {
                    "magnesium": { "min": micros.magnesium.min, "max": micros.magnesium.max, "unit": micros.magnesium.unit },
                    "zinc": { "min": micros.zinc.min, "max": micros.zinc.max, "unit": micros.zinc.unit },
                    "vitamin_d3": { "min": micros.vitamin_d3.min, "max": micros.vitamin_d3.max, "unit": micros.vitamin_d3.unit },
                    "omega3": { "min": micros.omega3.min, "max": micros.omega3.max, "unit": micros.omega3.unit },
                    "sodium": { "min": micros.sodium.min, "max": micros.sodium.max, "unit": micros.sodium.unit },
                    "potassium": { "min": micros.potassium.min, "max": micros.potassium.max, "unit": micros.potassium.unit },
                },
            }))?
        );
        return Ok(());
    }

    println!("Daily targets ({} / {}):", profile.activity_level, profile.goal);
    println!("  Calories: {:.0} kcal (BMR {:.0}, TDEE {:.0})", targets.calorie_target, targets.bmr, targets.tdee);
    println!(
        "  Macros:   P:{:.0}g C:{:.0}g F:{:.0}g",
        targets.protein_target_g, targets.carbs_target_g, targets.fat_target_g
    );
    println!("  Micronutrients{}:", if intense { " (high-intensity day)" } else { "" });
    for (label, range) in [
        ("Magnesium", micros.magnesium),
        ("Zinc", micros.zinc),
        ("Vitamin D3", micros.vitamin_d3),
        ("Omega-3", micros.omega3),
        ("Sodium", micros.sodium),
        ("Potassium", micros.potassium),
    ] {
        if (range.min - range.max).abs() < f64::EPSILON {
            println!("    {label:<11} {:.0} {}", range.min, range.unit);
        } else {
            println!("    {label:<11} {:.0}-{:.0} {}", range.min, range.max, range.unit);
        }
    }
    Ok(())
}
