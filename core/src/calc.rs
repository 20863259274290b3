//! Nutritional-target calculation engine.
//!
//! Harris-Benedict (revised) BMR, activity-scaled TDEE, goal-adjusted calorie
//! target, g/kg macro split, and micronutrient banding. Every function here is
//! pure and total: bad or missing input degrades to 0 or a safe default, never
//! an error, because callers may run these with half-filled onboarding data.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{
    ActivityLevel, DailyTotals, FoodDefinition, FoodEntry, Goal, MacroTargets, PortionNutrition,
    ProfileInput, Sex, TargetSet, Unit,
};

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Default calorie-adherence tolerance (±10%).
pub const DEFAULT_ADHERENCE_TOLERANCE: f64 = 0.10;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Basal metabolic rate in kcal/day (Harris-Benedict revised).
/// Returns 0 when any input is missing (non-positive or non-finite).
#[must_use]
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: f64, sex: Sex) -> f64 {
    let inputs = [weight_kg, height_cm, age_years];
    if inputs.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return 0.0;
    }

    let value = match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years,
    };
    value.round()
}

#[must_use]
pub fn activity_factor(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Intense => 1.725,
        ActivityLevel::VeryIntense => 1.9,
    }
}

/// Total daily energy expenditure: BMR scaled by activity.
#[must_use]
pub fn tdee(bmr: f64, level: ActivityLevel) -> f64 {
    if !bmr.is_finite() || bmr <= 0.0 {
        return 0.0;
    }
    (bmr * activity_factor(level)).round()
}

#[must_use]
pub fn goal_modifier(goal: Goal) -> f64 {
    match goal {
        Goal::Deficit => 0.80,
        Goal::Maintenance => 1.0,
        Goal::Surplus => 1.15,
    }
}

/// Daily calorie target: TDEE adjusted for the goal direction.
#[must_use]
pub fn calorie_target(tdee: f64, goal: Goal) -> f64 {
    if !tdee.is_finite() || tdee <= 0.0 {
        return 0.0;
    }
    (tdee * goal_modifier(goal)).round()
}

/// Macro split in grams from body weight and goal.
///
/// Protein and fat come from g/kg coefficients; carbs absorb the remaining
/// calories but never drop below a goal-specific per-kg floor, even when the
/// remaining-calorie arithmetic would push them lower or negative.
#[must_use]
pub fn macro_targets(calorie_target: f64, weight_kg: f64, goal: Goal) -> MacroTargets {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return MacroTargets {
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
        };
    }

    let (protein_per_kg, fat_per_kg, min_carbs_per_kg) = match goal {
        // High protein to preserve muscle during fat loss
        Goal::Deficit => (2.4, 0.65, 2.0),
        Goal::Maintenance => (2.0, 1.0, 3.0),
        // Moderate protein, higher carbs for muscle gain
        Goal::Surplus => (1.8, 1.0, 4.0),
    };

    let protein_g = (weight_kg * protein_per_kg).round();
    let fat_g = (weight_kg * fat_per_kg).round();

    let remaining =
        calorie_target - protein_g * KCAL_PER_G_PROTEIN - fat_g * KCAL_PER_G_FAT;
    let carbs_g = (remaining / KCAL_PER_G_CARBS).round();
    let min_carbs_g = (weight_kg * min_carbs_per_kg).round();

    MacroTargets {
        protein_g,
        carbs_g: carbs_g.max(min_carbs_g),
        fat_g,
    }
}

/// Single entry point the data store uses after any profile edit or weight
/// log: derives every target from the five body metrics plus goal.
#[must_use]
pub fn calculate_all(input: &ProfileInput) -> TargetSet {
    let bmr = bmr(input.weight_kg, input.height_cm, f64::from(input.age), input.sex);
    let tdee = tdee(bmr, input.activity_level);
    let calorie_target = calorie_target(tdee, input.goal);
    let macros = macro_targets(calorie_target, input.weight_kg, input.goal);

    TargetSet {
        bmr,
        tdee,
        calorie_target,
        protein_target_g: macros.protein_g,
        carbs_target_g: macros.carbs_g,
        fat_target_g: macros.fat_g,
    }
}

/// Nutrition for a portion of `grams`, scaled linearly from per-100g values.
/// Calories round to integers, the rest to one decimal; fiber is 0 when the
/// food doesn't declare it.
#[must_use]
pub fn portion_nutrition(food: &FoodDefinition, grams: f64) -> PortionNutrition {
    let factor = if grams.is_finite() && grams > 0.0 {
        grams / 100.0
    } else {
        0.0
    };
    PortionNutrition {
        calories: (food.calories * factor).round(),
        protein: round1(food.protein * factor),
        carbs: round1(food.carbs * factor),
        fat: round1(food.fat * factor),
        fiber: food.fiber.map_or(0.0, |f| round1(f * factor)),
    }
}

/// Convert a quantity in the given unit to grams, using the food's own
/// serving/unit/cup weights where it declares them.
#[must_use]
pub fn convert_to_grams(quantity: f64, unit: Unit, food: &FoodDefinition) -> f64 {
    match unit {
        Unit::Gram | Unit::Milliliter => quantity,
        Unit::Portion => quantity * food.serving_size_g.unwrap_or(100.0),
        Unit::Piece => quantity * food.unit_weight_g.unwrap_or(50.0),
        Unit::Cup => quantity * food.cup_weight_g.unwrap_or(200.0),
        Unit::Tablespoon => quantity * 15.0,
    }
}

/// Sum the frozen nutrition of a day's entries. Rounding happens once on the
/// totals, not per entry, so rounding error doesn't compound.
#[must_use]
pub fn daily_totals(entries: &[FoodEntry]) -> DailyTotals {
    let mut totals = DailyTotals::default();
    for entry in entries {
        totals.calories += entry.calories;
        totals.protein += entry.protein;
        totals.carbs += entry.carbs;
        totals.fat += entry.fat;
    }
    DailyTotals {
        calories: totals.calories.round(),
        protein: round1(totals.protein),
        carbs: round1(totals.carbs),
        fat: round1(totals.fat),
    }
}

/// Arithmetic mean across the supplied days; all-zero when no days.
#[must_use]
pub fn weekly_averages(daily: &BTreeMap<NaiveDate, DailyTotals>) -> DailyTotals {
    if daily.is_empty() {
        return DailyTotals::default();
    }

    let mut sum = DailyTotals::default();
    for totals in daily.values() {
        sum.calories += totals.calories;
        sum.protein += totals.protein;
        sum.carbs += totals.carbs;
        sum.fat += totals.fat;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = daily.len() as f64;
    DailyTotals {
        calories: (sum.calories / count).round(),
        protein: round1(sum.protein / count),
        carbs: round1(sum.carbs / count),
        fat: round1(sum.fat / count),
    }
}

/// Percentage (0-100) of days whose calories fall within ±`tolerance` of the
/// target, bounds inclusive. 0 for empty input.
#[must_use]
pub fn goal_adherence(
    daily: &BTreeMap<NaiveDate, DailyTotals>,
    calorie_target: f64,
    tolerance: f64,
) -> u32 {
    if daily.is_empty() {
        return 0;
    }

    let lower = calorie_target * (1.0 - tolerance);
    let upper = calorie_target * (1.0 + tolerance);
    let on_target = daily
        .values()
        .filter(|t| t.calories >= lower && t.calories <= upper)
        .count();

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
    {
        ((on_target as f64 / daily.len() as f64) * 100.0).round() as u32
    }
}

/// A recommended intake band for one micronutrient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MicroRange {
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Micronutrients {
    pub magnesium: MicroRange,
    pub zinc: MicroRange,
    pub vitamin_d3: MicroRange,
    pub omega3: MicroRange,
    pub sodium: MicroRange,
    pub potassium: MicroRange,
}

/// Micronutrient bands by activity level. Magnesium, zinc, vitamin D3 and
/// omega-3 widen with training load; sodium and potassium only move on
/// high-intensity days, where the electrolyte override beats the activity
/// banding for those two nutrients.
#[must_use]
pub fn micronutrients(level: ActivityLevel, is_high_intensity_day: bool) -> Micronutrients {
    let mg = |min, max| MicroRange {
        min,
        max,
        unit: "mg",
    };
    let (magnesium, zinc, vitamin_d3, omega3) = match level {
        ActivityLevel::Sedentary => (
            mg(200.0, 250.0),
            mg(10.0, 10.0),
            MicroRange {
                min: 2000.0,
                max: 2000.0,
                unit: "IU",
            },
            MicroRange {
                min: 2.0,
                max: 2.0,
                unit: "g",
            },
        ),
        ActivityLevel::Light => (
            mg(250.0, 300.0),
            mg(10.0, 12.0),
            MicroRange {
                min: 2000.0,
                max: 3000.0,
                unit: "IU",
            },
            MicroRange {
                min: 2.0,
                max: 2.5,
                unit: "g",
            },
        ),
        ActivityLevel::Moderate => (
            mg(300.0, 350.0),
            mg(12.0, 15.0),
            MicroRange {
                min: 3000.0,
                max: 4000.0,
                unit: "IU",
            },
            MicroRange {
                min: 2.5,
                max: 3.0,
                unit: "g",
            },
        ),
        ActivityLevel::Intense | ActivityLevel::VeryIntense => (
            mg(350.0, 400.0),
            mg(15.0, 15.0),
            MicroRange {
                min: 4000.0,
                max: 5000.0,
                unit: "IU",
            },
            MicroRange {
                min: 3.0,
                max: 3.0,
                unit: "g",
            },
        ),
    };

    let (sodium, potassium) = if is_high_intensity_day {
        (mg(3000.0, 4000.0), mg(4500.0, 5000.0))
    } else {
        (mg(2000.0, 2500.0), mg(3500.0, 4000.0))
    };

    Micronutrients {
        magnesium,
        zinc,
        vitamin_d3,
        omega3,
        sodium,
        potassium,
    }
}

/// Macro targets plus micronutrient bands in one shot.
#[must_use]
pub fn calculate_all_with_micros(
    input: &ProfileInput,
    is_high_intensity_day: bool,
) -> (TargetSet, Micronutrients) {
    (
        calculate_all(input),
        micronutrients(input.activity_level, is_high_intensity_day),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exercise {
    Walking,
    Running,
    Cycling,
    Swimming,
    Weightlifting,
    Yoga,
    Hiit,
    Dancing,
    Other,
}

impl Exercise {
    /// MET value (approximate) for the exercise.
    #[must_use]
    pub fn met(self) -> f64 {
        match self {
            Exercise::Walking => 3.5,
            Exercise::Running => 9.8,
            Exercise::Cycling => 7.5,
            Exercise::Swimming => 8.0,
            Exercise::Weightlifting => 5.0,
            Exercise::Yoga => 3.0,
            Exercise::Hiit => 12.0,
            Exercise::Dancing => 5.5,
            Exercise::Other => 5.0,
        }
    }
}

/// Estimated calories burned: MET × weight (kg) × duration (hours).
#[must_use]
pub fn exercise_calories(exercise: Exercise, duration_min: f64, weight_kg: f64) -> f64 {
    if !duration_min.is_finite() || duration_min <= 0.0 || !weight_kg.is_finite() || weight_kg <= 0.0
    {
        return 0.0;
    }
    (exercise.met() * weight_kg * duration_min / 60.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodSource;

    fn food(calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodDefinition {
        FoodDefinition {
            id: "test".to_string(),
            name: "Test Food".to_string(),
            brand: None,
            category: None,
            calories,
            protein,
            carbs,
            fat,
            fiber: None,
            serving_size_g: None,
            unit_weight_g: None,
            cup_weight_g: None,
            source: FoodSource::Catalog,
        }
    }

    fn entry(calories: f64, protein: f64, carbs: f64, fat: f64) -> FoodEntry {
        FoodEntry {
            id: "e".to_string(),
            food_id: None,
            food_name: "x".to_string(),
            meal: crate::models::MealSlot::Lunch,
            quantity: 100.0,
            unit: Unit::Gram,
            calories,
            protein,
            carbs,
            fat,
            date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_bmr_male_reference() {
        // round(88.362 + 13.397*70 + 4.799*175 - 5.677*30) = round(1695.667) = 1696
        assert!((bmr(70.0, 175.0, 30.0, Sex::Male) - 1696.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bmr_female_branch() {
        let expected = (447.593_f64 + 9.247 * 60.0 + 3.098 * 165.0 - 4.330 * 28.0).round();
        assert!((bmr(60.0, 165.0, 28.0, Sex::Female) - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bmr_missing_input_degrades_to_zero() {
        assert_eq!(bmr(0.0, 175.0, 30.0, Sex::Male), 0.0);
        assert_eq!(bmr(70.0, -1.0, 30.0, Sex::Male), 0.0);
        assert_eq!(bmr(70.0, 175.0, f64::NAN, Sex::Female), 0.0);
    }

    #[test]
    fn test_tdee_moderate_reference() {
        // round(1696 * 1.55) = 2629
        assert!((tdee(1696.0, ActivityLevel::Moderate) - 2629.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_tdee_all_factors() {
        assert!((tdee(2000.0, ActivityLevel::Sedentary) - 2400.0).abs() < f64::EPSILON);
        assert!((tdee(2000.0, ActivityLevel::Light) - 2750.0).abs() < f64::EPSILON);
        assert!((tdee(2000.0, ActivityLevel::Intense) - 3450.0).abs() < f64::EPSILON);
        assert!((tdee(2000.0, ActivityLevel::VeryIntense) - 3800.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_calorie_target_goals() {
        assert!((calorie_target(2629.0, Goal::Deficit) - 2103.0).abs() < f64::EPSILON);
        assert!((calorie_target(2629.0, Goal::Maintenance) - 2629.0).abs() < f64::EPSILON);
        assert!((calorie_target(2000.0, Goal::Surplus) - 2300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_macro_targets_deficit_reference() {
        // protein = round(70*2.4) = 168, fat = round(70*0.65) = 46,
        // remaining = 2103 - 672 - 414 = 1017, carbs = round(1017/4) = 254
        let macros = macro_targets(2103.0, 70.0, Goal::Deficit);
        assert!((macros.protein_g - 168.0).abs() < f64::EPSILON);
        assert!((macros.fat_g - 46.0).abs() < f64::EPSILON);
        assert!((macros.carbs_g - 254.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_macro_targets_carb_floor() {
        // Tiny calorie target: remaining calories go negative, carbs clamp
        // to the per-kg floor instead.
        let macros = macro_targets(500.0, 80.0, Goal::Surplus);
        let floor = (80.0 * 4.0_f64).round();
        assert!((macros.carbs_g - floor).abs() < f64::EPSILON);
    }

    #[test]
    fn test_calculate_all_is_deterministic() {
        let input = ProfileInput {
            name: None,
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Deficit,
        };
        let a = calculate_all(&input);
        let b = calculate_all(&input);
        assert_eq!(a, b);
        assert!((a.bmr - 1696.0).abs() < f64::EPSILON);
        assert!((a.tdee - 2629.0).abs() < f64::EPSILON);
        assert!((a.calorie_target - 2103.0).abs() < f64::EPSILON);
        assert!((a.protein_target_g - 168.0).abs() < f64::EPSILON);
        assert!((a.fat_target_g - 46.0).abs() < f64::EPSILON);
        assert!((a.carbs_target_g - 254.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_portion_nutrition_scaling() {
        let mut f = food(200.0, 10.0, 20.0, 5.0);
        f.fiber = Some(3.0);
        let portion = portion_nutrition(&f, 150.0);
        assert!((portion.calories - 300.0).abs() < f64::EPSILON);
        assert!((portion.protein - 15.0).abs() < f64::EPSILON);
        assert!((portion.carbs - 30.0).abs() < f64::EPSILON);
        assert!((portion.fat - 7.5).abs() < f64::EPSILON);
        assert!((portion.fiber - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_portion_nutrition_fiber_absent_is_zero() {
        let portion = portion_nutrition(&food(100.0, 1.0, 1.0, 1.0), 50.0);
        assert!((portion.fiber - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_portion_nutrition_rounds_to_one_decimal() {
        // 33g of 3.33/100g protein = 1.0989 -> 1.1
        let portion = portion_nutrition(&food(100.0, 3.33, 0.0, 0.0), 33.0);
        assert!((portion.protein - 1.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convert_to_grams_passthrough() {
        let f = food(100.0, 0.0, 0.0, 0.0);
        assert!((convert_to_grams(250.0, Unit::Gram, &f) - 250.0).abs() < f64::EPSILON);
        assert!((convert_to_grams(330.0, Unit::Milliliter, &f) - 330.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convert_to_grams_tablespoon_is_fixed() {
        // 2 tbsp = 30g regardless of the food's other fields
        let mut f = food(100.0, 0.0, 0.0, 0.0);
        f.serving_size_g = Some(500.0);
        f.unit_weight_g = Some(500.0);
        f.cup_weight_g = Some(500.0);
        assert!((convert_to_grams(2.0, Unit::Tablespoon, &f) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convert_to_grams_food_specific_weights() {
        let mut f = food(89.0, 1.1, 22.8, 0.3);
        f.serving_size_g = Some(120.0);
        f.unit_weight_g = Some(120.0);
        f.cup_weight_g = Some(150.0);
        assert!((convert_to_grams(1.0, Unit::Portion, &f) - 120.0).abs() < f64::EPSILON);
        assert!((convert_to_grams(2.0, Unit::Piece, &f) - 240.0).abs() < f64::EPSILON);
        assert!((convert_to_grams(1.0, Unit::Cup, &f) - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convert_to_grams_defaults() {
        let f = food(100.0, 0.0, 0.0, 0.0);
        assert!((convert_to_grams(1.0, Unit::Portion, &f) - 100.0).abs() < f64::EPSILON);
        assert!((convert_to_grams(1.0, Unit::Piece, &f) - 50.0).abs() < f64::EPSILON);
        assert!((convert_to_grams(1.0, Unit::Cup, &f) - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_totals_empty() {
        assert_eq!(daily_totals(&[]), DailyTotals::default());
    }

    #[test]
    fn test_daily_totals_rounds_once_at_the_end() {
        // Three entries of 0.04 protein each: per-entry rounding would give
        // 0.0 + 0.0 + 0.0 = 0; summing first gives 0.12 -> 0.1.
        let entries = vec![
            entry(100.4, 0.04, 0.0, 0.0),
            entry(100.4, 0.04, 0.0, 0.0),
            entry(100.4, 0.04, 0.0, 0.0),
        ];
        let totals = daily_totals(&entries);
        assert!((totals.calories - 301.0).abs() < f64::EPSILON);
        assert!((totals.protein - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weekly_averages_empty() {
        assert_eq!(weekly_averages(&BTreeMap::new()), DailyTotals::default());
    }

    #[test]
    fn test_weekly_averages_mean() {
        let mut days = BTreeMap::new();
        days.insert(
            NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            DailyTotals {
                calories: 2000.0,
                protein: 150.0,
                carbs: 200.0,
                fat: 60.0,
            },
        );
        days.insert(
            NaiveDate::from_ymd_opt(2026, 6, 16).unwrap(),
            DailyTotals {
                calories: 2200.0,
                protein: 170.0,
                carbs: 220.0,
                fat: 80.0,
            },
        );
        let avg = weekly_averages(&days);
        assert!((avg.calories - 2100.0).abs() < f64::EPSILON);
        assert!((avg.protein - 160.0).abs() < f64::EPSILON);
        assert!((avg.fat - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_goal_adherence_empty_is_zero() {
        assert_eq!(
            goal_adherence(&BTreeMap::new(), 2000.0, DEFAULT_ADHERENCE_TOLERANCE),
            0
        );
    }

    #[test]
    fn test_goal_adherence_inclusive_bounds() {
        let mut days = BTreeMap::new();
        // Exactly on the lower bound (1800) and upper bound (2200): both count.
        for (i, cal) in [1800.0, 2200.0, 2500.0].iter().enumerate() {
            days.insert(
                NaiveDate::from_ymd_opt(2026, 6, 15 + i as u32).unwrap(),
                DailyTotals {
                    calories: *cal,
                    ..DailyTotals::default()
                },
            );
        }
        assert_eq!(goal_adherence(&days, 2000.0, 0.10), 67);
    }

    #[test]
    fn test_micronutrients_sedentary_baseline() {
        let micros = micronutrients(ActivityLevel::Sedentary, false);
        assert!((micros.sodium.min - 2000.0).abs() < f64::EPSILON);
        assert!((micros.sodium.max - 2500.0).abs() < f64::EPSILON);
        assert!((micros.magnesium.max - 250.0).abs() < f64::EPSILON);
        assert!((micros.vitamin_d3.min - 2000.0).abs() < f64::EPSILON);
        assert_eq!(micros.vitamin_d3.unit, "IU");
    }

    #[test]
    fn test_micronutrients_high_intensity_override_wins() {
        // Sedentary but match day: electrolytes jump regardless of tier.
        let micros = micronutrients(ActivityLevel::Sedentary, true);
        assert!((micros.sodium.min - 3000.0).abs() < f64::EPSILON);
        assert!((micros.sodium.max - 4000.0).abs() < f64::EPSILON);
        assert!((micros.potassium.min - 4500.0).abs() < f64::EPSILON);
        // Other nutrients keep the sedentary band.
        assert!((micros.magnesium.max - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_micronutrients_bands_widen_with_activity() {
        let sedentary = micronutrients(ActivityLevel::Sedentary, false);
        let moderate = micronutrients(ActivityLevel::Moderate, false);
        let intense = micronutrients(ActivityLevel::Intense, false);
        assert!(moderate.magnesium.min > sedentary.magnesium.min);
        assert!(intense.magnesium.min > moderate.magnesium.min);
        assert!(intense.vitamin_d3.max > sedentary.vitamin_d3.max);
        // Intense and very intense share the athlete tier.
        assert_eq!(intense, micronutrients(ActivityLevel::VeryIntense, false));
    }

    #[test]
    fn test_exercise_calories() {
        // running: 9.8 MET * 70kg * 0.5h = 343
        assert!((exercise_calories(Exercise::Running, 30.0, 70.0) - 343.0).abs() < f64::EPSILON);
        assert_eq!(exercise_calories(Exercise::Walking, 0.0, 70.0), 0.0);
        assert_eq!(exercise_calories(Exercise::Other, 60.0, 0.0), 0.0);
    }
}
