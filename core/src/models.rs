use anyhow::{Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calc;

/// Biological sex, used only to select the BMR formula branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Intense,
    VeryIntense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Deficit,
    Maintenance,
    Surplus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Unit a quantity was entered in. Everything is converted to grams before
/// nutrition is computed; see `calc::convert_to_grams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "portion")]
    Portion,
    #[serde(rename = "unit")]
    Piece,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "tbsp")]
    Tablespoon,
}

impl Sex {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => bail!("Invalid sex '{s}'. Use 'male' or 'female'"),
        }
    }
}

impl ActivityLevel {
    pub const ALL: &'static [ActivityLevel] = &[
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Intense,
        ActivityLevel::VeryIntense,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Intense => "intense",
            ActivityLevel::VeryIntense => "very_intense",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "intense" => Ok(ActivityLevel::Intense),
            "very_intense" | "very-intense" => Ok(ActivityLevel::VeryIntense),
            _ => bail!(
                "Invalid activity level '{s}'. Must be one of: sedentary, light, moderate, intense, very_intense"
            ),
        }
    }
}

impl Goal {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Deficit => "deficit",
            Goal::Maintenance => "maintenance",
            Goal::Surplus => "surplus",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deficit" | "cut" => Ok(Goal::Deficit),
            "maintenance" | "maintain" => Ok(Goal::Maintenance),
            "surplus" | "bulk" => Ok(Goal::Surplus),
            _ => bail!("Invalid goal '{s}'. Must be one of: deficit, maintenance, surplus"),
        }
    }
}

impl MealSlot {
    pub const ALL: &'static [MealSlot] = &[
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" => Ok(MealSlot::Snack),
            _ => bail!("Invalid meal '{s}'. Must be one of: breakfast, lunch, dinner, snack"),
        }
    }
}

impl Unit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Gram => "g",
            Unit::Milliliter => "ml",
            Unit::Portion => "portion",
            Unit::Piece => "unit",
            Unit::Cup => "cup",
            Unit::Tablespoon => "tbsp",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "g" | "gram" | "grams" => Ok(Unit::Gram),
            "ml" | "milliliter" | "milliliters" => Ok(Unit::Milliliter),
            "portion" | "portions" | "serving" | "servings" => Ok(Unit::Portion),
            "unit" | "units" | "piece" | "pieces" => Ok(Unit::Piece),
            "cup" | "cups" => Ok(Unit::Cup),
            "tbsp" | "tablespoon" | "tablespoons" => Ok(Unit::Tablespoon),
            _ => bail!("Invalid unit '{s}'. Must be one of: g, ml, portion, unit, cup, tbsp"),
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five body metrics plus goal that every derived target is computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// A user profile with its derived energy and macro targets.
///
/// Derived fields are only ever written by `Profile::from_input`, so they are
/// always consistent with the body metrics they were computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: Option<String>,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub bmr: f64,
    pub tdee: f64,
    pub calorie_target: f64,
    pub protein_target_g: f64,
    pub carbs_target_g: f64,
    pub fat_target_g: f64,
    pub updated_at: String,
}

impl Profile {
    #[must_use]
    pub fn from_input(input: ProfileInput) -> Self {
        let targets = calc::calculate_all(&input);
        Profile {
            name: input.name,
            weight_kg: input.weight_kg,
            height_cm: input.height_cm,
            age: input.age,
            sex: input.sex,
            activity_level: input.activity_level,
            goal: input.goal,
            bmr: targets.bmr,
            tdee: targets.tdee,
            calorie_target: targets.calorie_target,
            protein_target_g: targets.protein_target_g,
            carbs_target_g: targets.carbs_target_g,
            fat_target_g: targets.fat_target_g,
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[must_use]
    pub fn input(&self) -> ProfileInput {
        ProfileInput {
            name: self.name.clone(),
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age: self.age,
            sex: self.sex,
            activity_level: self.activity_level,
            goal: self.goal,
        }
    }

    /// New profile with an updated body weight and all targets recomputed.
    #[must_use]
    pub fn with_weight(&self, weight_kg: f64) -> Self {
        let mut input = self.input();
        input.weight_kg = weight_kg;
        Profile::from_input(input)
    }
}

/// A food definition: catalog (shared, immutable) or custom (user-owned).
/// Nutrition values are per 100 g (or 100 ml for liquids).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodDefinition {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fiber: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub serving_size_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unit_weight_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cup_weight_g: Option<f64>,
    pub source: FoodSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodSource {
    Catalog,
    Custom,
}

/// One logged consumption event. Nutrition fields are frozen at insertion
/// time; later edits to the referenced food never change history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub food_id: Option<String>,
    pub food_name: String,
    pub meal: MealSlot,
    pub quantity: f64,
    pub unit: Unit,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: NaiveDate,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub food_id: Option<String>,
    pub food_name: String,
    pub meal: MealSlot,
    pub quantity: f64,
    pub unit: Unit,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// One weight measurement. At most one per calendar day (upsert on date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: String,
    pub weight_kg: f64,
    pub date: NaiveDate,
    pub created_at: String,
}

/// Read-only reference recipe bundled with the app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: String,
    pub goal: Goal,
    pub calories_per_serving: f64,
    pub protein_per_serving: f64,
    pub carbs_per_serving: f64,
    pub fat_per_serving: f64,
    pub ingredients: Vec<RecipeIngredient>,
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub food_id: String,
    pub quantity: f64,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroTargets {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Everything `calc::calculate_all` derives from a profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSet {
    pub bmr: f64,
    pub tdee: f64,
    pub calorie_target: f64,
    pub protein_target_g: f64,
    pub carbs_target_g: f64,
    pub fat_target_g: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortionNutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

// --- Input validation (rejected before any I/O) ---

pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 300.0;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_weight_kg(weight_kg: f64) -> Result<()> {
    if !weight_kg.is_finite() || !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
        bail!("Weight must be between {MIN_WEIGHT_KG:.0} and {MAX_WEIGHT_KG:.0} kg");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    let mut parts = email.split('@');
    let (local, domain) = (parts.next().unwrap_or(""), parts.next().unwrap_or(""));
    let valid = parts.next().is_none()
        && !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.contains(char::is_whitespace);
    if !valid {
        bail!("Invalid email address");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {MIN_PASSWORD_LEN} characters");
    }
    Ok(())
}

pub fn validate_profile_input(input: &ProfileInput) -> Result<()> {
    validate_weight_kg(input.weight_kg)?;
    if !input.height_cm.is_finite() || !(100.0..=250.0).contains(&input.height_cm) {
        bail!("Height must be between 100 and 250 cm");
    }
    if !(10..=120).contains(&input.age) {
        bail!("Age must be between 10 and 120 years");
    }
    Ok(())
}

pub fn validate_quantity(quantity: f64) -> Result<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        bail!("Quantity must be greater than 0");
    }
    Ok(())
}

pub fn validate_custom_food(food: &FoodDefinition) -> Result<()> {
    if food.name.trim().is_empty() {
        bail!("Food name must not be empty");
    }
    for (label, value) in [
        ("calories", food.calories),
        ("protein", food.protein),
        ("carbs", food.carbs),
        ("fat", food.fat),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("Food {label} must not be negative");
        }
    }
    if food.fiber.is_some_and(|v| v < 0.0) {
        bail!("Food fiber must not be negative");
    }
    Ok(())
}
