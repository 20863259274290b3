//! Remote store contract.
//!
//! The remote tier is an external service consumed through this trait; the
//! CLI crate provides the HTTP implementation and tests provide mocks. Wire
//! records keep the remote's own column names (`tmb`, `get`, `meal_type`,
//! `entry_date`), and the normalisation to and from the internal model lives
//! here next to them.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    ActivityLevel, FoodDefinition, FoodEntry, FoodSource, Goal, MealSlot, Profile, Sex, Unit,
    User, WeightEntry,
};

/// An authenticated remote session. Persisted in the local cache so the CLI
/// stays signed in across invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

/// A food the vision bridge claims to see in a photo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectedFood {
    pub name: String,
    /// 0–100.
    pub confidence: f64,
    pub estimated_grams: f64,
}

/// One detected-food name matched (or not) against the remote food table.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodMatch {
    pub name: String,
    pub food: Option<RemoteFood>,
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Session>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;
    async fn sign_out(&self, session: &Session) -> Result<()>;
    /// Validate the session token; `None` when the token is no longer good.
    async fn current_user(&self, session: &Session) -> Result<Option<User>>;

    async fn fetch_profile(&self, session: &Session) -> Result<Option<RemoteProfile>>;
    async fn upsert_profile(&self, session: &Session, profile: &RemoteProfile) -> Result<()>;

    async fn food_entries_for_date(
        &self,
        session: &Session,
        date: NaiveDate,
    ) -> Result<Vec<RemoteFoodEntry>>;
    async fn insert_food_entry(&self, session: &Session, entry: &RemoteFoodEntry) -> Result<()>;
    async fn delete_food_entry(&self, session: &Session, entry_id: &str) -> Result<()>;

    async fn weight_entries(&self, session: &Session) -> Result<Vec<RemoteWeightEntry>>;
    /// Conflict key is (user, entry_date): one weight per calendar day.
    async fn upsert_weight_entry(
        &self,
        session: &Session,
        entry: &RemoteWeightEntry,
    ) -> Result<()>;

    async fn custom_foods(&self, session: &Session) -> Result<Vec<RemoteFood>>;
    async fn insert_custom_food(&self, session: &Session, food: &RemoteFood) -> Result<()>;

    async fn favorites(&self, session: &Session) -> Result<Vec<RemoteFood>>;
    async fn add_favorite(&self, session: &Session, food_id: &str) -> Result<()>;
    async fn remove_favorite(&self, session: &Session, food_id: &str) -> Result<()>;

    async fn catalog_foods(&self, category: Option<&str>) -> Result<Vec<RemoteFood>>;
    /// Case-insensitive substring search; callers enforce the 2-char minimum.
    async fn search_foods(&self, query: &str) -> Result<Vec<RemoteFood>>;
    /// Match all detected names in a single request.
    async fn match_detected_foods(&self, names: &[String]) -> Result<Vec<FoodMatch>>;

    async fn analyze_photo(&self, image_base64: &str) -> Result<Vec<DetectedFood>>;
}

/// Profile row as the remote stores it. `tmb` is the remote's name for BMR
/// and `get` its name for TDEE; they stay that way on the wire only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteProfile {
    pub id: String,
    pub name: Option<String>,
    pub weight: f64,
    pub height: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub tmb: f64,
    #[serde(rename = "get")]
    pub get_value: f64,
    pub calorie_target: f64,
    pub protein_target: f64,
    pub carbs_target: f64,
    pub fat_target: f64,
    pub updated_at: String,
}

impl RemoteProfile {
    #[must_use]
    pub fn from_profile(user_id: &str, profile: &Profile) -> Self {
        Self {
            id: user_id.to_string(),
            name: profile.name.clone(),
            weight: profile.weight_kg,
            height: profile.height_cm,
            age: profile.age,
            sex: profile.sex,
            activity_level: profile.activity_level,
            goal: profile.goal,
            tmb: profile.bmr,
            get_value: profile.tdee,
            calorie_target: profile.calorie_target,
            protein_target: profile.protein_target_g,
            carbs_target: profile.carbs_target_g,
            fat_target: profile.fat_target_g,
            updated_at: profile.updated_at.clone(),
        }
    }

    #[must_use]
    pub fn into_profile(self) -> Profile {
        Profile {
            name: self.name,
            weight_kg: self.weight,
            height_cm: self.height,
            age: self.age,
            sex: self.sex,
            activity_level: self.activity_level,
            goal: self.goal,
            bmr: self.tmb,
            tdee: self.get_value,
            calorie_target: self.calorie_target,
            protein_target_g: self.protein_target,
            carbs_target_g: self.carbs_target,
            fat_target_g: self.fat_target,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteFoodEntry {
    pub id: String,
    pub user_id: String,
    pub food_id: Option<String>,
    pub food_name: String,
    pub meal_type: MealSlot,
    pub quantity: f64,
    pub unit: Unit,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub entry_date: NaiveDate,
    pub created_at: String,
}

impl RemoteFoodEntry {
    #[must_use]
    pub fn from_entry(user_id: &str, entry: &FoodEntry) -> Self {
        Self {
            id: entry.id.clone(),
            user_id: user_id.to_string(),
            food_id: entry.food_id.clone(),
            food_name: entry.food_name.clone(),
            meal_type: entry.meal,
            quantity: entry.quantity,
            unit: entry.unit,
            calories: entry.calories,
            protein: entry.protein,
            carbs: entry.carbs,
            fat: entry.fat,
            entry_date: entry.date,
            created_at: entry.created_at.clone(),
        }
    }

    #[must_use]
    pub fn into_entry(self) -> FoodEntry {
        FoodEntry {
            id: self.id,
            food_id: self.food_id,
            food_name: self.food_name,
            meal: self.meal_type,
            quantity: self.quantity,
            unit: self.unit,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            date: self.entry_date,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteWeightEntry {
    pub id: String,
    pub user_id: String,
    pub weight: f64,
    pub entry_date: NaiveDate,
    pub created_at: String,
}

impl RemoteWeightEntry {
    #[must_use]
    pub fn from_entry(user_id: &str, entry: &WeightEntry) -> Self {
        Self {
            id: entry.id.clone(),
            user_id: user_id.to_string(),
            weight: entry.weight_kg,
            entry_date: entry.date,
            created_at: entry.created_at.clone(),
        }
    }

    #[must_use]
    pub fn into_entry(self) -> WeightEntry {
        WeightEntry {
            id: self.id,
            weight_kg: self.weight,
            date: self.entry_date,
            created_at: self.created_at,
        }
    }
}

/// Food row as the remote stores it (catalog and custom foods share the
/// table, split by `is_custom`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteFood {
    pub id: String,
    pub name: String,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: Option<f64>,
    pub serving_size: Option<f64>,
    pub unit_weight: Option<f64>,
    pub cup_weight: Option<f64>,
    #[serde(default)]
    pub is_custom: bool,
    pub user_id: Option<String>,
}

impl RemoteFood {
    #[must_use]
    pub fn from_definition(user_id: Option<&str>, food: &FoodDefinition) -> Self {
        Self {
            id: food.id.clone(),
            name: food.name.clone(),
            brand: food.brand.clone(),
            category: food.category.clone(),
            calories: food.calories,
            protein: food.protein,
            carbs: food.carbs,
            fat: food.fat,
            fiber: food.fiber,
            serving_size: food.serving_size_g,
            unit_weight: food.unit_weight_g,
            cup_weight: food.cup_weight_g,
            is_custom: food.source == FoodSource::Custom,
            user_id: user_id.map(ToString::to_string),
        }
    }

    #[must_use]
    pub fn into_definition(self) -> FoodDefinition {
        FoodDefinition {
            id: self.id,
            name: self.name,
            brand: self.brand,
            category: self.category,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
            serving_size_g: self.serving_size,
            unit_weight_g: self.unit_weight,
            cup_weight_g: self.cup_weight,
            source: if self.is_custom {
                FoodSource::Custom
            } else {
                FoodSource::Catalog
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileInput;

    fn sample_profile() -> Profile {
        Profile::from_input(ProfileInput {
            name: Some("Ana".to_string()),
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Deficit,
        })
    }

    #[test]
    fn test_profile_round_trip() {
        let profile = sample_profile();
        let remote = RemoteProfile::from_profile("user-1", &profile);
        assert_eq!(remote.id, "user-1");
        assert!((remote.tmb - profile.bmr).abs() < f64::EPSILON);
        assert!((remote.get_value - profile.tdee).abs() < f64::EPSILON);
        assert_eq!(remote.into_profile(), profile);
    }

    #[test]
    fn test_profile_wire_names() {
        let remote = RemoteProfile::from_profile("user-1", &sample_profile());
        let json = serde_json::to_value(&remote).unwrap();
        assert!(json.get("tmb").is_some());
        assert!(json.get("get").is_some());
        assert!(json.get("get_value").is_none());
        assert_eq!(json["sex"], "male");
        assert_eq!(json["goal"], "deficit");
    }

    #[test]
    fn test_food_entry_round_trip() {
        let entry = FoodEntry {
            id: "e-1".to_string(),
            food_id: Some("oats".to_string()),
            food_name: "Oats".to_string(),
            meal: MealSlot::Breakfast,
            quantity: 80.0,
            unit: Unit::Gram,
            calories: 311.0,
            protein: 13.5,
            carbs: 53.0,
            fat: 5.5,
            date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            created_at: "2026-06-15T08:00:00Z".to_string(),
        };
        let remote = RemoteFoodEntry::from_entry("user-1", &entry);
        assert_eq!(remote.meal_type, MealSlot::Breakfast);
        assert_eq!(remote.entry_date, entry.date);
        assert_eq!(remote.into_entry(), entry);
    }

    #[test]
    fn test_weight_entry_round_trip() {
        let entry = WeightEntry {
            id: "w-1".to_string(),
            weight_kg: 71.2,
            date: NaiveDate::from_ymd_opt(2026, 6, 15).unwrap(),
            created_at: "2026-06-15T07:00:00Z".to_string(),
        };
        let remote = RemoteWeightEntry::from_entry("user-1", &entry);
        assert_eq!(remote.user_id, "user-1");
        assert_eq!(remote.into_entry(), entry);
    }

    #[test]
    fn test_food_custom_flag_maps_to_source() {
        let food = FoodDefinition {
            id: "f-1".to_string(),
            name: "House granola".to_string(),
            brand: None,
            category: Some("grains".to_string()),
            calories: 450.0,
            protein: 10.0,
            carbs: 60.0,
            fat: 18.0,
            fiber: Some(7.0),
            serving_size_g: Some(45.0),
            unit_weight_g: None,
            cup_weight_g: Some(110.0),
            source: FoodSource::Custom,
        };
        let remote = RemoteFood::from_definition(Some("user-1"), &food);
        assert!(remote.is_custom);
        assert_eq!(remote.clone().into_definition(), food);
        assert_eq!(remote.into_definition().source, FoodSource::Custom);
    }
}
