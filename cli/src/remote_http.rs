//! HTTP implementation of the remote store contract against a Supabase-style
//! backend: GoTrue auth under `/auth/v1`, PostgREST under `/rest/v1`, plus an
//! optional vision bridge for photo analysis.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use tally_core::models::User;
use tally_core::remote::{
    DetectedFood, FoodMatch, RemoteFood, RemoteFoodEntry, RemoteProfile, RemoteStore,
    RemoteWeightEntry, Session,
};

use crate::config::RemoteSettings;

pub struct HttpRemote {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    vision_url: Option<String>,
}

#[derive(Deserialize)]
struct AuthResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    email: String,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Deserialize, Default)]
struct UserMetadata {
    #[serde(default)]
    name: Option<String>,
}

impl AuthUser {
    fn into_user(self) -> User {
        let name = self
            .user_metadata
            .and_then(|m| m.name)
            .unwrap_or_default();
        User {
            id: self.id,
            email: self.email,
            name,
            created_at: self.created_at.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct FavoriteRow {
    food: RemoteFood,
}

#[derive(Deserialize)]
struct VisionResponse {
    #[serde(default)]
    foods: Vec<DetectedFood>,
}

/// Build the PostgREST `or=(...)` disjunction matching any of the names.
/// Reserved characters are stripped rather than escaped: detected-food names
/// are plain words and a mangled filter would poison the whole request.
fn ilike_any_filter(names: &[String]) -> String {
    let clauses: Vec<String> = names
        .iter()
        .map(|name| {
            let clean: String = name
                .chars()
                .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '%'))
                .collect();
            format!("name.ilike.*{}*", clean.trim())
        })
        .collect();
    format!("({})", clauses.join(","))
}

impl HttpRemote {
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "tally-cli/{} (nutrition tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            anon_key: settings.anon_key.clone(),
            vision_url: settings.vision_url.clone(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn rest(&self, method: reqwest::Method, table: &str, session: &Session) -> reqwest::RequestBuilder {
        self.client
            .request(method, self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
    }

    /// Anonymous PostgREST request (public tables like the food catalog).
    fn rest_anon(&self, table: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.rest_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    async fn auth_request(&self, path: &str, body: serde_json::Value) -> Result<Session> {
        let resp = self
            .client
            .post(self.auth_url(path))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .context("Failed to reach the auth service")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Auth request failed ({status}): {text}");
        }

        let auth: AuthResponse = resp
            .json()
            .await
            .context("Failed to parse auth response")?;
        Ok(Session {
            access_token: auth.access_token,
            user: auth.user.into_user(),
        })
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<Session> {
        self.auth_request(
            "signup",
            json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }),
        )
        .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.auth_request(
            "token?grant_type=password",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        self.client
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .context("Failed to reach the auth service")?
            .error_for_status()
            .context("Sign-out rejected")?;
        Ok(())
    }

    async fn current_user(&self, session: &Session) -> Result<Option<User>> {
        let resp = self
            .client
            .get(self.auth_url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .context("Failed to reach the auth service")?;
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let user: AuthUser = resp
            .error_for_status()
            .context("User lookup rejected")?
            .json()
            .await
            .context("Failed to parse user response")?;
        Ok(Some(user.into_user()))
    }

    async fn fetch_profile(&self, session: &Session) -> Result<Option<RemoteProfile>> {
        let rows: Vec<RemoteProfile> = self
            .rest(reqwest::Method::GET, "profiles", session)
            .query(&[("id", format!("eq.{}", session.user.id).as_str()), ("select", "*")])
            .send()
            .await
            .context("Failed to fetch profile")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse profile rows")?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_profile(&self, session: &Session, profile: &RemoteProfile) -> Result<()> {
        self.rest(reqwest::Method::POST, "profiles", session)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[profile])
            .send()
            .await
            .context("Failed to upsert profile")?
            .error_for_status()
            .context("Profile upsert rejected")?;
        Ok(())
    }

    async fn food_entries_for_date(
        &self,
        session: &Session,
        date: NaiveDate,
    ) -> Result<Vec<RemoteFoodEntry>> {
        let rows = self
            .rest(reqwest::Method::GET, "food_entries", session)
            .query(&[
                ("user_id", format!("eq.{}", session.user.id).as_str()),
                ("entry_date", format!("eq.{date}").as_str()),
                ("select", "*"),
                ("order", "created_at.asc"),
            ])
            .send()
            .await
            .context("Failed to fetch food entries")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse food entries")?;
        Ok(rows)
    }

    async fn insert_food_entry(&self, session: &Session, entry: &RemoteFoodEntry) -> Result<()> {
        self.rest(reqwest::Method::POST, "food_entries", session)
            .json(&[entry])
            .send()
            .await
            .context("Failed to insert food entry")?
            .error_for_status()
            .context("Food entry insert rejected")?;
        Ok(())
    }

    async fn delete_food_entry(&self, session: &Session, entry_id: &str) -> Result<()> {
        self.rest(reqwest::Method::DELETE, "food_entries", session)
            .query(&[("id", format!("eq.{entry_id}").as_str())])
            .send()
            .await
            .context("Failed to delete food entry")?
            .error_for_status()
            .context("Food entry delete rejected")?;
        Ok(())
    }

    async fn weight_entries(&self, session: &Session) -> Result<Vec<RemoteWeightEntry>> {
        let rows = self
            .rest(reqwest::Method::GET, "weight_entries", session)
            .query(&[
                ("user_id", format!("eq.{}", session.user.id).as_str()),
                ("select", "*"),
                ("order", "entry_date.asc"),
            ])
            .send()
            .await
            .context("Failed to fetch weight entries")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse weight entries")?;
        Ok(rows)
    }

    async fn upsert_weight_entry(
        &self,
        session: &Session,
        entry: &RemoteWeightEntry,
    ) -> Result<()> {
        self.rest(reqwest::Method::POST, "weight_entries", session)
            .query(&[("on_conflict", "user_id,entry_date")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[entry])
            .send()
            .await
            .context("Failed to upsert weight entry")?
            .error_for_status()
            .context("Weight upsert rejected")?;
        Ok(())
    }

    async fn custom_foods(&self, session: &Session) -> Result<Vec<RemoteFood>> {
        let rows = self
            .rest(reqwest::Method::GET, "foods", session)
            .query(&[
                ("user_id", format!("eq.{}", session.user.id).as_str()),
                ("is_custom", "eq.true"),
                ("select", "*"),
            ])
            .send()
            .await
            .context("Failed to fetch custom foods")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse custom foods")?;
        Ok(rows)
    }

    async fn insert_custom_food(&self, session: &Session, food: &RemoteFood) -> Result<()> {
        self.rest(reqwest::Method::POST, "foods", session)
            .json(&[food])
            .send()
            .await
            .context("Failed to insert custom food")?
            .error_for_status()
            .context("Custom food insert rejected")?;
        Ok(())
    }

    async fn favorites(&self, session: &Session) -> Result<Vec<RemoteFood>> {
        let rows: Vec<FavoriteRow> = self
            .rest(reqwest::Method::GET, "favorites", session)
            .query(&[
                ("user_id", format!("eq.{}", session.user.id).as_str()),
                ("select", "food:foods(*)"),
            ])
            .send()
            .await
            .context("Failed to fetch favorites")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse favorites")?;
        Ok(rows.into_iter().map(|r| r.food).collect())
    }

    async fn add_favorite(&self, session: &Session, food_id: &str) -> Result<()> {
        self.rest(reqwest::Method::POST, "favorites", session)
            .json(&json!([{ "user_id": session.user.id, "food_id": food_id }]))
            .send()
            .await
            .context("Failed to add favorite")?
            .error_for_status()
            .context("Favorite insert rejected")?;
        Ok(())
    }

    async fn remove_favorite(&self, session: &Session, food_id: &str) -> Result<()> {
        self.rest(reqwest::Method::DELETE, "favorites", session)
            .query(&[
                ("user_id", format!("eq.{}", session.user.id).as_str()),
                ("food_id", format!("eq.{food_id}").as_str()),
            ])
            .send()
            .await
            .context("Failed to remove favorite")?
            .error_for_status()
            .context("Favorite delete rejected")?;
        Ok(())
    }

    async fn catalog_foods(&self, category: Option<&str>) -> Result<Vec<RemoteFood>> {
        let mut req = self
            .rest_anon("foods")
            .query(&[("is_custom", "eq.false"), ("select", "*")]);
        if let Some(category) = category {
            req = req.query(&[("category", format!("eq.{category}").as_str())]);
        }
        let rows = req
            .send()
            .await
            .context("Failed to fetch catalog foods")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse catalog foods")?;
        Ok(rows)
    }

    async fn search_foods(&self, query: &str) -> Result<Vec<RemoteFood>> {
        let rows = self
            .rest_anon("foods")
            .query(&[
                ("name", format!("ilike.*{query}*").as_str()),
                ("select", "*"),
                ("limit", "20"),
            ])
            .send()
            .await
            .context("Failed to search foods")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse food search results")?;
        Ok(rows)
    }

    async fn match_detected_foods(&self, names: &[String]) -> Result<Vec<FoodMatch>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let foods: Vec<RemoteFood> = self
            .rest_anon("foods")
            .query(&[("or", ilike_any_filter(names).as_str()), ("select", "*")])
            .send()
            .await
            .context("Failed to match detected foods")?
            .error_for_status()?
            .json()
            .await
            .context("Failed to parse matched foods")?;

        Ok(names
            .iter()
            .map(|name| {
                let needle = name.to_lowercase();
                FoodMatch {
                    name: name.clone(),
                    food: foods
                        .iter()
                        .find(|f| f.name.to_lowercase().contains(&needle))
                        .cloned(),
                }
            })
            .collect())
    }

    async fn analyze_photo(&self, image_base64: &str) -> Result<Vec<DetectedFood>> {
        let Some(vision_url) = &self.vision_url else {
            bail!("No vision service configured; set TALLY_VISION_URL");
        };
        let resp: VisionResponse = self
            .client
            .post(vision_url)
            .header("apikey", &self.anon_key)
            .json(&json!({ "image": image_base64 }))
            .send()
            .await
            .context("Failed to reach the vision service")?
            .error_for_status()
            .context("Vision request rejected")?
            .json()
            .await
            .context("Failed to parse vision response")?;
        Ok(resp.foods)
    }
}
