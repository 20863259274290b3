//! Reconciling data store.
//!
//! Two tiers: the remote service is authoritative when reachable, the local
//! cache answers everything else. Reads go remote-first under a deadline and
//! fall back to the cache; successful remote reads are written through so the
//! cache converges. Writes go remote-then-local, and the local write happens
//! whether or not the remote accepted. A dead network never loses a meal.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tokio::time::timeout;
use uuid::Uuid;

use crate::cache::{LocalCache, keys};
use crate::catalog;
use crate::models::{
    FoodDefinition, FoodEntry, FoodSource, NewFoodEntry, Profile, ProfileInput, User, WeightEntry,
    validate_custom_food, validate_email, validate_password, validate_profile_input,
    validate_quantity, validate_weight_kg,
};
use crate::remote::{
    DetectedFood, RemoteFood, RemoteFoodEntry, RemoteProfile, RemoteStore, RemoteWeightEntry,
    Session,
};

/// How a bounded remote read resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome<T> {
    /// The remote answered with data inside the deadline.
    Data(T),
    /// The remote answered: it genuinely has nothing.
    Empty,
    /// The deadline expired (or the call failed) before an answer arrived.
    TimedOut,
}

/// The signed-in identity plus the profile memoized for it. Dropped wholesale
/// on logout so nothing stale survives into the next session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session: Session,
    pub profile: Option<Profile>,
}

pub const DEFAULT_READ_DEADLINE: Duration = Duration::from_millis(3000);

/// Recent-foods ring capacity.
pub const RECENT_FOODS_CAP: usize = 20;
/// Default slice of the ring handed to callers.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

pub struct DataStore {
    local: LocalCache,
    remote: Option<Arc<dyn RemoteStore>>,
    state: Option<SessionState>,
    read_deadline: Duration,
}

impl DataStore {
    /// Open the store over an on-disk cache, restoring any persisted session.
    pub fn new(local: LocalCache, remote: Option<Arc<dyn RemoteStore>>) -> Result<Self> {
        let session: Option<Session> = local.get_json(keys::SESSION)?;
        let profile: Option<Profile> = local.get_json(keys::PROFILE)?;
        Ok(Self {
            local,
            remote,
            state: session.map(|session| SessionState { session, profile }),
            read_deadline: DEFAULT_READ_DEADLINE,
        })
    }

    pub fn new_in_memory(remote: Option<Arc<dyn RemoteStore>>) -> Result<Self> {
        Ok(Self {
            local: LocalCache::open_in_memory()?,
            remote,
            state: None,
            read_deadline: DEFAULT_READ_DEADLINE,
        })
    }

    #[must_use]
    pub fn with_read_deadline(mut self, deadline: Duration) -> Self {
        self.read_deadline = deadline;
        self
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.state.as_ref().map(|s| &s.session.user)
    }

    /// The live session, restored from the cache at construction time.
    #[must_use]
    pub fn current_session(&self) -> Option<&Session> {
        self.state.as_ref().map(|s| &s.session)
    }

    /// Remote tier plus live session, or `None`. The gate every remote call
    /// goes through.
    fn remote_session(&self) -> Option<(&Arc<dyn RemoteStore>, &Session)> {
        match (&self.remote, &self.state) {
            (Some(remote), Some(state)) => Some((remote, &state.session)),
            _ => None,
        }
    }

    /// Race a remote read against the deadline. Failures are logged and
    /// collapse into `TimedOut`. Only `Data` is written through; `Empty` and
    /// `TimedOut` both fall back to the cache, so a write the remote missed
    /// is never erased by a later read against an empty remote.
    async fn race<T, F>(&self, what: &str, fut: F) -> ReadOutcome<T>
    where
        F: std::future::Future<Output = Result<Option<T>>>,
    {
        match timeout(self.read_deadline, fut).await {
            Ok(Ok(Some(value))) => ReadOutcome::Data(value),
            Ok(Ok(None)) => ReadOutcome::Empty,
            Ok(Err(err)) => {
                tracing::warn!(what, %err, "remote read failed, using local cache");
                ReadOutcome::TimedOut
            }
            Err(_) => {
                tracing::warn!(what, deadline_ms = self.read_deadline.as_millis() as u64,
                    "remote read deadline expired, using local cache");
                ReadOutcome::TimedOut
            }
        }
    }

    // --- authentication ---

    /// Create an account. Remote when configured; otherwise a device-local
    /// account so the tracker works fully offline.
    pub async fn register(&mut self, email: &str, password: &str, name: &str) -> Result<User> {
        validate_email(email)?;
        validate_password(password)?;

        if let Some(remote) = &self.remote {
            match remote.sign_up(email, password, name).await {
                Ok(session) => return self.install_session(session),
                Err(err) => {
                    tracing::warn!(%err, "remote sign-up failed, creating local account");
                }
            }
        }
        if let Some(existing) = self.local.get_json::<User>(keys::USER)? {
            if existing.email == email {
                bail!("An account for {email} already exists on this device. Use login.");
            }
        }
        let user = local_account(email, name);
        self.install_session(Session {
            access_token: String::new(),
            user,
        })
    }

    /// Sign in. Remote when configured; the offline fallback only accepts the
    /// account previously created on this device.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        validate_email(email)?;
        validate_password(password)?;

        if let Some(remote) = &self.remote {
            match remote.sign_in(email, password).await {
                Ok(session) => return self.install_session(session),
                Err(err) => {
                    tracing::warn!(%err, "remote sign-in failed, trying local account");
                }
            }
        }
        match self.local.get_json::<User>(keys::USER)? {
            Some(user) if user.email == email => self.install_session(Session {
                access_token: String::new(),
                user,
            }),
            _ => bail!("No local account for {email}. Register first, or go online."),
        }
    }

    fn install_session(&mut self, session: Session) -> Result<User> {
        self.local.set_json(keys::SESSION, &session)?;
        self.local.set_json(keys::USER, &session.user)?;
        let user = session.user.clone();
        self.state = Some(SessionState {
            session,
            profile: self.local.get_json(keys::PROFILE)?,
        });
        Ok(user)
    }

    /// Sign out and wipe the device cache. Remote sign-out is best-effort.
    pub async fn logout(&mut self) -> Result<()> {
        if let Some((remote, session)) = self.remote_session() {
            if let Err(err) = remote.sign_out(session).await {
                tracing::warn!(%err, "remote sign-out failed");
            }
        }
        self.state = None;
        self.local.clear_all()
    }

    // --- profile ---

    pub async fn profile(&mut self) -> Result<Option<Profile>> {
        if let Some((remote, session)) = self.remote_session() {
            let read = self
                .race("profile", remote.fetch_profile(session))
                .await;
            match read {
                ReadOutcome::Data(remote_profile) => {
                    let profile = remote_profile.into_profile();
                    self.local.set_json(keys::PROFILE, &profile)?;
                    if let Some(state) = &mut self.state {
                        state.profile = Some(profile.clone());
                    }
                    return Ok(Some(profile));
                }
                ReadOutcome::Empty | ReadOutcome::TimedOut => {}
            }
        }
        self.cached_profile()
    }

    /// Validate, recompute every derived target, and persist.
    pub async fn save_profile(&mut self, input: ProfileInput) -> Result<Profile> {
        validate_profile_input(&input)?;
        let profile = Profile::from_input(input);
        self.persist_profile(&profile).await?;
        Ok(profile)
    }

    async fn persist_profile(&mut self, profile: &Profile) -> Result<()> {
        if let Some((remote, session)) = self.remote_session() {
            let wire = RemoteProfile::from_profile(&session.user.id, profile);
            if let Err(err) = remote.upsert_profile(session, &wire).await {
                tracing::warn!(%err, "remote profile upsert failed, kept locally");
            }
        }
        self.local.set_json(keys::PROFILE, profile)?;
        if let Some(state) = &mut self.state {
            state.profile = Some(profile.clone());
        }
        Ok(())
    }

    // --- food entries ---

    pub async fn entries_for_date(&self, date: NaiveDate) -> Result<Vec<FoodEntry>> {
        if let Some((remote, session)) = self.remote_session() {
            let read = self
                .race("food_entries", async {
                    let rows = remote.food_entries_for_date(session, date).await?;
                    Ok(if rows.is_empty() { None } else { Some(rows) })
                })
                .await;
            if let ReadOutcome::Data(rows) = read {
                let entries: Vec<FoodEntry> =
                    rows.into_iter().map(RemoteFoodEntry::into_entry).collect();
                self.local.set_json(&keys::food_entries(date), &entries)?;
                return Ok(entries);
            }
        }
        self.cached_entries(date)
    }

    pub async fn log_entry(&self, date: NaiveDate, new: NewFoodEntry) -> Result<FoodEntry> {
        validate_quantity(new.quantity)?;
        let entry = FoodEntry {
            id: Uuid::new_v4().to_string(),
            food_id: new.food_id,
            food_name: new.food_name,
            meal: new.meal,
            quantity: new.quantity,
            unit: new.unit,
            calories: new.calories,
            protein: new.protein,
            carbs: new.carbs,
            fat: new.fat,
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        if let Some((remote, session)) = self.remote_session() {
            let wire = RemoteFoodEntry::from_entry(&session.user.id, &entry);
            if let Err(err) = remote.insert_food_entry(session, &wire).await {
                tracing::warn!(%err, "remote entry insert failed, kept locally");
            }
        }

        let key = keys::food_entries(date);
        let mut entries: Vec<FoodEntry> = self.local.get_json(&key)?.unwrap_or_default();
        entries.push(entry.clone());
        self.local.set_json(&key, &entries)?;
        Ok(entry)
    }

    /// Returns whether the entry existed locally.
    pub async fn delete_entry(&self, date: NaiveDate, entry_id: &str) -> Result<bool> {
        if let Some((remote, session)) = self.remote_session() {
            if let Err(err) = remote.delete_food_entry(session, entry_id).await {
                tracing::warn!(%err, "remote entry delete failed, removed locally");
            }
        }

        let key = keys::food_entries(date);
        let mut entries: Vec<FoodEntry> = self.local.get_json(&key)?.unwrap_or_default();
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);
        let found = entries.len() != before;
        self.local.set_json(&key, &entries)?;
        Ok(found)
    }

    /// Every cached entry across all days, ascending by date. Export reads
    /// only the local tier: it must work on a plane.
    pub fn all_cached_entries(&self) -> Result<Vec<FoodEntry>> {
        let mut all = Vec::new();
        for key in self.local.keys_with_prefix(keys::FOOD_ENTRIES_PREFIX)? {
            let entries: Vec<FoodEntry> = self.local.get_json(&key)?.unwrap_or_default();
            all.extend(entries);
        }
        all.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.created_at.cmp(&b.created_at)));
        Ok(all)
    }

    // --- weight ---

    pub async fn weight_history(&self) -> Result<Vec<WeightEntry>> {
        if let Some((remote, session)) = self.remote_session() {
            let read = self
                .race("weight_entries", async {
                    let rows = remote.weight_entries(session).await?;
                    Ok(if rows.is_empty() { None } else { Some(rows) })
                })
                .await;
            if let ReadOutcome::Data(rows) = read {
                let mut entries: Vec<WeightEntry> =
                    rows.into_iter().map(RemoteWeightEntry::into_entry).collect();
                entries.sort_by_key(|e| e.date);
                self.local.set_json(keys::WEIGHT_ENTRIES, &entries)?;
                return Ok(entries);
            }
        }
        self.cached_weights()
    }

    /// Log weight for a day. Same-day logs replace, the list stays sorted,
    /// and the profile's weight (plus every derived target) follows.
    pub async fn log_weight(&mut self, date: NaiveDate, weight_kg: f64) -> Result<WeightEntry> {
        validate_weight_kg(weight_kg)?;
        let entry = WeightEntry {
            id: Uuid::new_v4().to_string(),
            weight_kg,
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        if let Some((remote, session)) = self.remote_session() {
            let wire = RemoteWeightEntry::from_entry(&session.user.id, &entry);
            if let Err(err) = remote.upsert_weight_entry(session, &wire).await {
                tracing::warn!(%err, "remote weight upsert failed, kept locally");
            }
        }

        let mut entries: Vec<WeightEntry> =
            self.local.get_json(keys::WEIGHT_ENTRIES)?.unwrap_or_default();
        entries.retain(|e| e.date != date);
        entries.push(entry.clone());
        entries.sort_by_key(|e| e.date);
        self.local.set_json(keys::WEIGHT_ENTRIES, &entries)?;

        if let Some(profile) = self.cached_profile()? {
            self.persist_profile(&profile.with_weight(weight_kg)).await?;
        }
        Ok(entry)
    }

    // --- foods ---

    pub async fn custom_foods(&self) -> Result<Vec<FoodDefinition>> {
        if let Some((remote, session)) = self.remote_session() {
            let read = self
                .race("custom_foods", async {
                    let rows = remote.custom_foods(session).await?;
                    Ok(if rows.is_empty() { None } else { Some(rows) })
                })
                .await;
            if let ReadOutcome::Data(rows) = read {
                let foods: Vec<FoodDefinition> =
                    rows.into_iter().map(RemoteFood::into_definition).collect();
                self.local.set_json(keys::CUSTOM_FOODS, &foods)?;
                return Ok(foods);
            }
        }
        self.cached_custom_foods()
    }

    pub async fn add_custom_food(&self, mut food: FoodDefinition) -> Result<FoodDefinition> {
        validate_custom_food(&food)?;
        if food.id.is_empty() {
            food.id = Uuid::new_v4().to_string();
        }
        food.source = FoodSource::Custom;

        if let Some((remote, session)) = self.remote_session() {
            let wire = RemoteFood::from_definition(Some(&session.user.id), &food);
            if let Err(err) = remote.insert_custom_food(session, &wire).await {
                tracing::warn!(%err, "remote custom-food insert failed, kept locally");
            }
        }

        let mut foods: Vec<FoodDefinition> =
            self.local.get_json(keys::CUSTOM_FOODS)?.unwrap_or_default();
        foods.push(food.clone());
        self.local.set_json(keys::CUSTOM_FOODS, &foods)?;
        Ok(food)
    }

    pub async fn favorites(&self) -> Result<Vec<FoodDefinition>> {
        if let Some((remote, session)) = self.remote_session() {
            let read = self
                .race("favorites", async {
                    let rows = remote.favorites(session).await?;
                    Ok(if rows.is_empty() { None } else { Some(rows) })
                })
                .await;
            if let ReadOutcome::Data(rows) = read {
                let foods: Vec<FoodDefinition> =
                    rows.into_iter().map(RemoteFood::into_definition).collect();
                self.local.set_json(keys::FAVORITES, &foods)?;
                return Ok(foods);
            }
        }
        Ok(self.local.get_json(keys::FAVORITES)?.unwrap_or_default())
    }

    /// Returns `true` when the food is a favorite after the call.
    pub async fn toggle_favorite(&self, food: &FoodDefinition) -> Result<bool> {
        let mut foods: Vec<FoodDefinition> =
            self.local.get_json(keys::FAVORITES)?.unwrap_or_default();
        let was_favorite = foods.iter().any(|f| f.id == food.id);

        if let Some((remote, session)) = self.remote_session() {
            let result = if was_favorite {
                remote.remove_favorite(session, &food.id).await
            } else {
                remote.add_favorite(session, &food.id).await
            };
            if let Err(err) = result {
                tracing::warn!(%err, "remote favorite update failed, kept locally");
            }
        }

        if was_favorite {
            foods.retain(|f| f.id != food.id);
        } else {
            foods.push(food.clone());
        }
        self.local.set_json(keys::FAVORITES, &foods)?;
        Ok(!was_favorite)
    }

    /// Search the remote food table, falling back to the bundled catalog plus
    /// locally cached custom foods.
    pub async fn search_foods(&self, query: &str) -> Result<Vec<FoodDefinition>> {
        let query = query.trim();
        if query.chars().count() < catalog::MIN_SEARCH_CHARS {
            bail!("Search query must be at least {} characters", catalog::MIN_SEARCH_CHARS);
        }

        if let Some(remote) = &self.remote {
            let read = self
                .race("food_search", async {
                    let rows = remote.search_foods(query).await?;
                    Ok(if rows.is_empty() { None } else { Some(rows) })
                })
                .await;
            if let ReadOutcome::Data(rows) = read {
                return Ok(rows.into_iter().map(RemoteFood::into_definition).collect());
            }
        }

        let needle = query.to_lowercase();
        let mut found: Vec<FoodDefinition> =
            catalog::search(query).into_iter().cloned().collect();
        for food in self.cached_custom_foods()? {
            if food.name.to_lowercase().contains(&needle) {
                found.push(food);
            }
        }
        Ok(found)
    }

    // --- recent foods ---

    /// Record a use of `food` at the head of the recent ring. Dedup by id,
    /// capped at [`RECENT_FOODS_CAP`].
    pub fn touch_recent(&self, food: &FoodDefinition) -> Result<()> {
        let mut recent: Vec<FoodDefinition> =
            self.local.get_json(keys::RECENT_FOODS)?.unwrap_or_default();
        recent.retain(|f| f.id != food.id);
        recent.insert(0, food.clone());
        recent.truncate(RECENT_FOODS_CAP);
        self.local.set_json(keys::RECENT_FOODS, &recent)
    }

    pub fn recent_foods(&self, limit: usize) -> Result<Vec<FoodDefinition>> {
        let mut recent: Vec<FoodDefinition> =
            self.local.get_json(keys::RECENT_FOODS)?.unwrap_or_default();
        recent.truncate(limit);
        Ok(recent)
    }

    // --- photo logging ---

    /// Ask the vision bridge what is in the photo. An empty list means the
    /// bridge answered and saw nothing loggable; errors mean it didn't answer.
    pub async fn analyze_photo(&self, image_base64: &str) -> Result<Vec<DetectedFood>> {
        let Some(remote) = &self.remote else {
            bail!("Photo analysis needs the remote service; set the remote URL first");
        };
        remote
            .analyze_photo(image_base64)
            .await
            .context("photo analysis failed")
    }

    /// Match detected foods against known definitions: one batched remote
    /// request when online, catalog + custom substring match otherwise.
    pub async fn match_detected(
        &self,
        detected: &[DetectedFood],
    ) -> Result<Vec<(DetectedFood, Option<FoodDefinition>)>> {
        if detected.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(remote) = &self.remote {
            let names: Vec<String> = detected.iter().map(|d| d.name.clone()).collect();
            let read = self
                .race("food_match", async {
                    let matches = remote.match_detected_foods(&names).await?;
                    Ok(Some(matches))
                })
                .await;
            if let ReadOutcome::Data(matches) = read {
                let paired = detected
                    .iter()
                    .map(|d| {
                        let food = matches
                            .iter()
                            .find(|m| m.name.eq_ignore_ascii_case(&d.name))
                            .and_then(|m| m.food.clone())
                            .map(RemoteFood::into_definition);
                        (d.clone(), food)
                    })
                    .collect();
                return Ok(paired);
            }
        }

        let custom = self.cached_custom_foods()?;
        Ok(detected
            .iter()
            .map(|d| {
                let needle = d.name.to_lowercase();
                let food = catalog::all()
                    .iter()
                    .find(|f| f.name.to_lowercase().contains(&needle))
                    .cloned()
                    .or_else(|| {
                        custom
                            .iter()
                            .find(|f| f.name.to_lowercase().contains(&needle))
                            .cloned()
                    });
                (d.clone(), food)
            })
            .collect())
    }

    // --- sync cache accessors (initial paint, export, offline paths) ---

    pub fn cached_profile(&self) -> Result<Option<Profile>> {
        self.local.get_json(keys::PROFILE)
    }

    pub fn cached_entries(&self, date: NaiveDate) -> Result<Vec<FoodEntry>> {
        Ok(self
            .local
            .get_json(&keys::food_entries(date))?
            .unwrap_or_default())
    }

    pub fn cached_weights(&self) -> Result<Vec<WeightEntry>> {
        Ok(self.local.get_json(keys::WEIGHT_ENTRIES)?.unwrap_or_default())
    }

    pub fn cached_custom_foods(&self) -> Result<Vec<FoodDefinition>> {
        Ok(self.local.get_json(keys::CUSTOM_FOODS)?.unwrap_or_default())
    }
}

fn local_account(email: &str, name: &str) -> User {
    User {
        id: format!("local-{}", Uuid::new_v4()),
        email: email.to_string(),
        name: name.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Goal, MealSlot, Sex, Unit};
    use crate::remote::FoodMatch;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// In-memory remote with switches for failure and latency.
    #[derive(Default)]
    struct MockRemote {
        fail: AtomicBool,
        delay: Mutex<Option<Duration>>,
        profile: Mutex<Option<RemoteProfile>>,
        entries: Mutex<Vec<RemoteFoodEntry>>,
        weights: Mutex<Vec<RemoteWeightEntry>>,
        foods: Mutex<Vec<RemoteFood>>,
        called: AtomicBool,
    }

    impl MockRemote {
        async fn gate(&self) -> Result<()> {
            self.called.store(true, Ordering::SeqCst);
            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                bail!("mock remote down");
            }
            Ok(())
        }

        fn session() -> Session {
            Session {
                access_token: "token".to_string(),
                user: User {
                    id: "user-1".to_string(),
                    email: "ana@example.com".to_string(),
                    name: "Ana".to_string(),
                    created_at: String::new(),
                },
            }
        }
    }

    #[async_trait]
    impl RemoteStore for MockRemote {
        async fn sign_up(&self, email: &str, _password: &str, name: &str) -> Result<Session> {
            self.gate().await?;
            Ok(Session {
                access_token: "token".to_string(),
                user: User {
                    id: "user-1".to_string(),
                    email: email.to_string(),
                    name: name.to_string(),
                    created_at: String::new(),
                },
            })
        }

        async fn sign_in(&self, email: &str, _password: &str) -> Result<Session> {
            self.gate().await?;
            Ok(Session {
                access_token: "token".to_string(),
                user: User {
                    id: "user-1".to_string(),
                    email: email.to_string(),
                    name: "Ana".to_string(),
                    created_at: String::new(),
                },
            })
        }

        async fn sign_out(&self, _session: &Session) -> Result<()> {
            self.gate().await
        }

        async fn current_user(&self, session: &Session) -> Result<Option<User>> {
            self.gate().await?;
            Ok(Some(session.user.clone()))
        }

        async fn fetch_profile(&self, _session: &Session) -> Result<Option<RemoteProfile>> {
            self.gate().await?;
            Ok(self.profile.lock().unwrap().clone())
        }

        async fn upsert_profile(&self, _session: &Session, profile: &RemoteProfile) -> Result<()> {
            self.gate().await?;
            *self.profile.lock().unwrap() = Some(profile.clone());
            Ok(())
        }

        async fn food_entries_for_date(
            &self,
            _session: &Session,
            date: NaiveDate,
        ) -> Result<Vec<RemoteFoodEntry>> {
            self.gate().await?;
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.entry_date == date)
                .cloned()
                .collect())
        }

        async fn insert_food_entry(
            &self,
            _session: &Session,
            entry: &RemoteFoodEntry,
        ) -> Result<()> {
            self.gate().await?;
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn delete_food_entry(&self, _session: &Session, entry_id: &str) -> Result<()> {
            self.gate().await?;
            self.entries.lock().unwrap().retain(|e| e.id != entry_id);
            Ok(())
        }

        async fn weight_entries(&self, _session: &Session) -> Result<Vec<RemoteWeightEntry>> {
            self.gate().await?;
            Ok(self.weights.lock().unwrap().clone())
        }

        async fn upsert_weight_entry(
            &self,
            _session: &Session,
            entry: &RemoteWeightEntry,
        ) -> Result<()> {
            self.gate().await?;
            let mut weights = self.weights.lock().unwrap();
            weights.retain(|w| w.entry_date != entry.entry_date);
            weights.push(entry.clone());
            Ok(())
        }

        async fn custom_foods(&self, _session: &Session) -> Result<Vec<RemoteFood>> {
            self.gate().await?;
            Ok(self
                .foods
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.is_custom)
                .cloned()
                .collect())
        }

        async fn insert_custom_food(&self, _session: &Session, food: &RemoteFood) -> Result<()> {
            self.gate().await?;
            self.foods.lock().unwrap().push(food.clone());
            Ok(())
        }

        async fn favorites(&self, _session: &Session) -> Result<Vec<RemoteFood>> {
            self.gate().await?;
            Ok(Vec::new())
        }

        async fn add_favorite(&self, _session: &Session, _food_id: &str) -> Result<()> {
            self.gate().await
        }

        async fn remove_favorite(&self, _session: &Session, _food_id: &str) -> Result<()> {
            self.gate().await
        }

        async fn catalog_foods(&self, _category: Option<&str>) -> Result<Vec<RemoteFood>> {
            self.gate().await?;
            Ok(self.foods.lock().unwrap().clone())
        }

        async fn search_foods(&self, query: &str) -> Result<Vec<RemoteFood>> {
            self.gate().await?;
            let needle = query.to_lowercase();
            Ok(self
                .foods
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.name.to_lowercase().contains(&needle))
                .cloned()
                .collect())
        }

        async fn match_detected_foods(&self, names: &[String]) -> Result<Vec<FoodMatch>> {
            self.gate().await?;
            let foods = self.foods.lock().unwrap();
            Ok(names
                .iter()
                .map(|name| FoodMatch {
                    name: name.clone(),
                    food: foods
                        .iter()
                        .find(|f| f.name.to_lowercase().contains(&name.to_lowercase()))
                        .cloned(),
                })
                .collect())
        }

        async fn analyze_photo(&self, _image_base64: &str) -> Result<Vec<DetectedFood>> {
            self.gate().await?;
            Ok(vec![DetectedFood {
                name: "banana".to_string(),
                confidence: 92.0,
                estimated_grams: 118.0,
            }])
        }
    }

    fn store_with(mock: Arc<MockRemote>) -> DataStore {
        let mut store = DataStore::new_in_memory(Some(mock)).unwrap();
        store.state = Some(SessionState {
            session: MockRemote::session(),
            profile: None,
        });
        store
    }

    fn sample_input() -> ProfileInput {
        ProfileInput {
            name: Some("Ana".to_string()),
            weight_kg: 70.0,
            height_cm: 175.0,
            age: 30,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Deficit,
        }
    }

    fn sample_entry(meal: MealSlot) -> NewFoodEntry {
        NewFoodEntry {
            food_id: Some("oats".to_string()),
            food_name: "Oats".to_string(),
            meal,
            quantity: 80.0,
            unit: Unit::Gram,
            calories: 311.0,
            protein: 13.5,
            carbs: 53.0,
            fat: 5.5,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_remote_profile_read_writes_through() {
        let mock = Arc::new(MockRemote::default());
        let profile = Profile::from_input(sample_input());
        *mock.profile.lock().unwrap() =
            Some(RemoteProfile::from_profile("user-1", &profile));

        let mut store = store_with(mock);
        let got = store.profile().await.unwrap().unwrap();
        assert_eq!(got, profile);
        // Remote answer landed in the cache.
        assert_eq!(store.cached_profile().unwrap().unwrap(), profile);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_remote_falls_back_to_cache() {
        let mock = Arc::new(MockRemote::default());
        *mock.delay.lock().unwrap() = Some(Duration::from_secs(30));
        let mut store = store_with(mock);
        let local = Profile::from_input(sample_input());
        store.local.set_json(keys::PROFILE, &local).unwrap();

        let got = store.profile().await.unwrap().unwrap();
        assert_eq!(got, local);
    }

    #[tokio::test]
    async fn test_remote_error_falls_back_to_cache() {
        let mock = Arc::new(MockRemote::default());
        mock.fail.store(true, Ordering::SeqCst);
        let mut store = store_with(mock);
        let local = Profile::from_input(sample_input());
        store.local.set_json(keys::PROFILE, &local).unwrap();

        let got = store.profile().await.unwrap().unwrap();
        assert_eq!(got, local);
    }

    #[tokio::test]
    async fn test_no_session_never_touches_remote() {
        let mock = Arc::new(MockRemote::default());
        let mut store = DataStore::new_in_memory(Some(Arc::clone(&mock) as _)).unwrap();
        let _ = store.profile().await.unwrap();
        let _ = store.entries_for_date(day(15)).await.unwrap();
        assert!(!mock.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_write_survives_remote_failure() {
        let mock = Arc::new(MockRemote::default());
        mock.fail.store(true, Ordering::SeqCst);
        let store = store_with(Arc::clone(&mock));

        let entry = store
            .log_entry(day(15), sample_entry(MealSlot::Breakfast))
            .await
            .unwrap();
        assert!(mock.entries.lock().unwrap().is_empty());
        let cached = store.cached_entries(day(15)).unwrap();
        assert_eq!(cached, vec![entry]);
    }

    #[tokio::test]
    async fn test_write_goes_remote_then_local() {
        let mock = Arc::new(MockRemote::default());
        let store = store_with(Arc::clone(&mock));

        store
            .log_entry(day(15), sample_entry(MealSlot::Lunch))
            .await
            .unwrap();
        assert_eq!(mock.entries.lock().unwrap().len(), 1);
        assert_eq!(store.cached_entries(day(15)).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_logged_entry_survives_remote_empty_read() {
        let mock = Arc::new(MockRemote::default());
        let store = store_with(Arc::clone(&mock));

        // Log while the remote is down: the entry only lands locally.
        mock.fail.store(true, Ordering::SeqCst);
        let entry = store
            .log_entry(day(15), sample_entry(MealSlot::Breakfast))
            .await
            .unwrap();
        assert!(mock.entries.lock().unwrap().is_empty());

        // Remote recovers but has nothing for that day: the read must fall
        // back to the cache, not erase it.
        mock.fail.store(false, Ordering::SeqCst);
        let entries = store.entries_for_date(day(15)).await.unwrap();
        assert_eq!(entries, vec![entry.clone()]);
        assert_eq!(store.cached_entries(day(15)).unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn test_delete_entry_reports_missing() {
        let store = store_with(Arc::new(MockRemote::default()));
        let entry = store
            .log_entry(day(15), sample_entry(MealSlot::Dinner))
            .await
            .unwrap();
        assert!(store.delete_entry(day(15), &entry.id).await.unwrap());
        assert!(!store.delete_entry(day(15), &entry.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_weight_upsert_one_per_day_sorted() {
        let mut store = store_with(Arc::new(MockRemote::default()));
        store.log_weight(day(16), 71.0).await.unwrap();
        store.log_weight(day(14), 72.0).await.unwrap();
        store.log_weight(day(16), 70.5).await.unwrap();

        let weights = store.cached_weights().unwrap();
        assert_eq!(weights.len(), 2);
        assert_eq!(weights[0].date, day(14));
        assert_eq!(weights[1].date, day(16));
        assert!((weights[1].weight_kg - 70.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_weight_log_recomputes_profile_targets() {
        let mut store = store_with(Arc::new(MockRemote::default()));
        let before = store.save_profile(sample_input()).await.unwrap();
        store.log_weight(day(15), 80.0).await.unwrap();

        let after = store.cached_profile().unwrap().unwrap();
        assert!((after.weight_kg - 80.0).abs() < f64::EPSILON);
        assert!(after.bmr > before.bmr);
        assert!(after.protein_target_g > before.protein_target_g);
    }

    #[tokio::test]
    async fn test_weight_rejects_implausible_values() {
        let mut store = DataStore::new_in_memory(None).unwrap();
        assert!(store.log_weight(day(15), 20.0).await.is_err());
        assert!(store.log_weight(day(15), 500.0).await.is_err());
    }

    #[tokio::test]
    async fn test_recent_foods_dedup_and_cap() {
        let store = DataStore::new_in_memory(None).unwrap();
        let mut food = catalog::all()[0].clone();
        for i in 0..25 {
            food.id = format!("food-{i}");
            store.touch_recent(&food).unwrap();
        }
        // Re-touch an old one: moves to front, no duplicate.
        food.id = "food-20".to_string();
        store.touch_recent(&food).unwrap();

        let all = store.recent_foods(RECENT_FOODS_CAP).unwrap();
        assert_eq!(all.len(), RECENT_FOODS_CAP);
        assert_eq!(all[0].id, "food-20");
        assert_eq!(all.iter().filter(|f| f.id == "food-20").count(), 1);

        let limited = store.recent_foods(DEFAULT_RECENT_LIMIT).unwrap();
        assert_eq!(limited.len(), DEFAULT_RECENT_LIMIT);
    }

    #[tokio::test]
    async fn test_local_fallback_register_and_login() {
        let mut store = DataStore::new_in_memory(None).unwrap();
        let user = store
            .register("ana@example.com", "secret1", "Ana")
            .await
            .unwrap();
        assert!(user.id.starts_with("local-"));
        assert!(store.current_user().is_some());

        // Same device, later: login with the same email works...
        store.state = None;
        let again = store.login("ana@example.com", "secret1").await.unwrap();
        assert_eq!(again.email, "ana@example.com");
        // ...but an unknown email does not.
        assert!(store.login("bob@example.com", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn test_register_validates_before_io() {
        let mock = Arc::new(MockRemote::default());
        let mut store = DataStore::new_in_memory(Some(Arc::clone(&mock) as _)).unwrap();
        assert!(store.register("not-an-email", "secret1", "X").await.is_err());
        assert!(store.register("a@b.com", "short", "X").await.is_err());
        assert!(!mock.called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_logout_drops_session_and_cache() {
        let mut store = store_with(Arc::new(MockRemote::default()));
        store.save_profile(sample_input()).await.unwrap();
        assert!(store.current_session().is_some());
        store.logout().await.unwrap();

        assert!(store.current_user().is_none());
        assert!(store.current_session().is_none());
        assert!(store.cached_profile().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_enforces_minimum_query() {
        let store = DataStore::new_in_memory(None).unwrap();
        assert!(store.search_foods("a").await.is_err());
        assert!(store.search_foods("  b  ").await.is_err());
    }

    #[tokio::test]
    async fn test_search_falls_back_to_catalog() {
        let store = DataStore::new_in_memory(None).unwrap();
        let found = store.search_foods("chicken").await.unwrap();
        assert!(found.iter().any(|f| f.name.to_lowercase().contains("chicken")));
    }

    #[tokio::test]
    async fn test_match_detected_offline_uses_catalog() {
        let store = DataStore::new_in_memory(None).unwrap();
        let detected = vec![
            DetectedFood {
                name: "banana".to_string(),
                confidence: 90.0,
                estimated_grams: 118.0,
            },
            DetectedFood {
                name: "unobtainium stew".to_string(),
                confidence: 40.0,
                estimated_grams: 200.0,
            },
        ];
        let matches = store.match_detected(&detected).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].1.is_some());
        assert!(matches[1].1.is_none());
    }

    #[tokio::test]
    async fn test_analyze_photo_requires_remote() {
        let store = DataStore::new_in_memory(None).unwrap();
        assert!(store.analyze_photo("aGVsbG8=").await.is_err());
    }
}
