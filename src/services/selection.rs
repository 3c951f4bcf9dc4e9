//! Facet selection state and the store that publishes its changes.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::clients::RecipeBackend;
use crate::domain::SearchInput;
use crate::models::IngredientCatalog;

/// Set-valued facet dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Ingredients,
    Cuisine,
    Course,
    Difficulty,
}

impl Dimension {
    pub const ALL: [Self; 4] = [
        Self::Ingredients,
        Self::Cuisine,
        Self::Course,
        Self::Difficulty,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ingredients => "ingredients",
            Self::Cuisine => "cuisine",
            Self::Course => "course",
            Self::Difficulty => "difficulty",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ingredients" | "ingredient" | "i" => Some(Self::Ingredients),
            "cuisine" | "cuisines" | "c" => Some(Self::Cuisine),
            "course" | "courses" => Some(Self::Course),
            "difficulty" | "difficulties" | "d" => Some(Self::Difficulty),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MaxTimeError {
    #[error("Unsupported max time: {0} minutes (choose 15, 30, 45 or 60)")]
    Unsupported(u32),

    #[error("Invalid max time: {0}")]
    Invalid(String),
}

/// Exclusive maximum-time choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaxTime {
    Within15,
    Within30,
    Within45,
    Within60,
    #[default]
    Unbounded,
}

impl MaxTime {
    pub const CHOICES: [Self; 5] = [
        Self::Within15,
        Self::Within30,
        Self::Within45,
        Self::Within60,
        Self::Unbounded,
    ];

    /// Bound in minutes, `None` when unbounded.
    #[must_use]
    pub const fn minutes(self) -> Option<u32> {
        match self {
            Self::Within15 => Some(15),
            Self::Within30 => Some(30),
            Self::Within45 => Some(45),
            Self::Within60 => Some(60),
            Self::Unbounded => None,
        }
    }

    #[must_use]
    pub const fn is_bounded(self) -> bool {
        self.minutes().is_some()
    }
}

impl TryFrom<u32> for MaxTime {
    type Error = MaxTimeError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::CHOICES
            .into_iter()
            .find(|choice| choice.minutes() == Some(minutes))
            .ok_or(MaxTimeError::Unsupported(minutes))
    }
}

impl std::str::FromStr for MaxTime {
    type Err = MaxTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") || s.eq_ignore_ascii_case("unbounded") {
            return Ok(Self::Unbounded);
        }

        let minutes: u32 = s.parse().map_err(|_| MaxTimeError::Invalid(s.to_string()))?;
        Self::try_from(minutes)
    }
}

impl fmt::Display for MaxTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.minutes() {
            Some(minutes) => write!(f, "under {minutes} min"),
            None => f.write_str("any time"),
        }
    }
}

/// The user's current filter choices and free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    pub query: String,
    pub ingredients: BTreeSet<String>,
    pub cuisines: BTreeSet<String>,
    pub courses: BTreeSet<String>,
    pub difficulties: BTreeSet<String>,
    pub max_time: MaxTime,
}

impl FacetSelection {
    #[must_use]
    pub const fn values(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Ingredients => &self.ingredients,
            Dimension::Cuisine => &self.cuisines,
            Dimension::Course => &self.courses,
            Dimension::Difficulty => &self.difficulties,
        }
    }

    fn values_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<String> {
        match dimension {
            Dimension::Ingredients => &mut self.ingredients,
            Dimension::Cuisine => &mut self.cuisines,
            Dimension::Course => &mut self.courses,
            Dimension::Difficulty => &mut self.difficulties,
        }
    }

    /// Adds `id` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, dimension: Dimension, id: impl Into<String>) -> bool {
        let id = id.into();
        let values = self.values_mut(dimension);
        if values.remove(&id) {
            false
        } else {
            values.insert(id);
            true
        }
    }

    /// Adds `id` without toggling. Returns whether it was newly added.
    pub fn select(&mut self, dimension: Dimension, id: impl Into<String>) -> bool {
        self.values_mut(dimension).insert(id.into())
    }

    #[must_use]
    pub fn is_selected(&self, dimension: Dimension, id: &str) -> bool {
        self.values(dimension).contains(id)
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.values_mut(dimension).clear();
    }

    /// Resets every facet and the time bound. The query is left alone.
    pub fn clear_all(&mut self) {
        for dimension in Dimension::ALL {
            self.clear(dimension);
        }
        self.max_time = MaxTime::Unbounded;
    }

    #[must_use]
    pub fn has_facets(&self) -> bool {
        Dimension::ALL
            .into_iter()
            .any(|d| !self.values(d).is_empty())
            || self.max_time.is_bounded()
    }
}

/// Owns the current [`FacetSelection`] and the ingredient catalog.
///
/// Every mutation that actually changes state publishes a [`SearchInput`]
/// snapshot on the store's broadcast channel.
pub struct FacetStore {
    selection: FacetSelection,
    catalog: Arc<IngredientCatalog>,
    events: broadcast::Sender<SearchInput>,
}

impl FacetStore {
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        let (events, _) = broadcast::channel(buffer_size.max(1));
        Self {
            selection: FacetSelection::default(),
            catalog: Arc::new(IngredientCatalog::default()),
            events,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SearchInput> {
        self.events.subscribe()
    }

    #[must_use]
    pub const fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<IngredientCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchInput {
        SearchInput::new(self.selection.clone(), self.catalog())
    }

    pub fn toggle(&mut self, dimension: Dimension, id: impl Into<String>) -> bool {
        let id = id.into();
        let selected = self.selection.toggle(dimension, id.clone());
        debug!(%dimension, id = %id, selected, "Facet toggled");
        self.publish();
        selected
    }

    /// Selects `id` if it is not selected yet. Repeats are no-ops.
    pub fn select(&mut self, dimension: Dimension, id: impl Into<String>) -> bool {
        let id = id.into();
        if !self.selection.select(dimension, id.clone()) {
            return false;
        }
        debug!(%dimension, id = %id, "Facet selected");
        self.publish();
        true
    }

    pub fn set_max_time(&mut self, max_time: MaxTime) {
        if self.selection.max_time == max_time {
            return;
        }
        self.selection.max_time = max_time;
        debug!(max_time = %max_time, "Max time changed");
        self.publish();
    }

    pub fn clear(&mut self, dimension: Dimension) {
        if self.selection.values(dimension).is_empty() {
            return;
        }
        self.selection.clear(dimension);
        debug!(%dimension, "Facet cleared");
        self.publish();
    }

    pub fn clear_all(&mut self) {
        if !self.selection.has_facets() {
            return;
        }
        self.selection.clear_all();
        debug!("All facets cleared");
        self.publish();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if self.selection.query == query {
            return;
        }
        self.selection.query = query;
        self.publish();
    }

    pub fn set_catalog(&mut self, catalog: IngredientCatalog) {
        if *self.catalog == catalog {
            return;
        }
        self.catalog = Arc::new(catalog);
        self.publish();
    }

    /// Fetches the ingredient catalog once.
    ///
    /// On failure the catalog stays empty and the store keeps working;
    /// ingredient facets simply cannot be resolved. Returns the catalog size.
    pub async fn load_catalog(&mut self, backend: &dyn RecipeBackend) -> usize {
        match backend.list_ingredients().await {
            Ok(ingredients) => {
                let count = ingredients.len();
                info!(count, "Ingredient catalog loaded");
                self.set_catalog(IngredientCatalog::new(ingredients));
                count
            }
            Err(e) => {
                warn!(error = %e, "Ingredient catalog unavailable, continuing without it");
                0
            }
        }
    }

    fn publish(&self) {
        let _ = self.events.send(self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut selection = FacetSelection::default();
        selection.toggle(Dimension::Ingredients, "a");
        let before = selection.clone();

        assert!(selection.toggle(Dimension::Ingredients, "b"));
        assert!(!selection.toggle(Dimension::Ingredients, "b"));
        assert_eq!(selection, before);
    }

    #[test]
    fn test_clear_all_keeps_query() {
        let mut selection = FacetSelection {
            query: "soup".to_string(),
            max_time: MaxTime::Within30,
            ..Default::default()
        };
        selection.toggle(Dimension::Cuisine, "Italian");
        selection.toggle(Dimension::Difficulty, "easy");

        selection.clear_all();

        assert_eq!(selection.query, "soup");
        assert!(!selection.has_facets());
        assert_eq!(selection.max_time, MaxTime::Unbounded);
    }

    #[test]
    fn test_max_time_choices() {
        assert_eq!(MaxTime::try_from(45), Ok(MaxTime::Within45));
        assert_eq!(MaxTime::try_from(20), Err(MaxTimeError::Unsupported(20)));
        assert_eq!("any".parse::<MaxTime>(), Ok(MaxTime::Unbounded));
        assert_eq!("15".parse::<MaxTime>(), Ok(MaxTime::Within15));
        assert!("soon".parse::<MaxTime>().is_err());
        assert_eq!(MaxTime::default().minutes(), None);
    }

    #[test]
    fn test_store_publishes_on_change() {
        let mut store = FacetStore::new(16);
        let mut rx = store.subscribe();

        store.toggle(Dimension::Cuisine, "Italian");
        let event = rx.try_recv().unwrap();
        assert!(event.selection.is_selected(Dimension::Cuisine, "Italian"));

        store.set_max_time(MaxTime::Within60);
        assert_eq!(rx.try_recv().unwrap().selection.max_time, MaxTime::Within60);
    }

    #[test]
    fn test_store_skips_noop_mutations() {
        let mut store = FacetStore::new(16);
        let mut rx = store.subscribe();

        store.set_max_time(MaxTime::Unbounded);
        store.clear(Dimension::Course);
        store.clear_all();
        store.set_query("");
        store.set_catalog(IngredientCatalog::default());

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut store = FacetStore::new(16);
        let mut rx = store.subscribe();

        assert!(store.select(Dimension::Cuisine, "Italian"));
        assert!(!store.select(Dimension::Cuisine, "Italian"));

        assert!(store.selection().is_selected(Dimension::Cuisine, "Italian"));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_catalog_change_publishes() {
        use crate::models::Ingredient;

        let mut store = FacetStore::new(16);
        let mut rx = store.subscribe();

        store.set_catalog(IngredientCatalog::new(vec![Ingredient {
            id: "a".to_string(),
            name: "Tomato".to_string(),
            ..Default::default()
        }]));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.catalog.name_of("a"), Some("Tomato"));
    }
}
