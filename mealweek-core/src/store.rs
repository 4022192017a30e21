//! The plan store: owns the recipe collection and every week's plan, tracks
//! the week being viewed, and persists full snapshots after each change.
//!
//! Collections are persistent (`im`) structures. A mutation computes the next
//! collection from the current one and swaps it in, so a caller holding a
//! [`StoreSnapshot`] never observes a half-applied change and unchanged
//! weeks are shared between snapshots.
//!
//! Nothing here returns an error. Missing ids, blank text and duplicate
//! recipe assignments are no-ops reported through the `bool` results, and
//! storage failures are logged while the in-memory state stays authoritative.

use chrono::{Duration, NaiveDate};
use im::{OrdMap, Vector};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;

use crate::clock::{Clock, SystemClock};
use crate::models::{
    default_recipes, Day, MealSlot, PlanItem, Recipe, RecipeDraft, RecipeUpdate, WeekPlan,
};
use crate::storage::{KeyValueStore, PLANS_KEY, RECIPES_KEY};
use crate::week::{checked_week_start, format_week_range, week_dates, week_start, WeekKey};

/// Read-only view of the store's collections at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub recipes: Vector<Recipe>,
    pub plans: OrdMap<WeekKey, WeekPlan>,
}

pub struct PlanStore<S, C = SystemClock> {
    storage: S,
    clock: C,
    recipes: Vector<Recipe>,
    plans: OrdMap<WeekKey, WeekPlan>,
    /// Always a Monday.
    current_week_start: NaiveDate,
}

impl<S: KeyValueStore, C: Clock> PlanStore<S, C> {
    /// Loads recipes and plans from `storage` and opens on the current week.
    ///
    /// Missing or unreadable data falls back to the starter recipes and an
    /// empty set of plans.
    pub fn open(storage: S, clock: C) -> Self {
        let recipes: Vector<Recipe> = load_or_else(&storage, RECIPES_KEY, || {
            default_recipes().into_iter().collect()
        });
        let plans: OrdMap<WeekKey, WeekPlan> = load_or_else(&storage, PLANS_KEY, OrdMap::new);
        let current_week_start = week_start(clock.today());

        tracing::info!(
            "Loaded {} recipe(s) and {} planned week(s)",
            recipes.len(),
            plans.len()
        );

        Self {
            storage,
            clock,
            recipes,
            plans,
            current_week_start,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            recipes: self.recipes.clone(),
            plans: self.plans.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Recipes
    // ------------------------------------------------------------------

    pub fn recipes(&self) -> &Vector<Recipe> {
        &self.recipes
    }

    pub fn recipe(&self, id: i64) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// First recipe whose name matches, ignoring case.
    pub fn find_recipe_by_name(&self, name: &str) -> Option<&Recipe> {
        let name = name.trim();
        self.recipes
            .iter()
            .find(|recipe| recipe.name.eq_ignore_ascii_case(name))
    }

    /// The recipe a plan entry refers to, if it still exists.
    pub fn recipe_for(&self, item: &PlanItem) -> Option<&Recipe> {
        item.recipe_id().and_then(|id| self.recipe(id))
    }

    /// Appends a recipe built from `draft` and returns its id.
    pub fn add_recipe(&mut self, draft: RecipeDraft) -> i64 {
        let id = self.next_recipe_id();
        let mut next = self.recipes.clone();
        next.push_back(Recipe::from_draft(id, draft));
        self.recipes = next;

        tracing::debug!("Added recipe {}", id);
        self.save_recipes();
        id
    }

    /// Removes the recipe with `id`. Plan entries referring to it are kept.
    pub fn delete_recipe(&mut self, id: i64) -> bool {
        let Some(index) = self.recipe_index(id) else {
            return false;
        };
        let mut next = self.recipes.clone();
        next.remove(index);
        self.recipes = next;

        tracing::debug!("Deleted recipe {}", id);
        self.save_recipes();
        true
    }

    /// Replaces the fields given in `update` on the recipe with `id`.
    pub fn update_recipe(&mut self, id: i64, update: RecipeUpdate) -> bool {
        let Some(index) = self.recipe_index(id) else {
            return false;
        };
        let mut recipe = self.recipes[index].clone();
        recipe.apply(update);
        if recipe == self.recipes[index] {
            return false;
        }
        self.recipes = self.recipes.update(index, recipe);

        tracing::debug!("Updated recipe {}", id);
        self.save_recipes();
        true
    }

    fn recipe_index(&self, id: i64) -> Option<usize> {
        self.recipes.iter().position(|recipe| recipe.id == id)
    }

    /// Current time in milliseconds, moved past the largest existing id if
    /// the clock hasn't advanced beyond it. Falls back to the lowest free
    /// positive id when the largest is `i64::MAX`.
    fn next_recipe_id(&self) -> i64 {
        let now = self.clock.now_millis();
        match self.recipes.iter().map(|recipe| recipe.id).max() {
            Some(max) if max >= now => max.checked_add(1).unwrap_or_else(|| {
                (1..i64::MAX)
                    .find(|id| self.recipe_index(*id).is_none())
                    .unwrap_or(now)
            }),
            _ => now,
        }
    }

    // ------------------------------------------------------------------
    // Week navigation
    // ------------------------------------------------------------------

    pub fn current_week_start(&self) -> NaiveDate {
        self.current_week_start
    }

    pub fn current_week_key(&self) -> WeekKey {
        WeekKey::for_date(self.current_week_start)
    }

    pub fn current_week_dates(&self) -> [NaiveDate; 7] {
        week_dates(self.current_week_start)
    }

    pub fn current_week_label(&self) -> String {
        format_week_range(self.current_week_start)
    }

    /// Returns `false`, staying put, at the end of the supported date range.
    pub fn go_to_next_week(&mut self) -> bool {
        self.shift_week(Duration::days(7))
    }

    /// Returns `false`, staying put, at the start of the supported date range.
    pub fn go_to_previous_week(&mut self) -> bool {
        self.shift_week(Duration::days(-7))
    }

    fn shift_week(&mut self, by: Duration) -> bool {
        match self.current_week_start.checked_add_signed(by) {
            Some(date) => self.go_to_week(date),
            None => false,
        }
    }

    /// Moves to the week containing today. Returns `false` if already there.
    pub fn go_to_current_week(&mut self) -> bool {
        self.go_to_week(self.clock.today())
    }

    /// Moves to the week containing `date`. Returns `false` if already there
    /// or if part of that week falls outside the supported date range.
    pub fn go_to_week(&mut self, date: NaiveDate) -> bool {
        let Some(start) = checked_week_start(date) else {
            tracing::warn!(
                "Week of {} is out of range, staying on {}",
                date,
                self.current_week_key()
            );
            return false;
        };
        if start == self.current_week_start {
            return false;
        }
        self.current_week_start = start;
        true
    }

    // ------------------------------------------------------------------
    // Plans
    // ------------------------------------------------------------------

    /// Plan of the week being viewed; an empty grid if it was never edited.
    pub fn current_plan(&self) -> Cow<'_, WeekPlan> {
        self.plan_for(self.current_week_key())
    }

    pub fn plan_for(&self, key: WeekKey) -> Cow<'_, WeekPlan> {
        match self.plans.get(&key) {
            Some(plan) => Cow::Borrowed(plan),
            None => Cow::Owned(WeekPlan::empty()),
        }
    }

    /// Weeks that have been edited, oldest first.
    pub fn planned_weeks(&self) -> Vec<WeekKey> {
        self.plans.keys().copied().collect()
    }

    /// Adds a reference to `recipe`, unless the slot already has one.
    pub fn add_recipe_to_slot(&mut self, day: Day, slot: MealSlot, recipe: &Recipe) -> bool {
        let key = self.current_week_key();
        let Some(next) = self.current_plan().with_recipe(day, slot, recipe) else {
            tracing::debug!("Recipe {} already in {} {} of {}", recipe.id, day, slot, key);
            return false;
        };

        tracing::debug!("Adding recipe {} to {} {} of {}", recipe.id, day, slot, key);
        self.replace_week(key, next);
        true
    }

    /// Adds a free-text entry. Blank text is ignored; other text is trimmed.
    pub fn add_custom_item_to_slot(&mut self, day: Day, slot: MealSlot, text: &str) -> bool {
        let key = self.current_week_key();
        let base_id = format!("custom-{}", self.clock.now_millis());
        let next = {
            let plan = self.current_plan();
            let id = plan.unique_item_id(day, slot, &base_id);
            plan.with_custom_item(day, slot, id, text)
        };
        let Some(next) = next else {
            return false;
        };

        tracing::debug!("Adding custom item to {} {} of {}", day, slot, key);
        self.replace_week(key, next);
        true
    }

    /// Removes the entry with `item_id` from the slot, if present.
    pub fn remove_item_from_slot(&mut self, day: Day, slot: MealSlot, item_id: &str) -> bool {
        let key = self.current_week_key();
        let Some(next) = self
            .plans
            .get(&key)
            .and_then(|plan| plan.without_item(day, slot, item_id))
        else {
            return false;
        };

        tracing::debug!("Removing item {} from {} {} of {}", item_id, day, slot, key);
        self.replace_week(key, next);
        true
    }

    fn replace_week(&mut self, key: WeekKey, plan: WeekPlan) {
        self.plans = self.plans.update(key, plan);
        self.save_plans();
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn save_recipes(&mut self) {
        save(&mut self.storage, RECIPES_KEY, &self.recipes);
    }

    fn save_plans(&mut self) {
        save(&mut self.storage, PLANS_KEY, &self.plans);
    }
}

fn load_or_else<S, T, F>(storage: &S, key: &str, fallback: F) -> T
where
    S: KeyValueStore,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match storage.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse stored '{}', using defaults: {}", key, e);
                fallback()
            }
        },
        Ok(None) => {
            tracing::info!("No stored '{}' found, using defaults", key);
            fallback()
        }
        Err(e) => {
            tracing::warn!("Failed to read '{}', using defaults: {}", key, e);
            fallback()
        }
    }
}

fn save<S: KeyValueStore, T: Serialize>(storage: &mut S, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Failed to serialize '{}': {}", key, e);
            return;
        }
    };
    match storage.set(key, &json) {
        Ok(()) => tracing::debug!("Saved '{}' ({} bytes)", key, json.len()),
        Err(e) => tracing::warn!("Failed to save '{}': {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Wednesday 2025-01-08; its week starts Monday 2025-01-06.
    fn wednesday_clock() -> FixedClock {
        FixedClock::at(date(2025, 1, 8))
    }

    fn open(clock: &FixedClock) -> PlanStore<MemoryStore, &FixedClock> {
        PlanStore::open(MemoryStore::new(), clock)
    }

    fn soup() -> Recipe {
        Recipe::new(5, "Soup")
    }

    fn ids(items: &[PlanItem]) -> Vec<&str> {
        items.iter().map(PlanItem::id).collect()
    }

    #[test]
    fn test_open_empty_storage_uses_defaults() {
        let clock = wednesday_clock();
        let store = open(&clock);

        let names: Vec<&str> = store.recipes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names[0], "Spaghetti Carbonara");
        assert_eq!(names.len(), 4);
        assert!(store.planned_weeks().is_empty());
        assert_eq!(store.current_week_start(), date(2025, 1, 6));
        assert_eq!(store.storage().writes(), 0);
    }

    #[test]
    fn test_open_corrupt_data_falls_back() {
        let clock = wednesday_clock();
        let storage = MemoryStore::new()
            .with_entry(RECIPES_KEY, "not json")
            .with_entry(PLANS_KEY, r#"{"2025-01-07": {}}"#);
        let store = PlanStore::open(storage, &clock);

        assert_eq!(store.recipes().len(), 4);
        assert!(store.planned_weeks().is_empty());
    }

    #[test]
    fn test_open_read_failure_falls_back() {
        let clock = wednesday_clock();
        let mut storage = MemoryStore::new()
            .with_entry(RECIPES_KEY, r#"[{"id": 9, "name": "Stew"}]"#)
            .with_entry(PLANS_KEY, r#"{"2025-01-06": {}}"#);
        storage.set_fail_reads(true);
        let store = PlanStore::open(storage, &clock);

        assert_eq!(store.recipes().iter().cloned().collect::<Vec<_>>(), default_recipes());
        assert!(store.planned_weeks().is_empty());
    }

    #[test]
    fn test_open_unreadable_files_fall_back() {
        let clock = wednesday_clock();
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStore::new(temp_dir.path());
        std::fs::create_dir(storage.path(RECIPES_KEY)).unwrap();
        std::fs::create_dir(storage.path(PLANS_KEY)).unwrap();

        let store = PlanStore::open(storage, &clock);
        assert_eq!(store.recipes().len(), default_recipes().len());
        assert!(store.planned_weeks().is_empty());
    }

    #[test]
    fn test_open_reads_stored_data() {
        let clock = wednesday_clock();
        let storage = MemoryStore::new()
            .with_entry(
                RECIPES_KEY,
                r#"[{"id": 9, "name": "Stew", "ingredients": "beef\ncarrots", "instructions": "Simmer."}]"#,
            )
            .with_entry(
                PLANS_KEY,
                r#"{"2025-01-06": {"Monday": {"dinner": [{"type": "recipe", "id": "recipe-9", "recipeId": 9, "recipeName": "Stew"}]}}}"#,
            );
        let store = PlanStore::open(storage, &clock);

        assert_eq!(store.recipes().len(), 1);
        assert_eq!(store.recipe(9).unwrap().ingredient_lines(), vec!["beef", "carrots"]);

        let plan = store.current_plan();
        assert_eq!(plan.items(Day::Monday, MealSlot::Dinner)[0].label(), "Stew");
        assert_eq!(plan.iter().count(), 35);
    }

    #[test]
    fn test_current_plan_for_untouched_week_is_empty_grid() {
        let clock = wednesday_clock();
        let store = open(&clock);

        let plan = store.current_plan();
        for day in Day::ALL {
            for slot in MealSlot::ALL {
                assert!(plan.items(day, slot).is_empty());
            }
        }
        assert!(matches!(plan, Cow::Owned(_)));
        assert!(store.planned_weeks().is_empty());
        assert_eq!(store.storage().writes(), 0);
    }

    #[test]
    fn test_add_recipe_assigns_timestamp_id() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        let id = store.add_recipe(RecipeDraft::new("Pancakes").with_ingredients("flour\nmilk"));

        assert_eq!(id, clock.now_millis());
        assert_eq!(store.recipes().last().unwrap().name, "Pancakes");
        assert_eq!(store.storage().writes(), 1);
        assert!(store.storage().raw(RECIPES_KEY).unwrap().contains("Pancakes"));
    }

    #[test]
    fn test_add_recipe_same_millisecond_gets_distinct_ids() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        let first = store.add_recipe(RecipeDraft::new("A"));
        let second = store.add_recipe(RecipeDraft::new("B"));

        assert_ne!(first, second);
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_add_recipe_after_max_id() {
        let clock = wednesday_clock();
        let storage = MemoryStore::new().with_entry(
            RECIPES_KEY,
            r#"[{"id": 9223372036854775807, "name": "Last"}, {"id": 1, "name": "First"}]"#,
        );
        let mut store = PlanStore::open(storage, &clock);

        let id = store.add_recipe(RecipeDraft::new("Next"));
        assert_eq!(id, 2);
        let id = store.add_recipe(RecipeDraft::new("After"));
        assert_eq!(id, 3);
        assert_eq!(store.recipes().len(), 4);
    }

    #[test]
    fn test_add_recipe_allows_empty_name() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        let id = store.add_recipe(RecipeDraft::default());
        assert_eq!(store.recipe(id).unwrap().name, "");
    }

    #[test]
    fn test_delete_recipe() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        assert!(store.delete_recipe(2));
        assert!(store.recipe(2).is_none());
        assert_eq!(store.recipes().len(), 3);
        assert_eq!(store.storage().writes(), 1);

        // Absent id: no change, no write
        assert!(!store.delete_recipe(2));
        assert_eq!(store.storage().writes(), 1);
    }

    #[test]
    fn test_delete_recipe_keeps_plan_references() {
        let clock = wednesday_clock();
        let mut store = open(&clock);
        let curry = store.recipe(2).unwrap().clone();

        store.add_recipe_to_slot(Day::Tuesday, MealSlot::Dinner, &curry);
        store.delete_recipe(2);

        let plan = store.current_plan();
        let item = &plan.items(Day::Tuesday, MealSlot::Dinner)[0];
        assert_eq!(item.label(), "Chicken Curry");
        assert!(store.recipe_for(item).is_none());
    }

    #[test]
    fn test_update_recipe_merges_fields() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        let changed = store.update_recipe(
            4,
            RecipeUpdate {
                ingredients: Some("lentils\ncarrots".into()),
                ..RecipeUpdate::default()
            },
        );

        assert!(changed);
        let recipe = store.recipe(4).unwrap();
        assert_eq!(recipe.name, "Lentil Soup");
        assert_eq!(recipe.ingredients, "lentils\ncarrots");
        assert_eq!(recipe.instructions, "Hearty and healthy lentil soup.");
        assert_eq!(store.storage().writes(), 1);
    }

    #[test]
    fn test_update_recipe_missing_or_unchanged_is_noop() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        let rename = RecipeUpdate {
            name: Some("Anything".into()),
            ..RecipeUpdate::default()
        };
        assert!(!store.update_recipe(999, rename));
        assert!(!store.update_recipe(1, RecipeUpdate::default()));
        assert_eq!(store.storage().writes(), 0);
    }

    #[test]
    fn test_recipe_name_snapshot_survives_rename() {
        let clock = wednesday_clock();
        let mut store = open(&clock);
        let carbonara = store.recipe(1).unwrap().clone();
        store.add_recipe_to_slot(Day::Monday, MealSlot::Dinner, &carbonara);

        store.update_recipe(
            1,
            RecipeUpdate {
                name: Some("Carbonara".into()),
                ..RecipeUpdate::default()
            },
        );

        let plan = store.current_plan();
        let item = &plan.items(Day::Monday, MealSlot::Dinner)[0];
        assert_eq!(item.label(), "Spaghetti Carbonara");
        assert_eq!(store.recipe_for(item).unwrap().name, "Carbonara");
    }

    #[test]
    fn test_find_recipe_by_name() {
        let clock = wednesday_clock();
        let store = open(&clock);

        assert_eq!(store.find_recipe_by_name("tofu scramble").unwrap().id, 3);
        assert!(store.find_recipe_by_name("Sushi").is_none());
    }

    #[test]
    fn test_scenario_recipe_then_custom_item() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        assert!(store.add_recipe_to_slot(Day::Monday, MealSlot::Lunch, &soup()));
        {
            let plan = store.current_plan();
            let lunch = plan.items(Day::Monday, MealSlot::Lunch);
            assert_eq!(lunch.len(), 1);
            assert!(matches!(
                &lunch[0],
                PlanItem::Recipe { recipe_id: 5, recipe_name, .. } if recipe_name == "Soup"
            ));
        }

        assert!(store.add_custom_item_to_slot(Day::Monday, MealSlot::Lunch, "  Leftovers  "));
        let plan = store.current_plan();
        let lunch = plan.items(Day::Monday, MealSlot::Lunch);
        assert_eq!(lunch.len(), 2);
        assert!(matches!(
            &lunch[1],
            PlanItem::Custom { text, .. } if text == "Leftovers"
        ));
    }

    #[test]
    fn test_add_recipe_to_slot_is_idempotent() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        assert!(store.add_recipe_to_slot(Day::Friday, MealSlot::Dinner, &soup()));
        let after_first = store.snapshot();
        assert!(!store.add_recipe_to_slot(Day::Friday, MealSlot::Dinner, &soup()));

        assert_eq!(store.snapshot(), after_first);
        assert_eq!(store.current_plan().items(Day::Friday, MealSlot::Dinner).len(), 1);
        assert_eq!(store.storage().writes(), 1);
    }

    #[test]
    fn test_add_custom_item_blank_is_noop() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        assert!(!store.add_custom_item_to_slot(Day::Monday, MealSlot::Lunch, ""));
        assert!(!store.add_custom_item_to_slot(Day::Monday, MealSlot::Lunch, " \t\n"));
        assert!(store.planned_weeks().is_empty());
        assert_eq!(store.storage().writes(), 0);
    }

    #[test]
    fn test_custom_item_ids_unique_within_slot() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        // Clock doesn't advance between the two inserts
        store.add_custom_item_to_slot(Day::Monday, MealSlot::Lunch, "Bread");
        store.add_custom_item_to_slot(Day::Monday, MealSlot::Lunch, "Butter");

        let plan = store.current_plan();
        let lunch = plan.items(Day::Monday, MealSlot::Lunch);
        assert_ne!(lunch[0].id(), lunch[1].id());
        assert_eq!(lunch[0].id(), format!("custom-{}", clock.now_millis()));
    }

    #[test]
    fn test_remove_item_keeps_order() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        for text in ["A", "B", "C"] {
            store.add_custom_item_to_slot(Day::Thursday, MealSlot::Breakfast, text);
            clock.advance_millis(1);
        }
        let b_id = store.current_plan().items(Day::Thursday, MealSlot::Breakfast)[1]
            .id()
            .to_string();

        assert!(store.remove_item_from_slot(Day::Thursday, MealSlot::Breakfast, &b_id));

        let plan = store.current_plan();
        let labels: Vec<&str> = plan
            .items(Day::Thursday, MealSlot::Breakfast)
            .iter()
            .map(PlanItem::label)
            .collect();
        assert_eq!(labels, vec!["A", "C"]);
    }

    #[test]
    fn test_remove_item_missing_targets_are_noops() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        // Untouched week: nothing to remove and the week stays unplanned
        assert!(!store.remove_item_from_slot(Day::Monday, MealSlot::Lunch, "recipe-5"));
        assert!(store.planned_weeks().is_empty());

        store.add_recipe_to_slot(Day::Monday, MealSlot::Lunch, &soup());
        assert!(!store.remove_item_from_slot(Day::Monday, MealSlot::Dinner, "recipe-5"));
        assert!(!store.remove_item_from_slot(Day::Monday, MealSlot::Lunch, "recipe-6"));
        assert_eq!(store.storage().writes(), 1);

        assert!(store.remove_item_from_slot(Day::Monday, MealSlot::Lunch, "recipe-5"));
        assert!(ids(store.current_plan().items(Day::Monday, MealSlot::Lunch)).is_empty());
    }

    #[test]
    fn test_next_then_previous_returns_to_start() {
        let clock = wednesday_clock();
        let mut store = open(&clock);
        let start = store.current_week_start();

        store.go_to_next_week();
        assert_eq!(store.current_week_start(), date(2025, 1, 13));
        assert_eq!(store.current_week_key().to_string(), "2025-01-13");

        store.go_to_previous_week();
        assert_eq!(store.current_week_start(), start);
    }

    #[test]
    fn test_go_to_current_week() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        // Already on today's week
        assert!(!store.go_to_current_week());

        store.go_to_previous_week();
        store.go_to_previous_week();
        let before = store.snapshot();
        assert!(store.go_to_current_week());
        assert!(!store.go_to_current_week());
        assert_eq!(store.current_week_start(), date(2025, 1, 6));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.storage().writes(), 0);

        // Time passes into the next week
        clock.set_date(date(2025, 1, 14));
        assert!(store.go_to_current_week());
        assert_eq!(store.current_week_start(), date(2025, 1, 13));
    }

    #[test]
    fn test_go_to_week_aligns_to_monday() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        assert!(store.go_to_week(date(2025, 3, 9)));
        assert_eq!(store.current_week_start(), date(2025, 3, 3));
        assert!(!store.go_to_week(date(2025, 3, 5)));
    }

    #[test]
    fn test_navigation_stops_at_date_range_ends() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        let last = week_start(NaiveDate::MAX - Duration::days(6));
        assert!(store.go_to_week(last));
        assert!(!store.go_to_next_week());
        assert_eq!(store.current_week_start(), last);
        assert_eq!(store.current_week_dates()[0], last);

        let first = week_start(NaiveDate::MIN + Duration::days(6));
        assert!(store.go_to_week(first + Duration::days(7)));
        assert!(store.go_to_previous_week());
        assert!(!store.go_to_previous_week());
        assert_eq!(store.current_week_start(), first);
    }

    #[test]
    fn test_go_to_week_out_of_range_stays_put() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        // The week containing the last representable date may not be complete
        let max_week_complete = checked_week_start(NaiveDate::MAX).is_some();
        assert_eq!(store.go_to_week(NaiveDate::MAX), max_week_complete);
        if !max_week_complete {
            assert_eq!(store.current_week_start(), date(2025, 1, 6));
        }
    }

    #[test]
    fn test_current_week_dates_and_label() {
        let clock = wednesday_clock();
        let store = open(&clock);

        let dates = store.current_week_dates();
        assert_eq!(dates[0], date(2025, 1, 6));
        assert_eq!(dates[6], date(2025, 1, 12));
        assert_eq!(store.current_week_label(), "Jan 6 - Jan 12, 2025");
    }

    #[test]
    fn test_mutations_target_week_current_at_call_time() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        store.add_recipe_to_slot(Day::Monday, MealSlot::Lunch, &soup());
        store.go_to_next_week();
        store.add_custom_item_to_slot(Day::Monday, MealSlot::Lunch, "Leftovers");

        let this_week: WeekKey = "2025-01-06".parse().unwrap();
        let next_week: WeekKey = "2025-01-13".parse().unwrap();
        assert_eq!(store.planned_weeks(), vec![this_week, next_week]);
        assert_eq!(
            store.plan_for(this_week).items(Day::Monday, MealSlot::Lunch)[0].label(),
            "Soup"
        );
        assert_eq!(
            store.plan_for(next_week).items(Day::Monday, MealSlot::Lunch)[0].label(),
            "Leftovers"
        );
    }

    #[test]
    fn test_snapshot_unaffected_by_later_mutation() {
        let clock = wednesday_clock();
        let mut store = open(&clock);
        let before = store.snapshot();

        store.add_recipe_to_slot(Day::Monday, MealSlot::Lunch, &soup());
        store.add_recipe(RecipeDraft::new("Toast"));

        assert!(before.plans.is_empty());
        assert_eq!(before.recipes.len(), 4);
    }

    #[test]
    fn test_reload_reproduces_state() {
        let clock = wednesday_clock();
        let mut store = open(&clock);

        store.add_recipe(RecipeDraft::new("Toast").with_ingredients("bread"));
        store.add_recipe_to_slot(Day::Monday, MealSlot::Lunch, &soup());
        store.add_custom_item_to_slot(Day::Monday, MealSlot::Lunch, "Salad");
        store.go_to_previous_week();
        store.add_custom_item_to_slot(Day::Sunday, MealSlot::Dinner, "Roast");
        let before = store.snapshot();

        let reopened = PlanStore::open(store.into_storage(), &clock);
        assert_eq!(reopened.snapshot(), before);
    }

    #[test]
    fn test_reload_from_files() {
        let temp_dir = TempDir::new().unwrap();
        let clock = wednesday_clock();

        let mut store = PlanStore::open(FileStore::new(temp_dir.path()), &clock);
        store.add_recipe_to_slot(Day::Saturday, MealSlot::AfternoonSnack, &soup());
        store.delete_recipe(3);
        let before = store.snapshot();
        drop(store);

        let reopened = PlanStore::open(FileStore::new(temp_dir.path()), &clock);
        assert_eq!(reopened.snapshot(), before);
    }

    #[test]
    fn test_write_failure_keeps_in_memory_state() {
        let clock = wednesday_clock();
        let mut storage = MemoryStore::new();
        storage.set_fail_writes(true);
        let mut store = PlanStore::open(storage, &clock);

        assert!(store.add_recipe_to_slot(Day::Monday, MealSlot::Lunch, &soup()));
        let id = store.add_recipe(RecipeDraft::new("Toast"));

        assert_eq!(store.current_plan().items(Day::Monday, MealSlot::Lunch).len(), 1);
        assert!(store.recipe(id).is_some());
        assert!(store.storage().raw(PLANS_KEY).is_none());
    }
}
