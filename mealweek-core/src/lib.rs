//! Mealweek Core Library
//!
//! Recipes, weekly meal plans and the store that owns them.

pub mod clock;
pub mod models;
pub mod storage;
pub mod store;
pub mod week;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::FixedClock;
pub use models::{
    default_recipes, Day, MealSlot, PlanItem, Recipe, RecipeDraft, RecipeUpdate, WeekPlan,
};
pub use storage::{FileStore, KeyValueStore, StorageError, PLANS_KEY, RECIPES_KEY};
#[cfg(any(test, feature = "test-util"))]
pub use storage::MemoryStore;
pub use store::{PlanStore, StoreSnapshot};
pub use week::{
    checked_week_start, format_week_range, week_dates, week_start, WeekKey, WeekKeyError,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
