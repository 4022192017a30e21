mod day;
mod meal_slot;
mod plan_item;
mod recipe;
mod week_plan;

pub use day::Day;
pub use meal_slot::MealSlot;
pub use plan_item::PlanItem;
pub use recipe::{default_recipes, Recipe, RecipeDraft, RecipeUpdate};
pub use week_plan::WeekPlan;
