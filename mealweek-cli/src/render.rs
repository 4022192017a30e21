//! Plain-text views of the store for terminal output.

use mealweek_core::{Clock, Day, KeyValueStore, MealSlot, PlanItem, PlanStore, Recipe};
use std::fmt::Write;

pub const MISSING_RECIPE: &str = "(recipe no longer available)";

/// Read-only grid of the store's current week.
pub fn render_week<S: KeyValueStore, C: Clock>(store: &PlanStore<S, C>) -> String {
    let plan = store.current_plan();
    let dates = store.current_week_dates();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Week of: {} ({})",
        store.current_week_label(),
        store.current_week_key()
    );

    for day in Day::ALL {
        let header = format!("{} ({})", day, dates[day.index()].format("%b %-d"));
        let _ = writeln!(out, "\n{}", header);
        let _ = writeln!(out, "{}", "-".repeat(header.len()));

        for slot in MealSlot::ALL {
            let _ = writeln!(out, "  {}:", slot.label());
            let items = plan.items(day, slot);
            if items.is_empty() {
                let _ = writeln!(out, "    Empty");
            }
            for item in items {
                let _ = writeln!(out, "    - {}  [{}]", item_label(store, item), item.id());
            }
        }
    }

    out
}

/// Display text for an entry, flagging references to deleted recipes.
pub fn item_label<S: KeyValueStore, C: Clock>(store: &PlanStore<S, C>, item: &PlanItem) -> String {
    match item {
        PlanItem::Recipe { recipe_name, .. } if store.recipe_for(item).is_none() => {
            format!("{} {}", recipe_name, MISSING_RECIPE)
        }
        _ => item.label().to_string(),
    }
}

/// One line per recipe plus a total.
pub fn render_recipe_list<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> String {
    let mut out = String::new();
    let mut count = 0;
    for recipe in recipes {
        let lines = recipe.ingredient_lines().len();
        let _ = writeln!(
            out,
            "  {:>14}  {} ({} ingredient{})",
            recipe.id,
            recipe.name,
            lines,
            if lines == 1 { "" } else { "s" }
        );
        count += 1;
    }
    let _ = writeln!(out, "\nTotal: {} recipe(s)", count);
    out
}
