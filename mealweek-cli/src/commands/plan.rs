use chrono::{Duration, NaiveDate};
use clap::{Args, Subcommand};
use std::str::FromStr;

use mealweek_core::{checked_week_start, Clock, Day, KeyValueStore, MealSlot, PlanStore};

use super::recipe::resolve_recipe;
use super::OutputFormat;
use crate::render::{item_label, render_week};

/// Which week a plan command works on, relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekSelector {
    #[default]
    Current,
    Next,
    Previous,
    /// Whole weeks forward (positive) or back (negative).
    Offset(i32),
    /// The week containing this date.
    Containing(NaiveDate),
}

impl WeekSelector {
    /// Navigates `store` to the selected week. Fails, leaving `store` on the
    /// current week, if the target lies outside the supported date range.
    pub fn apply<S: KeyValueStore, C: Clock>(
        &self,
        store: &mut PlanStore<S, C>,
    ) -> Result<(), String> {
        store.go_to_current_week();
        let this_week = store.current_week_start();

        let target = match *self {
            WeekSelector::Current => return Ok(()),
            WeekSelector::Next => this_week.checked_add_signed(Duration::weeks(1)),
            WeekSelector::Previous => this_week.checked_sub_signed(Duration::weeks(1)),
            WeekSelector::Offset(weeks) => {
                this_week.checked_add_signed(Duration::weeks(i64::from(weeks)))
            }
            WeekSelector::Containing(date) => Some(date),
        };

        match target.filter(|date| checked_week_start(*date).is_some()) {
            Some(date) => {
                store.go_to_week(date);
                Ok(())
            }
            None => Err("Week is outside the supported date range.".to_string()),
        }
    }
}

impl FromStr for WeekSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "current" | "this" => return Ok(WeekSelector::Current),
            "next" => return Ok(WeekSelector::Next),
            "prev" | "previous" | "last" => return Ok(WeekSelector::Previous),
            _ => {}
        }
        if s.starts_with('+') || s.starts_with('-') {
            if let Ok(weeks) = s.parse::<i32>() {
                return Ok(WeekSelector::Offset(weeks));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(WeekSelector::Containing)
            .map_err(|_| {
                format!(
                    "Invalid week '{}'. Use current, next, prev, an offset like +2, or a date (YYYY-MM-DD).",
                    s
                )
            })
    }
}

#[derive(Args)]
pub struct PlanCommand {
    #[command(subcommand)]
    pub command: PlanSubcommand,
}

#[derive(Subcommand)]
pub enum PlanSubcommand {
    /// Show a week's plan
    Show {
        /// Week: current, next, prev, +N/-N, or a date (YYYY-MM-DD)
        #[arg(long, short, default_value = "current")]
        week: WeekSelector,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a recipe to a day and meal slot
    AddRecipe {
        /// Day (Monday..Sunday)
        day: String,

        /// Meal slot (breakfast, morningSnack, lunch, afternoonSnack, dinner)
        slot: String,

        /// Recipe ID or name
        recipe: String,

        /// Week: current, next, prev, +N/-N, or a date (YYYY-MM-DD)
        #[arg(long, short, default_value = "current")]
        week: WeekSelector,
    },

    /// Add a free-text item to a day and meal slot
    AddItem {
        /// Day (Monday..Sunday)
        day: String,

        /// Meal slot (breakfast, morningSnack, lunch, afternoonSnack, dinner)
        slot: String,

        /// Item text
        text: String,

        /// Week: current, next, prev, +N/-N, or a date (YYYY-MM-DD)
        #[arg(long, short, default_value = "current")]
        week: WeekSelector,
    },

    /// Remove an item from a day and meal slot
    Remove {
        /// Day (Monday..Sunday)
        day: String,

        /// Meal slot (breakfast, morningSnack, lunch, afternoonSnack, dinner)
        slot: String,

        /// Item ID as shown by `plan show`
        item_id: String,

        /// Week: current, next, prev, +N/-N, or a date (YYYY-MM-DD)
        #[arg(long, short, default_value = "current")]
        week: WeekSelector,
    },

    /// List weeks that have plans
    Weeks {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl PlanCommand {
    pub fn run<S: KeyValueStore, C: Clock>(
        &self,
        store: &mut PlanStore<S, C>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PlanSubcommand::Show { week, format } => {
                week.apply(store)?;
                match format {
                    OutputFormat::Json => {
                        let output = serde_json::json!({
                            "week": store.current_week_key(),
                            "dates": store.current_week_dates(),
                            "plan": store.current_plan(),
                        });
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    OutputFormat::Text => print!("{}", render_week(store)),
                }
                Ok(())
            }

            PlanSubcommand::AddRecipe {
                day,
                slot,
                recipe,
                week,
            } => {
                let (day, slot) = parse_day_slot(day, slot)?;
                let recipe = resolve_recipe(store, recipe)?;

                week.apply(store)?;
                if store.add_recipe_to_slot(day, slot, &recipe) {
                    println!(
                        "Added '{}' to {} {} (week of {})",
                        recipe.name,
                        day,
                        slot.label(),
                        store.current_week_key()
                    );
                } else {
                    println!("'{}' is already in {} {}", recipe.name, day, slot.label());
                }
                Ok(())
            }

            PlanSubcommand::AddItem {
                day,
                slot,
                text,
                week,
            } => {
                let (day, slot) = parse_day_slot(day, slot)?;
                if text.trim().is_empty() {
                    return Err("Item text cannot be empty.".into());
                }

                week.apply(store)?;
                store.add_custom_item_to_slot(day, slot, text);
                println!(
                    "Added '{}' to {} {} (week of {})",
                    text.trim(),
                    day,
                    slot.label(),
                    store.current_week_key()
                );
                Ok(())
            }

            PlanSubcommand::Remove {
                day,
                slot,
                item_id,
                week,
            } => {
                let (day, slot) = parse_day_slot(day, slot)?;

                week.apply(store)?;
                let label = store
                    .current_plan()
                    .items(day, slot)
                    .iter()
                    .find(|item| item.id() == item_id)
                    .map(|item| item_label(store, item));

                let Some(label) = label else {
                    return Err(format!(
                        "No item '{}' in {} {} (week of {})",
                        item_id,
                        day,
                        slot.label(),
                        store.current_week_key()
                    )
                    .into());
                };

                store.remove_item_from_slot(day, slot, item_id);
                println!("Removed '{}' from {} {}", label, day, slot.label());
                Ok(())
            }

            PlanSubcommand::Weeks { format } => {
                let weeks = store.planned_weeks();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&weeks)?);
                    }
                    OutputFormat::Text => {
                        if weeks.is_empty() {
                            println!("No planned weeks");
                            return Ok(());
                        }
                        for key in &weeks {
                            let count = store.plan_for(*key).item_count();
                            println!(
                                "  {}  {}  ({} item{})",
                                key,
                                mealweek_core::format_week_range(key.start()),
                                count,
                                if count == 1 { "" } else { "s" }
                            );
                        }
                        println!("\nTotal: {} week(s)", weeks.len());
                    }
                }
                Ok(())
            }
        }
    }
}

fn parse_day_slot(day: &str, slot: &str) -> Result<(Day, MealSlot), String> {
    Ok((day.parse()?, slot.parse()?))
}
