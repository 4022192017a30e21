use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::day::Day;
use super::meal_slot::MealSlot;
use super::plan_item::PlanItem;
use super::recipe::Recipe;

type SlotMap = BTreeMap<MealSlot, Vec<PlanItem>>;

/// The full day × meal-slot grid for one week.
///
/// Every day and slot is always present; a slot with nothing planned holds an
/// empty list. Updates never modify a plan in place: `with_*`/`without_*`
/// return the next plan, or `None` when the update would change nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekPlan {
    days: BTreeMap<Day, SlotMap>,
}

impl WeekPlan {
    /// A plan with all seven days and five slots, each empty.
    pub fn empty() -> Self {
        let days = Day::ALL
            .into_iter()
            .map(|day| {
                let slots = MealSlot::ALL
                    .into_iter()
                    .map(|slot| (slot, Vec::new()))
                    .collect();
                (day, slots)
            })
            .collect();
        Self { days }
    }

    pub fn items(&self, day: Day, slot: MealSlot) -> &[PlanItem] {
        self.days
            .get(&day)
            .and_then(|slots| slots.get(&slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates every slot in day-then-slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Day, MealSlot, &[PlanItem])> + '_ {
        Day::ALL.into_iter().flat_map(move |day| {
            MealSlot::ALL
                .into_iter()
                .map(move |slot| (day, slot, self.items(day, slot)))
        })
    }

    pub fn item_count(&self) -> usize {
        self.iter().map(|(_, _, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    pub fn contains_recipe(&self, day: Day, slot: MealSlot, recipe_id: i64) -> bool {
        self.items(day, slot)
            .iter()
            .any(|item| item.recipe_id() == Some(recipe_id))
    }

    /// Returns `base` if no item in the slot uses it, otherwise `base-N` for the
    /// first free `N`.
    pub fn unique_item_id(&self, day: Day, slot: MealSlot, base: &str) -> String {
        let items = self.items(day, slot);
        let taken = |candidate: &str| items.iter().any(|item| item.id() == candidate);

        if !taken(base) {
            return base.to_string();
        }
        (1..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Appends a reference to `recipe`, unless the slot already references it.
    pub fn with_recipe(&self, day: Day, slot: MealSlot, recipe: &Recipe) -> Option<Self> {
        if self.contains_recipe(day, slot, recipe.id) {
            return None;
        }
        Some(self.with_item(day, slot, PlanItem::recipe_ref(recipe)))
    }

    /// Appends a custom entry with the trimmed `text`; `None` for blank text.
    pub fn with_custom_item(
        &self,
        day: Day,
        slot: MealSlot,
        id: impl Into<String>,
        text: &str,
    ) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(self.with_item(day, slot, PlanItem::custom(id, text)))
    }

    /// Removes the entry with `item_id`; `None` if the slot has no such entry.
    pub fn without_item(&self, day: Day, slot: MealSlot, item_id: &str) -> Option<Self> {
        if !self.items(day, slot).iter().any(|item| item.id() == item_id) {
            return None;
        }
        let mut next = self.clone();
        next.slot_mut(day, slot).retain(|item| item.id() != item_id);
        Some(next)
    }

    fn with_item(&self, day: Day, slot: MealSlot, item: PlanItem) -> Self {
        let mut next = self.clone();
        next.slot_mut(day, slot).push(item);
        next
    }

    fn slot_mut(&mut self, day: Day, slot: MealSlot) -> &mut Vec<PlanItem> {
        self.days.entry(day).or_default().entry(slot).or_default()
    }
}

impl Default for WeekPlan {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for WeekPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.days.serialize(serializer)
    }
}

/// Stored form; days, slots and slot lists may be missing or null.
type StoredWeekPlan = BTreeMap<Day, Option<BTreeMap<MealSlot, Option<Vec<PlanItem>>>>>;

impl<'de> Deserialize<'de> for WeekPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredWeekPlan::deserialize(deserializer)?;
        let mut plan = WeekPlan::empty();
        for (day, slots) in stored {
            for (slot, items) in slots.unwrap_or_default() {
                *plan.slot_mut(day, slot) = items.unwrap_or_default();
            }
        }
        Ok(plan)
    }
}

impl fmt::Display for WeekPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in Day::ALL {
            writeln!(f, "{}", day)?;
            for slot in MealSlot::ALL {
                let labels: Vec<&str> = self.items(day, slot).iter().map(PlanItem::label).collect();
                writeln!(f, "  {}: {}", slot.label(), labels.join(", "))?;
            }
        }
        Ok(())
    }
}
