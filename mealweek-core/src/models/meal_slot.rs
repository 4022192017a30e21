use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A meal period within a day, in the order it appears on the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast,
        MealSlot::MorningSnack,
        MealSlot::Lunch,
        MealSlot::AfternoonSnack,
        MealSlot::Dinner,
    ];

    /// Identifier used in stored plans.
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morningSnack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoonSnack",
            MealSlot::Dinner => "dinner",
        }
    }

    /// Title-cased label for display ("Morning Snack").
    pub fn label(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::MorningSnack => "Morning Snack",
            MealSlot::Lunch => "Lunch",
            MealSlot::AfternoonSnack => "Afternoon Snack",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "morningsnack" => Ok(MealSlot::MorningSnack),
            "lunch" => Ok(MealSlot::Lunch),
            "afternoonsnack" => Ok(MealSlot::AfternoonSnack),
            "dinner" => Ok(MealSlot::Dinner),
            _ => Err(format!(
                "Invalid meal slot '{}'. Valid options: breakfast, morningSnack, lunch, afternoonSnack, dinner",
                s
            )),
        }
    }
}
