use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A day of a Monday-first planning week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Zero-based position within the week (Monday = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid day '{}'. Valid options: Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_from_str_case_insensitive() {
        assert_eq!(Day::from_str("monday").unwrap(), Day::Monday);
        assert_eq!(Day::from_str("SUNDAY").unwrap(), Day::Sunday);
        assert_eq!(Day::from_str("Wednesday").unwrap(), Day::Wednesday);
        assert!(Day::from_str("Funday").is_err());
    }

    #[test]
    fn test_day_index_matches_order() {
        for (i, day) in Day::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
        }
    }

    #[test]
    fn test_day_json_name() {
        assert_eq!(serde_json::to_string(&Day::Friday).unwrap(), "\"Friday\"");
    }
}
