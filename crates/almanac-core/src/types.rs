use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// First day of a displayed week.
///
/// Numbered the way weekday indices are (`Sunday = 0`, `Monday = 1`) so the
/// filler offset of a grid is `(weekday_index - week_start + 7) mod 7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeekStart {
    Sunday,
    #[default]
    Monday,
}

impl WeekStart {
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
        }
    }

    #[must_use]
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Sunday),
            1 => Some(Self::Monday),
            _ => None,
        }
    }

    #[must_use]
    pub const fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        }
    }

    /// Number of days between the start of the week and `weekday`.
    #[must_use]
    pub fn offset_of(self, weekday: Weekday) -> u32 {
        (weekday.num_days_from_sunday() + 7 - self.index()) % 7
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
        }
    }
}

impl std::fmt::Display for WeekStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WeekStart {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "sun" | "sunday" => Ok(Self::Sunday),
            "1" | "mon" | "monday" => Ok(Self::Monday),
            other => Err(CoreError::InvalidInput(format!(
                "week start must be 0/sunday or 1/monday, got '{other}'"
            ))),
        }
    }
}

impl Serialize for WeekStart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WeekStart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(u32),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Index(index) => Self::from_index(index).ok_or_else(|| {
                serde::de::Error::custom(format!("week start index must be 0 or 1, got {index}"))
            }),
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Display category carried by every event.
///
/// Unknown values collapse to `Other` rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Work,
    Personal,
    Meeting,
    Reminder,
    #[default]
    #[serde(other)]
    Other,
}

impl EventCategory {
    pub const ALL: [Self; 5] = [
        Self::Work,
        Self::Personal,
        Self::Meeting,
        Self::Reminder,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Meeting => "meeting",
            Self::Reminder => "reminder",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventCategory {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "work" => Self::Work,
            "personal" => Self::Personal,
            "meeting" => Self::Meeting,
            "reminder" => Self::Reminder,
            _ => Self::Other,
        }
    }
}
