//! Core schedule shapes shared across the engine.
//!
//! Field names and enumerated string values on these types are the wire
//! compatibility contract: any serialization layer wrapping this engine must
//! produce exactly `dateISO`, `optedIn`, `isEditable`, `isServed`,
//! `isException`, `inCurrentMonth`, `BREAKFAST`, and so on. The serde
//! attributes here pin that contract.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// The three meals a subscriber can opt in or out of. Fixed, closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// All meal types, in breakfast/lunch/dinner order. Engine-produced day
    /// schedules carry exactly one entry per element of this list.
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    /// Fixed wall-clock serving time for this meal: breakfast 08:00,
    /// lunch 12:00, dinner 20:00.
    pub fn serving_time(self) -> NaiveTime {
        let hour = match self {
            MealType::Breakfast => 8,
            MealType::Lunch => 12,
            MealType::Dinner => 20,
        };
        NaiveTime::MIN + Duration::hours(hour)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            MealType::Breakfast => 0,
            MealType::Lunch => 1,
            MealType::Dinner => 2,
        }
    }
}

/// One meal's opt-in state on one day.
///
/// `is_served` compares the injected "now" against the meal's serving time on
/// the schedule's date; `is_editable` is its negation -- a meal whose time has
/// passed can no longer be toggled. Both are recomputed at every resolution,
/// even when the rest of the entry comes from a stored override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealOptIn {
    pub meal: MealType,
    pub opted_in: bool,
    #[serde(default)]
    pub is_editable: bool,
    #[serde(default)]
    pub is_served: bool,
}

/// The effective schedule for a single calendar date.
///
/// Invariant: engine-produced schedules hold exactly three meal entries, one
/// per [`MealType`], regardless of whether they were derived from patterns or
/// read back from an override. Entry order is not part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// The calendar date, with no time component.
    #[serde(rename = "dateISO")]
    pub date: NaiveDate,
    pub meals: Vec<MealOptIn>,
    /// True when this day was explicitly pinned by a toggle and its opt-ins
    /// disagree with what the patterns alone would produce.
    #[serde(default)]
    pub is_exception: bool,
    /// Grid-display flag: whether the day belongs to the month a grid was
    /// requested for. Meaningful only on days emitted by month resolution,
    /// which rewrites it on every day of the grid.
    #[serde(default)]
    pub in_current_month: bool,
}

impl DaySchedule {
    /// The entry for one meal type, if present.
    pub fn meal(&self, meal: MealType) -> Option<&MealOptIn> {
        self.meals.iter().find(|m| m.meal == meal)
    }
}

/// Seven consecutive resolved days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarWeek {
    /// First day in the displayed week.
    #[serde(rename = "startDateISO")]
    pub start_date: NaiveDate,
    pub days: Vec<DaySchedule>,
}

/// A full rectangular month grid.
///
/// `days` runs from the first day of the week containing the 1st of the month
/// through the last day of the week containing the month's final day, so its
/// length is always a multiple of 7. Days outside the requested month are
/// included with `in_current_month` cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    /// Month index, 0-based (0 = January).
    pub month: u32,
    pub year: i32,
    pub days: Vec<DaySchedule>,
}
