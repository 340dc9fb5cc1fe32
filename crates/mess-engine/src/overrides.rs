//! Per-day override storage.
//!
//! Overrides are whole-day snapshots keyed by calendar date. Once a day has
//! an override, pattern evaluation no longer decides its opt-ins; the stored
//! snapshot does. Dates are kept ordered so iteration and serialized output
//! are chronological.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DaySchedule;

/// Ordered map of calendar date to overridden day schedule.
///
/// Serializes transparently as a date-keyed object, e.g.
/// `{"2025-10-14": {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayOverrideStore {
    days: BTreeMap<NaiveDate, DaySchedule>,
}

impl DayOverrideStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the override for a date, if any.
    pub fn get(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days.get(&date)
    }

    /// Whether the date has an override.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Insert or replace the override for `schedule.date`, returning the
    /// previous snapshot if one existed.
    pub fn insert(&mut self, schedule: DaySchedule) -> Option<DaySchedule> {
        self.days.insert(schedule.date, schedule)
    }

    /// Remove the override for a date, returning it if present. The day
    /// falls back to pattern evaluation afterwards.
    pub fn remove(&mut self, date: NaiveDate) -> Option<DaySchedule> {
        self.days.remove(&date)
    }

    /// Number of overridden days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no day is overridden.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterate overrides in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DaySchedule)> {
        self.days.iter()
    }
}

impl FromIterator<DaySchedule> for DayOverrideStore {
    fn from_iter<I: IntoIterator<Item = DaySchedule>>(iter: I) -> Self {
        let mut store = Self::new();
        for schedule in iter {
            store.insert(schedule);
        }
        store
    }
}
