//! Recurrence patterns -- which meals a subscriber wants on which weekdays.
//!
//! A pattern couples a weekday predicate ([`PatternKind`]) with the set of
//! meals opted in on matching days, an optional validity window, and an
//! active flag. Evaluation is a pure function of the pattern and the date:
//! no clocks, no stores, no ordering dependence.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{MessError, Result};
use crate::types::MealType;

/// Weekday predicate of a recurrence rule.
///
/// Wire values are `DAILY`, `WEEKDAYS`, `WEEKENDS`, and `SPECIFIC_WEEKDAYS`.
/// Anything else deserializes to [`PatternKind::Unknown`], which never
/// applies -- an unrecognized kind disables a rule rather than failing the
/// load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternKind {
    /// Every day.
    Daily,
    /// Monday through Friday.
    Weekdays,
    /// Saturday and Sunday.
    Weekends,
    /// An explicit set of ISO weekdays (1 = Monday .. 7 = Sunday).
    SpecificWeekdays,
    /// Catch-all for kinds this engine does not recognize.
    Unknown,
}

impl<'de> Deserialize<'de> for PatternKind {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Hand-rolled so unrecognized strings land on Unknown instead of
        // rejecting the whole document.
        let kind = String::deserialize(deserializer)?;
        Ok(match kind.as_str() {
            "DAILY" => PatternKind::Daily,
            "WEEKDAYS" => PatternKind::Weekdays,
            "WEEKENDS" => PatternKind::Weekends,
            "SPECIFIC_WEEKDAYS" => PatternKind::SpecificWeekdays,
            _ => PatternKind::Unknown,
        })
    }
}

/// A weekday predicate plus the meals opted in when it fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    pub kind: PatternKind,
    /// ISO weekdays (1 = Monday .. 7 = Sunday). Meaningful only for
    /// [`PatternKind::SpecificWeekdays`]; an empty set never matches.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub iso_weekdays: Vec<u8>,
    pub meals: Vec<MealType>,
}

/// A named, independently activatable recurrence pattern.
///
/// The ordered slice of definitions handed to the engine is the pattern set:
/// slice order is merge priority (see [`meals_from_patterns`]). Patterns are
/// soft-disabled by clearing `active`, never deleted implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub id: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub rule: RecurrenceRule,
    /// Inclusive start of the validity window; unbounded when absent.
    #[serde(rename = "startDateISO", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the validity window; unbounded when absent.
    #[serde(rename = "endDateISO", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

fn default_active() -> bool {
    true
}

/// Per-meal opt-in flags produced by pattern evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MealSelection {
    flags: [bool; 3],
}

impl MealSelection {
    /// Whether the given meal is opted in.
    pub fn opted_in(self, meal: MealType) -> bool {
        self.flags[meal.index()]
    }

    pub(crate) fn set(&mut self, meal: MealType, opted_in: bool) {
        self.flags[meal.index()] = opted_in;
    }
}

/// Decide whether a pattern applies on a calendar date.
///
/// Inactive patterns never apply; the check precedes the window checks. Both
/// window bounds are inclusive: a date equal to `end_date` still applies.
/// Weekday matching uses ISO numbering (1 = Monday .. 7 = Sunday). For
/// [`PatternKind::SpecificWeekdays`], entries outside 1..=7 can never match,
/// so malformed weekday data silently disables the rule instead of erroring.
pub fn applies_on(pattern: &PatternDefinition, date: NaiveDate) -> bool {
    if !pattern.active {
        return false;
    }
    if pattern.start_date.is_some_and(|start| date < start) {
        return false;
    }
    if pattern.end_date.is_some_and(|end| date > end) {
        return false;
    }

    let iso_weekday = date.weekday().number_from_monday();
    match pattern.rule.kind {
        PatternKind::Daily => true,
        PatternKind::Weekdays => iso_weekday <= 5,
        PatternKind::Weekends => iso_weekday >= 6,
        PatternKind::SpecificWeekdays => pattern
            .rule
            .iso_weekdays
            .iter()
            .any(|&day| u32::from(day) == iso_weekday),
        PatternKind::Unknown => false,
    }
}

/// Merge a pattern set into per-meal opt-in flags for one date.
///
/// Last one wins, whole day at a time: each applying pattern rewrites the
/// flag for *every* meal type to `rule.meals.contains(meal)`, so a
/// later-applying pattern opts the day out of any meal it does not list.
/// This is not a per-meal union; exception detection in the resolver depends
/// on the overwrite semantics. Meals no applying pattern mentions stay opted
/// out.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mess_engine::{meals_from_patterns, MealType, PatternDefinition, PatternKind, RecurrenceRule};
///
/// let lunch = PatternDefinition {
///     id: "p1".into(),
///     name: "Daily lunch".into(),
///     active: true,
///     rule: RecurrenceRule {
///         kind: PatternKind::Daily,
///         iso_weekdays: vec![],
///         meals: vec![MealType::Lunch],
///     },
///     start_date: None,
///     end_date: None,
/// };
/// let mut breakfast = lunch.clone();
/// breakfast.id = "p2".into();
/// breakfast.name = "Daily breakfast".into();
/// breakfast.rule.meals = vec![MealType::Breakfast];
///
/// let date = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
/// let merged = meals_from_patterns(&[lunch, breakfast], date);
///
/// // The later pattern rewrote the whole day: lunch is opted out again.
/// assert!(merged.opted_in(MealType::Breakfast));
/// assert!(!merged.opted_in(MealType::Lunch));
/// ```
pub fn meals_from_patterns(patterns: &[PatternDefinition], date: NaiveDate) -> MealSelection {
    let mut selection = MealSelection::default();
    for pattern in patterns {
        if !applies_on(pattern, date) {
            continue;
        }
        for meal in MealType::ALL {
            selection.set(meal, pattern.rule.meals.contains(&meal));
        }
    }
    selection
}

/// Validate a pattern definition at the creation boundary.
///
/// The resolver itself never validates -- malformed weekday data just never
/// applies. This check is for the surface that accepts new or edited
/// patterns: a usable name, at least one meal, weekdays within 1..=7 and
/// only on the kind that uses them, and a non-inverted window.
pub fn validate_pattern(pattern: &PatternDefinition) -> Result<()> {
    if pattern.name.trim().chars().count() < 3 {
        return Err(MessError::InvalidPattern(format!(
            "name must be at least 3 characters, got {:?}",
            pattern.name
        )));
    }
    if pattern.rule.kind == PatternKind::Unknown {
        return Err(MessError::InvalidPattern(
            "unrecognized pattern kind; the rule would never apply".to_string(),
        ));
    }
    if pattern.rule.meals.is_empty() {
        return Err(MessError::InvalidPattern(
            "rule must opt in at least one meal".to_string(),
        ));
    }
    if let Some(day) = pattern.rule.iso_weekdays.iter().find(|&&d| !(1..=7).contains(&d)) {
        return Err(MessError::InvalidPattern(format!(
            "isoWeekdays entries must be within 1..=7 (Mon..Sun), got {day}"
        )));
    }
    if pattern.rule.kind == PatternKind::SpecificWeekdays {
        if pattern.rule.iso_weekdays.is_empty() {
            return Err(MessError::InvalidPattern(
                "SPECIFIC_WEEKDAYS requires at least one weekday".to_string(),
            ));
        }
    } else if !pattern.rule.iso_weekdays.is_empty() {
        return Err(MessError::InvalidPattern(format!(
            "isoWeekdays is only meaningful for SPECIFIC_WEEKDAYS, not {:?}",
            pattern.rule.kind
        )));
    }
    if let (Some(start), Some(end)) = (pattern.start_date, pattern.end_date) {
        if start > end {
            return Err(MessError::InvalidPattern(format!(
                "window start {start} is after its end {end}"
            )));
        }
    }
    Ok(())
}
