//! Deterministic meal-calendar resolution for mess subscription scheduling.
//!
//! Subscribers describe their eating habits as recurrence patterns ("lunch
//! on weekdays", "all meals daily") and adjust individual days by toggling
//! meals, which stores per-day overrides. This crate turns those two inputs
//! plus an injected clock into fully derived day, week, and month views: for
//! every date, whether each of breakfast, lunch, and dinner is opted in,
//! already served, still editable, and whether the day deviates from its
//! patterns.
//!
//! Everything is a pure function of its arguments. The resolver never reads
//! the system clock or hidden state, so the same patterns, overrides, and
//! `now` always produce the same calendar.
//!
//! ## Modules
//!
//! - [`types`]: meal types, serving times, and the resolved day, week, and
//!   month shapes.
//! - [`pattern`]: recurrence rules, pattern evaluation, and the
//!   last-one-wins merge.
//! - [`overrides`]: the per-day override store.
//! - [`resolver`]: day, week, and month resolution plus meal toggling.
//! - [`clock`]: timezone-aware helpers for producing the injected `now`.
//! - [`error`]: the crate-wide error type.
//!
//! ## Quick start
//!
//! ```
//! use chrono::NaiveDate;
//! use mess_engine::{
//!     resolve_day, toggle_meal, DayOverrideStore, MealType, PatternDefinition, PatternKind,
//!     RecurrenceRule,
//! };
//!
//! let patterns = vec![PatternDefinition {
//!     id: "wk-lunch".into(),
//!     name: "Weekday lunch".into(),
//!     active: true,
//!     rule: RecurrenceRule {
//!         kind: PatternKind::Weekdays,
//!         iso_weekdays: vec![],
//!         meals: vec![MealType::Lunch],
//!     },
//!     start_date: None,
//!     end_date: None,
//! }];
//! let mut overrides = DayOverrideStore::new();
//!
//! // Tuesday 2025-10-14, resolved at 09:30 that morning.
//! let date = NaiveDate::from_ymd_opt(2025, 10, 14).unwrap();
//! let now = date.and_hms_opt(9, 30, 0).unwrap();
//!
//! let day = resolve_day(&patterns, &overrides, date, now);
//! let lunch = day.meal(MealType::Lunch).unwrap();
//! assert!(lunch.opted_in && lunch.is_editable && !lunch.is_served);
//!
//! // Skip lunch that day: the day becomes an exception.
//! let day = toggle_meal(&patterns, &mut overrides, date, MealType::Lunch, false, now);
//! assert!(day.is_exception);
//! assert!(!day.meal(MealType::Lunch).unwrap().opted_in);
//! ```

pub mod clock;
pub mod error;
pub mod overrides;
pub mod pattern;
pub mod resolver;
pub mod types;

pub use clock::{now_in_zone, today_in_zone};
pub use error::{MessError, Result};
pub use overrides::DayOverrideStore;
pub use pattern::{
    applies_on, meals_from_patterns, validate_pattern, MealSelection, PatternDefinition,
    PatternKind, RecurrenceRule,
};
pub use resolver::{resolve_day, resolve_month, resolve_week, toggle_meal};
pub use types::{CalendarMonth, CalendarWeek, DaySchedule, MealOptIn, MealType};
