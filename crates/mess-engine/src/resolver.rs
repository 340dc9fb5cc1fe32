//! Day, week, and month resolution.
//!
//! Resolution answers one question for a calendar date: which meals is the
//! subscriber opted into, and what state is each meal in right now?
//! Precedence is fixed: a stored override wins over pattern evaluation, and
//! pattern evaluation wins over nothing (a day no pattern touches is fully
//! opted out). Serving state is always derived fresh from the injected
//! `now`, never trusted from storage, so a snapshot taken yesterday still
//! reports today's meals as served correctly.
//!
//! Week and month resolution are pure fan-outs of [`resolve_day`]: a week is
//! seven consecutive days from its start date, and a month is a rectangular
//! grid of whole weeks padded with leading and trailing out-of-month days,
//! the shape calendar UIs render directly.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, Weekday};

use crate::error::{MessError, Result};
use crate::overrides::DayOverrideStore;
use crate::pattern::{meals_from_patterns, PatternDefinition};
use crate::types::{CalendarMonth, CalendarWeek, DaySchedule, MealOptIn, MealType};

/// Resolve the schedule for a single calendar date.
///
/// If `overrides` holds a snapshot for `date`, its opt-ins and exception
/// flag are returned as stored, while `isServed` and `isEditable` are
/// recomputed against `now`. Without an override the day is built from the
/// pattern set with `isException` false. Either way `inCurrentMonth` comes
/// out true; month resolution rewrites it per grid position.
///
/// A meal is served once `now` is strictly past its serving time on `date`;
/// a served meal is no longer editable. At the serving instant itself the
/// meal is still editable.
pub fn resolve_day(
    patterns: &[PatternDefinition],
    overrides: &DayOverrideStore,
    date: NaiveDate,
    now: NaiveDateTime,
) -> DaySchedule {
    if let Some(stored) = overrides.get(date) {
        let mut day = stored.clone();
        day.date = date;
        // A resolved day always carries all three meal slots in canonical
        // order, even if the stored snapshot lost one or lists one twice.
        // The first entry per meal wins, matching `DaySchedule::meal`.
        let mut seen = [false; 3];
        day.meals.retain(|slot| {
            let first = !seen[slot.meal.index()];
            seen[slot.meal.index()] = true;
            first
        });
        for meal in MealType::ALL {
            if day.meal(meal).is_none() {
                day.meals.push(MealOptIn {
                    meal,
                    opted_in: false,
                    is_editable: true,
                    is_served: false,
                });
            }
        }
        day.meals.sort_by_key(|slot| slot.meal.index());
        refresh_serving_state(&mut day, now);
        day.in_current_month = true;
        return day;
    }

    let selection = meals_from_patterns(patterns, date);
    let meals = MealType::ALL
        .into_iter()
        .map(|meal| {
            let served = now > date.and_time(meal.serving_time());
            MealOptIn {
                meal,
                opted_in: selection.opted_in(meal),
                is_editable: !served,
                is_served: served,
            }
        })
        .collect();
    DaySchedule {
        date,
        meals,
        is_exception: false,
        in_current_month: true,
    }
}

/// Resolve seven consecutive days starting at `start`.
///
/// `start` is taken as given; it does not have to fall on any particular
/// weekday. Callers wanting an aligned week pass an aligned start. Errs only
/// when the seven days would run past the supported calendar range; a week
/// is never returned short.
pub fn resolve_week(
    patterns: &[PatternDefinition],
    overrides: &DayOverrideStore,
    start: NaiveDate,
    now: NaiveDateTime,
) -> Result<CalendarWeek> {
    let mut days = Vec::with_capacity(7);
    for offset in 0..7u64 {
        let date = start.checked_add_days(Days::new(offset)).ok_or_else(|| {
            MessError::InvalidDate(format!(
                "week starting {start} runs past the supported date range"
            ))
        })?;
        days.push(resolve_day(patterns, overrides, date, now));
    }
    Ok(CalendarWeek {
        start_date: start,
        days,
    })
}

/// Resolve a month as a rectangular grid of whole weeks.
///
/// `month` is zero-based (0 = January .. 11 = December). The grid runs from
/// the `week_starts_on` weekday on or before the first of the month through
/// the end of the week containing the last of the month, so its length is
/// always a multiple of seven (28 to 42 days). Padding days resolve like any
/// other day but are marked `inCurrentMonth: false`.
pub fn resolve_month(
    patterns: &[PatternDefinition],
    overrides: &DayOverrideStore,
    year: i32,
    month: u32,
    week_starts_on: Weekday,
    now: NaiveDateTime,
) -> Result<CalendarMonth> {
    if month > 11 {
        return Err(MessError::InvalidDate(format!(
            "month index {month} is out of range (0 = January .. 11 = December)"
        )));
    }
    let first = NaiveDate::from_ymd_opt(year, month + 1, 1)
        .ok_or_else(|| MessError::InvalidDate(format!("year {year} is out of range")))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.checked_sub_days(Days::new(1)))
        .ok_or_else(|| grid_out_of_range(year, month))?;

    let grid_start =
        week_start_on_or_before(first, week_starts_on).ok_or_else(|| grid_out_of_range(year, month))?;
    let grid_end = week_start_on_or_before(last, week_starts_on)
        .and_then(|week_start| week_start.checked_add_days(Days::new(6)))
        .ok_or_else(|| grid_out_of_range(year, month))?;
    let total_days = (grid_end - grid_start).num_days() as u64 + 1;

    let mut days = Vec::with_capacity(total_days as usize);
    for offset in 0..total_days {
        let date = grid_start
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| grid_out_of_range(year, month))?;
        let mut day = resolve_day(patterns, overrides, date, now);
        // Adjacent months never share a month index, so comparing the
        // index alone is enough even when the grid crosses a year
        // boundary.
        day.in_current_month = date.month0() == month;
        days.push(day);
    }

    Ok(CalendarMonth { month, year, days })
}

/// Apply a single-meal opt-in change for a date and persist it as an
/// override.
///
/// The day is resolved first, the one meal flipped to `opted_in`, and the
/// result stored whole: from then on the snapshot, not the patterns, owns
/// the day. `isException` is recomputed by comparing every slot against
/// what the pattern set alone would produce, so toggling a meal back by
/// hand clears the flag again.
///
/// The engine applies the change regardless of editability; gating toggles
/// on `isEditable` is the caller's concern.
pub fn toggle_meal(
    patterns: &[PatternDefinition],
    overrides: &mut DayOverrideStore,
    date: NaiveDate,
    meal: MealType,
    opted_in: bool,
    now: NaiveDateTime,
) -> DaySchedule {
    let mut day = resolve_day(patterns, overrides, date, now);
    if let Some(slot) = day.meals.iter_mut().find(|slot| slot.meal == meal) {
        slot.opted_in = opted_in;
    }

    let baseline = meals_from_patterns(patterns, date);
    day.is_exception = day
        .meals
        .iter()
        .any(|slot| slot.opted_in != baseline.opted_in(slot.meal));

    overrides.insert(day.clone());
    day
}

/// Rewrite `isServed` and `isEditable` on every slot from the injected
/// `now`.
fn refresh_serving_state(day: &mut DaySchedule, now: NaiveDateTime) {
    let date = day.date;
    for slot in &mut day.meals {
        let served = now > date.and_time(slot.meal.serving_time());
        slot.is_served = served;
        slot.is_editable = !served;
    }
}

/// The `week_starts_on` weekday on or before `date`.
fn week_start_on_or_before(date: NaiveDate, week_starts_on: Weekday) -> Option<NaiveDate> {
    let offset = (7 + date.weekday().num_days_from_sunday()
        - week_starts_on.num_days_from_sunday())
        % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
}

fn grid_out_of_range(year: i32, month: u32) -> MessError {
    MessError::InvalidDate(format!(
        "calendar grid for month {month} of year {year} exceeds the supported date range"
    ))
}
