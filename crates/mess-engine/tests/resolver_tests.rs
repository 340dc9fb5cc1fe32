//! Tests for day and week resolution: override precedence, serving-state
//! derivation from the injected clock, and week fan-out.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use mess_engine::{
    resolve_day, resolve_week, DayOverrideStore, DaySchedule, MealOptIn, MealType, MessError,
    PatternDefinition, PatternKind, RecurrenceRule,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(day: NaiveDate, h: u32, min: u32, sec: u32) -> NaiveDateTime {
    day.and_hms_opt(h, min, sec).unwrap()
}

fn pattern(id: &str, kind: PatternKind, meals: &[MealType]) -> PatternDefinition {
    PatternDefinition {
        id: id.to_string(),
        name: format!("Pattern {id}"),
        active: true,
        rule: RecurrenceRule {
            kind,
            iso_weekdays: vec![],
            meals: meals.to_vec(),
        },
        start_date: None,
        end_date: None,
    }
}

fn slot(meal: MealType, opted_in: bool) -> MealOptIn {
    MealOptIn {
        meal,
        opted_in,
        is_editable: true,
        is_served: false,
    }
}

/// Tuesday 2025-10-14.
fn tuesday() -> NaiveDate {
    date(2025, 10, 14)
}

// ---------------------------------------------------------------------------
// Pattern-derived days
// ---------------------------------------------------------------------------

#[test]
fn pattern_day_has_three_slots_in_canonical_order() {
    let patterns = [pattern("lu", PatternKind::Daily, &[MealType::Lunch])];
    let day = resolve_day(&patterns, &DayOverrideStore::new(), tuesday(), at(tuesday(), 7, 0, 0));

    assert_eq!(day.date, tuesday());
    assert_eq!(day.meals.len(), 3);
    assert_eq!(day.meals[0].meal, MealType::Breakfast);
    assert_eq!(day.meals[1].meal, MealType::Lunch);
    assert_eq!(day.meals[2].meal, MealType::Dinner);
    assert!(!day.is_exception);
    assert!(day.in_current_month);
}

#[test]
fn pattern_day_opt_ins_follow_the_merge() {
    let patterns = [pattern(
        "bd",
        PatternKind::Daily,
        &[MealType::Breakfast, MealType::Dinner],
    )];
    let day = resolve_day(&patterns, &DayOverrideStore::new(), tuesday(), at(tuesday(), 7, 0, 0));

    assert!(day.meal(MealType::Breakfast).unwrap().opted_in);
    assert!(!day.meal(MealType::Lunch).unwrap().opted_in);
    assert!(day.meal(MealType::Dinner).unwrap().opted_in);
}

#[test]
fn day_without_patterns_is_fully_opted_out() {
    let day = resolve_day(&[], &DayOverrideStore::new(), tuesday(), at(tuesday(), 7, 0, 0));
    for meal in MealType::ALL {
        assert!(!day.meal(meal).unwrap().opted_in);
    }
    assert!(!day.is_exception);
}

// ---------------------------------------------------------------------------
// Serving-state derivation
// ---------------------------------------------------------------------------

#[test]
fn before_breakfast_nothing_is_served() {
    let day = resolve_day(&[], &DayOverrideStore::new(), tuesday(), at(tuesday(), 7, 59, 59));
    for meal in MealType::ALL {
        let slot = day.meal(meal).unwrap();
        assert!(!slot.is_served, "{meal:?} not yet served at 07:59:59");
        assert!(slot.is_editable);
    }
}

#[test]
fn mid_morning_only_breakfast_is_served() {
    let day = resolve_day(&[], &DayOverrideStore::new(), tuesday(), at(tuesday(), 9, 30, 0));

    assert!(day.meal(MealType::Breakfast).unwrap().is_served);
    assert!(!day.meal(MealType::Breakfast).unwrap().is_editable);
    assert!(!day.meal(MealType::Lunch).unwrap().is_served);
    assert!(day.meal(MealType::Lunch).unwrap().is_editable);
    assert!(!day.meal(MealType::Dinner).unwrap().is_served);
}

#[test]
fn afternoon_breakfast_and_lunch_are_served() {
    let day = resolve_day(&[], &DayOverrideStore::new(), tuesday(), at(tuesday(), 15, 0, 0));

    assert!(day.meal(MealType::Breakfast).unwrap().is_served);
    assert!(day.meal(MealType::Lunch).unwrap().is_served);
    assert!(!day.meal(MealType::Dinner).unwrap().is_served);
}

#[test]
fn late_evening_everything_is_served() {
    let day = resolve_day(&[], &DayOverrideStore::new(), tuesday(), at(tuesday(), 20, 0, 1));
    for meal in MealType::ALL {
        let slot = day.meal(meal).unwrap();
        assert!(slot.is_served, "{meal:?} served at 20:00:01");
        assert!(!slot.is_editable);
    }
}

#[test]
fn serving_instant_itself_is_not_yet_served() {
    // Strictly after, not at: 12:00:00 exactly leaves lunch editable.
    let day = resolve_day(&[], &DayOverrideStore::new(), tuesday(), at(tuesday(), 12, 0, 0));
    let lunch = day.meal(MealType::Lunch).unwrap();
    assert!(!lunch.is_served);
    assert!(lunch.is_editable);

    let day = resolve_day(&[], &DayOverrideStore::new(), tuesday(), at(tuesday(), 12, 0, 1));
    assert!(day.meal(MealType::Lunch).unwrap().is_served);
}

#[test]
fn past_dates_are_fully_served_and_future_dates_fully_editable() {
    let now = at(tuesday(), 10, 0, 0);

    let yesterday = resolve_day(&[], &DayOverrideStore::new(), date(2025, 10, 13), now);
    for meal in MealType::ALL {
        assert!(yesterday.meal(meal).unwrap().is_served);
    }

    let tomorrow = resolve_day(&[], &DayOverrideStore::new(), date(2025, 10, 15), now);
    for meal in MealType::ALL {
        let slot = tomorrow.meal(meal).unwrap();
        assert!(!slot.is_served);
        assert!(slot.is_editable);
    }
}

#[test]
fn midnight_after_a_day_marks_all_of_it_served() {
    let now = at(date(2025, 10, 15), 0, 0, 0);
    let day = resolve_day(&[], &DayOverrideStore::new(), tuesday(), now);
    assert!(day.meal(MealType::Dinner).unwrap().is_served);
}

// ---------------------------------------------------------------------------
// Override precedence
// ---------------------------------------------------------------------------

#[test]
fn override_opt_ins_win_over_patterns() {
    let patterns = [pattern("lu", PatternKind::Daily, &[MealType::Lunch])];
    let mut overrides = DayOverrideStore::new();
    overrides.insert(DaySchedule {
        date: tuesday(),
        meals: vec![
            slot(MealType::Breakfast, true),
            slot(MealType::Lunch, false),
            slot(MealType::Dinner, false),
        ],
        is_exception: true,
        in_current_month: true,
    });

    let day = resolve_day(&patterns, &overrides, tuesday(), at(tuesday(), 7, 0, 0));

    assert!(day.meal(MealType::Breakfast).unwrap().opted_in, "stored opt-in wins");
    assert!(!day.meal(MealType::Lunch).unwrap().opted_in, "pattern lunch suppressed");
    assert!(day.is_exception);
}

#[test]
fn override_serving_state_is_recomputed_not_trusted() {
    // Snapshot claims everything is served; resolving in the early morning
    // must contradict it.
    let mut overrides = DayOverrideStore::new();
    overrides.insert(DaySchedule {
        date: tuesday(),
        meals: MealType::ALL
            .into_iter()
            .map(|meal| MealOptIn {
                meal,
                opted_in: true,
                is_editable: false,
                is_served: true,
            })
            .collect(),
        is_exception: true,
        in_current_month: true,
    });

    let day = resolve_day(&[], &overrides, tuesday(), at(tuesday(), 6, 0, 0));
    for meal in MealType::ALL {
        let slot = day.meal(meal).unwrap();
        assert!(!slot.is_served, "{meal:?} must be recomputed as unserved");
        assert!(slot.is_editable);
    }
}

#[test]
fn override_with_missing_slots_is_filled_in_opted_out() {
    let mut overrides = DayOverrideStore::new();
    overrides.insert(DaySchedule {
        date: tuesday(),
        meals: vec![slot(MealType::Dinner, true)],
        is_exception: true,
        in_current_month: true,
    });

    let day = resolve_day(&[], &overrides, tuesday(), at(tuesday(), 7, 0, 0));

    assert_eq!(day.meals.len(), 3);
    assert_eq!(day.meals[0].meal, MealType::Breakfast, "canonical order restored");
    assert!(!day.meal(MealType::Breakfast).unwrap().opted_in);
    assert!(!day.meal(MealType::Lunch).unwrap().opted_in);
    assert!(day.meal(MealType::Dinner).unwrap().opted_in);
}

#[test]
fn override_with_duplicate_slots_keeps_the_first_entry() {
    // Store files are plain JSON; nothing stops a snapshot from listing the
    // same meal twice. The day still resolves to exactly three slots.
    let mut overrides = DayOverrideStore::new();
    overrides.insert(DaySchedule {
        date: tuesday(),
        meals: vec![
            slot(MealType::Lunch, true),
            slot(MealType::Lunch, false),
            slot(MealType::Dinner, true),
        ],
        is_exception: true,
        in_current_month: true,
    });

    let day = resolve_day(&[], &overrides, tuesday(), at(tuesday(), 7, 0, 0));

    assert_eq!(day.meals.len(), 3);
    let lunch_slots = day.meals.iter().filter(|m| m.meal == MealType::Lunch).count();
    assert_eq!(lunch_slots, 1, "duplicate lunch entries must collapse");
    assert!(day.meal(MealType::Lunch).unwrap().opted_in, "first stored entry wins");
    assert!(!day.meal(MealType::Breakfast).unwrap().opted_in, "missing slot filled opted out");
    assert!(day.meal(MealType::Dinner).unwrap().opted_in);
    assert_eq!(day.meals[0].meal, MealType::Breakfast, "canonical order restored");
}

#[test]
fn removing_an_override_falls_back_to_patterns() {
    let patterns = [pattern("lu", PatternKind::Daily, &[MealType::Lunch])];
    let mut overrides = DayOverrideStore::new();
    overrides.insert(DaySchedule {
        date: tuesday(),
        meals: vec![
            slot(MealType::Breakfast, true),
            slot(MealType::Lunch, false),
            slot(MealType::Dinner, false),
        ],
        is_exception: true,
        in_current_month: true,
    });

    assert!(overrides.remove(tuesday()).is_some());
    assert!(overrides.remove(tuesday()).is_none(), "second removal is a no-op");

    let day = resolve_day(&patterns, &overrides, tuesday(), at(tuesday(), 7, 0, 0));
    assert!(day.meal(MealType::Lunch).unwrap().opted_in, "patterns apply again");
    assert!(!day.meal(MealType::Breakfast).unwrap().opted_in);
    assert!(!day.is_exception);
}

#[test]
fn override_on_another_date_does_not_leak() {
    let mut overrides = DayOverrideStore::new();
    overrides.insert(DaySchedule {
        date: date(2025, 10, 15),
        meals: vec![slot(MealType::Breakfast, true)],
        is_exception: true,
        in_current_month: true,
    });

    let day = resolve_day(&[], &overrides, tuesday(), at(tuesday(), 7, 0, 0));
    assert!(!day.meal(MealType::Breakfast).unwrap().opted_in);
    assert!(!day.is_exception);
}

// ---------------------------------------------------------------------------
// Week resolution
// ---------------------------------------------------------------------------

#[test]
fn week_is_seven_consecutive_days_from_start() {
    let monday = date(2025, 10, 13);
    let week = resolve_week(&[], &DayOverrideStore::new(), monday, at(monday, 7, 0, 0)).unwrap();

    assert_eq!(week.start_date, monday);
    assert_eq!(week.days.len(), 7);
    for (offset, day) in week.days.iter().enumerate() {
        assert_eq!(day.date, date(2025, 10, 13 + offset as u32));
    }
}

#[test]
fn week_start_need_not_be_aligned_to_any_weekday() {
    let wednesday = date(2025, 10, 15);
    let week =
        resolve_week(&[], &DayOverrideStore::new(), wednesday, at(wednesday, 7, 0, 0)).unwrap();

    assert_eq!(week.days[0].date, wednesday);
    assert_eq!(week.days[6].date, date(2025, 10, 21));
}

#[test]
fn week_reflects_patterns_per_weekday() {
    let patterns = [pattern("wd", PatternKind::Weekdays, &[MealType::Lunch])];
    let monday = date(2025, 10, 13);
    let week =
        resolve_week(&patterns, &DayOverrideStore::new(), monday, at(monday, 7, 0, 0)).unwrap();

    for day in &week.days {
        let expected = day.date.weekday().number_from_monday() <= 5;
        assert_eq!(
            day.meal(MealType::Lunch).unwrap().opted_in,
            expected,
            "lunch on {}",
            day.date
        );
    }
}

#[test]
fn week_shows_overrides_on_their_day_only() {
    let patterns = [pattern("lu", PatternKind::Daily, &[MealType::Lunch])];
    let overrides: DayOverrideStore = [DaySchedule {
        date: date(2025, 10, 16),
        meals: vec![
            slot(MealType::Breakfast, false),
            slot(MealType::Lunch, false),
            slot(MealType::Dinner, false),
        ],
        is_exception: true,
        in_current_month: true,
    }]
    .into_iter()
    .collect();

    let monday = date(2025, 10, 13);
    let week = resolve_week(&patterns, &overrides, monday, at(monday, 7, 0, 0)).unwrap();

    for day in &week.days {
        if day.date == date(2025, 10, 16) {
            assert!(day.is_exception);
            assert!(!day.meal(MealType::Lunch).unwrap().opted_in);
        } else {
            assert!(!day.is_exception, "{} should be a plain pattern day", day.date);
            assert!(day.meal(MealType::Lunch).unwrap().opted_in);
        }
    }
}

#[test]
fn week_serving_state_differs_per_day_relative_to_now() {
    // Now is Wednesday noon sharp: Mon/Tue fully served, Wednesday has
    // breakfast served and lunch still pending, Thu..Sun untouched.
    let monday = date(2025, 10, 13);
    let now = at(date(2025, 10, 15), 12, 0, 0);
    let week = resolve_week(&[], &DayOverrideStore::new(), monday, now).unwrap();

    for day in &week.days[..2] {
        assert!(day.meal(MealType::Dinner).unwrap().is_served, "{} is past", day.date);
    }
    let wednesday = &week.days[2];
    assert!(wednesday.meal(MealType::Breakfast).unwrap().is_served);
    assert!(!wednesday.meal(MealType::Lunch).unwrap().is_served);
    for day in &week.days[3..] {
        assert!(!day.meal(MealType::Breakfast).unwrap().is_served, "{} is future", day.date);
    }
}

#[test]
fn week_running_past_the_calendar_edge_is_an_error() {
    // Four days before the last representable date: the seventh day of the
    // week does not exist, and the week must not come back short.
    let start = NaiveDate::MAX.checked_sub_days(Days::new(3)).unwrap();
    let err =
        resolve_week(&[], &DayOverrideStore::new(), start, at(start, 7, 0, 0)).unwrap_err();
    assert!(matches!(err, MessError::InvalidDate(_)));
}

#[test]
fn week_may_end_exactly_on_the_last_supported_day() {
    let start = NaiveDate::MAX.checked_sub_days(Days::new(6)).unwrap();
    let week = resolve_week(&[], &DayOverrideStore::new(), start, at(start, 7, 0, 0)).unwrap();

    assert_eq!(week.days.len(), 7);
    assert_eq!(week.days[6].date, NaiveDate::MAX);
}
