//! Wall-clock helpers for producing the injected `now`.
//!
//! The resolver never reads a clock itself; every operation takes `now` as
//! an argument so resolution stays reproducible. These helpers are for the
//! outermost caller that has to turn the real clock into that argument,
//! anchored to the civil timezone the meals are served in.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::{MessError, Result};

/// Current wall-clock time in an IANA timezone such as `Asia/Kolkata`.
pub fn now_in_zone(timezone: &str) -> Result<NaiveDateTime> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| MessError::InvalidTimezone(timezone.to_string()))?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

/// Today's date in an IANA timezone.
pub fn today_in_zone(timezone: &str) -> Result<NaiveDate> {
    Ok(now_in_zone(timezone)?.date())
}
