//! UTC calendar helpers for building validity windows.

use time::util::days_in_year_month;
use time::{Date, Duration, Month, OffsetDateTime};

use crate::error::{MiniCertError, Result};

/// The current unix time in seconds.
pub fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Shifts a unix timestamp by calendar components, in UTC.
///
/// Year and month steps are calendar-aware: the day-of-month is clamped to the
/// length of the target month (Jan 31 + 1 month = Feb 28). Day, hour, minute
/// and second steps are exact durations. All components may be negative.
pub fn plus(
    timestamp: i64,
    years: i32,
    months: i32,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
) -> Result<i64> {
    let datetime = OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| MiniCertError::TimestampError(e.to_string()))?;

    let total_months = i64::from(datetime.year()) * 12
        + i64::from(u8::from(datetime.month()))
        - 1
        + i64::from(years) * 12
        + i64::from(months);
    let year = i32::try_from(total_months.div_euclid(12))
        .map_err(|_| MiniCertError::TimestampError("year out of range".to_string()))?;
    let month = Month::try_from((total_months.rem_euclid(12) + 1) as u8)
        .map_err(|e| MiniCertError::TimestampError(e.to_string()))?;
    let day = datetime.day().min(days_in_year_month(year, month));
    let date = Date::from_calendar_date(year, month, day)
        .map_err(|e| MiniCertError::TimestampError(e.to_string()))?;

    let shifted = datetime.replace_date(date)
        + Duration::days(days)
        + Duration::hours(hours)
        + Duration::minutes(minutes)
        + Duration::seconds(seconds);
    Ok(shifted.unix_timestamp())
}
