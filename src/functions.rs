//! Date and time routines used around SGP4.
//!
//! Julian dates are carried as a `(jd, fr)` pair: `jd` is the date at the
//! midnight starting the calendar day (always ending in `.5`) and `fr` is the
//! fraction of that day. Keeping the two apart preserves sub-millisecond
//! precision that a single `f64` Julian date loses.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};

use crate::constants::{DEG2RAD, TWOPI};

/// Compute the Julian date as (integer-ish part, fractional part).
///
/// ```text
/// jday(2020, 2, 11, 13, 57, 0) -> (2458890.5, 0.58125)
/// ```
pub fn jday(year: i32, mon: i32, day: i32, hr: i32, minute: i32, sec: f64) -> (f64, f64) {
    let year_f = f64::from(year);

    let jd = 367.0 * year_f
        - (7.0 * (year_f + ((f64::from(mon) + 9.0) / 12.0).floor()) * 0.25).floor()
        + (275.0 * f64::from(mon) / 9.0).floor()
        + f64::from(day)
        + 1_721_013.5;
    let fr = (sec + f64::from(minute) * 60.0 + f64::from(hr) * 3600.0) / 86400.0;

    (jd, fr)
}

/// Split Julian date of a UTC instant.
pub fn jday_from_datetime(t: &DateTime<Utc>) -> (f64, f64) {
    let sec = f64::from(t.second()) + f64::from(t.nanosecond()) * 1.0e-9;
    jday(
        t.year(),
        t.month() as i32,
        t.day() as i32,
        t.hour() as i32,
        t.minute() as i32,
        sec,
    )
}

/// Convert a fractional day of year into (month, day, hour, minute, seconds).
///
/// `days` is 1.0 at the start of January 1. With `round_to_microsecond` the
/// seconds are rounded to six decimals, which is the resolution of a TLE epoch.
pub fn days2mdhms(year: i32, days: f64, round_to_microsecond: bool) -> (i32, i32, i32, i32, f64) {
    let mut second = days * 86400.0;
    if round_to_microsecond {
        second = round_to_n_decimals(second, 6);
    }

    let minute_f = (second / 60.0).floor();
    second -= minute_f * 60.0;
    if round_to_microsecond {
        second = round_to_n_decimals(second, 6);
    }

    let mut minute = minute_f as i32;
    let mut hour = minute / 60;
    minute %= 60;
    let day_of_year = hour / 24;
    hour %= 24;

    let (mut month, mut day) = day_of_year_to_month_day(day_of_year, is_leap_year(year));
    // Day 366 of a common year.
    if month == 13 {
        month = 12;
        day += 31;
    }

    (month, day, hour, minute, second)
}

/// Turn a 1-based day of year into (month, day).
pub fn day_of_year_to_month_day(day_of_year: i32, is_leap: bool) -> (i32, i32) {
    let leap = i32::from(is_leap);
    let february_bump = (2 - leap) * i32::from(day_of_year >= 60 + leap);
    let august = i32::from(day_of_year >= 215);

    let num = 2 * (day_of_year - 1 + 30 * august + february_bump);
    let month = num / 61 + 1 - august;
    let day = (num % 61) / 2 + 1;

    (month, day)
}

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

/// Inverse of [`jday`]: Julian date to (year, month, day, hour, minute, second).
pub fn invjday(jd: f64, fr: f64) -> (i32, i32, i32, i32, i32, f64) {
    let temp = (jd - 2_415_019.5) + fr;
    let tu = temp / 365.25;
    let mut year = 1900 + tu.floor() as i32;
    let mut leapyrs = (f64::from(year - 1901) * 0.25).floor();

    // nudge by 8.64e-7 sec to get even outputs
    let mut days = temp - (f64::from(year - 1900) * 365.0 + leapyrs) + 0.000_000_000_01;
    if days < 1.0 {
        year -= 1;
        leapyrs = (f64::from(year - 1901) * 0.25).floor();
        days = temp - (f64::from(year - 1900) * 365.0 + leapyrs);
    }

    let (mon, day, hr, minute, sec) = days2mdhms(year, days, false);
    (year, mon, day, hr, minute, sec - 0.000_000_864)
}

/// UTC instant of a split Julian date, to the microsecond.
pub fn datetime_from_jday(jd: f64, fr: f64) -> Option<DateTime<Utc>> {
    let (year, mon, day, hr, minute, sec) = invjday(jd, fr);
    let micros = (sec * 1.0e6).round() as i64;
    let midnight = NaiveDate::from_ymd_opt(year, mon as u32, day as u32)?.and_hms_opt(0, 0, 0)?;
    let naive = midnight
        + chrono::Duration::hours(i64::from(hr))
        + chrono::Duration::minutes(i64::from(minute))
        + chrono::Duration::microseconds(micros);
    Some(Utc.from_utc_datetime(&naive))
}

/// Greenwich mean sidereal time (IAU-82) in radians for a UT1 Julian date.
pub fn gstime(jdut1: f64) -> f64 {
    let tut1 = (jdut1 - 2_451_545.0) / 36_525.0;
    let temp = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093_104 * tut1 * tut1
        + (876_600.0 * 3600.0 + 8_640_184.812_866) * tut1
        + 67_310.548_41;
    // seconds of time to radians: 360 deg / 86400 s = 1/240 deg per second
    let temp = (temp * DEG2RAD / 240.0) % TWOPI;
    if temp < 0.0 {
        temp + TWOPI
    } else {
        temp
    }
}

fn round_to_n_decimals(x: f64, n: i32) -> f64 {
    let factor = 10_f64.powi(n);
    (x * factor).round() / factor
}
