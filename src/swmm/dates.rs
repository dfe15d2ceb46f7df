//! Decoding of the day-count timestamp encoding.
//!
//! Dates are stored as an 8-byte float: whole days since 1899-12-30, with
//! the fractional part holding seconds-of-day / 86400.

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Day zero of the timestamp encoding.
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .expect("valid epoch date")
        .and_hms_opt(0, 0, 0)
        .expect("valid epoch time")
}

/// Decode a raw day-count value to a calendar timestamp.
///
/// The fractional day is rounded to whole seconds and then nudged by one
/// second when the result ends in 1 or 9, compensating for floating-point
/// drift introduced when the simulator encoded the seconds-of-day as a
/// binary fraction. Both the random-access and the bulk extraction paths
/// decode through this one function.
pub fn decode_date(raw: f64) -> NaiveDateTime {
    let days = raw.trunc() as i64;
    let mut seconds = ((raw - raw.trunc()) * 86400.0).round() as i64;
    match seconds % 10 {
        1 => seconds -= 1,
        9 => seconds += 1,
        _ => {}
    }
    epoch() + Duration::days(days) + Duration::seconds(seconds)
}
