//! Day, week and month labels.
//!
//! Weeks always run Monday to Sunday, independent of locale. Labels are the
//! record titles used to look records up, so their format is load-bearing:
//!
//! | Period | Example               |
//! |--------|-----------------------|
//! | Day    | `5 Jul 2023`          |
//! | Week   | `3 - 9 Jul 2023`      |
//! | Week   | `31 Jul - 6 Aug 2023` |
//! | Week   | `30 Dec 2024 - 5 Jan 2025` |
//! | Month  | `Jul 2023`            |

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

const DAY_FORMAT: &str = "%-d %b %Y";
const MONTH_FORMAT: &str = "%b %Y";

/// The Monday-to-Sunday week containing a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

/// Week containing `date`.
pub fn week_of(date: NaiveDate) -> Week {
    let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let end = start + Duration::days(6);
    Week {
        start,
        end,
        label: week_label(start, end),
    }
}

/// `d[ MMM][ YYYY] - d MMM YYYY`; the start side only repeats the month or
/// year when it differs from the end side.
fn week_label(start: NaiveDate, end: NaiveDate) -> String {
    let mut start_format = String::from("%-d");
    if start.month() != end.month() || start.year() != end.year() {
        start_format.push_str(" %b");
    }
    if start.year() != end.year() {
        start_format.push_str(" %Y");
    }
    format!("{} - {}", start.format(&start_format), end.format(DAY_FORMAT))
}

/// `d MMM YYYY`
pub fn day_label(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// `MMM YYYY`
pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

/// Calendar date of `instant` as seen in `tz`.
pub fn local_date<Z: TimeZone, Src: TimeZone>(instant: &DateTime<Src>, tz: &Z) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}
