//! Calendar arithmetic for dashboard periods
//!
//! Range computation for week/month/quarter/year with backward offset
//! navigation, deterministic date formatting, and weekday extraction.
//! Everything here is a pure function of its arguments; the current instant
//! is always passed in explicitly.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AnalyticsError;

/// Dashboard period granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
    #[serde(rename = "3months")]
    Quarter,
    Year,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Week, Period::Month, Period::Quarter, Period::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "3months",
            Period::Year => "year",
        }
    }
}

impl FromStr for Period {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "3months" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            other => Err(AnalyticsError::UnknownPeriod(other.to_string())),
        }
    }
}

/// Inclusive calendar bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Fixed output formats for date strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    Iso,
    /// `MMM DD`, e.g. "Jun 08"
    MonthDay,
    /// `M/D`, e.g. "6/8"
    Compact,
}

/// Inclusive bounds for `period` at `offset` steps back from the period
/// containing `today`.
///
/// Offset 0 is the current period; negative offsets navigate into the past.
/// Navigation may not go into the future: positive offsets clamp to 0.
/// Weeks run Monday through Sunday.
pub fn date_range(period: Period, offset: i32, today: NaiveDate) -> DateRange {
    let offset = offset.min(0);
    match period {
        Period::Week => {
            let anchor = today + Duration::weeks(i64::from(offset));
            let start = anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()));
            DateRange {
                start,
                end: start + Duration::days(6),
            }
        }
        Period::Month => {
            let (year, month) = shift_month(today.year(), today.month(), offset);
            DateRange {
                start: first_of_month(year, month),
                end: last_of_month(year, month),
            }
        }
        Period::Quarter => {
            let quarter = (today.month0() / 3) as i32;
            let total = today.year() * 4 + quarter + offset;
            let (year, q) = (total.div_euclid(4), total.rem_euclid(4));
            let start_month = (q * 3 + 1) as u32;
            DateRange {
                start: first_of_month(year, start_month),
                end: last_of_month(year, start_month + 2),
            }
        }
        Period::Year => {
            let year = today.year() + offset;
            DateRange {
                start: first_of_month(year, 1),
                end: last_of_month(year, 12),
            }
        }
    }
}

/// Human-readable label for the range a period/offset pair resolves to
pub fn period_label(period: Period, offset: i32, today: NaiveDate) -> String {
    let range = date_range(period, offset, today);
    match period {
        Period::Week => format!(
            "{} - {}, {}",
            format_date(range.start, DateFormat::MonthDay),
            format_date(range.end, DateFormat::MonthDay),
            range.end.year()
        ),
        Period::Month => range.start.format("%B %Y").to_string(),
        Period::Quarter => format!("Q{} {}", range.start.month0() / 3 + 1, range.start.year()),
        Period::Year => range.start.year().to_string(),
    }
}

/// Deterministic date formatting for one of the fixed formats
pub fn format_date(date: NaiveDate, format: DateFormat) -> String {
    match format {
        DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
        DateFormat::MonthDay => date.format("%b %d").to_string(),
        DateFormat::Compact => format!("{}/{}", date.month(), date.day()),
    }
}

/// Fixed day names indexed Sunday=0
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Weekday index with the Sunday=0 convention (proleptic Gregorian)
pub fn sunday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Weekday index with Monday-first grouping
pub fn monday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Day name for a date
pub fn day_name(date: NaiveDate) -> &'static str {
    DAY_NAMES[sunday_index(date) as usize]
}

/// Normalize a year/month pair shifted by `offset` months across year bounds
fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 + offset;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (next_year, next_month) = shift_month(year, month, 1);
    first_of_month(next_year, next_month) - Duration::days(1)
}
