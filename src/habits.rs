//! Habit rollups and period commentary
//!
//! Per-habit totals, completion-day counts, and deltas against the
//! immediately preceding equal-length period. Commentary is selected from an
//! ordered band table per period granularity, evaluated low to high with a
//! first-match-wins rule and a catch-all final band, so the habit/period
//! message matrix stays data rather than branching code.

use chrono::NaiveDate;

use crate::calendar::{date_range, DateRange, Period};
use crate::stats::{round1, Trend};
use crate::types::{Habit, HabitEntry, HabitSummary};

/// One ordered commentary band. `max_days` is the inclusive upper bound on
/// completed days; `None` marks the catch-all final band with no upper bound.
struct Band {
    max_days: Option<u32>,
    template: &'static str,
}

const WEEK_BANDS: &[Band] = &[
    Band {
        max_days: Some(0),
        template: "No {habit} logged this week.",
    },
    Band {
        max_days: Some(2),
        template: "{habit} happened on {days} days this week, {minutes} minutes in total.",
    },
    Band {
        max_days: Some(4),
        template: "{habit} is taking hold: {days} days and {minutes} minutes this week.",
    },
    Band {
        max_days: None,
        template: "{habit} nearly every day this week, {minutes} minutes across {days} days.",
    },
];

const MONTH_BANDS: &[Band] = &[
    Band {
        max_days: Some(0),
        template: "No {habit} logged this month.",
    },
    Band {
        max_days: Some(5),
        template: "{habit} only reached {days} days this month.",
    },
    Band {
        max_days: Some(14),
        template: "{habit} on {days} days this month for {minutes} minutes.",
    },
    Band {
        max_days: None,
        template: "{habit} was steady this month: {days} days and {minutes} minutes.",
    },
];

const QUARTER_BANDS: &[Band] = &[
    Band {
        max_days: Some(0),
        template: "No {habit} logged this quarter.",
    },
    Band {
        max_days: Some(15),
        template: "{habit} stayed occasional this quarter: {days} days.",
    },
    Band {
        max_days: Some(45),
        template: "{habit} on {days} days across the quarter, {minutes} minutes in total.",
    },
    Band {
        max_days: None,
        template: "{habit} held up all quarter: {days} days and {minutes} minutes.",
    },
];

const YEAR_BANDS: &[Band] = &[
    Band {
        max_days: Some(0),
        template: "No {habit} logged this year.",
    },
    Band {
        max_days: Some(60),
        template: "{habit} totalled {days} days this year.",
    },
    Band {
        max_days: Some(180),
        template: "{habit} on {days} days this year for {minutes} minutes.",
    },
    Band {
        max_days: None,
        template: "{habit} was a near-daily fixture this year: {days} days.",
    },
];

/// Roll up all five habits for one period view, comparing against the
/// preceding period of the same type
pub fn rollup(
    entries: &[HabitEntry],
    period: Period,
    offset: i32,
    today: NaiveDate,
) -> Vec<HabitSummary> {
    let current = date_range(period, offset, today);
    let previous = date_range(period, offset - 1, today);

    Habit::ALL
        .iter()
        .map(|&habit| summarize(habit, entries, current, previous, period))
        .collect()
}

fn summarize(
    habit: Habit,
    entries: &[HabitEntry],
    current: DateRange,
    previous: DateRange,
    period: Period,
) -> HabitSummary {
    let mut total_minutes: u32 = 0;
    let mut days_completed: u32 = 0;
    let mut previous_total_minutes: u32 = 0;

    for entry in entries {
        if current.contains(entry.date) {
            total_minutes += habit.minutes(entry);
            if habit.is_done(entry) {
                days_completed += 1;
            }
        } else if previous.contains(entry.date) {
            previous_total_minutes += habit.minutes(entry);
        }
    }

    let avg_minutes_per_day = if days_completed > 0 {
        round1(f64::from(total_minutes) / f64::from(days_completed))
    } else {
        0.0
    };

    let delta_minutes = i64::from(total_minutes) - i64::from(previous_total_minutes);
    let trend = match delta_minutes {
        d if d > 0 => Trend::Increasing,
        d if d < 0 => Trend::Decreasing,
        _ => Trend::Stable,
    };

    HabitSummary {
        habit,
        total_minutes,
        days_completed,
        avg_minutes_per_day,
        previous_total_minutes,
        delta_minutes,
        trend,
        commentary: commentary(habit, period, total_minutes, days_completed),
    }
}

/// Select exactly one commentary line from the period's band table
pub fn commentary(habit: Habit, period: Period, total_minutes: u32, days_completed: u32) -> String {
    let bands = match period {
        Period::Week => WEEK_BANDS,
        Period::Month => MONTH_BANDS,
        Period::Quarter => QUARTER_BANDS,
        Period::Year => YEAR_BANDS,
    };

    // Bands are ordered low to high; the final band always matches
    let band = bands
        .iter()
        .find(|b| b.max_days.map_or(true, |max| days_completed <= max))
        .unwrap_or(&bands[bands.len() - 1]);

    band.template
        .replace("{habit}", habit.display_name())
        .replace("{days}", &days_completed.to_string())
        .replace("{minutes}", &total_minutes.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn reading_day(date: NaiveDate, minutes: u32) -> HabitEntry {
        let mut entry = HabitEntry::new(date);
        entry.reading_fiction = Some(minutes);
        entry
    }

    #[test]
    fn test_rollup_totals_and_previous_period_delta() {
        // 2024-01-17 is a Wednesday; current week is Jan 15-21, previous Jan 8-14
        let today = d(2024, 1, 17);
        let entries = vec![
            reading_day(d(2024, 1, 15), 30),
            reading_day(d(2024, 1, 16), 20),
            reading_day(d(2024, 1, 9), 60),
        ];

        let summaries = rollup(&entries, Period::Week, 0, today);
        assert_eq!(summaries.len(), 5);

        let reading = summaries
            .iter()
            .find(|s| s.habit == Habit::Reading)
            .unwrap();
        assert_eq!(reading.total_minutes, 50);
        assert_eq!(reading.days_completed, 2);
        assert_eq!(reading.avg_minutes_per_day, 25.0);
        assert_eq!(reading.previous_total_minutes, 60);
        assert_eq!(reading.delta_minutes, -10);
        assert_eq!(reading.trend, Trend::Decreasing);
    }

    #[test]
    fn test_rollup_untouched_habit_is_zeroed() {
        let today = d(2024, 1, 17);
        let entries = vec![reading_day(d(2024, 1, 15), 30)];

        let summaries = rollup(&entries, Period::Week, 0, today);
        let cleaning = summaries
            .iter()
            .find(|s| s.habit == Habit::Cleaning)
            .unwrap();
        assert_eq!(cleaning.total_minutes, 0);
        assert_eq!(cleaning.days_completed, 0);
        assert_eq!(cleaning.avg_minutes_per_day, 0.0);
        assert_eq!(cleaning.trend, Trend::Stable);
        assert_eq!(cleaning.commentary, "No Cleaning logged this week.");
    }

    #[test]
    fn test_flag_only_day_counts_as_completed() {
        let today = d(2024, 1, 17);
        let mut entry = HabitEntry::new(d(2024, 1, 16));
        entry.completed.insert("exercise".to_string(), true);

        let summaries = rollup(&[entry], Period::Week, 0, today);
        let exercise = summaries
            .iter()
            .find(|s| s.habit == Habit::Exercise)
            .unwrap();
        assert_eq!(exercise.days_completed, 1);
        assert_eq!(exercise.total_minutes, 0);
        // Completed days drive the band even without minutes
        assert!(exercise.commentary.contains("1 days"));
    }

    #[test]
    fn test_commentary_band_boundaries_week() {
        let msg = |days| commentary(Habit::Writing, Period::Week, 120, days);
        assert_eq!(msg(0), "No Writing logged this week.");
        assert!(msg(1).contains("happened on 1 days"));
        assert!(msg(2).contains("happened on 2 days"));
        assert!(msg(3).contains("taking hold"));
        assert!(msg(4).contains("taking hold"));
        assert!(msg(5).contains("nearly every day"));
        assert!(msg(7).contains("nearly every day"));
    }

    #[test]
    fn test_commentary_varies_by_period() {
        assert!(commentary(Habit::Reading, Period::Month, 0, 0).contains("this month"));
        assert!(commentary(Habit::Reading, Period::Quarter, 300, 20).contains("quarter"));
        assert!(commentary(Habit::Reading, Period::Year, 4000, 200).contains("this year"));
    }

    #[test]
    fn test_catch_all_band_has_no_upper_bound() {
        let msg = commentary(Habit::SecondLanguage, Period::Year, 9000, 365);
        assert_eq!(
            msg,
            "Second language was a near-daily fixture this year: 365 days."
        );
    }

    #[test]
    fn test_offset_period_rollup() {
        let today = d(2024, 1, 17);
        // Entry in the week of Jan 8-14 shows up at offset -1
        let entries = vec![reading_day(d(2024, 1, 9) + Duration::days(1), 40)];
        let summaries = rollup(&entries, Period::Week, -1, today);
        let reading = summaries
            .iter()
            .find(|s| s.habit == Habit::Reading)
            .unwrap();
        assert_eq!(reading.total_minutes, 40);
    }
}
