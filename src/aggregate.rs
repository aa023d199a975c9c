//! Multi-granularity aggregation
//!
//! Collapses a gap-filled daily series into coarser buckets:
//! - Scalar means over non-missing members only, rounded to one decimal
//! - Fixed-size chunks or calendar-month grouping
//! - Sleep aggregates with circular bedtime averaging

use chrono::{Datelike, NaiveDate};

use crate::sleep::{clock_minutes, SleepAnalyzer};
use crate::stats::{mean, round1};
use crate::types::{AggregatedBucket, DailyEntry, GapFilledEntry, SleepBucket};

/// Minutes in a day, the modulus for circular clock math
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Bedtimes before 06:00 belong to the previous sleep night and are shifted
/// past midnight before averaging, so 23:30 and 00:30 average to midnight
/// instead of noon
pub const NIGHT_ROLLOVER_MINUTES: f64 = 360.0;

/// Collapse consecutive fixed-size chunks into one bucket each.
///
/// An all-missing chunk still emits a placeholder bucket dated at its first
/// day, keeping chart x-axes aligned.
pub fn by_chunk(entries: &[GapFilledEntry], chunk_size: usize) -> Vec<AggregatedBucket> {
    if chunk_size == 0 {
        return Vec::new();
    }
    entries.chunks(chunk_size).map(bucket_of).collect()
}

/// Group by calendar month instead of fixed chunk size; bucket date is the
/// first of the month
pub fn by_calendar_month(entries: &[GapFilledEntry]) -> Vec<AggregatedBucket> {
    month_groups(entries)
        .into_iter()
        .map(|(month_start, group)| {
            let mut bucket = bucket_of(group);
            bucket.date = month_start;
            bucket
        })
        .collect()
}

/// Sleep aggregate per chunk; chunks with no valid sleep entries are dropped
/// rather than emitted as zero buckets, so no meaningless zero-duration bar
/// gets drawn
pub fn sleep_by_chunk(entries: &[GapFilledEntry], chunk_size: usize) -> Vec<SleepBucket> {
    if chunk_size == 0 {
        return Vec::new();
    }
    entries
        .chunks(chunk_size)
        .filter_map(|chunk| sleep_bucket_of(chunk, chunk[0].date()))
        .collect()
}

/// Calendar-month variant of the sleep aggregate
pub fn sleep_by_calendar_month(entries: &[GapFilledEntry]) -> Vec<SleepBucket> {
    month_groups(entries)
        .into_iter()
        .filter_map(|(month_start, group)| sleep_bucket_of(group, month_start))
        .collect()
}

fn month_groups(entries: &[GapFilledEntry]) -> Vec<(NaiveDate, &[GapFilledEntry])> {
    let mut groups = Vec::new();
    let mut group_start = 0;
    for (i, entry) in entries.iter().enumerate() {
        let date = entry.date();
        let start_date = entries[group_start].date();
        if (date.year(), date.month()) != (start_date.year(), start_date.month()) {
            groups.push((first_of_month(start_date), &entries[group_start..i]));
            group_start = i;
        }
    }
    if group_start < entries.len() {
        groups.push((
            first_of_month(entries[group_start].date()),
            &entries[group_start..],
        ));
    }
    groups
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn bucket_of(chunk: &[GapFilledEntry]) -> AggregatedBucket {
    let date = chunk[0].date();
    let members: Vec<&DailyEntry> = chunk
        .iter()
        .filter(|e| !e.is_missing)
        .map(|e| &e.entry)
        .collect();

    if members.is_empty() {
        return AggregatedBucket::placeholder(date);
    }

    AggregatedBucket {
        date,
        energy_highest: mean_of(&members, DailyEntry::energy_highest),
        energy_lowest: mean_of(&members, DailyEntry::energy_lowest),
        mood_highest: mean_of(&members, DailyEntry::mood_highest),
        mood_lowest: mean_of(&members, DailyEntry::mood_lowest),
        anxiety: mean_of(&members, DailyEntry::anxiety_level),
        irritability: mean_of(&members, DailyEntry::irritability_level),
        caffeine_mg: mean_of(&members, |e| f64::from(e.caffeine())),
        member_days: members.len(),
        is_missing: false,
    }
}

fn mean_of(members: &[&DailyEntry], accessor: impl Fn(&DailyEntry) -> f64) -> f64 {
    let values: Vec<f64> = members.iter().map(|e| accessor(e)).collect();
    round1(mean(&values))
}

fn sleep_bucket_of(chunk: &[GapFilledEntry], bucket_date: NaiveDate) -> Option<SleepBucket> {
    let mut durations = Vec::new();
    let mut bedtimes = Vec::new();
    let mut wakes = Vec::new();
    let mut nap_days = 0;

    for entry in chunk.iter().filter(|e| !e.is_missing) {
        let Some(slots) = &entry.entry.sleep else {
            continue;
        };
        let analysis = SleepAnalyzer::analyze(slots);
        if analysis.duration <= 0.0 {
            continue;
        }

        durations.push(analysis.duration);
        if analysis.has_naps {
            nap_days += 1;
        }

        let bed = analysis.bedtime.as_deref().and_then(clock_minutes);
        let wake = analysis.wake_time.as_deref().and_then(clock_minutes);
        if let (Some(bed), Some(wake)) = (bed, wake) {
            bedtimes.push(shift_into_sleep_night(bed));
            wakes.push(wake);
        }
    }

    if durations.is_empty() {
        return None;
    }

    let bedtime_minutes = mean(&bedtimes).rem_euclid(MINUTES_PER_DAY);
    let wake_minutes = mean(&wakes);

    Some(SleepBucket {
        date: bucket_date,
        duration: round1(mean(&durations)),
        bedtime: minutes_label(bedtime_minutes),
        bedtime_minutes,
        wake_time: minutes_label(wake_minutes),
        wake_minutes,
        nap_days,
        member_days: durations.len(),
    })
}

/// Map a bedtime onto the continuous sleep-night axis: early-morning times
/// read as after midnight of the previous evening
fn shift_into_sleep_night(bedtime_minutes: f64) -> f64 {
    if bedtime_minutes < NIGHT_ROLLOVER_MINUTES {
        bedtime_minutes + MINUTES_PER_DAY
    } else {
        bedtime_minutes
    }
}

fn minutes_label(minutes: f64) -> String {
    let total = minutes.rem_euclid(MINUTES_PER_DAY).round() as u32 % 1440;
    format!("{:02}:{:02}", total / 60, total % 60)
}
