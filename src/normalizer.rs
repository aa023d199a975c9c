//! Series normalization
//!
//! This module turns a sparse, irregularly populated list of daily entries
//! into a calendar-complete ordered series for a requested range:
//! - One entry per date, ascending
//! - Gaps filled with baseline placeholder entries flagged `is_missing`
//! - Linear in the number of days in range

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::types::{DailyEntry, GapFilledEntry};

/// Normalizer producing gap-filled series from sparse entry collections
pub struct SeriesNormalizer;

impl SeriesNormalizer {
    /// Fill every calendar date from `start` to `end` inclusive.
    ///
    /// Stored entries are wrapped as-is; dates without one get a baseline
    /// placeholder. The input is indexed first so the pass over the range is
    /// a single lookup per day. Duplicate dates resolve last-write-wins in
    /// input order; callers that care which duplicate survives must pre-sort
    /// or deduplicate.
    pub fn fill(entries: &[DailyEntry], start: NaiveDate, end: NaiveDate) -> Vec<GapFilledEntry> {
        if end < start {
            return Vec::new();
        }

        let mut by_date: HashMap<NaiveDate, &DailyEntry> =
            HashMap::with_capacity(entries.len());
        for entry in entries {
            by_date.insert(entry.date, entry);
        }

        let days = (end - start).num_days() + 1;
        let mut filled = Vec::with_capacity(days as usize);
        let mut date = start;
        while date <= end {
            match by_date.get(&date) {
                Some(entry) => filled.push(GapFilledEntry::present((*entry).clone())),
                None => filled.push(GapFilledEntry::missing(date)),
            }
            date += Duration::days(1);
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScaleRange, DEFAULT_SCALE};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn make_entry(date: NaiveDate, mood_high: u8) -> DailyEntry {
        let mut entry = DailyEntry::new(date);
        entry.mood = ScaleRange::new(mood_high, 3);
        entry
    }

    #[test]
    fn test_fill_covers_every_day_ascending() {
        let entries = vec![make_entry(d(2024, 1, 16), 5), make_entry(d(2024, 1, 19), 6)];
        let filled = SeriesNormalizer::fill(&entries, d(2024, 1, 15), d(2024, 1, 21));

        assert_eq!(filled.len(), 7);
        for (i, e) in filled.iter().enumerate() {
            assert_eq!(e.date(), d(2024, 1, 15) + Duration::days(i as i64));
        }
    }

    #[test]
    fn test_stored_and_synthesized_entries() {
        let entries = vec![make_entry(d(2024, 1, 16), 5)];
        let filled = SeriesNormalizer::fill(&entries, d(2024, 1, 15), d(2024, 1, 17));

        assert!(filled[0].is_missing);
        assert_eq!(filled[0].entry.mood_highest(), DEFAULT_SCALE);

        assert!(!filled[1].is_missing);
        assert_eq!(filled[1].entry.mood_highest(), 5.0);

        assert!(filled[2].is_missing);
    }

    #[test]
    fn test_single_day_range() {
        let filled = SeriesNormalizer::fill(&[], d(2024, 1, 15), d(2024, 1, 15));
        assert_eq!(filled.len(), 1);
        assert!(filled[0].is_missing);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let filled = SeriesNormalizer::fill(&[], d(2024, 1, 21), d(2024, 1, 15));
        assert!(filled.is_empty());
    }

    #[test]
    fn test_entries_outside_range_ignored() {
        let entries = vec![make_entry(d(2023, 12, 1), 7), make_entry(d(2024, 2, 1), 7)];
        let filled = SeriesNormalizer::fill(&entries, d(2024, 1, 15), d(2024, 1, 17));
        assert!(filled.iter().all(|e| e.is_missing));
    }

    #[test]
    fn test_duplicate_dates_last_write_wins() {
        let entries = vec![make_entry(d(2024, 1, 16), 2), make_entry(d(2024, 1, 16), 6)];
        let filled = SeriesNormalizer::fill(&entries, d(2024, 1, 16), d(2024, 1, 16));
        assert_eq!(filled[0].entry.mood_highest(), 6.0);
    }

    #[test]
    fn test_unsorted_input_fills_correctly() {
        let entries = vec![make_entry(d(2024, 1, 19), 6), make_entry(d(2024, 1, 16), 5)];
        let filled = SeriesNormalizer::fill(&entries, d(2024, 1, 15), d(2024, 1, 21));
        assert_eq!(filled[1].entry.mood_highest(), 5.0);
        assert_eq!(filled[4].entry.mood_highest(), 6.0);
    }
}
