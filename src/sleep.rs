//! Sleep interval analysis
//!
//! Converts a day's 48-slot half-hour occupancy grid into contiguous sleep
//! periods, main-sleep bedtime and wake time, and nap structure. A single
//! linear scan over the grid; results are derived on demand and never cached.

use crate::types::{SleepAnalysis, SleepPeriod};

/// Half-hour slots in one day
pub const SLOTS_PER_DAY: usize = 48;

/// Hours represented by one slot
pub const SLOT_HOURS: f64 = 0.5;

const MINUTES_PER_SLOT: usize = 30;

/// Analyzer for the boolean occupancy grid
pub struct SleepAnalyzer;

impl SleepAnalyzer {
    /// Analyze a 48-slot occupancy grid.
    ///
    /// Shorter inputs are treated as ending the day awake; slots beyond 48
    /// are ignored. Runs of `true` become inclusive-index periods; the
    /// longest is main sleep and the rest are naps. Wake time is the slot
    /// after the last asleep slot, which wraps to `00:00` when main sleep
    /// runs through the final slot.
    pub fn analyze(slots: &[bool]) -> SleepAnalysis {
        let mut periods: Vec<SleepPeriod> = Vec::new();
        let mut run_start: Option<usize> = None;

        for (i, &asleep) in slots.iter().take(SLOTS_PER_DAY).enumerate() {
            match (asleep, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    periods.push(make_period(start, i - 1));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            periods.push(make_period(start, slots.len().min(SLOTS_PER_DAY) - 1));
        }

        if periods.is_empty() {
            return SleepAnalysis::empty();
        }

        let duration: f64 = periods.iter().map(|p| p.duration).sum();

        // Longest period first; ties keep scan order, so the earlier run wins
        let mut by_length = periods.clone();
        by_length.sort_by(|a, b| b.duration.total_cmp(&a.duration));

        let main = by_length[0];
        let naps: Vec<SleepPeriod> = by_length[1..]
            .iter()
            .filter(|p| p.duration >= SLOT_HOURS)
            .copied()
            .collect();
        let total_nap_duration: f64 = naps.iter().map(|p| p.duration).sum();

        SleepAnalysis {
            duration,
            bedtime: Some(clock_label(main.start)),
            wake_time: Some(clock_label(main.end + 1)),
            periods,
            main_sleep_duration: main.duration,
            has_naps: !naps.is_empty(),
            nap_count: naps.len(),
            total_nap_duration,
            naps,
        }
    }
}

fn make_period(start: usize, end: usize) -> SleepPeriod {
    SleepPeriod {
        start,
        end,
        duration: (end - start + 1) as f64 * SLOT_HOURS,
    }
}

/// Clock label `HH:MM` for a slot boundary; slot 48 wraps to `00:00`.
///
/// The wrap is implicit in the label. Callers averaging clock times across
/// days must re-detect it (see the aggregate module's circular bedtime mean).
pub fn clock_label(slot: usize) -> String {
    let slot = slot % SLOTS_PER_DAY;
    format!("{:02}:{:02}", slot / 2, (slot % 2) * MINUTES_PER_SLOT)
}

/// Parse an `HH:MM` clock label back into minutes past midnight
pub fn clock_minutes(label: &str) -> Option<f64> {
    let (hours, minutes) = label.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours >= 24 || minutes >= 60 {
        return None;
    }
    Some(f64::from(hours * 60 + minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(asleep_ranges: &[(usize, usize)]) -> Vec<bool> {
        let mut slots = vec![false; SLOTS_PER_DAY];
        for &(start, end) in asleep_ranges {
            for slot in slots.iter_mut().take(end + 1).skip(start) {
                *slot = true;
            }
        }
        slots
    }

    #[test]
    fn test_all_awake_returns_zeroed_result() {
        let analysis = SleepAnalyzer::analyze(&grid(&[]));
        assert_eq!(analysis.duration, 0.0);
        assert_eq!(analysis.bedtime, None);
        assert_eq!(analysis.wake_time, None);
        assert!(!analysis.has_naps);
        assert!(analysis.periods.is_empty());
    }

    #[test]
    fn test_single_night_block() {
        // Asleep slots 0-13: midnight through 07:00
        let analysis = SleepAnalyzer::analyze(&grid(&[(0, 13)]));
        assert_eq!(analysis.duration, 7.0);
        assert_eq!(analysis.bedtime.as_deref(), Some("00:00"));
        assert_eq!(analysis.wake_time.as_deref(), Some("07:00"));
        assert_eq!(analysis.main_sleep_duration, 7.0);
        assert_eq!(analysis.nap_count, 0);
    }

    #[test]
    fn test_wrap_scenario_keeps_runs_separate() {
        // Asleep 22:00-midnight and midnight-07:00: two physically separate
        // runs, no circular merging; the longer morning run is main sleep
        let analysis = SleepAnalyzer::analyze(&grid(&[(44, 47), (0, 13)]));
        assert_eq!(analysis.periods.len(), 2);
        assert_eq!(analysis.main_sleep_duration, 7.0);
        assert_eq!(analysis.bedtime.as_deref(), Some("00:00"));
        assert_eq!(analysis.wake_time.as_deref(), Some("07:00"));
        // The evening run counts as a nap
        assert_eq!(analysis.nap_count, 1);
        assert_eq!(analysis.total_nap_duration, 2.0);
        assert_eq!(analysis.duration, 9.0);
    }

    #[test]
    fn test_sleep_through_final_slot_wraps_wake_time() {
        let analysis = SleepAnalyzer::analyze(&grid(&[(40, 47)]));
        assert_eq!(analysis.bedtime.as_deref(), Some("20:00"));
        assert_eq!(analysis.wake_time.as_deref(), Some("00:00"));
        assert_eq!(analysis.duration, 4.0);
    }

    #[test]
    fn test_nap_detection() {
        // Night block plus an afternoon nap 14:00-15:30
        let analysis = SleepAnalyzer::analyze(&grid(&[(0, 13), (28, 30)]));
        assert_eq!(analysis.main_sleep_duration, 7.0);
        assert!(analysis.has_naps);
        assert_eq!(analysis.nap_count, 1);
        assert_eq!(analysis.naps[0].start, 28);
        assert_eq!(analysis.total_nap_duration, 1.5);
        assert_eq!(analysis.duration, 8.5);
    }

    #[test]
    fn test_half_hour_nap_counts() {
        let analysis = SleepAnalyzer::analyze(&grid(&[(0, 13), (30, 30)]));
        assert_eq!(analysis.nap_count, 1);
        assert_eq!(analysis.naps[0].duration, 0.5);
    }

    #[test]
    fn test_tie_prefers_earlier_run() {
        let analysis = SleepAnalyzer::analyze(&grid(&[(2, 5), (20, 23)]));
        assert_eq!(analysis.bedtime.as_deref(), Some("01:00"));
        assert_eq!(analysis.nap_count, 1);
    }

    #[test]
    fn test_short_input_tolerated() {
        let analysis = SleepAnalyzer::analyze(&[true, true, false, true]);
        assert_eq!(analysis.periods.len(), 2);
        assert_eq!(analysis.duration, 1.5);
    }

    #[test]
    fn test_clock_label() {
        assert_eq!(clock_label(0), "00:00");
        assert_eq!(clock_label(1), "00:30");
        assert_eq!(clock_label(15), "07:30");
        assert_eq!(clock_label(47), "23:30");
        assert_eq!(clock_label(48), "00:00");
    }

    #[test]
    fn test_clock_minutes() {
        assert_eq!(clock_minutes("00:00"), Some(0.0));
        assert_eq!(clock_minutes("07:30"), Some(450.0));
        assert_eq!(clock_minutes("23:30"), Some(1410.0));
        assert_eq!(clock_minutes("24:00"), None);
        assert_eq!(clock_minutes("bedtime"), None);
    }
}
