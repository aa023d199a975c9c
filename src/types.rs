//! Core types for the dayline analytics pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw daily entries, gap-filled series, derived sleep structure,
//! aggregated buckets, and the dashboard report payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::calendar::{DateRange, Period};

/// Baseline substituted for 1-7 scale fields that are absent or out of range
pub const DEFAULT_SCALE: f64 = 4.0;

const SCALE_MIN: u8 = 1;
const SCALE_MAX: u8 = 7;

/// Read a 1-7 scale value, substituting the baseline for missing or
/// out-of-range values rather than failing. Explicit `Option` handling only:
/// zero is out of the valid domain here, but fields where zero is meaningful
/// (caffeine, minutes) must never route through this.
fn scale_or_default(value: Option<u8>) -> f64 {
    match value {
        Some(v) if (SCALE_MIN..=SCALE_MAX).contains(&v) => f64::from(v),
        _ => DEFAULT_SCALE,
    }
}

/// Highest/lowest pair for the two-sided 1-7 metrics (energy, mood)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest: Option<u8>,
}

impl ScaleRange {
    pub fn new(highest: u8, lowest: u8) -> Self {
        Self {
            highest: Some(highest),
            lowest: Some(lowest),
        }
    }
}

/// One tracked day as captured by the entry layer.
///
/// The core never validates these; malformed scalar values are tolerated by
/// substitution through the defaulted accessors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Calendar date, unique key within a user's collection
    pub date: NaiveDate,
    /// 48 half-hour occupancy slots, slot i = [i*30min, (i+1)*30min), true = asleep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep: Option<Vec<bool>>,
    /// Caffeine intake in milligrams
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caffeine_mg: Option<u32>,
    #[serde(default)]
    pub energy: ScaleRange,
    #[serde(default)]
    pub mood: ScaleRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anxiety: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irritability: Option<u8>,
    /// Free-text activity tags; duplicates within a day collapse to presence
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub activities: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub people: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DailyEntry {
    /// Entry with baseline defaults for the given date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    pub fn energy_highest(&self) -> f64 {
        scale_or_default(self.energy.highest)
    }

    pub fn energy_lowest(&self) -> f64 {
        scale_or_default(self.energy.lowest)
    }

    pub fn mood_highest(&self) -> f64 {
        scale_or_default(self.mood.highest)
    }

    pub fn mood_lowest(&self) -> f64 {
        scale_or_default(self.mood.lowest)
    }

    pub fn anxiety_level(&self) -> f64 {
        scale_or_default(self.anxiety)
    }

    pub fn irritability_level(&self) -> f64 {
        scale_or_default(self.irritability)
    }

    /// Caffeine in milligrams; absent reads as 0, recorded 0 stays 0
    pub fn caffeine(&self) -> u32 {
        self.caffeine_mg.unwrap_or(0)
    }

    pub fn has_caffeine(&self) -> bool {
        self.caffeine() > 0
    }
}

/// Closed set of chartable wellbeing metrics.
///
/// Typed dispatch instead of string-keyed field lookup: two-sided metrics
/// carry a highest/lowest pair, one-sided metrics a single level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Energy,
    Mood,
    Anxiety,
    Irritability,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Energy,
        Metric::Mood,
        Metric::Anxiety,
        Metric::Irritability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Energy => "energy",
            Metric::Mood => "mood",
            Metric::Anxiety => "anxiety",
            Metric::Irritability => "irritability",
        }
    }

    pub fn is_two_sided(&self) -> bool {
        matches!(self, Metric::Energy | Metric::Mood)
    }

    /// Anxiety and irritability improve downward
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Metric::Anxiety | Metric::Irritability)
    }

    /// Primary per-day reading: the high-water mark for two-sided metrics,
    /// the recorded level for one-sided ones
    pub fn value_of(&self, entry: &DailyEntry) -> f64 {
        match self {
            Metric::Energy => entry.energy_highest(),
            Metric::Mood => entry.mood_highest(),
            Metric::Anxiety => entry.anxiety_level(),
            Metric::Irritability => entry.irritability_level(),
        }
    }

    /// Low-water mark for two-sided metrics; `None` for one-sided ones
    pub fn low_of(&self, entry: &DailyEntry) -> Option<f64> {
        match self {
            Metric::Energy => Some(entry.energy_lowest()),
            Metric::Mood => Some(entry.mood_lowest()),
            Metric::Anxiety | Metric::Irritability => None,
        }
    }
}

/// A daily entry positioned in a calendar-complete series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapFilledEntry {
    #[serde(flatten)]
    pub entry: DailyEntry,
    /// True when no stored entry existed for this date and the values are
    /// synthesized baselines; excluded from trend, averages, and mining
    pub is_missing: bool,
}

impl GapFilledEntry {
    pub fn present(entry: DailyEntry) -> Self {
        Self {
            entry,
            is_missing: false,
        }
    }

    /// Baseline placeholder for a date with no stored entry
    pub fn missing(date: NaiveDate) -> Self {
        Self {
            entry: DailyEntry::new(date),
            is_missing: true,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.entry.date
    }
}

/// One maximal run of asleep slots, inclusive slot indices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepPeriod {
    pub start: usize,
    pub end: usize,
    /// Hours, (end - start + 1) * 0.5
    pub duration: f64,
}

/// Derived sleep structure for a single day.
///
/// Computed on demand from the occupancy grid; never cached beyond a single
/// aggregation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepAnalysis {
    /// Total asleep hours across all periods
    pub duration: f64,
    /// Clock string HH:MM of the main sleep start; `None` when no sleep
    pub bedtime: Option<String>,
    /// Clock string of the slot after the last asleep slot of main sleep
    pub wake_time: Option<String>,
    pub periods: Vec<SleepPeriod>,
    pub main_sleep_duration: f64,
    /// Periods other than main sleep, each at least half an hour
    pub naps: Vec<SleepPeriod>,
    pub has_naps: bool,
    pub nap_count: usize,
    pub total_nap_duration: f64,
}

impl SleepAnalysis {
    /// Zeroed result for a day with no asleep slots
    pub fn empty() -> Self {
        Self {
            duration: 0.0,
            bedtime: None,
            wake_time: None,
            periods: Vec::new(),
            main_sleep_duration: 0.0,
            naps: Vec::new(),
            has_naps: false,
            nap_count: 0,
            total_nap_duration: 0.0,
        }
    }
}

/// One coarser-granularity bucket produced by the scalar aggregator.
///
/// Scalar fields are means over the non-missing members only, rounded to one
/// decimal; missing members are excluded from the denominator entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedBucket {
    /// First date of the chunk (or first of the calendar month)
    pub date: NaiveDate,
    pub energy_highest: f64,
    pub energy_lowest: f64,
    pub mood_highest: f64,
    pub mood_lowest: f64,
    pub anxiety: f64,
    pub irritability: f64,
    pub caffeine_mg: f64,
    /// Days that contributed real data
    pub member_days: usize,
    /// True only when every member of the bucket was missing
    pub is_missing: bool,
}

impl AggregatedBucket {
    /// Placeholder bucket for an all-missing chunk, dated at its first day
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            energy_highest: DEFAULT_SCALE,
            energy_lowest: DEFAULT_SCALE,
            mood_highest: DEFAULT_SCALE,
            mood_lowest: DEFAULT_SCALE,
            anxiety: DEFAULT_SCALE,
            irritability: DEFAULT_SCALE,
            caffeine_mg: 0.0,
            member_days: 0,
            is_missing: true,
        }
    }

    pub fn metric_value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Energy => self.energy_highest,
            Metric::Mood => self.mood_highest,
            Metric::Anxiety => self.anxiety,
            Metric::Irritability => self.irritability,
        }
    }

    pub fn metric_low(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Energy => Some(self.energy_lowest),
            Metric::Mood => Some(self.mood_lowest),
            Metric::Anxiety | Metric::Irritability => None,
        }
    }
}

/// Sleep aggregate for one chunk of days.
///
/// Unlike the scalar aggregator, chunks with no valid sleep entries are
/// dropped rather than emitted as zero buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SleepBucket {
    pub date: NaiveDate,
    /// Mean asleep hours over valid members, one decimal
    pub duration: f64,
    /// Circular mean of main-sleep start, HH:MM
    pub bedtime: String,
    /// Minutes past midnight of the circular bedtime mean
    pub bedtime_minutes: f64,
    /// Plain mean of main-sleep end, HH:MM
    pub wake_time: String,
    pub wake_minutes: f64,
    /// Member days on which at least one nap occurred
    pub nap_days: usize,
    /// Days that contributed sleep data
    pub member_days: usize,
}

/// One tracked day in the habit collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitEntry {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaning_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_fiction: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_nonfiction: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_fanfic: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_comic: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_nonfiction: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_poetry: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_prose: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writing_reflection: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercise_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_language_time: Option<u32>,
    /// Explicit completion flags keyed by habit id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub completed: BTreeMap<String, bool>,
}

impl HabitEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }
}

/// The five tracked habits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Habit {
    Cleaning,
    Exercise,
    Reading,
    Writing,
    SecondLanguage,
}

impl Habit {
    pub const ALL: [Habit; 5] = [
        Habit::Cleaning,
        Habit::Exercise,
        Habit::Reading,
        Habit::Writing,
        Habit::SecondLanguage,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Habit::Cleaning => "cleaning",
            Habit::Exercise => "exercise",
            Habit::Reading => "reading",
            Habit::Writing => "writing",
            Habit::SecondLanguage => "second_language",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Habit::Cleaning => "Cleaning",
            Habit::Exercise => "Exercise",
            Habit::Reading => "Reading",
            Habit::Writing => "Writing",
            Habit::SecondLanguage => "Second language",
        }
    }

    /// Minutes logged for this habit on one day; reading and writing sum
    /// their sub-category fields
    pub fn minutes(&self, entry: &HabitEntry) -> u32 {
        match self {
            Habit::Cleaning => entry.cleaning_time.unwrap_or(0),
            Habit::Exercise => entry.exercise_time.unwrap_or(0),
            Habit::Reading => {
                entry.reading_fiction.unwrap_or(0)
                    + entry.reading_nonfiction.unwrap_or(0)
                    + entry.reading_fanfic.unwrap_or(0)
                    + entry.reading_comic.unwrap_or(0)
            }
            Habit::Writing => {
                entry.writing_nonfiction.unwrap_or(0)
                    + entry.writing_poetry.unwrap_or(0)
                    + entry.writing_prose.unwrap_or(0)
                    + entry.writing_reflection.unwrap_or(0)
            }
            Habit::SecondLanguage => entry.second_language_time.unwrap_or(0),
        }
    }

    /// A habit counts as done on a day when minutes were logged or the
    /// completion flag was set
    pub fn is_done(&self, entry: &HabitEntry) -> bool {
        self.minutes(entry) > 0 || entry.completed.get(self.id()).copied().unwrap_or(false)
    }
}

/// Per-habit rollup over one period, with the preceding period for contrast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitSummary {
    pub habit: Habit,
    pub total_minutes: u32,
    pub days_completed: u32,
    /// Mean minutes per completed day, one decimal; 0 when never completed
    pub avg_minutes_per_day: f64,
    pub previous_total_minutes: u32,
    /// Current total minus previous total
    pub delta_minutes: i64,
    pub trend: crate::stats::Trend,
    /// Exactly one commentary line selected from the period's band table
    pub commentary: String,
}

/// The comparison axis an insight came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Caffeine,
    SleepDuration,
    Activity,
    People,
}

/// One human-readable insight statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
}

/// Report producer metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// One chart-ready point; placeholder points carry baseline values with
/// `missing` set so charts can render them as visually distinct marks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    /// ISO date of the day or bucket start
    pub date: String,
    /// Axis label: day name at week granularity, M/D otherwise
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    pub missing: bool,
}

/// Chart-ready series for one metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub points: Vec<ChartPoint>,
}

/// Headline statistics for one metric over the visible period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricStats {
    pub metric: Metric,
    /// Mean over non-missing days, one decimal
    pub average: f64,
    pub trend: crate::stats::Trend,
    /// Mean daily |highest - lowest| spread; 0 for one-sided metrics
    pub volatility: f64,
}

/// Complete rendering handoff for one dashboard view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub period: Period,
    pub offset: i32,
    pub label: String,
    pub range: DateRange,
    pub series: Vec<ChartSeries>,
    pub stats: Vec<MetricStats>,
    /// Pearson r between caffeine intake and peak mood; `None` when degenerate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caffeine_mood_correlation: Option<f64>,
    pub sleep: Vec<SleepBucket>,
    pub insights: Vec<Insight>,
    pub habits: Vec<HabitSummary>,
}
