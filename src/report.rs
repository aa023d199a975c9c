//! Dashboard report assembly
//!
//! This module builds the rendering handoff consumed by the presentation
//! layer: chart-ready series per metric, sleep aggregates, insight
//! statements, habit rollups, and producer metadata. All chart styling and
//! DOM work happens downstream; the payload is plain JSON-shaped data.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::aggregate;
use crate::calendar::{self, DateFormat, Period};
use crate::insight;
use crate::normalizer::SeriesNormalizer;
use crate::sleep::{clock_minutes, SleepAnalyzer};
use crate::stats::{self, round1};
use crate::types::{
    ChartPoint, ChartSeries, DailyEntry, DashboardPayload, GapFilledEntry, HabitEntry, Metric,
    MetricStats, ReportProducer, SleepBucket,
};
use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// Days folded into one chart bucket at month and quarter granularity
const WEEK_CHUNK_DAYS: usize = 7;

/// How a period's daily series folds into chart buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BucketPlan {
    /// One point per day, placeholders included
    Daily,
    /// Fixed-size chunks of days
    Chunk(usize),
    /// Calendar-month groups
    CalendarMonth,
}

fn bucket_plan(period: Period) -> BucketPlan {
    match period {
        Period::Week => BucketPlan::Daily,
        Period::Month | Period::Quarter => BucketPlan::Chunk(WEEK_CHUNK_DAYS),
        Period::Year => BucketPlan::CalendarMonth,
    }
}

/// Builder producing dashboard payloads with stable producer metadata
pub struct ReportBuilder {
    instance_id: String,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    /// Create a builder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a builder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Assemble the complete payload for one dashboard view.
    ///
    /// `entries` and `habit_entries` are the full stored collections; the
    /// builder normalizes the requested range out of them itself.
    pub fn build(
        &self,
        period: Period,
        offset: i32,
        now: DateTime<Utc>,
        entries: &[DailyEntry],
        habit_entries: &[HabitEntry],
    ) -> DashboardPayload {
        let today = now.date_naive();
        let range = calendar::date_range(period, offset, today);
        let filled = SeriesNormalizer::fill(entries, range.start, range.end);
        let plan = bucket_plan(period);

        let series = Metric::ALL
            .iter()
            .map(|&metric| build_series(metric, &filled, plan))
            .collect();

        DashboardPayload {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at_utc: now.to_rfc3339(),
            period,
            offset,
            label: calendar::period_label(period, offset, today),
            range,
            series,
            stats: build_stats(&filled),
            caffeine_mood_correlation: caffeine_mood_correlation(&filled),
            sleep: build_sleep(&filled, plan),
            insights: insight::mine(&filled),
            habits: crate::habits::rollup(habit_entries, period, offset, today),
        }
    }
}

fn build_series(metric: Metric, filled: &[GapFilledEntry], plan: BucketPlan) -> ChartSeries {
    let points = match plan {
        BucketPlan::Daily => filled
            .iter()
            .map(|e| ChartPoint {
                date: calendar::format_date(e.date(), DateFormat::Iso),
                label: calendar::day_name(e.date()).to_string(),
                value: metric.value_of(&e.entry),
                low: metric.low_of(&e.entry),
                missing: e.is_missing,
            })
            .collect(),
        BucketPlan::Chunk(size) => bucket_points(metric, &aggregate::by_chunk(filled, size)),
        BucketPlan::CalendarMonth => bucket_points(metric, &aggregate::by_calendar_month(filled)),
    };
    ChartSeries { metric, points }
}

fn bucket_points(metric: Metric, buckets: &[crate::types::AggregatedBucket]) -> Vec<ChartPoint> {
    buckets
        .iter()
        .map(|b| ChartPoint {
            date: calendar::format_date(b.date, DateFormat::Iso),
            label: calendar::format_date(b.date, DateFormat::Compact),
            value: b.metric_value(metric),
            low: b.metric_low(metric),
            missing: b.is_missing,
        })
        .collect()
}

fn build_sleep(filled: &[GapFilledEntry], plan: BucketPlan) -> Vec<SleepBucket> {
    match plan {
        BucketPlan::Daily => filled
            .iter()
            .filter(|e| !e.is_missing)
            .filter_map(|e| {
                let slots = e.entry.sleep.as_ref()?;
                let analysis = SleepAnalyzer::analyze(slots);
                if analysis.duration <= 0.0 {
                    return None;
                }
                let bedtime = analysis.bedtime?;
                let wake_time = analysis.wake_time?;
                let bedtime_minutes = clock_minutes(&bedtime)?;
                let wake_minutes = clock_minutes(&wake_time)?;
                Some(SleepBucket {
                    date: e.date(),
                    duration: analysis.duration,
                    bedtime,
                    bedtime_minutes,
                    wake_time,
                    wake_minutes,
                    nap_days: usize::from(analysis.has_naps),
                    member_days: 1,
                })
            })
            .collect(),
        BucketPlan::Chunk(size) => aggregate::sleep_by_chunk(filled, size),
        BucketPlan::CalendarMonth => aggregate::sleep_by_calendar_month(filled),
    }
}

fn build_stats(filled: &[GapFilledEntry]) -> Vec<MetricStats> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let values: Vec<f64> = filled
                .iter()
                .filter(|e| !e.is_missing)
                .map(|e| metric.value_of(&e.entry))
                .collect();
            MetricStats {
                metric,
                average: round1(stats::mean(&values)),
                trend: stats::trend(&values),
                volatility: round1(stats::volatility(filled, metric)),
            }
        })
        .collect()
}

fn caffeine_mood_correlation(filled: &[GapFilledEntry]) -> Option<f64> {
    let real: Vec<&DailyEntry> = filled
        .iter()
        .filter(|e| !e.is_missing)
        .map(|e| &e.entry)
        .collect();
    let caffeine: Vec<f64> = real.iter().map(|e| f64::from(e.caffeine())).collect();
    let mood: Vec<f64> = real.iter().map(|e| e.mood_highest()).collect();
    stats::correlation(&caffeine, &mood)
}
