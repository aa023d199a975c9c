//! Dayline - analytics engine for sparse daily self-tracking series
//!
//! Dayline turns an irregularly populated collection of daily entries
//! (sleep occupancy, mood, energy, caffeine, tags, habits) into chart-ready
//! series and insight statements through a deterministic pipeline:
//! gap filling → sleep interval analysis → granularity aggregation →
//! statistics → pattern mining → report assembly.
//!
//! ## Modules
//!
//! - **calendar**: period range arithmetic, offset navigation, formatting
//! - **normalizer**: calendar-complete gap filling over sparse entries
//! - **sleep**: 48-slot occupancy grid to sleep/nap structure
//! - **aggregate**: day series to week/month buckets, circular bedtime mean
//! - **stats**: mean, trend classification, correlation, volatility
//! - **insight**: comparative pattern mining over categorical axes
//! - **habits**: per-habit rollups and period commentary
//! - **session**: fetch caching and the stateful dashboard controller
//! - **report**: the rendering handoff payload

pub mod aggregate;
pub mod calendar;
pub mod error;
pub mod habits;
pub mod insight;
pub mod normalizer;
pub mod report;
pub mod session;
pub mod sleep;
pub mod stats;
pub mod types;

pub use calendar::{date_range, period_label, DateRange, Period};
pub use error::AnalyticsError;
pub use normalizer::SeriesNormalizer;
pub use report::ReportBuilder;
pub use session::{DashboardSession, EntrySource, SnapshotCache};
pub use sleep::SleepAnalyzer;
pub use stats::Trend;
pub use types::{
    DailyEntry, DashboardPayload, GapFilledEntry, Habit, HabitEntry, Insight, Metric,
    SleepAnalysis,
};

/// Engine version embedded in all report payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report payloads
pub const PRODUCER_NAME: &str = "dayline";
