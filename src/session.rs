//! Session context and fetch caching
//!
//! The dashboard controller owns every piece of mutable state the analytics
//! pipeline touches: cached snapshots of the remote entry collections with a
//! freshness window, and last-fetch-wins request sequencing. Everything
//! below this layer is a pure function of its inputs.
//!
//! Reads are synchronous and complete before the next state-changing action
//! can fire; a snapshot is replaced whole, never patched in place.

use chrono::{DateTime, Utc};

use crate::calendar::Period;
use crate::error::AnalyticsError;
use crate::report::ReportBuilder;
use crate::types::{DailyEntry, DashboardPayload, HabitEntry};

/// Seconds a fetched snapshot stays fresh before the next read re-fetches
pub const SNAPSHOT_TTL_SECONDS: i64 = 300;

/// All-or-nothing source of a user's stored collections.
///
/// Implementations query by an opaque user identifier and return the whole
/// collection unordered; the session sorts ascending by date before use.
/// A failure here is the only fatal condition in the pipeline - aggregation
/// is never run on partial data.
pub trait EntrySource {
    fn fetch_entries(&self, user_id: &str) -> Result<Vec<DailyEntry>, AnalyticsError>;
    fn fetch_habit_entries(&self, user_id: &str) -> Result<Vec<HabitEntry>, AnalyticsError>;
}

#[derive(Debug, Clone)]
struct Snapshot<T> {
    data: Vec<T>,
    fetched_at: DateTime<Utc>,
}

/// Time-windowed cache over one collection.
///
/// Requests are tagged with a monotonically increasing sequence number;
/// a response older than the latest issued request is discarded, so a stale
/// fetch racing a fresh one resolves to last-fetch-wins.
#[derive(Debug, Default)]
pub struct SnapshotCache<T> {
    snapshot: Option<Snapshot<T>>,
    latest_seq: u64,
}

impl<T> SnapshotCache<T> {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            latest_seq: 0,
        }
    }

    /// Tag for the next fetch request
    pub fn issue_seq(&mut self) -> u64 {
        self.latest_seq += 1;
        self.latest_seq
    }

    /// Install a fetch response. Returns false (and drops the data) when a
    /// newer request has been issued since this one.
    pub fn accept(&mut self, seq: u64, data: Vec<T>, now: DateTime<Utc>) -> bool {
        if seq < self.latest_seq {
            return false;
        }
        self.snapshot = Some(Snapshot {
            data,
            fetched_at: now,
        });
        true
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.snapshot
            .as_ref()
            .map(|s| (now - s.fetched_at).num_seconds() < SNAPSHOT_TTL_SECONDS)
            .unwrap_or(false)
    }

    /// Cached data, regardless of freshness
    pub fn get(&self) -> Option<&[T]> {
        self.snapshot.as_ref().map(|s| s.data.as_slice())
    }

    /// Drop the snapshot so the next read re-fetches
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }
}

/// Stateful dashboard controller for one user's page session.
///
/// Owns the entry source, the snapshot caches, and the report builder;
/// repeated tab and period switches inside the freshness window reuse the
/// cached snapshots instead of re-fetching.
pub struct DashboardSession<S: EntrySource> {
    source: S,
    user_id: String,
    entries: SnapshotCache<DailyEntry>,
    habit_entries: SnapshotCache<HabitEntry>,
    builder: ReportBuilder,
}

impl<S: EntrySource> DashboardSession<S> {
    pub fn new(source: S, user_id: impl Into<String>) -> Self {
        Self {
            source,
            user_id: user_id.into(),
            entries: SnapshotCache::new(),
            habit_entries: SnapshotCache::new(),
            builder: ReportBuilder::new(),
        }
    }

    /// Build the complete payload for one dashboard view, fetching at most
    /// once per collection per freshness window
    pub fn dashboard(
        &mut self,
        period: Period,
        offset: i32,
        now: DateTime<Utc>,
    ) -> Result<DashboardPayload, AnalyticsError> {
        let entries = self.entries_snapshot(now)?;
        let habit_entries = self.habits_snapshot(now)?;
        Ok(self
            .builder
            .build(period, offset, now, &entries, &habit_entries))
    }

    /// Force both collections to re-fetch on the next read
    pub fn invalidate(&mut self) {
        self.entries.invalidate();
        self.habit_entries.invalidate();
    }

    fn entries_snapshot(&mut self, now: DateTime<Utc>) -> Result<Vec<DailyEntry>, AnalyticsError> {
        if !self.entries.is_fresh(now) {
            let seq = self.entries.issue_seq();
            let mut data = self.source.fetch_entries(&self.user_id)?;
            data.sort_by_key(|e| e.date);
            self.entries.accept(seq, data, now);
        }
        Ok(self.entries.get().unwrap_or(&[]).to_vec())
    }

    fn habits_snapshot(&mut self, now: DateTime<Utc>) -> Result<Vec<HabitEntry>, AnalyticsError> {
        if !self.habit_entries.is_fresh(now) {
            let seq = self.habit_entries.issue_seq();
            let mut data = self.source.fetch_habit_entries(&self.user_id)?;
            data.sort_by_key(|e| e.date);
            self.habit_entries.accept(seq, data, now);
        }
        Ok(self.habit_entries.get().unwrap_or(&[]).to_vec())
    }
}
