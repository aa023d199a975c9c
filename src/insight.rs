//! Comparative pattern mining
//!
//! Partitions valid (non-missing) entries along fixed categorical axes and
//! reports a human-readable statement whenever the gap between groups clears
//! a minimum-effect threshold. Empty groups and zero denominators always
//! resolve to "nothing to report" rather than an error or a NaN.
//!
//! Axes:
//! - Caffeine presence vs absence, across all four metrics
//! - Sleep-duration buckets (0-4h, 5-8h, 8h+)
//! - Top activity tags vs their absence, on peak mood
//! - Top people tags vs their absence, on peak mood

use std::collections::{BTreeSet, HashMap};

use crate::sleep::SleepAnalyzer;
use crate::stats::mean;
use crate::types::{DailyEntry, GapFilledEntry, Insight, InsightKind, Metric};

/// Minimum mean gap before a caffeine comparison is reported
pub const CAFFEINE_EFFECT_THRESHOLD: f64 = 0.5;

/// Minimum best-vs-worst gap before a sleep-duration comparison is reported
pub const SLEEP_EFFECT_THRESHOLD: f64 = 0.3;

/// Minimum with-vs-without gap before a tag comparison is reported
pub const TAG_EFFECT_THRESHOLD: f64 = 0.7;

/// How many of the most frequent tags are examined per tag axis
pub const TOP_TAG_COUNT: usize = 3;

/// Which tag set a tag-impact pass reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAxis {
    Activity,
    People,
}

/// Sleep-duration bucket for comparative analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SleepBand {
    Short,
    Medium,
    Long,
}

impl SleepBand {
    const ALL: [SleepBand; 3] = [SleepBand::Short, SleepBand::Medium, SleepBand::Long];

    fn of(duration_hours: f64) -> SleepBand {
        if duration_hours <= 4.0 {
            SleepBand::Short
        } else if duration_hours <= 8.0 {
            SleepBand::Medium
        } else {
            SleepBand::Long
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SleepBand::Short => "0-4h",
            SleepBand::Medium => "5-8h",
            SleepBand::Long => "8h+",
        }
    }
}

/// Run every comparison axis over a gap-filled series, in a fixed order
pub fn mine(entries: &[GapFilledEntry]) -> Vec<Insight> {
    let valid: Vec<&DailyEntry> = entries
        .iter()
        .filter(|e| !e.is_missing)
        .map(|e| &e.entry)
        .collect();

    let mut insights = Vec::new();
    insights.extend(caffeine_impact(&valid));
    insights.extend(sleep_duration_impact(&valid));
    insights.extend(tag_impact(&valid, TagAxis::Activity));
    insights.extend(tag_impact(&valid, TagAxis::People));
    insights
}

/// Compare days with caffeine against days without, one statement per metric
/// that clears the threshold
pub fn caffeine_impact(valid: &[&DailyEntry]) -> Vec<Insight> {
    let (with, without): (Vec<&&DailyEntry>, Vec<&&DailyEntry>) =
        valid.iter().partition(|e| e.has_caffeine());
    if with.is_empty() || without.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::new();
    for metric in Metric::ALL {
        let avg_with = mean(&with.iter().map(|e| metric.value_of(e)).collect::<Vec<_>>());
        let avg_without = mean(&without.iter().map(|e| metric.value_of(e)).collect::<Vec<_>>());

        let diff = avg_with - avg_without;
        if diff.abs() < CAFFEINE_EFFECT_THRESHOLD || avg_without == 0.0 {
            continue;
        }
        let pct = diff / avg_without * 100.0;

        insights.push(Insight {
            kind: InsightKind::Caffeine,
            text: format!(
                "{} is {:.0}% {} on days with caffeine",
                metric_phrase(metric),
                pct.abs(),
                direction_word(metric, diff),
            ),
        });
    }
    insights
}

/// Compare sleep-duration buckets per metric; one or no statement per metric
pub fn sleep_duration_impact(valid: &[&DailyEntry]) -> Vec<Insight> {
    // Bucket each day that has actual sleep data by its total duration
    let mut banded: Vec<(SleepBand, &DailyEntry)> = Vec::new();
    for &entry in valid {
        let Some(slots) = &entry.sleep else {
            continue;
        };
        let analysis = SleepAnalyzer::analyze(slots);
        if analysis.duration > 0.0 {
            banded.push((SleepBand::of(analysis.duration), entry));
        }
    }
    if banded.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::new();
    for metric in Metric::ALL {
        let mut band_means: Vec<(SleepBand, f64)> = Vec::new();
        for band in SleepBand::ALL {
            let values: Vec<f64> = banded
                .iter()
                .filter(|(b, _)| *b == band)
                .map(|(_, e)| metric.value_of(e))
                .collect();
            if !values.is_empty() {
                band_means.push((band, mean(&values)));
            }
        }

        if band_means.len() == 1 {
            let (band, avg) = band_means[0];
            insights.push(Insight {
                kind: InsightKind::SleepDuration,
                text: format!(
                    "{} averages {:.1} after {} nights",
                    metric_phrase(metric),
                    avg,
                    band.label(),
                ),
            });
            continue;
        }

        // Best bucket first: lowest mean for anxiety/irritability, highest
        // otherwise
        if metric.lower_is_better() {
            band_means.sort_by(|a, b| a.1.total_cmp(&b.1));
        } else {
            band_means.sort_by(|a, b| b.1.total_cmp(&a.1));
        }

        let (best_band, best) = band_means[0];
        let (worst_band, worst) = band_means[band_means.len() - 1];
        if (best - worst).abs() < SLEEP_EFFECT_THRESHOLD {
            continue;
        }

        insights.push(Insight {
            kind: InsightKind::SleepDuration,
            text: format!(
                "{} is best after {} nights ({:.1}) and worst after {} nights ({:.1})",
                metric_phrase(metric),
                best_band.label(),
                best,
                worst_band.label(),
                worst,
            ),
        });
    }
    insights
}

/// Compare the most frequent tags against their absence on peak mood
pub fn tag_impact(valid: &[&DailyEntry], axis: TagAxis) -> Vec<Insight> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &entry in valid {
        for tag in tags_of(entry, axis) {
            *counts.entry(tag.as_str()).or_insert(0) += 1;
        }
    }

    // Most frequent first; ties break alphabetically for determinism
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let kind = match axis {
        TagAxis::Activity => InsightKind::Activity,
        TagAxis::People => InsightKind::People,
    };

    let mut insights = Vec::new();
    for (tag, _) in ranked.into_iter().take(TOP_TAG_COUNT) {
        let (with, without): (Vec<&&DailyEntry>, Vec<&&DailyEntry>) =
            valid.iter().partition(|e| tags_of(e, axis).contains(tag));
        if with.is_empty() || without.is_empty() {
            continue;
        }

        let avg_with = mean(&with.iter().map(|e| e.mood_highest()).collect::<Vec<_>>());
        let avg_without = mean(&without.iter().map(|e| e.mood_highest()).collect::<Vec<_>>());

        let diff = avg_with - avg_without;
        if diff.abs() < TAG_EFFECT_THRESHOLD || avg_without == 0.0 {
            continue;
        }
        let pct = diff / avg_without * 100.0;

        insights.push(Insight {
            kind,
            text: format!(
                "Peak mood is {:.0}% {} on days with \"{}\"",
                pct.abs(),
                if diff > 0.0 { "higher" } else { "lower" },
                tag,
            ),
        });
    }
    insights
}

fn tags_of<'a>(entry: &'a DailyEntry, axis: TagAxis) -> &'a BTreeSet<String> {
    match axis {
        TagAxis::Activity => &entry.activities,
        TagAxis::People => &entry.people,
    }
}

fn metric_phrase(metric: Metric) -> &'static str {
    match metric {
        Metric::Energy => "Peak energy",
        Metric::Mood => "Peak mood",
        Metric::Anxiety => "Anxiety",
        Metric::Irritability => "Irritability",
    }
}

/// Anxiety and irritability flip the phrasing: more of them is worse
fn direction_word(metric: Metric, diff: f64) -> &'static str {
    match (metric.lower_is_better(), diff > 0.0) {
        (true, true) => "worse",
        (true, false) => "better",
        (false, true) => "higher",
        (false, false) => "lower",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScaleRange;
    use chrono::{Duration, NaiveDate};

    fn d(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap() + Duration::days(offset)
    }

    fn entry(offset: i64) -> DailyEntry {
        DailyEntry::new(d(offset))
    }

    fn sleep_grid(asleep: &[(usize, usize)]) -> Vec<bool> {
        let mut slots = vec![false; crate::sleep::SLOTS_PER_DAY];
        for &(start, end) in asleep {
            for slot in slots.iter_mut().take(end + 1).skip(start) {
                *slot = true;
            }
        }
        slots
    }

    #[test]
    fn test_caffeine_mood_insight_matches_expected_percentage() {
        // Three caffeinated days averaging peak mood 6, three decaf days
        // averaging 4: diff 2 clears the threshold, pct = 2/4*100 = 50
        let mut entries = Vec::new();
        for i in 0..3 {
            let mut e = entry(i);
            e.caffeine_mg = Some(100);
            e.mood = ScaleRange::new(6, 4);
            entries.push(e);
        }
        for i in 3..6 {
            let mut e = entry(i);
            e.caffeine_mg = Some(0);
            e.mood = ScaleRange::new(4, 2);
            entries.push(e);
        }

        let refs: Vec<&DailyEntry> = entries.iter().collect();
        let insights = caffeine_impact(&refs);
        let mood_line = insights
            .iter()
            .find(|i| i.text.contains("Peak mood"))
            .unwrap();
        assert_eq!(mood_line.text, "Peak mood is 50% higher on days with caffeine");
    }

    #[test]
    fn test_caffeine_anxiety_uses_worse_phrasing() {
        let mut entries = Vec::new();
        for i in 0..2 {
            let mut e = entry(i);
            e.caffeine_mg = Some(200);
            e.anxiety = Some(6);
            entries.push(e);
        }
        for i in 2..4 {
            let mut e = entry(i);
            e.anxiety = Some(3);
            entries.push(e);
        }

        let refs: Vec<&DailyEntry> = entries.iter().collect();
        let insights = caffeine_impact(&refs);
        let anxiety_line = insights
            .iter()
            .find(|i| i.text.contains("Anxiety"))
            .unwrap();
        assert!(anxiety_line.text.contains("worse"));
        assert!(anxiety_line.text.contains("100%"));
    }

    #[test]
    fn test_caffeine_requires_both_groups() {
        let mut entries = Vec::new();
        for i in 0..4 {
            let mut e = entry(i);
            e.caffeine_mg = Some(100);
            e.mood = ScaleRange::new(7, 5);
            entries.push(e);
        }
        let refs: Vec<&DailyEntry> = entries.iter().collect();
        assert!(caffeine_impact(&refs).is_empty());
    }

    #[test]
    fn test_caffeine_below_threshold_not_reported() {
        let mut entries = Vec::new();
        let mut a = entry(0);
        a.caffeine_mg = Some(100);
        a.mood = ScaleRange::new(5, 3);
        entries.push(a);
        let mut b = entry(1);
        b.mood = ScaleRange::new(5, 3);
        entries.push(b);

        let refs: Vec<&DailyEntry> = entries.iter().collect();
        assert!(caffeine_impact(&refs).is_empty());
    }

    #[test]
    fn test_sleep_duration_best_and_worst() {
        let mut entries = Vec::new();
        // Short nights with low mood
        for i in 0..2 {
            let mut e = entry(i);
            e.sleep = Some(sleep_grid(&[(0, 6)]));
            e.mood = ScaleRange::new(3, 2);
            entries.push(e);
        }
        // Long nights with high mood
        for i in 2..4 {
            let mut e = entry(i);
            e.sleep = Some(sleep_grid(&[(0, 17)]));
            e.mood = ScaleRange::new(6, 4);
            entries.push(e);
        }

        let refs: Vec<&DailyEntry> = entries.iter().collect();
        let insights = sleep_duration_impact(&refs);
        let mood_line = insights
            .iter()
            .find(|i| i.text.contains("Peak mood"))
            .unwrap();
        assert!(mood_line.text.contains("best after 8h+ nights (6.0)"));
        assert!(mood_line.text.contains("worst after 0-4h nights (3.0)"));
    }

    #[test]
    fn test_sleep_duration_single_bucket_reports_average_only() {
        let mut e = entry(0);
        e.sleep = Some(sleep_grid(&[(0, 13)]));
        e.mood = ScaleRange::new(5, 3);
        let entries = vec![e];

        let refs: Vec<&DailyEntry> = entries.iter().collect();
        let insights = sleep_duration_impact(&refs);
        let mood_line = insights
            .iter()
            .find(|i| i.text.contains("Peak mood"))
            .unwrap();
        assert_eq!(mood_line.text, "Peak mood averages 5.0 after 5-8h nights");
    }

    #[test]
    fn test_sleep_duration_no_data_is_silent() {
        let entries = vec![entry(0), entry(1)];
        let refs: Vec<&DailyEntry> = entries.iter().collect();
        assert!(sleep_duration_impact(&refs).is_empty());
    }

    #[test]
    fn test_tag_impact_reports_top_tags() {
        let mut entries = Vec::new();
        for i in 0..3 {
            let mut e = entry(i);
            e.activities.insert("climbing".to_string());
            e.mood = ScaleRange::new(6, 4);
            entries.push(e);
        }
        for i in 3..6 {
            let mut e = entry(i);
            e.mood = ScaleRange::new(4, 2);
            entries.push(e);
        }

        let refs: Vec<&DailyEntry> = entries.iter().collect();
        let insights = tag_impact(&refs, TagAxis::Activity);
        assert_eq!(insights.len(), 1);
        assert_eq!(
            insights[0].text,
            "Peak mood is 50% higher on days with \"climbing\""
        );
        assert_eq!(insights[0].kind, InsightKind::Activity);
    }

    #[test]
    fn test_tag_impact_below_threshold_not_reported() {
        let mut entries = Vec::new();
        let mut a = entry(0);
        a.people.insert("Alex".to_string());
        a.mood = ScaleRange::new(5, 3);
        entries.push(a);
        let mut b = entry(1);
        b.mood = ScaleRange::new(5, 3);
        entries.push(b);

        let refs: Vec<&DailyEntry> = entries.iter().collect();
        assert!(tag_impact(&refs, TagAxis::People).is_empty());
    }

    #[test]
    fn test_tag_present_on_every_day_is_skipped() {
        let mut entries = Vec::new();
        for i in 0..3 {
            let mut e = entry(i);
            e.activities.insert("work".to_string());
            entries.push(e);
        }
        let refs: Vec<&DailyEntry> = entries.iter().collect();
        assert!(tag_impact(&refs, TagAxis::Activity).is_empty());
    }

    #[test]
    fn test_mine_skips_missing_entries() {
        // A missing placeholder day must not leak its baseline values into
        // any comparison group
        let mut caffeinated = entry(0);
        caffeinated.caffeine_mg = Some(100);
        caffeinated.mood = ScaleRange::new(7, 5);
        let mut decaf = entry(1);
        decaf.mood = ScaleRange::new(2, 1);

        let series = vec![
            GapFilledEntry::present(caffeinated),
            GapFilledEntry::present(decaf),
            GapFilledEntry::missing(d(2)),
        ];

        let insights = mine(&series);
        let mood_line = insights
            .iter()
            .find(|i| i.kind == InsightKind::Caffeine && i.text.contains("Peak mood"))
            .unwrap();
        // 7 vs 2 over exactly one decaf day: 250%. Had the missing day's
        // baseline 4 leaked into the decaf group this would read 133%.
        assert!(mood_line.text.contains("250%"));
    }
}
