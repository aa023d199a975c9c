//! Descriptive statistics
//!
//! Mean, least-squares trend classification, Pearson correlation, and
//! daily-spread volatility over gap-filled series. Degenerate inputs always
//! resolve to neutral values, never NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::types::{GapFilledEntry, Metric};

/// Minimum least-squares slope treated as a real trend (per-step sensitivity)
pub const TREND_SLOPE_THRESHOLD: f64 = 0.05;

/// Direction classification of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Increasing => "Increasing",
            Trend::Decreasing => "Decreasing",
            Trend::Stable => "Stable",
        }
    }
}

/// Round half away from zero to one decimal, the display precision used by
/// every aggregate in the crate
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean; 0 for empty input
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Classify the ordinary-least-squares slope of value against 0-based index.
///
/// Fewer than two values is `Stable`.
pub fn trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }

    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, value) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        numerator += dx * (value - mean_y);
        denominator += dx * dx;
    }
    if denominator == 0.0 {
        return Trend::Stable;
    }

    let slope = numerator / denominator;
    if slope > TREND_SLOPE_THRESHOLD {
        Trend::Increasing
    } else if slope < -TREND_SLOPE_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Pearson product-moment correlation.
///
/// `None` on length mismatch, fewer than two elements, or zero variance in
/// either series.
pub fn correlation(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }

    let mean_a = mean(a);
    let mean_b = mean(b);

    let mut covariance = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        covariance += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        return None;
    }
    Some(covariance / denominator)
}

/// Mean daily |highest - lowest| spread of a two-sided metric over real
/// entries; 0 for one-sided metrics or when no real entries exist
pub fn volatility(entries: &[GapFilledEntry], metric: Metric) -> f64 {
    let spreads: Vec<f64> = entries
        .iter()
        .filter(|e| !e.is_missing)
        .filter_map(|e| {
            metric
                .low_of(&e.entry)
                .map(|low| (metric.value_of(&e.entry) - low).abs())
        })
        .collect();
    mean(&spreads)
}
