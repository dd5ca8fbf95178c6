use crate::data::error::StatsError;
use crate::data::store::Store;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Numeric summary of one column's parseable values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Absent when every value is unique
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    /// Sample standard deviation; 0 for a single value
    pub std_dev: f64,
}

/// Coerce cell text to a number.
///
/// Surrounding whitespace is ignored. Empty text and non-finite results
/// (`nan`, `inf`) are not numbers.
pub fn try_parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Compute statistics over the numeric values of `column`.
///
/// Missing and non-numeric cells are skipped silently. When nothing is left
/// the result is `StatsError::NoNumericValues`.
pub fn column_stats(store: &Store, column: &str) -> Result<ColumnStats, StatsError> {
    let values: Vec<f64> = store
        .records
        .iter()
        .filter_map(|r| r.get(column))
        .filter_map(try_parse_number)
        .collect();

    debug!(
        "column_stats: {} numeric values in '{}' out of {} rows",
        values.len(),
        column,
        store.len()
    );

    if values.is_empty() {
        return Err(StatsError::NoNumericValues {
            column: column.to_string(),
        });
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let (mean, std_dev) = mean_and_std_dev(&values);

    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);

    Ok(ColumnStats {
        column: column.to_string(),
        count,
        mean,
        median: median(&sorted),
        mode: mode(&values),
        min: sorted[0],
        max: sorted[count - 1],
        sum,
        std_dev,
    })
}

fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Most frequent value; ties go to the value seen first in scan order.
/// `None` when no value repeats.
fn mode(values: &[f64]) -> Option<f64> {
    // -0.0 and 0.0 count as the same value
    let bits = |v: f64| if v == 0.0 { 0u64 } else { v.to_bits() };

    let mut counts: HashMap<u64, usize> = HashMap::new();
    let mut first_seen: Vec<f64> = Vec::new();
    for &v in values {
        let count = counts.entry(bits(v)).or_insert(0);
        if *count == 0 {
            first_seen.push(v);
        }
        *count += 1;
    }

    if first_seen.len() == values.len() {
        return None;
    }

    let mut best: Option<(f64, usize)> = None;
    for v in first_seen {
        let count = counts[&bits(v)];
        // Strictly greater keeps the earliest value on ties
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((v, count));
        }
    }
    best.map(|(v, _)| v)
}

/// Running mean and sample standard deviation (Welford).
///
/// Neither accumulates a raw sum, so large finite inputs stay finite even
/// when `sum` overflows.
fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &v) in values.iter().enumerate() {
        let delta = v - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (v - mean);
    }

    if values.len() < 2 {
        return (mean, 0.0);
    }
    (mean, (m2 / (values.len() - 1) as f64).sqrt())
}
