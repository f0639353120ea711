use serde::Serialize;

use crate::history::HistoricalRow;

/// Window of the trailing moving average over daily delay rates.
pub const SMOOTHING_WINDOW: usize = 3;

/// Minimum |event mean - regular mean| in percentage points before the
/// comparison is reported as meaningful.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.1;

/// Trailing simple moving average, aligned to the input.
///
/// Positions without a full window are `None`, not zero, so the early part of
/// the chart stays honest.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                None
            } else {
                let sum: f64 = values[i + 1 - window..=i].iter().sum();
                Some(sum / window as f64)
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayVerdict {
    EventDaysWorse,
    EventDaysBetter,
    NoSignificantDifference,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DelayComparison {
    pub regular_mean: f64,
    pub event_mean: f64,
    /// `event_mean - regular_mean`, computed after rounding.
    pub difference: f64,
    pub verdict: DelayVerdict,
}

/// Splits rows into event days and regular days and compares mean delay
/// rates. An empty partition contributes a mean of exactly 0.
pub fn compare_event_days(rows: &[HistoricalRow]) -> DelayComparison {
    let mut regular = Vec::new();
    let mut event = Vec::new();
    for row in rows {
        if row.is_event_day {
            event.push(row.delay_rate_percent);
        } else {
            regular.push(row.delay_rate_percent);
        }
    }

    let regular_mean = round2(mean(&regular));
    let event_mean = round2(mean(&event));
    let difference = round2(event_mean - regular_mean);

    let verdict = if difference.abs() < SIGNIFICANCE_THRESHOLD {
        DelayVerdict::NoSignificantDifference
    } else if difference > 0.0 {
        DelayVerdict::EventDaysWorse
    } else {
        DelayVerdict::EventDaysBetter
    };

    DelayComparison {
        regular_mean,
        event_mean,
        difference,
        verdict,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
