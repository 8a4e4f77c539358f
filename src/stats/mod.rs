//! Outlier filtering and summary statistics over recorded samples.

use crate::error::StatsError;
use crate::recorder::FunctionRecord;

/// Summary of one function's accumulated samples.
///
/// The time figures describe the outlier-filtered execution times. The memory
/// figure deliberately averages every recorded peak, unfiltered, so rare
/// allocation spikes stay visible in reports.
#[derive(Debug, Clone)]
pub struct SummaryStatistics {
    /// Number of execution times that survived the outlier filter.
    pub count: usize,
    /// Sum of surviving execution times, in seconds.
    pub total_time: f64,
    pub max_time: f64,
    pub min_time: f64,
    pub mean_time: f64,
    pub median_time: f64,
    /// Population standard deviation of surviving execution times.
    pub std_dev_time: f64,
    /// Mean of every recorded peak-memory reading, in KB.
    pub mean_memory_kb: f64,
}

impl SummaryStatistics {
    /// Renders the summary as report lines with `precision` decimal places.
    #[must_use]
    pub fn format_lines(&self, precision: usize) -> Vec<String> {
        vec![
            format!("Count: {}", self.count),
            format!("Total Time: {:.*}", precision, self.total_time),
            format!("Max Time: {:.*}", precision, self.max_time),
            format!("Min Time: {:.*}", precision, self.min_time),
            format!("Average Time: {:.*}", precision, self.mean_time),
            format!("Median Time: {:.*}", precision, self.median_time),
            format!("Time Standard Deviation: {:.*}", precision, self.std_dev_time),
            format!("Mean Memory (KB): {:.*} KB", precision, self.mean_memory_kb),
        ]
    }
}

/// Central value of `values`; `None` when the list is empty.
///
/// Even-length lists return the mean of the two middle values. NaN values
/// sort to the edges under IEEE total ordering.
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        let lower = mid.checked_sub(1).and_then(|slot| sorted.get(slot))?;
        let upper = sorted.get(mid)?;
        Some((lower + upper) / 2.0)
    } else {
        sorted.get(mid).copied()
    }
}

/// Drops values above `median(values) * scaler`, keeping relative order.
///
/// Values exactly equal to the threshold are retained.
///
/// # Errors
///
/// Returns [`StatsError::EmptyInput`] when `values` is empty, since no
/// median exists to anchor the threshold.
pub fn filter_outliers(values: &[f64], scaler: f64) -> Result<Vec<f64>, StatsError> {
    let Some(median_value) = median(values) else {
        return Err(StatsError::EmptyInput);
    };
    let threshold = median_value * scaler;
    Ok(values
        .iter()
        .copied()
        .filter(|value| *value <= threshold)
        .collect())
}

/// Computes the full summary for one function record.
///
/// # Errors
///
/// Returns [`StatsError::NoSamples`] when the record holds no samples and
/// [`StatsError::AllFiltered`] when the outlier filter rejects all of them.
pub fn summarize(record: &FunctionRecord, scaler: f64) -> Result<SummaryStatistics, StatsError> {
    if record.is_empty() {
        return Err(StatsError::NoSamples {
            name: record.name().to_owned(),
        });
    }
    let filtered = filter_outliers(&record.durations(), scaler)?;
    let Some(median_time) = median(&filtered) else {
        return Err(StatsError::AllFiltered {
            name: record.name().to_owned(),
        });
    };

    let count = filtered.len();
    let total_time: f64 = filtered.iter().sum();
    let max_time = filtered.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_time = filtered.iter().copied().fold(f64::INFINITY, f64::min);
    let mean_time = total_time / (count as f64);

    let memories = record.memories();
    let mean_memory_kb = memories.iter().sum::<f64>() / (memories.len() as f64);

    Ok(SummaryStatistics {
        count,
        total_time,
        max_time,
        min_time,
        mean_time,
        median_time,
        std_dev_time: population_std_dev(&filtered, mean_time),
        mean_memory_kb,
    })
}

fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values
        .iter()
        .map(|value| {
            let delta = value - mean;
            delta * delta
        })
        .sum::<f64>()
        / (values.len() as f64);
    variance.sqrt()
}
