//! Trend charts over persisted run files.
//!
//! Reads the newest run files from a data directory, applies the same
//! outlier filter the reporter uses, and draws one execution-time series
//! per file.
mod trend;


use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::error::MeterResult;
use crate::stats;
use crate::store;

pub use trend::{DEFAULT_TREND_LIMIT, TrendOptions, TrendSeries, render_trend};

/// Renders a trend chart over the newest run files in `data_dir`.
///
/// Each file becomes one series labeled by its file stem, newest first.
/// Returns the chart path, or `Ok(None)` when the directory holds no runs.
///
/// # Errors
///
/// Returns an error when run files cannot be read or the chart cannot be
/// drawn.
pub async fn plot_latest_runs(
    data_dir: &Path,
    output: &Path,
    options: &TrendOptions,
) -> MeterResult<Option<PathBuf>> {
    let files = store::latest_files(data_dir, options.limit).await?;
    if files.is_empty() {
        warn!("No run files found under {}", data_dir.display());
        return Ok(None);
    }

    let mut series = Vec::with_capacity(files.len());
    for path in &files {
        let samples = store::load_samples(path).await?;
        let durations: Vec<f64> = samples.iter().map(|sample| sample.duration_secs).collect();
        let values = if durations.is_empty() {
            Vec::new()
        } else {
            stats::filter_outliers(&durations, options.scaler)?
        };
        let label = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("run")
            .to_owned();
        series.push(TrendSeries { label, values });
    }

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).await?;
    }

    info!("Plotting execution time trend for {} runs...", series.len());
    render_trend(&series, output, options)?;
    Ok(Some(output.to_path_buf()))
}
