//! Console reporting over recorded samples.
//!
//! The report is a plain standard-output dump, one block per instrumented
//! function, in first-call order. Persistence and charting hang off the
//! same entry point so a finished run can print, save, and plot in one
//! call.

use std::path::PathBuf;

use tracing::warn;

use crate::charts;
use crate::config::Settings;
use crate::error::MeterResult;
use crate::recorder::Recorder;
use crate::store;

/// Decimal places used for displayed statistics when none are configured.
pub const DEFAULT_PRECISION: usize = 5;

/// Formats every function's summary block exactly as it is printed.
///
/// Functions whose statistics cannot be computed (no samples, or every
/// sample filtered out) are skipped with a warning rather than aborting
/// the whole report.
#[must_use]
pub fn summary_lines(recorder: &Recorder, precision: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for name in recorder.function_names() {
        match recorder.summarize(&name) {
            Ok(summary) => {
                lines.push(format!("Function: {}", name));
                lines.push(String::new());
                lines.push("Performance Results:".to_owned());
                for line in summary.format_lines(precision) {
                    lines.push(format!("  {}", line));
                }
                lines.push(String::new());
            }
            Err(err) => {
                warn!("Skipping summary for {}: {}", name, err);
            }
        }
    }
    lines
}

/// Prints every function's summary to standard output.
pub fn print_summary(recorder: &Recorder, precision: usize) {
    for line in summary_lines(recorder, precision) {
        println!("{}", line);
    }
}

/// Prints summaries, saves every function's samples as one run, and
/// optionally renders a trend chart over the saved history.
///
/// Returns the chart path when one was drawn.
///
/// # Errors
///
/// Returns an error when saving run files or drawing the chart fails.
pub async fn emit(
    recorder: &Recorder,
    settings: &Settings,
    show_plot: bool,
) -> MeterResult<Option<PathBuf>> {
    print_summary(recorder, settings.precision);
    store::save_all(recorder, &settings.data_dir).await?;
    if !show_plot {
        return Ok(None);
    }
    charts::plot_latest_runs(
        &settings.data_dir,
        &settings.chart_output,
        &settings.trend_options(),
    )
    .await
}
