use std::path::Path;

use plotters::prelude::*;

use crate::error::MeterResult;
use crate::recorder::DEFAULT_SCALER;
use crate::stats;

/// How many of the newest run files a trend chart covers by default.
pub const DEFAULT_TREND_LIMIT: usize = 7;

/// Rendering knobs for a trend chart.
#[derive(Debug, Clone, Copy)]
pub struct TrendOptions {
    /// Newest run files to include.
    pub limit: usize,
    /// Draw a horizontal mean reference line per series.
    pub show_mean: bool,
    /// Draw a horizontal median reference line per series.
    pub show_median: bool,
    /// Outlier multiplier applied to each file's durations before drawing.
    pub scaler: f64,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TREND_LIMIT,
            show_mean: false,
            show_median: false,
            scaler: DEFAULT_SCALER,
        }
    }
}

/// One plotted line: a run file's outlier-filtered durations, in call order.
#[derive(Debug, Clone)]
pub struct TrendSeries {
    pub label: String,
    pub values: Vec<f64>,
}

const SERIES_PALETTE: [RGBColor; 7] = [
    RGBColor(255, 0, 0),
    RGBColor(255, 165, 0),
    RGBColor(255, 255, 0),
    RGBColor(0, 128, 0),
    RGBColor(0, 0, 255),
    RGBColor(75, 0, 130),
    RGBColor(238, 130, 238),
];

fn palette_color(slot: usize) -> RGBColor {
    let index = slot.checked_rem(SERIES_PALETTE.len()).unwrap_or(0);
    SERIES_PALETTE
        .get(index)
        .copied()
        .unwrap_or(RGBColor(0, 0, 255))
}

/// Draws one execution-time line per series into a PNG at `output`.
///
/// The x axis is the run index within each file; series shorter than the
/// longest one simply end early. Mean and median reference lines reuse the
/// series color at reduced opacity.
///
/// # Errors
///
/// Returns an error when the backend cannot draw or write the chart file.
pub fn render_trend(
    series: &[TrendSeries],
    output: &Path,
    options: &TrendOptions,
) -> MeterResult<()> {
    if series.is_empty() {
        return Ok(());
    }

    let root = BitMapBackend::new(output, (1500, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let run_count = series
        .iter()
        .map(|entry| entry.values.len())
        .max()
        .unwrap_or(0);
    let x_max = u64::try_from(run_count).unwrap_or(u64::MAX).max(1);
    let raw_max = series
        .iter()
        .flat_map(|entry| entry.values.iter().copied())
        .fold(0.0_f64, f64::max);
    let y_max = if raw_max > 0.0 { raw_max * 1.05 } else { 1.0 };

    let caption = format!("Execution Time Over Runs (Latest {} Files)", series.len());
    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 40))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0u64..x_max, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Run Index")
        .y_desc("Execution Time (s)")
        .draw()?;

    for (slot, entry) in series.iter().enumerate() {
        let color = palette_color(slot);
        let points: Vec<(u64, f64)> = entry
            .values
            .iter()
            .copied()
            .enumerate()
            .map(|(index, value)| (u64::try_from(index).unwrap_or(u64::MAX), value))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color))?
            .label(entry.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x.saturating_add(20), y)], color)
            });

        let span = u64::try_from(entry.values.len().saturating_sub(1)).unwrap_or(u64::MAX);
        if options.show_mean
            && let Some(mean) = mean_of(&entry.values)
        {
            let style = color.mix(0.6);
            chart
                .draw_series(LineSeries::new(vec![(0, mean), (span, mean)], style))?
                .label(format!("{} Mean: {:.2}", entry.label, mean))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x.saturating_add(20), y)], style)
                });
        }
        if options.show_median
            && let Some(median) = stats::median(&entry.values)
        {
            let style = color.mix(0.3);
            chart
                .draw_series(LineSeries::new(vec![(0, median), (span, median)], style))?
                .label(format!("{} Median: {:.2}", entry.label, median))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x.saturating_add(20), y)], style)
                });
        }
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: f64 = values.iter().sum();
    Some(total / values.len() as f64)
}
