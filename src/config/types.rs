use std::path::PathBuf;

use serde::Deserialize;

use crate::charts::{DEFAULT_TREND_LIMIT, TrendOptions};
use crate::error::ConfigError;
use crate::recorder::DEFAULT_SCALER;
use crate::report::DEFAULT_PRECISION;
use crate::store::DEFAULT_DATA_DIR;

/// Display precision is capped at the number of meaningful decimal digits
/// an `f64` can carry.
pub const MAX_PRECISION: usize = 17;

/// Deserialized shape of a `callmeter.toml` or `callmeter.json` file.
/// Every field is optional; absent fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub scaler: Option<f64>,
    pub precision: Option<usize>,
    pub data_dir: Option<PathBuf>,
    pub chart: Option<ChartConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartConfig {
    pub limit: Option<usize>,
    pub show_mean: Option<bool>,
    pub show_median: Option<bool>,
    pub output: Option<PathBuf>,
}

/// Resolved runtime settings after defaults and config-file merging.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Outlier multiplier handed to recorders and charts.
    pub scaler: f64,
    /// Decimal places in printed reports.
    pub precision: usize,
    /// Directory run files are saved to and read from.
    pub data_dir: PathBuf,
    /// Newest run files a trend chart covers.
    pub chart_limit: usize,
    pub show_mean: bool,
    pub show_median: bool,
    /// Path the trend chart PNG is written to.
    pub chart_output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scaler: DEFAULT_SCALER,
            precision: DEFAULT_PRECISION,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            chart_limit: DEFAULT_TREND_LIMIT,
            show_mean: false,
            show_median: false,
            chart_output: PathBuf::from("charts/trend.png"),
        }
    }
}

impl Settings {
    /// Defaults overridden by whatever the config file sets.
    #[must_use]
    pub fn merged(file: &ConfigFile) -> Self {
        let mut settings = Self::default();
        if let Some(scaler) = file.scaler {
            settings.scaler = scaler;
        }
        if let Some(precision) = file.precision {
            settings.precision = precision;
        }
        if let Some(dir) = &file.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(chart) = &file.chart {
            if let Some(limit) = chart.limit {
                settings.chart_limit = limit;
            }
            if let Some(show_mean) = chart.show_mean {
                settings.show_mean = show_mean;
            }
            if let Some(show_median) = chart.show_median {
                settings.show_median = show_median;
            }
            if let Some(output) = &chart.output {
                settings.chart_output = output.clone();
            }
        }
        settings
    }

    /// # Errors
    ///
    /// Returns an error when `precision` exceeds [`MAX_PRECISION`] or
    /// `chart_limit` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionTooLarge {
                value: self.precision,
                limit: MAX_PRECISION,
            });
        }
        if self.chart_limit == 0 {
            return Err(ConfigError::ChartLimitZero);
        }
        Ok(())
    }

    /// Chart rendering options carried by these settings.
    #[must_use]
    pub fn trend_options(&self) -> TrendOptions {
        TrendOptions {
            limit: self.chart_limit,
            show_mean: self.show_mean,
            show_median: self.show_median,
            scaler: self.scaler,
        }
    }
}
