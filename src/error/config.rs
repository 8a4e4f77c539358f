use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read settings file '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Settings file '{path}' is not valid TOML: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Settings file '{path}' is not valid JSON: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Settings extension '{ext}' is not supported; expected .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Settings path has no extension; expected .toml or .json.")]
    MissingExtension,
    #[error("Config 'precision' must be at most {limit}, got {value}.")]
    PrecisionTooLarge { value: usize, limit: usize },
    #[error("Config 'chart.limit' must be >= 1.")]
    ChartLimitZero,
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
