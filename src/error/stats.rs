use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Cannot compute a median over an empty value list.")]
    EmptyInput,
    #[error("No samples recorded for '{name}'.")]
    NoSamples { name: String },
    #[error("Every sample for '{name}' was rejected by the outlier filter.")]
    AllFiltered { name: String },
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
