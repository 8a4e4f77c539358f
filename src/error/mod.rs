mod config;
mod meter;
mod stats;
mod store;

#[cfg(test)]
mod test_support;

pub use config::ConfigError;
pub use meter::{MeterError, MeterResult};
pub use stats::StatsError;
pub use store::StoreError;
