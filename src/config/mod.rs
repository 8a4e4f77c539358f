//! Configuration loading and merging.
mod loader;
pub mod types;


pub use loader::load_settings;
pub use types::{ChartConfig, ConfigFile, MAX_PRECISION, Settings};

#[cfg(test)]
pub(crate) use loader::load_config_file;
