use std::path::{Path, PathBuf};

use crate::error::{ConfigError, MeterError, MeterResult};

use super::types::{ConfigFile, Settings};

pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["callmeter.toml", "callmeter.json"];

/// Loads settings from the provided path or default locations.
///
/// Without an explicit path, `callmeter.toml` then `callmeter.json` are
/// tried in the working directory; when neither exists the defaults are
/// returned unchanged.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed, or
/// when a merged value fails validation.
pub fn load_settings(path: Option<&Path>) -> MeterResult<Settings> {
    let file = match path {
        Some(path) => Some(load_config_file(path)?),
        None => load_default_file()?,
    };
    let settings = file.as_ref().map_or_else(Settings::default, Settings::merged);
    settings.validate()?;
    Ok(settings)
}

fn load_default_file() -> MeterResult<Option<ConfigFile>> {
    for candidate in DEFAULT_CONFIG_FILES {
        let path = PathBuf::from(candidate);
        if path.exists() {
            return Ok(Some(load_config_file(&path)?));
        }
    }
    Ok(None)
}

pub(crate) fn load_config_file(path: &Path) -> MeterResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        MeterError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            MeterError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            MeterError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(MeterError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(MeterError::config(ConfigError::MissingExtension)),
    }
}
