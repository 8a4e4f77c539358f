//! JSON persistence for recorded runs.
//!
//! Every save writes one pretty-printed JSON array of samples per function,
//! named `{function}_{YYYYMMDD_HHMMSS}.json`. Functions saved in the same
//! batch share a single timestamp so a batch reads as one run.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{Datelike, Local, Timelike};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use crate::error::StoreError;
use crate::recorder::{Recorder, Sample};

/// Directory run files land in when none is configured.
pub const DEFAULT_DATA_DIR: &str = "performances";

/// File name for one function's run, combining the sanitized function name
/// with a `YYYYMMDD_HHMMSS` stamp.
#[must_use]
pub fn sample_file_name(name: &str, stamp: &str) -> String {
    format!("{}_{}.json", sanitize_name(name), stamp)
}

fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => ch,
            _ => '_',
        })
        .collect();
    if cleaned.is_empty() {
        "function".to_owned()
    } else {
        cleaned
    }
}

fn export_stamp() -> String {
    let now = Local::now();
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

/// Saves one function's samples under `dir` with a fresh timestamp.
///
/// Creates `dir` when missing and returns the written path.
///
/// # Errors
///
/// Returns a [`StoreError`] when the directory or file cannot be created or
/// written, or when the samples fail to serialize.
pub async fn save_samples(dir: &Path, name: &str, samples: &[Sample]) -> Result<PathBuf, StoreError> {
    create_data_dir(dir).await?;
    let stamp = export_stamp();
    save_with_stamp(dir, name, &stamp, samples).await
}

/// Saves every function recorded so far, all sharing one timestamp.
///
/// Returns the written paths in first-call order. The data directory is
/// created even when the recorder is empty.
///
/// # Errors
///
/// Returns a [`StoreError`] when the directory or any file cannot be created
/// or written, or when samples fail to serialize.
pub async fn save_all(recorder: &Recorder, dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    create_data_dir(dir).await?;
    let records = recorder.snapshot();
    let stamp = export_stamp();
    let mut paths = Vec::with_capacity(records.len());
    for record in &records {
        let path = save_with_stamp(dir, record.name(), &stamp, record.samples()).await?;
        paths.push(path);
    }
    Ok(paths)
}

async fn create_data_dir(dir: &Path) -> Result<(), StoreError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|err| StoreError::Io {
            context: "creating data directory",
            source: err,
        })
}

async fn save_with_stamp(
    dir: &Path,
    name: &str,
    stamp: &str,
    samples: &[Sample],
) -> Result<PathBuf, StoreError> {
    let path = dir.join(sample_file_name(name, stamp));
    let json = serde_json::to_vec_pretty(samples).map_err(|err| StoreError::Json {
        context: "serializing samples",
        source: err,
    })?;
    let file = tokio::fs::File::create(&path)
        .await
        .map_err(|err| StoreError::Io {
            context: "creating run file",
            source: err,
        })?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await.map_err(|err| StoreError::Io {
        context: "writing run file",
        source: err,
    })?;
    writer.flush().await.map_err(|err| StoreError::Io {
        context: "flushing run file",
        source: err,
    })?;
    info!("Samples for {} saved to {}", name, path.display());
    Ok(path)
}

/// The newest `limit` run files under `dir`, most recent first.
///
/// Ordering follows file modification time, with the path as a tie-breaker.
/// A missing directory yields an empty list rather than an error.
///
/// # Errors
///
/// Returns a [`StoreError`] when the directory cannot be scanned or a file's
/// metadata cannot be read.
pub async fn latest_files(dir: &Path, limit: usize) -> Result<Vec<PathBuf>, StoreError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(StoreError::Io {
                context: "scanning data directory",
                source: err,
            });
        }
    };

    let mut found: Vec<(SystemTime, PathBuf)> = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|err| StoreError::Io {
        context: "reading directory entry",
        source: err,
    })? {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let metadata = entry.metadata().await.map_err(|err| StoreError::Io {
            context: "reading run file metadata",
            source: err,
        })?;
        let modified = metadata.modified().map_err(|err| StoreError::Io {
            context: "reading run file mtime",
            source: err,
        })?;
        found.push((modified, path));
    }

    found.sort_by(|left, right| right.0.cmp(&left.0).then_with(|| right.1.cmp(&left.1)));
    found.truncate(limit);
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

/// Loads the samples stored in one run file.
///
/// # Errors
///
/// Returns a [`StoreError`] when the file cannot be read or parsed.
pub async fn load_samples(path: &Path) -> Result<Vec<Sample>, StoreError> {
    let bytes = tokio::fs::read(path).await.map_err(|err| StoreError::Io {
        context: "reading run file",
        source: err,
    })?;
    serde_json::from_slice(&bytes).map_err(|err| StoreError::Json {
        context: "parsing run file",
        source: err,
    })
}
