//! Call measurement and per-function sample accumulation.
mod types;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::StatsError;
use crate::stats::{self, SummaryStatistics};
use crate::track::TrackingSession;

pub use types::{FunctionRecord, Sample};

/// Multiplier applied to the median execution time when rejecting outliers.
pub const DEFAULT_SCALER: f64 = 1000.0;

/// Thread-safe sample recorder.
///
/// Clones are cheap and share one underlying sample store, so a recorder can
/// be handed to wrapped closures and worker threads freely. Samples recorded
/// under the same name merge into one series regardless of which clone or
/// thread produced them. Concurrent calls never lose samples; their relative
/// order within a series is the order in which each call's post-invocation
/// bookkeeping acquired the store lock, not necessarily call-start order.
#[derive(Debug, Clone)]
pub struct Recorder {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    scaler: f64,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    records: Vec<FunctionRecord>,
    slots: HashMap<String, usize>,
}

impl State {
    fn slot_for(&mut self, name: &str) -> usize {
        if let Some(slot) = self.slots.get(name).copied() {
            return slot;
        }
        let slot = self.records.len();
        self.slots.insert(name.to_owned(), slot);
        self.records.push(FunctionRecord::new(name));
        slot
    }

    fn append(&mut self, name: &str, sample: Sample) {
        let slot = self.slot_for(name);
        let Some(record) = self.records.get_mut(slot) else {
            return;
        };
        record.push(sample);
    }

    fn record(&self, name: &str) -> Option<&FunctionRecord> {
        self.slots
            .get(name)
            .copied()
            .and_then(|slot| self.records.get(slot))
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    /// Creates a recorder with the default outlier scaler.
    #[must_use]
    pub fn new() -> Self {
        Self::with_scaler(DEFAULT_SCALER)
    }

    /// Creates a recorder with a custom outlier scaler.
    ///
    /// Summaries drop execution times above `median * scaler`. A scaler below
    /// `1.0` can reject every sample, including the median itself.
    #[must_use]
    pub fn with_scaler(scaler: f64) -> Self {
        Self {
            inner: Arc::new(Inner {
                scaler,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// The configured outlier scaler.
    #[must_use]
    pub fn scaler(&self) -> f64 {
        self.inner.scaler
    }

    /// Runs `call` once and records its wall-clock time and peak heap growth
    /// under `name`.
    ///
    /// The sample is appended after `call` returns. A call returning
    /// `Result::Err` is a completed call and is recorded like any other
    /// value. A panicking call unwinds through without leaving a sample
    /// behind, and the tracking window is released during unwinding.
    ///
    /// Top-level tracking windows serialize on a process-wide lock. A
    /// measured call must not block on another thread's `measure`: that
    /// call waits for the window this one still holds.
    pub fn measure<T>(&self, name: &str, call: impl FnOnce() -> T) -> T {
        let session = TrackingSession::begin();
        let started = Instant::now();
        let output = call();
        let duration_secs = started.elapsed().as_secs_f64();
        let memory_kb = session.peak_kb();
        drop(session);
        self.append(name, Sample::new(duration_secs, memory_kb));
        output
    }

    /// Wraps `target` so that every invocation is measured under `name`.
    ///
    /// The returned closure owns a clone of this recorder and can outlive it.
    pub fn wrap<T, F>(&self, name: impl Into<String>, mut target: F) -> impl FnMut() -> T
    where
        F: FnMut() -> T,
    {
        let recorder = self.clone();
        let name = name.into();
        move || recorder.measure(&name, &mut target)
    }

    /// Appends an externally produced sample under `name`.
    pub fn record(&self, name: &str, sample: Sample) {
        self.append(name, sample);
    }

    fn append(&self, name: &str, sample: Sample) {
        let mut state = self.inner.state.lock();
        state.append(name, sample);
        drop(state);
        debug!(
            "Recorded sample for {}: t={:.6}s m={:.3}KB",
            name, sample.duration_secs, sample.memory_kb
        );
    }

    /// Number of samples recorded under `name`; zero for unknown names.
    #[must_use]
    pub fn sample_count(&self, name: &str) -> usize {
        let state = self.inner.state.lock();
        state.record(name).map_or(0, FunctionRecord::len)
    }

    /// Copies out the samples recorded under `name`.
    #[must_use]
    pub fn samples(&self, name: &str) -> Option<Vec<Sample>> {
        let state = self.inner.state.lock();
        state.record(name).map(|record| record.samples().to_vec())
    }

    /// Function names in first-call order.
    #[must_use]
    pub fn function_names(&self) -> Vec<String> {
        let state = self.inner.state.lock();
        state
            .records
            .iter()
            .map(|record| record.name().to_owned())
            .collect()
    }

    /// Clones out every accumulated record, preserving first-call order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<FunctionRecord> {
        let state = self.inner.state.lock();
        state.records.clone()
    }

    /// Summary statistics for `name`, computed with this recorder's scaler.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::NoSamples`] when nothing was recorded under
    /// `name` and [`StatsError::AllFiltered`] when the outlier filter rejects
    /// every sample.
    pub fn summarize(&self, name: &str) -> Result<SummaryStatistics, StatsError> {
        let found = {
            let state = self.inner.state.lock();
            state.record(name).cloned()
        };
        let Some(record) = found else {
            return Err(StatsError::NoSamples {
                name: name.to_owned(),
            });
        };
        stats::summarize(&record, self.inner.scaler)
    }
}
