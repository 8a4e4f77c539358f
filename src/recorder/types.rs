use serde::{Deserialize, Serialize};

/// One measured call: wall-clock seconds and peak heap growth in KB.
///
/// Serialized with the compact field names `t` and `m` used by the on-disk
/// run files.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sample {
    #[serde(rename = "t")]
    pub duration_secs: f64,
    #[serde(rename = "m")]
    pub memory_kb: f64,
}

impl Sample {
    #[must_use]
    pub const fn new(duration_secs: f64, memory_kb: f64) -> Self {
        Self {
            duration_secs,
            memory_kb,
        }
    }
}

/// Samples accumulated for one function identity, in call order.
#[derive(Debug, Clone)]
pub struct FunctionRecord {
    name: String,
    samples: Vec<Sample>,
}

impl FunctionRecord {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            samples: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Execution times in call order.
    #[must_use]
    pub fn durations(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|sample| sample.duration_secs)
            .collect()
    }

    /// Peak-memory readings in call order.
    #[must_use]
    pub fn memories(&self) -> Vec<f64> {
        self.samples.iter().map(|sample| sample.memory_kb).collect()
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }
}
