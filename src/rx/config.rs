use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::consts::{BIT_RATE, SQUELCH, SYNC_INTERVALS};

/// How the bit slicer obtains its FSK decision threshold.
///
/// Each burst opens with a sync preamble that alternates between the two
/// tones; measuring the discriminator extremes across it places the
/// decision boundary between them. `SyncWindow` runs that measurement
/// (the default); `Fixed` skips it and slices against a caller-supplied
/// boundary, useful when the tone spacing is known up front. In both
/// modes the preamble's air time is consumed before slicing starts, since
/// the preamble occupies the burst either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ThresholdMode {
    /// Track discriminator min/max over the sync window and slice against
    /// `(max - min) / 2`.
    SyncWindow,
    /// Slice against a fixed discriminator value (radians per sample).
    Fixed(f32),
}

/// Tunable receiver parameters, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RxConfig {
    /// Squared-magnitude power threshold for burst detection
    pub squelch: f32,
    /// Designed bit rate of the FSK stream (bits per second)
    pub bit_rate: u32,
    /// Sync preamble length in bit intervals
    pub sync_intervals: u32,
    /// Decision threshold strategy for the bit slicer
    pub threshold: ThresholdMode,
}

impl Default for RxConfig {
    fn default() -> Self {
        Self {
            squelch: SQUELCH,
            bit_rate: BIT_RATE,
            sync_intervals: SYNC_INTERVALS,
            threshold: ThresholdMode::SyncWindow,
        }
    }
}

impl RxConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Duration of one transmitted bit in nanoseconds.
    pub fn unit_interval_ns(&self) -> f64 {
        1e9 / self.bit_rate as f64
    }

    /// Duration of the sync preamble in nanoseconds.
    pub fn sync_window_ns(&self) -> i64 {
        (self.sync_intervals as f64 * self.unit_interval_ns()) as i64
    }
}
