//! Sample sources: where complex baseband samples come from.
//!
//! Live capture (SoapySDR, behind the `soapy` feature) and offline
//! recordings (raw interleaved f32 I/Q, 2-channel WAV) share one trait so
//! the decode pipeline never knows which is behind it.

mod iq_file;
mod wav;

#[cfg(feature = "soapy")]
mod soapy;

pub use iq_file::IqFileSource;
pub use wav::WavSource;

#[cfg(feature = "soapy")]
pub use soapy::SoapySource;

use num_complex::Complex;

use crate::error::Result;

/// Outcome of one `fetch` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// `n` samples were written to the front of the buffer.
    Samples(usize),
    /// Nothing arrived in time; not an error, the caller retries.
    TimedOut,
    /// The source is exhausted (end of recording, stream closed).
    End,
}

/// A continuous, time-ordered stream of complex baseband samples at a
/// fixed sample rate.
pub trait SampleSource {
    /// Fill the front of `buf` with the next samples.
    ///
    /// A live source may block up to its internal timeout; callers must
    /// treat [`Fetch::TimedOut`] as a transparent retry, never as end of
    /// stream.
    fn fetch(&mut self, buf: &mut [Complex<f32>]) -> Result<Fetch>;

    /// Sample rate in Hz, fixed for the life of the source.
    fn sample_rate(&self) -> u32;
}

/// In-memory source backed by a sample vector.
///
/// Used by tests and for replaying short captures; can inject timeouts at
/// chosen fetch indices to exercise the retry path.
pub struct VecSource {
    samples: Vec<Complex<f32>>,
    pos: usize,
    sample_rate: u32,
    timeouts: Vec<usize>,
    fetches: usize,
}

impl VecSource {
    pub fn new(samples: Vec<Complex<f32>>, sample_rate: u32) -> Self {
        Self {
            samples,
            pos: 0,
            sample_rate,
            timeouts: Vec::new(),
            fetches: 0,
        }
    }

    /// Report [`Fetch::TimedOut`] on the given fetch indices (0-based).
    pub fn with_timeouts(mut self, timeouts: Vec<usize>) -> Self {
        self.timeouts = timeouts;
        self
    }
}

impl SampleSource for VecSource {
    fn fetch(&mut self, buf: &mut [Complex<f32>]) -> Result<Fetch> {
        let index = self.fetches;
        self.fetches += 1;
        if self.timeouts.contains(&index) {
            return Ok(Fetch::TimedOut);
        }
        if self.pos >= self.samples.len() {
            return Ok(Fetch::End);
        }
        let n = buf.len().min(self.samples.len() - self.pos);
        buf[..n].copy_from_slice(&self.samples[self.pos..self.pos + n]);
        self.pos += n;
        Ok(Fetch::Samples(n))
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
