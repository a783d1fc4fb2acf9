use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use num_complex::Complex;

use crate::error::Result;
use crate::source::{Fetch, SampleSource};
use crate::utils::consts::FETCH_SAMPLES;

/// Shared cooperative cancellation flag.
///
/// Observed once per source fetch, so cancellation latency is bounded by
/// one fetch's worth of samples, never by per-sample granularity.
pub type CancelToken = Arc<AtomicBool>;

/// One consumed sample together with the context the pipeline needs.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    /// The sample just consumed
    pub sample: Complex<f32>,
    /// The sample before it (the origin at the start of a session)
    pub prev: Complex<f32>,
    /// Session time at which the sample was observed (ns)
    pub elapsed_ns: i64,
}

/// Per-attempt decode context: owns the sample source, the virtual clock
/// and the previous-sample register.
///
/// Everything the stages share lives here and is reset between attempts,
/// so no state leaks across decode attempts except the source's own
/// sample clock.
pub struct Session<S> {
    source: S,
    cancel: CancelToken,
    buf: Vec<Complex<f32>>,
    pos: usize,
    len: usize,
    step_ns: i64,
    elapsed_ns: i64,
    prev: Complex<f32>,
}

impl<S: SampleSource> Session<S> {
    pub fn new(source: S, cancel: CancelToken) -> Self {
        let step_ns = (1e9 / source.sample_rate() as f64) as i64;
        Self {
            source,
            cancel,
            buf: vec![Complex::default(); FETCH_SAMPLES],
            pos: 0,
            len: 0,
            step_ns,
            elapsed_ns: 0,
            prev: Complex::default(),
        }
    }

    /// Start a fresh burst-decode attempt: clock to zero, previous sample
    /// to the origin. Samples already fetched are kept.
    pub fn reset(&mut self) {
        self.elapsed_ns = 0;
        self.prev = Complex::default();
    }

    /// Virtual clock advance per sample (ns).
    pub fn step_ns(&self) -> i64 {
        self.step_ns
    }

    /// Total session time advanced so far (ns).
    pub fn elapsed_ns(&self) -> i64 {
        self.elapsed_ns
    }

    /// Pull the next sample, refilling from the source as needed and
    /// retrying transparently on source timeouts.
    ///
    /// Returns `None` once the source ends or the cancellation token
    /// trips; the token is checked only when a refill is due.
    pub fn next_step(&mut self) -> Result<Option<Step>> {
        while self.pos == self.len {
            if self.cancel.load(Ordering::Relaxed) {
                return Ok(None);
            }
            match self.source.fetch(&mut self.buf)? {
                Fetch::Samples(n) => {
                    self.pos = 0;
                    self.len = n;
                }
                Fetch::TimedOut => continue,
                Fetch::End => return Ok(None),
            }
        }

        let sample = self.buf[self.pos];
        self.pos += 1;

        let prev = self.prev;
        let at = self.elapsed_ns;
        self.prev = sample;
        self.elapsed_ns += self.step_ns;

        Ok(Some(Step {
            sample,
            prev,
            elapsed_ns: at,
        }))
    }

    /// Consume samples while `pred` holds; the predicate-driven scan the
    /// pipeline stages are built on.
    ///
    /// Returns `true` when the predicate released the scan, `false` when
    /// the stream ended or was cancelled first.
    pub fn scan_while<F>(&mut self, mut pred: F) -> Result<bool>
    where
        F: FnMut(&Step) -> bool,
    {
        loop {
            match self.next_step()? {
                Some(step) => {
                    if !pred(&step) {
                        return Ok(true);
                    }
                }
                None => return Ok(false),
            }
        }
    }
}
