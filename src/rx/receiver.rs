use std::fmt;

use tracing::{debug, trace, warn};

use super::choice::Choice;
use super::config::{RxConfig, ThresholdMode};
use super::ident::descramble_id;
use super::session::{CancelToken, Session};
use super::slicer::{BitSlicer, Slicing};
use crate::dsp;
use crate::error::Result;
use crate::source::SampleSource;

/// A successfully decoded clicker packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Descrambled identifier: three identifier bytes plus the XOR
    /// self-check byte.
    pub ident: [u8; 4],
    /// The pressed button, or the raw nibble when unrecognized.
    pub choice: Choice,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:02X}{:02X}{:02X}{:02X} selected {}",
            self.ident[0], self.ident[1], self.ident[2], self.ident[3], self.choice
        )
    }
}

enum Attempt {
    Packet(Report),
    Discard,
    Stop,
}

enum Threshold {
    Value(f32),
    /// The sync window closed without a usable discriminator sample, so
    /// no meaningful boundary exists.
    Degenerate,
    /// Power fell below the squelch mid-preamble: the burst is over.
    BurstEnded,
    Ended,
}

/// Drives the decode pipeline over a sample source.
///
/// Each attempt runs to completion (packet or discard) before the next
/// begins: burst detection, threshold acquisition across the sync
/// preamble, bit slicing into a frame, checksum validation, then
/// identifier descrambling and button mapping. Framing failures and
/// checksum mismatches are expected noise and simply resume burst
/// detection.
pub struct Receiver<S> {
    session: Session<S>,
    config: RxConfig,
}

impl<S: SampleSource> Receiver<S> {
    pub fn new(source: S, config: RxConfig, cancel: CancelToken) -> Self {
        Self {
            session: Session::new(source, cancel),
            config,
        }
    }

    /// Run until the source ends or cancellation trips, invoking `report`
    /// for every decoded packet.
    pub fn run<F>(&mut self, mut report: F) -> Result<()>
    where
        F: FnMut(&Report),
    {
        while let Some(packet) = self.next_packet()? {
            report(&packet);
        }
        Ok(())
    }

    /// Decode attempts until one yields a packet; `None` once the stream
    /// ends or is cancelled.
    pub fn next_packet(&mut self) -> Result<Option<Report>> {
        loop {
            match self.attempt()? {
                Attempt::Packet(report) => return Ok(Some(report)),
                Attempt::Discard => continue,
                Attempt::Stop => return Ok(None),
            }
        }
    }

    fn attempt(&mut self) -> Result<Attempt> {
        self.session.reset();

        // wait for a burst: skip samples below the squelch
        let squelch = self.config.squelch;
        if !self
            .session
            .scan_while(|step| dsp::power(step.sample) < squelch)?
        {
            return Ok(Attempt::Stop);
        }
        trace!("burst detected at {} ns", self.session.elapsed_ns());

        let threshold = match self.acquire_threshold()? {
            Threshold::Value(t) => t,
            Threshold::Degenerate => {
                warn!("sync window held no discriminator samples; discarding burst");
                return Ok(Attempt::Discard);
            }
            Threshold::BurstEnded => {
                trace!("burst ended inside the sync window");
                return Ok(Attempt::Discard);
            }
            Threshold::Ended => return Ok(Attempt::Stop),
        };
        trace!("slicing threshold {:.4}", threshold);

        let mut slicer = BitSlicer::new(
            threshold,
            self.config.unit_interval_ns(),
            self.session.elapsed_ns(),
        );
        let mut outcome = SliceOutcome::Starved;
        let released = self.session.scan_while(|step| {
            if dsp::power(step.sample) < squelch {
                outcome = SliceOutcome::BurstEnded;
                return false;
            }
            let Some(freq) = dsp::discriminator(step.prev, step.sample) else {
                return true;
            };
            match slicer.on_sample(freq, step.elapsed_ns) {
                Ok(Slicing::Continue) => true,
                Ok(Slicing::FrameFull) => {
                    outcome = SliceOutcome::Full;
                    false
                }
                Err(_) => {
                    outcome = SliceOutcome::Overflow;
                    false
                }
            }
        })?;

        match outcome {
            SliceOutcome::Starved => {
                debug_assert!(!released);
                trace!("source ended after {} bits", slicer.bits_placed());
                Ok(Attempt::Stop)
            }
            SliceOutcome::BurstEnded => {
                // power dropped before 64 bits: framing failure, no salvage
                trace!("burst ended after {} bits", slicer.bits_placed());
                Ok(Attempt::Discard)
            }
            SliceOutcome::Overflow => {
                trace!("bit run overflowed the frame");
                Ok(Attempt::Discard)
            }
            SliceOutcome::Full => {
                let frame = slicer.into_frame();
                if !frame.checksum_valid() {
                    debug!("checksum mismatch on frame {:02X?}", frame.bytes());
                    return Ok(Attempt::Discard);
                }
                let ident = descramble_id(frame.scrambled_id());
                let choice = Choice::from_nibble(frame.button_nibble());
                debug!("frame {:02X?} decoded", frame.bytes());
                Ok(Attempt::Packet(Report { ident, choice }))
            }
        }
    }

    /// Consume the sync preamble and derive the slicing threshold.
    ///
    /// In `SyncWindow` mode the discriminator extremes across the window
    /// set the boundary at `(max - min) / 2`; in `Fixed` mode the window
    /// is skipped over without measuring, since the preamble occupies the
    /// burst regardless.
    fn acquire_threshold(&mut self) -> Result<Threshold> {
        let window_end = self.session.elapsed_ns() + self.config.sync_window_ns();
        let squelch = self.config.squelch;

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut burst_ended = false;
        let measure = matches!(self.config.threshold, ThresholdMode::SyncWindow);

        let released = self.session.scan_while(|step| {
            if step.elapsed_ns >= window_end {
                return false;
            }
            if dsp::power(step.sample) < squelch {
                burst_ended = true;
                return false;
            }
            if measure {
                if let Some(freq) = dsp::discriminator(step.prev, step.sample) {
                    min = min.min(freq);
                    max = max.max(freq);
                }
            }
            true
        })?;
        if !released {
            return Ok(Threshold::Ended);
        }
        if burst_ended {
            return Ok(Threshold::BurstEnded);
        }

        match self.config.threshold {
            ThresholdMode::Fixed(t) => Ok(Threshold::Value(t)),
            ThresholdMode::SyncWindow => {
                if min.is_finite() && max.is_finite() {
                    Ok(Threshold::Value((max - min) / 2.0))
                } else {
                    Ok(Threshold::Degenerate)
                }
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SliceOutcome {
    /// The source ended or was cancelled mid-burst.
    Starved,
    /// Power fell below the squelch before the frame filled.
    BurstEnded,
    Full,
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VecSource;
    use num_complex::Complex;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn token(cancelled: bool) -> CancelToken {
        Arc::new(AtomicBool::new(cancelled))
    }

    #[test]
    fn empty_source_yields_no_packet() {
        let source = VecSource::new(Vec::new(), 1_500_000);
        let mut receiver = Receiver::new(source, RxConfig::default(), token(false));
        assert_eq!(receiver.next_packet().unwrap(), None);
    }

    #[test]
    fn silence_yields_no_packet() {
        let silence = vec![Complex::new(0.01, 0.0); 4096];
        let source = VecSource::new(silence, 1_500_000);
        let mut receiver = Receiver::new(source, RxConfig::default(), token(false));
        assert_eq!(receiver.next_packet().unwrap(), None);
    }

    #[test]
    fn cancelled_token_stops_immediately() {
        let burst = vec![Complex::new(1.0, 0.0); 4096];
        let source = VecSource::new(burst, 1_500_000);
        let mut receiver = Receiver::new(source, RxConfig::default(), token(true));
        assert_eq!(receiver.next_packet().unwrap(), None);
    }

    #[test]
    fn zero_length_sync_window_is_degenerate_and_discarded() {
        // a window that closes before any discriminator sample leaves no
        // boundary to slice against; the burst must be discarded, never
        // sliced with a sentinel threshold
        let config = RxConfig {
            sync_intervals: 0,
            ..RxConfig::default()
        };
        let mut samples = vec![Complex::new(0.0, 0.0); 64];
        samples.extend((0..100).map(|i| Complex::from_polar(1.0, 0.2 * i as f32)));
        let source = VecSource::new(samples, 1_500_000);
        let mut receiver = Receiver::new(source, config, token(false));
        assert_eq!(receiver.next_packet().unwrap(), None);
    }

    #[test]
    fn burst_dying_in_sync_window_is_discarded() {
        // the burst fades before the sync window closes; the attempt is
        // abandoned and the trailing silence holds no further burst
        let mut samples = vec![Complex::new(0.0, 0.0); 64];
        samples.extend((0..100).map(|i| Complex::from_polar(1.0, 0.2 * i as f32)));
        samples.extend(vec![Complex::new(0.0, 0.0); 200]);
        let source = VecSource::new(samples, 1_500_000);
        let mut receiver = Receiver::new(source, RxConfig::default(), token(false));
        assert_eq!(receiver.next_packet().unwrap(), None);
    }

    #[test]
    fn burst_cut_short_is_not_salvaged() {
        // a burst long enough to trigger detection but far too short for
        // 64 bits
        let mut samples = vec![Complex::new(0.0, 0.0); 64];
        samples.extend((0..32).map(|i| Complex::from_polar(1.0, 0.2 * i as f32)));
        let source = VecSource::new(samples, 1_500_000);
        let mut receiver = Receiver::new(source, RxConfig::default(), token(false));
        assert_eq!(receiver.next_packet().unwrap(), None);
    }
}
