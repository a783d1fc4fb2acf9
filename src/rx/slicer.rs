use super::frame::{FramingError, PacketFrame};
use crate::utils::consts::FRAME_BITS;

/// Outcome of feeding one discriminator sample to the slicer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slicing {
    /// Keep feeding samples.
    Continue,
    /// All 64 bits have been placed; the frame is ready for validation.
    FrameFull,
}

/// Recovers the bitstream from level-transition timing alone.
///
/// There is no clock reference shared with the transmitter. Instead, the
/// discriminator output is thresholded into a two-level signal and, on
/// every level flip, the elapsed session time since the previous flip is
/// quantized (truncating) into whole bit intervals: the signal sat at the
/// previous level for that many bit periods, so that many copies of it go
/// into the frame.
pub struct BitSlicer {
    threshold: f32,
    unit_ns: f64,
    last_level: bool,
    last_flip_ns: i64,
    bit: usize,
    frame: PacketFrame,
}

impl BitSlicer {
    /// `start_ns` anchors the first interval: the session time at which
    /// slicing begins.
    pub fn new(threshold: f32, unit_ns: f64, start_ns: i64) -> Self {
        Self {
            threshold,
            unit_ns,
            last_level: false,
            last_flip_ns: start_ns,
            bit: 0,
            frame: PacketFrame::new(),
        }
    }

    /// Feed one discriminator value observed at session time `now_ns`.
    ///
    /// A run that would overflow the 64-bit frame is a framing failure;
    /// no further bits are emitted and the attempt must be discarded.
    pub fn on_sample(&mut self, freq: f32, now_ns: i64) -> Result<Slicing, FramingError> {
        let level = (freq - self.threshold) > 0.0;
        if level != self.last_level {
            let n = ((now_ns - self.last_flip_ns) as f64 / self.unit_ns) as usize;
            for _ in 0..n {
                self.frame.place(self.bit, self.last_level)?;
                self.bit += 1;
            }
            self.last_level = level;
            self.last_flip_ns = now_ns;
            if self.bit == FRAME_BITS {
                return Ok(Slicing::FrameFull);
            }
        }
        Ok(Slicing::Continue)
    }

    /// Number of bits placed so far.
    pub fn bits_placed(&self) -> usize {
        self.bit
    }

    /// The assembled frame; only interpretable after [`Slicing::FrameFull`].
    pub fn into_frame(self) -> PacketFrame {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: f64 = 6562.497;

    fn t(intervals: f64) -> i64 {
        (intervals * UNIT).ceil() as i64
    }

    #[test]
    fn exact_transitions_reconstruct_run_lengths() {
        let mut slicer = BitSlicer::new(0.0, UNIT, 0);

        // high from 0, flip low at 3 intervals, flip high at 5
        assert_eq!(slicer.on_sample(1.0, 0), Ok(Slicing::Continue));
        assert_eq!(slicer.on_sample(-1.0, t(3.0)), Ok(Slicing::Continue));
        assert_eq!(slicer.on_sample(1.0, t(5.0)), Ok(Slicing::Continue));

        // 3 ones then 2 zeros: 11100...
        assert_eq!(slicer.bits_placed(), 5);
        assert_eq!(slicer.into_frame().bytes()[0], 0b1110_0000);
    }

    #[test]
    fn intervals_truncate_toward_zero() {
        let mut slicer = BitSlicer::new(0.0, UNIT, 0);
        slicer.on_sample(1.0, 0).unwrap();
        // 2.9 intervals of high level count as 2 bits
        slicer.on_sample(-1.0, t(2.9)).unwrap();
        assert_eq!(slicer.bits_placed(), 2);
    }

    #[test]
    fn sub_interval_glitches_emit_nothing() {
        let mut slicer = BitSlicer::new(0.0, UNIT, 0);
        slicer.on_sample(1.0, 0).unwrap();
        slicer.on_sample(-1.0, t(0.4)).unwrap();
        assert_eq!(slicer.bits_placed(), 0);
    }

    #[test]
    fn frame_fills_at_exactly_64_bits() {
        let mut slicer = BitSlicer::new(0.0, UNIT, 0);
        slicer.on_sample(1.0, 0).unwrap();

        // alternate every 8 intervals: FF 00 FF 00 ...
        let mut level = -1.0f32;
        for flip in 1..8 {
            assert_eq!(
                slicer.on_sample(level, t(8.0 * flip as f64)),
                Ok(Slicing::Continue)
            );
            level = -level;
        }
        assert_eq!(slicer.on_sample(level, t(64.0)), Ok(Slicing::FrameFull));

        let frame = slicer.into_frame();
        assert_eq!(
            frame.bytes(),
            &[0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00]
        );
    }

    #[test]
    fn overlong_run_is_a_framing_failure() {
        let mut slicer = BitSlicer::new(0.0, UNIT, 0);
        slicer.on_sample(1.0, 0).unwrap();
        assert_eq!(slicer.on_sample(-1.0, t(65.0)), Err(FramingError));
    }

    #[test]
    fn threshold_shifts_the_decision_boundary() {
        let mut slicer = BitSlicer::new(0.5, UNIT, 0);
        // 0.4 is below the boundary: no flip from the initial low level
        assert_eq!(slicer.on_sample(0.4, 0), Ok(Slicing::Continue));
        assert_eq!(slicer.bits_placed(), 0);
        // 0.6 crosses it
        slicer.on_sample(0.6, t(0.5)).unwrap();
        slicer.on_sample(0.4, t(2.5)).unwrap();
        assert_eq!(slicer.bits_placed(), 2);
    }

    #[test]
    fn start_anchor_offsets_the_first_run() {
        let mut slicer = BitSlicer::new(0.0, UNIT, t(10.0));
        assert_eq!(slicer.on_sample(1.0, t(10.0)), Ok(Slicing::Continue));
        slicer.on_sample(-1.0, t(13.0)).unwrap();
        assert_eq!(slicer.bits_placed(), 3);
    }
}
