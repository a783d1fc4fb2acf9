//! Per-sample signal primitives used by the receive pipeline.

use num_complex::Complex;

/// Instantaneous received power: squared magnitude of the sample.
pub fn power(sample: Complex<f32>) -> f32 {
    sample.norm_sqr()
}

/// Differential FSK discriminator.
///
/// Returns the phase advance from `prev` to `cur`, the angle of
/// `cur / prev` computed as `arg(cur * conj(prev))` to avoid the division.
/// The sign and magnitude of the result separate the two FSK tones.
///
/// Returns `None` when `prev` carries no energy (the first sample of a
/// session), in which case no frequency estimate exists; callers must
/// exclude that sample from any aggregate.
pub fn discriminator(prev: Complex<f32>, cur: Complex<f32>) -> Option<f32> {
    if prev.norm_sqr() == 0.0 {
        return None;
    }
    Some((cur * prev.conj()).arg())
}
