/// Log level (can be overridden with RUST_LOG)
pub const LOG_LEVEL: &str = "info";

// ============================================================================
// Air Protocol Parameters
// ============================================================================

/// RF center frequency of the clicker channel (Hz)
pub const FREQUENCY_HZ: f64 = 917e6;

/// Occupied bandwidth of the transmission (Hz)
pub const BANDWIDTH_HZ: f64 = 445_666.0;

/// Designed bit rate of the FSK stream (bits per second)
pub const BIT_RATE: u32 = 152_381;

/// Squared-magnitude power threshold separating a burst from background noise
pub const SQUELCH: f32 = 0.8;

/// Length of the sync preamble at the head of each burst, in bit intervals
pub const SYNC_INTERVALS: u32 = 24;

/// Packet frame size (bytes)
pub const FRAME_BYTES: usize = 8;

/// Packet frame size (bits)
pub const FRAME_BITS: usize = FRAME_BYTES * 8;

// ============================================================================
// Sample Transport
// ============================================================================

/// Samples requested from the source per fetch
pub const FETCH_SAMPLES: usize = 1024;

/// Per-fetch timeout for live sources (microseconds)
pub const FETCH_TIMEOUT_US: i64 = 100_000;
