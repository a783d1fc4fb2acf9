//! Receiver for classroom clicker FSK transmissions.
//!
//! Turns a stream of complex baseband samples into decoded packets: a
//! device identifier and the button that was pressed. The pipeline is
//! burst detection, differential FSK demodulation, transition-timing bit
//! slicing, frame assembly, checksum validation and identifier
//! descrambling.

pub mod dsp;
pub mod error;
pub mod rx;
pub mod source;
pub mod utils;

pub use error::{Error, Result};
