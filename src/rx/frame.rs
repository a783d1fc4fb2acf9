// Frame format: [Address:3] [Scrambled ID:3.5] [Button nibble:0.5] [Checksum:1]

use crate::utils::consts::{FRAME_BITS, FRAME_BYTES};

/// The burst could not be shaped into a well-formed frame.
///
/// This is an expected-noise outcome: the attempt is discarded and burst
/// detection resumes. It carries no payload on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramingError;

/// One 64-bit packet frame, owned by a single decode attempt.
///
/// Bytes start zeroed and bits are placed most-significant-bit first as
/// they are recovered; the frame is only interpretable once all 64 bits
/// have been placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketFrame {
    bytes: [u8; FRAME_BYTES],
}

impl PacketFrame {
    pub fn new() -> Self {
        Self {
            bytes: [0; FRAME_BYTES],
        }
    }

    /// Build a frame from raw bytes; used for offline inspection and tests.
    pub fn from_bytes(bytes: [u8; FRAME_BYTES]) -> Self {
        Self { bytes }
    }

    /// Set bit `7 - (bit_index % 8)` of byte `bit_index / 8` when `value`
    /// is true (bytes start zeroed, so false bits need no action).
    ///
    /// `bit_index` past the 64-bit capacity is a framing failure.
    pub fn place(&mut self, bit_index: usize, value: bool) -> Result<(), FramingError> {
        if bit_index >= FRAME_BITS {
            return Err(FramingError);
        }
        if value {
            self.bytes[bit_index / 8] |= 1 << (7 - bit_index % 8);
        }
        Ok(())
    }

    /// Frame integrity: the byte sum over the identifier and button region
    /// (offsets 3..7), modulo 256, must equal the trailing checksum byte.
    ///
    /// A mismatch is radio noise, not an error.
    pub fn checksum_valid(&self) -> bool {
        let sum = self.bytes[3..7]
            .iter()
            .fold(0u8, |sum, &b| sum.wrapping_add(b));
        sum == self.bytes[7]
    }

    /// The scrambled identifier region: bytes 3..6 plus byte 6, whose top
    /// bits carry the identifier's final nibble and whose low nibble is
    /// the button code.
    pub fn scrambled_id(&self) -> [u8; 4] {
        [self.bytes[3], self.bytes[4], self.bytes[5], self.bytes[6]]
    }

    /// The pressed-button code: low nibble of byte 6.
    pub fn button_nibble(&self) -> u8 {
        self.bytes[6] & 0x0F
    }

    pub fn bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.bytes
    }
}

impl Default for PacketFrame {
    fn default() -> Self {
        Self::new()
    }
}
