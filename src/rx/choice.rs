use std::fmt;

/// Button reported by the handset.
///
/// The air protocol only defines five button codes. Anything else is
/// surfaced as [`Choice::Unrecognized`] with the raw nibble, never
/// conflated with a valid button: a noisy nibble that happens to decode
/// is still a decode ambiguity the operator should see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    A,
    B,
    C,
    D,
    E,
    Unrecognized(u8),
}

impl Choice {
    /// Map the button nibble from frame byte 6.
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0F {
            0x1 => Choice::A,
            0x5 => Choice::B,
            0xD => Choice::C,
            0xE => Choice::D,
            0xA => Choice::E,
            other => Choice::Unrecognized(other),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::A => write!(f, "A"),
            Choice::B => write!(f, "B"),
            Choice::C => write!(f, "C"),
            Choice::D => write!(f, "D"),
            Choice::E => write!(f, "E"),
            Choice::Unrecognized(nibble) => write!(f, "unrecognized nibble 0x{:X}", nibble),
        }
    }
}
