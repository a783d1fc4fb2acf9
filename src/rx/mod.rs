//! The receive pipeline: burst detection, threshold acquisition, bit
//! slicing, frame validation and packet decoding.

pub mod choice;
pub mod config;
pub mod frame;
pub mod ident;
pub mod receiver;
pub mod session;
pub mod slicer;

pub use choice::Choice;
pub use config::{RxConfig, ThresholdMode};
pub use frame::{FramingError, PacketFrame};
pub use ident::descramble_id;
pub use receiver::{Receiver, Report};
pub use session::{CancelToken, Session, Step};
pub use slicer::{BitSlicer, Slicing};
