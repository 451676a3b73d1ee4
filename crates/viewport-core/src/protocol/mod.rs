//! Snapshot messages, the binary codec, and the configuration epoch counter.

pub mod codec;
pub mod epoch;
pub mod messages;

pub use codec::{decode_message, encode_message, ProtocolError};
pub use epoch::{epoch_is_newer, EpochCounter};
pub use messages::*;
