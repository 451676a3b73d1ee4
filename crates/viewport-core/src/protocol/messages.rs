//! Snapshot distribution messages.
//!
//! Any cross-process delivery of viewports must carry every field of the
//! snapshot so that equality holds on the far side.  The payload is the
//! `bincode` encoding of [`ViewportMessage`]; the framing header is described
//! in [`crate::protocol::codec`].

use serde::{Deserialize, Serialize};

use crate::domain::viewport::ViewportModel;

// ── Protocol constants ────────────────────────────────────────────────────────

/// Current protocol version byte.
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Total size of the common message header in bytes.
pub const HEADER_SIZE: usize = 16;

// ── Message type codes ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    Publish = 0x01,
    Withdraw = 0x02,
}

impl TryFrom<u8> for MessageType {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x01 => Ok(MessageType::Publish),
            0x02 => Ok(MessageType::Withdraw),
            _ => Err(()),
        }
    }
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// A change to one device's viewport record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportMessage {
    /// A new snapshot replaces whatever was known for its device.
    Publish(ViewportModel),
    /// The device is gone; consumers drop their copy.
    Withdraw { unique_id: String },
}

impl ViewportMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            ViewportMessage::Publish(_) => MessageType::Publish,
            ViewportMessage::Withdraw { .. } => MessageType::Withdraw,
        }
    }
}
