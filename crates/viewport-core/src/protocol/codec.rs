//! Binary codec for viewport snapshot messages.
//!
//! Wire format:
//! ```text
//! [version:1][msg_type:1][reserved:2][payload_len:4][epoch:8][payload:N]
//! ```
//! Total header size: 16 bytes. All multi-byte header integers are big-endian.
//! The payload is the `bincode` encoding of the [`ViewportMessage`].

use thiserror::Error;
use tracing::debug;

use crate::protocol::messages::{MessageType, ViewportMessage, HEADER_SIZE, PROTOCOL_VERSION};

/// Errors that can occur during message encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The byte slice is shorter than the minimum required length.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The message type byte in the header is not a recognized value.
    #[error("unknown message type: 0x{0:02X}")]
    UnknownMessageType(u8),

    /// The protocol version in the header is not supported.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// The payload could not be parsed, or disagrees with the header.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The encoded payload length field does not match the actual data available.
    #[error("payload length mismatch: header says {declared}, available is {available}")]
    PayloadLengthMismatch { declared: usize, available: usize },

    /// The message could not be serialized.
    #[error("failed to serialize payload: {0}")]
    Serialize(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`ViewportMessage`] into a byte vector including the 16-byte header.
///
/// `epoch` is the configuration epoch the message belongs to; take it from
/// an [`crate::protocol::EpochCounter`].
///
/// # Errors
///
/// Returns [`ProtocolError::Serialize`] if the payload cannot be encoded.
///
/// # Examples
///
/// ```rust
/// use viewport_core::protocol::{decode_message, encode_message, ViewportMessage};
///
/// let msg = ViewportMessage::Withdraw { unique_id: "hdmi:1".to_string() };
/// let bytes = encode_message(&msg, 7).unwrap();
/// let (decoded, epoch, consumed) = decode_message(&bytes).unwrap();
/// assert_eq!(decoded, msg);
/// assert_eq!(epoch, 7);
/// assert_eq!(consumed, bytes.len());
/// ```
pub fn encode_message(msg: &ViewportMessage, epoch: u64) -> Result<Vec<u8>, ProtocolError> {
    let payload = bincode::serialize(msg).map_err(|e| ProtocolError::Serialize(e.to_string()))?;
    let payload_len = u32::try_from(payload.len())
        .map_err(|_| ProtocolError::Serialize(format!("payload too large: {} bytes", payload.len())))?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());

    // Header: version (1) + msg_type (1) + reserved (2) + payload_len (4) + epoch (8)
    buf.push(PROTOCOL_VERSION);
    buf.push(msg.message_type() as u8);
    buf.push(0x00); // reserved
    buf.push(0x00); // reserved
    buf.extend_from_slice(&payload_len.to_be_bytes());
    buf.extend_from_slice(&epoch.to_be_bytes());

    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decodes one [`ViewportMessage`] from the beginning of `bytes`.
///
/// Returns the message, its epoch, and the total number of bytes consumed
/// (header + payload) so the caller can advance their read cursor.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the bytes are malformed.
pub fn decode_message(bytes: &[u8]) -> Result<(ViewportMessage, u64, usize), ProtocolError> {
    if bytes.len() < HEADER_SIZE {
        return Err(ProtocolError::InsufficientData {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let version = bytes[0];
    if version != PROTOCOL_VERSION {
        return Err(ProtocolError::UnsupportedVersion(version));
    }

    let msg_type_byte = bytes[1];
    let msg_type = MessageType::try_from(msg_type_byte)
        .map_err(|_| ProtocolError::UnknownMessageType(msg_type_byte))?;

    if bytes[2] != 0 || bytes[3] != 0 {
        debug!(
            "ignoring non-zero reserved header bytes {:#04x} {:#04x}",
            bytes[2], bytes[3]
        );
    }

    let payload_len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let epoch = read_u64(bytes, 8)?;

    let total_needed = HEADER_SIZE + payload_len;
    if bytes.len() < total_needed {
        return Err(ProtocolError::PayloadLengthMismatch {
            declared: payload_len,
            available: bytes.len() - HEADER_SIZE,
        });
    }

    let payload = &bytes[HEADER_SIZE..total_needed];
    let msg: ViewportMessage = bincode::deserialize(payload)
        .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;

    if msg.message_type() != msg_type {
        return Err(ProtocolError::MalformedPayload(format!(
            "header declares {msg_type:?} but payload holds {:?}",
            msg.message_type()
        )));
    }

    Ok((msg, epoch, total_needed))
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn read_u64(buf: &[u8], offset: usize) -> Result<u64, ProtocolError> {
    let end = offset + 8;
    let bytes: [u8; 8] = buf
        .get(offset..end)
        .and_then(|s| s.try_into().ok())
        .ok_or(ProtocolError::InsufficientData {
            needed: end,
            available: buf.len(),
        })?;
    Ok(u64::from_be_bytes(bytes))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
