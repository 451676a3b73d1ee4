//! # viewport-core
//!
//! Describes how the pixels of a physical display device present the content
//! of a logical display, and translates pointer coordinates between the two.
//!
//! - **`domain`** – The [`ViewportModel`] snapshot (frames, rotation, device
//!   size, device identity) and the [`CoordinateTransform`] it implies.  Input
//!   routing uses it to turn raw touch coordinates, reported in the panel's
//!   natural orientation, into logical display coordinates.
//!
//! - **`protocol`** – A framed binary encoding of snapshot changes for
//!   delivery across a process boundary, plus the configuration epoch counter.
//!
//! The crate has no dependencies on OS APIs or async runtimes.

pub mod domain;
pub mod protocol;

pub use domain::{
    transform, CoordinateTransform, Direction, FrameAdjustment, Orientation, PointF, Rect,
    ViewportBuilder, ViewportError, ViewportModel,
};
pub use protocol::codec::{decode_message, encode_message, ProtocolError};
pub use protocol::messages::ViewportMessage;
