//! Domain entities for display viewports.
//!
//! Pure value types and functions: no OS APIs, no I/O, no global state.
//! Everything here can be compiled and tested on any platform.

pub mod geometry;
pub mod orientation;
pub mod transform;
pub mod viewport;

pub use geometry::{PointF, Rect};
pub use orientation::Orientation;
pub use transform::{transform, CoordinateTransform, Direction};
pub use viewport::{FrameAdjustment, ViewportBuilder, ViewportError, ViewportModel};
