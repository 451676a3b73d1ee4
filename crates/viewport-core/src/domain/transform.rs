//! Physical ⇄ logical coordinate transform derived from a [`ViewportModel`].
//!
//! Physical → logical is two steps:
//!
//! 1. Rotate the raw panel point into rotated physical space
//!    ([`Orientation::rotate_point`]).
//! 2. Apply the affine map that carries `physical_frame` onto `logical_frame`:
//!    `logical_x = logical.left + (rotated_x - physical.left) * scale_x`,
//!    with `scale_x = logical.width / physical.width` (same for Y).
//!
//! Logical → physical runs the inverse affine map and then the inverse rotation.
//! Neither direction clamps: points outside the frames are extrapolated by the
//! same formula.

use serde::{Deserialize, Serialize};

use super::geometry::{PointF, Rect};
use super::orientation::Orientation;
use super::viewport::{ViewportError, ViewportModel};

/// Which way [`transform`] maps a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    PhysicalToLogical,
    LogicalToPhysical,
}

/// Precomputed mapping for one viewport snapshot.
///
/// Construction validates the snapshot once; the mapping methods are then
/// infallible and never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    orientation: Orientation,
    device_width: i32,
    device_height: i32,
    physical_frame: Rect,
    logical_frame: Rect,
    scale_x: f64,
    scale_y: f64,
}

impl CoordinateTransform {
    /// Builds the transform for `viewport`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::NotValid`] when the snapshot is flagged invalid,
    /// and [`ViewportError::EmptyPhysicalFrame`] / [`ViewportError::EmptyLogicalFrame`]
    /// when either frame has no area.
    pub fn new(viewport: &ViewportModel) -> Result<Self, ViewportError> {
        viewport.check_transformable()?;

        let physical_frame = viewport.physical_frame();
        let logical_frame = viewport.logical_frame();
        Ok(Self {
            orientation: viewport.orientation(),
            device_width: viewport.device_width(),
            device_height: viewport.device_height(),
            physical_frame,
            logical_frame,
            // Extents never exceed u32::MAX, so the f64 conversions are exact.
            scale_x: logical_frame.width() as f64 / physical_frame.width() as f64,
            scale_y: logical_frame.height() as f64 / physical_frame.height() as f64,
        })
    }

    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Maps a raw panel point to logical display coordinates.
    pub fn physical_to_logical(&self, raw: PointF) -> PointF {
        let rotated = self
            .orientation
            .rotate_point(raw, self.device_width, self.device_height);
        self.rotated_to_logical(rotated)
    }

    /// Maps a logical display point back to raw panel coordinates.
    pub fn logical_to_physical(&self, logical: PointF) -> PointF {
        let rotated = self.logical_to_rotated(logical);
        self.orientation
            .unrotate_point(rotated, self.device_width, self.device_height)
    }

    /// The affine step alone: rotated physical space → logical space.
    pub fn rotated_to_logical(&self, rotated: PointF) -> PointF {
        PointF {
            x: f64::from(self.logical_frame.left)
                + (rotated.x - f64::from(self.physical_frame.left)) * self.scale_x,
            y: f64::from(self.logical_frame.top)
                + (rotated.y - f64::from(self.physical_frame.top)) * self.scale_y,
        }
    }

    /// The inverse affine step: logical space → rotated physical space.
    pub fn logical_to_rotated(&self, logical: PointF) -> PointF {
        PointF {
            x: f64::from(self.physical_frame.left)
                + (logical.x - f64::from(self.logical_frame.left)) / self.scale_x,
            y: f64::from(self.physical_frame.top)
                + (logical.y - f64::from(self.logical_frame.top)) / self.scale_y,
        }
    }

    pub fn apply(&self, point: PointF, direction: Direction) -> PointF {
        match direction {
            Direction::PhysicalToLogical => self.physical_to_logical(point),
            Direction::LogicalToPhysical => self.logical_to_physical(point),
        }
    }
}

/// One-shot transform of `point` against `viewport`.
///
/// # Errors
///
/// See [`CoordinateTransform::new`].
pub fn transform(
    point: PointF,
    viewport: &ViewportModel,
    direction: Direction,
) -> Result<PointF, ViewportError> {
    Ok(CoordinateTransform::new(viewport)?.apply(point, direction))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
