//! The viewport snapshot: how one physical display device presents a logical display.
//!
//! A [`ViewportModel`] is produced by the display-configuration authority every
//! time topology or rotation changes and is handed to consumers by copy.  It
//! has no setters: a changed viewport is a new value, built either from
//! [`ViewportModel::builder`] or from an existing snapshot via
//! [`ViewportModel::to_builder`].
//!
//! # What is a viewport? (for beginners)
//!
//! A logical display is the abstract screen that applications draw to, for
//! example a 1080×1920 portrait surface.  A physical device is the actual
//! panel.  The two rarely line up one to one:
//!
//! - the panel may be mounted rotated, so its natural pixel grid is turned by
//!   a quarter turn relative to the content;
//! - the content may be letterboxed into part of the panel (`physical_frame`)
//!   or scaled to a different size (`logical_frame`);
//! - part of the panel may be hidden behind a bezel or a status bar strip,
//!   which a [`FrameAdjustment`] describes.
//!
//! The viewport records all of this in one value so that a raw touch on the
//! panel can be mapped into the logical display and back.
//!
//! # Validity
//!
//! A device without an active display association still gets a snapshot, with
//! `valid == false`.  Such placeholders carry whatever geometry they were
//! built with and are never checked.  Snapshots flagged valid must pass
//! [`ViewportModel::validate`] before a registry will store them.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use super::orientation::Orientation;

/// Reasons a viewport cannot be used or published.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ViewportError {
    /// The snapshot is flagged invalid (the device has no active display association).
    #[error("viewport is not valid")]
    NotValid,

    /// The physical frame has zero or negative width or height.
    #[error("physical frame {0} has no area")]
    EmptyPhysicalFrame(Rect),

    /// The logical frame has zero or negative width or height.
    #[error("logical frame {0} has no area")]
    EmptyLogicalFrame(Rect),

    /// The physical frame extends past the rotated device bounds.
    #[error("physical frame {frame} does not fit within device bounds {device_width}x{device_height}")]
    PhysicalFrameOutOfBounds {
        frame: Rect,
        device_width: i32,
        device_height: i32,
    },

    /// A valid snapshot must name its physical device.
    #[error("valid viewport has no unique id")]
    MissingUniqueId,

    /// Moving the physical frame off an uncovered strip would push an edge
    /// outside the `i32` range.
    #[error("frame adjustment {adjustment:?} overflows physical frame {frame}")]
    AdjustmentOverflow {
        frame: Rect,
        adjustment: FrameAdjustment,
    },
}

/// A strip along the top and/or left edge of the raw panel that logical
/// content never covers.
///
/// `offset_x` / `offset_y` are the strip widths in raw (unrotated) pixels.
/// The strip is carried into each snapshot's orientation before the physical
/// frame is moved off it, so the same panel pixels stay uncovered in all four
/// rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FrameAdjustment {
    pub offset_x: i32,
    pub offset_y: i32,
}

impl FrameAdjustment {
    pub fn is_identity(&self) -> bool {
        self.offset_x == 0 && self.offset_y == 0
    }
}

/// One physical-to-logical display mapping at one configuration epoch.
///
/// Equality and hashing cover every field.  `unique_id` is an
/// `Option<String>`: two absent ids compare equal, and an absent id never
/// equals a present one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportModel {
    valid: bool,
    logical_display_id: i32,
    orientation: Orientation,
    logical_frame: Rect,
    physical_frame: Rect,
    device_width: i32,
    device_height: i32,
    unique_id: Option<String>,
}

impl ViewportModel {
    /// The sentinel handed out for devices without a display association.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            logical_display_id: 0,
            orientation: Orientation::Rotation0,
            logical_frame: Rect::default(),
            physical_frame: Rect::default(),
            device_width: 0,
            device_height: 0,
            unique_id: None,
        }
    }

    /// Starts a new valid viewport.  Unset fields take the [`ViewportModel::invalid`] values.
    pub fn builder() -> ViewportBuilder {
        ViewportBuilder {
            inner: Self {
                valid: true,
                ..Self::invalid()
            },
        }
    }

    /// Starts a builder pre-filled with this snapshot's fields.
    pub fn to_builder(&self) -> ViewportBuilder {
        ViewportBuilder {
            inner: self.clone(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn logical_display_id(&self) -> i32 {
        self.logical_display_id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn logical_frame(&self) -> Rect {
        self.logical_frame
    }

    pub fn physical_frame(&self) -> Rect {
        self.physical_frame
    }

    pub fn device_width(&self) -> i32 {
        self.device_width
    }

    pub fn device_height(&self) -> i32 {
        self.device_height
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.unique_id.as_deref()
    }

    /// Checks that the frames can carry a coordinate transform.
    ///
    /// # Errors
    ///
    /// [`ViewportError::NotValid`], [`ViewportError::EmptyPhysicalFrame`] or
    /// [`ViewportError::EmptyLogicalFrame`], in that order of precedence.
    pub fn check_transformable(&self) -> Result<(), ViewportError> {
        if !self.valid {
            return Err(ViewportError::NotValid);
        }
        if self.physical_frame.is_empty() {
            return Err(ViewportError::EmptyPhysicalFrame(self.physical_frame));
        }
        if self.logical_frame.is_empty() {
            return Err(ViewportError::EmptyLogicalFrame(self.logical_frame));
        }
        Ok(())
    }

    /// Checks every snapshot invariant.  Invalid snapshots carry no
    /// obligations and always pass.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ViewportError> {
        if !self.valid {
            return Ok(());
        }
        self.check_transformable()?;
        if !self
            .physical_frame
            .fits_within(self.device_width, self.device_height)
        {
            return Err(ViewportError::PhysicalFrameOutOfBounds {
                frame: self.physical_frame,
                device_width: self.device_width,
                device_height: self.device_height,
            });
        }
        if self.unique_id.is_none() {
            return Err(ViewportError::MissingUniqueId);
        }
        Ok(())
    }

    /// Returns a new snapshot whose `physical_frame` is moved off the
    /// uncovered strip described by `adjustment`.
    ///
    /// The strip's inner corner in rotated space is
    /// [`Orientation::rotate_inset`].  A frame whose top-left corner lies
    /// before that corner is translated until it reaches it; a frame that is
    /// already clear of the strip is left where it is.  Applying the same
    /// adjustment twice therefore changes nothing the second time, so
    /// re-publishing a modified copy of an adjusted snapshot is safe.
    ///
    /// # Errors
    ///
    /// [`ViewportError::AdjustmentOverflow`] if the translated frame would
    /// leave the `i32` range.
    pub fn with_frame_adjustment(
        &self,
        adjustment: &FrameAdjustment,
    ) -> Result<ViewportModel, ViewportError> {
        let overflow = || ViewportError::AdjustmentOverflow {
            frame: self.physical_frame,
            adjustment: *adjustment,
        };
        let (min_left, min_top) = self
            .orientation
            .rotate_inset(adjustment.offset_x, adjustment.offset_y);
        let shift = |floor: i32, edge: i32| {
            i32::try_from((i64::from(floor) - i64::from(edge)).max(0)).map_err(|_| overflow())
        };
        let dx = shift(min_left, self.physical_frame.left)?;
        let dy = shift(min_top, self.physical_frame.top)?;
        let physical_frame = self
            .physical_frame
            .checked_offset(dx, dy)
            .ok_or_else(overflow)?;
        Ok(ViewportModel {
            physical_frame,
            ..self.clone()
        })
    }

    /// A deterministic hash of every field, stable across processes built
    /// from the same toolchain.
    pub fn content_hash(&self) -> u64 {
        // `DefaultHasher::new()` uses fixed keys, unlike `RandomState`.
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for ViewportModel {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for ViewportModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DisplayViewport{{valid={}, displayId={}, uniqueId='{}', orientation={}, \
             logicalFrame={}, physicalFrame={}, deviceWidth={}, deviceHeight={}}}",
            self.valid,
            self.logical_display_id,
            self.unique_id.as_deref().unwrap_or("null"),
            self.orientation,
            self.logical_frame,
            self.physical_frame,
            self.device_width,
            self.device_height,
        )
    }
}

/// Assembles a [`ViewportModel`].  Consumed by [`ViewportBuilder::build`].
#[derive(Debug, Clone)]
pub struct ViewportBuilder {
    inner: ViewportModel,
}

impl ViewportBuilder {
    pub fn valid(mut self, valid: bool) -> Self {
        self.inner.valid = valid;
        self
    }

    pub fn logical_display_id(mut self, id: i32) -> Self {
        self.inner.logical_display_id = id;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.inner.orientation = orientation;
        self
    }

    pub fn logical_frame(mut self, frame: Rect) -> Self {
        self.inner.logical_frame = frame;
        self
    }

    pub fn physical_frame(mut self, frame: Rect) -> Self {
        self.inner.physical_frame = frame;
        self
    }

    /// Sets the rotated device size (same orientation as `physical_frame`).
    pub fn device_size(mut self, width: i32, height: i32) -> Self {
        self.inner.device_width = width;
        self.inner.device_height = height;
        self
    }

    pub fn unique_id(mut self, id: impl Into<String>) -> Self {
        self.inner.unique_id = Some(id.into());
        self
    }

    pub fn clear_unique_id(mut self) -> Self {
        self.inner.unique_id = None;
        self
    }

    pub fn build(self) -> ViewportModel {
        self.inner
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
