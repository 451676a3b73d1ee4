//! Device orientation and the fixed quarter-turn rotation it implies.
//!
//! The hardware reports pointer coordinates in the panel's natural (raw)
//! orientation.  A viewport's `physical_frame`, `device_width` and
//! `device_height` are expressed after the orientation rotation has been
//! applied ("rotated physical space").  [`Orientation::rotate_point`] carries a
//! raw point into rotated space; [`Orientation::unrotate_point`] undoes it.
//!
//! With `W × H` the rotated device size:
//!
//! ```text
//! 0°    (px, py) -> (px,     py)
//! 90°   (px, py) -> (W - py, px)
//! 180°  (px, py) -> (W - px, H - py)
//! 270°  (px, py) -> (py,     H - px)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::PointF;

/// Rotation applied to the physical pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Rotation0,
    Rotation90,
    Rotation180,
    Rotation270,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Rotation0,
        Orientation::Rotation90,
        Orientation::Rotation180,
        Orientation::Rotation270,
    ];

    /// Parses a rotation in degrees.  Multiples of 360 are reduced first.
    ///
    /// Returns `None` for anything that is not a quarter turn.
    pub fn from_degrees(degrees: u32) -> Option<Orientation> {
        match degrees % 360 {
            0 => Some(Orientation::Rotation0),
            90 => Some(Orientation::Rotation90),
            180 => Some(Orientation::Rotation180),
            270 => Some(Orientation::Rotation270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        u32::from(self.quarter_turns()) * 90
    }

    /// Parses the platform's quarter-turn encoding (`ROTATION_0` = 0 … `ROTATION_270` = 3).
    pub fn from_quarter_turns(turns: u8) -> Option<Orientation> {
        Orientation::ALL.get(usize::from(turns)).copied()
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Orientation::Rotation0 => 0,
            Orientation::Rotation90 => 1,
            Orientation::Rotation180 => 2,
            Orientation::Rotation270 => 3,
        }
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Orientation {
        match self {
            Orientation::Rotation90 => Orientation::Rotation270,
            Orientation::Rotation270 => Orientation::Rotation90,
            other => other,
        }
    }

    /// Returns `true` when width and height swap between raw and rotated space.
    pub fn is_transposed(self) -> bool {
        matches!(self, Orientation::Rotation90 | Orientation::Rotation270)
    }

    /// The raw (pre-rotation) panel size for a rotated `device_width × device_height`.
    pub fn natural_size(self, device_width: i32, device_height: i32) -> (i32, i32) {
        if self.is_transposed() {
            (device_height, device_width)
        } else {
            (device_width, device_height)
        }
    }

    /// Maps a raw panel point into rotated physical space.
    pub fn rotate_point(self, point: PointF, device_width: i32, device_height: i32) -> PointF {
        let (w, h) = (f64::from(device_width), f64::from(device_height));
        match self {
            Orientation::Rotation0 => point,
            Orientation::Rotation90 => PointF::new(w - point.y, point.x),
            Orientation::Rotation180 => PointF::new(w - point.x, h - point.y),
            Orientation::Rotation270 => PointF::new(point.y, h - point.x),
        }
    }

    /// Maps a rotated physical point back into raw panel space.
    pub fn unrotate_point(self, point: PointF, device_width: i32, device_height: i32) -> PointF {
        let (w, h) = (f64::from(device_width), f64::from(device_height));
        match self {
            Orientation::Rotation0 => point,
            Orientation::Rotation90 => PointF::new(point.y, w - point.x),
            Orientation::Rotation180 => PointF::new(w - point.x, h - point.y),
            Orientation::Rotation270 => PointF::new(h - point.y, point.x),
        }
    }

    /// Where a raw-panel inset lands in rotated space.
    ///
    /// `(inset_x, inset_y)` is the top-left corner of the covered content in
    /// raw panel pixels; the strips above and to the left of it are never
    /// drawn.  Returns the top-left corner of that content after rotation,
    /// i.e. the minimum over the rotated corners of the raw region
    /// `[inset_x, raw_width] x [inset_y, raw_height]`.
    pub fn rotate_inset(self, inset_x: i32, inset_y: i32) -> (i32, i32) {
        match self {
            Orientation::Rotation0 => (inset_x, inset_y),
            Orientation::Rotation90 => (0, inset_x),
            Orientation::Rotation180 => (0, 0),
            Orientation::Rotation270 => (inset_y, 0),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quarter_turns())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
