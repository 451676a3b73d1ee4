//! Integer rectangles and floating point positions.
//!
//! Frames are stored as integer pixel rectangles because that is how display
//! configuration is expressed.  Pointer positions are `f64` because raw touch
//! coordinates are sub-pixel and the affine mapping between frames scales them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in one of the viewport coordinate spaces (raw, rotated or logical).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are within `tolerance` of `other`.
    pub fn approx_eq(&self, other: &PointF, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl From<(f64, f64)> for PointF {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for PointF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle with exclusive `right` and `bottom` edges.
///
/// `Rect` is `Copy`: every holder owns its own rectangle, so changing one
/// snapshot's frame can never be observed through another snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle anchored at the origin.
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Horizontal extent.  Negative when the rectangle is inverted.
    ///
    /// Widened to `i64`: edges anywhere in the `i32` range can be up to
    /// `u32::MAX` apart.
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    /// Vertical extent.  Negative when the rectangle is inverted.
    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// Returns `true` if the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Half-open containment test: the left/top edges are inside, the
    /// right/bottom edges are not.
    pub fn contains(&self, point: PointF) -> bool {
        point.x >= f64::from(self.left)
            && point.x < f64::from(self.right)
            && point.y >= f64::from(self.top)
            && point.y < f64::from(self.bottom)
    }

    /// Returns a copy translated by `(dx, dy)`, or `None` if any edge would
    /// leave the `i32` range.
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<Rect> {
        Some(Rect::new(
            self.left.checked_add(dx)?,
            self.top.checked_add(dy)?,
            self.right.checked_add(dx)?,
            self.bottom.checked_add(dy)?,
        ))
    }

    /// Returns `true` if the rectangle lies inside `[0, 0]–[width, height]`.
    pub fn fits_within(&self, width: i32, height: i32) -> bool {
        self.left >= 0 && self.top >= 0 && self.right <= width && self.bottom <= height
    }

    /// Clamps `point` into the closed range `[left, right] × [top, bottom]`.
    ///
    /// Coordinate transforms extrapolate outside their frames; callers that
    /// want pinned coordinates clamp explicitly with this helper.
    pub fn clamp_point(&self, point: PointF) -> PointF {
        PointF {
            x: point.x.clamp(f64::from(self.left), f64::from(self.right)),
            y: point.y.clamp(f64::from(self.top), f64::from(self.bottom)),
        }
    }

    /// The four corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [PointF; 4] {
        let (l, t, r, b) = (
            f64::from(self.left),
            f64::from(self.top),
            f64::from(self.right),
            f64::from(self.bottom),
        );
        [
            PointF::new(l, t),
            PointF::new(r, t),
            PointF::new(r, b),
            PointF::new(l, b),
        ]
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect({}, {} - {}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_width_and_height_are_edge_differences() {
        let r = Rect::new(10, 20, 110, 220);
        assert_eq!(r.width(), 100);
        assert_eq!(r.height(), 200);
    }

    #[test]
    fn test_rect_is_empty_for_zero_width() {
        assert!(Rect::new(5, 0, 5, 100).is_empty());
    }

    #[test]
    fn test_rect_is_empty_for_inverted_rect() {
        assert!(Rect::new(100, 100, 0, 0).is_empty());
    }

    #[test]
    fn test_rect_is_not_empty_for_positive_area() {
        assert!(!Rect::from_size(1, 1).is_empty());
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::from_size(100, 50);
        assert!(r.contains(PointF::new(0.0, 0.0)));
        assert!(r.contains(PointF::new(99.5, 49.5)));
        assert!(!r.contains(PointF::new(100.0, 10.0)));
        assert!(!r.contains(PointF::new(10.0, 50.0)));
        assert!(!r.contains(PointF::new(-0.1, 10.0)));
    }

    #[test]
    fn test_rect_width_spans_full_i32_range() {
        let r = Rect::new(i32::MIN, 0, i32::MAX, 10);
        assert_eq!(r.width(), i64::from(u32::MAX));
        assert!(!r.is_empty());
        assert!(Rect::new(i32::MAX, 0, i32::MIN, 10).is_empty());
    }

    #[test]
    fn test_rect_offset_translates_all_edges() {
        let r = Rect::new(0, 0, 1080, 1920).checked_offset(0, 160);
        assert_eq!(r, Some(Rect::new(0, 160, 1080, 2080)));
    }

    #[test]
    fn test_rect_offset_past_i32_range_is_none() {
        assert_eq!(Rect::new(0, 0, i32::MAX - 5, 10).checked_offset(6, 0), None);
        assert_eq!(Rect::new(0, i32::MIN, 10, 0).checked_offset(0, -1), None);
    }

    #[test]
    fn test_rect_fits_within_device_bounds() {
        let r = Rect::new(0, 0, 1080, 1920);
        assert!(r.fits_within(1080, 1920));
        assert!(!r.fits_within(1080, 1919));
        assert!(!Rect::new(-1, 0, 10, 10).fits_within(100, 100));
    }

    #[test]
    fn test_rect_clamp_point_pins_to_edges() {
        let r = Rect::from_size(100, 100);
        assert_eq!(r.clamp_point(PointF::new(-5.0, 150.0)), PointF::new(0.0, 100.0));
        assert_eq!(r.clamp_point(PointF::new(40.0, 60.0)), PointF::new(40.0, 60.0));
    }

    #[test]
    fn test_rect_corners_are_clockwise_from_top_left() {
        let corners = Rect::new(1, 2, 3, 4).corners();
        assert_eq!(corners[0], PointF::new(1.0, 2.0));
        assert_eq!(corners[1], PointF::new(3.0, 2.0));
        assert_eq!(corners[2], PointF::new(3.0, 4.0));
        assert_eq!(corners[3], PointF::new(1.0, 4.0));
    }

    #[test]
    fn test_rect_display_format() {
        assert_eq!(Rect::new(0, 160, 1080, 2080).to_string(), "Rect(0, 160 - 1080, 2080)");
    }

    #[test]
    fn test_point_approx_eq_respects_tolerance() {
        let a = PointF::new(1.0, 2.0);
        assert!(a.approx_eq(&PointF::new(1.0 + 1e-10, 2.0 - 1e-10), 1e-9));
        assert!(!a.approx_eq(&PointF::new(1.1, 2.0), 1e-9));
    }
}
