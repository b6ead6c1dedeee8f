// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer pixel-space geometry used by skin descriptors.
//!
//! Skin art is authored on an integer grid, so descriptor coordinates are
//! kept as `i32`. Anything that has been multiplied by a display scale
//! factor is expressed as a [`kurbo::Rect`] instead.

/// A point in skin pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum, saturating at the `i32` range.
    #[inline]
    #[must_use]
    pub const fn offset(self, other: Self) -> Self {
        Self {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
        }
    }
}

/// An axis-aligned rectangle in skin pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Creates a rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from an origin and a size taken from another rectangle.
    #[inline]
    #[must_use]
    pub const fn with_origin(self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Half-open containment: the right and bottom edges are exclusive.
    #[inline]
    #[must_use]
    pub const fn contains(self, p: Point) -> bool {
        // Offsets are taken in i64 so that extreme descriptor coordinates
        // simply miss.
        let rx = p.x as i64 - self.x as i64;
        let ry = p.y as i64 - self.y as i64;
        rx >= 0 && rx < self.width as i64 && ry >= 0 && ry < self.height as i64
    }

    /// Converts to a floating-point rectangle for damage reporting.
    #[must_use]
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10, 20, 5, 4);
        assert!(r.contains(Point::new(10, 20)), "top-left is inside");
        assert!(r.contains(Point::new(14, 23)), "last pixel is inside");
        assert!(!r.contains(Point::new(15, 23)), "right edge is outside");
        assert!(!r.contains(Point::new(14, 24)), "bottom edge is outside");
        assert!(!r.contains(Point::new(9, 20)), "left of rect is outside");
    }

    #[test]
    fn empty_rect_contains_nothing() {
        assert!(!Rect::ZERO.contains(Point::ZERO), "zero-sized rect");
    }

    #[test]
    fn extreme_coordinates_miss_without_overflow() {
        let far_left = Rect::new(i32::MIN, 0, 10, 10);
        assert!(!far_left.contains(Point::new(5, 5)), "far-away rect");
        let far_right = Rect::new(i32::MAX - 4, 0, 10, 10);
        assert!(!far_right.contains(Point::new(i32::MIN, 5)), "opposite extreme");
        assert!(
            far_right.contains(Point::new(i32::MAX, 5)),
            "point at the upper limit is still inside"
        );
    }

    #[test]
    fn offset_saturates() {
        let p = Point::new(i32::MAX - 1, i32::MIN + 1).offset(Point::new(10, -10));
        assert_eq!(p, Point::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn kurbo_conversion_keeps_extent() {
        let k = Rect::new(-2, 3, 10, 7).to_kurbo();
        assert_eq!((k.x0, k.y0, k.x1, k.y1), (-2.0, 3.0, 8.0, 10.0));
    }
}
