// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Surface`].

use crate::compose::Surface;
use crate::geom::{Point, Rect};
use crate::raster::{Raster, Rgb};

/// A software surface backed by a [`Raster`].
///
/// Fills cover every pixel whose center lies inside the rectangle, so
/// fractional display scales produce the same coverage a non-antialiased
/// rasterizer would.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    target: Raster,
}

impl Canvas {
    /// Creates a black canvas.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Raster::new(width, height),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.target.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// Reads one pixel.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.target.pixel(x, y)
    }

    /// The painted image.
    #[must_use]
    pub fn raster(&self) -> &Raster {
        &self.target
    }

    /// Consumes the canvas, returning the painted image.
    #[must_use]
    pub fn into_raster(self) -> Raster {
        self.target
    }

    fn put(&mut self, x: i32, y: i32, c: Rgb) {
        let (Ok(x), Ok(y)) = (usize::try_from(x), u32::try_from(y)) else {
            return;
        };
        if let Some(px) = self.target.row_mut(y).get_mut(x) {
            *px = c;
        }
    }

    fn clip(&self, r: Rect) -> (core::ops::Range<i32>, core::ops::Range<i32>) {
        let w = i32::try_from(self.width()).unwrap_or(i32::MAX);
        let h = i32::try_from(self.height()).unwrap_or(i32::MAX);
        (
            r.x.max(0)..(r.x.saturating_add(r.width)).min(w),
            r.y.max(0)..(r.y.saturating_add(r.height)).min(h),
        )
    }
}

impl Surface for Canvas {
    fn blit(&mut self, raster: &Raster, src: Point, dst: Rect) {
        let (xs, ys) = self.clip(dst);
        for y in ys {
            for x in xs.clone() {
                let from = Point::new(
                    src.x.saturating_add(x - dst.x),
                    src.y.saturating_add(y - dst.y),
                );
                if let Some(c) = raster.pixel(from.x, from.y) {
                    self.put(x, y, c);
                }
            }
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "edges are rounded and clipped to the canvas"
    )]
    fn fill(&mut self, rect: kurbo::Rect, color: Rgb) {
        let r = rect.abs().round();
        let clamp = |v: f64| v.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32;
        let (x0, y0) = (clamp(r.x0), clamp(r.y0));
        let bounds = Rect::new(
            x0,
            y0,
            clamp(r.x1).saturating_sub(x0),
            clamp(r.y1).saturating_sub(y0),
        );
        let (xs, ys) = self.clip(bounds);
        for y in ys {
            for x in xs.clone() {
                self.put(x, y, color);
            }
        }
    }
}
