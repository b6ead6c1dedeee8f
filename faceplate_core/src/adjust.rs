// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting a skin to a requested display size.
//!
//! Skin art is drawn for the native rows and columns declared by
//! `displaysize:`. A caller may ask for a different size; the adjuster keeps
//! display pixels square by rescaling both axes by `native_cols / cols`, and
//! when the result is taller than the art allows it grows the faceplate by
//! opening a horizontal band just below the expansion zone start. Every Y
//! coordinate strictly below that line moves down by the band height;
//! everything at or above it stays put.
//!
//! The arithmetic mirrors the skin format's historical floating point
//! behavior exactly, including where it truncates toward zero, since a
//! one-pixel drift is visible as misaligned art.

use crate::layout::{DOTS_PER_ROW, DisplayGeometry, ExpansionZone, SkinLayout};
use crate::raster::Expansion;

/// Requested display size in character rows and columns.
///
/// A non-positive field means "use the skin's native value".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Request {
    /// Character rows.
    pub rows: i32,
    /// Character columns.
    pub cols: i32,
}

impl Request {
    /// Keep the native size.
    pub const NATIVE: Self = Self { rows: 0, cols: 0 };

    /// Creates a request.
    #[inline]
    #[must_use]
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self { rows, cols }
    }

    fn resolve(self, display: &DisplayGeometry) -> (i32, i32) {
        let pick = |asked: i32, native: i32| if asked > 0 { asked } else { native };
        (
            pick(self.rows, display.native_rows),
            pick(self.cols, display.native_cols),
        )
    }
}

/// What [`adjust`] did to a layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Adjustment {
    /// Pixel rows inserted into the faceplate.
    pub extra: i32,
    /// Pixel rows the display no longer needs, when it shrank.
    pub wasted: i32,
    /// The zone used, after defaulting.
    pub zone: ExpansionZone,
}

impl Adjustment {
    /// The matching bitmap expansion for [`ImageBuilder`](crate::raster::ImageBuilder).
    #[must_use]
    pub fn expansion(&self) -> Expansion {
        Expansion {
            extra: self.extra,
            zone: self.zone,
        }
    }
}

/// Per-dot pixel height for a display of `rows` rows.
///
/// Two-row displays use the vertical scale; taller ones use the override
/// when one is configured and the horizontal scale otherwise.
fn row_scale(display: &DisplayGeometry, rows: i32) -> f64 {
    if rows == 2 {
        display.scale_y
    } else {
        unit_scale(display)
    }
}

fn unit_scale(display: &DisplayGeometry) -> f64 {
    display
        .alt_pixel_height
        .map_or(display.scale_x, f64::from)
}

/// Adjusts `layout` in place for `request` and reports what changed.
///
/// On return the display's rows, columns and scale factors describe the
/// requested geometry, possibly with fewer rows if a maximum was
/// configured. The native size is left untouched so the layout can be
/// re-derived from a fresh parse.
#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel heights truncate toward zero like the skin format always has"
)]
pub fn adjust(layout: &mut SkinLayout, request: Request) -> Adjustment {
    let d = &mut layout.display;
    let (mut rows, cols) = request.resolve(d);
    let native_cols = f64::from(d.native_cols);
    let col_ratio = |v: f64| v * native_cols / f64::from(cols);

    if let Some(max_rows) = d.max_rows {
        let r = row_scale(d, max_rows);
        let max_h = (f64::from(max_rows) * r) as i32;
        let r2 = col_ratio(unit_scale(d));
        if f64::from(rows) * r2 > f64::from(max_h) {
            rows = (f64::from(max_h) / r2) as i32;
        }
    }

    let xs = col_ratio(d.scale_x);
    let ys = col_ratio(row_scale(d, rows));
    let available =
        (row_scale(d, d.native_rows) * f64::from(d.native_rows) * f64::from(DOTS_PER_ROW)) as i32;

    let mut extra = (f64::from(rows) * ys * f64::from(DOTS_PER_ROW) - f64::from(available)) as i32;
    let mut wasted = 0;
    if extra > 0 {
        if !d.zone.is_configured() {
            d.zone = ExpansionZone {
                first_y: d.origin.y,
                last_y: (f64::from(d.origin.y) + d.scale_y * 16.0) as i32,
            };
        }
        let line = d.zone.first_y;
        shift_below(layout, line, extra);
    } else if extra < 0 {
        wasted = -extra;
        extra = 0;
    }

    let d = &mut layout.display;
    if rows > 2 {
        if let Some(alt_y) = d.alt_origin_y {
            d.origin.y = alt_y.saturating_add(wasted);
        }
    }
    d.rows = rows;
    d.cols = cols;
    d.scale_x = xs;
    d.scale_y = ys;
    d.scale_is_integral = is_whole(xs) && is_whole(ys);

    Adjustment {
        extra,
        wasted,
        zone: d.zone,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "comparing against the truncated value is the test"
)]
fn is_whole(v: f64) -> bool {
    v == (v as i64) as f64
}

/// Moves every stored Y coordinate greater than `line` down by `extra`.
///
/// Coordinates saturate at `i32::MAX`.
fn shift_below(layout: &mut SkinLayout, line: i32, extra: i32) {
    let shift = |y: &mut i32| {
        if *y > line {
            *y = y.saturating_add(extra);
        }
    };
    layout.skin.height = layout.skin.height.saturating_add(extra);
    for ann in &mut layout.annunciators {
        shift(&mut ann.display.y);
        shift(&mut ann.source.y);
    }
    for key in &mut layout.keys {
        shift(&mut key.sensitive.y);
        shift(&mut key.display.y);
        shift(&mut key.source.y);
    }
    for ab in &mut layout.alt_backgrounds {
        shift(&mut ab.source.y);
        shift(&mut ab.dest.y);
    }
    for ak in &mut layout.alt_keys {
        shift(&mut ak.source.y);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::geom::{Point, Rect};
    use crate::keymap::NoKeymap;
    use crate::layout::{AltBackground, AltKey, KeyDefinition};
    use crate::parse::parse_descriptor;
    use crate::source::SliceSource;
    use crate::trace::Tracer;

    fn key_at(y: i32) -> KeyDefinition {
        KeyDefinition {
            code: 1,
            shifted_code: 1,
            sensitive: Rect::new(0, y, 10, 10),
            display: Rect::new(0, y, 10, 10),
            source: Point::new(0, y),
        }
    }

    /// A 2x22 skin at scale 2, display at y=40, with keys above and below.
    fn sample() -> SkinLayout {
        let mut layout = SkinLayout::default();
        layout.skin = Rect::new(0, 0, 300, 400);
        layout.display.origin = Point::new(20, 40);
        layout.display.scale_x = 2.0;
        layout.display.scale_y = 2.0;
        layout.keys = vec![key_at(10), key_at(40), key_at(200)];
        layout.annunciators[0].display = Rect::new(20, 30, 10, 5);
        layout.annunciators[0].source = Point::new(400, 500);
        layout.alt_backgrounds = vec![AltBackground {
            mode: 1,
            source: Rect::new(300, 300, 10, 10),
            dest: Point::new(5, 5),
        }];
        layout.alt_keys = vec![AltKey {
            mode: 1,
            code: 1,
            source: Point::new(310, 300),
        }];
        layout
    }

    #[test]
    fn parsed_skin_at_native_size_is_unchanged() {
        let text = b"skin: 0,0,100,200\n\
            display: 10,10 1.0 1.0 000000 ffffff\n\
            key: 1 0,0,10,10 0,0,10,10 0,0\n\
            displaysize: 22,2\n";
        let mut layout = parse_descriptor(SliceSource::new(text), &NoKeymap, &mut Tracer::none());
        let before = layout.clone();
        let adj = adjust(&mut layout, Request::new(2, 22));
        assert_eq!(adj.extra, 0);
        assert_eq!((layout.skin.width, layout.skin.height), (100, 200));
        assert_eq!(layout.keys, before.keys, "no key moved");
        assert_eq!((layout.display.rows, layout.display.cols), (2, 22));
    }

    #[test]
    fn huge_coordinates_saturate_instead_of_overflowing() {
        let mut layout = sample();
        layout.keys.push(key_at(i32::MAX - 8));
        layout.skin.height = i32::MAX - 4;
        let adj = adjust(&mut layout, Request::new(4, 22));
        assert_eq!(adj.extra, 32);
        assert_eq!(layout.skin.height, i32::MAX);
        assert_eq!(layout.keys[3].sensitive.y, i32::MAX);
        assert_eq!(layout.keys[2].sensitive.y, 232, "ordinary keys still move");
    }

    #[test]
    fn native_request_is_identity() {
        let mut layout = sample();
        let before = layout.clone();
        let adj = adjust(&mut layout, Request::new(2, 22));
        assert_eq!(adj.extra, 0);
        assert_eq!(adj.wasted, 0);
        assert_eq!(layout.keys, before.keys);
        assert_eq!(layout.skin, before.skin);
        assert!(layout.display.scale_is_integral, "scale stays 2.0");
        assert_eq!(
            adjust(&mut sample(), Request::NATIVE),
            adj,
            "non-positive request means native"
        );
    }

    #[test]
    fn more_rows_shift_only_below_zone_start() {
        let mut layout = sample();
        let before = layout.clone();
        let adj = adjust(&mut layout, Request::new(4, 22));
        // 4 rows * 2.0 * 8 - 2.0 * 2 * 8
        assert_eq!(adj.extra, 32);
        assert_eq!(adj.zone, ExpansionZone { first_y: 40, last_y: 72 });
        assert_eq!(layout.skin.height, before.skin.height + 32);
        assert_eq!(layout.keys[0], before.keys[0], "above the zone");
        assert_eq!(layout.keys[1], before.keys[1], "at the zone start");
        assert_eq!(layout.keys[2].sensitive.y, 232);
        assert_eq!(layout.keys[2].display.y, 232);
        assert_eq!(layout.keys[2].source.y, 232);
        assert_eq!(layout.annunciators[0].display.y, 30);
        assert_eq!(layout.annunciators[0].source.y, 532);
        assert_eq!(layout.alt_backgrounds[0].source.y, 332);
        assert_eq!(layout.alt_backgrounds[0].dest.y, 5);
        assert_eq!(layout.alt_keys[0].source.y, 332);
        assert_eq!((layout.display.rows, layout.display.cols), (4, 22));
    }

    #[test]
    fn configured_zone_is_kept() {
        let mut layout = sample();
        layout.display.zone = ExpansionZone { first_y: 100, last_y: 120 };
        let adj = adjust(&mut layout, Request::new(3, 22));
        assert_eq!(adj.zone, ExpansionZone { first_y: 100, last_y: 120 });
        assert_eq!(layout.keys[1].sensitive.y, 40);
        assert_eq!(layout.keys[2].sensitive.y, 200 + adj.extra);
    }

    #[test]
    fn more_columns_shrink_scale_and_waste_space() {
        let mut layout = sample();
        let adj = adjust(&mut layout, Request::new(2, 44));
        assert_eq!(layout.display.scale_x, 1.0);
        assert_eq!(layout.display.scale_y, 1.0);
        // 2 * 1.0 * 8 - 32
        assert_eq!(adj.wasted, 16);
        assert_eq!(adj.extra, 0);
        assert_eq!(layout.keys[2].sensitive.y, 200);
    }

    #[test]
    fn fractional_scale_is_flagged() {
        let mut layout = sample();
        adjust(&mut layout, Request::new(2, 33));
        assert!(!layout.display.scale_is_integral, "2 * 22 / 33 is not whole");
    }

    #[test]
    fn alternate_origin_applies_above_two_rows() {
        let mut layout = sample();
        layout.display.alt_origin_y = Some(25);
        layout.display.scale_x = 1.0;
        layout.display.alt_pixel_height = Some(1);
        // available = 2.0 * 2 * 8 = 32, needed = 3 * 1 * 8 = 24
        let adj = adjust(&mut layout, Request::new(3, 22));
        assert_eq!(adj.wasted, 8);
        assert_eq!(layout.display.origin.y, 33);

        let mut layout = sample();
        layout.display.alt_origin_y = Some(25);
        adjust(&mut layout, Request::new(2, 22));
        assert_eq!(layout.display.origin.y, 40, "two rows keep the main origin");
    }

    #[test]
    fn max_rows_clamps_request() {
        let mut layout = sample();
        // Up to 6 rows at the horizontal scale: max_h = 12, r2 = 2.0.
        layout.display.max_rows = Some(6);
        let adj = adjust(&mut layout, Request::new(10, 22));
        assert_eq!(layout.display.rows, 6);
        assert_eq!(adj.extra, 6 * 2 * 8 - 32);
    }

    #[test]
    fn max_rows_of_two_uses_vertical_scale() {
        let mut layout = sample();
        layout.display.scale_y = 3.0;
        layout.display.max_rows = Some(2);
        // max_h = 2 * 3.0 = 6, r2 = scale_x = 2.0, so at most 3 rows.
        adjust(&mut layout, Request::new(8, 22));
        assert_eq!(layout.display.rows, 3);
    }
}
