// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The parsed and adjusted skin layout.
//!
//! A [`SkinLayout`] is produced by [`parse`](crate::parse) plus
//! [`adjust`](crate::adjust) and is never edited record by record afterwards:
//! a reload builds a brand new value and swaps it in whole.
//!
//! Ordering in the growable tables is observable:
//!
//! - [`keys`](SkinLayout::keys): index is the stable key handle.
//! - [`macros`](SkinLayout::macros): index 0 is the most recently parsed
//!   definition, so earlier definitions of a code are shadowed.
//! - [`keymap`](SkinLayout::keymap), [`alt_backgrounds`](SkinLayout::alt_backgrounds),
//!   [`alt_keys`](SkinLayout::alt_keys): parse order.

use alloc::vec::Vec;

use crate::geom::{Point, Rect};
use crate::raster::Rgb;

/// Number of annunciator slots. Slots are addressed `1..=7` by callers.
pub const ANNUNCIATOR_COUNT: usize = 7;

/// Longest payload a macro definition can carry.
pub const MAX_MACRO_LENGTH: usize = 63;

/// Dot columns per character cell, including the one-dot gap.
pub const DOTS_PER_CHAR: i32 = 6;

/// Dot rows per character row.
pub const DOTS_PER_ROW: i32 = 8;

/// One physical key on the faceplate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyDefinition {
    /// Key code reported when computed shift is off.
    pub code: i32,
    /// Key code reported when computed shift is on.
    pub shifted_code: i32,
    /// Hit-test region.
    pub sensitive: Rect,
    /// Region redrawn when the key changes state.
    pub display: Rect,
    /// Top-left of the pressed-key art in the skin bitmap.
    pub source: Point,
}

/// An annunciator icon slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Annunciator {
    /// Where the icon is drawn.
    pub display: Rect,
    /// Top-left of the lit icon art in the skin bitmap.
    pub source: Point,
}

/// Payload of a [`MacroDefinition`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MacroPayload {
    /// Opaque program name, at most [`MAX_MACRO_LENGTH`] bytes.
    Name(Vec<u8>),
    /// Key-table codes in `1..=37`, at most [`MAX_MACRO_LENGTH`] steps.
    Keys(Vec<u8>),
}

impl MacroPayload {
    /// Whether this payload names a program rather than listing keystrokes.
    #[inline]
    #[must_use]
    pub fn is_name(&self) -> bool {
        matches!(self, Self::Name(_))
    }

    /// The raw payload bytes.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Name(b) | Self::Keys(b) => b,
        }
    }
}

/// A canned macro bound to a trigger code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroDefinition {
    /// Trigger code in `38..=255`.
    pub code: i32,
    /// What the macro expands to.
    pub payload: MacroPayload,
}

/// Keyboard modifier state as seen by keymap entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control held.
    pub ctrl: bool,
    /// Alt held.
    pub alt: bool,
    /// Physical shift held.
    pub shift: bool,
    /// Calculator-side computed shift.
    pub cshift: bool,
}

/// A raw keyboard binding from a `gtkkey:` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeymapEntry {
    /// Platform key value.
    pub keyval: u32,
    /// Modifiers the binding requires.
    pub modifiers: Modifiers,
    /// Key codes sent when the binding fires.
    pub payload: Vec<u8>,
}

/// Alternate background art shown while a skin mode is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AltBackground {
    /// Skin mode this overlay belongs to.
    pub mode: i32,
    /// Region of the skin bitmap to copy.
    pub source: Rect,
    /// Where the copied region lands.
    pub dest: Point,
}

impl AltBackground {
    /// The destination rectangle: `dest` with the size of `source`.
    #[inline]
    #[must_use]
    pub fn dest_rect(&self) -> Rect {
        self.source.with_origin(self.dest)
    }
}

/// Alternate pressed-key art shown while a skin mode is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AltKey {
    /// Skin mode this overlay belongs to.
    pub mode: i32,
    /// Unshifted code of the key this art replaces.
    pub code: i32,
    /// Top-left of the alternate art in the skin bitmap.
    pub source: Point,
}

/// The vertical band that is duplicated when the display grows.
///
/// A zone of `(0, 0)` means "not configured".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpansionZone {
    /// First row of the zone. Coordinates strictly below this row move.
    pub first_y: i32,
    /// End row of the zone.
    pub last_y: i32,
}

impl ExpansionZone {
    /// Whether the descriptor configured a zone.
    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.first_y != 0 || self.last_y != 0
    }
}

/// Placement and appearance of the dot-matrix display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayGeometry {
    /// Top-left of the display in skin pixels.
    pub origin: Point,
    /// Horizontal pixels per dot.
    pub scale_x: f64,
    /// Vertical pixels per dot.
    pub scale_y: f64,
    /// Both scale factors are whole numbers.
    pub scale_is_integral: bool,
    /// Unlit dot color.
    pub background: Rgb,
    /// Lit dot color.
    pub foreground: Rgb,
    /// Character rows currently laid out.
    pub rows: i32,
    /// Character columns currently laid out.
    pub cols: i32,
    /// Character rows the skin art was authored for.
    pub native_rows: i32,
    /// Character columns the skin art was authored for.
    pub native_cols: i32,
    /// Display origin Y used when more than two rows are shown.
    pub alt_origin_y: Option<i32>,
    /// Per-dot pixel height override for layouts other than two rows.
    pub alt_pixel_height: Option<i32>,
    /// Upper bound on displayed rows, in units of the native row height.
    pub max_rows: Option<i32>,
    /// Band duplicated when the display grows.
    pub zone: ExpansionZone,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            scale_x: 1.0,
            scale_y: 1.0,
            scale_is_integral: true,
            background: Rgb::BLACK,
            foreground: Rgb::WHITE,
            rows: 2,
            cols: 22,
            native_rows: 2,
            native_cols: 22,
            alt_origin_y: None,
            alt_pixel_height: None,
            max_rows: None,
            zone: ExpansionZone::default(),
        }
    }
}

impl DisplayGeometry {
    /// Display width in dots. The last character has no trailing gap.
    #[inline]
    #[must_use]
    pub fn dot_width(&self) -> i32 {
        self.cols.saturating_mul(DOTS_PER_CHAR).saturating_sub(1)
    }

    /// Display height in dots.
    #[inline]
    #[must_use]
    pub fn dot_height(&self) -> i32 {
        self.rows.saturating_mul(DOTS_PER_ROW)
    }

    /// Maps a rectangle in dot coordinates to surface pixels.
    #[must_use]
    pub fn dots_to_pixels(&self, x: i32, y: i32, width: i32, height: i32) -> kurbo::Rect {
        let x0 = f64::from(self.origin.x) + f64::from(x) * self.scale_x;
        let y0 = f64::from(self.origin.y) + f64::from(y) * self.scale_y;
        kurbo::Rect::new(
            x0,
            y0,
            x0 + f64::from(width) * self.scale_x,
            y0 + f64::from(height) * self.scale_y,
        )
    }

    /// The lit area of the display in surface pixels.
    #[must_use]
    pub fn pixel_area(&self) -> kurbo::Rect {
        self.dots_to_pixels(0, 0, self.dot_width(), self.dot_height())
    }
}

/// Everything a skin descriptor describes, after geometry adjustment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkinLayout {
    /// Bounding rectangle of the faceplate within the skin bitmap.
    pub skin: Rect,
    /// Dot-matrix display placement.
    pub display: DisplayGeometry,
    /// Key table; the index is the key handle.
    pub keys: Vec<KeyDefinition>,
    /// Annunciator slots `1..=7`, stored at `0..7`.
    pub annunciators: [Annunciator; ANNUNCIATOR_COUNT],
    /// Macros, most recently parsed first.
    pub macros: Vec<MacroDefinition>,
    /// Keyboard bindings in parse order.
    pub keymap: Vec<KeymapEntry>,
    /// Alternate backgrounds in parse order.
    pub alt_backgrounds: Vec<AltBackground>,
    /// Alternate pressed-key art in parse order.
    pub alt_keys: Vec<AltKey>,
    /// Opaque flags handed to the engine.
    pub flags: i32,
}

impl SkinLayout {
    /// Returns the annunciator in slot `which` (`1..=7`).
    #[must_use]
    pub fn annunciator(&self, which: usize) -> Option<&Annunciator> {
        which
            .checked_sub(1)
            .and_then(|slot| self.annunciators.get(slot))
    }
}
