// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dot-matrix display contents.

use alloc::vec;
use alloc::vec::Vec;

use crate::layout::{DOTS_PER_CHAR, DOTS_PER_ROW, DisplayGeometry};

/// A monochrome bitmap mirroring the calculator's display.
///
/// Bits are packed least significant bit first: dot `(x, y)` lives in byte
/// `y * bytes_per_line + x / 8` under mask `1 << (x % 8)`. This is the same
/// packing the engine uses for its updates, so regions can be copied across
/// directly.
#[derive(Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    width: i32,
    height: i32,
    bytes_per_line: usize,
    bits: Vec<u8>,
}

impl core::fmt::Debug for DisplayBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DisplayBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes_per_line", &self.bytes_per_line)
            .field("lit", &self.bits.iter().map(|b| b.count_ones()).sum::<u32>())
            .finish_non_exhaustive()
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::for_display(&DisplayGeometry::default())
    }
}

impl DisplayBuffer {
    /// Creates a cleared buffer for `rows` by `cols` characters.
    #[must_use]
    pub fn new(rows: i32, cols: i32) -> Self {
        let width = cols.saturating_mul(DOTS_PER_CHAR).saturating_sub(1).max(0);
        let height = rows.saturating_mul(DOTS_PER_ROW).max(0);
        let bytes_per_line = (width as usize).div_ceil(8);
        Self {
            width,
            height,
            bytes_per_line,
            bits: vec![0; bytes_per_line * height as usize],
        }
    }

    /// Creates a cleared buffer sized for `display`'s current rows and columns.
    #[must_use]
    pub fn for_display(display: &DisplayGeometry) -> Self {
        Self::new(display.rows, display.cols)
    }

    /// Width in dots.
    #[inline]
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in dots.
    #[inline]
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Stride of the packed bitmap.
    #[inline]
    #[must_use]
    pub fn bytes_per_line(&self) -> usize {
        self.bytes_per_line
    }

    /// The packed bitmap.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    fn index(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((y * self.bytes_per_line + (x >> 3), 1 << (x & 7)))
    }

    /// Whether dot `(x, y)` is lit. Dots outside the display are dark.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y)
            .is_some_and(|(i, mask)| self.bits[i] & mask != 0)
    }

    /// Lights or clears one dot. Dots outside the display are ignored.
    pub fn set(&mut self, x: i32, y: i32, on: bool) {
        if let Some((i, mask)) = self.index(x, y) {
            if on {
                self.bits[i] |= mask;
            } else {
                self.bits[i] &= !mask;
            }
        }
    }

    /// Clears every dot.
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// Copies the rectangle `(x, y, width, height)` out of an engine bitmap.
    ///
    /// `bits` uses the same packing as this buffer with its own stride, and is
    /// addressed with the same coordinates: dot `(h, v)` of the region is
    /// read from `bits[v * bytes_per_line + h / 8]`. Bytes missing from
    /// `bits` read as dark.
    pub fn set_bits(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bits: &[u8],
        bytes_per_line: usize,
    ) {
        for v in y.max(0)..y.saturating_add(height).min(self.height) {
            for h in x.max(0)..x.saturating_add(width).min(self.width) {
                let (vu, hu) = (v as usize, h as usize);
                let on = bits
                    .get(vu * bytes_per_line + (hu >> 3))
                    .is_some_and(|b| b & (1 << (hu & 7)) != 0);
                self.set(h, v, on);
            }
        }
    }
}
