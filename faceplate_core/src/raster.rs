// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The decoded skin bitmap and the row-push protocol that fills it.
//!
//! Container formats are decoded elsewhere. A decoder drives an
//! [`ImageSink`] through exactly one `begin_image`, `height` calls to
//! `push_row`, and one `end_image`; [`ImageBuilder`] is the sink that turns
//! those scanlines into an RGB [`Raster`].
//!
//! When the geometry adjuster grew the skin, the builder also opens up the
//! extra rows right below the expansion zone start and fills them by
//! repeating the zone's rows, so the bitmap matches the shifted layout.

use alloc::vec;
use alloc::vec::Vec;

use bytemuck::{Pod, Zeroable};

use crate::layout::ExpansionZone;

/// An 8-bit-per-channel RGB color.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Creates a color from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Splits a packed `0xRRGGBB` value. Bits above 24 are ignored.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "each channel is one byte of the packed value"
    )]
    pub const fn from_packed(v: u32) -> Self {
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Returns the same color as a gray level.
    #[inline]
    #[must_use]
    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }
}

/// How a decoder's scanlines are encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelEncoding {
    /// One bit per pixel, least significant bit first; 0 is black, 1 white.
    Mono,
    /// One byte of gray level per pixel.
    Gray,
    /// One palette index per pixel.
    Indexed,
    /// Three bytes (R, G, B) per pixel.
    TrueColor,
}

/// A decoded RGB image, row-major with no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl core::fmt::Debug for Raster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Raster {
    /// Creates a black raster.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the raster.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Returns one row of pixels.
    #[must_use]
    pub fn row(&self, y: u32) -> &[Rgb] {
        let w = self.width as usize;
        let start = y as usize * w;
        self.pixels.get(start..start + w).unwrap_or(&[])
    }

    /// Returns one row of pixels, mutably.
    pub fn row_mut(&mut self, y: u32) -> &mut [Rgb] {
        let w = self.width as usize;
        let start = y as usize * w;
        self.pixels.get_mut(start..start + w).unwrap_or(&mut [])
    }

    /// The pixels as packed RGB bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn copy_row(&mut self, from: u32, to: u32) {
        let w = self.width as usize;
        let src = from as usize * w;
        self.pixels.copy_within(src..src + w, to as usize * w);
    }
}

/// Receives decoded scanlines from an image decoder.
pub trait ImageSink {
    /// Starts a new image. `palette` is only consulted for
    /// [`PixelEncoding::Indexed`].
    fn begin_image(
        &mut self,
        encoding: PixelEncoding,
        palette: Option<&[Rgb]>,
        width: u32,
        height: u32,
    );

    /// Delivers the next scanline, top to bottom.
    fn push_row(&mut self, row: &[u8]);

    /// Marks the image complete.
    fn end_image(&mut self);
}

/// Rows to insert into the bitmap below the expansion zone start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Number of rows to insert. Zero leaves the bitmap as decoded.
    pub extra: i32,
    /// Band whose rows are repeated into the inserted space.
    pub zone: ExpansionZone,
}

impl Expansion {
    /// No expansion.
    pub const NONE: Self = Self {
        extra: 0,
        zone: ExpansionZone {
            first_y: 0,
            last_y: 0,
        },
    };

    fn extra_rows(&self) -> u32 {
        u32::try_from(self.extra).unwrap_or(0)
    }

    /// Where source row `y` lands in the expanded bitmap.
    fn target_row(&self, y: u32) -> i64 {
        let y = i64::from(y);
        if self.extra > 0 && y > i64::from(self.zone.first_y) {
            y + i64::from(self.extra)
        } else {
            y
        }
    }
}

#[derive(Debug)]
struct Ingest {
    raster: Raster,
    encoding: PixelEncoding,
    palette: Vec<Rgb>,
    source_height: u32,
    cursor: u32,
}

#[derive(Debug, Default)]
enum BuildState {
    #[default]
    Idle,
    Receiving(Ingest),
    Ready(Raster),
}

/// An [`ImageSink`] that builds a [`Raster`].
#[derive(Debug, Default)]
pub struct ImageBuilder {
    expansion: Expansion,
    state: BuildState,
}

impl ImageBuilder {
    /// Creates a builder that inserts rows per `expansion`.
    #[must_use]
    pub fn new(expansion: Expansion) -> Self {
        Self {
            expansion,
            state: BuildState::Idle,
        }
    }

    /// Whether `end_image` has been called.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, BuildState::Ready(_))
    }

    /// Returns the finished raster, or `None` if the protocol did not complete.
    #[must_use]
    pub fn into_raster(self) -> Option<Raster> {
        match self.state {
            BuildState::Ready(r) => Some(r),
            _ => None,
        }
    }

    /// Convenience driver for decoders that hand over all rows at once.
    pub fn ingest<'r, I>(
        &mut self,
        encoding: PixelEncoding,
        palette: Option<&[Rgb]>,
        width: u32,
        height: u32,
        rows: I,
    ) where
        I: IntoIterator<Item = &'r [u8]>,
    {
        self.begin_image(encoding, palette, width, height);
        for row in rows.into_iter().take(height as usize) {
            self.push_row(row);
        }
        self.end_image();
    }

    fn fill_inserted_band(&self, raster: &mut Raster, source_height: u32) {
        let extra = self.expansion.extra_rows();
        if extra == 0 || source_height == 0 {
            return;
        }
        let zone = self.expansion.zone;
        let first = zone.first_y.clamp(0, source_height as i32 - 1) as u32;
        let last = zone.last_y.clamp(first as i32 + 1, source_height as i32) as u32;
        let zone_len = last - first;
        let band_start = i64::from(zone.first_y) + 1;
        for i in 0..extra {
            let to = band_start + i64::from(i);
            let Ok(to) = u32::try_from(to) else {
                continue;
            };
            if to >= raster.height() {
                break;
            }
            let from = self.expansion.target_row(first + i % zone_len);
            if let Ok(from) = u32::try_from(from) {
                if from < raster.height() && from != to {
                    raster.copy_row(from, to);
                }
            }
        }
    }
}

impl ImageSink for ImageBuilder {
    fn begin_image(
        &mut self,
        encoding: PixelEncoding,
        palette: Option<&[Rgb]>,
        width: u32,
        height: u32,
    ) {
        let total = height.saturating_add(self.expansion.extra_rows());
        self.state = BuildState::Receiving(Ingest {
            raster: Raster::new(width, total),
            encoding,
            palette: palette.map(<[Rgb]>::to_vec).unwrap_or_default(),
            source_height: height,
            cursor: 0,
        });
    }

    fn push_row(&mut self, data: &[u8]) {
        let BuildState::Receiving(ingest) = &mut self.state else {
            return;
        };
        if ingest.cursor >= ingest.source_height {
            return;
        }
        let target = self.expansion.target_row(ingest.cursor);
        ingest.cursor += 1;
        let Ok(target) = u32::try_from(target) else {
            return;
        };
        if target >= ingest.raster.height() {
            return;
        }
        let encoding = ingest.encoding;
        let Ingest {
            raster, palette, ..
        } = ingest;
        convert_row(encoding, palette, data, raster.row_mut(target));
    }

    fn end_image(&mut self) {
        match core::mem::take(&mut self.state) {
            BuildState::Receiving(ingest) => {
                let mut raster = ingest.raster;
                self.fill_inserted_band(&mut raster, ingest.source_height);
                self.state = BuildState::Ready(raster);
            }
            other => self.state = other,
        }
    }
}

fn convert_row(encoding: PixelEncoding, palette: &[Rgb], data: &[u8], out: &mut [Rgb]) {
    match encoding {
        PixelEncoding::Mono => {
            for (x, px) in out.iter_mut().enumerate() {
                let lit = data.get(x >> 3).is_some_and(|b| b & (1 << (x & 7)) != 0);
                *px = if lit { Rgb::WHITE } else { Rgb::BLACK };
            }
        }
        PixelEncoding::Gray => {
            for (px, &c) in out.iter_mut().zip(data) {
                *px = Rgb::gray(c);
            }
        }
        PixelEncoding::Indexed => {
            for (px, &c) in out.iter_mut().zip(data) {
                *px = palette.get(usize::from(c)).copied().unwrap_or(Rgb::BLACK);
            }
        }
        PixelEncoding::TrueColor => {
            let n = out.len().min(data.len() / 3);
            out[..n].copy_from_slice(bytemuck::cast_slice(&data[..n * 3]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_rows(height: u8, width: usize) -> Vec<Vec<u8>> {
        (0..height).map(|y| vec![y; width]).collect()
    }

    #[test]
    fn mono_is_lsb_first() {
        let mut b = ImageBuilder::default();
        b.ingest(PixelEncoding::Mono, None, 10, 1, [&[0b0000_0101_u8, 0b10][..]]);
        let r = b.into_raster().expect("complete image");
        assert_eq!(r.pixel(0, 0), Some(Rgb::WHITE));
        assert_eq!(r.pixel(1, 0), Some(Rgb::BLACK));
        assert_eq!(r.pixel(2, 0), Some(Rgb::WHITE));
        assert_eq!(r.pixel(9, 0), Some(Rgb::WHITE));
        assert_eq!(r.pixel(8, 0), Some(Rgb::BLACK));
    }

    #[test]
    fn indexed_uses_palette() {
        let palette = [Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)];
        let mut b = ImageBuilder::default();
        b.ingest(PixelEncoding::Indexed, Some(&palette), 3, 1, [&[1_u8, 0, 7][..]]);
        let r = b.into_raster().expect("complete image");
        assert_eq!(r.pixel(0, 0), Some(Rgb::new(4, 5, 6)));
        assert_eq!(r.pixel(1, 0), Some(Rgb::new(1, 2, 3)));
        assert_eq!(r.pixel(2, 0), Some(Rgb::BLACK), "missing palette entry");
    }

    #[test]
    fn truecolor_and_gray() {
        let mut b = ImageBuilder::default();
        b.ingest(PixelEncoding::TrueColor, None, 2, 1, [&[9_u8, 8, 7, 6, 5, 4][..]]);
        let r = b.into_raster().expect("complete image");
        assert_eq!(r.as_bytes(), &[9, 8, 7, 6, 5, 4]);

        let mut b = ImageBuilder::default();
        b.ingest(PixelEncoding::Gray, None, 1, 1, [&[42_u8][..]]);
        assert_eq!(
            b.into_raster().and_then(|r| r.pixel(0, 0)),
            Some(Rgb::gray(42))
        );
    }

    #[test]
    fn incomplete_protocol_yields_nothing() {
        let mut b = ImageBuilder::default();
        b.begin_image(PixelEncoding::Gray, None, 1, 2);
        b.push_row(&[1]);
        assert!(!b.is_ready());
        assert!(b.into_raster().is_none(), "end_image was never called");
    }

    #[test]
    fn extra_rows_are_ignored() {
        let rows = gray_rows(4, 1);
        let mut b = ImageBuilder::default();
        b.begin_image(PixelEncoding::Gray, None, 1, 2);
        for row in &rows {
            b.push_row(row);
        }
        b.end_image();
        let r = b.into_raster().expect("complete image");
        assert_eq!(r.height(), 2);
        assert_eq!(r.pixel(0, 1), Some(Rgb::gray(1)));
    }

    #[test]
    fn expansion_inserts_band_below_zone_start() {
        let rows = gray_rows(6, 2);
        let mut b = ImageBuilder::new(Expansion {
            extra: 3,
            zone: ExpansionZone {
                first_y: 2,
                last_y: 4,
            },
        });
        b.ingest(PixelEncoding::Gray, None, 2, 6, rows.iter().map(Vec::as_slice));
        let r = b.into_raster().expect("complete image");
        assert_eq!(r.height(), 9);
        let levels: Vec<u8> = (0..9).map(|y| r.row(y)[0].r).collect();
        // Rows 0..=2 stay, 3..=5 repeat zone rows 2,3,2, then 3..=5 follow.
        assert_eq!(levels, [0, 1, 2, 2, 3, 2, 3, 4, 5]);
    }

    #[test]
    fn packed_color_split() {
        assert_eq!(Rgb::from_packed(0x12_34_56), Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(Rgb::from_packed(0xff_00_00_01), Rgb::new(0, 0, 1));
    }
}
