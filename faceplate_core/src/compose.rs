// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting a loaded skin and reporting what needs repainting.
//!
//! The host owns the drawable and implements [`Surface`]; a [`Compositor`]
//! issues blits from the skin [`Raster`] and solid fills into it. Surface
//! coordinates are faceplate coordinates: surface point `p` shows raster
//! pixel `p + skin.origin` in the base paint.
//!
//! The display, its annunciators and the soft keys are only painted while
//! the display is enabled. The matching damage queries return `None` in the
//! same state, and so does [`Compositor::key_damage`] for ordinary keys.

use crate::display::DisplayBuffer;
use crate::geom::{Point, Rect};
use crate::input::{KeyHandle, SOFT_KEY_COUNT, SOFT_KEY_ROWS};
use crate::layout::{AltBackground, SkinLayout};
use crate::raster::{Raster, Rgb};

/// A drawable the compositor paints into.
pub trait Surface {
    /// Copies pixels from `raster` into `dst`.
    ///
    /// Surface point `dst.origin()` receives raster pixel `src`; the rest of
    /// `dst` follows at the same offset. Raster pixels that do not exist
    /// leave the surface unchanged.
    fn blit(&mut self, raster: &Raster, src: Point, dst: Rect);

    /// Fills a rectangle, in surface pixels, with a solid color.
    fn fill(&mut self, rect: kurbo::Rect, color: Rgb);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn blit(&mut self, raster: &Raster, src: Point, dst: Rect) {
        (**self).blit(raster, src, dst);
    }

    fn fill(&mut self, rect: kurbo::Rect, color: Rgb) {
        (**self).fill(rect, color);
    }
}

/// Paints one loaded skin.
///
/// This is a borrowed view; the layout, bitmap and display buffer it reads
/// are owned by [`ActiveSkin`](crate::load::ActiveSkin).
#[derive(Clone, Copy, Debug)]
pub struct Compositor<'a> {
    layout: &'a SkinLayout,
    raster: &'a Raster,
    display: &'a DisplayBuffer,
    mode: i32,
    display_enabled: bool,
}

impl<'a> Compositor<'a> {
    /// Creates a compositor in mode 0 with the display enabled.
    #[must_use]
    pub fn new(layout: &'a SkinLayout, raster: &'a Raster, display: &'a DisplayBuffer) -> Self {
        Self {
            layout,
            raster,
            display,
            mode: 0,
            display_enabled: true,
        }
    }

    /// Selects the skin mode used for alternate art.
    #[must_use]
    pub fn with_mode(mut self, mode: i32) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables display painting.
    #[must_use]
    pub fn with_display_enabled(mut self, enabled: bool) -> Self {
        self.display_enabled = enabled;
        self
    }

    fn skin_origin(&self) -> Point {
        self.layout.skin.origin()
    }

    fn alt_backgrounds(&self) -> impl Iterator<Item = &'a AltBackground> + '_ {
        let mode = self.mode;
        self.layout
            .alt_backgrounds
            .iter()
            .filter(move |ab| mode != 0 && ab.mode == mode)
    }

    /// Paints the whole faceplate, then the alternate backgrounds of the
    /// current mode in list order.
    pub fn paint_base<S: Surface + ?Sized>(&self, surface: &mut S) {
        let skin = self.layout.skin;
        surface.blit(
            self.raster,
            skin.origin(),
            Rect::new(0, 0, skin.width, skin.height),
        );
        for ab in self.alt_backgrounds() {
            surface.blit(
                self.raster,
                ab.source.origin().offset(skin.origin()),
                ab.dest_rect(),
            );
        }
    }

    /// Paints a key in the pressed or released state.
    ///
    /// A pressed key shows its own art, or the alternate art the current mode
    /// defines for its code. A released key shows the faceplate, with the
    /// alternate background on top when one covers the key's corner.
    pub fn paint_key<S: Surface + ?Sized>(&self, surface: &mut S, handle: KeyHandle, pressed: bool) {
        let key = match handle {
            KeyHandle::None => return,
            KeyHandle::Soft(n) => return self.paint_soft_key(surface, n, pressed),
            KeyHandle::Key(i) => match self.layout.keys.get(i) {
                Some(k) => k,
                None => return,
            },
        };
        let skin = self.skin_origin();
        let disp = key.display;
        if pressed {
            let source = self
                .layout
                .alt_keys
                .iter()
                .find(|ak| self.mode != 0 && ak.mode == self.mode && ak.code == key.code)
                .map_or(key.source, |ak| ak.source);
            surface.blit(self.raster, source.offset(skin), disp);
        } else {
            surface.blit(self.raster, disp.origin().offset(skin), disp);
            for ab in self.alt_backgrounds() {
                if ab.dest_rect().contains(disp.origin()) {
                    let src = Point::new(
                        (disp.x - ab.dest.x).saturating_add(ab.source.x),
                        (disp.y - ab.dest.y).saturating_add(ab.source.y),
                    );
                    surface.blit(self.raster, src.offset(skin), disp);
                }
            }
        }
    }

    /// Dot rectangle of soft key `n`, or `None` if there is no such key.
    fn soft_key_dots(&self, n: u8) -> Option<Rect> {
        if !(1..=SOFT_KEY_COUNT).contains(&n) {
            return None;
        }
        let d = &self.layout.display;
        Some(Rect::new(
            (i32::from(n) - 1).saturating_mul(d.cols),
            d.dot_height().saturating_sub(SOFT_KEY_ROWS),
            d.cols.saturating_sub(1),
            SOFT_KEY_ROWS,
        ))
    }

    /// Draws a soft key as inverse video over the current display contents.
    fn paint_soft_key<S: Surface + ?Sized>(&self, surface: &mut S, n: u8, pressed: bool) {
        if !self.display_enabled {
            return;
        }
        let Some(r) = self.soft_key_dots(n) else {
            return;
        };
        let d = &self.layout.display;
        surface.fill(d.dots_to_pixels(r.x, r.y, r.width, r.height), d.background);
        for v in r.y..r.y.saturating_add(r.height) {
            for h in r.x..r.x.saturating_add(r.width) {
                if self.display.get(h, v) != pressed {
                    surface.fill(d.dots_to_pixels(h, v, 1, 1), d.foreground);
                }
            }
        }
    }

    /// Paints annunciator `which` (`1..=7`) in its lit state.
    pub fn paint_annunciator<S: Surface + ?Sized>(&self, surface: &mut S, which: usize) {
        if !self.display_enabled {
            return;
        }
        if let Some(ann) = self.layout.annunciator(which) {
            surface.blit(self.raster, ann.source.offset(self.skin_origin()), ann.display);
        }
    }

    /// Paints the display from the display buffer.
    ///
    /// The background covers a one-dot border around the lit area.
    pub fn paint_display<S: Surface + ?Sized>(&self, surface: &mut S) {
        if !self.display_enabled {
            return;
        }
        let d = &self.layout.display;
        let (w, h) = (self.display.width(), self.display.height());
        surface.fill(
            d.dots_to_pixels(-1, -1, w.saturating_add(2), h.saturating_add(2)),
            d.background,
        );
        for v in 0..h {
            for x in 0..w {
                if self.display.get(x, v) {
                    surface.fill(d.dots_to_pixels(x, v, 1, 1), d.foreground);
                }
            }
        }
    }

    /// Region to repaint after a key changes state.
    #[must_use]
    pub fn key_damage(&self, handle: KeyHandle) -> Option<kurbo::Rect> {
        if !self.display_enabled {
            return None;
        }
        match handle {
            KeyHandle::None => None,
            KeyHandle::Soft(n) => {
                let r = self.soft_key_dots(n)?;
                Some(
                    self.layout
                        .display
                        .dots_to_pixels(r.x, r.y, r.width, r.height),
                )
            }
            KeyHandle::Key(i) => self.layout.keys.get(i).map(|k| k.display.to_kurbo()),
        }
    }

    /// Region to repaint after an annunciator changes.
    #[must_use]
    pub fn annunciator_damage(&self, which: usize) -> Option<kurbo::Rect> {
        if !self.display_enabled {
            return None;
        }
        self.layout
            .annunciator(which)
            .map(|ann| ann.display.to_kurbo())
    }

    /// Region covering the whole display.
    #[must_use]
    pub fn display_damage(&self) -> Option<kurbo::Rect> {
        self.display_enabled
            .then(|| self.layout.display.pixel_area())
    }

    /// Region to repaint after the engine updated the dot rectangle
    /// `(x, y, width, height)`.
    ///
    /// Without an attached window there is no partial invalidation, so the
    /// whole display and a one-dot border around it are reported regardless
    /// of the enabled state.
    #[must_use]
    pub fn bits_damage(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        window_attached: bool,
    ) -> Option<kurbo::Rect> {
        let d = &self.layout.display;
        if !window_attached {
            let (w, h) = (self.display.width(), self.display.height());
            return Some(d.dots_to_pixels(-1, -1, w.saturating_add(2), h.saturating_add(2)));
        }
        self.display_enabled
            .then(|| d.dots_to_pixels(x, y, width, height))
    }
}
