// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading skins and holding the active one.
//!
//! A load is a small state machine:
//!
//! ```text
//!   attempt(name) ──ok──► LoadedSkin
//!        │
//!      failed (or name empty)
//!        ▼
//!   attempt(default, built-in only) ──ok──► LoadedSkin
//!        │
//!      failed
//!        ▼
//!     LoadError
//! ```
//!
//! An attempt fails only when an asset cannot be opened or the bitmap cannot
//! be decoded; bad descriptor lines are skipped. [`ActiveSkin`] swaps in a
//! new [`LoadedSkin`] only after the whole load succeeded, so a failed
//! reload leaves the previous skin in place.

use alloc::string::{String, ToString};

use crate::adjust::{Adjustment, Request, adjust};
use crate::compose::Compositor;
use crate::display::DisplayBuffer;
use crate::error::{LoadError, LoadFailure};
use crate::keymap::KeymapParser;
use crate::layout::SkinLayout;
use crate::parse::parse_descriptor;
use crate::raster::{ImageBuilder, Raster};
use crate::source::{AssetKind, ImageDecoder, SkinStore};
use crate::trace::{AdjustEvent, FallbackEvent, LoadedEvent, OpenFailed, Tracer};

/// What the host needs to size its window after a load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkinMetrics {
    /// Faceplate width in pixels.
    pub width: i32,
    /// Faceplate height in pixels, including any inserted rows.
    pub height: i32,
    /// Display rows after adjustment.
    pub rows: i32,
    /// Display columns after adjustment.
    pub cols: i32,
    /// The descriptor's `flags:` value.
    pub flags: i32,
}

/// A fully loaded skin.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedSkin {
    /// Name of the skin that was actually loaded.
    pub name: String,
    /// Whether the built-in default was loaded in place of the request.
    pub is_fallback: bool,
    /// Adjusted layout.
    pub layout: SkinLayout,
    /// Decoded bitmap, expanded to match the layout.
    pub raster: Raster,
    /// What the geometry adjuster did.
    pub adjustment: Adjustment,
}

impl LoadedSkin {
    /// Window metrics for this skin.
    #[must_use]
    pub fn metrics(&self) -> SkinMetrics {
        let l = &self.layout;
        SkinMetrics {
            width: l.skin.width,
            height: l.skin.height,
            rows: l.display.rows,
            cols: l.display.cols,
            flags: l.flags,
        }
    }
}

/// Loads skins from a store, with fallback to the built-in default.
pub struct SkinLoader<'a> {
    store: &'a mut dyn SkinStore,
    decoder: &'a mut dyn ImageDecoder,
    keymap: &'a dyn KeymapParser,
}

impl core::fmt::Debug for SkinLoader<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SkinLoader").finish_non_exhaustive()
    }
}

impl<'a> SkinLoader<'a> {
    /// Creates a loader over the given collaborators.
    pub fn new(
        store: &'a mut dyn SkinStore,
        decoder: &'a mut dyn ImageDecoder,
        keymap: &'a dyn KeymapParser,
    ) -> Self {
        Self {
            store,
            decoder,
            keymap,
        }
    }

    /// Loads `name` for `request`, falling back to the built-in default.
    ///
    /// An empty name goes straight to the default.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when the default fails as well, or when there is
    /// no default to fall back on.
    pub fn load(
        &mut self,
        name: &str,
        request: Request,
        tracer: &mut Tracer<'_>,
    ) -> Result<LoadedSkin, LoadError> {
        let mut cause = LoadFailure::NoDefaultSkin;
        if !name.is_empty() {
            match self.attempt(name, request, false, tracer) {
                Ok(skin) => return Ok(skin),
                Err(e) => cause = e,
            }
        }
        let Some(fallback) = self.store.default_skin().map(ToString::to_string) else {
            return Err(LoadError {
                requested: name.to_string(),
                fallback: None,
                cause,
            });
        };
        tracer.fallback(&FallbackEvent {
            from: name,
            to: &fallback,
        });
        match self.attempt(&fallback, request, true, tracer) {
            Ok(mut skin) => {
                skin.is_fallback = !name.is_empty();
                Ok(skin)
            }
            Err(cause) => Err(LoadError {
                requested: name.to_string(),
                fallback: Some(fallback),
                cause,
            }),
        }
    }

    fn attempt(
        &mut self,
        name: &str,
        request: Request,
        builtin_only: bool,
        tracer: &mut Tracer<'_>,
    ) -> Result<LoadedSkin, LoadFailure> {
        let mut layout = {
            let Some(source) = self.store.open(name, AssetKind::Layout, builtin_only) else {
                tracer.open_failed(&OpenFailed {
                    name,
                    asset: AssetKind::Layout,
                });
                return Err(LoadFailure::NotFound(AssetKind::Layout));
            };
            parse_descriptor(source, self.keymap, tracer)
        };

        let adjustment = adjust(&mut layout, request);
        tracer.adjusted(&AdjustEvent {
            extra: adjustment.extra,
            wasted: adjustment.wasted,
            rows: layout.display.rows,
            cols: layout.display.cols,
        });

        let Some(mut source) = self.store.open(name, AssetKind::Bitmap, builtin_only) else {
            tracer.open_failed(&OpenFailed {
                name,
                asset: AssetKind::Bitmap,
            });
            return Err(LoadFailure::NotFound(AssetKind::Bitmap));
        };
        let mut builder = ImageBuilder::new(adjustment.expansion());
        self.decoder
            .decode(&mut source, &mut builder)
            .map_err(LoadFailure::Decode)?;
        let raster = builder.into_raster().ok_or(LoadFailure::IncompleteImage)?;

        tracer.loaded(&LoadedEvent {
            name,
            width: layout.skin.width,
            height: layout.skin.height,
            rows: layout.display.rows,
            cols: layout.display.cols,
        });
        Ok(LoadedSkin {
            name: name.to_string(),
            is_fallback: false,
            layout,
            raster,
            adjustment,
        })
    }
}

/// The skin currently on screen, with its display contents and switches.
#[derive(Clone, Debug)]
pub struct ActiveSkin {
    skin: LoadedSkin,
    request: Request,
    display: DisplayBuffer,
    mode: i32,
    display_enabled: bool,
}

impl ActiveSkin {
    /// Loads the first skin.
    ///
    /// # Errors
    ///
    /// See [`SkinLoader::load`].
    pub fn load(
        loader: &mut SkinLoader<'_>,
        name: &str,
        request: Request,
        tracer: &mut Tracer<'_>,
    ) -> Result<Self, LoadError> {
        let skin = loader.load(name, request, tracer)?;
        let display = DisplayBuffer::for_display(&skin.layout.display);
        Ok(Self {
            skin,
            request,
            display,
            mode: 0,
            display_enabled: true,
        })
    }

    /// Replaces the active skin.
    ///
    /// With `request` of `None` the last explicit request is reused. On
    /// success the display buffer is rebuilt cleared at the new size; the
    /// skin mode and the display switch carry over. On failure nothing
    /// changes.
    ///
    /// # Errors
    ///
    /// See [`SkinLoader::load`].
    pub fn reload(
        &mut self,
        loader: &mut SkinLoader<'_>,
        name: &str,
        request: Option<Request>,
        tracer: &mut Tracer<'_>,
    ) -> Result<SkinMetrics, LoadError> {
        let request = request.unwrap_or(self.request);
        let skin = loader.load(name, request, tracer)?;
        self.display = DisplayBuffer::for_display(&skin.layout.display);
        self.skin = skin;
        self.request = request;
        Ok(self.metrics())
    }

    /// Window metrics for the active skin.
    #[must_use]
    pub fn metrics(&self) -> SkinMetrics {
        self.skin.metrics()
    }

    /// The loaded skin.
    #[must_use]
    pub fn skin(&self) -> &LoadedSkin {
        &self.skin
    }

    /// The adjusted layout.
    #[must_use]
    pub fn layout(&self) -> &SkinLayout {
        &self.skin.layout
    }

    /// The last explicit size request.
    #[must_use]
    pub fn request(&self) -> Request {
        self.request
    }

    /// Current display contents.
    #[must_use]
    pub fn display(&self) -> &DisplayBuffer {
        &self.display
    }

    /// Current skin mode.
    #[must_use]
    pub fn mode(&self) -> i32 {
        self.mode
    }

    /// Selects the skin mode. Returns whether it changed, in which case the
    /// whole faceplate needs repainting.
    pub fn set_mode(&mut self, mode: i32) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Whether the display is painted.
    #[must_use]
    pub fn display_enabled(&self) -> bool {
        self.display_enabled
    }

    /// Turns display painting and invalidation on or off.
    pub fn set_display_enabled(&mut self, enabled: bool) {
        self.display_enabled = enabled;
    }

    /// Copies an engine update into the display buffer and returns the
    /// region to repaint.
    ///
    /// See [`DisplayBuffer::set_bits`] and [`Compositor::bits_damage`].
    pub fn update_display_bits(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        bits: &[u8],
        bytes_per_line: usize,
        window_attached: bool,
    ) -> Option<kurbo::Rect> {
        self.display
            .set_bits(x, y, width, height, bits, bytes_per_line);
        self.compositor()
            .bits_damage(x, y, width, height, window_attached)
    }

    /// A compositor for the current state.
    #[must_use]
    pub fn compositor(&self) -> Compositor<'_> {
        Compositor::new(&self.skin.layout, &self.skin.raster, &self.display)
            .with_mode(self.mode)
            .with_display_enabled(self.display_enabled)
    }
}
