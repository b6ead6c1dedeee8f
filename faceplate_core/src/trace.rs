// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for skin loading.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! loader calls as it works. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Ignored descriptor lines are reported here and nowhere else; users never
//! see them.

use crate::parse::RecordKind;
use crate::source::AssetKind;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// A descriptor line was dropped.
#[derive(Clone, Copy, Debug)]
pub struct LineIgnored {
    /// 1-based line number.
    pub line: usize,
    /// Record kind, or `None` for an unrecognized label.
    pub kind: Option<RecordKind>,
}

/// An asset was not found anywhere in the search order.
#[derive(Clone, Copy, Debug)]
pub struct OpenFailed<'a> {
    /// Skin name.
    pub name: &'a str,
    /// Which asset.
    pub asset: AssetKind,
}

/// The loader gave up on a skin and switched to the built-in default.
#[derive(Clone, Copy, Debug)]
pub struct FallbackEvent<'a> {
    /// Skin that failed.
    pub from: &'a str,
    /// Built-in skin being tried instead.
    pub to: &'a str,
}

/// Result of geometry adjustment.
#[derive(Clone, Copy, Debug)]
pub struct AdjustEvent {
    /// Pixels inserted below the expansion zone start.
    pub extra: i32,
    /// Pixels left unused when the display shrank.
    pub wasted: i32,
    /// Rows laid out.
    pub rows: i32,
    /// Columns laid out.
    pub cols: i32,
}

/// A skin finished loading.
#[derive(Clone, Copy, Debug)]
pub struct LoadedEvent<'a> {
    /// Skin name actually loaded.
    pub name: &'a str,
    /// Faceplate width.
    pub width: i32,
    /// Faceplate height.
    pub height: i32,
    /// Rows laid out.
    pub rows: i32,
    /// Columns laid out.
    pub cols: i32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives diagnostic events from skin loading.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a descriptor line is dropped.
    fn on_line_ignored(&mut self, e: &LineIgnored) {
        _ = e;
    }

    /// Called when an asset cannot be opened.
    fn on_open_failed(&mut self, e: &OpenFailed<'_>) {
        _ = e;
    }

    /// Called when the loader falls back to the built-in default.
    fn on_fallback(&mut self, e: &FallbackEvent<'_>) {
        _ = e;
    }

    /// Called after geometry adjustment.
    fn on_adjusted(&mut self, e: &AdjustEvent) {
        _ = e;
    }

    /// Called after a skin loads.
    fn on_loaded(&mut self, e: &LoadedEvent<'_>) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LineIgnored`].
    #[inline]
    pub fn line_ignored(&mut self, e: &LineIgnored) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_line_ignored(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OpenFailed`].
    #[inline]
    pub fn open_failed(&mut self, e: &OpenFailed<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_open_failed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FallbackEvent`].
    #[inline]
    pub fn fallback(&mut self, e: &FallbackEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_fallback(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AdjustEvent`].
    #[inline]
    pub fn adjusted(&mut self, e: &AdjustEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_adjusted(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LoadedEvent`].
    #[inline]
    pub fn loaded(&mut self, e: &LoadedEvent<'_>) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_loaded(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

#[cfg(all(test, feature = "trace"))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        ignored: usize,
        fallbacks: usize,
    }

    impl TraceSink for Counter {
        fn on_line_ignored(&mut self, _: &LineIgnored) {
            self.ignored += 1;
        }

        fn on_fallback(&mut self, _: &FallbackEvent<'_>) {
            self.fallbacks += 1;
        }
    }

    #[test]
    fn tracer_dispatches_to_sink() {
        let mut sink = Counter::default();
        {
            let mut t = Tracer::new(&mut sink);
            t.line_ignored(&LineIgnored {
                line: 3,
                kind: None,
            });
            t.fallback(&FallbackEvent {
                from: "A",
                to: "B",
            });
            t.adjusted(&AdjustEvent {
                extra: 0,
                wasted: 0,
                rows: 2,
                cols: 22,
            });
        }
        assert_eq!(sink.ignored, 1);
        assert_eq!(sink.fallbacks, 1);
    }

    #[test]
    fn none_tracer_is_silent() {
        let mut t = Tracer::none();
        t.line_ignored(&LineIgnored {
            line: 1,
            kind: None,
        });
    }
}
