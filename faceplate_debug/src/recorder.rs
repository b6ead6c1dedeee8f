// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory recording of load events and paint operations.
//!
//! [`EventRecorder`] implements [`TraceSink`] and stores owned copies of
//! every event, so they can be inspected after the borrowed originals are
//! gone. [`PaintRecorder`] implements [`Surface`] and logs what the
//! compositor asked for without drawing anything.

use faceplate_core::compose::Surface;
use faceplate_core::geom::{Point, Rect};
use faceplate_core::parse::RecordKind;
use faceplate_core::raster::{Raster, Rgb};
use faceplate_core::source::AssetKind;
use faceplate_core::trace::{
    AdjustEvent, FallbackEvent, LineIgnored, LoadedEvent, OpenFailed, TraceSink,
};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// An owned copy of one [`TraceSink`] callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A descriptor line was dropped.
    LineIgnored {
        /// 1-based line number.
        line: usize,
        /// Record kind, or `None` for an unrecognized label.
        kind: Option<RecordKind>,
    },
    /// An asset could not be opened.
    OpenFailed {
        /// Skin name.
        name: String,
        /// Which asset.
        asset: AssetKind,
    },
    /// The loader switched to the built-in default.
    Fallback {
        /// Skin that failed.
        from: String,
        /// Built-in skin tried instead.
        to: String,
    },
    /// Geometry adjustment finished.
    Adjusted {
        /// Inserted pixel rows.
        extra: i32,
        /// Unused pixels after shrinking.
        wasted: i32,
        /// Rows laid out.
        rows: i32,
        /// Columns laid out.
        cols: i32,
    },
    /// A skin finished loading.
    Loaded {
        /// Skin name actually loaded.
        name: String,
        /// Faceplate width.
        width: i32,
        /// Faceplate height.
        height: i32,
        /// Rows laid out.
        rows: i32,
        /// Columns laid out.
        cols: i32,
    },
}

/// A [`TraceSink`] that keeps every event in order.
#[derive(Clone, Debug, Default)]
pub struct EventRecorder {
    events: Vec<Event>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the recorder and returns the events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl TraceSink for EventRecorder {
    fn on_line_ignored(&mut self, e: &LineIgnored) {
        self.events.push(Event::LineIgnored {
            line: e.line,
            kind: e.kind,
        });
    }

    fn on_open_failed(&mut self, e: &OpenFailed<'_>) {
        self.events.push(Event::OpenFailed {
            name: e.name.to_owned(),
            asset: e.asset,
        });
    }

    fn on_fallback(&mut self, e: &FallbackEvent<'_>) {
        self.events.push(Event::Fallback {
            from: e.from.to_owned(),
            to: e.to.to_owned(),
        });
    }

    fn on_adjusted(&mut self, e: &AdjustEvent) {
        self.events.push(Event::Adjusted {
            extra: e.extra,
            wasted: e.wasted,
            rows: e.rows,
            cols: e.cols,
        });
    }

    fn on_loaded(&mut self, e: &LoadedEvent<'_>) {
        self.events.push(Event::Loaded {
            name: e.name.to_owned(),
            width: e.width,
            height: e.height,
            rows: e.rows,
            cols: e.cols,
        });
    }
}

// ---------------------------------------------------------------------------
// Paint operations
// ---------------------------------------------------------------------------

/// One call the compositor made on a [`Surface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaintOp {
    /// A copy from the skin bitmap.
    Blit {
        /// Bitmap point copied to the top-left of `dst`.
        src: Point,
        /// Surface rectangle written.
        dst: Rect,
    },
    /// A solid fill.
    Fill {
        /// Surface rectangle, in pixels.
        rect: kurbo::Rect,
        /// Fill color.
        color: Rgb,
    },
}

/// A [`Surface`] that records operations instead of drawing.
#[derive(Clone, Debug, Default)]
pub struct PaintRecorder {
    ops: Vec<PaintOp>,
}

impl PaintRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded operations.
    #[must_use]
    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    /// Consumes the recorder and returns the operations.
    #[must_use]
    pub fn into_ops(self) -> Vec<PaintOp> {
        self.ops
    }

    /// Number of blits recorded.
    #[must_use]
    pub fn blit_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PaintOp::Blit { .. }))
            .count()
    }

    /// Number of fills recorded.
    #[must_use]
    pub fn fill_count(&self) -> usize {
        self.ops.len() - self.blit_count()
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for PaintRecorder {
    fn blit(&mut self, _raster: &Raster, src: Point, dst: Rect) {
        self.ops.push(PaintOp::Blit { src, dst });
    }

    fn fill(&mut self, rect: kurbo::Rect, color: Rgb) {
        self.ops.push(PaintOp::Fill { rect, color });
    }
}
