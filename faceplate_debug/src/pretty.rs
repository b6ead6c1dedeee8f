// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use faceplate_core::source::AssetKind;
use faceplate_core::trace::{
    AdjustEvent, FallbackEvent, LineIgnored, LoadedEvent, OpenFailed, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    lines: u64,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            lines: 0,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, lines: 0 }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Number of lines written so far.
    #[must_use]
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, args: std::fmt::Arguments<'_>) {
        if writeln!(self.writer, "{args}").is_ok() {
            self.lines += 1;
        }
    }
}

fn asset_name(asset: AssetKind) -> &'static str {
    match asset {
        AssetKind::Layout => "layout",
        AssetKind::Bitmap => "bitmap",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_line_ignored(&mut self, e: &LineIgnored) {
        let label = e.kind.map_or("?", |k| k.label());
        self.emit(format_args!("[ignored] line={} label={label}", e.line));
    }

    fn on_open_failed(&mut self, e: &OpenFailed<'_>) {
        self.emit(format_args!(
            "[open:failed] skin={:?} asset={}",
            e.name,
            asset_name(e.asset),
        ));
    }

    fn on_fallback(&mut self, e: &FallbackEvent<'_>) {
        self.emit(format_args!("[fallback] {:?} -> {:?}", e.from, e.to));
    }

    fn on_adjusted(&mut self, e: &AdjustEvent) {
        self.emit(format_args!(
            "[adjust] {}x{} extra={} wasted={}",
            e.rows, e.cols, e.extra, e.wasted,
        ));
    }

    fn on_loaded(&mut self, e: &LoadedEvent<'_>) {
        self.emit(format_args!(
            "[loaded] skin={:?} size={}x{} display={}x{}",
            e.name, e.width, e.height, e.rows, e.cols,
        ));
    }
}
