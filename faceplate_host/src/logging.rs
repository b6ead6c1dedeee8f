// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load diagnostics through the [`log`] facade.
//!
//! Ignored descriptor lines go to `trace!` so they stay invisible unless
//! asked for. Missing assets and fallbacks are `warn!`; the rest is `debug!`.

use faceplate_core::trace::{
    AdjustEvent, FallbackEvent, LineIgnored, LoadedEvent, OpenFailed, TraceSink,
};

/// Log target used for every event.
pub const TARGET: &str = "faceplate::skin";

/// A [`TraceSink`] that writes to the [`log`] crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn on_line_ignored(&mut self, e: &LineIgnored) {
        match e.kind {
            Some(kind) => log::trace!(
                target: TARGET,
                "line {}: malformed {} record ignored",
                e.line,
                kind.label()
            ),
            None => log::trace!(target: TARGET, "line {}: unknown record ignored", e.line),
        }
    }

    fn on_open_failed(&mut self, e: &OpenFailed<'_>) {
        log::warn!(
            target: TARGET,
            "skin {:?}: no {}{} found",
            e.name,
            e.name,
            e.asset.suffix()
        );
    }

    fn on_fallback(&mut self, e: &FallbackEvent<'_>) {
        log::warn!(target: TARGET, "falling back from skin {:?} to {:?}", e.from, e.to);
    }

    fn on_adjusted(&mut self, e: &AdjustEvent) {
        log::debug!(
            target: TARGET,
            "display {}x{}: {} rows inserted, {} unused",
            e.rows,
            e.cols,
            e.extra,
            e.wasted
        );
    }

    fn on_loaded(&mut self, e: &LoadedEvent<'_>) {
        log::debug!(
            target: TARGET,
            "loaded skin {:?}: {}x{} pixels, {}x{} display",
            e.name,
            e.width,
            e.height,
            e.rows,
            e.cols
        );
    }
}

#[cfg(test)]
mod tests {
    use faceplate_core::trace::Tracer;

    use super::*;

    #[test]
    fn log_sink_accepts_every_event() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut sink = LogSink;
        let mut tracer = Tracer::new(&mut sink);
        tracer.line_ignored(&LineIgnored { line: 3, kind: None });
        tracer.fallback(&FallbackEvent { from: "A", to: "B" });
        tracer.adjusted(&AdjustEvent { extra: 8, wasted: 0, rows: 4, cols: 22 });
    }
}
