// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recordings and layouts.
//!
//! The output is meant for eyeballing and diffing, not for loading back.
//! Each exporter writes one JSON document to the given writer.

use std::io::Write;

use faceplate_core::geom::Rect;
use faceplate_core::layout::SkinLayout;
use faceplate_core::raster::Rgb;
use serde_json::{Value, json};

use crate::recorder::{Event, PaintOp};

fn rect(r: Rect) -> Value {
    json!([r.x, r.y, r.width, r.height])
}

fn color(c: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Converts one recorded event to a JSON object.
#[must_use]
pub fn event_value(event: &Event) -> Value {
    match event {
        Event::LineIgnored { line, kind } => json!({
            "event": "ignored",
            "line": line,
            "label": kind.map(|k| k.label()),
        }),
        Event::OpenFailed { name, asset } => json!({
            "event": "open_failed",
            "skin": name,
            "asset": asset.suffix(),
        }),
        Event::Fallback { from, to } => json!({
            "event": "fallback",
            "from": from,
            "to": to,
        }),
        Event::Adjusted {
            extra,
            wasted,
            rows,
            cols,
        } => json!({
            "event": "adjusted",
            "extra": extra,
            "wasted": wasted,
            "rows": rows,
            "cols": cols,
        }),
        Event::Loaded {
            name,
            width,
            height,
            rows,
            cols,
        } => json!({
            "event": "loaded",
            "skin": name,
            "width": width,
            "height": height,
            "rows": rows,
            "cols": cols,
        }),
    }
}

/// Converts one paint operation to a JSON object.
#[must_use]
pub fn op_value(op: &PaintOp) -> Value {
    match *op {
        PaintOp::Blit { src, dst } => json!({
            "op": "blit",
            "src": [src.x, src.y],
            "dst": rect(dst),
        }),
        PaintOp::Fill { rect, color: c } => json!({
            "op": "fill",
            "rect": [rect.x0, rect.y0, rect.x1, rect.y1],
            "color": color(c),
        }),
    }
}

/// Summarizes a layout: geometry, counts, and the key table.
#[must_use]
pub fn layout_value(layout: &SkinLayout) -> Value {
    let d = &layout.display;
    let keys: Vec<Value> = layout
        .keys
        .iter()
        .map(|k| {
            json!({
                "code": k.code,
                "shifted": k.shifted_code,
                "sensitive": rect(k.sensitive),
                "display": rect(k.display),
                "source": [k.source.x, k.source.y],
            })
        })
        .collect();
    json!({
        "skin": rect(layout.skin),
        "display": {
            "origin": [d.origin.x, d.origin.y],
            "scale": [d.scale_x, d.scale_y],
            "integral": d.scale_is_integral,
            "rows": d.rows,
            "cols": d.cols,
            "native": [d.native_rows, d.native_cols],
            "zone": [d.zone.first_y, d.zone.last_y],
            "background": color(d.background),
            "foreground": color(d.foreground),
        },
        "keys": keys,
        "macros": layout.macros.len(),
        "keymap": layout.keymap.len(),
        "alt_backgrounds": layout.alt_backgrounds.len(),
        "alt_keys": layout.alt_keys.len(),
        "flags": layout.flags,
    })
}

/// Writes recorded events as a JSON array.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn export_events(events: &[Event], writer: &mut dyn Write) -> std::io::Result<()> {
    let values: Vec<Value> = events.iter().map(event_value).collect();
    serde_json::to_writer_pretty(&mut *writer, &values)?;
    writeln!(writer)
}

/// Writes recorded paint operations as a JSON array.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn export_ops(ops: &[PaintOp], writer: &mut dyn Write) -> std::io::Result<()> {
    let values: Vec<Value> = ops.iter().map(op_value).collect();
    serde_json::to_writer_pretty(&mut *writer, &values)?;
    writeln!(writer)
}

/// Writes a layout summary.
///
/// # Errors
///
/// Returns any error from `writer`.
pub fn export_layout(layout: &SkinLayout, writer: &mut dyn Write) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &layout_value(layout))?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faceplate_core::geom::Point;
    use faceplate_core::keymap::NoKeymap;
    use faceplate_core::parse::{RecordKind, parse_descriptor};
    use faceplate_core::source::SliceSource;
    use faceplate_core::trace::Tracer;

    #[test]
    fn events_export_as_array() {
        let events = [
            Event::LineIgnored {
                line: 2,
                kind: Some(RecordKind::Flags),
            },
            Event::LineIgnored {
                line: 3,
                kind: None,
            },
        ];
        let mut out = Vec::new();
        export_events(&events, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["label"], "flags:");
        assert_eq!(parsed[1]["label"], Value::Null);
        assert_eq!(parsed[1]["line"], 3);
    }

    #[test]
    fn ops_export_colors_as_hex() {
        let ops = [
            PaintOp::Blit {
                src: Point::new(1, 2),
                dst: Rect::new(3, 4, 5, 6),
            },
            PaintOp::Fill {
                rect: kurbo::Rect::new(0.0, 0.0, 2.0, 2.0),
                color: Rgb::new(255, 16, 0),
            },
        ];
        let mut out = Vec::new();
        export_ops(&ops, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["dst"], json!([3, 4, 5, 6]));
        assert_eq!(parsed[1]["color"], "#ff1000");
    }

    #[test]
    fn layout_summary_lists_keys() {
        let text = b"Skin: 0,0,100,200\nKey: 7 1,2,3,4 5,6,7,8 9,10\nFlags: 3\n";
        let layout = parse_descriptor(SliceSource::new(text), &NoKeymap, &mut Tracer::none());
        let mut out = Vec::new();
        export_layout(&layout, &mut out).unwrap();
        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["skin"], json!([0, 0, 100, 200]));
        assert_eq!(parsed["keys"][0]["code"], 7);
        assert_eq!(parsed["flags"], 3);
    }
}
