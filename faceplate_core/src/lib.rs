// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Skins for calculator emulators: layout, geometry, compositing and input.
//!
//! `faceplate_core` turns a text skin descriptor and a faceplate bitmap into
//! something a host can paint and hit-test. It is `no_std` compatible (with
//! `alloc`) and knows nothing about windows, files or image containers; those
//! arrive through the collaborator traits in [`source`].
//!
//! # Architecture
//!
//! ```text
//!   SkinStore ──► parse ──► SkinLayout ──► adjust ──► Adjustment
//!                                                         │
//!   ImageDecoder ──► ImageBuilder (begin/push/end) ◄──────┘
//!                         │
//!                         ▼
//!   ActiveSkin { layout, raster, DisplayBuffer, mode, display switch }
//!        │                                │
//!        ▼                                ▼
//!   Compositor::paint_* / *_damage    input::find_key / keymap_lookup
//! ```
//!
//! **[`parse`]**: Line lexer and tolerant record parser. Bad lines are
//! dropped one at a time; nothing in a descriptor can fail a load.
//!
//! **[`keymap`]**: `gtkkey:` payload parsing behind the
//! [`KeymapParser`](keymap::KeymapParser) trait.
//!
//! **[`adjust`]**: Fits a layout to a requested display size by inserting
//! rows below the expansion zone start.
//!
//! **[`raster`]**: RGB raster and the scanline ingestion protocol, including
//! the matching row insertion.
//!
//! **[`display`]**: The dot-matrix display bitmap fed by the engine.
//!
//! **[`compose`]**: The [`Surface`](compose::Surface) trait and the
//! [`Compositor`](compose::Compositor) that paints keys, annunciators, the
//! display and alternate art, and reports damage.
//!
//! **[`canvas`]**: A software [`Surface`](compose::Surface).
//!
//! **[`input`]**: Pointer hit testing, macro lookup and keymap lookup.
//!
//! **[`load`]**: The reload state machine with built-in fallback, and the
//! [`ActiveSkin`](load::ActiveSkin) aggregate.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! load diagnostics, with zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod adjust;
pub mod canvas;
pub mod compose;
pub mod display;
pub mod error;
pub mod geom;
pub mod input;
pub mod keymap;
pub mod layout;
pub mod load;
pub mod parse;
pub mod raster;
pub mod source;
pub mod trace;
