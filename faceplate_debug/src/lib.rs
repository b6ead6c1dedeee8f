// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for faceplate diagnostics.
//!
//! This crate provides development helpers around `faceplate_core`:
//!
//! - [`pretty::PrettyPrintSink`] writes one line per load event.
//! - [`recorder::EventRecorder`] keeps owned copies of load events, and
//!   [`recorder::PaintRecorder`] is a [`Surface`](faceplate_core::compose::Surface)
//!   that records paint operations instead of touching pixels.
//! - [`json`] turns recordings and layouts into JSON for post-mortem
//!   inspection.

pub mod json;
pub mod pretty;
pub mod recorder;
