// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-side collaborators for `faceplate_core`.
//!
//! - **[`config`]**: Where skins are looked up, and the selected skin name
//!   read from the preferences file.
//! - **[`store`]**: A [`SkinStore`](faceplate_core::source::SkinStore) that
//!   searches the private directory, then the shared data directories, then
//!   the built-in table.
//! - **[`logging`]**: A [`TraceSink`](faceplate_core::trace::TraceSink) that
//!   forwards load diagnostics to the [`log`] crate.
//!
//! Window construction, menus and image container decoding stay with the
//! embedding application.

pub mod config;
pub mod logging;
pub mod store;
