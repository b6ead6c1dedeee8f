// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host keyboard mapping records.
//!
//! `gtkkey:` lines bind a host key, plus modifiers, to a short sequence of
//! calculator key codes. The exact key-name vocabulary belongs to the host
//! toolkit, so the descriptor parser hands the payload to a
//! [`KeymapParser`]. [`DefaultKeymapParser`] understands
//!
//! ```text
//! [ctrl] [alt] [shift] [cshift] KEYNAME : code code ...
//! ```
//!
//! with the leading words separated by whitespace or `|`, and delegates
//! the key name itself to a [`KeyvalResolver`].

use alloc::vec::Vec;

use crate::layout::{KeymapEntry, Modifiers};

/// Longest key-code sequence one keymap entry may produce.
pub const MAX_KEYMAP_LENGTH: usize = 16;

/// Parses the payload of one `gtkkey:` line.
pub trait KeymapParser {
    /// Returns the entry, or `None` if the payload is malformed.
    ///
    /// `line` is the 1-based descriptor line, for diagnostics.
    fn parse_entry(&self, payload: &[u8], line: usize) -> Option<KeymapEntry>;
}

/// A keymap parser that rejects everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoKeymap;

impl KeymapParser for NoKeymap {
    fn parse_entry(&self, _payload: &[u8], _line: usize) -> Option<KeymapEntry> {
        None
    }
}

/// Turns a key name into a host keyval.
pub trait KeyvalResolver {
    /// Returns the keyval named by `name`, if any.
    fn resolve(&self, name: &str) -> Option<u32>;
}

impl<F: Fn(&str) -> Option<u32>> KeyvalResolver for F {
    fn resolve(&self, name: &str) -> Option<u32> {
        self(name)
    }
}

/// X11 keysym names for the keys skins commonly bind.
const NAMED_KEYVALS: &[(&str, u32)] = &[
    ("space", 0x0020),
    ("BackSpace", 0xff08),
    ("Tab", 0xff09),
    ("Return", 0xff0d),
    ("Escape", 0xff1b),
    ("Delete", 0xffff),
    ("Home", 0xff50),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Page_Up", 0xff55),
    ("Page_Down", 0xff56),
    ("End", 0xff57),
    ("Insert", 0xff63),
    ("KP_Enter", 0xff8d),
    ("KP_Multiply", 0xffaa),
    ("KP_Add", 0xffab),
    ("KP_Subtract", 0xffad),
    ("KP_Decimal", 0xffae),
    ("KP_Divide", 0xffaf),
];

const KP_0: u32 = 0xffb0;
const F1: u32 = 0xffbe;

/// Single printable characters, numeric keyvals, and a small table of X11
/// keysym names (`Return`, `KP_0` through `KP_9`, `F1` through `F35`, ...).
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicKeyvals;

impl KeyvalResolver for BasicKeyvals {
    fn resolve(&self, name: &str) -> Option<u32> {
        if let [c] = name.as_bytes() {
            return c.is_ascii_graphic().then_some(u32::from(*c));
        }
        if let Some(hex) = name.strip_prefix("0x").or_else(|| name.strip_prefix("0X")) {
            return u32::from_str_radix(hex, 16).ok();
        }
        if name.bytes().all(|c| c.is_ascii_digit()) {
            return name.parse().ok();
        }
        if let Some(&(_, v)) = NAMED_KEYVALS.iter().find(|(n, _)| *n == name) {
            return Some(v);
        }
        if let Some(d) = name.strip_prefix("KP_").and_then(|d| d.parse::<u32>().ok()) {
            return (d <= 9).then_some(KP_0 + d);
        }
        if let Some(n) = name.strip_prefix('F').and_then(|n| n.parse::<u32>().ok()) {
            return (1..=35).contains(&n).then_some(F1 + n - 1);
        }
        None
    }
}

/// The stock `gtkkey:` syntax, with a pluggable key-name resolver.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultKeymapParser<R> {
    resolver: R,
}

impl<R: KeyvalResolver> DefaultKeymapParser<R> {
    /// Creates a parser using `resolver` for key names.
    #[must_use]
    pub const fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: KeyvalResolver> KeymapParser for DefaultKeymapParser<R> {
    fn parse_entry(&self, payload: &[u8], _line: usize) -> Option<KeymapEntry> {
        let colon = payload.iter().rposition(|&c| c == b':')?;
        let (head, codes) = (&payload[..colon], &payload[colon + 1..]);

        let mut modifiers = Modifiers::default();
        let mut name = None;
        for word in head
            .split(|&c| c == b'|' || c.is_ascii_whitespace())
            .filter(|w| !w.is_empty())
        {
            // Nothing may follow the key name.
            if name.is_some() {
                return None;
            }
            let word = core::str::from_utf8(word).ok()?;
            match word.to_ascii_lowercase().as_str() {
                "ctrl" => modifiers.ctrl = true,
                "alt" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "cshift" => modifiers.cshift = true,
                _ => name = Some(word),
            }
        }
        let keyval = self.resolver.resolve(name?)?;

        let mut payload = Vec::new();
        for code in codes
            .split(|c| c.is_ascii_whitespace())
            .filter(|w| !w.is_empty())
        {
            let code = core::str::from_utf8(code).ok()?.parse::<u8>().ok()?;
            if code == 0 || payload.len() == MAX_KEYMAP_LENGTH {
                return None;
            }
            payload.push(code);
        }
        if payload.is_empty() {
            return None;
        }
        Some(KeymapEntry {
            keyval,
            modifiers,
            payload,
        })
    }
}
