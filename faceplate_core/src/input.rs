// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolving pointer and keyboard input against a layout.
//!
//! All lookups are first-match scans in table order, which is what makes
//! parse order observable: earlier keys win overlapping hit areas, and the
//! most recently parsed macro shadows older ones with the same code.

use crate::geom::Point;
use crate::layout::{MacroPayload, Modifiers, SkinLayout};

/// Number of soft keys along the bottom of the display.
pub const SOFT_KEY_COUNT: u8 = 6;

/// Dot rows covered by the soft-key band.
pub const SOFT_KEY_ROWS: i32 = 7;

/// Identifies something the user can press.
///
/// Ordinary keys are addressed by their index in
/// [`SkinLayout::keys`]; the index is stable until the next reload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyHandle {
    /// Nothing was hit.
    #[default]
    None,
    /// Soft key `1..=6`, counted from the left edge of the display.
    Soft(u8),
    /// Index into the key table.
    Key(usize),
}

impl KeyHandle {
    /// The engine's integer encoding: `-1` for none, `-1 - n` for soft key
    /// `n`, and the table index for ordinary keys.
    #[must_use]
    pub fn raw(self) -> i32 {
        match self {
            Self::None => -1,
            Self::Soft(n) => -1 - i32::from(n),
            Self::Key(i) => i32::try_from(i).unwrap_or(i32::MAX),
        }
    }

    /// Decodes [`raw`](Self::raw). Values that name nothing map to `None`.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        if let Ok(i) = usize::try_from(raw) {
            return Self::Key(i);
        }
        match u8::try_from(-1 - raw) {
            Ok(n @ 1..=SOFT_KEY_COUNT) => Self::Soft(n),
            _ => Self::None,
        }
    }
}

/// The result of a pointer hit test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyHit {
    /// What was hit.
    pub handle: KeyHandle,
    /// Key code to send to the engine; 0 when nothing was hit.
    pub code: i32,
}

impl KeyHit {
    /// A miss.
    pub const NONE: Self = Self {
        handle: KeyHandle::None,
        code: 0,
    };
}

/// Maps a surface point to a key.
///
/// While `menu_active` reports true, the bottom seven dot rows of the
/// display act as soft keys and take priority over the key table. The
/// predicate is only consulted once.
#[must_use]
pub fn find_key(
    layout: &SkinLayout,
    x: i32,
    y: i32,
    cshift: bool,
    menu_active: impl FnOnce() -> bool,
) -> KeyHit {
    if menu_active() {
        if let Some(n) = soft_key_at(layout, x, y) {
            return KeyHit {
                handle: KeyHandle::Soft(n),
                code: i32::from(n),
            };
        }
    }
    let p = Point::new(x, y);
    layout
        .keys
        .iter()
        .enumerate()
        .find(|(_, k)| k.sensitive.contains(p))
        .map_or(KeyHit::NONE, |(i, k)| KeyHit {
            handle: KeyHandle::Key(i),
            code: if cshift { k.shifted_code } else { k.code },
        })
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "soft key index is a small whole number after flooring"
)]
fn soft_key_at(layout: &SkinLayout, x: i32, y: i32) -> Option<u8> {
    let d = &layout.display;
    let (ox, oy) = (f64::from(d.origin.x), f64::from(d.origin.y));
    let (fx, fy) = (f64::from(x), f64::from(y));
    let h = f64::from(d.dot_height());
    let inside = x >= d.origin.x
        && fx < ox + f64::from(d.dot_width()) * d.scale_x
        && fy >= oy + (h - f64::from(SOFT_KEY_ROWS)) * d.scale_y
        && fy < oy + h * d.scale_y;
    if !inside {
        return None;
    }
    let index = (((fx - ox) / (f64::from(d.cols) * d.scale_x)) as i32).saturating_add(1);
    u8::try_from(index).ok()
}

/// Finds the key that produces `code`, shifted or not.
#[must_use]
pub fn find_skey(layout: &SkinLayout, code: i32) -> Option<usize> {
    layout
        .keys
        .iter()
        .position(|k| k.code == code || k.shifted_code == code)
}

/// Returns the macro bound to `code`, most recent definition first.
#[must_use]
pub fn find_macro(layout: &SkinLayout, code: i32) -> Option<&MacroPayload> {
    layout
        .macros
        .iter()
        .find(|m| m.code == code)
        .map(|m| &m.payload)
}

/// A host key event to look up in the keymap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    /// Host keyval.
    pub keyval: u32,
    /// Whether the key produced a printable character. Printable keys
    /// ignore the physical shift state, since it is already folded into
    /// the keyval.
    pub printable: bool,
    /// Modifier state.
    pub modifiers: Modifiers,
}

/// A keymap hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeymapMatch<'a> {
    /// Key codes to send.
    pub payload: &'a [u8],
    /// False when only an entry without computed shift matched a shifted
    /// query.
    pub exact: bool,
}

/// Looks a host key event up in the keymap.
///
/// The first entry that also agrees on computed shift is an exact match.
/// Failing that, a shifted query settles for the last entry that agreed on
/// everything else.
#[must_use]
pub fn keymap_lookup<'a>(layout: &'a SkinLayout, event: &KeyEvent) -> Option<KeymapMatch<'a>> {
    let q = event.modifiers;
    let mut fallback = None;
    for entry in &layout.keymap {
        let m = entry.modifiers;
        if m.ctrl != q.ctrl
            || m.alt != q.alt
            || !(event.printable || m.shift == q.shift)
            || entry.keyval != event.keyval
        {
            continue;
        }
        if m.cshift == q.cshift {
            return Some(KeymapMatch {
                payload: &entry.payload,
                exact: true,
            });
        }
        if q.cshift {
            fallback = Some(&entry.payload);
        }
    }
    fallback.map(|payload| KeymapMatch {
        payload,
        exact: false,
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::geom::Rect;
    use crate::keymap::NoKeymap;
    use crate::layout::{KeyDefinition, KeymapEntry, MacroDefinition};
    use crate::parse::parse_descriptor;
    use crate::source::SliceSource;
    use crate::trace::Tracer;

    fn key(code: i32, shifted_code: i32, sensitive: Rect) -> KeyDefinition {
        KeyDefinition {
            code,
            shifted_code,
            sensitive,
            display: sensitive,
            source: Point::ZERO,
        }
    }

    /// 2x22 display at (10, 20), scale 2: 262x32 pixels, soft band y 38..52.
    fn layout() -> SkinLayout {
        let mut layout = SkinLayout::default();
        layout.display.origin = Point::new(10, 20);
        layout.display.scale_x = 2.0;
        layout.display.scale_y = 2.0;
        layout.keys = vec![
            key(1, 27, Rect::new(0, 40, 60, 20)),
            key(2, 28, Rect::new(0, 40, 100, 20)),
            key(3, 3, Rect::new(200, 200, 10, 10)),
        ];
        layout
    }

    #[test]
    fn handle_encoding_round_trips() {
        assert_eq!(KeyHandle::None.raw(), -1);
        assert_eq!(KeyHandle::Soft(1).raw(), -2);
        assert_eq!(KeyHandle::Soft(6).raw(), -7);
        assert_eq!(KeyHandle::Key(4).raw(), 4);
        assert_eq!(KeyHandle::from_raw(-7), KeyHandle::Soft(6));
        assert_eq!(KeyHandle::from_raw(-8), KeyHandle::None);
        assert_eq!(KeyHandle::from_raw(-1), KeyHandle::None);
        assert_eq!(KeyHandle::from_raw(0), KeyHandle::Key(0));
    }

    #[test]
    fn first_key_in_table_order_wins() {
        let l = layout();
        let hit = find_key(&l, 30, 45, false, || false);
        assert_eq!(hit, KeyHit { handle: KeyHandle::Key(0), code: 1 });
        let hit = find_key(&l, 80, 45, true, || false);
        assert_eq!(hit, KeyHit { handle: KeyHandle::Key(1), code: 28 });
        assert_eq!(find_key(&l, 210, 210, false, || false), KeyHit::NONE);
        assert_eq!(find_key(&l, 205, 205, true, || false).code, 3);
    }

    #[test]
    fn soft_keys_take_priority_while_menu_is_up() {
        let l = layout();
        // Inside key 0 and inside the soft band.
        let hit = find_key(&l, 30, 45, false, || true);
        assert_eq!(hit, KeyHit { handle: KeyHandle::Soft(1), code: 1 });
        // Each soft key spans cols * scale_x = 44 pixels.
        assert_eq!(find_key(&l, 10 + 44, 45, false, || true).code, 2);
        assert_eq!(find_key(&l, 10 + 5 * 44, 45, false, || true).code, 6);
        assert_eq!(find_key(&l, 272, 45, false, || true), KeyHit::NONE, "past the display");
        // Above the band falls through to the key table.
        assert_eq!(find_key(&l, 30, 37, false, || true), KeyHit::NONE);
        assert_eq!(find_key(&l, 30, 52, false, || true).handle, KeyHandle::Key(0));
    }

    #[test]
    fn find_skey_matches_either_code() {
        let l = layout();
        assert_eq!(find_skey(&l, 2), Some(1));
        assert_eq!(find_skey(&l, 27), Some(0));
        assert_eq!(find_skey(&l, 99), None);
    }

    #[test]
    fn find_macro_returns_most_recent() {
        let mut l = layout();
        l.macros = vec![
            MacroDefinition { code: 100, payload: MacroPayload::Name(b"B".to_vec()) },
            MacroDefinition { code: 100, payload: MacroPayload::Name(b"A".to_vec()) },
            MacroDefinition { code: 40, payload: MacroPayload::Keys(vec![1, 2]) },
        ];
        let m = find_macro(&l, 100).unwrap();
        assert!(m.is_name(), "quoted macro");
        assert_eq!(m.bytes(), b"B");
        assert!(!find_macro(&l, 40).unwrap().is_name(), "keystroke macro");
        assert!(find_macro(&l, 41).is_none());
    }

    fn entry(keyval: u32, modifiers: Modifiers, payload: &[u8]) -> KeymapEntry {
        KeymapEntry { keyval, modifiers, payload: payload.to_vec() }
    }

    #[test]
    fn extreme_descriptor_coordinates_are_misses() {
        let text = b"key: 1 -2147483648,0,10,10 0,0,1,1 0,0\nkey: 2 0,0,10,10 0,0,1,1 0,0\n";
        let l = parse_descriptor(SliceSource::new(text), &NoKeymap, &mut Tracer::none());
        assert_eq!(l.keys[0].sensitive.x, i32::MIN);
        let hit = find_key(&l, 5, 5, false, || false);
        assert_eq!((hit.handle, hit.code), (KeyHandle::Key(1), 2));

        let mut l = layout();
        l.display.origin = Point::new(i32::MIN, 20);
        let hit = find_key(&l, i32::MAX, 45, false, || true);
        assert_eq!(hit.handle, KeyHandle::None, "outside the soft band and every key");
    }

    fn shifted(cshift: bool) -> Modifiers {
        Modifiers { cshift, ..Modifiers::default() }
    }

    #[test]
    fn keymap_falls_back_then_prefers_exact() {
        let mut l = layout();
        l.keymap = vec![entry(65, shifted(false), &[1])];
        let event = KeyEvent { keyval: 65, printable: true, modifiers: shifted(true) };
        let m = keymap_lookup(&l, &event).unwrap();
        assert_eq!((m.payload, m.exact), (&[1_u8][..], false));

        l.keymap.push(entry(65, shifted(true), &[2]));
        let m = keymap_lookup(&l, &event).unwrap();
        assert_eq!((m.payload, m.exact), (&[2_u8][..], true));
    }

    #[test]
    fn keymap_fallback_is_last_candidate() {
        let mut l = layout();
        l.keymap = vec![
            entry(65, shifted(false), &[1]),
            entry(65, shifted(false), &[2]),
        ];
        let event = KeyEvent { keyval: 65, printable: false, modifiers: shifted(true) };
        assert_eq!(keymap_lookup(&l, &event).unwrap().payload, &[2]);
        let unshifted = KeyEvent { modifiers: shifted(false), ..event };
        let m = keymap_lookup(&l, &unshifted).unwrap();
        assert_eq!((m.payload, m.exact), (&[1_u8][..], true));
    }

    #[test]
    fn keymap_shift_only_matters_for_unprintable_keys() {
        let mut l = layout();
        let with_shift = Modifiers { shift: true, ..Modifiers::default() };
        l.keymap = vec![entry(0xff0d, with_shift, &[9])];
        let mut event = KeyEvent { keyval: 0xff0d, printable: false, modifiers: Modifiers::default() };
        assert!(keymap_lookup(&l, &event).is_none(), "shift must match");
        event.printable = true;
        assert!(keymap_lookup(&l, &event).is_some(), "printable ignores shift");
        event.modifiers.ctrl = true;
        assert!(keymap_lookup(&l, &event).is_none(), "ctrl always matters");
        l.keymap.clear();
        assert!(keymap_lookup(&l, &event).is_none());
    }
}
