// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Skin descriptor lexer and record parser.
//!
//! A descriptor is a line-oriented text file. Each line is one record of the
//! form `label: payload`, where the label is matched case-insensitively.
//! `#` starts a comment that runs to the end of the line.
//!
//! Parsing never fails. A line with an unknown label or a payload of the
//! wrong shape is dropped on its own and reported through the
//! [`Tracer`]; every other line still applies. Only opening the source can
//! fail, and that is the loader's concern.
//!
//! | Label | Payload |
//! |---|---|
//! | `skin` | `x,y,w,h` |
//! | `display` | `x,y sx sy bg fg` (colors as hex `RRGGBB`) |
//! | `displaysize` | `cols,rows [altY] [altPixelHeight] [maxRows]` |
//! | `displayexpansionzone` | `firstY lastY` |
//! | `key` | `code[,shifted] sx,sy,sw,sh dx,dy,dw,dh ax,ay` |
//! | `macro` | `code "name"` or `code k1 k2 ...` |
//! | `annunciator` | `n dx,dy,dw,dh ax,ay` |
//! | `gtkkey` | delegated to a [`KeymapParser`] |
//! | `flags` | `n` |
//! | `altbkgd` | `mode sx,sy,sw,sh dx,dy` |
//! | `altkey` | `mode code sx,sy` |

use alloc::vec::Vec;

use crate::geom::{Point, Rect};
use crate::keymap::KeymapParser;
use crate::layout::{
    AltBackground, AltKey, ANNUNCIATOR_COUNT, Annunciator, ExpansionZone, KeyDefinition,
    MAX_MACRO_LENGTH, MacroDefinition, MacroPayload, SkinLayout,
};
use crate::raster::Rgb;
use crate::source::ByteSource;
use crate::trace::{LineIgnored, Tracer};

/// Longest logical line. Longer physical lines continue on the next line.
pub const MAX_LINE_LENGTH: usize = 1023;

/// Lowest trigger code a macro may bind.
pub const MIN_MACRO_CODE: i32 = 38;
/// Highest trigger code a macro may bind.
pub const MAX_MACRO_CODE: i32 = 255;
/// Highest key-table code a keystroke macro may emit.
pub const MAX_KEYSTROKE_CODE: i32 = 37;

/// Native display sizes below this are rejected.
const MIN_COLS: i32 = 22;
const MIN_ROWS: i32 = 2;

// ---------------------------------------------------------------------------
// Lexing
// ---------------------------------------------------------------------------

/// Splits a [`ByteSource`] into descriptor lines.
///
/// Comments and leading whitespace are removed. A stream that is already
/// exhausted yields no further lines; an empty line in the middle of the
/// stream is yielded as an empty vector.
#[derive(Debug)]
pub struct Lines<S> {
    source: S,
    after_cr: bool,
}

impl<S: ByteSource> Lines<S> {
    /// Wraps a byte source.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            after_cr: false,
        }
    }
}

impl<S: ByteSource> Iterator for Lines<S> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        let mut line = Vec::new();
        let mut at_eof = None;
        let mut in_comment = false;
        while line.len() < MAX_LINE_LENGTH {
            let mut c = self.source.next_byte();
            // The `\n` of a `\r\n` pair.
            if core::mem::take(&mut self.after_cr) && c == Some(b'\n') {
                c = self.source.next_byte();
            }
            at_eof.get_or_insert(c.is_none());
            let Some(c) = c else { break };
            if c == b'\n' || c == b'\r' {
                self.after_cr = c == b'\r';
                break;
            }
            if c == b'#' {
                in_comment = true;
            }
            if in_comment || (line.is_empty() && c.is_ascii_whitespace()) {
                continue;
            }
            line.push(c);
        }
        (!line.is_empty() || at_eof == Some(false)).then_some(line)
    }
}

// ---------------------------------------------------------------------------
// Field scanning
// ---------------------------------------------------------------------------

/// A forgiving field scanner over one record payload.
///
/// Numeric fields skip leading whitespace; separators such as `,` must
/// appear exactly where expected. Trailing text after the last field is
/// ignored.
#[derive(Clone, Debug)]
struct Fields<'a> {
    s: &'a [u8],
    pos: usize,
}

impl<'a> Fields<'a> {
    fn new(s: &'a [u8]) -> Self {
        Self { s, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.s.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.s[start..self.pos]
    }

    fn sign(&mut self) -> bool {
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is clamped into i32 range first"
    )]
    fn int(&mut self) -> Option<i32> {
        self.skip_ws();
        let save = self.pos;
        let negative = self.sign();
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            self.pos = save;
            return None;
        }
        let magnitude = digits.iter().fold(0_i64, |acc, &d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });
        let value = if negative { -magnitude } else { magnitude };
        Some(value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
    }

    fn hex(&mut self) -> Option<u32> {
        self.skip_ws();
        let save = self.pos;
        let negative = self.sign();
        if self.s[self.pos..].len() > 2
            && self.s[self.pos] == b'0'
            && matches!(self.s[self.pos + 1], b'x' | b'X')
            && self.s[self.pos + 2].is_ascii_hexdigit()
        {
            self.pos += 2;
        }
        let digits = self.take_while(|c| c.is_ascii_hexdigit());
        if digits.is_empty() {
            self.pos = save;
            return None;
        }
        let value = digits.iter().fold(0_u32, |acc, &d| {
            let nibble = match d {
                b'0'..=b'9' => d - b'0',
                b'a'..=b'f' => d - b'a' + 10,
                _ => d - b'A' + 10,
            };
            (acc << 4) | u32::from(nibble)
        });
        Some(if negative { value.wrapping_neg() } else { value })
    }

    fn float(&mut self) -> Option<f64> {
        self.skip_ws();
        let start = self.pos;
        self.sign();
        let whole = self.take_while(|c| c.is_ascii_digit()).len();
        let mut frac = 0;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            frac = self.take_while(|c| c.is_ascii_digit()).len();
        }
        if whole + frac == 0 {
            self.pos = start;
            return None;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let before_exp = self.pos;
            self.pos += 1;
            self.sign();
            if self.take_while(|c| c.is_ascii_digit()).is_empty() {
                self.pos = before_exp;
            }
        }
        core::str::from_utf8(&self.s[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }

    fn word(&mut self) -> Option<&'a [u8]> {
        self.skip_ws();
        let w = self.take_while(|c| !c.is_ascii_whitespace());
        (!w.is_empty()).then_some(w)
    }

    fn lit(&mut self, c: u8) -> Option<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn point(&mut self) -> Option<Point> {
        let x = self.int()?;
        self.lit(b',')?;
        let y = self.int()?;
        Some(Point::new(x, y))
    }

    fn rect(&mut self) -> Option<Rect> {
        let Point { x, y } = self.point()?;
        self.lit(b',')?;
        let width = self.int()?;
        self.lit(b',')?;
        let height = self.int()?;
        Some(Rect::new(x, y, width, height))
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The kinds of record a descriptor can contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// `skin:`
    Skin,
    /// `display:`
    Display,
    /// `displaysize:`
    DisplaySize,
    /// `displayexpansionzone:`
    ExpansionZone,
    /// `key:`
    Key,
    /// `macro:`
    Macro,
    /// `annunciator:`
    Annunciator,
    /// `gtkkey:`
    Keymap,
    /// `flags:`
    Flags,
    /// `altbkgd:`
    AltBackground,
    /// `altkey:`
    AltKey,
}

impl RecordKind {
    const ALL: [Self; 11] = [
        Self::Skin,
        Self::Display,
        Self::DisplaySize,
        Self::ExpansionZone,
        Self::Key,
        Self::Macro,
        Self::Annunciator,
        Self::Keymap,
        Self::Flags,
        Self::AltBackground,
        Self::AltKey,
    ];

    /// The label, including its trailing colon.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skin => "skin:",
            Self::Display => "display:",
            Self::DisplaySize => "displaysize:",
            Self::ExpansionZone => "displayexpansionzone:",
            Self::Key => "key:",
            Self::Macro => "macro:",
            Self::Annunciator => "annunciator:",
            Self::Keymap => "gtkkey:",
            Self::Flags => "flags:",
            Self::AltBackground => "altbkgd:",
            Self::AltKey => "altkey:",
        }
    }

    /// Matches a line's label and returns the kind with the payload.
    #[must_use]
    pub fn split(line: &[u8]) -> Option<(Self, &[u8])> {
        Self::ALL.into_iter().find_map(|kind| {
            let label = kind.label().as_bytes();
            let head = line.get(..label.len())?;
            head.eq_ignore_ascii_case(label)
                .then(|| (kind, &line[label.len()..]))
        })
    }
}

/// What happened to one descriptor line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank after comment and whitespace removal.
    Blank,
    /// The record was applied to the layout.
    Applied(RecordKind),
    /// The record was dropped. `None` means the label was not recognized.
    Ignored(Option<RecordKind>),
}

/// Accumulates records into a [`SkinLayout`].
///
/// The layout's display rows and columns hold the native size declared by
/// the descriptor until [`adjust`](crate::adjust::adjust) runs.
pub struct DescriptorParser<'k> {
    layout: SkinLayout,
    keymap: &'k dyn KeymapParser,
    line: usize,
}

impl core::fmt::Debug for DescriptorParser<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DescriptorParser")
            .field("layout", &self.layout)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

impl<'k> DescriptorParser<'k> {
    /// Creates a parser with an empty layout.
    #[must_use]
    pub fn new(keymap: &'k dyn KeymapParser) -> Self {
        Self {
            layout: SkinLayout::default(),
            keymap,
            line: 0,
        }
    }

    /// Reads every line from `source`.
    pub fn read(&mut self, source: impl ByteSource, tracer: &mut Tracer<'_>) {
        for line in Lines::new(source) {
            if let LineOutcome::Ignored(kind) = self.feed_line(&line) {
                tracer.line_ignored(&LineIgnored {
                    line: self.line,
                    kind,
                });
            }
        }
    }

    /// Applies one lexed line.
    pub fn feed_line(&mut self, line: &[u8]) -> LineOutcome {
        self.line += 1;
        if line.is_empty() {
            return LineOutcome::Blank;
        }
        let Some((kind, payload)) = RecordKind::split(line) else {
            return LineOutcome::Ignored(None);
        };
        let applied = match kind {
            RecordKind::Skin => self.skin(payload),
            RecordKind::Display => self.display(payload),
            RecordKind::DisplaySize => self.display_size(payload),
            RecordKind::ExpansionZone => self.expansion_zone(payload),
            RecordKind::Key => self.key(payload),
            RecordKind::Macro => self.macro_def(payload),
            RecordKind::Annunciator => self.annunciator(payload),
            RecordKind::Keymap => self.keymap_entry(payload),
            RecordKind::Flags => self.flags(payload),
            RecordKind::AltBackground => self.alt_background(payload),
            RecordKind::AltKey => self.alt_key(payload),
        };
        if applied.is_some() {
            LineOutcome::Applied(kind)
        } else {
            LineOutcome::Ignored(Some(kind))
        }
    }

    /// Returns the layout built so far.
    #[must_use]
    pub fn layout(&self) -> &SkinLayout {
        &self.layout
    }

    /// Finishes parsing.
    #[must_use]
    pub fn finish(self) -> SkinLayout {
        self.layout
    }

    fn skin(&mut self, payload: &[u8]) -> Option<()> {
        self.layout.skin = Fields::new(payload).rect()?;
        Some(())
    }

    fn display(&mut self, payload: &[u8]) -> Option<()> {
        let mut f = Fields::new(payload);
        let origin = f.point()?;
        let scale_x = f.float()?;
        let scale_y = f.float()?;
        let bg = f.hex()?;
        let fg = f.hex()?;
        let d = &mut self.layout.display;
        d.origin = origin;
        d.scale_x = scale_x;
        d.scale_y = scale_y;
        d.background = Rgb::from_packed(bg);
        d.foreground = Rgb::from_packed(fg);
        Some(())
    }

    fn display_size(&mut self, payload: &[u8]) -> Option<()> {
        let mut f = Fields::new(payload);
        let cols = f.int()?;
        f.lit(b',')?;
        let rows = f.int()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            return None;
        }
        let alt_y = f.int();
        let alt_height = alt_y.and_then(|_| f.int());
        let max_rows = alt_height.and_then(|_| f.int());
        let d = &mut self.layout.display;
        d.native_rows = rows;
        d.native_cols = cols;
        d.rows = rows;
        d.cols = cols;
        // -1 is the descriptor's own spelling of "not given".
        let given = |v: Option<i32>| v.filter(|&v| v != -1);
        if let Some(v) = given(alt_y) {
            d.alt_origin_y = Some(v);
        }
        if let Some(v) = given(alt_height) {
            d.alt_pixel_height = Some(v);
        }
        if let Some(v) = given(max_rows) {
            d.max_rows = Some(v);
        }
        Some(())
    }

    fn expansion_zone(&mut self, payload: &[u8]) -> Option<()> {
        let mut f = Fields::new(payload);
        let first_y = f.int()?;
        let last_y = f.int()?;
        self.layout.display.zone = ExpansionZone { first_y, last_y };
        Some(())
    }

    fn key(&mut self, payload: &[u8]) -> Option<()> {
        let mut f = Fields::new(payload);
        let codes = f.word()?;
        let sensitive = f.rect()?;
        let display = f.rect()?;
        let source = f.point()?;

        let mut c = Fields::new(codes);
        let code = c.int()?;
        let shifted_code = c.lit(b',').and_then(|()| c.int()).unwrap_or(code);
        self.layout.keys.push(KeyDefinition {
            code,
            shifted_code,
            sensitive,
            display,
            source,
        });
        Some(())
    }

    fn macro_def(&mut self, payload: &[u8]) -> Option<()> {
        let def = if let Some(open) = payload.iter().position(|&c| c == b'"') {
            named_macro(payload, open)?
        } else {
            keystroke_macro(payload)?
        };
        self.layout.macros.insert(0, def);
        Some(())
    }

    fn annunciator(&mut self, payload: &[u8]) -> Option<()> {
        let mut f = Fields::new(payload);
        let which = f.int()?;
        let display = f.rect()?;
        let source = f.point()?;
        let slot = usize::try_from(which)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|&n| n < ANNUNCIATOR_COUNT)?;
        self.layout.annunciators[slot] = Annunciator { display, source };
        Some(())
    }

    fn keymap_entry(&mut self, payload: &[u8]) -> Option<()> {
        let entry = self.keymap.parse_entry(payload, self.line)?;
        self.layout.keymap.push(entry);
        Some(())
    }

    fn flags(&mut self, payload: &[u8]) -> Option<()> {
        self.layout.flags = Fields::new(payload).int()?;
        Some(())
    }

    fn alt_background(&mut self, payload: &[u8]) -> Option<()> {
        let mut f = Fields::new(payload);
        let mode = f.int()?;
        let source = f.rect()?;
        let dest = f.point()?;
        self.layout
            .alt_backgrounds
            .push(AltBackground { mode, source, dest });
        Some(())
    }

    fn alt_key(&mut self, payload: &[u8]) -> Option<()> {
        let mut f = Fields::new(payload);
        let mode = f.int()?;
        let code = f.int()?;
        let source = f.point()?;
        self.layout.alt_keys.push(AltKey { mode, code, source });
        Some(())
    }
}

/// `code "name"`: the name runs from the first quote to the last one.
fn named_macro(payload: &[u8], open: usize) -> Option<MacroDefinition> {
    let close = payload.iter().rposition(|&c| c == b'"')?;
    if close == open {
        return None;
    }
    let code = Fields::new(payload).int()?;
    if !(MIN_MACRO_CODE..=MAX_MACRO_CODE).contains(&code) {
        return None;
    }
    let name = &payload[open + 1..close];
    let name = &name[..name.len().min(MAX_MACRO_LENGTH)];
    Some(MacroDefinition {
        code,
        payload: MacroPayload::Name(name.to_vec()),
    })
}

/// `code k1 k2 ...`: every token must be a whole number in range.
fn keystroke_macro(payload: &[u8]) -> Option<MacroDefinition> {
    let mut tokens = payload
        .split(|&c| c == b' ' || c == b'\t')
        .filter(|t| !t.is_empty())
        .map(whole_number);
    let code = tokens.next()??;
    if !(MIN_MACRO_CODE..=MAX_MACRO_CODE).contains(&code) {
        return None;
    }
    let mut keys = Vec::new();
    for step in tokens {
        let step = u8::try_from(step?)
            .ok()
            .filter(|&s| (1..=MAX_KEYSTROKE_CODE).contains(&i32::from(s)))?;
        if keys.len() < MAX_MACRO_LENGTH {
            keys.push(step);
        }
    }
    Some(MacroDefinition {
        code,
        payload: MacroPayload::Keys(keys),
    })
}

fn whole_number(token: &[u8]) -> Option<i32> {
    let mut f = Fields::new(token);
    let n = f.int()?;
    (f.pos == token.len()).then_some(n)
}

/// Parses a complete descriptor.
pub fn parse_descriptor(
    source: impl ByteSource,
    keymap: &dyn KeymapParser,
    tracer: &mut Tracer<'_>,
) -> SkinLayout {
    let mut parser = DescriptorParser::new(keymap);
    parser.read(source, tracer);
    parser.finish()
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::keymap::{BasicKeyvals, DefaultKeymapParser, NoKeymap};
    use crate::source::SliceSource;

    fn lines(text: &[u8]) -> Vec<Vec<u8>> {
        Lines::new(SliceSource::new(text)).collect()
    }

    fn parse(text: &str) -> SkinLayout {
        parse_descriptor(
            SliceSource::new(text.as_bytes()),
            &DefaultKeymapParser::new(BasicKeyvals),
            &mut Tracer::none(),
        )
    }

    fn outcome(line: &str) -> LineOutcome {
        DescriptorParser::new(&NoKeymap).feed_line(line.as_bytes())
    }

    #[test]
    fn lexer_strips_comments_and_leading_space() {
        let got = lines(b"  skin: 1 # trailing\r\n# whole line\n\tkey: 2");
        let want: Vec<Vec<u8>> = vec![b"skin: 1 ".to_vec(), vec![], b"key: 2".to_vec()];
        assert_eq!(got, want);
    }

    #[test]
    fn lexer_accepts_either_newline_convention() {
        assert_eq!(lines(b"a\rb\r\nc"), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert_eq!(
            lines(b"a\r\rb"),
            vec![b"a".to_vec(), vec![], b"b".to_vec()],
            "two carriage returns end two lines"
        );
        assert_eq!(
            lines(b"a\n\nb"),
            vec![b"a".to_vec(), vec![], b"b".to_vec()],
            "a bare line feed after a line feed is a blank line"
        );
    }

    #[test]
    fn lexer_treats_bare_eof_as_end() {
        assert!(lines(b"").is_empty(), "empty stream has no lines");
        assert_eq!(lines(b"a\n"), vec![b"a".to_vec()]);
        assert_eq!(lines(b"a\n\n"), vec![b"a".to_vec(), vec![]]);
    }

    #[test]
    fn lexer_splits_overlong_lines() {
        let mut text = vec![b'x'; MAX_LINE_LENGTH + 5];
        text.push(b'\n');
        let got = lines(&text);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].len(), MAX_LINE_LENGTH);
        assert_eq!(got[1], b"xxxxx".to_vec());
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(
            outcome("SKIN: 1,2,3,4"),
            LineOutcome::Applied(RecordKind::Skin)
        );
        assert_eq!(
            outcome("DisplaySize: 22,4"),
            LineOutcome::Applied(RecordKind::DisplaySize)
        );
        assert_eq!(outcome("bogus: 1"), LineOutcome::Ignored(None));
        assert_eq!(outcome("skin 1,2,3,4"), LineOutcome::Ignored(None));
    }

    #[test]
    fn malformed_records_are_dropped_individually() {
        let layout = parse("skin: 1,2,3\nskin: 5,6,7,8\nkey: 1 0,0,1\nflags: x\nflags: 9\n");
        assert_eq!(layout.skin, Rect::new(5, 6, 7, 8));
        assert!(layout.keys.is_empty(), "short key record dropped");
        assert_eq!(layout.flags, 9);
    }

    #[test]
    fn display_record_splits_colors() {
        let layout = parse("display: 10,20 2.5 3 8fa2b4 0x010203\n");
        let d = layout.display;
        assert_eq!(d.origin, Point::new(10, 20));
        assert_eq!((d.scale_x, d.scale_y), (2.5, 3.0));
        assert_eq!(d.background, Rgb::new(0x8f, 0xa2, 0xb4));
        assert_eq!(d.foreground, Rgb::new(1, 2, 3));
    }

    #[test]
    fn display_size_requires_minimum() {
        let layout = parse("displaysize: 21,4\n");
        assert_eq!((layout.display.native_cols, layout.display.native_rows), (22, 2));
        let layout = parse("displaysize: 33,4 40 3 6\n");
        let d = layout.display;
        assert_eq!((d.native_cols, d.native_rows), (33, 4));
        assert_eq!(d.alt_origin_y, Some(40));
        assert_eq!(d.alt_pixel_height, Some(3));
        assert_eq!(d.max_rows, Some(6));
        let layout = parse("displaysize: 22,2 -1 4\n");
        assert_eq!(layout.display.alt_origin_y, None);
        assert_eq!(layout.display.alt_pixel_height, Some(4));
    }

    #[test]
    fn single_code_key_is_its_own_shift() {
        let layout = parse("key: 13 1,2,3,4 5,6,7,8 9,10\nkey: 14,40 0,0,1,1 0,0,1,1 0,0\n");
        assert_eq!(layout.keys.len(), 2);
        let k = layout.keys[0];
        assert_eq!((k.code, k.shifted_code), (13, 13));
        assert_eq!(k.sensitive, Rect::new(1, 2, 3, 4));
        assert_eq!(k.display, Rect::new(5, 6, 7, 8));
        assert_eq!(k.source, Point::new(9, 10));
        assert_eq!((layout.keys[1].code, layout.keys[1].shifted_code), (14, 40));
    }

    #[test]
    fn named_macros_are_range_checked() {
        let layout = parse("macro: 37 \"LOW\"\nmacro: 256 \"HIGH\"\nmacro: 38 \"OK\"\nmacro: 40 \"open\n");
        assert_eq!(layout.macros.len(), 1);
        assert_eq!(layout.macros[0].code, 38);
        assert_eq!(layout.macros[0].payload, MacroPayload::Name(b"OK".to_vec()));
    }

    #[test]
    fn named_macro_uses_outermost_quotes_and_truncates() {
        let long: alloc::string::String = core::iter::repeat_n('n', 80).collect();
        let text = alloc::format!("macro: 99 \"a\"b\"\nmacro: 100 \"{long}\"\n");
        let layout = parse(&text);
        assert_eq!(layout.macros[1].payload.bytes(), b"a\"b");
        assert_eq!(layout.macros[0].payload.bytes().len(), MAX_MACRO_LENGTH);
    }

    #[test]
    fn keystroke_macro_drops_whole_record_on_bad_step() {
        let layout = parse("macro: 50 1 2 38\nmacro: 51 1 x\nmacro: 52 0\nmacro: 20 1\nmacro: 53 1\t37\n");
        assert_eq!(layout.macros.len(), 1);
        assert_eq!(layout.macros[0].code, 53);
        assert_eq!(layout.macros[0].payload, MacroPayload::Keys(vec![1, 37]));
    }

    #[test]
    fn keystroke_macro_keeps_first_steps_only() {
        let steps: Vec<alloc::string::String> =
            (0..70).map(|i| alloc::format!("{}", i % 37 + 1)).collect();
        let text = alloc::format!("macro: 60 {}\n", steps.join(" "));
        let layout = parse(&text);
        assert_eq!(layout.macros[0].payload.bytes().len(), MAX_MACRO_LENGTH);
    }

    #[test]
    fn later_macro_shadows_earlier() {
        let layout = parse("macro: 100 \"A\"\nmacro: 100 \"B\"\n");
        assert_eq!(layout.macros.len(), 2);
        assert_eq!(layout.macros[0].payload.bytes(), b"B");
    }

    #[test]
    fn annunciator_slots() {
        let layout = parse("annunciator: 1 1,2,3,4 5,6\nannunciator: 8 1,1,1,1 1,1\nannunciator: 7 9,9,9,9 8,8\n");
        assert_eq!(layout.annunciators[0].display, Rect::new(1, 2, 3, 4));
        assert_eq!(layout.annunciators[0].source, Point::new(5, 6));
        assert_eq!(layout.annunciators[6].source, Point::new(8, 8));
        assert_eq!(layout.annunciators[3], Annunciator::default());
    }

    #[test]
    fn overlays_keep_parse_order() {
        let layout = parse("altbkgd: 1 0,0,5,5 10,10\naltbkgd: 2 5,5,5,5 20,20\naltkey: 1 13 30,40\naltkey:2 14 1,1\n");
        assert_eq!(layout.alt_backgrounds.len(), 2);
        assert_eq!(layout.alt_backgrounds[1].mode, 2);
        assert_eq!(layout.alt_backgrounds[0].dest_rect(), Rect::new(10, 10, 5, 5));
        assert_eq!(layout.alt_keys.len(), 2);
        assert_eq!(layout.alt_keys[0].source, Point::new(30, 40));
        assert_eq!(layout.alt_keys[1].code, 14);
    }

    #[test]
    fn gtkkey_delegates_to_keymap_parser() {
        let layout = parse("gtkkey: ctrl|a: 1 2\ngtkkey: nonsense\n");
        assert_eq!(layout.keymap.len(), 1);
        assert!(layout.keymap[0].modifiers.ctrl);
        assert_eq!(layout.keymap[0].keyval, u32::from(b'a'));
        assert_eq!(layout.keymap[0].payload, vec![1, 2]);
    }

    #[test]
    fn expansion_zone_record() {
        let layout = parse("displayexpansionzone: 70 100\n");
        assert_eq!(layout.display.zone, ExpansionZone { first_y: 70, last_y: 100 });
    }

    #[test]
    fn scanner_matches_separators_exactly() {
        assert!(Fields::new(b"1, 2").point().is_some(), "space after comma");
        assert!(Fields::new(b"1 ,2").point().is_none(), "space before comma");
        assert_eq!(Fields::new(b"  -12abc").int(), Some(-12));
        assert_eq!(Fields::new(b"1e2x").float(), Some(100.0));
        assert_eq!(Fields::new(b"3.").float(), Some(3.0));
        assert_eq!(Fields::new(b"0x").hex(), Some(0));
    }
}
