// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contracts for reading skin assets.
//!
//! A skin is a pair of assets sharing a name: a text descriptor and a bitmap.
//! [`SkinStore`] resolves a name to a [`ByteSource`] for either asset;
//! [`ImageDecoder`] turns bitmap bytes into scanlines for an [`ImageSink`].
//!
//! [`BuiltinStore`] serves skins compiled into the binary. Filesystem
//! search lives in `faceplate_host`.

use alloc::boxed::Box;

use crate::error::DecodeError;
use crate::raster::ImageSink;

/// A pull-based byte stream.
pub trait ByteSource {
    /// Returns the next byte, or `None` at end of stream.
    fn next_byte(&mut self) -> Option<u8>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }
}

/// A [`ByteSource`] over an in-memory slice.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a source positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ByteSource for SliceSource<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }
}

/// Which half of a skin to open.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// The text descriptor.
    Layout,
    /// The faceplate bitmap.
    Bitmap,
}

impl AssetKind {
    /// File name suffix used for on-disk copies.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Layout => ".layout",
            Self::Bitmap => ".gif",
        }
    }
}

/// Resolves skin names to byte sources.
pub trait SkinStore {
    /// Opens one asset of the named skin.
    ///
    /// With `builtin_only`, sources outside the embedded table must be
    /// skipped. Returns `None` if the asset exists nowhere.
    fn open(
        &mut self,
        name: &str,
        asset: AssetKind,
        builtin_only: bool,
    ) -> Option<Box<dyn ByteSource + '_>>;

    /// Name of the built-in skin to fall back on.
    fn default_skin(&self) -> Option<&str>;
}

/// Decodes a bitmap container into scanlines.
pub trait ImageDecoder {
    /// Reads `source` to completion and drives `sink` through the
    /// begin, push, end protocol.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the data is not a valid image.
    fn decode(
        &mut self,
        source: &mut dyn ByteSource,
        sink: &mut dyn ImageSink,
    ) -> Result<(), DecodeError>;
}

/// A skin compiled into the binary.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinSkin<'a> {
    /// Skin name.
    pub name: &'a str,
    /// Descriptor bytes.
    pub layout: &'a [u8],
    /// Bitmap bytes.
    pub bitmap: &'a [u8],
}

/// A [`SkinStore`] over an embedded table. The first entry is the default.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinStore<'a> {
    skins: &'a [BuiltinSkin<'a>],
}

impl<'a> BuiltinStore<'a> {
    /// Creates a store over `skins`.
    #[must_use]
    pub const fn new(skins: &'a [BuiltinSkin<'a>]) -> Self {
        Self { skins }
    }

    /// Looks up a skin by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&'a BuiltinSkin<'a>> {
        self.skins.iter().find(|s| s.name == name)
    }

    /// Opens an asset without boxing.
    #[must_use]
    pub fn open_slice(&self, name: &str, asset: AssetKind) -> Option<SliceSource<'a>> {
        self.find(name).map(|s| {
            SliceSource::new(match asset {
                AssetKind::Layout => s.layout,
                AssetKind::Bitmap => s.bitmap,
            })
        })
    }

    /// All embedded skins in table order.
    #[must_use]
    pub fn skins(&self) -> &'a [BuiltinSkin<'a>] {
        self.skins
    }
}

impl SkinStore for BuiltinStore<'_> {
    fn open(
        &mut self,
        name: &str,
        asset: AssetKind,
        _builtin_only: bool,
    ) -> Option<Box<dyn ByteSource + '_>> {
        self.open_slice(name, asset)
            .map(|s| Box::new(s) as Box<dyn ByteSource + '_>)
    }

    fn default_skin(&self) -> Option<&str> {
        self.skins.first().map(|s| s.name)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    const SKINS: &[BuiltinSkin<'static>] = &[
        BuiltinSkin {
            name: "Standard",
            layout: b"skin: 0,0,1,1\n",
            bitmap: b"BM",
        },
        BuiltinSkin {
            name: "Landscape",
            layout: b"",
            bitmap: b"",
        },
    ];

    fn drain(mut s: impl ByteSource) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(b) = s.next_byte() {
            out.push(b);
        }
        out
    }

    #[test]
    fn slice_source_reads_to_end() {
        let mut s = SliceSource::new(b"ab");
        assert_eq!(s.next_byte(), Some(b'a'));
        assert_eq!(s.remaining(), b"b");
        assert_eq!(s.next_byte(), Some(b'b'));
        assert_eq!(s.next_byte(), None);
        assert_eq!(s.next_byte(), None);
    }

    #[test]
    fn builtin_store_opens_each_asset() {
        let mut store = BuiltinStore::new(SKINS);
        assert_eq!(store.default_skin(), Some("Standard"));
        let layout = store.open("Standard", AssetKind::Layout, false).map(drain);
        assert_eq!(layout.as_deref(), Some(&b"skin: 0,0,1,1\n"[..]));
        let bitmap = store.open("Standard", AssetKind::Bitmap, true).map(drain);
        assert_eq!(bitmap.as_deref(), Some(&b"BM"[..]));
        assert!(store.open("Missing", AssetKind::Layout, false).is_none());
    }

    #[test]
    fn empty_table_has_no_default() {
        let store = BuiltinStore::new(&[]);
        assert!(store.default_skin().is_none());
    }
}
