// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by skin loading.

use alloc::string::String;
use core::fmt;

use crate::source::AssetKind;

/// A bitmap decoder rejected its input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError {
    message: String,
    offset: Option<u64>,
}

impl DecodeError {
    /// Creates an error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            offset: None,
        }
    }

    /// Attaches the byte offset at which decoding failed.
    #[must_use]
    pub fn at(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// The decoder's description of the problem.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset of the failure, if known.
    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(off) => write!(f, "{} (at byte {off})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl core::error::Error for DecodeError {}

/// Why a single load attempt failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadFailure {
    /// The skin name was empty and no built-in default exists.
    NoDefaultSkin,
    /// No source could be opened for the asset.
    NotFound(AssetKind),
    /// The bitmap decoder failed.
    Decode(DecodeError),
    /// The decoder returned without completing the row protocol.
    IncompleteImage,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDefaultSkin => f.write_str("no built-in default skin"),
            Self::NotFound(AssetKind::Layout) => f.write_str("skin descriptor not found"),
            Self::NotFound(AssetKind::Bitmap) => f.write_str("skin bitmap not found"),
            Self::Decode(e) => write!(f, "skin bitmap could not be decoded: {e}"),
            Self::IncompleteImage => f.write_str("skin bitmap decoder stopped early"),
        }
    }
}

impl core::error::Error for LoadFailure {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

/// Both the requested skin and the built-in default failed to load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadError {
    /// Name the caller asked for.
    pub requested: String,
    /// Name of the fallback that was tried, if any.
    pub fallback: Option<String>,
    /// Why the last attempt failed.
    pub cause: LoadFailure,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fallback {
            Some(fb) => write!(
                f,
                "could not load skin {:?} or fallback {fb:?}: {}",
                self.requested, self.cause
            ),
            None => write!(f, "could not load skin {:?}: {}", self.requested, self.cause),
        }
    }
}

impl core::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.cause)
    }
}
