// Copyright 2026 the Faceplate Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filesystem skin lookup.
//!
//! For a skin `Name`, asset suffix `.layout` or `.gif`, the search order is:
//!
//! 1. `<private_dir>/Name.layout`
//! 2. for each shared data root `<dir>`:
//!    `<dir>/faceplate/Name.layout`, then `<dir>/faceplate/skins/Name.layout`
//! 3. the built-in table
//!
//! The first file that opens wins.

use std::fs::File;
use std::io::{BufReader, Bytes, Read};
use std::path::PathBuf;

use faceplate_core::source::{AssetKind, BuiltinStore, ByteSource, SkinStore};

use crate::config::{APP_DIR, HostConfig, SKINS_DIR};

/// Bytes of an open file.
///
/// A read error ends the stream early, which the parser and decoders treat
/// like any other truncated input.
#[derive(Debug)]
pub struct FileSource {
    bytes: Bytes<BufReader<File>>,
}

impl FileSource {
    /// Wraps an open file.
    #[must_use]
    pub fn new(file: File) -> Self {
        Self {
            bytes: BufReader::new(file).bytes(),
        }
    }
}

impl ByteSource for FileSource {
    fn next_byte(&mut self) -> Option<u8> {
        match self.bytes.next()? {
            Ok(b) => Some(b),
            Err(e) => {
                log::warn!("skin read failed: {e}");
                None
            }
        }
    }
}

/// Searches the private and shared skin directories before the built-in
/// table.
#[derive(Clone, Debug)]
pub struct FileStore<'b> {
    private_dir: PathBuf,
    data_dirs: Vec<PathBuf>,
    builtin: BuiltinStore<'b>,
}

impl<'b> FileStore<'b> {
    /// Creates a store searching the locations in `config`.
    #[must_use]
    pub fn new(config: &HostConfig, builtin: BuiltinStore<'b>) -> Self {
        Self {
            private_dir: config.private_dir.clone(),
            data_dirs: config.data_dirs.clone(),
            builtin,
        }
    }

    /// On-disk paths tried for `name`, in order.
    #[must_use]
    pub fn candidates(&self, name: &str, asset: AssetKind) -> Vec<PathBuf> {
        let file = format!("{name}{}", asset.suffix());
        let mut paths = vec![self.private_dir.join(&file)];
        for dir in &self.data_dirs {
            let app = dir.join(APP_DIR);
            paths.push(app.join(&file));
            paths.push(app.join(SKINS_DIR).join(&file));
        }
        paths
    }
}

impl SkinStore for FileStore<'_> {
    fn open(
        &mut self,
        name: &str,
        asset: AssetKind,
        builtin_only: bool,
    ) -> Option<Box<dyn ByteSource + '_>> {
        if !builtin_only {
            for path in self.candidates(name, asset) {
                if let Ok(file) = File::open(&path) {
                    log::debug!("opened {}", path.display());
                    return Some(Box::new(FileSource::new(file)));
                }
            }
        }
        let source = self.builtin.open_slice(name, asset)?;
        log::debug!("opened built-in {name}{}", asset.suffix());
        Some(Box::new(source))
    }

    fn default_skin(&self) -> Option<&str> {
        self.builtin.default_skin()
    }
}
