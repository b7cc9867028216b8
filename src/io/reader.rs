// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! High-level file reader.
//!
//! `GdfReader` memory-maps a file, probes the preamble once at open, and
//! runs full decodes over a fresh cursor per call. Two readers (or two
//! decode calls on one reader) share no mutable state.

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use crate::core::{NullSink, Result};
use crate::io::header::{read_header, FileHeader};
use crate::io::stream::{decode, DecodeOptions, DecodeOutput};

/// Memory-mapped GDF file reader.
pub struct GdfReader {
    /// Path to the file
    path: String,
    /// Memory-mapped file contents
    mmap: memmap2::Mmap,
    /// File size in bytes
    file_size: u64,
    /// Preamble decoded at open time
    header: FileHeader,
}

impl GdfReader {
    /// Open a GDF file and decode its preamble.
    ///
    /// Magic-id validation is deferred to [`GdfReader::decode`], where the
    /// caller's warning sink sees it; `open` only fails on I/O problems or a
    /// truncated preamble.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let file = File::open(&path_str)?;
        let file_size = file.metadata()?.len();
        let mmap = unsafe { memmap2::Mmap::map(&file) }?;

        let mut cursor = Cursor::new(&mmap[..]);
        let header = read_header(&mut cursor, &mut NullSink)?;

        Ok(GdfReader {
            path: path_str,
            mmap,
            file_size,
            header,
        })
    }

    /// Get the decoded file preamble.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Get the file size in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Get the file path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run a full decode over the mapped bytes.
    ///
    /// Each call owns a fresh cursor, so concurrent decodes of the same
    /// reader need no coordination.
    pub fn decode(&self, options: DecodeOptions<'_>) -> Result<DecodeOutput> {
        let mut cursor = Cursor::new(&self.mmap[..]);
        decode(&mut cursor, options)
    }
}
