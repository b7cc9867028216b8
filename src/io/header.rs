// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! GDF file preamble decoding.
//!
//! The preamble is 46 bytes:
//! - magic id (u32, expected `94325877`)
//! - creation time (u32, seconds since the Unix epoch)
//! - creator tool name (16 bytes, null-terminated)
//! - destination tag (16 bytes, null-terminated)
//! - format major/minor and creator major/minor versions (1 byte each)
//! - 2 reserved bytes
//!
//! A magic mismatch is a recoverable warning: the rest of the file may still
//! be readable. Truncation inside the preamble is fatal.

use std::io::{Cursor, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{DecodeWarning, GdfError, Result, WarningSink};

/// Expected magic id at the start of every GDF file.
pub const GDF_MAGIC: u32 = 94_325_877;

/// Width of the creator and destination string fields.
pub const HEADER_NAME_LEN: usize = 16;

/// Total preamble size in bytes.
pub const HEADER_LEN: usize = 46;

/// Decoded file preamble.
#[derive(Debug, Clone, Serialize)]
pub struct FileHeader {
    /// Magic id as read from the stream
    pub magic: u32,
    /// Creation time, if the stored seconds form a valid timestamp
    pub created: Option<DateTime<Utc>>,
    /// Creator tool name
    pub creator: String,
    /// Destination tag
    pub destination: String,
    /// Format major version
    pub format_major: u8,
    /// Format minor version
    pub format_minor: u8,
    /// Creator tool major version
    pub creator_major: u8,
    /// Creator tool minor version
    pub creator_minor: u8,
}

impl FileHeader {
    /// Whether the magic id matches the known constant.
    pub fn magic_ok(&self) -> bool {
        self.magic == GDF_MAGIC
    }
}

/// Decode a null-terminated string from a fixed-width field.
///
/// If no null byte occurs within the field the whole width is taken,
/// truncating silently.
fn fixed_cstr(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Read and validate the file preamble.
///
/// If the stream is not positioned at the start, the reader seeks to the
/// start, reads the preamble, and restores the original position, so callers
/// may probe the header without disturbing a mid-stream cursor. When already
/// at the start, the stream is left positioned at the first block.
///
/// Magic mismatch is reported through `sink` and decoding continues.
pub fn read_header<R: Read + Seek>(
    reader: &mut R,
    sink: &mut dyn WarningSink,
) -> Result<FileHeader> {
    let original = reader
        .stream_position()
        .map_err(|e| GdfError::unseekable(e.to_string()))?;

    if original != 0 {
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| GdfError::unseekable(e.to_string()))?;
    }

    let mut buf = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(GdfError::truncated_header(0, HEADER_LEN, filled));
        }
        filled += n;
    }

    if original != 0 {
        reader
            .seek(SeekFrom::Start(original))
            .map_err(|e| GdfError::unseekable(e.to_string()))?;
    }

    let mut cursor = Cursor::new(&buf[..]);
    let magic = cursor.read_u32::<LittleEndian>()?;
    let created_secs = cursor.read_u32::<LittleEndian>()?;

    let mut name = [0u8; HEADER_NAME_LEN];
    cursor.read_exact(&mut name)?;
    let creator = fixed_cstr(&name);

    let mut dest = [0u8; HEADER_NAME_LEN];
    cursor.read_exact(&mut dest)?;
    let destination = fixed_cstr(&dest);

    let format_major = cursor.read_u8()?;
    let format_minor = cursor.read_u8()?;
    let creator_major = cursor.read_u8()?;
    let creator_minor = cursor.read_u8()?;
    // 2 reserved bytes discarded

    if magic != GDF_MAGIC {
        sink.warn(DecodeWarning::recoverable(
            0,
            format!("magic id mismatch: expected {GDF_MAGIC}, found {magic}"),
        ));
    }

    Ok(FileHeader {
        magic,
        created: DateTime::<Utc>::from_timestamp(created_secs as i64, 0),
        creator,
        destination,
        format_major,
        format_minor,
        creator_major,
        creator_minor,
    })
}
