// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Self-describing block decoding.
//!
//! Every block starts with a fixed 16-byte header:
//! - name: 8 bytes, null-padded ASCII
//! - type/flag word: u32, low byte selects the element type, high bits carry
//!   the directory markers (start-of-group, end-of-group, end-of-file)
//! - element count: u32
//!
//! A block with no marker flags and a nonzero count carries `count` elements
//! of the declared type immediately after the header. Header decode and
//! payload read are separate operations: the driver needs the marker flags
//! and the name before deciding how to route the payload.

use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::core::{ElementType, FieldValue, GdfError, Result};

/// Width of the block name field in bytes.
pub const BLOCK_NAME_LEN: usize = 8;

/// Fixed block header size in bytes.
pub const BLOCK_HEADER_LEN: usize = 16;

/// Mask selecting the element type code from the type/flag word.
const TYPE_MASK: u32 = 0x0000_00FF;

/// Type/flag word bit: this block opens a directory group.
pub const FLAG_GROUP_BEGIN: u32 = 0x0000_0100;

/// Type/flag word bit: this block closes the current directory group.
pub const FLAG_GROUP_END: u32 = 0x0000_0200;

/// Type/flag word bit: explicit end-of-file marker.
pub const FLAG_END_OF_FILE: u32 = 0x0000_0400;

/// One decoded block header.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHeader {
    /// Field name, null padding stripped
    pub name: String,
    /// Declared element type
    pub element_type: ElementType,
    /// Declared element count
    pub count: u32,
    /// Start-of-group marker
    pub begins_group: bool,
    /// End-of-group marker
    pub ends_group: bool,
    /// End-of-file marker
    pub end_of_file: bool,
}

impl BlockHeader {
    /// Whether this block declares payload data.
    pub fn has_payload(&self) -> bool {
        self.count > 0 && self.element_type.size().is_some()
    }
}

/// Result of attempting to read the next block header.
#[derive(Debug)]
pub enum BlockRead {
    /// A complete header was decoded
    Header(BlockHeader),
    /// The stream ended at a block boundary; normal loop termination
    EndOfStream,
}

/// Sequential block reader over a byte stream.
///
/// Tracks the current byte offset and total stream length so the driver can
/// report fractional progress, and checks an optional cancellation flag once
/// per block boundary.
pub struct BlockCursor<'a, R> {
    reader: &'a mut R,
    offset: u64,
    total: u64,
}

impl<'a, R: Read + Seek> BlockCursor<'a, R> {
    /// Wrap a stream. `total` is the full stream length in bytes.
    pub fn new(reader: &'a mut R, total: u64) -> Result<Self> {
        let offset = reader
            .stream_position()
            .map_err(|e| GdfError::unseekable(e.to_string()))?;
        Ok(BlockCursor {
            reader,
            offset,
            total,
        })
    }

    /// Current byte offset in the stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Fractional position in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.offset as f64 / self.total as f64).min(1.0)
        }
    }

    /// Decode the next block header.
    ///
    /// A read that yields fewer bytes than the fixed header size is the
    /// normal end-of-stream condition, not an error.
    pub fn next_header(&mut self) -> Result<BlockRead> {
        let mut buf = [0u8; BLOCK_HEADER_LEN];
        let mut filled = 0;
        while filled < BLOCK_HEADER_LEN {
            let n = self.reader.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled < BLOCK_HEADER_LEN {
            self.offset += filled as u64;
            return Ok(BlockRead::EndOfStream);
        }

        let header_offset = self.offset;
        self.offset += BLOCK_HEADER_LEN as u64;

        let name_end = buf[..BLOCK_NAME_LEN]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(BLOCK_NAME_LEN);
        let name = String::from_utf8_lossy(&buf[..name_end]).into_owned();

        let word = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        let count = u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);

        let code = (word & TYPE_MASK) as u8;
        let element_type = match ElementType::from_code(code) {
            Some(ty) => ty,
            // Unknown codes are only fatal when a payload of unknown width
            // would desynchronize the stream.
            None if count > 0 => {
                return Err(GdfError::unsupported_type(name, code, header_offset))
            }
            None => ElementType::Undefined,
        };

        Ok(BlockRead::Header(BlockHeader {
            name,
            element_type,
            count,
            begins_group: word & FLAG_GROUP_BEGIN != 0,
            ends_group: word & FLAG_GROUP_END != 0,
            end_of_file: word & FLAG_END_OF_FILE != 0,
        }))
    }

    /// Read the payload declared by `header`.
    ///
    /// Must be called exactly once for every header with
    /// [`BlockHeader::has_payload`], immediately after the header decode; the
    /// stream stays self-synchronizing only if payloads are consumed eagerly.
    pub fn read_value(&mut self, header: &BlockHeader) -> Result<FieldValue> {
        let count = header.count as usize;
        let elem_size = header
            .element_type
            .size()
            .ok_or_else(|| GdfError::unsupported_type(header.name.clone(), header.element_type.code(), self.offset))?;
        let payload_len = count * elem_size;
        let payload_offset = self.offset;

        let truncated =
            |_| GdfError::truncated_payload(header.name.clone(), payload_offset, payload_len);

        let value = match header.element_type {
            ElementType::Ascii => {
                let mut buf = vec![0u8; count];
                self.reader.read_exact(&mut buf).map_err(truncated)?;
                FieldValue::Bytes(buf)
            }
            ElementType::Int8 => {
                let mut buf = vec![0i8; count];
                self.reader.read_i8_into(&mut buf).map_err(truncated)?;
                FieldValue::Int8(buf)
            }
            ElementType::UInt8 => {
                let mut buf = vec![0u8; count];
                self.reader.read_exact(&mut buf).map_err(truncated)?;
                FieldValue::UInt8(buf)
            }
            ElementType::Int16 => {
                let mut buf = vec![0i16; count];
                self.reader
                    .read_i16_into::<LittleEndian>(&mut buf)
                    .map_err(truncated)?;
                FieldValue::Int16(buf)
            }
            ElementType::UInt16 => {
                let mut buf = vec![0u16; count];
                self.reader
                    .read_u16_into::<LittleEndian>(&mut buf)
                    .map_err(truncated)?;
                FieldValue::UInt16(buf)
            }
            ElementType::Int32 => {
                let mut buf = vec![0i32; count];
                self.reader
                    .read_i32_into::<LittleEndian>(&mut buf)
                    .map_err(truncated)?;
                FieldValue::Int32(buf)
            }
            ElementType::UInt32 => {
                let mut buf = vec![0u32; count];
                self.reader
                    .read_u32_into::<LittleEndian>(&mut buf)
                    .map_err(truncated)?;
                FieldValue::UInt32(buf)
            }
            ElementType::Int64 => {
                let mut buf = vec![0i64; count];
                self.reader
                    .read_i64_into::<LittleEndian>(&mut buf)
                    .map_err(truncated)?;
                FieldValue::Int64(buf)
            }
            ElementType::UInt64 => {
                let mut buf = vec![0u64; count];
                self.reader
                    .read_u64_into::<LittleEndian>(&mut buf)
                    .map_err(truncated)?;
                FieldValue::UInt64(buf)
            }
            ElementType::Float32 => {
                let mut buf = vec![0f32; count];
                self.reader
                    .read_f32_into::<LittleEndian>(&mut buf)
                    .map_err(truncated)?;
                FieldValue::Float32(buf)
            }
            ElementType::Float64 => {
                let mut buf = vec![0f64; count];
                self.reader
                    .read_f64_into::<LittleEndian>(&mut buf)
                    .map_err(truncated)?;
                FieldValue::Float64(buf)
            }
            ElementType::Undefined => {
                return Err(GdfError::unsupported_type(
                    header.name.clone(),
                    header.element_type.code(),
                    payload_offset,
                ))
            }
        };

        self.offset += payload_len as u64;
        Ok(value)
    }
}
