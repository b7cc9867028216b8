// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.
//!
//! `StreamBuilder` constructs synthetic GDF byte streams: a 46-byte preamble
//! followed by hand-assembled blocks.

#![allow(dead_code)]

use gdfcodec::io::block::{
    BLOCK_NAME_LEN, FLAG_END_OF_FILE, FLAG_GROUP_BEGIN, FLAG_GROUP_END,
};
use gdfcodec::{ElementType, GDF_MAGIC};

/// Builder for synthetic GDF byte streams.
pub struct StreamBuilder {
    buf: Vec<u8>,
}

impl StreamBuilder {
    /// Start a stream with a valid preamble for the given creator tool.
    pub fn with_header(creator: &str) -> Self {
        Self::with_magic(GDF_MAGIC, creator)
    }

    /// Start a stream with an arbitrary magic id.
    pub fn with_magic(magic: u32, creator: &str) -> Self {
        let mut buf = Vec::new();
        buf.extend(&magic.to_le_bytes());
        buf.extend(&1_700_000_000u32.to_le_bytes());

        let mut name = [0u8; 16];
        name[..creator.len()].copy_from_slice(creator.as_bytes());
        buf.extend(&name);
        buf.extend(&[0u8; 16]); // destination
        buf.extend(&[1, 0, 1, 0]); // format 1.0, creator 1.0
        buf.extend(&[0, 0]); // reserved

        StreamBuilder { buf }
    }

    /// Append a raw block with an explicit type/flag word and payload.
    pub fn raw_block(mut self, name: &str, word: u32, count: u32, payload: &[u8]) -> Self {
        // Writers truncate at the 8-byte name field width.
        let n = name.len().min(BLOCK_NAME_LEN);
        let mut field = [0u8; BLOCK_NAME_LEN];
        field[..n].copy_from_slice(&name.as_bytes()[..n]);
        self.buf.extend(&field);
        self.buf.extend(&word.to_le_bytes());
        self.buf.extend(&count.to_le_bytes());
        self.buf.extend(payload);
        self
    }

    /// Append a float64 array block.
    pub fn f64_block(self, name: &str, values: &[f64]) -> Self {
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.raw_block(
            name,
            ElementType::Float64.code() as u32,
            values.len() as u32,
            &payload,
        )
    }

    /// Append an int32 array block.
    pub fn i32_block(self, name: &str, values: &[i32]) -> Self {
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.raw_block(
            name,
            ElementType::Int32.code() as u32,
            values.len() as u32,
            &payload,
        )
    }

    /// Open a group with a float64 opening block.
    pub fn open_group_f64(self, name: &str, values: &[f64]) -> Self {
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.raw_block(
            name,
            FLAG_GROUP_BEGIN | ElementType::Float64.code() as u32,
            values.len() as u32,
            &payload,
        )
    }

    /// Open a group with an int32 opening block.
    pub fn open_group_i32(self, name: &str, values: &[i32]) -> Self {
        let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.raw_block(
            name,
            FLAG_GROUP_BEGIN | ElementType::Int32.code() as u32,
            values.len() as u32,
            &payload,
        )
    }

    /// Close the current group.
    pub fn close_group(self) -> Self {
        self.raw_block("", FLAG_GROUP_END, 0, &[])
    }

    /// Append an explicit end-of-file marker.
    pub fn eof_marker(self) -> Self {
        self.raw_block("", FLAG_END_OF_FILE, 0, &[])
    }

    /// Finish and return the stream bytes.
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}
