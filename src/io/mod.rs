// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Stream and file decoding for the GDF format.
//!
//! - [`header`]: fixed file preamble
//! - [`block`]: self-describing block headers and payloads
//! - [`group`]: directory group assembly and derived fields
//! - [`stream`]: the top-level decode loop
//! - [`reader`]: memory-mapped whole-file convenience reader

pub mod block;
pub mod group;
pub mod header;
pub mod reader;
pub mod stream;

pub use block::{BlockCursor, BlockHeader, BlockRead};
pub use group::{classify_group, AssembledGroup, FieldPolicy, GroupKind, RECOGNIZED_FIELDS};
pub use header::{read_header, FileHeader, GDF_MAGIC, HEADER_LEN};
pub use reader::GdfReader;
pub use stream::{decode, DecodeOptions, DecodeOutput, GroupCounts};
