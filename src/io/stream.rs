// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Top-level decode loop.
//!
//! The driver reads the preamble, then consumes blocks front-to-back:
//! payloads are read eagerly for every block so the stream stays
//! self-synchronizing, group-start blocks are handed to the group assembler,
//! and bare top-level scalars are consumed and discarded (they exist only to
//! keep the framing correct). The loop ends on end-of-stream or an explicit
//! end-of-file marker.
//!
//! A `GdfError` anywhere aborts the whole call: partial directory groups
//! must never masquerade as complete records.

use std::io::{Read, Seek, SeekFrom};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::core::{GdfError, PhysicalConstants, Record, Result, TracingSink, WarningSink};
use crate::io::block::{BlockCursor, BlockRead};
use crate::io::group::{assemble_group, FieldPolicy, GroupKind};
use crate::io::header::{read_header, FileHeader};

/// Options for one decode call.
///
/// The warning sink, progress callback, and cancellation flag are borrowed
/// so callers keep ownership and can inspect them afterwards. Defaults:
/// SI constants, warnings forwarded to `tracing`, no progress reporting, no
/// cancellation.
#[derive(Default)]
pub struct DecodeOptions<'a> {
    /// Physical constants for derived-field computation
    pub constants: PhysicalConstants,
    /// Warning sink; `None` forwards to `tracing`
    pub warnings: Option<&'a mut dyn WarningSink>,
    /// Progress callback, invoked with a stream-offset fraction in [0.0, 1.0]
    /// after each block. Must not block; it runs on the decode thread.
    pub progress: Option<&'a mut dyn FnMut(f64)>,
    /// Cancellation flag, checked once per block boundary
    pub cancel: Option<&'a AtomicBool>,
}

impl<'a> DecodeOptions<'a> {
    /// Options with explicit physical constants.
    pub fn with_constants(constants: PhysicalConstants) -> Self {
        DecodeOptions {
            constants,
            ..Default::default()
        }
    }

    /// Route warnings to the given sink.
    pub fn warnings(mut self, sink: &'a mut dyn WarningSink) -> Self {
        self.warnings = Some(sink);
        self
    }

    /// Report fractional progress through the given callback.
    pub fn progress(mut self, callback: &'a mut dyn FnMut(f64)) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Abort the decode when the flag becomes true.
    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }
}

/// Number of successfully decoded groups of each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupCounts {
    /// Time-slice groups
    pub time: usize,
    /// Position-slice groups
    pub position: usize,
    /// Trajectory groups
    pub trajectory: usize,
    /// Unknown groups (consumed, not returned)
    pub unknown: usize,
}

/// Everything one decode call produces.
///
/// A single file populates at most one of {time + position series,
/// trajectory series}; that is a property of the source format, not enforced
/// here, but callers should expect the unused collections to be empty.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeOutput {
    /// Decoded file preamble
    pub header: FileHeader,
    /// Time-slice records in stream arrival order
    pub time_slices: Vec<Record>,
    /// Position-slice records in stream arrival order
    pub position_slices: Vec<Record>,
    /// Per-particle trajectory records in stream arrival order
    pub trajectories: Vec<Record>,
    /// Per-kind decoded group counts
    pub counts: GroupCounts,
}

/// Decode a complete GDF stream.
///
/// The stream must be positioned at its start. On success all three record
/// collections are returned; on any [`GdfError`] nothing is.
pub fn decode<R: Read + Seek>(
    reader: &mut R,
    options: DecodeOptions<'_>,
) -> Result<DecodeOutput> {
    let DecodeOptions {
        constants,
        warnings,
        mut progress,
        cancel,
    } = options;

    let mut default_sink = TracingSink;
    let sink: &mut dyn WarningSink = match warnings {
        Some(sink) => sink,
        None => &mut default_sink,
    };

    let total = stream_len(reader)?;
    let header = read_header(reader, sink)?;
    let policy = FieldPolicy::from_creator(&header.creator);

    let mut output = DecodeOutput {
        header,
        time_slices: Vec::new(),
        position_slices: Vec::new(),
        trajectories: Vec::new(),
        counts: GroupCounts::default(),
    };

    let mut cursor = BlockCursor::new(reader, total)?;

    loop {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(GdfError::cancelled(cursor.offset()));
            }
        }

        let block = match cursor.next_header()? {
            BlockRead::Header(h) => h,
            BlockRead::EndOfStream => break,
        };

        // Every payload is consumed eagerly, group member or not, so the
        // stream stays self-synchronizing.
        let value = if block.has_payload() {
            Some(cursor.read_value(&block)?)
        } else {
            None
        };
        if let Some(cb) = progress.as_mut() {
            cb(cursor.fraction());
        }

        if block.end_of_file {
            break;
        }

        if block.begins_group {
            let group = assemble_group(
                &mut cursor,
                &block,
                value,
                policy,
                &constants,
                sink,
                |fraction| {
                    if let Some(cb) = progress.as_mut() {
                        cb(fraction);
                    }
                },
            )?;
            match group.kind {
                GroupKind::Time => {
                    output.counts.time += 1;
                    output.time_slices.push(group.record);
                }
                GroupKind::Position => {
                    output.counts.position += 1;
                    output.position_slices.push(group.record);
                }
                GroupKind::Trajectory => {
                    output.counts.trajectory += 1;
                    output.trajectories.push(group.record);
                }
                GroupKind::Unknown => {
                    output.counts.unknown += 1;
                }
            }
        }
        // Bare top-level scalars are framing only: read and ignored.
    }

    Ok(output)
}

/// Length of the stream in bytes, restoring the current position.
fn stream_len<R: Seek>(reader: &mut R) -> Result<u64> {
    let current = reader
        .stream_position()
        .map_err(|e| GdfError::unseekable(e.to_string()))?;
    let len = reader
        .seek(SeekFrom::End(0))
        .map_err(|e| GdfError::unseekable(e.to_string()))?;
    reader
        .seek(SeekFrom::Start(current))
        .map_err(|e| GdfError::unseekable(e.to_string()))?;
    Ok(len)
}
