// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # gdfcodec
//!
//! Decoder for the self-describing binary output (GDF) of a
//! particle-tracking simulator.
//!
//! A GDF file is a 48-byte preamble followed by self-describing blocks:
//! each block carries its own name, element type, count, and directory
//! markers. Runs of blocks between start-of-group and end-of-group markers
//! form one time slice, one position slice, or one particle's trajectory.
//! Decoding yields three record collections plus per-kind group counts, with
//! derived fields (transverse angles, kinetic energy) appended wherever
//! their raw prerequisites are present.
//!
//! ## Example: decoding a file
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use gdfcodec::{DecodeOptions, GdfReader};
//!
//! let reader = GdfReader::open("beam.gdf")?;
//! let output = reader.decode(DecodeOptions::default())?;
//! for record in &output.trajectories {
//!     if let Some(x) = record.get("x") {
//!         println!("trajectory with {} samples", x.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: decoding any `Read + Seek` stream
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use gdfcodec::{decode, CollectSink, DecodeOptions};
//! use std::fs::File;
//!
//! let mut warnings = CollectSink::default();
//! let mut file = File::open("beam.gdf")?;
//! let output = decode(&mut file, DecodeOptions::default().warnings(&mut warnings))?;
//! println!("{} time slices, {} warnings", output.counts.time, warnings.warnings.len());
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{
    CollectSink, DecodeWarning, ElementType, FieldValue, GdfError, NullSink, PhysicalConstants,
    Record, Result, Severity, TracingSink, WarningSink,
};

// Stream and file decoding
pub mod io;

// Re-export key I/O types
pub use io::{
    decode, read_header, BlockCursor, BlockHeader, BlockRead, DecodeOptions, DecodeOutput,
    FieldPolicy, FileHeader, GdfReader, GroupCounts, GroupKind, GDF_MAGIC,
};
