// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types shared across the decoder: errors, values, warnings, and
//! physical constants.

pub mod constants;
pub mod error;
pub mod events;
pub mod value;

pub use constants::PhysicalConstants;
pub use error::{GdfError, Result};
pub use events::{CollectSink, DecodeWarning, NullSink, Severity, TracingSink, WarningSink};
pub use value::{ElementType, FieldValue, Record};
