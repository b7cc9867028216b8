// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Physical constants needed for derived-field computation.
//!
//! The decoder never hardcodes these; callers pass them in so a downstream
//! configuration layer stays the single source of truth.

use serde::{Deserialize, Serialize};

/// Caller-supplied physical constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Speed of light in m/s
    pub speed_of_light: f64,
    /// Elementary charge in C
    pub elementary_charge: f64,
}

impl PhysicalConstants {
    /// CODATA SI values. Kinetic energy derived with these comes out in eV.
    pub const fn si() -> Self {
        PhysicalConstants {
            speed_of_light: 299_792_458.0,
            elementary_charge: 1.602_176_634e-19,
        }
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::si()
    }
}
