// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Directory group assembly.
//!
//! A group is a run of blocks between a start-of-group and an end-of-group
//! marker. Its kind is decided by the name of the opening block: `ti*` is a
//! time slice, `po*` a position slice, and a recognized per-particle field
//! (the simulator opens with `ID`) a trajectory. Anything else is an unknown
//! group: consumed to keep the stream synchronized, reported once, and
//! routed to no output collection.
//!
//! Once the group closes, derived fields are appended in a fixed order, each
//! one conditional on the presence of its raw prerequisites. A missing
//! prerequisite is a silent omission, never an error.

use std::io::{Read, Seek};

use serde::Serialize;

use crate::core::{
    DecodeWarning, FieldValue, PhysicalConstants, Record, Result, WarningSink,
};
use crate::io::block::{BlockCursor, BlockHeader, BlockRead};

/// Field names retained under the strict vocabulary policy.
///
/// Position components, momentum-direction components, the relativistic
/// factor, electromagnetic field components, charge and rest mass,
/// macro-particle weighting, radial distance, particle identifier, and the
/// time/position slice openers.
pub const RECOGNIZED_FIELDS: &[&str] = &[
    "x", "y", "z", "Bx", "By", "Bz", "G", "fEx", "fEy", "fEz", "fBx", "fBy", "fBz", "q", "m",
    "nmacro", "rxy", "ID", "t", "time", "position",
];

/// Creator tool whose files carry arbitrary user columns; every field in a
/// group is retained when the header names it.
pub const RETAIN_ALL_CREATOR: &str = "ASCI2GDF";

/// Field retention policy, chosen once from the file header's creator name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Keep only fields in [`RECOGNIZED_FIELDS`]; read and drop the rest
    StrictVocabulary,
    /// Keep every field encountered
    RetainAll,
}

impl FieldPolicy {
    /// Choose the policy for a creator tool name.
    pub fn from_creator(creator: &str) -> Self {
        if creator == RETAIN_ALL_CREATOR {
            FieldPolicy::RetainAll
        } else {
            FieldPolicy::StrictVocabulary
        }
    }

    /// Whether a field with this name should be kept.
    pub fn retains(self, name: &str) -> bool {
        match self {
            FieldPolicy::RetainAll => true,
            FieldPolicy::StrictVocabulary => RECOGNIZED_FIELDS.contains(&name),
        }
    }
}

/// Classification of one directory group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupKind {
    /// One time slice (opening field starts with `ti`)
    Time,
    /// One position slice (opening field starts with `po`)
    Position,
    /// One particle's trajectory (recognized per-particle opening field)
    Trajectory,
    /// Unrecognized opener; collected but routed nowhere
    Unknown,
}

/// Classify a group by its opening block's field name.
pub fn classify_group(opening_name: &str) -> GroupKind {
    if opening_name.starts_with("ti") {
        GroupKind::Time
    } else if opening_name.starts_with("po") {
        GroupKind::Position
    } else if RECOGNIZED_FIELDS.contains(&opening_name) {
        GroupKind::Trajectory
    } else {
        GroupKind::Unknown
    }
}

/// One closed group: its kind and the assembled record.
#[derive(Debug, Clone)]
pub struct AssembledGroup {
    /// Classified group kind
    pub kind: GroupKind,
    /// Field-name to value mapping in stream order, derived fields appended
    pub record: Record,
}

/// Consume blocks until the group closes and assemble one record.
///
/// `opening` is the already-read group-start block and `opening_value` its
/// eagerly-read payload, if any. The group also closes on end-of-stream or
/// an end-of-file marker, so a well-formed prefix of a truncated file still
/// yields its final record.
pub fn assemble_group<R: Read + Seek>(
    cursor: &mut BlockCursor<'_, R>,
    opening: &BlockHeader,
    opening_value: Option<FieldValue>,
    policy: FieldPolicy,
    constants: &PhysicalConstants,
    sink: &mut dyn WarningSink,
    mut on_block: impl FnMut(f64),
) -> Result<AssembledGroup> {
    let kind = classify_group(&opening.name);
    if kind == GroupKind::Unknown {
        sink.warn(DecodeWarning::recoverable(
            cursor.offset(),
            format!("unrecognized group kind for opening field '{}'", opening.name),
        ));
    }

    let mut record = Record::new();
    store_field(&mut record, &opening.name, opening_value, policy, cursor.offset(), sink);

    loop {
        let header = match cursor.next_header()? {
            BlockRead::Header(h) => h,
            BlockRead::EndOfStream => break,
        };

        let value = if header.has_payload() {
            Some(cursor.read_value(&header)?)
        } else {
            None
        };
        on_block(cursor.fraction());

        if header.ends_group || header.end_of_file {
            break;
        }

        store_field(&mut record, &header.name, value, policy, cursor.offset(), sink);
    }

    apply_derived(&mut record, constants);

    Ok(AssembledGroup { kind, record })
}

/// Store one field into the record, subject to the retention policy.
fn store_field(
    record: &mut Record,
    name: &str,
    value: Option<FieldValue>,
    policy: FieldPolicy,
    offset: u64,
    sink: &mut dyn WarningSink,
) {
    let Some(value) = value else { return };
    if policy.retains(name) {
        record.insert(name, value);
    } else {
        sink.warn(DecodeWarning::informational(
            offset,
            format!("field '{name}' outside the recognized vocabulary, dropped"),
        ));
    }
}

/// Append derived fields to a closed record, in fixed order.
///
/// 1. `xp = atan2(Bx, Bz)` element-wise
/// 2. `yp = atan2(By, Bz)` element-wise
/// 3. `KE = m (G - 1) c^2 / e`
///
/// Each step runs only when its prerequisites are present.
pub fn apply_derived(record: &mut Record, constants: &PhysicalConstants) {
    if let Some(xp) = angle_from(record, "Bx", "Bz") {
        record.insert("xp", FieldValue::Float64(xp));
    }
    if let Some(yp) = angle_from(record, "By", "Bz") {
        record.insert("yp", FieldValue::Float64(yp));
    }
    if let (Some(m), Some(g)) = (field_f64(record, "m"), field_f64(record, "G")) {
        let c2 = constants.speed_of_light * constants.speed_of_light;
        let e = constants.elementary_charge;
        let ke: Vec<f64> = g
            .iter()
            .enumerate()
            .map(|(i, &gamma)| {
                // A single-valued mass broadcasts over the whole group.
                let mass = if m.len() == 1 { m[0] } else { m[i.min(m.len() - 1)] };
                mass * (gamma - 1.0) * c2 / e
            })
            .collect();
        record.insert("KE", FieldValue::Float64(ke));
    }
}

fn field_f64(record: &Record, name: &str) -> Option<Vec<f64>> {
    let v = record.get(name)?.to_f64_vec()?;
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

fn angle_from(record: &Record, numerator: &str, denominator: &str) -> Option<Vec<f64>> {
    let num = field_f64(record, numerator)?;
    let den = field_f64(record, denominator)?;
    Some(
        num.iter()
            .zip(den.iter())
            .map(|(&n, &d)| n.atan2(d))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_group() {
        assert_eq!(classify_group("time"), GroupKind::Time);
        assert_eq!(classify_group("position"), GroupKind::Position);
        assert_eq!(classify_group("ID"), GroupKind::Trajectory);
        assert_eq!(classify_group("x"), GroupKind::Trajectory);
        assert_eq!(classify_group("mystery"), GroupKind::Unknown);
    }

    #[test]
    fn test_field_policy() {
        assert_eq!(FieldPolicy::from_creator("GPT"), FieldPolicy::StrictVocabulary);
        assert_eq!(
            FieldPolicy::from_creator(RETAIN_ALL_CREATOR),
            FieldPolicy::RetainAll
        );
        assert!(FieldPolicy::StrictVocabulary.retains("Bx"));
        assert!(!FieldPolicy::StrictVocabulary.retains("custom_col"));
        assert!(FieldPolicy::RetainAll.retains("custom_col"));
    }

    #[test]
    fn test_derived_xp_without_yp() {
        let mut record = Record::new();
        record.insert("Bx", FieldValue::Float64(vec![0.1, 0.2]));
        record.insert("Bz", FieldValue::Float64(vec![0.9, 0.8]));
        apply_derived(&mut record, &PhysicalConstants::si());

        let xp = record.get("xp").unwrap().to_f64_vec().unwrap();
        assert_eq!(xp.len(), 2);
        assert!((xp[0] - 0.1f64.atan2(0.9)).abs() < 1e-15);
        assert!((xp[1] - 0.2f64.atan2(0.8)).abs() < 1e-15);
        assert!(!record.contains("yp"));
        assert!(!record.contains("KE"));
    }

    #[test]
    fn test_derived_kinetic_energy() {
        let constants = PhysicalConstants::si();
        let mut record = Record::new();
        record.insert("G", FieldValue::Float64(vec![1.0, 2.0]));
        record.insert("m", FieldValue::Float64(vec![9.109_383_7015e-31]));
        apply_derived(&mut record, &constants);

        let ke = record.get("KE").unwrap().to_f64_vec().unwrap();
        assert_eq!(ke.len(), 2);
        assert_eq!(ke[0], 0.0);
        // (gamma - 1) m c^2 / e for gamma = 2 is one electron rest energy, ~511 keV
        assert!((ke[1] - 510_998.95).abs() < 1.0);
    }

    #[test]
    fn test_derived_skipped_without_mass() {
        let mut record = Record::new();
        record.insert("G", FieldValue::Float64(vec![2.0]));
        apply_derived(&mut record, &PhysicalConstants::si());
        assert!(!record.contains("KE"));
    }

    #[test]
    fn test_derived_does_not_replace() {
        let mut record = Record::new();
        record.insert("Bx", FieldValue::Float64(vec![1.0]));
        record.insert("Bz", FieldValue::Float64(vec![1.0]));
        record.insert("xp", FieldValue::Float64(vec![42.0]));
        apply_derived(&mut record, &PhysicalConstants::si());
        assert_eq!(record.get("xp"), Some(&FieldValue::Float64(vec![42.0])));
    }

    #[test]
    fn test_derived_from_integer_momentum() {
        // Momentum components of any numeric width participate.
        let mut record = Record::new();
        record.insert("Bx", FieldValue::Int32(vec![1]));
        record.insert("Bz", FieldValue::Int32(vec![1]));
        apply_derived(&mut record, &PhysicalConstants::si());
        let xp = record.get("xp").unwrap().to_f64_vec().unwrap();
        assert!((xp[0] - std::f64::consts::FRAC_PI_4).abs() < 1e-15);
    }
}
