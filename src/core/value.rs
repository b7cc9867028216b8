// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Value type system for decoded GDF data.
//!
//! The wire format is self-describing: every block carries a type code that
//! selects one of the primitive element types below. A decoded block payload
//! becomes a [`FieldValue`], and a closed directory group becomes a
//! [`Record`] mapping field names to values in stream order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive element types a block payload can carry.
///
/// The discriminants match the low byte of the block type/flag word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    /// No payload (pure marker blocks)
    Undefined,
    /// Raw byte string (embedded ASCII names, text metadata)
    Ascii,
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    UInt8,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    UInt16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    UInt32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit unsigned integer
    UInt64,
    /// 32-bit float
    Float32,
    /// 64-bit float
    Float64,
}

impl ElementType {
    /// Decode an element type from the low byte of the type/flag word.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(ElementType::Undefined),
            0x01 => Some(ElementType::Ascii),
            0x02 => Some(ElementType::Int8),
            0x03 => Some(ElementType::UInt8),
            0x04 => Some(ElementType::Int16),
            0x05 => Some(ElementType::UInt16),
            0x06 => Some(ElementType::Int32),
            0x07 => Some(ElementType::UInt32),
            0x08 => Some(ElementType::Int64),
            0x09 => Some(ElementType::UInt64),
            0x0A => Some(ElementType::Float32),
            0x0B => Some(ElementType::Float64),
            _ => None,
        }
    }

    /// The wire code for this element type.
    pub const fn code(self) -> u8 {
        match self {
            ElementType::Undefined => 0x00,
            ElementType::Ascii => 0x01,
            ElementType::Int8 => 0x02,
            ElementType::UInt8 => 0x03,
            ElementType::Int16 => 0x04,
            ElementType::UInt16 => 0x05,
            ElementType::Int32 => 0x06,
            ElementType::UInt32 => 0x07,
            ElementType::Int64 => 0x08,
            ElementType::UInt64 => 0x09,
            ElementType::Float32 => 0x0A,
            ElementType::Float64 => 0x0B,
        }
    }

    /// Size of one element in bytes, if the type carries data.
    pub const fn size(self) -> Option<usize> {
        match self {
            ElementType::Undefined => None,
            ElementType::Ascii | ElementType::Int8 | ElementType::UInt8 => Some(1),
            ElementType::Int16 | ElementType::UInt16 => Some(2),
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => Some(4),
            ElementType::Int64 | ElementType::UInt64 | ElementType::Float64 => Some(8),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Undefined => "undefined",
            ElementType::Ascii => "ascii",
            ElementType::Int8 => "int8",
            ElementType::UInt8 => "uint8",
            ElementType::Int16 => "int16",
            ElementType::UInt16 => "uint16",
            ElementType::Int32 => "int32",
            ElementType::UInt32 => "uint32",
            ElementType::Int64 => "int64",
            ElementType::UInt64 => "uint64",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
        };
        write!(f, "{name}")
    }
}

/// A decoded block payload: one array per primitive element type.
///
/// Single-valued time-slice metadata is represented as a length-1 array, so
/// callers never need a separate scalar case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    /// Raw byte string (embedded ASCII)
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Number of elements in this value.
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Int8(v) => v.len(),
            FieldValue::UInt8(v) => v.len(),
            FieldValue::Int16(v) => v.len(),
            FieldValue::UInt16(v) => v.len(),
            FieldValue::Int32(v) => v.len(),
            FieldValue::UInt32(v) => v.len(),
            FieldValue::Int64(v) => v.len(),
            FieldValue::UInt64(v) => v.len(),
            FieldValue::Float32(v) => v.len(),
            FieldValue::Float64(v) => v.len(),
            FieldValue::Bytes(v) => v.len(),
        }
    }

    /// Check whether this value holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element type this value was decoded from.
    pub fn element_type(&self) -> ElementType {
        match self {
            FieldValue::Int8(_) => ElementType::Int8,
            FieldValue::UInt8(_) => ElementType::UInt8,
            FieldValue::Int16(_) => ElementType::Int16,
            FieldValue::UInt16(_) => ElementType::UInt16,
            FieldValue::Int32(_) => ElementType::Int32,
            FieldValue::UInt32(_) => ElementType::UInt32,
            FieldValue::Int64(_) => ElementType::Int64,
            FieldValue::UInt64(_) => ElementType::UInt64,
            FieldValue::Float32(_) => ElementType::Float32,
            FieldValue::Float64(_) => ElementType::Float64,
            FieldValue::Bytes(_) => ElementType::Ascii,
        }
    }

    /// Get the type name of this value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Int8(_) => "int8",
            FieldValue::UInt8(_) => "uint8",
            FieldValue::Int16(_) => "int16",
            FieldValue::UInt16(_) => "uint16",
            FieldValue::Int32(_) => "int32",
            FieldValue::UInt32(_) => "uint32",
            FieldValue::Int64(_) => "int64",
            FieldValue::UInt64(_) => "uint64",
            FieldValue::Float32(_) => "float32",
            FieldValue::Float64(_) => "float64",
            FieldValue::Bytes(_) => "bytes",
        }
    }

    /// Check if this value is numeric (anything except a byte string).
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldValue::Bytes(_))
    }

    /// Convert a numeric value to a vector of f64.
    ///
    /// Returns `None` for byte strings.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            FieldValue::Int8(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::UInt8(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::Int16(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::UInt16(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::Int32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::UInt32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::Int64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::UInt64(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::Float32(v) => Some(v.iter().map(|&x| x as f64).collect()),
            FieldValue::Float64(v) => Some(v.clone()),
            FieldValue::Bytes(_) => None,
        }
    }

    /// Get a single numeric element as f64.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self {
            FieldValue::Int8(v) => v.get(index).map(|&x| x as f64),
            FieldValue::UInt8(v) => v.get(index).map(|&x| x as f64),
            FieldValue::Int16(v) => v.get(index).map(|&x| x as f64),
            FieldValue::UInt16(v) => v.get(index).map(|&x| x as f64),
            FieldValue::Int32(v) => v.get(index).map(|&x| x as f64),
            FieldValue::UInt32(v) => v.get(index).map(|&x| x as f64),
            FieldValue::Int64(v) => v.get(index).map(|&x| x as f64),
            FieldValue::UInt64(v) => v.get(index).map(|&x| x as f64),
            FieldValue::Float32(v) => v.get(index).map(|&x| x as f64),
            FieldValue::Float64(v) => v.get(index).copied(),
            FieldValue::Bytes(_) => None,
        }
    }

    /// Get the single value of a scalar (length-1) field as f64.
    pub fn scalar_f64(&self) -> Option<f64> {
        if self.len() == 1 {
            self.get_f64(0)
        } else {
            None
        }
    }

    /// Interpret a byte-string value as UTF-8 text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Bytes(b) => Some(String::from_utf8_lossy(b).into_owned()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            other => write!(f, "[{} x {}]", other.len(), other.type_name()),
        }
    }
}

/// One assembled directory group: an ordered field-name to value mapping.
///
/// Insertion order is preserved so decoded output mirrors stream order and
/// two decodes of the same bytes compare equal field-for-field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Record { fields: Vec::new() }
    }

    /// Append a field. An existing field with the same name is kept
    /// unchanged; derived fields are additions, never replacements.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if !self.contains(&name) {
            self.fields.push((name, value));
        }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Check whether a field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_round_trip() {
        for code in 0x00..=0x0B {
            let ty = ElementType::from_code(code).unwrap();
            assert_eq!(ty.code(), code);
        }
        assert_eq!(ElementType::from_code(0x0C), None);
        assert_eq!(ElementType::from_code(0xFF), None);
    }

    #[test]
    fn test_element_type_size() {
        assert_eq!(ElementType::Undefined.size(), None);
        assert_eq!(ElementType::Ascii.size(), Some(1));
        assert_eq!(ElementType::Int16.size(), Some(2));
        assert_eq!(ElementType::Float32.size(), Some(4));
        assert_eq!(ElementType::Float64.size(), Some(8));
    }

    #[test]
    fn test_field_value_len_and_type() {
        let v = FieldValue::Float64(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert!(!v.is_empty());
        assert_eq!(v.element_type(), ElementType::Float64);
        assert_eq!(v.type_name(), "float64");
        assert!(v.is_numeric());
        assert!(!FieldValue::Bytes(vec![]).is_numeric());
    }

    #[test]
    fn test_to_f64_vec() {
        assert_eq!(
            FieldValue::Int32(vec![1, -2]).to_f64_vec(),
            Some(vec![1.0, -2.0])
        );
        assert_eq!(
            FieldValue::Float32(vec![0.5]).to_f64_vec(),
            Some(vec![0.5])
        );
        assert_eq!(FieldValue::Bytes(vec![0x41]).to_f64_vec(), None);
    }

    #[test]
    fn test_scalar_f64() {
        assert_eq!(FieldValue::Float64(vec![4.5]).scalar_f64(), Some(4.5));
        assert_eq!(FieldValue::Float64(vec![1.0, 2.0]).scalar_f64(), None);
        assert_eq!(FieldValue::Float64(vec![]).scalar_f64(), None);
    }

    #[test]
    fn test_as_text() {
        let v = FieldValue::Bytes(b"hello".to_vec());
        assert_eq!(v.as_text(), Some("hello".to_string()));
        assert_eq!(FieldValue::Int8(vec![]).as_text(), None);
    }

    #[test]
    fn test_record_insertion_order() {
        let mut rec = Record::new();
        rec.insert("z", FieldValue::Float64(vec![1.0]));
        rec.insert("a", FieldValue::Float64(vec![2.0]));
        rec.insert("m", FieldValue::Float64(vec![3.0]));
        let names: Vec<&str> = rec.names().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_record_insert_never_replaces() {
        let mut rec = Record::new();
        rec.insert("x", FieldValue::Float64(vec![1.0]));
        rec.insert("x", FieldValue::Float64(vec![9.0]));
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("x"), Some(&FieldValue::Float64(vec![1.0])));
    }

    #[test]
    fn test_record_serializes_as_map() {
        let mut rec = Record::new();
        rec.insert("ID", FieldValue::Int32(vec![7]));
        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.is_object());
        assert_eq!(json["ID"]["Int32"][0], 7);
    }

    #[test]
    fn test_field_value_serde_round_trip() {
        let v = FieldValue::Float64(vec![1.5, -2.5]);
        let json = serde_json::to_string(&v).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", FieldValue::Float64(vec![1.0, 2.0])),
            "[2 x float64]"
        );
        assert_eq!(format!("{}", FieldValue::Bytes(vec![1, 2, 3])), "<3 bytes>");
        assert_eq!(format!("{}", ElementType::Float64), "float64");
    }
}
