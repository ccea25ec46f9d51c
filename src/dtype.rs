//! Element type registry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Scalar element type of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

/// Tag and byte width for every supported dtype.
///
/// Read-only for the life of the process; lookups never synchronize.
static REGISTRY: [(DType, &str, usize); 6] = [
    (DType::Int8, "int8", 1),
    (DType::Int16, "int16", 2),
    (DType::Int32, "int32", 4),
    (DType::Int64, "int64", 8),
    (DType::Float32, "float32", 4),
    (DType::Float64, "float64", 8),
];

impl DType {
    /// Every supported dtype, in registry order.
    pub const ALL: [DType; 6] = [
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::Float32,
        DType::Float64,
    ];

    #[inline]
    fn entry(self) -> &'static (DType, &'static str, usize) {
        // Registry order matches discriminant order.
        &REGISTRY[self as usize]
    }

    /// Number of bytes occupied by one element.
    #[inline]
    pub fn itemsize(self) -> usize {
        self.entry().2
    }

    /// The dtype tag, e.g. `"float32"`.
    #[inline]
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Look up a dtype by tag.
    ///
    /// # Errors
    /// Returns [`LayoutError::UnsupportedDType`] if the tag is not registered.
    pub fn lookup(tag: &str) -> crate::Result<Self> {
        REGISTRY
            .iter()
            .find(|(_, name, _)| *name == tag)
            .map(|(dtype, _, _)| *dtype)
            .ok_or_else(|| LayoutError::UnsupportedDType(tag.to_string()))
    }
}

impl FromStr for DType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DType::lookup(s.trim())
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_itemsizes() {
        assert_eq!(DType::Int8.itemsize(), 1);
        assert_eq!(DType::Int16.itemsize(), 2);
        assert_eq!(DType::Int32.itemsize(), 4);
        assert_eq!(DType::Int64.itemsize(), 8);
        assert_eq!(DType::Float32.itemsize(), 4);
        assert_eq!(DType::Float64.itemsize(), 8);
    }

    #[test]
    fn test_registry_order_matches_all() {
        for (dtype, entry) in DType::ALL.iter().zip(REGISTRY.iter()) {
            assert_eq!(*dtype, entry.0);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(DType::lookup("float64").unwrap(), DType::Float64);
        assert_eq!("int16".parse::<DType>().unwrap(), DType::Int16);
    }

    #[test]
    fn test_lookup_unknown() {
        let err = DType::lookup("complex128").unwrap_err();
        assert_eq!(err, LayoutError::UnsupportedDType("complex128".into()));
    }

    #[test]
    fn test_display_roundtrip() {
        for dtype in DType::ALL {
            assert_eq!(dtype.to_string().parse::<DType>().unwrap(), dtype);
        }
    }

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&DType::Float32).unwrap();
        assert_eq!(json, "\"float32\"");
        let back: DType = serde_json::from_str("\"int8\"").unwrap();
        assert_eq!(back, DType::Int8);
    }
}
