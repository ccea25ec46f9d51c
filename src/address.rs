//! Simulated address arithmetic.
//!
//! Addresses are presentational only: a base value plus a byte offset,
//! rendered as uppercase hexadecimal with a `0x` prefix. No memory is read
//! or written.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::index::byte_offset;
use crate::{LayoutError, Result};

/// Simulated base pointer of a conceptual buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BaseAddress(pub usize);

/// Base address used when the caller does not supply one.
pub const DEFAULT_BASE_ADDRESS: BaseAddress = BaseAddress(0x100);

impl Default for BaseAddress {
    fn default() -> Self {
        DEFAULT_BASE_ADDRESS
    }
}

impl BaseAddress {
    /// Format `self + offset` as a hexadecimal address.
    ///
    /// # Errors
    /// Returns [`LayoutError::SizeOverflow`] if the sum does not fit in `usize`.
    pub fn offset_by(self, offset: usize) -> Result<String> {
        let addr = self
            .0
            .checked_add(offset)
            .ok_or(LayoutError::SizeOverflow)?;
        Ok(format_hex(addr))
    }

    /// Address of the element at `index` under `strides`.
    pub fn element(self, index: &[usize], strides: &[usize]) -> Result<String> {
        self.offset_by(byte_offset(index, strides)?)
    }
}

#[inline]
fn format_hex(value: usize) -> String {
    format!("0x{value:X}")
}

impl FromStr for BaseAddress {
    type Err = LayoutError;

    /// Parse a hexadecimal address, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        usize::from_str_radix(digits, 16)
            .map(BaseAddress)
            .map_err(|_| LayoutError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for BaseAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl Serialize for BaseAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Simulated address of a precomputed byte offset from a hexadecimal base.
///
/// # Example
/// ```rust
/// use strided_layout::address;
///
/// assert_eq!(address(20, "0x100").unwrap(), "0x114");
/// ```
///
/// # Errors
/// - [`LayoutError::InvalidAddress`] if `base` is not hexadecimal
/// - [`LayoutError::SizeOverflow`] if the sum does not fit in `usize`
pub fn address(offset: usize, base: &str) -> Result<String> {
    base.parse::<BaseAddress>()?.offset_by(offset)
}
