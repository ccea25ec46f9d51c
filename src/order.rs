use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Traversal order used to derive canonical strides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Order {
    /// C order: the last axis varies fastest.
    #[default]
    #[serde(rename = "C")]
    RowMajor,
    /// Fortran order: the first axis varies fastest.
    #[serde(rename = "F")]
    ColumnMajor,
}

impl Order {
    /// Single-letter tag, `'C'` or `'F'`.
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Order::RowMajor => 'C',
            Order::ColumnMajor => 'F',
        }
    }

    /// Axis visiting sequence from fastest- to slowest-varying.
    pub(crate) fn fastest_first(self, rank: usize) -> impl Iterator<Item = usize> {
        let (start, step_back) = match self {
            Order::RowMajor => (rank, true),
            Order::ColumnMajor => (0, false),
        };
        (0..rank).map(move |k| if step_back { start - 1 - k } else { k })
    }
}

impl FromStr for Order {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c" | "row-major" | "rowmajor" => Ok(Order::RowMajor),
            "f" | "column-major" | "columnmajor" => Ok(Order::ColumnMajor),
            _ => Err(LayoutError::InvalidOrder(s.to_string())),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
