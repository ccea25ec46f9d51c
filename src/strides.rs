//! Canonical stride computation.
//!
//! Strides are measured in bytes: `strides[i]` is the number of bytes to
//! advance along axis `i` while holding every other coordinate fixed.

use crate::{Dims, LayoutError, Order, Result};

/// Running-stride walk shared by both orders.
///
/// Visits axes from fastest- to slowest-varying; each axis takes the running
/// value, which is then scaled by that axis's extent.
fn running_strides(
    shape: &[usize],
    itemsize: usize,
    axes: impl Iterator<Item = usize>,
) -> Result<Dims> {
    if itemsize == 0 {
        return Err(LayoutError::ZeroItemSize);
    }
    let mut strides = Dims::from_elem(0, shape.len());
    // `None` once the running product overflows; only an error if another
    // axis still needs it.
    let mut stride = Some(itemsize);
    for axis in axes {
        let current = stride.ok_or(LayoutError::SizeOverflow)?;
        strides[axis] = current;
        stride = current.checked_mul(shape[axis]);
    }
    Ok(strides)
}

/// Compute row-major strides (C order: last index varies fastest).
pub fn row_major_strides(shape: &[usize], itemsize: usize) -> Result<Dims> {
    running_strides(shape, itemsize, Order::RowMajor.fastest_first(shape.len()))
}

/// Compute column-major strides (Fortran order: first index varies fastest).
pub fn col_major_strides(shape: &[usize], itemsize: usize) -> Result<Dims> {
    running_strides(shape, itemsize, Order::ColumnMajor.fastest_first(shape.len()))
}

/// Compute canonical byte strides for `shape` under `order`.
///
/// A rank-0 shape yields an empty stride vector.
///
/// # Errors
/// - [`LayoutError::ZeroItemSize`] if `itemsize == 0`
/// - [`LayoutError::SizeOverflow`] if a stride does not fit in `usize`
pub fn compute_strides(shape: &[usize], itemsize: usize, order: Order) -> Result<Dims> {
    match order {
        Order::RowMajor => row_major_strides(shape, itemsize),
        Order::ColumnMajor => col_major_strides(shape, itemsize),
    }
}

/// Convert byte strides to element strides.
///
/// # Errors
/// Returns [`LayoutError::MisalignedOffset`] if a stride is not a multiple of
/// `itemsize`.
pub fn strides_in_items(strides: &[usize], itemsize: usize) -> Result<Dims> {
    if itemsize == 0 {
        return Err(LayoutError::ZeroItemSize);
    }
    strides
        .iter()
        .map(|&s| {
            if s % itemsize == 0 {
                Ok(s / itemsize)
            } else {
                Err(LayoutError::MisalignedOffset {
                    offset: s,
                    itemsize,
                })
            }
        })
        .collect()
}

/// Render strides in element units, e.g. `"(3, 1)"`.
pub fn format_strides(strides: &[usize], itemsize: usize) -> Result<String> {
    let items = strides_in_items(strides, itemsize)?;
    Ok(format_tuple(&items))
}

/// Python-style tuple rendering: `()`, `(5,)`, `(2, 3)`.
pub(crate) fn format_tuple(values: &[usize]) -> String {
    match values {
        [] => "()".to_string(),
        [only] => format!("({only},)"),
        _ => {
            let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}
