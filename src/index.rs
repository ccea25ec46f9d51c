//! Conversion between flat indices and coordinate vectors.
//!
//! Both directions are bounds checked: an out-of-range input is reported as
//! an error instead of producing a plausible-looking but wrong position.
//!
//! [`to_nd_index`] inverts [`to_flat_index`] only for canonical layouts,
//! i.e. when the strides were produced by
//! [`compute_strides`](crate::compute_strides) for the same shape, item size
//! and order.

use crate::shape::{check_bounds, size_of};
use crate::{Dims, LayoutError, Order, Result};

/// Byte offset of a coordinate vector: `sum(index[i] * strides[i])`.
///
/// # Errors
/// - [`LayoutError::StrideLengthMismatch`] if `index` and `strides` differ in length
/// - [`LayoutError::SizeOverflow`] if the offset does not fit in `usize`
pub fn byte_offset(index: &[usize], strides: &[usize]) -> Result<usize> {
    if index.len() != strides.len() {
        return Err(LayoutError::StrideLengthMismatch);
    }
    index
        .iter()
        .zip(strides)
        .try_fold(0usize, |acc, (&i, &s)| {
            i.checked_mul(s).and_then(|term| acc.checked_add(term))
        })
        .ok_or(LayoutError::SizeOverflow)
}

/// Convert a coordinate vector to a flat (element) index.
///
/// Computes `sum(index[i] * strides[i]) / itemsize` after checking every
/// coordinate against `shape`.
///
/// # Errors
/// - [`LayoutError::RankMismatch`] if `index.len() != shape.len()`
/// - [`LayoutError::StrideLengthMismatch`] if `strides.len() != shape.len()`
/// - [`LayoutError::IndexOutOfRange`] if a coordinate is outside `[0, shape[i])`
/// - [`LayoutError::MisalignedOffset`] if the byte offset is not a multiple of `itemsize`
/// - [`LayoutError::FlatIndexOutOfRange`] if the strides reach past the buffer
pub fn to_flat_index(
    index: &[usize],
    shape: &[usize],
    strides: &[usize],
    itemsize: usize,
) -> Result<usize> {
    if itemsize == 0 {
        return Err(LayoutError::ZeroItemSize);
    }
    if strides.len() != shape.len() {
        return Err(LayoutError::StrideLengthMismatch);
    }
    check_bounds(index, shape)?;

    let offset = byte_offset(index, strides)?;
    if offset % itemsize != 0 {
        return Err(LayoutError::MisalignedOffset { offset, itemsize });
    }
    let flat = offset / itemsize;
    let size = size_of(shape)?;
    if flat >= size {
        return Err(LayoutError::FlatIndexOutOfRange { index: flat, size });
    }
    tracing::trace!(?index, flat, "coordinate to flat index");
    Ok(flat)
}

/// Convert a flat index to a coordinate vector under the canonical layout
/// for `order`.
///
/// Row-major peels axes from last to first, column-major from first to
/// last; at each axis the coordinate is the remainder and the quotient
/// carries on.
///
/// # Errors
/// - [`LayoutError::FlatIndexOutOfRange`] if `flat >= size`
/// - [`LayoutError::SizeOverflow`] if the shape's size does not fit in `usize`
pub fn to_nd_index(flat: usize, shape: &[usize], order: Order) -> Result<Dims> {
    let size = size_of(shape)?;
    if flat >= size {
        return Err(LayoutError::FlatIndexOutOfRange { index: flat, size });
    }

    let index = unravel(flat, shape, order);
    tracing::trace!(flat, ?index, "flat index to coordinate");
    Ok(index)
}

/// Remainder/quotient walk behind [`to_nd_index`]; `flat` must be in range
/// and every extent positive.
pub(crate) fn unravel(flat: usize, shape: &[usize], order: Order) -> Dims {
    let mut index = Dims::from_elem(0, shape.len());
    let mut current = flat;
    for axis in order.fastest_first(shape.len()) {
        let extent = shape[axis];
        index[axis] = current % extent;
        current /= extent;
    }
    index
}
