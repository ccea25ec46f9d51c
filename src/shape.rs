//! Shape validation and size helpers.

use crate::{Dims, LayoutError, Result};

/// Validate a shape and convert it to per-axis extents.
///
/// Every axis must have a positive extent. An empty shape is accepted and
/// denotes a 0-dimensional array of size 1.
///
/// # Errors
/// Returns [`LayoutError::InvalidShape`] for the first axis with extent `<= 0`.
pub fn validate_shape(shape: &[i64]) -> Result<Dims> {
    let mut dims = Dims::with_capacity(shape.len());
    for (axis, &extent) in shape.iter().enumerate() {
        if extent <= 0 {
            tracing::debug!(axis, extent, "rejected shape");
            return Err(LayoutError::InvalidShape { axis, extent });
        }
        let extent = usize::try_from(extent).map_err(|_| LayoutError::SizeOverflow)?;
        dims.push(extent);
    }
    Ok(dims)
}

/// Validate an already unsigned shape: only zero extents are rejected.
pub(crate) fn validate_dims(shape: &[usize]) -> Result<()> {
    match shape.iter().position(|&d| d == 0) {
        Some(axis) => {
            tracing::debug!(axis, "rejected shape with zero extent");
            Err(LayoutError::InvalidShape { axis, extent: 0 })
        }
        None => Ok(()),
    }
}

/// Number of elements: the product of all extents, 1 for an empty shape.
///
/// # Errors
/// Returns [`LayoutError::SizeOverflow`] if the product does not fit in `usize`.
pub fn size_of(shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(LayoutError::SizeOverflow)
}

/// Check that `index` addresses an element of `shape` without failing.
pub fn indices_in_bounds(index: &[usize], shape: &[usize]) -> bool {
    index.len() == shape.len() && index.iter().zip(shape).all(|(&i, &d)| i < d)
}

/// Check `index` against `shape`, reporting the first offending axis.
pub(crate) fn check_bounds(index: &[usize], shape: &[usize]) -> Result<()> {
    if index.len() != shape.len() {
        return Err(LayoutError::RankMismatch(index.len(), shape.len()));
    }
    for (axis, (&i, &extent)) in index.iter().zip(shape).enumerate() {
        if i >= extent {
            return Err(LayoutError::IndexOutOfRange {
                axis,
                index: i,
                extent,
            });
        }
    }
    Ok(())
}
