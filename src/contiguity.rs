//! Contiguity detection from shape, strides and item size.
//!
//! Flags are derived from the stride pattern itself, never from the order
//! tag, so a layout can be both C- and F-contiguous (rank <= 1, or at most
//! one axis longer than 1) or neither.

use serde::Serialize;

use crate::Order;

/// Layout flags of an array descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Flags {
    pub c_contiguous: bool,
    pub f_contiguous: bool,
    pub owndata: bool,
    pub writeable: bool,
}

impl Flags {
    /// Compute contiguity flags for an owning, writeable array.
    pub fn from_layout(shape: &[usize], strides: &[usize], itemsize: usize) -> Self {
        Self {
            c_contiguous: is_c_contiguous(shape, strides, itemsize),
            f_contiguous: is_f_contiguous(shape, strides, itemsize),
            owndata: true,
            writeable: true,
        }
    }
}

fn is_contiguous_in(order: Order, shape: &[usize], strides: &[usize], itemsize: usize) -> bool {
    if shape.len() != strides.len() {
        return false;
    }
    let mut expected = Some(itemsize);
    for axis in order.fastest_first(shape.len()) {
        // Singleton axes impose no constraint.
        if shape[axis] <= 1 {
            continue;
        }
        match expected {
            Some(e) if strides[axis] == e => {}
            _ => return false,
        }
        expected = expected.and_then(|e| e.checked_mul(shape[axis]));
    }
    true
}

/// Check whether the layout is contiguous in row-major order.
pub fn is_c_contiguous(shape: &[usize], strides: &[usize], itemsize: usize) -> bool {
    is_contiguous_in(Order::RowMajor, shape, strides, itemsize)
}

/// Check whether the layout is contiguous in column-major order.
pub fn is_f_contiguous(shape: &[usize], strides: &[usize], itemsize: usize) -> bool {
    is_contiguous_in(Order::ColumnMajor, shape, strides, itemsize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_layout() {
        assert!(is_c_contiguous(&[2, 3, 4], &[48, 16, 4], 4));
        assert!(!is_f_contiguous(&[2, 3, 4], &[48, 16, 4], 4));
    }

    #[test]
    fn test_f_layout() {
        assert!(is_f_contiguous(&[2, 3, 4], &[4, 8, 24], 4));
        assert!(!is_c_contiguous(&[2, 3, 4], &[4, 8, 24], 4));
    }

    #[test]
    fn test_one_dimensional_is_both() {
        assert!(is_c_contiguous(&[5], &[8], 8));
        assert!(is_f_contiguous(&[5], &[8], 8));
    }

    #[test]
    fn test_singleton_axes_ignored() {
        // Stride values on length-1 axes are arbitrary.
        assert!(is_c_contiguous(&[1, 1, 7], &[999, 3, 1], 1));
        assert!(is_f_contiguous(&[1, 1, 7], &[999, 3, 1], 1));
    }

    #[test]
    fn test_rank_zero_is_both() {
        assert!(is_c_contiguous(&[], &[], 4));
        assert!(is_f_contiguous(&[], &[], 4));
    }

    #[test]
    fn test_gapped_layout_is_neither() {
        // Every other row of a 4x3 int8 matrix.
        assert!(!is_c_contiguous(&[2, 3], &[6, 1], 1));
        assert!(!is_f_contiguous(&[2, 3], &[6, 1], 1));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!is_c_contiguous(&[2, 3], &[3], 1));
    }

    #[test]
    fn test_flags_from_layout() {
        let flags = Flags::from_layout(&[3, 1], &[8, 8], 8);
        assert!(flags.c_contiguous);
        assert!(flags.f_contiguous);
        assert!(flags.owndata);
        assert!(flags.writeable);
    }
}
