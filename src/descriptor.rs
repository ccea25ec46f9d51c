//! Immutable array descriptor and its single-pass builder.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::address::BaseAddress;
use crate::contiguity::Flags;
use crate::index::{byte_offset, to_flat_index, to_nd_index, unravel};
use crate::shape::{check_bounds, size_of, validate_dims, validate_shape};
use crate::strides::{compute_strides, format_tuple};
use crate::{DType, Dims, LayoutError, Order, Result};

/// Everything needed to interpret the buffer `0..size` as an N-dimensional
/// array.
///
/// A descriptor is a value: it owns its shape and strides and is never
/// mutated. A new `(shape, dtype, order)` triple means a new descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayDescriptor {
    ndim: usize,
    shape: Dims,
    strides: Dims,
    size: usize,
    itemsize: usize,
    nbytes: usize,
    dtype: DType,
    order: Order,
    flags: Flags,
    base_address: BaseAddress,
}

/// Build a descriptor from a possibly malformed shape.
///
/// Pipeline: validate shape, resolve itemsize, compute size and nbytes,
/// compute strides, compute flags. Nothing is published on failure.
///
/// # Errors
/// - [`LayoutError::InvalidShape`] if any axis is `<= 0`
/// - [`LayoutError::SizeOverflow`] if the byte count does not fit in `usize`
pub fn build_descriptor(shape: &[i64], dtype: DType, order: Order) -> Result<ArrayDescriptor> {
    let dims = validate_shape(shape)?;
    ArrayDescriptor::assemble(dims, dtype, order)
}

impl ArrayDescriptor {
    /// Build a descriptor from unsigned extents.
    ///
    /// # Errors
    /// Same as [`build_descriptor`]; a zero extent is an invalid shape.
    pub fn new(shape: &[usize], dtype: DType, order: Order) -> Result<Self> {
        validate_dims(shape)?;
        Self::assemble(Dims::from_slice(shape), dtype, order)
    }

    fn assemble(shape: Dims, dtype: DType, order: Order) -> Result<Self> {
        let itemsize = dtype.itemsize();
        let size = size_of(&shape)?;
        let nbytes = size
            .checked_mul(itemsize)
            .ok_or(LayoutError::SizeOverflow)?;
        let strides = compute_strides(&shape, itemsize, order)?;
        let flags = Flags::from_layout(&shape, &strides, itemsize);

        tracing::debug!(
            shape = ?shape.as_slice(),
            %dtype,
            %order,
            strides = ?strides.as_slice(),
            c_contiguous = flags.c_contiguous,
            f_contiguous = flags.f_contiguous,
            "built array descriptor"
        );

        Ok(Self {
            ndim: shape.len(),
            shape,
            strides,
            size,
            itemsize,
            nbytes,
            dtype,
            order,
            flags,
            base_address: BaseAddress::default(),
        })
    }

    /// Same layout placed at a different simulated base address.
    pub fn with_base_address(self, base_address: BaseAddress) -> Self {
        Self {
            base_address,
            ..self
        }
    }

    /// Returns the number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Returns the extent of each axis.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the byte stride of each axis.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    #[inline]
    pub fn nbytes(&self) -> usize {
        self.nbytes
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[inline]
    pub fn base_address(&self) -> BaseAddress {
        self.base_address
    }

    /// The conceptual buffer: element positions `0..size`.
    #[inline]
    pub fn buffer(&self) -> Range<usize> {
        0..self.size
    }

    /// Iterate `(flat, coordinate)` pairs in memory order.
    pub fn elements(&self) -> impl Iterator<Item = (usize, Dims)> + '_ {
        self.buffer()
            .map(move |flat| (flat, unravel(flat, &self.shape, self.order)))
    }

    /// Flat index of the element at `index`.
    pub fn flat_index(&self, index: &[usize]) -> Result<usize> {
        to_flat_index(index, &self.shape, &self.strides, self.itemsize)
    }

    /// Coordinate vector of the element at flat position `flat`.
    pub fn nd_index(&self, flat: usize) -> Result<Dims> {
        to_nd_index(flat, &self.shape, self.order)
    }

    /// Byte offset of the element at `index`, bounds checked.
    pub fn byte_offset(&self, index: &[usize]) -> Result<usize> {
        check_bounds(index, &self.shape)?;
        byte_offset(index, &self.strides)
    }

    /// Simulated address of the element at `index`.
    pub fn address_of(&self, index: &[usize]) -> Result<String> {
        self.base_address.offset_by(self.byte_offset(index)?)
    }

    /// Simulated address of the element at flat position `flat`.
    pub fn address_of_flat(&self, flat: usize) -> Result<String> {
        if flat >= self.size {
            return Err(LayoutError::FlatIndexOutOfRange {
                index: flat,
                size: self.size,
            });
        }
        // In range, so flat * itemsize <= nbytes.
        self.base_address.offset_by(flat * self.itemsize)
    }
}

fn py_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for ArrayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ndim: {}", self.ndim)?;
        writeln!(f, "shape: {}", format_tuple(&self.shape))?;
        writeln!(f, "size: {}", self.size)?;
        writeln!(f, "dtype: {}", self.dtype)?;
        writeln!(f, "itemsize: {} bytes", self.itemsize)?;
        writeln!(f, "nbytes: {} bytes", self.nbytes)?;
        writeln!(f, "strides: {}", format_tuple(&self.strides))?;
        writeln!(f, "order: {}", self.order)?;
        writeln!(f, "flags:")?;
        writeln!(f, "  C_CONTIGUOUS : {}", py_bool(self.flags.c_contiguous))?;
        writeln!(f, "  F_CONTIGUOUS : {}", py_bool(self.flags.f_contiguous))?;
        writeln!(f, "  OWNDATA : {}", py_bool(self.flags.owndata))?;
        writeln!(f, "  WRITEABLE : {}", py_bool(self.flags.writeable))?;
        write!(f, "data: ({}, False)", self.base_address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_order_descriptor() {
        let desc = build_descriptor(&[2, 3, 4], DType::Int32, Order::RowMajor).unwrap();
        assert_eq!(desc.ndim(), 3);
        assert_eq!(desc.size(), 24);
        assert_eq!(desc.itemsize(), 4);
        assert_eq!(desc.nbytes(), 96);
        assert_eq!(desc.strides(), &[48, 16, 4]);
        assert!(desc.flags().c_contiguous);
        assert!(!desc.flags().f_contiguous);
    }

    #[test]
    fn test_f_order_descriptor() {
        let desc = build_descriptor(&[2, 3, 4], DType::Int32, Order::ColumnMajor).unwrap();
        assert_eq!(desc.strides(), &[4, 8, 24]);
        assert!(desc.flags().f_contiguous);
        assert!(!desc.flags().c_contiguous);
    }

    #[test]
    fn test_scalar_descriptor() {
        let desc = build_descriptor(&[], DType::Float64, Order::RowMajor).unwrap();
        assert_eq!(desc.ndim(), 0);
        assert_eq!(desc.size(), 1);
        assert_eq!(desc.nbytes(), 8);
        assert!(desc.strides().is_empty());
        assert!(desc.flags().c_contiguous && desc.flags().f_contiguous);
        assert_eq!(desc.flat_index(&[]).unwrap(), 0);
    }

    #[test]
    fn test_invalid_shape_publishes_nothing() {
        assert_eq!(
            build_descriptor(&[3, -2], DType::Int8, Order::RowMajor),
            Err(LayoutError::InvalidShape {
                axis: 1,
                extent: -2
            })
        );
        assert_eq!(
            ArrayDescriptor::new(&[0], DType::Int8, Order::RowMajor),
            Err(LayoutError::InvalidShape { axis: 0, extent: 0 })
        );
    }

    #[test]
    fn test_nbytes_overflow() {
        assert_eq!(
            ArrayDescriptor::new(&[usize::MAX / 2], DType::Int64, Order::RowMajor),
            Err(LayoutError::SizeOverflow)
        );
    }

    #[test]
    fn test_owns_shape() {
        let mut shape = vec![2i64, 3];
        let desc = build_descriptor(&shape, DType::Int16, Order::RowMajor).unwrap();
        shape[0] = 7;
        assert_eq!(desc.shape(), &[2, 3]);
    }

    #[test]
    fn test_elements_in_memory_order() {
        let desc = ArrayDescriptor::new(&[2, 3], DType::Float32, Order::ColumnMajor).unwrap();
        let coords: Vec<Vec<usize>> = desc.elements().map(|(_, nd)| nd.to_vec()).collect();
        assert_eq!(
            coords,
            vec![
                vec![0, 0],
                vec![1, 0],
                vec![0, 1],
                vec![1, 1],
                vec![0, 2],
                vec![1, 2]
            ]
        );
        for (flat, nd) in desc.elements() {
            assert_eq!(desc.flat_index(&nd).unwrap(), flat);
        }
    }

    #[test]
    fn test_addresses() {
        let desc = ArrayDescriptor::new(&[2, 3], DType::Float32, Order::RowMajor).unwrap();
        assert_eq!(desc.address_of(&[0, 0]).unwrap(), "0x100");
        assert_eq!(desc.address_of(&[1, 2]).unwrap(), "0x114");
        assert_eq!(desc.address_of_flat(5).unwrap(), "0x114");
        assert!(desc.address_of(&[2, 0]).is_err());
        assert!(desc.address_of_flat(6).is_err());

        let moved = desc.with_base_address(BaseAddress(0x2000));
        assert_eq!(moved.address_of(&[0, 1]).unwrap(), "0x2004");
    }

    #[test]
    fn test_display() {
        let desc = ArrayDescriptor::new(&[5], DType::Int8, Order::RowMajor).unwrap();
        let text = desc.to_string();
        assert!(text.contains("shape: (5,)"));
        assert!(text.contains("strides: (1,)"));
        assert!(text.contains("C_CONTIGUOUS : True"));
        assert!(text.contains("F_CONTIGUOUS : True"));
        assert!(text.ends_with("data: (0x100, False)"));
    }

    #[test]
    fn test_serialize_json() {
        let desc = ArrayDescriptor::new(&[2, 3], DType::Float32, Order::RowMajor).unwrap();
        let value = serde_json::to_value(&desc).unwrap();
        assert_eq!(value["ndim"], 2);
        assert_eq!(value["strides"], serde_json::json!([12, 4]));
        assert_eq!(value["dtype"], "float32");
        assert_eq!(value["order"], "C");
        assert_eq!(value["flags"]["c_contiguous"], true);
        assert_eq!(value["base_address"], "0x100");
    }
}
