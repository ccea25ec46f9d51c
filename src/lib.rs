//! Stride-based memory model for N-dimensional arrays.
//!
//! This crate describes how an N-dimensional array maps onto a linear,
//! byte-addressable buffer. Given a shape, an element type and a traversal
//! order it computes the stride vector, size metrics and contiguity flags, and
//! converts in both directions between flat positions and coordinates.
//!
//! The buffer is never allocated: it is the sequence `0..size`, and its
//! interpretation as an N-dimensional object is determined entirely by
//! shape, strides and order.
//!
//! # Core Types
//!
//! - [`ArrayDescriptor`]: Immutable aggregate for one `(shape, dtype, order)` triple
//! - [`DType`]: Element type tag with its byte width
//! - [`Order`]: Row-major (C) or column-major (F) traversal
//! - [`Flags`]: Contiguity and ownership flags
//!
//! # Primary API
//!
//! - [`build_descriptor`]: Validate a shape and assemble a descriptor
//! - [`to_flat_index`]: Coordinate vector to flat index (bounds checked)
//! - [`to_nd_index`]: Flat index to coordinate vector (bounds checked)
//! - [`address()`]: Simulated hexadecimal address for a byte offset
//!
//! # Example
//!
//! ```rust
//! use strided_layout::{build_descriptor, DType, Order};
//!
//! let desc = build_descriptor(&[2, 3, 4], DType::Int32, Order::RowMajor).unwrap();
//! assert_eq!(desc.strides(), &[48, 16, 4]);
//! assert!(desc.flags().c_contiguous);
//! assert!(!desc.flags().f_contiguous);
//!
//! let flat = desc.flat_index(&[1, 2, 3]).unwrap();
//! assert_eq!(flat, 23);
//! assert_eq!(desc.nd_index(flat).unwrap().as_slice(), &[1, 2, 3]);
//! ```
//!
//! # Column-major Example
//!
//! ```rust
//! use strided_layout::{build_descriptor, DType, Order};
//!
//! let desc = build_descriptor(&[2, 3], DType::Float32, Order::ColumnMajor).unwrap();
//! assert_eq!(desc.strides(), &[4, 8]);
//! assert_eq!(desc.nd_index(5).unwrap().as_slice(), &[1, 2]);
//! assert_eq!(desc.address_of(&[1, 2]).unwrap(), "0x114");
//! ```

use smallvec::SmallVec;

pub mod address;
pub mod contiguity;
mod descriptor;
mod dtype;
pub mod index;
mod order;
pub mod selection;
pub mod shape;
pub mod strides;

// ============================================================================
// Data model
// ============================================================================
pub use descriptor::{build_descriptor, ArrayDescriptor};
pub use dtype::DType;
pub use order::Order;

// ============================================================================
// Engine operations
// ============================================================================
pub use address::{address, BaseAddress, DEFAULT_BASE_ADDRESS};
pub use contiguity::{is_c_contiguous, is_f_contiguous, Flags};
pub use index::{to_flat_index, to_nd_index};
pub use shape::validate_shape;
pub use strides::compute_strides;

// ============================================================================
// UI-owned state
// ============================================================================
pub use selection::{HighlightSource, Selection};

/// Inline storage for per-axis quantities (shape, strides, coordinates).
///
/// Ranks up to 4 stay on the stack; higher ranks spill to the heap.
pub type Dims = SmallVec<[usize; 4]>;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur while building a layout or converting indices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A shape axis has a non-positive extent.
    #[error("invalid shape: axis {axis} has extent {extent}, expected > 0")]
    InvalidShape { axis: usize, extent: i64 },

    /// The dtype tag is not present in the registry.
    #[error("unsupported dtype: {0:?}")]
    UnsupportedDType(String),

    /// A coordinate component lies outside `[0, extent)`.
    #[error("index {index} is out of bounds for axis {axis} with extent {extent}")]
    IndexOutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },

    /// A flat index lies outside `[0, size)`.
    #[error("flat index {index} is out of bounds for size {size}")]
    FlatIndexOutOfRange { index: usize, size: usize },

    /// Coordinate vector length does not match the rank.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Stride vector length does not match the shape length.
    #[error("stride and shape length mismatch")]
    StrideLengthMismatch,

    /// A byte offset is not a multiple of the item size.
    #[error("byte offset {offset} is not a multiple of itemsize {itemsize}")]
    MisalignedOffset { offset: usize, itemsize: usize },

    /// Integer overflow while computing a size, stride or offset.
    #[error("integer overflow while computing layout")]
    SizeOverflow,

    /// Unknown traversal order tag.
    #[error("invalid order: {0:?}, expected 'C' or 'F'")]
    InvalidOrder(String),

    /// Base address is not a hexadecimal number.
    #[error("invalid base address: {0:?}")]
    InvalidAddress(String),

    /// Item size of zero bytes.
    #[error("itemsize must be positive")]
    ZeroItemSize,
}

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
