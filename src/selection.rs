//! Highlight and slice state owned by a presentation layer.
//!
//! The engine never holds this state. A UI keeps one [`Selection`], calls
//! its setters from pointer events, and the setters consult the stateless
//! engine so the coordinate view and the memory view point at the same
//! element.

use serde::Serialize;

use crate::{ArrayDescriptor, Dims, Result};

/// Which view the current highlight originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightSource {
    Memory,
    Grid,
}

/// One highlighted element, expressed in both coordinate systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub flat_index: usize,
    pub nd_index: Dims,
    pub source: HighlightSource,
}

/// Single-writer UI state: the hovered element and the visible axis-0 slice
/// of a rank-3 array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    highlight: Option<Highlight>,
    slice: usize,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn highlight(&self) -> Option<&Highlight> {
        self.highlight.as_ref()
    }

    #[inline]
    pub fn active_slice(&self) -> usize {
        self.slice
    }

    /// Pointer entered a memory cell.
    ///
    /// Leaves the state untouched on error.
    pub fn hover_memory(&mut self, desc: &ArrayDescriptor, flat: usize) -> Result<()> {
        let nd_index = desc.nd_index(flat)?;
        self.highlight = Some(Highlight {
            flat_index: flat,
            nd_index,
            source: HighlightSource::Memory,
        });
        Ok(())
    }

    /// Pointer entered a grid cell.
    ///
    /// Leaves the state untouched on error.
    pub fn hover_grid(&mut self, desc: &ArrayDescriptor, index: &[usize]) -> Result<()> {
        let flat_index = desc.flat_index(index)?;
        self.highlight = Some(Highlight {
            flat_index,
            nd_index: Dims::from_slice(index),
            source: HighlightSource::Grid,
        });
        Ok(())
    }

    /// Pointer left every cell.
    pub fn clear(&mut self) {
        self.highlight = None;
    }

    /// Select the visible axis-0 slice, clamped to the last slice.
    ///
    /// Only rank-3 arrays are sliced; for any other rank the slice stays 0.
    pub fn set_slice(&mut self, desc: &ArrayDescriptor, slice: usize) {
        self.slice = match desc.shape() {
            [depth, _, _] => slice.min(depth - 1),
            _ => 0,
        };
    }

    /// Reconcile with a freshly built descriptor: drop the highlight and
    /// clamp the slice.
    pub fn reset_for(&mut self, desc: &ArrayDescriptor) {
        self.clear();
        self.set_slice(desc, self.slice);
    }

    /// Whether the element at `flat` is in the visible slice.
    ///
    /// Every element is visible unless the array has rank 3. Out-of-range
    /// positions are never visible.
    pub fn in_active_slice(&self, desc: &ArrayDescriptor, flat: usize) -> bool {
        match desc.nd_index(flat) {
            Ok(nd) if desc.ndim() == 3 => nd[0] == self.slice,
            Ok(_) => true,
            Err(_) => false,
        }
    }

    /// Whether the element at `flat` is the highlighted one.
    pub fn is_highlighted(&self, flat: usize) -> bool {
        self.highlight
            .as_ref()
            .is_some_and(|h| h.flat_index == flat)
    }
}
