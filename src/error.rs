//! Defines [`PackedPointsError`], representing all errors returned by this crate.

use arrow_schema::ArrowError;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PackedPointsError {
    /// A point did not have the number of coordinates the collection stores per point.
    #[error("Expected a point with {expected} coordinates, got {found}")]
    DimensionMismatch {
        /// The collection's dimension.
        expected: usize,
        /// The length of the offending point.
        found: usize,
    },

    /// A dimension that cannot describe a point.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(usize),

    /// An offset that is not a multiple of the dimension.
    #[error("Offset {offset} is not a multiple of dimension {dim}")]
    MisalignedOffset { offset: usize, dim: usize },

    /// An access of `len` elements at `offset` would leave the underlying storage.
    #[error("Access of {len} elements at offset {offset} exceeds buffer capacity {capacity}")]
    OffsetOutOfBounds {
        offset: usize,
        len: usize,
        capacity: usize,
    },

    /// A buffer was too small to hold the given points.
    #[error("Capacity {capacity} is smaller than the {required} elements required")]
    InsufficientCapacity { capacity: usize, required: usize },

    /// A removal touched elements that were already free.
    #[error("Cannot remove {len} elements at offset {offset}: range is not entirely live")]
    RemoveHole { offset: usize, len: usize },

    /// An empty extent has no rectangle.
    #[error("Extent is empty")]
    EmptyExtent,

    /// General error.
    #[error("General error: {0}")]
    General(String),

    /// [ArrowError]
    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, PackedPointsError>;
