//! Defines shared traits.

use arrow_array::Array;

/// Convert into an [arrow][arrow_array] array.
pub trait IntoArrow {
    /// The type of arrow array that this can be converted into.
    type ArrowArray: Array;

    /// Converts this into an arrow array.
    fn into_arrow(self) -> Self::ArrowArray;
}
