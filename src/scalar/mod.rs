//! Contains scalars, which are references onto a [`PointCollection`][crate::PointCollection]'s
//! buffer at a specific offset.

pub use point::PackedPoint;

mod point;
