//! Variable-length collections of fixed-dimension points, packed into a single flat `f64`
//! buffer instead of one allocation per point.
//!
//! A [`PointCollection`] stores its points interleaved (`xyxyxy` for 2D) in a
//! [`PackedBuffer`]. Points are addressed by their offset in that buffer. Removing a point
//! leaves a hole rather than shifting its neighbours, and every full-collection scan
//! ([`PointCollection::extent`], [`PointCollection::unpack`], [`PointCollection::iter`]) walks
//! only the live ranges of the buffer.
//!
//! ```
//! use packed_points::{Extent, PointCollection};
//!
//! let mut points = PointCollection::pack(&[[1., 2.], [3., 4.], [5., 6.]], None, None);
//! points.remove(2);
//!
//! assert_eq!(points.unpack(), vec![vec![1., 2.], vec![5., 6.]]);
//! assert_eq!(points.extent(), Extent::new(1., 2., 5., 6.));
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub use buffer::PackedBuffer;
pub use collection::{PointCollection, DEFAULT_DIM};
pub use extent::Extent;
pub use range_set::RangeSet;
pub use trait_::IntoArrow;

pub mod buffer;
pub mod collection;
pub mod error;
pub mod extent;
pub mod range_set;
pub mod scalar;
pub mod trait_;
