//! [`PointCollection`], a set of fixed-dimension points packed into one flat buffer.

use log::debug;

use crate::buffer::PackedBuffer;
use crate::error::{PackedPointsError, Result};
use crate::extent::Extent;
use crate::scalar::PackedPoint;

mod arrow;

/// The dimension used when none is given and none can be inferred.
pub const DEFAULT_DIM: usize = 2;

/// A variable-length collection of points that all have the same dimension, stored
/// interleaved in a single [`PackedBuffer`] as `xyxyxy` (or `xyzxyz`, ...).
///
/// Points are addressed by *offset*: the index of their first coordinate in the buffer, which
/// is always a multiple of [`dim`][Self::dim]. Offsets returned by [`add`][Self::add] stay
/// valid until the point is [removed][Self::remove]; removing a point leaves a hole that every
/// scan over the collection skips.
///
/// Operations that validate their input come in pairs. The plain version panics on invalid
/// input, which is always a bug in the caller. The `try_` version returns a [`Result`]
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCollection {
    buffer: PackedBuffer,
    dim: usize,
}

fn check(buffer: &PackedBuffer, dim: usize) -> Result<()> {
    if dim == 0 {
        return Err(PackedPointsError::InvalidDimension(dim));
    }

    if buffer.count() % dim != 0 {
        return Err(PackedPointsError::General(format!(
            "live element count {} is not a multiple of dimension {dim}",
            buffer.count()
        )));
    }

    // Holes must sit on point boundaries; only a free tail may end off one.
    let len = buffer.capacity();
    for free in buffer.free_ranges().iter() {
        if free.start % dim != 0 {
            return Err(PackedPointsError::MisalignedOffset {
                offset: free.start,
                dim,
            });
        }
        if free.end % dim != 0 && free.end != len {
            return Err(PackedPointsError::MisalignedOffset {
                offset: free.end,
                dim,
            });
        }
    }

    Ok(())
}

impl PointCollection {
    /// Construct a new PointCollection over an existing buffer
    ///
    /// # Panics
    ///
    /// - if `dim` is zero
    /// - if the buffer's live element count is not a multiple of `dim`
    /// - if a free range of the buffer does not start and end on a multiple of `dim`, other
    ///   than the end of a free range reaching the end of the buffer
    pub fn new(buffer: PackedBuffer, dim: usize) -> Self {
        Self::try_new(buffer, dim).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Construct a new PointCollection over an existing buffer
    ///
    /// # Errors
    ///
    /// - if `dim` is zero
    /// - if the buffer's live element count is not a multiple of `dim`
    /// - if a free range of the buffer does not start and end on a multiple of `dim`, other
    ///   than the end of a free range reaching the end of the buffer
    pub fn try_new(buffer: PackedBuffer, dim: usize) -> Result<Self> {
        check(&buffer, dim)?;
        Ok(Self { buffer, dim })
    }

    /// Create an empty collection of points with `dim` coordinates each
    ///
    /// # Panics
    ///
    /// - if `dim` is zero
    pub fn empty(dim: usize) -> Self {
        Self::new(PackedBuffer::default(), dim)
    }

    /// Pack `points` into a new collection.
    ///
    /// `dim` defaults to the length of the first point, or [`DEFAULT_DIM`] when there are no
    /// points. `capacity` is the number of elements to allocate and defaults to exactly what
    /// the points need; any excess is left free for later [`add`][Self::add] calls.
    ///
    /// ```
    /// use packed_points::PointCollection;
    ///
    /// let points = PointCollection::pack(&[[1., 2.], [3., 4.]], None, None);
    /// assert_eq!(points.dim(), 2);
    /// assert_eq!(points.get(2), vec![3., 4.]);
    /// ```
    ///
    /// # Panics
    ///
    /// - if `capacity` is smaller than `points.len() * dim`
    /// - if any point does not have exactly `dim` coordinates
    pub fn pack<P: AsRef<[f64]>>(
        points: &[P],
        capacity: Option<usize>,
        dim: Option<usize>,
    ) -> Self {
        Self::try_pack(points, capacity, dim).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Pack `points` into a new collection.
    ///
    /// See [`pack`][Self::pack] for how `capacity` and `dim` are resolved.
    ///
    /// # Errors
    ///
    /// - if `capacity` is smaller than `points.len() * dim`
    /// - if any point does not have exactly `dim` coordinates
    pub fn try_pack<P: AsRef<[f64]>>(
        points: &[P],
        capacity: Option<usize>,
        dim: Option<usize>,
    ) -> Result<Self> {
        let dim = dim.unwrap_or_else(|| {
            points
                .first()
                .map_or(DEFAULT_DIM, |point| point.as_ref().len())
        });
        if dim == 0 {
            return Err(PackedPointsError::InvalidDimension(dim));
        }

        let required = points.len() * dim;
        let capacity = capacity.unwrap_or(required);
        if capacity < required {
            return Err(PackedPointsError::InsufficientCapacity { capacity, required });
        }

        let mut arr = Vec::with_capacity(capacity);
        for point in points {
            let point = point.as_ref();
            if point.len() != dim {
                return Err(PackedPointsError::DimensionMismatch {
                    expected: dim,
                    found: point.len(),
                });
            }
            arr.extend_from_slice(point);
        }
        debug_assert_eq!(arr.len(), required);

        if capacity > required {
            debug!(
                "packing {} points with {} spare elements",
                points.len(),
                capacity - required
            );
            arr.resize(capacity, 0.0);
        }

        Self::try_new(PackedBuffer::try_new(arr, required)?, dim)
    }

    /// The number of coordinates per point
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The number of live points
    pub fn len(&self) -> usize {
        self.buffer.count() / self.dim
    }

    /// Whether this collection holds no live points
    pub fn is_empty(&self) -> bool {
        self.buffer.count() == 0
    }

    /// The number of live coordinate values, i.e. `len() * dim()`
    pub fn count(&self) -> usize {
        self.buffer.count()
    }

    /// Access the underlying buffer
    pub fn buffer(&self) -> &PackedBuffer {
        &self.buffer
    }

    /// Consume this collection, returning its buffer
    pub fn into_buffer(self) -> PackedBuffer {
        self.buffer
    }

    fn check_point(&self, point: &[f64]) -> Result<()> {
        if point.len() != self.dim {
            return Err(PackedPointsError::DimensionMismatch {
                expected: self.dim,
                found: point.len(),
            });
        }
        Ok(())
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset % self.dim != 0 {
            return Err(PackedPointsError::MisalignedOffset {
                offset,
                dim: self.dim,
            });
        }
        Ok(())
    }

    /// Add a point and return its offset
    ///
    /// # Panics
    ///
    /// - if the point does not have exactly [`dim`][Self::dim] coordinates
    pub fn add(&mut self, point: &[f64]) -> usize {
        self.try_add(point).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Add a point and return its offset
    ///
    /// # Errors
    ///
    /// - if the point does not have exactly [`dim`][Self::dim] coordinates
    pub fn try_add(&mut self, point: &[f64]) -> Result<usize> {
        self.check_point(point)?;
        let offset = self.buffer.add(point);
        debug_assert_eq!(offset % self.dim, 0);
        Ok(offset)
    }

    /// Copy out the point at `offset`.
    ///
    /// This does not check whether the point has been removed.
    ///
    /// # Panics
    ///
    /// - if `offset` is not a multiple of [`dim`][Self::dim]
    /// - if the point would extend past the end of the buffer
    pub fn get(&self, offset: usize) -> Vec<f64> {
        self.point(offset).to_vec()
    }

    /// Copy out the point at `offset`.
    ///
    /// # Errors
    ///
    /// - if `offset` is not a multiple of [`dim`][Self::dim]
    /// - if the point would extend past the end of the buffer
    pub fn try_get(&self, offset: usize) -> Result<Vec<f64>> {
        Ok(self.try_point(offset)?.to_vec())
    }

    /// Borrow the point at `offset` without copying.
    ///
    /// # Panics
    ///
    /// - if `offset` is not a multiple of [`dim`][Self::dim]
    /// - if the point would extend past the end of the buffer
    pub fn point(&self, offset: usize) -> PackedPoint<'_> {
        self.try_point(offset).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Borrow the point at `offset` without copying.
    ///
    /// # Errors
    ///
    /// - if `offset` is not a multiple of [`dim`][Self::dim]
    /// - if the point would extend past the end of the buffer
    pub fn try_point(&self, offset: usize) -> Result<PackedPoint<'_>> {
        self.check_offset(offset)?;
        let arr = self.buffer.array();
        match offset.checked_add(self.dim) {
            Some(stop) if stop <= arr.len() => Ok(PackedPoint::new(&arr[offset..stop])),
            _ => Err(PackedPointsError::OffsetOutOfBounds {
                offset,
                len: self.dim,
                capacity: arr.len(),
            }),
        }
    }

    /// Overwrite the point at `offset` in place
    ///
    /// # Panics
    ///
    /// - if the point does not have exactly [`dim`][Self::dim] coordinates
    /// - if `offset` is not a multiple of [`dim`][Self::dim]
    /// - if the point would extend past the end of the buffer
    pub fn set(&mut self, offset: usize, point: &[f64]) {
        self.try_set(offset, point)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Overwrite the point at `offset` in place
    ///
    /// # Errors
    ///
    /// - if the point does not have exactly [`dim`][Self::dim] coordinates
    /// - if `offset` is not a multiple of [`dim`][Self::dim]
    /// - if the point would extend past the end of the buffer
    pub fn try_set(&mut self, offset: usize, point: &[f64]) -> Result<()> {
        self.check_point(point)?;
        self.check_offset(offset)?;
        self.buffer.try_set(point, offset)
    }

    /// Remove the point at `offset`, leaving a hole in the buffer.
    ///
    /// The offset must not be used again unless a later [`add`][Self::add] returns it.
    ///
    /// # Panics
    ///
    /// - if `offset` is not a multiple of [`dim`][Self::dim]
    /// - if the point would extend past the end of the buffer
    /// - if the point has already been removed
    pub fn remove(&mut self, offset: usize) {
        self.try_remove(offset)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Remove the point at `offset`, leaving a hole in the buffer.
    ///
    /// # Errors
    ///
    /// - if `offset` is not a multiple of [`dim`][Self::dim]
    /// - if the point would extend past the end of the buffer
    /// - if the point has already been removed
    pub fn try_remove(&mut self, offset: usize) -> Result<()> {
        self.check_offset(offset)?;
        self.buffer.try_remove(self.dim, offset)
    }

    /// The bounding box of the x/y coordinates of all live points.
    ///
    /// Coordinates past the second are ignored. Returns an empty extent if there are no live
    /// points.
    ///
    /// # Panics
    ///
    /// - if the collection has fewer than two dimensions
    pub fn extent(&self) -> Extent {
        self.try_extent().unwrap_or_else(|err| panic!("{err}"))
    }

    /// The bounding box of the x/y coordinates of all live points.
    ///
    /// # Errors
    ///
    /// - if the collection has fewer than two dimensions
    pub fn try_extent(&self) -> Result<Extent> {
        let dim = self.dim;
        if dim < 2 {
            return Err(PackedPointsError::InvalidDimension(dim));
        }

        let arr = self.buffer.array();
        let mut extent = Extent::empty();
        self.buffer.for_each_range(|start, stop| {
            for i in (start..stop).step_by(dim) {
                extent.extend_xy(arr[i], arr[i + 1]);
            }
        });
        Ok(extent)
    }

    /// Iterate over the live points and their offsets, in ascending offset order
    pub fn iter(&self) -> impl Iterator<Item = (usize, PackedPoint<'_>)> + '_ {
        let arr = self.buffer.array();
        let dim = self.dim;
        self.buffer.ranges().flat_map(move |range| {
            range
                .step_by(dim)
                .map(move |offset| (offset, PackedPoint::new(&arr[offset..offset + dim])))
        })
    }

    /// Copy all live points out of the buffer, in ascending offset order
    pub fn unpack(&self) -> Vec<Vec<f64>> {
        let n = self.len();
        let mut points = Vec::with_capacity(n);
        points.extend(self.iter().map(|(_, point)| point.to_vec()));
        assert_eq!(
            points.len(),
            n,
            "unpacked point count does not match the buffer's live element count"
        );
        points
    }
}

impl Default for PointCollection {
    fn default() -> Self {
        Self::empty(DEFAULT_DIM)
    }
}

impl From<&[geo::Coord]> for PointCollection {
    fn from(other: &[geo::Coord]) -> Self {
        let arr: Vec<f64> = other.iter().flat_map(|c| [c.x, c.y]).collect();
        Self::new(arr.into(), 2)
    }
}

impl From<Vec<geo::Coord>> for PointCollection {
    fn from(other: Vec<geo::Coord>) -> Self {
        other.as_slice().into()
    }
}

impl From<&[geo::Point]> for PointCollection {
    fn from(other: &[geo::Point]) -> Self {
        let arr: Vec<f64> = other.iter().flat_map(|p| [p.x(), p.y()]).collect();
        Self::new(arr.into(), 2)
    }
}

#[cfg(test)]
mod test {
    use geo::{coord, point};

    use super::*;
    use crate::test::point::{p0, p1, p2, xy_points, xyz_points};

    #[test]
    fn pack_infers_dimension() {
        let points = PointCollection::pack(&xyz_points(), None, None);
        assert_eq!(points.dim(), 3);
        assert_eq!(points.len(), 3);
        assert_eq!(points.count(), 9);
        assert_eq!(points.buffer().capacity(), 9);
    }

    #[test]
    fn pack_empty_uses_default_dimension() {
        let empty: Vec<Vec<f64>> = vec![];
        let points = PointCollection::pack(&empty, None, None);
        assert_eq!(points.dim(), DEFAULT_DIM);
        assert_eq!(points.count(), 0);
        assert!(points.is_empty());
        assert!(points.unpack().is_empty());
        assert!(points.extent().is_empty());
        assert_eq!(points, PointCollection::default());
    }

    #[test]
    fn pack_explicit_dimension_wins() {
        let empty: Vec<Vec<f64>> = vec![];
        let points = PointCollection::pack(&empty, Some(8), Some(4));
        assert_eq!(points.dim(), 4);
        assert_eq!(points.buffer().capacity(), 8);
        assert_eq!(points.count(), 0);
    }

    #[test]
    fn pack_reserves_capacity() {
        let mut points = PointCollection::pack(&xy_points(), Some(10), None);
        assert_eq!(points.count(), 6);
        assert_eq!(points.buffer().capacity(), 10);
        assert_eq!(points.unpack(), xy_points());

        assert_eq!(points.add(&[7., 8.]), 6);
        assert_eq!(points.add(&[9., 10.]), 8);
        assert_eq!(points.buffer().capacity(), 10);
        assert_eq!(points.add(&[11., 12.]), 10);
        assert_eq!(points.buffer().capacity(), 12);
    }

    #[test]
    fn add_after_odd_capacity_stays_aligned() {
        let mut points = PointCollection::pack(&[[1., 2.]], Some(3), None);
        let offset = points.add(&[3., 4.]);
        assert_eq!(offset, 2);
        assert_eq!(points.get(offset), vec![3., 4.]);
        assert_eq!(points.unpack(), vec![vec![1., 2.], vec![3., 4.]]);
    }

    #[test]
    fn try_pack_rejects_small_capacity() {
        let err = PointCollection::try_pack(&xy_points(), Some(5), None).unwrap_err();
        assert!(matches!(
            err,
            PackedPointsError::InsufficientCapacity {
                capacity: 5,
                required: 6
            }
        ));
    }

    #[test]
    #[should_panic(expected = "Capacity 5 is smaller than the 6 elements required")]
    fn pack_small_capacity_panics() {
        PointCollection::pack(&xy_points(), Some(5), None);
    }

    #[test]
    fn try_pack_rejects_ragged_points() {
        let points = vec![vec![1., 2.], vec![3., 4., 5.]];
        let err = PointCollection::try_pack(&points, None, None).unwrap_err();
        assert!(matches!(
            err,
            PackedPointsError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn try_pack_rejects_zero_dimension() {
        let points: Vec<Vec<f64>> = vec![vec![]];
        let err = PointCollection::try_pack(&points, None, None).unwrap_err();
        assert!(matches!(err, PackedPointsError::InvalidDimension(0)));
    }

    #[test]
    fn try_new_rejects_unaligned_buffer() {
        let buffer = PackedBuffer::from(vec![1., 2., 3.]);
        assert!(PointCollection::try_new(buffer, 2).is_err());
        assert!(PointCollection::try_new(PackedBuffer::default(), 0).is_err());
    }

    #[test]
    fn try_new_rejects_misaligned_holes() {
        let mut buffer = PackedBuffer::from(vec![1., 2., 3., 4., 5., 6.]);
        buffer.remove(2, 1);
        assert!(matches!(
            PointCollection::try_new(buffer, 2).unwrap_err(),
            PackedPointsError::MisalignedOffset { offset: 1, dim: 2 }
        ));

        let mut buffer = PackedBuffer::from(vec![1., 2., 3., 4., 5.]);
        buffer.remove(1, 1);
        assert!(PointCollection::try_new(buffer, 2).is_err());

        let mut buffer: PackedBuffer = (0..9).map(f64::from).collect::<Vec<_>>().into();
        buffer.remove(4, 0);
        buffer.remove(2, 6);
        assert!(matches!(
            PointCollection::try_new(buffer, 3).unwrap_err(),
            PackedPointsError::MisalignedOffset { offset: 4, dim: 3 }
        ));
    }

    #[test]
    fn try_new_accepts_aligned_holes_and_short_tail() {
        let mut buffer = PackedBuffer::new(vec![1., 2., 3., 4., 0.], 4);
        buffer.remove(2, 0);
        let mut points = PointCollection::try_new(buffer, 2).unwrap();
        assert_eq!(points.unpack(), vec![vec![3., 4.]]);
        assert_eq!(points.extent(), Extent::new(3., 4., 3., 4.));

        assert_eq!(points.add(&[5., 6.]), 0);
        assert_eq!(points.add(&[7., 8.]), 4);
        assert_eq!(
            points.unpack(),
            vec![vec![5., 6.], vec![3., 4.], vec![7., 8.]]
        );
    }

    #[test]
    fn add_then_get() {
        let mut points = PointCollection::empty(3);
        let a = points.add(&[1., 2., 3.]);
        let b = points.add(&[4., 5., 6.]);
        assert_eq!((a, b), (0, 3));
        assert_eq!(points.get(a), vec![1., 2., 3.]);
        assert_eq!(points.get(b), vec![4., 5., 6.]);
        assert_eq!(points.point(b), [4., 5., 6.][..]);
    }

    #[test]
    fn try_add_rejects_wrong_dimension() {
        let mut points = PointCollection::empty(2);
        let err = points.try_add(&[1., 2., 3.]).unwrap_err();
        assert!(matches!(
            err,
            PackedPointsError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        ));
        assert!(points.is_empty());
    }

    #[test]
    fn get_last_point() {
        let points = PointCollection::pack(&xy_points(), None, None);
        assert_eq!(points.get(4), vec![5., 6.]);
    }

    #[test]
    fn get_returns_a_copy() {
        let points = PointCollection::pack(&xy_points(), None, None);
        let mut point = points.get(0);
        point[0] = 100.;
        assert_eq!(points.get(0), vec![1., 2.]);
    }

    #[test]
    fn try_get_rejects_bad_offsets() {
        let points = PointCollection::pack(&xy_points(), None, None);
        assert!(matches!(
            points.try_get(1).unwrap_err(),
            PackedPointsError::MisalignedOffset { offset: 1, dim: 2 }
        ));
        assert!(matches!(
            points.try_get(6).unwrap_err(),
            PackedPointsError::OffsetOutOfBounds {
                offset: 6,
                len: 2,
                capacity: 6
            }
        ));
    }

    #[test]
    #[should_panic(expected = "not a multiple of dimension")]
    fn get_misaligned_panics() {
        let points = PointCollection::pack(&xy_points(), None, None);
        points.get(3);
    }

    #[test]
    fn set_overwrites() {
        let mut points = PointCollection::pack(&xy_points(), None, None);
        points.set(2, &[30., 40.]);
        assert_eq!(points.get(2), vec![30., 40.]);
        assert_eq!(points.extent(), Extent::new(1., 2., 30., 40.));

        assert!(points.try_set(2, &[1.]).is_err());
        assert!(points.try_set(3, &[1., 1.]).is_err());
        assert!(points.try_set(6, &[1., 1.]).is_err());
    }

    #[test]
    fn remove_creates_hole() {
        let mut points = PointCollection::pack(&xy_points(), None, None);
        points.remove(2);
        assert_eq!(points.count(), 4);
        assert_eq!(points.len(), 2);
        assert_eq!(points.unpack(), vec![vec![1., 2.], vec![5., 6.]]);
        assert_eq!(points.extent(), Extent::new(1., 2., 5., 6.));

        let offsets: Vec<usize> = points.iter().map(|(offset, _)| offset).collect();
        assert_eq!(offsets, vec![0, 4]);
    }

    #[test]
    fn remove_twice_fails() {
        let mut points = PointCollection::pack(&xy_points(), None, None);
        points.remove(2);
        assert!(matches!(
            points.try_remove(2).unwrap_err(),
            PackedPointsError::RemoveHole { offset: 2, len: 2 }
        ));
        assert!(points.try_remove(1).is_err());
    }

    #[test]
    fn add_fills_hole() {
        let mut points = PointCollection::pack(&xy_points(), None, None);
        points.remove(2);
        assert_eq!(points.add(&[7., 8.]), 2);
        assert_eq!(
            points.unpack(),
            vec![vec![1., 2.], vec![7., 8.], vec![5., 6.]]
        );
    }

    #[test]
    fn extent_ignores_extra_dimensions() {
        let points = PointCollection::pack(&xyz_points(), None, None);
        assert_eq!(points.extent(), Extent::new(0., 1., 2., 3.));
    }

    #[test]
    fn extent_requires_two_dimensions() {
        let points = PointCollection::pack(&[[1.], [2.]], None, None);
        assert!(matches!(
            points.try_extent().unwrap_err(),
            PackedPointsError::InvalidDimension(1)
        ));
    }

    #[test]
    fn extent_of_fully_removed_collection_is_empty() {
        let mut points = PointCollection::pack(&xy_points(), None, None);
        points.remove(0);
        points.remove(2);
        points.remove(4);
        assert!(points.extent().is_empty());
        assert!(points.unpack().is_empty());
    }

    #[test]
    fn from_geo() {
        let coords = vec![coord! { x: 0., y: 1. }, coord! { x: 1., y: 2. }];
        let points: PointCollection = coords.into();
        assert_eq!(points.unpack(), vec![vec![0., 1.], vec![1., 2.]]);

        let points: PointCollection = [p0(), p1(), p2()].as_slice().into();
        assert_eq!(points.len(), 3);
        assert_eq!(geo::Point::from(points.point(4)), point! { x: 2., y: 3. });
    }
}
