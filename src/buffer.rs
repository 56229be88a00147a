//! The packed storage engine underneath a [`PointCollection`][crate::PointCollection].

use std::ops::Range;

use log::trace;

use crate::error::{PackedPointsError, Result};
use crate::range_set::{InvertedRanges, RangeSet};

/// A flat buffer of `f64` values with hole tracking.
///
/// Every element of the underlying array is either *live* or *free*. Removing values turns
/// them into a free range (a hole) without moving any other value, so offsets handed out by
/// [`add`][Self::add] stay valid until their values are removed. Free ranges are reused by
/// later additions, first-fit, before the array grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedBuffer {
    arr: Vec<f64>,
    free: RangeSet,
}

impl PackedBuffer {
    /// Construct a new PackedBuffer where the first `used` elements of `arr` are live and the
    /// remainder is free.
    ///
    /// # Panics
    ///
    /// - if `used` is larger than the length of `arr`
    pub fn new(arr: Vec<f64>, used: usize) -> Self {
        Self::try_new(arr, used).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Construct a new PackedBuffer where the first `used` elements of `arr` are live and the
    /// remainder is free.
    ///
    /// # Errors
    ///
    /// - if `used` is larger than the length of `arr`
    pub fn try_new(arr: Vec<f64>, used: usize) -> Result<Self> {
        if used > arr.len() {
            return Err(PackedPointsError::InsufficientCapacity {
                capacity: arr.len(),
                required: used,
            });
        }

        let mut free = RangeSet::new();
        free.add_range(used, arr.len());
        Ok(Self { arr, free })
    }

    /// Construct a buffer of `capacity` elements, all of them free
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(vec![0.0; capacity], 0)
    }

    /// Add `values` to the buffer and return the offset of the first one.
    ///
    /// The values land in the first free range large enough to hold all of them. If there is
    /// none, the array grows, starting from a free range at the very end of the array when
    /// there is one.
    pub fn add(&mut self, values: &[f64]) -> usize {
        let size = values.len();
        if size == 0 {
            return self.arr.len();
        }

        let offset = match self.free.find_range(size) {
            Some(offset) => {
                trace!("reusing free range at {offset} for {size} values");
                offset
            }
            None => self.grow(size),
        };

        self.arr[offset..offset + size].copy_from_slice(values);
        self.free.remove_range(offset, offset + size);
        offset
    }

    /// Extend the array so that `size` free elements end it, and return where they start.
    fn grow(&mut self, size: usize) -> usize {
        let old_len = self.arr.len();
        let offset = match self.free.last() {
            Some(tail) if tail.end == old_len => tail.start,
            _ => old_len,
        };
        let new_len = offset + size;

        self.arr.resize(new_len, 0.0);
        self.free.add_range(old_len, new_len);
        trace!("grew buffer from {old_len} to {new_len} elements");
        offset
    }

    /// Overwrite `values.len()` elements starting at `offset`.
    ///
    /// # Panics
    ///
    /// - if the write would extend past the end of the array
    pub fn set(&mut self, values: &[f64], offset: usize) {
        self.try_set(values, offset)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Overwrite `values.len()` elements starting at `offset`.
    ///
    /// # Errors
    ///
    /// - if the write would extend past the end of the array
    pub fn try_set(&mut self, values: &[f64], offset: usize) -> Result<()> {
        let range = self.check_range(offset, values.len())?;
        self.arr[range].copy_from_slice(values);
        Ok(())
    }

    /// Free the `size` elements starting at `offset`.
    ///
    /// # Panics
    ///
    /// - if the range extends past the end of the array
    /// - if any element of the range is already free
    pub fn remove(&mut self, size: usize, offset: usize) {
        self.try_remove(size, offset)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Free the `size` elements starting at `offset`.
    ///
    /// # Errors
    ///
    /// - if the range extends past the end of the array
    /// - if any element of the range is already free
    pub fn try_remove(&mut self, size: usize, offset: usize) -> Result<()> {
        let range = self.check_range(offset, size)?;
        if self.free.intersects(range.start, range.end) {
            return Err(PackedPointsError::RemoveHole { offset, len: size });
        }

        self.free.add_range(range.start, range.end);
        trace!("removed {size} elements at offset {offset}");
        Ok(())
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<Range<usize>> {
        match offset.checked_add(len) {
            Some(stop) if stop <= self.arr.len() => Ok(offset..stop),
            _ => Err(PackedPointsError::OffsetOutOfBounds {
                offset,
                len,
                capacity: self.arr.len(),
            }),
        }
    }

    /// The full underlying array, holes included
    pub fn array(&self) -> &[f64] {
        &self.arr
    }

    /// The number of live elements
    pub fn count(&self) -> usize {
        self.arr.len() - self.free.size()
    }

    /// The number of elements of the underlying array, live or free
    pub fn capacity(&self) -> usize {
        self.arr.len()
    }

    /// The free ranges of the array
    pub fn free_ranges(&self) -> &RangeSet {
        &self.free
    }

    /// Whether the element at `offset` is live
    pub fn is_live(&self, offset: usize) -> bool {
        offset < self.arr.len() && !self.free.contains(offset)
    }

    /// Iterate over the maximal live ranges of the array in ascending order.
    ///
    /// No yielded range contains a free element.
    pub fn ranges(&self) -> InvertedRanges<'_> {
        self.free.iter_inverted(0, self.arr.len())
    }

    /// Call `visit(start, stop)` once for each maximal live range, in ascending order
    pub fn for_each_range(&self, mut visit: impl FnMut(usize, usize)) {
        for range in self.ranges() {
            visit(range.start, range.end);
        }
    }
}

impl From<Vec<f64>> for PackedBuffer {
    fn from(value: Vec<f64>) -> Self {
        let used = value.len();
        Self::new(value, used)
    }
}
