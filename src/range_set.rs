//! A set of `usize` integers stored as sorted, disjoint half-open ranges.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Range;

/// A sorted set of disjoint half-open ranges `[start, stop)`.
///
/// Ranges that touch or overlap are coalesced on insertion, so two stored ranges are always
/// separated by at least one element that is not in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    /// Maps range start to range stop.
    ranges: BTreeMap<usize, usize>,
    /// Total number of integers covered.
    size: usize,
}

impl RangeSet {
    /// Create a new empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this set contains no integers
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The number of disjoint ranges in this set
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// The number of integers in this set
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether `value` is in this set
    pub fn contains(&self, value: usize) -> bool {
        self.ranges
            .range(..=value)
            .next_back()
            .is_some_and(|(_, &stop)| stop > value)
    }

    /// Whether any integer of `[start, stop)` is in this set
    pub fn intersects(&self, start: usize, stop: usize) -> bool {
        if start >= stop {
            return false;
        }
        self.ranges
            .range(..stop)
            .next_back()
            .is_some_and(|(_, &range_stop)| range_stop > start)
    }

    /// Insert `[start, stop)`, merging with any range it touches.
    ///
    /// # Panics
    ///
    /// - if `start > stop`
    pub fn add_range(&mut self, start: usize, stop: usize) {
        assert!(start <= stop, "range start {start} is after stop {stop}");
        if start == stop {
            return;
        }

        let mut start = start;
        let mut stop = stop;
        if let Some((&prev_start, &prev_stop)) = self.ranges.range(..start).next_back() {
            if prev_stop >= start {
                start = prev_start;
            }
        }

        let merged: Vec<usize> = self
            .ranges
            .range(start..=stop)
            .map(|(&range_start, _)| range_start)
            .collect();
        for range_start in merged {
            if let Some(range_stop) = self.ranges.remove(&range_start) {
                self.size -= range_stop - range_start;
                stop = stop.max(range_stop);
            }
        }

        self.ranges.insert(start, stop);
        self.size += stop - start;
    }

    /// Remove `[start, stop)` from the set, splitting any range that straddles either end.
    ///
    /// # Panics
    ///
    /// - if `start > stop`
    pub fn remove_range(&mut self, start: usize, stop: usize) {
        assert!(start <= stop, "range start {start} is after stop {stop}");
        if start == stop {
            return;
        }

        let mut affected: Vec<(usize, usize)> = Vec::new();
        if let Some((&prev_start, &prev_stop)) = self.ranges.range(..start).next_back() {
            if prev_stop > start {
                affected.push((prev_start, prev_stop));
            }
        }
        affected.extend(self.ranges.range(start..stop).map(|(&s, &e)| (s, e)));

        for (range_start, range_stop) in affected {
            self.ranges.remove(&range_start);
            self.size -= range_stop - range_start;
            if range_start < start {
                self.ranges.insert(range_start, start);
                self.size += start - range_start;
            }
            if range_stop > stop {
                self.ranges.insert(stop, range_stop);
                self.size += range_stop - stop;
            }
        }
    }

    /// The start of the first range holding at least `min_size` integers
    pub fn find_range(&self, min_size: usize) -> Option<usize> {
        self.ranges
            .iter()
            .find(|(&start, &stop)| stop - start >= min_size)
            .map(|(&start, _)| start)
    }

    /// The range with the highest start, if any
    pub fn last(&self) -> Option<Range<usize>> {
        self.ranges
            .iter()
            .next_back()
            .map(|(&start, &stop)| start..stop)
    }

    /// Iterate over the ranges of this set in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.ranges.iter().map(|(&start, &stop)| start..stop)
    }

    /// Iterate over the maximal ranges of `[start, stop)` that are *not* in this set, in
    /// ascending order.
    pub fn iter_inverted(&self, start: usize, stop: usize) -> InvertedRanges<'_> {
        let first = self
            .ranges
            .range(..=start)
            .next_back()
            .map_or(start, |(&range_start, _)| range_start);
        InvertedRanges {
            ranges: self.ranges.range(first..),
            cursor: start,
            stop,
        }
    }
}

/// Iterator over the gaps between the ranges of a [`RangeSet`], returned by
/// [`RangeSet::iter_inverted`].
#[derive(Debug, Clone)]
pub struct InvertedRanges<'a> {
    ranges: btree_map::Range<'a, usize, usize>,
    cursor: usize,
    stop: usize,
}

impl Iterator for InvertedRanges<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.stop {
            match self.ranges.next() {
                Some((&range_start, &range_stop)) => {
                    if range_stop <= self.cursor {
                        continue;
                    }
                    let gap = self.cursor..range_start.min(self.stop);
                    self.cursor = range_stop;
                    if !gap.is_empty() {
                        return Some(gap);
                    }
                }
                None => {
                    let gap = self.cursor..self.stop;
                    self.cursor = self.stop;
                    return Some(gap);
                }
            }
        }
        None
    }
}

impl FromIterator<Range<usize>> for RangeSet {
    fn from_iter<I: IntoIterator<Item = Range<usize>>>(iter: I) -> Self {
        let mut set = RangeSet::new();
        for range in iter {
            set.add_range(range.start, range.end);
        }
        set
    }
}
