//! Axis-aligned bounding boxes over x/y coordinates.

use geo::{Coord, Rect};

use crate::error::PackedPointsError;

/// A 2D axis-aligned bounding box that grows to cover every point it is extended with.
///
/// A new extent is *empty*: its minimums are `+inf` and its maximums `-inf`, so the first call
/// to [`extend_xy`][Self::extend_xy] collapses it onto that point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extent {
    minx: f64,
    miny: f64,
    maxx: f64,
    maxy: f64,
}

impl Extent {
    /// Create a new, empty extent
    pub fn empty() -> Self {
        Extent {
            minx: f64::INFINITY,
            miny: f64::INFINITY,
            maxx: -f64::INFINITY,
            maxy: -f64::INFINITY,
        }
    }

    /// Create an extent from its bounds.
    ///
    /// # Panics
    ///
    /// - if a minimum is larger than the matching maximum
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        assert!(
            minx <= maxx && miny <= maxy,
            "extent minimums must not exceed maximums"
        );
        Extent {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    /// Minimum x; `+inf` when empty
    pub fn minx(&self) -> f64 {
        self.minx
    }

    /// Minimum y; `+inf` when empty
    pub fn miny(&self) -> f64 {
        self.miny
    }

    /// Maximum x; `-inf` when empty
    pub fn maxx(&self) -> f64 {
        self.maxx
    }

    /// Maximum y; `-inf` when empty
    pub fn maxy(&self) -> f64 {
        self.maxy
    }

    /// Whether no point has been added to this extent
    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx || self.miny > self.maxy
    }

    /// Grow this extent to include `(x, y)`
    pub fn extend_xy(&mut self, x: f64, y: f64) {
        if x < self.minx {
            self.minx = x;
        }
        if y < self.miny {
            self.miny = y;
        }
        if x > self.maxx {
            self.maxx = x;
        }
        if y > self.maxy {
            self.maxy = y;
        }
    }

    /// Grow this extent to include all of `other`
    pub fn extend(&mut self, other: &Extent) {
        self.minx = self.minx.min(other.minx);
        self.miny = self.miny.min(other.miny);
        self.maxx = self.maxx.max(other.maxx);
        self.maxy = self.maxy.max(other.maxy);
    }

    /// Whether `(x, y)` lies inside or on the boundary of this extent
    pub fn contains_xy(&self, x: f64, y: f64) -> bool {
        self.minx <= x && x <= self.maxx && self.miny <= y && y <= self.maxy
    }

    /// Width of the extent; zero when empty
    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.maxx - self.minx
        }
    }

    /// Height of the extent; zero when empty
    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.maxy - self.miny
        }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Extent> for Rect {
    type Error = PackedPointsError;

    fn try_from(value: Extent) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(PackedPointsError::EmptyExtent);
        }
        let min_coord = Coord {
            x: value.minx,
            y: value.miny,
        };
        let max_coord = Coord {
            x: value.maxx,
            y: value.maxy,
        };
        Ok(Rect::new(min_coord, max_coord))
    }
}

impl From<Rect> for Extent {
    fn from(value: Rect) -> Self {
        let min = value.min();
        let max = value.max();
        Extent::new(min.x, min.y, max.x, max.y)
    }
}

impl From<Extent> for ([f64; 2], [f64; 2]) {
    fn from(value: Extent) -> Self {
        ([value.minx, value.miny], [value.maxx, value.maxy])
    }
}
