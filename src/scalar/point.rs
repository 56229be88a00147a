/// A borrowed view of one point inside a packed buffer.
///
/// Holds exactly `dim` coordinates. Converting into an owned [`Vec`] with
/// [`to_vec`][Self::to_vec] copies; nothing else does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedPoint<'a> {
    coords: &'a [f64],
}

impl<'a> PackedPoint<'a> {
    /// Wrap the `dim` coordinates of one point
    pub fn new(coords: &'a [f64]) -> Self {
        PackedPoint { coords }
    }

    /// The number of coordinates of this point
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// The first coordinate
    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    /// The second coordinate
    ///
    /// ## Panics
    ///
    /// - if the point has fewer than two coordinates
    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    /// The `n`th coordinate, or `None` past the point's dimension
    pub fn nth(&self, n: usize) -> Option<f64> {
        self.coords.get(n).copied()
    }

    /// All coordinates of this point
    pub fn coords(&self) -> &'a [f64] {
        self.coords
    }

    /// Copy the coordinates into an owned point
    pub fn to_vec(&self) -> Vec<f64> {
        self.coords.to_vec()
    }
}

impl From<PackedPoint<'_>> for geo::Coord {
    fn from(value: PackedPoint<'_>) -> Self {
        geo::Coord {
            x: value.x(),
            y: value.y(),
        }
    }
}

impl From<PackedPoint<'_>> for geo::Point {
    fn from(value: PackedPoint<'_>) -> Self {
        let coord: geo::Coord = value.into();
        coord.into()
    }
}

impl PartialEq<[f64]> for PackedPoint<'_> {
    fn eq(&self, other: &[f64]) -> bool {
        self.coords == other
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accessors() {
        let values = [1., 2., 3.];
        let point = PackedPoint::new(&values);
        assert_eq!(point.dim(), 3);
        assert_eq!(point.x(), 1.);
        assert_eq!(point.y(), 2.);
        assert_eq!(point.nth(2), Some(3.));
        assert_eq!(point.nth(3), None);
        assert_eq!(point.to_vec(), vec![1., 2., 3.]);
        assert_eq!(point, values[..]);
    }

    #[test]
    fn into_geo_drops_extra_dimensions() {
        let values = [1., 2., 3.];
        let coord: geo::Coord = PackedPoint::new(&values).into();
        assert_eq!(coord, geo::coord! { x: 1., y: 2. });
        let point: geo::Point = PackedPoint::new(&values).into();
        assert_eq!(point, geo::point! { x: 1., y: 2. });
    }
}
