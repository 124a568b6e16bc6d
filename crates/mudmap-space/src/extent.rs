//! Axis-aligned bounding boxes over grid coordinates.

/// Inclusive bounding box `[min_x, max_x] x [min_y, max_y]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Westmost column.
    pub min_x: i32,
    /// Eastmost column.
    pub max_x: i32,
    /// Southmost row.
    pub min_y: i32,
    /// Northmost row.
    pub max_y: i32,
}

impl Extent {
    /// The degenerate box covering a single coordinate.
    pub fn point(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    /// Grow the box to cover `(x, y)`.
    pub fn include(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Whether `(x, y)` lies inside the box.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Whether `other` lies entirely inside this box.
    pub fn contains_extent(&self, other: &Extent) -> bool {
        self.contains(other.min_x, other.min_y) && self.contains(other.max_x, other.max_y)
    }

    /// Number of columns covered.
    pub fn width(&self) -> u64 {
        (self.max_x as i64 - self.min_x as i64) as u64 + 1
    }

    /// Number of rows covered.
    pub fn height(&self) -> u64 {
        (self.max_y as i64 - self.min_y as i64) as u64 + 1
    }

    /// Midpoint, rounded toward negative infinity.
    pub fn center(&self) -> (i32, i32) {
        let mid = |lo: i32, hi: i32| ((lo as i64 + hi as i64).div_euclid(2)) as i32;
        (mid(self.min_x, self.max_x), mid(self.min_y, self.max_y))
    }

    /// Smallest box covering every coordinate, or `None` for an empty input.
    pub fn covering(coords: impl IntoIterator<Item = (i32, i32)>) -> Option<Self> {
        let mut coords = coords.into_iter();
        let (x, y) = coords.next()?;
        let mut extent = Self::point(x, y);
        for (x, y) in coords {
            extent.include(x, y);
        }
        Some(extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_grows_in_every_direction() {
        let mut e = Extent::point(0, 0);
        e.include(-3, 2);
        e.include(5, -7);
        assert_eq!(
            e,
            Extent {
                min_x: -3,
                max_x: 5,
                min_y: -7,
                max_y: 2
            }
        );
        assert_eq!(e.width(), 9);
        assert_eq!(e.height(), 10);
        assert_eq!(e.center(), (1, -3));
    }

    #[test]
    fn covering_empty_is_none() {
        assert_eq!(Extent::covering(std::iter::empty()), None);
        let e = Extent::covering([(1, 1), (4, -2)]).unwrap();
        assert!(e.contains(2, 0));
        assert!(!e.contains(5, 0));
        assert!(e.contains_extent(&Extent::point(4, -2)));
    }

    #[test]
    fn full_range_width_does_not_overflow() {
        let e = Extent {
            min_x: i32::MIN,
            max_x: i32::MAX,
            min_y: 0,
            max_y: 0,
        };
        assert_eq!(e.width(), 1 << 32);
        assert_eq!(e.center(), (-1, 0));
    }
}
