use serde::{Deserialize, Serialize};

/// Single grid axis index, rows are latitude and columns are longitude.
pub type Index = i32;

/// Two-dimensional grid indices `(i, j)`.
pub type Index2 = (Index, Index);

/// Count type used for coin balances.
pub type Coins = u32;

/// A geographic point in degrees.
///
/// Serialized as `[lat, lng]`, which is also how it is persisted.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite and on the globe, `lat` within ±90 and `lng` within ±180.
    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Moves one tile of `tile_degrees` in `direction`.
    pub fn offset(self, direction: Direction, tile_degrees: f64) -> Self {
        let (di, dj) = direction.delta();
        Self {
            lat: self.lat + f64::from(di) * tile_degrees,
            lng: self.lng + f64::from(dj) * tile_degrees,
        }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(point: LatLng) -> Self {
        [point.lat, point.lng]
    }
}

/// Axis aligned rectangle in degrees, `south_west` inclusive and `north_east` exclusive.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..self.north_east.lng).contains(&point.lng)
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Index displacement `(di, dj)` of one step.
    pub const fn delta(self) -> Index2 {
        use Direction::*;
        match self {
            North => (1, 0),
            South => (-1, 0),
            East => (0, 1),
            West => (0, -1),
        }
    }
}

/// Iterates the square window of half-width `radius` around `center`, inclusive, row-major from the lowest row.
#[derive(Debug)]
pub struct NeighborhoodIter {
    center: Index2,
    radius: Index,
    di: Index,
    dj: Index,
}

impl NeighborhoodIter {
    pub fn new(center: Index2, radius: Index) -> Self {
        let radius = radius.max(0);
        Self {
            center,
            radius,
            di: -radius,
            dj: -radius,
        }
    }
}

impl Iterator for NeighborhoodIter {
    type Item = Index2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.di > self.radius {
            return None;
        }

        let item = (
            self.center.0.saturating_add(self.di),
            self.center.1.saturating_add(self.dj),
        );

        self.dj += 1;
        if self.dj > self.radius {
            self.dj = -self.radius;
            self.di += 1;
        }

        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let side = (2 * self.radius + 1) as usize;
        let done = ((self.di + self.radius) as usize) * side + (self.dj + self.radius) as usize;
        let left = (side * side).saturating_sub(done);
        (left, Some(left))
    }
}

impl ExactSizeIterator for NeighborhoodIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighborhood_covers_inclusive_square() {
        let cells: Vec<_> = NeighborhoodIter::new((10, -3), 1).collect();

        assert_eq!(cells.len(), 9);
        assert_eq!(cells.first(), Some(&(9, -4)));
        assert_eq!(cells.last(), Some(&(11, -2)));
        assert!(cells.contains(&(10, -3)));
    }

    #[test]
    fn neighborhood_size_hint_is_exact() {
        let mut iter = NeighborhoodIter::new((0, 0), 8);
        assert_eq!(iter.len(), 17 * 17);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 17 * 17 - 2);
        assert_eq!(iter.count(), 17 * 17 - 2);
    }

    #[test]
    fn zero_radius_yields_only_center() {
        let cells: Vec<_> = NeighborhoodIter::new((4, 5), 0).collect();
        assert_eq!(cells, vec![(4, 5)]);
    }

    #[test]
    fn lat_lng_serializes_as_pair() {
        let json = serde_json::to_string(&LatLng::new(1.5, -2.25)).unwrap();
        assert_eq!(json, "[1.5,-2.25]");
        let back: LatLng = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LatLng::new(1.5, -2.25));
    }

    #[test]
    fn validity_requires_a_point_on_the_globe() {
        assert!(LatLng::new(90.0, -180.0).is_valid());
        assert!(!LatLng::new(90.5, 0.0).is_valid());
        assert!(!LatLng::new(0.0, 1e10).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
        assert!(!LatLng::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn offset_moves_one_tile() {
        let start = LatLng::new(0.0, 0.0);
        assert_eq!(start.offset(Direction::North, 0.5), LatLng::new(0.5, 0.0));
        assert_eq!(start.offset(Direction::West, 0.5), LatLng::new(0.0, -0.5));
    }
}
