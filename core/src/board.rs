use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::*;

/// One grid square, `i` counts tiles of latitude and `j` tiles of longitude.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub i: Index,
    pub j: Index,
}

impl Cell {
    pub const fn new(i: Index, j: Index) -> Self {
        Self { i, j }
    }

    pub const fn indices(self) -> Index2 {
        (self.i, self.j)
    }

    /// Whether `other` lies in the square window of half-width `radius` around this cell.
    pub fn is_within(self, other: Cell, radius: Index) -> bool {
        let radius = radius.max(0).unsigned_abs();
        self.i.abs_diff(other.i) <= radius && self.j.abs_diff(other.j) <= radius
    }
}

impl From<Index2> for Cell {
    fn from((i, j): Index2) -> Self {
        Self { i, j }
    }
}

/// Formats as the storage key `"i,j"`.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.i, self.j)
    }
}

impl FromStr for Cell {
    type Err = GameError;

    fn from_str(key: &str) -> Result<Self> {
        let invalid = || GameError::InvalidCellKey(key.to_string());
        let (i, j) = key.split_once(',').ok_or_else(invalid)?;
        let i = i.trim().parse().map_err(|_| invalid())?;
        let j = j.trim().parse().map_err(|_| invalid())?;
        Ok(Self { i, j })
    }
}

/// Shared canonical cell handle, two handles for the same indices are `Rc::ptr_eq`.
pub type CellRef = Rc<Cell>;

/// Smallest supported tile, any valid [`LatLng`] then has indices well inside [`Index`].
pub const MIN_TILE_DEGREES: f64 = 1e-6;

/// Maps geographic points to grid cells and keeps one canonical handle per cell.
///
/// Canonical entries are never evicted, they accumulate for the lifetime of the board.
#[derive(Clone, Debug)]
pub struct Board {
    tile_degrees: f64,
    neighborhood_size: Index,
    known_cells: HashMap<Index2, CellRef>,
}

impl Board {
    pub fn new(tile_degrees: f64, neighborhood_size: Index) -> Self {
        Self {
            tile_degrees: tile_degrees.max(MIN_TILE_DEGREES),
            neighborhood_size: neighborhood_size.max(0),
            known_cells: HashMap::new(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.tile_degrees, config.neighborhood_size)
    }

    pub fn tile_degrees(&self) -> f64 {
        self.tile_degrees
    }

    pub fn neighborhood_size(&self) -> Index {
        self.neighborhood_size
    }

    pub fn known_cell_count(&self) -> usize {
        self.known_cells.len()
    }

    pub fn canonical_cell(&mut self, cell: Cell) -> CellRef {
        self.known_cells
            .entry(cell.indices())
            .or_insert_with(|| Rc::new(cell))
            .clone()
    }

    pub fn cell_for_point(&mut self, point: LatLng) -> CellRef {
        let cell = Cell::new(self.axis_index(point.lat), self.axis_index(point.lng));
        self.canonical_cell(cell)
    }

    pub fn cell_bounds(&self, cell: &Cell) -> Bounds {
        let tile = self.tile_degrees;
        Bounds {
            south_west: LatLng::new(f64::from(cell.i) * tile, f64::from(cell.j) * tile),
            north_east: LatLng::new(
                f64::from(cell.i.saturating_add(1)) * tile,
                f64::from(cell.j.saturating_add(1)) * tile,
            ),
        }
    }

    pub fn cells_near_point(&mut self, point: LatLng) -> Vec<CellRef> {
        let center = self.cell_for_point(point);
        NeighborhoodIter::new(center.indices(), self.neighborhood_size)
            .map(|indices| self.canonical_cell(indices.into()))
            .collect()
    }

    /// Floor division with a one step correction so the cell's computed bounds always contain `degrees`.
    ///
    /// Only exact for points passing [`LatLng::is_valid`], larger values saturate at the edge of [`Index`].
    fn axis_index(&self, degrees: f64) -> Index {
        let tile = self.tile_degrees;
        let mut index = (degrees / tile).floor() as Index;
        if f64::from(index) * tile > degrees {
            index = index.saturating_sub(1);
        } else if f64::from(index.saturating_add(1)) * tile <= degrees {
            index = index.saturating_add(1);
        }
        index
    }
}
