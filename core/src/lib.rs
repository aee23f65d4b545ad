use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use ledger::*;
pub use persist::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod ledger;
mod persist;
mod types;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Where a new or reset game places the player.
    pub start: LatLng,
    /// Angular size of one grid cell.
    pub tile_degrees: f64,
    /// Half-width of the window of cells considered around the player.
    pub neighborhood_size: Index,
    /// Chance for any cell to hold a cache.
    pub spawn_probability: f64,
    /// Initial cache contents are in `0..max_initial_coins`.
    pub max_initial_coins: Coins,
}

impl GameConfig {
    /// Oakes College classroom, the default landing spot.
    pub const CLASSROOM: LatLng = LatLng::new(36.98949379578401, -122.06277128548504);

    pub fn new(
        start: LatLng,
        tile_degrees: f64,
        neighborhood_size: Index,
        spawn_probability: f64,
        max_initial_coins: Coins,
    ) -> Self {
        let tile_degrees = if tile_degrees.is_finite() && tile_degrees >= MIN_TILE_DEGREES {
            tile_degrees
        } else {
            log::warn!("Invalid tile size {tile_degrees}, fallback to default");
            Self::default().tile_degrees
        };
        Self {
            start,
            tile_degrees,
            neighborhood_size: neighborhood_size.max(0),
            spawn_probability: spawn_probability.clamp(0.0, 1.0),
            max_initial_coins,
        }
    }

    /// Number of cells in one neighborhood window.
    pub const fn neighborhood_cells(&self) -> usize {
        let side = 2 * self.neighborhood_size as usize + 1;
        side * side
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start: Self::CLASSROOM,
            tile_degrees: 1e-4,
            neighborhood_size: 8,
            spawn_probability: 0.1,
            max_initial_coins: 20,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    NoChange,
    Moved,
    Collected(Coins),
    Deposited(Coins),
    Reset,
}

impl Outcome {
    pub const fn has_update(self) -> bool {
        use Outcome::*;
        match self {
            NoChange => false,
            Moved => true,
            Collected(_) => true,
            Deposited(_) => true,
            Reset => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_sanitizes_inputs() {
        let config = GameConfig::new(LatLng::new(0.0, 0.0), -1.0, -3, 4.0, 20);
        assert_eq!(config.tile_degrees, 1e-4);
        assert_eq!(config.neighborhood_size, 0);
        assert_eq!(config.spawn_probability, 1.0);
        assert_eq!(config.neighborhood_cells(), 1);
    }

    #[test]
    fn default_neighborhood_is_17_by_17() {
        assert_eq!(GameConfig::default().neighborhood_cells(), 289);
    }

    #[test]
    fn only_no_change_skips_update() {
        assert!(!Outcome::NoChange.has_update());
        assert!(Outcome::Collected(0).has_update());
        assert!(Outcome::Reset.has_update());
    }
}
