use crate::*;
pub use luck::*;

mod luck;

/// Decides where caches exist and what they start with.
///
/// Implementations must be pure functions of the cell so the same world is laid out regardless of visiting order.
pub trait WorldGenerator {
    fn has_cache(&self, cell: &Cell) -> bool;
    fn initial_coins(&self, cell: &Cell) -> Coins;
}

impl<G: WorldGenerator + ?Sized> WorldGenerator for &G {
    fn has_cache(&self, cell: &Cell) -> bool {
        (**self).has_cache(cell)
    }

    fn initial_coins(&self, cell: &Cell) -> Coins {
        (**self).initial_coins(cell)
    }
}
