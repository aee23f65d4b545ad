use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::*;

/// Coin count of every cache seen so far.
///
/// Persisted as a flat object from `"i,j"` keys to coin counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Coins>",
    into = "BTreeMap<String, Coins>"
)]
pub struct CacheLedger {
    caches: BTreeMap<Cell, Coins>,
}

impl CacheLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn get(&self, cell: &Cell) -> Option<Coins> {
        self.caches.get(cell).copied()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.caches.contains_key(cell)
    }

    pub fn insert(&mut self, cell: Cell, coins: Coins) -> Option<Coins> {
        self.caches.insert(cell, coins)
    }

    pub fn clear(&mut self) {
        self.caches.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, Coins)> + '_ {
        self.caches.iter().map(|(&cell, &coins)| (cell, coins))
    }

    pub fn total_coins(&self) -> u64 {
        self.caches.values().map(|&coins| u64::from(coins)).sum()
    }

    /// Existing coin count, or the generator's initial value which is stored before returning.
    pub fn get_or_init(&mut self, cell: &Cell, generator: &impl WorldGenerator) -> Coins {
        *self.caches.entry(*cell).or_insert_with(|| {
            let coins = generator.initial_coins(cell);
            log::trace!("init cache {cell} with {coins} coins");
            coins
        })
    }

    /// Empties the cache and returns what it held, unknown cells hold nothing and are left untouched.
    pub fn collect(&mut self, cell: &Cell) -> Coins {
        self.caches.get_mut(cell).map(core::mem::take).unwrap_or(0)
    }

    /// Adds `amount` to the cache, leaving it untouched if the sum does not fit.
    pub fn deposit(&mut self, cell: &Cell, amount: Coins) -> Result<()> {
        let current = self.get(cell).unwrap_or(0);
        let coins = current.checked_add(amount).ok_or(GameError::Overflow)?;
        self.caches.insert(*cell, coins);
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, Coins>> for CacheLedger {
    type Error = GameError;

    fn try_from(raw: BTreeMap<String, Coins>) -> Result<Self> {
        let caches = raw
            .into_iter()
            .map(|(key, coins)| Ok((key.parse::<Cell>()?, coins)))
            .collect::<Result<_>>()?;
        Ok(Self { caches })
    }
}

impl From<CacheLedger> for BTreeMap<String, Coins> {
    fn from(ledger: CacheLedger) -> Self {
        ledger
            .caches
            .into_iter()
            .map(|(cell, coins)| (cell.to_string(), coins))
            .collect()
    }
}

impl FromIterator<(Cell, Coins)> for CacheLedger {
    fn from_iter<T: IntoIterator<Item = (Cell, Coins)>>(iter: T) -> Self {
        Self {
            caches: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Coins);

    impl WorldGenerator for Fixed {
        fn has_cache(&self, _cell: &Cell) -> bool {
            true
        }

        fn initial_coins(&self, _cell: &Cell) -> Coins {
            self.0
        }
    }

    #[test]
    fn get_or_init_only_generates_once() {
        let mut ledger = CacheLedger::new();
        let cell = Cell::new(1, 2);

        assert_eq!(ledger.get_or_init(&cell, &Fixed(7)), 7);
        assert_eq!(ledger.get_or_init(&cell, &Fixed(9)), 7);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn collect_then_deposit_restores_cache() {
        let cell = Cell::new(0, 0);
        let mut ledger: CacheLedger = [(cell, 5)].into_iter().collect();
        let mut player: Coins = 0;

        player += ledger.collect(&cell);
        assert_eq!(ledger.get(&cell), Some(0));
        assert_eq!(player, 5);

        ledger.deposit(&cell, core::mem::take(&mut player)).unwrap();
        assert_eq!(ledger.get(&cell), Some(5));
        assert_eq!(player, 0);
    }

    #[test]
    fn empty_operations_are_noops() {
        let cell = Cell::new(4, 4);
        let mut ledger: CacheLedger = [(cell, 0)].into_iter().collect();

        assert_eq!(ledger.collect(&cell), 0);
        ledger.deposit(&cell, 0).unwrap();
        assert_eq!(ledger.get(&cell), Some(0));

        assert_eq!(ledger.collect(&Cell::new(9, 9)), 0);
        assert!(!ledger.contains(&Cell::new(9, 9)));
    }

    #[test]
    fn coins_are_conserved() {
        let cells = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(-3, 2)];
        let mut ledger: CacheLedger = cells.iter().map(|&c| (c, 4)).collect();
        let mut player: Coins = 3;
        let total = ledger.total_coins() + u64::from(player);

        for (step, cell) in cells.iter().cycle().take(10).enumerate() {
            if step % 3 == 0 {
                ledger.deposit(cell, core::mem::take(&mut player)).unwrap();
            } else {
                player += ledger.collect(cell);
            }
            assert_eq!(ledger.total_coins() + u64::from(player), total);
        }
    }

    #[test]
    fn overflowing_deposit_is_rejected() {
        let cell = Cell::new(2, 2);
        let mut ledger: CacheLedger = [(cell, Coins::MAX)].into_iter().collect();

        assert_eq!(ledger.deposit(&cell, 1), Err(GameError::Overflow));
        assert_eq!(ledger.get(&cell), Some(Coins::MAX));

        assert_eq!(ledger.deposit(&Cell::new(7, 7), 4), Ok(()));
        assert_eq!(ledger.get(&Cell::new(7, 7)), Some(4));
    }

    #[test]
    fn serializes_with_string_keys() {
        let ledger: CacheLedger = [(Cell::new(1, -2), 3), (Cell::new(0, 0), 0)]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"0,0":0,"1,-2":3}"#);

        let back: CacheLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!(serde_json::from_str::<CacheLedger>(r#"{"nope":1}"#).is_err());
    }
}
