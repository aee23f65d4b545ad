use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: LatLng,
    pub coins: Coins,
}

impl Player {
    pub const fn new(position: LatLng) -> Self {
        Self { position, coins: 0 }
    }
}

/// Every position the player has been at, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trail(Vec<LatLng>);

impl Trail {
    pub fn starting_at(position: LatLng) -> Self {
        Self(vec![position])
    }

    pub fn push(&mut self, position: LatLng) {
        self.0.push(position);
    }

    pub fn positions(&self) -> &[LatLng] {
        &self.0
    }

    pub fn last(&self) -> Option<LatLng> {
        self.0.last().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<LatLng>> for Trail {
    fn from(positions: Vec<LatLng>) -> Self {
        Self(positions)
    }
}

/// A discrete player action.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Step(Direction),
    MoveTo(LatLng),
    Collect(Cell),
    Deposit(Cell),
    Reset,
}

/// A cache in the player's neighborhood, as handed to the front end.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheView {
    pub cell: CellRef,
    pub bounds: Bounds,
    pub coins: Coins,
}

/// Owns the whole game state, every mutation goes through [`Session::dispatch`].
#[derive(Clone, Debug)]
pub struct Session<G = LuckGenerator> {
    config: GameConfig,
    generator: G,
    board: Board,
    ledger: CacheLedger,
    player: Player,
    trail: Trail,
}

impl<G: WorldGenerator> Session<G> {
    pub fn new(config: GameConfig, generator: G) -> Self {
        let board = Board::from_config(&config);
        let player = Player::new(config.start);
        let trail = Trail::starting_at(config.start);
        Self {
            config,
            generator,
            board,
            ledger: CacheLedger::new(),
            player,
            trail,
        }
    }

    /// Rebuilds a session from previously saved parts.
    pub fn from_parts(
        config: GameConfig,
        generator: G,
        player: Player,
        ledger: CacheLedger,
        trail: Trail,
    ) -> Self {
        let mut session = Self::new(config, generator);
        session.player = player;
        session.ledger = ledger;
        session.trail = if trail.is_empty() {
            Trail::starting_at(player.position)
        } else {
            trail
        };
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ledger(&self) -> &CacheLedger {
        &self.ledger
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn player_cell(&mut self) -> CellRef {
        self.board.cell_for_point(self.player.position)
    }

    /// Cells the trail passes through, in visiting order without consecutive repeats.
    pub fn trail_cells(&mut self) -> Vec<CellRef> {
        let mut cells: Vec<CellRef> = Vec::with_capacity(self.trail.len());
        for &position in self.trail.positions() {
            let cell = self.board.cell_for_point(position);
            if cells.last().is_none_or(|last| !Rc::ptr_eq(last, &cell)) {
                cells.push(cell);
            }
        }
        cells
    }

    /// Player balance plus every known cache.
    pub fn total_coins(&self) -> u64 {
        self.ledger.total_coins() + u64::from(self.player.coins)
    }

    pub fn has_cache(&self, cell: &Cell) -> bool {
        self.generator.has_cache(cell)
    }

    /// Caches around the player, initializing the ledger for any seen for the first time.
    pub fn nearby_caches(&mut self) -> Vec<CacheView> {
        let Self {
            generator,
            board,
            ledger,
            player,
            ..
        } = self;
        let generator = &*generator;

        board
            .cells_near_point(player.position)
            .into_iter()
            .filter(|cell| generator.has_cache(cell))
            .map(|cell| {
                let coins = ledger.get_or_init(&cell, generator);
                let bounds = board.cell_bounds(&cell);
                CacheView {
                    cell,
                    bounds,
                    coins,
                }
            })
            .collect()
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        log::debug!("dispatch: {:?}", command);
        match command {
            Command::Step(direction) => {
                let target = self
                    .player
                    .position
                    .offset(direction, self.config.tile_degrees);
                self.move_to(target)
            }
            Command::MoveTo(target) => self.move_to(target),
            Command::Collect(cell) => self.collect(cell),
            Command::Deposit(cell) => self.deposit(cell),
            Command::Reset => Ok(self.reset()),
        }
    }

    fn move_to(&mut self, target: LatLng) -> Result<Outcome> {
        if !target.is_valid() {
            return Err(GameError::InvalidPosition);
        }
        if target == self.player.position {
            return Ok(Outcome::NoChange);
        }

        self.player.position = target;
        self.trail.push(target);
        Ok(Outcome::Moved)
    }

    fn collect(&mut self, cell: Cell) -> Result<Outcome> {
        self.check_cache_in_reach(cell)?;

        let coins = self.ledger.get_or_init(&cell, &self.generator);
        if coins == 0 {
            return Ok(Outcome::NoChange);
        }
        let balance = self
            .player
            .coins
            .checked_add(coins)
            .ok_or(GameError::Overflow)?;

        self.ledger.collect(&cell);
        self.player.coins = balance;
        log::debug!("collected {coins} from {cell}, player has {}", self.player.coins);
        Ok(Outcome::Collected(coins))
    }

    fn deposit(&mut self, cell: Cell) -> Result<Outcome> {
        self.check_cache_in_reach(cell)?;

        self.ledger.get_or_init(&cell, &self.generator);
        let coins = self.player.coins;
        if coins == 0 {
            return Ok(Outcome::NoChange);
        }

        self.ledger.deposit(&cell, coins)?;
        self.player.coins = 0;
        log::debug!("deposited {coins} into {cell}");
        Ok(Outcome::Deposited(coins))
    }

    fn reset(&mut self) -> Outcome {
        let start = self.config.start;
        self.player = Player::new(start);
        self.ledger.clear();
        self.trail = Trail::starting_at(start);
        Outcome::Reset
    }

    fn check_cache_in_reach(&mut self, cell: Cell) -> Result<()> {
        let player_cell = self.player_cell();
        if !player_cell.is_within(cell, self.config.neighborhood_size) {
            return Err(GameError::OutOfReach);
        }
        if !self.generator.has_cache(&cell) {
            return Err(GameError::NoCache);
        }
        Ok(())
    }
}
