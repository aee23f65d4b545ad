use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use crate::*;

pub const POSITION_KEY: &str = "geocoin:position";
pub const CACHES_KEY: &str = "geocoin:caches";
pub const COINS_KEY: &str = "geocoin:coins";
pub const TRAIL_KEY: &str = "geocoin:trail";

pub const ALL_KEYS: [&str; 4] = [POSITION_KEY, CACHES_KEY, COINS_KEY, TRAIL_KEY];

/// Raw string key-value storage, such as the browser's local storage.
pub trait StateStore {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str);
}

/// In-memory store, used natively and in tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

fn write_json<S: StateStore + ?Sized, T: Serialize>(
    store: &mut S,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.write(key, json)
}

/// Missing keys and unreadable values both fall back to `None`, the latter with a warning.
fn read_json<S: StateStore + ?Sized, T: DeserializeOwned>(store: &S, key: &str) -> Option<T> {
    let raw = match store.read(key) {
        Ok(raw) => raw?,
        Err(err) => {
            log::warn!("Could not read {key}: {err}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Ignoring corrupt {key}: {err}");
            None
        }
    }
}

/// Writes position, caches, coins and trail under their own keys.
pub fn save<S, G>(store: &mut S, session: &Session<G>) -> Result<()>
where
    S: StateStore + ?Sized,
    G: WorldGenerator,
{
    let player = session.player();
    write_json(store, POSITION_KEY, &player.position)?;
    write_json(store, CACHES_KEY, session.ledger())?;
    write_json(store, COINS_KEY, &player.coins)?;
    write_json(store, TRAIL_KEY, session.trail())?;
    Ok(())
}

/// Rebuilds the last saved session, anything missing starts out fresh.
pub fn restore<S, G>(store: &S, config: GameConfig, generator: G) -> Session<G>
where
    S: StateStore + ?Sized,
    G: WorldGenerator,
{
    let position = read_json::<_, LatLng>(store, POSITION_KEY)
        .filter(|position| position.is_valid())
        .unwrap_or(config.start);
    let coins = read_json(store, COINS_KEY).unwrap_or(0);
    let ledger = read_json(store, CACHES_KEY).unwrap_or_default();
    let trail = read_json(store, TRAIL_KEY).unwrap_or_default();

    log::debug!("restored player at {position:?} with {coins} coins");
    Session::from_parts(config, generator, Player { position, coins }, ledger, trail)
}

pub fn clear<S: StateStore + ?Sized>(store: &mut S) {
    for key in ALL_KEYS {
        store.remove(key);
    }
}

/// Runs `command` and keeps the store in step with the session.
///
/// Every command with an update saves all keys, a reset removes them instead. Rejected commands and
/// commands without an update leave the store alone. A failed save is logged and does not undo the
/// command, the session stays authoritative until the next successful save.
pub fn dispatch_and_save<S, G>(
    store: &mut S,
    session: &mut Session<G>,
    command: Command,
) -> Result<Outcome>
where
    S: StateStore + ?Sized,
    G: WorldGenerator,
{
    let outcome = session.dispatch(command)?;

    match outcome {
        Outcome::NoChange => {}
        Outcome::Reset => clear(store),
        _ => {
            if let Err(err) = save(store, session) {
                log::error!("Could not save game: {err}");
            }
        }
    }

    Ok(outcome)
}
