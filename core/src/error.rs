use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Position must be a finite point on the globe")]
    InvalidPosition,
    #[error("Cell is outside of the player's neighborhood")]
    OutOfReach,
    #[error("No cache at this cell")]
    NoCache,
    #[error("Coin balance would overflow")]
    Overflow,
    #[error("Invalid cell key: {0:?}")]
    InvalidCellKey(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
