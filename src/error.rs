use thiserror::Error;

use crate::entity::item::ItemId;
use crate::map::Position;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("item {item} is not on the ground at {pos:?}")]
    ItemNotOnGround { item: ItemId, pos: Position },

    #[error("item stack at {pos:?} is out of reach")]
    NotStandingOn { pos: Position },

    #[error("item {item} is not in the inventory")]
    ItemNotInInventory { item: ItemId },

    #[error("position {pos:?} is outside the level")]
    OutOfBounds { pos: Position },

    #[error("level grid has no tiles")]
    EmptyGrid,

    #[error("grid row {row} has {found} tiles, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("no character answers to that combatant handle")]
    UnknownCombatant,

    #[error("two monsters placed at {pos:?}")]
    DuplicateMonster { pos: Position },

    #[error("{what} placed on a blocking tile at {pos:?}")]
    Blocked { what: &'static str, pos: Position },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no level named `{0}`")]
    UnknownLevel(String),

    #[error("portal at {pos:?} in `{from}` leads to unusable target `{target}`")]
    DanglingPortal {
        from: String,
        pos: Position,
        target: String,
    },

    #[error("two levels named `{0}`")]
    DuplicateLevel(String),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
