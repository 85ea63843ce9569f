//! Simulation core of a turn-based dungeon crawler whose fights are rhythm
//! minigames. Rendering and map loading live elsewhere; this crate owns the
//! levels, the turn loop and the battles.

pub mod battle;
pub mod config;
pub mod data;
pub mod entity;
pub mod error;
pub mod game;
pub mod intent;
pub mod level;
pub mod map;
pub mod script;

pub use battle::{Battle, Burst, CombatantId, LastEvent, NoteOutcome};
pub use config::GameConfig;
pub use entity::item::{Item, ItemId, ItemKey, ItemKind};
pub use entity::{Character, Monster};
pub use error::{ConfigError, GameError, LevelError};
pub use game::{Flow, Game};
pub use intent::{ClientId, Direction, Intent};
pub use level::{Level, LevelBlueprint, SharedLevel};
pub use map::{Position, TileKind};
