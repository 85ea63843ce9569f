use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Entity;
use crate::map::Position;

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of an item, so a copy read from a snapshot can name the
/// original in an intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl ItemId {
    pub fn fresh() -> Self {
        ItemId(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Weapon,
    Helmet,
    Other,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub entity: Entity,
    pub kind: ItemKind,
    pub power: f64,
}

/// Where a ground item lies, plus which item it is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub id: ItemId,
    pub pos: Position,
}

impl Item {
    pub fn key(&self) -> ItemKey {
        ItemKey {
            id: self.id,
            pos: self.entity.pos,
        }
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }
}
