use crate::entity::Entity;
use crate::entity::item::{Item, ItemId, ItemKind};
use crate::map::Position;

#[derive(Clone, Debug, PartialEq)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub kind: ItemKind,
    pub power: f64,
}

pub const SWORD: ItemTemplate = ItemTemplate::new("Sword", 's', ItemKind::Weapon, 2.0);
pub const HELMET: ItemTemplate = ItemTemplate::new("Helmet", 'h', ItemKind::Helmet, 0.5);
pub const CREDITS: ItemTemplate = ItemTemplate::new("Credits", '$', ItemKind::Other, 2.0);
pub const POTION: ItemTemplate = ItemTemplate::new("Health Potion", '+', ItemKind::Other, 16.0);
pub const BONES: ItemTemplate = ItemTemplate::new("Rat Bones", 'b', ItemKind::Other, 1.0);

impl ItemTemplate {
    pub const fn new(name: &'static str, glyph: char, kind: ItemKind, power: f64) -> Self {
        Self {
            name,
            glyph,
            kind,
            power,
        }
    }

    pub fn spawn(&self, pos: Position) -> Item {
        Item {
            id: ItemId::fresh(),
            entity: Entity::new(pos, self.name, self.glyph),
            kind: self.kind,
            power: self.power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_geometry::prelude::Point;

    #[test]
    fn catalog_entries() {
        let sword = SWORD.spawn(Point::new(1, 1));
        assert_eq!(sword.kind, ItemKind::Weapon);
        assert_eq!(sword.name(), "Sword");
        assert!(sword.power > 0.0);

        assert_eq!(HELMET.spawn(Point::new(2, 2)).kind, ItemKind::Helmet);
        assert_eq!(CREDITS.spawn(Point::new(3, 3)).kind, ItemKind::Other);
        let potion = POTION.spawn(Point::new(4, 4));
        assert_eq!(potion.name(), "Health Potion");
        assert_eq!(potion.power, 16.0);
    }

    #[test]
    fn every_spawn_gets_its_own_id() {
        let a = SWORD.spawn(Point::new(0, 0));
        let b = SWORD.spawn(Point::new(0, 0));
        assert_ne!(a.id, b.id);
    }
}
