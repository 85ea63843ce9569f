pub mod item;

use crate::battle::Burst;
use crate::battle::pattern::PatternRng;
use crate::data::CharacterTemplate;
use crate::error::LevelError;
use crate::map::Position;

use self::item::{Item, ItemId, ItemKind};

pub const DEAD_GLYPH: char = 'x';
pub const PLAYER_NAME: &str = "You";

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub pos: Position,
    pub name: String,
    pub glyph: char,
}

impl Entity {
    pub fn new(pos: Position, name: impl Into<String>, glyph: char) -> Self {
        Self {
            pos,
            name: name.into(),
            glyph,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Character {
    pub entity: Entity,
    pub hitpoints: i32,
    pub strength: i32,
    /// Action points gained per scheduler tick.
    pub speed: f64,
    pub stamina: i32,
    pub max_stamina: i32,
    pub sight_range: i32,
    pub action_points: f64,
    pub items: Vec<Item>,
    pub weapon: Option<ItemId>,
    pub helmet: Option<ItemId>,
    pub burst: Option<Burst>,
    pattern_rng: PatternRng,
}

impl Character {
    pub fn from_template(template: &CharacterTemplate, pos: Position, rng: PatternRng) -> Self {
        Self {
            entity: Entity::new(pos, template.name, template.glyph),
            hitpoints: template.hitpoints,
            strength: template.strength,
            speed: template.speed,
            stamina: template.stamina,
            max_stamina: template.stamina,
            sight_range: template.sight_range,
            action_points: 0.0,
            items: template.loot.iter().map(|loot| loot.spawn(pos)).collect(),
            weapon: None,
            helmet: None,
            burst: None,
            pattern_rng: rng,
        }
    }

    pub fn pos(&self) -> Position {
        self.entity.pos
    }

    pub fn name(&self) -> &str {
        &self.entity.name
    }

    pub fn is_dead(&self) -> bool {
        self.hitpoints <= 0
    }

    pub fn accrue(&mut self) {
        self.action_points += self.speed;
    }

    /// Gives back this tick's accrual so a blocked actor cannot bank points.
    pub fn pass(&mut self) {
        self.action_points -= self.speed;
    }

    pub fn spend_stamina(&mut self) {
        self.stamina = (self.stamina - 1).clamp(0, self.max_stamina.max(0));
    }

    pub fn reseed(&mut self, seed: u64) {
        self.pattern_rng = PatternRng::seeded(seed);
    }

    pub fn make_stream(&mut self, len: usize, lanes: usize) -> Vec<usize> {
        self.pattern_rng.make_stream(len, lanes)
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Points the weapon or helmet slot at an inventory item. The item stays
    /// in the inventory; `Other` items leave both slots untouched.
    pub fn equip(&mut self, id: ItemId) -> Result<ItemKind, LevelError> {
        let kind = self
            .item(id)
            .map(|item| item.kind)
            .ok_or(LevelError::ItemNotInInventory { item: id })?;
        match kind {
            ItemKind::Weapon => self.weapon = Some(id),
            ItemKind::Helmet => self.helmet = Some(id),
            ItemKind::Other => {}
        }
        Ok(kind)
    }

    pub(crate) fn take_item(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|item| item.id == id)?;
        if self.weapon == Some(id) {
            self.weapon = None;
        }
        if self.helmet == Some(id) {
            self.helmet = None;
        }
        Some(self.items.remove(idx))
    }

    pub fn weapon_power(&self) -> Option<f64> {
        self.weapon.and_then(|id| self.item(id)).map(|item| item.power)
    }

    pub fn helmet_power(&self) -> Option<f64> {
        self.helmet.and_then(|id| self.item(id)).map(|item| item.power)
    }
}

/// What the presentation layer should animate for a monster.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MonsterInput {
    #[default]
    Idle,
    KeyPress,
}

#[derive(Clone, Debug)]
pub struct Monster {
    pub character: Character,
    pub input: MonsterInput,
}

impl Monster {
    pub fn new(character: Character) -> Self {
        Self {
            character,
            input: MonsterInput::Idle,
        }
    }

    pub fn pos(&self) -> Position {
        self.character.pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::items::{HELMET, SWORD};
    use crate::data::monsters::{RAT, SPIDER};
    use crate::data::PLAYER;
    use bracket_geometry::prelude::Point;

    fn player() -> Character {
        Character::from_template(&PLAYER, Point::new(1, 1), PatternRng::seeded(0))
    }

    #[test]
    fn templates_fill_stats() {
        let rat = RAT.spawn(Point::new(1, 1));
        assert_eq!(rat.pos(), Point::new(1, 1));
        assert_eq!(rat.character.name(), "Rat");
        assert_eq!(rat.character.speed, 1.5);
        assert!(!rat.character.items.is_empty());
        let spider = SPIDER.spawn(Point::new(1, 1));
        assert!(spider.character.speed > rat.character.speed);
    }

    #[test]
    fn equipping_swaps_references_without_moving_items() {
        let mut hero = player();
        let sword = SWORD.spawn(hero.pos());
        let better = SWORD.spawn(hero.pos());
        let (sword_id, better_id) = (sword.id, better.id);
        hero.items.extend([sword, better]);

        assert_eq!(hero.equip(sword_id).unwrap(), ItemKind::Weapon);
        assert_eq!(hero.weapon, Some(sword_id));
        hero.equip(better_id).unwrap();
        assert_eq!(hero.weapon, Some(better_id));
        assert_eq!(hero.items.len(), 2);

        let helmet = HELMET.spawn(hero.pos());
        let helmet_id = helmet.id;
        hero.items.push(helmet);
        hero.equip(helmet_id).unwrap();
        assert_eq!(hero.helmet, Some(helmet_id));
        assert_eq!(hero.helmet_power(), Some(0.5));
    }

    #[test]
    fn equipping_foreign_item_fails() {
        let mut hero = player();
        let sword = SWORD.spawn(hero.pos());
        assert!(matches!(
            hero.equip(sword.id),
            Err(LevelError::ItemNotInInventory { .. })
        ));
        assert_eq!(hero.weapon, None);
    }

    #[test]
    fn stamina_never_leaves_bounds() {
        let mut hero = player();
        hero.stamina = 1;
        hero.spend_stamina();
        hero.spend_stamina();
        assert_eq!(hero.stamina, 0);
    }

    #[test]
    fn pass_cancels_accrual() {
        let mut rat = RAT.spawn(Point::new(0, 0)).character;
        rat.action_points = 2.0;
        rat.pass();
        assert_eq!(rat.action_points, 0.5);
        rat.accrue();
        assert_eq!(rat.action_points, 2.0);
    }
}
