use super::CharacterTemplate;
use super::items::CREDITS;
use crate::battle::pattern::PatternRng;
use crate::entity::{Character, Monster};
use crate::map::Position;

pub const RAT: CharacterTemplate = CharacterTemplate {
    name: "Rat",
    glyph: 'R',
    hitpoints: 5,
    strength: 5,
    speed: 1.5,
    stamina: 4,
    sight_range: 10,
    loot: &[CREDITS],
};

pub const SPIDER: CharacterTemplate = CharacterTemplate {
    name: "Spider",
    glyph: 'S',
    hitpoints: 10,
    strength: 3,
    speed: 2.0,
    stamina: 6,
    sight_range: 10,
    loot: &[],
};

impl CharacterTemplate {
    pub fn spawn(&self, pos: Position) -> Monster {
        Monster::new(Character::from_template(self, pos, PatternRng::from_entropy()))
    }

    pub fn spawn_seeded(&self, pos: Position, seed: u64) -> Monster {
        Monster::new(Character::from_template(self, pos, PatternRng::seeded(seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracket_geometry::prelude::Point;

    #[test]
    fn spider_outpaces_rat() {
        assert!(SPIDER.speed > RAT.speed);
        let spider = SPIDER.spawn(Point::new(1, 1));
        let rat = RAT.spawn(Point::new(2, 2));
        assert!(spider.character.speed > rat.character.speed);
    }
}
