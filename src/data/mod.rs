pub mod items;
pub mod monsters;

use self::items::ItemTemplate;

#[derive(Clone, Debug)]
pub struct CharacterTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub hitpoints: i32,
    pub strength: i32,
    pub speed: f64,
    pub stamina: i32,
    pub sight_range: i32,
    pub loot: &'static [ItemTemplate],
}

pub const PLAYER: CharacterTemplate = CharacterTemplate {
    name: crate::entity::PLAYER_NAME,
    glyph: '@',
    hitpoints: 20,
    strength: 20,
    speed: 1.0,
    stamina: 10,
    sight_range: 7,
    loot: &[],
};
