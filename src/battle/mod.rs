pub mod autoplay;
pub mod pattern;

use std::collections::VecDeque;

use log::debug;

use crate::entity::{Character, MonsterInput};
use crate::error::LevelError;
use crate::level::Level;
use crate::map::Position;

/// Level-wide combat flag. Anything but `Idle` freezes the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum LastEvent {
    #[default]
    Idle,
    Attack,
    Damage,
}

/// Names a character inside a level. Monsters are keyed by cell, which stays
/// valid because nothing moves while a battle is live.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CombatantId {
    Player,
    Monster(Position),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Battle {
    pub attacker: CombatantId,
    pub defender: CombatantId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Burst {
    pub notes: VecDeque<usize>,
    pub max_combo: usize,
    pub combo: usize,
}

impl Burst {
    pub fn new(notes: Vec<usize>) -> Self {
        Self {
            max_combo: notes.len(),
            notes: notes.into(),
            combo: 0,
        }
    }

    pub fn front(&self) -> Option<usize> {
        self.notes.front().copied()
    }

    pub fn consume(&mut self) -> Option<usize> {
        let note = self.notes.pop_front()?;
        self.combo = (self.combo + 1).min(self.max_combo);
        Some(note)
    }

    pub fn miss(&mut self) {
        self.combo = 0;
    }

    pub fn is_cleared(&self) -> bool {
        self.notes.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoteOutcome {
    Hit { remaining: usize },
    Miss,
    Resolved { damage: i32 },
}

impl Level {
    pub fn character(&self, id: CombatantId) -> Option<&Character> {
        match id {
            CombatantId::Player => Some(&self.player),
            CombatantId::Monster(pos) => self.monsters.get(&pos).map(|m| &m.character),
        }
    }

    pub fn character_mut(&mut self, id: CombatantId) -> Option<&mut Character> {
        match id {
            CombatantId::Player => Some(&mut self.player),
            CombatantId::Monster(pos) => self.monsters.get_mut(&pos).map(|m| &mut m.character),
        }
    }

    /// True while `who` still has notes to clear in the live battle.
    pub fn is_attacking(&self, who: CombatantId) -> bool {
        self.last_event == LastEvent::Attack
            && self.battle.is_some_and(|battle| battle.attacker == who)
    }

    pub fn attack(&mut self, attacker: CombatantId, defender: CombatantId) -> Result<(), LevelError> {
        let defender_name = self
            .character(defender)
            .map(|c| c.name().to_string())
            .ok_or(LevelError::UnknownCombatant)?;
        let (len, lanes) = (self.config.burst_length, self.config.lanes);
        let striker = self
            .character_mut(attacker)
            .ok_or(LevelError::UnknownCombatant)?;
        let notes = striker.make_stream(len, lanes);
        striker.burst = Some(Burst::new(notes));
        let attacker_name = striker.name().to_string();

        self.battle = Some(Battle { attacker, defender });
        self.last_event = LastEvent::Attack;
        let line = match (attacker, defender) {
            (_, CombatantId::Player) => format!("The {attacker_name} attacks you."),
            (CombatantId::Player, _) => format!("You attack the {defender_name}."),
            _ => format!("{attacker_name} attacks the {defender_name}."),
        };
        self.add_event(line);
        debug!("battle armed: {attacker:?} vs {defender:?}");
        Ok(())
    }

    /// Pops the attacker's front note. Clearing the last note resolves damage.
    pub fn consume_note(&mut self, who: CombatantId) -> Option<NoteOutcome> {
        if !self.is_attacking(who) {
            return None;
        }
        let striker = self.character_mut(who)?;
        let burst = striker.burst.as_mut()?;
        burst.consume();
        let remaining = burst.notes.len();
        striker.spend_stamina();
        if remaining > 0 {
            return Some(NoteOutcome::Hit { remaining });
        }
        self.last_event = LastEvent::Damage;
        self.resolve_damage()
            .map(|damage| NoteOutcome::Resolved { damage })
    }

    /// Player input for the live burst: only the front lane counts.
    pub fn player_note(&mut self, lane: usize) -> Option<NoteOutcome> {
        if !self.is_attacking(CombatantId::Player) {
            return None;
        }
        let burst = self.player.burst.as_mut()?;
        if burst.front()? != lane {
            burst.miss();
            debug!("player missed lane {lane}");
            return Some(NoteOutcome::Miss);
        }
        self.consume_note(CombatantId::Player)
    }

    pub(crate) fn autoplay_note(&mut self, attacker: Position) -> Option<NoteOutcome> {
        let outcome = self.consume_note(CombatantId::Monster(attacker))?;
        if let Some(monster) = self.monsters.get_mut(&attacker) {
            monster.input = MonsterInput::KeyPress;
        }
        Some(outcome)
    }

    /// Applies the battle's hit to the defender and closes the battle.
    pub fn resolve_damage(&mut self) -> Option<i32> {
        let Battle { attacker, defender } = self.battle?;
        let (attacker_name, weapon) = self
            .character(attacker)
            .map(|c| (c.name().to_string(), c.weapon_power()))?;
        let helmet = self.character(defender)?.helmet_power();
        let damage = self.config.damage.resolve(weapon, helmet);

        let target = self.character_mut(defender)?;
        target.hitpoints -= damage;
        let defender_name = target.name().to_string();
        let slain = target.is_dead();

        if let Some(striker) = self.character_mut(attacker) {
            striker.burst = None;
        }
        self.last_event = LastEvent::Damage;
        let line = match (attacker, defender) {
            (CombatantId::Player, _) => format!("You hit the {defender_name} for {damage} damage."),
            (_, CombatantId::Player) => format!("The {attacker_name} hits you for {damage} damage."),
            _ => format!("{attacker_name} hit the {defender_name} for {damage} damage."),
        };
        self.add_event(line);
        debug!("{attacker:?} dealt {damage} to {defender:?}");

        if slain {
            self.kill(defender);
        }
        Some(damage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::items::SWORD;
    use crate::data::monsters::RAT;
    use crate::level::LevelBlueprint;
    use bracket_geometry::prelude::Point;

    fn arena() -> Level {
        let mut level = LevelBlueprint::open("arena", 15, 15, Point::new(7, 7))
            .build(&Default::default())
            .unwrap();
        level.player.reseed(0);
        level
            .place_monster(RAT.spawn_seeded(Point::new(7, 6), 42))
            .unwrap();
        level
    }

    const RAT_CELL: CombatantId = CombatantId::Monster(Point { x: 7, y: 6 });

    fn damage_events(level: &Level) -> usize {
        level.events.iter().filter(|e| e.contains("damage")).count()
    }

    #[test]
    fn burst_combo_caps_at_max() {
        let mut burst = Burst::new(vec![1, 2, 3, 0]);
        for _ in 0..4 {
            burst.consume();
        }
        assert_eq!(burst.combo, 4);
        assert!(burst.is_cleared());
        assert_eq!(burst.consume(), None);
        assert_eq!(burst.combo, 4);
        burst.miss();
        assert_eq!(burst.combo, 0);
    }

    #[test]
    fn attack_arms_battle_with_fresh_burst() {
        let mut level = arena();
        level.attack(RAT_CELL, CombatantId::Player).unwrap();
        assert_eq!(level.last_event, LastEvent::Attack);
        assert!(level.board_frozen());
        let burst = level.character(RAT_CELL).unwrap().burst.clone().unwrap();
        assert_eq!(burst.notes.len(), level.config.burst_length);
        assert_eq!(burst.max_combo, level.config.burst_length);
        assert!(level.events.contains("The Rat attacks you."));
    }

    #[test]
    fn clearing_burst_damages_defender_once() {
        let mut level = arena();
        let before = level.player.hitpoints;
        level.attack(RAT_CELL, CombatantId::Player).unwrap();

        let mut outcome = None;
        while level.is_attacking(RAT_CELL) {
            outcome = level.consume_note(RAT_CELL);
        }
        assert_eq!(outcome, Some(NoteOutcome::Resolved { damage: 1 }));
        assert_eq!(level.last_event, LastEvent::Damage);
        assert!(level.player.hitpoints < before);
        assert_eq!(damage_events(&level), 1);
        assert!(level.events.contains("The Rat hits you for 1 damage."));
        assert!(level.character(RAT_CELL).unwrap().burst.is_none());
        assert_eq!(level.character(RAT_CELL).unwrap().stamina, 0);
    }

    #[test]
    fn player_must_hit_the_front_lane() {
        let mut level = arena();
        level.attack(CombatantId::Player, RAT_CELL).unwrap();
        level.player.burst = Some(Burst::new(vec![2, 0]));
        level.player.stamina = 2;

        assert_eq!(level.player_note(1), Some(NoteOutcome::Miss));
        assert_eq!(level.player.burst.as_ref().unwrap().notes.len(), 2);
        assert_eq!(
            level.player_note(2),
            Some(NoteOutcome::Hit { remaining: 1 })
        );
        assert_eq!(level.player.stamina, 1);
        assert!(matches!(
            level.player_note(0),
            Some(NoteOutcome::Resolved { .. })
        ));
        assert!(level.events.contains("You hit the Rat for 1 damage."));
        assert_eq!(level.player_note(0), None);
    }

    #[test]
    fn weapon_power_drives_damage_and_kills() {
        let mut level = arena();
        let sword = SWORD.spawn(level.player.pos());
        let id = sword.id;
        level.player.items.push(sword);
        level.player.equip(id).unwrap();
        level.character_mut(RAT_CELL).unwrap().hitpoints = 2;

        level.attack(CombatantId::Player, RAT_CELL).unwrap();
        assert_eq!(level.resolve_damage(), Some(2));
        assert!(level.monsters.is_empty());
        assert!(!level.items_at(Point::new(7, 6)).is_empty());
        assert!(level.events.contains("The Rat dies."));
    }

    #[test]
    fn non_player_wording() {
        let mut level = arena();
        level
            .place_monster(RAT.spawn_seeded(Point::new(3, 3), 7))
            .unwrap();
        let other = CombatantId::Monster(Point::new(3, 3));
        level.attack(RAT_CELL, other).unwrap();
        assert!(level.events.contains("Rat attacks the Rat."));
        level.resolve_damage();
        assert!(level.events.contains("Rat hit the Rat for 1 damage."));
    }

    #[test]
    fn notes_from_outside_the_battle_are_ignored() {
        let mut level = arena();
        assert_eq!(level.consume_note(CombatantId::Player), None);
        level.attack(RAT_CELL, CombatantId::Player).unwrap();
        assert_eq!(level.consume_note(CombatantId::Player), None);
        assert_eq!(level.player_note(0), None);
    }
}
