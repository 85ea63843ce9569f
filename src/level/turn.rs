use log::debug;

use super::Level;
use crate::battle::CombatantId;
use crate::entity::Monster;
use crate::map::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TurnOutcome {
    Passed,
    Moved,
    /// Another monster held the next cell.
    Refused,
    Attack,
}

impl Level {
    /// Gives every monster one turn, top row first. Returns the cells of
    /// monsters that opened a battle and need autoplay.
    pub fn update_monsters(&mut self) -> Vec<Position> {
        if self.board_frozen() {
            return Vec::new();
        }
        if self.config.debug_paths {
            self.debug.clear();
        }

        let mut order: Vec<Position> = self.monsters.keys().copied().collect();
        order.sort_by_key(|pos| (pos.y, pos.x));

        let mut attackers = Vec::new();
        for pos in order {
            // An earlier attack freezes everyone behind it.
            if self.board_frozen() {
                break;
            }
            let Some(mut monster) = self.monsters.remove(&pos) else {
                continue;
            };
            let outcome = self.take_turn(&mut monster);
            let at = monster.pos();
            debug!("{} at {:?}: {:?}", monster.character.name(), at, outcome);
            self.monsters.insert(at, monster);

            if outcome == TurnOutcome::Moved && self.trapped_at(at) {
                self.check_trap(at, CombatantId::Monster(at));
                continue;
            }

            if outcome == TurnOutcome::Attack
                && self
                    .attack(CombatantId::Monster(at), CombatantId::Player)
                    .is_ok()
            {
                attackers.push(at);
            }
        }
        attackers
    }

    /// The monster is out of the map while it acts, so occupancy checks only
    /// see the others.
    fn take_turn(&mut self, monster: &mut Monster) -> TurnOutcome {
        let character = &mut monster.character;
        character.accrue();

        let target = self.player.pos();
        let path = self.astar(character.pos(), target);
        if path.len() < 2 {
            character.pass();
            return TurnOutcome::Passed;
        }
        if self.config.debug_paths {
            self.debug.extend(path.iter().copied());
        }

        let mut outcome = TurnOutcome::Passed;
        for &next in &path[1..] {
            if character.action_points < 1.0 {
                break;
            }
            character.action_points -= 1.0;
            if next == target {
                return TurnOutcome::Attack;
            }
            if self.monsters.contains_key(&next) {
                return TurnOutcome::Refused;
            }
            character.entity.pos = next;
            outcome = TurnOutcome::Moved;
            // A closed trap ends the walk; the caller springs it.
            if self.trapped_at(next) {
                break;
            }
        }
        outcome
    }

    fn trapped_at(&self, pos: Position) -> bool {
        self.grid.tile_at(pos).is_some_and(|tile| tile.is_closed_trap())
    }
}
