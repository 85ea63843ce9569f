pub mod events;
pub mod inventory;
pub mod turn;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{info, warn};

use crate::battle::pattern::PatternRng;
use crate::battle::{Battle, CombatantId, LastEvent};
use crate::config::GameConfig;
use crate::data::items::ItemTemplate;
use crate::data::{CharacterTemplate, PLAYER};
use crate::entity::item::Item;
use crate::entity::{Character, DEAD_GLYPH, Monster, MonsterInput};
use crate::error::LevelError;
use crate::map::{Overlay, Position, TileGrid, TileKind, fov, path};

use self::events::EventLog;

/// A level shared between the turn loop and autoplay workers.
pub type SharedLevel = Arc<Mutex<Level>>;

pub fn share(level: Level) -> SharedLevel {
    Arc::new(Mutex::new(level))
}

/// Locks a shared level. A worker that panicked mid-update leaves the level
/// usable; the poison is logged and cleared.
pub fn lock(level: &SharedLevel) -> MutexGuard<'_, Level> {
    level.lock().unwrap_or_else(|poisoned| {
        warn!("level mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Destination of a portal, named through the game's level registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Portal {
    pub level: String,
    pub pos: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalSpec {
    pub at: Position,
    pub level: String,
    pub to: Position,
}

/// Pre-parsed construction input for a [`Level`].
#[derive(Clone, Debug)]
pub struct LevelBlueprint {
    pub name: String,
    pub tiles: Vec<Vec<TileKind>>,
    pub overlays: Vec<(Position, Overlay)>,
    pub player: Position,
    pub monsters: Vec<(Position, CharacterTemplate)>,
    pub items: Vec<(Position, ItemTemplate)>,
    pub portals: Vec<PortalSpec>,
}

impl LevelBlueprint {
    pub fn new(name: impl Into<String>, tiles: Vec<Vec<TileKind>>, player: Position) -> Self {
        Self {
            name: name.into(),
            tiles,
            overlays: Vec::new(),
            player,
            monsters: Vec::new(),
            items: Vec::new(),
            portals: Vec::new(),
        }
    }

    /// An all-floor room.
    pub fn open(name: impl Into<String>, width: usize, height: usize, player: Position) -> Self {
        Self::new(name, vec![vec![TileKind::Floor; width]; height], player)
    }

    /// Cells outside the tile rows are ignored.
    pub fn with_tile(mut self, pos: Position, kind: TileKind) -> Self {
        if pos.x >= 0 && pos.y >= 0 {
            if let Some(cell) = self
                .tiles
                .get_mut(pos.y as usize)
                .and_then(|row| row.get_mut(pos.x as usize))
            {
                *cell = kind;
            }
        }
        self
    }

    pub fn with_overlay(mut self, pos: Position, overlay: Overlay) -> Self {
        self.overlays.push((pos, overlay));
        self
    }

    pub fn with_monster(mut self, pos: Position, template: CharacterTemplate) -> Self {
        self.monsters.push((pos, template));
        self
    }

    pub fn with_item(mut self, pos: Position, template: ItemTemplate) -> Self {
        self.items.push((pos, template));
        self
    }

    pub fn with_portal(mut self, at: Position, level: impl Into<String>, to: Position) -> Self {
        self.portals.push(PortalSpec {
            at,
            level: level.into(),
            to,
        });
        self
    }

    pub fn build(&self, config: &GameConfig) -> Result<Level, LevelError> {
        Level::from_blueprint(self, config)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    /// Moved onto a closed trap and sprang it.
    Trapped,
    OpenedDoor,
    Attacked,
    Blocked,
    Ignored,
}

#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    pub player: Character,
    pub monsters: HashMap<Position, Monster>,
    pub items: HashMap<Position, Vec<Item>>,
    /// Cells marked by the path debugger.
    pub debug: HashSet<Position>,
    pub portals: HashMap<Position, Portal>,
    pub battle: Option<Battle>,
    pub last_event: LastEvent,
    pub events: EventLog,
    pub(crate) config: GameConfig,
}

impl Level {
    pub fn from_blueprint(blueprint: &LevelBlueprint, config: &GameConfig) -> Result<Self, LevelError> {
        let mut grid = TileGrid::from_rows(&blueprint.tiles)?;
        for &(pos, overlay) in &blueprint.overlays {
            let tile = grid
                .tile_at_mut(pos)
                .ok_or(LevelError::OutOfBounds { pos })?;
            tile.overlay = Some(overlay);
        }
        ensure_open(&grid, blueprint.player, "player")?;

        let player = Character::from_template(&PLAYER, blueprint.player, PatternRng::from_entropy());
        let mut level = Level {
            name: blueprint.name.clone(),
            grid,
            player,
            monsters: HashMap::new(),
            items: HashMap::new(),
            debug: HashSet::new(),
            portals: HashMap::new(),
            battle: None,
            last_event: LastEvent::Idle,
            events: EventLog::new(config.event_capacity),
            config: config.clone(),
        };

        for (pos, template) in &blueprint.monsters {
            level.place_monster(template.spawn(*pos))?;
        }
        for (pos, template) in &blueprint.items {
            if !level.grid.in_bounds(*pos) {
                return Err(LevelError::OutOfBounds { pos: *pos });
            }
            level.items.entry(*pos).or_default().push(template.spawn(*pos));
        }
        for spec in &blueprint.portals {
            if !level.grid.in_bounds(spec.at) {
                return Err(LevelError::OutOfBounds { pos: spec.at });
            }
            level.portals.insert(
                spec.at,
                Portal {
                    level: spec.level.clone(),
                    pos: spec.to,
                },
            );
        }

        level.line_of_sight();
        Ok(level)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn place_monster(&mut self, monster: Monster) -> Result<(), LevelError> {
        let pos = monster.pos();
        ensure_open(&self.grid, pos, "monster")?;
        if pos == self.player.pos() || self.monsters.contains_key(&pos) {
            return Err(LevelError::DuplicateMonster { pos });
        }
        self.monsters.insert(pos, monster);
        Ok(())
    }

    pub fn monster_at(&self, pos: Position) -> Option<&Monster> {
        self.monsters.get(&pos)
    }

    pub fn items_at(&self, pos: Position) -> &[Item] {
        self.items.get(&pos).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn portal_at(&self, pos: Position) -> Option<&Portal> {
        self.portals.get(&pos)
    }

    pub fn astar(&self, start: Position, end: Position) -> Vec<Position> {
        path::astar(&self.grid, start, end)
    }

    /// Recomputes visibility from the player's cell.
    pub fn line_of_sight(&mut self) {
        fov::line_of_sight(&mut self.grid, self.player.pos(), self.player.sight_range);
    }

    pub(crate) fn add_event<S: Into<String>>(&mut self, entry: S) {
        self.events.push(entry);
    }

    /// Nothing moves while a battle is live or once the player is dead.
    pub fn board_frozen(&self) -> bool {
        self.last_event != LastEvent::Idle || self.player.is_dead()
    }

    /// Closes a resolved battle so the board moves again.
    pub fn settle_battle(&mut self) {
        if self.last_event == LastEvent::Damage {
            self.last_event = LastEvent::Idle;
            for monster in self.monsters.values_mut() {
                monster.input = MonsterInput::Idle;
            }
        }
    }

    /// Resolves a one-cell player step within this level.
    pub fn step_player(&mut self, to: Position) -> StepOutcome {
        if self.player.is_dead() || self.board_frozen() {
            return StepOutcome::Ignored;
        }
        if self.monsters.contains_key(&to) {
            return match self.attack(CombatantId::Player, CombatantId::Monster(to)) {
                Ok(()) => StepOutcome::Attacked,
                Err(_) => StepOutcome::Blocked,
            };
        }
        let Some(tile) = self.grid.tile_at(to) else {
            return StepOutcome::Blocked;
        };
        if tile.is_closed_door() {
            self.check_door(to);
            return StepOutcome::OpenedDoor;
        }
        if tile.blocks_move() {
            return StepOutcome::Blocked;
        }
        let trapped = tile.is_closed_trap();

        self.player.entity.pos = to;
        self.line_of_sight();
        if trapped && self.check_trap(to, CombatantId::Player) {
            return StepOutcome::Trapped;
        }
        StepOutcome::Moved
    }

    /// Opens a closed door at `pos`, then refreshes sightlines.
    pub fn check_door(&mut self, pos: Position) -> bool {
        let opened = self.grid.tile_at_mut(pos).is_some_and(|tile| tile.open_door());
        if opened {
            self.add_event("You opened a door.");
            self.line_of_sight();
        }
        opened
    }

    /// Springs a closed trap at `pos` on `victim`.
    pub fn check_trap(&mut self, pos: Position, victim: CombatantId) -> bool {
        let sprung = self.grid.tile_at_mut(pos).is_some_and(|tile| tile.spring_trap());
        if !sprung {
            return false;
        }
        let penalty = self.config.trap;
        let Some(character) = self.character_mut(victim) else {
            return true;
        };
        character.hitpoints = penalty.apply(character.hitpoints);
        let line = match victim {
            CombatantId::Player => "You triggered a trap!".to_string(),
            CombatantId::Monster(_) => format!("{} triggered a trap!", character.name()),
        };
        let dead = character.is_dead();
        self.add_event(line);
        if dead {
            self.kill(victim);
        }
        self.line_of_sight();
        true
    }

    /// A dead monster leaves the level and drops everything it carried. A
    /// dead player stays put, keeps its inventory and freezes.
    pub fn kill(&mut self, who: CombatantId) {
        match who {
            CombatantId::Player => {
                self.player.speed = 0.0;
                self.player.entity.glyph = DEAD_GLYPH;
                self.player.burst = None;
                self.add_event("You died.");
                info!("player died in `{}`", self.name);
            }
            CombatantId::Monster(pos) => {
                let Some(monster) = self.monsters.remove(&pos) else {
                    return;
                };
                let mut character = monster.character;
                let at = character.pos();
                let loot = std::mem::take(&mut character.items);
                if !loot.is_empty() {
                    let stack = self.items.entry(at).or_default();
                    stack.extend(loot.into_iter().map(|mut item| {
                        item.entity.pos = at;
                        item
                    }));
                }
                self.add_event(format!("The {} dies.", character.name()));
                info!("{} died at {:?} in `{}`", character.name(), at, self.name);
            }
        }
    }
}

fn ensure_open(grid: &TileGrid, pos: Position, what: &'static str) -> Result<(), LevelError> {
    if !grid.in_bounds(pos) {
        return Err(LevelError::OutOfBounds { pos });
    }
    if !grid.is_walkable(pos) {
        return Err(LevelError::Blocked { what, pos });
    }
    Ok(())
}
