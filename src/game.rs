use std::collections::HashMap;
use std::mem;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

use crate::battle::CombatantId;
use crate::battle::autoplay::{AutoplayHandle, spawn_autoplay};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::intent::{ClientId, Direction, Intent};
use crate::level::{Level, LevelBlueprint, Portal, SharedLevel, lock, share};
use crate::map::Position;

/// All levels of a session, by name. Portals resolve through here.
#[derive(Default)]
pub struct LevelRegistry {
    levels: HashMap<String, SharedLevel>,
}

impl LevelRegistry {
    pub fn insert(&mut self, level: Level) -> Result<(), GameError> {
        let name = level.name.clone();
        if self.levels.contains_key(&name) {
            return Err(GameError::DuplicateLevel(name));
        }
        self.levels.insert(name, share(level));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&SharedLevel, GameError> {
        self.levels
            .get(name)
            .ok_or_else(|| GameError::UnknownLevel(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.levels.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    fn check_portals(&self) -> Result<(), GameError> {
        for (name, shared) in &self.levels {
            let portals: Vec<(Position, Portal)> = lock(shared)
                .portals
                .iter()
                .map(|(at, portal)| (*at, portal.clone()))
                .collect();
            for (at, portal) in portals {
                let dangling = || GameError::DanglingPortal {
                    from: name.clone(),
                    pos: at,
                    target: portal.level.clone(),
                };
                let target = self.levels.get(&portal.level).ok_or_else(dangling)?;
                if !lock(target).grid.is_walkable(portal.pos) {
                    return Err(dangling());
                }
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Game {
    config: GameConfig,
    registry: LevelRegistry,
    current_name: String,
    current: SharedLevel,
    intents: Receiver<Intent>,
    clients: Vec<(ClientId, Sender<Arc<Level>>)>,
    next_client: u64,
    autoplay: Vec<AutoplayHandle>,
}

impl Game {
    /// Validates every blueprint and portal, then returns the game together
    /// with the sending half of its intent queue.
    pub fn new(
        config: GameConfig,
        blueprints: &[LevelBlueprint],
        start: &str,
    ) -> Result<(Self, Sender<Intent>), GameError> {
        config.validate()?;
        let mut registry = LevelRegistry::default();
        for blueprint in blueprints {
            registry.insert(blueprint.build(&config)?)?;
        }
        registry.check_portals()?;
        let current = registry.get(start)?.clone();

        let (intent_tx, intent_rx) = crossbeam_channel::unbounded();
        let game = Self {
            config,
            registry,
            current_name: start.to_string(),
            current,
            intents: intent_rx,
            clients: Vec::new(),
            next_client: 0,
            autoplay: Vec::new(),
        };
        Ok((game, intent_tx))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    pub fn current_level(&self) -> &SharedLevel {
        &self.current
    }

    pub fn current_name(&self) -> &str {
        &self.current_name
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Autoplay workers not yet reaped.
    pub fn autoplay_count(&self) -> usize {
        self.autoplay.len()
    }

    pub fn register_client(&mut self) -> (ClientId, Receiver<Arc<Level>>) {
        let (tx, rx) = crossbeam_channel::bounded(self.config.snapshot_capacity);
        let id = ClientId(self.next_client);
        self.next_client += 1;
        self.clients.push((id, tx));
        (id, rx)
    }

    fn unregister(&mut self, id: ClientId) {
        let before = self.clients.len();
        self.clients.retain(|(client, _)| *client != id);
        if self.clients.len() == before {
            debug!("close requested for unknown client {id:?}");
        }
    }

    pub fn snapshot(&self) -> Arc<Level> {
        Arc::new(lock(&self.current).clone())
    }

    /// Sends the current level to every client, waiting on full queues.
    /// Clients whose receiver is gone are dropped.
    pub fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.clients.retain(|(id, tx)| match tx.send(Arc::clone(&snapshot)) {
            Ok(()) => true,
            Err(_) => {
                warn!("client {id:?} disconnected, dropping it");
                false
            }
        });
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Result<Flow, GameError> {
        match intent {
            Intent::QuitGame => return Ok(Flow::Quit),
            Intent::CloseWindow(id) => {
                self.unregister(id);
                return Ok(Flow::Continue);
            }
            _ => {}
        }

        let shared = Arc::clone(&self.current);
        let mut level = lock(&shared);
        level.settle_battle();
        if level.player.is_dead() {
            debug!("ignoring {intent:?} from a dead player");
            return Ok(Flow::Continue);
        }

        match intent {
            Intent::Move(dir) if level.is_attacking(CombatantId::Player) => {
                level.player_note(dir.lane());
            }
            Intent::Move(dir) if level.board_frozen() => {
                debug!("board frozen, ignoring {dir:?}");
            }
            Intent::Move(dir) => {
                let to = level.player.pos() + dir.delta();
                match level.portal_at(to).cloned() {
                    Some(portal) => {
                        drop(level);
                        self.traverse(&portal, dir)?;
                    }
                    None => {
                        let outcome = level.step_player(to);
                        debug!("player step {dir:?}: {outcome:?}");
                    }
                }
            }
            Intent::TakeItem(key) => level.move_item(key, CombatantId::Player)?,
            Intent::DropItem(id) => level.drop_item(id, CombatantId::Player)?,
            Intent::None | Intent::CloseWindow(_) | Intent::QuitGame => {}
        }
        Ok(Flow::Continue)
    }

    /// Carries the player character into the portal's level.
    fn traverse(&mut self, portal: &Portal, dir: Direction) -> Result<(), GameError> {
        let target = Arc::clone(self.registry.get(&portal.level)?);
        if Arc::ptr_eq(&target, &self.current) {
            let mut level = lock(&target);
            if level.monsters.contains_key(&portal.pos) {
                debug!("portal exit {:?} occupied", portal.pos);
                return Ok(());
            }
            level.player.entity.pos = portal.pos;
            level.line_of_sight();
            return Ok(());
        }

        {
            let mut from = lock(&self.current);
            let mut to = lock(&target);
            if to.monsters.contains_key(&portal.pos) {
                debug!("portal exit {:?} in `{}` occupied", portal.pos, portal.level);
                return Ok(());
            }
            mem::swap(&mut from.player, &mut to.player);
            to.player.entity.pos = portal.pos;
            to.line_of_sight();
        }
        info!(
            "player took portal {dir:?} from `{}` to `{}` at {:?}",
            self.current_name, portal.level, portal.pos
        );
        self.current_name = portal.level.clone();
        self.current = target;
        Ok(())
    }

    /// Runs one monster round on the current level and starts autoplay for
    /// any monster that opened a battle.
    pub fn tick(&mut self) {
        self.reap_autoplay();
        let shared = Arc::clone(&self.current);
        let attackers = lock(&shared).update_monsters();
        for at in attackers {
            match spawn_autoplay(Arc::clone(&shared), at, self.config.autoplay.clone()) {
                Ok(handle) => self.autoplay.push(handle),
                Err(err) => warn!("could not start autoplay for {at:?}: {err}"),
            }
        }
    }

    fn reap_autoplay(&mut self) {
        let (done, running): (Vec<_>, Vec<_>) = mem::take(&mut self.autoplay)
            .into_iter()
            .partition(AutoplayHandle::is_finished);
        self.autoplay = running;
        for handle in done {
            let at = handle.attacker();
            let outcome = handle.join();
            debug!("autoplay for {at:?} finished: {outcome:?}");
        }
    }

    /// Applies one intent, then advances the monsters and publishes.
    pub fn step(&mut self, intent: Intent) -> Flow {
        let flow = self.handle_intent(intent).unwrap_or_else(|err| {
            warn!("rejected {intent:?}: {err}");
            Flow::Continue
        });
        if flow == Flow::Continue {
            self.tick();
            self.publish();
        }
        flow
    }

    /// Drives the game until `QuitGame` arrives or every intent sender is
    /// dropped.
    pub fn run(mut self) {
        info!("game loop started on `{}`", self.current_name);
        self.publish();
        while let Ok(intent) = self.intents.recv() {
            if self.step(intent) == Flow::Quit {
                break;
            }
        }
        self.shutdown();
        info!("game loop stopped");
    }

    /// Cancels and joins every autoplay worker, then closes all clients.
    pub fn shutdown(&mut self) {
        for handle in &mut self.autoplay {
            handle.cancel();
        }
        for handle in self.autoplay.drain(..) {
            let at = handle.attacker();
            let outcome = handle.join();
            debug!("autoplay for {at:?} stopped: {outcome:?}");
        }
        self.clients.clear();
    }
}
