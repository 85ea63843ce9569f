//! Background key presses for monster bursts.
//!
//! A monster that attacks gets one worker thread. The worker sleeps with the
//! level unlocked, then takes the lock just long enough to clear one note.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bracket_random::prelude::RandomNumberGenerator;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};

use super::NoteOutcome;
use crate::config::AutoplayConfig;
use crate::level::{SharedLevel, lock};
use crate::map::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoplayOutcome {
    Completed { damage: i32 },
    Cancelled,
}

pub struct AutoplayHandle {
    attacker: Position,
    cancel: Option<Sender<()>>,
    worker: JoinHandle<AutoplayOutcome>,
}

impl AutoplayHandle {
    pub fn attacker(&self) -> Position {
        self.attacker
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Wakes the worker out of any pending sleep; it exits without touching
    /// the level again.
    pub fn cancel(&mut self) {
        self.cancel.take();
    }

    pub fn join(mut self) -> AutoplayOutcome {
        self.cancel.take();
        match self.worker.join() {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("autoplay worker for {:?} panicked", self.attacker);
                AutoplayOutcome::Cancelled
            }
        }
    }
}

pub fn spawn_autoplay(
    level: SharedLevel,
    attacker: Position,
    config: AutoplayConfig,
) -> io::Result<AutoplayHandle> {
    let (cancel, cancelled) = crossbeam_channel::bounded::<()>(0);
    let worker = thread::Builder::new()
        .name(format!("autoplay-{}-{}", attacker.x, attacker.y))
        .spawn(move || play_burst(&level, attacker, &config, &cancelled))?;
    debug!("autoplay started for monster at {attacker:?}");
    Ok(AutoplayHandle {
        attacker,
        cancel: Some(cancel),
        worker,
    })
}

fn play_burst(
    level: &SharedLevel,
    attacker: Position,
    config: &AutoplayConfig,
    cancelled: &Receiver<()>,
) -> AutoplayOutcome {
    if !pause(cancelled, config.initial_delay_ms) {
        return AutoplayOutcome::Cancelled;
    }
    let mut rng = RandomNumberGenerator::new();
    loop {
        let wait = rng.range(config.min_interval_ms, config.max_interval_ms + 1);
        if !pause(cancelled, wait) {
            return AutoplayOutcome::Cancelled;
        }
        match lock(level).autoplay_note(attacker) {
            Some(NoteOutcome::Resolved { damage }) => {
                debug!("autoplay for {attacker:?} landed {damage}");
                return AutoplayOutcome::Completed { damage };
            }
            Some(_) => {}
            // Battle ended or moved on without us.
            None => return AutoplayOutcome::Cancelled,
        }
    }
}

/// Sleeps for `millis`; false if cancelled first.
fn pause(cancelled: &Receiver<()>, millis: u64) -> bool {
    matches!(
        cancelled.recv_timeout(Duration::from_millis(millis)),
        Err(RecvTimeoutError::Timeout)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{CombatantId, LastEvent};
    use crate::data::monsters::RAT;
    use crate::level::LevelBlueprint;
    use bracket_geometry::prelude::Point;
    use std::sync::{Arc, Mutex};

    fn quick() -> AutoplayConfig {
        AutoplayConfig {
            initial_delay_ms: 1,
            min_interval_ms: 1,
            max_interval_ms: 3,
        }
    }

    fn armed_level(attacker: Point) -> SharedLevel {
        let mut level = LevelBlueprint::open("autoplay", 10, 10, Point::new(5, 5))
            .build(&Default::default())
            .unwrap();
        level.place_monster(RAT.spawn_seeded(attacker, 3)).unwrap();
        level
            .attack(CombatantId::Monster(attacker), CombatantId::Player)
            .unwrap();
        Arc::new(Mutex::new(level))
    }

    #[test]
    fn clears_burst_and_lands_damage() {
        let rat = Point::new(5, 4);
        let level = armed_level(rat);
        let before = lock(&level).player.hitpoints;

        let handle = spawn_autoplay(level.clone(), rat, quick()).unwrap();
        assert_eq!(handle.join(), AutoplayOutcome::Completed { damage: 1 });

        let level = lock(&level);
        assert_eq!(level.last_event, LastEvent::Damage);
        assert_eq!(level.player.hitpoints, before - 1);
        assert_eq!(
            level.monsters[&rat].input,
            crate::entity::MonsterInput::KeyPress
        );
    }

    #[test]
    fn cancel_stops_before_any_note() {
        let rat = Point::new(5, 4);
        let level = armed_level(rat);
        let slow = AutoplayConfig {
            initial_delay_ms: 60_000,
            ..quick()
        };

        let mut handle = spawn_autoplay(level.clone(), rat, slow).unwrap();
        handle.cancel();
        assert_eq!(handle.join(), AutoplayOutcome::Cancelled);
        let level = lock(&level);
        assert_eq!(level.last_event, LastEvent::Attack);
        let burst = level.monsters[&rat].character.burst.clone().unwrap();
        assert_eq!(burst.notes.len(), burst.max_combo);
    }

    #[test]
    fn gives_up_when_battle_is_gone() {
        let rat = Point::new(5, 4);
        let level = armed_level(rat);
        lock(&level).last_event = LastEvent::Idle;
        let handle = spawn_autoplay(level, rat, quick()).unwrap();
        assert_eq!(handle.join(), AutoplayOutcome::Cancelled);
    }
}
