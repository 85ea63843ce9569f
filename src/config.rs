use serde::Deserialize;

use crate::error::ConfigError;
use crate::intent::Direction;

/// Tunables for a game session. Every field has a default, so a partial JSON
/// document is enough to override a single value.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Size of the rhythm alphabet. The player plays one lane per
    /// direction, so this is capped at the number of directions.
    pub lanes: usize,
    /// Notes per burst; also the burst's max combo.
    pub burst_length: usize,
    pub event_capacity: usize,
    pub damage: DamageConfig,
    pub trap: TrapPenalty,
    pub autoplay: AutoplayConfig,
    /// Bound of each presentation client's snapshot queue.
    pub snapshot_capacity: usize,
    pub debug_paths: bool,
}

impl GameConfig {
    pub const DEFAULT_LANES: usize = 4;
    pub const DEFAULT_BURST_LENGTH: usize = 4;
    pub const DEFAULT_EVENT_CAPACITY: usize = 10;
    pub const DEFAULT_SNAPSHOT_CAPACITY: usize = 1;

    pub fn new() -> Self {
        Self {
            lanes: Self::DEFAULT_LANES,
            burst_length: Self::DEFAULT_BURST_LENGTH,
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
            damage: DamageConfig::default(),
            trap: TrapPenalty::default(),
            autoplay: AutoplayConfig::default(),
            snapshot_capacity: Self::DEFAULT_SNAPSHOT_CAPACITY,
            debug_paths: false,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes < 2 {
            return Err(ConfigError::Invalid(format!(
                "lanes must be at least 2, got {}",
                self.lanes
            )));
        }
        if self.lanes > Direction::ALL.len() {
            return Err(ConfigError::Invalid(format!(
                "lanes must be at most {}, got {}",
                Direction::ALL.len(),
                self.lanes
            )));
        }
        if self.burst_length == 0 {
            return Err(ConfigError::Invalid("burst_length must be positive".into()));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be positive".into()));
        }
        if self.damage.min_damage < 1 {
            return Err(ConfigError::Invalid(
                "damage.min_damage must be at least 1".into(),
            ));
        }
        if self.autoplay.min_interval_ms > self.autoplay.max_interval_ms {
            return Err(ConfigError::Invalid(format!(
                "autoplay interval {}..{} ms is inverted",
                self.autoplay.min_interval_ms, self.autoplay.max_interval_ms
            )));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `max(min_damage, round(base * weapon_multiplier - helmet))`, where `base`
/// is the attacker's weapon power (or `unarmed`) and `helmet` the defender's
/// helmet power (or zero).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub unarmed: f64,
    pub weapon_multiplier: f64,
    pub min_damage: i32,
}

impl DamageConfig {
    pub fn resolve(&self, weapon_power: Option<f64>, helmet_power: Option<f64>) -> i32 {
        let base = weapon_power.unwrap_or(self.unarmed) * self.weapon_multiplier;
        let raw = (base - helmet_power.unwrap_or(0.0)).round() as i32;
        raw.max(self.min_damage)
    }
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            unarmed: 1.0,
            weapon_multiplier: 1.0,
            min_damage: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum TrapPenalty {
    /// Drops the victim straight to zero hitpoints.
    #[default]
    Lethal,
    Damage(i32),
}

impl TrapPenalty {
    pub fn apply(self, hitpoints: i32) -> i32 {
        match self {
            TrapPenalty::Lethal => 0,
            TrapPenalty::Damage(amount) => hitpoints - amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AutoplayConfig {
    pub initial_delay_ms: u64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 50,
            min_interval_ms: 100,
            max_interval_ms: 700,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            GameConfig::from_json(r#"{ "burst_length": 6, "trap": { "Damage": 3 } }"#).unwrap();
        assert_eq!(config.burst_length, 6);
        assert_eq!(config.trap, TrapPenalty::Damage(3));
        assert_eq!(config.lanes, GameConfig::DEFAULT_LANES);
        assert_eq!(config.autoplay, AutoplayConfig::default());
    }

    #[test]
    fn rejects_unsatisfiable_settings() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "lanes": 1 }"#),
            Err(ConfigError::Invalid(_))
        ));
        // Lanes beyond the four directions could never be pressed.
        assert!(matches!(
            GameConfig::from_json(r#"{ "lanes": 6, "burst_length": 8 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(GameConfig::from_json(r#"{ "lanes": 4 }"#).is_ok());
        assert!(matches!(
            GameConfig::from_json(
                r#"{ "autoplay": { "min_interval_ms": 10, "max_interval_ms": 5 } }"#
            ),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unarmed_hit_deals_one() {
        let damage = DamageConfig::default();
        assert_eq!(damage.resolve(None, None), 1);
        assert_eq!(damage.resolve(Some(2.0), None), 2);
        assert_eq!(damage.resolve(Some(2.0), Some(0.5)), 2);
        assert_eq!(damage.resolve(None, Some(16.0)), 1);
    }

    #[test]
    fn trap_penalties() {
        assert_eq!(TrapPenalty::Lethal.apply(100), 0);
        assert_eq!(TrapPenalty::Damage(3).apply(10), 7);
    }
}
