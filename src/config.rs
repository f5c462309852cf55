//! Simulation tuning
//!
//! Every constant the simulation scales by lives here so hosts can ship a
//! JSON file instead of recompiling. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration errors (startup or resize)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arena dimensions must be positive and finite, got {width}x{height}")]
    InvalidArena { width: f32, height: f32 },
    #[error("config field `{field}` must be positive and finite")]
    InvalidValue { field: &'static str },
    #[error("unknown cap policy `{0}`")]
    UnknownCapPolicy(String),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What `fire` does when the craft already has the maximum number of shots out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CapPolicy {
    /// Wipe every active projectile and start a fresh burst
    #[default]
    BurstReset,
    /// Ignore the shot
    Reject,
}

impl CapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapPolicy::BurstReset => "BurstReset",
            CapPolicy::Reject => "Reject",
        }
    }

}

impl FromStr for CapPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "burstreset" | "burst" | "reset" => Ok(CapPolicy::BurstReset),
            "reject" => Ok(CapPolicy::Reject),
            _ => Err(ConfigError::UnknownCapPolicy(s.to_string())),
        }
    }
}

/// Simulation tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Nominal ticks per second used for velocity scaling
    pub tick_rate: f32,

    // === Craft ===
    pub ship_radius: f32,
    /// Acceleration while thrusting
    pub ship_thrust: f32,
    /// Fraction of velocity bled off per second while coasting
    pub friction: f32,
    pub turn_deg_per_sec: f32,

    // === Projectiles ===
    pub laser_speed: f32,
    /// Max projectiles alive per craft
    pub laser_max: usize,
    /// Max travel distance as a fraction of arena width
    pub laser_distance: f32,
    pub cap_policy: CapPolicy,

    // === Obstacle field ===
    pub initial_obstacles: usize,
    /// Radius multiple around the craft that fresh obstacles try to avoid
    pub spawn_buffer_factor: f32,
    /// Below this radius an obstacle is destroyed without splitting
    pub fragment_min_radius: f32,
    /// Repopulate the field once every obstacle has been destroyed
    pub refill_when_cleared: bool,

    // === Session ===
    pub starting_lives: u32,
    /// Wall-clock delay between an explosion and the replacement craft
    pub respawn_delay_ms: f64,
    /// Wall-clock grace window after a respawn
    pub invulnerability_ms: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,

            ship_radius: SHIP_RADIUS,
            ship_thrust: SHIP_THRUST,
            friction: FRICTION,
            turn_deg_per_sec: TURN_DEG_PER_SEC,

            laser_speed: LASER_SPEED,
            laser_max: LASER_MAX,
            laser_distance: LASER_DISTANCE,
            cap_policy: CapPolicy::BurstReset,

            initial_obstacles: INITIAL_OBSTACLES,
            spawn_buffer_factor: SPAWN_BUFFER_FACTOR,
            fragment_min_radius: FRAGMENT_MIN_RADIUS,
            refill_when_cleared: true,

            starting_lives: STARTING_LIVES,
            respawn_delay_ms: RESPAWN_DELAY_MS,
            invulnerability_ms: INVULNERABILITY_MS,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot scale by
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tick_rate", self.tick_rate),
            ("ship_radius", self.ship_radius),
            ("ship_thrust", self.ship_thrust),
            ("turn_deg_per_sec", self.turn_deg_per_sec),
            ("laser_speed", self.laser_speed),
            ("laser_distance", self.laser_distance),
            ("spawn_buffer_factor", self.spawn_buffer_factor),
            ("fragment_min_radius", self.fragment_min_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue { field });
            }
        }

        // Below one tick per second the friction step could overshoot zero
        if self.tick_rate < 1.0 {
            return Err(ConfigError::InvalidValue { field: "tick_rate" });
        }
        // Friction of zero is a legal "frictionless space" setting
        if !(self.friction.is_finite() && (0.0..=1.0).contains(&self.friction)) {
            return Err(ConfigError::InvalidValue { field: "friction" });
        }
        if self.laser_max == 0 {
            return Err(ConfigError::InvalidValue { field: "laser_max" });
        }
        if !(self.respawn_delay_ms.is_finite() && self.respawn_delay_ms >= 0.0) {
            return Err(ConfigError::InvalidValue { field: "respawn_delay_ms" });
        }
        if !(self.invulnerability_ms.is_finite() && self.invulnerability_ms >= 0.0) {
            return Err(ConfigError::InvalidValue { field: "invulnerability_ms" });
        }
        Ok(())
    }

    /// Turn rate in radians per tick
    pub fn turn_rate(&self) -> f32 {
        crate::to_radians(self.turn_deg_per_sec) / self.tick_rate
    }
}

/// Check host-supplied arena dimensions
pub fn validate_arena(width: f32, height: f32) -> Result<(), ConfigError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidArena { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{ "starting_lives": 3, "cap_policy": "Reject" }"#)
            .expect("valid config");
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.cap_policy, CapPolicy::Reject);
        assert_eq!(config.laser_max, LASER_MAX);
        assert_eq!(config.tick_rate, TICK_RATE);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SimConfig::from_json_str(r#"{ "tick_rate": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "tick_rate" }));

        let err = SimConfig::from_json_str(r#"{ "friction": 1.5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "friction" }));

        let err = SimConfig::from_json_str(r#"{ "laser_max": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "laser_max" }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_arena() {
        assert!(validate_arena(800.0, 600.0).is_ok());
        assert!(validate_arena(0.0, 600.0).is_err());
        assert!(validate_arena(800.0, -1.0).is_err());
        assert!(validate_arena(f32::NAN, 600.0).is_err());
    }

    #[test]
    fn test_cap_policy_parse() {
        assert_eq!("reject".parse::<CapPolicy>().unwrap(), CapPolicy::Reject);
        assert_eq!("Burst".parse::<CapPolicy>().unwrap(), CapPolicy::BurstReset);
        let err = "nope".parse::<CapPolicy>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCapPolicy(ref raw) if raw == "nope"));
        for policy in [CapPolicy::BurstReset, CapPolicy::Reject] {
            assert_eq!(policy.as_str().parse::<CapPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_turn_rate() {
        let config = SimConfig::default();
        // 360 deg/s at 60 Hz = 6 degrees per tick
        assert!((config.turn_rate() - 6.0_f32.to_radians()).abs() < 1e-6);
    }
}
