//! House configuration - every tunable of the haunt in one struct.
//!
//! `HouseConfig::default()` reproduces the reference house: a 60x60
//! floor plan, seven patrol waypoints, eight ceiling fixtures, the exit
//! on the west wall. Configs can also be loaded from a JSON manifest
//! (see `data/house_manifest.json`) and validated before use.

use serde::{Deserialize, Serialize};

use crate::components::Vec3;

/// A ceiling light fixture as declared in the house manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightFixture {
    pub name: String,
    pub position: Vec3,
    pub base_intensity: f32,
}

/// Static parameters of a haunt session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseConfig {
    /// Ghost notices the player inside this radius.
    pub detection_range: f32,
    /// Ghost kills inside this radius. Must be below `detection_range`.
    pub kill_range: f32,
    /// Base chase speed; aggression is added on top.
    pub chase_speed: f32,
    pub patrol_speed: f32,
    /// The ghost never changes elevation; it floats at this height.
    pub patrol_height: f32,
    /// A waypoint counts as reached inside this radius.
    pub waypoint_radius: f32,
    /// Floor under the shrinking teleport interval. The interval formula
    /// goes negative at high aggression without this.
    pub min_teleport_interval: f32,
    /// Teleport destinations are clamped to `[-ghost_bound, ghost_bound]`
    /// on both horizontal axes.
    pub ghost_bound: f32,
    /// The player position is clamped to this bound each tick.
    pub player_bound: f32,
    /// Reaching within this distance of the exit wins the session.
    pub exit_radius: f32,
    pub player_spawn: Vec3,
    pub ghost_spawn: Vec3,
    pub exit_position: Vec3,
    /// Ordered patrol loop. Must not be empty.
    pub patrol_points: Vec<Vec3>,
    pub lights: Vec<LightFixture>,
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            detection_range: 15.0,
            kill_range: 1.5,
            chase_speed: 4.5,
            patrol_speed: 2.0,
            patrol_height: 2.0,
            waypoint_radius: 2.0,
            min_teleport_interval: 1.0,
            ghost_bound: 28.0,
            player_bound: 29.0,
            exit_radius: 3.0,
            player_spawn: Vec3::new(-25.0, 2.0, -25.0),
            ghost_spawn: Vec3::new(20.0, 2.0, 20.0),
            exit_position: Vec3::new(-29.5, 2.0, 0.0),
            patrol_points: vec![
                Vec3::new(-20.0, 2.0, -20.0),
                Vec3::new(20.0, 2.0, -20.0),
                Vec3::new(20.0, 2.0, 20.0),
                Vec3::new(-20.0, 2.0, 20.0),
                Vec3::new(0.0, 2.0, 0.0),
                Vec3::new(-10.0, 2.0, 15.0),
                Vec3::new(15.0, 2.0, -10.0),
            ],
            lights: vec![
                fixture("Entrance", -20.0, -20.0),
                fixture("Living Room", 20.0, -20.0),
                fixture("Kitchen", -20.0, 20.0),
                fixture("Bedroom", 22.0, 22.0),
                fixture("Bathroom", 0.0, 22.0),
                fixture("Center", 0.0, 0.0),
                fixture("Hallway North", -10.0, -10.0),
                fixture("Hallway South", 10.0, 10.0),
            ],
        }
    }
}

fn fixture(name: &str, x: f32, z: f32) -> LightFixture {
    LightFixture {
        name: name.to_string(),
        position: Vec3::new(x, 7.0, z),
        base_intensity: 0.8,
    }
}

impl HouseConfig {
    /// Parse and validate a config from the JSON house manifest.
    pub fn from_manifest_json(json: &str) -> Result<Self, ConfigError> {
        let config: HouseConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.patrol_points.is_empty() {
            return Err(ConfigError::Invalid("patrol_points must not be empty"));
        }
        if !(self.detection_range > 0.0) {
            return Err(ConfigError::Invalid("detection_range must be positive"));
        }
        if !(self.kill_range > 0.0) || self.kill_range >= self.detection_range {
            return Err(ConfigError::Invalid(
                "kill_range must be positive and below detection_range",
            ));
        }
        if !(self.min_teleport_interval > 0.0) {
            return Err(ConfigError::Invalid(
                "min_teleport_interval must be positive",
            ));
        }
        if !(self.chase_speed > 0.0) || !(self.patrol_speed > 0.0) {
            return Err(ConfigError::Invalid("movement speeds must be positive"));
        }
        if !(self.ghost_bound > 0.0) || !(self.player_bound > 0.0) {
            return Err(ConfigError::Invalid("bounds must be positive"));
        }
        if !(self.exit_radius > 0.0) {
            return Err(ConfigError::Invalid("exit_radius must be positive"));
        }
        for light in &self.lights {
            if !(light.base_intensity > 0.0) {
                return Err(ConfigError::Invalid(
                    "light base_intensity must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Errors from loading or validating a house config.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "manifest parse error: {}", e),
            ConfigError::Invalid(reason) => write!(f, "invalid house config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = HouseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.patrol_points.len(), 7);
        assert_eq!(config.lights.len(), 8);
    }

    #[test]
    fn test_manifest_roundtrip() {
        let config = HouseConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = HouseConfig::from_manifest_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_empty_patrol_rejected() {
        let mut config = HouseConfig::default();
        config.patrol_points.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_kill_range_must_be_below_detection() {
        let mut config = HouseConfig::default();
        config.kill_range = config.detection_range;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_garbage_manifest_is_parse_error() {
        assert!(matches!(
            HouseConfig::from_manifest_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
