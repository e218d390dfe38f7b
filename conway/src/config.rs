// config.rs - World size and anti-stagnation policy settings

use serde::{Deserialize, Serialize};

use crate::error::{WorldError, WorldResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Number of recent generation fingerprints kept for stagnation checks.
    pub max_history: usize,
    /// Chance (0-100) per `handle_stuck` call of spawning a glider.
    pub glider_chance_percent: u32,
    /// Fixed RNG seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 38,
            height: 38,
            max_history: 10,
            glider_chance_percent: 5,
            seed: None,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> WorldResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::InvalidDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_history == 0 {
            return Err(WorldError::config("max_history must be at least 1"));
        }
        if self.glider_chance_percent > 100 {
            return Err(WorldError::config(format!(
                "glider_chance_percent must be within 0..=100, got {}",
                self.glider_chance_percent
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_history, 10);
        assert_eq!(config.glider_chance_percent, 5);
    }

    #[test]
    fn test_rejects_zero_width() {
        let config = WorldConfig { width: 0, ..WorldConfig::default() };
        assert_eq!(
            config.validate(),
            Err(WorldError::InvalidDimension { width: 0, height: 38 })
        );
    }

    #[test]
    fn test_rejects_bad_history_and_chance() {
        let config = WorldConfig { max_history: 0, ..WorldConfig::default() };
        assert!(matches!(config.validate(), Err(WorldError::InvalidConfig(_))));

        let config = WorldConfig { glider_chance_percent: 101, ..WorldConfig::default() };
        assert!(matches!(config.validate(), Err(WorldError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: WorldConfig = serde_json::from_str(r#"{"width": 12, "seed": 9}"#).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 38);
        assert_eq!(config.seed, Some(9));
    }
}
