//! Config domain: session tunables.
//!
//! Runs in OnEnter(GameState::Loading): reads `assets/config.ron` (embedded
//! into the binary on wasm), falls back to defaults on any error, inserts
//! the `GameConfig` resource, then moves the game into GameState::Playing.
//! A `GameConfig` that is already present (tests insert one) is kept as is.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;

#[cfg(not(target_arch = "wasm32"))]
use std::fs;

#[cfg(not(target_arch = "wasm32"))]
const CONFIG_PATH: &str = "assets/config.ron";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Real seconds per in-game day.
    pub day_duration_seconds: f32,
    /// Seconds from watering to harvestable.
    pub growth_duration_seconds: f64,
    /// Minimum per-axis distance between two plants.
    pub plant_spacing: f32,
    /// Pixels per second.
    pub player_speed: f32,
    pub starting_coins: u32,
    pub water_capacity: u32,
    pub stamina_max: f32,
    pub reminder_hour: u32,
    pub penalty_coins: u32,
    pub transition_seconds: f64,
    pub water_reach: f32,
    pub harvest_reach: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            day_duration_seconds: 600.0,
            growth_duration_seconds: 20.0,
            plant_spacing: 30.0,
            player_speed: 120.0,
            starting_coins: STARTING_COINS,
            water_capacity: WATER_CAPACITY,
            stamina_max: 100.0,
            reminder_hour: 22,
            penalty_coins: 20,
            transition_seconds: 1.0,
            water_reach: 48.0,
            harvest_reach: 48.0,
        }
    }
}

impl GameConfig {
    /// Parses RON text and rejects values the simulation cannot run with.
    pub fn from_ron(text: &str) -> Result<Self, String> {
        let config: GameConfig =
            ron::from_str(text).map_err(|e| format!("Config parse failed: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.day_duration_seconds <= 0.0 {
            return Err(format!(
                "day_duration_seconds must be positive, got {}",
                self.day_duration_seconds
            ));
        }
        if self.stamina_max <= 0.0 {
            return Err(format!("stamina_max must be positive, got {}", self.stamina_max));
        }
        if self.reminder_hour >= 24 {
            return Err(format!("reminder_hour must be 0..24, got {}", self.reminder_hour));
        }
        if self.transition_seconds <= 0.0 {
            return Err(format!(
                "transition_seconds must be positive, got {}",
                self.transition_seconds
            ));
        }
        Ok(())
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_config);
    }
}

fn load_config(
    mut commands: Commands,
    existing: Option<Res<GameConfig>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if existing.is_some() {
        info!("[Config] Using preset configuration");
    } else {
        let config = match read_config_source().and_then(|text| GameConfig::from_ron(&text)) {
            Ok(config) => {
                info!(
                    "[Config] Loaded: day {}s, growth {}s, spacing {}px",
                    config.day_duration_seconds,
                    config.growth_duration_seconds,
                    config.plant_spacing
                );
                config
            }
            Err(e) => {
                warn!("[Config] {}; using defaults", e);
                GameConfig::default()
            }
        };
        commands.insert_resource(config);
    }

    next_state.set(GameState::Playing);
}

#[cfg(not(target_arch = "wasm32"))]
fn read_config_source() -> Result<String, String> {
    fs::read_to_string(CONFIG_PATH).map_err(|e| format!("Read failed for {}: {}", CONFIG_PATH, e))
}

#[cfg(target_arch = "wasm32")]
fn read_config_source() -> Result<String, String> {
    Ok(include_str!("../../assets/config.ron").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = GameConfig::from_ron("(day_duration_seconds: 40.0, plant_spacing: 12.0)")
            .expect("partial config should parse");
        assert_eq!(config.day_duration_seconds, 40.0);
        assert_eq!(config.plant_spacing, 12.0);
        assert_eq!(config.reminder_hour, 22);
        assert_eq!(config.stamina_max, 100.0);
    }

    #[test]
    fn test_shipped_config_parses() {
        let text = include_str!("../../assets/config.ron");
        let config = GameConfig::from_ron(text).expect("shipped config must be valid");
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(GameConfig::from_ron("(day_duration_seconds: 0.0)").is_err());
        assert!(GameConfig::from_ron("(reminder_hour: 24)").is_err());
        assert!(GameConfig::from_ron("not ron at all").is_err());
    }
}
