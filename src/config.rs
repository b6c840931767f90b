//! World and game-rules configuration
//!
//! Everything the playfield builder and the simulation treat as tunable.
//! Serialized as JSON so a cabinet variant is a data file, not a rebuild.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts;

/// Complete machine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    // === World ===
    pub gravity: Vec3,
    /// Surface friction shared by deck, walls, pusher and coins
    pub friction: f32,
    pub restitution: f32,

    // === Playfield ===
    /// Deck half-extents; the top surface sits at y = 0
    pub platform_half_extents: Vec3,
    pub wall_thickness: f32,
    /// Wall height above the deck
    pub wall_height: f32,

    // === Pusher ===
    pub pusher_half_extents: Vec3,
    /// Rest-center of the stroke along the push axis
    pub pusher_base: f32,
    /// Half the total stroke width
    pub pusher_amplitude: f32,
    /// Seconds per full out-and-back cycle
    pub pusher_period: f32,

    // === Drop zone ===
    pub drop_zone_center: Vec3,
    pub drop_zone_half_extents: Vec3,

    // === Coins ===
    pub coin_radius: f32,
    pub coin_half_height: f32,
    pub coin_density: f32,

    // === Game rules ===
    /// Coins in the bank at game start
    pub initial_coins: u32,
    /// Height coins are released from
    pub spawn_height: f32,
    /// Randomized drop area bounds along x
    pub spawn_x: [f32; 2],
    /// Randomized drop area bounds along the push axis
    pub spawn_z: [f32; 2],
    /// Seconds between collection and body removal
    pub removal_delay: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_array(consts::GRAVITY),
            friction: consts::FRICTION,
            restitution: consts::RESTITUTION,

            platform_half_extents: Vec3::from_array(consts::PLATFORM_HALF_EXTENTS),
            wall_thickness: consts::WALL_THICKNESS,
            wall_height: consts::WALL_HEIGHT,

            pusher_half_extents: Vec3::from_array(consts::PUSHER_HALF_EXTENTS),
            pusher_base: consts::PUSHER_BASE,
            pusher_amplitude: consts::PUSHER_AMPLITUDE,
            pusher_period: consts::PUSHER_PERIOD,

            drop_zone_center: Vec3::from_array(consts::DROP_ZONE_CENTER),
            drop_zone_half_extents: Vec3::from_array(consts::DROP_ZONE_HALF_EXTENTS),

            coin_radius: consts::COIN_RADIUS,
            coin_half_height: consts::COIN_HALF_HEIGHT,
            coin_density: consts::COIN_DENSITY,

            initial_coins: consts::INITIAL_COINS,
            spawn_height: consts::SPAWN_HEIGHT,
            spawn_x: consts::SPAWN_X,
            spawn_z: consts::SPAWN_Z,
            removal_delay: consts::REMOVAL_DELAY,
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Bad config {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the config as pretty JSON.
    pub fn save(&self, path: &Path) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            if let Err(e) = fs::write(path, json) {
                log::warn!("Could not write {}: {e}", path.display());
            }
        }
    }
}
