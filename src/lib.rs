//! Penny Push - an arcade coin pusher simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pusher actuator, coin lifecycle, economy)
//! - `physics`: rapier3d boundary (playfield bodies, stepping, trigger events)
//! - `config`: Data-driven world and rules configuration
//!
//! The renderer and control panel are external collaborators: they feed
//! [`sim::TickInput`]s into [`sim::tick`] once per frame and read counters,
//! events and body poses back. Nothing in this crate draws.

pub mod config;
pub mod physics;
pub mod sim;

pub use config::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Gravity (m/s^2)
    pub const GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];
    /// Surface friction shared by deck, walls, pusher and coins
    pub const FRICTION: f32 = 0.6;
    /// Restitution default (coins barely bounce)
    pub const RESTITUTION: f32 = 0.1;

    /// Deck half-extents; the top surface sits at y = 0
    pub const PLATFORM_HALF_EXTENTS: [f32; 3] = [3.0, 0.25, 5.0];
    /// Wall slab half-thickness
    pub const WALL_THICKNESS: f32 = 0.25;
    /// Wall height above the deck
    pub const WALL_HEIGHT: f32 = 2.5;

    /// Pusher slab half-extents
    pub const PUSHER_HALF_EXTENTS: [f32; 3] = [2.9, 0.5, 1.0];
    /// Rest-center of the pusher stroke along the push axis
    pub const PUSHER_BASE: f32 = -4.0;
    /// Half the total stroke width
    pub const PUSHER_AMPLITUDE: f32 = 1.5;
    /// Seconds per full out-and-back pusher cycle
    pub const PUSHER_PERIOD: f32 = 2.0;

    /// Collection volume past the +z deck edge, below deck level
    pub const DROP_ZONE_CENTER: [f32; 3] = [0.0, -1.0, 6.0];
    pub const DROP_ZONE_HALF_EXTENTS: [f32; 3] = [3.5, 0.75, 1.0];

    /// Coin disc dimensions
    pub const COIN_RADIUS: f32 = 0.35;
    pub const COIN_HALF_HEIGHT: f32 = 0.07;
    /// Coin collider density (kg per cubic unit)
    pub const COIN_DENSITY: f32 = 2.0;

    /// Coins in the bank at game start
    pub const INITIAL_COINS: u32 = 10;
    /// Release height of inserted coins
    pub const SPAWN_HEIGHT: f32 = 3.0;
    /// Randomized drop area bounds along x
    pub const SPAWN_X: [f32; 2] = [-2.0, 2.0];
    /// Randomized drop area bounds along the push axis
    pub const SPAWN_Z: [f32; 2] = [-4.0, -2.0];
    /// Seconds between collection and body removal
    pub const REMOVAL_DELAY: f32 = 0.1;
}
