//! Session state and coin entities
//!
//! Everything mutable outside the physics world lives on [`GameState`]: the
//! coin bank, the live coin map, the seeded RNG and the clock that drives
//! the pusher. Coins iterate in id order so event processing stays
//! deterministic.

use std::collections::BTreeMap;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use rapier3d::prelude::RigidBodyHandle;

use super::economy::Economy;
use crate::config::GameConfig;
use crate::physics::PhysicsWorld;

/// Coin entity identifier; unique within a session, restarts at reset
pub type CoinId = u32;

/// Lifecycle of a single coin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoinState {
    /// Under gravity/contact simulation; eligible for drop-zone contact
    Falling,
    /// Reached the drop zone; winnings already credited. Counts down so the
    /// body is never destroyed inside the step that reported the contact.
    Collected { removal_in: f32 },
    /// Countdown expired; the body is released by the next tick's sweep
    PendingRemoval,
}

/// A coin tracked by the session
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: CoinId,
    /// Randomized release position
    pub spawn_pos: Vec3,
    /// Non-owning handle; the physics world owns the body
    pub body: RigidBodyHandle,
    pub state: CoinState,
}

/// Notices produced by a tick for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CoinInserted { id: CoinId },
    /// Insert declined: the bank is empty. Nothing changed.
    InsertRejected,
    CoinCollected { id: CoinId },
    CoinRemoved { id: CoinId },
    MachineReset,
}

/// Complete session state (deterministic given seed and input sequence)
pub struct GameState {
    /// Run seed for reproducible spawn positions
    pub seed: u64,
    rng: Pcg32,
    pub(crate) economy: Economy,
    /// Live coins, id-ordered for deterministic iteration
    pub(crate) coins: BTreeMap<CoinId, Coin>,
    /// Simulation clock driving the pusher (seconds)
    pub elapsed: f32,
    pub config: GameConfig,
    next_id: CoinId,
}

impl GameState {
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            economy: Economy::new(config.initial_coins),
            coins: BTreeMap::new(),
            elapsed: 0.0,
            config,
            next_id: 0,
        }
    }

    /// Coins the player may still insert
    pub fn available_coins(&self) -> u32 {
        self.economy.available()
    }

    /// Coins collected so far
    pub fn won_coins(&self) -> u32 {
        self.economy.won()
    }

    /// Number of live coin entities
    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    /// Live coins in id order (read-only surface for rendering)
    pub fn coins(&self) -> impl Iterator<Item = &Coin> {
        self.coins.values()
    }

    /// Allocate the next coin id
    fn next_coin_id(&mut self) -> CoinId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Randomize a release position within the drop area
    fn roll_spawn_pos(&mut self) -> Vec3 {
        let x = self.rng.random_range(self.config.spawn_x[0]..=self.config.spawn_x[1]);
        let z = self.rng.random_range(self.config.spawn_z[0]..=self.config.spawn_z[1]);
        Vec3::new(x, self.config.spawn_height, z)
    }

    /// Spawn one coin at the given position. `insert_coin` randomizes the
    /// position; harnesses may place coins directly.
    pub fn spawn_coin_at(&mut self, physics: &mut PhysicsWorld, pos: Vec3) -> CoinId {
        let id = self.next_coin_id();
        let body = physics.spawn_coin(id, pos, &self.config);
        self.coins.insert(
            id,
            Coin {
                id,
                spawn_pos: pos,
                body,
                state: CoinState::Falling,
            },
        );
        id
    }

    /// Insert one coin from the bank onto the playfield. `None` when the
    /// bank is empty (nothing is mutated).
    pub fn insert_coin(&mut self, physics: &mut PhysicsWorld) -> Option<CoinId> {
        if !self.economy.try_insert() {
            return None;
        }
        let pos = self.roll_spawn_pos();
        Some(self.spawn_coin_at(physics, pos))
    }

    /// Discard every live coin regardless of state, release the bodies, and
    /// restore the counters. Coin ids restart from zero; the clock and RNG
    /// keep running.
    pub fn reset(&mut self, physics: &mut PhysicsWorld) {
        for coin in self.coins.values() {
            physics.remove_coin(coin.body);
        }
        self.coins.clear();
        self.economy.reset();
        self.next_id = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_session(seed: u64) -> (GameState, PhysicsWorld) {
        let config = GameConfig::default();
        let physics = PhysicsWorld::new(&config);
        (GameState::new(seed, config), physics)
    }

    #[test]
    fn test_ids_are_monotonic_and_restart_on_reset() {
        let (mut state, mut physics) = new_session(1);

        let a = state.insert_coin(&mut physics).unwrap();
        let b = state.insert_coin(&mut physics).unwrap();
        assert_eq!((a, b), (0, 1));

        state.reset(&mut physics);
        let c = state.insert_coin(&mut physics).unwrap();
        assert_eq!(c, 0);
    }

    #[test]
    fn test_spawn_positions_stay_in_drop_area() {
        let (mut state, mut physics) = new_session(42);

        for _ in 0..10 {
            state.insert_coin(&mut physics).unwrap();
        }
        for coin in state.coins() {
            let p = coin.spawn_pos;
            assert!(p.x >= state.config.spawn_x[0] && p.x <= state.config.spawn_x[1]);
            assert!(p.z >= state.config.spawn_z[0] && p.z <= state.config.spawn_z[1]);
            assert_eq!(p.y, state.config.spawn_height);
        }
    }

    #[test]
    fn test_spawn_positions_reproducible_from_seed() {
        let (mut state_a, mut physics_a) = new_session(7);
        let (mut state_b, mut physics_b) = new_session(7);

        for _ in 0..5 {
            state_a.insert_coin(&mut physics_a);
            state_b.insert_coin(&mut physics_b);
        }
        let a: Vec<Vec3> = state_a.coins().map(|c| c.spawn_pos).collect();
        let b: Vec<Vec3> = state_b.coins().map(|c| c.spawn_pos).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reset_releases_every_body() {
        let (mut state, mut physics) = new_session(3);
        let baseline = physics.body_count();

        for _ in 0..4 {
            state.insert_coin(&mut physics);
        }
        assert_eq!(physics.body_count(), baseline + 4);

        state.reset(&mut physics);
        assert_eq!(state.coin_count(), 0);
        assert_eq!(physics.body_count(), baseline);
        assert_eq!(state.available_coins(), state.config.initial_coins);
        assert_eq!(state.won_coins(), 0);
    }
}
