//! rapier3d boundary
//!
//! The simulation core never touches rapier directly: this adapter owns the
//! pipeline and body/collider sets, builds the static playfield, spawns and
//! releases coin bodies, commands the kinematic pusher, and reports which
//! coins entered the drop zone during each step. Collision events are
//! drained from a channel after the step returns, so the core is never
//! called back from inside the engine.
//!
//! glam is the vocabulary on the crate side; nalgebra stays behind this
//! module boundary.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use crate::config::GameConfig;
use crate::sim::state::CoinId;

/// Marker stored in the high bits of collider `user_data` identifying coin
/// bodies. Static geometry and the pusher keep the default zero, so trigger
/// contacts from them never decode to a coin.
const COIN_TAG: u128 = 0x434f_494e; // "COIN"

fn coin_user_data(id: CoinId) -> u128 {
    (COIN_TAG << 64) | u128::from(id)
}

fn coin_id_from_user_data(user_data: u128) -> Option<CoinId> {
    if user_data >> 64 == COIN_TAG {
        Some(user_data as CoinId)
    } else {
        None
    }
}

/// Owns the rapier world: playfield geometry, the pusher, and coin bodies.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    pusher: RigidBodyHandle,
    /// Height of the pusher center, resting on the deck
    pusher_y: f32,
    drop_zone: ColliderHandle,
}

impl PhysicsWorld {
    /// Build the static playfield: deck, side and back walls, the drop-zone
    /// sensor past the collection edge, and the kinematic pusher slab.
    pub fn new(config: &GameConfig) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let deck = config.platform_half_extents;

        // Deck, top surface at y = 0
        let deck_handle = bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vector![0.0, -deck.y, 0.0])
                .build(),
        );
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(deck.x, deck.y, deck.z)
                .friction(config.friction)
                .restitution(config.restitution)
                .build(),
            deck_handle,
            &mut bodies,
        );

        // Side walls flank the deck, the back wall closes the pusher end.
        // The collection edge (+z) stays open. The pusher slides through the
        // back wall at full retraction; kinematic-static pairs produce no
        // response, and coins cannot pass either way.
        let t = config.wall_thickness;
        let wall_y = config.wall_height * 0.5;
        let walls: [(Vector<Real>, Vector<Real>); 3] = [
            (
                vector![-(deck.x + t), wall_y, 0.0],
                vector![t, wall_y, deck.z],
            ),
            (
                vector![deck.x + t, wall_y, 0.0],
                vector![t, wall_y, deck.z],
            ),
            (
                vector![0.0, wall_y, -(deck.z + t)],
                vector![deck.x + 2.0 * t, wall_y, t],
            ),
        ];
        for (pos, half) in walls {
            let handle = bodies.insert(RigidBodyBuilder::fixed().translation(pos).build());
            colliders.insert_with_parent(
                ColliderBuilder::cuboid(half.x, half.y, half.z)
                    .friction(config.friction)
                    .build(),
                handle,
                &mut bodies,
            );
        }

        // Pusher: kinematic, commanded every tick, never deflected by coins
        let ph = config.pusher_half_extents;
        let pusher_y = ph.y;
        let pusher = bodies.insert(
            RigidBodyBuilder::kinematic_velocity_based()
                .translation(vector![
                    0.0,
                    pusher_y,
                    config.pusher_base - config.pusher_amplitude
                ])
                .build(),
        );
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(ph.x, ph.y, ph.z)
                .friction(config.friction)
                .build(),
            pusher,
            &mut bodies,
        );

        // Drop zone: overlap detection only, no physical response
        let zc = config.drop_zone_center;
        let zh = config.drop_zone_half_extents;
        let zone_handle = bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vector![zc.x, zc.y, zc.z])
                .build(),
        );
        let drop_zone = colliders.insert_with_parent(
            ColliderBuilder::cuboid(zh.x, zh.y, zh.z)
                .sensor(true)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build(),
            zone_handle,
            &mut bodies,
        );

        let g = config.gravity;
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![g.x, g.y, g.z],
            integration_params: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            pusher,
            pusher_y,
            drop_zone,
        }
    }

    /// Spawn a dynamic coin body tagged with its id.
    pub fn spawn_coin(&mut self, id: CoinId, pos: Vec3, config: &GameConfig) -> RigidBodyHandle {
        let handle = self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(vector![pos.x, pos.y, pos.z])
                .ccd_enabled(true)
                .build(),
        );
        self.colliders.insert_with_parent(
            ColliderBuilder::cylinder(config.coin_half_height, config.coin_radius)
                .friction(config.friction)
                .restitution(config.restitution)
                .density(config.coin_density)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .user_data(coin_user_data(id))
                .build(),
            handle,
            &mut self.bodies,
        );
        handle
    }

    /// Release a coin body and its collider.
    pub fn remove_coin(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Command the pusher's pose and velocity along the push axis.
    pub fn drive_pusher(&mut self, offset: f32, velocity: f32) {
        if let Some(rb) = self.bodies.get_mut(self.pusher) {
            rb.set_translation(vector![0.0, self.pusher_y, offset], true);
            rb.set_linvel(vector![0.0, 0.0, velocity], true);
        }
    }

    /// Advance the world one timestep. Returns the ids of coins that began
    /// overlapping the drop zone during the step, sorted for deterministic
    /// processing.
    pub fn step(&mut self, dt: f32) -> Vec<CoinId> {
        self.integration_params.dt = dt;

        let (collision_send, collision_recv) =
            rapier3d::crossbeam::channel::unbounded::<CollisionEvent>();
        let (force_send, _force_recv) =
            rapier3d::crossbeam::channel::unbounded::<ContactForceEvent>();
        let event_handler = ChannelEventCollector::new(collision_send, force_send);

        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &event_handler,
        );

        let mut hits = Vec::new();
        while let Ok(event) = collision_recv.try_recv() {
            let CollisionEvent::Started(h1, h2, _flags) = event else {
                continue;
            };
            let other = if h1 == self.drop_zone {
                h2
            } else if h2 == self.drop_zone {
                h1
            } else {
                continue;
            };
            // Only coin bodies count; deck, wall and pusher contacts are
            // filtered out by the tag
            if let Some(collider) = self.colliders.get(other) {
                if let Some(id) = coin_id_from_user_data(collider.user_data) {
                    hits.push(id);
                }
            }
        }
        // Channel delivery order is not guaranteed stable across runs
        hits.sort_unstable();
        hits.dedup();
        hits
    }

    /// Pose read-back for rendering a coin.
    pub fn coin_pose(&self, handle: RigidBodyHandle) -> Option<(Vec3, Quat)> {
        let rb = self.bodies.get(handle)?;
        let t = rb.translation();
        let r = rb.rotation();
        Some((
            Vec3::new(t.x, t.y, t.z),
            Quat::from_xyzw(r.i, r.j, r.k, r.w),
        ))
    }

    /// Pose read-back for rendering the pusher.
    pub fn pusher_pose(&self) -> (Vec3, Quat) {
        let rb = &self.bodies[self.pusher];
        let t = rb.translation();
        let r = rb.rotation();
        (
            Vec3::new(t.x, t.y, t.z),
            Quat::from_xyzw(r.i, r.j, r.k, r.w),
        )
    }

    /// Number of bodies currently in the world.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_data_round_trip() {
        assert_eq!(coin_id_from_user_data(coin_user_data(0)), Some(0));
        assert_eq!(coin_id_from_user_data(coin_user_data(421)), Some(421));
        // Untagged geometry never decodes to a coin
        assert_eq!(coin_id_from_user_data(0), None);
        assert_eq!(coin_id_from_user_data(7), None);
    }

    #[test]
    fn test_world_builds_static_scene() {
        let physics = PhysicsWorld::new(&GameConfig::default());
        // Deck, three walls, pusher, drop zone
        assert_eq!(physics.body_count(), 6);
    }

    #[test]
    fn test_spawn_and_remove_coin() {
        let config = GameConfig::default();
        let mut physics = PhysicsWorld::new(&config);
        let baseline = physics.body_count();

        let handle = physics.spawn_coin(0, Vec3::new(0.0, 3.0, -3.0), &config);
        assert_eq!(physics.body_count(), baseline + 1);
        assert!(physics.coin_pose(handle).is_some());

        physics.remove_coin(handle);
        assert_eq!(physics.body_count(), baseline);
        assert!(physics.coin_pose(handle).is_none());
    }

    #[test]
    fn test_coin_falls_and_settles_on_deck() {
        let config = GameConfig::default();
        let mut physics = PhysicsWorld::new(&config);
        let handle = physics.spawn_coin(0, Vec3::new(0.0, 3.0, 0.0), &config);

        for _ in 0..360 {
            physics.step(crate::consts::SIM_DT);
        }

        let (pos, _rot) = physics.coin_pose(handle).unwrap();
        // Resting on the deck top, not fallen through or launched away
        assert!(pos.y > 0.0 && pos.y < 0.5, "coin at y={}", pos.y);
        assert!(pos.x.abs() < config.platform_half_extents.x);
    }

    #[test]
    fn test_drop_zone_reports_coin_exactly_once() {
        let config = GameConfig::default();
        let mut physics = PhysicsWorld::new(&config);
        let zc = config.drop_zone_center;
        physics.spawn_coin(5, Vec3::new(zc.x, 3.0, zc.z), &config);

        let mut reports = 0;
        for _ in 0..600 {
            let hits = physics.step(crate::consts::SIM_DT);
            reports += hits.iter().filter(|&&id| id == 5).count();
        }
        assert_eq!(reports, 1);
    }

    #[test]
    fn test_pusher_follows_commanded_pose() {
        let config = GameConfig::default();
        let mut physics = PhysicsWorld::new(&config);

        physics.drive_pusher(-3.0, 1.5);
        physics.step(crate::consts::SIM_DT);

        let (pos, _rot) = physics.pusher_pose();
        // Commanded offset plus one step of commanded velocity
        let expected = -3.0 + 1.5 * crate::consts::SIM_DT;
        assert!((pos.z - expected).abs() < 1e-3, "pusher at z={}", pos.z);
        assert!((pos.y - config.pusher_half_extents.y).abs() < 1e-3);
    }
}
