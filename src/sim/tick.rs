//! Frame-driven simulation step
//!
//! One tick, in order: apply control-panel commands, release bodies whose
//! removal was deferred on an earlier tick, command the pusher from the
//! clock, step the physics world once, route drop-zone contacts through the
//! collection guard, advance removal countdowns. Callable by any scheduler:
//! render loop, headless driver, or test harness.

use super::pusher::pusher_motion;
use super::state::{CoinId, CoinState, GameEvent, GameState};
use crate::physics::PhysicsWorld;

/// Control-panel commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Insert one coin (honoured only while the bank is non-empty)
    pub insert_coin: bool,
    /// Restore the machine to its initial state
    pub reset: bool,
}

/// Advance the simulation by one timestep, returning the notices produced.
pub fn tick(
    state: &mut GameState,
    physics: &mut PhysicsWorld,
    input: &TickInput,
    dt: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.reset {
        state.reset(physics);
        events.push(GameEvent::MachineReset);
        log::info!("Machine reset");
    }

    if input.insert_coin {
        match state.insert_coin(physics) {
            Some(id) => {
                events.push(GameEvent::CoinInserted { id });
                log::debug!("Coin {id} inserted, {} left in the bank", state.available_coins());
            }
            None => {
                events.push(GameEvent::InsertRejected);
                log::info!("Insert declined: the bank is empty");
            }
        }
    }

    // Bodies flagged on an earlier tick are released here, before the step,
    // so the body set is never mutated while the engine iterates it.
    sweep_removals(state, physics, &mut events);

    state.elapsed += dt;
    let motion = pusher_motion(
        state.elapsed,
        state.config.pusher_base,
        state.config.pusher_amplitude,
        state.config.pusher_period,
    );
    physics.drive_pusher(motion.offset, motion.velocity);

    let hits = physics.step(dt);
    apply_trigger_hits(state, &hits, &mut events);

    advance_removal_countdowns(state, dt);

    events
}

/// Route drop-zone contacts through the collection guard.
///
/// A body can stay in contact with the trigger volume across many steps, or
/// bounce out and re-enter; only the first contact while the coin is still
/// `Falling` credits the bank.
pub(crate) fn apply_trigger_hits(state: &mut GameState, hits: &[CoinId], events: &mut Vec<GameEvent>) {
    for &id in hits {
        let Some(coin) = state.coins.get_mut(&id) else {
            // Contact for a coin discarded in the meantime (reset): stale, skip
            log::debug!("Drop-zone contact for unknown coin {id}");
            continue;
        };
        match coin.state {
            CoinState::Falling => {
                coin.state = CoinState::Collected {
                    removal_in: state.config.removal_delay,
                };
                state.economy.credit();
                events.push(GameEvent::CoinCollected { id });
                log::debug!("Coin {id} collected, winnings now {}", state.economy.won());
            }
            // Repeated trigger contact must never credit twice
            CoinState::Collected { .. } | CoinState::PendingRemoval => {}
        }
    }
}

/// Count collected coins down toward removal, outside the contact path.
fn advance_removal_countdowns(state: &mut GameState, dt: f32) {
    for coin in state.coins.values_mut() {
        if let CoinState::Collected { ref mut removal_in } = coin.state {
            *removal_in -= dt;
            if *removal_in <= 0.0 {
                coin.state = CoinState::PendingRemoval;
            }
        }
    }
}

/// Drop every coin flagged `PendingRemoval` and release its body.
fn sweep_removals(state: &mut GameState, physics: &mut PhysicsWorld, events: &mut Vec<GameEvent>) {
    let expired: Vec<CoinId> = state
        .coins
        .values()
        .filter(|c| matches!(c.state, CoinState::PendingRemoval))
        .map(|c| c.id)
        .collect();

    for id in expired {
        if let Some(coin) = state.coins.remove(&id) {
            physics.remove_coin(coin.body);
            events.push(GameEvent::CoinRemoved { id });
            log::debug!("Coin {id} removed");
        }
    }
}
