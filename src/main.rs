//! Penny Push headless driver
//!
//! Runs the machine at a fixed timestep without a renderer: one coin is
//! inserted each second while the bank lasts, events are logged as they
//! happen, and the final tally is printed. An optional argument names a
//! JSON config file.

use std::path::Path;

use penny_push::config::GameConfig;
use penny_push::consts::SIM_DT;
use penny_push::physics::PhysicsWorld;
use penny_push::sim::{GameEvent, GameState, TickInput, tick};

/// Simulated run length in seconds
const RUN_SECONDS: u64 = 60;

fn main() {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(Path::new(&path)),
        None => GameConfig::default(),
    };
    let seed = 12345;
    log::info!("Penny Push starting (seed {seed})");

    let mut state = GameState::new(seed, config);
    let mut physics = PhysicsWorld::new(&state.config);

    let ticks_per_second = (1.0 / SIM_DT) as u64;
    for i in 0..RUN_SECONDS * ticks_per_second {
        let input = TickInput {
            insert_coin: i % ticks_per_second == 0,
            ..Default::default()
        };
        for event in tick(&mut state, &mut physics, &input, SIM_DT) {
            match event {
                GameEvent::CoinInserted { id } => {
                    log::info!("Inserted coin {id} ({} left)", state.available_coins());
                }
                GameEvent::InsertRejected => log::info!("Insert declined: bank empty"),
                GameEvent::CoinCollected { id } => {
                    log::info!("Coin {id} dropped into the collection zone");
                }
                GameEvent::CoinRemoved { id } => log::debug!("Coin {id} cleaned up"),
                GameEvent::MachineReset => log::info!("Machine reset"),
            }
        }
    }

    println!("--- after {RUN_SECONDS}s of simulation ---");
    println!("coins left to insert: {}", state.available_coins());
    println!("coins won:            {}", state.won_coins());
    println!("coins on the table:   {}", state.coin_count());
}
