//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Explicit timestep only, advanced by whoever schedules [`tick`]
//! - Seeded RNG only
//! - Stable iteration order (by coin ID)
//! - No rendering dependencies; the physics world is commanded through the
//!   adapter in [`crate::physics`], never reached into directly

pub mod economy;
pub mod pusher;
pub mod state;
pub mod tick;

pub use economy::Economy;
pub use pusher::{PusherMotion, pusher_motion};
pub use state::{Coin, CoinId, CoinState, GameEvent, GameState};
pub use tick::{TickInput, tick};
