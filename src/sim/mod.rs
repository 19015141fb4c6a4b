//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (live list in registration order)
//! - No rendering or platform dependencies (input and presentation sit
//!   behind traits)

pub mod collision;
pub mod grid;
pub mod player;
pub mod session;
pub mod tick;

pub use collision::{
    DeathCause, block_origin, check_block, crashes_into_self, occupied_by_opponent,
};
pub use grid::{TrailGrid, block_pixels};
pub use player::{Player, PlayerId};
pub use session::{DeathEvent, GameSession, RoundPhase};
pub use tick::{render_step, simulation_step};
