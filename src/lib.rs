//! Kurve - a multiplayer growing-trail arena game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (occupancy grid, players, collisions, session)
//! - `config`: Game tuning and player roster
//! - `input`: Key-state input collaborator
//! - `presenter`: Trail presentation collaborator
//! - `runner`: Fixed-timestep loop driver with catch-up discard

pub mod config;
pub mod input;
pub mod presenter;
pub mod runner;
pub mod sim;

pub use config::{ConfigError, GameConfig, PlayerSlot, Rgb};
pub use input::{ControlId, InputSource, KeyState, TurnDirection};
pub use presenter::{NullPresenter, Presenter, RecordingPresenter};
pub use runner::{FrameReport, LoopDriver};
pub use sim::{DeathCause, DeathEvent, GameSession, Player, PlayerId, RoundPhase, TrailGrid};

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (Hz)
    pub const TICK_RATE: u32 = 600;
    /// Trail block commit rate (Hz); the sim enqueues one draw per live
    /// player every `TICK_RATE / DRAW_RATE` ticks
    pub const DRAW_RATE: u32 = 60;
    /// Maximum sim steps per frame before accumulated lag is discarded
    pub const MAX_SUBSTEPS: u32 = 240;
    /// Frame deltas are clamped to this many seconds before accumulation
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Field dimensions (pixels)
    pub const FIELD_WIDTH: u32 = 640;
    pub const FIELD_HEIGHT: u32 = 480;

    /// Trail block footprint (thickness x thickness pixels)
    pub const BLOCK_THICKNESS: u32 = 3;
    /// Linear speed (pixels per second)
    pub const SPEED: f32 = 64.0;
    /// Turning radius (pixels)
    pub const TURNING_RADIUS: f32 = 27.0;

    /// Minimum distance from the field edge when spawning
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Spawn headings are drawn from this forward-biased range (radians)
    pub const MIN_SPAWN_ANGLE: f32 = -std::f32::consts::FRAC_PI_2;
    pub const MAX_SPAWN_ANGLE: f32 = std::f32::consts::FRAC_PI_2;

    /// Roster capacity
    pub const MAX_PLAYERS: u8 = 6;
    /// How many recent own blocks are excluded from self-collision
    pub const TRAIL_EXCLUSION_DEPTH: usize = 3;
}
