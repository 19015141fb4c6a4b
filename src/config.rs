//! Game tuning and player roster
//!
//! All state that shapes a round lives here: field dimensions, movement
//! and rate tuning, and the player slots. Persisted as JSON; `Default`
//! carries the classic tuning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::input::{ControlId, keys};

/// A player's trail color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Rejected configurations. A session never starts from an invalid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot create a player with id {id} (valid ids are 1..={max})")]
    InvalidPlayerId { id: u8, max: u8 },
    #[error("two roster slots carry player id {id}")]
    DuplicateSlot { id: u8 },
    #[error("field of {width}x{height} px cannot hold a block of thickness {thickness}")]
    InvalidField {
        width: u32,
        height: u32,
        thickness: u32,
    },
    #[error("tick rate {tick_rate} Hz must be a positive integer multiple of draw rate {draw_rate} Hz")]
    InvalidRates { tick_rate: u32, draw_rate: u32 },
    #[error("speed {speed} and turning radius {turning_radius} must both be positive")]
    InvalidMotion { speed: f32, turning_radius: f32 },
    #[error("spawn margin {margin} px leaves no spawn area in a {width}x{height} px field")]
    InvalidSpawnMargin {
        margin: f32,
        width: u32,
        height: u32,
    },
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One roster entry. Slot ids are 1-based; id doubles as the occupancy
/// grid owner value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub id: u8,
    pub name: String,
    pub color: Rgb,
    /// Left-turn control; `None` means the slot never turns left
    pub key_left: Option<ControlId>,
    pub key_right: Option<ControlId>,
}

impl PlayerSlot {
    pub fn new(
        id: u8,
        name: &str,
        color: Rgb,
        key_left: Option<ControlId>,
        key_right: Option<ControlId>,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            color,
            key_left,
            key_right,
        }
    }
}

/// Margin-bounded rectangle players spawn inside, computed once from the
/// field dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Field dimensions (pixels)
    pub field_width: u32,
    pub field_height: u32,
    /// Simulation rate (Hz)
    pub tick_rate: u32,
    /// Trail block commit rate (Hz); must divide `tick_rate`
    pub draw_rate: u32,
    /// Trail block footprint, thickness x thickness pixels
    pub thickness: u32,
    /// Linear speed (pixels per second)
    pub speed: f32,
    /// Turning radius (pixels); angular velocity is derived so the radius
    /// is independent of tick rate
    pub turning_radius: f32,
    /// Minimum spawn distance from the field edge (pixels)
    pub spawn_margin: f32,
    /// Spawn heading range (radians)
    pub min_spawn_angle: f32,
    pub max_spawn_angle: f32,
    /// Roster capacity; player ids run 1..=max_players
    pub max_players: u8,
    /// How many of a player's most recent blocks are excluded from its
    /// own self-collision check
    pub trail_exclusion_depth: usize,
    /// Registered player slots
    pub players: Vec<PlayerSlot>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            tick_rate: TICK_RATE,
            draw_rate: DRAW_RATE,
            thickness: BLOCK_THICKNESS,
            speed: SPEED,
            turning_radius: TURNING_RADIUS,
            spawn_margin: SPAWN_MARGIN,
            min_spawn_angle: MIN_SPAWN_ANGLE,
            max_spawn_angle: MAX_SPAWN_ANGLE,
            max_players: MAX_PLAYERS,
            trail_exclusion_depth: TRAIL_EXCLUSION_DEPTH,
            players: vec![
                PlayerSlot::new(1, "Red", Rgb::new(0xFF, 0x28, 0x00), Some(keys::DIGIT_1), Some(keys::Q)),
                PlayerSlot::new(2, "Yellow", Rgb::new(0xC3, 0xC3, 0x00), Some(keys::CTRL), Some(keys::ALT)),
                PlayerSlot::new(3, "Orange", Rgb::new(0xFF, 0x79, 0x00), Some(keys::M), Some(keys::COMMA)),
                PlayerSlot::new(4, "Green", Rgb::new(0x00, 0xCB, 0x00), Some(keys::LEFT_ARROW), Some(keys::DOWN_ARROW)),
                PlayerSlot::new(5, "Pink", Rgb::new(0xDF, 0x51, 0xB6), Some(keys::NUMPAD_DIVIDE), Some(keys::NUMPAD_MULTIPLY)),
                PlayerSlot::new(6, "Blue", Rgb::new(0x00, 0xA2, 0xCB), None, None),
            ],
        }
    }
}

impl GameConfig {
    /// Fixed simulation timestep (seconds)
    #[inline]
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Heading change per tick while a turn control is held (radians).
    /// Constant angular velocity derived from the turning radius, so the
    /// radius is the same at any tick rate.
    #[inline]
    pub fn angular_step(&self) -> f32 {
        self.speed / (self.tick_rate as f32 * self.turning_radius)
    }

    /// Simulation ticks between trail block commits
    #[inline]
    pub fn ticks_per_draw(&self) -> u64 {
        (self.tick_rate / self.draw_rate) as u64
    }

    /// Path distance between consecutive committed block origins (pixels)
    #[inline]
    pub fn commit_spacing(&self) -> f32 {
        self.speed / self.draw_rate as f32
    }

    /// Minimal trail-exclusion depth that cannot produce a spurious
    /// self-collision for this tuning. Worst case is 45-degree travel,
    /// where consecutive origins advance `commit_spacing / sqrt(2)` per
    /// axis and a candidate block overlaps a historical one until the
    /// per-axis delta reaches `thickness`.
    pub fn derived_exclusion_depth(&self) -> usize {
        let spacing = self.commit_spacing();
        let depth = (self.thickness as f32 * std::f32::consts::SQRT_2) / spacing;
        (depth.ceil() as usize).max(1)
    }

    /// The rectangle spawn positions are drawn from
    pub fn spawn_area(&self) -> SpawnArea {
        SpawnArea {
            x_min: self.spawn_margin,
            y_min: self.spawn_margin,
            x_max: self.field_width as f32 - self.spawn_margin,
            y_max: self.field_height as f32 - self.spawn_margin,
        }
    }

    /// Check the configuration. Errors are fatal; an under-sized
    /// trail-exclusion depth is only warned about since it reproduces the
    /// classic tuning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thickness == 0
            || self.field_width < self.thickness
            || self.field_height < self.thickness
        {
            return Err(ConfigError::InvalidField {
                width: self.field_width,
                height: self.field_height,
                thickness: self.thickness,
            });
        }
        if self.draw_rate == 0 || self.tick_rate == 0 || !self.tick_rate.is_multiple_of(self.draw_rate)
        {
            return Err(ConfigError::InvalidRates {
                tick_rate: self.tick_rate,
                draw_rate: self.draw_rate,
            });
        }
        if self.speed <= 0.0 || self.turning_radius <= 0.0 {
            return Err(ConfigError::InvalidMotion {
                speed: self.speed,
                turning_radius: self.turning_radius,
            });
        }
        let area = self.spawn_area();
        if area.x_min >= area.x_max || area.y_min >= area.y_max {
            return Err(ConfigError::InvalidSpawnMargin {
                margin: self.spawn_margin,
                width: self.field_width,
                height: self.field_height,
            });
        }
        let mut seen = [false; u8::MAX as usize + 1];
        for slot in &self.players {
            if slot.id == 0 || slot.id > self.max_players {
                return Err(ConfigError::InvalidPlayerId {
                    id: slot.id,
                    max: self.max_players,
                });
            }
            if seen[slot.id as usize] {
                return Err(ConfigError::DuplicateSlot { id: slot.id });
            }
            seen[slot.id as usize] = true;
        }
        let derived = self.derived_exclusion_depth();
        if self.trail_exclusion_depth < derived {
            log::warn!(
                "Trail exclusion depth {} is below the safe minimum {} for this tuning; \
                 occasional spurious self-collisions are possible",
                self.trail_exclusion_depth,
                derived
            );
        }
        Ok(())
    }

    /// Load and validate a config from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config as JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
