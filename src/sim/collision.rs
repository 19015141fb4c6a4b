//! Collision rules and death causes
//!
//! Pure queries over the occupancy grid, evaluated in a fixed priority
//! order: wall, then opponent, then self. The self check excludes the
//! player's most recent committed blocks - consecutive blocks overlap by
//! geometry, and without the exclusion a head would crash into its own
//! neck on every commit. The exclusion is position-based (bounding boxes
//! of the recent origins), so its cost is bounded regardless of trail
//! length.

use std::fmt;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::grid::{TrailGrid, block_pixels};
use super::player::PlayerId;

/// Why a player died. Collisions are not errors - they are normal
/// terminal transitions, recovered at the session level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Block footprint not fully inside the field
    Wall,
    /// Candidate pixel occupied by a different player
    Opponent,
    /// Candidate pixel occupied by the player's own trail, older than
    /// the excluded recent blocks
    OwnTrail,
}

impl DeathCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::Wall => "crashing into the wall",
            DeathCause::Opponent => "crashing into an opponent",
            DeathCause::OwnTrail => "crashing into itself",
        }
    }
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer block origin for a continuous position; blocks are centered
/// on the point
pub fn block_origin(position: Vec2, thickness: u32) -> IVec2 {
    let half = thickness as f32 / 2.0;
    IVec2::new(
        (position.x - half).round() as i32,
        (position.y - half).round() as i32,
    )
}

/// Whether any pixel of the candidate block is occupied by a different
/// player
pub fn occupied_by_opponent(
    grid: &TrailGrid,
    origin: IVec2,
    thickness: u32,
    id: PlayerId,
) -> bool {
    block_pixels(origin.x, origin.y, thickness).any(|(x, y)| {
        matches!(grid.occupant_at(x as u32, y as u32), Some(owner) if owner != id)
    })
}

fn covered_by_recent(recent: &[IVec2], x: i32, y: i32, thickness: u32) -> bool {
    let t = thickness as i32;
    recent
        .iter()
        .any(|r| x >= r.x && x < r.x + t && y >= r.y && y < r.y + t)
}

/// Whether the candidate block, minus the pixels covered by the recent
/// own blocks, still touches painted trail
pub fn crashes_into_self(
    grid: &TrailGrid,
    recent: &[IVec2],
    origin: IVec2,
    thickness: u32,
) -> bool {
    block_pixels(origin.x, origin.y, thickness)
        .filter(|&(x, y)| !covered_by_recent(recent, x, y, thickness))
        .any(|(x, y)| grid.is_occupied(x as u32, y as u32))
}

/// Evaluate a candidate block against all collision rules. The first
/// matching cause wins; a block simultaneously out of field and on an
/// opponent's trail is always attributed to the wall.
pub fn check_block(
    grid: &TrailGrid,
    id: PlayerId,
    recent: &[IVec2],
    origin: IVec2,
    thickness: u32,
) -> Option<DeathCause> {
    if !grid.contains_block(origin.x, origin.y, thickness) {
        return Some(DeathCause::Wall);
    }
    if occupied_by_opponent(grid, origin, thickness, id) {
        return Some(DeathCause::Opponent);
    }
    if crashes_into_self(grid, recent, origin, thickness) {
        return Some(DeathCause::OwnTrail);
    }
    None
}
