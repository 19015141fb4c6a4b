//! Player entity
//!
//! Owns its continuous motion state, its pending-draw queue, and the
//! short history of committed block origins used to tell the advancing
//! head apart from the already-painted neck.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig, PlayerSlot, Rgb};
use crate::input::{ControlId, InputSource, TurnDirection};

/// Player identifier (1..=max_players); doubles as the occupancy grid
/// owner value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// A player in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    color: Rgb,
    key_left: Option<ControlId>,
    key_right: Option<ControlId>,
    /// Continuous position (sub-pixel)
    position: Vec2,
    /// Heading angle (radians); screen Y grows downward, so a positive
    /// heading steers up
    heading: f32,
    alive: bool,
    score: u32,
    /// Linear speed (pixels per second)
    velocity: f32,
    /// Positions awaiting the next render flush, in enqueue order
    queued_draws: VecDeque<Vec2>,
    /// Most recent committed block origins, newest first
    recent_draws: VecDeque<IVec2>,
    exclusion_depth: usize,
}

impl Player {
    /// Build a player from its roster slot. Refuses ids outside
    /// `1..=max_players`; the session never starts with an invalid slot.
    pub fn from_slot(slot: &PlayerSlot, config: &GameConfig) -> Result<Self, ConfigError> {
        if slot.id == 0 || slot.id > config.max_players {
            return Err(ConfigError::InvalidPlayerId {
                id: slot.id,
                max: config.max_players,
            });
        }
        let name = if slot.name.is_empty() {
            format!("Player {}", slot.id)
        } else {
            slot.name.clone()
        };
        Ok(Self {
            id: PlayerId(slot.id),
            name,
            color: slot.color,
            key_left: slot.key_left,
            key_right: slot.key_right,
            position: Vec2::ZERO,
            heading: 0.0,
            alive: false,
            score: 0,
            velocity: config.speed,
            queued_draws: VecDeque::new(),
            recent_draws: VecDeque::with_capacity(config.trail_exclusion_depth),
            exclusion_depth: config.trail_exclusion_depth,
        })
    }

    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Clear everything round-scoped: score, motion state, queues, trail
    /// history. Keeps identity and bindings.
    pub fn reset(&mut self) {
        self.score = 0;
        self.alive = false;
        self.position = Vec2::ZERO;
        self.heading = 0.0;
        self.queued_draws.clear();
        self.recent_draws.clear();
    }

    /// Place the player at a round-start position and mark it alive
    pub fn spawn(&mut self, position: Vec2, heading: f32) {
        self.position = position;
        self.heading = heading;
        self.alive = true;
        log::info!(
            "{} spawning at ({:.0}, {:.0}) with heading {:.0} deg",
            self.name,
            position.x,
            position.y,
            heading.to_degrees()
        );
    }

    /// One fixed tick of turning and movement. Does not enqueue a draw;
    /// the simulation step decides when a block is due.
    pub fn advance(&mut self, input: &dyn InputSource, dt: f32, angular_step: f32) {
        if let Some(key) = self.key_left
            && input.is_held(key)
        {
            self.heading += angular_step;
        }
        if let Some(key) = self.key_right
            && input.is_held(key)
        {
            self.heading -= angular_step;
        }
        let step = self.velocity * dt;
        self.position.x += step * self.heading.cos();
        self.position.y -= step * self.heading.sin();
    }

    /// Queue the current continuous position for the next render flush
    pub fn enqueue_draw(&mut self) {
        self.queued_draws.push_back(self.position);
    }

    /// Take the oldest pending draw position
    pub fn next_queued_draw(&mut self) -> Option<Vec2> {
        self.queued_draws.pop_front()
    }

    #[inline]
    pub fn pending_draws(&self) -> usize {
        self.queued_draws.len()
    }

    /// The origin of the last committed block, if any
    pub fn last_draw(&self) -> Option<IVec2> {
        self.recent_draws.front().copied()
    }

    /// Whether the candidate origin equals the last committed one (the
    /// no-op duplicate case)
    pub fn just_drew_at(&self, origin: IVec2) -> bool {
        self.last_draw() == Some(origin)
    }

    /// Record a committed block origin, dropping the oldest beyond the
    /// exclusion depth
    pub fn record_draw(&mut self, origin: IVec2) {
        self.recent_draws.push_front(origin);
        self.recent_draws.truncate(self.exclusion_depth);
    }

    /// Recent committed block origins, newest first
    pub fn recent_draws(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.recent_draws.iter().copied()
    }

    /// Mark dead and drop any unflushed draws; the session compacts the
    /// live list afterwards
    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
        self.queued_draws.clear();
    }

    pub(crate) fn increment_score(&mut self) {
        self.score += 1;
    }

    /// Bind a turn control
    pub fn set_key(&mut self, direction: TurnDirection, key: ControlId) {
        match direction {
            TurnDirection::Left => self.key_left = Some(key),
            TurnDirection::Right => self.key_right = Some(key),
        }
        log::info!(
            "Set {} key of {} to {:?}",
            direction.as_str(),
            self.name,
            key
        );
    }

    /// Bind a turn control by direction name from config text. An
    /// unrecognized name is warned about and ignored, keeping the
    /// previous binding.
    pub fn rebind(&mut self, direction: &str, key: ControlId) {
        match TurnDirection::parse(direction) {
            Some(dir) => self.set_key(dir, key),
            None => log::warn!(
                "Could not bind {:?} to \"{}\" for {}: not a valid direction",
                key,
                direction,
                self.name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyState, keys};

    fn test_player(id: u8) -> Player {
        let config = GameConfig::default();
        let slot = PlayerSlot::new(
            id,
            "Tester",
            Rgb::new(255, 255, 255),
            Some(keys::DIGIT_1),
            Some(keys::Q),
        );
        Player::from_slot(&slot, &config).unwrap()
    }

    #[test]
    fn test_invalid_slot_id_refused() {
        let config = GameConfig::default();
        let slot = PlayerSlot::new(0, "Nobody", Rgb::new(0, 0, 0), None, None);
        assert!(matches!(
            Player::from_slot(&slot, &config),
            Err(ConfigError::InvalidPlayerId { id: 0, .. })
        ));

        let slot = PlayerSlot::new(7, "Nobody", Rgb::new(0, 0, 0), None, None);
        assert!(matches!(
            Player::from_slot(&slot, &config),
            Err(ConfigError::InvalidPlayerId { id: 7, max: 6 })
        ));
    }

    #[test]
    fn test_empty_name_gets_default() {
        let config = GameConfig::default();
        let slot = PlayerSlot::new(3, "", Rgb::new(0, 0, 0), None, None);
        let player = Player::from_slot(&slot, &config).unwrap();
        assert_eq!(player.name(), "Player 3");
    }

    #[test]
    fn test_straight_advance_covers_expected_distance() {
        let mut player = test_player(1);
        player.spawn(Vec2::new(100.0, 100.0), 0.0);

        let held = KeyState::new();
        let dt = 1.0 / 600.0;
        for _ in 0..600 {
            player.advance(&held, dt, 0.0);
        }
        // One second at 64 px/s, heading rightward.
        assert!((player.position().x - 164.0).abs() < 0.05);
        assert!((player.position().y - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_upward_heading_decreases_y() {
        let mut player = test_player(1);
        player.spawn(Vec2::new(100.0, 100.0), std::f32::consts::FRAC_PI_2);

        let held = KeyState::new();
        player.advance(&held, 1.0, 0.0);
        assert!(player.position().y < 100.0);
    }

    #[test]
    fn test_opposite_turn_inputs_cancel() {
        let mut player = test_player(1);
        player.spawn(Vec2::ZERO, 0.5);

        let mut held = KeyState::new();
        held.press(keys::DIGIT_1);
        held.press(keys::Q);
        player.advance(&held, 1.0 / 600.0, 0.01);
        assert!((player.heading() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_left_turn_increases_heading() {
        let mut player = test_player(1);
        player.spawn(Vec2::ZERO, 0.0);

        let mut held = KeyState::new();
        held.press(keys::DIGIT_1);
        player.advance(&held, 1.0 / 600.0, 0.01);
        assert!((player.heading() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_recent_draws_ring_depth() {
        let mut player = test_player(1);
        for i in 0..5 {
            player.record_draw(IVec2::new(i, i));
        }
        let recent: Vec<_> = player.recent_draws().collect();
        assert_eq!(
            recent,
            vec![IVec2::new(4, 4), IVec2::new(3, 3), IVec2::new(2, 2)]
        );
        assert!(player.just_drew_at(IVec2::new(4, 4)));
        assert!(!player.just_drew_at(IVec2::new(3, 3)));
    }

    #[test]
    fn test_rebind_unknown_direction_keeps_binding() {
        let mut player = test_player(1);
        player.rebind("up", ControlId(999));

        let mut held = KeyState::new();
        held.press(keys::DIGIT_1);
        player.spawn(Vec2::ZERO, 0.0);
        player.advance(&held, 1.0 / 600.0, 0.01);
        // The previous left binding is still active.
        assert!(player.heading() > 0.0);
    }

    #[test]
    fn test_rebind_left_replaces_binding() {
        let mut player = test_player(1);
        player.rebind("LEFT", ControlId(999));
        player.spawn(Vec2::ZERO, 0.0);

        let mut held = KeyState::new();
        held.press(keys::DIGIT_1);
        player.advance(&held, 1.0 / 600.0, 0.01);
        assert_eq!(player.heading(), 0.0);

        held.press(ControlId(999));
        player.advance(&held, 1.0 / 600.0, 0.01);
        assert!(player.heading() > 0.0);
    }

    #[test]
    fn test_reset_clears_round_state() {
        let mut player = test_player(1);
        player.spawn(Vec2::new(50.0, 50.0), 1.0);
        player.enqueue_draw();
        player.record_draw(IVec2::new(48, 48));
        player.increment_score();

        player.reset();
        assert!(!player.is_alive());
        assert_eq!(player.score(), 0);
        assert_eq!(player.pending_draws(), 0);
        assert_eq!(player.recent_draws().count(), 0);
        assert_eq!(player.last_draw(), None);
    }
}
