//! Game session
//!
//! Owns the grid, the player slots, the live list, and the seeded RNG for
//! spawning. All mutable round state hangs off one session value - step
//! functions borrow it rather than reaching for globals. Death removes a
//! player from the live list in a compaction pass after the flush that
//! killed it, never mid-iteration.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::DeathCause;
use super::grid::TrailGrid;
use super::player::{Player, PlayerId};
use crate::config::{ConfigError, GameConfig};

/// Session lifecycle. Round-over is implicit - the session reports it
/// and leaves winner policy to the embedder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Players registered, no round started
    Setup,
    /// Round running, more than a terminal number of players live
    Active,
    /// Live list reached its terminal size
    Over,
}

/// A death that occurred during a render flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathEvent {
    pub player: PlayerId,
    pub cause: DeathCause,
    /// Simulation tick at which the fatal block was flushed
    pub tick: u64,
}

/// A running game: roster, live list, occupancy grid, spawn RNG
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    grid: TrailGrid,
    /// Fixed slot array; index = player id, slot 0 unused
    players: Vec<Option<Player>>,
    /// Ids of players still simulated and drawn this round
    live: Vec<PlayerId>,
    tick: u64,
    seed: u64,
    rng: Pcg32,
    started: bool,
    pending_deaths: Vec<DeathEvent>,
}

impl GameSession {
    /// Build a session from a validated config. Every roster slot is
    /// registered up front; any invalid slot refuses the whole session.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut players: Vec<Option<Player>> = Vec::new();
        players.resize_with(config.max_players as usize + 1, || None);
        for slot in &config.players {
            let player = Player::from_slot(slot, &config)?;
            log::info!("Added {} as player {}", player.name(), slot.id);
            players[slot.id as usize] = Some(player);
        }
        Ok(Self {
            grid: TrailGrid::new(config.field_width, config.field_height),
            players,
            live: Vec::new(),
            tick: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            started: false,
            pending_deaths: Vec::new(),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &TrailGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut TrailGrid {
        &mut self.grid
    }

    /// Simulation ticks elapsed this round
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players
            .get_mut(id.0 as usize)
            .and_then(|slot| slot.as_mut())
    }

    /// All registered players in id order (the round-result surface)
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().flatten()
    }

    /// Ids of players still being simulated and drawn
    #[inline]
    pub fn live_ids(&self) -> &[PlayerId] {
        &self.live
    }

    pub fn live_players(&self) -> impl Iterator<Item = &Player> {
        self.live.iter().filter_map(|id| self.player(*id))
    }

    #[inline]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// The live-list size at which a round is over: 1 for multi-player
    /// rosters (a last survivor), 0 for a lone player
    fn terminal_live_count(&self) -> usize {
        if self.players().count() >= 2 { 1 } else { 0 }
    }

    pub fn phase(&self) -> RoundPhase {
        if !self.started {
            RoundPhase::Setup
        } else if self.live.len() <= self.terminal_live_count() {
            RoundPhase::Over
        } else {
            RoundPhase::Active
        }
    }

    #[inline]
    pub fn is_round_over(&self) -> bool {
        self.phase() == RoundPhase::Over
    }

    /// Start a round: wipe round state, move every registered player
    /// into the live list, and spawn each at an independently randomized
    /// position and heading.
    pub fn start(&mut self) {
        self.grid.clear();
        self.tick = 0;
        self.pending_deaths.clear();
        self.live.clear();

        let ids: Vec<PlayerId> = self.players().map(|p| p.id()).collect();
        for id in ids {
            let (position, heading) = self.next_spawn();
            let Some(player) = self.player_mut(id) else {
                continue;
            };
            player.reset();
            player.spawn(position, heading);
            self.live.push(id);
            log::debug!("Added player {} to the live list", id.0);
        }
        self.started = true;
    }

    /// Draw a spawn position and heading from the configured area and
    /// angle range
    fn next_spawn(&mut self) -> (Vec2, f32) {
        let area = self.config.spawn_area();
        let position = Vec2::new(
            self.rng.random_range(area.x_min..area.x_max),
            self.rng.random_range(area.y_min..area.y_max),
        );
        let heading = self
            .rng
            .random_range(self.config.min_spawn_angle..self.config.max_spawn_angle);
        (position, heading)
    }

    /// Apply a death: mark the player dead, drop its queued draws, score
    /// the survivors, and record the event. The live list is compacted
    /// after the flush pass, not here.
    pub(crate) fn kill_player(&mut self, id: PlayerId, cause: DeathCause) {
        let tick = self.tick;
        let Some(player) = self.player_mut(id) else {
            return;
        };
        if !player.is_alive() {
            return;
        }
        player.mark_dead();
        let name = player.name().to_string();
        log::info!("{} died from {}.", name, cause);

        for survivor in self.players.iter_mut().flatten() {
            if survivor.is_alive() {
                survivor.increment_score();
            }
        }
        self.pending_deaths.push(DeathEvent { player: id, cause, tick });
    }

    /// Remove dead players from the live list in one pass
    pub(crate) fn compact_live(&mut self) {
        let players = &self.players;
        self.live.retain(|id| {
            players[id.0 as usize]
                .as_ref()
                .is_some_and(|p| p.is_alive())
        });
    }

    /// Drain the deaths recorded since the last call
    pub fn take_deaths(&mut self) -> Vec<DeathEvent> {
        std::mem::take(&mut self.pending_deaths)
    }
}
