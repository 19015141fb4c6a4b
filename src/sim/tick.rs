//! Fixed-timestep simulation and render steps
//!
//! The loop driver calls `simulation_step` zero or more times per frame,
//! then `render_step` once. Simulation moves every live player and
//! periodically queues a draw command; the render step flushes queued
//! commands through collision resolution into the grid. Collision
//! granularity is deliberately coarser than motion granularity: blocks
//! are committed every `tick_rate / draw_rate` ticks.

use glam::IVec2;

use super::collision::{block_origin, check_block};
use super::player::PlayerId;
use super::session::GameSession;
use crate::input::InputSource;
use crate::presenter::Presenter;

/// Advance every live player by one fixed tick: turning input, position
/// integration, and - on commit ticks - a queued draw command.
pub fn simulation_step(session: &mut GameSession, input: &dyn InputSource, dt: f32) {
    let angular_step = session.config().angular_step();
    let draw_due = session.tick().is_multiple_of(session.config().ticks_per_draw());

    let live: Vec<PlayerId> = session.live_ids().to_vec();
    for id in live {
        if let Some(player) = session.player_mut(id) {
            player.advance(input, dt, angular_step);
            if draw_due {
                player.enqueue_draw();
            }
        }
    }
    session.advance_tick();
}

/// Flush every live player's queued draw commands, in enqueue order,
/// resolving collisions against the grid as each block is considered.
/// The interpolation fraction is accepted for the loop-driver contract
/// but unused: this step only commits whole queued blocks, and sub-block
/// smoothing belongs to a presentation layer above.
pub fn render_step(
    session: &mut GameSession,
    presenter: &mut dyn Presenter,
    _interpolation: f32,
) {
    let thickness = session.config().thickness;
    let live: Vec<PlayerId> = session.live_ids().to_vec();
    for id in live {
        flush_player(session, presenter, id, thickness);
    }
    session.compact_live();
}

fn flush_player(
    session: &mut GameSession,
    presenter: &mut dyn Presenter,
    id: PlayerId,
    thickness: u32,
) {
    loop {
        let Some(player) = session.player_mut(id) else {
            return;
        };
        if !player.is_alive() {
            return;
        }
        let Some(command) = player.next_queued_draw() else {
            return;
        };
        let origin = block_origin(command, thickness);

        let Some(player) = session.player(id) else {
            return;
        };
        if player.just_drew_at(origin) {
            // Nearly stationary head: re-evaluating or repainting the
            // same origin would be a spurious self-collision.
            continue;
        }
        let recent: Vec<IVec2> = player.recent_draws().collect();

        match check_block(session.grid(), id, &recent, origin, thickness) {
            Some(cause) => {
                // Marks the player dead and drops the rest of its queue;
                // the live list is compacted after the pass.
                session.kill_player(id, cause);
            }
            None => {
                session.grid_mut().commit_block(id, origin.x, origin.y, thickness);
                let Some(player) = session.player_mut(id) else {
                    return;
                };
                player.record_draw(origin);
                let color = player.color();
                presenter.paint_block(origin.x, origin.y, thickness, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::config::GameConfig;
    use crate::input::{KeyState, keys};
    use crate::presenter::{NullPresenter, RecordingPresenter};
    use crate::sim::collision::DeathCause;
    use crate::sim::session::RoundPhase;

    fn roster_config(count: usize) -> GameConfig {
        let mut config = GameConfig::default();
        config.players.truncate(count);
        config
    }

    fn place(session: &mut GameSession, id: PlayerId, x: f32, y: f32, heading: f32) {
        session
            .player_mut(id)
            .unwrap()
            .spawn(Vec2::new(x, y), heading);
    }

    /// Run fixed ticks with a render flush after every tick
    fn run_ticks(
        session: &mut GameSession,
        input: &KeyState,
        presenter: &mut dyn Presenter,
        ticks: u64,
    ) {
        let dt = session.config().sim_dt();
        for _ in 0..ticks {
            simulation_step(session, input, dt);
            render_step(session, presenter, 0.0);
        }
    }

    #[test]
    fn test_duplicate_origin_is_not_repainted_or_checked() {
        let mut session = GameSession::new(roster_config(1), 5).unwrap();
        session.start();
        let id = session.live_ids()[0];
        place(&mut session, id, 100.5, 100.5, 0.0);

        // Two queued commands at the same position: one block.
        let player = session.player_mut(id).unwrap();
        player.enqueue_draw();
        player.enqueue_draw();

        let mut presenter = RecordingPresenter::new();
        render_step(&mut session, &mut presenter, 0.0);

        assert_eq!(presenter.blocks.len(), 1);
        assert!(session.player(id).unwrap().is_alive());
        assert_eq!(session.take_deaths().len(), 0);
    }

    #[test]
    fn test_distant_straight_players_survive() {
        let mut session = GameSession::new(roster_config(2), 5).unwrap();
        session.start();
        let ids: Vec<PlayerId> = session.live_ids().to_vec();
        place(&mut session, ids[0], 100.0, 100.0, 0.0);
        place(&mut session, ids[1], 100.0, 300.0, 0.0);

        let held = KeyState::new();
        let ticks = 1200;
        run_ticks(&mut session, &held, &mut NullPresenter, ticks);

        let expected_x =
            100.0 + session.config().speed * ticks as f32 * session.config().sim_dt();
        for id in ids {
            let player = session.player(id).unwrap();
            assert!(player.is_alive());
            assert!((player.position().x - expected_x).abs() < 0.5);
        }
        assert_eq!(session.phase(), RoundPhase::Active);
    }

    #[test]
    fn test_full_circle_left_turn_dies_from_own_trail() {
        let mut session = GameSession::new(roster_config(1), 5).unwrap();
        session.start();
        let id = session.live_ids()[0];
        place(&mut session, id, 320.0, 240.0, 0.0);

        let mut held = KeyState::new();
        held.press(keys::DIGIT_1); // Red's left turn

        // A full circle takes 2*pi / angular_step ticks; allow slack.
        let circle_ticks = (std::f32::consts::TAU / session.config().angular_step()) as u64;
        run_ticks(&mut session, &held, &mut NullPresenter, circle_ticks * 2);

        let deaths = session.take_deaths();
        assert_eq!(deaths.len(), 1);
        assert_eq!(deaths[0].cause, DeathCause::OwnTrail);
        assert!(deaths[0].tick <= circle_ticks * 2);
        assert!(session.is_round_over());
    }

    #[test]
    fn test_head_on_convergence_kills_exactly_one_from_opponent() {
        let mut session = GameSession::new(roster_config(2), 5).unwrap();
        session.start();
        let ids: Vec<PlayerId> = session.live_ids().to_vec();
        // Head-on along the same row; trails grow toward each other.
        place(&mut session, ids[0], 100.5, 100.5, 0.0);
        place(&mut session, ids[1], 120.5, 100.5, std::f32::consts::PI);

        let held = KeyState::new();
        let dt = session.config().sim_dt();
        for _ in 0..600 {
            simulation_step(&mut session, &held, dt);
            render_step(&mut session, &mut NullPresenter, 0.0);
            if session.is_round_over() {
                break;
            }
        }

        let deaths = session.take_deaths();
        assert_eq!(deaths.len(), 1);
        // The loser crashed into the winner's trail - never the wall,
        // never itself.
        assert_eq!(deaths[0].cause, DeathCause::Opponent);
        let winner = if deaths[0].player == ids[0] { ids[1] } else { ids[0] };
        assert!(session.player(winner).unwrap().is_alive());
        assert_eq!(session.player(winner).unwrap().score(), 1);
        assert!(session.is_round_over());
    }

    #[test]
    fn test_dead_player_is_not_simulated_or_drawn() {
        let mut session = GameSession::new(roster_config(2), 5).unwrap();
        session.start();
        let ids: Vec<PlayerId> = session.live_ids().to_vec();
        // Heading straight into the right wall.
        place(&mut session, ids[0], 630.0, 100.0, 0.0);
        place(&mut session, ids[1], 100.0, 300.0, 0.0);

        let held = KeyState::new();
        let mut presenter = RecordingPresenter::new();
        run_ticks(&mut session, &held, &mut presenter, 200);

        let deaths = session.take_deaths();
        assert_eq!(deaths.len(), 1);
        assert_eq!(deaths[0].player, ids[0]);
        assert_eq!(deaths[0].cause, DeathCause::Wall);

        let dead = session.player(ids[0]).unwrap();
        assert_eq!(dead.pending_draws(), 0);
        let frozen_at = dead.position();
        let painted_before = presenter.blocks_with_color(dead.color());

        run_ticks(&mut session, &held, &mut presenter, 200);

        let dead = session.player(ids[0]).unwrap();
        assert_eq!(dead.position(), frozen_at);
        assert_eq!(presenter.blocks_with_color(dead.color()), painted_before);
        assert!(!session.live_ids().contains(&ids[0]));

        // The other player is unaffected and kept moving.
        let other = session.player(ids[1]).unwrap();
        assert!(other.is_alive());
        assert!(other.position().x > 100.0);
    }

    #[test]
    fn test_commit_paints_grid_and_presenter_consistently() {
        let mut session = GameSession::new(roster_config(1), 5).unwrap();
        session.start();
        let id = session.live_ids()[0];
        place(&mut session, id, 200.0, 200.0, 0.0);

        let held = KeyState::new();
        let mut presenter = RecordingPresenter::new();
        run_ticks(&mut session, &held, &mut presenter, 100);

        assert!(!presenter.blocks.is_empty());
        let thickness = session.config().thickness;
        for block in &presenter.blocks {
            assert_eq!(block.thickness, thickness);
            assert_eq!(
                session
                    .grid()
                    .occupant_at(block.left as u32, block.top as u32),
                Some(id)
            );
        }
    }
}
