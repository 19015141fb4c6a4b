//! Kurve entry point
//!
//! Runs a headless demo round: the default six-player roster, with the
//! odd-numbered slots holding their left-turn key, driven frame by frame
//! through the fixed-timestep loop until the round resolves.

use std::time::{SystemTime, UNIX_EPOCH};

use kurve::sim::{render_step, simulation_step};
use kurve::{GameConfig, GameSession, KeyState, LoopDriver, NullPresenter};

fn main() {
    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("Kurve starting (seed {seed})");

    let mut session =
        GameSession::new(GameConfig::default(), seed).expect("default config is valid");
    session.start();

    // Scripted input: odd-numbered players hold their left-turn key and
    // spiral; the rest run straight until they meet a wall or a trail.
    let mut held = KeyState::new();
    for slot in &session.config().players {
        if slot.id % 2 == 1
            && let Some(key) = slot.key_left
        {
            held.press(key);
        }
    }

    let mut driver = LoopDriver::new(session.config().sim_dt());
    let mut presenter = NullPresenter;
    let frame_dt = 1.0 / 60.0;
    let max_frames = 60 * 120;

    for _ in 0..max_frames {
        let report = driver.advance(frame_dt, |dt| simulation_step(&mut session, &held, dt));
        render_step(&mut session, &mut presenter, report.interpolation);
        if session.is_round_over() {
            break;
        }
    }

    log::info!(
        "Round over after {:.1} s simulated",
        session.tick() as f32 * session.config().sim_dt()
    );
    for player in session.players() {
        log::info!(
            "{}: {} point(s){}",
            player.name(),
            player.score(),
            if player.is_alive() { " (survived)" } else { "" }
        );
    }
}
