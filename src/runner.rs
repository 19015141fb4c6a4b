//! Fixed-timestep loop driver
//!
//! Keeps simulated time synchronized with wall-clock time: per rendered
//! frame it banks the elapsed delta and runs zero or more fixed sim
//! steps. If the simulation falls far enough behind that the substep cap
//! cannot clear the backlog, the remaining lag is discarded rather than
//! chased - a recoverable performance condition, reported for
//! observability only.

use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS};

/// What happened during one frame's catch-up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Fixed sim steps executed this frame
    pub steps: u32,
    /// Fraction of a sim step left in the accumulator, in [0, 1); hand
    /// this to the render step for visual smoothing
    pub interpolation: f32,
    /// Milliseconds of lag discarded this frame, if the substep cap hit
    pub discarded_ms: Option<f32>,
}

/// Accumulator-based fixed-timestep driver
#[derive(Debug, Clone)]
pub struct LoopDriver {
    sim_dt: f32,
    accumulator: f32,
    max_substeps: u32,
    max_frame_delta: f32,
}

impl LoopDriver {
    pub fn new(sim_dt: f32) -> Self {
        Self {
            sim_dt,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
            max_frame_delta: MAX_FRAME_DELTA,
        }
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    #[inline]
    pub fn sim_dt(&self) -> f32 {
        self.sim_dt
    }

    /// Fraction of a sim step currently banked, in [0, 1)
    #[inline]
    pub fn interpolation(&self) -> f32 {
        self.accumulator / self.sim_dt
    }

    /// Drop any banked time (e.g. when resuming from a pause)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Bank a frame's elapsed seconds and run `step` once per full sim
    /// step, up to the substep cap. Leftover lag beyond the cap is
    /// discarded and reported.
    pub fn advance(&mut self, frame_delta: f32, mut step: impl FnMut(f32)) -> FrameReport {
        self.accumulator += frame_delta.min(self.max_frame_delta);

        let mut steps = 0;
        while self.accumulator >= self.sim_dt && steps < self.max_substeps {
            step(self.sim_dt);
            self.accumulator -= self.sim_dt;
            steps += 1;
        }

        let discarded_ms = if self.accumulator >= self.sim_dt {
            let ms = self.accumulator * 1000.0;
            log::warn!("Simulation fell behind; discarding {ms:.0} ms of lag");
            self.accumulator = 0.0;
            Some(ms)
        } else {
            None
        };

        FrameReport {
            steps,
            interpolation: self.interpolation(),
            discarded_ms,
        }
    }
}
