//! Trail presentation collaborator
//!
//! The sim paints through this seam and never touches a surface directly.
//! `paint_block` fires exactly once per committed block: never for
//! skipped duplicate draws, never for dead players.

use crate::config::Rgb;

pub trait Presenter {
    /// Present one committed trail block at (left, top)
    fn paint_block(&mut self, left: i32, top: i32, thickness: u32, color: Rgb);
}

/// Discards all paint calls (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn paint_block(&mut self, _left: i32, _top: i32, _thickness: u32, _color: Rgb) {}
}

/// A block that was handed to [`RecordingPresenter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintedBlock {
    pub left: i32,
    pub top: i32,
    pub thickness: u32,
    pub color: Rgb,
}

/// Records every paint call, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingPresenter {
    pub blocks: Vec<PaintedBlock>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint calls whose block color matches
    pub fn blocks_with_color(&self, color: Rgb) -> usize {
        self.blocks.iter().filter(|b| b.color == color).count()
    }
}

impl Presenter for RecordingPresenter {
    fn paint_block(&mut self, left: i32, top: i32, thickness: u32, color: Rgb) {
        self.blocks.push(PaintedBlock {
            left,
            top,
            thickness,
            color,
        });
    }
}
