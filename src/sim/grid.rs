//! Shared pixel-occupancy grid
//!
//! The single source of truth for what is painted where. Cells hold the
//! owning player id or empty; emptiness is never reclaimed during a round.
//! The grid carries no write policy - collision resolution decides who may
//! paint, and must bounds-check before any access here.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Dense occupancy map, indexed by `y * width + x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailGrid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

/// Pixel coordinates covered by the block at (left, top)
pub fn block_pixels(
    left: i32,
    top: i32,
    thickness: u32,
) -> impl Iterator<Item = (i32, i32)> {
    let t = thickness as i32;
    (top..top + t).flat_map(move |y| (left..left + t).map(move |x| (x, y)))
}

impl TrailGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; (width * height) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Translate a pixel coordinate into its cell address
    #[inline]
    pub fn address(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) as usize
    }

    /// Inverse of [`address`](Self::address)
    #[inline]
    pub fn coords_of(&self, address: usize) -> (u32, u32) {
        let x = address as u32 % self.width;
        let y = address as u32 / self.width;
        (x, y)
    }

    #[inline]
    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.cells[self.address(x, y)] != 0
    }

    /// The player whose trail covers this pixel, if any
    #[inline]
    pub fn occupant_at(&self, x: u32, y: u32) -> Option<PlayerId> {
        match self.cells[self.address(x, y)] {
            0 => None,
            id => Some(PlayerId(id)),
        }
    }

    /// Whether a block footprint lies fully inside the grid. Blocks
    /// exactly touching the edge are inside; one pixel beyond is not.
    pub fn contains_block(&self, left: i32, top: i32, thickness: u32) -> bool {
        left >= 0
            && top >= 0
            && left + thickness as i32 <= self.width as i32
            && top + thickness as i32 <= self.height as i32
    }

    /// Paint a block for `owner`, all-or-nothing, and return the painted
    /// cell addresses. Writing out of bounds is a programming error: the
    /// caller must have passed the field-boundary check first.
    pub fn commit_block(
        &mut self,
        owner: PlayerId,
        left: i32,
        top: i32,
        thickness: u32,
    ) -> Vec<usize> {
        debug_assert!(self.contains_block(left, top, thickness));
        block_pixels(left, top, thickness)
            .map(|(x, y)| {
                let address = self.address(x as u32, y as u32);
                self.cells[address] = owner.0;
                address
            })
            .collect()
    }

    /// Wipe every cell (start of a new round)
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_address_roundtrip() {
        let grid = TrailGrid::new(640, 480);
        assert_eq!(grid.address(0, 0), 0);
        assert_eq!(grid.address(1, 0), 1);
        assert_eq!(grid.address(0, 1), 640);
        assert_eq!(grid.coords_of(grid.address(17, 29)), (17, 29));
    }

    #[test]
    fn test_occupancy_lifecycle() {
        let mut grid = TrailGrid::new(64, 48);
        assert!(!grid.is_occupied(10, 10));
        assert_eq!(grid.occupant_at(10, 10), None);

        let painted = grid.commit_block(PlayerId(2), 10, 10, 3);
        assert_eq!(painted.len(), 9);
        for (x, y) in block_pixels(10, 10, 3) {
            assert_eq!(grid.occupant_at(x as u32, y as u32), Some(PlayerId(2)));
        }
        // Neighboring pixels stay empty.
        assert!(!grid.is_occupied(9, 10));
        assert!(!grid.is_occupied(13, 10));

        // A later commit by another player does not disturb the owner of
        // untouched cells.
        grid.commit_block(PlayerId(3), 20, 20, 3);
        assert_eq!(grid.occupant_at(10, 10), Some(PlayerId(2)));
    }

    #[test]
    fn test_contains_block_boundaries() {
        let grid = TrailGrid::new(64, 48);
        assert!(grid.contains_block(0, 0, 3));
        // Exactly touching the far edges is inside.
        assert!(grid.contains_block(61, 45, 3));
        // One pixel beyond is out.
        assert!(!grid.contains_block(62, 45, 3));
        assert!(!grid.contains_block(61, 46, 3));
        assert!(!grid.contains_block(-1, 0, 3));
        assert!(!grid.contains_block(0, -1, 3));
    }

    #[test]
    fn test_clear_resets_all_cells() {
        let mut grid = TrailGrid::new(32, 32);
        grid.commit_block(PlayerId(1), 4, 4, 3);
        grid.clear();
        for y in 0..32 {
            for x in 0..32 {
                assert!(!grid.is_occupied(x, y));
            }
        }
    }

    proptest! {
        #[test]
        fn prop_address_roundtrip(x in 0u32..64, y in 0u32..48) {
            let grid = TrailGrid::new(64, 48);
            prop_assert_eq!(grid.coords_of(grid.address(x, y)), (x, y));
        }

        #[test]
        fn prop_commit_covers_thickness_squared(
            left in 0i32..50,
            top in 0i32..40,
            thickness in 1u32..6,
        ) {
            prop_assume!(left + thickness as i32 <= 64);
            prop_assume!(top + thickness as i32 <= 48);
            let mut grid = TrailGrid::new(64, 48);
            let painted = grid.commit_block(PlayerId(5), left, top, thickness);
            prop_assert_eq!(painted.len() as u32, thickness * thickness);
            for (x, y) in block_pixels(left, top, thickness) {
                prop_assert_eq!(grid.occupant_at(x as u32, y as u32), Some(PlayerId(5)));
            }
        }
    }
}
