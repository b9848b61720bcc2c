//! Peak isolation.
//!
//! After raw scoring the grid usually contains one bright blob plus scattered
//! background. Isolation keeps the single coherent blob around the global
//! peak: a flat floor pass removes everything far below the peak, then a
//! directional depth-first flood walks outward from the peak and zeroes any
//! tile whose score does not decay gracefully from its predecessor's.
//!
//! The flood is deliberately order-sensitive: a tile can be visited more than
//! once along different diagonal and cardinal paths, and each visit re-reads
//! the current (possibly already-zeroed) score. The recursion order below is
//! part of the algorithm's observable behavior and must not be reordered or
//! parallelized.

use crate::config::AlgorithmConfig;
use crate::tiles::TileGrid;

const NORTH: u8 = 0b0001;
const SOUTH: u8 = 0b0010;
const EAST: u8 = 0b0100;
const WEST: u8 = 0b1000;
const ALL_DIRECTIONS: u8 = NORTH | SOUTH | EAST | WEST;

/// Isolates the strongest contiguous blob in a scored grid.
#[derive(Debug, Clone)]
pub struct PeakIsolator {
    neighbor_ratio: f32,
    peak_ratio: f32,
}

impl PeakIsolator {
    /// Creates an isolator with the configured ratios.
    #[must_use]
    pub fn new(config: &AlgorithmConfig) -> Self {
        Self {
            neighbor_ratio: config.neighbor_ratio,
            peak_ratio: config.peak_ratio,
        }
    }

    /// Mutates `grid` in place, keeping only the blob around the global
    /// peak tile. Ties on the peak go to the first tile found in x-major
    /// scan order.
    pub fn isolate(&self, grid: &mut TileGrid) {
        let mut max_val = 0.0f32;
        let mut peak_x = 0;
        let mut peak_y = 0;
        for (x, y, tile) in grid.iter() {
            if tile.score > max_val {
                max_val = tile.score;
                peak_x = x;
                peak_y = y;
            }
        }

        // Flat floor pass, independent of position
        let min_score = max_val * self.peak_ratio;
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                if grid.get(x, y).score < min_score {
                    grid.get_mut(x, y).score = 0.0;
                }
            }
        }

        if max_val > 0.0 {
            self.trim(grid, peak_x, peak_y, max_val, ALL_DIRECTIONS);
        }
    }

    /// Depth-first directional flood from `(x, y)`.
    ///
    /// A tile is zeroed when the flood's reference score has collapsed, when
    /// it is brighter than its predecessor (an anomaly behind the blob edge),
    /// or when it decays below `neighbor_ratio` of its predecessor. Within
    /// each cardinal block the diagonal recursions run before the pure
    /// cardinal one; North before South before East before West.
    fn trim(&self, grid: &mut TileGrid, x: usize, y: usize, prev_score: f32, directions: u8) {
        let mut curr = grid.get(x, y).score;
        if prev_score < 0.01 || curr > prev_score || curr < prev_score * self.neighbor_ratio {
            grid.get_mut(x, y).score = 0.0;
            curr = 0.0;
        }

        let max_x = grid.width() - 1;
        let max_y = grid.height() - 1;

        if directions & NORTH != 0 && y < max_y {
            if directions & WEST != 0 && x > 0 {
                self.trim(grid, x - 1, y + 1, curr, NORTH | WEST);
            }
            if directions & EAST != 0 && x < max_x {
                self.trim(grid, x + 1, y + 1, curr, NORTH | EAST);
            }
            self.trim(grid, x, y + 1, curr, NORTH);
        }
        if directions & SOUTH != 0 && y > 0 {
            if directions & WEST != 0 && x > 0 {
                self.trim(grid, x - 1, y - 1, curr, SOUTH | WEST);
            }
            if directions & EAST != 0 && x < max_x {
                self.trim(grid, x + 1, y - 1, curr, SOUTH | EAST);
            }
            self.trim(grid, x, y - 1, curr, SOUTH);
        }
        if directions & EAST != 0 && x < max_x {
            self.trim(grid, x + 1, y, curr, EAST);
        }
        if directions & WEST != 0 && x > 0 {
            self.trim(grid, x - 1, y, curr, WEST);
        }
    }
}
