//! The overlapping tile grid.
//!
//! The region is covered by an odd number of tiles per axis, each twice the
//! axis step in size, so adjacent tiles overlap by exactly half their width
//! and height. The overlap gives the score surface a finer spatial gradient
//! than a disjoint tiling with the same tile count.

use crate::types::Rect;

/// Symbols used for the ASCII score map, from quiet to loud.
const MOTION_SYMBOLS: [char; 5] = [' ', '.', ':', '+', '#'];

/// One tile of the region grid with its mutable score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTile {
    /// The tile's rectangle in region coordinates
    pub rect: Rect,
    /// Current score; non-negative after any scoring pass
    pub score: f32,
}

impl ScoredTile {
    /// Creates a tile with score 0.
    #[must_use]
    pub fn new(rect: Rect) -> Self {
        Self { rect, score: 0.0 }
    }
}

impl std::fmt::Display for ScoredTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scored Tile ({}, {}) ({}, {}): {}",
            self.rect.x,
            self.rect.y,
            self.rect.x + self.rect.width,
            self.rect.y + self.rect.height,
            self.score
        )
    }
}

/// Number of tiles along one axis for the given region extent and desired
/// pre-overlap tile size. Always odd: `2 * ceil(max / desired) - 1`.
///
/// A non-positive desired size falls back to a single tile covering the
/// whole axis rather than failing the cycle.
#[must_use]
pub fn tile_count(region_max: f32, desired_size: f32) -> usize {
    if desired_size <= 0.0 {
        return 1;
    }
    let base = (region_max / desired_size).ceil().max(1.0) as usize;
    base.saturating_mul(2) - 1
}

/// A 2D grid of [`ScoredTile`]s indexed by `(x, y)`.
///
/// Grids are created fresh for each detection cycle and owned exclusively by
/// it; nothing here is shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    tiles: Vec<Vec<ScoredTile>>,
}

impl TileGrid {
    /// Creates an all-zero grid of `num_x` by `num_y` overlapping tiles
    /// covering `(0,0)..(region_x_max, region_y_max)`.
    #[must_use]
    pub fn new(region_x_max: f32, region_y_max: f32, num_x: usize, num_y: usize) -> Self {
        let x_step = region_x_max / (num_x as f32 + 1.0);
        let y_step = region_y_max / (num_y as f32 + 1.0);

        let tiles = (0..num_x)
            .map(|x| {
                (0..num_y)
                    .map(|y| {
                        ScoredTile::new(Rect::new(
                            x_step * x as f32,
                            y_step * y as f32,
                            x_step * 2.0,
                            y_step * 2.0,
                        ))
                    })
                    .collect()
            })
            .collect();

        tracing::debug!(num_x, num_y, "created tiles");
        Self { tiles }
    }

    /// Number of tiles along the X axis.
    #[must_use]
    pub fn width(&self) -> usize {
        self.tiles.len()
    }

    /// Number of tiles along the Y axis.
    #[must_use]
    pub fn height(&self) -> usize {
        self.tiles.first().map_or(0, Vec::len)
    }

    /// Borrow the tile at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> &ScoredTile {
        &self.tiles[x][y]
    }

    /// Mutably borrow the tile at `(x, y)`.
    #[must_use]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut ScoredTile {
        &mut self.tiles[x][y]
    }

    /// Iterates over all tiles with their grid coordinates in x-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &ScoredTile)> {
        self.tiles
            .iter()
            .enumerate()
            .flat_map(|(x, col)| col.iter().enumerate().map(move |(y, t)| (x, y, t)))
    }

    /// Cell-wise running maximum: raises each tile's score to the score of
    /// the corresponding tile in `other`. Shapes must match.
    pub fn envelope_max(&mut self, other: &TileGrid) {
        debug_assert_eq!(self.width(), other.width());
        debug_assert_eq!(self.height(), other.height());
        for (x, col) in self.tiles.iter_mut().enumerate() {
            for (y, tile) in col.iter_mut().enumerate() {
                tile.score = tile.score.max(other.tiles[x][y].score);
            }
        }
    }

    /// Renders the grid as a bordered ASCII map, brightest tiles as `#`,
    /// thresholded against multiples of `score_threshold`. Row 0 is at the
    /// bottom. Intended for debug logging.
    #[must_use]
    pub fn ascii_map(&self, score_threshold: f32) -> String {
        let mut out = String::new();
        out.push('+');
        for _ in 0..self.width() {
            out.push_str("--");
        }
        out.push_str("+\n");
        for y in (0..self.height()).rev() {
            out.push('|');
            for x in 0..self.width() {
                let score = self.tiles[x][y].score;
                let symbol = if score > 2.0 * score_threshold {
                    MOTION_SYMBOLS[4]
                } else if score > 1.66 * score_threshold {
                    MOTION_SYMBOLS[3]
                } else if score > 1.33 * score_threshold {
                    MOTION_SYMBOLS[2]
                } else if score > score_threshold {
                    MOTION_SYMBOLS[1]
                } else {
                    MOTION_SYMBOLS[0]
                };
                out.push(symbol);
                out.push(symbol);
            }
            out.push_str("|\n");
        }
        out.push('+');
        for _ in 0..self.width() {
            out.push_str("--");
        }
        out.push_str("+\n");
        out
    }
}
