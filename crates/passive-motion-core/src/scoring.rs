//! Tile scoring against attenuation lines.

use crate::config::AlgorithmConfig;
use crate::isolation::PeakIsolator;
use crate::lines::LinkLine;
use crate::tiles::{ScoredTile, TileGrid};

/// Scores a tile grid against a set of attenuation lines.
///
/// One scoring pass resets every score, accumulates the contribution of each
/// nearby intersecting line, zeroes tiles at or below the score threshold,
/// runs peak isolation over the grid, and returns independent copies of the
/// tiles that survived with a score strictly above the threshold.
#[derive(Debug, Clone)]
pub struct TileScorer {
    config: AlgorithmConfig,
    isolator: PeakIsolator,
}

impl TileScorer {
    /// Creates a scorer with the given configuration.
    #[must_use]
    pub fn new(config: &AlgorithmConfig) -> Self {
        Self {
            config: config.clone(),
            isolator: PeakIsolator::new(config),
        }
    }

    /// Scores `grid` in place against `lines` and returns clones of the
    /// solution tiles.
    ///
    /// A line contributes to a tile only when the tile center is within the
    /// radius threshold of both endpoints, the line is at least the minimum
    /// link distance long, and the segment intersects the tile rectangle.
    /// The contribution is the noise-adjusted variance divided by the line
    /// length raised to the configured power.
    pub fn score(&self, grid: &mut TileGrid, lines: &[LinkLine]) -> Vec<ScoredTile> {
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                let tile = grid.get_mut(x, y);
                tile.score = 0.0;
                let center = tile.rect.center();

                for line in lines {
                    if center.distance_to(line.segment.p1) > self.config.radius_threshold {
                        continue;
                    }
                    if center.distance_to(line.segment.p2) > self.config.radius_threshold {
                        continue;
                    }
                    let length = line.segment.length();
                    if length < self.config.link_min_distance {
                        continue;
                    }
                    if !line.segment.intersects(&tile.rect) {
                        continue;
                    }
                    let numerator = line.value - self.config.std_dev_noise_threshold;
                    tile.score += numerator / length.powf(self.config.line_length_power);
                }

                if tile.score <= self.config.tile_score_threshold {
                    tile.score = 0.0;
                }
            }
        }

        self.isolator.isolate(grid);

        grid.iter()
            .filter(|(_, _, tile)| tile.score > self.config.tile_score_threshold)
            .map(|(_, _, tile)| tile.clone())
            .collect()
    }
}
