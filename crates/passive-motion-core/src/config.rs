//! Algorithm configuration.

use serde::{Deserialize, Serialize};

/// Tuning parameters for the motion detection pipeline.
///
/// The core does not validate these beyond what its own arithmetic requires;
/// out-of-range values degrade detection quality rather than fail (for
/// example a non-positive [`tile_score_threshold`](Self::tile_score_threshold)
/// admits nearly every tile). Validation, where wanted, belongs to whatever
/// loads the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// Minimum tile score to count as signal. Tiles scoring at or below this
    /// are zeroed and excluded from solutions.
    pub tile_score_threshold: f32,
    /// Variance noise floor. Link variances at or below this are background
    /// noise; the floor is also subtracted from the variance when scoring.
    pub std_dev_noise_threshold: f32,
    /// Maximum distance from a tile center to either line endpoint for the
    /// line to contribute to that tile.
    pub radius_threshold: f32,
    /// Minimum receiver-transmitter distance for a link to be considered.
    pub link_min_distance: f32,
    /// Exponent applied to the line length in the scoring denominator.
    pub line_length_power: f32,
    /// Desired (pre-overlap) tile width.
    pub desired_tile_width: f32,
    /// Desired (pre-overlap) tile height.
    pub desired_tile_height: f32,
    /// Flood-fill decay cutoff: a tile is pruned when its score falls below
    /// this fraction of its predecessor's score.
    pub neighbor_ratio: f32,
    /// Fraction of the global peak used as the floor cutoff during peak
    /// isolation.
    pub peak_ratio: f32,
    /// Maximum age in milliseconds of a link variance entry before it is
    /// evicted on read.
    pub max_sample_age_ms: i64,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            tile_score_threshold: 0.5,
            std_dev_noise_threshold: 1.2,
            radius_threshold: 90.0,
            link_min_distance: 6.0,
            line_length_power: 1.1,
            desired_tile_width: 20.0,
            desired_tile_height: 20.0,
            neighbor_ratio: 0.5,
            peak_ratio: 0.5,
            max_sample_age_ms: 5000,
        }
    }
}

impl AlgorithmConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AlgorithmConfigBuilder {
        AlgorithmConfigBuilder::default()
    }
}

/// Builder for [`AlgorithmConfig`].
#[derive(Debug, Default)]
pub struct AlgorithmConfigBuilder {
    config: AlgorithmConfig,
}

impl AlgorithmConfigBuilder {
    /// Set the minimum tile score counted as signal.
    pub fn tile_score_threshold(mut self, threshold: f32) -> Self {
        self.config.tile_score_threshold = threshold;
        self
    }

    /// Set the variance noise floor.
    pub fn std_dev_noise_threshold(mut self, threshold: f32) -> Self {
        self.config.std_dev_noise_threshold = threshold;
        self
    }

    /// Set the tile-center-to-endpoint distance limit.
    pub fn radius_threshold(mut self, radius: f32) -> Self {
        self.config.radius_threshold = radius;
        self
    }

    /// Set the minimum link distance.
    pub fn link_min_distance(mut self, distance: f32) -> Self {
        self.config.link_min_distance = distance;
        self
    }

    /// Set the line length exponent.
    pub fn line_length_power(mut self, power: f32) -> Self {
        self.config.line_length_power = power;
        self
    }

    /// Set the desired pre-overlap tile size.
    pub fn desired_tile_size(mut self, width: f32, height: f32) -> Self {
        self.config.desired_tile_width = width;
        self.config.desired_tile_height = height;
        self
    }

    /// Set the flood-fill decay cutoff.
    pub fn neighbor_ratio(mut self, ratio: f32) -> Self {
        self.config.neighbor_ratio = ratio;
        self
    }

    /// Set the peak floor fraction.
    pub fn peak_ratio(mut self, ratio: f32) -> Self {
        self.config.peak_ratio = ratio;
        self
    }

    /// Set the maximum link variance age in milliseconds.
    pub fn max_sample_age_ms(mut self, age_ms: i64) -> Self {
        self.config.max_sample_age_ms = age_ms;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> AlgorithmConfig {
        self.config
    }
}
