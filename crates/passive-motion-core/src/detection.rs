//! The multi-round motion detector.
//!
//! One detection cycle turns the current link variances into attenuation
//! lines, then repeatedly scores a fresh grid and removes the lines explained
//! by the strongest blob. Each round can only shrink the line set, so the
//! loop always terminates; the published tiles are the union of every round's
//! solution and the envelope grid keeps the per-cell maximum across rounds
//! for diagnostics.

use std::collections::HashMap;

use ndarray::Array2;
use parking_lot::RwLock;

use crate::config::AlgorithmConfig;
use crate::kernel::{self, KernelFilter};
use crate::lines::{LineBuilder, LinkLine};
use crate::registry::DeviceRegistry;
use crate::scoring::TileScorer;
use crate::tiles::{tile_count, ScoredTile, TileGrid};
use crate::types::{DeviceId, Receiver, Transmitter};
use crate::variance::{Fingerprint, VarianceTracker};

/// One named grid snapshot from a detection cycle, optionally tagged with
/// the convolution kernel that produced it.
#[derive(Debug, Clone)]
pub struct TileResult {
    /// The snapshot grid
    pub tiles: TileGrid,
    /// Kernel applied to produce this snapshot, if any
    pub kernel: Option<Array2<f32>>,
}

/// Everything produced by one detection cycle.
#[derive(Debug, Clone)]
pub struct TileResultSet {
    /// All attenuation lines the cycle started from
    pub lines: Vec<LinkLine>,
    /// Named grid snapshots: `round-N` per round, `envelope`, and the
    /// kernel-filtered envelope views
    pub results: HashMap<String, TileResult>,
    /// Deep-copied solution tiles from every round, in round order
    pub tiles_to_publish: Vec<ScoredTile>,
}

impl TileResultSet {
    /// Looks up a snapshot by name.
    #[must_use]
    pub fn result(&self, description: &str) -> Option<&TileResult> {
        self.results.get(description)
    }
}

/// The passive motion detection engine for one region.
///
/// All operations take `&self`; ingestion threads register devices and
/// record variances while a single driver thread runs cycles. A cycle
/// snapshots the shared state up front and works on owned grids, so it never
/// holds a lock while scoring.
#[derive(Debug)]
pub struct MotionDetector {
    config: AlgorithmConfig,
    registry: DeviceRegistry,
    tracker: VarianceTracker,
    region_bounds: RwLock<(f32, f32)>,
}

impl MotionDetector {
    /// Creates a detector with the given configuration and no known devices.
    #[must_use]
    pub fn new(config: AlgorithmConfig) -> Self {
        let tracker = VarianceTracker::new(config.max_sample_age_ms);
        Self {
            config,
            registry: DeviceRegistry::new(),
            tracker,
            region_bounds: RwLock::new((0.0, 0.0)),
        }
    }

    /// The detector's algorithm configuration.
    #[must_use]
    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    /// Registers or replaces a receiver.
    pub fn register_receiver(&self, receiver: Receiver) {
        self.registry.upsert_receiver(receiver);
    }

    /// Registers or replaces a transmitter.
    pub fn register_transmitter(&self, transmitter: Transmitter) {
        self.registry.upsert_transmitter(transmitter);
    }

    /// Records the latest variance seen on a (receiver, transmitter) link.
    pub fn record_variance(
        &self,
        receiver_id: &DeviceId,
        transmitter_id: &DeviceId,
        value: f32,
        timestamp_ms: i64,
    ) {
        self.tracker
            .record(receiver_id, transmitter_id, value, timestamp_ms);
    }

    /// Sets the region extents. Cycles are a no-op until both are positive.
    pub fn set_region_bounds(&self, x_max: f32, y_max: f32) {
        tracing::info!(x_max, y_max, "region bounds set");
        *self.region_bounds.write() = (x_max, y_max);
    }

    /// Runs one detection cycle at the current wall-clock time.
    #[must_use]
    pub fn run_cycle(&self) -> Option<TileResultSet> {
        self.run_cycle_at(chrono::Utc::now().timestamp_millis())
    }

    /// Runs one detection cycle, evaluating sample freshness against
    /// `now_ms`. Returns `None` while the region bounds are unset.
    #[must_use]
    pub fn run_cycle_at(&self, now_ms: i64) -> Option<TileResultSet> {
        let (x_max, y_max) = *self.region_bounds.read();
        if x_max <= 0.0 || y_max <= 0.0 {
            tracing::debug!("region bounds unset, skipping cycle");
            return None;
        }
        let num_x = tile_count(x_max, self.config.desired_tile_width);
        let num_y = tile_count(y_max, self.config.desired_tile_height);

        let fingerprints = self.fingerprints(now_ms);
        let lines = LineBuilder::new(&self.registry, &self.config).build(&fingerprints);

        let scorer = TileScorer::new(&self.config);
        let mut envelope = TileGrid::new(x_max, y_max, num_x, num_y);
        let mut results = HashMap::new();
        let mut tiles_to_publish = Vec::new();
        let mut remaining = lines.clone();
        let mut round = 1usize;

        loop {
            let mut grid = TileGrid::new(x_max, y_max, num_x, num_y);
            let solution = scorer.score(&mut grid, &remaining);
            envelope.envelope_max(&grid);
            results.insert(format!("round-{round}"), TileResult {
                tiles: grid,
                kernel: None,
            });

            if solution.is_empty() {
                break;
            }
            tracing::debug!(round, tiles = solution.len(), "round produced a blob");

            let before = remaining.len();
            remaining.retain(|line| {
                !solution
                    .iter()
                    .any(|tile| line.segment.intersects(&tile.rect))
            });
            tiles_to_publish.extend(solution);

            if remaining.is_empty() || remaining.len() == before {
                break;
            }
            round += 1;
        }

        tracing::debug!(
            "score map:\n{}",
            envelope.ascii_map(self.config.tile_score_threshold)
        );

        let sharpen = kernel::sharpen_3x3();
        let mut sharpened = TileGrid::new(x_max, y_max, num_x, num_y);
        match KernelFilter::apply(&sharpen, &envelope, &mut sharpened) {
            Ok(_) => {
                results.insert("envelope-sharpen".to_owned(), TileResult {
                    tiles: sharpened,
                    kernel: Some(sharpen),
                });
            }
            Err(error) => tracing::warn!(%error, "kernel filter failed"),
        }
        results.insert("envelope".to_owned(), TileResult {
            tiles: envelope,
            kernel: None,
        });

        tracing::debug!(
            lines = lines.len(),
            published = tiles_to_publish.len(),
            rounds = round,
            "cycle complete"
        );
        Some(TileResultSet {
            lines,
            results,
            tiles_to_publish,
        })
    }

    fn fingerprints(&self, now_ms: i64) -> Vec<Fingerprint> {
        let mut fingerprints = Vec::new();
        for receiver_id in self.registry.receiver_ids() {
            match self.tracker.fingerprint(&receiver_id, now_ms) {
                Some(fingerprint) => fingerprints.push(fingerprint),
                None => tracing::debug!(receiver = %receiver_id, "receiver cannot be heard"),
            }
        }
        tracing::debug!(count = fingerprints.len(), "generated fingerprints");
        fingerprints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_000_000;

    fn detector() -> MotionDetector {
        MotionDetector::new(
            AlgorithmConfig::builder()
                .tile_score_threshold(0.01)
                .build(),
        )
    }

    fn link(detector: &MotionDetector, rx: &str, tx: &str, y: f32, value: f32) {
        detector.register_receiver(Receiver::new(rx, 0.0, y, "lab"));
        detector.register_transmitter(Transmitter::new(tx, 100.0, y, "lab"));
        detector.record_variance(&DeviceId::new(rx), &DeviceId::new(tx), value, NOW);
    }

    #[test]
    fn test_unset_bounds_skip_cycle() {
        let detector = detector();
        link(&detector, "rx", "tx", 10.0, 5.0);
        assert!(detector.run_cycle_at(NOW).is_none());
    }

    #[test]
    fn test_single_link_cycle() {
        let detector = detector();
        detector.set_region_bounds(100.0, 100.0);
        link(&detector, "rx", "tx", 10.0, 5.0);

        let result = detector.run_cycle_at(NOW).unwrap();
        assert_eq!(result.lines.len(), 1);
        assert!(!result.tiles_to_publish.is_empty());
        // Published tiles hug the link at y = 10
        assert!(result
            .tiles_to_publish
            .iter()
            .all(|t| t.rect.y <= 10.0 && t.rect.y + t.rect.height >= 10.0));
        assert!(result.result("round-1").is_some());
        assert!(result.result("envelope").is_some());
        assert!(result.result("envelope-sharpen").unwrap().kernel.is_some());
    }

    #[test]
    fn test_disjoint_blobs_detected_across_rounds() {
        let detector = detector();
        detector.set_region_bounds(100.0, 100.0);
        // The stronger link wins round one; its blob's floor pass wipes the
        // weaker one, whose line survives into round two
        link(&detector, "rx-a", "tx-a", 10.0, 9.0);
        link(&detector, "rx-b", "tx-b", 90.0, 5.0);

        let result = detector.run_cycle_at(NOW).unwrap();
        assert!(result.result("round-2").is_some());
        assert!(result.result("round-3").is_none());
        assert!(result.tiles_to_publish.iter().any(|t| t.rect.y < 30.0));
        assert!(result
            .tiles_to_publish
            .iter()
            .any(|t| t.rect.y + t.rect.height > 80.0));
    }

    #[test]
    fn test_non_positive_tile_size_degrades_to_single_tile() {
        let detector = MotionDetector::new(
            AlgorithmConfig::builder()
                .tile_score_threshold(0.01)
                .desired_tile_size(0.0, -5.0)
                .build(),
        );
        detector.set_region_bounds(100.0, 100.0);
        link(&detector, "rx", "tx", 10.0, 5.0);

        // Misconfigured tile sizes fall back to one region-sized tile
        let result = detector.run_cycle_at(NOW).unwrap();
        let grid = &result.result("round-1").unwrap().tiles;
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.height(), 1);
        assert_eq!(result.tiles_to_publish.len(), 1);
    }

    #[test]
    fn test_stale_samples_produce_empty_result() {
        let detector = detector();
        detector.set_region_bounds(100.0, 100.0);
        detector.register_receiver(Receiver::new("rx", 0.0, 10.0, "lab"));
        detector.register_transmitter(Transmitter::new("tx", 100.0, 10.0, "lab"));
        detector.record_variance(&DeviceId::new("rx"), &DeviceId::new("tx"), 5.0, NOW - 6000);

        let result = detector.run_cycle_at(NOW).unwrap();
        assert!(result.lines.is_empty());
        assert!(result.tiles_to_publish.is_empty());
    }

    #[test]
    fn test_quiet_cycle_still_reports() {
        let detector = detector();
        detector.set_region_bounds(100.0, 100.0);

        let result = detector.run_cycle_at(NOW).unwrap();
        assert!(result.tiles_to_publish.is_empty());
        assert!(result.result("round-1").is_some());
        assert!(result.result("envelope").is_some());
    }

    #[test]
    fn test_envelope_keeps_per_round_maxima() {
        let detector = detector();
        detector.set_region_bounds(100.0, 100.0);
        link(&detector, "rx-a", "tx-a", 10.0, 9.0);
        link(&detector, "rx-b", "tx-b", 90.0, 5.0);

        let result = detector.run_cycle_at(NOW).unwrap();
        let envelope = &result.result("envelope").unwrap().tiles;
        for tile in &result.tiles_to_publish {
            let hit = envelope
                .iter()
                .any(|(_, _, t)| t.rect == tile.rect && t.score >= tile.score);
            assert!(hit, "envelope lost a published tile at {}", tile);
        }
    }
}
