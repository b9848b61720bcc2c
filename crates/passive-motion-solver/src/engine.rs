//! The solver engine: one detector plus its publish path.

use passive_motion_core::{DeviceId, MotionDetector, Receiver, TileResultSet, Transmitter};

use crate::config::SolverConfig;
use crate::wire;

/// Receives encoded tile payloads when a cycle finds motion.
///
/// Implementations forward the payload wherever solutions go: a network
/// connection in a full deployment, stdout or a capture buffer here.
pub trait TilePublisher: Send + Sync {
    /// Called with one encoded payload per publishing cycle.
    fn publish(&self, payload: &[u8]);
}

/// Owns a [`MotionDetector`] and pushes its solutions to a publisher.
///
/// All operations take `&self`, so one engine can be shared between an
/// ingestion task and the cycle driver behind an `Arc`.
pub struct SolverEngine {
    region_name: String,
    detector: MotionDetector,
    publisher: Box<dyn TilePublisher>,
}

impl std::fmt::Debug for SolverEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverEngine")
            .field("region_name", &self.region_name)
            .field("detector", &self.detector)
            .finish_non_exhaustive()
    }
}

impl SolverEngine {
    /// Creates an engine from a configuration, registering any devices and
    /// region bounds the configuration carries.
    #[must_use]
    pub fn new(config: &SolverConfig, publisher: Box<dyn TilePublisher>) -> Self {
        let detector = MotionDetector::new(config.algorithm.clone());
        if config.region_x_max > 0.0 && config.region_y_max > 0.0 {
            detector.set_region_bounds(config.region_x_max, config.region_y_max);
        }
        for device in &config.receivers {
            detector.register_receiver(Receiver::new(
                device.id.as_str(),
                device.x,
                device.y,
                config.region_name.as_str(),
            ));
        }
        for device in &config.transmitters {
            detector.register_transmitter(Transmitter::new(
                device.id.as_str(),
                device.x,
                device.y,
                config.region_name.as_str(),
            ));
        }
        Self {
            region_name: config.region_name.clone(),
            detector,
            publisher,
        }
    }

    /// Name of the region this engine monitors.
    #[must_use]
    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    /// The underlying detector.
    #[must_use]
    pub fn detector(&self) -> &MotionDetector {
        &self.detector
    }

    /// Registers or replaces a receiver.
    pub fn register_receiver(&self, receiver: Receiver) {
        self.detector.register_receiver(receiver);
    }

    /// Registers or replaces a transmitter.
    pub fn register_transmitter(&self, transmitter: Transmitter) {
        self.detector.register_transmitter(transmitter);
    }

    /// Records the latest variance seen on a (receiver, transmitter) link.
    pub fn record_variance(
        &self,
        receiver_id: &DeviceId,
        transmitter_id: &DeviceId,
        value: f32,
        timestamp_ms: i64,
    ) {
        self.detector
            .record_variance(receiver_id, transmitter_id, value, timestamp_ms);
    }

    /// Sets the region extents.
    pub fn set_region_bounds(&self, x_max: f32, y_max: f32) {
        self.detector.set_region_bounds(x_max, y_max);
    }

    /// Runs one detection cycle at the current wall-clock time, publishing
    /// any solution tiles. Returns `None` while region bounds are unset.
    pub fn cycle(&self) -> Option<TileResultSet> {
        self.detector.run_cycle().map(|result| self.publish(result))
    }

    /// Like [`cycle`](Self::cycle) with an explicit clock, for tests and
    /// replay.
    pub fn cycle_at(&self, now_ms: i64) -> Option<TileResultSet> {
        self.detector
            .run_cycle_at(now_ms)
            .map(|result| self.publish(result))
    }

    fn publish(&self, result: TileResultSet) -> TileResultSet {
        if result.tiles_to_publish.is_empty() {
            tracing::debug!(region = %self.region_name, "cycle found no motion");
        } else {
            let payload = wire::encode(&result.tiles_to_publish);
            tracing::info!(
                region = %self.region_name,
                tiles = result.tiles_to_publish.len(),
                "publishing solution tiles"
            );
            self.publisher.publish(&payload);
        }
        result
    }
}
