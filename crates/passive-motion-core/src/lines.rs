//! Attenuation line construction.
//!
//! A fingerprint entry above the noise floor becomes a geometric line from
//! the receiver's position to the transmitter's, carrying the raw link
//! variance. The noise floor is subtracted later, during tile scoring, not
//! here.

use crate::config::AlgorithmConfig;
use crate::registry::DeviceRegistry;
use crate::types::{Receiver, Segment, Transmitter};
use crate::variance::Fingerprint;

/// A line between a receiver and a transmitter whose link saw variance above
/// the noise floor.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkLine {
    /// The receiver end of the link
    pub receiver: Receiver,
    /// The transmitter end of the link
    pub transmitter: Transmitter,
    /// Segment from the receiver position to the transmitter position
    pub segment: Segment,
    /// Raw link variance (not noise-adjusted)
    pub value: f32,
}

impl std::fmt::Display for LinkLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Link Rx({}) Tx({}): {}",
            self.receiver.id, self.transmitter.id, self.value
        )
    }
}

/// Builds [`LinkLine`]s from fingerprints and registered device positions.
#[derive(Debug)]
pub struct LineBuilder<'a> {
    registry: &'a DeviceRegistry,
    noise_threshold: f32,
}

impl<'a> LineBuilder<'a> {
    /// Creates a line builder over the given registry.
    #[must_use]
    pub fn new(registry: &'a DeviceRegistry, config: &AlgorithmConfig) -> Self {
        Self {
            registry,
            noise_threshold: config.std_dev_noise_threshold,
        }
    }

    /// Builds all lines for the given fingerprints.
    ///
    /// A fingerprint whose receiver is not registered is dropped whole; a
    /// pair whose transmitter is not registered is dropped; values at or
    /// below the noise floor are dropped.
    #[must_use]
    pub fn build(&self, fingerprints: &[Fingerprint]) -> Vec<LinkLine> {
        let mut lines = Vec::new();

        for fingerprint in fingerprints {
            let Some(receiver) = self.registry.receiver(&fingerprint.receiver_id) else {
                tracing::debug!(receiver = %fingerprint.receiver_id, "unknown receiver, skipping");
                continue;
            };

            for (transmitter_id, &value) in &fingerprint.values {
                let Some(transmitter) = self.registry.transmitter(transmitter_id) else {
                    tracing::warn!(transmitter = %transmitter_id, "unknown transmitter, skipping");
                    continue;
                };
                if value <= self.noise_threshold {
                    continue;
                }
                lines.push(LinkLine {
                    segment: Segment::new(receiver.location, transmitter.location),
                    receiver: receiver.clone(),
                    transmitter,
                    value,
                });
            }
        }

        tracing::debug!(count = lines.len(), "generated lines");
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceId, Receiver, Transmitter};
    use crate::variance::VarianceTracker;

    fn registry() -> DeviceRegistry {
        let registry = DeviceRegistry::new();
        registry.upsert_receiver(Receiver::new("rx", 0.0, 0.0, "lab"));
        registry.upsert_transmitter(Transmitter::new("tx", 100.0, 0.0, "lab"));
        registry
    }

    fn fingerprint_for(tracker: &VarianceTracker, rx: &str, now: i64) -> Fingerprint {
        tracker.fingerprint(&DeviceId::new(rx), now).unwrap()
    }

    #[test]
    fn test_line_above_noise_floor() {
        let registry = registry();
        let tracker = VarianceTracker::new(5000);
        tracker.record(&DeviceId::new("rx"), &DeviceId::new("tx"), 5.0, 0);

        let builder = LineBuilder::new(&registry, &AlgorithmConfig::default());
        let lines = builder.build(&[fingerprint_for(&tracker, "rx", 0)]);

        assert_eq!(lines.len(), 1);
        assert!((lines[0].value - 5.0).abs() < f32::EPSILON);
        assert!((lines[0].segment.length() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_value_at_noise_floor_dropped() {
        let registry = registry();
        let tracker = VarianceTracker::new(5000);
        tracker.record(&DeviceId::new("rx"), &DeviceId::new("tx"), 1.2, 0);

        let builder = LineBuilder::new(&registry, &AlgorithmConfig::default());
        let lines = builder.build(&[fingerprint_for(&tracker, "rx", 0)]);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_unknown_receiver_drops_fingerprint() {
        let registry = DeviceRegistry::new();
        registry.upsert_transmitter(Transmitter::new("tx", 100.0, 0.0, "lab"));
        let tracker = VarianceTracker::new(5000);
        tracker.record(&DeviceId::new("ghost"), &DeviceId::new("tx"), 5.0, 0);

        let builder = LineBuilder::new(&registry, &AlgorithmConfig::default());
        let lines = builder.build(&[fingerprint_for(&tracker, "ghost", 0)]);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_unknown_transmitter_drops_pair() {
        let registry = registry();
        let tracker = VarianceTracker::new(5000);
        tracker.record(&DeviceId::new("rx"), &DeviceId::new("tx"), 5.0, 0);
        tracker.record(&DeviceId::new("rx"), &DeviceId::new("ghost"), 9.0, 0);

        let builder = LineBuilder::new(&registry, &AlgorithmConfig::default());
        let lines = builder.build(&[fingerprint_for(&tracker, "rx", 0)]);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].transmitter.id, DeviceId::new("tx"));
    }
}
