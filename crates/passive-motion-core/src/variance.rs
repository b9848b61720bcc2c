//! Link variance tracking and fingerprint generation.
//!
//! Each (receiver, transmitter) link holds exactly one variance entry, the
//! most recent value reported by the ingestion path; a later report always
//! overwrites. Fingerprint reads evict entries older than the configured
//! sample age, so the tracker only ever holds links heard recently.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::DeviceId;

/// The latest variance observed on one link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarianceEntry {
    /// Reported link variance
    pub value: f32,
    /// Time the value was produced, in milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

/// A receiver's snapshot of all currently-valid link variances.
#[derive(Debug, Clone, PartialEq)]
pub struct Fingerprint {
    /// The receiver this fingerprint belongs to
    pub receiver_id: DeviceId,
    /// Variance value per heard transmitter
    pub values: HashMap<DeviceId, f32>,
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Variance Fingerprint ({}): {} links",
            self.receiver_id,
            self.values.len()
        )
    }
}

/// Tracks the latest variance per (receiver, transmitter) link.
///
/// Writers (ingestion) and the single cycle reader run on different threads;
/// the map lives behind a lock and every method takes `&self`. Reads are not
/// pure: [`fingerprint`](Self::fingerprint) removes stale entries as it goes,
/// so a second read with no intervening write returns the same result without
/// re-inspecting evicted links.
#[derive(Debug)]
pub struct VarianceTracker {
    links: RwLock<HashMap<DeviceId, HashMap<DeviceId, VarianceEntry>>>,
    max_sample_age_ms: i64,
}

impl VarianceTracker {
    /// Creates a tracker that evicts entries older than `max_sample_age_ms`.
    #[must_use]
    pub fn new(max_sample_age_ms: i64) -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
            max_sample_age_ms,
        }
    }

    /// Records the latest variance for the (receiver, transmitter) link,
    /// overwriting any previous entry.
    pub fn record(
        &self,
        receiver_id: &DeviceId,
        transmitter_id: &DeviceId,
        value: f32,
        timestamp_ms: i64,
    ) {
        let mut links = self.links.write();
        links
            .entry(receiver_id.clone())
            .or_default()
            .insert(transmitter_id.clone(), VarianceEntry {
                value,
                timestamp_ms,
            });
    }

    /// Builds the fingerprint for a receiver at time `now_ms`.
    ///
    /// Entries older than the maximum sample age are removed from the tracker
    /// and excluded. Returns `None` when the receiver has no valid links
    /// (the receiver "cannot be heard").
    #[must_use]
    pub fn fingerprint(&self, receiver_id: &DeviceId, now_ms: i64) -> Option<Fingerprint> {
        let mut links = self.links.write();
        let by_transmitter = links.get_mut(receiver_id)?;
        by_transmitter.retain(|transmitter_id, entry| {
            let fresh = now_ms - entry.timestamp_ms <= self.max_sample_age_ms;
            if !fresh {
                tracing::trace!(
                    receiver = %receiver_id,
                    transmitter = %transmitter_id,
                    age_ms = now_ms - entry.timestamp_ms,
                    "evicting stale link variance"
                );
            }
            fresh
        });
        if by_transmitter.is_empty() {
            return None;
        }
        Some(Fingerprint {
            receiver_id: receiver_id.clone(),
            values: by_transmitter
                .iter()
                .map(|(id, entry)| (id.clone(), entry.value))
                .collect(),
        })
    }

    /// Number of links currently tracked for a receiver, stale or not.
    #[must_use]
    pub fn link_count(&self, receiver_id: &DeviceId) -> usize {
        self.links
            .read()
            .get(receiver_id)
            .map_or(0, HashMap::len)
    }
}
