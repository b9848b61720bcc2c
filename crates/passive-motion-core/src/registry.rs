//! Concurrent receiver and transmitter registries.
//!
//! Registration arrives from an ingestion thread while the detection cycle
//! reads on another, so both maps live behind [`parking_lot::RwLock`] and all
//! methods take `&self`. Entries are upserted by device id (last-write-wins)
//! and never removed; the registries grow with the set of devices ever seen.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::types::{DeviceId, Receiver, Transmitter};

/// Shared registry of known receivers and transmitters.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    receivers: RwLock<HashMap<DeviceId, Receiver>>,
    transmitters: RwLock<HashMap<DeviceId, Transmitter>>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts a receiver by its device id.
    pub fn upsert_receiver(&self, receiver: Receiver) {
        tracing::debug!(%receiver, "added receiver");
        self.receivers.write().insert(receiver.id.clone(), receiver);
    }

    /// Upserts a transmitter by its device id.
    pub fn upsert_transmitter(&self, transmitter: Transmitter) {
        tracing::debug!(%transmitter, "added transmitter");
        self.transmitters
            .write()
            .insert(transmitter.id.clone(), transmitter);
    }

    /// Looks up a receiver by id.
    #[must_use]
    pub fn receiver(&self, id: &DeviceId) -> Option<Receiver> {
        self.receivers.read().get(id).cloned()
    }

    /// Looks up a transmitter by id.
    #[must_use]
    pub fn transmitter(&self, id: &DeviceId) -> Option<Transmitter> {
        self.transmitters.read().get(id).cloned()
    }

    /// Ids of all known receivers.
    #[must_use]
    pub fn receiver_ids(&self) -> Vec<DeviceId> {
        self.receivers.read().keys().cloned().collect()
    }

    /// Number of known receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.receivers.read().len()
    }

    /// Number of known transmitters.
    #[must_use]
    pub fn transmitter_count(&self) -> usize {
        self.transmitters.read().len()
    }
}
