//! # Passive Motion Core
//!
//! Device-free passive motion detection over an RF link field. Fixed
//! receivers report the recent signal variance of each (receiver,
//! transmitter) link; motion between a pair disturbs the link and raises its
//! variance. This crate scores those disturbances onto an overlapping tile
//! grid and isolates the coherent blobs that indicate where something moved.
//!
//! The pipeline, run once per detection cycle:
//!
//! 1. **Fingerprints** — [`VarianceTracker`] snapshots each receiver's fresh
//!    link variances, evicting stale samples.
//! 2. **Lines** — [`LineBuilder`] turns above-noise links into geometric
//!    [`LinkLine`]s between the registered device positions.
//! 3. **Scoring** — [`TileScorer`] accumulates noise- and length-adjusted
//!    line contributions onto a [`TileGrid`] of overlapping tiles.
//! 4. **Isolation** — [`PeakIsolator`] keeps only the blob around the
//!    strongest tile.
//! 5. **Rounds** — [`MotionDetector`] repeats scoring with the lines not yet
//!    explained by a blob, so several separate movers are each detected.
//!
//! [`KernelFilter`] provides auxiliary convolution views of a scored grid
//! for diagnostics.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod detection;
pub mod error;
pub mod isolation;
pub mod kernel;
pub mod lines;
pub mod registry;
pub mod scoring;
pub mod tiles;
pub mod types;
pub mod variance;

// Re-export the pipeline surface at the crate root
pub use config::{AlgorithmConfig, AlgorithmConfigBuilder};
pub use detection::{MotionDetector, TileResult, TileResultSet};
pub use error::{CoreError, CoreResult};
pub use isolation::PeakIsolator;
pub use kernel::KernelFilter;
pub use lines::{LineBuilder, LinkLine};
pub use registry::DeviceRegistry;
pub use scoring::TileScorer;
pub use tiles::{tile_count, ScoredTile, TileGrid};
pub use types::{DeviceId, Point, Receiver, Rect, Segment, Transmitter};
pub use variance::{Fingerprint, VarianceEntry, VarianceTracker};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
