//! # Passive Motion Solver
//!
//! The boundary shell around [`passive_motion_core`]: configuration loading,
//! a fixed-cadence cycle driver, and the wire encoding for published
//! solution tiles.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use passive_motion_solver::{CycleDriver, SolverConfig, SolverEngine, TilePublisher};
//!
//! struct Discard;
//! impl TilePublisher for Discard {
//!     fn publish(&self, _payload: &[u8]) {}
//! }
//!
//! # async fn run() {
//! let config = SolverConfig::default();
//! let engine = Arc::new(SolverEngine::new(&config, Box::new(Discard)));
//! let driver = CycleDriver::new(Arc::clone(&engine), Duration::from_millis(500));
//! driver.run().await;
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod wire;

pub use config::{DeviceSpec, SolverConfig};
pub use driver::CycleDriver;
pub use engine::{SolverEngine, TilePublisher};
pub use error::{SolverError, SolverResult};
pub use wire::{TileRecord, RECORD_SIZE};
