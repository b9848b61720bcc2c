//! Fixed-cadence cycle driver.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::engine::SolverEngine;

/// Runs detection cycles at a fixed cadence.
///
/// The loop runs on a single task, so cycles never overlap regardless of how
/// long one takes; the period is a pause between cycles, not a deadline.
#[derive(Debug)]
pub struct CycleDriver {
    engine: Arc<SolverEngine>,
    period: Duration,
    running: AtomicBool,
}

impl CycleDriver {
    /// Creates a driver over a shared engine.
    #[must_use]
    pub fn new(engine: Arc<SolverEngine>, period: Duration) -> Self {
        Self {
            engine,
            period,
            running: AtomicBool::new(false),
        }
    }

    /// Runs cycles until [`stop`](Self::stop) is called.
    pub async fn run(&self) {
        self.running.store(true, Ordering::SeqCst);
        tracing::info!(
            region = %self.engine.region_name(),
            period_ms = self.period.as_millis() as u64,
            "cycle driver started"
        );
        while self.running.load(Ordering::SeqCst) {
            if self.engine.cycle().is_none() {
                tracing::trace!("waiting for region bounds");
            }
            tokio::time::sleep(self.period).await;
        }
        tracing::info!("cycle driver stopped");
    }

    /// Stops the loop after the cycle in progress, if any.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeviceSpec, SolverConfig};
    use crate::engine::TilePublisher;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CountingPublisher {
        payloads: Mutex<Vec<Vec<u8>>>,
    }

    impl TilePublisher for Arc<CountingPublisher> {
        fn publish(&self, payload: &[u8]) {
            self.payloads.lock().push(payload.to_vec());
        }
    }

    fn engine(capture: &Arc<CountingPublisher>) -> Arc<SolverEngine> {
        let config = SolverConfig {
            region_name: "lab".to_owned(),
            region_x_max: 100.0,
            region_y_max: 100.0,
            algorithm: passive_motion_core::AlgorithmConfig::builder()
                .tile_score_threshold(0.01)
                .build(),
            receivers: vec![DeviceSpec {
                id: "rx".to_owned(),
                x: 0.0,
                y: 0.0,
            }],
            transmitters: vec![DeviceSpec {
                id: "tx".to_owned(),
                x: 100.0,
                y: 0.0,
            }],
            ..SolverConfig::default()
        };
        Arc::new(SolverEngine::new(&config, Box::new(Arc::clone(capture))))
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_publishes_on_cadence() {
        let capture = Arc::new(CountingPublisher::default());
        let engine = engine(&capture);
        engine.record_variance(
            &passive_motion_core::DeviceId::new("rx"),
            &passive_motion_core::DeviceId::new("tx"),
            5.0,
            chrono::Utc::now().timestamp_millis(),
        );

        let driver = Arc::new(CycleDriver::new(engine, Duration::from_millis(500)));
        let task = {
            let driver = Arc::clone(&driver);
            tokio::spawn(async move { driver.run().await })
        };

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(driver.is_running());
        driver.stop();
        task.await.unwrap();

        assert!(!driver.is_running());
        // Ticks at 0, 500, 1000 and 1500 ms each published once
        assert!(capture.payloads.lock().len() >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_runs_quietly_without_motion() {
        let capture = Arc::new(CountingPublisher::default());
        let driver = Arc::new(CycleDriver::new(
            engine(&capture),
            Duration::from_millis(500),
        ));
        let task = {
            let driver = Arc::clone(&driver);
            tokio::spawn(async move { driver.run().await })
        };

        tokio::time::sleep(Duration::from_millis(1100)).await;
        driver.stop();
        task.await.unwrap();

        assert!(capture.payloads.lock().is_empty());
    }
}
