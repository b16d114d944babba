//! Downstream execution venue: the simulated legacy trade-processing
//! system.
//!
//! The venue accepts exactly one order at a time process-wide and executes
//! within a bounded latency. [`LegacyExecutionSimulator`] always succeeds
//! when called one-at-a-time; the [`ExecutionVenue`] contract still
//! accommodates rejection and timeout so callers must reconcile failure.

use crate::error::ExecutionError;
use crate::types::{Order, OrderId, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Success signal from the venue: the downstream leg of this order executed.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ExecutionReport {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub executed_at: DateTime<Utc>,
}

/// Downstream execution seam. Implementations may fail or stall; the
/// coordinator bounds every call with a timeout.
#[async_trait]
pub trait ExecutionVenue: Send + Sync {
    async fn execute(&self, order: &Order) -> Result<ExecutionReport, ExecutionError>;
}

/// Simulator configuration: fixed base latency plus optional random jitter.
#[derive(Clone, Copy, Debug)]
pub struct SimulatorConfig {
    pub latency: Duration,
    pub jitter: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
            jitter: Duration::ZERO,
        }
    }
}

/// Simulated legacy execution system: single-threaded, bounded latency.
///
/// The in-flight slot is held by an RAII guard for the duration of each
/// `execute` call, so a call abandoned by a caller-side timeout still frees
/// the slot when its task is dropped. An overlapping call fails with
/// [`ExecutionError::Busy`] rather than interleaving.
#[derive(Debug)]
pub struct LegacyExecutionSimulator {
    config: SimulatorConfig,
    in_flight: AtomicBool,
}

impl LegacyExecutionSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            config,
            in_flight: AtomicBool::new(false),
        }
    }
}

impl Default for LegacyExecutionSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[async_trait]
impl ExecutionVenue for LegacyExecutionSimulator {
    async fn execute(&self, order: &Order) -> Result<ExecutionReport, ExecutionError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(ExecutionError::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let mut delay = self.config.latency;
        if !self.config.jitter.is_zero() {
            let extra = rand::thread_rng().gen_range(0..=self.config.jitter.as_millis() as u64);
            delay += Duration::from_millis(extra);
        }
        tokio::time::sleep(delay).await;

        Ok(ExecutionReport {
            order_id: order.id,
            status: OrderStatus::Executed,
            executed_at: Utc::now(),
        })
    }
}
