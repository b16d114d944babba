//! Order lifecycle coordinator: the state machine core.
//!
//! States: `Submitted → {Cancelled, Executed → Completed, Failed}`.
//! The coordinator owns every transition and writes each one through the
//! store before returning; races (cancel vs in-flight execution) resolve
//! through the store's atomic `transition`: the first committer wins and
//! the loser reports the settled state.
//!
//! The downstream venue accepts one order at a time process-wide, so all
//! `execute` calls queue FIFO at an internal gate. Waiting there never
//! blocks creation, cancellation, or listing of other orders.

use crate::audit::{AuditEvent, AuditSink};
use crate::error::{ExecutionError, OrderError, StoreError};
use crate::execution::ExecutionVenue;
use crate::store::OrderStore;
use crate::types::{Fund, Order, OrderId, OrderStatus, TransactionType};
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Coordinates the lifecycle of orders against the store and the
/// downstream execution venue.
pub struct OrderCoordinator {
    store: Arc<dyn OrderStore>,
    venue: Arc<dyn ExecutionVenue>,
    audit: Arc<dyn AuditSink>,
    /// Serializes venue calls; tokio's Mutex queues waiters FIFO.
    venue_gate: tokio::sync::Mutex<()>,
    execution_timeout: Duration,
    next_order_id: AtomicU64,
}

impl OrderCoordinator {
    pub fn new(
        store: Arc<dyn OrderStore>,
        venue: Arc<dyn ExecutionVenue>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            store,
            venue,
            audit,
            venue_gate: tokio::sync::Mutex::new(()),
            execution_timeout: DEFAULT_EXECUTION_TIMEOUT,
            next_order_id: AtomicU64::new(1),
        }
    }

    /// Bounds each venue call; on expiry the order is parked `Failed`.
    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = timeout;
        self
    }

    /// Seeds the id counter, e.g. past the highest persisted id on restart.
    pub fn with_next_order_id(self, next: u64) -> Self {
        self.next_order_id.store(next, Ordering::SeqCst);
        self
    }

    /// Validates input, then persists a new order in `Submitted` state.
    ///
    /// All validation happens before any store call: an invalid fund,
    /// transaction type, or non-positive quantity never leaves a partial
    /// record behind.
    pub async fn create_order(
        &self,
        fund_name: &str,
        transaction_type: &str,
        quantity: Decimal,
    ) -> Result<Order, OrderError> {
        let fund = Fund::from_str(fund_name)
            .ok_or_else(|| OrderError::InvalidFund(fund_name.to_string()))?;
        let transaction_type = TransactionType::from_str(transaction_type)
            .ok_or_else(|| OrderError::InvalidTransactionType(transaction_type.to_string()))?;
        if quantity <= Decimal::ZERO {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        let id = OrderId(self.next_order_id.fetch_add(1, Ordering::SeqCst));
        let order = Order::new(id, fund, transaction_type, quantity);
        self.store.persist(order.clone()).await.map_err(OrderError::from)?;
        info!(
            "order created id={} fund={} type={} quantity={} value={}",
            order.id, order.fund_name, order.transaction_type, order.quantity, order.order_value
        );
        self.audit.emit(&AuditEvent::now(
            "api",
            "order_create",
            Some(order.id),
            Some(format!("{} {} {}", order.fund_name, order.transaction_type, order.quantity)),
            "success",
        ));
        Ok(order)
    }

    /// Sends a `Submitted` order to the downstream venue and records the
    /// outcome durably before returning.
    ///
    /// On venue success the store moves `Submitted → Completed`; on venue
    /// failure or timeout it moves `Submitted → Failed` and only then
    /// raises `DownstreamUnavailable`, so persisted state never contradicts
    /// the reported outcome. The order is never left `Submitted` after this
    /// returns. A cancel that commits first wins; this call then reports
    /// `InvalidTransition` with the settled status.
    pub async fn submit_for_execution(&self, order: &Order) -> Result<Order, OrderError> {
        // Fail fast if the order already settled; don't consume the
        // serialized venue slot for an order that cannot complete.
        let current = self.store.get(order.id).await.map_err(OrderError::from)?;
        if current.status != OrderStatus::Submitted {
            return Err(OrderError::InvalidTransition {
                id: order.id,
                actual: current.status,
            });
        }

        // One order in flight at a time; waiters queue FIFO.
        let outcome = {
            let _slot = self.venue_gate.lock().await;
            tokio::time::timeout(self.execution_timeout, self.venue.execute(order)).await
        };

        match outcome {
            Ok(Ok(report)) => {
                match self
                    .store
                    .transition(order.id, OrderStatus::Submitted, OrderStatus::Completed)
                    .await
                {
                    Ok(updated) => {
                        info!(
                            "order completed id={} executed_at={}",
                            updated.id, report.executed_at
                        );
                        self.audit.emit(&AuditEvent::now(
                            "api",
                            "order_execute",
                            Some(updated.id),
                            None,
                            "success",
                        ));
                        Ok(updated)
                    }
                    Err(StoreError::StatusConflict { actual, .. }) => {
                        // A cancel committed first; its state stands.
                        warn!(
                            "order {} settled as {} before execution result committed",
                            order.id, actual
                        );
                        self.audit.emit(&AuditEvent::now(
                            "api",
                            "order_execute",
                            Some(order.id),
                            Some(format!("lost race, settled {}", actual)),
                            "rejected",
                        ));
                        Err(OrderError::InvalidTransition { id: order.id, actual })
                    }
                    Err(e) => {
                        // Executed downstream but the Completed write failed.
                        // Best effort to park the order Failed rather than
                        // leave it Submitted, then report the store fault.
                        let _ = self
                            .store
                            .transition(order.id, OrderStatus::Submitted, OrderStatus::Failed)
                            .await;
                        Err(OrderError::Store(e))
                    }
                }
            }
            Ok(Err(e)) => self.fail_order(order.id, e).await,
            Err(_) => self.fail_order(order.id, ExecutionError::TimedOut).await,
        }
    }

    /// Parks the order `Failed`, then raises `DownstreamUnavailable`.
    /// The Failed write is durable before the error propagates.
    async fn fail_order(&self, id: OrderId, cause: ExecutionError) -> Result<Order, OrderError> {
        match self
            .store
            .transition(id, OrderStatus::Submitted, OrderStatus::Failed)
            .await
        {
            Ok(_) => {}
            // Already settled (e.g. a cancel won); that terminal state stands.
            Err(StoreError::StatusConflict { actual, .. }) => {
                warn!("order {} already settled as {} on execution failure", id, actual);
            }
            Err(e) => return Err(OrderError::Store(e)),
        }
        warn!("order {} failed downstream: {}", id, cause);
        self.audit.emit(&AuditEvent::now(
            "api",
            "order_execute",
            Some(id),
            Some(cause.to_string()),
            "error",
        ));
        Err(OrderError::DownstreamUnavailable(cause))
    }

    /// Cancels an order still in `Submitted` state.
    ///
    /// One atomic check-and-update against the store: `NotFound` if the
    /// order does not exist, `InvalidTransition` with the settled status if
    /// it already left `Submitted`.
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, OrderError> {
        let updated = self
            .store
            .transition(id, OrderStatus::Submitted, OrderStatus::Cancelled)
            .await
            .map_err(OrderError::from)?;
        info!("order cancelled id={}", id);
        self.audit.emit(&AuditEvent::now(
            "api",
            "order_cancel",
            Some(id),
            None,
            "success",
        ));
        Ok(updated)
    }

    /// All orders, newest first. Cancelled and failed orders are retained.
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.store.list_all().await.map_err(OrderError::from)
    }
}
