//! Error taxonomy for the order-entry service.
//!
//! [`StoreError`] covers the persistence contract, [`ExecutionError`] the
//! downstream venue, and [`OrderError`] is what the coordinator exposes to
//! callers. Validation errors are raised before anything is persisted.

use crate::types::{OrderId, OrderStatus};
use thiserror::Error;

/// Failures of the order store contract.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An order with this id already exists; the store never overwrites.
    #[error("order {0} already exists")]
    DuplicateIdentifier(OrderId),

    #[error("order {0} not found")]
    NotFound(OrderId),

    /// A compare-and-set lost: the record's status was not the expected one.
    /// Carries the settled status so the caller can report it.
    #[error("order {id} is {actual}, expected {expected}")]
    StatusConflict {
        id: OrderId,
        expected: OrderStatus,
        actual: OrderStatus,
    },

    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Failures of the downstream execution venue.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The venue accepts one order at a time; another call was in flight.
    #[error("execution venue busy: another order is in flight")]
    Busy,

    #[error("execution venue rejected the order: {0}")]
    Rejected(String),

    #[error("execution venue timed out")]
    TimedOut,
}

/// Errors surfaced by the lifecycle coordinator.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("unknown fund: {0}")]
    InvalidFund(String),

    #[error("invalid transaction type: {0}")]
    InvalidTransactionType(String),

    #[error("quantity must be a positive number, got {0}")]
    InvalidQuantity(rust_decimal::Decimal),

    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Lifecycle guard violation: the order is not in the required source
    /// state for the requested transition.
    #[error("order {id} cannot transition: status is {actual}")]
    InvalidTransition { id: OrderId, actual: OrderStatus },

    /// The downstream venue failed or timed out. The order was already
    /// parked `Failed` in the store before this propagated.
    #[error("downstream execution unavailable: {0}")]
    DownstreamUnavailable(#[source] ExecutionError),

    #[error("store failure: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for OrderError {
    /// Lookup misses pass through as `NotFound`; status conflicts become
    /// `InvalidTransition` reporting the settled state. Everything else is
    /// a store fault.
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => OrderError::NotFound(id),
            StoreError::StatusConflict { id, actual, .. } => {
                OrderError::InvalidTransition { id, actual }
            }
            other => OrderError::Store(other),
        }
    }
}
