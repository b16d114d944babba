//! # Order Entry
//!
//! Order-entry API: submit, track, and cancel trade orders against a small
//! fixed set of funds, backed by a durable order store and a simulated
//! downstream ("legacy") execution venue that accepts one order at a time.
//!
//! ## Entry point
//!
//! Use [`OrderCoordinator`] as the single entry point: create with
//! [`OrderCoordinator::new`], then [`OrderCoordinator::create_order`],
//! [`OrderCoordinator::submit_for_execution`],
//! [`OrderCoordinator::cancel_order`], and [`OrderCoordinator::list_orders`].
//!
//! ## Example
//!
//! ```rust
//! use order_entry::{InMemoryOrderStore, LegacyExecutionSimulator, OrderCoordinator, OrderStatus};
//! use order_entry::audit::InMemoryAuditSink;
//! use order_entry::execution::SimulatorConfig;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let coordinator = OrderCoordinator::new(
//!     Arc::new(InMemoryOrderStore::new()),
//!     Arc::new(LegacyExecutionSimulator::new(SimulatorConfig {
//!         latency: Duration::from_millis(1),
//!         jitter: Duration::ZERO,
//!     })),
//!     Arc::new(InMemoryAuditSink::new()),
//! );
//! let order = coordinator.create_order("FundA", "Buy", Decimal::from(10)).await.unwrap();
//! assert_eq!(order.order_value, Decimal::from(1000));
//! let done = coordinator.submit_for_execution(&order).await.unwrap();
//! assert_eq!(done.status, OrderStatus::Completed);
//! # });
//! ```
//!
//! ## Lower-level API
//!
//! You can also use [`OrderStore`] and [`ExecutionVenue`] directly, or
//! implement them to swap in a different store or venue.

pub mod api;
pub mod audit;
pub mod coordinator;
pub mod error;
pub mod execution;
pub mod persistence;
pub mod store;
pub mod types;

pub use coordinator::OrderCoordinator;
pub use error::{ExecutionError, OrderError, StoreError};
pub use execution::{ExecutionReport, ExecutionVenue, LegacyExecutionSimulator};
pub use persistence::FileOrderStore;
pub use store::{InMemoryOrderStore, OrderStore};
pub use types::{Fund, Order, OrderId, OrderStatus, TransactionType, UNIT_PRICE};
