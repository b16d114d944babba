//! Order store contract and the in-memory implementation.
//!
//! The store owns the durable representation of every order. Mutations are
//! applied before the call returns; a failed mutation leaves the store
//! unchanged. [`OrderStore::transition`] is the atomic check-and-update the
//! coordinator uses to resolve races (see the coordinator module).

use crate::error::StoreError;
use crate::types::{Order, OrderId, OrderStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Durable keyed persistence for order records.
///
/// Implementations must support concurrent access from multiple in-flight
/// coordinator operations. Per-order atomicity is required; cross-order
/// atomicity is not.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Stores a new order. Fails with `DuplicateIdentifier` if the id is
    /// already present; never overwrites.
    async fn persist(&self, order: Order) -> Result<(), StoreError>;

    /// Point lookup by id.
    async fn get(&self, id: OrderId) -> Result<Order, StoreError>;

    /// Unconditionally sets the status field, keeping all other fields,
    /// and returns the updated record. Does not enforce the lifecycle
    /// graph; that is the coordinator's job.
    async fn update_status(&self, id: OrderId, new_status: OrderStatus) -> Result<Order, StoreError>;

    /// Compare-and-set on the status field: succeeds only if the current
    /// status equals `expected`, otherwise fails with `StatusConflict`
    /// carrying the actual status. Check and update are indivisible.
    async fn transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> Result<Order, StoreError>;

    /// All orders, newest first (`created_at` descending, ties broken by
    /// id descending). Reflects current state on every call.
    async fn list_all(&self) -> Result<Vec<Order>, StoreError>;
}

/// Sorts newest first; ties on `created_at` break by id descending so
/// listings are deterministic.
pub(crate) fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// In-memory order store backed by a `RwLock<HashMap>`. The dev and test
/// store; durability here means "visible to every subsequent call".
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders. Used by tests to assert nothing was
    /// persisted on validation failure.
    pub fn len(&self) -> usize {
        self.orders.read().expect("lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn persist(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().expect("lock");
        if orders.contains_key(&order.id) {
            return Err(StoreError::DuplicateIdentifier(order.id));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Order, StoreError> {
        self.orders
            .read()
            .expect("lock")
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_status(&self, id: OrderId, new_status: OrderStatus) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().expect("lock");
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        order.status = new_status;
        Ok(order.clone())
    }

    async fn transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().expect("lock");
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if order.status != expected {
            return Err(StoreError::StatusConflict {
                id,
                expected,
                actual: order.status,
            });
        }
        order.status = new_status;
        Ok(order.clone())
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        let mut all: Vec<Order> = self.orders.read().expect("lock").values().cloned().collect();
        sort_newest_first(&mut all);
        Ok(all)
    }
}
