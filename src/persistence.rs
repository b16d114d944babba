//! File-backed order store: one JSON file, rewritten through on every
//! mutation. Enables recovery after restart: all order records and their
//! statuses are restored on open.

use crate::error::StoreError;
use crate::store::{sort_newest_first, OrderStore};
use crate::types::{Order, OrderId, OrderStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

/// Durable order store backed by a single JSON file.
///
/// Every mutation stages the change on a copy of the map, writes the file,
/// and only then swaps the copy in, so a failed write leaves both the file
/// and the in-memory view unchanged.
#[derive(Debug)]
pub struct FileOrderStore {
    path: std::path::PathBuf,
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl FileOrderStore {
    /// Opens the store, restoring any previously persisted records.
    /// A missing file starts the store empty.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let orders = match tokio::fs::read_to_string(&path).await {
            Ok(data) => {
                let records: Vec<Order> = serde_json::from_str(&data)?;
                records.into_iter().map(|o| (o.id, o)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            orders: RwLock::new(orders),
        })
    }

    /// Highest persisted order id, for seeding the id counter on restart.
    pub async fn max_order_id(&self) -> Option<OrderId> {
        self.orders.read().await.keys().max().copied()
    }

    async fn write_file(&self, orders: &HashMap<OrderId, Order>) -> Result<(), StoreError> {
        let mut records: Vec<&Order> = orders.values().collect();
        records.sort_by_key(|o| o.id);
        let json = serde_json::to_string_pretty(&records)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for FileOrderStore {
    async fn persist(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::DuplicateIdentifier(order.id));
        }
        let mut staged = orders.clone();
        staged.insert(order.id, order);
        self.write_file(&staged).await?;
        *orders = staged;
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Order, StoreError> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_status(&self, id: OrderId, new_status: OrderStatus) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;
        let mut staged = orders.clone();
        let order = staged.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        order.status = new_status;
        let updated = order.clone();
        self.write_file(&staged).await?;
        *orders = staged;
        Ok(updated)
    }

    async fn transition(
        &self,
        id: OrderId,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;
        let mut staged = orders.clone();
        let order = staged.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if order.status != expected {
            return Err(StoreError::StatusConflict {
                id,
                expected,
                actual: order.status,
            });
        }
        order.status = new_status;
        let updated = order.clone();
        self.write_file(&staged).await?;
        *orders = staged;
        Ok(updated)
    }

    async fn list_all(&self) -> Result<Vec<Order>, StoreError> {
        let mut all: Vec<Order> = self.orders.read().await.values().cloned().collect();
        sort_newest_first(&mut all);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Fund, TransactionType};
    use rust_decimal::Decimal;

    fn order(id: u64) -> Order {
        Order::new(OrderId(id), Fund::FundB, TransactionType::Sell, Decimal::from(5))
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");

        let store = FileOrderStore::open(&path).await.unwrap();
        store.persist(order(1)).await.unwrap();
        store.persist(order(2)).await.unwrap();
        store
            .transition(OrderId(1), OrderStatus::Submitted, OrderStatus::Cancelled)
            .await
            .unwrap();
        drop(store);

        let reopened = FileOrderStore::open(&path).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap().len(), 2);
        assert_eq!(
            reopened.get(OrderId(1)).await.unwrap().status,
            OrderStatus::Cancelled
        );
        assert_eq!(
            reopened.get(OrderId(2)).await.unwrap().status,
            OrderStatus::Submitted
        );
        assert_eq!(reopened.max_order_id().await, Some(OrderId(2)));
    }

    #[tokio::test]
    async fn duplicate_id_rejected_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");

        let store = FileOrderStore::open(&path).await.unwrap();
        store.persist(order(1)).await.unwrap();
        drop(store);

        let reopened = FileOrderStore::open(&path).await.unwrap();
        let err = reopened.persist(order(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentifier(OrderId(1))));
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.json");
        let store = FileOrderStore::open(&path).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(store.max_order_id().await, None);
    }

    #[tokio::test]
    async fn max_order_id_reflects_persisted_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        let store = FileOrderStore::open(&path).await.unwrap();
        store.persist(order(3)).await.unwrap();
        store.persist(order(7)).await.unwrap();
        assert_eq!(store.max_order_id().await, Some(OrderId(7)));
    }
}
