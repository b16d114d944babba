//! Core types for the order-entry service.
//!
//! All identifiers are newtype wrappers. [`Order`] is the sole persisted
//! entity; [`Fund`], [`TransactionType`], and [`OrderStatus`] define the
//! tradable universe and the lifecycle states.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Fixed unit price used to value orders at creation time.
pub const UNIT_PRICE: u64 = 100;

/// Unique order identifier, assigned at creation and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub u64);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tradable fund. The set is fixed; unknown names are rejected at intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Fund {
    FundA,
    FundB,
    FundC,
}

impl Fund {
    /// All tradable funds, in listing order.
    pub const ALL: [Fund; 3] = [Fund::FundA, Fund::FundB, Fund::FundC];

    /// Exact-match parse; anything else is an unknown fund.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "FundA" => Some(Fund::FundA),
            "FundB" => Some(Fund::FundB),
            "FundC" => Some(Fund::FundC),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Fund::FundA => "FundA",
            Fund::FundB => "FundB",
            Fund::FundC => "FundC",
        }
    }
}

impl std::fmt::Display for Fund {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buy or sell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    /// Exact-match parse; anything else is invalid.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Buy" => Some(TransactionType::Buy),
            "Sell" => Some(TransactionType::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "Buy",
            TransactionType::Sell => "Sell",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status.
///
/// `Executed` is the transient signal from the downstream venue; durable
/// records only ever rest in `Submitted`, `Cancelled`, `Completed`, or
/// `Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrderStatus {
    Submitted,
    Cancelled,
    Executed,
    Completed,
    Failed,
}

impl OrderStatus {
    /// Cancelled, Completed, and Failed admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Cancelled | OrderStatus::Completed | OrderStatus::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Submitted => "Submitted",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Executed => "Executed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single buy/sell request against a fund.
///
/// `order_value` is fixed at creation as `quantity × UNIT_PRICE` and never
/// recomputed. `status` is the only mutable field; everything else is
/// immutable once persisted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub fund_name: Fund,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub order_value: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Builds a new order in `Submitted` state, valuing it at the fixed
    /// unit price. Quantity validation happens before this is called.
    pub fn new(id: OrderId, fund_name: Fund, transaction_type: TransactionType, quantity: Decimal) -> Self {
        Self {
            id,
            fund_name,
            transaction_type,
            quantity,
            order_value: quantity * Decimal::from(UNIT_PRICE),
            status: OrderStatus::Submitted,
            created_at: Utc::now(),
        }
    }
}
