//! Inventory domain types.

use chrono::{DateTime, Utc};
use punto_shared::types::{ProductId, StockMovementId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reason stock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMovementKind {
    /// Goods received from a supplier, at a known cost.
    PurchaseReceipt,
    /// Goods sold.
    Sale,
    /// Goods returned by a customer.
    SaleReturn,
    /// Manual increase (found stock, production).
    AdjustmentIn,
    /// Manual decrease (waste, breakage).
    AdjustmentOut,
}

impl StockMovementKind {
    /// Returns true if the movement adds stock.
    #[must_use]
    pub fn is_inbound(&self) -> bool {
        matches!(self, Self::PurchaseReceipt | Self::SaleReturn | Self::AdjustmentIn)
    }

    /// Returns true if the movement must carry a unit cost.
    #[must_use]
    pub fn requires_cost(&self) -> bool {
        matches!(self, Self::PurchaseReceipt)
    }

    /// Returns true if a supplied unit cost re-averages the position.
    ///
    /// Sale returns come back at the current average whatever cost is sent.
    #[must_use]
    pub fn accepts_cost(&self) -> bool {
        matches!(self, Self::PurchaseReceipt | Self::AdjustmentIn)
    }
}

impl std::fmt::Display for StockMovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PurchaseReceipt => write!(f, "PURCHASE_RECEIPT"),
            Self::Sale => write!(f, "SALE"),
            Self::SaleReturn => write!(f, "SALE_RETURN"),
            Self::AdjustmentIn => write!(f, "ADJUSTMENT_IN"),
            Self::AdjustmentOut => write!(f, "ADJUSTMENT_OUT"),
        }
    }
}

/// A stored stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Movement ID.
    pub id: StockMovementId,
    /// Product moved.
    pub product_id: ProductId,
    /// Reason.
    pub kind: StockMovementKind,
    /// Positive quantity; direction comes from `kind`.
    pub quantity: Decimal,
    /// Cost per unit for inbound movements that carry one.
    pub unit_cost: Option<Decimal>,
    /// Free-form reference (invoice number, sale id).
    pub reference: Option<String>,
    /// When the movement happened.
    pub created_at: DateTime<Utc>,
}

/// Request to record a stock movement.
#[derive(Debug, Clone)]
pub struct RecordStockMovementInput {
    /// Product moved.
    pub product_id: ProductId,
    /// Reason.
    pub kind: StockMovementKind,
    /// Positive quantity.
    pub quantity: Decimal,
    /// Unit cost, required for purchase receipts.
    pub unit_cost: Option<Decimal>,
    /// Free-form reference.
    pub reference: Option<String>,
}

/// A stock movement ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStockMovement {
    /// Product moved.
    pub product_id: ProductId,
    /// Reason.
    pub kind: StockMovementKind,
    /// Positive quantity.
    pub quantity: Decimal,
    /// Unit cost, if any.
    pub unit_cost: Option<Decimal>,
    /// Trimmed reference, `None` when blank.
    pub reference: Option<String>,
    /// Stock on hand after the movement.
    pub balance_after: Decimal,
}
