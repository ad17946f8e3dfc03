//! Inventory error types.

use punto_shared::types::ProductId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while moving stock.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Quantity must be positive.
    #[error("Stock movement quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Purchase receipts need a cost.
    #[error("Unit cost is required for purchase receipts")]
    MissingUnitCost,

    /// Cost cannot be negative.
    #[error("Unit cost cannot be negative")]
    NegativeUnitCost,

    /// Quantity or cost beyond the storable range.
    #[error("Stock movement quantity or cost exceeds the supported maximum")]
    ValueTooLarge,

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Outbound movement larger than stock on hand.
    #[error(
        "Insufficient stock for product {product_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        /// The product.
        product_id: ProductId,
        /// Stock on hand.
        available: Decimal,
        /// Quantity requested.
        requested: Decimal,
    },
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::MissingUnitCost => "MISSING_UNIT_COST",
            Self::NegativeUnitCost => "NEGATIVE_UNIT_COST",
            Self::ValueTooLarge => "VALUE_TOO_LARGE",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveQuantity
            | Self::MissingUnitCost
            | Self::NegativeUnitCost
            | Self::ValueTooLarge => 400,
            Self::ProductNotFound(_) => 404,
            Self::InsufficientStock { .. } => 422,
        }
    }
}
