//! Stock movement validation.

use punto_shared::types::MAX_QUANTITY;
use rust_decimal::Decimal;

use super::error::InventoryError;
use super::kardex::{MAX_UNIT_COST, StockPosition};
use super::types::{RecordStockMovementInput, ValidatedStockMovement};

/// Inventory service.
pub struct InventoryService;

impl InventoryService {
    /// Validates a stock movement against the product's current position.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad quantities or costs, and
    /// `InsufficientStock` when an outbound movement exceeds stock on hand.
    /// A cost sent with a kind that does not accept one is dropped.
    pub fn validate_movement(
        input: RecordStockMovementInput,
        current: StockPosition,
    ) -> Result<ValidatedStockMovement, InventoryError> {
        if input.quantity <= Decimal::ZERO {
            return Err(InventoryError::NonPositiveQuantity);
        }
        if input.quantity > MAX_QUANTITY {
            return Err(InventoryError::ValueTooLarge);
        }
        match input.unit_cost {
            None if input.kind.requires_cost() => return Err(InventoryError::MissingUnitCost),
            Some(cost) if cost < Decimal::ZERO => return Err(InventoryError::NegativeUnitCost),
            Some(cost) if cost > MAX_UNIT_COST => return Err(InventoryError::ValueTooLarge),
            _ => {}
        }
        let unit_cost = input.unit_cost.filter(|_| input.kind.accepts_cost());

        let mut position = current;
        position.apply(input.product_id, input.kind, input.quantity, unit_cost)?;

        Ok(ValidatedStockMovement {
            product_id: input.product_id,
            kind: input.kind,
            quantity: input.quantity,
            unit_cost,
            reference: input
                .reference
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            balance_after: position.quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::StockMovementKind;
    use punto_shared::types::ProductId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn input(
        kind: StockMovementKind,
        quantity: Decimal,
        unit_cost: Option<Decimal>,
    ) -> RecordStockMovementInput {
        RecordStockMovementInput {
            product_id: ProductId::new(7),
            kind,
            quantity,
            unit_cost,
            reference: Some("  FAC-001 ".to_string()),
        }
    }

    fn on_hand(quantity: Decimal) -> StockPosition {
        StockPosition {
            quantity,
            average_cost: dec!(2),
            value: quantity * dec!(2),
        }
    }

    #[test]
    fn test_purchase_receipt() {
        let v = InventoryService::validate_movement(
            input(StockMovementKind::PurchaseReceipt, dec!(5), Some(dec!(3))),
            on_hand(dec!(1)),
        )
        .unwrap();
        assert_eq!(v.balance_after, dec!(6));
        assert_eq!(v.reference.as_deref(), Some("FAC-001"));
    }

    #[rstest]
    #[case(StockMovementKind::PurchaseReceipt, dec!(0), Some(dec!(1)), "NON_POSITIVE_QUANTITY")]
    #[case(StockMovementKind::PurchaseReceipt, dec!(1), None, "MISSING_UNIT_COST")]
    #[case(StockMovementKind::AdjustmentIn, dec!(1), Some(dec!(-1)), "NEGATIVE_UNIT_COST")]
    #[case(StockMovementKind::Sale, dec!(3.5), None, "INSUFFICIENT_STOCK")]
    #[case(StockMovementKind::AdjustmentOut, dec!(4), None, "INSUFFICIENT_STOCK")]
    #[case(StockMovementKind::PurchaseReceipt, Decimal::MAX, Some(dec!(1)), "VALUE_TOO_LARGE")]
    #[case(StockMovementKind::PurchaseReceipt, dec!(1), Some(Decimal::MAX), "VALUE_TOO_LARGE")]
    #[case(StockMovementKind::Sale, dec!(100_000_000_000), None, "VALUE_TOO_LARGE")]
    #[case(StockMovementKind::AdjustmentIn, dec!(1), Some(dec!(10_000_000_000)), "VALUE_TOO_LARGE")]
    fn test_rejections(
        #[case] kind: StockMovementKind,
        #[case] quantity: Decimal,
        #[case] unit_cost: Option<Decimal>,
        #[case] code: &str,
    ) {
        let err =
            InventoryService::validate_movement(input(kind, quantity, unit_cost), on_hand(dec!(3)))
                .unwrap_err();
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_largest_storable_receipt_accepted() {
        let v = InventoryService::validate_movement(
            input(StockMovementKind::PurchaseReceipt, MAX_QUANTITY, Some(MAX_UNIT_COST)),
            StockPosition::default(),
        )
        .unwrap();
        assert_eq!(v.balance_after, MAX_QUANTITY);
    }

    #[test]
    fn test_sale_return_drops_supplied_cost() {
        let v = InventoryService::validate_movement(
            input(StockMovementKind::SaleReturn, dec!(2), Some(dec!(8))),
            on_hand(dec!(3)),
        )
        .unwrap();
        assert_eq!(v.unit_cost, None);
        assert_eq!(v.balance_after, dec!(5));
    }

    #[test]
    fn test_selling_exact_stock_is_allowed() {
        let v = InventoryService::validate_movement(
            input(StockMovementKind::Sale, dec!(3), None),
            on_hand(dec!(3)),
        )
        .unwrap();
        assert_eq!(v.balance_after, Decimal::ZERO);
        assert_eq!(v.unit_cost, None);
    }
}
