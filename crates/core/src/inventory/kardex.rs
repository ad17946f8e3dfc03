//! Weighted-average kardex.
//!
//! Receipts and inbound adjustments with a cost re-average the unit cost:
//! `avg = (value + qty × cost) / (balance_qty + qty)`. Everything else,
//! sale returns included, moves at the current average.

use chrono::{DateTime, Utc};
use punto_shared::types::{ProductId, StockMovementId, round_money};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::InventoryError;
use super::types::{StockMovement, StockMovementKind};

/// Decimal places kept on average unit costs.
pub const COST_SCALE: u32 = 4;

/// Largest unit cost a `NUMERIC(14, 4)` column holds: 9,999,999,999.9999.
pub const MAX_UNIT_COST: Decimal =
    Decimal::from_parts(276_447_231, 23_283, 0, false, COST_SCALE);

fn round_cost(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(COST_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Stock on hand and its valuation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockPosition {
    /// Units on hand.
    pub quantity: Decimal,
    /// Weighted-average unit cost (4 dp).
    pub average_cost: Decimal,
    /// Inventory value (2 dp).
    pub value: Decimal,
}

impl StockPosition {
    /// Applies one movement, returning the unit cost it moved at.
    ///
    /// `unit_cost` is ignored for kinds that do not accept one.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` when an outbound movement exceeds the
    /// quantity on hand.
    pub fn apply(
        &mut self,
        product_id: ProductId,
        kind: StockMovementKind,
        quantity: Decimal,
        unit_cost: Option<Decimal>,
    ) -> Result<Decimal, InventoryError> {
        if kind.is_inbound() {
            match unit_cost.filter(|_| kind.accepts_cost()) {
                Some(cost) => {
                    let new_quantity = self.quantity + quantity;
                    let new_value = round_money(self.value + quantity * cost);
                    self.average_cost = round_cost((self.value + quantity * cost) / new_quantity);
                    self.quantity = new_quantity;
                    self.value = new_value;
                    Ok(cost)
                }
                None => {
                    self.quantity += quantity;
                    self.value = round_money(self.value + quantity * self.average_cost);
                    Ok(self.average_cost)
                }
            }
        } else {
            if quantity > self.quantity {
                return Err(InventoryError::InsufficientStock {
                    product_id,
                    available: self.quantity,
                    requested: quantity,
                });
            }
            self.quantity -= quantity;
            self.value = if self.quantity.is_zero() {
                Decimal::ZERO
            } else {
                round_money(self.value - quantity * self.average_cost)
            };
            Ok(self.average_cost)
        }
    }
}

/// One kardex row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KardexLine {
    /// Source movement.
    pub movement_id: StockMovementId,
    /// When it happened.
    pub date: DateTime<Utc>,
    /// Reason.
    pub kind: StockMovementKind,
    /// Units in (zero for outbound).
    pub quantity_in: Decimal,
    /// Units out (zero for inbound).
    pub quantity_out: Decimal,
    /// Cost per unit the movement was valued at.
    pub unit_cost: Decimal,
    /// Units on hand after the movement.
    pub balance_quantity: Decimal,
    /// Average cost after the movement.
    pub average_cost: Decimal,
    /// Inventory value after the movement.
    pub balance_value: Decimal,
    /// Reference.
    pub reference: Option<String>,
}

/// Kardex of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kardex {
    /// The product.
    pub product_id: ProductId,
    /// Position before the first line.
    pub opening: StockPosition,
    /// Rows in chronological order.
    pub lines: Vec<KardexLine>,
    /// Position after the last line.
    pub closing: StockPosition,
}

impl Kardex {
    /// Builds the kardex of a product.
    ///
    /// Movements before `window_start` fold into the opening position.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientStock` if the history ever goes negative.
    pub fn build(
        product_id: ProductId,
        mut movements: Vec<StockMovement>,
        window_start: Option<DateTime<Utc>>,
    ) -> Result<Self, InventoryError> {
        movements.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut position = StockPosition::default();
        let mut opening = position;
        let mut lines = Vec::new();

        for m in movements {
            let unit_cost = position.apply(product_id, m.kind, m.quantity, m.unit_cost)?;
            if window_start.is_some_and(|start| m.created_at < start) {
                opening = position;
                continue;
            }
            let (quantity_in, quantity_out) = if m.kind.is_inbound() {
                (m.quantity, Decimal::ZERO)
            } else {
                (Decimal::ZERO, m.quantity)
            };
            lines.push(KardexLine {
                movement_id: m.id,
                date: m.created_at,
                kind: m.kind,
                quantity_in,
                quantity_out,
                unit_cost,
                balance_quantity: position.quantity,
                average_cost: position.average_cost,
                balance_value: position.value,
                reference: m.reference,
            });
        }

        Ok(Self {
            product_id,
            opening,
            lines,
            closing: position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn mv(
        id: i32,
        day: u32,
        kind: StockMovementKind,
        quantity: Decimal,
        unit_cost: Option<Decimal>,
    ) -> StockMovement {
        StockMovement {
            id: StockMovementId::new(id),
            product_id: ProductId::new(1),
            kind,
            quantity,
            unit_cost,
            reference: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_weighted_average() {
        let kardex = Kardex::build(
            ProductId::new(1),
            vec![
                mv(1, 1, StockMovementKind::PurchaseReceipt, dec!(10), Some(dec!(10))),
                mv(2, 2, StockMovementKind::PurchaseReceipt, dec!(10), Some(dec!(12))),
                mv(3, 3, StockMovementKind::Sale, dec!(5), None),
            ],
            None,
        )
        .unwrap();

        assert_eq!(kardex.lines[1].average_cost, dec!(11));
        assert_eq!(kardex.lines[1].balance_value, dec!(220));
        assert_eq!(kardex.lines[2].unit_cost, dec!(11));
        assert_eq!(kardex.lines[2].quantity_out, dec!(5));
        assert_eq!(kardex.closing.quantity, dec!(15));
        assert_eq!(kardex.closing.value, dec!(165));
    }

    #[test]
    fn test_average_cost_rounded_to_four_places() {
        let kardex = Kardex::build(
            ProductId::new(1),
            vec![
                mv(1, 1, StockMovementKind::PurchaseReceipt, dec!(3), Some(dec!(10))),
                mv(2, 2, StockMovementKind::PurchaseReceipt, dec!(3), Some(dec!(10.01))),
                mv(3, 3, StockMovementKind::PurchaseReceipt, dec!(1), Some(dec!(0))),
            ],
            None,
        )
        .unwrap();
        // 60.03 / 7 = 8.575714...
        assert_eq!(kardex.closing.average_cost, dec!(8.5757));
        assert_eq!(kardex.closing.value, dec!(60.03));
    }

    #[test]
    fn test_return_enters_at_average() {
        let kardex = Kardex::build(
            ProductId::new(1),
            vec![
                mv(1, 1, StockMovementKind::PurchaseReceipt, dec!(4), Some(dec!(2.50))),
                mv(2, 2, StockMovementKind::Sale, dec!(2), None),
                mv(3, 3, StockMovementKind::SaleReturn, dec!(1), None),
            ],
            None,
        )
        .unwrap();
        assert_eq!(kardex.lines[2].unit_cost, dec!(2.50));
        assert_eq!(kardex.closing.quantity, dec!(3));
        assert_eq!(kardex.closing.value, dec!(7.50));
    }

    #[test]
    fn test_return_ignores_supplied_cost() {
        let mut position = StockPosition {
            quantity: dec!(10),
            average_cost: dec!(2),
            value: dec!(20),
        };
        let cost = position
            .apply(ProductId::new(1), StockMovementKind::SaleReturn, dec!(10), Some(dec!(8)))
            .unwrap();
        assert_eq!(cost, dec!(2));
        assert_eq!(position.average_cost, dec!(2));
        assert_eq!(position.value, dec!(40));

        // Rows stored with a cost before it was dropped rebuild the same way.
        let kardex = Kardex::build(
            ProductId::new(1),
            vec![
                mv(1, 1, StockMovementKind::PurchaseReceipt, dec!(10), Some(dec!(2))),
                mv(2, 2, StockMovementKind::SaleReturn, dec!(10), Some(dec!(8))),
            ],
            None,
        )
        .unwrap();
        assert_eq!(kardex.lines[1].unit_cost, dec!(2));
        assert_eq!(kardex.closing.average_cost, dec!(2));
        assert_eq!(kardex.closing.value, dec!(40));
    }

    #[test]
    fn test_emptying_stock_zeroes_value() {
        let kardex = Kardex::build(
            ProductId::new(1),
            vec![
                mv(1, 1, StockMovementKind::PurchaseReceipt, dec!(3), Some(dec!(3.3333))),
                mv(2, 2, StockMovementKind::AdjustmentOut, dec!(3), None),
            ],
            None,
        )
        .unwrap();
        assert_eq!(kardex.closing.quantity, Decimal::ZERO);
        assert_eq!(kardex.closing.value, Decimal::ZERO);
    }

    #[test]
    fn test_window_folds_earlier_movements() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let kardex = Kardex::build(
            ProductId::new(1),
            vec![
                mv(2, 5, StockMovementKind::Sale, dec!(1), None),
                mv(1, 1, StockMovementKind::PurchaseReceipt, dec!(8), Some(dec!(5))),
            ],
            Some(start),
        )
        .unwrap();
        assert_eq!(kardex.opening.quantity, dec!(8));
        assert_eq!(kardex.lines.len(), 1);
        assert_eq!(kardex.lines[0].balance_quantity, dec!(7));
    }

    #[test]
    fn test_oversell_is_rejected() {
        let err = Kardex::build(
            ProductId::new(1),
            vec![
                mv(1, 1, StockMovementKind::AdjustmentIn, dec!(1), Some(dec!(1))),
                mv(2, 2, StockMovementKind::Sale, dec!(2), None),
            ],
            None,
        )
        .unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientStock { .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// On-hand quantity is Σin − Σout for any valid history.
        #[test]
        fn prop_quantity_is_net_of_movements(
            steps in prop::collection::vec((any::<bool>(), 1i64..1000i64, 1i64..10_000i64), 1..40),
        ) {
            let mut movements = Vec::new();
            let mut on_hand = Decimal::ZERO;
            for (i, (inbound, q, c)) in steps.iter().enumerate() {
                let quantity = Decimal::new(*q, 1);
                let id = i32::try_from(i).unwrap() + 1;
                let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::minutes(i64::from(id));
                let (kind, unit_cost) = if *inbound || quantity > on_hand {
                    on_hand += quantity;
                    (StockMovementKind::PurchaseReceipt, Some(Decimal::new(*c, 2)))
                } else {
                    on_hand -= quantity;
                    (StockMovementKind::Sale, None)
                };
                movements.push(StockMovement {
                    id: StockMovementId::new(id),
                    product_id: ProductId::new(1),
                    kind,
                    quantity,
                    unit_cost,
                    reference: None,
                    created_at,
                });
            }

            let kardex = Kardex::build(ProductId::new(1), movements, None).unwrap();
            prop_assert_eq!(kardex.closing.quantity, on_hand);
            prop_assert_eq!(kardex.lines.len(), steps.len());
        }
    }
}
