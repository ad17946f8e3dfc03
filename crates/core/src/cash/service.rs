//! Cash session reconciliation service.

use std::collections::BTreeMap;

use punto_shared::types::{CashSessionId, MAX_AMOUNT, round_money};
use rust_decimal::Decimal;

use super::error::CashError;
use super::types::{
    AddCashMovementInput, CashMovementRecord, CashMovementType, CashSessionStatus,
    CloseSessionInput, ClosingResult, DenominationCount, PaymentMethodTotals, SessionSummary,
    ValidatedCashMovement,
};

/// Cash session service.
///
/// Pure business logic; the repository loads the session and its movements
/// and persists whatever this service returns.
pub struct CashService;

impl CashService {
    /// Validates the float a session is opened with and who opens it.
    ///
    /// # Errors
    ///
    /// Returns `NegativeOpeningAmount` for negative amounts, `AmountTooLarge`
    /// beyond the storable maximum and `MissingOperator` when `opened_by` is
    /// blank.
    pub fn validate_opening(
        amount: Decimal,
        opened_by: &str,
    ) -> Result<(Decimal, String), CashError> {
        let amount = round_money(amount);
        if amount < Decimal::ZERO {
            return Err(CashError::NegativeOpeningAmount);
        }
        if amount > MAX_AMOUNT {
            return Err(CashError::AmountTooLarge);
        }
        let opened_by = opened_by.trim();
        if opened_by.is_empty() {
            return Err(CashError::MissingOperator);
        }
        Ok((amount, opened_by.to_string()))
    }

    /// Validates a movement for the given session.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotOpen` when the session is closed, or a validation
    /// error for bad amounts or an empty concept.
    pub fn validate_movement(
        session_id: CashSessionId,
        status: CashSessionStatus,
        input: &AddCashMovementInput,
    ) -> Result<ValidatedCashMovement, CashError> {
        if !status.accepts_movements() {
            return Err(CashError::SessionNotOpen(session_id));
        }

        let amount = round_money(input.amount);
        if amount.is_zero() {
            return Err(CashError::ZeroAmount);
        }
        if amount.is_sign_negative() {
            return Err(CashError::NegativeAmount);
        }
        if amount > MAX_AMOUNT {
            return Err(CashError::AmountTooLarge);
        }

        let concept = input.concept.trim();
        if concept.is_empty() {
            return Err(CashError::EmptyConcept);
        }

        Ok(ValidatedCashMovement {
            movement_type: input.movement_type,
            payment_method: input.payment_method,
            amount,
            concept: concept.to_string(),
        })
    }

    /// Aggregates a session's movements by payment method.
    ///
    /// Only cash movements affect the expected drawer amount; the other
    /// methods are reported in the breakdown.
    #[must_use]
    pub fn summarize(opening_amount: Decimal, movements: &[CashMovementRecord]) -> SessionSummary {
        let mut by_method: BTreeMap<_, PaymentMethodTotals> = BTreeMap::new();

        for m in movements {
            let totals = by_method
                .entry(m.payment_method)
                .or_insert_with(|| PaymentMethodTotals {
                    payment_method: m.payment_method,
                    income: Decimal::ZERO,
                    expense: Decimal::ZERO,
                    net: Decimal::ZERO,
                    count: 0,
                });
            match m.movement_type {
                CashMovementType::Income => totals.income += m.amount,
                CashMovementType::Expense => totals.expense += m.amount,
            }
            totals.net = totals.income - totals.expense;
            totals.count += 1;
        }

        let (system_sales_total, system_expenses_total) = by_method
            .values()
            .filter(|t| t.payment_method.is_cash())
            .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), t| {
                (inc + t.income, exp + t.expense)
            });

        SessionSummary {
            opening_amount,
            breakdown: by_method.into_values().collect(),
            system_sales_total,
            system_expenses_total,
            expected_cash: opening_amount + system_sales_total - system_expenses_total,
        }
    }

    /// Merges count lines by denomination and returns them with the total.
    ///
    /// Lines are returned largest denomination first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDenomination` for zero or negative denominations and
    /// `CountOverflow` when a merged quantity or the total cannot be stored.
    pub fn count_cash(
        counts: &[DenominationCount],
    ) -> Result<(Vec<DenominationCount>, Decimal), CashError> {
        let mut merged: BTreeMap<Decimal, u32> = BTreeMap::new();
        for c in counts {
            if c.denomination <= Decimal::ZERO {
                return Err(CashError::InvalidDenomination(c.denomination));
            }
            let quantity = merged.entry(c.denomination.normalize()).or_default();
            *quantity = quantity
                .checked_add(c.quantity)
                .ok_or(CashError::CountOverflow)?;
        }

        let lines: Vec<DenominationCount> = merged
            .into_iter()
            .rev()
            .map(|(denomination, quantity)| DenominationCount {
                denomination,
                quantity,
            })
            .collect();
        let total = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| {
                l.subtotal()
                    .and_then(|s| acc.checked_add(s))
                    .filter(|t| *t <= MAX_AMOUNT)
            })
            .ok_or(CashError::CountOverflow)?;

        Ok((lines, total))
    }

    /// Reconciles a session against its physical count.
    ///
    /// `difference = counted − (opening + system_sales − system_expenses)`.
    ///
    /// # Errors
    ///
    /// Returns `SessionAlreadyClosed` if the session is closed, or a
    /// validation error for bad counts.
    pub fn close(
        session_id: CashSessionId,
        status: CashSessionStatus,
        opening_amount: Decimal,
        movements: &[CashMovementRecord],
        input: &CloseSessionInput,
    ) -> Result<ClosingResult, CashError> {
        if status == CashSessionStatus::Closed {
            return Err(CashError::SessionAlreadyClosed(session_id));
        }

        let counted_by = input.counted_by.trim();
        if counted_by.is_empty() {
            return Err(CashError::MissingCounter);
        }

        let (counts, counted_cash) = Self::count_cash(&input.counts)?;
        let summary = Self::summarize(opening_amount, movements);
        let difference = counted_cash - summary.expected_cash;

        Ok(ClosingResult {
            summary,
            counts,
            counted_cash,
            difference,
            counted_by: counted_by.to_string(),
            notes: input
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cash::types::PaymentMethod;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn record(
        movement_type: CashMovementType,
        payment_method: PaymentMethod,
        amount: Decimal,
    ) -> CashMovementRecord {
        CashMovementRecord {
            movement_type,
            payment_method,
            amount,
        }
    }

    fn count(denomination: Decimal, quantity: u32) -> DenominationCount {
        DenominationCount {
            denomination,
            quantity,
        }
    }

    fn close_input(counts: Vec<DenominationCount>) -> CloseSessionInput {
        CloseSessionInput {
            counts,
            counted_by: "Marta".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_reference_example_reconciles_to_zero() {
        // opening 1000, one cash sale of 500, one cash expense of 100, count 1400
        let movements = vec![
            record(CashMovementType::Income, PaymentMethod::Cash, dec!(500)),
            record(CashMovementType::Expense, PaymentMethod::Cash, dec!(100)),
        ];
        let input = close_input(vec![count(dec!(1000), 1), count(dec!(200), 2)]);

        let result = CashService::close(
            CashSessionId::new(1),
            CashSessionStatus::Open,
            dec!(1000),
            &movements,
            &input,
        )
        .unwrap();

        assert_eq!(result.counted_cash, dec!(1400));
        assert_eq!(result.summary.system_sales_total, dec!(500));
        assert_eq!(result.summary.system_expenses_total, dec!(100));
        assert_eq!(result.summary.expected_cash, dec!(1400));
        assert_eq!(result.difference, Decimal::ZERO);
    }

    #[test]
    fn test_no_movements_correct_count_is_zero_difference() {
        let result = CashService::close(
            CashSessionId::new(1),
            CashSessionStatus::Open,
            dec!(250),
            &[],
            &close_input(vec![count(dec!(100), 2), count(dec!(50), 1)]),
        )
        .unwrap();
        assert_eq!(result.difference, Decimal::ZERO);
        assert!(result.summary.breakdown.is_empty());
    }

    #[test]
    fn test_shortage_is_negative() {
        let result = CashService::close(
            CashSessionId::new(1),
            CashSessionStatus::Open,
            dec!(100),
            &[record(CashMovementType::Income, PaymentMethod::Cash, dec!(80))],
            &close_input(vec![count(dec!(50), 3)]),
        )
        .unwrap();
        assert_eq!(result.difference, dec!(-30));
    }

    #[test]
    fn test_non_cash_methods_do_not_change_expected_cash() {
        let movements = vec![
            record(CashMovementType::Income, PaymentMethod::Cash, dec!(40)),
            record(CashMovementType::Income, PaymentMethod::Card, dec!(300)),
            record(CashMovementType::Income, PaymentMethod::Transfer, dec!(120)),
            record(CashMovementType::Income, PaymentMethod::Card, dec!(60)),
        ];
        let summary = CashService::summarize(dec!(100), &movements);

        assert_eq!(summary.expected_cash, dec!(140));
        assert_eq!(summary.breakdown.len(), 3);
        assert_eq!(summary.breakdown[0].payment_method, PaymentMethod::Cash);
        assert_eq!(summary.breakdown[1].payment_method, PaymentMethod::Card);
        assert_eq!(summary.breakdown[1].income, dec!(360));
        assert_eq!(summary.breakdown[1].count, 2);
    }

    #[test]
    fn test_closed_session_rejects_movement_and_close() {
        let id = CashSessionId::new(8);
        let input = AddCashMovementInput {
            movement_type: CashMovementType::Income,
            payment_method: PaymentMethod::Cash,
            amount: dec!(10),
            concept: "venta".to_string(),
        };
        assert!(matches!(
            CashService::validate_movement(id, CashSessionStatus::Closed, &input),
            Err(CashError::SessionNotOpen(_))
        ));
        assert!(matches!(
            CashService::close(id, CashSessionStatus::Closed, dec!(0), &[], &close_input(vec![])),
            Err(CashError::SessionAlreadyClosed(_))
        ));
    }

    #[test]
    fn test_movement_validation() {
        let id = CashSessionId::new(1);
        let mut input = AddCashMovementInput {
            movement_type: CashMovementType::Expense,
            payment_method: PaymentMethod::Cash,
            amount: dec!(0),
            concept: "gas".to_string(),
        };
        assert!(matches!(
            CashService::validate_movement(id, CashSessionStatus::Open, &input),
            Err(CashError::ZeroAmount)
        ));
        input.amount = dec!(-1);
        assert!(matches!(
            CashService::validate_movement(id, CashSessionStatus::Open, &input),
            Err(CashError::NegativeAmount)
        ));
        input.amount = dec!(12.345);
        input.concept = "  ".to_string();
        assert!(matches!(
            CashService::validate_movement(id, CashSessionStatus::Open, &input),
            Err(CashError::EmptyConcept)
        ));
        input.concept = " gas ".to_string();
        let ok = CashService::validate_movement(id, CashSessionStatus::Open, &input).unwrap();
        assert_eq!(ok.amount, dec!(12.35));
        assert_eq!(ok.concept, "gas");
    }

    #[test]
    fn test_count_merges_duplicate_denominations() {
        let (lines, total) = CashService::count_cash(&[
            count(dec!(20), 3),
            count(dec!(100), 1),
            count(dec!(20.00), 2),
            count(dec!(0.50), 4),
        ])
        .unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].denomination, dec!(100));
        assert_eq!(lines[1].quantity, 5);
        assert_eq!(total, dec!(202));
    }

    #[test]
    fn test_count_rejects_non_positive_denomination() {
        assert!(matches!(
            CashService::count_cash(&[count(dec!(0), 1)]),
            Err(CashError::InvalidDenomination(_))
        ));
    }

    #[rstest]
    #[case::merged_quantity_overflows(vec![count(dec!(1), u32::MAX), count(dec!(1.00), 1)])]
    #[case::subtotal_overflows(vec![count(Decimal::MAX, 2)])]
    #[case::total_beyond_column(vec![count(dec!(1_000_000_000), 1_000)])]
    #[case::sum_beyond_column(vec![count(dec!(500_000_000_000), 1), count(dec!(600e9), 1)])]
    fn test_oversized_counts_rejected(#[case] counts: Vec<DenominationCount>) {
        let err = CashService::count_cash(&counts).unwrap_err();
        assert!(matches!(err, CashError::CountOverflow));
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_large_count_within_column_accepted() {
        let (_, total) = CashService::count_cash(&[count(dec!(0.01), u32::MAX)]).unwrap();
        assert_eq!(total, dec!(42_949_672.95));
    }

    #[rstest]
    #[case::opening(Decimal::MAX)]
    #[case::opening_just_above_column(dec!(1_000_000_000_000))]
    fn test_oversized_opening_rejected(#[case] amount: Decimal) {
        assert!(matches!(
            CashService::validate_opening(amount, "Marta"),
            Err(CashError::AmountTooLarge)
        ));
    }

    #[rstest]
    #[case(Decimal::MAX)]
    #[case(dec!(999_999_999_999.995))]
    fn test_oversized_movement_rejected(#[case] amount: Decimal) {
        let input = AddCashMovementInput {
            movement_type: CashMovementType::Income,
            payment_method: PaymentMethod::Card,
            amount,
            concept: "venta".to_string(),
        };
        let err =
            CashService::validate_movement(CashSessionId::new(1), CashSessionStatus::Open, &input)
                .unwrap_err();
        assert!(matches!(err, CashError::AmountTooLarge));
        assert_eq!(err.error_code(), "AMOUNT_TOO_LARGE");
    }

    #[test]
    fn test_opening_validation() {
        assert!(matches!(
            CashService::validate_opening(dec!(-1), "Marta"),
            Err(CashError::NegativeOpeningAmount)
        ));
        assert!(matches!(
            CashService::validate_opening(dec!(10), "  "),
            Err(CashError::MissingOperator)
        ));
        assert_eq!(CashService::validate_opening(dec!(0), "Marta").unwrap().0, dec!(0));
        let (amount, who) = CashService::validate_opening(dec!(500.129), " Marta ").unwrap();
        assert_eq!(amount, dec!(500.13));
        assert_eq!(who, "Marta");
    }

    #[test]
    fn test_missing_counter_rejected() {
        let mut input = close_input(vec![]);
        input.counted_by = " ".to_string();
        let result = CashService::close(
            CashSessionId::new(1),
            CashSessionStatus::Open,
            dec!(0),
            &[],
            &input,
        );
        assert!(matches!(result, Err(CashError::MissingCounter)));
    }

    fn movement_strategy() -> impl Strategy<Value = CashMovementRecord> {
        (
            prop_oneof![Just(CashMovementType::Income), Just(CashMovementType::Expense)],
            prop::sample::select(PaymentMethod::ALL.to_vec()),
            (1i64..500_000i64).prop_map(|c| Decimal::new(c, 2)),
        )
            .prop_map(|(movement_type, payment_method, amount)| CashMovementRecord {
                movement_type,
                payment_method,
                amount,
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// difference = counted − (opening + sales − expenses) for any session.
        #[test]
        fn prop_difference_formula(
            opening in (0i64..1_000_000i64).prop_map(|c| Decimal::new(c, 2)),
            movements in prop::collection::vec(movement_strategy(), 0..30),
            coins in prop::collection::vec((1u32..500u32, 0u32..50u32), 0..8),
        ) {
            let counts: Vec<DenominationCount> = coins
                .iter()
                .map(|(d, q)| DenominationCount {
                    denomination: Decimal::new(i64::from(*d), 1),
                    quantity: *q,
                })
                .collect();
            let counted: Decimal = counts.iter().filter_map(DenominationCount::subtotal).sum();

            let result = CashService::close(
                CashSessionId::new(1),
                CashSessionStatus::Open,
                opening,
                &movements,
                &close_input(counts),
            )
            .unwrap();

            prop_assert_eq!(result.counted_cash, counted);
            let summary = &result.summary;
            let expected = opening + summary.system_sales_total - summary.system_expenses_total;
            prop_assert_eq!(result.difference, counted - expected);
        }

        /// Shuffling movements does not change the summary.
        #[test]
        fn prop_summary_order_independent(
            movements in prop::collection::vec(movement_strategy(), 0..30),
        ) {
            let mut reversed = movements.clone();
            reversed.reverse();
            prop_assert_eq!(
                CashService::summarize(dec!(10), &movements),
                CashService::summarize(dec!(10), &reversed)
            );
        }
    }
}
