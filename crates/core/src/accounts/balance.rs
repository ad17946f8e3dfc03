//! Account balance calculations.
//!
//! The balance is never stored: it is re-derived from the movement rows on
//! every read, `balance = Σcharges − Σpayments`.

use chrono::{DateTime, Utc};
use punto_shared::types::ClientId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AccountMovement, MovementType};

/// Account balance folded from a client's movements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The client.
    pub client_id: ClientId,
    /// Sum of charges.
    pub total_charges: Decimal,
    /// Sum of payments.
    pub total_payments: Decimal,
    /// Net amount owed (negative means credit in favour of the client).
    pub balance: Decimal,
    /// Number of movements folded.
    pub movement_count: u64,
}

impl AccountBalance {
    /// Creates an empty balance.
    #[must_use]
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            total_charges: Decimal::ZERO,
            total_payments: Decimal::ZERO,
            balance: Decimal::ZERO,
            movement_count: 0,
        }
    }

    /// Folds a sequence of movements into a balance.
    #[must_use]
    pub fn from_movements<'a, I>(client_id: ClientId, movements: I) -> Self
    where
        I: IntoIterator<Item = &'a AccountMovement>,
    {
        movements
            .into_iter()
            .fold(Self::new(client_id), |mut acc, m| {
                acc.apply(m.movement_type, m.amount);
                acc
            })
    }

    /// Applies a single movement.
    pub fn apply(&mut self, movement_type: MovementType, amount: Decimal) {
        match movement_type {
            MovementType::Charge => self.total_charges += amount,
            MovementType::Payment => self.total_payments += amount,
        }
        self.balance = self.total_charges - self.total_payments;
        self.movement_count += 1;
    }
}

/// Running balance information for one statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Position in the statement (1-based, monotonically increasing).
    pub sequence: u64,
    /// Balance before this movement.
    pub previous_balance: Decimal,
    /// Balance after this movement.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Running balance for the first line, starting from `opening`.
    #[must_use]
    pub fn first_entry(opening: Decimal, balance_change: Decimal) -> Self {
        Self {
            sequence: 1,
            previous_balance: opening,
            current_balance: opening + balance_change,
        }
    }

    /// Running balance following `previous`.
    ///
    /// `previous_balance[N] = current_balance[N-1]`.
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Self {
        Self {
            sequence: previous.sequence + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance + balance_change,
        }
    }
}

/// A movement with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// The movement.
    pub movement: AccountMovement,
    /// Running balance after applying it.
    pub running: RunningBalance,
}

/// A client statement over an optional window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// The client.
    pub client_id: ClientId,
    /// Balance carried from movements before the window.
    pub opening_balance: Decimal,
    /// Movements inside the window, in creation order.
    pub lines: Vec<StatementLine>,
    /// Charges inside the window.
    pub total_charges: Decimal,
    /// Payments inside the window.
    pub total_payments: Decimal,
    /// Balance after the last line.
    pub closing_balance: Decimal,
}

impl Statement {
    /// Builds a statement from all movements up to the window end.
    ///
    /// Movements are ordered by `(created_at, id)`. Those created before
    /// `window_start` fold into `opening_balance`.
    #[must_use]
    pub fn build(
        client_id: ClientId,
        mut movements: Vec<AccountMovement>,
        window_start: Option<DateTime<Utc>>,
    ) -> Self {
        movements.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let (before, inside): (Vec<_>, Vec<_>) = movements
            .into_iter()
            .partition(|m| window_start.is_some_and(|start| m.created_at < start));

        let opening_balance = AccountBalance::from_movements(client_id, &before).balance;
        let window = AccountBalance::from_movements(client_id, &inside);

        let mut lines = Vec::with_capacity(inside.len());
        let mut running: Option<RunningBalance> = None;
        for movement in inside {
            let change = movement.movement_type.signed(movement.amount);
            let next = match &running {
                None => RunningBalance::first_entry(opening_balance, change),
                Some(prev) => RunningBalance::next_entry(prev, change),
            };
            running = Some(next);
            lines.push(StatementLine {
                movement,
                running: next,
            });
        }

        Self {
            client_id,
            opening_balance,
            closing_balance: running.map_or(opening_balance, |r| r.current_balance),
            total_charges: window.total_charges,
            total_payments: window.total_payments,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use punto_shared::types::AccountMovementId;
    use rust_decimal_macros::dec;

    fn movement(
        id: i32,
        movement_type: MovementType,
        amount: Decimal,
        minute: u32,
    ) -> AccountMovement {
        AccountMovement {
            id: AccountMovementId::new(id),
            client_id: ClientId::new(1),
            movement_type,
            amount,
            description: format!("movement {id}"),
            created_at: Utc.with_ymd_and_hms(2026, 5, 4, 10, minute, 0).unwrap(),
        }
    }

    // ========================================================================
    // Balance fold properties
    // ========================================================================

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn movements_strategy() -> impl Strategy<Value = Vec<(bool, Decimal)>> {
        prop::collection::vec((any::<bool>(), amount_strategy()), 0..40)
    }

    fn to_movements(raw: &[(bool, Decimal)]) -> Vec<AccountMovement> {
        raw.iter()
            .enumerate()
            .map(|(i, (is_charge, amount))| {
                let kind = if *is_charge { MovementType::Charge } else { MovementType::Payment };
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let id = i as i32 + 1;
                #[allow(clippy::cast_possible_truncation)]
                let minute = (i % 60) as u32;
                movement(id, kind, *amount, minute)
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Balance equals charges minus payments for any sequence.
        #[test]
        fn prop_balance_is_charges_minus_payments(raw in movements_strategy()) {
            let movements = to_movements(&raw);
            let balance = AccountBalance::from_movements(ClientId::new(1), &movements);

            let charges: Decimal = raw.iter().filter(|(c, _)| *c).map(|(_, a)| *a).sum();
            let payments: Decimal = raw.iter().filter(|(c, _)| !*c).map(|(_, a)| *a).sum();

            prop_assert_eq!(balance.balance, charges - payments);
            prop_assert_eq!(balance.movement_count as usize, raw.len());
        }

        /// Folding in batches gives the same balance as folding all at once.
        #[test]
        fn prop_balance_independent_of_batching(raw in movements_strategy(), split in 0usize..40) {
            let movements = to_movements(&raw);
            let split = split.min(movements.len());
            let (first, second) = movements.split_at(split);

            let mut batched = AccountBalance::from_movements(ClientId::new(1), first);
            for m in second {
                batched.apply(m.movement_type, m.amount);
            }
            let whole = AccountBalance::from_movements(ClientId::new(1), &movements);

            prop_assert_eq!(batched.balance, whole.balance);
        }

        /// The statement's closing balance equals the folded balance.
        #[test]
        fn prop_statement_closing_matches_balance(raw in movements_strategy()) {
            let movements = to_movements(&raw);
            let balance = AccountBalance::from_movements(ClientId::new(1), &movements);
            let statement = Statement::build(ClientId::new(1), movements, None);

            prop_assert_eq!(statement.closing_balance, balance.balance);
            for pair in statement.lines.windows(2) {
                prop_assert_eq!(pair[1].running.previous_balance, pair[0].running.current_balance);
                prop_assert_eq!(pair[1].running.sequence, pair[0].running.sequence + 1);
            }
        }
    }

    // ========================================================================
    // Unit tests for specific examples
    // ========================================================================

    #[test]
    fn test_empty_balance_is_zero() {
        let balance = AccountBalance::from_movements(ClientId::new(9), &[]);
        assert_eq!(balance.balance, Decimal::ZERO);
        assert_eq!(balance.movement_count, 0);
    }

    #[test]
    fn test_overpayment_gives_credit_balance() {
        let movements = vec![
            movement(1, MovementType::Charge, dec!(100), 0),
            movement(2, MovementType::Payment, dec!(150), 1),
        ];
        let balance = AccountBalance::from_movements(ClientId::new(1), &movements);
        assert_eq!(balance.balance, dec!(-50));
    }

    #[test]
    fn test_statement_orders_by_creation_then_id() {
        let movements = vec![
            movement(3, MovementType::Payment, dec!(30), 5),
            movement(2, MovementType::Charge, dec!(50), 2),
            movement(1, MovementType::Charge, dec!(100), 2),
        ];
        let statement = Statement::build(ClientId::new(1), movements, None);

        let ids: Vec<i32> = statement.lines.iter().map(|l| l.movement.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(statement.lines[0].running.current_balance, dec!(100));
        assert_eq!(statement.lines[1].running.current_balance, dec!(150));
        assert_eq!(statement.lines[2].running.current_balance, dec!(120));
        assert_eq!(statement.closing_balance, dec!(120));
    }

    #[test]
    fn test_statement_window_carries_opening_balance() {
        let movements = vec![
            movement(1, MovementType::Charge, dec!(100), 0),
            movement(2, MovementType::Payment, dec!(40), 10),
            movement(3, MovementType::Charge, dec!(25), 20),
        ];
        let start = Utc.with_ymd_and_hms(2026, 5, 4, 10, 5, 0).unwrap();
        let statement = Statement::build(ClientId::new(1), movements, Some(start));

        assert_eq!(statement.opening_balance, dec!(100));
        assert_eq!(statement.lines.len(), 2);
        assert_eq!(statement.lines[0].running.previous_balance, dec!(100));
        assert_eq!(statement.total_charges, dec!(25));
        assert_eq!(statement.total_payments, dec!(40));
        assert_eq!(statement.closing_balance, dec!(85));
    }

    #[test]
    fn test_empty_window_closes_at_opening() {
        let movements = vec![movement(1, MovementType::Charge, dec!(70), 0)];
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let statement = Statement::build(ClientId::new(1), movements, Some(start));
        assert!(statement.lines.is_empty());
        assert_eq!(statement.closing_balance, dec!(70));
    }
}
