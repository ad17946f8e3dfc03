//! Receivables aging.
//!
//! Payments are applied FIFO to the oldest outstanding charges. Whatever is
//! left of each charge is bucketed by its age at the report date.

use chrono::NaiveDate;
use punto_shared::types::ClientId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AccountMovement, MovementType};

/// Outstanding amounts by age.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingBuckets {
    /// 0-30 days.
    pub current: Decimal,
    /// 31-60 days.
    pub days_31_60: Decimal,
    /// 61-90 days.
    pub days_61_90: Decimal,
    /// More than 90 days.
    pub over_90: Decimal,
}

impl AgingBuckets {
    /// Adds `amount` to the bucket for a charge `age_days` old.
    pub fn add(&mut self, age_days: i64, amount: Decimal) {
        match age_days {
            i64::MIN..=30 => self.current += amount,
            31..=60 => self.days_31_60 += amount,
            61..=90 => self.days_61_90 += amount,
            _ => self.over_90 += amount,
        }
    }

    /// Sum of all buckets.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.current + self.days_31_60 + self.days_61_90 + self.over_90
    }

    /// Adds another set of buckets into this one.
    pub fn merge(&mut self, other: &Self) {
        self.current += other.current;
        self.days_31_60 += other.days_31_60;
        self.days_61_90 += other.days_61_90;
        self.over_90 += other.over_90;
    }
}

/// Aging for a single client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAging {
    /// The client.
    pub client_id: ClientId,
    /// Outstanding amounts by age.
    pub buckets: AgingBuckets,
    /// Total outstanding; equals the balance when it is positive.
    pub total: Decimal,
    /// Date of the oldest unpaid charge.
    pub oldest_unpaid: Option<NaiveDate>,
}

/// Computes the aging of one client's receivables at `as_of`.
///
/// Movements dated after `as_of` are ignored.
#[must_use]
pub fn age_receivables(
    client_id: ClientId,
    movements: &[AccountMovement],
    as_of: NaiveDate,
) -> ClientAging {
    let mut relevant: Vec<&AccountMovement> = movements
        .iter()
        .filter(|m| m.created_at.date_naive() <= as_of)
        .collect();
    relevant.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let mut unapplied_payments: Decimal = relevant
        .iter()
        .filter(|m| m.movement_type == MovementType::Payment)
        .map(|m| m.amount)
        .sum();

    let mut buckets = AgingBuckets::default();
    let mut oldest_unpaid = None;

    for charge in relevant
        .iter()
        .filter(|m| m.movement_type == MovementType::Charge)
    {
        let applied = unapplied_payments.min(charge.amount);
        unapplied_payments -= applied;
        let remaining = charge.amount - applied;
        if remaining.is_zero() {
            continue;
        }

        let charge_date = charge.created_at.date_naive();
        let age_days = (as_of - charge_date).num_days();
        buckets.add(age_days, remaining);
        oldest_unpaid.get_or_insert(charge_date);
    }

    ClientAging {
        client_id,
        total: buckets.total(),
        buckets,
        oldest_unpaid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::AccountBalance;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use punto_shared::types::AccountMovementId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn on(
        id: i32,
        movement_type: MovementType,
        amount: Decimal,
        y: i32,
        m: u32,
        d: u32,
    ) -> AccountMovement {
        AccountMovement {
            id: AccountMovementId::new(id),
            client_id: ClientId::new(1),
            movement_type,
            amount,
            description: String::new(),
            created_at: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
    }

    #[rstest]
    #[case(0, "current")]
    #[case(30, "current")]
    #[case(31, "31-60")]
    #[case(60, "31-60")]
    #[case(61, "61-90")]
    #[case(90, "61-90")]
    #[case(91, "90+")]
    fn test_bucket_boundaries(#[case] age: i64, #[case] bucket: &str) {
        let mut buckets = AgingBuckets::default();
        buckets.add(age, dec!(1));
        let hit = match bucket {
            "current" => buckets.current,
            "31-60" => buckets.days_31_60,
            "61-90" => buckets.days_61_90,
            _ => buckets.over_90,
        };
        assert_eq!(hit, dec!(1));
        assert_eq!(buckets.total(), dec!(1));
    }

    #[test]
    fn test_payments_apply_to_oldest_charge_first() {
        let movements = vec![
            on(1, MovementType::Charge, dec!(100), 2026, 2, 1),
            on(2, MovementType::Charge, dec!(200), 2026, 6, 20),
            on(3, MovementType::Payment, dec!(120), 2026, 6, 25),
        ];
        let aging = age_receivables(ClientId::new(1), &movements, as_of());

        assert_eq!(aging.buckets.over_90, Decimal::ZERO);
        assert_eq!(aging.buckets.current, dec!(180));
        assert_eq!(aging.total, dec!(180));
        assert_eq!(aging.oldest_unpaid, NaiveDate::from_ymd_opt(2026, 6, 20));
    }

    #[test]
    fn test_fully_paid_client_has_no_aging() {
        let movements = vec![
            on(1, MovementType::Charge, dec!(100), 2026, 1, 1),
            on(2, MovementType::Payment, dec!(150), 2026, 1, 2),
        ];
        let aging = age_receivables(ClientId::new(1), &movements, as_of());
        assert_eq!(aging.total, Decimal::ZERO);
        assert_eq!(aging.oldest_unpaid, None);
    }

    #[test]
    fn test_movements_after_as_of_ignored() {
        let movements = vec![
            on(1, MovementType::Charge, dec!(100), 2026, 3, 1),
            on(2, MovementType::Payment, dec!(100), 2026, 7, 15),
        ];
        let aging = age_receivables(ClientId::new(1), &movements, as_of());
        assert_eq!(aging.buckets.over_90, dec!(100));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Aging total equals the balance whenever the balance is positive.
        #[test]
        fn prop_aging_total_matches_positive_balance(
            raw in prop::collection::vec(
                (any::<bool>(), 1i64..100_000i64, 1u32..28u32, 1u32..7u32),
                0..30,
            )
        ) {
            let movements: Vec<AccountMovement> = raw
                .iter()
                .enumerate()
                .map(|(i, (is_charge, cents, day, month))| {
                    let kind = if *is_charge {
                        MovementType::Charge
                    } else {
                        MovementType::Payment
                    };
                    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                    let id = i as i32 + 1;
                    on(id, kind, Decimal::new(*cents, 2), 2026, *month, *day)
                })
                .collect();

            let balance = AccountBalance::from_movements(ClientId::new(1), &movements).balance;
            let aging = age_receivables(ClientId::new(1), &movements, as_of());

            prop_assert_eq!(aging.total, balance.max(Decimal::ZERO));
        }
    }
}
