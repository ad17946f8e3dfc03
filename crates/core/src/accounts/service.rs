//! Account service for movement validation.

use punto_shared::types::{MAX_AMOUNT, round_money};
use rust_decimal::Decimal;

use super::error::AccountError;
use super::types::{ClientStanding, MovementType, RecordMovementInput, ValidatedMovement};

/// Maximum stored description length.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Account service for movement validation.
///
/// Pure business logic; the repository supplies the client's standing and
/// persists the validated movement.
pub struct AccountService;

impl AccountService {
    /// Validates a movement before it is appended.
    ///
    /// 1. Amount must be positive (rounded to cents) and storable
    /// 2. Description must be non-empty after trimming and fit the column
    /// 3. Client must be active
    /// 4. A charge must not push the balance above the credit limit
    ///
    /// # Errors
    ///
    /// Returns `AccountError` if validation fails.
    pub fn validate_movement(
        input: &RecordMovementInput,
        standing: ClientStanding,
    ) -> Result<ValidatedMovement, AccountError> {
        let amount = Self::validate_amount(input.amount)?;

        let description = input.description.trim();
        if description.is_empty() {
            return Err(AccountError::EmptyDescription);
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AccountError::DescriptionTooLong {
                max: MAX_DESCRIPTION_LEN,
            });
        }

        if !standing.is_active {
            return Err(AccountError::ClientInactive(input.client_id));
        }

        let balance_after = standing
            .current_balance
            .checked_add(input.movement_type.signed(amount))
            .ok_or(AccountError::AmountTooLarge)?;

        if input.movement_type == MovementType::Charge
            && let Some(limit) = standing.credit_limit
            && balance_after > limit
        {
            return Err(AccountError::CreditLimitExceeded {
                client_id: input.client_id,
                limit,
                balance_after,
            });
        }

        Ok(ValidatedMovement {
            client_id: input.client_id,
            movement_type: input.movement_type,
            amount,
            description: description.to_string(),
            balance_after,
        })
    }

    /// Validates a movement amount and rounds it to cents.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount`, `NegativeAmount` or `AmountTooLarge`.
    pub fn validate_amount(amount: Decimal) -> Result<Decimal, AccountError> {
        let amount = round_money(amount);
        if amount.is_zero() {
            return Err(AccountError::ZeroAmount);
        }
        if amount.is_sign_negative() {
            return Err(AccountError::NegativeAmount);
        }
        if amount > MAX_AMOUNT {
            return Err(AccountError::AmountTooLarge);
        }
        Ok(amount)
    }
}
