//! Cash session error types.

use punto_shared::types::CashSessionId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during cash session operations.
#[derive(Debug, Error)]
pub enum CashError {
    // ========== Validation Errors ==========
    /// Opening float cannot be negative.
    #[error("Opening amount cannot be negative")]
    NegativeOpeningAmount,

    /// Movement amount cannot be zero.
    #[error("Movement amount cannot be zero")]
    ZeroAmount,

    /// Movement amount cannot be negative.
    #[error("Movement amount cannot be negative")]
    NegativeAmount,

    /// Movement concept is required.
    #[error("Movement concept is required")]
    EmptyConcept,

    /// Denomination must be positive.
    #[error("Invalid denomination: {0}")]
    InvalidDenomination(Decimal),

    /// Amount beyond the storable maximum.
    #[error("Amount exceeds the supported maximum")]
    AmountTooLarge,

    /// Merged quantities or the counted total cannot be stored.
    #[error("Cash count exceeds the supported maximum")]
    CountOverflow,

    /// Counter name is required.
    #[error("The person who counted the drawer is required")]
    MissingCounter,

    /// Opening without naming the operator.
    #[error("The person opening the drawer is required")]
    MissingOperator,

    // ========== State Errors ==========
    /// Session not found.
    #[error("Cash session not found: {0}")]
    SessionNotFound(CashSessionId),

    /// Session is closed and accepts no movements.
    #[error("Cash session {0} is not open")]
    SessionNotOpen(CashSessionId),

    /// Session was already closed.
    #[error("Cash session {0} is already closed")]
    SessionAlreadyClosed(CashSessionId),

    /// Another session is still open.
    #[error("Cash session {0} is already open; close it first")]
    SessionAlreadyOpen(CashSessionId),
}

impl CashError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeOpeningAmount => "NEGATIVE_OPENING_AMOUNT",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::EmptyConcept => "EMPTY_CONCEPT",
            Self::InvalidDenomination(_) => "INVALID_DENOMINATION",
            Self::AmountTooLarge => "AMOUNT_TOO_LARGE",
            Self::CountOverflow => "COUNT_OVERFLOW",
            Self::MissingCounter => "MISSING_COUNTER",
            Self::MissingOperator => "MISSING_OPERATOR",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::SessionNotOpen(_) => "SESSION_NOT_OPEN",
            Self::SessionAlreadyClosed(_) => "SESSION_ALREADY_CLOSED",
            Self::SessionAlreadyOpen(_) => "SESSION_ALREADY_OPEN",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NegativeOpeningAmount
            | Self::ZeroAmount
            | Self::NegativeAmount
            | Self::EmptyConcept
            | Self::InvalidDenomination(_)
            | Self::AmountTooLarge
            | Self::CountOverflow
            | Self::MissingCounter
            | Self::MissingOperator => 400,
            Self::SessionNotFound(_) => 404,
            Self::SessionAlreadyOpen(_) => 409,
            Self::SessionNotOpen(_) | Self::SessionAlreadyClosed(_) => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        let id = CashSessionId::new(3);
        assert_eq!(CashError::ZeroAmount.http_status_code(), 400);
        assert_eq!(CashError::SessionNotFound(id).http_status_code(), 404);
        assert_eq!(CashError::SessionAlreadyOpen(id).http_status_code(), 409);
        assert_eq!(CashError::SessionNotOpen(id).http_status_code(), 422);
        assert_eq!(CashError::SessionAlreadyClosed(id).http_status_code(), 422);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            CashError::SessionNotOpen(CashSessionId::new(3)).to_string(),
            "Cash session 3 is not open"
        );
    }
}
