//! Account ledger error types.

use punto_shared::types::ClientId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while recording account movements.
#[derive(Debug, Error)]
pub enum AccountError {
    // ========== Validation Errors ==========
    /// Movement amount cannot be zero.
    #[error("Movement amount cannot be zero")]
    ZeroAmount,

    /// Movement amount cannot be negative.
    #[error("Movement amount cannot be negative")]
    NegativeAmount,

    /// Amount beyond the storable maximum.
    #[error("Movement amount exceeds the supported maximum")]
    AmountTooLarge,

    /// Description is required.
    #[error("Movement description is required")]
    EmptyDescription,

    /// Description exceeds the column width.
    #[error("Movement description exceeds {max} characters")]
    DescriptionTooLong {
        /// Maximum length.
        max: usize,
    },

    // ========== Client Errors ==========
    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    /// Client is inactive.
    #[error("Client {0} is inactive")]
    ClientInactive(ClientId),

    /// Charge would exceed the client's credit limit.
    #[error(
        "Charge exceeds credit limit {limit} for client {client_id}: new balance {balance_after}"
    )]
    CreditLimitExceeded {
        /// The client.
        client_id: ClientId,
        /// Configured limit.
        limit: Decimal,
        /// Balance the charge would produce.
        balance_after: Decimal,
    },
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AmountTooLarge => "AMOUNT_TOO_LARGE",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::DescriptionTooLong { .. } => "DESCRIPTION_TOO_LONG",
            Self::ClientNotFound(_) => "CLIENT_NOT_FOUND",
            Self::ClientInactive(_) => "CLIENT_INACTIVE",
            Self::CreditLimitExceeded { .. } => "CREDIT_LIMIT_EXCEEDED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ZeroAmount
            | Self::NegativeAmount
            | Self::AmountTooLarge
            | Self::EmptyDescription
            | Self::DescriptionTooLong { .. } => 400,
            Self::ClientNotFound(_) => 404,
            Self::ClientInactive(_) | Self::CreditLimitExceeded { .. } => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(AccountError::ZeroAmount.http_status_code(), 400);
        assert_eq!(AccountError::ClientNotFound(ClientId::new(1)).http_status_code(), 404);
        assert_eq!(AccountError::ClientInactive(ClientId::new(1)).http_status_code(), 422);
    }

    #[test]
    fn test_error_display() {
        let err = AccountError::CreditLimitExceeded {
            client_id: ClientId::new(4),
            limit: dec!(500.00),
            balance_after: dec!(650.00),
        };
        assert_eq!(
            err.to_string(),
            "Charge exceeds credit limit 500.00 for client 4: new balance 650.00"
        );
        assert_eq!(err.error_code(), "CREDIT_LIMIT_EXCEEDED");
    }
}
