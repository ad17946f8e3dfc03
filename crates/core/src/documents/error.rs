//! Document error types.

use punto_shared::types::SaleId;
use thiserror::Error;

use super::types::{DocumentKind, DocumentStatus};

/// Errors that can occur while creating or updating documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    // ========== Validation Errors ==========
    /// Document has no lines.
    #[error("Document must have at least one line")]
    NoLines,

    /// Line quantity must be positive.
    #[error("Line {line}: quantity must be greater than zero")]
    NonPositiveQuantity {
        /// 1-based line number.
        line: usize,
    },

    /// Unit price cannot be negative.
    #[error("Line {line}: unit price cannot be negative")]
    NegativePrice {
        /// 1-based line number.
        line: usize,
    },

    /// Discount cannot be negative.
    #[error("Line {line}: discount cannot be negative")]
    NegativeDiscount {
        /// 1-based line number.
        line: usize,
    },

    /// Discount larger than the line.
    #[error("Line {line}: discount exceeds line amount")]
    DiscountExceedsLine {
        /// 1-based line number.
        line: usize,
    },

    /// Line quantity, price or amount beyond the storable range.
    #[error("Line {line}: amount exceeds the supported maximum")]
    LineAmountOverflow {
        /// 1-based line number.
        line: usize,
    },

    /// Document subtotal beyond the storable range.
    #[error("Document total exceeds the supported maximum")]
    AmountOverflow,

    /// Sale without payment method.
    #[error("Sales require a payment method")]
    MissingPaymentMethod,

    /// Account sale without client.
    #[error("Account sales require a client")]
    AccountSaleRequiresClient,

    /// Payment details on an order or quotation.
    #[error("Only sales can carry a payment method or cash session")]
    PaymentOnNonSale,

    // ========== State Errors ==========
    /// Document not found.
    #[error("Document not found: {0}")]
    NotFound(SaleId),

    /// Status change not allowed.
    #[error("{kind} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Document kind.
        kind: DocumentKind,
        /// Current status.
        from: DocumentStatus,
        /// Requested status.
        to: DocumentStatus,
    },
}

impl DocumentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::NegativePrice { .. } => "NEGATIVE_PRICE",
            Self::NegativeDiscount { .. } => "NEGATIVE_DISCOUNT",
            Self::DiscountExceedsLine { .. } => "DISCOUNT_EXCEEDS_LINE",
            Self::LineAmountOverflow { .. } | Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::MissingPaymentMethod => "MISSING_PAYMENT_METHOD",
            Self::AccountSaleRequiresClient => "ACCOUNT_SALE_REQUIRES_CLIENT",
            Self::PaymentOnNonSale => "PAYMENT_ON_NON_SALE",
            Self::NotFound(_) => "DOCUMENT_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_STATUS_TRANSITION",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidTransition { .. } => 422,
            _ => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_message() {
        let err = DocumentError::InvalidTransition {
            kind: DocumentKind::Order,
            from: DocumentStatus::Cancelled,
            to: DocumentStatus::Completed,
        };
        assert_eq!(err.to_string(), "ORDER cannot move from CANCELLED to COMPLETED");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_validation_errors_are_400() {
        assert_eq!(DocumentError::NoLines.http_status_code(), 400);
        assert_eq!(DocumentError::DiscountExceedsLine { line: 2 }.http_status_code(), 400);
        assert_eq!(DocumentError::AmountOverflow.http_status_code(), 400);
        assert_eq!(DocumentError::NotFound(SaleId::new(1)).http_status_code(), 404);
    }
}
