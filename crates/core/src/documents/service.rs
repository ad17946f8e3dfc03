//! Document pricing and lifecycle rules.

use punto_shared::types::{MAX_AMOUNT, MAX_QUANTITY, round_money};
use rust_decimal::Decimal;

use super::error::DocumentError;
use super::types::{
    DocumentKind, DocumentStatus, DocumentTotals, LineInput, NewDocumentInput, PricedLine,
    ValidatedDocument,
};
use crate::cash::PaymentMethod;

/// Document service.
pub struct DocumentService;

impl DocumentService {
    /// Prices one line. `line` is the 1-based position used in errors.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive quantity, a negative
    /// price or discount, or a discount larger than the line. Quantities and
    /// amounts beyond what the columns store give `LineAmountOverflow`.
    pub fn price_line(line: usize, input: &LineInput) -> Result<PricedLine, DocumentError> {
        if input.quantity <= Decimal::ZERO {
            return Err(DocumentError::NonPositiveQuantity { line });
        }
        if input.unit_price.is_sign_negative() && !input.unit_price.is_zero() {
            return Err(DocumentError::NegativePrice { line });
        }
        if input.discount.is_sign_negative() && !input.discount.is_zero() {
            return Err(DocumentError::NegativeDiscount { line });
        }

        if input.quantity > MAX_QUANTITY
            || input.unit_price > MAX_AMOUNT
            || input.discount > MAX_AMOUNT
        {
            return Err(DocumentError::LineAmountOverflow { line });
        }

        let gross = input
            .quantity
            .checked_mul(input.unit_price)
            .map(round_money)
            .filter(|g| *g <= MAX_AMOUNT)
            .ok_or(DocumentError::LineAmountOverflow { line })?;
        let discount = round_money(input.discount);
        if discount > gross {
            return Err(DocumentError::DiscountExceedsLine { line });
        }

        Ok(PricedLine {
            product_id: input.product_id,
            quantity: input.quantity,
            unit_price: input.unit_price,
            gross,
            discount,
            line_total: gross - discount,
        })
    }

    /// Sums priced lines into header totals.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` when the subtotal exceeds the largest
    /// storable amount.
    pub fn totals(lines: &[PricedLine]) -> Result<DocumentTotals, DocumentError> {
        let (subtotal, discount_total) = lines
            .iter()
            .try_fold((Decimal::ZERO, Decimal::ZERO), |(sub, disc), l| {
                let sub = sub.checked_add(l.gross).filter(|s| *s <= MAX_AMOUNT)?;
                // discount <= gross per line, so it cannot outgrow the subtotal
                Some((sub, disc + l.discount))
            })
            .ok_or(DocumentError::AmountOverflow)?;

        Ok(DocumentTotals {
            subtotal,
            discount_total,
            total: subtotal - discount_total,
        })
    }

    /// Validates and prices a new document.
    ///
    /// # Errors
    ///
    /// Returns `NoLines`, a line error, or a payment rule error.
    pub fn validate(input: NewDocumentInput) -> Result<ValidatedDocument, DocumentError> {
        if input.lines.is_empty() {
            return Err(DocumentError::NoLines);
        }

        match input.kind {
            DocumentKind::Sale => match input.payment_method {
                None => return Err(DocumentError::MissingPaymentMethod),
                Some(PaymentMethod::Account) if input.client_id.is_none() => {
                    return Err(DocumentError::AccountSaleRequiresClient);
                }
                Some(_) => {}
            },
            DocumentKind::Order | DocumentKind::Quotation => {
                if input.payment_method.is_some() || input.cash_session_id.is_some() {
                    return Err(DocumentError::PaymentOnNonSale);
                }
            }
        }

        let lines = input
            .lines
            .iter()
            .enumerate()
            .map(|(i, l)| Self::price_line(i + 1, l))
            .collect::<Result<Vec<_>, _>>()?;
        let totals = Self::totals(&lines)?;

        Ok(ValidatedDocument {
            kind: input.kind,
            status: input.kind.initial_status(),
            client_id: input.client_id,
            cash_session_id: input.cash_session_id,
            payment_method: input.payment_method,
            notes: input
                .notes
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            lines,
            totals,
        })
    }

    /// Returns true if `kind` may move from `from` to `to`.
    #[must_use]
    pub fn can_transition(kind: DocumentKind, from: DocumentStatus, to: DocumentStatus) -> bool {
        use DocumentStatus::{Cancelled, Completed, Converted, Pending, Voided};

        matches!(
            (kind, from, to),
            (DocumentKind::Sale, Completed, Voided)
                | (DocumentKind::Order, Pending, Completed | Cancelled)
                | (DocumentKind::Quotation, Pending, Converted | Cancelled)
        )
    }

    /// Checks a status change.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the change is not allowed.
    pub fn transition(
        kind: DocumentKind,
        from: DocumentStatus,
        to: DocumentStatus,
    ) -> Result<DocumentStatus, DocumentError> {
        if Self::can_transition(kind, from, to) {
            Ok(to)
        } else {
            Err(DocumentError::InvalidTransition { kind, from, to })
        }
    }
}
