//! Document domain types.

use punto_shared::types::{CashSessionId, ClientId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cash::PaymentMethod;

/// What kind of document a header is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    /// Completed sale at the counter.
    Sale,
    /// Customer order to be fulfilled later.
    Order,
    /// Price quotation.
    Quotation,
}

impl DocumentKind {
    /// Status a freshly created document starts in.
    #[must_use]
    pub fn initial_status(&self) -> DocumentStatus {
        match self {
            Self::Sale => DocumentStatus::Completed,
            Self::Order | Self::Quotation => DocumentStatus::Pending,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sale => write!(f, "SALE"),
            Self::Order => write!(f, "ORDER"),
            Self::Quotation => write!(f, "QUOTATION"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SALE" => Ok(Self::Sale),
            "ORDER" => Ok(Self::Order),
            "QUOTATION" => Ok(Self::Quotation),
            _ => Err(format!("Unknown document kind: {s}")),
        }
    }
}

/// Document lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    /// Order or quotation awaiting action.
    Pending,
    /// Sale registered, or order delivered.
    Completed,
    /// Order or quotation dropped.
    Cancelled,
    /// Quotation turned into an order or sale.
    Converted,
    /// Sale annulled.
    Voided,
}

impl DocumentStatus {
    /// Returns true if no further transitions are possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Converted | Self::Voided)
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Converted => write!(f, "CONVERTED"),
            Self::Voided => write!(f, "VOIDED"),
        }
    }
}

/// One requested line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LineInput {
    /// Product sold.
    pub product_id: ProductId,
    /// Units (fractional for weighed goods).
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Absolute discount on the line.
    #[serde(default)]
    pub discount: Decimal,
}

/// A line with its amounts computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLine {
    /// Product sold.
    pub product_id: ProductId,
    /// Units.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// `quantity × unit_price`, rounded to cents.
    pub gross: Decimal,
    /// Discount, rounded to cents.
    pub discount: Decimal,
    /// `gross − discount`.
    pub line_total: Decimal,
}

/// Header totals derived from the lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    /// Σ gross.
    pub subtotal: Decimal,
    /// Σ discount.
    pub discount_total: Decimal,
    /// `subtotal − discount_total`.
    pub total: Decimal,
}

/// Request to create a document.
#[derive(Debug, Clone)]
pub struct NewDocumentInput {
    /// Sale, order or quotation.
    pub kind: DocumentKind,
    /// Customer, required for account sales.
    pub client_id: Option<ClientId>,
    /// Register session the sale is rung up on.
    pub cash_session_id: Option<CashSessionId>,
    /// Required for sales.
    pub payment_method: Option<PaymentMethod>,
    /// Free text.
    pub notes: Option<String>,
    /// Requested lines.
    pub lines: Vec<LineInput>,
}

/// A document ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDocument {
    /// Sale, order or quotation.
    pub kind: DocumentKind,
    /// Initial status for the kind.
    pub status: DocumentStatus,
    /// Customer.
    pub client_id: Option<ClientId>,
    /// Register session.
    pub cash_session_id: Option<CashSessionId>,
    /// Payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Trimmed notes, `None` when blank.
    pub notes: Option<String>,
    /// Priced lines in request order.
    pub lines: Vec<PricedLine>,
    /// Header totals.
    pub totals: DocumentTotals,
}
