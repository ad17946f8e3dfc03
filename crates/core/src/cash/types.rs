//! Cash session domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cash session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CashSessionStatus {
    /// Drawer is open and accepts movements.
    Open,
    /// Drawer was counted and closed (terminal).
    Closed,
}

impl CashSessionStatus {
    /// Returns true if the session accepts new movements.
    #[must_use]
    pub fn accepts_movements(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Direction of money through the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CashMovementType {
    /// Money in (sales, other income).
    Income,
    /// Money out (supplier payments, petty expenses).
    Expense,
}

/// How a movement was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Notes and coins in the drawer.
    Cash,
    /// Debit or credit card.
    Card,
    /// Bank transfer.
    Transfer,
    /// Charged to the customer's account (store credit).
    Account,
}

impl PaymentMethod {
    /// All methods in report order.
    pub const ALL: [Self; 4] = [Self::Cash, Self::Card, Self::Transfer, Self::Account];

    /// Returns true if the money physically lands in the drawer.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "CASH"),
            Self::Card => write!(f, "CARD"),
            Self::Transfer => write!(f, "TRANSFER"),
            Self::Account => write!(f, "ACCOUNT"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CASH" => Ok(Self::Cash),
            "CARD" => Ok(Self::Card),
            "TRANSFER" => Ok(Self::Transfer),
            "ACCOUNT" => Ok(Self::Account),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}

/// One line of the physical count: `quantity` pieces of `denomination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationCount {
    /// Face value of the note or coin.
    pub denomination: Decimal,
    /// Pieces counted.
    pub quantity: u32,
}

impl DenominationCount {
    /// `denomination × quantity`, or `None` if the product overflows.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.denomination.checked_mul(Decimal::from(self.quantity))
    }
}

/// The parts of a stored cash movement that reconciliation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashMovementRecord {
    /// Income or expense.
    pub movement_type: CashMovementType,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Positive amount.
    pub amount: Decimal,
}

/// Request to add a movement to a session.
#[derive(Debug, Clone)]
pub struct AddCashMovementInput {
    /// Income or expense.
    pub movement_type: CashMovementType,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Positive amount.
    pub amount: Decimal,
    /// What the money was for.
    pub concept: String,
}

/// A cash movement ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCashMovement {
    /// Income or expense.
    pub movement_type: CashMovementType,
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Amount rounded to cents.
    pub amount: Decimal,
    /// Trimmed concept.
    pub concept: String,
}

/// Request to close a session.
#[derive(Debug, Clone)]
pub struct CloseSessionInput {
    /// Physical count by denomination.
    pub counts: Vec<DenominationCount>,
    /// Who counted the drawer.
    pub counted_by: String,
    /// Optional remarks.
    pub notes: Option<String>,
}

/// Aggregated movements for one payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodTotals {
    /// Payment method.
    pub payment_method: PaymentMethod,
    /// Sum of income movements.
    pub income: Decimal,
    /// Sum of expense movements.
    pub expense: Decimal,
    /// `income − expense`.
    pub net: Decimal,
    /// Number of movements.
    pub count: u64,
}

/// System-side totals of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Float the drawer was opened with.
    pub opening_amount: Decimal,
    /// Per-method breakdown (only methods with movements), in `PaymentMethod::ALL` order.
    pub breakdown: Vec<PaymentMethodTotals>,
    /// Cash income recorded during the session.
    pub system_sales_total: Decimal,
    /// Cash expenses recorded during the session.
    pub system_expenses_total: Decimal,
    /// `opening + system_sales_total − system_expenses_total`.
    pub expected_cash: Decimal,
}

/// Outcome of closing a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingResult {
    /// System-side totals.
    pub summary: SessionSummary,
    /// Count lines merged by denomination, largest first.
    pub counts: Vec<DenominationCount>,
    /// `Σ denomination × quantity`.
    pub counted_cash: Decimal,
    /// `counted_cash − expected_cash`; negative is a shortage.
    pub difference: Decimal,
    /// Who counted the drawer.
    pub counted_by: String,
    /// Optional remarks.
    pub notes: Option<String>,
}
