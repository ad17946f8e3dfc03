//! Account movement domain types.

use chrono::{DateTime, Utc};
use punto_shared::types::{AccountMovementId, ClientId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of an account movement.
///
/// Charges increase what the client owes; payments decrease it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    /// The client owes more (credit sale, manual charge).
    Charge,
    /// The client paid part of the balance.
    Payment,
}

impl MovementType {
    /// Returns the movement's effect on the balance.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Charge => amount,
            Self::Payment => -amount,
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Charge => write!(f, "CHARGE"),
            Self::Payment => write!(f, "PAYMENT"),
        }
    }
}

impl std::str::FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CHARGE" => Ok(Self::Charge),
            "PAYMENT" => Ok(Self::Payment),
            _ => Err(format!("Unknown movement type: {s}")),
        }
    }
}

/// A persisted account movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMovement {
    /// Movement ID.
    pub id: AccountMovementId,
    /// Owning client.
    pub client_id: ClientId,
    /// Charge or payment.
    pub movement_type: MovementType,
    /// Always positive; the sign comes from `movement_type`.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// Request to append a movement.
#[derive(Debug, Clone)]
pub struct RecordMovementInput {
    /// Target client.
    pub client_id: ClientId,
    /// Charge or payment.
    pub movement_type: MovementType,
    /// Amount, must be positive.
    pub amount: Decimal,
    /// Description, trimmed before storage.
    pub description: String,
}

/// Client facts needed to validate a new movement.
#[derive(Debug, Clone, Copy)]
pub struct ClientStanding {
    /// Whether the client may receive movements.
    pub is_active: bool,
    /// Maximum balance allowed after a charge, if any.
    pub credit_limit: Option<Decimal>,
    /// Balance before the new movement.
    pub current_balance: Decimal,
}

/// A movement that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMovement {
    /// Target client.
    pub client_id: ClientId,
    /// Charge or payment.
    pub movement_type: MovementType,
    /// Positive amount rounded to cents.
    pub amount: Decimal,
    /// Trimmed description.
    pub description: String,
    /// Balance after the movement is applied.
    pub balance_after: Decimal,
}
