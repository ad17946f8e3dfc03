//! Cash register session lifecycle and reconciliation.
//!
//! A session is opened with a float, accepts income and expense movements
//! while open, and is closed with a physical denomination count. Closing is
//! terminal.

pub mod error;
pub mod service;
pub mod types;

pub use error::CashError;
pub use service::CashService;
pub use types::{
    AddCashMovementInput, CashMovementRecord, CashMovementType, CashSessionStatus,
    CloseSessionInput, ClosingResult, DenominationCount, PaymentMethod, PaymentMethodTotals,
    SessionSummary, ValidatedCashMovement,
};
