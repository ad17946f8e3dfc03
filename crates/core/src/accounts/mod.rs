//! Customer account movement ledger.
//!
//! This module implements the accounts-receivable side of the store:
//! - Append-only charges and payments per client
//! - Balance as a fold over movements (no materialized column)
//! - Statements with running balances
//! - Receivables aging with FIFO payment application

pub mod aging;
pub mod balance;
pub mod error;
pub mod service;
pub mod types;

pub use aging::{AgingBuckets, ClientAging, age_receivables};
pub use balance::{AccountBalance, RunningBalance, Statement, StatementLine};
pub use error::AccountError;
pub use service::AccountService;
pub use types::{
    AccountMovement, ClientStanding, MovementType, RecordMovementInput, ValidatedMovement,
};
