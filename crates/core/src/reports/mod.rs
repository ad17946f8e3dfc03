//! Read-side report generation.
//!
//! Reports are recomputed on every request from sale, account and cash rows.
//! Nothing here is persisted:
//! - Sales by client, product, payment method and period
//! - Receivables aging
//! - Kardex for one product
//! - Closed cash sessions with their differences

pub mod error;
pub mod service;
pub mod table;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use table::{Cell, Tabular};
pub use types::*;
