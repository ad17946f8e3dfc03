//! Core business logic for Punto Pastelero.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `accounts` - Customer account movements and running balances
//! - `cash` - Cash register session lifecycle and reconciliation
//! - `documents` - Sale, order and quotation line totals
//! - `inventory` - Kardex with weighted-average costing
//! - `reports` - Read-side sales and receivables rollups
//! - `ticket` - Printable HTML sale tickets

pub mod accounts;
pub mod cash;
pub mod documents;
pub mod inventory;
pub mod reports;
pub mod ticket;
