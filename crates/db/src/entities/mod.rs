//! `SeaORM` entity definitions.

pub mod prelude;

pub mod account_movements;
pub mod cash_closing_counts;
pub mod cash_movements;
pub mod cash_sessions;
pub mod clients;
pub mod products;
pub mod sale_items;
pub mod sales;
pub mod sea_orm_active_enums;
pub mod stock_movements;
