//! Entity re-exports.

pub use super::account_movements::Entity as AccountMovements;
pub use super::cash_closing_counts::Entity as CashClosingCounts;
pub use super::cash_movements::Entity as CashMovements;
pub use super::cash_sessions::Entity as CashSessions;
pub use super::clients::Entity as Clients;
pub use super::products::Entity as Products;
pub use super::sale_items::Entity as SaleItems;
pub use super::sales::Entity as Sales;
pub use super::stock_movements::Entity as StockMovements;
