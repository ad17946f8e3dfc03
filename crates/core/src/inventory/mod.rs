//! Inventory movements and kardex.
//!
//! Stock is valued with weighted-average costing. Quantities are decimals
//! so weighed goods (flour, chocolate) are tracked in fractional units.

pub mod error;
pub mod kardex;
pub mod service;
pub mod types;

pub use error::InventoryError;
pub use kardex::{Kardex, KardexLine, StockPosition};
pub use service::InventoryService;
pub use types::{
    RecordStockMovementInput, StockMovement, StockMovementKind, ValidatedStockMovement,
};
