//! Repository layer for database operations.
//!
//! Each repository owns a connection handle. Operations that span several
//! tables share `*_in` helpers generic over [`sea_orm::ConnectionTrait`] so
//! they can run inside one transaction.

pub mod account_movement;
pub mod cash_session;
pub mod client;
pub mod inventory;
pub mod product;
pub mod report;
pub mod sale;

pub use account_movement::{AccountMovementError, AccountMovementRepository, RecordedMovement};
pub use cash_session::{CashSessionError, CashSessionRepository, ClosedSession, SessionDetail};
pub use client::{ClientError, ClientFilter, ClientRepository, CreateClientInput, UpdateClientInput};
pub use inventory::{InventoryRepoError, InventoryRepository};
pub use product::{CreateProductInput, ProductError, ProductRepository};
pub use report::{ReportRepoError, ReportRepository};
pub use sale::{DocumentFilter, DocumentWithItems, SaleError, SaleRepository};
