//! String-backed enums stored in the database.
//!
//! Each mirrors a `punto-core` enum; the `From` impls below convert between
//! the two so the core stays free of database dependencies.

use punto_core::{accounts, cash, documents, inventory};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account movement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementType {
    #[sea_orm(string_value = "CHARGE")]
    Charge,
    #[sea_orm(string_value = "PAYMENT")]
    Payment,
}

/// Cash session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum CashSessionStatus {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

/// Cash movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum CashMovementType {
    #[sea_orm(string_value = "INCOME")]
    Income,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

/// Payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "CARD")]
    Card,
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
    #[sea_orm(string_value = "ACCOUNT")]
    Account,
}

/// Document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    #[sea_orm(string_value = "SALE")]
    Sale,
    #[sea_orm(string_value = "ORDER")]
    Order,
    #[sea_orm(string_value = "QUOTATION")]
    Quotation,
}

/// Document status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    #[sea_orm(string_value = "CONVERTED")]
    Converted,
    #[sea_orm(string_value = "VOIDED")]
    Voided,
}

/// Stock movement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMovementKind {
    #[sea_orm(string_value = "PURCHASE_RECEIPT")]
    PurchaseReceipt,
    #[sea_orm(string_value = "SALE")]
    Sale,
    #[sea_orm(string_value = "SALE_RETURN")]
    SaleReturn,
    #[sea_orm(string_value = "ADJUSTMENT_IN")]
    AdjustmentIn,
    #[sea_orm(string_value = "ADJUSTMENT_OUT")]
    AdjustmentOut,
}

/// Generates `From` impls in both directions for unit-variant enums.
macro_rules! mirror_enum {
    ($db:ident <=> $core:ty { $($variant:ident),+ $(,)? }) => {
        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                type C = $core;
                match value {
                    $(C::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                type C = $core;
                match value {
                    $($db::$variant => C::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(MovementType <=> accounts::MovementType { Charge, Payment });
mirror_enum!(CashSessionStatus <=> cash::CashSessionStatus { Open, Closed });
mirror_enum!(CashMovementType <=> cash::CashMovementType { Income, Expense });
mirror_enum!(PaymentMethod <=> cash::PaymentMethod { Cash, Card, Transfer, Account });
mirror_enum!(DocumentKind <=> documents::DocumentKind { Sale, Order, Quotation });
mirror_enum!(DocumentStatus <=> documents::DocumentStatus {
    Pending,
    Completed,
    Cancelled,
    Converted,
    Voided,
});
mirror_enum!(StockMovementKind <=> inventory::StockMovementKind {
    PurchaseReceipt,
    Sale,
    SaleReturn,
    AdjustmentIn,
    AdjustmentOut,
});
