//! Sales, orders, quotations and stock movements.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_catalog::{Clients, Products};
use super::m20260301_000002_ledger::CashSessions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sales::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sales::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Sales::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Sales::ClientId).integer())
                    .col(ColumnDef::new(Sales::CashSessionId).integer())
                    .col(ColumnDef::new(Sales::PaymentMethod).string_len(16))
                    .col(ColumnDef::new(Sales::Subtotal).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(Sales::DiscountTotal).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(Sales::Total).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(Sales::Notes).text())
                    .col(
                        ColumnDef::new(Sales::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sales::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_client")
                            .from(Sales::Table, Sales::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sales_cash_session")
                            .from(Sales::Table, Sales::CashSessionId)
                            .to(CashSessions::Table, CashSessions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_kind_status_created")
                    .table(Sales::Table)
                    .col(Sales::Kind)
                    .col(Sales::Status)
                    .col(Sales::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SaleItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SaleItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SaleItems::SaleId).integer().not_null())
                    .col(ColumnDef::new(SaleItems::ProductId).integer().not_null())
                    .col(ColumnDef::new(SaleItems::Description).string_len(150).not_null())
                    .col(ColumnDef::new(SaleItems::Quantity).decimal_len(14, 3).not_null())
                    .col(ColumnDef::new(SaleItems::UnitPrice).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(SaleItems::Discount).decimal_len(14, 2).not_null())
                    .col(ColumnDef::new(SaleItems::LineTotal).decimal_len(14, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_items_sale")
                            .from(SaleItems::Table, SaleItems::SaleId)
                            .to(Sales::Table, Sales::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_items_product")
                            .from(SaleItems::Table, SaleItems::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockMovements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockMovements::ProductId).integer().not_null())
                    .col(ColumnDef::new(StockMovements::Kind).string_len(24).not_null())
                    .col(
                        ColumnDef::new(StockMovements::Quantity)
                            .decimal_len(14, 3)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockMovements::UnitCost).decimal_len(14, 4))
                    .col(ColumnDef::new(StockMovements::Reference).string_len(100))
                    .col(ColumnDef::new(StockMovements::SaleId).integer())
                    .col(
                        ColumnDef::new(StockMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_movements_product")
                            .from(StockMovements::Table, StockMovements::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stock_movements_product_created")
                    .table(StockMovements::Table)
                    .col(StockMovements::ProductId)
                    .col(StockMovements::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            StockMovements::Table.into_iden(),
            SaleItems::Table.into_iden(),
            Sales::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sales {
    Table,
    Id,
    Kind,
    Status,
    ClientId,
    CashSessionId,
    PaymentMethod,
    Subtotal,
    DiscountTotal,
    Total,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SaleItems {
    Table,
    Id,
    SaleId,
    ProductId,
    Description,
    Quantity,
    UnitPrice,
    Discount,
    LineTotal,
}

#[derive(DeriveIden)]
enum StockMovements {
    Table,
    Id,
    ProductId,
    Kind,
    Quantity,
    UnitCost,
    Reference,
    SaleId,
    CreatedAt,
}
