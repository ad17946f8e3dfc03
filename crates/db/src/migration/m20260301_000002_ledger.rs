//! Account movements and cash register sessions.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_catalog::Clients;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccountMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccountMovements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccountMovements::ClientId).integer().not_null())
                    .col(
                        ColumnDef::new(AccountMovements::MovementType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountMovements::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AccountMovements::Description)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AccountMovements::SaleId).integer())
                    .col(
                        ColumnDef::new(AccountMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_movements_client")
                            .from(AccountMovements::Table, AccountMovements::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_movements_client_created")
                    .table(AccountMovements::Table)
                    .col(AccountMovements::ClientId)
                    .col(AccountMovements::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CashSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashSessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashSessions::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(CashSessions::OpeningAmount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashSessions::OpenedBy).string_len(100).not_null())
                    .col(
                        ColumnDef::new(CashSessions::OpenedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashSessions::ClosedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(CashSessions::CountedBy).string_len(100))
                    .col(ColumnDef::new(CashSessions::Notes).text())
                    .col(ColumnDef::new(CashSessions::SystemSalesTotal).decimal_len(14, 2))
                    .col(ColumnDef::new(CashSessions::SystemExpensesTotal).decimal_len(14, 2))
                    .col(ColumnDef::new(CashSessions::ExpectedCash).decimal_len(14, 2))
                    .col(ColumnDef::new(CashSessions::CountedCash).decimal_len(14, 2))
                    .col(ColumnDef::new(CashSessions::Difference).decimal_len(14, 2))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cash_sessions_status")
                    .table(CashSessions::Table)
                    .col(CashSessions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CashMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashMovements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashMovements::CashSessionId).integer().not_null())
                    .col(
                        ColumnDef::new(CashMovements::MovementType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashMovements::PaymentMethod)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashMovements::Amount)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashMovements::Concept).string_len(255).not_null())
                    .col(ColumnDef::new(CashMovements::SaleId).integer())
                    .col(
                        ColumnDef::new(CashMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cash_movements_session")
                            .from(CashMovements::Table, CashMovements::CashSessionId)
                            .to(CashSessions::Table, CashSessions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CashClosingCounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashClosingCounts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CashClosingCounts::CashSessionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashClosingCounts::Denomination)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashClosingCounts::Quantity).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cash_closing_counts_session")
                            .from(CashClosingCounts::Table, CashClosingCounts::CashSessionId)
                            .to(CashSessions::Table, CashSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            CashClosingCounts::Table.into_iden(),
            CashMovements::Table.into_iden(),
            CashSessions::Table.into_iden(),
            AccountMovements::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum AccountMovements {
    Table,
    Id,
    ClientId,
    MovementType,
    Amount,
    Description,
    SaleId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(super) enum CashSessions {
    Table,
    Id,
    Status,
    OpeningAmount,
    OpenedBy,
    OpenedAt,
    ClosedAt,
    CountedBy,
    Notes,
    SystemSalesTotal,
    SystemExpensesTotal,
    ExpectedCash,
    CountedCash,
    Difference,
}

#[derive(DeriveIden)]
enum CashMovements {
    Table,
    Id,
    CashSessionId,
    MovementType,
    PaymentMethod,
    Amount,
    Concept,
    SaleId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CashClosingCounts {
    Table,
    Id,
    CashSessionId,
    Denomination,
    Quantity,
}
