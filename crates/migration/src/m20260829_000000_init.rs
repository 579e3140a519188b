//! Initial schema migration - creates all tables from scratch.
//!
//! The complete schema for Romana:
//!
//! - `users`: authentication + default currency
//! - `sessions`: shared trips
//! - `session_members`: who belongs to which session
//! - `budgets`: per-session (optionally per-user) budget rows
//! - `expenditures`: shared costs with a total price and currency
//! - `expenditure_payers`: who fronted the money for an expenditure
//! - `distribution_shares`: exact rational cost attribution per user
//! - `repayments`: money already sent between members
//! - `exchange_rates`: persisted directional FX cache with a freshness stamp

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
    Currency,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
    Name,
    CreatedBy,
}

#[derive(Iden)]
enum SessionMembers {
    Table,
    SessionId,
    UserId,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    SessionId,
    UserId,
    AmountMinor,
    Currency,
}

#[derive(Iden)]
enum Expenditures {
    Table,
    Id,
    SessionId,
    Name,
    Category,
    AmountMinor,
    Currency,
}

#[derive(Iden)]
enum ExpenditurePayers {
    Table,
    ExpenditureId,
    UserId,
}

#[derive(Iden)]
enum DistributionShares {
    Table,
    ExpenditureId,
    UserId,
    Numerator,
    Denominator,
}

#[derive(Iden)]
enum Repayments {
    Table,
    Id,
    SessionId,
    Sender,
    Receiver,
    AmountMinor,
    Currency,
    OccurredAt,
}

#[derive(Iden)]
enum ExchangeRates {
    Table,
    FromCurrency,
    ToCurrency,
    Rate,
    UpdatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .col(
                        ColumnDef::new(Users::Currency)
                            .string()
                            .not_null()
                            .default("EUR"),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Sessions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::Name).string().not_null())
                    .col(ColumnDef::new(Sessions::CreatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sessions-created_by")
                            .from(Sessions::Table, Sessions::CreatedBy)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Session members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SessionMembers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SessionMembers::SessionId).string().not_null())
                    .col(ColumnDef::new(SessionMembers::UserId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(SessionMembers::SessionId)
                            .col(SessionMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-session_members-session_id")
                            .from(SessionMembers::Table, SessionMembers::SessionId)
                            .to(Sessions::Table, Sessions::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-session_members-user_id")
                            .from(SessionMembers::Table, SessionMembers::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::SessionId).string().not_null())
                    .col(ColumnDef::new(Budgets::UserId).string())
                    .col(ColumnDef::new(Budgets::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Budgets::Currency).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-session_id")
                            .from(Budgets::Table, Budgets::SessionId)
                            .to(Sessions::Table, Sessions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-session_id")
                    .table(Budgets::Table)
                    .col(Budgets::SessionId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Expenditures
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenditures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenditures::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenditures::SessionId).string().not_null())
                    .col(ColumnDef::new(Expenditures::Name).string().not_null())
                    .col(
                        ColumnDef::new(Expenditures::Category)
                            .string()
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(Expenditures::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenditures::Currency).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenditures-session_id")
                            .from(Expenditures::Table, Expenditures::SessionId)
                            .to(Sessions::Table, Sessions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenditures-session_id")
                    .table(Expenditures::Table)
                    .col(Expenditures::SessionId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Expenditure payers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExpenditurePayers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenditurePayers::ExpenditureId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenditurePayers::UserId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(ExpenditurePayers::ExpenditureId)
                            .col(ExpenditurePayers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenditure_payers-expenditure_id")
                            .from(ExpenditurePayers::Table, ExpenditurePayers::ExpenditureId)
                            .to(Expenditures::Table, Expenditures::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Distribution shares
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DistributionShares::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DistributionShares::ExpenditureId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DistributionShares::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DistributionShares::Numerator)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DistributionShares::Denominator)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DistributionShares::ExpenditureId)
                            .col(DistributionShares::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-distribution_shares-expenditure_id")
                            .from(DistributionShares::Table, DistributionShares::ExpenditureId)
                            .to(Expenditures::Table, Expenditures::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Repayments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Repayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Repayments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Repayments::SessionId).string().not_null())
                    .col(ColumnDef::new(Repayments::Sender).string().not_null())
                    .col(ColumnDef::new(Repayments::Receiver).string().not_null())
                    .col(
                        ColumnDef::new(Repayments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Repayments::Currency).string().not_null())
                    .col(
                        ColumnDef::new(Repayments::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-repayments-session_id")
                            .from(Repayments::Table, Repayments::SessionId)
                            .to(Sessions::Table, Sessions::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-repayments-session_id")
                    .table(Repayments::Table)
                    .col(Repayments::SessionId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Exchange rates
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ExchangeRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExchangeRates::FromCurrency)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExchangeRates::ToCurrency).string().not_null())
                    .col(ColumnDef::new(ExchangeRates::Rate).double().not_null())
                    .col(
                        ColumnDef::new(ExchangeRates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ExchangeRates::FromCurrency)
                            .col(ExchangeRates::ToCurrency),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Table::drop().table(ExchangeRates::Table).to_owned(),
            Table::drop().table(Repayments::Table).to_owned(),
            Table::drop().table(DistributionShares::Table).to_owned(),
            Table::drop().table(ExpenditurePayers::Table).to_owned(),
            Table::drop().table(Expenditures::Table).to_owned(),
            Table::drop().table(Budgets::Table).to_owned(),
            Table::drop().table(SessionMembers::Table).to_owned(),
            Table::drop().table(Sessions::Table).to_owned(),
            Table::drop().table(Users::Table).to_owned(),
        ] {
            manager.drop_table(table).await?;
        }

        Ok(())
    }
}
