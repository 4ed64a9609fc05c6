//! Create `plan` table.
//!
//! Reference data: purchasable tiers with price, allowances, and validity.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plan::Table)
                    .if_not_exists()
                    .col(uuid(Plan::Id).primary_key())
                    .col(string_len(Plan::Name, 128).not_null())
                    .col(string_len(Plan::Category, 32).not_null())
                    .col(double(Plan::Price).not_null())
                    .col(string_len(Plan::Data, 64).not_null())
                    .col(string_len(Plan::Calls, 64).not_null())
                    .col(string_len(Plan::Sms, 64).not_null())
                    .col(integer(Plan::ValidityDays).not_null())
                    .col(timestamp_with_time_zone(Plan::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Plan::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Plan { Table, Id, Name, Category, Price, Data, Calls, Sms, ValidityDays, CreatedAt }
