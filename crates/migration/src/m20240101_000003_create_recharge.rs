//! Create `recharge` table.
//!
//! Append-only transaction log; rows reference subscribers by mobile number
//! so history survives account changes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recharge::Table)
                    .if_not_exists()
                    .col(uuid(Recharge::Id).primary_key())
                    .col(string_len(Recharge::MobileNumber, 10).not_null())
                    .col(string_len(Recharge::PlanName, 128).not_null())
                    .col(double(Recharge::Amount).not_null())
                    .col(string_len(Recharge::TransactionId, 64).unique_key().not_null())
                    .col(string_len(Recharge::PaymentMethod, 32).not_null())
                    .col(timestamp_with_time_zone(Recharge::RechargedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Recharge::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Recharge { Table, Id, MobileNumber, PlanName, Amount, TransactionId, PaymentMethod, RechargedAt }
