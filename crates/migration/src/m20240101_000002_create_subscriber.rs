//! Create `subscriber` table with optional FK to `plan`.
//!
//! Mobile number and email carry unique keys; deleting a plan detaches
//! subscribers instead of cascading.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriber::Table)
                    .if_not_exists()
                    .col(uuid(Subscriber::Id).primary_key())
                    .col(string_len(Subscriber::MobileNumber, 10).unique_key().not_null())
                    .col(string_len(Subscriber::Name, 128).not_null())
                    .col(string_len(Subscriber::Email, 255).unique_key().not_null())
                    // Nullable columns defined explicitly to avoid conflicting NULL/NOT NULL
                    .col(ColumnDef::new(Subscriber::CurrentPlanId).uuid().null())
                    .col(ColumnDef::new(Subscriber::PlanExpiry).date().null())
                    .col(ColumnDef::new(Subscriber::DataUsed).double().null())
                    .col(ColumnDef::new(Subscriber::DataTotal).string_len(64).null())
                    .col(date(Subscriber::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriber_plan")
                            .from(Subscriber::Table, Subscriber::CurrentPlanId)
                            .to(Plan::Table, Plan::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscriber::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscriber {
    Table,
    Id,
    MobileNumber,
    Name,
    Email,
    CurrentPlanId,
    PlanExpiry,
    DataUsed,
    DataTotal,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Plan { Table, Id }
