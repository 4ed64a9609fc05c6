use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Subscriber: index on plan_expiry for the expiring-soon query
        manager
            .create_index(
                Index::create()
                    .name("idx_subscriber_plan_expiry")
                    .table(Subscriber::Table)
                    .col(Subscriber::PlanExpiry)
                    .to_owned(),
            )
            .await?;

        // Recharge: history lookups filter on mobile_number
        manager
            .create_index(
                Index::create()
                    .name("idx_recharge_mobile")
                    .table(Recharge::Table)
                    .col(Recharge::MobileNumber)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_recharge_recharged_at")
                    .table(Recharge::Table)
                    .col(Recharge::RechargedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_subscriber_plan_expiry")
                    .table(Subscriber::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_recharge_mobile").table(Recharge::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_recharge_recharged_at")
                    .table(Recharge::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Subscriber { Table, PlanExpiry }

#[derive(DeriveIden)]
enum Recharge { Table, MobileNumber, RechargedAt }
