use sea_orm_migration::{prelude::*, schema::*};

use super::m20260305_000002_create_restaurants::Restaurant;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiningTable::Table)
                    .if_not_exists()
                    .col(uuid(DiningTable::Id).primary_key())
                    .col(uuid(DiningTable::RestaurantId).not_null())
                    .col(string_len(DiningTable::Floor, 50).not_null())
                    .col(integer(DiningTable::TableNumber).not_null())
                    .col(integer(DiningTable::Capacity).not_null())
                    .col(boolean(DiningTable::Available).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(DiningTable::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(DiningTable::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dining_table_restaurant")
                            .from(DiningTable::Table, DiningTable::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiningTable::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DiningTable {
    Table,
    Id,
    RestaurantId,
    Floor,
    TableNumber,
    Capacity,
    Available,
    CreatedAt,
    UpdatedAt,
}
