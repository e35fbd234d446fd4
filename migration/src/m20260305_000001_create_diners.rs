use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Diner::Table)
                    .if_not_exists()
                    .col(uuid(Diner::Id).primary_key())
                    .col(string_len(Diner::Email, 255).not_null().unique_key())
                    .col(string_len(Diner::PasswordHash, 255).not_null())
                    .col(string_len(Diner::Name, 100).not_null())
                    .col(string_len(Diner::Phone, 30).not_null())
                    .col(
                        timestamp_with_time_zone(Diner::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Diner::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Diner {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Phone,
    CreatedAt,
}
