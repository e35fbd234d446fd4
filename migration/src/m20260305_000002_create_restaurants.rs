use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(uuid(Restaurant::Id).primary_key())
                    .col(string_len(Restaurant::Email, 255).not_null().unique_key())
                    .col(string_len(Restaurant::PasswordHash, 255).not_null())
                    .col(string_len(Restaurant::Name, 100).not_null())
                    .col(string_len(Restaurant::Phone, 30).not_null())
                    .col(string_len(Restaurant::Address, 255).not_null())
                    .col(string_len(Restaurant::City, 100).not_null())
                    .col(string_len(Restaurant::State, 100).not_null())
                    .col(text_null(Restaurant::AboutUs))
                    .col(string_len_null(Restaurant::OpenHours, 100))
                    .col(string_len_null(Restaurant::ProfileImage, 500))
                    .col(json_binary(Restaurant::Images).not_null())
                    .col(
                        timestamp_with_time_zone(Restaurant::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Restaurant::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Restaurant {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    Phone,
    Address,
    City,
    State,
    AboutUs,
    OpenHours,
    ProfileImage,
    Images,
    CreatedAt,
    UpdatedAt,
}
