use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create booking lifecycle enums
        manager
            .create_type(
                Type::create()
                    .as_enum(BookingStatus::Enum)
                    .values([
                        BookingStatus::Pending,
                        BookingStatus::Confirmed,
                        BookingStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(ArrivalStatus::Enum)
                    .values([
                        ArrivalStatus::Unset,
                        ArrivalStatus::Arriving,
                        ArrivalStatus::Arrived,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(CancellationSource::Enum)
                    .values([
                        CancellationSource::None,
                        CancellationSource::User,
                        CancellationSource::Restaurant,
                    ])
                    .to_owned(),
            )
            .await?;

        // Bookings reference diners and restaurants by plain id columns.
        // No foreign keys: bookings are never hard-deleted, and creation
        // does not require the restaurant row to exist.
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::RestaurantId).not_null())
                    .col(uuid(Booking::DinerId).not_null())
                    .col(string_len(Booking::Name, 100).not_null())
                    .col(string_len(Booking::Phone, 30).not_null())
                    .col(text_null(Booking::SpecialRequest))
                    .col(date(Booking::Date).not_null())
                    .col(string_len(Booking::Time, 5).not_null())
                    .col(integer(Booking::TotalPeople).not_null())
                    .col(
                        ColumnDef::new(Booking::Status)
                            .custom(BookingStatus::Enum)
                            .not_null(),
                    )
                    .col(boolean(Booking::Confirmed).not_null().default(false))
                    .col(
                        ColumnDef::new(Booking::ArrivalStatus)
                            .custom(ArrivalStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Booking::CancellationSource)
                            .custom(CancellationSource::Enum)
                            .not_null(),
                    )
                    .col(text_null(Booking::CancellationReason))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Booking::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(CancellationSource::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ArrivalStatus::Enum).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(BookingStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    RestaurantId,
    DinerId,
    Name,
    Phone,
    SpecialRequest,
    Date,
    Time,
    TotalPeople,
    Status,
    Confirmed,
    ArrivalStatus,
    CancellationSource,
    CancellationReason,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum BookingStatus {
    #[sea_orm(iden = "booking_status")]
    Enum,
    #[sea_orm(iden = "pending")]
    Pending,
    #[sea_orm(iden = "confirmed")]
    Confirmed,
    #[sea_orm(iden = "cancelled")]
    Cancelled,
}

#[derive(DeriveIden)]
pub enum ArrivalStatus {
    #[sea_orm(iden = "arrival_status")]
    Enum,
    #[sea_orm(iden = "unset")]
    Unset,
    #[sea_orm(iden = "arriving")]
    Arriving,
    #[sea_orm(iden = "arrived")]
    Arrived,
}

#[derive(DeriveIden)]
pub enum CancellationSource {
    #[sea_orm(iden = "cancellation_source")]
    Enum,
    #[sea_orm(iden = "none")]
    None,
    #[sea_orm(iden = "user")]
    User,
    #[sea_orm(iden = "restaurant")]
    Restaurant,
}
