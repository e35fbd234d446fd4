use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::utils::schedule;

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "booking_status")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "arrival_status")]
#[serde(rename_all = "lowercase")]
pub enum ArrivalStatus {
    #[sea_orm(string_value = "unset")]
    Unset,
    #[sea_orm(string_value = "arriving")]
    Arriving,
    #[sea_orm(string_value = "arrived")]
    Arrived,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cancellation_source")]
#[serde(rename_all = "lowercase")]
pub enum CancellationSource {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "restaurant")]
    Restaurant,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub diner_id: Uuid,
    pub name: String,
    pub phone: String,
    pub special_request: Option<String>,
    pub date: Date,
    /// Wall-clock "HH:MM", zero-padded at validation time so lexicographic
    /// order matches chronological order within a day.
    pub time: String,
    pub total_people: i32,
    pub status: BookingStatus,
    pub confirmed: bool,
    pub arrival_status: ArrivalStatus,
    pub cancellation_source: CancellationSource,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// The scheduled instant this booking occupies, for expiry comparison.
    /// None if the stored time string does not parse.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        schedule::scheduled_instant(self.date, &self.time)
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BookingStatus::Cancelled
    }
}

impl ActiveModel {
    /// Move the booking into its terminal cancelled state. Callers are
    /// responsible for skipping already-cancelled bookings (repeat cancels
    /// are no-ops, not transitions).
    pub fn cancel(&mut self, source: CancellationSource, reason: String) {
        self.status = Set(BookingStatus::Cancelled);
        self.confirmed = Set(false);
        self.cancellation_source = Set(source);
        self.cancellation_reason = Set(Some(reason));
    }

    pub fn confirm(&mut self) {
        self.status = Set(BookingStatus::Confirmed);
        self.confirmed = Set(true);
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id"
    )]
    Restaurant,
    #[sea_orm(
        belongs_to = "super::diner::Entity",
        from = "Column::DinerId",
        to = "super::diner::Column::Id"
    )]
    Diner,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::diner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Diner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
