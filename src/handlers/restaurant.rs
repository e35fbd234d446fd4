use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::booking::{self, ArrivalStatus, BookingStatus, CancellationSource};
use crate::entities::{dining_table, restaurant};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::AppState;

/// Reason stamped onto pending bookings auto-cancelled by the expiry sweep.
pub const EXPIRED_PENDING_REASON: &str = "Restaurant Cancelled - No Tables Available";

const RESTAURANT_CANCEL_REASON: &str = "Cancelled by restaurant";

// ============ Booking Lifecycle ============

/// List pending bookings for the restaurant, soonest first.
///
/// Listing doubles as the expiry sweep: any pending booking whose scheduled
/// date+time has already passed is cancelled in place and left out of the
/// response. Reading the pending list is therefore a mutation trigger.
pub async fn pending_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<booking::Model>>> {
    let now = Utc::now().naive_utc();

    let pending = booking::Entity::find()
        .filter(booking::Column::RestaurantId.eq(claims.sub))
        .filter(booking::Column::Status.eq(BookingStatus::Pending))
        .order_by_asc(booking::Column::Date)
        .order_by_asc(booking::Column::Time)
        .all(&state.db)
        .await?;

    let mut upcoming = Vec::new();
    for b in pending {
        match b.scheduled_at() {
            Some(scheduled) if scheduled < now => {
                let mut active: booking::ActiveModel = b.into();
                active.cancel(
                    CancellationSource::Restaurant,
                    EXPIRED_PENDING_REASON.to_string(),
                );
                active.updated_at = Set(Utc::now().into());
                active.update(&state.db).await?;
            }
            _ => upcoming.push(b),
        }
    }

    Ok(Json(upcoming))
}

/// List confirmed bookings, soonest first. No sweep here: stale confirmed
/// bookings are a display concern, filtered client-side.
pub async fn confirmed_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<booking::Model>>> {
    let confirmed = booking::Entity::find()
        .filter(booking::Column::RestaurantId.eq(claims.sub))
        .filter(booking::Column::Status.eq(BookingStatus::Confirmed))
        .order_by_asc(booking::Column::Date)
        .order_by_asc(booking::Column::Time)
        .all(&state.db)
        .await?;

    Ok(Json(confirmed))
}

/// Find a booking belonging to this restaurant. Another restaurant's
/// booking id behaves as missing.
async fn find_own_booking(
    state: &AppState,
    restaurant_id: Uuid,
    booking_id: Uuid,
) -> AppResult<booking::Model> {
    booking::Entity::find()
        .filter(booking::Column::Id.eq(booking_id))
        .filter(booking::Column::RestaurantId.eq(restaurant_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

/// Confirm a booking. No precondition on the current status.
pub async fn confirm_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<booking::Model>> {
    let booking = find_own_booking(&state, claims.sub, booking_id).await?;

    let mut active: booking::ActiveModel = booking.into();
    active.confirm();
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

/// Cancel a booking on behalf of the restaurant. Cancelling an already
/// cancelled booking returns it unchanged.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<CancelBookingRequest>,
) -> AppResult<Json<booking::Model>> {
    let booking = find_own_booking(&state, claims.sub, booking_id).await?;

    if booking.is_cancelled() {
        return Ok(Json(booking));
    }

    let reason = payload
        .reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| RESTAURANT_CANCEL_REASON.to_string());

    let mut active: booking::ActiveModel = booking.into();
    active.cancel(CancellationSource::Restaurant, reason);
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArrivalRequest {
    pub arrival_status: String,
}

/// Track whether the guest has shown up. Only "arriving" and "arrived" are
/// accepted; the booking status itself is not consulted.
pub async fn update_arrival(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateArrivalRequest>,
) -> AppResult<Json<booking::Model>> {
    let arrival = match payload.arrival_status.as_str() {
        "arriving" => ArrivalStatus::Arriving,
        "arrived" => ArrivalStatus::Arrived,
        _ => {
            return Err(AppError::BadRequest(
                "Arrival status must be 'arriving' or 'arrived'".to_string(),
            ))
        }
    };

    let booking = find_own_booking(&state, claims.sub, booking_id).await?;

    let mut active: booking::ActiveModel = booking.into();
    active.arrival_status = Set(arrival);
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

// ============ Table Inventory ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableRequest {
    pub floor: String,
    pub table_number: i32,
    pub capacity: i32,
    pub available: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableRequest {
    pub floor: Option<String>,
    pub table_number: Option<i32>,
    pub capacity: Option<i32>,
    pub available: Option<bool>,
}

/// Add a table to the restaurant's floor plan
pub async fn create_table(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<Json<dining_table::Model>> {
    if payload.floor.trim().is_empty() {
        return Err(AppError::BadRequest("Floor is required".to_string()));
    }

    if payload.capacity < 1 {
        return Err(AppError::BadRequest(
            "Capacity must be at least 1".to_string(),
        ));
    }

    let table = dining_table::ActiveModel {
        id: Set(Uuid::new_v4()),
        restaurant_id: Set(claims.sub),
        floor: Set(payload.floor.trim().to_string()),
        table_number: Set(payload.table_number),
        capacity: Set(payload.capacity),
        available: Set(payload.available.unwrap_or(true)),
        ..Default::default()
    };

    let result = table.insert(&state.db).await?;

    Ok(Json(result))
}

/// List the restaurant's tables
pub async fn list_tables(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<dining_table::Model>>> {
    let tables = dining_table::Entity::find()
        .filter(dining_table::Column::RestaurantId.eq(claims.sub))
        .order_by_asc(dining_table::Column::Floor)
        .order_by_asc(dining_table::Column::TableNumber)
        .all(&state.db)
        .await?;

    Ok(Json(tables))
}

async fn find_own_table(
    state: &AppState,
    restaurant_id: Uuid,
    table_id: Uuid,
) -> AppResult<dining_table::Model> {
    dining_table::Entity::find()
        .filter(dining_table::Column::Id.eq(table_id))
        .filter(dining_table::Column::RestaurantId.eq(restaurant_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Table not found".to_string()))
}

/// Update a table. Only the listed fields are writable.
pub async fn update_table(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(table_id): Path<Uuid>,
    Json(payload): Json<UpdateTableRequest>,
) -> AppResult<Json<dining_table::Model>> {
    let table = find_own_table(&state, claims.sub, table_id).await?;

    let mut active: dining_table::ActiveModel = table.into();

    if let Some(floor) = payload.floor {
        if floor.trim().is_empty() {
            return Err(AppError::BadRequest("Floor is required".to_string()));
        }
        active.floor = Set(floor.trim().to_string());
    }

    if let Some(number) = payload.table_number {
        active.table_number = Set(number);
    }

    if let Some(capacity) = payload.capacity {
        if capacity < 1 {
            return Err(AppError::BadRequest(
                "Capacity must be at least 1".to_string(),
            ));
        }
        active.capacity = Set(capacity);
    }

    if let Some(available) = payload.available {
        active.available = Set(available);
    }

    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

/// Remove a table from the floor plan
pub async fn delete_table(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(table_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let table = find_own_table(&state, claims.sub, table_id).await?;

    dining_table::Entity::delete_by_id(table.id)
        .exec(&state.db)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Table deleted" })))
}

/// Flip a table's availability flag. Availability is floor-managed state,
/// never derived from bookings.
pub async fn toggle_table(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(table_id): Path<Uuid>,
) -> AppResult<Json<dining_table::Model>> {
    let table = find_own_table(&state, claims.sub, table_id).await?;

    let available = table.available;
    let mut active: dining_table::ActiveModel = table.into();
    active.available = Set(!available);
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

// ============ Profile / Info Hub ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub about_us: Option<String>,
    pub open_hours: Option<String>,
    pub profile_image: Option<String>,
    pub images: Option<Vec<String>>,
}

/// The restaurant's own profile
pub async fn my_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<restaurant::Model>> {
    let restaurant = restaurant::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

    Ok(Json(restaurant))
}

/// Update profile and info-hub fields. Only the listed fields are
/// writable.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<restaurant::Model>> {
    let restaurant = restaurant::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

    let mut active: restaurant::ActiveModel = restaurant.into();

    if let Some(name) = payload.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        active.name = Set(name.trim().to_string());
    }

    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }

    if let Some(address) = payload.address {
        active.address = Set(address);
    }

    if let Some(city) = payload.city {
        active.city = Set(city);
    }

    if let Some(st) = payload.state {
        active.state = Set(st);
    }

    if let Some(about_us) = payload.about_us {
        active.about_us = Set(Some(about_us));
    }

    if let Some(open_hours) = payload.open_hours {
        active.open_hours = Set(Some(open_hours));
    }

    if let Some(profile_image) = payload.profile_image {
        active.profile_image = Set(Some(profile_image));
    }

    if let Some(images) = payload.images {
        active.images = Set(serde_json::json!(images));
    }

    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    use crate::config::Config;
    use crate::utils::jwt::AccountRole;

    fn test_state(db: DatabaseConnection) -> AppState {
        AppState {
            db,
            config: Config {
                database_url: String::new(),
                jwt_secret: "test-secret".to_string(),
                jwt_expiration_hours: 24,
                server_host: "127.0.0.1".to_string(),
                server_port: 3000,
            },
        }
    }

    fn restaurant_claims(id: Uuid) -> Claims {
        Claims {
            sub: id,
            email: "staff@example.com".to_string(),
            role: AccountRole::Restaurant,
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    fn booking_model(restaurant_id: Uuid, status: BookingStatus) -> booking::Model {
        booking::Model {
            id: Uuid::new_v4(),
            restaurant_id,
            diner_id: Uuid::new_v4(),
            name: "Ada".to_string(),
            phone: "555-0100".to_string(),
            special_request: None,
            date: Utc::now().date_naive() + Duration::days(1),
            time: "19:00".to_string(),
            total_people: 4,
            confirmed: status == BookingStatus::Confirmed,
            status,
            arrival_status: ArrivalStatus::Unset,
            cancellation_source: CancellationSource::None,
            cancellation_reason: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn pending_sweep_cancels_and_omits_expired() {
        let restaurant_id = Uuid::new_v4();
        let mut stale = booking_model(restaurant_id, BookingStatus::Pending);
        stale.date = Utc::now().date_naive() - Duration::days(1);
        stale.time = "10:00".to_string();

        let mut swept = stale.clone();
        swept.status = BookingStatus::Cancelled;
        swept.confirmed = false;
        swept.cancellation_source = CancellationSource::Restaurant;
        swept.cancellation_reason = Some(EXPIRED_PENDING_REASON.to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stale]])
            .append_query_results([vec![swept]])
            .into_connection();

        let result = pending_bookings(
            State(test_state(db.clone())),
            Extension(restaurant_claims(restaurant_id)),
        )
        .await
        .unwrap();

        // Expired booking is not in the response, and a cancellation write
        // carrying the sweep reason was persisted
        assert!(result.0.is_empty());

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(format!("{:?}", log[1]).contains(EXPIRED_PENDING_REASON));
    }

    #[tokio::test]
    async fn pending_keeps_future_bookings() {
        let restaurant_id = Uuid::new_v4();
        let upcoming = booking_model(restaurant_id, BookingStatus::Pending);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![upcoming.clone()]])
            .into_connection();

        let result = pending_bookings(
            State(test_state(db.clone())),
            Extension(restaurant_claims(restaurant_id)),
        )
        .await
        .unwrap();

        assert_eq!(result.0, vec![upcoming]);
        // Read only, no sweep write
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn confirm_sets_status_and_mirror() {
        let restaurant_id = Uuid::new_v4();
        let pending = booking_model(restaurant_id, BookingStatus::Pending);
        let mut confirmed = pending.clone();
        confirmed.status = BookingStatus::Confirmed;
        confirmed.confirmed = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![confirmed]])
            .into_connection();

        let result = confirm_booking(
            State(test_state(db)),
            Extension(restaurant_claims(restaurant_id)),
            Path(pending.id),
        )
        .await
        .unwrap();

        assert_eq!(result.0.status, BookingStatus::Confirmed);
        assert!(result.0.confirmed);
    }

    #[tokio::test]
    async fn cancel_uses_supplied_reason() {
        let restaurant_id = Uuid::new_v4();
        let pending = booking_model(restaurant_id, BookingStatus::Pending);
        let mut cancelled = pending.clone();
        cancelled.status = BookingStatus::Cancelled;
        cancelled.cancellation_source = CancellationSource::Restaurant;
        cancelled.cancellation_reason = Some("Table double-booked".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![cancelled]])
            .into_connection();

        let result = cancel_booking(
            State(test_state(db.clone())),
            Extension(restaurant_claims(restaurant_id)),
            Path(pending.id),
            Json(CancelBookingRequest {
                reason: Some("Table double-booked".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(result.0.cancellation_source, CancellationSource::Restaurant);
        assert_eq!(
            result.0.cancellation_reason.as_deref(),
            Some("Table double-booked")
        );

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(format!("{:?}", log[1]).contains("Table double-booked"));
    }

    #[tokio::test]
    async fn cancel_already_cancelled_is_noop() {
        let restaurant_id = Uuid::new_v4();
        let mut cancelled = booking_model(restaurant_id, BookingStatus::Cancelled);
        cancelled.cancellation_source = CancellationSource::User;
        cancelled.cancellation_reason = Some("Cancelled by user".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cancelled.clone()]])
            .into_connection();

        let result = cancel_booking(
            State(test_state(db.clone())),
            Extension(restaurant_claims(restaurant_id)),
            Path(cancelled.id),
            Json(CancelBookingRequest { reason: None }),
        )
        .await
        .unwrap();

        // Record comes back unchanged, source untouched, no write issued
        assert_eq!(result.0, cancelled);
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn arrival_rejects_unknown_value() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = update_arrival(
            State(test_state(db.clone())),
            Extension(restaurant_claims(Uuid::new_v4())),
            Path(Uuid::new_v4()),
            Json(UpdateArrivalRequest {
                arrival_status: "eating".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        // Rejected before any lookup or write
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn arrival_sets_arrived() {
        let restaurant_id = Uuid::new_v4();
        let confirmed = booking_model(restaurant_id, BookingStatus::Confirmed);
        let mut arrived = confirmed.clone();
        arrived.arrival_status = ArrivalStatus::Arrived;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![confirmed.clone()]])
            .append_query_results([vec![arrived]])
            .into_connection();

        let result = update_arrival(
            State(test_state(db)),
            Extension(restaurant_claims(restaurant_id)),
            Path(confirmed.id),
            Json(UpdateArrivalRequest {
                arrival_status: "arrived".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(result.0.arrival_status, ArrivalStatus::Arrived);
        // Booking status itself is untouched by arrival tracking
        assert_eq!(result.0.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn toggle_flips_availability() {
        let restaurant_id = Uuid::new_v4();
        let table = dining_table::Model {
            id: Uuid::new_v4(),
            restaurant_id,
            floor: "Ground".to_string(),
            table_number: 4,
            capacity: 6,
            available: true,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let mut toggled = table.clone();
        toggled.available = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![table.clone()]])
            .append_query_results([vec![toggled]])
            .into_connection();

        let result = toggle_table(
            State(test_state(db)),
            Extension(restaurant_claims(restaurant_id)),
            Path(table.id),
        )
        .await
        .unwrap();

        assert!(!result.0.available);
    }
}
