use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::booking::{self, ArrivalStatus, BookingStatus, CancellationSource};
use crate::entities::restaurant;
use crate::error::{AppError, AppResult};
use crate::utils::jwt::Claims;
use crate::utils::schedule;
use crate::AppState;

const USER_CANCEL_REASON: &str = "Cancelled by user";

// ============ Restaurant Discovery ============

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub city: Option<String>,
    pub state: Option<String>,
}

/// List restaurants for public browsing, optionally filtered by city/state
pub async fn browse_restaurants(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> AppResult<Json<Vec<restaurant::Model>>> {
    let mut find = restaurant::Entity::find();

    if let Some(city) = query.city {
        find = find.filter(restaurant::Column::City.eq(city));
    }
    if let Some(st) = query.state {
        find = find.filter(restaurant::Column::State.eq(st));
    }

    let restaurants = find
        .order_by_asc(restaurant::Column::Name)
        .all(&state.db)
        .await?;

    Ok(Json(restaurants))
}

/// Get a single restaurant's public profile
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<Uuid>,
) -> AppResult<Json<restaurant::Model>> {
    let restaurant = restaurant::Entity::find_by_id(restaurant_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;

    Ok(Json(restaurant))
}

// ============ Booking Management ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub total_people: i32,
    pub special_request: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub name: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub total_people: i32,
    pub special_request: Option<String>,
    pub status: BookingStatus,
    pub confirmed: bool,
    pub arrival_status: ArrivalStatus,
    pub cancellation_source: CancellationSource,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create a booking request against a restaurant. The restaurant decides
/// later; no table-availability check happens here.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<booking::Model>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    if payload.phone.trim().is_empty() {
        return Err(AppError::BadRequest("Phone is required".to_string()));
    }

    if payload.total_people < 1 {
        return Err(AppError::BadRequest(
            "Party size must be at least 1".to_string(),
        ));
    }

    let time = schedule::normalize_time_hm(&payload.time)
        .ok_or_else(|| AppError::BadRequest("Time must be in HH:MM format".to_string()))?;

    let booking_id = Uuid::new_v4();
    let new_booking = booking::ActiveModel {
        id: Set(booking_id),
        restaurant_id: Set(payload.restaurant_id),
        diner_id: Set(claims.sub),
        name: Set(payload.name.trim().to_string()),
        phone: Set(payload.phone.trim().to_string()),
        special_request: Set(payload.special_request),
        date: Set(payload.date),
        time: Set(time),
        total_people: Set(payload.total_people),
        status: Set(BookingStatus::Pending),
        confirmed: Set(false),
        arrival_status: Set(ArrivalStatus::Unset),
        cancellation_source: Set(CancellationSource::None),
        cancellation_reason: Set(None),
        ..Default::default()
    };

    let booking = new_booking.insert(&state.db).await?;

    Ok(Json(booking))
}

/// List the diner's own bookings, all statuses, soonest first
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::DinerId.eq(claims.sub))
        .order_by_asc(booking::Column::Date)
        .order_by_asc(booking::Column::Time)
        .all(&state.db)
        .await?;

    let restaurants = restaurant::Entity::find().all(&state.db).await?;

    let responses: Vec<BookingResponse> = bookings
        .into_iter()
        .map(|b| {
            let restaurant = restaurants.iter().find(|r| r.id == b.restaurant_id);
            BookingResponse {
                id: b.id,
                restaurant_id: b.restaurant_id,
                restaurant_name: restaurant.map(|r| r.name.clone()).unwrap_or_default(),
                name: b.name,
                phone: b.phone,
                date: b.date,
                time: b.time,
                total_people: b.total_people,
                special_request: b.special_request,
                status: b.status,
                confirmed: b.confirmed,
                arrival_status: b.arrival_status,
                cancellation_source: b.cancellation_source,
                cancellation_reason: b.cancellation_reason,
                created_at: b.created_at.with_timezone(&Utc),
            }
        })
        .collect();

    Ok(Json(responses))
}

/// Cancel one of the diner's own bookings. Soft cancel: the record stays,
/// status becomes cancelled. Repeat cancels return the record unchanged.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<booking::Model>> {
    // Scoped by owner: another diner's booking id behaves as missing
    let booking = booking::Entity::find()
        .filter(booking::Column::Id.eq(booking_id))
        .filter(booking::Column::DinerId.eq(claims.sub))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.is_cancelled() {
        return Ok(Json(booking));
    }

    let mut active: booking::ActiveModel = booking.into();
    active.cancel(CancellationSource::User, USER_CANCEL_REASON.to_string());
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;

    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
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

    fn diner_claims(id: Uuid) -> Claims {
        Claims {
            sub: id,
            email: "diner@example.com".to_string(),
            role: AccountRole::Diner,
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    fn booking_model(diner_id: Uuid, status: BookingStatus) -> booking::Model {
        booking::Model {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            diner_id,
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

    fn create_request(restaurant_id: Uuid) -> CreateBookingRequest {
        CreateBookingRequest {
            restaurant_id,
            name: "Ada".to_string(),
            phone: "555-0100".to_string(),
            date: Utc::now().date_naive() + Duration::days(1),
            time: "19:00".to_string(),
            total_people: 4,
            special_request: None,
        }
    }

    #[tokio::test]
    async fn create_booking_starts_pending() {
        let diner_id = Uuid::new_v4();
        let inserted = booking_model(diner_id, BookingStatus::Pending);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![inserted.clone()]])
            .into_connection();

        let result = create_booking(
            State(test_state(db)),
            Extension(diner_claims(diner_id)),
            Json(create_request(inserted.restaurant_id)),
        )
        .await
        .unwrap();

        assert_eq!(result.0.status, BookingStatus::Pending);
        assert!(!result.0.confirmed);
        assert_eq!(result.0.arrival_status, ArrivalStatus::Unset);
    }

    #[tokio::test]
    async fn create_booking_rejects_malformed_time() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let mut payload = create_request(Uuid::new_v4());
        payload.time = "7pm".to_string();

        let err = create_booking(
            State(test_state(db.clone())),
            Extension(diner_claims(Uuid::new_v4())),
            Json(payload),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn create_booking_rejects_empty_party() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let mut payload = create_request(Uuid::new_v4());
        payload.total_people = 0;

        let err = create_booking(
            State(test_state(db)),
            Extension(diner_claims(Uuid::new_v4())),
            Json(payload),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn cancel_is_scoped_to_owner() {
        // The owner-scoped lookup returns nothing for another diner's
        // booking id, so the caller sees not-found
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<booking::Model>::new()])
            .into_connection();

        let err = cancel_booking(
            State(test_state(db.clone())),
            Extension(diner_claims(Uuid::new_v4())),
            Path(Uuid::new_v4()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn cancel_already_cancelled_is_noop() {
        let diner_id = Uuid::new_v4();
        let mut cancelled = booking_model(diner_id, BookingStatus::Cancelled);
        cancelled.cancellation_source = CancellationSource::Restaurant;
        cancelled.cancellation_reason = Some("Cancelled by restaurant".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cancelled.clone()]])
            .into_connection();

        let result = cancel_booking(
            State(test_state(db.clone())),
            Extension(diner_claims(diner_id)),
            Path(cancelled.id),
        )
        .await
        .unwrap();

        // Unchanged record, and no write was issued
        assert_eq!(result.0, cancelled);
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn cancel_marks_user_source() {
        let diner_id = Uuid::new_v4();
        let pending = booking_model(diner_id, BookingStatus::Pending);
        let mut cancelled = pending.clone();
        cancelled.status = BookingStatus::Cancelled;
        cancelled.confirmed = false;
        cancelled.cancellation_source = CancellationSource::User;
        cancelled.cancellation_reason = Some(USER_CANCEL_REASON.to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![cancelled.clone()]])
            .into_connection();

        let result = cancel_booking(
            State(test_state(db.clone())),
            Extension(diner_claims(diner_id)),
            Path(pending.id),
        )
        .await
        .unwrap();

        assert_eq!(result.0.status, BookingStatus::Cancelled);
        assert_eq!(result.0.cancellation_source, CancellationSource::User);

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(format!("{:?}", log[1]).contains(USER_CANCEL_REASON));
    }
}
