//! Booking form and booking views

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use common::{cache::RedisPool, token::Claims};
use std::collections::BTreeSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::booking::{
        Booking, BookingDetails, BookingRequest, NewBooking, attach_details, check_selection,
    },
    state::AppState,
};

/// Seconds during which an identical submission is rejected
const DUPLICATE_WINDOW_SECS: u64 = 10;

pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let booking = request.validate(state.club.today()).map_err(|errors| {
        warn!("Rejected booking form: {}", errors);
        errors
    })?;

    let trainer = state
        .trainers
        .find_by_id(booking.trainer_id)
        .await
        .map_err(ApiError::internal("Failed to load trainer"))?;
    let workout = state
        .workouts
        .find_by_id(booking.workout_id)
        .await
        .map_err(ApiError::internal("Failed to load workout"))?;

    check_selection(trainer.as_ref(), workout.as_ref(), booking.trainer_id).into_result()?;

    let created = with_duplicate_guard(
        &state.redis_pool,
        &booking.dedupe_key(),
        store_booking(&state, &booking),
    )
    .await?;

    info!("Booking {} created for {}", created.id, booking.email);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn store_booking(state: &AppState, booking: &NewBooking) -> ApiResult<Booking> {
    let user_id = state
        .users
        .find_or_create_by_email(&booking.name, &booking.email, booking.phone.as_deref())
        .await
        .map_err(ApiError::internal("Failed to resolve booking user"))?;

    state
        .bookings
        .create(user_id, booking)
        .await
        .map_err(ApiError::internal("Failed to create booking"))
}

/// Run `store` unless an identical submission holds the guard at `key`
///
/// The guard is released when `store` fails, so the visitor can retry at once.
async fn with_duplicate_guard<T>(
    redis_pool: &RedisPool,
    key: &str,
    store: impl Future<Output = ApiResult<T>>,
) -> ApiResult<T> {
    let guarded = match redis_pool
        .set_if_absent(key, "1", DUPLICATE_WINDOW_SECS)
        .await
    {
        Ok(true) => true,
        Ok(false) => {
            warn!("Duplicate booking submission: {}", key);
            return Err(ApiError::Conflict(
                "This booking was just submitted".to_string(),
            ));
        }
        // Best effort: without Redis the submission goes through unchecked
        Err(e) => {
            warn!("Duplicate booking check unavailable: {:#}", e);
            false
        }
    };

    let result = store.await;
    if guarded && result.is_err() {
        if let Err(e) = redis_pool.delete(key).await {
            warn!("Failed to release duplicate booking guard: {:#}", e);
        }
    }
    result
}

/// The signed-in user's bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<BookingDetails>>> {
    let bookings = state
        .bookings
        .list_for_user(claims.sub)
        .await
        .map_err(ApiError::internal("Failed to load bookings"))?;

    Ok(Json(with_details(&state, bookings).await?))
}

/// Load the users, trainers and workouts referenced by `bookings`
pub(super) async fn with_details(
    state: &AppState,
    bookings: Vec<Booking>,
) -> ApiResult<Vec<BookingDetails>> {
    let user_ids: Vec<Uuid> = distinct(bookings.iter().map(|b| b.user_id));
    let trainer_ids: Vec<Uuid> = distinct(bookings.iter().map(|b| b.trainer_id));
    let workout_ids: Vec<Uuid> = distinct(bookings.iter().map(|b| b.workout_id));

    let users = state
        .users
        .find_contacts(&user_ids)
        .await
        .map_err(ApiError::internal("Failed to load booking users"))?;
    let trainers = state
        .trainers
        .find_many(&trainer_ids)
        .await
        .map_err(ApiError::internal("Failed to load booking trainers"))?;
    let workouts = state
        .workouts
        .find_many(&workout_ids)
        .await
        .map_err(ApiError::internal("Failed to load booking workouts"))?;

    Ok(attach_details(bookings, &users, &trainers, &workouts))
}

fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}
