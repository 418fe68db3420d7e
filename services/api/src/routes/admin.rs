//! Admin dashboard: catalog management, bookings and messages
//!
//! Every handler here sits behind the admin guard.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use common::{error::is_foreign_key_violation_in, validation::FieldErrors};
use std::fmt::Display;
use tracing::{info, warn};
use uuid::Uuid;

use super::bookings::with_details;
use crate::{
    error::{ApiError, ApiResult},
    models::{
        StatusUpdate,
        booking::{Booking, BookingDetails, BookingQuery, BookingStatus},
        dashboard::DashboardStats,
        message::{ContactMessage, MessageQuery, MessageStatus, UserMessage},
        trainer::{Trainer, TrainerPayload},
        workout::{Workout, WorkoutPayload},
    },
    state::AppState,
};

/// Map a failed delete, turning references from bookings into a conflict
fn delete_error(what: &'static str) -> impl Fn(anyhow::Error) -> ApiError {
    move |e| {
        if is_foreign_key_violation_in(&e) {
            warn!("{} is still referenced by bookings", what);
            ApiError::Conflict(format!("{} has bookings and cannot be deleted", what))
        } else {
            ApiError::internal("Failed to delete record")(e)
        }
    }
}

fn transition_conflict(what: &str, from: impl Display, to: impl Display) -> ApiError {
    ApiError::Conflict(format!(
        "{} status cannot change from {} to {}",
        what, from, to
    ))
}

fn concurrent_change(what: &str) -> ApiError {
    ApiError::Conflict(format!(
        "{} was changed by someone else, reload and retry",
        what
    ))
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let stats = state
        .dashboard
        .stats()
        .await
        .map_err(ApiError::internal("Failed to load dashboard"))?;

    Ok(Json(stats))
}

// Trainers

pub async fn create_trainer(
    State(state): State<AppState>,
    Json(payload): Json<TrainerPayload>,
) -> ApiResult<(StatusCode, Json<Trainer>)> {
    payload.validate()?;

    let trainer = state
        .trainers
        .create(&payload)
        .await
        .map_err(ApiError::internal("Failed to create trainer"))?;

    info!("Trainer {} created", trainer.id);
    Ok((StatusCode::CREATED, Json(trainer)))
}

pub async fn update_trainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TrainerPayload>,
) -> ApiResult<Json<Trainer>> {
    payload.validate()?;

    let trainer = state
        .trainers
        .update(id, &payload)
        .await
        .map_err(ApiError::internal("Failed to update trainer"))?
        .ok_or(ApiError::NotFound("Trainer"))?;

    Ok(Json(trainer))
}

pub async fn delete_trainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state
        .trainers
        .delete(id)
        .await
        .map_err(delete_error("Trainer"))?
    {
        return Err(ApiError::NotFound("Trainer"));
    }

    info!("Trainer {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

// Workouts

/// Validate a workout form; a trainer, when set, must exist
async fn validate_workout(state: &AppState, payload: &WorkoutPayload) -> ApiResult<()> {
    payload.validate()?;

    let Some(trainer_id) = payload.trainer_id else {
        return Ok(());
    };

    let trainer = state
        .trainers
        .find_by_id(trainer_id)
        .await
        .map_err(ApiError::internal("Failed to load trainer"))?;

    let mut errors = FieldErrors::new();
    errors.check(
        "trainer_id",
        trainer
            .map(|_| ())
            .ok_or_else(|| "Selected trainer does not exist".to_string()),
    );
    errors.into_result().map_err(ApiError::from)
}

pub async fn create_workout(
    State(state): State<AppState>,
    Json(payload): Json<WorkoutPayload>,
) -> ApiResult<(StatusCode, Json<Workout>)> {
    validate_workout(&state, &payload).await?;

    let workout = state
        .workouts
        .create(&payload)
        .await
        .map_err(ApiError::internal("Failed to create workout"))?;

    info!("Workout {} created", workout.id);
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn update_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WorkoutPayload>,
) -> ApiResult<Json<Workout>> {
    validate_workout(&state, &payload).await?;

    let workout = state
        .workouts
        .update(id, &payload)
        .await
        .map_err(ApiError::internal("Failed to update workout"))?
        .ok_or(ApiError::NotFound("Workout"))?;

    Ok(Json(workout))
}

pub async fn delete_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state
        .workouts
        .delete(id)
        .await
        .map_err(delete_error("Workout"))?
    {
        return Err(ApiError::NotFound("Workout"));
    }

    info!("Workout {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

// Bookings

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> ApiResult<Json<Vec<BookingDetails>>> {
    let bookings = state
        .bookings
        .list(query.status)
        .await
        .map_err(ApiError::internal("Failed to load bookings"))?;

    Ok(Json(with_details(&state, bookings).await?))
}

pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(StatusUpdate { status }): Json<StatusUpdate<BookingStatus>>,
) -> ApiResult<Json<Booking>> {
    let booking = state
        .bookings
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to load booking"))?
        .ok_or(ApiError::NotFound("Booking"))?;

    if booking.status == status {
        return Ok(Json(booking));
    }
    if !booking.status.can_transition_to(status) {
        return Err(transition_conflict("Booking", booking.status, status));
    }

    let updated = state
        .bookings
        .update_status(id, booking.status, status)
        .await
        .map_err(ApiError::internal("Failed to update booking"))?
        .ok_or_else(|| concurrent_change("Booking"))?;

    Ok(Json(updated))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state
        .bookings
        .delete(id)
        .await
        .map_err(ApiError::internal("Failed to delete booking"))?
    {
        return Err(ApiError::NotFound("Booking"));
    }

    info!("Booking {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

// Contact messages

pub async fn list_contact_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> ApiResult<Json<Vec<ContactMessage>>> {
    let messages = state
        .contact_messages
        .list(query.status)
        .await
        .map_err(ApiError::internal("Failed to load contact messages"))?;

    Ok(Json(messages))
}

pub async fn update_contact_message_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(StatusUpdate { status }): Json<StatusUpdate<MessageStatus>>,
) -> ApiResult<Json<ContactMessage>> {
    let message = state
        .contact_messages
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to load contact message"))?
        .ok_or(ApiError::NotFound("Message"))?;

    if message.status == status {
        return Ok(Json(message));
    }
    if !message.status.can_transition_to(status) {
        return Err(transition_conflict("Message", message.status, status));
    }

    let updated = state
        .contact_messages
        .update_status(id, message.status, status)
        .await
        .map_err(ApiError::internal("Failed to update contact message"))?
        .ok_or_else(|| concurrent_change("Message"))?;

    Ok(Json(updated))
}

pub async fn delete_contact_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state
        .contact_messages
        .delete(id)
        .await
        .map_err(ApiError::internal("Failed to delete contact message"))?
    {
        return Err(ApiError::NotFound("Message"));
    }

    Ok(StatusCode::NO_CONTENT)
}

// Member messages

pub async fn list_user_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> ApiResult<Json<Vec<UserMessage>>> {
    let messages = state
        .user_messages
        .list(query.status)
        .await
        .map_err(ApiError::internal("Failed to load user messages"))?;

    Ok(Json(messages))
}

pub async fn update_user_message_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(StatusUpdate { status }): Json<StatusUpdate<MessageStatus>>,
) -> ApiResult<Json<UserMessage>> {
    let message = state
        .user_messages
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to load user message"))?
        .ok_or(ApiError::NotFound("Message"))?;

    if message.status == status {
        return Ok(Json(message));
    }
    if !message.status.can_transition_to(status) {
        return Err(transition_conflict("Message", message.status, status));
    }

    let updated = state
        .user_messages
        .update_status(id, message.status, status)
        .await
        .map_err(ApiError::internal("Failed to update user message"))?
        .ok_or_else(|| concurrent_change("Message"))?;

    Ok(Json(updated))
}

pub async fn delete_user_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state
        .user_messages
        .delete(id)
        .await
        .map_err(ApiError::internal("Failed to delete user message"))?
    {
        return Err(ApiError::NotFound("Message"));
    }

    Ok(StatusCode::NO_CONTENT)
}
