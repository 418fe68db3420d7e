//! Contact form and member messages

use axum::{Extension, Json, extract::State, http::StatusCode};
use common::token::Claims;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::message::{ContactMessage, ContactRequest, UserMessage, UserMessageRequest},
    state::AppState,
};

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(request): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Json<ContactMessage>)> {
    request.validate().map_err(|errors| {
        warn!("Rejected contact form: {}", errors);
        errors
    })?;

    let message = state
        .contact_messages
        .create(&request)
        .await
        .map_err(ApiError::internal("Failed to store contact message"))?;

    info!("Contact message {} received", message.id);

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<UserMessageRequest>,
) -> ApiResult<(StatusCode, Json<UserMessage>)> {
    request.validate()?;

    let message = state
        .user_messages
        .create(claims.sub, &request)
        .await
        .map_err(ApiError::internal("Failed to store user message"))?;

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn my_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<UserMessage>>> {
    let messages = state
        .user_messages
        .list_for_user(claims.sub)
        .await
        .map_err(ApiError::internal("Failed to load user messages"))?;

    Ok(Json(messages))
}
