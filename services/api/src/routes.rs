//! API service routes

mod admin;
mod bookings;
mod catalog;
mod messages;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use serde_json::json;

use crate::{
    middleware::{auth_middleware, require_admin},
    state::AppState,
};

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let member_routes = Router::new()
        .route("/me/bookings", get(bookings::my_bookings))
        .route(
            "/me/messages",
            get(messages::my_messages).post(messages::send_message),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/trainers", post(admin::create_trainer))
        .route(
            "/admin/trainers/:id",
            put(admin::update_trainer).delete(admin::delete_trainer),
        )
        .route("/admin/workouts", post(admin::create_workout))
        .route(
            "/admin/workouts/:id",
            put(admin::update_workout).delete(admin::delete_workout),
        )
        .route("/admin/bookings", get(admin::list_bookings))
        .route("/admin/bookings/:id", delete(admin::delete_booking))
        .route("/admin/bookings/:id/status", patch(admin::update_booking_status))
        .route("/admin/contact-messages", get(admin::list_contact_messages))
        .route(
            "/admin/contact-messages/:id",
            delete(admin::delete_contact_message),
        )
        .route(
            "/admin/contact-messages/:id/status",
            patch(admin::update_contact_message_status),
        )
        .route("/admin/user-messages", get(admin::list_user_messages))
        .route("/admin/user-messages/:id", delete(admin::delete_user_message))
        .route(
            "/admin/user-messages/:id/status",
            patch(admin::update_user_message_status),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/home", get(catalog::home))
        .route("/pricing", get(catalog::pricing))
        .route("/trainers", get(catalog::list_trainers))
        .route("/trainers/:id", get(catalog::get_trainer))
        .route("/workouts", get(catalog::list_workouts))
        .route("/workouts/:id", get(catalog::get_workout))
        .route("/bookings", post(bookings::create_booking))
        .route("/contact", post(messages::submit_contact))
        .merge(member_routes)
        .merge(admin_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}

/// Readiness check covering the database and Redis
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);
    let cache = state.redis_pool.health_check().await.unwrap_or(false);

    let status = if database && cache {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(json!({ "database": database, "cache": cache })))
}
