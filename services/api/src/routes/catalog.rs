//! Public catalog: home page, pricing, trainers and workouts

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        dashboard::HomePage,
        pricing::{PriceList, price_list},
        trainer::{Trainer, top_rated},
        workout::{WorkoutQuery, WorkoutWithTrainer, attach_trainers},
    },
    state::AppState,
};

const HOME_TRAINERS: usize = 3;
const HOME_WORKOUTS: i64 = 3;

pub async fn home(State(state): State<AppState>) -> ApiResult<Json<HomePage>> {
    let trainers = state
        .trainers
        .list()
        .await
        .map_err(ApiError::internal("Failed to load trainers"))?;
    let workouts = state
        .workouts
        .featured(HOME_WORKOUTS)
        .await
        .map_err(ApiError::internal("Failed to load workouts"))?;

    let workouts = attach_trainers(workouts, &trainers);

    Ok(Json(HomePage {
        trainers: top_rated(trainers, HOME_TRAINERS),
        workouts,
        pricing: price_list(),
    }))
}

pub async fn pricing() -> Json<PriceList> {
    Json(price_list())
}

pub async fn list_trainers(State(state): State<AppState>) -> ApiResult<Json<Vec<Trainer>>> {
    let trainers = state
        .trainers
        .list()
        .await
        .map_err(ApiError::internal("Failed to load trainers"))?;

    Ok(Json(trainers))
}

pub async fn get_trainer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Trainer>> {
    let trainer = state
        .trainers
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to load trainer"))?
        .ok_or(ApiError::NotFound("Trainer"))?;

    Ok(Json(trainer))
}

pub async fn list_workouts(
    State(state): State<AppState>,
    Query(query): Query<WorkoutQuery>,
) -> ApiResult<Json<Vec<WorkoutWithTrainer>>> {
    let workouts = state
        .workouts
        .list(query.trainer_id)
        .await
        .map_err(ApiError::internal("Failed to load workouts"))?;
    let trainers = state
        .trainers
        .list()
        .await
        .map_err(ApiError::internal("Failed to load trainers"))?;

    Ok(Json(attach_trainers(workouts, &trainers)))
}

pub async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<WorkoutWithTrainer>> {
    let workout = state
        .workouts
        .find_by_id(id)
        .await
        .map_err(ApiError::internal("Failed to load workout"))?
        .ok_or(ApiError::NotFound("Workout"))?;

    let trainer = match workout.trainer_id {
        Some(trainer_id) => state
            .trainers
            .find_by_id(trainer_id)
            .await
            .map_err(ApiError::internal("Failed to load trainer"))?,
        None => None,
    };

    Ok(Json(WorkoutWithTrainer { workout, trainer }))
}
