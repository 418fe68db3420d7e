//! Workout repository

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::workout::{Workout, WorkoutPayload};

const WORKOUT_COLUMNS: &str = "id, title, description, duration, difficulty, category, \
     trainer_id, image_url, created_at, updated_at";

fn workout_from_row(row: &PgRow) -> Result<Workout> {
    let difficulty: String = row.try_get("difficulty")?;
    Ok(Workout {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        duration: row.try_get("duration")?,
        difficulty: difficulty.parse()?,
        category: row.try_get("category")?,
        trainer_id: row.try_get("trainer_id")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: PgPool,
}

impl WorkoutRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Workouts in catalog order, optionally only those led by one trainer
    pub async fn list(&self, trainer_id: Option<Uuid>) -> Result<Vec<Workout>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS} FROM workouts
            WHERE $1::uuid IS NULL OR trainer_id = $1
            ORDER BY created_at, title
            "#
        ))
        .bind(trainer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(workout_from_row).collect()
    }

    /// The first `limit` workouts in catalog order
    pub async fn featured(&self, limit: i64) -> Result<Vec<Workout>> {
        let rows = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts ORDER BY created_at, title LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(workout_from_row).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Workout>> {
        let row = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(workout_from_row).transpose()
    }

    /// Workouts with the given ids, in no particular order
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Workout>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(workout_from_row).collect()
    }

    pub async fn create(&self, payload: &WorkoutPayload) -> Result<Workout> {
        info!("Creating workout: {}", payload.title);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO workouts
                (title, description, duration, difficulty, category, trainer_id, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(payload.title.trim())
        .bind(payload.description.trim())
        .bind(payload.duration)
        .bind(payload.difficulty.as_str())
        .bind(payload.category.trim())
        .bind(payload.trainer_id)
        .bind(payload.image())
        .fetch_one(&self.pool)
        .await?;

        workout_from_row(&row)
    }

    pub async fn update(&self, id: Uuid, payload: &WorkoutPayload) -> Result<Option<Workout>> {
        info!("Updating workout: {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE workouts
            SET title = $2, description = $3, duration = $4, difficulty = $5,
                category = $6, trainer_id = $7, image_url = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payload.title.trim())
        .bind(payload.description.trim())
        .bind(payload.duration)
        .bind(payload.difficulty.as_str())
        .bind(payload.category.trim())
        .bind(payload.trainer_id)
        .bind(payload.image())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(workout_from_row).transpose()
    }

    /// Delete a workout, returning whether a row was removed
    ///
    /// Fails with a foreign key violation while bookings reference the
    /// workout.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting workout: {}", id);

        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
