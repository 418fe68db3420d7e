//! Trainer repository

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::trainer::{Trainer, TrainerPayload};

const TRAINER_COLUMNS: &str = "id, name, specialization, experience_years, rating, \
     price_per_hour, description, image_url, created_at, updated_at";

fn trainer_from_row(row: &PgRow) -> Result<Trainer> {
    Ok(Trainer {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        specialization: row.try_get("specialization")?,
        experience: row.try_get("experience_years")?,
        rating: row.try_get("rating")?,
        price_per_hour: row.try_get("price_per_hour")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(Clone)]
pub struct TrainerRepository {
    pool: PgPool,
}

impl TrainerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All trainers, ordered by name
    pub async fn list(&self) -> Result<Vec<Trainer>> {
        let rows = sqlx::query(&format!(
            "SELECT {TRAINER_COLUMNS} FROM trainers ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(trainer_from_row).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Trainer>> {
        let row = sqlx::query(&format!(
            "SELECT {TRAINER_COLUMNS} FROM trainers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(trainer_from_row).transpose()
    }

    /// Trainers with the given ids, in no particular order
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Trainer>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {TRAINER_COLUMNS} FROM trainers WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(trainer_from_row).collect()
    }

    pub async fn create(&self, payload: &TrainerPayload) -> Result<Trainer> {
        info!("Creating trainer: {}", payload.name);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO trainers
                (name, specialization, experience_years, rating, price_per_hour, description, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {TRAINER_COLUMNS}
            "#
        ))
        .bind(payload.name.trim())
        .bind(payload.specialization.trim())
        .bind(payload.experience)
        .bind(payload.rating)
        .bind(payload.price_per_hour)
        .bind(payload.description.trim())
        .bind(payload.image())
        .fetch_one(&self.pool)
        .await?;

        trainer_from_row(&row)
    }

    /// Replace every editable field of a trainer
    pub async fn update(&self, id: Uuid, payload: &TrainerPayload) -> Result<Option<Trainer>> {
        info!("Updating trainer: {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE trainers
            SET name = $2, specialization = $3, experience_years = $4, rating = $5,
                price_per_hour = $6, description = $7, image_url = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {TRAINER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payload.name.trim())
        .bind(payload.specialization.trim())
        .bind(payload.experience)
        .bind(payload.rating)
        .bind(payload.price_per_hour)
        .bind(payload.description.trim())
        .bind(payload.image())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(trainer_from_row).transpose()
    }

    /// Delete a trainer, returning whether a row was removed
    ///
    /// Fails with a foreign key violation while bookings reference the
    /// trainer.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting trainer: {}", id);

        let result = sqlx::query("DELETE FROM trainers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
