//! Booking repository

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus, NewBooking};

const BOOKING_COLUMNS: &str = "id, user_id, trainer_id, workout_id, booking_date, booking_time, \
     status, created_at, updated_at";

fn booking_from_row(row: &PgRow) -> Result<Booking> {
    let status: String = row.try_get("status")?;
    Ok(Booking {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        trainer_id: row.try_get("trainer_id")?,
        workout_id: row.try_get("workout_id")?,
        booking_date: row.try_get("booking_date")?,
        booking_time: row.try_get("booking_time")?,
        status: status.parse()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a pending booking for `user_id`
    pub async fn create(&self, user_id: Uuid, booking: &NewBooking) -> Result<Booking> {
        info!(
            "Creating booking for user {} on {} {}",
            user_id, booking.date, booking.time
        );

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (user_id, trainer_id, workout_id, booking_date, booking_time, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(booking.trainer_id)
        .bind(booking.workout_id)
        .bind(booking.date)
        .bind(booking.time)
        .fetch_one(&self.pool)
        .await?;

        booking_from_row(&row)
    }

    /// Bookings newest first, optionally with one status only
    pub async fn list(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE $1::text IS NULL OR status = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(booking_from_row).collect()
    }

    /// A user's bookings, soonest session first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE user_id = $1
            ORDER BY booking_date, booking_time
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(booking_from_row).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    /// Move a booking from `from` to `to`
    ///
    /// Returns `None` when the booking is gone or no longer in `from`.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Booking>> {
        info!("Updating booking {} status: {} -> {}", id, from, to);

        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting booking: {}", id);

        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
