//! Aggregate counts for the admin dashboard

use anyhow::Result;
use sqlx::{PgPool, Row};

use crate::models::dashboard::DashboardStats;

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM trainers) AS trainers,
                (SELECT COUNT(*) FROM workouts) AS workouts,
                (SELECT COUNT(*) FROM bookings) AS bookings,
                (SELECT COUNT(*) FROM bookings WHERE status = 'pending') AS pending_bookings,
                (SELECT COUNT(*) FROM contact_messages WHERE status = 'new') AS new_contact_messages,
                (SELECT COUNT(*) FROM user_messages WHERE status = 'new') AS new_user_messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats {
            trainers: row.try_get("trainers")?,
            workouts: row.try_get("workouts")?,
            bookings: row.try_get("bookings")?,
            pending_bookings: row.try_get("pending_bookings")?,
            new_contact_messages: row.try_get("new_contact_messages")?,
            new_user_messages: row.try_get("new_user_messages")?,
        })
    }
}
