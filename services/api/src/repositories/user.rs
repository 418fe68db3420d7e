//! User lookups needed by the booking flow and the admin views

use anyhow::Result;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::booking::BookingContact;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Id of the user with this email, creating a password-less user if needed
    ///
    /// An existing user keeps their stored name and phone.
    pub async fn find_or_create_by_email(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Uuid> {
        info!("Resolving booking user: {}", email);

        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, phone, role)
            VALUES ($1, $2, $3, 'user')
            ON CONFLICT (email) DO UPDATE SET email = users.email
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }

    /// Contact details of the users with the given ids
    pub async fn find_contacts(&self, ids: &[Uuid]) -> Result<Vec<BookingContact>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query("SELECT id, name, email, phone FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<BookingContact> {
                Ok(BookingContact {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    email: row.try_get("email")?,
                    phone: row.try_get("phone")?,
                })
            })
            .collect()
    }
}
