//! Contact form and member message repositories

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::message::{
    ContactMessage, ContactRequest, MessageStatus, UserMessage, UserMessageRequest,
};

const CONTACT_COLUMNS: &str = "id, name, email, phone, message, status, created_at, updated_at";

const USER_MESSAGE_COLUMNS: &str = "id, user_id, subject, message, status, created_at, updated_at";

fn contact_from_row(row: &PgRow) -> Result<ContactMessage> {
    let status: String = row.try_get("status")?;
    Ok(ContactMessage {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        message: row.try_get("message")?,
        status: status.parse()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn user_message_from_row(row: &PgRow) -> Result<UserMessage> {
    let status: String = row.try_get("status")?;
    Ok(UserMessage {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        status: status.parse()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Messages from the public contact form
#[derive(Clone)]
pub struct ContactMessageRepository {
    pool: PgPool,
}

impl ContactMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: &ContactRequest) -> Result<ContactMessage> {
        info!("Storing contact message from: {}", request.email.trim());

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO contact_messages (name, email, phone, message, status)
            VALUES ($1, $2, $3, $4, 'new')
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(request.name.trim())
        .bind(request.email.trim().to_lowercase())
        .bind(request.phone())
        .bind(request.message.trim())
        .fetch_one(&self.pool)
        .await?;

        contact_from_row(&row)
    }

    /// Messages newest first, optionally with one status only
    pub async fn list(&self, status: Option<MessageStatus>) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {CONTACT_COLUMNS} FROM contact_messages
            WHERE $1::text IS NULL OR status = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(contact_from_row).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactMessage>> {
        let row = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_messages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(contact_from_row).transpose()
    }

    /// Move a message from `from` to `to`
    ///
    /// Returns `None` when the message is gone or no longer in `from`.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: MessageStatus,
        to: MessageStatus,
    ) -> Result<Option<ContactMessage>> {
        info!("Updating contact message {} status: {} -> {}", id, from, to);

        let row = sqlx::query(&format!(
            r#"
            UPDATE contact_messages
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(contact_from_row).transpose()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting contact message: {}", id);

        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Messages signed-in members send to the club
#[derive(Clone)]
pub struct UserMessageRepository {
    pool: PgPool,
}

impl UserMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: Uuid, request: &UserMessageRequest) -> Result<UserMessage> {
        info!("Storing message from user: {}", user_id);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO user_messages (user_id, subject, message, status)
            VALUES ($1, $2, $3, 'new')
            RETURNING {USER_MESSAGE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(request.subject.trim())
        .bind(request.message.trim())
        .fetch_one(&self.pool)
        .await?;

        user_message_from_row(&row)
    }

    /// Messages newest first, optionally with one status only
    pub async fn list(&self, status: Option<MessageStatus>) -> Result<Vec<UserMessage>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_MESSAGE_COLUMNS} FROM user_messages
            WHERE $1::text IS NULL OR status = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_message_from_row).collect()
    }

    /// A member's own messages, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserMessage>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_MESSAGE_COLUMNS} FROM user_messages
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_message_from_row).collect()
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserMessage>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_MESSAGE_COLUMNS} FROM user_messages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_message_from_row).transpose()
    }

    /// Move a message from `from` to `to`
    ///
    /// Returns `None` when the message is gone or no longer in `from`.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: MessageStatus,
        to: MessageStatus,
    ) -> Result<Option<UserMessage>> {
        info!("Updating user message {} status: {} -> {}", id, from, to);

        let row = sqlx::query(&format!(
            r#"
            UPDATE user_messages
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {USER_MESSAGE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_message_from_row).transpose()
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        info!("Deleting user message: {}", id);

        let result = sqlx::query("DELETE FROM user_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
