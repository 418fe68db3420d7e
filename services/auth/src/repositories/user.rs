//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{NewUser, UpdateProfileRequest, User};

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, role, created_at, updated_at";

/// Hash a clear-text password with Argon2
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

/// Check a clear-text password against a user's stored hash
///
/// Users without a password never match.
pub fn verify_password(user: &User, password: &str) -> Result<bool> {
    let Some(stored) = user.password_hash.as_deref() else {
        return Ok(false);
    };

    let parsed_hash = PasswordHash::new(stored)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn user_from_row(row: &PgRow) -> Result<User> {
    let role: String = row.try_get("role")?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        password_hash: row.try_get("password_hash")?,
        role: role.parse()?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with the `user` role
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        info!("Creating new user: {}", new_user.email);

        let password_hash = hash_password(&new_user.password)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (name, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, 'user')
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.phone)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        user_from_row(&row)
    }

    /// Give a password-less user (created by a booking) their credentials
    ///
    /// Returns `None` if the account already has a password.
    pub async fn claim(&self, id: Uuid, new_user: &NewUser) -> Result<Option<User>> {
        info!("Claiming booking-created account: {}", new_user.email);

        let password_hash = hash_password(&new_user.password)?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = $2, phone = COALESCE($3, phone), password_hash = $4, updated_at = NOW()
            WHERE id = $1 AND password_hash IS NULL
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&new_user.name)
        .bind(&new_user.phone)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        info!("Finding user by email: {}", email);

        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        info!("Finding user by ID: {}", id);

        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Update a user's name and phone
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<Option<User>> {
        info!("Updating profile of user: {}", id);

        let name = update.name.as_deref().map(str::trim);
        let phone = update
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), phone = COALESCE($3, phone), updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Make sure an admin account with the given credentials exists
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<User> {
        info!("Ensuring admin account: {}", email);

        let password_hash = hash_password(password)?;

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ('Administrator', $1, $2, 'admin')
            ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash, role = 'admin', updated_at = NOW()
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        user_from_row(&row)
    }
}
