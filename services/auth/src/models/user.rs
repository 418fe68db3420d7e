//! User model and related functionality

use chrono::{DateTime, Utc};
use common::token::UserRole;
use common::validation::{
    FieldErrors, validate_email, validate_name, validate_password,
    validate_password_confirmation, validate_phone, validate_required,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity
///
/// `password_hash` is empty for users created through the booking form
/// until they register.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// Public view of a user, never carrying the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// New user creation payload, password still in clear text
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    #[serde(alias = "confirmPassword")]
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("name", validate_name(&self.name))
            .check("email", validate_email(&self.email))
            .check("phone", validate_phone(self.phone.as_deref()))
            .check("password", validate_password(&self.password))
            .check(
                "confirm_password",
                validate_password_confirmation(&self.password, &self.confirm_password),
            );
        errors.into_result()
    }

    /// Normalised payload for the repository
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: normalize_phone(self.phone),
            password: self.password,
        }
    }
}

/// User login credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("email", validate_email(&self.email))
            .check("password", validate_required(&self.password, "Password"));
        errors.into_result()
    }
}

/// Profile update payload
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            errors.check("name", validate_name(name));
        }
        errors.check("phone", validate_phone(self.phone.as_deref()));
        errors.into_result()
    }
}

/// Emails are compared case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Blank phone numbers are stored as absent
pub fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            name: " Мария Иванова ".to_string(),
            email: "Maria@FitnessPlus.ru".to_string(),
            phone: Some("  ".to_string()),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_is_normalised() {
        let request = register_request();
        assert!(request.validate().is_ok());

        let new_user = request.into_new_user();
        assert_eq!(new_user.name, "Мария Иванова");
        assert_eq!(new_user.email, "maria@fitnessplus.ru");
        assert_eq!(new_user.phone, None);
    }

    #[test]
    fn test_registration_reports_each_bad_field() {
        let request = RegisterRequest {
            name: "M".to_string(),
            password: "12345".to_string(),
            confirm_password: "54321".to_string(),
            ..register_request()
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.message_for("name").is_some());
        assert!(errors.message_for("email").is_none());
        assert!(errors.message_for("password").is_some());
        assert_eq!(
            errors.message_for("confirm_password"),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_register_accepts_camel_case_confirmation() {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": "Игорь",
            "email": "igor@example.com",
            "password": "boxing1",
            "confirmPassword": "boxing1"
        }))
        .unwrap();

        assert_eq!(request.confirm_password, "boxing1");
        assert!(request.phone.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_login_requires_password() {
        let request = LoginRequest {
            email: "anna@example.com".to_string(),
            password: String::new(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.message_for("password"), Some("Password is required"));
    }

    #[test]
    fn test_profile_never_serializes_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Анна".to_string(),
            email: "anna@example.com".to_string(),
            phone: None,
            password_hash: Some("$argon2id$secret".to_string()),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));

        let profile = UserProfile::from(&user);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("password_hash").is_none());
    }
}
