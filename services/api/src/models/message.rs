//! Contact form and member message models
//!
//! Both kinds of message share one status lifecycle.

use chrono::{DateTime, Utc};
use common::validation::{
    FieldErrors, validate_email, validate_min_length, validate_name, validate_phone,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Message status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    New,
    Read,
    Replied,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::New => "new",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
        }
    }

    pub fn can_transition_to(&self, next: MessageStatus) -> bool {
        use MessageStatus::*;
        *self == next || matches!((self, next), (New, Read) | (New, Replied) | (Read, Replied))
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(MessageStatus::New),
            "read" => Ok(MessageStatus::Read),
            "replied" => Ok(MessageStatus::Replied),
            other => anyhow::bail!("Unknown message status: {}", other),
        }
    }
}

/// Message left through the public contact form
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact form body
#[derive(Debug, Clone, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("name", validate_name(&self.name))
            .check("email", validate_email(&self.email))
            .check("phone", validate_phone(self.phone.as_deref()))
            .check("message", validate_min_length(&self.message, 10, "Message"));
        errors.into_result()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// Message a signed-in member sent to the club
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserMessageRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl UserMessageRequest {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("subject", validate_min_length(&self.subject, 2, "Subject"))
            .check("message", validate_min_length(&self.message, 10, "Message"));
        errors.into_result()
    }
}

/// Filters for the admin message lists
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageQuery {
    pub status: Option<MessageStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_transitions() {
        use MessageStatus::*;

        assert!(New.can_transition_to(Read));
        assert!(New.can_transition_to(Replied));
        assert!(Read.can_transition_to(Replied));
        assert!(Replied.can_transition_to(Replied));

        assert!(!Read.can_transition_to(New));
        assert!(!Replied.can_transition_to(Read));
    }

    #[test]
    fn test_contact_validation() {
        let request: ContactRequest = serde_json::from_value(json!({
            "name": "Ольга",
            "email": "olga@example.com",
            "phone": " ",
            "message": "Хочу узнать про заморозку абонемента"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.phone(), None);

        let short: ContactRequest = serde_json::from_value(json!({
            "name": "Ольга",
            "email": "olga@example.com",
            "message": "Привет"
        }))
        .unwrap();
        let errors = short.validate().unwrap_err();
        assert_eq!(
            errors.message_for("message"),
            Some("Message must be at least 10 characters long")
        );
    }

    #[test]
    fn test_user_message_validation() {
        let request = UserMessageRequest {
            subject: "В".to_string(),
            message: "коротко".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [MessageStatus::New, MessageStatus::Read, MessageStatus::Replied] {
            assert_eq!(status.as_str().parse::<MessageStatus>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_value(MessageStatus::Replied).unwrap(),
            json!("replied")
        );
    }
}
