//! Trainer (coach) models
//!
//! Older schema revisions called trainers "coaches" and stored
//! `experience_years`; payloads accept either spelling, responses use
//! `experience`.

use chrono::{DateTime, Utc};
use common::validation::{
    FieldErrors, validate_image_url, validate_min_length, validate_rating, validate_required,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trainer entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trainer {
    pub id: Uuid,
    pub name: String,
    pub specialization: String,
    #[serde(alias = "experience_years")]
    pub experience: i32,
    pub rating: f64,
    pub price_per_hour: i32,
    pub description: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_rating() -> f64 {
    5.0
}

/// Trainer form used by the admin to create or replace a trainer
#[derive(Debug, Clone, Deserialize)]
pub struct TrainerPayload {
    pub name: String,
    pub specialization: String,
    #[serde(alias = "experience_years")]
    pub experience: i32,
    #[serde(default = "default_rating")]
    pub rating: f64,
    pub price_per_hour: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl TrainerPayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("name", validate_min_length(&self.name, 2, "Name"))
            .check(
                "specialization",
                validate_required(&self.specialization, "Specialization"),
            )
            .check(
                "experience",
                if self.experience < 0 {
                    Err("Experience cannot be negative".to_string())
                } else {
                    Ok(())
                },
            )
            .check("rating", validate_rating(self.rating))
            .check(
                "price_per_hour",
                if self.price_per_hour <= 0 {
                    Err("Price per hour must be positive".to_string())
                } else {
                    Ok(())
                },
            )
            .check("image_url", validate_image_url(self.image_url.as_deref()));
        errors.into_result()
    }

    /// Image reference to store, blank meaning none
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// The `limit` highest rated trainers, best first
pub fn top_rated(mut trainers: Vec<Trainer>, limit: usize) -> Vec<Trainer> {
    trainers.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| b.experience.cmp(&a.experience))
    });
    trainers.truncate(limit);
    trainers
}
