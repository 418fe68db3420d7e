//! Workout models

use chrono::{DateTime, Utc};
use common::validation::{
    FieldErrors, validate_image_url, validate_min_length, validate_required,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::trainer::Trainer;

/// How hard a workout is
///
/// The Russian labels of the first catalog are accepted on input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[serde(alias = "Легкий")]
    Easy,
    #[serde(alias = "Средний")]
    Medium,
    #[serde(alias = "Высокий")]
    High,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" | "Легкий" => Ok(Difficulty::Easy),
            "medium" | "Средний" => Ok(Difficulty::Medium),
            "high" | "Высокий" => Ok(Difficulty::High),
            other => anyhow::bail!("Unknown difficulty: {}", other),
        }
    }
}

/// Workout entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Minutes
    pub duration: i32,
    pub difficulty: Difficulty,
    pub category: String,
    #[serde(alias = "coach_id")]
    pub trainer_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Workout together with the trainer who leads it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WorkoutWithTrainer {
    #[serde(flatten)]
    pub workout: Workout,
    pub trainer: Option<Trainer>,
}

/// Workout form used by the admin
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutPayload {
    pub title: String,
    pub description: String,
    pub duration: i32,
    pub difficulty: Difficulty,
    pub category: String,
    #[serde(default, alias = "coach_id")]
    pub trainer_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl WorkoutPayload {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("title", validate_min_length(&self.title, 2, "Title"))
            .check(
                "description",
                validate_required(&self.description, "Description"),
            )
            .check(
                "duration",
                if (1..=480).contains(&self.duration) {
                    Ok(())
                } else {
                    Err("Duration must be between 1 and 480 minutes".to_string())
                },
            )
            .check("category", validate_required(&self.category, "Category"))
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

/// Filters for the workout list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutQuery {
    #[serde(alias = "coach_id")]
    pub trainer_id: Option<Uuid>,
}

/// Attach each workout's trainer by cross-referencing the trainer list
///
/// Workouts whose trainer is unset or no longer present get `None`.
pub fn attach_trainers(workouts: Vec<Workout>, trainers: &[Trainer]) -> Vec<WorkoutWithTrainer> {
    let by_id: HashMap<Uuid, &Trainer> = trainers.iter().map(|t| (t.id, t)).collect();

    workouts
        .into_iter()
        .map(|workout| {
            let trainer = workout
                .trainer_id
                .and_then(|id| by_id.get(&id))
                .map(|t| (*t).clone());
            WorkoutWithTrainer { workout, trainer }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::trainer::tests::trainer;
    use serde_json::json;

    pub(crate) fn workout(title: &str, trainer_id: Option<Uuid>) -> Workout {
        Workout {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "Комплексная тренировка".to_string(),
            duration: 60,
            difficulty: Difficulty::Medium,
            category: "Силовые".to_string(),
            trainer_id,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_attach_trainers_joins_by_id() {
        let maria = trainer("Мария", 5.0, 6);
        let igor = trainer("Игорь", 4.9, 10);
        let workouts = vec![
            workout("Йога", Some(maria.id)),
            workout("Бокс", Some(igor.id)),
            workout("Открытая тренировка", None),
            workout("Пилатес", Some(Uuid::new_v4())),
        ];

        let joined = attach_trainers(workouts, &[maria.clone(), igor.clone()]);

        assert_eq!(joined[0].trainer.as_ref().map(|t| t.id), Some(maria.id));
        assert_eq!(joined[1].trainer.as_ref().map(|t| t.id), Some(igor.id));
        assert!(joined[2].trainer.is_none());
        assert!(joined[3].trainer.is_none());
    }

    #[test]
    fn test_joined_workout_flattens() {
        let maria = trainer("Мария", 5.0, 6);
        let joined = attach_trainers(vec![workout("Йога", Some(maria.id))], &[maria]);

        let json = serde_json::to_value(&joined[0]).unwrap();
        assert_eq!(json["title"], "Йога");
        assert_eq!(json["difficulty"], "medium");
        assert_eq!(json["trainer"]["name"], "Мария");
    }

    #[test]
    fn test_payload_accepts_coach_id_and_russian_difficulty() {
        let coach = Uuid::new_v4();
        let payload: WorkoutPayload = serde_json::from_value(json!({
            "title": "HIIT тренировка",
            "description": "Интервальная тренировка",
            "duration": 45,
            "difficulty": "Высокий",
            "category": "Кардио",
            "coach_id": coach
        }))
        .unwrap();

        assert_eq!(payload.trainer_id, Some(coach));
        assert_eq!(payload.difficulty, Difficulty::High);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_payload_validation() {
        let payload = WorkoutPayload {
            title: "X".to_string(),
            description: String::new(),
            duration: 0,
            difficulty: Difficulty::Easy,
            category: String::new(),
            trainer_id: None,
            image_url: None,
        };

        let errors = payload.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 4);
        assert!(errors.message_for("image_url").is_none());
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("Средний".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("extreme".parse::<Difficulty>().is_err());
    }
}
