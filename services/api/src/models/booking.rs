//! Booking models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use common::validation::{
    FieldErrors, parse_time_slot, validate_booking_date, validate_email, validate_name,
    validate_phone,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{trainer::Trainer, workout::Workout};

/// Booking status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Whether an admin may move a booking from `self` to `next`
    ///
    /// Re-applying the current status is allowed and changes nothing.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        *self == next
            || matches!(
                (self, next),
                (Pending, Confirmed)
                    | (Pending, Cancelled)
                    | (Confirmed, Completed)
                    | (Confirmed, Cancelled)
            )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => anyhow::bail!("Unknown booking status: {}", other),
        }
    }
}

/// Booking entity
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trainer_id: Uuid,
    pub workout_id: Uuid,
    pub booking_date: NaiveDate,
    #[serde(with = "slot_format")]
    pub booking_time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Times are shown the way the form offers them, `HH:MM`
mod slot_format {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }
}

/// Booking form as submitted by a visitor
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(
        default,
        alias = "coach_id",
        alias = "trainerId",
        deserialize_with = "empty_as_none"
    )]
    pub trainer_id: Option<Uuid>,
    #[serde(default, alias = "workoutId", deserialize_with = "empty_as_none")]
    pub workout_id: Option<Uuid>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: String,
}

/// Unselected form controls arrive as `""`; treat them like a missing field
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// A booking form that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub trainer_id: Uuid,
    pub workout_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl NewBooking {
    /// Key identifying a repeat of the same submission
    pub fn dedupe_key(&self) -> String {
        format!(
            "booking_submit:{}:{}:{}:{}:{}",
            self.email,
            self.trainer_id,
            self.workout_id,
            self.date,
            self.time.format("%H:%M")
        )
    }
}

impl BookingRequest {
    /// Check every field against the club's rules, relative to `today`
    pub fn validate(&self, today: NaiveDate) -> Result<NewBooking, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors
            .check("name", validate_name(&self.name))
            .check("email", validate_email(&self.email))
            .check("phone", validate_phone(self.phone.as_deref()))
            .check(
                "trainer_id",
                self.trainer_id
                    .map(|_| ())
                    .ok_or_else(|| "Please choose a trainer".to_string()),
            )
            .check(
                "workout_id",
                self.workout_id
                    .map(|_| ())
                    .ok_or_else(|| "Please choose a workout".to_string()),
            )
            .check(
                "date",
                match self.date {
                    Some(date) => validate_booking_date(date, today),
                    None => Err("Please choose a date".to_string()),
                },
            );

        let time = parse_time_slot(&self.time);
        errors.check("time", time.as_ref().map(|_| ()).map_err(Clone::clone));

        match (self.trainer_id, self.workout_id, self.date, time) {
            (Some(trainer_id), Some(workout_id), Some(date), Ok(time)) if errors.is_empty() => {
                Ok(NewBooking {
                    name: self.name.trim().to_string(),
                    email: self.email.trim().to_lowercase(),
                    phone: self
                        .phone
                        .as_deref()
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string),
                    trainer_id,
                    workout_id,
                    date,
                    time,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Check that the selected trainer and workout exist and belong together
///
/// A workout led by a trainer can only be booked with that trainer.
pub fn check_selection(
    trainer: Option<&Trainer>,
    workout: Option<&Workout>,
    trainer_id: Uuid,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors
        .check(
            "trainer_id",
            trainer
                .map(|_| ())
                .ok_or_else(|| "Selected trainer does not exist".to_string()),
        )
        .check(
            "workout_id",
            match workout {
                None => Err("Selected workout does not exist".to_string()),
                Some(w) if w.trainer_id.is_some_and(|id| id != trainer_id) => {
                    Err("This workout is led by another trainer".to_string())
                }
                Some(_) => Ok(()),
            },
        );
    errors
}

/// Who booked, as shown to the admin
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingContact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Booking with its user, trainer and workout attached
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub user: Option<BookingContact>,
    pub trainer: Option<Trainer>,
    pub workout: Option<Workout>,
}

/// Attach related rows to each booking by cross-referencing id lists
pub fn attach_details(
    bookings: Vec<Booking>,
    users: &[BookingContact],
    trainers: &[Trainer],
    workouts: &[Workout],
) -> Vec<BookingDetails> {
    let users: HashMap<Uuid, &BookingContact> = users.iter().map(|u| (u.id, u)).collect();
    let trainers: HashMap<Uuid, &Trainer> = trainers.iter().map(|t| (t.id, t)).collect();
    let workouts: HashMap<Uuid, &Workout> = workouts.iter().map(|w| (w.id, w)).collect();

    bookings
        .into_iter()
        .map(|booking| BookingDetails {
            user: users.get(&booking.user_id).map(|u| (*u).clone()),
            trainer: trainers.get(&booking.trainer_id).map(|t| (*t).clone()),
            workout: workouts.get(&booking.workout_id).map(|w| (*w).clone()),
            booking,
        })
        .collect()
}

/// Filters for the admin booking list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingQuery {
    pub status: Option<BookingStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{trainer::tests::trainer, workout::tests::workout};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    fn booking(user_id: Uuid, trainer_id: Uuid, workout_id: Uuid) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            user_id,
            trainer_id,
            workout_id,
            booking_date: today(),
            booking_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Pending.can_transition_to(Pending));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn test_valid_request() {
        let trainer_id = Uuid::new_v4();
        let workout_id = Uuid::new_v4();
        let request: BookingRequest = serde_json::from_value(json!({
            "name": " Иван Иванов ",
            "email": "Ivan@Example.com",
            "phone": "",
            "coach_id": trainer_id,
            "workoutId": workout_id,
            "date": "2024-05-11",
            "time": "18:00"
        }))
        .unwrap();

        let booking = request.validate(today()).unwrap();
        assert_eq!(booking.name, "Иван Иванов");
        assert_eq!(booking.email, "ivan@example.com");
        assert_eq!(booking.phone, None);
        assert_eq!(booking.trainer_id, trainer_id);
        assert_eq!(booking.time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(
            booking.dedupe_key(),
            format!(
                "booking_submit:ivan@example.com:{}:{}:2024-05-11:18:00",
                trainer_id, workout_id
            )
        );
    }

    #[test]
    fn test_empty_request_reports_every_field() {
        let request: BookingRequest = serde_json::from_value(json!({})).unwrap();
        let errors = request.validate(today()).unwrap_err();

        let fields: Vec<&str> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            ["name", "email", "trainer_id", "workout_id", "date", "time"]
        );
    }

    #[test]
    fn test_past_date_and_off_slot_time() {
        let request: BookingRequest = serde_json::from_value(json!({
            "name": "Иван",
            "email": "ivan@example.com",
            "trainer_id": Uuid::new_v4(),
            "workout_id": Uuid::new_v4(),
            "date": "2024-05-09",
            "time": "21:30"
        }))
        .unwrap();

        let errors = request.validate(today()).unwrap_err();
        assert_eq!(
            errors.message_for("date"),
            Some("Booking date cannot be in the past")
        );
        assert!(errors.message_for("time").is_some());
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn test_blank_selections_are_missing() {
        let request: BookingRequest = serde_json::from_value(json!({
            "name": "",
            "email": "",
            "trainer_id": "",
            "workout_id": " ",
            "date": "",
            "time": ""
        }))
        .unwrap();
        assert_eq!(request.trainer_id, None);
        assert_eq!(request.date, None);

        let errors = request.validate(today()).unwrap_err();
        assert_eq!(errors.message_for("trainer_id"), Some("Please choose a trainer"));
        assert_eq!(errors.message_for("workout_id"), Some("Please choose a workout"));
        assert_eq!(errors.message_for("date"), Some("Please choose a date"));
    }

    #[test]
    fn test_malformed_selection_is_rejected() {
        let result = serde_json::from_value::<BookingRequest>(json!({
            "trainer_id": "not-a-uuid"
        }));
        assert!(result.is_err());

        let request: BookingRequest =
            serde_json::from_value(json!({ "date": "2024-05-11", "trainer_id": null })).unwrap();
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2024, 5, 11));
        assert_eq!(request.trainer_id, None);
    }

    #[test]
    fn test_selection_with_matching_trainer() {
        let maria = trainer("Мария", 5.0, 6);
        let yoga = workout("Йога", Some(maria.id));

        assert!(check_selection(Some(&maria), Some(&yoga), maria.id).is_empty());
    }

    #[test]
    fn test_selection_with_another_trainers_workout() {
        let maria = trainer("Мария", 5.0, 6);
        let oleg = trainer("Олег", 4.8, 10);
        let yoga = workout("Йога", Some(maria.id));

        let errors = check_selection(Some(&oleg), Some(&yoga), oleg.id);
        assert_eq!(
            errors.message_for("workout_id"),
            Some("This workout is led by another trainer")
        );
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn test_selection_with_workout_open_to_any_trainer() {
        let oleg = trainer("Олег", 4.8, 10);
        let crossfit = workout("Кроссфит", None);

        assert!(check_selection(Some(&oleg), Some(&crossfit), oleg.id).is_empty());
    }

    #[test]
    fn test_selection_with_missing_rows() {
        let errors = check_selection(None, None, Uuid::new_v4());

        assert_eq!(
            errors.message_for("trainer_id"),
            Some("Selected trainer does not exist")
        );
        assert_eq!(
            errors.message_for("workout_id"),
            Some("Selected workout does not exist")
        );
    }

    #[test]
    fn test_attach_details() {
        let maria = trainer("Мария", 5.0, 6);
        let yoga = workout("Йога", Some(maria.id));
        let user = BookingContact {
            id: Uuid::new_v4(),
            name: "Иван".to_string(),
            email: "ivan@example.com".to_string(),
            phone: None,
        };

        let details = attach_details(
            vec![
                booking(user.id, maria.id, yoga.id),
                booking(Uuid::new_v4(), maria.id, Uuid::new_v4()),
            ],
            &[user.clone()],
            &[maria.clone()],
            &[yoga.clone()],
        );

        assert_eq!(details[0].user.as_ref(), Some(&user));
        assert_eq!(details[0].workout.as_ref().map(|w| w.id), Some(yoga.id));
        assert!(details[1].user.is_none());
        assert!(details[1].workout.is_none());
        assert_eq!(details[1].trainer.as_ref().map(|t| t.id), Some(maria.id));
    }

    #[test]
    fn test_booking_serializes_slot_time() {
        let json =
            serde_json::to_value(booking(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())).unwrap();
        assert_eq!(json["booking_time"], "18:00");
        assert_eq!(json["booking_date"], "2024-05-10");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_query_parses_status() {
        let query: BookingQuery = serde_json::from_value(json!({"status": "confirmed"})).unwrap();
        assert_eq!(query.status, Some(BookingStatus::Confirmed));
        assert!("unknown".parse::<BookingStatus>().is_err());
    }
}
