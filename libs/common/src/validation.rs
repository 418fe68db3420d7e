//! Input validation utilities
//!
//! Single-field validators return `Result<(), String>` with a message fit
//! for the client. Forms collect failures per field in [`FieldErrors`] so a
//! submission reports every bad field at once.

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Bookable hours, on the hour
pub const TIME_SLOTS: [&str; 12] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00",
    "19:00", "20:00",
];

/// Largest accepted decoded image upload
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// One failing form field
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Failures collected while validating a form
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a single-field check
    pub fn check(&mut self, field: &'static str, result: Result<(), String>) -> &mut Self {
        if let Err(message) = result {
            self.0.push(FieldError { field, message });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Message for a given field, if it failed
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.iter().map(|e| e.field).collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Require at least `min` characters after trimming
pub fn validate_min_length(value: &str, min: usize, what: &str) -> Result<(), String> {
    if char_len(value) < min {
        return Err(format!("{} must be at least {} characters long", what, min));
    }
    Ok(())
}

/// Require a non-blank value
pub fn validate_required(value: &str, what: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", what));
    }
    Ok(())
}

/// Validate a person's name
pub fn validate_name(name: &str) -> Result<(), String> {
    validate_min_length(name, 2, "Name")
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate an optional phone number
pub fn validate_phone(phone: Option<&str>) -> Result<(), String> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(());
    };

    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^[0-9+()\- ]{5,20}$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone) {
        return Err("Invalid phone number".to_string());
    }

    Ok(())
}

/// Validate a new password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate the repeated password of a registration form
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if password != confirmation {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

/// Validate the date of a booking against today's date
pub fn validate_booking_date(date: NaiveDate, today: NaiveDate) -> Result<(), String> {
    if date < today {
        return Err("Booking date cannot be in the past".to_string());
    }
    Ok(())
}

/// Parse a booking time, accepting only the club's slots
pub fn parse_time_slot(time: &str) -> Result<NaiveTime, String> {
    let time = time.trim();
    if !TIME_SLOTS.contains(&time) {
        return Err(format!(
            "Time must be one of {} to {}, on the hour",
            TIME_SLOTS[0],
            TIME_SLOTS[TIME_SLOTS.len() - 1]
        ));
    }

    NaiveTime::parse_from_str(time, "%H:%M").map_err(|e| format!("Invalid time: {}", e))
}

/// Validate a trainer rating
pub fn validate_rating(rating: f64) -> Result<(), String> {
    if !(0.0..=5.0).contains(&rating) {
        return Err("Rating must be between 0 and 5".to_string());
    }
    Ok(())
}

/// Validate an optional image reference
///
/// Accepts an empty value, an `http(s)` URL, or an inline
/// `data:image/*;base64,` payload of at most [`MAX_IMAGE_BYTES`].
pub fn validate_image_url(image_url: Option<&str>) -> Result<(), String> {
    let Some(url) = image_url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(());
    };

    if url.starts_with("http://") || url.starts_with("https://") || url.starts_with("images/") {
        return Ok(());
    }

    let Some(rest) = url.strip_prefix("data:") else {
        return Err("Image must be a URL or an uploaded image".to_string());
    };

    let Some((meta, payload)) = rest.split_once(',') else {
        return Err("Malformed image data".to_string());
    };

    let Some(mime) = meta.strip_suffix(";base64") else {
        return Err("Image data must be base64 encoded".to_string());
    };

    if !mime.starts_with("image/") {
        return Err("Please choose an image file".to_string());
    }

    if base64_decoded_len(payload) > MAX_IMAGE_BYTES {
        return Err("Image must not exceed 5MB".to_string());
    }

    Ok(())
}

/// Decoded size of a base64 payload, without decoding it
fn base64_decoded_len(payload: &str) -> usize {
    let len = payload.len();
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count().min(2);
    let tail = match len % 4 {
        2 => 1,
        3 => 2,
        _ => 0,
    };
    ((len / 4) * 3 + tail).saturating_sub(padding)
}
