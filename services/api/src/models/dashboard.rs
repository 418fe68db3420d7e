//! Admin dashboard and home page view models

use serde::Serialize;

use super::{pricing::PriceList, trainer::Trainer, workout::WorkoutWithTrainer};

/// Record counts shown on the admin dashboard
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub trainers: i64,
    pub workouts: i64,
    pub bookings: i64,
    pub pending_bookings: i64,
    pub new_contact_messages: i64,
    pub new_user_messages: i64,
}

/// Landing page content
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub trainers: Vec<Trainer>,
    pub workouts: Vec<WorkoutWithTrainer>,
    pub pricing: PriceList,
}
