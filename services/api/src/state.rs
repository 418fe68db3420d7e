//! Application state shared across handlers

use common::{cache::RedisPool, settings::ClubSettings, token::TokenVerifier};
use sqlx::PgPool;

use crate::repositories::{
    BookingRepository, ContactMessageRepository, DashboardRepository, TrainerRepository,
    UserMessageRepository, UserRepository, WorkoutRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub redis_pool: RedisPool,
    pub token_verifier: TokenVerifier,
    pub club: ClubSettings,
    pub trainers: TrainerRepository,
    pub workouts: WorkoutRepository,
    pub bookings: BookingRepository,
    pub contact_messages: ContactMessageRepository,
    pub user_messages: UserMessageRepository,
    pub users: UserRepository,
    pub dashboard: DashboardRepository,
}

impl AppState {
    pub fn new(
        db_pool: PgPool,
        redis_pool: RedisPool,
        token_verifier: TokenVerifier,
        club: ClubSettings,
    ) -> Self {
        Self {
            trainers: TrainerRepository::new(db_pool.clone()),
            workouts: WorkoutRepository::new(db_pool.clone()),
            bookings: BookingRepository::new(db_pool.clone()),
            contact_messages: ContactMessageRepository::new(db_pool.clone()),
            user_messages: UserMessageRepository::new(db_pool.clone()),
            users: UserRepository::new(db_pool.clone()),
            dashboard: DashboardRepository::new(db_pool.clone()),
            db_pool,
            redis_pool,
            token_verifier,
            club,
        }
    }
}
