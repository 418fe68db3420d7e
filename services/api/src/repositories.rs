//! Repositories for database operations
//!
//! Each repository reads and writes a single table. Related rows are joined
//! in process by the handlers.

pub mod booking;
pub mod dashboard;
pub mod message;
pub mod trainer;
pub mod user;
pub mod workout;

pub use booking::BookingRepository;
pub use dashboard::DashboardRepository;
pub use message::{ContactMessageRepository, UserMessageRepository};
pub use trainer::TrainerRepository;
pub use user::UserRepository;
pub use workout::WorkoutRepository;
