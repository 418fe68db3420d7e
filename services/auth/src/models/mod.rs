//! Authentication service models

pub mod user;

pub use user::{LoginRequest, NewUser, RegisterRequest, UpdateProfileRequest, User, UserProfile};
