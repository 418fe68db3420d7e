//! API models for request and response payloads

pub mod booking;
pub mod dashboard;
pub mod message;
pub mod pricing;
pub mod trainer;
pub mod workout;

use serde::Deserialize;

/// Body of the admin status-change actions
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}
