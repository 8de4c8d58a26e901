//! Resident roster endpoints.

pub mod handlers;
pub mod payload;

pub use payload::{IdPayload, ResidentPayload, ResidentUpdatePayload};
